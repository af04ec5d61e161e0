use std::fmt;
use std::num::ParseIntError;
use std::ops::Deref;
use std::str::FromStr;

/// Child indices from the root down to a node. The empty path is the root.
///
/// Written dot-separated, e.g. `1.0`; the root is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<usize>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }
}

impl Deref for Path {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, index) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        s.split('.').map(str::parse).collect::<Result<_, _>>().map(Self)
    }
}
