use std::fmt;
use std::str::FromStr;

use anyhow::{Context as _, bail};
use text_size::TextSize;
use twig_edit::Document;
use twig_sexp::Sexp;
use twig_tree::Path;

/// One step of an `edit` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Op {
    Insert { position: TextSize, ch: char },
    Delete { position: TextSize },
    Up(Path),
    Down(Path),
    Duplicate(Path),
}

impl Op {
    /// Applies the step and describes what became of it.
    pub(crate) fn apply(&self, document: &mut Document<Sexp>) -> anyhow::Result<&'static str> {
        let outcome = match self {
            Self::Insert { position, ch } => document.insert_character(*ch, *position)?,
            Self::Delete { position } => document.delete_character(*position)?,
            Self::Up(path) | Self::Down(path) | Self::Duplicate(path) => {
                let node = document
                    .node_at_path(path)
                    .with_context(|| format!("no node at path `{path}`"))?;
                let root = match self {
                    Self::Up(_) => document.move_up(node)?,
                    Self::Down(_) => document.move_down(node)?,
                    _ => document.duplicate(node)?,
                };
                return Ok(if root.is_some() { "applied" } else { "rejected" });
            }
        };

        Ok(if outcome.is_reparsed() { "reparsed" } else { "pending" })
    }
}

impl FromStr for Op {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let name = parts.next().unwrap_or_default();
        let argument = parts.next().with_context(|| format!("`{s}` is missing its argument"))?;

        let op = match name {
            "insert" => {
                let ch = parts.next().with_context(|| format!("`{s}` is missing a character"))?;
                Self::Insert { position: position(argument)?, ch: character(ch)? }
            }
            "delete" => Self::Delete { position: position(argument)? },
            "up" => Self::Up(path(argument)?),
            "down" => Self::Down(path(argument)?),
            "dup" => Self::Duplicate(path(argument)?),
            _ => bail!("unknown edit `{name}`"),
        };

        if parts.next().is_some() {
            bail!("`{s}` has too many arguments");
        }
        Ok(op)
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert { position, ch } => write!(f, "insert {ch:?} at {}", u32::from(*position)),
            Self::Delete { position } => write!(f, "delete at {}", u32::from(*position)),
            Self::Up(path) => write!(f, "move `{path}` up"),
            Self::Down(path) => write!(f, "move `{path}` down"),
            Self::Duplicate(path) => write!(f, "duplicate `{path}`"),
        }
    }
}

fn position(argument: &str) -> anyhow::Result<TextSize> {
    let position: u32 =
        argument.parse().with_context(|| format!("`{argument}` is not a position"))?;
    Ok(TextSize::new(position))
}

fn path(argument: &str) -> anyhow::Result<Path> {
    argument.parse().with_context(|| format!("`{argument}` is not a path"))
}

/// A single character, with `\n`, `\t` and `\\` escapes.
fn character(argument: &str) -> anyhow::Result<char> {
    let ch = match argument {
        "\\n" => '\n',
        "\\t" => '\t',
        "\\\\" => '\\',
        _ => {
            let mut chars = argument.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => bail!("`{argument}` is not a single character"),
            }
        }
    };
    Ok(ch)
}
