use text_size::TextSize;

/// A character paired with the current-coordinate position it is reported at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionedChar {
    pub position: TextSize,
    pub ch: char,
}

impl PositionedChar {
    pub fn new(position: impl Into<TextSize>, ch: char) -> Self {
        Self { position: position.into(), ch }
    }

    /// Numbers the characters of `text` consecutively, starting at `offset`.
    pub fn enumerate(text: &str, offset: TextSize) -> Vec<Self> {
        text.chars()
            .enumerate()
            .map(|(index, ch)| Self::new(offset + TextSize::new(index as u32), ch))
            .collect()
    }

    pub fn collect_text(chars: &[Self]) -> String {
        chars.iter().map(|c| c.ch).collect()
    }
}

impl From<(u32, char)> for PositionedChar {
    fn from((position, ch): (u32, char)) -> Self {
        Self::new(position, ch)
    }
}
