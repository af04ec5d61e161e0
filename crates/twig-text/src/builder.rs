use crate::TrackedText;

/// Assembles a [`TrackedText`] piece by piece, appending at the current end.
#[derive(Debug, Default)]
pub struct TrackedTextBuilder {
    text: TrackedText,
}

impl TrackedTextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `slice` with its markers, past any deleted characters the
    /// text already ends with.
    pub fn push_tracked(&mut self, slice: &TrackedText) -> &mut Self {
        let end = self.text.current_len();
        self.text.splice_after(end, slice);
        self
    }

    /// Appends plain text that is part of both views.
    pub fn push_text(&mut self, text: &str) -> &mut Self {
        self.push_tracked(&TrackedText::from(text))
    }

    pub fn finish(self) -> TrackedText {
        self.text
    }
}
