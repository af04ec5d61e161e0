use text_size::TextSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The character exists only in the current view.
    Inserted,
    /// The character exists only in the original view.
    Deleted,
}

/// A point change, positioned in storage (original) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextChange {
    pub position: TextSize,
    pub kind: ChangeKind,
}

impl TextChange {
    pub fn new(position: TextSize, kind: ChangeKind) -> Self {
        Self { position, kind }
    }

    pub fn is_deleted(self) -> bool {
        self.kind == ChangeKind::Deleted
    }

    pub fn is_inserted(self) -> bool {
        self.kind == ChangeKind::Inserted
    }

    pub(crate) fn moved(self, delta: isize) -> Self {
        let position = (u32::from(self.position) as isize + delta) as u32;
        Self { position: TextSize::new(position), ..self }
    }

    pub(crate) fn index(self) -> usize {
        u32::from(self.position) as usize
    }
}
