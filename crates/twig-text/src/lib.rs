//! A text buffer that remembers what it looked like before it was edited.
//!
//! Every stored character that was typed since the last commit carries an
//! [`ChangeKind::Inserted`] marker, every character that was removed stays in
//! storage with a [`ChangeKind::Deleted`] marker. Markers are positioned in
//! storage (original) coordinates, while the public API speaks current
//! coordinates and translates internally.

mod builder;
mod change;
mod positioned;

use std::ops::Range;

pub use builder::TrackedTextBuilder;
pub use change::{ChangeKind, TextChange};
pub use positioned::PositionedChar;
pub use text_size::{TextRange, TextSize};
use tracing::trace;

/// Which side of the change log a slice is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// The text as it was before any uncommitted edit.
    Original,
    /// The text with every edit applied.
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedText {
    text: Vec<char>,
    changes: Vec<TextChange>,
}

impl TrackedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> &[TextChange] {
        &self.changes
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn current_len(&self) -> TextSize {
        let deleted = self.changes.iter().filter(|change| change.is_deleted()).count();
        size(self.text.len() - deleted)
    }

    pub fn original_len(&self) -> TextSize {
        let inserted = self.changes.iter().filter(|change| change.is_inserted()).count();
        size(self.text.len() - inserted)
    }

    pub fn is_empty(&self) -> bool {
        self.current_len() == TextSize::new(0)
    }

    /// Translates a current position into a storage index.
    ///
    /// With [`Edge::End`] the translation also skips deleted characters
    /// sitting exactly at the result, so the end of a span lands past them.
    fn storage_index(&self, position: TextSize, edge: Edge) -> usize {
        let mut result = index(position);
        for change in &self.changes {
            let at = change.index();
            if at > result {
                break;
            }
            if change.is_deleted() && (edge == Edge::End || at < result) {
                result += 1;
            }
        }
        result
    }

    fn storage_range(&self, range: TextRange) -> Range<usize> {
        let len = self.text.len();
        let start = self.storage_index(range.start(), Edge::Start).min(len);
        let end = self.storage_index(range.end(), Edge::End).min(len);
        start..end.max(start)
    }

    /// The storage span from the first to the last visible character of
    /// `range`. Deleted characters at either edge are left out.
    fn visible_span(&self, range: TextRange) -> Range<usize> {
        let len = self.text.len();
        let start = self.storage_index(range.start(), Edge::End).min(len);
        if range.is_empty() {
            return start..start;
        }
        let last = self.storage_index(range.end() - TextSize::new(1), Edge::End);
        start..(last + 1).min(len)
    }

    /// Indices into `changes` of the markers that fall inside `span`.
    fn changes_in(&self, span: &Range<usize>) -> Range<usize> {
        let first = self.changes.partition_point(|change| change.index() < span.start);
        let last = self.changes.partition_point(|change| change.index() < span.end);
        first..last
    }

    fn shift_changes_from(&mut self, first: usize, delta: isize) {
        for change in &mut self.changes[first..] {
            *change = change.moved(delta);
        }
    }

    /// Inserts `ch` at `position`, ahead of any deleted characters there.
    pub fn insert_char(&mut self, ch: char, position: TextSize) {
        self.insert_char_at_edge(ch, position, Edge::Start);
    }

    /// Inserts `ch` at `position`, past any deleted characters there.
    pub fn insert_char_past_deletions(&mut self, ch: char, position: TextSize) {
        self.insert_char_at_edge(ch, position, Edge::End);
    }

    fn insert_char_at_edge(&mut self, ch: char, position: TextSize, edge: Edge) {
        let at = self.storage_index(position, edge);
        assert!(at <= self.text.len(), "insert position {position:?} is out of bounds");

        self.text.insert(at, ch);
        let first = self.changes.partition_point(|change| change.index() < at);
        self.shift_changes_from(first, 1);
        self.changes.insert(first, TextChange::new(size(at), ChangeKind::Inserted));

        trace!(?ch, ?position, at, "inserted char");
    }

    /// Deletes the character at `position`.
    ///
    /// Deleting a character that was inserted since the last commit drops it
    /// from storage together with its marker instead of recording a deletion.
    pub fn delete_char(&mut self, position: TextSize) {
        let at = self.storage_index(position, Edge::End);
        assert!(at < self.text.len(), "delete position {position:?} is out of bounds");

        match self.changes.binary_search_by_key(&at, |change| change.index()) {
            Ok(found) => {
                debug_assert!(self.changes[found].is_inserted());
                self.text.remove(at);
                self.changes.remove(found);
                self.shift_changes_from(found, -1);
                trace!(?position, at, "deletion cancelled an insertion");
            }
            Err(slot) => {
                self.changes.insert(slot, TextChange::new(size(at), ChangeKind::Deleted));
                trace!(?position, at, "deleted char");
            }
        }
    }

    pub fn slice(&self, view: View, range: TextRange) -> Vec<PositionedChar> {
        match view {
            View::Original => self.original_slice(range),
            View::Current => self.current_slice(range),
        }
    }

    /// The characters of `range` as they read now, numbered from
    /// `range.start()`.
    pub fn current_slice(&self, range: TextRange) -> Vec<PositionedChar> {
        let span = self.storage_range(range);
        let mut changes = self.changes[self.changes_in(&span)].iter().peekable();
        let mut position = range.start();
        let mut result = Vec::with_capacity(span.len());

        for at in span {
            let change = changes.next_if(|change| change.index() == at);
            if change.is_some_and(|change| change.is_deleted()) {
                continue;
            }
            result.push(PositionedChar { position, ch: self.text[at] });
            position += TextSize::new(1);
        }

        result
    }

    /// The characters stored under `range` as they read before the pending
    /// edits.
    ///
    /// Inserted characters are skipped but still advance the numbering;
    /// deleted characters are reported at the position of the next visible
    /// character.
    pub fn original_slice(&self, range: TextRange) -> Vec<PositionedChar> {
        let span = self.storage_range(range);
        let mut changes = self.changes[self.changes_in(&span)].iter().peekable();
        let mut position = range.start();
        let mut result = Vec::with_capacity(span.len());

        for at in span {
            let ch = self.text[at];
            match changes.next_if(|change| change.index() == at).map(|change| change.kind) {
                Some(ChangeKind::Inserted) => position += TextSize::new(1),
                Some(ChangeKind::Deleted) => result.push(PositionedChar { position, ch }),
                None => {
                    result.push(PositionedChar { position, ch });
                    position += TextSize::new(1);
                }
            }
        }

        result
    }

    pub fn current_text(&self) -> String {
        self.chars_without(ChangeKind::Deleted)
    }

    pub fn original_text(&self) -> String {
        self.chars_without(ChangeKind::Inserted)
    }

    fn chars_without(&self, hidden: ChangeKind) -> String {
        let mut changes = self.changes.iter().peekable();
        let mut result = String::with_capacity(self.text.len());
        for (at, &ch) in self.text.iter().enumerate() {
            let change = changes.next_if(|change| change.index() == at);
            if change.is_none_or(|change| change.kind != hidden) {
                result.push(ch);
            }
        }
        result
    }

    /// Copies `range` out as an independent buffer that keeps its markers,
    /// re-based to start at zero.
    pub fn slice_with_changes(&self, range: TextRange) -> Self {
        let span = self.storage_range(range);
        let offset = span.start as isize;
        let changes = self.changes[self.changes_in(&span)]
            .iter()
            .map(|change| change.moved(-offset))
            .collect();
        Self { text: self.text[span].to_vec(), changes }
    }

    /// Cuts `range` out of storage along with its markers.
    pub fn remove_slice_with_changes(&mut self, range: TextRange) {
        let span = self.storage_range(range);
        let removed = self.changes_in(&span);
        let first = removed.start;

        self.changes.drain(removed);
        self.shift_changes_from(first, -(span.len() as isize));
        trace!(?range, ?span, "removed slice");
        self.text.drain(span);
    }

    /// Splices `slice` in at `position`, markers included.
    pub fn insert_slice_with_changes(&mut self, position: TextSize, slice: &Self) {
        let at = self.storage_index(position, Edge::Start).min(self.text.len());
        self.splice_at(at, slice);
        trace!(?position, at, len = slice.text.len(), "inserted slice");
    }

    /// Splices `slice` in at `position`, past any deleted characters there.
    ///
    /// The returned [`Splice`] undoes exactly this insertion through
    /// [`TrackedText::unsplice`].
    pub fn splice_after(&mut self, position: TextSize, slice: &Self) -> Splice {
        let at = self.storage_index(position, Edge::End).min(self.text.len());
        self.splice_at(at, slice);
        trace!(?position, at, len = slice.text.len(), "spliced slice");
        Splice { at, len: slice.text.len() }
    }

    fn splice_at(&mut self, at: usize, slice: &Self) {
        let first = self.changes.partition_point(|change| change.index() < at);

        self.shift_changes_from(first, slice.text.len() as isize);
        self.changes
            .splice(first..first, slice.changes.iter().map(|change| change.moved(at as isize)));
        self.text.splice(at..at, slice.text.iter().copied());
    }

    /// Removes the characters added by `splice`, markers included.
    pub fn unsplice(&mut self, splice: Splice) {
        let span = splice.at..splice.at + splice.len;
        let removed = self.changes_in(&span);
        let first = removed.start;

        self.changes.drain(removed);
        self.shift_changes_from(first, -(splice.len as isize));
        self.text.drain(span);
        trace!(at = splice.at, len = splice.len, "removed splice");
    }

    /// Commits every change between the first and the last visible
    /// character of `range`: deleted characters leave storage for good and
    /// inserted characters become ordinary text.
    ///
    /// Deletions at the edges of `range` are kept, since they may still
    /// belong to a neighbouring node.
    pub fn validate_slice(&mut self, range: TextRange) {
        let span = self.visible_span(range);
        let committed = self.changes_in(&span);
        let first = committed.start;
        let deleted: Vec<usize> = self.changes[committed.clone()]
            .iter()
            .filter(|change| change.is_deleted())
            .map(|change| change.index())
            .collect();

        self.changes.drain(committed);
        self.shift_changes_from(first, -(deleted.len() as isize));
        for at in deleted.into_iter().rev() {
            self.text.remove(at);
        }
        trace!(?range, ?span, "validated slice");
    }

    /// Commits every change in the buffer.
    pub fn validate_all(&mut self) {
        let mut deleted = self.changes.iter().filter(|change| change.is_deleted()).peekable();
        let mut at = 0;
        self.text.retain(|_| {
            let keep = deleted.next_if(|change| change.index() == at).is_none();
            at += 1;
            keep
        });
        self.changes.clear();
    }

    /// Prefixes every stored character with `A` (inserted), `D` (deleted) or
    /// `_` (unchanged).
    pub fn render_markers(&self) -> String {
        let mut changes = self.changes.iter().peekable();
        let mut result = String::with_capacity(self.text.len() * 2);
        for (at, &ch) in self.text.iter().enumerate() {
            let marker = match changes.next_if(|change| change.index() == at) {
                Some(change) if change.is_deleted() => 'D',
                Some(_) => 'A',
                None => '_',
            };
            result.push(marker);
            result.push(ch);
        }
        result
    }
}

/// Where [`TrackedText::splice_after`] put a slice, in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splice {
    at: usize,
    len: usize,
}

impl From<&str> for TrackedText {
    fn from(text: &str) -> Self {
        Self { text: text.chars().collect(), changes: Vec::new() }
    }
}

fn index(position: TextSize) -> usize {
    u32::from(position) as usize
}

fn size(len: usize) -> TextSize {
    TextSize::new(len as u32)
}
