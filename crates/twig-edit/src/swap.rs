use drop_bomb::DropBomb;
use text_size::TextRange;
use tracing::trace;
use twig_text::TrackedText;

/// Two sibling spans exchanged in the text, pending a verdict from the
/// parser.
pub(crate) struct Swap {
    earlier: TextRange,
    later: TextRange,
    earlier_slice: TrackedText,
    later_slice: TrackedText,
    bomb: DropBomb,
}

impl Swap {
    /// Exchanges the text of `earlier` and `later`, which must not overlap.
    /// Whatever lies between them stays in place.
    pub(crate) fn apply(text: &mut TrackedText, earlier: TextRange, later: TextRange) -> Self {
        debug_assert!(earlier.end() <= later.start());

        let later_slice = text.slice_with_changes(later);
        text.remove_slice_with_changes(later);
        let earlier_slice = text.slice_with_changes(earlier);
        text.remove_slice_with_changes(earlier);

        text.insert_slice_with_changes(earlier.start(), &later_slice);
        text.insert_slice_with_changes(later.start() - earlier.len() + later.len(), &earlier_slice);
        trace!(?earlier, ?later, "swapped spans");

        Self {
            earlier,
            later,
            earlier_slice,
            later_slice,
            bomb: DropBomb::new("a swap must be committed or rolled back"),
        }
    }

    pub(crate) fn commit(mut self) {
        self.bomb.defuse();
    }

    /// Puts both spans back where they were.
    pub(crate) fn rollback(mut self, text: &mut TrackedText) {
        self.bomb.defuse();
        let (earlier_len, later_len) = (self.earlier.len(), self.later.len());

        text.remove_slice_with_changes(TextRange::at(self.earlier.start(), later_len));
        text.remove_slice_with_changes(TextRange::at(self.later.start() - earlier_len, earlier_len));
        text.insert_slice_with_changes(self.earlier.start(), &self.earlier_slice);
        text.insert_slice_with_changes(self.later.start(), &self.later_slice);
        trace!(earlier = ?self.earlier, later = ?self.later, "swap rolled back");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: u32, end: u32) -> TextRange {
        TextRange::new(start.into(), end.into())
    }

    #[test]
    fn apply_keeps_the_gap() {
        let mut text = TrackedText::from("(one  two)");
        Swap::apply(&mut text, range(1, 4), range(6, 9)).commit();
        assert_eq!(text.current_text(), "(two  one)");
    }

    #[test]
    fn rollback_restores_uneven_spans() {
        let original = TrackedText::from("(a  long)");
        let mut text = original.clone();

        let swap = Swap::apply(&mut text, range(1, 2), range(4, 8));
        assert_eq!(text.current_text(), "(long  a)");
        swap.rollback(&mut text);

        assert_eq!(text, original);
    }

    #[test]
    fn rollback_restores_markers() {
        let mut text = TrackedText::from("(ab cd)");
        text.insert_char('x', 5.into());
        text.delete_char(1.into());
        let original = text.clone();
        assert_eq!(text.current_text(), "(b cxd)");

        let swap = Swap::apply(&mut text, range(1, 2), range(3, 6));
        assert_eq!(text.current_text(), "(cxd b)");
        assert_eq!(text.original_text(), "(cd ab)");
        swap.rollback(&mut text);

        assert_eq!(text, original);
    }

    #[test]
    #[should_panic(expected = "a swap must be committed or rolled back")]
    fn dropping_an_open_swap_panics() {
        let mut text = TrackedText::from("(a b)");
        let _swap = Swap::apply(&mut text, range(1, 2), range(3, 4));
    }
}
