use twig_text::PositionedChar;

pub(crate) struct Cursor<'a> {
    chars: &'a [PositionedChar],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(chars: &'a [PositionedChar]) -> Self {
        Self { chars, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn since(&self, start: usize) -> &'a [PositionedChar] {
        &self.chars[start..self.pos]
    }

    pub(crate) fn peek(&self) -> Option<PositionedChar> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn advance(&mut self) -> Option<PositionedChar> {
        let next = self.peek()?;
        self.pos += 1;
        Some(next)
    }

    pub(crate) fn advance_while(&mut self, f: impl Fn(char) -> bool) {
        while self.peek().is_some_and(|next| f(next.ch)) {
            self.pos += 1;
        }
    }
}
