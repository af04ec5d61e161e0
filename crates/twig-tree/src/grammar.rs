use std::fmt::Debug;

use text_size::{TextRange, TextSize};
use twig_errors::{ParseError, ParseErrorKind};
use twig_text::PositionedChar;

use crate::Subtree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub kind: K,
    pub content: Box<str>,
    pub range: TextRange,
}

impl<K> Token<K> {
    pub fn new(kind: K, content: impl Into<Box<str>>, range: TextRange) -> Self {
        Self { kind, content: content.into(), range }
    }
}

/// A tokenizer and parser pair the edit engine re-parses node text with.
pub trait Grammar {
    type TokenKind: Copy + Eq + Debug;

    /// Splits positioned characters into tokens. Malformed input is an
    /// error, never a partial token list.
    fn tokenize(&self, chars: &[PositionedChar]) -> Result<Vec<Token<Self::TokenKind>>, ParseError>;

    /// Parses one form from the front of `tokens` and returns the rest.
    fn parse<'t>(
        &self,
        tokens: &'t [Token<Self::TokenKind>],
    ) -> Result<(Subtree, &'t [Token<Self::TokenKind>]), ParseError>;

    /// Text placed between a node and its duplicate.
    fn separator(&self) -> &str {
        " "
    }

    /// Whether `left` directly followed by `right` reads as one token, so a
    /// node starting or ending between them cannot be re-parsed on its own.
    fn joins(&self, _left: char, _right: char) -> bool {
        false
    }

    fn tokenize_str(
        &self,
        text: &str,
        offset: TextSize,
    ) -> Result<Vec<Token<Self::TokenKind>>, ParseError> {
        self.tokenize(&PositionedChar::enumerate(text, offset))
    }

    /// Parses exactly one form out of `chars`.
    fn parse_all(&self, chars: &[PositionedChar]) -> Result<Subtree, ParseError> {
        let tokens = self.tokenize(chars)?;
        let (subtree, rest) = self.parse(&tokens)?;
        match (rest.first(), rest.last()) {
            (Some(first), Some(last)) => Err(ParseError::new(
                ParseErrorKind::TrailingTokens,
                first.range.cover(last.range),
            )),
            _ => Ok(subtree),
        }
    }
}
