use std::fmt::Display;

pub use annotate_snippets::Renderer;
use annotate_snippets::{Level, Snippet};
pub use text_size::TextRange;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("unmatched `{0}`")]
    UnmatchedDelimiter(char),
    #[error("quote is not followed by a form")]
    DanglingQuote,
    #[error("malformed token: {reason}")]
    MalformedToken { reason: &'static str },
    #[error("unexpected tokens after the form")]
    TrailingTokens,
}

/// A tokenizer or parser failure, located in current-view character
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ParseError {
    kind: ParseErrorKind,
    range: TextRange,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, range: TextRange) -> Self {
        Self { kind, range }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn render<'a>(
        &'a self,
        renderer: &'a Renderer,
        path: &'a str,
        text: &'a str,
    ) -> impl Display + 'a {
        let span = byte_span(text, self.range);
        let message = Level::Error.title(self.kind.title()).snippet(
            Snippet::source(text)
                .origin(path)
                .annotation(Level::Error.span(span).label(self.kind.label()))
                .fold(true),
        );
        renderer.render(message)
    }
}

impl ParseErrorKind {
    fn title(&self) -> &'static str {
        match self {
            Self::UnexpectedEnd { .. } => "unexpected end of input",
            Self::UnmatchedDelimiter(_) => "unmatched delimiter",
            Self::DanglingQuote => "dangling quote",
            Self::MalformedToken { .. } => "malformed token",
            Self::TrailingTokens => "trailing tokens",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::UnexpectedEnd { expected } => *expected,
            Self::UnmatchedDelimiter(_) => "no matching opener",
            Self::DanglingQuote => "nothing to quote",
            Self::MalformedToken { reason } => *reason,
            Self::TrailingTokens => "here",
        }
    }
}

/// Maps a character range onto byte offsets of `text`.
fn byte_span(text: &str, range: TextRange) -> std::ops::Range<usize> {
    let offset = |chars: u32| {
        text.char_indices().nth(chars as usize).map_or(text.len(), |(byte, _)| byte)
    };
    offset(range.start().into())..offset(range.end().into())
}
