use text_size::{TextRange, TextSize};
use twig_errors::{ParseError, ParseErrorKind};
use twig_tree::{Builder, NodeKind, Subtree, Token};

use crate::SexpKind;

pub(crate) fn parse(
    tokens: &[Token<SexpKind>],
) -> Result<(Subtree, &[Token<SexpKind>]), ParseError> {
    let mut parser = Parser::new(tokens);
    parser.form()?;
    let Parser { tokens, pos, builder } = parser;
    Ok((builder.finish(), &tokens[pos..]))
}

struct Parser<'t> {
    tokens: &'t [Token<SexpKind>],
    pos: usize,
    builder: Builder,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token<SexpKind>]) -> Self {
        Self { tokens, pos: 0, builder: Builder::new() }
    }

    fn peek(&self) -> Option<&'t Token<SexpKind>> {
        self.tokens.get(self.pos)
    }

    fn at(&self, kind: SexpKind) -> bool {
        self.peek().is_some_and(|token| token.kind == kind)
    }

    fn advance(&mut self) -> &'t Token<SexpKind> {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    /// End of the last consumed token.
    fn last_end(&self) -> TextSize {
        self.pos.checked_sub(1).map_or(TextSize::new(0), |last| self.tokens[last].range.end())
    }

    fn unexpected_end(&self, expected: &'static str) -> ParseError {
        let end = self.tokens.last().map_or(TextSize::new(0), |token| token.range.end());
        ParseError::new(ParseErrorKind::UnexpectedEnd { expected }, TextRange::empty(end))
    }

    /// form := ATOM | QUOTE form | OPEN_PAREN form* CLOSE_PAREN
    fn form(&mut self) -> Result<(), ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected_end("a form"));
        };

        match token.kind {
            SexpKind::Atom => {
                self.advance();
                self.builder.leaf(NodeKind::Atom(token.content.clone()), token.range);
            }
            SexpKind::Quote => {
                self.advance();
                if self.peek().is_none() || self.at(SexpKind::CloseParen) {
                    return Err(ParseError::new(ParseErrorKind::DanglingQuote, token.range));
                }
                self.builder.start_node(NodeKind::Quote, token.range.start());
                self.form()?;
                let end = self.last_end();
                self.builder.finish_node(end);
            }
            SexpKind::OpenParen => {
                self.advance();
                self.builder.start_node(NodeKind::List, token.range.start());
                while !self.at(SexpKind::CloseParen) {
                    if self.peek().is_none() {
                        return Err(self.unexpected_end("`)`"));
                    }
                    self.form()?;
                }
                let close = self.advance();
                self.builder.finish_node(close.range.end());
            }
            SexpKind::CloseParen => {
                return Err(ParseError::new(ParseErrorKind::UnmatchedDelimiter(')'), token.range));
            }
        }

        Ok(())
    }
}
