//! S-expressions: atoms, parenthesized lists and quote-prefixed forms.
//!
//! Whitespace and `;` line comments are dropped by the tokenizer.

mod cursor;
mod parser;
mod tokenizer;

use twig_errors::ParseError;
use twig_text::PositionedChar;
use twig_tree::{Grammar, Subtree, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SexpKind {
    OpenParen,
    CloseParen,
    Quote,
    Atom,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sexp;

impl Grammar for Sexp {
    type TokenKind = SexpKind;

    fn tokenize(&self, chars: &[PositionedChar]) -> Result<Vec<Token<SexpKind>>, ParseError> {
        tokenizer::tokenize(chars)
    }

    fn parse<'t>(
        &self,
        tokens: &'t [Token<SexpKind>],
    ) -> Result<(Subtree, &'t [Token<SexpKind>]), ParseError> {
        parser::parse(tokens)
    }

    fn joins(&self, left: char, right: char) -> bool {
        tokenizer::is_atom_char(left) && tokenizer::is_atom_char(right)
    }
}
