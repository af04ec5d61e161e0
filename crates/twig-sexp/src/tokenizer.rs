use text_size::{TextRange, TextSize};
use twig_errors::{ParseError, ParseErrorKind};
use twig_text::PositionedChar;
use twig_tree::Token;

use crate::SexpKind;
use crate::cursor::Cursor;

pub(crate) fn tokenize(chars: &[PositionedChar]) -> Result<Vec<Token<SexpKind>>, ParseError> {
    let mut cursor = Cursor::new(chars);
    let mut tokens = Vec::new();

    while let Some(first) = cursor.advance() {
        let single = TextRange::at(first.position, TextSize::new(1));
        let kind = match first.ch {
            '(' => SexpKind::OpenParen,
            ')' => SexpKind::CloseParen,
            '\'' => SexpKind::Quote,
            ';' => {
                cursor.advance_while(|ch| ch != '\n');
                continue;
            }
            ch if ch.is_whitespace() => {
                cursor.advance_while(char::is_whitespace);
                continue;
            }
            ch if ch.is_control() => {
                return Err(ParseError::new(
                    ParseErrorKind::MalformedToken { reason: "control character" },
                    single,
                ));
            }
            _ => {
                let start = cursor.offset() - 1;
                cursor.advance_while(is_atom_char);
                let atom = cursor.since(start);
                let last = atom[atom.len() - 1];
                let range = TextRange::new(first.position, end_after(last, cursor.peek()));
                tokens.push(Token::new(SexpKind::Atom, PositionedChar::collect_text(atom), range));
                continue;
            }
        };
        let range = TextRange::new(first.position, end_after(first, cursor.peek()));
        tokens.push(Token::new(kind, first.ch.to_string(), range));
    }

    Ok(tokens)
}

/// Exclusive end of a token ending in `last`. A deleted character shares
/// its position with the character after it and takes up no room.
fn end_after(last: PositionedChar, next: Option<PositionedChar>) -> TextSize {
    match next {
        Some(next) if next.position == last.position => last.position,
        _ => last.position + TextSize::new(1),
    }
}

pub(crate) fn is_atom_char(ch: char) -> bool {
    !matches!(ch, '(' | ')' | '\'') && !ch.is_whitespace() && !ch.is_control()
}
