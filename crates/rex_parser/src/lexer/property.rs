// rex_parser/lexer/property - The \p{…} mini-grammar
//
// Classification only: the body is split into key/value and sorted into the
// known shapes. Unknown names parse successfully as `Other` and are left for
// downstream semantic validation.

use rex_ast::atom::classify_property;
use rex_ast::{Atom, AtomKind, Position, Property};

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::source::Source;

/// Lex the body of `\p…` / `\P…`; the letter is consumed, `start` is the
/// backslash. Accepts `\p{body}`, `\p{^body}`, `\p{key=value}` and the
/// one-letter form `\pL`.
pub(crate) fn lex_property(
    src: &mut Source<'_>,
    start: Position,
    negated_letter: bool,
) -> Result<Atom> {
    if src.try_eat('{') {
        let mut inverted = negated_letter;
        if src.try_eat('^') {
            inverted = !inverted;
        }
        let body_start = src.position();
        let body = src.eat_while(|c| c != '}');
        if body.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::EmptyProperty,
                src.next_char_span(),
            ));
        }
        let kind = match body.split_once('=') {
            Some((key, value)) => {
                if value.is_empty() {
                    return Err(ParseError::new(
                        ParseErrorKind::UnknownProperty {
                            key: Some(key.to_string()),
                            value: String::new(),
                        },
                        src.span_from(body_start),
                    ));
                }
                classify_property(Some(key.trim()), value.trim())
            }
            None => classify_property(None, body.trim()),
        };
        src.expect('}')?;
        return Ok(Atom::new(
            AtomKind::Property(Property::new(kind, inverted)),
            src.span_from(start),
        ));
    }

    // \pL single-letter general category.
    match src.peek() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            src.advance();
            let kind = classify_property(None, &letter.to_string());
            Ok(Atom::new(
                AtomKind::Property(Property::new(kind, negated_letter)),
                src.span_from(start),
            ))
        }
        _ => Err(ParseError::new(
            ParseErrorKind::Expected('{'),
            src.next_char_span(),
        )),
    }
}
