// rex_parser/lexer/quantifier - `*` `+` `?` `{n,m}` and their modifiers

use rex_ast::{Located, QuantAmount, QuantKind};

use crate::error::{ParseError, ParseErrorKind, Result};
use crate::lexer::lex_number;
use crate::source::Source;

/// Lex a quantifier with its kind modifier. A `{` that does not form a
/// valid bound restores the cursor and returns `None`: it is a literal.
pub(crate) fn lex_quantifier(
    src: &mut Source<'_>,
) -> Result<Option<(Located<QuantAmount>, Located<QuantKind>)>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    let amount = match src.peek() {
        Some('*') => {
            src.advance();
            QuantAmount::ZeroOrMore
        }
        Some('+') => {
            src.advance();
            QuantAmount::OneOrMore
        }
        Some('?') => {
            src.advance();
            QuantAmount::ZeroOrOne
        }
        Some('{') => match lex_braced_amount(src)? {
            Some(amount) => amount,
            None => {
                src.rewind(checkpoint);
                return Ok(None);
            }
        },
        _ => return Ok(None),
    };
    let amount = Located::new(amount, src.span_from(start));

    let kind_start = src.position();
    let kind = if src.try_eat('?') {
        QuantKind::Reluctant
    } else if src.try_eat('+') {
        QuantKind::Possessive
    } else {
        QuantKind::Eager
    };
    let kind = Located::new(kind, src.span_from(kind_start));
    Ok(Some((amount, kind)))
}

/// The `{…}` forms: `{n}`, `{n,}`, `{,n}`, `{n,m}`. Returns `None` (caller
/// rewinds) when the braces do not spell a quantifier at all; an inverted
/// range is a hard error.
fn lex_braced_amount(src: &mut Source<'_>) -> Result<Option<QuantAmount>> {
    let open = src.position();
    src.advance();
    let lo = lex_number(src)?;
    if src.try_eat(',') {
        let hi = lex_number(src)?;
        if !src.try_eat('}') {
            return Ok(None);
        }
        match (lo, hi) {
            (Some(lo), Some(hi)) => {
                if lo.value > hi.value {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidQuantifierRange(lo.value, hi.value),
                        src.span_from(open),
                    ));
                }
                Ok(Some(QuantAmount::Range {
                    lo: lo.value,
                    hi: hi.value,
                }))
            }
            (Some(lo), None) => Ok(Some(QuantAmount::NOrMore(lo.value))),
            (None, Some(hi)) => Ok(Some(QuantAmount::UpToN(hi.value))),
            (None, None) => Ok(None),
        }
    } else {
        match lo {
            Some(lo) if src.try_eat('}') => Ok(Some(QuantAmount::Exactly(lo.value))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> Result<Option<(QuantAmount, QuantKind)>> {
        let mut src = Source::new(input);
        Ok(lex_quantifier(&mut src)?.map(|(amount, kind)| (amount.value, kind.value)))
    }

    #[test]
    fn simple_amounts() {
        assert_eq!(
            lex("*").unwrap(),
            Some((QuantAmount::ZeroOrMore, QuantKind::Eager))
        );
        assert_eq!(
            lex("+?").unwrap(),
            Some((QuantAmount::OneOrMore, QuantKind::Reluctant))
        );
        assert_eq!(
            lex("?+").unwrap(),
            Some((QuantAmount::ZeroOrOne, QuantKind::Possessive))
        );
    }

    #[test]
    fn braced_amounts() {
        assert_eq!(
            lex("{3}").unwrap(),
            Some((QuantAmount::Exactly(3), QuantKind::Eager))
        );
        assert_eq!(
            lex("{2,}").unwrap(),
            Some((QuantAmount::NOrMore(2), QuantKind::Eager))
        );
        assert_eq!(
            lex("{,4}").unwrap(),
            Some((QuantAmount::UpToN(4), QuantKind::Eager))
        );
        assert_eq!(
            lex("{2,4}?").unwrap(),
            Some((QuantAmount::Range { lo: 2, hi: 4 }, QuantKind::Reluctant))
        );
    }

    #[test]
    fn literal_braces_do_not_consume() {
        for input in ["{", "{a}", "{1", "{1,2", "{,}", "{}"] {
            let mut src = Source::new(input);
            assert_eq!(lex_quantifier(&mut src).unwrap(), None, "input {input:?}");
            assert_eq!(src.position().offset(), 0, "must rewind on {input:?}");
        }
    }

    #[test]
    fn inverted_range_is_an_error() {
        let mut src = Source::new("{5,2}");
        let err = lex_quantifier(&mut src).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidQuantifierRange(5, 2));
    }
}
