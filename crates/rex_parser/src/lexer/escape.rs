// rex_parser/lexer/escape - Backslash escapes
//
// The messiest corner of the grammar: the same digits can be a
// back-reference or an octal scalar depending on how many capturing groups
// have been opened, and `\g`/`\k` fan out into the whole reference family.

use rex_ast::{
    Atom, AtomKind, EscapedKind, Located, Position, Reference, ReferenceKind, Span,
};

use crate::context::ParsingContext;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::lexer::{lex_number, lex_word, property};
use crate::source::Source;

/// Lex the atom following a consumed `\`. `start` is the backslash.
pub(crate) fn lex_escaped_atom(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
    start: Position,
) -> Result<Atom> {
    let Some(c) = src.peek() else {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            src.here(),
        ));
    };
    match c {
        '0'..='9' => lex_numeric_escape(src, ctx, start),
        'x' => {
            src.advance();
            lex_hex_escape(src, start)
        }
        'u' => {
            src.advance();
            lex_universal_escape(src, start)
        }
        'U' => {
            src.advance();
            lex_fixed_hex_value(src, start, 8)
        }
        'o' => {
            src.advance();
            lex_braced_octal(src, start)
        }
        'N' => {
            src.advance();
            lex_named_character(src, ctx, start)
        }
        'p' | 'P' => {
            src.advance();
            property::lex_property(src, start, c == 'P')
        }
        'c' => {
            src.advance();
            let control = src.expect_non_empty()?;
            Ok(Atom::new(
                AtomKind::KeyboardControl(control),
                src.span_from(start),
            ))
        }
        'M' => {
            src.advance();
            lex_meta(src, start)
        }
        'k' if !ctx.in_custom_character_class => {
            src.advance();
            lex_k_reference(src, start)
        }
        'g' if !ctx.in_custom_character_class => {
            src.advance();
            lex_g_reference(src, start)
        }
        _ => {
            if let Some(kind) = EscapedKind::from_letter(c, ctx.in_custom_character_class) {
                src.advance();
                return Ok(Atom::new(AtomKind::Escaped(kind), src.span_from(start)));
            }
            src.advance();
            if c.is_ascii_alphanumeric() {
                Err(ParseError::new(
                    ParseErrorKind::InvalidEscape(c),
                    src.span_from(start),
                ))
            } else {
                // Escaped punctuation (and any non-ASCII char) is a literal.
                Ok(Atom::new(AtomKind::Char(c), src.span_from(start)))
            }
        }
    }
}

fn scalar_atom(value: u32, span: Span) -> Result<Atom> {
    let scalar = char::from_u32(value)
        .ok_or_else(|| ParseError::new(ParseErrorKind::InvalidUnicodeScalar, span))?;
    Ok(Atom::new(AtomKind::Scalar(scalar), span))
}

/// `\0dd`, `\ddd`, and the back-reference/octal ambiguity: `\n` with
/// `n <= prior_group_count` is a back-reference; otherwise up to three
/// octal digits form a scalar; otherwise the escape is invalid. Inside a
/// custom class there are no back-references, only octal.
fn lex_numeric_escape(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
    start: Position,
) -> Result<Atom> {
    let digits_start = src.checkpoint();
    let first = src.peek().expect("caller saw a digit");

    if first == '0' {
        return lex_octal_digits(src, start, 3);
    }

    if !ctx.in_custom_character_class {
        match lex_number(src) {
            Ok(Some(number)) if number.value <= ctx.prior_group_count => {
                let reference = Reference::new(ReferenceKind::Absolute(number.value), number.span);
                return Ok(Atom::new(
                    AtomKind::Backreference(reference),
                    src.span_from(start),
                ));
            }
            // A huge digit run cannot be a back-reference; fall through to
            // the octal reading when the leading digit allows it.
            Ok(Some(_)) | Err(_) => src.rewind(digits_start),
            Ok(None) => unreachable!("caller saw a digit"),
        }
    }

    if ('1'..='7').contains(&first) {
        return lex_octal_digits(src, start, 3);
    }
    src.advance();
    Err(ParseError::new(
        ParseErrorKind::InvalidEscape(first),
        src.span_from(start),
    ))
}

fn lex_octal_digits(src: &mut Source<'_>, start: Position, max: usize) -> Result<Atom> {
    let mut value = 0u32;
    let mut count = 0;
    while count < max {
        let Some(digit) = src.peek().and_then(|c| c.to_digit(8)) else {
            break;
        };
        src.advance();
        value = value * 8 + digit;
        count += 1;
    }
    scalar_atom(value, src.span_from(start))
}

/// `\x{h…}` or `\xhh` with zero to two digits (PCRE reads bare `\x` as NUL).
fn lex_hex_escape(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    if src.try_eat('{') {
        let value = lex_braced_hex_digits(src)?;
        src.expect('}')?;
        return scalar_atom(value, src.span_from(start));
    }
    let mut value = 0u32;
    for _ in 0..2 {
        let Some(digit) = src.peek().and_then(|c| c.to_digit(16)) else {
            break;
        };
        src.advance();
        value = value * 16 + digit;
    }
    scalar_atom(value, src.span_from(start))
}

/// `\u{h…}` (ICU / ECMAScript) or `\uhhhh` with exactly four digits.
fn lex_universal_escape(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    if src.try_eat('{') {
        let value = lex_braced_hex_digits(src)?;
        src.expect('}')?;
        return scalar_atom(value, src.span_from(start));
    }
    lex_fixed_hex_value(src, start, 4)
}

fn lex_fixed_hex_value(src: &mut Source<'_>, start: Position, digits: usize) -> Result<Atom> {
    let mut value = 0u32;
    for _ in 0..digits {
        let Some(digit) = src.peek().and_then(|c| c.to_digit(16)) else {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedNumber,
                src.next_char_span(),
            ));
        };
        src.advance();
        value = value * 16 + digit;
    }
    scalar_atom(value, src.span_from(start))
}

fn lex_braced_hex_digits(src: &mut Source<'_>) -> Result<u32> {
    let digits_start = src.position();
    let digits = src.eat_while(|c| c.is_ascii_hexdigit());
    if digits.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedNumber,
            src.next_char_span(),
        ));
    }
    u32::from_str_radix(digits, 16)
        .map_err(|_| ParseError::new(ParseErrorKind::NumberOverflow, src.span_from(digits_start)))
}

/// `\o{ooo}`.
fn lex_braced_octal(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    src.expect('{')?;
    let digits_start = src.position();
    let digits = src.eat_while(|c| c.is_digit(8));
    if digits.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedNumber,
            src.next_char_span(),
        ));
    }
    let value = u32::from_str_radix(digits, 8)
        .map_err(|_| ParseError::new(ParseErrorKind::NumberOverflow, src.span_from(digits_start)))?;
    src.expect('}')?;
    scalar_atom(value, src.span_from(start))
}

/// `\N{NAME}`, `\N{U+HEX}`, or bare `\N` (not-a-newline; pattern only).
fn lex_named_character(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
    start: Position,
) -> Result<Atom> {
    if src.try_eat('{') {
        if src.try_eat_str("U+") {
            let value = lex_braced_hex_digits(src)?;
            src.expect('}')?;
            return scalar_atom(value, src.span_from(start));
        }
        let name = src.eat_while(|c| c != '}');
        if name.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                src.next_char_span(),
            ));
        }
        let name = name.to_string();
        src.expect('}')?;
        return Ok(Atom::new(
            AtomKind::NamedCharacter(name),
            src.span_from(start),
        ));
    }
    if ctx.in_custom_character_class {
        return Err(ParseError::new(
            ParseErrorKind::InvalidEscape('N'),
            src.span_from(start),
        ));
    }
    Ok(Atom::new(
        AtomKind::Escaped(EscapedKind::NotNewline),
        src.span_from(start),
    ))
}

/// `\M-x` and `\M-\C-x` (Oniguruma meta / meta-control).
fn lex_meta(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    src.expect('-')?;
    if src.try_eat_str("\\C-") {
        let c = src.expect_non_empty()?;
        return Ok(Atom::new(
            AtomKind::KeyboardMetaControl(c),
            src.span_from(start),
        ));
    }
    let c = src.expect_non_empty()?;
    Ok(Atom::new(AtomKind::KeyboardMeta(c), src.span_from(start)))
}

/// `\k<…>`, `\k'…'`, `\k{…}`: always a back-reference.
fn lex_k_reference(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    let closer = match src.peek() {
        Some('<') => '>',
        Some('\'') => '\'',
        Some('{') => '}',
        _ => {
            return Err(ParseError::new(
                ParseErrorKind::InvalidEscape('k'),
                src.span_from(start),
            ))
        }
    };
    src.advance();
    let reference = lex_reference_body(src, closer)?;
    Ok(Atom::new(
        AtomKind::Backreference(reference),
        src.span_from(start),
    ))
}

/// `\g` family: braces and bare numbers are back-references, `\g<…>` and
/// `\g'…'` are subpattern calls.
fn lex_g_reference(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    match src.peek() {
        Some('{') => {
            src.advance();
            let reference = lex_reference_body(src, '}')?;
            Ok(Atom::new(
                AtomKind::Backreference(reference),
                src.span_from(start),
            ))
        }
        Some('<') => {
            src.advance();
            let reference = lex_reference_body(src, '>')?;
            Ok(Atom::new(
                AtomKind::Subpattern(reference),
                src.span_from(start),
            ))
        }
        Some('\'') => {
            src.advance();
            let reference = lex_reference_body(src, '\'')?;
            Ok(Atom::new(
                AtomKind::Subpattern(reference),
                src.span_from(start),
            ))
        }
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {
            let body_start = src.position();
            let kind = lex_signed_number_kind(src)?;
            let reference = Reference::new(kind, src.span_from(body_start));
            Ok(Atom::new(
                AtomKind::Backreference(reference),
                src.span_from(start),
            ))
        }
        _ => Err(ParseError::new(
            ParseErrorKind::InvalidEscape('g'),
            src.span_from(start),
        )),
    }
}

/// The interior of a delimited reference: a signed or plain number, or a
/// name, optionally followed by an Oniguruma recursion level (`+n` / `-n`).
pub(crate) fn lex_reference_body(src: &mut Source<'_>, closer: char) -> Result<Reference> {
    let inner_start = src.position();
    let kind = match src.peek() {
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => lex_signed_number_kind(src)?,
        _ => {
            let name = lex_word(src);
            if name.is_empty() {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedIdentifier,
                    src.next_char_span(),
                ));
            }
            ReferenceKind::Named(name.to_string())
        }
    };
    let mut reference = Reference::new(kind, src.span_from(inner_start));
    if let Some(level) = lex_recursion_level(src)? {
        reference = reference.with_recursion_level(level);
        reference.inner_span = src.span_from(inner_start);
    }
    src.expect(closer)?;
    Ok(reference)
}

fn lex_recursion_level(src: &mut Source<'_>) -> Result<Option<Located<i32>>> {
    let negative = match src.peek() {
        Some('+') => false,
        Some('-') => true,
        _ => return Ok(None),
    };
    if !src.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
        return Ok(None);
    }
    let start = src.position();
    src.advance();
    let number = lex_number(src)?.expect("digit peeked");
    let magnitude = i32::try_from(number.value)
        .map_err(|_| ParseError::new(ParseErrorKind::NumberOverflow, number.span))?;
    let value = if negative { -magnitude } else { magnitude };
    Ok(Some(Located::new(value, src.span_from(start))))
}

fn lex_signed_number_kind(src: &mut Source<'_>) -> Result<ReferenceKind> {
    let sign = if src.try_eat('+') {
        Some(1i32)
    } else if src.try_eat('-') {
        Some(-1i32)
    } else {
        None
    };
    let number = lex_number(src)?.ok_or_else(|| {
        ParseError::new(ParseErrorKind::ExpectedNumber, src.next_char_span())
    })?;
    match sign {
        None => Ok(ReferenceKind::Absolute(number.value)),
        Some(sign) => {
            if number.value == 0 {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedNumber,
                    number.span,
                ));
            }
            let magnitude = i32::try_from(number.value)
                .map_err(|_| ParseError::new(ParseErrorKind::NumberOverflow, number.span))?;
            Ok(ReferenceKind::Relative(sign * magnitude))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SyntaxOptions;
    use crate::lexer::lex_atom;

    fn ctx_with_groups(prior: u32) -> ParsingContext {
        let mut ctx = ParsingContext::new(SyntaxOptions::traditional());
        ctx.prior_group_count = prior;
        ctx
    }

    fn lex_one(input: &str, ctx: &ParsingContext) -> Result<Atom> {
        let mut src = Source::new(input);
        let atom = lex_atom(&mut src, ctx)?.expect("atom");
        Ok(atom)
    }

    #[test]
    fn simple_escapes() {
        let ctx = ctx_with_groups(0);
        assert_eq!(
            lex_one(r"\n", &ctx).unwrap().kind,
            AtomKind::Escaped(EscapedKind::Newline)
        );
        assert_eq!(
            lex_one(r"\A", &ctx).unwrap().kind,
            AtomKind::Escaped(EscapedKind::StartOfSubject)
        );
        assert_eq!(lex_one(r"\.", &ctx).unwrap().kind, AtomKind::Char('.'));
    }

    #[test]
    fn invalid_escape_letters() {
        let ctx = ctx_with_groups(0);
        let err = lex_one(r"\i", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape('i'));
        let err = lex_one(r"\E", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape('E'));
    }

    #[test]
    fn backreference_versus_octal() {
        // With two prior groups \2 refers back, \3 is octal.
        let ctx = ctx_with_groups(2);
        match lex_one(r"\2", &ctx).unwrap().kind {
            AtomKind::Backreference(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Absolute(2))
            }
            other => panic!("expected backreference, got {other:?}"),
        }
        assert_eq!(lex_one(r"\3", &ctx).unwrap().kind, AtomKind::Scalar('\u{3}'));

        // Three octal digits max: \1234 is \123 then literal 4.
        let mut src = Source::new(r"\1234");
        let atom = lex_atom(&mut src, &ctx).unwrap().unwrap();
        assert_eq!(atom.kind, AtomKind::Scalar('\u{53}'));
        assert_eq!(src.rest(), "4");

        // \8 can be neither octal nor a reference here.
        let err = lex_one(r"\8", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape('8'));
    }

    #[test]
    fn leading_zero_is_always_octal() {
        let ctx = ctx_with_groups(9);
        assert_eq!(
            lex_one(r"\012", &ctx).unwrap().kind,
            AtomKind::Scalar('\n')
        );
    }

    #[test]
    fn class_context_skips_backreferences() {
        let mut ctx = ctx_with_groups(3);
        ctx.in_custom_character_class = true;
        assert_eq!(lex_one(r"\2", &ctx).unwrap().kind, AtomKind::Scalar('\u{2}'));
    }

    #[test]
    fn hex_and_unicode_scalars() {
        let ctx = ctx_with_groups(0);
        assert_eq!(lex_one(r"\x41", &ctx).unwrap().kind, AtomKind::Scalar('A'));
        assert_eq!(lex_one(r"\x", &ctx).unwrap().kind, AtomKind::Scalar('\u{0}'));
        assert_eq!(
            lex_one(r"\x{1F600}", &ctx).unwrap().kind,
            AtomKind::Scalar('\u{1F600}')
        );
        assert_eq!(
            lex_one(r"\u{2603}", &ctx).unwrap().kind,
            AtomKind::Scalar('\u{2603}')
        );
        assert_eq!(
            lex_one(r"\U00000041", &ctx).unwrap().kind,
            AtomKind::Scalar('A')
        );
        assert_eq!(
            lex_one(r"\o{101}", &ctx).unwrap().kind,
            AtomKind::Scalar('A')
        );
    }

    #[test]
    fn scalar_errors() {
        let ctx = ctx_with_groups(0);
        let err = lex_one(r"\x{D800}", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidUnicodeScalar);
        let err = lex_one(r"\u12", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedNumber);
        let err = lex_one(r"\x{}", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedNumber);
    }

    #[test]
    fn named_characters() {
        let ctx = ctx_with_groups(0);
        assert_eq!(
            lex_one(r"\N{LATIN SMALL LETTER A}", &ctx).unwrap().kind,
            AtomKind::NamedCharacter("LATIN SMALL LETTER A".to_string())
        );
        assert_eq!(
            lex_one(r"\N{U+2603}", &ctx).unwrap().kind,
            AtomKind::Scalar('\u{2603}')
        );
        assert_eq!(
            lex_one(r"\N", &ctx).unwrap().kind,
            AtomKind::Escaped(EscapedKind::NotNewline)
        );
    }

    #[test]
    fn keyboard_escapes() {
        let ctx = ctx_with_groups(0);
        assert_eq!(
            lex_one(r"\cA", &ctx).unwrap().kind,
            AtomKind::KeyboardControl('A')
        );
        assert_eq!(
            lex_one(r"\M-a", &ctx).unwrap().kind,
            AtomKind::KeyboardMeta('a')
        );
        assert_eq!(
            lex_one(r"\M-\C-a", &ctx).unwrap().kind,
            AtomKind::KeyboardMetaControl('a')
        );
    }

    #[test]
    fn reference_family() {
        let ctx = ctx_with_groups(0);
        match lex_one(r"\k<name>", &ctx).unwrap().kind {
            AtomKind::Backreference(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Named("name".to_string()));
                assert_eq!(reference.recursion_level, None);
            }
            other => panic!("{other:?}"),
        }
        match lex_one(r"\k<name+2>", &ctx).unwrap().kind {
            AtomKind::Backreference(reference) => {
                assert_eq!(reference.recursion_level.unwrap().value, 2);
            }
            other => panic!("{other:?}"),
        }
        match lex_one(r"\g{-1}", &ctx).unwrap().kind {
            AtomKind::Backreference(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Relative(-1))
            }
            other => panic!("{other:?}"),
        }
        match lex_one(r"\g2", &ctx).unwrap().kind {
            AtomKind::Backreference(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Absolute(2))
            }
            other => panic!("{other:?}"),
        }
        match lex_one(r"\g<sub>", &ctx).unwrap().kind {
            AtomKind::Subpattern(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Named("sub".to_string()))
            }
            other => panic!("{other:?}"),
        }
        match lex_one(r"\g'+2'", &ctx).unwrap().kind {
            AtomKind::Subpattern(reference) => {
                assert_eq!(reference.kind, ReferenceKind::Relative(2))
            }
            other => panic!("{other:?}"),
        }
        let err = lex_one(r"\k<>", &ctx).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedIdentifier);
    }
}
