// rex_parser/lexer/class - Custom character class tokens
//
// `-` and `]` change meaning inside a class, and the binary set operators
// exist only there. Everything here is gated on the parser having set
// `in_custom_character_class`.

use rex_ast::{Atom, AtomKind, ClassStart, Located, Property, PropertyKind, SetOp, Span};

use crate::context::ParsingContext;
use crate::error::Result;
use crate::lexer::lex_atom;
use crate::source::Source;

/// `[` or `[^`.
pub(crate) fn lex_custom_cc_start(src: &mut Source<'_>) -> Result<Option<Located<ClassStart>>> {
    let start = src.position();
    if !src.try_eat('[') {
        return Ok(None);
    }
    let kind = if src.try_eat('^') {
        ClassStart::Inverted
    } else {
        ClassStart::Normal
    };
    Ok(Some(Located::new(kind, src.span_from(start))))
}

/// Whether a binary operator is next, without consuming it.
pub(crate) fn peek_custom_cc_binop(src: &Source<'_>, ctx: &ParsingContext) -> bool {
    ctx.in_custom_character_class
        && (src.starts_with("&&") || src.starts_with("--") || src.starts_with("~~"))
}

/// `&&`, `--`, `~~`. Only valid inside a custom character class.
pub(crate) fn lex_custom_cc_binop(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
) -> Result<Option<Located<SetOp>>> {
    if !ctx.in_custom_character_class {
        return Ok(None);
    }
    let start = src.position();
    let op = if src.try_eat_str("&&") {
        SetOp::Intersection
    } else if src.try_eat_str("--") {
        SetOp::Subtraction
    } else if src.try_eat_str("~~") {
        SetOp::SymmetricDifference
    } else {
        return Ok(None);
    };
    Ok(Some(Located::new(op, src.span_from(start))))
}

/// After an atom: `-X` where `X` can end a range. `-` before `]`, an
/// operator, or end of input is a literal and is left unconsumed.
pub(crate) fn lex_custom_cc_range_end(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
) -> Result<Option<(Span, Atom)>> {
    let checkpoint = src.checkpoint();
    let Some(dash) = src.try_eat_located('-') else {
        return Ok(None);
    };
    if src.is_empty() || src.peek() == Some(']') || peek_custom_cc_binop(src, ctx) {
        src.rewind(checkpoint);
        return Ok(None);
    }
    let Some(rhs) = lex_atom(src, ctx)? else {
        src.rewind(checkpoint);
        return Ok(None);
    };
    Ok(Some((dash, rhs)))
}

/// POSIX named class `[:name:]` / `[:^name:]`, valid only inside a custom
/// class. Anything that does not complete the form is left untouched so it
/// can lex as a nested class instead.
pub(crate) fn lex_posix_class(src: &mut Source<'_>) -> Result<Option<Atom>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    if !src.try_eat_str("[:") {
        return Ok(None);
    }
    let inverted = src.try_eat('^');
    let name = src.eat_while(|c| c.is_ascii_alphanumeric());
    if name.is_empty() {
        src.rewind(checkpoint);
        return Ok(None);
    }
    let name = name.to_string();
    if !src.try_eat_str(":]") {
        src.rewind(checkpoint);
        return Ok(None);
    }
    let property = Property::new(PropertyKind::Posix(name), inverted);
    Ok(Some(Atom::new(
        AtomKind::Property(property),
        src.span_from(start),
    )))
}
