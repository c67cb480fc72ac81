// rex_parser/lexer - Context-sensitive scanners
//
// The lexer does not pre-tokenize: the parser calls each scanner on demand.
// Every scanner follows one discipline: on failure the cursor is restored to
// where it was, on success exactly the matched text has been consumed.

pub(crate) mod class;
pub(crate) mod escape;
pub(crate) mod group;
pub(crate) mod property;
pub(crate) mod quantifier;
pub(crate) mod trivia;

use rex_ast::{Atom, AtomKind, Located};

use crate::context::ParsingContext;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::source::Source;

/// Lex a single atom, or `None` when the next char belongs to an enclosing
/// construct (`|`, `)`, a group or class opener, or a quantifier head).
/// Inside a custom character class the specials lose their meaning and only
/// `]` terminates.
pub(crate) fn lex_atom(src: &mut Source<'_>, ctx: &ParsingContext) -> Result<Option<Atom>> {
    let start = src.position();
    let Some(c) = src.peek() else {
        return Ok(None);
    };
    if ctx.in_custom_character_class {
        if c == ']' {
            return Ok(None);
        }
    } else if matches!(c, '|' | ')' | '(' | '[' | '*' | '+' | '?') {
        return Ok(None);
    }
    src.advance();
    let kind = match c {
        '\\' => return escape::lex_escaped_atom(src, ctx, start).map(Some),
        '.' if !ctx.in_custom_character_class => AtomKind::Dot,
        '^' if !ctx.in_custom_character_class => AtomKind::Caret,
        '$' if !ctx.in_custom_character_class => AtomKind::Dollar,
        other => AtomKind::Char(other),
    };
    Ok(Some(Atom::new(kind, src.span_from(start))))
}

/// Lex a run of decimal digits into a `u32`. `None` when no digit is
/// present; overflow is an error rather than silent wrapping.
pub(crate) fn lex_number(src: &mut Source<'_>) -> Result<Option<Located<u32>>> {
    let start = src.position();
    let digits = src.eat_while(|c| c.is_ascii_digit());
    if digits.is_empty() {
        return Ok(None);
    }
    let span = src.span_from(start);
    let value = digits
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::NumberOverflow, span))?;
    Ok(Some(Located::new(value, span)))
}

/// Group and reference names: `\w` word characters.
pub(crate) fn lex_word<'src>(src: &mut Source<'src>) -> &'src str {
    src.eat_while(is_word_char)
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
