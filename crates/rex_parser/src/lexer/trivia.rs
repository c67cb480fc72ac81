// rex_parser/lexer/trivia - Comments and non-semantic whitespace

use rex_ast::Span;

use crate::context::ParsingContext;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::source::Source;

/// Lex one piece of trivia: a `(?#…)` comment, a `#…` line comment under
/// extended syntax, or a whitespace run when whitespace is non-semantic.
/// Inside a custom character class only whitespace applies.
pub(crate) fn lex_trivia(
    src: &mut Source<'_>,
    ctx: &ParsingContext,
) -> Result<Option<(String, Span)>> {
    if !ctx.in_custom_character_class {
        if let Some(comment) = lex_comment(src)? {
            return Ok(Some(comment));
        }
        if ctx.syntax.hash_comments() && src.peek() == Some('#') {
            let start = src.position();
            let contents = src.eat_while(|c| c != '\n').to_string();
            return Ok(Some((contents, src.span_from(start))));
        }
    }
    if ctx.syntax.ignores_whitespace() {
        let start = src.position();
        let whitespace = src.eat_while(is_pattern_whitespace);
        if !whitespace.is_empty() {
            return Ok(Some((whitespace.to_string(), src.span_from(start))));
        }
    }
    Ok(None)
}

/// `(?#…)`: recognized in every syntax mode.
pub(crate) fn lex_comment(src: &mut Source<'_>) -> Result<Option<(String, Span)>> {
    let start = src.position();
    if !src.try_eat_str("(?#") {
        return Ok(None);
    }
    src.eat_while(|c| c != ')');
    if !src.try_eat(')') {
        return Err(ParseError::new(
            ParseErrorKind::Expected(')'),
            src.next_char_span(),
        ));
    }
    let span = src.span_from(start);
    Ok(Some((src.slice(span).to_string(), span)))
}

/// `\Q…\E` (the quote may run to end of input) and Oniguruma `\q{…}`.
pub(crate) fn lex_quote(src: &mut Source<'_>) -> Result<Option<(String, Span)>> {
    let start = src.position();
    if src.try_eat_str("\\Q") {
        let mut literal = String::new();
        loop {
            if src.is_empty() || src.try_eat_str("\\E") {
                break;
            }
            literal.push(src.advance().expect("not at end"));
        }
        return Ok(Some((literal, src.span_from(start))));
    }
    if src.try_eat_str("\\q") {
        src.expect('{')?;
        let literal = src.eat_while(|c| c != '}').to_string();
        src.expect('}')?;
        return Ok(Some((literal, src.span_from(start))));
    }
    Ok(None)
}

fn is_pattern_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{b}' | '\u{c}')
}
