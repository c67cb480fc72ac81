// rex_parser/delimiters - Delimited literal recognition
//
// The one place that knows which delimiter forms exist and which syntax
// options each implies. Everything else works on the bare pattern.

use rex_ast::Span;

use crate::context::SyntaxOptions;
use crate::error::{ParseError, ParseErrorKind, Result};

/// A recognized delimiter pair and the syntax it implies. Longer openers
/// are listed first so `#/` wins over `/` and `re'` over `'`.
const DELIMITERS: &[(&str, &str, fn(&str) -> SyntaxOptions)] = &[
    ("#/", "/#", pound_options),
    ("re'", "'", |_| SyntaxOptions::EXPERIMENTAL),
    ("rx'", "'", |_| {
        SyntaxOptions::EXPERIMENTAL.union(SyntaxOptions::NON_SEMANTIC_WHITESPACE)
    }),
    ("/", "/", |_| SyntaxOptions::traditional()),
    ("'", "'", |_| SyntaxOptions::EXPERIMENTAL),
    ("|", "|", |_| {
        SyntaxOptions::EXPERIMENTAL.union(SyntaxOptions::NON_SEMANTIC_WHITESPACE)
    }),
];

/// `#/…/#` is extended when the body spans multiple lines.
fn pound_options(body: &str) -> SyntaxOptions {
    if body.starts_with('\n') {
        SyntaxOptions::EXPERIMENTAL.union(SyntaxOptions::EXTENDED_SYNTAX)
    } else {
        SyntaxOptions::EXPERIMENTAL
    }
}

/// Strip a recognized delimiter pair and return the body with the implied
/// syntax. The closer must end the input.
pub(crate) fn strip_delimiters(input: &str) -> Result<(&str, SyntaxOptions)> {
    for (opener, closer, options) in DELIMITERS {
        let Some(body_and_closer) = input.strip_prefix(opener) else {
            continue;
        };
        let Some(body) = body_and_closer.strip_suffix(closer) else {
            return Err(ParseError::new(
                ParseErrorKind::UnknownDelimiter,
                Span::from_offsets(0, input.len() as u32),
            ));
        };
        return Ok((body, options(body)));
    }
    Err(ParseError::new(
        ParseErrorKind::UnknownDelimiter,
        Span::from_offsets(0, input.chars().next().map_or(0, |c| c.len_utf8()) as u32),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_form() {
        let (body, options) = strip_delimiters("/a+b/").unwrap();
        assert_eq!(body, "a+b");
        assert_eq!(options, SyntaxOptions::traditional());
    }

    #[test]
    fn experimental_forms() {
        let (body, options) = strip_delimiters("re'a'").unwrap();
        assert_eq!(body, "a");
        assert_eq!(options, SyntaxOptions::EXPERIMENTAL);

        let (_, options) = strip_delimiters("rx'a b'").unwrap();
        assert!(options.ignores_whitespace());

        let (_, options) = strip_delimiters("|a b|").unwrap();
        assert!(options.ignores_whitespace());
    }

    #[test]
    fn pound_forms() {
        let (body, options) = strip_delimiters("#/abc/#").unwrap();
        assert_eq!(body, "abc");
        assert!(!options.ignores_whitespace());

        let (_, options) = strip_delimiters("#/\na b c\n/#").unwrap();
        assert!(options.ignores_whitespace());
        assert!(options.hash_comments());
    }

    #[test]
    fn unknown_delimiters() {
        for input in ["abc", "", "%a%", "/never-closed"] {
            let err = strip_delimiters(input).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::UnknownDelimiter, "{input:?}");
        }
    }
}
