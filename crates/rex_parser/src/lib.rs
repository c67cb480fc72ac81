// rex_parser - Regex front end: context-sensitive lexer + recursive-descent
// parser producing lossless, source-located `rex_ast` trees.
//
// The parser recognizes a superset of PCRE, Oniguruma, ICU, and ECMAScript
// syntax. It never matches anything: the output is the syntactic structure
// with spans, and semantic questions (group resolution, property validity)
// are left to consumers.
//
// ```
// use rex_parser::{parse, SyntaxOptions};
//
// let ast = parse("a|b|c", SyntaxOptions::traditional()).unwrap();
// assert_eq!(ast.dump(), "alternation(a,b,c)");
// ```

pub mod context;
pub mod error;
pub mod source;

mod delimiters;
mod lexer;
mod parser;

pub use context::{ParsingContext, SyntaxOptions};
pub use error::{ParseError, ParseErrorKind, Result};
pub use source::{Checkpoint, Source};

use rex_ast::Node;

/// Parse a pattern under the given syntax options. Returns the AST or the
/// first located error; no partial trees.
pub fn parse(pattern: &str, syntax: SyntaxOptions) -> Result<Node> {
    parser::Parser::new(pattern, syntax).parse_complete()
}

/// Strip a recognized delimiter pair (`/…/`, `re'…'`, `#/…/#`, …), infer
/// the syntax options from the delimiter form, and parse the body. Spans in
/// the returned AST are relative to the body, not the delimited input.
pub fn parse_with_delimiters(input: &str) -> Result<Node> {
    let (body, syntax) = delimiters::strip_delimiters(input)?;
    parse(body, syntax)
}
