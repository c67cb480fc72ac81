// rex_parser/error - Located parse errors

use rex_ast::Span;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Everything the lexer and parser can reject. Errors are fatal: the first
/// one encountered aborts the parse and no partial AST is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    #[error("expected '{0}'")]
    Expected(char),
    #[error("expected a number")]
    ExpectedNumber,
    #[error("expected a name")]
    ExpectedIdentifier,
    #[error("expected '='")]
    ExpectedEquals,
    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid Unicode scalar value")]
    InvalidUnicodeScalar,
    #[error("number is too large")]
    NumberOverflow,
    #[error("quantifier range is inverted: {0} > {1}")]
    InvalidQuantifierRange(u32, u32),
    #[error("malformed character property '{value}'")]
    UnknownProperty {
        key: Option<String>,
        value: String,
    },
    #[error("empty character property")]
    EmptyProperty,
    #[error("unbalanced ')'")]
    UnbalancedEndOfGroup,
    #[error("expected ')' to close the group")]
    ExpectedGroupCloser,
    #[error("expected ')' to close the conditional")]
    ExpectedConditionalCloser,
    #[error("unknown group kind '(?{0}'")]
    UnknownGroupKind(String),
    #[error("unknown conditional condition")]
    UnknownConditionalStart,
    #[error("unknown pattern delimiter")]
    UnknownDelimiter,
    #[error("this operand cannot be quantified")]
    NotQuantifiable,
    #[error("conditional has {0} branches, at most 2 are allowed")]
    TooManyBranchesInConditional(usize),
    #[error("absent expression has {0} children, at most 2 are allowed")]
    TooManyAbsentExpressionChildren(usize),
    #[error("expected character class members")]
    ExpectedCustomCharacterClassMembers,
    #[error("character class range operands must be single characters")]
    InvalidCharacterClassRangeOperand,
}

/// An error kind paired with the span it was raised at.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at {}..{}", .span.start.offset(), .span.end.offset())]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}
