// rex_ast/class - Custom character class model

use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::{Located, Span};

/// A `[…]` construct: members, ranges, nested classes, and set operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomClass {
    pub start: Located<ClassStart>,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

impl CustomClass {
    pub fn is_inverted(&self) -> bool {
        self.start.value == ClassStart::Inverted
    }
}

/// `[` or `[^`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassStart {
    Normal,
    Inverted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassMember {
    Atom(Atom),
    Range(ClassRange),
    /// `\Q…\E` inside a class.
    Quote { literal: String, span: Span },
    /// Extended-mode whitespace inside a class.
    Trivia { contents: String, span: Span },
    Nested(CustomClass),
    /// `lhs && rhs` and friends; built left-associatively, so the `lhs` of a
    /// chained operation is a single previous `SetOperation` member.
    SetOperation {
        lhs: Vec<ClassMember>,
        op: Located<SetOp>,
        rhs: Vec<ClassMember>,
    },
}

impl ClassMember {
    pub fn is_trivia(&self) -> bool {
        matches!(self, ClassMember::Trivia { .. })
    }
}

/// `a-z`. Both endpoints are required to denote a single literal character;
/// the parser rejects classes and multi-character escapes as operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRange {
    pub lhs: Atom,
    pub dash: Span,
    pub rhs: Atom,
}

/// In-class binary set operator. All are left-associative and only
/// recognized inside a custom character class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOp {
    /// `&&`
    Intersection,
    /// `--`
    Subtraction,
    /// `~~`
    SymmetricDifference,
}

impl SetOp {
    pub fn spelling(self) -> &'static str {
        match self {
            SetOp::Intersection => "&&",
            SetOp::Subtraction => "--",
            SetOp::SymmetricDifference => "~~",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SetOp::Intersection => "intersection",
            SetOp::Subtraction => "subtraction",
            SetOp::SymmetricDifference => "symmetricDifference",
        }
    }
}
