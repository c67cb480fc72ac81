// rex_ast/node - The top-level AST sum type

use serde::{Deserialize, Serialize};

use crate::atom::{Atom, Reference};
use crate::class::CustomClass;
use crate::group::GroupKind;
use crate::quant::{QuantAmount, QuantKind};
use crate::{Located, Span};

/// A parsed regex node. The tree is owned, immutable after construction, and
/// built bottom-up by the parser; recursive edges are boxed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// `a|b|c`. Always at least two children; `pipes` holds the location of
    /// each `|`, so `pipes.len() == children.len() - 1`.
    Alternation {
        children: Vec<Node>,
        pipes: Vec<Span>,
        span: Span,
    },

    /// Two or more adjacent components. Single-component sequences collapse
    /// to the component itself and zero-component sequences to `Empty`.
    Concatenation { children: Vec<Node>, span: Span },

    /// `(…)` and the whole `(?…)` family.
    Group {
        kind: Located<GroupKind>,
        child: Box<Node>,
        span: Span,
    },

    /// `(?(cond)then|else)`.
    Conditional {
        condition: Located<ConditionKind>,
        true_branch: Box<Node>,
        pipe: Option<Span>,
        false_branch: Box<Node>,
        span: Span,
    },

    /// An operand followed by `*`, `+`, `?`, or `{…}` with an optional
    /// reluctant/possessive marker.
    Quantification {
        amount: Located<QuantAmount>,
        kind: Located<QuantKind>,
        operand: Box<Node>,
        span: Span,
    },

    /// `\Q…\E` or `\q{…}` quoted literal text.
    Quote { literal: String, span: Span },

    /// Comments and non-semantic whitespace. Present in the tree, elided by
    /// `strip_trivia` and omitted from dumps.
    Trivia { contents: String, span: Span },

    /// A single indivisible token.
    Atom(Atom),

    /// `[…]` custom character class.
    CustomClass(CustomClass),

    /// Leading `(*UTF)`-style directives wrapping the rest of the pattern.
    GlobalOptions {
        options: Vec<Located<GlobalOption>>,
        child: Box<Node>,
        span: Span,
    },

    /// Oniguruma absent function, `(?~…)` and friends. `start` spans the
    /// opening `(?~` or `(?~|`.
    AbsentFunction {
        kind: AbsentKind,
        start: Span,
        span: Span,
    },

    /// Zero-width empty pattern, e.g. the branches of `|`.
    Empty { span: Span },
}

impl Node {
    pub fn span(&self) -> Span {
        match self {
            Node::Alternation { span, .. } => *span,
            Node::Concatenation { span, .. } => *span,
            Node::Group { span, .. } => *span,
            Node::Conditional { span, .. } => *span,
            Node::Quantification { span, .. } => *span,
            Node::Quote { span, .. } => *span,
            Node::Trivia { span, .. } => *span,
            Node::Atom(atom) => atom.span,
            Node::CustomClass(class) => class.span,
            Node::GlobalOptions { span, .. } => *span,
            Node::AbsentFunction { span, .. } => *span,
            Node::Empty { span } => *span,
        }
    }

    /// Whether a quantifier may follow this node. Groups, conditionals,
    /// custom classes, and absent functions are quantifiable; atoms are
    /// unless they are anchors or backtracking directives; nothing else is.
    pub fn is_quantifiable(&self) -> bool {
        match self {
            Node::Atom(atom) => atom.is_quantifiable(),
            Node::Group { .. }
            | Node::Conditional { .. }
            | Node::CustomClass(_)
            | Node::AbsentFunction { .. } => true,
            Node::Alternation { .. }
            | Node::Concatenation { .. }
            | Node::Quantification { .. }
            | Node::Quote { .. }
            | Node::Trivia { .. }
            | Node::GlobalOptions { .. }
            | Node::Empty { .. } => false,
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Node::Trivia { .. })
    }

    /// Deterministic, trivia-omitting rendering used by golden tests.
    pub fn dump(&self) -> String {
        crate::dump::dump(self)
    }
}

/// The condition of a `(?(…)…)` conditional group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionKind {
    /// `(?(VERSION=10.4)…)` / `(?(VERSION>=10.4)…)`.
    PcreVersionCheck {
        relation: VersionRelation,
        major: u32,
        minor: u32,
    },
    /// An arbitrary group used as the condition, e.g. `(?(?=ab)…)`.
    Group(Box<Node>),
    /// `(?(1)…)`, `(?(<name>)…)`, `(?('name')…)`, `(?(name)…)`,
    /// `(?(+2)…)`, `(?(-1)…)`. Resolution against actual groups is a
    /// consumer concern.
    GroupMatched(Reference),
    /// `(?(R1)…)` / `(?(R&name)…)`.
    GroupRecursionCheck(Reference),
    /// `(?(R)…)`.
    RecursionCheck,
    /// `(?(DEFINE)…)`.
    DefineGroup,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionRelation {
    Equal,
    GreaterOrEqual,
}

/// The shape of an Oniguruma absent function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbsentKind {
    /// `(?~absent)`.
    Repeater(Box<Node>),
    /// `(?~|absent|expr)`.
    Expression {
        absentee: Box<Node>,
        pipe: Span,
        child: Box<Node>,
    },
    /// `(?~|absent)`.
    Stopper(Box<Node>),
    /// `(?~|)`.
    Clearer,
}

/// A `(*…)` directive recognized only before any other pattern content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GlobalOption {
    LimitDepth(u32),
    LimitHeap(u32),
    LimitMatch(u32),
    NotEmpty,
    NotEmptyAtStart,
    NoAutoPossess,
    NoDotStarAnchor,
    NoJit,
    NoStartOpt,
    Utf,
    Ucp,
    CrlfOnly,
    Cr,
    Lf,
    AnyCrlf,
    AnyNewline,
    NulNewline,
    BsrAnyCrlf,
    BsrUnicode,
}

impl GlobalOption {
    /// The PCRE spelling, without the `(*` `)` wrapper or any `=n` payload.
    pub fn keyword(&self) -> &'static str {
        match self {
            GlobalOption::LimitDepth(_) => "LIMIT_DEPTH",
            GlobalOption::LimitHeap(_) => "LIMIT_HEAP",
            GlobalOption::LimitMatch(_) => "LIMIT_MATCH",
            GlobalOption::NotEmpty => "NOTEMPTY",
            GlobalOption::NotEmptyAtStart => "NOTEMPTY_ATSTART",
            GlobalOption::NoAutoPossess => "NO_AUTO_POSSESS",
            GlobalOption::NoDotStarAnchor => "NO_DOTSTAR_ANCHOR",
            GlobalOption::NoJit => "NO_JIT",
            GlobalOption::NoStartOpt => "NO_START_OPT",
            GlobalOption::Utf => "UTF",
            GlobalOption::Ucp => "UCP",
            GlobalOption::CrlfOnly => "CRLF",
            GlobalOption::Cr => "CR",
            GlobalOption::Lf => "LF",
            GlobalOption::AnyCrlf => "ANYCRLF",
            GlobalOption::AnyNewline => "ANY",
            GlobalOption::NulNewline => "NUL",
            GlobalOption::BsrAnyCrlf => "BSR_ANYCRLF",
            GlobalOption::BsrUnicode => "BSR_UNICODE",
        }
    }
}
