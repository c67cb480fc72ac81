// rex_ast/group - Group kinds and matching-option sequences

use serde::{Deserialize, Serialize};

use crate::{Located, Span};

/// What a `(`-introduced construct is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKind {
    /// `(…)`
    Capture,
    /// `(?<name>…)`, `(?'name'…)`, `(?P<name>…)`
    NamedCapture(String),
    /// .NET `(?<name-prior>…)`; captures into `name` (when present) and pops
    /// the most recent capture of `prior`.
    BalancedCapture {
        name: Option<String>,
        prior: String,
    },
    /// `(?:…)`
    NonCapture,
    /// `(?|…)`. Branch renumbering is recorded, not applied; see DESIGN.md.
    NonCaptureReset,
    /// `(?>…)`
    Atomic,
    /// `(?=…)`
    Lookahead,
    /// `(?!…)`
    NegativeLookahead,
    /// `(?*…)`
    NonAtomicLookahead,
    /// `(?<=…)`
    Lookbehind,
    /// `(?<!…)`
    NegativeLookbehind,
    /// `(?<*…)`
    NonAtomicLookbehind,
    /// `(*sr:…)` / `(*script_run:…)`
    ScriptRun,
    /// `(*asr:…)` / `(*atomic_script_run:…)`
    AtomicScriptRun,
    /// `(?imsx-imsx:…)` or isolated `(?imsx-imsx)`.
    ChangeMatchingOptions(MatchingOptionSequence),
}

impl GroupKind {
    /// Capture-numbering groups: plain, named, and balanced captures.
    pub fn is_capturing(&self) -> bool {
        matches!(
            self,
            GroupKind::Capture | GroupKind::NamedCapture(_) | GroupKind::BalancedCapture { .. }
        )
    }

    /// True only for the isolated option-change form `(?i)`, whose scope
    /// implicitly extends to the end of the enclosing group.
    pub fn has_implicit_scope(&self) -> bool {
        match self {
            GroupKind::ChangeMatchingOptions(sequence) => sequence.is_isolated,
            _ => false,
        }
    }

    /// The capture name, for named and balanced captures.
    pub fn name(&self) -> Option<&str> {
        match self {
            GroupKind::NamedCapture(name) => Some(name),
            GroupKind::BalancedCapture { name, .. } => name.as_deref(),
            _ => None,
        }
    }
}

/// One matching option, as toggled inside `(?…)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchingOption {
    /// `i`
    CaseInsensitive,
    /// `J`
    AllowDuplicateGroupNames,
    /// `m`
    Multiline,
    /// `n`
    NamedCapturesOnly,
    /// `s`
    SingleLine,
    /// `U`
    ReluctantByDefault,
    /// `x`
    Extended,
    /// `xx`
    ExtraExtended,
    /// `w`
    UnicodeWordBoundaries,
    /// `D`
    AsciiOnlyDigit,
    /// `P`
    AsciiOnlyPosixProps,
    /// `S`
    AsciiOnlySpace,
    /// `W`
    AsciiOnlyWord,
    /// `y{g}`
    GraphemeClusterSemantics,
    /// `y{u}`
    UnicodeScalarSemantics,
    /// `y{b}`
    ByteSemantics,
    /// `y{w}`
    TextSegmentWordMode,
}

impl MatchingOption {
    /// The surface spelling.
    pub fn spelling(self) -> &'static str {
        use MatchingOption::*;
        match self {
            CaseInsensitive => "i",
            AllowDuplicateGroupNames => "J",
            Multiline => "m",
            NamedCapturesOnly => "n",
            SingleLine => "s",
            ReluctantByDefault => "U",
            Extended => "x",
            ExtraExtended => "xx",
            UnicodeWordBoundaries => "w",
            AsciiOnlyDigit => "D",
            AsciiOnlyPosixProps => "P",
            AsciiOnlySpace => "S",
            AsciiOnlyWord => "W",
            GraphemeClusterSemantics => "y{g}",
            UnicodeScalarSemantics => "y{u}",
            ByteSemantics => "y{b}",
            TextSegmentWordMode => "y{w}",
        }
    }
}

/// The parsed contents of `(?^imsx-imsx…)`: additions, an optional `-` with
/// removals, and whether the form was isolated (no `:` body).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchingOptionSequence {
    /// PCRE `(?^…)`: reset to defaults before applying additions.
    pub caret: Option<Span>,
    pub adding: Vec<Located<MatchingOption>>,
    pub minus: Option<Span>,
    pub removing: Vec<Located<MatchingOption>>,
    pub is_isolated: bool,
}

impl MatchingOptionSequence {
    pub fn spelling(&self) -> String {
        let mut out = String::new();
        if self.caret.is_some() {
            out.push('^');
        }
        for option in &self.adding {
            out.push_str(option.value.spelling());
        }
        if self.minus.is_some() {
            out.push('-');
            for option in &self.removing {
                out.push_str(option.value.spelling());
            }
        }
        out
    }

    pub fn adds(&self, option: MatchingOption) -> bool {
        self.adding.iter().any(|added| added.value == option)
    }

    pub fn removes(&self, option: MatchingOption) -> bool {
        self.removing.iter().any(|removed| removed.value == option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn capturing_kinds() {
        assert!(GroupKind::Capture.is_capturing());
        assert!(GroupKind::NamedCapture("x".to_string()).is_capturing());
        assert!(GroupKind::BalancedCapture {
            name: None,
            prior: "x".to_string()
        }
        .is_capturing());
        assert!(!GroupKind::NonCapture.is_capturing());
        assert!(!GroupKind::NonCaptureReset.is_capturing());
        assert!(!GroupKind::Lookahead.is_capturing());
    }

    #[test]
    fn implicit_scope_only_for_isolated_options() {
        let isolated = MatchingOptionSequence {
            is_isolated: true,
            ..Default::default()
        };
        assert!(GroupKind::ChangeMatchingOptions(isolated).has_implicit_scope());
        let scoped = MatchingOptionSequence::default();
        assert!(!GroupKind::ChangeMatchingOptions(scoped).has_implicit_scope());
        assert!(!GroupKind::Atomic.has_implicit_scope());
    }

    #[test]
    fn option_sequence_spelling() {
        let span = Span::empty_at(Position(0));
        let sequence = MatchingOptionSequence {
            caret: None,
            adding: vec![
                Located::new(MatchingOption::CaseInsensitive, span),
                Located::new(MatchingOption::Multiline, span),
            ],
            minus: Some(span),
            removing: vec![Located::new(MatchingOption::Extended, span)],
            is_isolated: false,
        };
        assert_eq!(sequence.spelling(), "im-x");
        assert!(sequence.adds(MatchingOption::Multiline));
        assert!(sequence.removes(MatchingOption::Extended));
        assert!(!sequence.adds(MatchingOption::Extended));
    }
}
