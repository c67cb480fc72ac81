// rex_parser/context - Syntax options and per-parse parser state

use std::collections::BTreeSet;

use bitflags::bitflags;
use rex_ast::{GroupKind, MatchingOption, MatchingOptionSequence};

bitflags! {
    /// Syntax options for a single parse.
    ///
    /// The parser is a superset recognizer: with no dialect flag set, every
    /// construct of every supported dialect parses. Dialect flags exist for
    /// callers that want the pattern interpreted under one engine's rules;
    /// they currently gate only the concerns that genuinely conflict.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxOptions: u32 {
        /// Whitespace is non-semantic, without `#` comments.
        const NON_SEMANTIC_WHITESPACE = 1 << 0;
        /// `#` line comments and non-semantic whitespace.
        const EXTENDED_SYNTAX = 1 << 1;
        /// Reserved for the experimental literal syntax.
        const EXPERIMENTAL = 1 << 2;
        const PCRE = 1 << 3;
        const ONIGURUMA = 1 << 4;
        const ICU = 1 << 5;
        const ECMASCRIPT = 1 << 6;
    }
}

impl SyntaxOptions {
    /// The default: every dialect's constructs are recognized.
    pub fn traditional() -> Self {
        SyntaxOptions::empty()
    }

    pub fn experimental() -> Self {
        SyntaxOptions::EXPERIMENTAL
    }

    /// Whitespace outside quotes is skipped as trivia.
    pub fn ignores_whitespace(self) -> bool {
        self.intersects(SyntaxOptions::EXTENDED_SYNTAX | SyntaxOptions::NON_SEMANTIC_WHITESPACE)
    }

    /// `#…` end-of-line comments are trivia.
    pub fn hash_comments(self) -> bool {
        self.contains(SyntaxOptions::EXTENDED_SYNTAX)
    }

    /// `[]` may be an empty class (ECMAScript); otherwise a leading `]` is
    /// a literal member.
    pub fn allows_empty_class(self) -> bool {
        self.contains(SyntaxOptions::ECMASCRIPT)
    }
}

/// Mutable state threaded through one parse call. Owned by the parser; the
/// lexer reads it to resolve context-sensitive tokens.
#[derive(Debug, Clone)]
pub struct ParsingContext {
    pub syntax: SyntaxOptions,
    /// Number of capturing groups whose opening delimiter has been consumed.
    /// Drives the back-reference / octal disambiguation.
    pub prior_group_count: u32,
    /// Names of every named and balanced capture parsed so far.
    pub used_group_names: BTreeSet<String>,
    /// Set while parsing `[…]` members; changes what the lexer recognizes.
    pub in_custom_character_class: bool,
}

impl ParsingContext {
    pub fn new(syntax: SyntaxOptions) -> Self {
        Self {
            syntax,
            prior_group_count: 0,
            used_group_names: BTreeSet::new(),
            in_custom_character_class: false,
        }
    }

    /// Record a group whose opening delimiter was just consumed. Only
    /// capturing groups advance the numbering; `(?|…)` renumbering is a
    /// known limitation (see DESIGN.md).
    pub fn record_group(&mut self, kind: &GroupKind) {
        if kind.is_capturing() {
            self.prior_group_count += 1;
        }
        if let Some(name) = kind.name() {
            self.used_group_names.insert(name.to_string());
        }
    }

    /// Fold an inline option sequence (`(?x…)` or `(?x…:`) into the active
    /// syntax. Only the whitespace-relevant options change lexing; the rest
    /// are recorded in the AST and left to consumers.
    pub fn apply_matching_options(&mut self, sequence: &MatchingOptionSequence) {
        if sequence.caret.is_some() {
            self.syntax
                .remove(SyntaxOptions::EXTENDED_SYNTAX | SyntaxOptions::NON_SEMANTIC_WHITESPACE);
        }
        for option in [MatchingOption::Extended, MatchingOption::ExtraExtended] {
            if sequence.adds(option) {
                self.syntax.insert(SyntaxOptions::EXTENDED_SYNTAX);
            }
            if sequence.removes(option) {
                self.syntax.remove(SyntaxOptions::EXTENDED_SYNTAX);
            }
        }
    }
}
