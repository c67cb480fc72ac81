// rex_ast/atom - Indivisible regex tokens and their sub-grammars

use serde::{Deserialize, Serialize};

use crate::{Located, Span};

/// A single indivisible token: a literal character, an escape, an anchor, a
/// reference, or one of the parenthesized atom-like constructs (callouts,
/// backtracking directives).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub kind: AtomKind,
    pub span: Span,
}

impl Atom {
    pub const fn new(kind: AtomKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Anchors and backtracking directives reject quantifiers; every other
    /// atom accepts them.
    pub fn is_quantifiable(&self) -> bool {
        match &self.kind {
            AtomKind::Caret | AtomKind::Dollar | AtomKind::BacktrackingDirective(_) => false,
            AtomKind::Escaped(escaped) => !escaped.is_anchor(),
            _ => true,
        }
    }

    /// The concrete character this atom denotes, when it denotes exactly
    /// one. Custom-class range endpoints must have a value here.
    pub fn literal_char_value(&self) -> Option<char> {
        match &self.kind {
            AtomKind::Char(c) | AtomKind::Scalar(c) => Some(*c),
            AtomKind::Escaped(escaped) => escaped.character_value(),
            AtomKind::KeyboardControl(c) => control_value(*c),
            AtomKind::KeyboardMeta(c) => meta_value(*c),
            AtomKind::KeyboardMetaControl(c) => control_value(*c).and_then(meta_value),
            _ => None,
        }
    }
}

fn control_value(c: char) -> Option<char> {
    let byte = u32::from(c);
    if byte < 128 {
        char::from_u32(byte & 0x1f)
    } else {
        None
    }
}

fn meta_value(c: char) -> Option<char> {
    let byte = u32::from(c);
    if byte < 128 {
        char::from_u32(byte | 0x80)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtomKind {
    /// A plain literal character, including escaped punctuation like `\-`.
    Char(char),
    /// A scalar produced by a numeric escape (`\x41`, `\u{1F600}`, `\077`).
    Scalar(char),
    /// `\d`, `\A`, `\R`, … — the escaped-letter builtins.
    Escaped(EscapedKind),
    /// `\N{LATIN SMALL LETTER A}`.
    NamedCharacter(String),
    /// `\p{…}` / `\P{…}` and POSIX `[:…:]` classifications.
    Property(Property),
    /// `\cX`.
    KeyboardControl(char),
    /// `\M-X`.
    KeyboardMeta(char),
    /// `\M-\C-X`.
    KeyboardMetaControl(char),
    /// `.`
    Dot,
    /// `^`
    Caret,
    /// `$`
    Dollar,
    /// `\1`, `\k<name>`, `(?P=name)`, …
    Backreference(Reference),
    /// `(?2)`, `(?&name)`, `\g<name>`, `(?R)`, …
    Subpattern(Reference),
    /// `(?C1)`, `(?C"str")`, `(*onig_name{args})`.
    Callout(Callout),
    /// `(*ACCEPT)`, `(*SKIP:name)`, …
    BacktrackingDirective(BacktrackingDirective),
}

/// The `\<letter>` builtin escapes. `\b` is context-sensitive: a word
/// boundary in a pattern, a backspace inside a custom character class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscapedKind {
    Alarm,
    Escape,
    FormFeed,
    Newline,
    CarriageReturn,
    Tab,
    Backspace,
    SingleDataUnit,
    DecimalDigit,
    NotDecimalDigit,
    HorizontalWhitespace,
    NotHorizontalWhitespace,
    VerticalTab,
    NotVerticalTab,
    Whitespace,
    NotWhitespace,
    WordCharacter,
    NotWordCharacter,
    NewlineSequence,
    NotNewline,
    GraphemeCluster,
    WordBoundary,
    NotWordBoundary,
    StartOfSubject,
    EndOfSubjectBeforeNewline,
    EndOfSubject,
    FirstMatchingPosition,
    ResetStartOfMatch,
}

impl EscapedKind {
    /// Resolve a `\<letter>` escape. `in_custom_class` flips `\b` to
    /// backspace and drops the anchors, which are literal-ish errors there.
    pub fn from_letter(letter: char, in_custom_class: bool) -> Option<EscapedKind> {
        use EscapedKind::*;
        let kind = match letter {
            'a' => Alarm,
            'e' => Escape,
            'f' => FormFeed,
            'n' => Newline,
            'r' => CarriageReturn,
            't' => Tab,
            'b' if in_custom_class => Backspace,
            'b' => WordBoundary,
            'B' if !in_custom_class => NotWordBoundary,
            'C' if !in_custom_class => SingleDataUnit,
            'd' => DecimalDigit,
            'D' => NotDecimalDigit,
            'h' => HorizontalWhitespace,
            'H' => NotHorizontalWhitespace,
            'v' => VerticalTab,
            'V' => NotVerticalTab,
            's' => Whitespace,
            'S' => NotWhitespace,
            'w' => WordCharacter,
            'W' => NotWordCharacter,
            'R' if !in_custom_class => NewlineSequence,
            'X' if !in_custom_class => GraphemeCluster,
            'A' if !in_custom_class => StartOfSubject,
            'Z' if !in_custom_class => EndOfSubjectBeforeNewline,
            'z' if !in_custom_class => EndOfSubject,
            'G' if !in_custom_class => FirstMatchingPosition,
            'K' if !in_custom_class => ResetStartOfMatch,
            _ => return None,
        };
        Some(kind)
    }

    /// The letter as written in the pattern.
    pub fn letter(self) -> char {
        use EscapedKind::*;
        match self {
            Alarm => 'a',
            Escape => 'e',
            FormFeed => 'f',
            Newline => 'n',
            CarriageReturn => 'r',
            Tab => 't',
            Backspace => 'b',
            SingleDataUnit => 'C',
            DecimalDigit => 'd',
            NotDecimalDigit => 'D',
            HorizontalWhitespace => 'h',
            NotHorizontalWhitespace => 'H',
            VerticalTab => 'v',
            NotVerticalTab => 'V',
            Whitespace => 's',
            NotWhitespace => 'S',
            WordCharacter => 'w',
            NotWordCharacter => 'W',
            NewlineSequence => 'R',
            NotNewline => 'N',
            GraphemeCluster => 'X',
            WordBoundary => 'b',
            NotWordBoundary => 'B',
            StartOfSubject => 'A',
            EndOfSubjectBeforeNewline => 'Z',
            EndOfSubject => 'z',
            FirstMatchingPosition => 'G',
            ResetStartOfMatch => 'K',
        }
    }

    /// Zero-width assertions; these reject quantifiers.
    pub fn is_anchor(self) -> bool {
        use EscapedKind::*;
        matches!(
            self,
            WordBoundary
                | NotWordBoundary
                | StartOfSubject
                | EndOfSubjectBeforeNewline
                | EndOfSubject
                | FirstMatchingPosition
                | ResetStartOfMatch
        )
    }

    /// The single character this escape denotes, for the simple C-style
    /// escapes. Class shorthands and anchors have none.
    pub fn character_value(self) -> Option<char> {
        use EscapedKind::*;
        match self {
            Alarm => Some('\u{7}'),
            Escape => Some('\u{1b}'),
            FormFeed => Some('\u{c}'),
            Newline => Some('\n'),
            CarriageReturn => Some('\r'),
            Tab => Some('\t'),
            Backspace => Some('\u{8}'),
            _ => None,
        }
    }
}

/// A numbered or named reference to a group, shared by back-references,
/// subpattern calls, and conditional conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Oniguruma recursion level, e.g. the `+2` of `\k<name+2>`.
    pub recursion_level: Option<Located<i32>>,
    /// The span of the name or number inside any delimiters.
    pub inner_span: Span,
}

impl Reference {
    pub fn new(kind: ReferenceKind, inner_span: Span) -> Self {
        Self {
            kind,
            recursion_level: None,
            inner_span,
        }
    }

    pub fn with_recursion_level(mut self, level: Located<i32>) -> Self {
        self.recursion_level = Some(level);
        self
    }

    /// Whether this is `(?R)` / `(?0)`-style whole-pattern recursion.
    pub fn is_whole_pattern(&self) -> bool {
        matches!(self.kind, ReferenceKind::Absolute(0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceKind {
    /// `\3`, `(?4)`; `0` denotes the whole pattern.
    Absolute(u32),
    /// `(?+2)`, `\g{-1}`; nonzero, the sign encodes the direction.
    Relative(i32),
    /// `\k<name>`, `(?&name)`.
    Named(String),
}

/// A matching-time callout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callout {
    /// `(?C)` (zero) or `(?C123)`.
    Number(u32),
    /// `(?C"text")` and the other PCRE2 delimiter pairs.
    String(String),
    /// Oniguruma `(*name)`, `(*name[tag])`, `(*name{args})`.
    OnigurumaNamed {
        name: String,
        tag: Option<String>,
        args: Option<String>,
    },
}

/// `(*VERB)` / `(*VERB:name)` backtracking control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktrackingDirective {
    pub kind: Located<BacktrackingDirectiveKind>,
    pub name: Option<Located<String>>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BacktrackingDirectiveKind {
    Accept,
    Fail,
    Mark,
    Commit,
    Prune,
    Skip,
    Then,
}

impl BacktrackingDirectiveKind {
    /// Whether the `:name` payload is mandatory (`MARK`), optional
    /// (`PRUNE`/`SKIP`/`THEN`), or absent.
    pub fn requires_name(self) -> bool {
        matches!(self, BacktrackingDirectiveKind::Mark)
    }

    pub fn accepts_name(self) -> bool {
        use BacktrackingDirectiveKind::*;
        matches!(self, Mark | Prune | Skip | Then)
    }

    pub fn keyword(self) -> &'static str {
        use BacktrackingDirectiveKind::*;
        match self {
            Accept => "ACCEPT",
            Fail => "FAIL",
            Mark => "MARK",
            Commit => "COMMIT",
            Prune => "PRUNE",
            Skip => "SKIP",
            Then => "THEN",
        }
    }
}

/// A character property as written, classified but not validated; semantics
/// and UCD lookups are a consumer concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub kind: PropertyKind,
    /// From `\P{…}` or a leading `^` in the body; double negation cancels.
    pub is_inverted: bool,
}

impl Property {
    pub const fn new(kind: PropertyKind, is_inverted: bool) -> Self {
        Self { kind, is_inverted }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// A bare boolean property such as `Alpha` or `White_Space`.
    Binary(String),
    /// A general category, short (`Lu`) or long (`Uppercase_Letter`) form.
    GeneralCategory(String),
    /// `script=Greek` / `sc=Greek`.
    Script(String),
    /// `scx=Greek`.
    ScriptExtensions(String),
    /// `[:alpha:]` inside a custom character class.
    Posix(String),
    /// Anything else; preserved verbatim for downstream validation.
    Other {
        key: Option<String>,
        value: String,
    },
}

/// Boolean properties recognized by name. The list covers the POSIX-ish
/// names the dialects share plus the common UCD binary properties; unknown
/// names still parse, as `PropertyKind::Other`.
const BINARY_PROPERTIES: &[&str] = &[
    "Alpha",
    "Alnum",
    "ASCII",
    "Any",
    "Assigned",
    "Blank",
    "Cntrl",
    "Digit",
    "Graph",
    "Lower",
    "Print",
    "Punct",
    "Space",
    "Upper",
    "Word",
    "XDigit",
    "Alphabetic",
    "Bidi_Control",
    "Bidi_Mirrored",
    "Case_Ignorable",
    "Cased",
    "Changes_When_Casefolded",
    "Changes_When_Lowercased",
    "Changes_When_Titlecased",
    "Changes_When_Uppercased",
    "Dash",
    "Default_Ignorable_Code_Point",
    "Deprecated",
    "Diacritic",
    "Emoji",
    "Emoji_Component",
    "Emoji_Modifier",
    "Emoji_Modifier_Base",
    "Emoji_Presentation",
    "Extender",
    "Grapheme_Base",
    "Grapheme_Extend",
    "Hex_Digit",
    "ID_Continue",
    "ID_Start",
    "Ideographic",
    "Join_Control",
    "Logical_Order_Exception",
    "Lowercase",
    "Math",
    "Noncharacter_Code_Point",
    "Pattern_Syntax",
    "Pattern_White_Space",
    "Quotation_Mark",
    "Radical",
    "Regional_Indicator",
    "Sentence_Terminal",
    "Soft_Dotted",
    "Terminal_Punctuation",
    "Unified_Ideograph",
    "Uppercase",
    "Variation_Selector",
    "White_Space",
    "XID_Continue",
    "XID_Start",
];

/// General category values, short and long spellings.
const GENERAL_CATEGORIES: &[&str] = &[
    "C", "Cc", "Cf", "Cn", "Co", "Cs", "L", "Ll", "Lm", "Lo", "Lt", "Lu", "M", "Mc", "Me", "Mn",
    "N", "Nd", "Nl", "No", "P", "Pc", "Pd", "Pe", "Pf", "Pi", "Po", "Ps", "S", "Sc", "Sk", "Sm",
    "So", "Z", "Zl", "Zp", "Zs", "Other", "Control", "Format", "Unassigned", "Private_Use",
    "Surrogate", "Letter", "Lowercase_Letter", "Modifier_Letter", "Other_Letter",
    "Titlecase_Letter", "Uppercase_Letter", "Cased_Letter", "Mark", "Spacing_Mark",
    "Enclosing_Mark", "Nonspacing_Mark", "Number", "Decimal_Number", "Letter_Number",
    "Other_Number", "Punctuation", "Connector_Punctuation", "Dash_Punctuation",
    "Close_Punctuation", "Final_Punctuation", "Initial_Punctuation", "Other_Punctuation",
    "Open_Punctuation", "Symbol", "Currency_Symbol", "Modifier_Symbol", "Math_Symbol",
    "Other_Symbol", "Separator", "Line_Separator", "Paragraph_Separator", "Space_Separator",
];

/// Classify a `\p{…}` body. `key` is the part before `=` when present.
/// Unknown names never fail here; they are preserved as `Other`.
pub fn classify_property(key: Option<&str>, value: &str) -> PropertyKind {
    if let Some(key) = key {
        return match normalize(key).as_str() {
            "script" | "sc" => PropertyKind::Script(value.to_string()),
            "scx" | "scriptextensions" => PropertyKind::ScriptExtensions(value.to_string()),
            "gc" | "generalcategory" => {
                if is_general_category(value) {
                    PropertyKind::GeneralCategory(value.to_string())
                } else {
                    PropertyKind::Other {
                        key: Some(key.to_string()),
                        value: value.to_string(),
                    }
                }
            }
            _ => PropertyKind::Other {
                key: Some(key.to_string()),
                value: value.to_string(),
            },
        };
    }

    if is_general_category(value) {
        PropertyKind::GeneralCategory(value.to_string())
    } else if is_binary_property(value) {
        PropertyKind::Binary(value.to_string())
    } else {
        PropertyKind::Other {
            key: None,
            value: value.to_string(),
        }
    }
}

fn is_binary_property(name: &str) -> bool {
    let wanted = normalize(name);
    BINARY_PROPERTIES
        .iter()
        .any(|candidate| normalize(candidate) == wanted)
}

fn is_general_category(name: &str) -> bool {
    // Short forms are case-sensitive in every dialect; long forms match
    // loosely like other property names.
    if name.len() <= 2 {
        return GENERAL_CATEGORIES.contains(&name);
    }
    let wanted = normalize(name);
    GENERAL_CATEGORIES
        .iter()
        .any(|candidate| candidate.len() > 2 && normalize(candidate) == wanted)
}

/// UAX44-LM3 style loose matching: case, `-`, `_`, and spaces are ignored.
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
