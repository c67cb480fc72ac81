// rex_parser/lexer/group - The `(?…` and `(*…` zoo
//
// `(` introduces over twenty distinct constructs. The parser narrows them in
// order (conditionals, absent functions, paren-shaped atoms, then group
// starts); each scanner here restores the cursor when its shape is absent.

use rex_ast::node::{ConditionKind, GlobalOption, VersionRelation};
use rex_ast::{
    Atom, AtomKind, BacktrackingDirective, BacktrackingDirectiveKind, Callout, GroupKind, Located,
    MatchingOption, MatchingOptionSequence, Position, Reference, ReferenceKind, Span,
};

use crate::context::ParsingContext;
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::lexer::{lex_number, lex_word};
use crate::source::Source;

/// Lex a group opener and classify it. Does not consume the group body or
/// its `)`; the isolated option form `(?i)` is the one exception, which is
/// complete at its closer.
pub(crate) fn lex_group_start(
    src: &mut Source<'_>,
    _ctx: &ParsingContext,
) -> Result<Option<Located<GroupKind>>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    if !src.try_eat('(') {
        return Ok(None);
    }

    // (*sr: / (*script_run: / (*asr: / (*atomic_script_run:
    if src.peek() == Some('*') {
        src.advance();
        let script_runs: [(&str, GroupKind); 4] = [
            ("atomic_script_run:", GroupKind::AtomicScriptRun),
            ("script_run:", GroupKind::ScriptRun),
            ("asr:", GroupKind::AtomicScriptRun),
            ("sr:", GroupKind::ScriptRun),
        ];
        for (prefix, kind) in script_runs {
            if src.try_eat_str(prefix) {
                return Ok(Some(Located::new(kind, src.span_from(start))));
            }
        }
        // Verbs and callouts were already offered their chance by the
        // parser; a bare `(` remains, opening a capture group.
        src.rewind(checkpoint);
        src.advance();
        return Ok(Some(Located::new(GroupKind::Capture, src.span_from(start))));
    }

    if !src.try_eat('?') {
        return Ok(Some(Located::new(GroupKind::Capture, src.span_from(start))));
    }

    let interior_start = src.position();
    let Some(c) = src.peek() else {
        return Err(ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            src.here(),
        ));
    };
    let kind = match c {
        ':' => {
            src.advance();
            GroupKind::NonCapture
        }
        '|' => {
            src.advance();
            GroupKind::NonCaptureReset
        }
        '>' => {
            src.advance();
            GroupKind::Atomic
        }
        '=' => {
            src.advance();
            GroupKind::Lookahead
        }
        '!' => {
            src.advance();
            GroupKind::NegativeLookahead
        }
        '*' => {
            src.advance();
            GroupKind::NonAtomicLookahead
        }
        '<' => {
            src.advance();
            match src.peek() {
                Some('=') => {
                    src.advance();
                    GroupKind::Lookbehind
                }
                Some('!') => {
                    src.advance();
                    GroupKind::NegativeLookbehind
                }
                Some('*') => {
                    src.advance();
                    GroupKind::NonAtomicLookbehind
                }
                _ => lex_named_group_rest(src, '>', true)?,
            }
        }
        '\'' => {
            src.advance();
            lex_named_group_rest(src, '\'', true)?
        }
        'P' => {
            if src.peek_nth(1) != Some('<') {
                // (?P= and (?P> are reference atoms, not groups.
                src.rewind(checkpoint);
                return Ok(None);
            }
            src.advance();
            src.advance();
            lex_named_group_rest(src, '>', false)?
        }
        _ => return lex_options_group(src, start, interior_start).map(Some),
    };
    Ok(Some(Located::new(kind, src.span_from(start))))
}

/// The name part of `(?<…>` / `(?'…'`, including .NET balanced captures
/// `(?<name-prior>` and `(?<-prior>`.
fn lex_named_group_rest(
    src: &mut Source<'_>,
    closer: char,
    allow_balanced: bool,
) -> Result<GroupKind> {
    let name = lex_word(src).to_string();
    if allow_balanced && src.try_eat('-') {
        let prior = lex_word(src).to_string();
        if prior.is_empty() {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIdentifier,
                src.next_char_span(),
            ));
        }
        src.expect(closer)?;
        let name = if name.is_empty() { None } else { Some(name) };
        return Ok(GroupKind::BalancedCapture { name, prior });
    }
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedIdentifier,
            src.next_char_span(),
        ));
    }
    src.expect(closer)?;
    Ok(GroupKind::NamedCapture(name))
}

/// `(?imsx-imsx:` scoped or `(?imsx-imsx)` isolated option groups, plus the
/// PCRE reset form `(?^…`. Anything unrecognized is `UnknownGroupKind`.
fn lex_options_group(
    src: &mut Source<'_>,
    start: Position,
    interior_start: Position,
) -> Result<Located<GroupKind>> {
    let caret = src.try_eat_located('^');
    let mut adding = Vec::new();
    while let Some(option) = lex_matching_option(src)? {
        adding.push(option);
    }
    let minus = src.try_eat_located('-');
    let mut removing = Vec::new();
    if minus.is_some() {
        while let Some(option) = lex_matching_option(src)? {
            removing.push(option);
        }
    }

    let recognized_any = caret.is_some() || minus.is_some() || !adding.is_empty();
    if !recognized_any {
        return Err(unknown_group_kind(src, start, interior_start));
    }

    let mut sequence = MatchingOptionSequence {
        caret,
        adding,
        minus,
        removing,
        is_isolated: false,
    };
    if src.try_eat(':') {
        let kind = GroupKind::ChangeMatchingOptions(sequence);
        return Ok(Located::new(kind, src.span_from(start)));
    }
    if src.try_eat(')') {
        sequence.is_isolated = true;
        let kind = GroupKind::ChangeMatchingOptions(sequence);
        return Ok(Located::new(kind, src.span_from(start)));
    }
    Err(unknown_group_kind(src, start, interior_start))
}

fn unknown_group_kind(src: &Source<'_>, start: Position, interior_start: Position) -> ParseError {
    let consumed = src.slice(src.span_from(interior_start));
    let upcoming: String = src.rest().chars().take_while(|c| *c != ')').collect();
    let text = format!("{consumed}{upcoming}");
    ParseError::new(
        ParseErrorKind::UnknownGroupKind(text),
        Span::new(start, Position(src.position().offset() + upcoming.len() as u32)),
    )
}

fn lex_matching_option(src: &mut Source<'_>) -> Result<Option<Located<MatchingOption>>> {
    let start = src.position();
    let Some(c) = src.peek() else {
        return Ok(None);
    };
    let option = match c {
        'i' => MatchingOption::CaseInsensitive,
        'J' => MatchingOption::AllowDuplicateGroupNames,
        'm' => MatchingOption::Multiline,
        'n' => MatchingOption::NamedCapturesOnly,
        's' => MatchingOption::SingleLine,
        'U' => MatchingOption::ReluctantByDefault,
        'w' => MatchingOption::UnicodeWordBoundaries,
        'D' => MatchingOption::AsciiOnlyDigit,
        'P' => MatchingOption::AsciiOnlyPosixProps,
        'S' => MatchingOption::AsciiOnlySpace,
        'W' => MatchingOption::AsciiOnlyWord,
        'x' => {
            src.advance();
            let option = if src.try_eat('x') {
                MatchingOption::ExtraExtended
            } else {
                MatchingOption::Extended
            };
            return Ok(Some(Located::new(option, src.span_from(start))));
        }
        'y' => {
            src.advance();
            src.expect('{')?;
            let option = match src.advance() {
                Some('g') => MatchingOption::GraphemeClusterSemantics,
                Some('u') => MatchingOption::UnicodeScalarSemantics,
                Some('b') => MatchingOption::ByteSemantics,
                Some('w') => MatchingOption::TextSegmentWordMode,
                _ => {
                    return Err(ParseError::new(
                        ParseErrorKind::Expected('}'),
                        src.next_char_span(),
                    ))
                }
            };
            src.expect('}')?;
            return Ok(Some(Located::new(option, src.span_from(start))));
        }
        _ => return Ok(None),
    };
    src.advance();
    Ok(Some(Located::new(option, src.span_from(start))))
}

/// Paren-shaped atoms: subpattern calls `(?1)` `(?+1)` `(?R)` `(?&name)`
/// `(?P>name)`, the back-reference `(?P=name)`, PCRE callouts `(?C…)`, and
/// the `(*…)` verbs and Oniguruma callouts.
pub(crate) fn lex_group_like_atom(
    src: &mut Source<'_>,
    _ctx: &ParsingContext,
) -> Result<Option<Atom>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    if !src.try_eat('(') {
        return Ok(None);
    }
    if src.try_eat('?') {
        let atom = match src.peek() {
            Some('C') => {
                src.advance();
                return lex_pcre_callout(src, start).map(Some);
            }
            Some('P') => match src.peek_nth(1) {
                Some('=') => {
                    src.advance();
                    src.advance();
                    let reference = lex_plain_named_reference(src)?;
                    Some(Atom::new(
                        AtomKind::Backreference(reference),
                        src.span_from(start),
                    ))
                }
                Some('>') => {
                    src.advance();
                    src.advance();
                    let reference = lex_plain_named_reference(src)?;
                    Some(Atom::new(
                        AtomKind::Subpattern(reference),
                        src.span_from(start),
                    ))
                }
                _ => None,
            },
            Some('R') => {
                if src.peek_nth(1) == Some(')') {
                    let inner_start = src.position();
                    src.advance();
                    let reference =
                        Reference::new(ReferenceKind::Absolute(0), src.span_from(inner_start));
                    src.advance();
                    Some(Atom::new(
                        AtomKind::Subpattern(reference),
                        src.span_from(start),
                    ))
                } else {
                    None
                }
            }
            Some('&') => {
                src.advance();
                let reference = lex_plain_named_reference(src)?;
                Some(Atom::new(
                    AtomKind::Subpattern(reference),
                    src.span_from(start),
                ))
            }
            Some(sign @ ('+' | '-')) => {
                if src.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
                    let inner_start = src.position();
                    src.advance();
                    let number = lex_number(src)?.expect("digit peeked");
                    let magnitude = i32::try_from(number.value).map_err(|_| {
                        ParseError::new(ParseErrorKind::NumberOverflow, number.span)
                    })?;
                    let value = if sign == '-' { -magnitude } else { magnitude };
                    let reference = Reference::new(
                        ReferenceKind::Relative(value),
                        src.span_from(inner_start),
                    );
                    src.expect(')')?;
                    Some(Atom::new(
                        AtomKind::Subpattern(reference),
                        src.span_from(start),
                    ))
                } else {
                    None
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let number = lex_number(src)?.expect("digit peeked");
                let reference = Reference::new(ReferenceKind::Absolute(number.value), number.span);
                src.expect(')')?;
                Some(Atom::new(
                    AtomKind::Subpattern(reference),
                    src.span_from(start),
                ))
            }
            _ => None,
        };
        return match atom {
            Some(atom) => Ok(Some(atom)),
            None => {
                src.rewind(checkpoint);
                Ok(None)
            }
        };
    }
    if src.try_eat('*') {
        if let Some(atom) = lex_verb_or_callout(src, start)? {
            return Ok(Some(atom));
        }
    }
    src.rewind(checkpoint);
    Ok(None)
}

fn lex_plain_named_reference(src: &mut Source<'_>) -> Result<Reference> {
    let inner_start = src.position();
    let name = lex_word(src);
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedIdentifier,
            src.next_char_span(),
        ));
    }
    let reference = Reference::new(
        ReferenceKind::Named(name.to_string()),
        src.span_from(inner_start),
    );
    src.expect(')')?;
    Ok(reference)
}

/// After `(*`: a backtracking verb or an Oniguruma named callout. `None`
/// leaves the cursor for the caller to rewind.
fn lex_verb_or_callout(src: &mut Source<'_>, start: Position) -> Result<Option<Atom>> {
    let after_star = src.checkpoint();

    // (*:name) is MARK shorthand.
    if let Some(colon) = src.try_eat_located(':') {
        let kind = Located::new(BacktrackingDirectiveKind::Mark, colon);
        let name = lex_directive_name(src)?;
        src.expect(')')?;
        let directive = BacktrackingDirective {
            kind,
            name: Some(name),
        };
        return Ok(Some(Atom::new(
            AtomKind::BacktrackingDirective(directive),
            src.span_from(start),
        )));
    }

    let verb_start = src.position();
    let verb = src.eat_while(|c| c.is_ascii_uppercase() || c == '_');
    let kind = match verb {
        "ACCEPT" => Some(BacktrackingDirectiveKind::Accept),
        "FAIL" | "F" => Some(BacktrackingDirectiveKind::Fail),
        "MARK" => Some(BacktrackingDirectiveKind::Mark),
        "COMMIT" => Some(BacktrackingDirectiveKind::Commit),
        "PRUNE" => Some(BacktrackingDirectiveKind::Prune),
        "SKIP" => Some(BacktrackingDirectiveKind::Skip),
        "THEN" => Some(BacktrackingDirectiveKind::Then),
        _ => None,
    };
    if let Some(kind) = kind {
        let kind = Located::new(kind, src.span_from(verb_start));
        let name = if src.try_eat(':') {
            Some(lex_directive_name(src)?)
        } else {
            None
        };
        if kind.value.requires_name() && name.is_none() {
            return Err(ParseError::new(
                ParseErrorKind::Expected(':'),
                src.next_char_span(),
            ));
        }
        src.expect(')')?;
        let directive = BacktrackingDirective { kind, name };
        return Ok(Some(Atom::new(
            AtomKind::BacktrackingDirective(directive),
            src.span_from(start),
        )));
    }

    // Oniguruma named callout: (*name), (*name[tag]), (*name{args}).
    src.rewind(after_star);
    let name = lex_word(src);
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }
    let name = name.to_string();
    let tag = if src.try_eat('[') {
        let tag = lex_word(src).to_string();
        if !src.try_eat(']') {
            return Ok(None);
        }
        Some(tag)
    } else {
        None
    };
    let args = if src.try_eat('{') {
        let args = src.eat_while(|c| c != '}').to_string();
        if !src.try_eat('}') {
            return Ok(None);
        }
        Some(args)
    } else {
        None
    };
    if !src.try_eat(')') {
        return Ok(None);
    }
    Ok(Some(Atom::new(
        AtomKind::Callout(Callout::OnigurumaNamed { name, tag, args }),
        src.span_from(start),
    )))
}

fn lex_directive_name(src: &mut Source<'_>) -> Result<Located<String>> {
    let start = src.position();
    let name = src.eat_while(|c| c != ')').to_string();
    if name.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedIdentifier,
            src.next_char_span(),
        ));
    }
    Ok(Located::new(name, src.span_from(start)))
}

/// After `(?C`: PCRE callouts, numbered or stringly delimited.
fn lex_pcre_callout(src: &mut Source<'_>, start: Position) -> Result<Atom> {
    let callout = match src.peek() {
        Some(')') => Callout::Number(0),
        Some(c) if c.is_ascii_digit() => {
            let number = lex_number(src)?.expect("digit peeked");
            Callout::Number(number.value)
        }
        Some('{') => {
            src.advance();
            let text = src.eat_while(|c| c != '}').to_string();
            src.expect('}')?;
            Callout::String(text)
        }
        Some(delim @ ('"' | '\'' | '`' | '^' | '%' | '#' | '$')) => {
            src.advance();
            let text = src.eat_while(|c| c != delim).to_string();
            src.expect(delim)?;
            Callout::String(text)
        }
        _ => {
            return Err(ParseError::new(
                ParseErrorKind::Expected(')'),
                src.next_char_span(),
            ))
        }
    };
    src.expect(')')?;
    Ok(Atom::new(AtomKind::Callout(callout), src.span_from(start)))
}

/// `(?~` / `(?~|`: the whole opener span plus whether the pipe form was
/// used.
pub(crate) fn lex_absent_function_start(src: &mut Source<'_>) -> Option<(Span, bool)> {
    let start = src.position();
    if !src.try_eat_str("(?~") {
        return None;
    }
    let has_pipe = src.try_eat('|');
    Some((src.span_from(start), has_pipe))
}

/// The known conditions of `(?(…)…)`. On no match the cursor is fully
/// restored so the group-condition fallback can have a go.
pub(crate) fn lex_known_conditional_start(
    src: &mut Source<'_>,
) -> Result<Option<Located<ConditionKind>>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    if !src.try_eat_str("(?(") {
        return Ok(None);
    }
    let interior = src.checkpoint();

    if src.try_eat_str("VERSION") {
        let relation = if src.try_eat_str(">=") {
            VersionRelation::GreaterOrEqual
        } else if src.try_eat('=') {
            VersionRelation::Equal
        } else {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedEquals,
                src.next_char_span(),
            ));
        };
        let major = lex_number(src)?.ok_or_else(|| {
            ParseError::new(ParseErrorKind::ExpectedNumber, src.next_char_span())
        })?;
        let minor = if src.try_eat('.') {
            lex_number(src)?.ok_or_else(|| {
                ParseError::new(ParseErrorKind::ExpectedNumber, src.next_char_span())
            })?
        } else {
            Located::new(0, src.here())
        };
        src.expect(')')?;
        let condition = ConditionKind::PcreVersionCheck {
            relation,
            major: major.value,
            minor: minor.value,
        };
        return Ok(Some(Located::new(condition, src.span_from(start))));
    }

    if src.try_eat_str("DEFINE") && src.try_eat(')') {
        return Ok(Some(Located::new(
            ConditionKind::DefineGroup,
            src.span_from(start),
        )));
    }
    src.rewind(interior);

    // R, Rn, R&name — the recursion checks.
    if src.try_eat('R') {
        if src.try_eat(')') {
            return Ok(Some(Located::new(
                ConditionKind::RecursionCheck,
                src.span_from(start),
            )));
        }
        if src.try_eat('&') {
            let inner_start = src.position();
            let name = lex_word(src);
            if !name.is_empty() && src.peek() == Some(')') {
                let reference = Reference::new(
                    ReferenceKind::Named(name.to_string()),
                    src.span_from(inner_start),
                );
                src.advance();
                return Ok(Some(Located::new(
                    ConditionKind::GroupRecursionCheck(reference),
                    src.span_from(start),
                )));
            }
            src.rewind(interior);
        } else if src.peek().is_some_and(|c| c.is_ascii_digit()) {
            let number = lex_number(src)?.expect("digit peeked");
            if src.try_eat(')') {
                let reference =
                    Reference::new(ReferenceKind::Absolute(number.value), number.span);
                return Ok(Some(Located::new(
                    ConditionKind::GroupRecursionCheck(reference),
                    src.span_from(start),
                )));
            }
            src.rewind(interior);
        } else {
            // A bare name that merely starts with R.
            src.rewind(interior);
        }
    }

    // Numbered and signed references.
    if let Some(first) = src.peek() {
        if first.is_ascii_digit() || first == '+' || first == '-' {
            let inner_start = src.position();
            let sign = if src.try_eat('+') {
                Some(1i32)
            } else if src.try_eat('-') {
                Some(-1i32)
            } else {
                None
            };
            if let Some(number) = lex_number(src)? {
                let body_span = src.span_from(inner_start);
                if src.try_eat(')') {
                    let kind = match sign {
                        None => ReferenceKind::Absolute(number.value),
                        Some(sign) => match i32::try_from(number.value) {
                            Ok(magnitude) if magnitude != 0 => {
                                ReferenceKind::Relative(sign * magnitude)
                            }
                            _ => {
                                return Err(ParseError::new(
                                    ParseErrorKind::ExpectedNumber,
                                    number.span,
                                ))
                            }
                        },
                    };
                    let reference = Reference::new(kind, body_span);
                    return Ok(Some(Located::new(
                        ConditionKind::GroupMatched(reference),
                        src.span_from(start),
                    )));
                }
            }
            src.rewind(interior);
        }
    }

    // <name>, 'name', and PCRE's bare name.
    for (opener, closer) in [(Some('<'), '>'), (Some('\''), '\''), (None, ')')] {
        if let Some(open) = opener {
            if !src.try_eat(open) {
                continue;
            }
        }
        let inner_start = src.position();
        let name = lex_word(src);
        if name.is_empty() {
            src.rewind(interior);
            continue;
        }
        let reference = Reference::new(
            ReferenceKind::Named(name.to_string()),
            src.span_from(inner_start),
        );
        if opener.is_some() {
            if !src.try_eat(closer) || !src.try_eat(')') {
                src.rewind(interior);
                continue;
            }
        } else if !src.try_eat(')') {
            src.rewind(interior);
            continue;
        }
        return Ok(Some(Located::new(
            ConditionKind::GroupMatched(reference),
            src.span_from(start),
        )));
    }

    src.rewind(checkpoint);
    Ok(None)
}

/// `(*UTF)`-style global options, recognized by the parser only before any
/// other pattern content.
pub(crate) fn lex_global_matching_option(
    src: &mut Source<'_>,
) -> Result<Option<Located<GlobalOption>>> {
    let checkpoint = src.checkpoint();
    let start = src.position();
    if !src.try_eat_str("(*") {
        return Ok(None);
    }
    let keyword = src.eat_while(|c| c.is_ascii_uppercase() || c == '_');
    let option = match keyword {
        "LIMIT_DEPTH" | "LIMIT_HEAP" | "LIMIT_MATCH" => {
            src.expect('=')?;
            let number = lex_number(src)?.ok_or_else(|| {
                ParseError::new(ParseErrorKind::ExpectedNumber, src.next_char_span())
            })?;
            match keyword {
                "LIMIT_DEPTH" => GlobalOption::LimitDepth(number.value),
                "LIMIT_HEAP" => GlobalOption::LimitHeap(number.value),
                _ => GlobalOption::LimitMatch(number.value),
            }
        }
        "NOTEMPTY" => GlobalOption::NotEmpty,
        "NOTEMPTY_ATSTART" => GlobalOption::NotEmptyAtStart,
        "NO_AUTO_POSSESS" => GlobalOption::NoAutoPossess,
        "NO_DOTSTAR_ANCHOR" => GlobalOption::NoDotStarAnchor,
        "NO_JIT" => GlobalOption::NoJit,
        "NO_START_OPT" => GlobalOption::NoStartOpt,
        "UTF" => GlobalOption::Utf,
        "UCP" => GlobalOption::Ucp,
        "CRLF" => GlobalOption::CrlfOnly,
        "CR" => GlobalOption::Cr,
        "LF" => GlobalOption::Lf,
        "ANYCRLF" => GlobalOption::AnyCrlf,
        "ANY" => GlobalOption::AnyNewline,
        "NUL" => GlobalOption::NulNewline,
        "BSR_ANYCRLF" => GlobalOption::BsrAnyCrlf,
        "BSR_UNICODE" => GlobalOption::BsrUnicode,
        _ => {
            src.rewind(checkpoint);
            return Ok(None);
        }
    };
    src.expect(')')?;
    Ok(Some(Located::new(option, src.span_from(start))))
}
