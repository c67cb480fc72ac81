// rex_ast/dump - Deterministic rendering used by golden tests
//
// The dump is not a regex: it is a stable, readable labeling of the tree.
// Trivia never appears in the output.

use crate::atom::{Atom, AtomKind, Callout, Property, PropertyKind, Reference, ReferenceKind};
use crate::class::{ClassMember, CustomClass};
use crate::node::{AbsentKind, ConditionKind, Node, VersionRelation};
use crate::quant::{QuantAmount, QuantKind};
use crate::GroupKind;

pub fn dump(node: &Node) -> String {
    match node {
        Node::Alternation { children, .. } => format!("alternation({})", dump_list(children)),
        Node::Concatenation { children, .. } => {
            // With trivia omitted a sequence may collapse to one visible
            // component, which prints bare, matching the trivia-free parse.
            let visible: Vec<&Node> = children.iter().filter(|c| !c.is_trivia()).collect();
            match visible.as_slice() {
                [] => "empty".to_string(),
                [only] => dump(only),
                _ => format!("({})", dump_list(children)),
            }
        }
        Node::Group { kind, child, .. } => {
            format!("group_{}({})", group_label(&kind.value), dump(child))
        }
        Node::Conditional {
            condition,
            true_branch,
            false_branch,
            ..
        } => format!(
            "if {} then {} else {}",
            condition_label(&condition.value),
            dump(true_branch),
            dump(false_branch)
        ),
        Node::Quantification {
            amount,
            kind,
            operand,
            ..
        } => format!(
            "quant_{}_{}({})",
            amount_label(amount.value),
            kind_label(kind.value),
            dump(operand)
        ),
        Node::Quote { literal, .. } => format!("quote({literal})"),
        Node::Trivia { .. } => String::new(),
        Node::Atom(atom) => dump_atom(atom),
        Node::CustomClass(class) => dump_class(class),
        Node::GlobalOptions {
            options, child, ..
        } => {
            let rendered: Vec<String> = options
                .iter()
                .map(|option| match &option.value {
                    crate::node::GlobalOption::LimitDepth(n) => format!("(*LIMIT_DEPTH={n})"),
                    crate::node::GlobalOption::LimitHeap(n) => format!("(*LIMIT_HEAP={n})"),
                    crate::node::GlobalOption::LimitMatch(n) => format!("(*LIMIT_MATCH={n})"),
                    other => format!("(*{})", other.keyword()),
                })
                .collect();
            format!("globalMatchingOptions({})({})", rendered.join(","), dump(child))
        }
        Node::AbsentFunction { kind, .. } => match kind {
            AbsentKind::Repeater(child) => format!("absentFunction_repeater({})", dump(child)),
            AbsentKind::Expression {
                absentee, child, ..
            } => format!(
                "absentFunction_expression({},{})",
                dump(absentee),
                dump(child)
            ),
            AbsentKind::Stopper(child) => format!("absentFunction_stopper({})", dump(child)),
            AbsentKind::Clearer => "absentFunction_clearer".to_string(),
        },
        Node::Empty { .. } => "empty".to_string(),
    }
}

fn dump_list(children: &[Node]) -> String {
    let rendered: Vec<String> = children
        .iter()
        .filter(|child| !child.is_trivia())
        .map(dump)
        .collect();
    rendered.join(",")
}

fn group_label(kind: &GroupKind) -> String {
    match kind {
        GroupKind::Capture => "capture".to_string(),
        GroupKind::NamedCapture(name) => format!("namedCapture<{name}>"),
        GroupKind::BalancedCapture { name, prior } => {
            format!("balancedCapture<{}-{prior}>", name.as_deref().unwrap_or(""))
        }
        GroupKind::NonCapture => "nonCapture".to_string(),
        GroupKind::NonCaptureReset => "nonCaptureReset".to_string(),
        GroupKind::Atomic => "atomicNonCapturing".to_string(),
        GroupKind::Lookahead => "lookahead".to_string(),
        GroupKind::NegativeLookahead => "negativeLookahead".to_string(),
        GroupKind::NonAtomicLookahead => "nonAtomicLookahead".to_string(),
        GroupKind::Lookbehind => "lookbehind".to_string(),
        GroupKind::NegativeLookbehind => "negativeLookbehind".to_string(),
        GroupKind::NonAtomicLookbehind => "nonAtomicLookbehind".to_string(),
        GroupKind::ScriptRun => "scriptRun".to_string(),
        GroupKind::AtomicScriptRun => "atomicScriptRun".to_string(),
        GroupKind::ChangeMatchingOptions(sequence) => {
            format!("changeMatchingOptions<{}>", sequence.spelling())
        }
    }
}

fn condition_label(condition: &ConditionKind) -> String {
    match condition {
        ConditionKind::PcreVersionCheck {
            relation,
            major,
            minor,
        } => {
            let relation = match relation {
                VersionRelation::Equal => "=",
                VersionRelation::GreaterOrEqual => ">=",
            };
            format!("version{relation}{major}.{minor}")
        }
        ConditionKind::Group(group) => dump(group),
        ConditionKind::GroupMatched(reference) => format!("matched<{}>", reference_body(reference)),
        ConditionKind::GroupRecursionCheck(reference) => {
            format!("recursion<{}>", reference_body(reference))
        }
        ConditionKind::RecursionCheck => "recursion".to_string(),
        ConditionKind::DefineGroup => "define".to_string(),
    }
}

fn amount_label(amount: QuantAmount) -> String {
    match amount {
        QuantAmount::ZeroOrMore => "zeroOrMore".to_string(),
        QuantAmount::OneOrMore => "oneOrMore".to_string(),
        QuantAmount::ZeroOrOne => "zeroOrOne".to_string(),
        QuantAmount::Exactly(n) => format!("exactly<{n}>"),
        QuantAmount::NOrMore(n) => format!("nOrMore<{n}>"),
        QuantAmount::UpToN(n) => format!("uptoN<{n}>"),
        QuantAmount::Range { lo, hi } => format!(".range<{lo}...{hi}>"),
    }
}

fn kind_label(kind: QuantKind) -> &'static str {
    match kind {
        QuantKind::Eager => "eager",
        QuantKind::Reluctant => "reluctant",
        QuantKind::Possessive => "possessive",
    }
}

/// Atoms print their literal string when they have one, otherwise a
/// dialect-faithful escape.
fn dump_atom(atom: &Atom) -> String {
    match &atom.kind {
        AtomKind::Char(c) | AtomKind::Scalar(c) => c.to_string(),
        AtomKind::Escaped(escaped) => format!("\\{}", escaped.letter()),
        AtomKind::NamedCharacter(name) => format!("\\N{{{name}}}"),
        AtomKind::Property(property) => dump_property(property),
        AtomKind::KeyboardControl(c) => format!("\\c{c}"),
        AtomKind::KeyboardMeta(c) => format!("\\M-{c}"),
        AtomKind::KeyboardMetaControl(c) => format!("\\M-\\C-{c}"),
        AtomKind::Dot => ".".to_string(),
        AtomKind::Caret => "^".to_string(),
        AtomKind::Dollar => "$".to_string(),
        AtomKind::Backreference(reference) => dump_backreference(reference),
        AtomKind::Subpattern(reference) => dump_subpattern(reference),
        AtomKind::Callout(callout) => dump_callout(callout),
        AtomKind::BacktrackingDirective(directive) => {
            let mut out = format!("(*{}", directive.kind.value.keyword());
            if let Some(name) = &directive.name {
                out.push(':');
                out.push_str(&name.value);
            }
            out.push(')');
            out
        }
    }
}

fn dump_property(property: &Property) -> String {
    match &property.kind {
        PropertyKind::Posix(name) => {
            let negation = if property.is_inverted { "^" } else { "" };
            format!("[:{negation}{name}:]")
        }
        kind => {
            let letter = if property.is_inverted { 'P' } else { 'p' };
            let body = match kind {
                PropertyKind::Binary(value) | PropertyKind::GeneralCategory(value) => value.clone(),
                PropertyKind::Script(value) => format!("script={value}"),
                PropertyKind::ScriptExtensions(value) => format!("scx={value}"),
                PropertyKind::Other {
                    key: Some(key),
                    value,
                } => format!("{key}={value}"),
                PropertyKind::Other { key: None, value } => value.clone(),
                PropertyKind::Posix(_) => unreachable!(),
            };
            format!("\\{letter}{{{body}}}")
        }
    }
}

fn reference_body(reference: &Reference) -> String {
    let mut body = match &reference.kind {
        ReferenceKind::Absolute(n) => n.to_string(),
        ReferenceKind::Relative(n) => format!("{n:+}"),
        ReferenceKind::Named(name) => name.clone(),
    };
    if let Some(level) = &reference.recursion_level {
        body.push_str(&format!("{:+}", level.value));
    }
    body
}

fn dump_backreference(reference: &Reference) -> String {
    match &reference.kind {
        ReferenceKind::Absolute(n) if reference.recursion_level.is_none() => format!("\\{n}"),
        ReferenceKind::Relative(n) if reference.recursion_level.is_none() => format!("\\g{{{n:+}}}"),
        _ => format!("\\k<{}>", reference_body(reference)),
    }
}

fn dump_subpattern(reference: &Reference) -> String {
    match &reference.kind {
        ReferenceKind::Absolute(0) => "(?R)".to_string(),
        ReferenceKind::Absolute(n) => format!("(?{n})"),
        ReferenceKind::Relative(n) => format!("(?{n:+})"),
        ReferenceKind::Named(name) => format!("\\g<{name}>"),
    }
}

fn dump_callout(callout: &Callout) -> String {
    match callout {
        Callout::Number(n) => format!("(?C{n})"),
        Callout::String(text) => format!("(?C\"{text}\")"),
        Callout::OnigurumaNamed { name, tag, args } => {
            let mut out = format!("(*{name}");
            if let Some(tag) = tag {
                out.push_str(&format!("[{tag}]"));
            }
            if let Some(args) = args {
                out.push_str(&format!("{{{args}}}"));
            }
            out.push(')');
            out
        }
    }
}

fn dump_class(class: &CustomClass) -> String {
    let mut elements = Vec::new();
    if class.is_inverted() {
        elements.push("^".to_string());
    }
    elements.extend(
        class
            .members
            .iter()
            .filter(|member| !member.is_trivia())
            .map(dump_member),
    );
    format!("customCharacterClass({})", elements.join(","))
}

fn dump_member(member: &ClassMember) -> String {
    match member {
        ClassMember::Atom(atom) => dump_atom(atom),
        ClassMember::Range(range) => format!("{}-{}", dump_atom(&range.lhs), dump_atom(&range.rhs)),
        ClassMember::Quote { literal, .. } => format!("quote({literal})"),
        ClassMember::Trivia { .. } => String::new(),
        ClassMember::Nested(class) => dump_class(class),
        ClassMember::SetOperation { lhs, op, rhs } => {
            format!(
                "op [{}] {} [{}]",
                dump_member_list(lhs),
                op.value.label(),
                dump_member_list(rhs)
            )
        }
    }
}

fn dump_member_list(members: &[ClassMember]) -> String {
    let rendered: Vec<String> = members
        .iter()
        .filter(|member| !member.is_trivia())
        .map(dump_member)
        .collect();
    rendered.join(",")
}
