// Golden dump rendering tests for rex_ast
use rex_ast::*;

fn dummy_span() -> Span {
    Span::empty_at(Position(0))
}

fn char_atom(c: char) -> Node {
    Node::Atom(Atom::new(AtomKind::Char(c), dummy_span()))
}

#[test]
fn alternation_dump() {
    let node = Node::Alternation {
        children: vec![char_atom('a'), char_atom('b'), char_atom('c')],
        pipes: vec![dummy_span(), dummy_span()],
        span: dummy_span(),
    };
    assert_eq!(node.dump(), "alternation(a,b,c)");
}

#[test]
fn nested_group_dump() {
    let inner = Node::Group {
        kind: Located::new(GroupKind::Capture, dummy_span()),
        child: Box::new(char_atom('b')),
        span: dummy_span(),
    };
    let outer = Node::Group {
        kind: Located::new(GroupKind::Capture, dummy_span()),
        child: Box::new(Node::Concatenation {
            children: vec![char_atom('a'), inner, char_atom('c')],
            span: dummy_span(),
        }),
        span: dummy_span(),
    };
    assert_eq!(outer.dump(), "group_capture((a,group_capture(b),c))");
}

#[test]
fn group_kind_labels() {
    let cases: Vec<(GroupKind, &str)> = vec![
        (GroupKind::NonCapture, "group_nonCapture(a)"),
        (GroupKind::Atomic, "group_atomicNonCapturing(a)"),
        (
            GroupKind::NamedCapture("x".to_string()),
            "group_namedCapture<x>(a)",
        ),
        (GroupKind::NegativeLookbehind, "group_negativeLookbehind(a)"),
        (GroupKind::AtomicScriptRun, "group_atomicScriptRun(a)"),
        (
            GroupKind::BalancedCapture {
                name: None,
                prior: "old".to_string(),
            },
            "group_balancedCapture<-old>(a)",
        ),
    ];
    for (kind, expected) in cases {
        let node = Node::Group {
            kind: Located::new(kind, dummy_span()),
            child: Box::new(char_atom('a')),
            span: dummy_span(),
        };
        assert_eq!(node.dump(), expected);
    }
}

#[test]
fn conditional_dump() {
    let node = Node::Conditional {
        condition: Located::new(
            ConditionKind::GroupMatched(Reference::new(
                ReferenceKind::Named("x".to_string()),
                dummy_span(),
            )),
            dummy_span(),
        ),
        true_branch: Box::new(char_atom('y')),
        pipe: Some(dummy_span()),
        false_branch: Box::new(char_atom('n')),
        span: dummy_span(),
    };
    assert_eq!(node.dump(), "if matched<x> then y else n");
}

#[test]
fn set_operation_dump() {
    let range = ClassMember::Range(ClassRange {
        lhs: Atom::new(AtomKind::Char('a'), dummy_span()),
        dash: dummy_span(),
        rhs: Atom::new(AtomKind::Char('z'), dummy_span()),
    });
    let nested = ClassMember::Nested(CustomClass {
        start: Located::new(ClassStart::Inverted, dummy_span()),
        members: "aeiou"
            .chars()
            .map(|c| ClassMember::Atom(Atom::new(AtomKind::Char(c), dummy_span())))
            .collect(),
        span: dummy_span(),
    });
    let class = Node::CustomClass(CustomClass {
        start: Located::new(ClassStart::Normal, dummy_span()),
        members: vec![ClassMember::SetOperation {
            lhs: vec![range],
            op: Located::new(SetOp::Intersection, dummy_span()),
            rhs: vec![nested],
        }],
        span: dummy_span(),
    });
    assert_eq!(
        class.dump(),
        "customCharacterClass(op [a-z] intersection [customCharacterClass(^,a,e,i,o,u)])"
    );
}

#[test]
fn global_options_dump() {
    let node = Node::GlobalOptions {
        options: vec![
            Located::new(GlobalOption::Utf, dummy_span()),
            Located::new(GlobalOption::LimitMatch(10), dummy_span()),
        ],
        child: Box::new(char_atom('a')),
        span: dummy_span(),
    };
    assert_eq!(
        node.dump(),
        "globalMatchingOptions((*UTF),(*LIMIT_MATCH=10))(a)"
    );
}

#[test]
fn absent_function_dump() {
    let node = Node::AbsentFunction {
        kind: AbsentKind::Expression {
            absentee: Box::new(Node::Concatenation {
                children: "foo".chars().map(char_atom).collect(),
                span: dummy_span(),
            }),
            pipe: dummy_span(),
            child: Box::new(Node::Concatenation {
                children: "bar".chars().map(char_atom).collect(),
                span: dummy_span(),
            }),
        },
        start: dummy_span(),
        span: dummy_span(),
    };
    assert_eq!(node.dump(), "absentFunction_expression((f,o,o),(b,a,r))");
}

#[test]
fn directive_and_callout_dump() {
    let directive = Node::Atom(Atom::new(
        AtomKind::BacktrackingDirective(BacktrackingDirective {
            kind: Located::new(BacktrackingDirectiveKind::Skip, dummy_span()),
            name: Some(Located::new("here".to_string(), dummy_span())),
        }),
        dummy_span(),
    ));
    assert_eq!(directive.dump(), "(*SKIP:here)");

    let callout = Node::Atom(Atom::new(
        AtomKind::Callout(Callout::Number(3)),
        dummy_span(),
    ));
    assert_eq!(callout.dump(), "(?C3)");
}
