// rex_ast/children - Structural traversal helpers
//
// The child listing is an exhaustive match over the variants; nothing here
// relies on runtime type tests. A node's children are exactly the sub-nodes
// its variant definition names, in source order.

use crate::class::ClassMember;
use crate::node::{AbsentKind, ConditionKind, Node};

impl Node {
    /// The direct child nodes of this node, in source order. Leaf variants
    /// return an empty list. The condition group of a conditional counts as
    /// a child; class members do not (they are not `Node`s).
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Alternation { children, .. } | Node::Concatenation { children, .. } => {
                children.iter().collect()
            }
            Node::Group { child, .. } => vec![child],
            Node::Conditional {
                condition,
                true_branch,
                false_branch,
                ..
            } => {
                let mut children = Vec::with_capacity(3);
                if let ConditionKind::Group(group) = &condition.value {
                    children.push(group.as_ref());
                }
                children.push(true_branch.as_ref());
                children.push(false_branch.as_ref());
                children
            }
            Node::Quantification { operand, .. } => vec![operand],
            Node::GlobalOptions { child, .. } => vec![child],
            Node::AbsentFunction { kind, .. } => match kind {
                AbsentKind::Repeater(child) | AbsentKind::Stopper(child) => vec![child],
                AbsentKind::Expression {
                    absentee, child, ..
                } => vec![absentee, child],
                AbsentKind::Clearer => Vec::new(),
            },
            Node::Quote { .. }
            | Node::Trivia { .. }
            | Node::Atom(_)
            | Node::CustomClass(_)
            | Node::Empty { .. } => Vec::new(),
        }
    }

    /// Remove every `Trivia` node from the tree. Concatenations that lose
    /// children collapse the way the parser builds them: one survivor is
    /// returned directly, none becomes `Empty`.
    pub fn strip_trivia(self) -> Node {
        match self {
            Node::Alternation {
                children,
                pipes,
                span,
            } => Node::Alternation {
                children: children.into_iter().map(Node::strip_trivia).collect(),
                pipes,
                span,
            },
            Node::Concatenation { children, span } => {
                let mut stripped: Vec<Node> = children
                    .into_iter()
                    .filter(|child| !child.is_trivia())
                    .map(Node::strip_trivia)
                    .collect();
                match stripped.len() {
                    0 => Node::Empty { span },
                    1 => stripped.pop().expect("length checked"),
                    _ => Node::Concatenation {
                        children: stripped,
                        span,
                    },
                }
            }
            Node::Group { kind, child, span } => Node::Group {
                kind,
                child: Box::new(child.strip_trivia()),
                span,
            },
            Node::Conditional {
                condition,
                true_branch,
                pipe,
                false_branch,
                span,
            } => Node::Conditional {
                condition: condition.map(|kind| match kind {
                    ConditionKind::Group(group) => {
                        ConditionKind::Group(Box::new(group.strip_trivia()))
                    }
                    other => other,
                }),
                true_branch: Box::new(true_branch.strip_trivia()),
                pipe,
                false_branch: Box::new(false_branch.strip_trivia()),
                span,
            },
            Node::Quantification {
                amount,
                kind,
                operand,
                span,
            } => Node::Quantification {
                amount,
                kind,
                operand: Box::new(operand.strip_trivia()),
                span,
            },
            Node::Trivia { span, .. } => Node::Empty { span },
            Node::CustomClass(mut class) => {
                class.members = strip_member_trivia(class.members);
                Node::CustomClass(class)
            }
            Node::GlobalOptions {
                options,
                child,
                span,
            } => Node::GlobalOptions {
                options,
                child: Box::new(child.strip_trivia()),
                span,
            },
            Node::AbsentFunction { kind, start, span } => {
                let kind = match kind {
                    AbsentKind::Repeater(child) => {
                        AbsentKind::Repeater(Box::new(child.strip_trivia()))
                    }
                    AbsentKind::Expression {
                        absentee,
                        pipe,
                        child,
                    } => AbsentKind::Expression {
                        absentee: Box::new(absentee.strip_trivia()),
                        pipe,
                        child: Box::new(child.strip_trivia()),
                    },
                    AbsentKind::Stopper(child) => {
                        AbsentKind::Stopper(Box::new(child.strip_trivia()))
                    }
                    AbsentKind::Clearer => AbsentKind::Clearer,
                };
                Node::AbsentFunction { kind, start, span }
            }
            leaf @ (Node::Quote { .. } | Node::Atom(_) | Node::Empty { .. }) => leaf,
        }
    }
}

fn strip_member_trivia(members: Vec<ClassMember>) -> Vec<ClassMember> {
    members
        .into_iter()
        .filter(|member| !member.is_trivia())
        .map(|member| match member {
            ClassMember::Nested(mut class) => {
                class.members = strip_member_trivia(class.members);
                ClassMember::Nested(class)
            }
            ClassMember::SetOperation { lhs, op, rhs } => ClassMember::SetOperation {
                lhs: strip_member_trivia(lhs),
                op,
                rhs: strip_member_trivia(rhs),
            },
            other => other,
        })
        .collect()
}
