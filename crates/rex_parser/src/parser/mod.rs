// rex_parser/parser - Recursive descent over the regex grammar
//
//   Regex           := GlobalMatchingOption* RecursiveRegex
//   RecursiveRegex  := ε | Alternation
//   Alternation     := Concatenation ('|' Concatenation)*
//   Concatenation   := ConcatComponent*
//   ConcatComponent := Trivia | Quote | Quantification
//   Quantification  := QuantOperand Quantifier?
//   QuantOperand    := Conditional | AbsentFunction | Group
//                    | CustomCharClass | Atom
//
// The parser owns the `ParsingContext`; the lexer reads it. Errors are
// fatal and located; no recovery, no partial trees.

use rex_ast::node::{AbsentKind, ConditionKind, Node};
use rex_ast::{
    Atom, AtomKind, ClassMember, ClassRange, ClassStart, CustomClass, GroupKind, Located,
    Position, Span,
};

use crate::context::{ParsingContext, SyntaxOptions};
use crate::error::{ParseError, ParseErrorKind, Result};
use crate::lexer;
use crate::source::Source;

pub(crate) struct Parser<'src> {
    src: Source<'src>,
    ctx: ParsingContext,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(input: &'src str, syntax: SyntaxOptions) -> Self {
        Self {
            src: Source::new(input),
            ctx: ParsingContext::new(syntax),
        }
    }

    /// Parse the whole input. A stray `)` is the classic unbalanced-group
    /// error; anything else left over is a bug in the grammar.
    pub(crate) fn parse_complete(mut self) -> Result<Node> {
        let start = self.src.position();
        let mut options = Vec::new();
        while let Some(option) = lexer::group::lex_global_matching_option(&mut self.src)? {
            options.push(option);
        }
        let body = self.parse_regex()?;
        if let Some(span) = self.src.try_eat_located(')') {
            return Err(ParseError::new(ParseErrorKind::UnbalancedEndOfGroup, span));
        }
        debug_assert!(self.src.is_empty(), "parser must consume the whole input");
        if options.is_empty() {
            Ok(body)
        } else {
            let span = Span::new(start, self.src.position());
            Ok(Node::GlobalOptions {
                options,
                child: Box::new(body),
                span,
            })
        }
    }

    /// Alternation level; single branches collapse to the branch itself.
    fn parse_regex(&mut self) -> Result<Node> {
        let start = self.src.position();
        let mut children = vec![self.parse_concatenation()?];
        let mut pipes = Vec::new();
        while let Some(pipe) = self.src.try_eat_located('|') {
            pipes.push(pipe);
            children.push(self.parse_concatenation()?);
        }
        if children.len() == 1 {
            return Ok(children.pop().expect("one child"));
        }
        Ok(Node::Alternation {
            children,
            pipes,
            span: self.src.span_from(start),
        })
    }

    fn parse_concatenation(&mut self) -> Result<Node> {
        let start = self.src.position();
        let mut children = Vec::new();
        loop {
            match self.src.peek() {
                None | Some('|') | Some(')') => break,
                _ => {}
            }
            if let Some((contents, span)) = lexer::trivia::lex_trivia(&mut self.src, &self.ctx)? {
                children.push(Node::Trivia { contents, span });
                continue;
            }
            if let Some((literal, span)) = lexer::trivia::lex_quote(&mut self.src)? {
                children.push(Node::Quote { literal, span });
                continue;
            }
            children.push(self.parse_quantification()?);
        }
        match children.len() {
            0 => Ok(Node::Empty {
                span: Span::empty_at(start),
            }),
            1 => Ok(children.pop().expect("one child")),
            _ => Ok(Node::Concatenation {
                children,
                span: self.src.span_from(start),
            }),
        }
    }

    fn parse_quantification(&mut self) -> Result<Node> {
        let start = self.src.position();

        // A quantifier with no operand to its left.
        if let Some((amount, _)) = lexer::quantifier::lex_quantifier(&mut self.src)? {
            return Err(ParseError::new(ParseErrorKind::NotQuantifiable, amount.span));
        }

        let operand = self.parse_operand()?;
        // A quantifier may be separated from its operand by comments or, in
        // extended modes, whitespace. If none follows, the trivia is given
        // back to the concatenation.
        let before_trivia = self.src.checkpoint();
        while lexer::trivia::lex_trivia(&mut self.src, &self.ctx)?.is_some() {}
        if let Some((amount, kind)) = lexer::quantifier::lex_quantifier(&mut self.src)? {
            if !operand.is_quantifiable() {
                return Err(ParseError::new(ParseErrorKind::NotQuantifiable, amount.span));
            }
            return Ok(Node::Quantification {
                amount,
                kind,
                operand: Box::new(operand),
                span: self.src.span_from(start),
            });
        }
        self.src.rewind(before_trivia);
        Ok(operand)
    }

    fn parse_operand(&mut self) -> Result<Node> {
        let start = self.src.position();

        if let Some(condition) = lexer::group::lex_known_conditional_start(&mut self.src)? {
            return self.parse_conditional_branches(condition, start);
        }
        if self.src.starts_with("(?(") {
            return self.parse_group_conditional(start);
        }
        if let Some((opener, has_pipe)) = lexer::group::lex_absent_function_start(&mut self.src) {
            return self.parse_absent_function(opener, has_pipe, start);
        }
        if let Some(atom) = lexer::group::lex_group_like_atom(&mut self.src, &self.ctx)? {
            return Ok(Node::Atom(atom));
        }
        if let Some(kind) = lexer::group::lex_group_start(&mut self.src, &self.ctx)? {
            return self.parse_group(kind, start);
        }
        if let Some(class_start) = lexer::class::lex_custom_cc_start(&mut self.src)? {
            return self.parse_custom_class(class_start, start);
        }
        if let Some(atom) = lexer::lex_atom(&mut self.src, &self.ctx)? {
            return Ok(Node::Atom(atom));
        }
        Err(ParseError::new(
            ParseErrorKind::UnexpectedEndOfInput,
            self.src.here(),
        ))
    }

    /// The body of a group whose opener has been lexed. Numbering is
    /// recorded at the opening delimiter, before the body parses, so nested
    /// back-references see the right count. Syntax-changing options (from
    /// both scoped and isolated option groups inside the body) are restored
    /// at the closer.
    fn parse_group(&mut self, kind: Located<GroupKind>, start: Position) -> Result<Node> {
        self.ctx.record_group(&kind.value);

        if kind.value.has_implicit_scope() {
            // Isolated `(?i)`: the opener is the whole construct and its
            // scope runs to the end of the enclosing group.
            if let GroupKind::ChangeMatchingOptions(sequence) = &kind.value {
                self.ctx.apply_matching_options(sequence);
            }
            let span = self.src.span_from(start);
            return Ok(Node::Group {
                kind,
                child: Box::new(Node::Empty {
                    span: self.src.here(),
                }),
                span,
            });
        }

        let saved_syntax = self.ctx.syntax;
        if let GroupKind::ChangeMatchingOptions(sequence) = &kind.value {
            self.ctx.apply_matching_options(sequence);
        }
        let child = self.parse_regex()?;
        self.ctx.syntax = saved_syntax;
        if !self.src.try_eat(')') {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedGroupCloser,
                self.src.next_char_span(),
            ));
        }
        Ok(Node::Group {
            kind,
            child: Box::new(child),
            span: self.src.span_from(start),
        })
    }

    /// `(?(` followed by a group: the group itself is the condition.
    fn parse_group_conditional(&mut self, start: Position) -> Result<Node> {
        let question = self.src.try_eat_str_located("(?");
        debug_assert!(question.is_some(), "caller checked the prefix");
        let condition_start = self.src.position();
        let Some(kind) = lexer::group::lex_group_start(&mut self.src, &self.ctx)? else {
            return Err(ParseError::new(
                ParseErrorKind::UnknownConditionalStart,
                self.src.span_from(start),
            ));
        };
        let group = self.parse_group(kind, condition_start)?;
        let condition_span = Span::new(start, self.src.position());
        let condition = Located::new(ConditionKind::Group(Box::new(group)), condition_span);
        self.parse_conditional_branches(condition, start)
    }

    /// The then/else body shared by all conditional forms. A two-branch
    /// alternation splits; more branches than that is an error; anything
    /// else is the true branch with an empty false branch.
    fn parse_conditional_branches(
        &mut self,
        condition: Located<ConditionKind>,
        start: Position,
    ) -> Result<Node> {
        let body = self.parse_regex()?;
        if !self.src.try_eat(')') {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedConditionalCloser,
                self.src.next_char_span(),
            ));
        }
        let span = self.src.span_from(start);
        let (true_branch, pipe, false_branch) = match body {
            Node::Alternation {
                mut children,
                pipes,
                ..
            } => {
                if children.len() > 2 {
                    return Err(ParseError::new(
                        ParseErrorKind::TooManyBranchesInConditional(children.len()),
                        span,
                    ));
                }
                let false_branch = children.pop().expect("two children");
                let true_branch = children.pop().expect("two children");
                (true_branch, Some(pipes[0]), false_branch)
            }
            other => {
                let empty = Node::Empty {
                    span: Span::empty_at(other.span().end),
                };
                (other, None, empty)
            }
        };
        Ok(Node::Conditional {
            condition,
            true_branch: Box::new(true_branch),
            pipe,
            false_branch: Box::new(false_branch),
            span,
        })
    }

    /// Oniguruma absent functions. The pipe form shapes the body: empty is
    /// a clearer, one branch a stopper, two an expression, more an error.
    fn parse_absent_function(
        &mut self,
        opener: Span,
        has_pipe: bool,
        start: Position,
    ) -> Result<Node> {
        let body = self.parse_regex()?;
        if !self.src.try_eat(')') {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedGroupCloser,
                self.src.next_char_span(),
            ));
        }
        let span = self.src.span_from(start);
        let kind = if has_pipe {
            match body {
                Node::Empty { .. } => AbsentKind::Clearer,
                Node::Alternation {
                    mut children,
                    pipes,
                    ..
                } => {
                    if children.len() > 2 {
                        return Err(ParseError::new(
                            ParseErrorKind::TooManyAbsentExpressionChildren(children.len()),
                            span,
                        ));
                    }
                    let child = children.pop().expect("two children");
                    let absentee = children.pop().expect("two children");
                    AbsentKind::Expression {
                        absentee: Box::new(absentee),
                        pipe: pipes[0],
                        child: Box::new(child),
                    }
                }
                other => AbsentKind::Stopper(Box::new(other)),
            }
        } else {
            AbsentKind::Repeater(Box::new(body))
        };
        Ok(Node::AbsentFunction {
            kind,
            start: opener,
            span,
        })
    }

    /// `[…]` with ranges, nested classes, and left-associative set
    /// operations. The in-class flag flips what the lexer recognizes and is
    /// restored on the way out.
    fn parse_custom_class(
        &mut self,
        class_start: Located<ClassStart>,
        start: Position,
    ) -> Result<Node> {
        let was_in_class = self.ctx.in_custom_character_class;
        self.ctx.in_custom_character_class = true;
        let result = self.parse_custom_class_body(class_start, start);
        self.ctx.in_custom_character_class = was_in_class;
        result
    }

    fn parse_custom_class_body(
        &mut self,
        class_start: Located<ClassStart>,
        start: Position,
    ) -> Result<Node> {
        let mut members = Vec::new();
        let mut first = true;
        loop {
            match self.src.peek() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::Expected(']'),
                        self.src.here(),
                    ))
                }
                Some(']') => {
                    // A leading `]` is a literal member except under
                    // ECMAScript, where `[]` is a legal empty class.
                    if first && !self.ctx.syntax.allows_empty_class() {
                        let span = self.src.try_eat_located(']').expect("peeked");
                        members.push(ClassMember::Atom(Atom::new(
                            AtomKind::Char(']'),
                            span,
                        )));
                        first = false;
                        continue;
                    }
                    break;
                }
                _ => {}
            }
            if let Some(op) = lexer::class::lex_custom_cc_binop(&mut self.src, &self.ctx)? {
                if members.iter().all(ClassMember::is_trivia) {
                    return Err(ParseError::new(
                        ParseErrorKind::ExpectedCustomCharacterClassMembers,
                        op.span,
                    ));
                }
                let rhs = self.parse_class_operand(op.span)?;
                members = vec![ClassMember::SetOperation {
                    lhs: members,
                    op,
                    rhs,
                }];
                continue;
            }
            members.push(self.parse_class_member()?);
            first = false;
        }
        self.src.expect(']')?;
        Ok(Node::CustomClass(CustomClass {
            start: class_start,
            members,
            span: self.src.span_from(start),
        }))
    }

    /// One side of a set operation: members up to `]` or the next operator.
    fn parse_class_operand(&mut self, op_span: Span) -> Result<Vec<ClassMember>> {
        let mut members = Vec::new();
        loop {
            match self.src.peek() {
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::Expected(']'),
                        self.src.here(),
                    ))
                }
                Some(']') => break,
                _ => {}
            }
            if lexer::class::peek_custom_cc_binop(&self.src, &self.ctx) {
                break;
            }
            members.push(self.parse_class_member()?);
        }
        if members.iter().all(ClassMember::is_trivia) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedCustomCharacterClassMembers,
                op_span,
            ));
        }
        Ok(members)
    }

    fn parse_class_member(&mut self) -> Result<ClassMember> {
        if let Some((contents, span)) = lexer::trivia::lex_trivia(&mut self.src, &self.ctx)? {
            return Ok(ClassMember::Trivia { contents, span });
        }
        if let Some((literal, span)) = lexer::trivia::lex_quote(&mut self.src)? {
            return Ok(ClassMember::Quote { literal, span });
        }
        if let Some(atom) = lexer::class::lex_posix_class(&mut self.src)? {
            return self.finish_class_atom(atom);
        }
        if self.src.peek() == Some('[') {
            let start = self.src.position();
            let class_start = lexer::class::lex_custom_cc_start(&mut self.src)?
                .expect("peeked an opening bracket");
            let nested = self.parse_custom_class(class_start, start)?;
            match nested {
                Node::CustomClass(class) => return Ok(ClassMember::Nested(class)),
                _ => unreachable!("custom class parse returns a class"),
            }
        }
        let Some(atom) = lexer::lex_atom(&mut self.src, &self.ctx)? else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEndOfInput,
                self.src.here(),
            ));
        };
        self.finish_class_atom(atom)
    }

    /// Attach a trailing `-X` range to a freshly lexed atom. Both endpoints
    /// must denote single characters; `[a-\d]` and friends are rejected.
    fn finish_class_atom(&mut self, atom: Atom) -> Result<ClassMember> {
        let Some((dash, rhs)) = lexer::class::lex_custom_cc_range_end(&mut self.src, &self.ctx)?
        else {
            return Ok(ClassMember::Atom(atom));
        };
        if atom.literal_char_value().is_none() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidCharacterClassRangeOperand,
                atom.span,
            ));
        }
        if rhs.literal_char_value().is_none() {
            return Err(ParseError::new(
                ParseErrorKind::InvalidCharacterClassRangeOperand,
                rhs.span,
            ));
        }
        Ok(ClassMember::Range(ClassRange {
            lhs: atom,
            dash,
            rhs,
        }))
    }
}
