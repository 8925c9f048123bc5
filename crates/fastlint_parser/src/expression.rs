//! The expression sub-parser.
//!
//! Builds arena-allocated expression trees without emitting variable
//! events; `visit_expression` walks a completed tree afterwards, emitting
//! use/assignment events in evaluation order. Binary operator runs are
//! kept flat (one node, many children); a linter needs operand identity,
//! not re-associated precedence trees.

use fastlint_ast::expression::{Expression, FunctionAttributes, ObjectEntry};
use fastlint_ast::visitor::{BufferingVisitor, ParseVisitor, VarInitKind, VarKind};
use fastlint_core::text::Span;
use fastlint_diagnostics::Diag;
use fastlint_lexer::{Token, TokenKind};

use crate::parser::Parser;
use crate::precedence::Precedence;
use crate::ParseResult;

/// Whether an expression appears as an assignment target or as a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VariableContext {
    Lhs,
    Rhs,
}

impl<'a, 'src> Parser<'a, 'src> {
    pub(crate) fn parse_and_visit_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        self.parse_and_visit_expression_prec(v, Precedence::default())
    }

    pub(crate) fn parse_and_visit_expression_prec<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        prec: Precedence,
    ) -> ParseResult<()> {
        let ast = self.parse_expression(v, prec)?;
        self.visit_expression(ast, v, VariableContext::Rhs);
        Ok(())
    }

    pub(crate) fn parse_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        self.with_depth(|p| {
            let ast = p.parse_primary_expression(v, prec)?;
            p.parse_expression_remainder(v, ast, prec)
        })
    }

    // ========================================================================
    // Primary expressions
    // ========================================================================

    fn parse_primary_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        let token = *self.peek();
        match token.kind {
            Number | String | KwTrue | KwFalse | KwNull | KwThis => {
                self.skip();
                Ok(self.alloc(Expression::Literal { span: token.span() }))
            }

            // A '/' in expression position begins a regexp literal.
            Slash | SlashEqual => {
                self.lexer.reparse_as_regexp();
                let regexp = *self.peek();
                self.skip();
                Ok(self.alloc(Expression::Literal {
                    span: regexp.span(),
                }))
            }

            CompleteTemplate => {
                self.skip();
                Ok(self.alloc(Expression::Template {
                    substitutions: &[],
                    span: token.span(),
                }))
            }
            IncompleteTemplate => self.parse_template(v),

            KwSuper => {
                self.skip();
                Ok(self.alloc(Expression::Super { span: token.span() }))
            }

            KwImport => {
                self.skip();
                Ok(self.alloc(Expression::Import { span: token.span() }))
            }

            KwAsync => {
                self.skip();
                self.parse_async_expression(v, &token, prec)
            }

            KwAwait => {
                self.skip();
                self.parse_await_expression(v, &token)
            }

            KwYield => self.parse_yield_expression(v, prec),

            KwFunction => self.parse_function_expression(v, FunctionAttributes::Normal, token.begin),

            KwClass => {
                self.parse_and_visit_class(v, crate::parser::NameRequirement::Optional)?;
                Ok(self.alloc(Expression::Class {
                    span: Span::new(token.begin, self.lexer.end_of_previous_token()),
                }))
            }

            KwNew => self.parse_new_expression(v),

            KwDelete => {
                self.skip();
                let child = self.parse_binary_operand(v, prec)?;
                Ok(self.alloc(Expression::Delete {
                    child,
                    operator: token.span(),
                }))
            }
            KwTypeof => {
                self.skip();
                let child = self.parse_binary_operand(v, prec)?;
                Ok(self.alloc(Expression::Typeof {
                    child,
                    operator: token.span(),
                }))
            }
            KwVoid | Bang | Tilde | Plus | Minus => {
                self.skip();
                let child = self.parse_binary_operand(v, prec)?;
                Ok(self.alloc(Expression::UnaryOperator {
                    child,
                    operator: token.span(),
                }))
            }

            PlusPlus | MinusMinus => {
                self.skip();
                let child = self.parse_binary_operand(v, prec)?;
                Ok(self.alloc(Expression::RwUnaryPrefix {
                    child,
                    operator: token.span(),
                }))
            }

            DotDotDot => {
                self.skip();
                let child = self.parse_expression(
                    v,
                    Precedence {
                        commas: false,
                        ..prec
                    },
                )?;
                Ok(self.alloc(Expression::Spread {
                    child,
                    operator: token.span(),
                }))
            }

            LeftParen => self.parse_paren_expression(v, prec),
            LeftSquare => self.parse_array_literal(v),
            LeftCurly => self.parse_object_literal(v),

            Less => {
                if self.options.jsx {
                    self.parse_jsx_element(v)
                } else {
                    self.diags.add(Diag::JsxNotAllowed {
                        jsx_start: token.span(),
                    });
                    self.skip();
                    Ok(self.alloc(Expression::Invalid { span: token.span() }))
                }
            }

            PrivateIdentifier => {
                self.skip();
                Ok(self.alloc(Expression::PrivateVariable {
                    name: token.identifier_name(),
                }))
            }

            ReservedKeywordWithEscapeSequence => {
                if let Some(escape) = token.escape_sequence {
                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                        escape_sequence: escape,
                    });
                }
                self.skip();
                Ok(self.alloc(Expression::Variable {
                    name: token.identifier_name(),
                    token_kind: token.kind,
                }))
            }

            kind if kind.is_identifier_like() => {
                self.skip();
                Ok(self.alloc(Expression::Variable {
                    name: token.identifier_name(),
                    token_kind: kind,
                }))
            }

            _ => {
                self.diags.add(Diag::ExpectedExpression {
                    token: token.span(),
                });
                Ok(self.alloc(Expression::Missing {
                    span: Span::empty(token.begin),
                }))
            }
        }
    }

    /// The operand of a unary or binary operator: a primary expression
    /// with member/call suffixes, but no further binary structure.
    fn parse_binary_operand<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        let operand_prec = Precedence {
            commas: false,
            binary_operators: false,
            conditional_operator: false,
            ..prec
        };
        self.with_depth(|p| {
            let ast = p.parse_primary_expression(v, operand_prec)?;
            p.parse_expression_remainder(v, ast, operand_prec)
        })
    }

    // ========================================================================
    // Expression remainder
    // ========================================================================

    pub(crate) fn parse_expression_remainder<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        lhs: &'a Expression<'a>,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        let mut lhs = lhs;
        loop {
            let kind = self.peek().kind;
            match kind {
                kind if prec.binary_operators && self.is_binary_operator_here(kind, prec) => {
                    let mut children = vec![lhs];
                    let mut operator_spans = Vec::new();
                    while self.is_binary_operator_here(self.peek().kind, prec) {
                        let operator_span = self.peek().span();
                        operator_spans.push(operator_span);
                        self.skip();
                        if token_ends_expression(self.peek().kind) {
                            // a + ;
                            self.diags.add(Diag::MissingOperandForOperator {
                                where_: operator_span,
                            });
                            children.push(self.alloc(Expression::Missing {
                                span: Span::empty(self.peek().begin),
                            }));
                            break;
                        }
                        children.push(self.parse_binary_operand(v, prec)?);
                    }
                    lhs = self.alloc(Expression::BinaryOperator {
                        children: self.alloc_expressions(children),
                        operator_spans: self.alloc_spans(operator_spans),
                    });
                }

                Equal if prec.binary_operators => {
                    let operator = self.peek().span();
                    self.skip();
                    let rhs = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..prec
                        },
                    )?;
                    self.check_assignment_target(lhs, operator);
                    lhs = self.alloc(Expression::Assignment { lhs, rhs, operator });
                }

                // `/=` lexes apart from the other compound assignments
                // because a leading `/` may begin a regexp; in remainder
                // position it is an ordinary compound assignment.
                kind if prec.binary_operators
                    && (kind.is_compound_assignment_operator() || kind == SlashEqual) =>
                {
                    let operator = self.peek().span();
                    self.skip();
                    let rhs = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..prec
                        },
                    )?;
                    self.check_assignment_target(lhs, operator);
                    lhs = self.alloc(Expression::CompoundAssignment { lhs, rhs, operator });
                }

                kind if prec.binary_operators && kind.is_conditional_assignment_operator() => {
                    let operator = self.peek().span();
                    self.skip();
                    let rhs = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..prec
                        },
                    )?;
                    self.check_assignment_target(lhs, operator);
                    lhs = self.alloc(Expression::ConditionalAssignment { lhs, rhs, operator });
                }

                Dot | QuestionDot => {
                    let dot_span = self.peek().span();
                    self.skip();
                    match self.peek().kind {
                        next if next == Identifier
                            || next == PrivateIdentifier
                            || next.is_keyword() =>
                        {
                            let field = self.peek().identifier_name();
                            self.skip();
                            lhs = self.alloc(Expression::Dot { object: lhs, field });
                        }
                        LeftParen if kind == QuestionDot => {
                            // a?.(b)
                            let left_paren = self.peek().span();
                            let (arguments, span_end) = self.parse_call_arguments(v)?;
                            lhs = self.alloc(Expression::Call {
                                callee: lhs,
                                arguments,
                                left_paren,
                                span_end,
                            });
                        }
                        LeftSquare if kind == QuestionDot => {
                            // a?.[b]
                            lhs = self.parse_index_suffix(v, lhs)?;
                        }
                        _ => {
                            self.diags
                                .add(Diag::MissingPropertyNameForDotOperator { dot: dot_span });
                            let field = fastlint_lexer::Identifier::new(
                                Span::empty(dot_span.end),
                                self.interner().intern_static(""),
                            );
                            lhs = self.alloc(Expression::Dot { object: lhs, field });
                        }
                    }
                }

                LeftParen => {
                    let left_paren = self.peek().span();
                    let (arguments, span_end) = self.parse_call_arguments(v)?;
                    lhs = self.alloc(Expression::Call {
                        callee: lhs,
                        arguments,
                        left_paren,
                        span_end,
                    });
                }

                LeftSquare => {
                    lhs = self.parse_index_suffix(v, lhs)?;
                }

                PlusPlus | MinusMinus => {
                    if self.peek().has_leading_newline {
                        // ASI: the operator begins the next statement.
                        return Ok(lhs);
                    }
                    let operator = self.peek().span();
                    self.skip();
                    lhs = self.alloc(Expression::RwUnarySuffix {
                        child: lhs,
                        operator,
                    });
                }

                Bang => {
                    // TypeScript non-null assertion.
                    if !self.options.typescript || self.peek().has_leading_newline {
                        return Ok(lhs);
                    }
                    let bang = self.peek().span();
                    self.skip();
                    lhs = self.alloc(Expression::NonNullAssertion { child: lhs, bang });
                }

                Question if prec.conditional_operator => {
                    let question = self.peek().span();
                    self.skip();
                    let branch_prec = Precedence {
                        commas: false,
                        colon_type_annotation: false,
                        ..prec
                    };
                    let true_branch = self.parse_expression(v, branch_prec)?;
                    if self.peek().kind == Colon {
                        self.skip();
                    } else {
                        self.diags
                            .add(Diag::MissingColonInConditionalExpression { question });
                    }
                    let false_branch = self.parse_expression(v, branch_prec)?;
                    lhs = self.alloc(Expression::Conditional {
                        condition: lhs,
                        true_branch,
                        false_branch,
                    });
                }

                Colon if prec.colon_type_annotation => {
                    let colon = self.peek().span();
                    if !self.options.typescript {
                        self.diags
                            .add(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript {
                                type_colon: colon,
                            });
                    }
                    self.skip();
                    let mut type_visits = BufferingVisitor::new();
                    self.parse_and_visit_type_expression(&mut type_visits)?;
                    let type_visits = self.alloc_events(type_visits.events());
                    lhs = self.alloc(Expression::TypeAnnotated {
                        child: lhs,
                        colon,
                        type_visits,
                        span_end: self.lexer.end_of_previous_token(),
                    });
                }

                // x => x * 2
                EqualGreater => {
                    self.skip();
                    let params = self.arrow_parameters_from(lhs);
                    lhs = self.parse_arrow_function_body(
                        v,
                        params,
                        FunctionAttributes::Normal,
                        lhs.span().begin,
                        prec,
                    )?;
                }

                // String.raw`hello`
                CompleteTemplate => {
                    let end = self.peek().end;
                    self.skip();
                    lhs = self.alloc(Expression::TaggedTemplateLiteral {
                        tag: lhs,
                        substitutions: &[],
                        span_end: end,
                    });
                }
                IncompleteTemplate => {
                    let template = self.parse_template(v)?;
                    let (substitutions, span_end) = match template {
                        Expression::Template {
                            substitutions,
                            span,
                        } => (*substitutions, span.end),
                        _ => (&[][..], self.lexer.end_of_previous_token()),
                    };
                    lhs = self.alloc(Expression::TaggedTemplateLiteral {
                        tag: lhs,
                        substitutions,
                        span_end,
                    });
                }

                // value as Type
                KwAs if self.options.typescript && prec.binary_operators => {
                    self.skip();
                    self.parse_and_visit_type_expression(v)?;
                }

                _ => return Ok(lhs),
            }
        }
    }

    fn is_binary_operator_here(&self, kind: TokenKind, prec: Precedence) -> bool {
        use TokenKind::*;
        kind.is_binary_only_operator()
            || matches!(kind, Plus | Minus | Slash)
            || (kind == KwIn && prec.in_operator)
            || (kind == Comma && prec.commas)
    }

    fn check_assignment_target(&mut self, lhs: &Expression<'a>, operator: Span) {
        let ok = matches!(
            lhs,
            Expression::Variable { .. }
                | Expression::Dot { .. }
                | Expression::Index { .. }
                | Expression::Array { .. }
                | Expression::Object { .. }
                | Expression::Paren { .. }
                | Expression::NonNullAssertion { .. }
                | Expression::TypeAnnotated { .. }
                | Expression::PrivateVariable { .. }
                | Expression::Missing { .. }
                | Expression::Invalid { .. }
        );
        if !ok {
            self.diags
                .add(Diag::InvalidExpressionLeftOfAssignment { where_: operator });
        }
    }

    fn parse_index_suffix<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        object: &'a Expression<'a>,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftSquare);
        let left_square = self.peek().span();
        self.skip();
        if self.peek().kind == RightSquare {
            // a[]
            self.diags.add(Diag::ExpectedExpression {
                token: self.peek().span(),
            });
            let span_end = self.peek().end;
            self.skip();
            let index = self.alloc(Expression::Missing {
                span: Span::empty(left_square.end),
            });
            return Ok(self.alloc(Expression::Index {
                object,
                index,
                span_end,
            }));
        }
        let index = self.parse_expression(v, Precedence::default())?;
        let span_end = match self.peek().kind {
            RightSquare => {
                let end = self.peek().end;
                self.skip();
                end
            }
            _ => {
                self.diags
                    .add(Diag::UnmatchedIndexingBracket { left_square });
                self.lexer.end_of_previous_token()
            }
        };
        Ok(self.alloc(Expression::Index {
            object,
            index,
            span_end,
        }))
    }

    fn parse_call_arguments<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<(&'a [&'a Expression<'a>], u32)> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftParen);
        let left_paren = self.peek().span();
        self.skip();
        let mut arguments = Vec::new();
        loop {
            match self.peek().kind {
                RightParen => {
                    let end = self.peek().end;
                    self.skip();
                    return Ok((self.alloc_expressions(arguments), end));
                }
                EndOfFile => {
                    self.diags.add(Diag::UnclosedCall { left_paren });
                    return Ok((
                        self.alloc_expressions(arguments),
                        self.lexer.end_of_previous_token(),
                    ));
                }
                Comma => self.skip(),
                _ => {
                    arguments.push(self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..Precedence::default()
                        },
                    )?);
                    match self.peek().kind {
                        Comma | RightParen | EndOfFile => {}
                        _ => {
                            self.diags.add(Diag::UnexpectedToken {
                                token: self.peek().span(),
                            });
                            self.skip();
                        }
                    }
                }
            }
        }
    }

    // ========================================================================
    // Parenthesized expressions and arrow functions
    // ========================================================================

    fn parse_paren_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        _prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftParen);
        let left_paren = *self.peek();
        self.skip();

        if self.peek().kind == RightParen {
            let span = Span::new(left_paren.begin, self.peek().end);
            self.skip();
            return Ok(self.alloc(Expression::ParenEmpty { span }));
        }

        let element_prec = Precedence {
            commas: false,
            colon_type_annotation: true,
            ..Precedence::default()
        };
        let mut children = Vec::new();
        let mut comma_spans = Vec::new();
        let mut trailing_comma: Option<Span> = None;
        loop {
            children.push(self.parse_expression(v, element_prec)?);
            if self.peek().kind == Comma {
                let comma = self.peek().span();
                self.skip();
                if self.peek().kind == RightParen {
                    trailing_comma = Some(comma);
                    break;
                }
                comma_spans.push(comma);
                continue;
            }
            break;
        }

        let end = if self.peek().kind == RightParen {
            let end = self.peek().end;
            self.skip();
            end
        } else {
            self.diags.add(Diag::UnmatchedParenthesis {
                where_: left_paren.span(),
            });
            self.lexer.end_of_previous_token()
        };

        let inner = if children.len() == 1 {
            children[0]
        } else {
            self.alloc(Expression::BinaryOperator {
                children: self.alloc_expressions(children),
                operator_spans: self.alloc_spans(comma_spans),
            })
        };
        let inner = match trailing_comma {
            Some(comma) => {
                let children = match inner {
                    Expression::BinaryOperator { children, .. } => children.to_vec(),
                    _ => vec![inner],
                };
                self.alloc(Expression::TrailingComma {
                    children: self.alloc_expressions(children),
                    comma,
                })
            }
            None => inner,
        };
        Ok(self.alloc(Expression::Paren {
            child: inner,
            span: Span::new(left_paren.begin, end),
        }))
    }

    /// The arrow parameters hiding in an already-parsed left-hand side.
    fn arrow_parameters_from(&self, lhs: &'a Expression<'a>) -> Vec<&'a Expression<'a>> {
        match lhs {
            Expression::ParenEmpty { .. } => Vec::new(),
            Expression::Paren { child, .. } => {
                let child = *child;
                match child {
                    Expression::TrailingComma { children, .. } => children.to_vec(),
                    Expression::BinaryOperator {
                        children,
                        operator_spans,
                    } if self.operator_spans_are_commas(operator_spans) => children.to_vec(),
                    _ => vec![child],
                }
            }
            _ => vec![lhs],
        }
    }

    fn operator_spans_are_commas(&self, operator_spans: &[Span]) -> bool {
        operator_spans
            .iter()
            .all(|span| &self.lexer.source()[span.to_range()] == ",")
    }

    fn parse_arrow_function_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        params: Vec<&'a Expression<'a>>,
        attributes: FunctionAttributes,
        begin: u32,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        v.visit_enter_function_scope();
        let saved = self.enter_function(attributes);
        let result = (|| {
            for param in &params {
                self.visit_binding_element(param, v, VarKind::Parameter, None, VarInitKind::Normal);
            }
            v.visit_enter_function_scope_body();
            if self.peek().kind == TokenKind::LeftCurly {
                if prec.trailing_curly_is_arrow_body {
                    self.parse_and_visit_statement_block_no_scope(v)
                } else {
                    // The brace belongs to the enclosing statement; this
                    // arrow has no body.
                    Ok(())
                }
            } else {
                let body = self.parse_expression(
                    v,
                    Precedence {
                        commas: false,
                        in_operator: prec.in_operator,
                        ..Precedence::default()
                    },
                )?;
                self.visit_expression(body, v, VariableContext::Rhs);
                Ok(())
            }
        })();
        self.restore_function_context(saved);
        v.visit_exit_function_scope();
        result?;
        Ok(self.alloc(Expression::ArrowFunction {
            attributes,
            span: Span::new(begin, self.lexer.end_of_previous_token()),
        }))
    }

    // ========================================================================
    // Literals with structure
    // ========================================================================

    fn parse_array_literal<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftSquare);
        let left_square = *self.peek();
        self.skip();
        let mut children = Vec::new();
        loop {
            match self.peek().kind {
                RightSquare => {
                    let end = self.peek().end;
                    self.skip();
                    return Ok(self.alloc(Expression::Array {
                        children: self.alloc_expressions(children),
                        span: Span::new(left_square.begin, end),
                    }));
                }
                EndOfFile => {
                    self.diags.add(Diag::UnclosedArrayLiteral {
                        array_open: left_square.span(),
                    });
                    return Ok(self.alloc(Expression::Array {
                        children: self.alloc_expressions(children),
                        span: Span::new(left_square.begin, self.lexer.end_of_previous_token()),
                    }));
                }
                // Elisions and separators.
                Comma => self.skip(),
                _ => {
                    children.push(self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..Precedence::default()
                        },
                    )?);
                    match self.peek().kind {
                        Comma | RightSquare | EndOfFile => {}
                        _ => {
                            self.diags.add(Diag::UnexpectedToken {
                                token: self.peek().span(),
                            });
                            self.skip();
                        }
                    }
                }
            }
        }
    }

    fn parse_object_literal<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftCurly);
        let left_curly = *self.peek();
        self.skip();
        let mut entries: Vec<ObjectEntry<'a>> = Vec::new();
        let end;
        'entries: loop {
            match self.peek().kind {
                RightCurly => {
                    end = self.peek().end;
                    self.skip();
                    break 'entries;
                }
                EndOfFile => {
                    self.diags.add(Diag::UnclosedObjectLiteral {
                        object_open: left_curly.span(),
                    });
                    end = self.lexer.end_of_previous_token();
                    break 'entries;
                }
                Comma => {
                    self.skip();
                    continue 'entries;
                }
                // {...rest}
                DotDotDot => {
                    let value = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..Precedence::default()
                        },
                    )?;
                    entries.push(ObjectEntry {
                        property: None,
                        value,
                        init: None,
                    });
                }
                _ => {
                    let entry = self.parse_object_literal_entry(v)?;
                    entries.push(entry);
                }
            }
            match self.peek().kind {
                Comma | RightCurly | EndOfFile => {}
                _ => {
                    self.diags.add(Diag::MissingCommaBetweenObjectLiteralEntries {
                        where_: self.end_of_previous_token_span(),
                    });
                }
            }
        }
        Ok(self.alloc(Expression::Object {
            entries: self.arena.alloc_slice_copy(&entries),
            span: Span::new(left_curly.begin, end),
        }))
    }

    fn end_of_previous_token_span(&self) -> Span {
        Span::empty(self.lexer.end_of_previous_token())
    }

    fn parse_object_literal_entry<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<ObjectEntry<'a>> {
        use TokenKind::*;
        let mut attributes = FunctionAttributes::Normal;

        // async method / generator method modifiers.
        if self.peek().kind == KwAsync {
            let transaction = self.lexer.begin_transaction();
            self.skip();
            if matches!(self.peek().kind, Colon | Comma | RightCurly | LeftParen | Equal) {
                // 'async' is the property name.
                self.lexer.roll_back_transaction(transaction);
            } else {
                self.lexer.commit_transaction(transaction);
                attributes = FunctionAttributes::Async;
            }
        }
        if self.peek().kind == Star {
            self.skip();
            attributes = match attributes {
                FunctionAttributes::Async => FunctionAttributes::AsyncGenerator,
                _ => FunctionAttributes::Generator,
            };
        }
        // get x() / set x(v) accessors.
        if matches!(self.peek().kind, KwGet | KwSet) {
            let transaction = self.lexer.begin_transaction();
            self.skip();
            if matches!(self.peek().kind, Colon | Comma | RightCurly | LeftParen | Equal) {
                // 'get'/'set' is the property name.
                self.lexer.roll_back_transaction(transaction);
            } else {
                self.lexer.commit_transaction(transaction);
            }
        }

        // The key.
        let key_token = *self.peek();
        let property: Option<&'a Expression<'a>>;
        let key_is_identifier: bool;
        match key_token.kind {
            kind if kind == Identifier || kind.is_keyword() => {
                self.skip();
                property = Some(self.alloc(Expression::Literal {
                    span: key_token.span(),
                }));
                key_is_identifier = true;
            }
            String | Number => {
                self.skip();
                property = Some(self.alloc(Expression::Literal {
                    span: key_token.span(),
                }));
                key_is_identifier = false;
            }
            LeftSquare => {
                self.skip();
                let key = self.parse_expression(v, Precedence::default())?;
                self.expect(RightSquare)?;
                self.skip();
                property = Some(key);
                key_is_identifier = false;
            }
            _ => return Err(self.fail()),
        }

        // What follows the key.
        match self.peek().kind {
            Colon => {
                self.skip();
                let value = self.parse_expression(
                    v,
                    Precedence {
                        commas: false,
                        ..Precedence::default()
                    },
                )?;
                Ok(ObjectEntry {
                    property,
                    value,
                    init: None,
                })
            }
            LeftParen | Less => {
                // A method. Its scopes and body are visited immediately.
                self.parse_and_visit_function_parameters_and_body(
                    v,
                    Some(key_token.span()),
                    attributes,
                )?;
                let value = self.alloc(Expression::Function {
                    attributes,
                    span: Span::new(key_token.begin, self.lexer.end_of_previous_token()),
                });
                Ok(ObjectEntry {
                    property,
                    value,
                    init: None,
                })
            }
            Equal => {
                // Shorthand with default: { key = init } (destructuring).
                self.skip();
                let init = self.parse_expression(
                    v,
                    Precedence {
                        commas: false,
                        ..Precedence::default()
                    },
                )?;
                let value = self.alloc(Expression::Variable {
                    name: key_token.identifier_name(),
                    token_kind: key_token.kind,
                });
                Ok(ObjectEntry {
                    property: None,
                    value,
                    init: Some(init),
                })
            }
            _ => {
                // Shorthand: { key }.
                if !key_is_identifier {
                    self.diags.add(Diag::UnexpectedToken {
                        token: key_token.span(),
                    });
                }
                let value = self.alloc(Expression::Variable {
                    name: key_token.identifier_name(),
                    token_kind: key_token.kind,
                });
                Ok(ObjectEntry {
                    property: None,
                    value,
                    init: None,
                })
            }
        }
    }

    /// Parse a template literal with substitutions; the cursor is at the
    /// `IncompleteTemplate` head.
    fn parse_template<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, IncompleteTemplate);
        let begin = self.peek().begin;
        self.skip();
        let mut substitutions = Vec::new();
        loop {
            substitutions.push(self.parse_expression(v, Precedence::default())?);
            self.expect(RightCurly)?;
            self.lexer.skip_in_template();
            match self.peek().kind {
                CompleteTemplate => {
                    let end = self.peek().end;
                    self.skip();
                    return Ok(self.alloc(Expression::Template {
                        substitutions: self.alloc_expressions(substitutions),
                        span: Span::new(begin, end),
                    }));
                }
                IncompleteTemplate => self.skip(),
                _ => return Err(self.fail()),
            }
        }
    }

    // ========================================================================
    // new / async / await / yield
    // ========================================================================

    fn parse_new_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwNew);
        let new_token = *self.peek();
        self.skip();

        if self.peek().kind == Dot {
            // new.target
            self.skip();
            if self.peek().kind.is_identifier_like() {
                self.skip();
            }
            return Ok(self.alloc(Expression::NewTarget {
                span: Span::new(new_token.begin, self.lexer.end_of_previous_token()),
            }));
        }

        // The callee: member accesses bind tighter than the argument list.
        let operand_prec = Precedence {
            commas: false,
            binary_operators: false,
            conditional_operator: false,
            ..Precedence::default()
        };
        let mut callee = self.parse_primary_expression(v, operand_prec)?;
        loop {
            match self.peek().kind {
                Dot => {
                    let dot_span = self.peek().span();
                    self.skip();
                    match self.peek().kind {
                        kind if kind == Identifier || kind.is_keyword() => {
                            let field = self.peek().identifier_name();
                            self.skip();
                            callee = self.alloc(Expression::Dot {
                                object: callee,
                                field,
                            });
                        }
                        _ => {
                            self.diags
                                .add(Diag::MissingPropertyNameForDotOperator { dot: dot_span });
                            break;
                        }
                    }
                }
                LeftSquare => callee = self.parse_index_suffix(v, callee)?,
                _ => break,
            }
        }

        let (arguments, end) = if self.peek().kind == LeftParen {
            self.parse_call_arguments(v)?
        } else {
            (&[][..], callee.span().end)
        };
        Ok(self.alloc(Expression::New {
            callee,
            arguments,
            span: Span::new(new_token.begin, end),
        }))
    }

    /// `async` was consumed; decide between an async arrow function, a
    /// call of a function named `async`, and a plain variable use.
    pub(crate) fn parse_async_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        async_token: &Token,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        match self.peek().kind {
            // async (x) => y
            // async(x)
            LeftParen => {
                let paren = self.parse_paren_expression(v, prec)?;
                if self.peek().kind == EqualGreater && !self.peek().has_leading_newline {
                    self.skip();
                    let params = self.arrow_parameters_from(paren);
                    self.parse_arrow_function_body(
                        v,
                        params,
                        FunctionAttributes::Async,
                        async_token.begin,
                        prec,
                    )
                } else {
                    let callee = self.alloc(Expression::Variable {
                        name: async_token.identifier_name(),
                        token_kind: TokenKind::KwAsync,
                    });
                    let arguments = self.arrow_parameters_from(paren);
                    let call = self.alloc(Expression::Call {
                        callee,
                        arguments: self.alloc_expressions(arguments),
                        left_paren: paren.span(),
                        span_end: paren.span().end,
                    });
                    self.parse_expression_remainder(v, call, prec)
                }
            }

            // async => body ('async' is the parameter name)
            EqualGreater => {
                self.skip();
                let param = self.alloc(Expression::Variable {
                    name: async_token.identifier_name(),
                    token_kind: TokenKind::KwAsync,
                });
                self.parse_arrow_function_body(
                    v,
                    vec![param],
                    FunctionAttributes::Normal,
                    async_token.begin,
                    prec,
                )
            }

            // async function f() {} (expression position)
            KwFunction if !self.peek().has_leading_newline => {
                self.parse_function_expression(v, FunctionAttributes::Async, async_token.begin)
            }

            // async x => y   or   plain 'async' variable
            kind if kind == KwAwait || kind == KwYield || kind.is_identifier_like() => {
                let transaction = self.lexer.begin_transaction();
                let param_token = *self.peek();
                self.skip();
                if self.peek().kind == EqualGreater && !self.peek().has_leading_newline {
                    self.lexer.commit_transaction(transaction);
                    self.skip();
                    let param = self.alloc(Expression::Variable {
                        name: param_token.identifier_name(),
                        token_kind: param_token.kind,
                    });
                    self.parse_arrow_function_body(
                        v,
                        vec![param],
                        FunctionAttributes::Async,
                        async_token.begin,
                        prec,
                    )
                } else {
                    self.lexer.roll_back_transaction(transaction);
                    let async_variable = self.alloc(Expression::Variable {
                        name: async_token.identifier_name(),
                        token_kind: TokenKind::KwAsync,
                    });
                    self.parse_expression_remainder(v, async_variable, prec)
                }
            }

            _ => {
                let async_variable = self.alloc(Expression::Variable {
                    name: async_token.identifier_name(),
                    token_kind: TokenKind::KwAsync,
                });
                self.parse_expression_remainder(v, async_variable, prec)
            }
        }
    }

    /// `await` was consumed. Inside an async function it is an operator;
    /// elsewhere it is an ordinary variable.
    pub(crate) fn parse_await_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        await_token: &Token,
    ) -> ParseResult<&'a Expression<'a>> {
        if self.in_async_function {
            let child = self.parse_binary_operand(v, Precedence::default())?;
            Ok(self.alloc(Expression::Await {
                child,
                operator: await_token.span(),
            }))
        } else {
            Ok(self.alloc(Expression::Variable {
                name: await_token.identifier_name(),
                token_kind: TokenKind::KwAwait,
            }))
        }
    }

    /// `yield` in a generator is an operator with three arities;
    /// elsewhere it is an ordinary variable.
    fn parse_yield_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        prec: Precedence,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        let yield_token = *self.peek();
        self.skip();
        if !self.in_generator_function {
            return Ok(self.alloc(Expression::Variable {
                name: yield_token.identifier_name(),
                token_kind: TokenKind::KwYield,
            }));
        }
        if self.peek().kind == Star {
            self.skip();
            let child = self.parse_expression(
                v,
                Precedence {
                    commas: false,
                    ..prec
                },
            )?;
            return Ok(self.alloc(Expression::YieldMany {
                child,
                operator: yield_token.span(),
            }));
        }
        let ends_yield = self.peek().has_leading_newline
            || token_ends_expression(self.peek().kind)
            || self.peek().kind == Colon;
        if ends_yield {
            return Ok(self.alloc(Expression::YieldNone {
                span: yield_token.span(),
            }));
        }
        let child = self.parse_expression(
            v,
            Precedence {
                commas: false,
                ..prec
            },
        )?;
        Ok(self.alloc(Expression::YieldOne {
            child,
            operator: yield_token.span(),
        }))
    }

    fn parse_function_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        attributes: FunctionAttributes,
        begin: u32,
    ) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwFunction);
        self.skip();
        let attributes = self.parse_generator_star(attributes);
        let name = match self.peek().kind {
            kind if kind == KwAwait || kind == KwYield || kind.is_identifier_like() => {
                let name = self.peek().identifier_name();
                self.skip();
                Some(name)
            }
            _ => None,
        };
        match name {
            Some(name) => {
                v.visit_enter_named_function_scope(name);
                let result = self.parse_and_visit_function_parameters_and_body_no_scope(
                    v,
                    Some(name.span),
                    attributes,
                );
                v.visit_exit_named_function_scope();
                result?;
                Ok(self.alloc(Expression::NamedFunction {
                    name,
                    attributes,
                    span: Span::new(begin, self.lexer.end_of_previous_token()),
                }))
            }
            None => {
                v.visit_enter_function_scope();
                let result =
                    self.parse_and_visit_function_parameters_and_body_no_scope(v, None, attributes);
                v.visit_exit_function_scope();
                result?;
                Ok(self.alloc(Expression::Function {
                    attributes,
                    span: Span::new(begin, self.lexer.end_of_previous_token()),
                }))
            }
        }
    }

    // ========================================================================
    // JSX (minimal)
    // ========================================================================

    /// A deliberately small JSX parser: enough to skip balanced elements,
    /// visit embedded expressions, and use capitalized component names.
    fn parse_jsx_element<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<&'a Expression<'a>> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, Less);
        let begin = self.peek().begin;
        self.skip();

        let is_fragment = self.peek().kind == Greater;
        if is_fragment {
            self.skip();
        } else {
            // Element name. Capitalized names are component references.
            if self.peek().kind.is_identifier_like() {
                let name_token = *self.peek();
                let text = name_token.text(self.lexer.source());
                if text.chars().next().map(|c| c.is_ascii_uppercase()) == Some(true) {
                    v.visit_variable_use(name_token.identifier_name());
                }
                self.skip();
                while self.peek().kind == Dot {
                    self.skip();
                    if self.peek().kind.is_identifier_like() {
                        self.skip();
                    } else {
                        break;
                    }
                }
            }
            // Attributes.
            loop {
                match self.peek().kind {
                    Greater => {
                        self.skip();
                        break;
                    }
                    Slash => {
                        // Self-closing: <br />
                        self.skip();
                        if self.peek().kind == Greater {
                            self.skip();
                        }
                        return Ok(self.alloc(Expression::JsxElement {
                            span: Span::new(begin, self.lexer.end_of_previous_token()),
                        }));
                    }
                    LeftCurly => {
                        // Spread attributes: {...props}
                        self.skip();
                        self.parse_and_visit_expression(v)?;
                        self.expect(RightCurly)?;
                        self.skip();
                    }
                    EndOfFile => {
                        self.diags.add(Diag::UnclosedCodeBlock {
                            block_open: Span::new(begin, begin + 1),
                        });
                        return Ok(self.alloc(Expression::JsxElement {
                            span: Span::new(begin, self.lexer.end_of_previous_token()),
                        }));
                    }
                    kind if kind.is_identifier_like() || kind == Minus => {
                        self.skip();
                        if self.peek().kind == Equal {
                            self.skip();
                            match self.peek().kind {
                                String => self.skip(),
                                LeftCurly => {
                                    self.skip();
                                    self.parse_and_visit_expression(v)?;
                                    self.expect(RightCurly)?;
                                    self.skip();
                                }
                                Less => {
                                    self.parse_jsx_element(v)?;
                                }
                                _ => return Err(self.fail()),
                            }
                        }
                    }
                    _ => return Err(self.fail()),
                }
            }
        }

        // Children, until the matching closing tag.
        loop {
            match self.peek().kind {
                Less => {
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    if self.peek().kind == Slash {
                        // </name> or </>
                        self.lexer.commit_transaction(transaction);
                        self.skip();
                        while self.peek().kind != Greater && self.peek().kind != EndOfFile {
                            self.skip();
                        }
                        if self.peek().kind == Greater {
                            self.skip();
                        }
                        break;
                    }
                    self.lexer.roll_back_transaction(transaction);
                    self.parse_jsx_element(v)?;
                }
                LeftCurly => {
                    self.skip();
                    if self.peek().kind == RightCurly {
                        self.skip();
                    } else {
                        self.parse_and_visit_expression(v)?;
                        self.expect(RightCurly)?;
                        self.skip();
                    }
                }
                EndOfFile => {
                    self.diags.add(Diag::UnclosedCodeBlock {
                        block_open: Span::new(begin, begin + 1),
                    });
                    break;
                }
                // JSX text lexes as ordinary tokens; skip them.
                _ => self.skip(),
            }
        }

        let span = Span::new(begin, self.lexer.end_of_previous_token());
        Ok(self.alloc(if is_fragment {
            Expression::JsxFragment { span }
        } else {
            Expression::JsxElement { span }
        }))
    }

    // ========================================================================
    // Visiting completed expressions
    // ========================================================================

    /// Emit variable use/assignment events for a completed expression
    /// tree, in evaluation order.
    pub(crate) fn visit_expression<V: ParseVisitor>(
        &mut self,
        ast: &Expression<'a>,
        v: &mut V,
        context: VariableContext,
    ) {
        use Expression::*;
        match ast {
            // Already visited while parsing, or nothing to visit.
            ArrowFunction { .. }
            | Class { .. }
            | Function { .. }
            | Import { .. }
            | Invalid { .. }
            | JsxElement { .. }
            | JsxFragment { .. }
            | Literal { .. }
            | Missing { .. }
            | NamedFunction { .. }
            | NewTarget { .. }
            | ParenEmpty { .. }
            | PrivateVariable { .. }
            | Super { .. }
            | YieldNone { .. } => {}

            Variable { name, .. } => match context {
                VariableContext::Rhs => v.visit_variable_use(*name),
                VariableContext::Lhs => {}
            },

            Paren { child, .. } => self.visit_expression(child, v, context),

            Array { children, .. } | TrailingComma { children, .. } => {
                for child in children.iter() {
                    self.visit_expression(child, v, context);
                }
            }

            Assignment { lhs, rhs, .. } => {
                self.visit_expression(lhs, v, VariableContext::Lhs);
                self.visit_expression(rhs, v, VariableContext::Rhs);
                self.maybe_visit_assignment(lhs, v);
            }

            CompoundAssignment { lhs, rhs, .. } | ConditionalAssignment { lhs, rhs, .. } => {
                // The target is read before it is written.
                self.visit_expression(lhs, v, VariableContext::Rhs);
                self.visit_expression(rhs, v, VariableContext::Rhs);
                self.maybe_visit_assignment(lhs, v);
            }

            Await { child, .. }
            | Delete { child, .. }
            | Spread { child, .. }
            | Typeof { child, .. }
            | UnaryOperator { child, .. }
            | YieldMany { child, .. }
            | YieldOne { child, .. } => {
                self.visit_expression(child, v, VariableContext::Rhs);
            }

            NonNullAssertion { child, .. } => self.visit_expression(child, v, context),

            RwUnaryPrefix { child, .. } | RwUnarySuffix { child, .. } => {
                self.visit_expression(child, v, VariableContext::Rhs);
                self.maybe_visit_assignment(child, v);
            }

            BinaryOperator { children, .. } => {
                for child in children.iter() {
                    self.visit_expression(child, v, VariableContext::Rhs);
                }
            }

            Call {
                callee, arguments, ..
            }
            | New {
                callee, arguments, ..
            } => {
                self.visit_expression(callee, v, VariableContext::Rhs);
                for argument in arguments.iter() {
                    self.visit_expression(argument, v, VariableContext::Rhs);
                }
            }

            Conditional {
                condition,
                true_branch,
                false_branch,
            } => {
                self.visit_expression(condition, v, VariableContext::Rhs);
                self.visit_expression(true_branch, v, VariableContext::Rhs);
                self.visit_expression(false_branch, v, VariableContext::Rhs);
            }

            Dot { object, .. } => self.visit_expression(object, v, VariableContext::Rhs),

            Index { object, index, .. } => {
                self.visit_expression(object, v, VariableContext::Rhs);
                self.visit_expression(index, v, VariableContext::Rhs);
            }

            Object { entries, .. } => {
                for entry in entries.iter() {
                    if let Some(property) = entry.property {
                        self.visit_expression(property, v, VariableContext::Rhs);
                    }
                    if let Some(init) = entry.init {
                        self.visit_expression(init, v, VariableContext::Rhs);
                    }
                    self.visit_expression(entry.value, v, context);
                }
            }

            Template { substitutions, .. } => {
                for substitution in substitutions.iter() {
                    self.visit_expression(substitution, v, VariableContext::Rhs);
                }
            }

            TaggedTemplateLiteral {
                tag, substitutions, ..
            } => {
                self.visit_expression(tag, v, VariableContext::Rhs);
                for substitution in substitutions.iter() {
                    self.visit_expression(substitution, v, VariableContext::Rhs);
                }
            }

            TypeAnnotated {
                child, type_visits, ..
            } => {
                for event in type_visits.iter() {
                    event.replay(v);
                }
                self.visit_expression(child, v, context);
            }
        }
    }

    /// `for (lhs in rhs)` and `for (lhs of rhs)` heads: the target is
    /// visited as an assignment target, then the iterated object, then
    /// the assignment itself.
    pub(crate) fn visit_assignment_expression<V: ParseVisitor>(
        &mut self,
        lhs: &Expression<'a>,
        rhs: &Expression<'a>,
        v: &mut V,
    ) {
        self.visit_expression(lhs, v, VariableContext::Lhs);
        self.visit_expression(rhs, v, VariableContext::Rhs);
        self.maybe_visit_assignment(lhs, v);
    }

    /// Emit assignment events for every variable written by `ast`.
    pub(crate) fn maybe_visit_assignment<V: ParseVisitor>(
        &mut self,
        ast: &Expression<'a>,
        v: &mut V,
    ) {
        use Expression::*;
        match ast {
            Variable { name, .. } => v.visit_variable_assignment(*name),
            Paren { child, .. }
            | NonNullAssertion { child, .. }
            | Spread { child, .. }
            | TypeAnnotated { child, .. } => self.maybe_visit_assignment(child, v),
            Assignment { lhs, .. } => self.maybe_visit_assignment(lhs, v),
            Array { children, .. } | TrailingComma { children, .. } => {
                for child in children.iter() {
                    self.maybe_visit_assignment(child, v);
                }
            }
            Object { entries, .. } => {
                for entry in entries.iter() {
                    self.maybe_visit_assignment(entry.value, v);
                }
            }
            _ => {}
        }
    }
}

/// Tokens that cannot begin an operand.
fn token_ends_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Semicolon | RightParen | RightSquare | RightCurly | Comma | EndOfFile
    )
}
