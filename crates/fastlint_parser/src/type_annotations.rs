//! TypeScript type expressions.
//!
//! The statement parser delegates every type position here. Named types
//! are reported as type uses; the grammar covered is the subset a linter
//! must see through: unions/intersections, generics, object and function
//! types, tuples, literal types, `keyof`/`typeof`/`readonly` prefixes,
//! array/indexed-access suffixes, and conditional types.

use fastlint_ast::visitor::ParseVisitor;
use fastlint_diagnostics::Diag;
use fastlint_lexer::TokenKind;

use crate::parser::Parser;
use crate::ParseResult;

impl<'a, 'src> Parser<'a, 'src> {
    /// Parse `: Type`. Outside TypeScript the annotation itself is the
    /// error; the type is still parsed for recovery.
    pub(crate) fn parse_and_visit_colon_type_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::Colon);
        if !self.options.typescript {
            self.diags
                .add(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript {
                    type_colon: self.peek().span(),
                });
        }
        self.skip();
        self.parse_and_visit_type_expression(v)
    }

    pub(crate) fn parse_and_visit_type_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        self.with_depth(|p| p.parse_and_visit_type_expression_impl(v))
    }

    fn parse_and_visit_type_expression_impl<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        // | A | B  (leading separator is allowed)
        if matches!(self.peek().kind, Pipe | Ampersand) {
            self.skip();
        }
        loop {
            self.parse_and_visit_type_constituent(v)?;
            match self.peek().kind {
                Pipe | Ampersand => {
                    self.skip();
                    continue;
                }
                // T extends U ? A : B
                KwExtends => {
                    self.skip();
                    self.parse_and_visit_type_constituent(v)?;
                    self.expect(Question)?;
                    self.skip();
                    self.parse_and_visit_type_expression(v)?;
                    self.expect(Colon)?;
                    self.skip();
                    self.parse_and_visit_type_expression(v)?;
                    return Ok(());
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_and_visit_type_constituent<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        match self.peek().kind {
            KwKeyof | KwReadonly | KwUnique | KwInfer => {
                self.skip();
                self.parse_and_visit_type_constituent(v)?;
            }

            // typeof someValue.property
            KwTypeof => {
                self.skip();
                match self.peek().kind {
                    kind if kind.is_identifier_like() => {
                        v.visit_variable_use(self.peek().identifier_name());
                        self.skip();
                        while self.peek().kind == Dot {
                            self.skip();
                            if self.peek().kind == Identifier || self.peek().kind.is_keyword() {
                                self.skip();
                            } else {
                                break;
                            }
                        }
                    }
                    _ => return Err(self.fail()),
                }
            }

            // Built-in types carry no variable reference.
            KwAny | KwBigint | KwBoolean | KwNever | KwNull | KwNumber | KwObject | KwString
            | KwSymbol | KwThis | KwUndefined | KwUnknown | KwVoid => self.skip(),

            // Literal types.
            String | Number | KwTrue | KwFalse => self.skip(),
            Minus => {
                self.skip();
                self.expect(Number)?;
                self.skip();
            }

            // Object types.
            LeftCurly => self.parse_and_visit_object_type_body(v)?,

            // Tuples.
            LeftSquare => {
                self.skip();
                loop {
                    match self.peek().kind {
                        RightSquare => {
                            self.skip();
                            break;
                        }
                        Comma | DotDotDot => self.skip(),
                        EndOfFile => return Err(self.fail()),
                        _ => self.parse_and_visit_type_expression(v)?,
                    }
                }
            }

            // Parenthesized and function types.
            LeftParen => self.parse_and_visit_paren_or_function_type(v)?,
            KwNew => {
                self.skip();
                self.expect(LeftParen)?;
                self.parse_and_visit_function_type_parameters(v)?;
                self.expect(EqualGreater)?;
                self.skip();
                self.parse_and_visit_type_expression(v)?;
            }

            // A named type.
            kind if kind.is_identifier_like() => {
                v.visit_variable_type_use(self.peek().identifier_name());
                self.skip();
                // Qualified names: only the leftmost name resolves here.
                while self.peek().kind == Dot {
                    self.skip();
                    if self.peek().kind == Identifier || self.peek().kind.is_keyword() {
                        self.skip();
                    } else {
                        break;
                    }
                }
                if self.peek().kind == Less {
                    self.parse_and_visit_generic_arguments(v)?;
                }
            }

            _ => {
                self.diags.add(Diag::ExpectedType {
                    token: self.peek().span(),
                });
                return Ok(());
            }
        }

        // T[] and T[K]
        while self.peek().kind == TokenKind::LeftSquare && !self.peek().has_leading_newline {
            self.skip();
            if self.peek().kind == TokenKind::RightSquare {
                self.skip();
            } else {
                self.parse_and_visit_type_expression(v)?;
                self.expect(TokenKind::RightSquare)?;
                self.skip();
            }
        }
        Ok(())
    }

    fn parse_and_visit_generic_arguments<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, Less);
        self.skip();
        loop {
            self.parse_and_visit_type_expression(v)?;
            match self.peek().kind {
                Comma => self.skip(),
                kind if kind == Greater || self.peek_is_greater() => {
                    self.lexer.skip_as_greater();
                    return Ok(());
                }
                _ => return Err(self.fail()),
            }
        }
    }

    /// `{ name: T; method(): U; [k: string]: V }` in type position.
    pub(crate) fn parse_and_visit_object_type_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftCurly);
        let left_curly_span = self.peek().span();
        self.skip();
        loop {
            match self.peek().kind {
                RightCurly => {
                    self.skip();
                    return Ok(());
                }
                EndOfFile => {
                    self.diags.add(Diag::UnclosedCodeBlock {
                        block_open: left_curly_span,
                    });
                    return Ok(());
                }
                Semicolon | Comma => self.skip(),
                _ => self.parse_and_visit_interface_member(v)?,
            }
        }
    }

    /// `(x: T, y?: U, ...rest: V[])` of a function type.
    fn parse_and_visit_function_type_parameters<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftParen);
        self.skip();
        loop {
            match self.peek().kind {
                RightParen => {
                    self.skip();
                    return Ok(());
                }
                Comma | DotDotDot => self.skip(),
                kind if kind.is_identifier_like() || kind == KwThis => {
                    self.skip();
                    if self.peek().kind == Question {
                        self.skip();
                    }
                    if self.peek().kind == Colon {
                        self.skip();
                        self.parse_and_visit_type_expression(v)?;
                    }
                }
                _ => return Err(self.fail()),
            }
        }
    }

    /// Decide between `(T)` (a parenthesized type) and `(x: T) => U` (a
    /// function type), then parse whichever it is.
    fn parse_and_visit_paren_or_function_type<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftParen);

        let transaction = self.lexer.begin_transaction();
        self.skip();
        let is_function_type = match self.peek().kind {
            RightParen | DotDotDot => true,
            kind if kind.is_identifier_like() || kind == KwThis => {
                self.skip();
                matches!(self.peek().kind, Colon | Question | Comma)
                    || (self.peek().kind == RightParen && {
                        self.skip();
                        self.peek().kind == EqualGreater
                    })
            }
            _ => false,
        };
        self.lexer.roll_back_transaction(transaction);

        if is_function_type {
            self.parse_and_visit_function_type_parameters(v)?;
            self.expect(EqualGreater)?;
            self.skip();
            self.parse_and_visit_type_expression(v)
        } else {
            self.skip();
            self.parse_and_visit_type_expression(v)?;
            self.expect(RightParen)?;
            self.skip();
            Ok(())
        }
    }
}
