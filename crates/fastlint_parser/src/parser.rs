//! Statement parsing.
//!
//! One `Parser` instance parses one source buffer. Statements are
//! dispatched on the head token; contextual keywords (`let`, `async`,
//! `type`, `abstract`, `declare`, ...) are disambiguated with one-token
//! lookahead through lexer transactions. Diagnostics never stop the
//! parse; the only unwinding signals are `Interrupt::Unexpected` and
//! `Interrupt::DepthLimitExceeded`, and visitor scopes stay balanced on
//! every path.

use bumpalo::Bump;
use fastlint_ast::expression::{Expression, FunctionAttributes};
use fastlint_ast::visitor::{BufferingVisitor, ParseVisitor, VarInitKind, VarKind, VisitorEvent};
use fastlint_core::intern::StringInterner;
use fastlint_core::text::Span;
use fastlint_diagnostics::{Diag, DiagnosticCollection, ParenSide, StatementKind};
use fastlint_lexer::{Identifier, Lexer, Token, TokenKind};

use crate::expression::VariableContext;
use crate::precedence::Precedence;
use crate::{Interrupt, ParseResult};

/// Maximum statement/expression nesting before `DepthLimitExceeded`.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Parser configuration, fixed at construction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    pub typescript: bool,
    pub jsx: bool,
}

/// What the caller allows at this statement position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementMode {
    AnyStatementInBlock,
    /// Single-statement bodies of `if`/`for`/`while`/`with`/`do`, where
    /// lexical declarations are not allowed.
    NoDeclarations,
}

/// Whether a function or class needs a name at this position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameRequirement {
    RequiredForStatement,
    RequiredForExport,
    Optional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionParameterParseResult {
    ParsedParameters,
    ParsedParametersMissingBody,
    MissingParameters,
    MissingParametersIgnoreBody,
}

/// Which flavor of `enum` declaration is being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumKind {
    Normal,
    ConstEnum,
    DeclareEnum,
    DeclareConstEnum,
}

/// Classification of an enum member initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EnumValueKind {
    Constant,
    Computed,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopStyle {
    CStyle,
    ForIn,
    ForOf,
    Other,
}

/// Saved context flags, restored when a function frame is left.
pub(crate) struct SavedFunctionContext {
    in_async_function: bool,
    in_generator_function: bool,
    in_loop_statement: bool,
    in_switch_statement: bool,
}

pub struct Parser<'a, 'src> {
    pub(crate) arena: &'a Bump,
    pub(crate) lexer: Lexer<'src>,
    pub(crate) options: ParserOptions,
    pub(crate) diags: DiagnosticCollection,
    pub(crate) in_async_function: bool,
    pub(crate) in_generator_function: bool,
    pub(crate) in_loop_statement: bool,
    pub(crate) in_switch_statement: bool,
    pub(crate) depth: u32,
}

impl<'a, 'src> Parser<'a, 'src> {
    pub fn new(arena: &'a Bump, source: &'src str, options: ParserOptions) -> Self {
        Self {
            arena,
            lexer: Lexer::new(source),
            options,
            diags: DiagnosticCollection::new(),
            in_async_function: false,
            in_generator_function: false,
            in_loop_statement: false,
            in_switch_statement: false,
            depth: 0,
        }
    }

    /// The interner holding every identifier name this parse produced.
    pub fn interner(&self) -> &StringInterner {
        self.lexer.interner()
    }

    /// All diagnostics from the lexer and the parser, sorted by position.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        let mut all = self.lexer.take_diagnostics();
        all.extend(std::mem::take(&mut self.diags));
        all.sort_by_position();
        all
    }

    // ========================================================================
    // Token plumbing
    // ========================================================================

    #[inline]
    pub(crate) fn peek(&self) -> &Token {
        self.lexer.peek()
    }

    #[inline]
    pub(crate) fn skip(&mut self) {
        self.lexer.skip();
    }

    /// Report `UnexpectedToken` at the cursor and raise the unimplemented
    /// signal. Callers resynchronize at the nearest statement loop.
    pub(crate) fn fail(&mut self) -> Interrupt {
        self.diags.add(Diag::UnexpectedToken {
            token: self.peek().span(),
        });
        Interrupt::Unexpected
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.peek().kind == kind {
            Ok(())
        } else {
            Err(self.fail())
        }
    }

    pub(crate) fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_RECURSION_DEPTH {
            self.diags.add(Diag::DepthLimitExceeded {
                token: self.peek().span(),
            });
            return Err(Interrupt::DepthLimitExceeded);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Enter a function frame: `await`/`yield` contexts follow the
    /// function's attributes, and `break`/`continue` targets reset.
    pub(crate) fn enter_function(&mut self, attributes: FunctionAttributes) -> SavedFunctionContext {
        let saved = SavedFunctionContext {
            in_async_function: self.in_async_function,
            in_generator_function: self.in_generator_function,
            in_loop_statement: self.in_loop_statement,
            in_switch_statement: self.in_switch_statement,
        };
        self.in_async_function = matches!(
            attributes,
            FunctionAttributes::Async | FunctionAttributes::AsyncGenerator
        );
        self.in_generator_function = matches!(
            attributes,
            FunctionAttributes::Generator | FunctionAttributes::AsyncGenerator
        );
        self.in_loop_statement = false;
        self.in_switch_statement = false;
        saved
    }

    pub(crate) fn restore_function_context(&mut self, saved: SavedFunctionContext) {
        self.in_async_function = saved.in_async_function;
        self.in_generator_function = saved.in_generator_function;
        self.in_loop_statement = saved.in_loop_statement;
        self.in_switch_statement = saved.in_switch_statement;
    }

    pub(crate) fn alloc(&self, expression: Expression<'a>) -> &'a Expression<'a> {
        self.arena.alloc(expression)
    }

    pub(crate) fn alloc_expressions(
        &self,
        expressions: Vec<&'a Expression<'a>>,
    ) -> &'a [&'a Expression<'a>] {
        self.arena.alloc_slice_copy(&expressions)
    }

    pub(crate) fn alloc_spans(&self, spans: Vec<Span>) -> &'a [Span] {
        self.arena.alloc_slice_copy(&spans)
    }

    pub(crate) fn alloc_events(&self, events: &[VisitorEvent]) -> &'a [VisitorEvent] {
        self.arena.alloc_slice_copy(events)
    }

    fn end_of_previous_token(&self) -> Span {
        Span::empty(self.lexer.end_of_previous_token())
    }

    // ========================================================================
    // Module entry
    // ========================================================================

    /// Parse a whole module, driving `v` and recovering from every error.
    pub fn parse_and_visit_module<V: ParseVisitor>(&mut self, v: &mut V) {
        loop {
            match self.parse_and_visit_statement(v, StatementMode::AnyStatementInBlock) {
                Ok(true) => {}
                Ok(false) => match self.peek().kind {
                    TokenKind::EndOfFile => break,
                    TokenKind::RightCurly => {
                        self.diags.add(Diag::UnmatchedRightCurly {
                            right_curly: self.peek().span(),
                        });
                        self.skip();
                    }
                    _ => {
                        self.diags.add(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.skip_to_next_statement();
                    }
                },
                Err(_) => {
                    // The diagnostic was reported at the raise site.
                    self.skip_to_next_statement();
                }
            }
        }
        v.visit_end_of_module();
    }

    /// Skip forward to the next token that can start a statement, always
    /// making progress. Prevents one parse failure from cascading.
    fn skip_to_next_statement(&mut self) {
        if self.peek().kind != TokenKind::EndOfFile {
            self.skip();
        }
        while self.peek().kind != TokenKind::EndOfFile
            && !token_can_start_statement(self.peek().kind)
        {
            self.skip();
        }
    }

    // ========================================================================
    // Statement dispatch
    // ========================================================================

    /// Parse one statement. Returns `Ok(false)` on `}` or end of file,
    /// leaving the token for the caller.
    pub fn parse_and_visit_statement<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        mode: StatementMode,
    ) -> ParseResult<bool> {
        self.with_depth(|p| p.parse_and_visit_statement_dispatch(v, mode))
    }

    fn parse_and_visit_statement_dispatch<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        mode: StatementMode,
    ) -> ParseResult<bool> {
        use TokenKind::*;
        // Labelled statements re-enter the dispatch with the token after
        // the label's colon.
        'dispatch: loop {
            match self.peek().kind {
                // export class C {}
                // export {taco} from "taco-stand";
                KwExport => self.parse_and_visit_export(v)?,

                Semicolon => self.skip(),

                // function f() {}
                KwFunction => {
                    let begin = self.peek().begin;
                    self.parse_and_visit_function_declaration(
                        v,
                        FunctionAttributes::Normal,
                        begin,
                        NameRequirement::RequiredForStatement,
                    )?;
                }

                // var x = 42;
                KwConst | KwVar => self.parse_and_visit_variable_declaration_statement(v)?,

                // let x = 42;
                // let();
                // let: while (true) {}
                KwLet => {
                    let let_token = *self.peek();
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    if self.peek().kind == Colon {
                        // Labelled statement.
                        self.lexer.commit_transaction(transaction);
                        self.skip();
                        continue 'dispatch;
                    }
                    let allow_declarations = mode != StatementMode::NoDeclarations;
                    if is_let_token_a_variable_reference(self.peek(), allow_declarations) {
                        // Expression.
                        self.lexer.roll_back_transaction(transaction);
                        let ast = self.parse_expression(v, Precedence::default())?;
                        self.visit_expression(ast, v, VariableContext::Rhs);
                        self.parse_expression_end();
                    } else {
                        // Variable declaration.
                        self.lexer.commit_transaction(transaction);
                        self.parse_and_visit_let_bindings(v, &let_token, true, false, false)?;
                        self.consume_semicolon_after_statement();
                    }
                }

                // abstract class C {}  // TypeScript only.
                // abstract = 42;
                KwAbstract => {
                    let abstract_token = self.peek().span();
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    if self.peek().kind == KwClass && !self.peek().has_leading_newline {
                        self.lexer.commit_transaction(transaction);
                        if !self.options.typescript {
                            self.diags
                                .add(Diag::TypeScriptAbstractClassNotAllowedInJavaScript {
                                    abstract_keyword: abstract_token,
                                });
                        }
                        self.parse_and_visit_class(v, NameRequirement::RequiredForStatement)?;
                    } else {
                        // abstract:  // Label.
                        // abstract();
                        self.lexer.roll_back_transaction(transaction);
                        if self.parse_label_or_expression_head(v)? {
                            continue 'dispatch;
                        }
                    }
                }

                // declare enum E {}  // TypeScript only.
                // declare = 42;
                KwDeclare => {
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    match self.peek().kind {
                        KwEnum if !self.peek().has_leading_newline => {
                            self.lexer.commit_transaction(transaction);
                            self.parse_and_visit_typescript_enum(v, EnumKind::DeclareEnum)?;
                        }
                        KwConst if !self.peek().has_leading_newline => {
                            self.lexer.commit_transaction(transaction);
                            self.skip();
                            self.expect(KwEnum)?;
                            self.parse_and_visit_typescript_enum(v, EnumKind::DeclareConstEnum)?;
                        }
                        _ => {
                            self.lexer.roll_back_transaction(transaction);
                            if self.parse_label_or_expression_head(v)? {
                                continue 'dispatch;
                            }
                        }
                    }
                }

                // async function f() {}
                // async = 42;
                KwAsync => {
                    let async_token = *self.peek();
                    self.skip();
                    match self.peek().kind {
                        KwFunction => {
                            if self.peek().has_leading_newline {
                                // ASI: `async` alone is a variable use.
                                v.visit_variable_use(async_token.identifier_name());
                            } else {
                                self.parse_and_visit_function_declaration(
                                    v,
                                    FunctionAttributes::Async,
                                    async_token.begin,
                                    NameRequirement::RequiredForStatement,
                                )?;
                            }
                        }
                        // Labelled statement.
                        Colon => {
                            self.skip();
                            continue 'dispatch;
                        }
                        kind if token_continues_async_expression(kind) => {
                            let ast =
                                self.parse_async_expression(v, &async_token, Precedence::default())?;
                            self.visit_expression(ast, v, VariableContext::Rhs);
                        }
                        _ => return Err(self.fail()),
                    }
                }

                // import {bananas} from "Thailand";
                // import(url).then(loaded);
                KwImport => self.parse_and_visit_import(v)?,

                // await settings.save();
                // await = value;
                // await: for(;;);
                KwAwait => {
                    let await_token = *self.peek();
                    self.skip();
                    if self.peek().kind == Colon {
                        // Labelled statement.
                        if self.in_async_function {
                            self.diags
                                .add(Diag::LabelNamedAwaitNotAllowedInAsyncFunction {
                                    await_keyword: await_token.span(),
                                    colon: self.peek().span(),
                                });
                        }
                        self.skip();
                        continue 'dispatch;
                    }
                    let ast = self.parse_await_expression(v, &await_token)?;
                    let ast = self.parse_expression_remainder(v, ast, Precedence::default())?;
                    self.visit_expression(ast, v, VariableContext::Rhs);
                    self.parse_expression_end();
                }

                // yield value;
                // yield: for(;;);
                KwYield => {
                    if self.in_generator_function {
                        self.parse_and_visit_expression(v)?;
                        self.parse_expression_end();
                    } else if self.parse_label_or_expression_head(v)? {
                        continue 'dispatch;
                    }
                }

                // \u{69}\u{66} // 'if', but escaped.
                ReservedKeywordWithEscapeSequence => {
                    if let Some(escape) = self.peek().escape_sequence {
                        self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                            escape_sequence: escape,
                        });
                    }
                    if self.parse_label_or_expression_head(v)? {
                        continue 'dispatch;
                    }
                }

                KwInterface => {
                    if self.options.typescript {
                        self.parse_and_visit_typescript_interface(v)?;
                    } else {
                        let interface_keyword = self.peek().span();
                        let transaction = self.lexer.begin_transaction();
                        self.skip();
                        let is_interface = self.peek().kind == Identifier;
                        self.lexer.roll_back_transaction(transaction);
                        if is_interface {
                            self.diags
                                .add(Diag::TypeScriptInterfacesNotAllowedInJavaScript {
                                    interface_keyword,
                                });
                            self.parse_and_visit_typescript_interface(v)?;
                        } else if self.parse_label_or_expression_head(v)? {
                            continue 'dispatch;
                        }
                    }
                }

                // type++;
                // type T = number;  // TypeScript only.
                KwType => {
                    let type_span = self.peek().span();
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    match self.peek().kind {
                        // type:  // Labelled statement.
                        Colon => {
                            self.lexer.commit_transaction(transaction);
                            self.skip();
                            continue 'dispatch;
                        }
                        kind if token_is_type_alias_name(kind)
                            && !self.peek().has_leading_newline =>
                        {
                            self.lexer.commit_transaction(transaction);
                            self.parse_and_visit_typescript_type_alias(v, type_span)?;
                        }
                        // type++;  // Expression.
                        _ => {
                            self.lexer.roll_back_transaction(transaction);
                            self.parse_and_visit_expression(v)?;
                            self.parse_expression_end();
                        }
                    }
                }

                // class C {}
                KwClass => {
                    self.parse_and_visit_class(v, NameRequirement::RequiredForStatement)?;
                }

                // switch (x) { default: ; }
                KwSwitch => {
                    let was_in_switch = std::mem::replace(&mut self.in_switch_statement, true);
                    let result = self.parse_and_visit_switch(v);
                    self.in_switch_statement = was_in_switch;
                    result?;
                }

                // return;
                // return 42;
                KwReturn => {
                    let return_span = self.peek().span();
                    self.skip();
                    match self.peek().kind {
                        Semicolon => self.skip(),
                        RightCurly => {}
                        _ => {
                            if self.peek().has_leading_newline {
                                // ASI terminates the return statement. If
                                // the next line starts an expression, the
                                // user probably wanted to return it.
                                if mode == StatementMode::AnyStatementInBlock
                                    && token_starts_expression_on_next_line(self.peek().kind)
                                {
                                    self.diags.add(Diag::ReturnStatementReturnsNothing {
                                        return_keyword: return_span,
                                    });
                                }
                            } else {
                                self.parse_and_visit_expression(v)?;
                                self.parse_expression_end();
                            }
                        }
                    }
                }

                // throw fit;
                KwThrow => {
                    self.skip();
                    if self.peek().kind == Semicolon {
                        self.diags.add(Diag::ExpectedExpressionBeforeSemicolon {
                            where_: self.peek().span(),
                        });
                        self.skip();
                    } else if self.peek().has_leading_newline {
                        self.lexer.insert_semicolon();
                        self.diags.add(Diag::ExpectedExpressionBeforeNewline {
                            where_: self.peek().span(),
                        });
                        self.skip();
                    } else {
                        self.parse_and_visit_expression(v)?;
                        self.parse_expression_end();
                    }
                }

                // try { hard(); } catch (exhaustion) {}
                KwTry => self.parse_and_visit_try_maybe_catch_maybe_finally(v)?,

                // catch (e) { }  // Invalid.
                KwCatch => {
                    self.diags.add(Diag::CatchWithoutTry {
                        catch_token: self.peek().span(),
                    });
                    let parsed = self.parse_and_visit_catch_or_finally_or_both(v)?;
                    debug_assert!(parsed);
                }

                // finally { }  // Invalid.
                KwFinally => {
                    self.diags.add(Diag::FinallyWithoutTry {
                        finally_token: self.peek().span(),
                    });
                    let parsed = self.parse_and_visit_catch_or_finally_or_both(v)?;
                    debug_assert!(parsed);
                }

                // do { } while (can);
                KwDo => {
                    let was_in_loop = std::mem::replace(&mut self.in_loop_statement, true);
                    let result = self.parse_and_visit_do_while(v);
                    self.in_loop_statement = was_in_loop;
                    result?;
                }

                // for (let i = 0; i < length; ++i) {}
                // for (let x of xs) {}
                KwFor => {
                    let was_in_loop = std::mem::replace(&mut self.in_loop_statement, true);
                    let result = self.parse_and_visit_for(v);
                    self.in_loop_statement = was_in_loop;
                    result?;
                }

                // while (cond) {}
                KwWhile => {
                    let was_in_loop = std::mem::replace(&mut self.in_loop_statement, true);
                    let result = self.parse_and_visit_while(v);
                    self.in_loop_statement = was_in_loop;
                    result?;
                }

                // with (o) { eek(); }
                KwWith => self.parse_and_visit_with(v)?,

                // if (cond) { yay; } else { nay; }
                KwIf => self.parse_and_visit_if(v)?,

                // else { nay; } // Invalid.
                KwElse => {
                    self.diags.add(Diag::ElseHasNoIf {
                        else_token: self.peek().span(),
                    });
                    self.skip();
                    let parsed =
                        self.parse_and_visit_statement(v, StatementMode::AnyStatementInBlock)?;
                    if !parsed {
                        return Err(self.fail());
                    }
                }

                // break;
                // continue label;
                KwBreak | KwContinue => {
                    let is_break = self.peek().kind == KwBreak;
                    let token_span = self.peek().span();
                    self.skip();
                    match self.peek().kind {
                        kind if kind == Identifier
                            || kind == KwAwait
                            || kind == KwYield
                            || kind.is_contextual_keyword() =>
                        {
                            if self.peek().has_leading_newline {
                                // ASI.
                                self.lexer.insert_semicolon();
                            } else {
                                // Loop label.
                                self.skip();
                            }
                        }
                        _ => {
                            if is_break {
                                if !(self.in_switch_statement || self.in_loop_statement) {
                                    self.diags.add(Diag::InvalidBreak {
                                        break_statement: token_span,
                                    });
                                }
                            } else if !self.in_loop_statement {
                                self.diags.add(Diag::InvalidContinue {
                                    continue_statement: token_span,
                                });
                            }
                        }
                    }
                    self.consume_semicolon_after_statement();
                }

                // debugger;
                KwDebugger => {
                    self.skip();
                    self.consume_semicolon_after_statement();
                }

                // enum E { a, b, c }  // TypeScript.
                KwEnum => self.parse_and_visit_typescript_enum(v, EnumKind::Normal)?,

                // { statement; statement; }
                LeftCurly => {
                    v.visit_enter_block_scope();
                    let result = self.parse_and_visit_statement_block_no_scope(v);
                    v.visit_exit_block_scope();
                    result?;
                }

                // case 3:  // Invalid.
                KwCase => {
                    self.diags.add(Diag::UnexpectedCaseOutsideSwitchStatement {
                        case_token: self.peek().span(),
                    });
                    self.skip();
                    self.parse_and_visit_expression(v)?;
                    if self.peek().kind == Colon {
                        self.skip();
                    }
                }

                // default:  // Invalid.
                KwDefault => {
                    self.diags
                        .add(Diag::UnexpectedDefaultOutsideSwitchStatement {
                            default_token: self.peek().span(),
                        });
                    self.skip();
                    if self.peek().kind == Colon {
                        self.skip();
                    }
                }

                Colon | KwExtends | Question => {
                    self.diags.add(Diag::UnexpectedToken {
                        token: self.peek().span(),
                    });
                    self.skip();
                }

                EndOfFile | RightCurly => return Ok(false),

                // this.explode();
                // [1, 2, 3].forEach(x => console.log(x));
                kind if token_starts_expression_statement(kind) => {
                    if kind == Star {
                        // *function f() {} // Invalid (misplaced '*').
                        let star_token = *self.peek();
                        if let Some(attributes) = self.try_parse_function_with_leading_star()? {
                            self.parse_and_visit_function_declaration(
                                v,
                                attributes,
                                star_token.begin,
                                NameRequirement::RequiredForStatement,
                            )?;
                            return Ok(true);
                        }
                    }
                    self.parse_and_visit_expression(v)?;
                    self.parse_expression_end();
                }

                // console.log("hello");
                // label: for(;;);
                kind if kind.is_identifier_like() => {
                    if self.parse_label_or_expression_head(v)? {
                        continue 'dispatch;
                    }
                }

                _ => return Err(self.fail()),
            }
            return Ok(true);
        }
    }

    /// The current token looks like an identifier. Either it is a label
    /// (returns `Ok(true)`: re-dispatch) or it heads an expression
    /// statement.
    fn parse_label_or_expression_head<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<bool> {
        let token = *self.peek();
        self.skip();
        if self.peek().kind == TokenKind::Colon {
            // Labelled statement.
            self.skip();
            return Ok(true);
        }
        let ast = self.alloc(Expression::Variable {
            name: token.identifier_name(),
            token_kind: token.kind,
        });
        let ast = self.parse_expression_remainder(v, ast, Precedence::default())?;
        self.visit_expression(ast, v, VariableContext::Rhs);
        self.parse_expression_end();
        Ok(false)
    }

    /// Consume stray `)`s after an expression statement, then the
    /// statement terminator.
    pub(crate) fn parse_expression_end(&mut self) {
        while self.peek().kind == TokenKind::RightParen {
            self.diags.add(Diag::UnmatchedParenthesis {
                where_: self.peek().span(),
            });
            self.skip();
        }
        self.consume_semicolon_after_statement();
    }

    /// A misplaced leading `*` may introduce a generator function
    /// declaration (`*function f() {}`). If so, consume up to the
    /// `function` keyword and report the misplaced star.
    fn try_parse_function_with_leading_star(
        &mut self,
    ) -> ParseResult<Option<FunctionAttributes>> {
        debug_assert_eq!(self.peek().kind, TokenKind::Star);
        let star_span = self.peek().span();
        let transaction = self.lexer.begin_transaction();
        self.skip();
        let mut attributes = FunctionAttributes::Generator;
        if self.peek().kind == TokenKind::KwAsync && !self.peek().has_leading_newline {
            self.skip();
            attributes = FunctionAttributes::AsyncGenerator;
        }
        if self.peek().kind == TokenKind::KwFunction && !self.peek().has_leading_newline {
            self.lexer.commit_transaction(transaction);
            self.diags
                .add(Diag::GeneratorFunctionStarBelongsAfterKeywordFunction { star: star_span });
            Ok(Some(attributes))
        } else {
            self.lexer.roll_back_transaction(transaction);
            Ok(None)
        }
    }

    // ========================================================================
    // Automatic semicolon insertion
    // ========================================================================

    /// Accept `;`, a preceding line terminator, a following `}`, or end
    /// of file as a statement terminator.
    pub(crate) fn consume_semicolon_after_statement(&mut self) {
        match self.peek().kind {
            TokenKind::Semicolon => self.skip(),
            TokenKind::EndOfFile | TokenKind::RightCurly => {}
            _ => {
                if !self.peek().has_leading_newline {
                    self.diags.add(Diag::MissingSemicolonAfterStatement {
                        where_: self.end_of_previous_token(),
                    });
                }
            }
        }
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Parse `{ statements }`. The caller is responsible for any scope.
    pub(crate) fn parse_and_visit_statement_block_no_scope<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        self.expect(TokenKind::LeftCurly)?;
        let left_curly_span = self.peek().span();
        self.skip();
        loop {
            match self.parse_and_visit_statement(v, StatementMode::AnyStatementInBlock) {
                Ok(true) => {}
                Ok(false) => match self.peek().kind {
                    TokenKind::RightCurly => {
                        self.skip();
                        return Ok(());
                    }
                    TokenKind::EndOfFile => {
                        self.diags.add(Diag::UnclosedCodeBlock {
                            block_open: left_curly_span,
                        });
                        return Ok(());
                    }
                    _ => {
                        self.diags.add(Diag::UnexpectedToken {
                            token: self.peek().span(),
                        });
                        self.skip();
                    }
                },
                Err(Interrupt::Unexpected) => {
                    // Reported at the raise site; resynchronize here.
                    if self.peek().kind == TokenKind::EndOfFile {
                        self.diags.add(Diag::UnclosedCodeBlock {
                            block_open: left_curly_span,
                        });
                        return Ok(());
                    }
                    self.skip();
                }
                Err(interrupt) => return Err(interrupt),
            }
        }
    }

    // ========================================================================
    // Variable declarations
    // ========================================================================

    fn parse_and_visit_variable_declaration_statement<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        let declaring_token = *self.peek();
        debug_assert!(matches!(
            declaring_token.kind,
            TokenKind::KwConst | TokenKind::KwLet | TokenKind::KwVar
        ));
        self.skip();
        if self.peek().kind == TokenKind::KwEnum && declaring_token.kind == TokenKind::KwConst {
            self.parse_and_visit_typescript_enum(v, EnumKind::ConstEnum)
        } else {
            self.parse_and_visit_let_bindings(v, &declaring_token, true, false, false)?;
            self.consume_semicolon_after_statement();
            Ok(())
        }
    }

    /// Parse the bindings of a `var`/`let`/`const` statement. The
    /// declaring token is already consumed.
    pub(crate) fn parse_and_visit_let_bindings<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        declaring_token: &Token,
        allow_in_operator: bool,
        allow_const_without_initializer: bool,
        is_in_for_initializer: bool,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let declaration_kind = match declaring_token.kind {
            KwConst => VarKind::Const,
            KwVar => VarKind::Var,
            _ => VarKind::Let,
        };
        let let_span = declaring_token.span();
        let mut first_binding = true;
        loop {
            let mut comma_span: Option<Span> = None;
            if !first_binding {
                match self.peek().kind {
                    Comma => {
                        comma_span = Some(self.peek().span());
                        self.skip();
                    }
                    Identifier | LeftCurly | LeftSquare => {
                        if self.peek().has_leading_newline {
                            // ASI ends the declaration; the caller inserts
                            // our semicolon if needed.
                            return Ok(());
                        }
                        // let x y
                        self.diags.add(Diag::MissingCommaBetweenVariableDeclarations {
                            expected_comma: self.end_of_previous_token(),
                        });
                    }
                    _ => return Ok(()),
                }
            }

            match self.peek().kind {
                kind if kind == KwAwait
                    || kind == KwYield
                    || kind == ReservedKeywordWithEscapeSequence
                    || kind.is_identifier_like() =>
                {
                    match kind {
                        KwAwait if self.in_async_function => {
                            self.diags.add(Diag::CannotDeclareAwaitInAsyncFunction {
                                name: self.peek().span(),
                            });
                        }
                        KwYield if self.in_generator_function => {
                            self.diags.add(Diag::CannotDeclareYieldInGeneratorFunction {
                                name: self.peek().span(),
                            });
                        }
                        ReservedKeywordWithEscapeSequence => {
                            if let Some(escape) = self.peek().escape_sequence {
                                self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                                    escape_sequence: escape,
                                });
                            }
                        }
                        _ => {}
                    }
                    let ended = self.parse_and_visit_one_binding(
                        v,
                        declaring_token,
                        declaration_kind,
                        allow_in_operator,
                        allow_const_without_initializer,
                        is_in_for_initializer,
                    )?;
                    if ended {
                        return Ok(());
                    }
                }

                // let {x} = xs;
                // let [head, ...tail] = xs;
                LeftCurly | LeftSquare => {
                    let ast = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            in_operator: allow_in_operator,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_binding_element(
                        ast,
                        v,
                        declaration_kind,
                        Some(declaring_token.span()),
                        VarInitKind::Normal,
                    );
                }

                // let switch = 3;  // Invalid.
                // let if (x) {}    // Invalid.
                kind if kind.is_reserved_keyword() && kind != KwAwait && kind != KwYield => {
                    let keyword_span = self.peek().span();
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    match self.peek().kind {
                        // let switch = 3;  // Invalid.
                        EndOfFile | Equal | Semicolon => {
                            self.lexer.commit_transaction(transaction);
                            self.diags.add(Diag::CannotDeclareVariableWithKeywordName {
                                keyword: keyword_span,
                            });
                            self.skip();
                            self.parse_and_visit_expression_prec(
                                v,
                                Precedence {
                                    commas: false,
                                    in_operator: allow_in_operator,
                                    ..Precedence::default()
                                },
                            )?;
                        }
                        // let if (x) {}    // Invalid.
                        _ => {
                            self.lexer.roll_back_transaction(transaction);
                            if self.peek().has_leading_newline {
                                self.diags
                                    .add(Diag::LetWithNoBindings { where_: let_span });
                            } else {
                                self.diags.add(Diag::UnexpectedTokenInVariableDeclaration {
                                    unexpected_token: keyword_span,
                                });
                                self.lexer.insert_semicolon();
                            }
                            return Ok(());
                        }
                    }
                }

                // let 42;  // Invalid.
                Number | CompleteTemplate | IncompleteTemplate => {
                    self.diags.add(Diag::UnexpectedTokenInVariableDeclaration {
                        unexpected_token: self.peek().span(),
                    });
                    self.lexer.insert_semicolon();
                    return Ok(());
                }

                // let = rhs;  // Invalid.
                Equal => {
                    self.diags.add(Diag::MissingVariableNameInDeclaration {
                        equal_token: self.peek().span(),
                    });
                    self.skip();
                    self.parse_and_visit_expression_prec(
                        v,
                        Precedence {
                            commas: false,
                            in_operator: allow_in_operator,
                            ..Precedence::default()
                        },
                    )?;
                }

                kind if kind == Comma
                    || kind == Dot
                    || kind == EqualGreater
                    || kind == LeftParen
                    || kind == Minus
                    || kind == Plus
                    || kind == Question
                    || kind == Slash
                    || kind.is_compound_assignment_operator() =>
                {
                    return Err(self.fail());
                }

                // let;          // Invalid.
                // let x, ;      // Invalid.
                _ => {
                    if first_binding {
                        self.diags
                            .add(Diag::LetWithNoBindings { where_: let_span });
                    } else {
                        let comma = comma_span.unwrap_or_else(|| self.peek().span());
                        self.diags
                            .add(Diag::StrayCommaInLetStatement { where_: comma });
                    }
                    return Ok(());
                }
            }
            first_binding = false;
        }
    }

    /// Parse one `name [: type] [= init]` binding. Returns `Ok(true)` if
    /// the whole declaration ended (ASI).
    fn parse_and_visit_one_binding<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        declaring_token: &Token,
        declaration_kind: VarKind,
        allow_in_operator: bool,
        allow_const_without_initializer: bool,
        is_in_for_initializer: bool,
    ) -> ParseResult<bool> {
        use TokenKind::*;
        let variable_token = *self.peek();
        let variable = self.alloc(Expression::Variable {
            name: variable_token.identifier_name(),
            token_kind: variable_token.kind,
        });
        self.skip();

        if self.peek().kind == Colon {
            // let x: Type;
            self.parse_and_visit_colon_type_expression(v)?;
        }

        match self.peek().kind {
            // let x = 3;
            // let x += 42;  // Invalid.
            kind if kind == Equal || kind.is_compound_assignment_operator() => {
                let equal_token = *self.peek();
                let mut binding_ast = self.parse_expression_remainder(
                    v,
                    variable,
                    Precedence {
                        commas: false,
                        in_operator: allow_in_operator,
                        ..Precedence::default()
                    },
                )?;

                if is_in_for_initializer && self.peek().kind == KwIn {
                    // for (var x = "initial" in obj)           // Legacy.
                    // for (let x = "prop" in obj)              // Invalid.
                    // for (let x = "prop" in obj; i < 10; ++i) // Invalid.
                    let in_token_span = self.peek().span();
                    debug_assert!(!allow_in_operator);
                    let mut transaction = Some(self.lexer.begin_transaction());
                    let diag_mark = self.diags.len();
                    let mut resolved_as_c_style = false;
                    if let Expression::Assignment { lhs, rhs, operator } = binding_ast {
                        let (lhs, rhs, operator) = (*lhs, *rhs, *operator);
                        let in_ast = self.parse_expression_remainder(
                            v,
                            rhs,
                            Precedence {
                                commas: false,
                                ..Precedence::default()
                            },
                        )?;
                        if self.peek().kind == Semicolon {
                            // This was really a C-style loop condition.
                            self.lexer.commit_transaction(transaction.take().unwrap());
                            binding_ast = self.alloc(Expression::Assignment {
                                lhs,
                                rhs: in_ast,
                                operator,
                            });
                            self.diags.add(Diag::InDisallowedInCStyleForLoop {
                                in_token: in_token_span,
                            });
                            resolved_as_c_style = true;
                        }
                    }
                    if !resolved_as_c_style {
                        self.lexer.roll_back_transaction(transaction.take().unwrap());
                        self.diags.truncate(diag_mark);
                        if declaration_kind != VarKind::Var {
                            self.diags
                                .add(Diag::CannotAssignToLoopVariableInForOfOrInLoop {
                                    equal_token: equal_token.span(),
                                });
                        }
                    }
                } else if is_in_for_initializer && self.peek().kind == KwOf {
                    // for (var x = "initial" of obj)  // Invalid.
                    self.diags
                        .add(Diag::CannotAssignToLoopVariableInForOfOrInLoop {
                            equal_token: equal_token.span(),
                        });
                }

                self.visit_binding_element(
                    binding_ast,
                    v,
                    declaration_kind,
                    Some(declaring_token.span()),
                    VarInitKind::InitializedWithEquals,
                );
            }

            KwAwait | KwClass | KwFunction | KwNew | KwNull | KwThis | KwTypeof => {
                if self.peek().has_leading_newline {
                    // let x  // ASI
                    // null;
                    self.visit_binding_element(
                        variable,
                        v,
                        declaration_kind,
                        Some(declaring_token.span()),
                        VarInitKind::Normal,
                    );
                    self.lexer.insert_semicolon();
                    return Ok(true);
                }
                // let x null;  // Invalid.
                self.diags.add(Diag::MissingEqualAfterVariable {
                    expected_equal: self.end_of_previous_token(),
                });
                self.parse_and_visit_expression_prec(
                    v,
                    Precedence {
                        commas: false,
                        in_operator: allow_in_operator,
                        ..Precedence::default()
                    },
                )?;
                self.visit_binding_element(
                    variable,
                    v,
                    declaration_kind,
                    Some(declaring_token.span()),
                    VarInitKind::Normal,
                );
            }

            // let x;
            // let x, y;
            _ => {
                if declaration_kind == VarKind::Const && !allow_const_without_initializer {
                    self.diags.add(Diag::MissingInitializerInConstDeclaration {
                        variable_name: variable.span(),
                    });
                }
                self.visit_binding_element(
                    variable,
                    v,
                    declaration_kind,
                    Some(declaring_token.span()),
                    VarInitKind::Normal,
                );
            }
        }
        Ok(false)
    }

    // ========================================================================
    // Binding elements
    // ========================================================================

    /// Walk an expression that is really a binding pattern, validating it
    /// and emitting declaration events for every introduced name.
    pub(crate) fn visit_binding_element<V: ParseVisitor>(
        &mut self,
        ast: &Expression<'a>,
        v: &mut V,
        declaration_kind: VarKind,
        declaring_token: Option<Span>,
        init_kind: VarInitKind,
    ) {
        match ast {
            Expression::Array { children, .. } => {
                for child in children.iter() {
                    self.visit_binding_element(child, v, declaration_kind, declaring_token, init_kind);
                }
            }

            Expression::CompoundAssignment { lhs, rhs, operator } => {
                match declaring_token {
                    Some(declaring) => {
                        self.diags.add(Diag::CannotUpdateVariableDuringDeclaration {
                            updating_operator: *operator,
                            declaring_token: declaring,
                        });
                    }
                    None => {
                        self.diags.add(Diag::InvalidParameter {
                            parameter: ast.span(),
                        });
                    }
                }
                self.visit_binding_assignment(lhs, rhs, v, declaration_kind, declaring_token);
            }

            Expression::Assignment { lhs, rhs, .. } => {
                self.visit_binding_assignment(lhs, rhs, v, declaration_kind, declaring_token);
            }

            Expression::Variable { name, token_kind } => {
                if matches!(declaration_kind, VarKind::Const | VarKind::Let)
                    && *token_kind == TokenKind::KwLet
                {
                    self.diags
                        .add(Diag::CannotDeclareVariableNamedLetWithLet { name: name.span });
                }
                v.visit_variable_declaration(*name, declaration_kind, init_kind);
            }

            Expression::Object { entries, .. } => {
                for entry in entries.iter() {
                    if let Some(init) = entry.init {
                        self.visit_expression(init, v, VariableContext::Rhs);
                    }
                    self.visit_binding_element(
                        entry.value,
                        v,
                        declaration_kind,
                        declaring_token,
                        init_kind,
                    );
                }
            }

            Expression::Spread { child, .. } => {
                self.visit_binding_element(child, v, declaration_kind, declaring_token, init_kind);
            }

            Expression::Await { operator, .. } => {
                let name = Identifier::new(*operator, self.interner().intern_static("await"));
                v.visit_variable_declaration(name, declaration_kind, init_kind);
                self.diags
                    .add(Diag::CannotDeclareAwaitInAsyncFunction { name: *operator });
            }

            Expression::YieldNone { span } => {
                let name = Identifier::new(*span, self.interner().intern_static("yield"));
                v.visit_variable_declaration(name, declaration_kind, init_kind);
                self.diags
                    .add(Diag::CannotDeclareYieldInGeneratorFunction { name: *span });
            }

            // function f(x!) {}  // Invalid.
            Expression::NonNullAssertion { child, bang } => {
                self.diags
                    .add(Diag::NonNullAssertionNotAllowedInParameter { bang: *bang });
                self.visit_binding_element(child, v, declaration_kind, declaring_token, init_kind);
            }

            // function f([(p,)]) {}  // Invalid.
            Expression::TrailingComma { children, comma } => {
                self.diags.add(Diag::StrayCommaInParameter { comma: *comma });
                if let Some(first) = children.first() {
                    self.visit_binding_element(
                        first,
                        v,
                        declaration_kind,
                        declaring_token,
                        init_kind,
                    );
                }
            }

            // An error was already reported while parsing these.
            Expression::Invalid { .. }
            | Expression::Missing { .. }
            | Expression::PrivateVariable { .. } => {}

            // function f([(arg)]) {}  // Invalid, tolerated.
            Expression::Paren { child, .. } => {
                self.visit_binding_element(child, v, declaration_kind, declaring_token, init_kind);
            }

            // function f(()) {}  // Invalid.
            Expression::ParenEmpty { span } => {
                self.diags.add(Diag::MissingExpressionBetweenParentheses {
                    left_paren_to_right_paren: *span,
                });
            }

            Expression::Literal { span } => {
                self.diags
                    .add(Diag::UnexpectedLiteralInParameterList { literal: *span });
            }

            // const [x]: number[] = xs;
            Expression::TypeAnnotated {
                child, type_visits, ..
            } => {
                for event in type_visits.iter() {
                    event.replay(v);
                }
                self.visit_binding_element(child, v, declaration_kind, declaring_token, init_kind);
            }

            _ => {
                self.diags.add(Diag::InvalidParameter {
                    parameter: ast.span(),
                });
            }
        }
    }

    /// Shared tail of `assignment` and `compound_assignment` binding
    /// elements: the default value is evaluated before the name binds.
    fn visit_binding_assignment<V: ParseVisitor>(
        &mut self,
        lhs: &Expression<'a>,
        rhs: &Expression<'a>,
        v: &mut V,
        declaration_kind: VarKind,
        declaring_token: Option<Span>,
    ) {
        self.visit_expression(rhs, v, VariableContext::Rhs);
        let lhs_init_kind = match declaration_kind {
            VarKind::Const | VarKind::Let | VarKind::Var => VarInitKind::InitializedWithEquals,
            _ => VarInitKind::Normal,
        };
        self.visit_binding_element(lhs, v, declaration_kind, declaring_token, lhs_init_kind);
    }

    // ========================================================================
    // Function declarations
    // ========================================================================

    pub(crate) fn parse_generator_star(
        &mut self,
        attributes: FunctionAttributes,
    ) -> FunctionAttributes {
        if self.peek().kind == TokenKind::Star {
            self.skip();
            match attributes {
                FunctionAttributes::Async | FunctionAttributes::AsyncGenerator => {
                    FunctionAttributes::AsyncGenerator
                }
                _ => FunctionAttributes::Generator,
            }
        } else {
            attributes
        }
    }

    pub(crate) fn parse_and_visit_function_declaration<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        attributes: FunctionAttributes,
        begin: u32,
        require_name: NameRequirement,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwFunction);
        let function_token_span = self.peek().span();
        self.skip();
        let attributes = self.parse_generator_star(attributes);

        match self.peek().kind {
            kind if kind == KwAwait || kind == KwYield || kind.is_identifier_like() => {
                match kind {
                    KwAwait if self.in_async_function => {
                        self.diags.add(Diag::CannotDeclareAwaitInAsyncFunction {
                            name: self.peek().span(),
                        });
                    }
                    KwYield if self.in_generator_function => {
                        self.diags.add(Diag::CannotDeclareYieldInGeneratorFunction {
                            name: self.peek().span(),
                        });
                    }
                    KwLet if require_name == NameRequirement::RequiredForExport => {
                        self.diags.add(Diag::CannotExportLet {
                            export_name: self.peek().span(),
                        });
                    }
                    _ => {}
                }
                let function_name = self.peek().identifier_name();
                v.visit_variable_declaration(function_name, VarKind::Function, VarInitKind::Normal);
                self.skip();
                self.parse_and_visit_function_parameters_and_body(
                    v,
                    Some(function_name.span),
                    attributes,
                )?;
            }

            // export default function() {}
            LeftParen => match require_name {
                NameRequirement::RequiredForStatement => {
                    let left_paren_end = self.peek().end;
                    // The function has no name. Perhaps the user meant a
                    // function expression; parse it as one.
                    self.parse_and_visit_function_parameters_and_body(v, None, attributes)?;
                    let function_end = self.lexer.end_of_previous_token();
                    let function = self.alloc(Expression::Function {
                        attributes,
                        span: Span::new(function_token_span.begin, function_end),
                    });
                    let full_expression =
                        self.parse_expression_remainder(v, function, Precedence::default())?;
                    self.visit_expression(full_expression, v, VariableContext::Rhs);

                    if std::ptr::eq(full_expression, function) {
                        self.diags.add(Diag::MissingNameInFunctionStatement {
                            where_: Span::new(function_token_span.begin, left_paren_end),
                        });
                    } else {
                        self.diags.add(Diag::MissingNameOrParenthesesForFunction {
                            where_: Span::new(function_token_span.begin, left_paren_end),
                            function: Span::new(begin, function.span().end),
                        });
                    }
                }
                NameRequirement::RequiredForExport => {
                    self.diags.add(Diag::MissingNameOfExportedFunction {
                        function_keyword: function_token_span,
                    });
                    self.parse_and_visit_function_parameters_and_body(v, None, attributes)?;
                }
                NameRequirement::Optional => {
                    self.parse_and_visit_function_parameters_and_body(v, None, attributes)?;
                }
            },

            // { function }  // Invalid.
            _ => {
                self.diags.add(Diag::MissingNameInFunctionStatement {
                    where_: function_token_span,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn parse_and_visit_function_parameters_and_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        name: Option<Span>,
        attributes: FunctionAttributes,
    ) -> ParseResult<()> {
        v.visit_enter_function_scope();
        let result = self.parse_and_visit_function_parameters_and_body_no_scope(v, name, attributes);
        v.visit_exit_function_scope();
        result
    }

    pub(crate) fn parse_and_visit_function_parameters_and_body_no_scope<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        name: Option<Span>,
        attributes: FunctionAttributes,
    ) -> ParseResult<()> {
        let saved = self.enter_function(attributes);
        let result = self.parse_function_parameters_and_body_impl(v, name);
        self.restore_function_context(saved);
        result
    }

    fn parse_function_parameters_and_body_impl<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        name: Option<Span>,
    ) -> ParseResult<()> {
        match self.parse_and_visit_function_parameters_head(v, name)? {
            FunctionParameterParseResult::ParsedParameters
            | FunctionParameterParseResult::MissingParameters => {
                v.visit_enter_function_scope_body();
                self.parse_and_visit_statement_block_no_scope(v)
            }
            FunctionParameterParseResult::MissingParametersIgnoreBody => Ok(()),
            FunctionParameterParseResult::ParsedParametersMissingBody => {
                self.diags.add(Diag::MissingFunctionBody {
                    expected_body: self.end_of_previous_token(),
                });
                Ok(())
            }
        }
    }

    /// Interface methods share the function-parameter grammar but must
    /// not carry bodies.
    pub(crate) fn parse_and_visit_interface_function_parameters_and_body_no_scope<
        V: ParseVisitor,
    >(
        &mut self,
        v: &mut V,
        name: Option<Span>,
        attributes: FunctionAttributes,
    ) -> ParseResult<()> {
        let saved = self.enter_function(attributes);
        let result = (|| {
            match self.parse_and_visit_function_parameters_head(v, name)? {
                FunctionParameterParseResult::MissingParametersIgnoreBody
                | FunctionParameterParseResult::ParsedParametersMissingBody => Ok(()),
                FunctionParameterParseResult::ParsedParameters
                | FunctionParameterParseResult::MissingParameters => {
                    self.diags.add(Diag::InterfaceMethodsCannotContainBodies {
                        body_start: self.peek().span(),
                    });
                    v.visit_enter_function_scope_body();
                    self.parse_and_visit_statement_block_no_scope(v)
                }
            }
        })();
        self.restore_function_context(saved);
        result
    }

    fn parse_and_visit_function_parameters_head<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        name: Option<Span>,
    ) -> ParseResult<FunctionParameterParseResult> {
        use TokenKind::*;
        if self.peek().kind == Star {
            let star = self.peek().span();
            match name {
                None => return Err(self.fail()),
                Some(function_name) => {
                    self.diags.add(Diag::GeneratorFunctionStarBelongsBeforeName {
                        star,
                        function_name,
                    });
                    // The enclosing function guard restores this flag.
                    self.in_generator_function = true;
                    self.skip();
                }
            }
        }

        if self.peek().kind == Less {
            // function f<T>() {}  // TypeScript only.
            if !self.options.typescript {
                self.diags.add(Diag::TypeScriptGenericsNotAllowedInJavaScript {
                    opening_less: self.peek().span(),
                });
            }
            self.parse_and_visit_typescript_generic_parameters(v)?;
        }

        match self.peek().kind {
            // function f(arg0, arg1) {}
            LeftParen => {
                self.skip();
                self.parse_and_visit_function_parameters(v)?;
                self.expect(RightParen)?;
                self.skip();

                if self.peek().kind == Colon {
                    self.parse_and_visit_colon_type_expression(v)?;
                }

                if self.peek().kind == EqualGreater {
                    self.diags
                        .add(Diag::FunctionsOrMethodsShouldNotHaveArrowOperator {
                            arrow_operator: self.peek().span(),
                        });
                    self.skip();
                }

                if self.peek().kind != LeftCurly {
                    Ok(FunctionParameterParseResult::ParsedParametersMissingBody)
                } else {
                    Ok(FunctionParameterParseResult::ParsedParameters)
                }
            }

            // function f {}  // Invalid.
            LeftCurly => {
                self.diags.add(Diag::MissingFunctionParameterList {
                    expected_parameter_list: self.end_of_previous_token(),
                });
                Ok(FunctionParameterParseResult::MissingParameters)
            }

            // { function f }  // Invalid.
            Comma | Dot | Number | RightCurly => {
                self.diags.add(Diag::MissingFunctionParameterList {
                    expected_parameter_list: self.end_of_previous_token(),
                });
                Ok(FunctionParameterParseResult::MissingParametersIgnoreBody)
            }

            _ => Err(self.fail()),
        }
    }

    /// Parse a comma-separated parameter list, walking each parameter
    /// through the binding-element visitor.
    pub(crate) fn parse_and_visit_function_parameters<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let mut last_parameter_spread_span: Option<Span> = None;
        let mut first_parameter = true;
        loop {
            let mut comma_span: Option<Span> = None;
            if !first_parameter {
                if self.peek().kind != Comma {
                    break;
                }
                comma_span = Some(self.peek().span());
                self.skip();
            }

            match self.peek().kind {
                kind if kind == DotDotDot
                    || kind == KwAwait
                    || kind == KwYield
                    || kind == LeftCurly
                    || kind == LeftParen
                    || kind == LeftSquare
                    || kind == Number
                    || kind == ReservedKeywordWithEscapeSequence
                    || kind.is_identifier_like() =>
                {
                    let parameter = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            in_operator: true,
                            colon_type_annotation: true,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_binding_element(
                        parameter,
                        v,
                        VarKind::Parameter,
                        None,
                        VarInitKind::Normal,
                    );
                    last_parameter_spread_span = match parameter {
                        Expression::Spread { .. } => Some(parameter.span()),
                        _ => None,
                    };
                }
                RightParen => {
                    if let (Some(spread), Some(comma)) = (last_parameter_spread_span, comma_span) {
                        // function f(...args,)  // Trailing comma is illegal.
                        self.diags
                            .add(Diag::CommaNotAllowedAfterSpreadParameter { comma, spread });
                    }
                    break;
                }
                _ => return Err(self.fail()),
            }
            first_parameter = false;
        }
        Ok(())
    }

    // ========================================================================
    // TypeScript generic parameters
    // ========================================================================

    pub(crate) fn parse_and_visit_typescript_generic_parameters<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, Less);
        let less_end = self.peek().end;
        self.skip();

        let mut leading_commas: Vec<Span> = Vec::new();
        while self.peek().kind == Comma {
            // <, T>   // Invalid.
            // <,>     // Invalid.
            leading_commas.push(self.peek().span());
            self.skip();
        }
        if self.peek_is_greater() {
            // <,>    // Invalid.
            self.diags.add(Diag::TypeScriptGenericParameterListIsEmpty {
                expected_parameter: Span::empty(less_end),
            });
            for comma in leading_commas.iter().skip(1) {
                self.diags.add(Diag::MultipleCommasInGenericParameterList {
                    unexpected_comma: *comma,
                });
            }
            self.lexer.skip_as_greater();
            return Ok(());
        }
        for comma in leading_commas {
            // <, T>
            self.diags
                .add(Diag::CommaNotAllowedBeforeFirstGenericParameter {
                    unexpected_comma: comma,
                });
        }

        loop {
            match self.peek().kind {
                kind if kind == KwAwait || kind.is_identifier_like() => {
                    v.visit_variable_declaration(
                        self.peek().identifier_name(),
                        VarKind::GenericParameter,
                        VarInitKind::Normal,
                    );
                    self.skip();
                }
                _ => return Err(self.fail()),
            }

            if self.peek().kind == KwExtends {
                // <T extends U>
                self.skip();
                self.parse_and_visit_type_expression(v)?;
            }

            match self.peek().kind {
                kind if is_greater_family(kind) => {}
                Comma => {
                    self.skip();
                    while self.peek().kind == Comma {
                        self.diags.add(Diag::MultipleCommasInGenericParameterList {
                            unexpected_comma: self.peek().span(),
                        });
                        self.skip();
                    }
                }
                // <T U>  // Invalid.
                Identifier => {
                    self.diags.add(Diag::MissingCommaBetweenGenericParameters {
                        expected_comma: self.end_of_previous_token(),
                    });
                    continue;
                }
                _ => return Err(self.fail()),
            }

            if self.peek_is_greater() {
                self.lexer.skip_as_greater();
                return Ok(());
            }
        }
    }

    /// Whether the cursor is at a token starting with `>`. Nested generic
    /// argument lists close through `>>`-shaped tokens one `>` at a time.
    pub(crate) fn peek_is_greater(&self) -> bool {
        is_greater_family(self.peek().kind)
    }

    // ========================================================================
    // Classes
    // ========================================================================

    pub(crate) fn parse_and_visit_class<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        require_name: NameRequirement,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwClass);
        let class_keyword = self.peek().span();
        self.skip();

        match self.peek().kind {
            kind if kind.is_identifier_like() => {
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Class,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            _ => match require_name {
                NameRequirement::RequiredForStatement => {
                    self.diags
                        .add(Diag::MissingNameInClassStatement { class_keyword });
                }
                NameRequirement::RequiredForExport => {
                    self.diags
                        .add(Diag::MissingNameOfExportedClass { class_keyword });
                }
                NameRequirement::Optional => {}
            },
        }

        v.visit_enter_class_scope();
        let result = self.parse_and_visit_class_heritage_and_body(v, class_keyword);
        v.visit_exit_class_scope();
        result
    }

    fn parse_and_visit_class_heritage_and_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        class_keyword: Span,
    ) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind == Less {
            if !self.options.typescript {
                self.diags.add(Diag::TypeScriptGenericsNotAllowedInJavaScript {
                    opening_less: self.peek().span(),
                });
            }
            self.parse_and_visit_typescript_generic_parameters(v)?;
        }

        if self.peek().kind == KwExtends {
            self.skip();
            let ast = self.parse_expression(
                v,
                Precedence {
                    commas: false,
                    trailing_curly_is_arrow_body: false,
                    ..Precedence::default()
                },
            )?;
            self.visit_expression(ast, v, VariableContext::Rhs);
        }

        if self.peek().kind == KwImplements {
            if !self.options.typescript {
                self.diags.add(Diag::TypeScriptImplementsNotAllowedInJavaScript {
                    implements_keyword: self.peek().span(),
                });
            }
            self.skip();
            loop {
                match self.peek().kind {
                    kind if kind.is_identifier_like() => {
                        v.visit_variable_type_use(self.peek().identifier_name());
                        self.skip();
                    }
                    _ => return Err(self.fail()),
                }
                if self.peek().kind == Comma {
                    self.skip();
                } else {
                    break;
                }
            }
        }

        if self.peek().kind != LeftCurly {
            self.diags.add(Diag::MissingBodyForClass {
                class_keyword_and_name: Span::new(
                    class_keyword.begin,
                    self.lexer.end_of_previous_token(),
                ),
            });
            return Ok(());
        }
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
                _ => self.parse_and_visit_class_member(v)?,
            }
        }
    }

    fn parse_and_visit_class_member<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind == Semicolon {
            self.skip();
            return Ok(());
        }

        let mut attributes = FunctionAttributes::Normal;
        let mut saw_static = false;
        // Modifiers, as long as a member continues after them.
        loop {
            let kind = self.peek().kind;
            let is_modifier_keyword = matches!(
                kind,
                KwStatic
                    | KwAbstract
                    | KwReadonly
                    | KwAsync
                    | KwDeclare
                    | KwOverride
                    | KwPublic
                    | KwPrivate
                    | KwProtected
                    | KwGet
                    | KwSet
            );
            if !is_modifier_keyword {
                break;
            }
            let transaction = self.lexer.begin_transaction();
            self.skip();
            let next = self.peek().kind;
            let modifier_position = !matches!(
                next,
                LeftParen | Less | Equal | Semicolon | Colon | Question | Bang | RightCurly
            );
            if modifier_position {
                self.lexer.commit_transaction(transaction);
                if kind == KwAsync {
                    attributes = FunctionAttributes::Async;
                }
                if kind == KwStatic {
                    saw_static = true;
                }
            } else {
                // The keyword is the member's name.
                self.lexer.roll_back_transaction(transaction);
                break;
            }
        }

        if self.peek().kind == Star {
            self.skip();
            attributes = match attributes {
                FunctionAttributes::Async => FunctionAttributes::AsyncGenerator,
                _ => FunctionAttributes::Generator,
            };
        }

        // static { initialization; }
        if saw_static && self.peek().kind == LeftCurly {
            v.visit_enter_block_scope();
            let result = self.parse_and_visit_statement_block_no_scope(v);
            v.visit_exit_block_scope();
            return result;
        }

        // Member name.
        let name_span = match self.peek().kind {
            kind if kind.is_keyword()
                || kind == Identifier
                || kind == PrivateIdentifier
                || kind == String
                || kind == Number =>
            {
                let span = self.peek().span();
                self.skip();
                span
            }
            LeftSquare => {
                if self.is_index_signature_ahead() {
                    return self.parse_and_visit_index_signature(v);
                }
                let left_square = self.peek().span();
                self.skip();
                let key = self.parse_expression(v, Precedence::default())?;
                self.visit_expression(key, v, VariableContext::Rhs);
                self.expect(RightSquare)?;
                let end = self.peek().end;
                self.skip();
                Span::new(left_square.begin, end)
            }
            _ => return Err(self.fail()),
        };

        match self.peek().kind {
            // greet() { ... }
            LeftParen | Less => self.parse_and_visit_function_parameters_and_body(
                v,
                Some(name_span),
                attributes,
            ),
            _ => {
                // A field.
                if self.peek().kind == Question || self.peek().kind == Bang {
                    self.skip();
                }
                if self.peek().kind == Colon {
                    self.parse_and_visit_colon_type_expression(v)?;
                }
                if self.peek().kind == Equal {
                    self.skip();
                    let init = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_expression(init, v, VariableContext::Rhs);
                }
                if self.peek().kind == Semicolon {
                    self.skip();
                }
                Ok(())
            }
        }
    }

    /// `[` begins an index signature (rather than a computed name) when
    /// it is followed by `name :`.
    fn is_index_signature_ahead(&mut self) -> bool {
        debug_assert_eq!(self.peek().kind, TokenKind::LeftSquare);
        let transaction = self.lexer.begin_transaction();
        self.skip();
        let looks_like_parameter =
            self.peek().kind == TokenKind::Identifier || self.peek().kind.is_contextual_keyword();
        let mut result = false;
        if looks_like_parameter {
            self.skip();
            result = self.peek().kind == TokenKind::Colon;
        }
        self.lexer.roll_back_transaction(transaction);
        result
    }

    /// `[key: Type]: Type`
    fn parse_and_visit_index_signature<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, LeftSquare);
        self.skip();
        v.visit_enter_index_signature_scope();
        let result = (|| {
            v.visit_variable_declaration(
                self.peek().identifier_name(),
                VarKind::Parameter,
                VarInitKind::Normal,
            );
            self.skip();
            self.expect(Colon)?;
            self.parse_and_visit_colon_type_expression(v)?;
            self.expect(RightSquare)?;
            self.skip();
            if self.peek().kind == Colon {
                self.parse_and_visit_colon_type_expression(v)?;
            }
            Ok(())
        })();
        v.visit_exit_index_signature_scope();
        if self.peek().kind == Semicolon || self.peek().kind == Comma {
            self.skip();
        }
        result
    }

    // ========================================================================
    // TypeScript interfaces
    // ========================================================================

    pub(crate) fn parse_and_visit_typescript_interface<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwInterface);
        self.skip();

        match self.peek().kind {
            kind if kind.is_identifier_like() => {
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Interface,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            _ => return Err(self.fail()),
        }

        v.visit_enter_interface_scope();
        let result = self.parse_and_visit_interface_heritage_and_body(v);
        v.visit_exit_interface_scope();
        result
    }

    fn parse_and_visit_interface_heritage_and_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind == Less {
            self.parse_and_visit_typescript_generic_parameters(v)?;
        }
        if self.peek().kind == KwExtends {
            self.skip();
            loop {
                self.parse_and_visit_type_expression(v)?;
                if self.peek().kind == Comma {
                    self.skip();
                } else {
                    break;
                }
            }
        }
        if self.peek().kind != LeftCurly {
            self.diags.add(Diag::ExpectedLeftCurly {
                expected_left_curly: self.end_of_previous_token(),
            });
            return Ok(());
        }
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

    pub(crate) fn parse_and_visit_interface_member<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        // readonly modifier
        if self.peek().kind == KwReadonly {
            let transaction = self.lexer.begin_transaction();
            self.skip();
            if matches!(self.peek().kind, Colon | Question | Semicolon | RightCurly | LeftParen) {
                self.lexer.roll_back_transaction(transaction);
            } else {
                self.lexer.commit_transaction(transaction);
            }
        }

        let name_span = match self.peek().kind {
            kind if kind.is_keyword() || kind == Identifier || kind == String || kind == Number => {
                let span = self.peek().span();
                self.skip();
                span
            }
            LeftSquare => {
                if self.is_index_signature_ahead() {
                    return self.parse_and_visit_index_signature(v);
                }
                let left_square = self.peek().span();
                self.skip();
                let key = self.parse_expression(v, Precedence::default())?;
                self.visit_expression(key, v, VariableContext::Rhs);
                self.expect(RightSquare)?;
                let end = self.peek().end;
                self.skip();
                Span::new(left_square.begin, end)
            }
            _ => return Err(self.fail()),
        };

        if self.peek().kind == Question {
            self.skip();
        }

        match self.peek().kind {
            // start(): void;
            LeftParen | Less => {
                v.visit_enter_function_scope();
                let result = self.parse_and_visit_interface_function_parameters_and_body_no_scope(
                    v,
                    Some(name_span),
                    FunctionAttributes::Normal,
                );
                v.visit_exit_function_scope();
                result
            }
            // status: string;
            Colon => self.parse_and_visit_colon_type_expression(v),
            _ => Ok(()),
        }
    }

    // ========================================================================
    // TypeScript type aliases
    // ========================================================================

    fn parse_and_visit_typescript_type_alias<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        type_token: Span,
    ) -> ParseResult<()> {
        if !self.options.typescript {
            self.diags.add(Diag::TypeScriptTypeAliasNotAllowedInJavaScript {
                type_keyword: type_token,
            });
        }
        v.visit_variable_declaration(
            self.peek().identifier_name(),
            VarKind::TypeAlias,
            VarInitKind::Normal,
        );
        self.skip();

        v.visit_enter_type_alias_scope();
        let result = (|| {
            if self.peek().kind == TokenKind::Less {
                self.parse_and_visit_typescript_generic_parameters(v)?;
            }
            self.expect(TokenKind::Equal)?;
            self.skip();
            self.parse_and_visit_type_expression(v)
        })();
        v.visit_exit_type_alias_scope();
        result?;

        self.consume_semicolon_after_statement();
        Ok(())
    }

    // ========================================================================
    // TypeScript enums
    // ========================================================================

    pub(crate) fn parse_and_visit_typescript_enum<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        kind: EnumKind,
    ) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwEnum);
        if !self.options.typescript {
            self.diags.add(Diag::TypeScriptEnumIsNotAllowedInJavaScript {
                enum_keyword: self.peek().span(),
            });
        }
        self.skip();

        match self.peek().kind {
            KwAwait => {
                if self.in_async_function {
                    self.diags.add(Diag::CannotDeclareAwaitInAsyncFunction {
                        name: self.peek().span(),
                    });
                }
            }
            k if k.is_identifier_like() => {}
            _ => return Err(self.fail()),
        }

        v.visit_variable_declaration(
            self.peek().identifier_name(),
            VarKind::Enum,
            VarInitKind::Normal,
        );
        self.skip();

        v.visit_enter_enum_scope();
        let result = (|| {
            self.expect(LeftCurly)?;
            self.skip();
            self.parse_and_visit_typescript_enum_members(v, kind)?;
            self.expect(RightCurly)?;
            self.skip();
            Ok(())
        })();
        v.visit_exit_enum_scope();
        result
    }

    fn parse_and_visit_typescript_enum_members<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        kind: EnumKind,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let mut last_enum_value_kind: Option<EnumValueKind> = None;
        let mut last_enum_value: Option<Span> = None;

        loop {
            let member_name = match self.peek().kind {
                // enum E { A }
                // enum E { const = 69 }
                // enum E { "member" }
                k if k.is_keyword() || k == Identifier || k == String => {
                    let span = self.peek().span();
                    self.skip();
                    span
                }

                // enum E { ["member"] = 42 }
                LeftSquare => {
                    let name_begin = self.peek().begin;
                    self.skip();
                    let ast = self.parse_expression(v, Precedence::default())?;
                    match ast {
                        Expression::Literal { .. } => {}
                        _ => {
                            self.diags.add(Diag::TypeScriptEnumComputedNameMustBeSimple {
                                expression: ast.span(),
                            });
                        }
                    }
                    self.visit_expression(ast, v, VariableContext::Rhs);
                    self.expect(RightSquare)?;
                    let name_end = self.peek().end;
                    self.skip();
                    Span::new(name_begin, name_end)
                }

                // enum E { 42 = 69 }  // Invalid.
                Number => {
                    let span = self.peek().span();
                    self.diags.add(Diag::TypeScriptEnumMemberNameCannotBeNumber {
                        number: span,
                    });
                    self.skip();
                    span
                }

                RightCurly => return Ok(()),

                // enum E { , }    // Invalid.
                // enum E { A,, }  // Invalid.
                Comma => {
                    self.diags.add(Diag::ExtraCommaNotAllowedBetweenEnumMembers {
                        comma: self.peek().span(),
                    });
                    self.skip();
                    continue;
                }

                _ => return Err(self.fail()),
            };

            // After the member's name.
            match self.peek().kind {
                // enum E { A, B }
                Comma => {
                    self.report_auto_member_after_computed(
                        member_name,
                        kind,
                        last_enum_value_kind,
                        last_enum_value,
                    );
                    last_enum_value_kind = None;
                    self.skip();
                }
                // enum E { A }
                RightCurly => {
                    self.report_auto_member_after_computed(
                        member_name,
                        kind,
                        last_enum_value_kind,
                        last_enum_value,
                    );
                    last_enum_value_kind = None;
                }
                // enum E { A = 1 }
                Equal => {
                    self.skip();
                    let ast = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_expression(ast, v, VariableContext::Rhs);
                    let ast_span = ast.span();

                    let value_kind = self.classify_enum_value_expression(ast);
                    last_enum_value_kind = Some(value_kind);
                    last_enum_value = Some(ast_span);
                    match kind {
                        EnumKind::DeclareConstEnum
                        | EnumKind::ConstEnum
                        | EnumKind::DeclareEnum => {
                            if value_kind == EnumValueKind::Computed {
                                self.diags.add(Diag::TypeScriptEnumValueMustBeConstant {
                                    expression: ast_span,
                                });
                            }
                        }
                        EnumKind::Normal => {}
                    }

                    if self.peek().kind == Comma {
                        // enum E { A = 1, }
                        self.skip();
                    }
                }
                _ => return Err(self.fail()),
            }
        }
    }

    fn report_auto_member_after_computed(
        &mut self,
        member_name: Span,
        kind: EnumKind,
        last_enum_value_kind: Option<EnumValueKind>,
        last_enum_value: Option<Span>,
    ) {
        if kind == EnumKind::Normal && last_enum_value_kind == Some(EnumValueKind::Computed) {
            if let Some(computed_expression) = last_enum_value {
                self.diags
                    .add(Diag::TypeScriptEnumAutoMemberNeedsInitializerAfterComputed {
                        auto_member_name: member_name,
                        computed_expression,
                    });
            }
        }
    }

    /// Is an enum member initializer constant, computed, or unknown?
    /// Literals are constant; calls are computed; binary operators and
    /// parens fold their children with `unknown` dominant over `computed`
    /// over `constant`.
    pub(crate) fn classify_enum_value_expression(&self, ast: &Expression<'a>) -> EnumValueKind {
        match ast {
            Expression::Call { .. } => EnumValueKind::Computed,
            Expression::Literal { .. } => EnumValueKind::Constant,
            Expression::BinaryOperator { children, .. } => {
                let mut kind = EnumValueKind::Constant;
                for child in children.iter() {
                    match self.classify_enum_value_expression(child) {
                        EnumValueKind::Computed => {
                            if kind != EnumValueKind::Unknown {
                                kind = EnumValueKind::Computed;
                            }
                        }
                        EnumValueKind::Unknown => kind = EnumValueKind::Unknown,
                        EnumValueKind::Constant => {}
                    }
                }
                kind
            }
            Expression::Paren { child, .. } => self.classify_enum_value_expression(child),
            _ => EnumValueKind::Unknown,
        }
    }

    // ========================================================================
    // Imports
    // ========================================================================

    fn parse_and_visit_import<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwImport);
        let import_span = self.peek().span();
        self.skip();

        match self.peek().kind {
            // import var from "module";  // Invalid.
            kind if kind.is_strict_reserved_keyword() => {
                self.diags.add(Diag::CannotImportVariableNamedKeyword {
                    import_name: self.peek().span(),
                });
                self.parse_and_visit_import_default_binding(v, VarKind::Import)?;
            }

            // import \u{76}ar from "module";  // Invalid.
            ReservedKeywordWithEscapeSequence => {
                if let Some(escape) = self.peek().escape_sequence {
                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                        escape_sequence: escape,
                    });
                }
                self.parse_and_visit_import_default_binding(v, VarKind::Import)?;
            }

            // import fs from "fs";
            // import type T from "module";  // TypeScript only.
            KwType => {
                let type_span = self.peek().span();
                let transaction = self.lexer.begin_transaction();
                self.skip();
                match self.peek().kind {
                    // import type T from "module";
                    kind if kind == Identifier
                        || kind == KwAs
                        || kind == KwAsync
                        || kind == KwGet
                        || kind == KwLet
                        || kind == KwOf
                        || kind == KwSet
                        || kind == KwStatic
                        || kind == KwType
                        || kind.is_typescript_only_contextual_keyword() =>
                    {
                        self.lexer.commit_transaction(transaction);
                        self.report_type_only_import_in_javascript_if_needed(type_span);
                        v.visit_variable_declaration(
                            self.peek().identifier_name(),
                            VarKind::ImportType,
                            VarInitKind::Normal,
                        );
                        self.skip();
                        if self.peek().kind == Comma {
                            self.skip();
                            match self.peek().kind {
                                // import type T, {U} from "module";  // Invalid.
                                LeftCurly => {
                                    self.diags.add(
                                        Diag::TypeScriptTypeOnlyImportCannotImportDefaultAndNamed {
                                            type_keyword: type_span,
                                        },
                                    );
                                    // Parse the named imports as if 'type'
                                    // did not appear.
                                    self.parse_and_visit_named_exports(v, None, &mut None)?;
                                }
                                // import type T, * as U from "module";  // Invalid.
                                Star => {
                                    self.diags.add(
                                        Diag::TypeScriptTypeOnlyImportCannotImportDefaultAndNamed {
                                            type_keyword: type_span,
                                        },
                                    );
                                    self.parse_and_visit_name_space_import(v)?;
                                }
                                _ => return Err(self.fail()),
                            }
                        }
                    }

                    // import type {T} from "module";  // TypeScript only.
                    LeftCurly => {
                        self.lexer.commit_transaction(transaction);
                        self.report_type_only_import_in_javascript_if_needed(type_span);
                        self.parse_and_visit_named_exports(v, Some(type_span), &mut None)?;
                    }

                    // import type * as M from "module";  // TypeScript only.
                    Star => {
                        self.lexer.commit_transaction(transaction);
                        self.report_type_only_import_in_javascript_if_needed(type_span);
                        self.parse_and_visit_name_space_import(v)?;
                    }

                    // import type from "module";
                    _ => {
                        self.lexer.roll_back_transaction(transaction);
                        self.parse_and_visit_import_default_binding(v, VarKind::Import)?;
                    }
                }
            }

            kind if kind.is_identifier_like() => {
                self.parse_and_visit_import_default_binding(v, VarKind::Import)?;
            }

            // import {readFile} from "fs";
            LeftCurly => self.parse_and_visit_named_exports(v, None, &mut None)?,

            // import(url).then(() => { /* ... */ })
            // import.meta
            Dot | LeftParen => {
                let import_expression = self.alloc(Expression::Import { span: import_span });
                let ast =
                    self.parse_expression_remainder(v, import_expression, Precedence::default())?;
                self.visit_expression(ast, v, VariableContext::Rhs);
                self.consume_semicolon_after_statement();
                return Ok(());
            }

            // import * as fs from "fs";
            Star => self.parse_and_visit_name_space_import(v)?,

            // import "foo";
            String => {
                self.skip();
                self.consume_semicolon_after_statement();
                return Ok(());
            }

            _ => return Err(self.fail()),
        }

        match self.peek().kind {
            KwFrom => self.skip(),
            String => {
                self.diags.add(Diag::ExpectedFromBeforeModuleSpecifier {
                    module_specifier: self.peek().span(),
                });
            }
            _ => {
                self.diags.add(Diag::ExpectedFromAndModuleSpecifier {
                    where_: self.end_of_previous_token(),
                });
                return Ok(());
            }
        }

        if self.peek().kind != String {
            match self.peek().kind {
                kind if kind.is_keyword() || kind == Identifier => {
                    self.diags.add(Diag::CannotImportFromUnquotedModule {
                        import_name: self.peek().span(),
                    });
                }
                _ => return Err(self.fail()),
            }
        }
        self.skip();

        if self.peek().kind == Semicolon {
            self.skip();
        }
        Ok(())
    }

    fn report_type_only_import_in_javascript_if_needed(&mut self, type_span: Span) {
        if !self.options.typescript {
            self.diags
                .add(Diag::TypeScriptTypeOnlyImportNotAllowedInJavaScript {
                    type_keyword: type_span,
                });
        }
    }

    /// `import defaultBinding [, {names} | , * as ns]`
    fn parse_and_visit_import_default_binding<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        kind: VarKind,
    ) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind == KwLet {
            self.diags.add(Diag::CannotImportLet {
                import_name: self.peek().span(),
            });
        }
        v.visit_variable_declaration(self.peek().identifier_name(), kind, VarInitKind::Normal);
        self.skip();
        if self.peek().kind == Comma {
            self.skip();
            match self.peek().kind {
                // import fs, {readFile} from "fs";
                LeftCurly => self.parse_and_visit_named_exports(v, None, &mut None)?,
                // import fs, * as fs2 from "fs";
                Star => self.parse_and_visit_name_space_import(v)?,
                _ => return Err(self.fail()),
            }
        }
        Ok(())
    }

    /// `* as name`
    fn parse_and_visit_name_space_import<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, Star);
        let star_span = self.peek().span();
        self.skip();

        match self.peek().kind {
            KwAs => self.skip(),
            Identifier => {
                self.diags.add(Diag::ExpectedAsBeforeImportedNamespaceAlias {
                    star_through_alias_token: Span::new(star_span.begin, self.peek().end),
                    star_token: star_span,
                    alias: self.peek().span(),
                });
            }
            _ => return Err(self.fail()),
        }

        match self.peek().kind {
            // import * as var from "module";  // Invalid.
            kind if kind.is_strict_reserved_keyword() => {
                self.diags.add(Diag::CannotImportVariableNamedKeyword {
                    import_name: self.peek().span(),
                });
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            // import * as \u{76}ar from "module";  // Invalid.
            ReservedKeywordWithEscapeSequence => {
                if let Some(escape) = self.peek().escape_sequence {
                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                        escape_sequence: escape,
                    });
                }
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            kind if kind.is_identifier_like() => {
                if kind == TokenKind::KwLet {
                    self.diags.add(Diag::CannotImportLet {
                        import_name: self.peek().span(),
                    });
                }
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            _ => return Err(self.fail()),
        }
        Ok(())
    }

    // ========================================================================
    // Exports
    // ========================================================================

    fn parse_and_visit_export<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwExport);
        let export_token_span = self.peek().span();
        self.skip();

        match self.peek().kind {
            // export default class C {}
            KwDefault => {
                self.skip();
                match self.peek().kind {
                    // export default async function f() {}
                    // export default async () => {}
                    KwAsync => {
                        let async_token = *self.peek();
                        self.skip();
                        if self.peek().kind == KwFunction {
                            self.parse_and_visit_function_declaration(
                                v,
                                FunctionAttributes::Async,
                                async_token.begin,
                                NameRequirement::Optional,
                            )?;
                        } else {
                            let ast =
                                self.parse_async_expression(v, &async_token, Precedence::default())?;
                            self.visit_expression(ast, v, VariableContext::Rhs);
                            self.consume_semicolon_after_statement();
                        }
                    }

                    // export default class C {}
                    KwClass => self.parse_and_visit_class(v, NameRequirement::Optional)?,

                    // export default function f() {}
                    KwFunction => {
                        let begin = self.peek().begin;
                        self.parse_and_visit_function_declaration(
                            v,
                            FunctionAttributes::Normal,
                            begin,
                            NameRequirement::Optional,
                        )?;
                    }

                    // export default let x = null;  // Invalid.
                    KwConst | KwLet | KwVar => {
                        let declaring_token = *self.peek();
                        self.skip();
                        self.diags.add(Diag::CannotExportDefaultVariable {
                            declaring_token: declaring_token.span(),
                        });
                        self.parse_and_visit_let_bindings(v, &declaring_token, true, false, false)?;
                    }

                    // export default 2 + 2;
                    _ => {
                        self.parse_and_visit_expression(v)?;
                        self.consume_semicolon_after_statement();
                    }
                }
            }

            // export * from "module";
            // export * as name from "module";
            Star => {
                self.skip();
                if self.peek().kind == KwAs {
                    self.skip();
                    match self.peek().kind {
                        kind if kind == String
                            || kind == Identifier
                            || kind == ReservedKeywordWithEscapeSequence
                            || kind.is_keyword() =>
                        {
                            self.skip();
                        }
                        _ => return Err(self.fail()),
                    }
                }
                self.expect(KwFrom)?;
                self.skip();
                self.expect(String)?;
                self.skip();
                self.consume_semicolon_after_statement();
            }

            // export {a as default, b};
            // export {a, b, c} from "module";
            LeftCurly => {
                let mut exports_visitor = BufferingVisitor::new();
                let mut exported_bad_tokens: Option<Vec<Token>> = Some(Vec::new());
                self.parse_and_visit_named_exports(
                    &mut exports_visitor,
                    None,
                    &mut exported_bad_tokens,
                )?;
                let exported_bad_tokens = exported_bad_tokens.unwrap_or_default();
                if self.peek().kind == KwFrom {
                    // export {a, b, c} from "module";
                    self.skip();
                    self.expect(String)?;
                    self.skip();
                    // The buffered visits are re-exports of another
                    // module's bindings; they are deliberately dropped.
                } else {
                    // export {a as default, b};
                    for bad_token in &exported_bad_tokens {
                        match bad_token.kind {
                            ReservedKeywordWithEscapeSequence => {
                                if let Some(escape) = bad_token.escape_sequence {
                                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                                        escape_sequence: escape,
                                    });
                                }
                            }
                            String => {
                                self.diags.add(
                                    Diag::ExportingStringNameOnlyAllowedForExportFrom {
                                        export_name: bad_token.span(),
                                    },
                                );
                            }
                            _ => {
                                self.diags.add(Diag::CannotExportVariableNamedKeyword {
                                    export_name: bad_token.span(),
                                });
                            }
                        }
                    }
                    exports_visitor.move_into(v);
                }
                self.consume_semicolon_after_statement();
            }

            // export async function f() {}
            KwAsync => {
                let async_begin = self.peek().begin;
                self.skip();
                self.expect(KwFunction)?;
                self.parse_and_visit_function_declaration(
                    v,
                    FunctionAttributes::Async,
                    async_begin,
                    NameRequirement::RequiredForExport,
                )?;
            }

            // export function f() {}
            KwFunction => {
                let begin = self.peek().begin;
                self.parse_and_visit_function_declaration(
                    v,
                    FunctionAttributes::Normal,
                    begin,
                    NameRequirement::RequiredForExport,
                )?;
            }

            // export class C {}
            KwClass => self.parse_and_visit_class(v, NameRequirement::RequiredForExport)?,

            // export let x = 42;
            KwConst | KwLet | KwVar => self.parse_and_visit_variable_declaration_statement(v)?,

            // export stuff;    // Invalid.
            // export 2 + 2;    // Invalid.
            Identifier | Number => {
                let ast = self.parse_expression(v, Precedence::default())?;
                match ast {
                    Expression::Variable { .. } => {
                        self.diags
                            .add(Diag::ExportingRequiresCurlies { names: ast.span() });
                    }
                    _ => {
                        self.diags.add(Diag::ExportingRequiresDefault {
                            expression: ast.span(),
                        });
                    }
                }
                self.visit_expression(ast, v, VariableContext::Rhs);
                self.consume_semicolon_after_statement();
            }

            EndOfFile | Semicolon => {
                self.diags.add(Diag::MissingTokenAfterExport {
                    export_token: export_token_span,
                });
            }

            _ => {
                self.diags.add(Diag::UnexpectedTokenAfterExport {
                    unexpected_token: self.peek().span(),
                });
            }
        }
        Ok(())
    }

    /// Parse `{a, b as c, type T, "s" as d}` for either an import or an
    /// export. For exports, keyword-shaped names are collected in
    /// `out_exported_bad_tokens` and reported by the caller (only the
    /// local form `export {x}` makes them errors).
    fn parse_and_visit_named_exports<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        type_only_keyword: Option<Span>,
        out_exported_bad_tokens: &mut Option<Vec<Token>>,
    ) -> ParseResult<()> {
        use TokenKind::*;
        self.expect(LeftCurly)?;
        self.skip();

        let is_export = out_exported_bad_tokens.is_some();
        if is_export {
            debug_assert!(type_only_keyword.is_none());
        }

        loop {
            match self.peek().kind {
                RightCurly => break,

                kind if kind == ReservedKeywordWithEscapeSequence
                    || kind.is_strict_reserved_keyword() =>
                {
                    if let Some(bad_tokens) = out_exported_bad_tokens.as_mut() {
                        bad_tokens.push(*self.peek());
                    }
                    self.parse_and_visit_named_entry(
                        v,
                        is_export,
                        /*left_is_keyword=*/ true,
                        /*is_local_type_import=*/ false,
                        type_only_keyword,
                    )?;
                }

                // import {type} from "other";
                // import {type as alias} from "other";
                // import {type T} from "other";         // TypeScript only.
                KwType => {
                    let type_span = self.peek().span();
                    let transaction = self.lexer.begin_transaction();
                    self.skip();
                    match self.peek().kind {
                        // import {type T} from "other";
                        kind if kind == Identifier
                            || kind == KwAsync
                            || kind == KwFrom
                            || kind == KwGet
                            || kind == KwLet
                            || kind == KwOf
                            || kind == KwSet
                            || kind == KwStatic
                            || kind == KwType
                            || kind.is_typescript_only_contextual_keyword() =>
                        {
                            self.report_inline_type_import_if_needed(type_span, type_only_keyword);
                            self.lexer.commit_transaction(transaction);
                            self.parse_and_visit_named_entry(
                                v,
                                is_export,
                                false,
                                /*is_local_type_import=*/ true,
                                type_only_keyword,
                            )?;
                        }
                        KwAs => {
                            self.skip();
                            match self.peek().kind {
                                // import {type as} from "mod";  // TypeScript only.
                                Comma | RightCurly => {
                                    self.report_inline_type_import_if_needed(
                                        type_span,
                                        type_only_keyword,
                                    );
                                    self.lexer.roll_back_transaction(transaction);
                                    self.skip(); // Skip 'type'.
                                    debug_assert_eq!(self.peek().kind, KwAs);
                                    self.parse_and_visit_named_entry(
                                        v,
                                        is_export,
                                        false,
                                        /*is_local_type_import=*/ true,
                                        type_only_keyword,
                                    )?;
                                }
                                // import {type as alias} from "mod";
                                _ => {
                                    self.lexer.roll_back_transaction(transaction);
                                    self.parse_and_visit_named_entry(
                                        v,
                                        is_export,
                                        false,
                                        false,
                                        type_only_keyword,
                                    )?;
                                }
                            }
                        }
                        // import {type} from "other";
                        _ => {
                            self.lexer.roll_back_transaction(transaction);
                            self.parse_and_visit_named_entry(
                                v,
                                is_export,
                                false,
                                false,
                                type_only_keyword,
                            )?;
                        }
                    }
                }

                // import {"export name" as varName} from "other";
                // export {"export name"} from "other";
                String => {
                    if is_export {
                        if let Some(bad_tokens) = out_exported_bad_tokens.as_mut() {
                            bad_tokens.push(*self.peek());
                        }
                        self.skip();
                    } else {
                        self.skip();
                        self.expect(KwAs)?;
                        self.skip();
                        self.parse_and_visit_import_alias_name(v)?;
                    }
                }

                kind if kind.is_identifier_like() => {
                    self.parse_and_visit_named_entry(
                        v,
                        is_export,
                        false,
                        false,
                        type_only_keyword,
                    )?;
                }

                _ => return Err(self.fail()),
            }

            if self.peek().kind == Comma {
                self.skip();
            }
        }

        self.expect(RightCurly)?;
        self.skip();
        Ok(())
    }

    fn report_inline_type_import_if_needed(
        &mut self,
        type_span: Span,
        type_only_keyword: Option<Span>,
    ) {
        if !self.options.typescript {
            self.diags
                .add(Diag::TypeScriptInlineTypeImportNotAllowedInJavaScript {
                    type_keyword: type_span,
                });
        }
        if let Some(outer) = type_only_keyword {
            self.diags
                .add(Diag::TypeScriptInlineTypeImportNotAllowedInTypeOnlyImport {
                    inline_type_keyword: type_span,
                    type_only_keyword: outer,
                });
        }
    }

    /// One `name [as alias]` entry of a named import/export list, with
    /// the current token naming the entry.
    fn parse_and_visit_named_entry<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        is_export: bool,
        left_is_keyword: bool,
        is_local_type_import: bool,
        type_only_keyword: Option<Span>,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let left_token = *self.peek();
        let left_name = left_token.identifier_name();
        let mut right_token = left_token;
        self.skip();
        let has_as = self.peek().kind == KwAs;
        if has_as {
            self.skip();
            match self.peek().kind {
                kind if kind == String
                    || kind == Identifier
                    || kind == ReservedKeywordWithEscapeSequence
                    || kind.is_keyword() =>
                {
                    right_token = *self.peek();
                    self.skip();
                }
                _ => return Err(self.fail()),
            }
        }

        if is_export {
            if left_is_keyword {
                // The caller reports these from its bad-token list.
            } else {
                v.visit_variable_export_use(left_name);
            }
            return Ok(());
        }

        let imported_kind = if is_local_type_import || type_only_keyword.is_some() {
            VarKind::ImportType
        } else {
            VarKind::Import
        };
        match right_token.kind {
            // import {myFunc} from 'other';
            // import {myFunc as let} from 'other';  // Invalid.
            kind if kind == Identifier || kind.is_contextual_keyword() => {
                if kind == KwLet {
                    self.diags.add(Diag::CannotImportLet {
                        import_name: right_token.span(),
                    });
                }
                v.visit_variable_declaration(
                    right_token.identifier_name(),
                    imported_kind,
                    VarInitKind::Normal,
                );
            }
            // import {var} from 'other';  // Invalid.
            kind if kind.is_strict_reserved_keyword() => {
                self.diags.add(Diag::CannotImportVariableNamedKeyword {
                    import_name: right_token.span(),
                });
                v.visit_variable_declaration(
                    right_token.identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
            }
            // import {\u{76}ar} from 'other';  // Invalid.
            ReservedKeywordWithEscapeSequence => {
                if let Some(escape) = right_token.escape_sequence {
                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                        escape_sequence: escape,
                    });
                }
                v.visit_variable_declaration(
                    right_token.identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
            }
            String => {
                debug_assert!(has_as);
                self.diags.add(Diag::ExpectedVariableNameForImportAs {
                    unexpected_token: right_token.span(),
                });
            }
            _ => return Err(self.fail()),
        }
        Ok(())
    }

    /// The variable name after `"string name" as` in an import.
    fn parse_and_visit_import_alias_name<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        match self.peek().kind {
            kind if kind == Identifier || kind.is_contextual_keyword() => {
                if kind == KwLet {
                    self.diags.add(Diag::CannotImportLet {
                        import_name: self.peek().span(),
                    });
                }
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            kind if kind.is_strict_reserved_keyword() => {
                self.diags.add(Diag::CannotImportVariableNamedKeyword {
                    import_name: self.peek().span(),
                });
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            ReservedKeywordWithEscapeSequence => {
                if let Some(escape) = self.peek().escape_sequence {
                    self.diags.add(Diag::KeywordsCannotContainEscapeSequences {
                        escape_sequence: escape,
                    });
                }
                v.visit_variable_declaration(
                    self.peek().identifier_name(),
                    VarKind::Import,
                    VarInitKind::Normal,
                );
                self.skip();
            }
            String => {
                self.diags.add(Diag::ExpectedVariableNameForImportAs {
                    unexpected_token: self.peek().span(),
                });
                self.skip();
            }
            _ => return Err(self.fail()),
        }
        Ok(())
    }

    // ========================================================================
    // switch
    // ========================================================================

    fn parse_and_visit_switch<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwSwitch);
        let switch_token_span = self.peek().span();
        self.skip();

        if self.peek().kind == LeftCurly {
            // switch { case 1: break; }  // Invalid.
            self.diags.add(Diag::MissingConditionForSwitchStatement {
                switch_keyword: switch_token_span,
            });
        } else {
            self.parse_and_visit_parenthesized_expression(v, StatementKind::SwitchStatement)?;
        }

        let mut left_curly_span = None;
        match self.peek().kind {
            LeftCurly => {
                left_curly_span = Some(self.peek().span());
                self.skip();
            }
            KwCase | KwDefault => {
                self.diags.add(Diag::ExpectedLeftCurly {
                    expected_left_curly: self.end_of_previous_token(),
                });
            }
            _ => {
                self.diags.add(Diag::MissingBodyForSwitchStatement {
                    switch_and_condition: self.end_of_previous_token(),
                });
                return Ok(());
            }
        }

        v.visit_enter_block_scope();
        let result = self.parse_and_visit_switch_body(v, left_curly_span);
        v.visit_exit_block_scope();
        result
    }

    fn parse_and_visit_switch_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        left_curly_span: Option<Span>,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let mut is_before_first_switch_case = true;
        loop {
            match self.peek().kind {
                RightCurly => {
                    self.skip();
                    return Ok(());
                }

                KwCase => {
                    is_before_first_switch_case = false;
                    let case_token_span = self.peek().span();
                    self.skip();
                    if self.peek().kind == Colon {
                        self.diags.add(Diag::ExpectedExpressionForSwitchCase {
                            case_token: case_token_span,
                        });
                        self.skip();
                    } else {
                        self.parse_and_visit_expression(v)?;
                        self.expect(Colon)?;
                        self.skip();
                    }
                }

                KwDefault => {
                    is_before_first_switch_case = false;
                    self.skip();
                    self.expect(Colon)?;
                    self.skip();
                }

                EndOfFile => {
                    if let Some(block_open) = left_curly_span {
                        self.diags.add(Diag::UnclosedCodeBlock { block_open });
                    }
                    return Ok(());
                }

                _ => {
                    if is_before_first_switch_case {
                        self.diags.add(Diag::StatementBeforeFirstSwitchCase {
                            unexpected_statement: self.peek().span(),
                        });
                    }
                    let parsed =
                        self.parse_and_visit_statement(v, StatementMode::AnyStatementInBlock)?;
                    if !parsed {
                        return Err(self.fail());
                    }
                }
            }
        }
    }

    // ========================================================================
    // try / catch / finally
    // ========================================================================

    fn parse_and_visit_try_maybe_catch_maybe_finally<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::KwTry);
        let try_token_span = self.peek().span();
        self.skip();

        let mut parsed_try_body = false;
        if self.peek().kind == TokenKind::LeftCurly {
            parsed_try_body = true;
            v.visit_enter_block_scope();
            let result = self.parse_and_visit_statement_block_no_scope(v);
            v.visit_exit_block_scope();
            result?;
        } else {
            self.diags.add(Diag::MissingBodyForTryStatement {
                try_token: try_token_span,
            });
        }

        let parsed_catch_or_finally = self.parse_and_visit_catch_or_finally_or_both(v)?;
        if parsed_try_body && !parsed_catch_or_finally {
            self.diags.add(Diag::MissingCatchOrFinallyForTryStatement {
                expected_catch_or_finally: self.end_of_previous_token(),
                try_token: try_token_span,
            });
        }
        Ok(())
    }

    fn parse_and_visit_catch_or_finally_or_both<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<bool> {
        let mut parsed_catch = false;
        let mut parsed_finally = false;

        if self.peek().kind == TokenKind::KwCatch {
            parsed_catch = true;
            self.skip();

            v.visit_enter_block_scope();
            let result = self.parse_and_visit_catch_clause_no_scope(v);
            v.visit_exit_block_scope();
            result?;
        }

        if self.peek().kind == TokenKind::KwFinally {
            parsed_finally = true;
            let finally_token_span = self.peek().span();
            self.skip();

            if self.peek().kind == TokenKind::LeftCurly {
                v.visit_enter_block_scope();
                let result = self.parse_and_visit_statement_block_no_scope(v);
                v.visit_exit_block_scope();
                result?;
            } else {
                self.diags.add(Diag::MissingBodyForFinallyClause {
                    finally_token: finally_token_span,
                });
            }
        }

        Ok(parsed_catch || parsed_finally)
    }

    fn parse_and_visit_catch_clause_no_scope<V: ParseVisitor>(
        &mut self,
        v: &mut V,
    ) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind == LeftParen {
            let catch_left_paren_span = self.peek().span();
            self.skip();

            match self.peek().kind {
                kind if kind == KwAwait || kind == KwYield || kind.is_identifier_like() => {
                    match kind {
                        KwAwait if self.in_async_function => {
                            self.diags.add(Diag::CannotDeclareAwaitInAsyncFunction {
                                name: self.peek().span(),
                            });
                        }
                        KwYield if self.in_generator_function => {
                            self.diags.add(Diag::CannotDeclareYieldInGeneratorFunction {
                                name: self.peek().span(),
                            });
                        }
                        _ => {}
                    }
                    v.visit_variable_declaration(
                        self.peek().identifier_name(),
                        VarKind::Catch,
                        VarInitKind::Normal,
                    );
                    self.skip();
                }

                LeftCurly | LeftSquare => {
                    let ast = self.parse_expression(
                        v,
                        Precedence {
                            commas: false,
                            in_operator: false,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_binding_element(ast, v, VarKind::Catch, None, VarInitKind::Normal);
                }

                RightParen => {
                    self.diags.add(Diag::MissingCatchVariableBetweenParentheses {
                        left_paren_to_right_paren: Span::new(
                            catch_left_paren_span.begin,
                            self.peek().end,
                        ),
                    });
                }

                // catch ("junk") {}
                String => {
                    self.diags.add(Diag::ExpectedVariableNameForCatch {
                        unexpected_token: self.peek().span(),
                    });
                    self.skip();
                }

                _ => return Err(self.fail()),
            }

            if self.peek().kind == Colon {
                // catch (e: Type)  // TypeScript only.
                if !self.options.typescript {
                    self.diags
                        .add(Diag::TypeScriptTypeAnnotationsNotAllowedInJavaScript {
                            type_colon: self.peek().span(),
                        });
                }
                self.skip();
                match self.peek().kind {
                    // catch (e: any)
                    // catch (e: unknown)
                    // catch (e: *)
                    KwAny | KwUnknown | Star => self.skip(),
                    _ => {
                        let type_begin = self.peek().begin;
                        let mut null_visitor = fastlint_ast::visitor::NullVisitor;
                        self.parse_and_visit_type_expression(&mut null_visitor)?;
                        let type_end = self.lexer.end_of_previous_token();
                        if self.options.typescript {
                            self.diags.add(Diag::TypeScriptCatchTypeAnnotationMustBeAny {
                                type_expression: Span::new(type_begin, type_end),
                            });
                        }
                    }
                }
            }

            self.expect(RightParen)?;
            self.skip();
        }

        if self.peek().kind == LeftCurly {
            self.parse_and_visit_statement_block_no_scope(v)?;
        } else {
            self.diags.add(Diag::MissingBodyForCatchClause {
                catch_token: self.end_of_previous_token(),
            });
        }
        Ok(())
    }

    // ========================================================================
    // Loops and conditionals
    // ========================================================================

    fn parse_and_visit_do_while<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::KwDo);
        let do_token_span = self.peek().span();
        self.skip();

        if self.peek().kind == TokenKind::KwWhile {
            self.diags.add(Diag::MissingBodyForDoWhileStatement {
                do_token: do_token_span,
            });
        } else {
            self.error_on_class_statement(StatementKind::DoWhileLoop);
            self.error_on_function_statement(StatementKind::DoWhileLoop);
            self.error_on_lexical_declaration(StatementKind::DoWhileLoop);
            let parsed = self.parse_and_visit_statement(v, StatementMode::NoDeclarations)?;
            if !parsed {
                return Err(self.fail());
            }
        }

        if self.peek().kind != TokenKind::KwWhile {
            self.diags
                .add(Diag::MissingWhileAndConditionForDoWhileStatement {
                    do_token: do_token_span,
                    expected_while: self.end_of_previous_token(),
                });
            return Ok(());
        }
        self.skip();

        self.parse_and_visit_parenthesized_expression(v, StatementKind::DoWhileLoop)?;

        if self.peek().kind == TokenKind::Semicolon {
            self.skip();
        }
        Ok(())
    }

    fn parse_and_visit_while<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::KwWhile);
        let while_token_span = self.peek().span();
        self.skip();

        if self.peek().kind == TokenKind::LeftCurly {
            // while { body; }  // Invalid.
            self.diags.add(Diag::MissingConditionForWhileStatement {
                while_keyword: while_token_span,
            });
        } else {
            self.parse_and_visit_parenthesized_expression(v, StatementKind::WhileLoop)?;
        }

        self.error_on_class_statement(StatementKind::WhileLoop);
        self.error_on_function_statement(StatementKind::WhileLoop);
        self.error_on_lexical_declaration(StatementKind::WhileLoop);
        let parsed = self.parse_and_visit_statement(v, StatementMode::NoDeclarations)?;
        if !parsed {
            self.diags.add(Diag::MissingBodyForWhileStatement {
                while_and_condition: self.end_of_previous_token(),
            });
        }
        Ok(())
    }

    fn parse_and_visit_with<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::KwWith);
        self.skip();

        self.parse_and_visit_parenthesized_expression(v, StatementKind::WithStatement)?;

        self.error_on_class_statement(StatementKind::WithStatement);
        self.error_on_function_statement(StatementKind::WithStatement);
        self.error_on_lexical_declaration(StatementKind::WithStatement);

        v.visit_enter_with_scope();
        let result = (|| {
            let parsed = self.parse_and_visit_statement(v, StatementMode::NoDeclarations)?;
            if !parsed {
                return Err(self.fail());
            }
            Ok(())
        })();
        v.visit_exit_with_scope();
        result
    }

    fn parse_and_visit_if<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        use TokenKind::*;
        debug_assert_eq!(self.peek().kind, KwIf);
        let if_token_span = self.peek().span();
        self.skip();

        if self.peek().kind == LeftCurly {
            // if { body; }  // Invalid.
            self.diags.add(Diag::MissingConditionForIfStatement {
                if_keyword: if_token_span,
            });
        } else {
            self.parse_and_visit_parenthesized_expression(v, StatementKind::IfStatement)?;
        }

        match self.peek().kind {
            EndOfFile | KwElse | RightCurly => {
                self.diags.add(Diag::MissingBodyForIfStatement {
                    expected_body: self.end_of_previous_token(),
                });
            }
            _ => self.parse_and_visit_if_body(v)?,
        }

        loop {
            if self.peek().kind != KwElse {
                return Ok(());
            }
            self.skip();
            let end_of_else = self.lexer.end_of_previous_token();
            let has_left_paren = self.peek().kind == LeftParen;
            if has_left_paren {
                self.parse_and_visit_expression_prec(
                    v,
                    Precedence {
                        trailing_curly_is_arrow_body: false,
                        ..Precedence::default()
                    },
                )?;
            } else {
                self.parse_and_visit_if_body(v)?;
            }
            let has_left_curly = self.peek().kind == LeftCurly;
            if !self.peek().has_leading_newline && has_left_paren && has_left_curly {
                // if (cond) {} else (cond) {}  // Invalid.
                self.diags.add(Diag::MissingIfAfterElse {
                    expected_if: Span::empty(end_of_else),
                });
                self.parse_and_visit_if_body(v)?;
                continue;
            }
            return Ok(());
        }
    }

    fn parse_and_visit_if_body<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        self.error_on_class_statement(StatementKind::IfStatement);
        self.error_on_lexical_declaration(StatementKind::IfStatement);
        let entered_block_scope = self.is_maybe_function_statement();
        if entered_block_scope {
            v.visit_enter_block_scope();
        }

        let result = (|| {
            let parsed = self.parse_and_visit_statement(v, StatementMode::NoDeclarations)?;
            if !parsed {
                return Err(self.fail());
            }
            Ok(())
        })();

        if entered_block_scope {
            v.visit_exit_block_scope();
        }
        result
    }

    fn parse_and_visit_for<V: ParseVisitor>(&mut self, v: &mut V) -> ParseResult<()> {
        debug_assert_eq!(self.peek().kind, TokenKind::KwFor);
        let for_token_span = self.peek().span();
        self.skip();

        if self.peek().kind == TokenKind::KwAwait {
            // for await (const x of xs) {}
            self.skip();
        }

        if self.peek().kind != TokenKind::LeftParen {
            self.diags.add(Diag::MissingForLoopHeader {
                for_token: for_token_span,
            });
            return Ok(());
        }
        let left_paren_token_begin = self.peek().begin;
        self.skip();

        let mut entered_for_scope = false;
        let result = self.parse_and_visit_for_header_and_body(
            v,
            for_token_span,
            left_paren_token_begin,
            &mut entered_for_scope,
        );
        if entered_for_scope {
            v.visit_exit_for_scope();
        }
        result
    }

    fn parse_and_visit_for_header_and_body<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        for_token_span: Span,
        left_paren_token_begin: u32,
        entered_for_scope: &mut bool,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let mut after_expression: Option<&'a Expression<'a>> = None;
        let mut for_loop_style = LoopStyle::Other;

        match self.peek().kind {
            // for (;;) {}
            Semicolon => {
                let first_semicolon_span = self.peek().span();
                self.skip();
                for_loop_style = LoopStyle::CStyle;
                self.parse_c_style_head_remainder(v, first_semicolon_span, &mut after_expression)?;
            }

            // for (let i = 0; i < length; ++i) {}
            // for (let x of xs) {}
            // for (let in xs) {}
            KwConst | KwLet | KwVar => {
                if matches!(self.peek().kind, KwConst | KwLet) {
                    v.visit_enter_for_scope();
                    *entered_for_scope = true;
                }
                let declaring_token = *self.peek();

                let transaction = self.lexer.begin_transaction();
                self.skip();
                let mut lhs = BufferingVisitor::new();
                if declaring_token.kind == KwLet
                    && is_let_token_a_variable_reference(self.peek(), true)
                {
                    // for (let = expression; cond; up) {}
                    // for (let in myArray) {}
                    self.lexer.roll_back_transaction(transaction);
                    let ast = self.parse_expression(
                        v,
                        Precedence {
                            in_operator: false,
                            ..Precedence::default()
                        },
                    )?;
                    self.visit_expression(ast, &mut lhs, VariableContext::Lhs);
                    self.maybe_visit_assignment(ast, &mut lhs);
                } else if declaring_token.kind == KwLet && self.peek().kind == KwOf {
                    self.skip();
                    match self.peek().kind {
                        // for (let of xs) {}  // Invalid.
                        Identifier => {
                            self.lexer.roll_back_transaction(transaction);
                            self.skip(); // Re-parse 'let'.
                            self.diags.add(Diag::LetWithNoBindings {
                                where_: declaring_token.span(),
                            });
                        }
                        // for (let of of xs) {}
                        // for (let of = 3; cond; update) {}
                        _ => {
                            self.lexer.roll_back_transaction(transaction);
                            self.skip(); // Re-parse 'let'.
                            self.parse_and_visit_let_bindings(
                                &mut lhs,
                                &declaring_token,
                                /*allow_in_operator=*/ false,
                                /*allow_const_without_initializer=*/ false,
                                /*is_in_for_initializer=*/ true,
                            )?;
                        }
                    }
                } else {
                    // for (let i = 0; i < length; ++i) {}
                    // for (let x of xs) {}
                    self.lexer.commit_transaction(transaction);
                    self.parse_and_visit_let_bindings(
                        &mut lhs,
                        &declaring_token,
                        /*allow_in_operator=*/ false,
                        /*allow_const_without_initializer=*/ true,
                        /*is_in_for_initializer=*/ true,
                    )?;
                }

                match self.peek().kind {
                    // for (let i = 0; i < length; ++i) {}
                    Semicolon => {
                        let first_semicolon_span = self.peek().span();
                        self.skip();
                        lhs.move_into(v);
                        for_loop_style = LoopStyle::CStyle;
                        self.parse_c_style_head_remainder(
                            v,
                            first_semicolon_span,
                            &mut after_expression,
                        )?;
                    }

                    // for (let x of xs) {}
                    KwIn | KwOf => {
                        for_loop_style = if self.peek().kind == KwIn {
                            LoopStyle::ForIn
                        } else {
                            LoopStyle::ForOf
                        };
                        let is_var_in = declaring_token.kind == KwVar
                            && for_loop_style == LoopStyle::ForIn;
                        self.skip();
                        let rhs = self.parse_expression(v, Precedence::default())?;
                        if is_var_in {
                            // In `for (var x = init in array)`, 'init' is
                            // evaluated before 'array'.
                            lhs.move_into(v);
                        }
                        self.visit_expression(rhs, v, VariableContext::Rhs);
                        if !is_var_in {
                            // In `for (let x in array)`, 'array' is
                            // evaluated before 'x' is declared.
                            lhs.move_into(v);
                        }
                    }

                    // for (let myVariable) {}    // Invalid.
                    RightParen => {
                        self.diags
                            .add(Diag::MissingForLoopRhsOrComponentsAfterDeclaration {
                                header: Span::new(left_paren_token_begin, self.peek().end),
                                for_token: for_token_span,
                            });
                        lhs.move_into(v);
                        for_loop_style = LoopStyle::ForOf;
                    }

                    _ => return Err(self.fail()),
                }
            }

            // for (async of things) {}  // Invalid.
            // for (async of => {}; condition; update) {}
            KwAsync => {
                let async_token = *self.peek();

                let transaction = self.lexer.begin_transaction();
                let mut is_invalid_async_of_sequence = false;
                self.skip();
                if self.peek().kind == KwOf {
                    self.skip();
                    if self.peek().kind != EqualGreater {
                        is_invalid_async_of_sequence = true;
                    }
                }
                self.lexer.roll_back_transaction(transaction);

                let init_expression = if is_invalid_async_of_sequence {
                    self.diags
                        .add(Diag::CannotAssignToVariableNamedAsyncInForOfLoop {
                            async_identifier: async_token.span(),
                        });
                    self.skip();
                    debug_assert_eq!(self.peek().kind, KwOf);
                    self.alloc(Expression::Variable {
                        name: async_token.identifier_name(),
                        token_kind: async_token.kind,
                    })
                } else {
                    self.parse_expression(
                        v,
                        Precedence {
                            in_operator: false,
                            ..Precedence::default()
                        },
                    )?
                };
                self.parse_for_in_of_or_condition_update(
                    v,
                    init_expression,
                    for_token_span,
                    left_paren_token_begin,
                    &mut after_expression,
                    &mut for_loop_style,
                )?;
            }

            // for () {}  // Invalid.
            RightParen => {
                self.diags.add(Diag::MissingHeaderOfForLoop {
                    where_: Span::new(left_paren_token_begin, self.peek().end),
                });
                for_loop_style = LoopStyle::Other;
            }

            // for (init; condition; update) {}
            // for (item of things) {}
            _ => {
                let init_expression = self.parse_expression(
                    v,
                    Precedence {
                        in_operator: false,
                        ..Precedence::default()
                    },
                )?;
                self.parse_for_in_of_or_condition_update(
                    v,
                    init_expression,
                    for_token_span,
                    left_paren_token_begin,
                    &mut after_expression,
                    &mut for_loop_style,
                )?;
            }
        }

        // for (;;;) {}  // Invalid.
        // for (x of y; z) {}  // Invalid.
        while self.peek().kind == Semicolon {
            match for_loop_style {
                LoopStyle::CStyle | LoopStyle::Other => {
                    self.diags.add(Diag::UnexpectedSemicolonInCStyleForLoop {
                        semicolon: self.peek().span(),
                    });
                }
                LoopStyle::ForIn => {
                    self.diags.add(Diag::UnexpectedSemicolonInForInLoop {
                        semicolon: self.peek().span(),
                    });
                }
                LoopStyle::ForOf => {
                    self.diags.add(Diag::UnexpectedSemicolonInForOfLoop {
                        semicolon: self.peek().span(),
                    });
                }
            }
            self.skip();
            match self.peek().kind {
                Semicolon | RightParen => {}
                _ => {
                    self.parse_and_visit_expression(v)?;
                }
            }
        }

        self.expect(RightParen)?;
        self.skip();

        self.error_on_class_statement(StatementKind::ForLoop);
        self.error_on_function_statement(StatementKind::ForLoop);
        self.error_on_lexical_declaration(StatementKind::ForLoop);
        let parsed_body = self.parse_and_visit_statement(v, StatementMode::NoDeclarations)?;
        if !parsed_body {
            self.diags.add(Diag::MissingBodyForForStatement {
                for_and_header: self.end_of_previous_token(),
            });
        }

        if let Some(after) = after_expression {
            self.visit_expression(after, v, VariableContext::Rhs);
        }
        Ok(())
    }

    /// After a `for` initializer expression: `;` heads a C-style loop,
    /// `in`/`of` head an enumerating loop.
    fn parse_for_in_of_or_condition_update<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        init_expression: &'a Expression<'a>,
        for_token_span: Span,
        left_paren_token_begin: u32,
        after_expression: &mut Option<&'a Expression<'a>>,
        for_loop_style: &mut LoopStyle,
    ) -> ParseResult<()> {
        use TokenKind::*;
        loop {
            match self.peek().kind {
                // for (init; condition; update) {}
                Semicolon => {
                    let first_semicolon_span = self.peek().span();
                    self.skip();
                    self.visit_expression(init_expression, v, VariableContext::Rhs);
                    *for_loop_style = LoopStyle::CStyle;
                    return self.parse_c_style_head_remainder(
                        v,
                        first_semicolon_span,
                        after_expression,
                    );
                }

                // for (lhs in rhs) {}
                // for (lhs in rhs; condition; update) {}  // Invalid.
                KwIn => {
                    let in_token_span = self.peek().span();
                    self.skip();
                    let rhs = self.parse_expression(v, Precedence::default())?;
                    self.visit_assignment_expression(init_expression, rhs, v);
                    *for_loop_style = LoopStyle::ForIn;
                    if self.peek().kind == Semicolon {
                        self.diags.add(Diag::InDisallowedInCStyleForLoop {
                            in_token: in_token_span,
                        });
                        let first_semicolon_span = self.peek().span();
                        self.skip();
                        return self.parse_c_style_head_remainder(
                            v,
                            first_semicolon_span,
                            after_expression,
                        );
                    }
                    return Ok(());
                }

                // for (lhs of rhs) {}
                KwOf => {
                    self.skip();
                    let rhs = self.parse_expression(v, Precedence::default())?;
                    self.visit_assignment_expression(init_expression, rhs, v);
                    *for_loop_style = LoopStyle::ForOf;
                    return Ok(());
                }

                // for (expression) {}    // Invalid.
                RightParen => {
                    self.diags
                        .add(Diag::MissingForLoopRhsOrComponentsAfterExpression {
                            header: Span::new(left_paren_token_begin, self.peek().end),
                            for_token: for_token_span,
                        });
                    self.visit_expression(init_expression, v, VariableContext::Rhs);
                    *for_loop_style = LoopStyle::CStyle;
                    return Ok(());
                }

                // for (lhs rhs) {}  // Invalid.
                _ => {
                    self.lexer.insert_semicolon();
                    self.diags
                        .add(Diag::MissingSemicolonBetweenForLoopInitAndCondition {
                            expected_semicolon: self.peek().span(),
                        });
                    continue;
                }
            }
        }
    }

    /// After the first `;` of a C-style `for` head: optional condition,
    /// `;`, optional update. The update expression is stashed for the
    /// caller to visit after the body (evaluation order).
    fn parse_c_style_head_remainder<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        first_semicolon_span: Span,
        after_expression: &mut Option<&'a Expression<'a>>,
    ) -> ParseResult<()> {
        use TokenKind::*;
        if self.peek().kind != Semicolon {
            let ast = self.parse_expression(v, Precedence::default())?;
            self.visit_expression(ast, v, VariableContext::Rhs);
        }

        loop {
            match self.peek().kind {
                // for (init; cond; update) {}
                Semicolon => {
                    self.skip();
                    if self.peek().kind != RightParen {
                        *after_expression = Some(self.parse_expression(v, Precedence::default())?);
                    }
                    return Ok(());
                }

                // for (init; cond) {}  // Invalid.
                RightParen => {
                    self.diags.add(Diag::CStyleForLoopIsMissingThirdComponent {
                        expected_last_component: self.peek().span(),
                        existing_semicolon: first_semicolon_span,
                    });
                    return Ok(());
                }

                // for (init; cond update) {}  // Invalid.
                _ => {
                    self.lexer.insert_semicolon();
                    self.diags
                        .add(Diag::MissingSemicolonBetweenForLoopConditionAndUpdate {
                            expected_semicolon: self.peek().span(),
                        });
                    continue;
                }
            }
        }
    }

    // ========================================================================
    // Shared statement helpers
    // ========================================================================

    /// Parse `( expression )` after `if`/`while`/`do-while`/`switch`/
    /// `with`, reporting missing parentheses but parsing the condition
    /// either way.
    fn parse_and_visit_parenthesized_expression<V: ParseVisitor>(
        &mut self,
        v: &mut V,
        statement: StatementKind,
    ) -> ParseResult<()> {
        use TokenKind::*;
        let have_left_paren = self.peek().kind == LeftParen;
        if have_left_paren {
            self.skip();
        }
        let condition_begin = self.peek().begin;
        let ast = self.parse_expression(v, Precedence::default())?;
        self.visit_expression(ast, v, VariableContext::Rhs);
        let condition_end = self.lexer.end_of_previous_token();

        let have_right_paren = self.peek().kind == RightParen;
        if have_right_paren {
            self.skip();
        }

        if !have_left_paren && !have_right_paren {
            self.diags.add(Diag::ExpectedParenthesesAroundCondition {
                condition: Span::new(condition_begin, condition_end),
                statement,
            });
        } else if !have_left_paren {
            self.diags.add(Diag::ExpectedParenthesisAroundCondition {
                where_: Span::empty(condition_begin),
                side: ParenSide::Open,
                statement,
            });
        } else if !have_right_paren {
            self.diags.add(Diag::ExpectedParenthesisAroundCondition {
                where_: Span::empty(condition_end),
                side: ParenSide::Close,
                statement,
            });
        }
        Ok(())
    }

    fn error_on_class_statement(&mut self, kind_of_statement: StatementKind) {
        if self.peek().kind == TokenKind::KwClass {
            self.diags.add(Diag::ClassStatementNotAllowedInBody {
                class_keyword: self.peek().span(),
                kind_of_statement,
            });
        }
    }

    fn error_on_function_statement(&mut self, kind_of_statement: StatementKind) {
        if self.is_maybe_function_statement() {
            self.diags.add(Diag::FunctionStatementNotAllowedInBody {
                function_keywords: self.peek().span(),
                kind_of_statement,
            });
        }
    }

    fn error_on_lexical_declaration(&mut self, kind_of_statement: StatementKind) {
        let is_lexical_declaration = match self.peek().kind {
            TokenKind::KwConst => true,
            TokenKind::KwLet => {
                let transaction = self.lexer.begin_transaction();
                self.skip();
                let is_declaration =
                    !is_let_token_a_variable_reference(self.peek(), /*allow_declarations=*/ true);
                self.lexer.roll_back_transaction(transaction);
                is_declaration
            }
            _ => false,
        };
        if is_lexical_declaration {
            self.diags.add(Diag::LexicalDeclarationNotAllowedInBody {
                declaring_keyword: self.peek().span(),
                kind_of_statement,
            });
        }
    }

    fn is_maybe_function_statement(&mut self) -> bool {
        match self.peek().kind {
            TokenKind::KwFunction => true,
            TokenKind::KwAsync => {
                let transaction = self.lexer.begin_transaction();
                self.skip();
                let is_function = self.peek().kind == TokenKind::KwFunction
                    && !self.peek().has_leading_newline;
                self.lexer.roll_back_transaction(transaction);
                is_function
            }
            _ => false,
        }
    }
}

/// The tokens whose first character is `>`.
fn is_greater_family(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Greater
            | GreaterEqual
            | GreaterGreater
            | GreaterGreaterEqual
            | GreaterGreaterGreater
            | GreaterGreaterGreaterEqual
    )
}

/// Decide whether `let` heads an expression (`let` is an ordinary
/// variable here) or a declaration. Bracketed follows (`let [x]`) bind as
/// declarations only where declarations are allowed.
fn is_let_token_a_variable_reference(following_token: &Token, allow_declarations: bool) -> bool {
    use TokenKind::*;
    match following_token.kind {
        kind if kind.is_binary_only_operator()
            || kind.is_compound_assignment_operator()
            || kind.is_conditional_assignment_operator() =>
        {
            true
        }
        Comma | CompleteTemplate | Dot | EndOfFile | Equal | EqualGreater | IncompleteTemplate
        | KwIn | LeftParen | Minus | MinusMinus | Plus | PlusPlus | Question | Semicolon
        | Slash | SlashEqual => true,
        LeftCurly | LeftSquare => !allow_declarations,
        _ => false,
    }
}

/// Tokens which head an expression statement in the dispatcher (other
/// than identifier-shaped tokens, which may also be labels).
fn token_starts_expression_statement(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_binary_only_operator()
        || matches!(
            kind,
            Bang | Comma
                | CompleteTemplate
                | Dot
                | Equal
                | EqualGreater
                | IncompleteTemplate
                | KwDelete
                | KwFalse
                | KwIn
                | KwNew
                | KwNull
                | KwSuper
                | KwThis
                | KwTrue
                | KwTypeof
                | KwVoid
                | LeftParen
                | LeftSquare
                | Minus
                | MinusMinus
                | Number
                | Plus
                | PlusPlus
                | PrivateIdentifier
                | RightParen
                | Slash
                | SlashEqual
                | String
                | Tilde
        )
}

/// After `async`, these tokens mean `async` heads an expression.
fn token_continues_async_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_binary_only_operator()
        || kind.is_compound_assignment_operator()
        || kind.is_conditional_assignment_operator()
        || kind.is_contextual_keyword()
        || matches!(
            kind,
            Comma | CompleteTemplate
                | Dot
                | EndOfFile
                | Equal
                | EqualGreater
                | Identifier
                | IncompleteTemplate
                | KwIn
                | KwYield
                | LeftParen
                | Less
                | Minus
                | MinusMinus
                | Plus
                | PlusPlus
                | Question
                | Semicolon
                | Slash
        )
}

/// After `return` and a newline, these tokens suggest the user meant to
/// return a value.
fn token_starts_expression_on_next_line(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Bang | CompleteTemplate
            | Identifier
            | IncompleteTemplate
            | KwAwait
            | KwFalse
            | KwFunction
            | KwNew
            | KwNull
            | KwSuper
            | KwThis
            | KwTrue
            | KwTypeof
            | LeftCurly
            | LeftParen
            | LeftSquare
            | Less
            | Minus
            | Number
            | Plus
            | Slash
            | SlashEqual
            | String
            | Tilde
    )
}

/// Names that can follow `type` to form a type alias declaration.
fn token_is_type_alias_name(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        Identifier
            | KwAbstract
            | KwAs
            | KwAssert
            | KwAsserts
            | KwAsync
            | KwAwait
            | KwConstructor
            | KwDeclare
            | KwFrom
            | KwGet
            | KwGlobal
            | KwInfer
            | KwIntrinsic
            | KwIs
            | KwKeyof
            | KwModule
            | KwNamespace
            | KwOf
            | KwOut
            | KwOverride
            | KwReadonly
            | KwRequire
            | KwSet
            | KwType
            | KwUnique
    )
}

/// Tokens the module-level error recovery resynchronizes on.
fn token_can_start_statement(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_identifier_like()
        || matches!(
            kind,
            LeftCurly
                | Semicolon
                | KwVar
                | KwFunction
                | KwClass
                | KwIf
                | KwDo
                | KwWhile
                | KwFor
                | KwContinue
                | KwBreak
                | KwReturn
                | KwWith
                | KwSwitch
                | KwThrow
                | KwTry
                | KwDebugger
                | KwExport
                | KwImport
                | KwEnum
                | KwInterface
                | KwNew
                | KwDelete
                | KwTypeof
                | KwVoid
                | KwThis
                | KwSuper
                | KwTrue
                | KwFalse
                | KwNull
                | KwAwait
                | KwYield
                | Number
                | String
                | CompleteTemplate
                | IncompleteTemplate
                | LeftParen
                | LeftSquare
                | Plus
                | Minus
                | PlusPlus
                | MinusMinus
                | Bang
                | Tilde
        )
}
