//! fastlint_diagnostics: Diagnostic definitions and reporting infrastructure.
//!
//! Every syntax problem the lexer or parser can describe is one variant of
//! the [`Diag`] enumeration. Variants carry typed span fields pointing at
//! the offending source ranges; messages and codes are static. Diagnostics
//! are fire-and-forget: reporting one never stops the parse.

use fastlint_core::text::Span;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The kind of statement a diagnostic is talking about, for diagnostics
/// that can be raised from several statement parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    DoWhileLoop,
    ForLoop,
    IfStatement,
    WhileLoop,
    WithStatement,
    SwitchStatement,
}

/// Which side of a parenthesis pair a diagnostic points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParenSide {
    Open,
    Close,
}

macro_rules! define_diags {
    (
        $(
            $(#[$doc:meta])*
            $name:ident($code:literal, $severity:ident, $message:literal) {
                $first_field:ident: Span
                $(, $field:ident: $field_ty:ty)* $(,)?
            }
        ),* $(,)?
    ) => {
        /// A single diagnostic. The first field of each variant is the
        /// primary span the diagnostic is anchored to.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Diag {
            $(
                $(#[$doc])*
                $name {
                    $first_field: Span
                    $(, $field: $field_ty)*
                },
            )*
        }

        impl Diag {
            /// The variant name, e.g. `"LetWithNoBindings"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Diag::$name { .. } => stringify!($name),)*
                }
            }

            /// The numeric diagnostic code.
            pub fn code(&self) -> u16 {
                match self {
                    $(Diag::$name { .. } => $code,)*
                }
            }

            /// The severity of this diagnostic.
            pub fn severity(&self) -> Severity {
                match self {
                    $(Diag::$name { .. } => Severity::$severity,)*
                }
            }

            /// The static message text.
            pub fn message(&self) -> &'static str {
                match self {
                    $(Diag::$name { .. } => $message,)*
                }
            }

            /// The primary source span.
            pub fn span(&self) -> Span {
                match self {
                    $(Diag::$name { $first_field, .. } => *$first_field,)*
                }
            }
        }

        #[cfg(test)]
        const ALL_DIAG_CODES: &[u16] = &[$($code),*];
    };
}

define_diags! {
    // ========================================================================
    // Lexer diagnostics (1-49)
    // ========================================================================
    UnclosedBlockComment(1, Error, "unclosed block comment") { comment_open: Span },
    UnclosedStringLiteral(2, Error, "unclosed string literal") { string_literal: Span },
    UnclosedTemplate(3, Error, "unclosed template") { incomplete_template: Span },
    UnclosedRegexpLiteral(4, Error, "unclosed regexp literal") { regexp_literal: Span },
    UnexpectedCharacter(5, Error, "unexpected character") { character: Span },
    KeywordsCannotContainEscapeSequences(6, Error, "keywords cannot contain escape sequences") { escape_sequence: Span },
    UnclosedIdentifierEscapeSequence(7, Error, "unclosed identifier escape sequence") { escape_sequence: Span },
    NumberLiteralContainsConsecutiveUnderscores(8, Error, "number literal contains consecutive underscores") { underscores: Span },

    // ========================================================================
    // Expression diagnostics (50-79)
    // ========================================================================
    MissingOperandForOperator(50, Error, "missing operand for operator") { where_: Span },
    ExpectedExpression(51, Error, "expected expression") { token: Span },
    UnmatchedParenthesis(52, Error, "unmatched ')'") { where_: Span },
    UnmatchedIndexingBracket(53, Error, "unmatched indexing bracket") { left_square: Span },
    MissingPropertyNameForDotOperator(54, Error, "missing property name after '.' operator") { dot: Span },
    MissingCommaBetweenObjectLiteralEntries(55, Error, "missing comma between object literal entries") { where_: Span },
    InvalidExpressionLeftOfAssignment(56, Error, "invalid expression left of assignment") { where_: Span },
    MissingExpressionBetweenParentheses(57, Error, "missing expression between parentheses") { left_paren_to_right_paren: Span },
    JsxNotAllowed(58, Error, "JSX is not allowed; enable the jsx option to parse JSX elements") { jsx_start: Span },
    UnclosedObjectLiteral(59, Error, "unclosed object literal; expected '}'") { object_open: Span },
    UnclosedArrayLiteral(60, Error, "unclosed array literal; expected ']'") { array_open: Span },
    UnclosedCall(61, Error, "missing ')' for function call") { left_paren: Span },
    MissingColonInConditionalExpression(62, Error, "missing ':' in conditional expression") { question: Span },
    ExpectedType(63, Error, "expected type") { token: Span },

    // ========================================================================
    // Statement and ASI diagnostics (80-99)
    // ========================================================================
    MissingSemicolonAfterStatement(80, Error, "missing semicolon after statement") { where_: Span },
    ReturnStatementReturnsNothing(81, Warning, "return statement returns nothing (undefined)") { return_keyword: Span },
    ExpectedExpressionBeforeNewline(82, Error, "expected expression before newline") { where_: Span },
    ExpectedExpressionBeforeSemicolon(83, Error, "expected expression before semicolon") { where_: Span },
    UnmatchedRightCurly(84, Error, "unmatched '}'") { right_curly: Span },
    UnexpectedToken(85, Error, "unexpected token") { token: Span },
    UnclosedCodeBlock(86, Error, "unclosed code block; expected '}' by end of file") { block_open: Span },
    DepthLimitExceeded(87, Error, "depth limit exceeded") { token: Span },
    UnexpectedCaseOutsideSwitchStatement(88, Error, "unexpected 'case' outside switch statement") { case_token: Span },
    UnexpectedDefaultOutsideSwitchStatement(89, Error, "unexpected 'default' outside switch statement") { default_token: Span },
    ElseHasNoIf(90, Error, "'else' has no corresponding 'if'") { else_token: Span },
    CatchWithoutTry(91, Error, "unexpected 'catch' without 'try'") { catch_token: Span },
    FinallyWithoutTry(92, Error, "unexpected 'finally' without 'try'") { finally_token: Span },
    InvalidBreak(93, Error, "break can only be used inside of a loop or switch") { break_statement: Span },
    InvalidContinue(94, Error, "continue can only be used inside of a loop") { continue_statement: Span },
    LabelNamedAwaitNotAllowedInAsyncFunction(95, Error, "label named 'await' not allowed in async function") { await_keyword: Span, colon: Span },

    // ========================================================================
    // Variable declaration diagnostics (100-119)
    // ========================================================================
    LetWithNoBindings(100, Error, "declaration with no bindings") { where_: Span },
    StrayCommaInLetStatement(101, Error, "stray comma in variable declaration") { where_: Span },
    MissingCommaBetweenVariableDeclarations(102, Error, "missing ',' between variable declarations") { expected_comma: Span },
    MissingInitializerInConstDeclaration(103, Error, "missing initializer in const declaration") { variable_name: Span },
    CannotDeclareVariableNamedLetWithLet(104, Error, "cannot declare variable named 'let' with 'let' or 'const'") { name: Span },
    CannotDeclareVariableWithKeywordName(105, Error, "cannot declare variable with keyword name") { keyword: Span },
    CannotAssignToLoopVariableInForOfOrInLoop(106, Error, "cannot assign to loop variable in for of/in loop") { equal_token: Span },
    UnexpectedTokenInVariableDeclaration(107, Error, "unexpected token in variable declaration; expected variable name") { unexpected_token: Span },
    MissingVariableNameInDeclaration(108, Error, "missing variable name") { equal_token: Span },
    MissingEqualAfterVariable(109, Error, "missing '=' after variable") { expected_equal: Span },
    CannotDeclareAwaitInAsyncFunction(110, Error, "cannot declare 'await' inside async function") { name: Span },
    CannotDeclareYieldInGeneratorFunction(111, Error, "cannot declare 'yield' inside generator function") { name: Span },

    // ========================================================================
    // Binding element diagnostics (120-129)
    // ========================================================================
    CannotUpdateVariableDuringDeclaration(120, Error, "cannot update variable with update operator during declaration") { updating_operator: Span, declaring_token: Span },
    InvalidParameter(121, Error, "invalid function parameter") { parameter: Span },
    NonNullAssertionNotAllowedInParameter(122, Error, "'!' (non-null assertion) is not allowed in a parameter") { bang: Span },
    StrayCommaInParameter(123, Error, "stray comma in function parameter") { comma: Span },
    UnexpectedLiteralInParameterList(124, Error, "unexpected literal in parameter list; expected parameter name") { literal: Span },

    // ========================================================================
    // Function diagnostics (130-149)
    // ========================================================================
    GeneratorFunctionStarBelongsBeforeName(130, Error, "generator function '*' belongs before function name") { star: Span, function_name: Span },
    CommaNotAllowedAfterSpreadParameter(131, Error, "commas are not allowed after spread parameter") { comma: Span, spread: Span },
    MissingFunctionParameterList(132, Error, "missing function parameter list") { expected_parameter_list: Span },
    FunctionsOrMethodsShouldNotHaveArrowOperator(133, Error, "functions/methods should not have '=>'") { arrow_operator: Span },
    MissingNameInFunctionStatement(134, Error, "missing name in function statement") { where_: Span },
    MissingNameOrParenthesesForFunction(135, Error, "missing name or parentheses for function") { where_: Span, function: Span },
    MissingNameOfExportedFunction(136, Error, "missing name of exported function") { function_keyword: Span },
    MissingFunctionBody(137, Error, "missing body for function") { expected_body: Span },
    InterfaceMethodsCannotContainBodies(138, Error, "interface methods cannot contain bodies") { body_start: Span },
    GeneratorFunctionStarBelongsAfterKeywordFunction(139, Error, "generator function '*' belongs after keyword function") { star: Span },

    // ========================================================================
    // Generic parameter diagnostics (150-159)
    // ========================================================================
    TypeScriptGenericParameterListIsEmpty(150, Error, "expected at least one parameter in generic parameter list") { expected_parameter: Span },
    MultipleCommasInGenericParameterList(151, Error, "only one comma is allowed between or after generic parameters") { unexpected_comma: Span },
    CommaNotAllowedBeforeFirstGenericParameter(152, Error, "leading commas are not allowed in generic parameter lists") { unexpected_comma: Span },
    MissingCommaBetweenGenericParameters(153, Error, "missing comma between generic parameters") { expected_comma: Span },
    TypeScriptGenericsNotAllowedInJavaScript(154, Error, "TypeScript generics are not allowed in JavaScript code") { opening_less: Span },

    // ========================================================================
    // Import diagnostics (160-179)
    // ========================================================================
    CannotImportVariableNamedKeyword(160, Error, "cannot import variable named keyword") { import_name: Span },
    CannotImportLet(161, Error, "cannot import 'let'") { import_name: Span },
    CannotImportFromUnquotedModule(162, Error, "missing quotes around module name") { import_name: Span },
    ExpectedFromBeforeModuleSpecifier(163, Error, "expected 'from' before module specifier") { module_specifier: Span },
    ExpectedFromAndModuleSpecifier(164, Error, "expected 'from \"name_of_module.mjs\"'") { where_: Span },
    ExpectedAsBeforeImportedNamespaceAlias(165, Error, "expected 'as' between '*' and variable") { star_through_alias_token: Span, star_token: Span, alias: Span },
    ExpectedVariableNameForImportAs(166, Error, "expected variable name for 'import'-'as'") { unexpected_token: Span },
    TypeScriptTypeOnlyImportNotAllowedInJavaScript(167, Error, "TypeScript type-only imports are not allowed in JavaScript") { type_keyword: Span },
    TypeScriptTypeOnlyImportCannotImportDefaultAndNamed(168, Error, "type-only imports cannot import both default and named exports") { type_keyword: Span },
    TypeScriptInlineTypeImportNotAllowedInJavaScript(169, Error, "TypeScript inline type imports are not allowed in JavaScript") { type_keyword: Span },
    TypeScriptInlineTypeImportNotAllowedInTypeOnlyImport(170, Error, "inline 'type' marker is not allowed in a type-only import") { inline_type_keyword: Span, type_only_keyword: Span },

    // ========================================================================
    // Export diagnostics (180-199)
    // ========================================================================
    CannotExportDefaultVariable(180, Error, "cannot declare and export variable with 'export default'") { declaring_token: Span },
    CannotExportLet(181, Error, "cannot export variable named 'let'") { export_name: Span },
    CannotExportVariableNamedKeyword(182, Error, "cannot export variable named keyword") { export_name: Span },
    ExportingRequiresCurlies(183, Error, "exporting requires '{' and '}'") { names: Span },
    ExportingRequiresDefault(184, Error, "exporting requires 'default'") { expression: Span },
    ExportingStringNameOnlyAllowedForExportFrom(185, Error, "string export names are only allowed with 'export ... from'") { export_name: Span },
    MissingTokenAfterExport(186, Error, "incomplete export; expected 'export default ...' or 'export {name}' or 'export * from ...' or 'export class' or 'export function' or 'export let'") { export_token: Span },
    UnexpectedTokenAfterExport(187, Error, "unexpected token after export; expected 'export default ...' or 'export {name}' or 'export * from ...' or 'export class' or 'export function' or 'export let'") { unexpected_token: Span },

    // ========================================================================
    // Type alias and enum diagnostics (200-219)
    // ========================================================================
    TypeScriptTypeAliasNotAllowedInJavaScript(200, Error, "TypeScript types are not allowed in JavaScript") { type_keyword: Span },
    TypeScriptEnumIsNotAllowedInJavaScript(201, Error, "TypeScript's 'enum' feature is not allowed in JavaScript") { enum_keyword: Span },
    TypeScriptEnumValueMustBeConstant(202, Error, "enum member needs initializer with a constant value") { expression: Span },
    TypeScriptEnumAutoMemberNeedsInitializerAfterComputed(203, Error, "enum member needs initializer; previous member initializer was a computed value") { auto_member_name: Span, computed_expression: Span },
    TypeScriptEnumComputedNameMustBeSimple(204, Error, "computed enum member name must be a simple string") { expression: Span },
    TypeScriptEnumMemberNameCannotBeNumber(205, Error, "enum member name cannot be a number") { number: Span },
    ExtraCommaNotAllowedBetweenEnumMembers(206, Error, "extra ',' is not allowed between enum members") { comma: Span },

    // ========================================================================
    // Interface and class diagnostics (220-239)
    // ========================================================================
    TypeScriptInterfacesNotAllowedInJavaScript(220, Error, "TypeScript's 'interface' feature is not allowed in JavaScript") { interface_keyword: Span },
    TypeScriptAbstractClassNotAllowedInJavaScript(221, Error, "abstract classes are not allowed in JavaScript") { abstract_keyword: Span },
    MissingNameInClassStatement(222, Error, "missing name of class") { class_keyword: Span },
    MissingNameOfExportedClass(223, Error, "missing name of exported class") { class_keyword: Span },
    TypeScriptImplementsNotAllowedInJavaScript(224, Error, "TypeScript 'implements' is not allowed in JavaScript") { implements_keyword: Span },
    MissingBodyForClass(225, Error, "missing body for class") { class_keyword_and_name: Span },

    // ========================================================================
    // Try/catch diagnostics (240-259)
    // ========================================================================
    MissingCatchOrFinallyForTryStatement(240, Error, "missing catch or finally clause for try statement") { expected_catch_or_finally: Span, try_token: Span },
    MissingBodyForTryStatement(241, Error, "missing body for try statement") { try_token: Span },
    MissingCatchVariableBetweenParentheses(242, Error, "missing catch variable name between parentheses") { left_paren_to_right_paren: Span },
    ExpectedVariableNameForCatch(243, Error, "expected variable name for 'catch'") { unexpected_token: Span },
    TypeScriptCatchTypeAnnotationMustBeAny(244, Error, "catch variable type annotation must be 'any', 'unknown', or '*'") { type_expression: Span },
    TypeScriptTypeAnnotationsNotAllowedInJavaScript(245, Error, "TypeScript type annotations are not allowed in JavaScript code") { type_colon: Span },
    MissingBodyForCatchClause(246, Error, "missing body for catch clause") { catch_token: Span },
    MissingBodyForFinallyClause(247, Error, "missing body for finally clause") { finally_token: Span },

    // ========================================================================
    // Loop and conditional diagnostics (260-299)
    // ========================================================================
    MissingBodyForDoWhileStatement(260, Error, "missing body for do-while loop") { do_token: Span },
    MissingWhileAndConditionForDoWhileStatement(261, Error, "missing 'while (condition)' for do-while statement") { do_token: Span, expected_while: Span },
    MissingConditionForSwitchStatement(262, Error, "missing condition for switch statement") { switch_keyword: Span },
    ExpectedLeftCurly(263, Error, "expected '{'") { expected_left_curly: Span },
    MissingBodyForSwitchStatement(264, Error, "missing body for switch statement") { switch_and_condition: Span },
    ExpectedExpressionForSwitchCase(265, Error, "expected expression after 'case'") { case_token: Span },
    StatementBeforeFirstSwitchCase(266, Error, "unexpected statement before first switch case, expected 'case' or 'default'") { unexpected_statement: Span },
    MissingConditionForWhileStatement(267, Error, "missing condition for while statement") { while_keyword: Span },
    MissingBodyForWhileStatement(268, Error, "missing body for while statement") { while_and_condition: Span },
    MissingConditionForIfStatement(269, Error, "missing condition for if statement") { if_keyword: Span },
    MissingBodyForIfStatement(270, Error, "missing body for 'if' statement") { expected_body: Span },
    MissingIfAfterElse(271, Error, "missing 'if' after 'else'") { expected_if: Span },
    MissingForLoopHeader(272, Error, "missing header and body for 'for' loop") { for_token: Span },
    MissingHeaderOfForLoop(273, Error, "missing for loop header") { where_: Span },
    MissingSemicolonBetweenForLoopConditionAndUpdate(274, Error, "missing ';' between condition and update parts of for loop") { expected_semicolon: Span },
    MissingSemicolonBetweenForLoopInitAndCondition(275, Error, "missing ';' between init and condition parts of for loop") { expected_semicolon: Span },
    CStyleForLoopIsMissingThirdComponent(276, Error, "C-style for loop is missing its third component") { expected_last_component: Span, existing_semicolon: Span },
    InDisallowedInCStyleForLoop(277, Error, "'in' disallowed in C-style for loop initializer") { in_token: Span },
    MissingForLoopRhsOrComponentsAfterExpression(278, Error, "for loop needs an iterable, or condition and update clauses") { header: Span, for_token: Span },
    MissingForLoopRhsOrComponentsAfterDeclaration(279, Error, "for loop needs an iterable, or condition and update clauses") { header: Span, for_token: Span },
    CannotAssignToVariableNamedAsyncInForOfLoop(280, Error, "assigning to 'async' in a for-of loop requires parentheses") { async_identifier: Span },
    UnexpectedSemicolonInCStyleForLoop(281, Error, "C-style for loops have only three semicolon-separated components") { semicolon: Span },
    UnexpectedSemicolonInForInLoop(282, Error, "for-in loop expression cannot have semicolons") { semicolon: Span },
    UnexpectedSemicolonInForOfLoop(283, Error, "for-of loop expression cannot have semicolons") { semicolon: Span },
    MissingBodyForForStatement(284, Error, "missing body for 'for' loop") { for_and_header: Span },

    // ========================================================================
    // Statement-body restrictions (300-309)
    // ========================================================================
    FunctionStatementNotAllowedInBody(300, Error, "missing body for function; a function statement is not allowed as the body of a statement") { function_keywords: Span, kind_of_statement: StatementKind },
    ClassStatementNotAllowedInBody(301, Error, "class statement is not allowed as the body of a statement") { class_keyword: Span, kind_of_statement: StatementKind },
    LexicalDeclarationNotAllowedInBody(302, Error, "lexical declaration is not allowed as the body of a statement") { declaring_keyword: Span, kind_of_statement: StatementKind },

    // ========================================================================
    // Parenthesized conditions (310-319)
    // ========================================================================
    ExpectedParenthesesAroundCondition(310, Error, "expected parentheses around condition") { condition: Span, statement: StatementKind },
    ExpectedParenthesisAroundCondition(311, Error, "expected parenthesis around condition") { where_: Span, side: ParenSide, statement: StatementKind },
}

impl fmt::Display for Diag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} E{:04}: {} at {}",
            self.severity(),
            self.code(),
            self.message(),
            self.span()
        )
    }
}

/// Anything diagnostics can be reported into.
///
/// The parser and lexer each own a [`DiagnosticCollection`]; integrators
/// that want to stream diagnostics elsewhere implement this trait.
pub trait DiagSink {
    fn report(&mut self, diag: Diag);
}

impl DiagSink for Vec<Diag> {
    fn report(&mut self, diag: Diag) {
        self.push(diag);
    }
}

/// A growable collection of diagnostics accumulated during a parse.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diag>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diag) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity() == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Error)
            .count()
    }

    pub fn diagnostics(&self) -> &[Diag] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diag> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Drop all diagnostics reported at or after index `len`. Lexer
    /// transactions use this to take back diagnostics on rollback.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by source position.
    pub fn sort_by_position(&mut self) {
        self.diagnostics
            .sort_by_key(|d| (d.span().begin, d.span().end));
    }
}

impl DiagSink for DiagnosticCollection {
    fn report(&mut self, diag: Diag) {
        self.add(diag);
    }
}
