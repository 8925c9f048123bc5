//! Parser integration tests.
//!
//! Each test parses a source buffer and checks the visitor event stream
//! and the reported diagnostics.

use bumpalo::Bump;
use fastlint_ast::{BufferingVisitor, VarInitKind, VarKind, VisitorEvent};
use fastlint_core::intern::StringInterner;
use fastlint_parser::{Parser, ParserOptions};

/// Helper: parse and return (events, diagnostic names). The trailing
/// end-of-module event is checked and stripped.
fn parse_with(source: &str, options: ParserOptions) -> (Vec<String>, Vec<&'static str>) {
    let arena = Bump::new();
    let mut parser = Parser::new(&arena, source, options);
    let mut visitor = BufferingVisitor::new();
    parser.parse_and_visit_module(&mut visitor);
    let interner = parser.interner().clone();
    let diags = parser.take_diagnostics();

    let mut events: Vec<String> = visitor
        .events()
        .iter()
        .map(|event| format_event(event, &interner))
        .collect();
    assert_eq!(events.last().map(String::as_str), Some("end of module"));
    events.pop();

    let diag_names = diags.diagnostics().iter().map(|d| d.name()).collect();
    (events, diag_names)
}

fn parse(source: &str) -> (Vec<String>, Vec<&'static str>) {
    parse_with(source, ParserOptions::default())
}

fn parse_ts(source: &str) -> (Vec<String>, Vec<&'static str>) {
    parse_with(
        source,
        ParserOptions {
            typescript: true,
            jsx: false,
        },
    )
}

fn format_event(event: &VisitorEvent, interner: &StringInterner) -> String {
    let kind_name = |kind: VarKind| match kind {
        VarKind::Var => "var",
        VarKind::Let => "let",
        VarKind::Const => "const",
        VarKind::Function => "function",
        VarKind::Class => "class",
        VarKind::Parameter => "param",
        VarKind::Catch => "catch",
        VarKind::Import => "import",
        VarKind::ImportType => "import type",
        VarKind::Enum => "enum",
        VarKind::GenericParameter => "generic param",
        VarKind::TypeAlias => "type alias",
        VarKind::Interface => "interface",
        VarKind::Namespace => "namespace",
    };
    match event {
        VisitorEvent::VariableDeclaration {
            name,
            kind,
            init_kind,
        } => {
            let eq = match init_kind {
                VarInitKind::Normal => "",
                VarInitKind::InitializedWithEquals => " =",
            };
            format!(
                "declare {} {}{}",
                interner.resolve(name.name),
                kind_name(*kind),
                eq
            )
        }
        VisitorEvent::VariableUse { name } => format!("use {}", interner.resolve(name.name)),
        VisitorEvent::VariableExportUse { name } => {
            format!("export use {}", interner.resolve(name.name))
        }
        VisitorEvent::VariableTypeUse { name } => {
            format!("type use {}", interner.resolve(name.name))
        }
        VisitorEvent::VariableAssignment { name } => {
            format!("assign {}", interner.resolve(name.name))
        }
        VisitorEvent::EnterBlockScope => "enter block".to_string(),
        VisitorEvent::ExitBlockScope => "exit block".to_string(),
        VisitorEvent::EnterClassScope => "enter class".to_string(),
        VisitorEvent::ExitClassScope => "exit class".to_string(),
        VisitorEvent::EnterEnumScope => "enter enum".to_string(),
        VisitorEvent::ExitEnumScope => "exit enum".to_string(),
        VisitorEvent::EnterForScope => "enter for".to_string(),
        VisitorEvent::ExitForScope => "exit for".to_string(),
        VisitorEvent::EnterFunctionScope => "enter function".to_string(),
        VisitorEvent::EnterFunctionScopeBody => "enter function body".to_string(),
        VisitorEvent::ExitFunctionScope => "exit function".to_string(),
        VisitorEvent::EnterIndexSignatureScope => "enter index signature".to_string(),
        VisitorEvent::ExitIndexSignatureScope => "exit index signature".to_string(),
        VisitorEvent::EnterInterfaceScope => "enter interface".to_string(),
        VisitorEvent::ExitInterfaceScope => "exit interface".to_string(),
        VisitorEvent::EnterNamedFunctionScope { name } => {
            format!("enter named function {}", interner.resolve(name.name))
        }
        VisitorEvent::ExitNamedFunctionScope => "exit named function".to_string(),
        VisitorEvent::EnterTypeAliasScope => "enter type alias".to_string(),
        VisitorEvent::ExitTypeAliasScope => "exit type alias".to_string(),
        VisitorEvent::EnterWithScope => "enter with".to_string(),
        VisitorEvent::ExitWithScope => "exit with".to_string(),
        VisitorEvent::EndOfModule => "end of module".to_string(),
    }
}

// ============================================================================
// Variable declarations
// ============================================================================

#[test]
fn test_let_with_initializer() {
    let (events, diags) = parse("let x = 1;");
    assert_eq!(events, ["declare x let ="]);
    assert!(diags.is_empty());
}

#[test]
fn test_nested_blocks_with_shadowing() {
    let (events, diags) = parse("{ let x; { let x; } }");
    assert_eq!(
        events,
        [
            "enter block",
            "declare x let",
            "enter block",
            "declare x let",
            "exit block",
            "exit block"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_multiple_bindings() {
    let (events, diags) = parse("var a = 1, b, c = 2;");
    assert_eq!(
        events,
        ["declare a var =", "declare b var", "declare c var ="]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_const_without_initializer() {
    let (_, diags) = parse("const x;");
    assert_eq!(diags, ["MissingInitializerInConstDeclaration"]);
}

#[test]
fn test_let_with_number_binding() {
    let (events, diags) = parse("let 42;");
    assert!(events.is_empty());
    assert_eq!(diags, ["UnexpectedTokenInVariableDeclaration"]);
}

#[test]
fn test_bare_let_is_a_variable_reference() {
    let (events, diags) = parse("let;");
    assert_eq!(events, ["use let"]);
    assert!(diags.is_empty());
}

#[test]
fn test_let_with_no_bindings() {
    let (events, diags) = parse("let\nif (x) {}");
    assert_eq!(events, ["use x", "enter block", "exit block"]);
    assert_eq!(diags, ["LetWithNoBindings"]);
}

#[test]
fn test_stray_comma_in_let() {
    let (events, diags) = parse("let x, ;");
    assert_eq!(events, ["declare x let"]);
    assert_eq!(diags, ["StrayCommaInLetStatement"]);
}

#[test]
fn test_missing_comma_between_bindings() {
    let (events, diags) = parse("let x y;");
    assert_eq!(events, ["declare x let", "declare y let"]);
    assert_eq!(diags, ["MissingCommaBetweenVariableDeclarations"]);
}

#[test]
fn test_declaring_variable_named_let() {
    let (events, diags) = parse("let let;");
    assert_eq!(events, ["declare let let"]);
    assert_eq!(diags, ["CannotDeclareVariableNamedLetWithLet"]);
}

#[test]
fn test_keyword_as_binding_name_with_initializer() {
    let (events, diags) = parse("let if = 3;");
    assert!(events.is_empty());
    assert_eq!(diags, ["CannotDeclareVariableWithKeywordName"]);
}

#[test]
fn test_keyword_statement_after_let() {
    let (events, diags) = parse("let if (x) {}");
    assert_eq!(events, ["use x", "enter block", "exit block"]);
    assert_eq!(diags, ["UnexpectedTokenInVariableDeclaration"]);
}

#[test]
fn test_destructuring_declaration() {
    let (events, diags) = parse("let {a, b: {c}, d = e} = obj;");
    assert_eq!(
        events,
        [
            "use obj",
            "declare a let =",
            "declare c let =",
            "use e",
            "declare d let ="
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_array_destructuring_declaration() {
    let (events, diags) = parse("let [head, ...tail] = xs;");
    assert_eq!(
        events,
        ["use xs", "declare head let =", "declare tail let ="]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_compound_assignment_in_declaration() {
    let (events, diags) = parse("let x += 1;");
    assert_eq!(events, ["declare x let ="]);
    assert_eq!(diags, ["CannotUpdateVariableDuringDeclaration"]);
}

// ============================================================================
// let as an expression
// ============================================================================

#[test]
fn test_let_assignment_expression() {
    let (events, diags) = parse("let = 5;");
    assert_eq!(events, ["assign let"]);
    assert!(diags.is_empty());
}

#[test]
fn test_let_call_expression() {
    let (events, diags) = parse("let(3);");
    assert_eq!(events, ["use let"]);
    assert!(diags.is_empty());
}

#[test]
fn test_let_label() {
    let (events, diags) = parse("let: x;");
    assert_eq!(events, ["use x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_lexical_declaration_in_if_body() {
    let (events, diags) = parse("if (c) let x = 1;");
    assert_eq!(events, ["use c", "declare x let ="]);
    assert_eq!(diags, ["LexicalDeclarationNotAllowedInBody"]);
}

// ============================================================================
// Automatic semicolon insertion
// ============================================================================

#[test]
fn test_two_statements_split_by_newline() {
    let (events, diags) = parse("a\nb");
    assert_eq!(events, ["use a", "use b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_missing_semicolon_same_line() {
    let (events, diags) = parse("a b");
    assert_eq!(events, ["use a", "use b"]);
    assert_eq!(diags, ["MissingSemicolonAfterStatement"]);
}

#[test]
fn test_return_followed_by_newline() {
    let (events, diags) = parse("function f() { return\n42;\n}");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "enter function body",
            "exit function"
        ]
    );
    assert_eq!(diags, ["ReturnStatementReturnsNothing"]);
}

#[test]
fn test_return_with_expression() {
    let (_, diags) = parse("function f() { return 42; }");
    assert!(diags.is_empty());
}

#[test]
fn test_throw_followed_by_newline() {
    let (events, diags) = parse("throw\nx;");
    assert_eq!(events, ["use x"]);
    assert_eq!(diags, ["ExpectedExpressionBeforeNewline"]);
}

#[test]
fn test_throw_followed_by_semicolon() {
    let (_, diags) = parse("throw;");
    assert_eq!(diags, ["ExpectedExpressionBeforeSemicolon"]);
}

#[test]
fn test_break_label_on_next_line_is_not_a_label() {
    let (events, diags) = parse("while (c) { break\nlbl; }");
    assert_eq!(
        events,
        ["use c", "enter block", "use lbl", "exit block"]
    );
    assert!(diags.is_empty());
}

// ============================================================================
// await / yield contexts
// ============================================================================

#[test]
fn test_await_is_operator_in_async_function() {
    let (events, diags) = parse("async function f() { await x; }");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "enter function body",
            "use x",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_await_is_identifier_outside_async_function() {
    let (events, diags) = parse("await;");
    assert_eq!(events, ["use await"]);
    assert!(diags.is_empty());
}

#[test]
fn test_label_named_await_in_async_function() {
    let (_, diags) = parse("async function f() { await: x; }");
    assert_eq!(diags, ["LabelNamedAwaitNotAllowedInAsyncFunction"]);
}

#[test]
fn test_yield_is_operator_in_generator() {
    let (events, diags) = parse("function* g() { yield x; }");
    assert_eq!(
        events,
        [
            "declare g function",
            "enter function",
            "enter function body",
            "use x",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_yield_is_identifier_outside_generator() {
    let (events, diags) = parse("yield = 1;");
    assert_eq!(events, ["assign yield"]);
    assert!(diags.is_empty());
}

#[test]
fn test_cannot_declare_await_in_async_function() {
    let (_, diags) = parse("async function f() { let await; }");
    assert_eq!(diags, ["CannotDeclareAwaitInAsyncFunction"]);
}

#[test]
fn test_cannot_declare_yield_in_generator() {
    let (_, diags) = parse("function* g() { let yield; }");
    assert_eq!(diags, ["CannotDeclareYieldInGeneratorFunction"]);
}

// ============================================================================
// break / continue
// ============================================================================

#[test]
fn test_break_outside_loop_or_switch() {
    let (_, diags) = parse("break;");
    assert_eq!(diags, ["InvalidBreak"]);
}

#[test]
fn test_continue_outside_loop() {
    let (_, diags) = parse("continue;");
    assert_eq!(diags, ["InvalidContinue"]);
}

#[test]
fn test_break_inside_loop() {
    let (_, diags) = parse("while (c) break;");
    assert!(diags.is_empty());
}

#[test]
fn test_break_inside_switch() {
    let (_, diags) = parse("switch (x) { case 1: break; }");
    assert!(diags.is_empty());
}

#[test]
fn test_break_does_not_escape_function_bodies() {
    let (_, diags) = parse("while (c) { function f() { break; } }");
    assert_eq!(diags, ["InvalidBreak"]);
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn test_labelled_statement() {
    let (events, diags) = parse("lbl: x;");
    assert_eq!(events, ["use x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_chained_labels() {
    let (events, diags) = parse("a: b: x;");
    assert_eq!(events, ["use x"]);
    assert!(diags.is_empty());
}

// ============================================================================
// async ambiguities
// ============================================================================

#[test]
fn test_async_function_declaration() {
    let (events, diags) = parse("async function f() {}");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "enter function body",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_async_newline_function_is_two_statements() {
    let (events, diags) = parse("async\nfunction f() {}");
    assert_eq!(
        events,
        [
            "use async",
            "declare f function",
            "enter function",
            "enter function body",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_async_arrow_function() {
    let (events, diags) = parse("async () => { x; };");
    assert_eq!(
        events,
        [
            "enter function",
            "enter function body",
            "use x",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_async_arrow_with_one_parameter() {
    let (events, diags) = parse("async x => x;");
    assert_eq!(
        events,
        [
            "enter function",
            "declare x param",
            "enter function body",
            "use x",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_async_call() {
    let (events, diags) = parse("async(x);");
    assert_eq!(events, ["use async", "use x"]);
    assert!(diags.is_empty());
}

// ============================================================================
// type alias ambiguities
// ============================================================================

#[test]
fn test_type_alias_in_typescript() {
    let (events, diags) = parse_ts("type T = number;");
    assert_eq!(
        events,
        ["declare T type alias", "enter type alias", "exit type alias"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_type_alias_in_javascript_is_reported() {
    let (events, diags) = parse("type T = number;");
    assert_eq!(
        events,
        ["declare T type alias", "enter type alias", "exit type alias"]
    );
    assert_eq!(diags, ["TypeScriptTypeAliasNotAllowedInJavaScript"]);
}

#[test]
fn test_type_newline_is_expression() {
    let (events, diags) = parse_ts("type\nx = 1;");
    assert_eq!(events, ["use type", "assign x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_generic_type_alias() {
    let (events, diags) = parse_ts("type T<U> = U;");
    assert_eq!(
        events,
        [
            "declare T type alias",
            "enter type alias",
            "declare U generic param",
            "type use U",
            "exit type alias"
        ]
    );
    assert!(diags.is_empty());
}

// ============================================================================
// abstract / declare ambiguities
// ============================================================================

#[test]
fn test_abstract_class_in_typescript() {
    let (events, diags) = parse_ts("abstract class C {}");
    assert_eq!(events, ["declare C class", "enter class", "exit class"]);
    assert!(diags.is_empty());
}

#[test]
fn test_abstract_class_in_javascript_is_reported() {
    let (_, diags) = parse("abstract class C {}");
    assert_eq!(diags, ["TypeScriptAbstractClassNotAllowedInJavaScript"]);
}

#[test]
fn test_abstract_as_variable() {
    let (events, diags) = parse("abstract = 1;");
    assert_eq!(events, ["assign abstract"]);
    assert!(diags.is_empty());
}

#[test]
fn test_declare_enum() {
    let (events, diags) = parse_ts("declare enum E { A }");
    assert_eq!(events, ["declare E enum", "enter enum", "exit enum"]);
    assert!(diags.is_empty());
}

#[test]
fn test_declare_const_enum_rejects_computed_values() {
    let (events, diags) = parse_ts("declare const enum E { A = f() }");
    assert_eq!(
        events,
        ["declare E enum", "enter enum", "use f", "exit enum"]
    );
    assert_eq!(diags, ["TypeScriptEnumValueMustBeConstant"]);
}

#[test]
fn test_declare_as_variable() {
    let (events, diags) = parse("declare = 1;");
    assert_eq!(events, ["assign declare"]);
    assert!(diags.is_empty());
}

// ============================================================================
// Enums
// ============================================================================

#[test]
fn test_enum_in_javascript_is_reported() {
    let (_, diags) = parse("enum E { A }");
    assert_eq!(diags, ["TypeScriptEnumIsNotAllowedInJavaScript"]);
}

#[test]
fn test_enum_auto_member_after_computed() {
    let (_, diags) = parse_ts("enum E { A = f(), B }");
    assert_eq!(
        diags,
        ["TypeScriptEnumAutoMemberNeedsInitializerAfterComputed"]
    );
}

#[test]
fn test_enum_constant_binary_values_are_fine() {
    let (_, diags) = parse_ts("enum E { A = 1 | 2, B }");
    assert!(diags.is_empty());
}

#[test]
fn test_const_enum_inherits_constant_requirement_through_parens() {
    let (_, diags) = parse_ts("const enum E { A = (f()) }");
    assert_eq!(diags, ["TypeScriptEnumValueMustBeConstant"]);
}

#[test]
fn test_enum_member_name_cannot_be_number() {
    let (_, diags) = parse_ts("enum E { 42 }");
    assert_eq!(diags, ["TypeScriptEnumMemberNameCannotBeNumber"]);
}

#[test]
fn test_extra_comma_between_enum_members() {
    let (_, diags) = parse_ts("enum E { A,, B }");
    assert_eq!(diags, ["ExtraCommaNotAllowedBetweenEnumMembers"]);
}

#[test]
fn test_enum_keyword_member_names_are_allowed() {
    let (_, diags) = parse_ts(r#"enum E { const = 69, "member" }"#);
    assert!(diags.is_empty());
}

// ============================================================================
// Interfaces
// ============================================================================

#[test]
fn test_interface_with_method_and_property() {
    let (events, diags) = parse_ts("interface I { m(): void; x: T; }");
    assert_eq!(
        events,
        [
            "declare I interface",
            "enter interface",
            "enter function",
            "exit function",
            "type use T",
            "exit interface"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_interface_in_javascript_is_reported() {
    let (events, diags) = parse("interface I {}");
    assert_eq!(
        events,
        ["declare I interface", "enter interface", "exit interface"]
    );
    assert_eq!(diags, ["TypeScriptInterfacesNotAllowedInJavaScript"]);
}

#[test]
fn test_interface_method_with_body_is_reported() {
    let (events, diags) = parse_ts("interface I { m() { x(); } }");
    assert_eq!(
        events,
        [
            "declare I interface",
            "enter interface",
            "enter function",
            "enter function body",
            "use x",
            "exit function",
            "exit interface"
        ]
    );
    assert_eq!(diags, ["InterfaceMethodsCannotContainBodies"]);
}

#[test]
fn test_interface_index_signature() {
    let (events, diags) = parse_ts("interface I { [k: string]: number; }");
    assert_eq!(
        events,
        [
            "declare I interface",
            "enter interface",
            "enter index signature",
            "declare k param",
            "exit index signature",
            "exit interface"
        ]
    );
    assert!(diags.is_empty());
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn test_default_import() {
    let (events, diags) = parse(r#"import fs from "fs";"#);
    assert_eq!(events, ["declare fs import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_named_imports() {
    let (events, diags) = parse(r#"import {a, b as c} from "m";"#);
    assert_eq!(events, ["declare a import", "declare c import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_namespace_import() {
    let (events, diags) = parse(r#"import * as ns from "m";"#);
    assert_eq!(events, ["declare ns import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_default_and_named_imports() {
    let (events, diags) = parse(r#"import a, {b} from "m";"#);
    assert_eq!(events, ["declare a import", "declare b import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_bare_import() {
    let (events, diags) = parse(r#"import "m";"#);
    assert!(events.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_dynamic_import_expression() {
    let (events, diags) = parse("import(url).then(f);");
    assert_eq!(events, ["use url", "use f"]);
    assert!(diags.is_empty());
}

#[test]
fn test_import_meta_expression() {
    let (events, diags) = parse("import.meta;");
    assert!(events.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_cannot_import_let() {
    let (events, diags) = parse(r#"import let from "m";"#);
    assert_eq!(events, ["declare let import"]);
    assert_eq!(diags, ["CannotImportLet"]);
}

#[test]
fn test_cannot_import_keyword() {
    let (events, diags) = parse(r#"import var from "m";"#);
    assert_eq!(events, ["declare var import"]);
    assert_eq!(diags, ["CannotImportVariableNamedKeyword"]);
}

#[test]
fn test_type_only_import() {
    let (events, diags) = parse_ts(r#"import type T from "m";"#);
    assert_eq!(events, ["declare T import type"]);
    assert!(diags.is_empty());
}

#[test]
fn test_inline_type_import() {
    let (events, diags) = parse_ts(r#"import {type T} from "m";"#);
    assert_eq!(events, ["declare T import type"]);
    assert!(diags.is_empty());
}

#[test]
fn test_type_only_import_in_javascript() {
    let (_, diags) = parse(r#"import type {T} from "m";"#);
    assert_eq!(diags, ["TypeScriptTypeOnlyImportNotAllowedInJavaScript"]);
}

#[test]
fn test_inline_type_inside_type_only_import() {
    let (_, diags) = parse_ts(r#"import type {type T} from "m";"#);
    assert_eq!(
        diags,
        ["TypeScriptInlineTypeImportNotAllowedInTypeOnlyImport"]
    );
}

#[test]
fn test_import_type_as_default_binding() {
    // `type` is the imported name here, not a type-only marker.
    let (events, diags) = parse(r#"import type from "m";"#);
    assert_eq!(events, ["declare type import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_string_import_alias() {
    let (events, diags) = parse(r#"import {"export name" as y} from "m";"#);
    assert_eq!(events, ["declare y import"]);
    assert!(diags.is_empty());
}

#[test]
fn test_missing_from_before_module_specifier() {
    let (_, diags) = parse(r#"import fs "fs";"#);
    assert_eq!(diags, ["ExpectedFromBeforeModuleSpecifier"]);
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_named_export_uses() {
    let (events, diags) = parse("export { a as b };");
    assert_eq!(events, ["export use a"]);
    assert!(diags.is_empty());
}

#[test]
fn test_multiple_named_exports() {
    let (events, diags) = parse("export {a, b};");
    assert_eq!(events, ["export use a", "export use b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_reexport_discards_local_uses() {
    let (events, diags) = parse(r#"export {a, b} from "m";"#);
    assert!(events.is_empty());
    assert!(diags.is_empty());
}

#[test]
fn test_export_star() {
    let (_, diags) = parse(r#"export * from "m";"#);
    assert!(diags.is_empty());
}

#[test]
fn test_export_star_as() {
    let (_, diags) = parse(r#"export * as ns from "m";"#);
    assert!(diags.is_empty());
}

#[test]
fn test_export_default_expression() {
    let (_, diags) = parse("export default 2 + 2;");
    assert!(diags.is_empty());
}

#[test]
fn test_export_default_variable_is_reported() {
    let (events, diags) = parse("export default let x = 1;");
    assert_eq!(events, ["declare x let ="]);
    assert_eq!(diags, ["CannotExportDefaultVariable"]);
}

#[test]
fn test_export_requires_curlies() {
    let (events, diags) = parse("export stuff;");
    assert_eq!(events, ["use stuff"]);
    assert_eq!(diags, ["ExportingRequiresCurlies"]);
}

#[test]
fn test_export_requires_default() {
    let (_, diags) = parse("export 2 + 2;");
    assert_eq!(diags, ["ExportingRequiresDefault"]);
}

#[test]
fn test_bare_export() {
    let (_, diags) = parse("export;");
    assert_eq!(diags, ["MissingTokenAfterExport"]);
}

#[test]
fn test_export_keyword_name_is_reported() {
    let (events, diags) = parse("export {var};");
    assert!(events.is_empty());
    assert_eq!(diags, ["CannotExportVariableNamedKeyword"]);
}

#[test]
fn test_export_let_statement() {
    let (events, diags) = parse("export let x = 1;");
    assert_eq!(events, ["declare x let ="]);
    assert!(diags.is_empty());
}

#[test]
fn test_export_function_requires_name() {
    let (_, diags) = parse("export function() {}");
    assert_eq!(diags, ["MissingNameOfExportedFunction"]);
}

// ============================================================================
// switch
// ============================================================================

#[test]
fn test_switch_statement() {
    let (events, diags) = parse("switch (x) { case a: break; default: break; }");
    assert_eq!(events, ["use x", "enter block", "use a", "exit block"]);
    assert!(diags.is_empty());
}

#[test]
fn test_statement_before_first_switch_case() {
    let (events, diags) = parse("switch (x) { stmt(); case 1: }");
    assert_eq!(events, ["use x", "enter block", "use stmt", "exit block"]);
    assert_eq!(diags, ["StatementBeforeFirstSwitchCase"]);
}

#[test]
fn test_switch_missing_condition() {
    let (_, diags) = parse("switch { case 1: break; }");
    assert_eq!(diags, ["MissingConditionForSwitchStatement"]);
}

#[test]
fn test_case_outside_switch() {
    let (_, diags) = parse("case 3:");
    assert_eq!(diags, ["UnexpectedCaseOutsideSwitchStatement"]);
}

#[test]
fn test_default_outside_switch() {
    let (_, diags) = parse("default:");
    assert_eq!(diags, ["UnexpectedDefaultOutsideSwitchStatement"]);
}

// ============================================================================
// try / catch / finally
// ============================================================================

#[test]
fn test_try_catch_without_binding() {
    let (events, diags) = parse("try { } catch { }");
    assert_eq!(
        events,
        ["enter block", "exit block", "enter block", "exit block"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_try_catch_with_binding() {
    let (events, diags) = parse("try {} catch (e) { log(); }");
    assert_eq!(
        events,
        [
            "enter block",
            "exit block",
            "enter block",
            "declare e catch",
            "use log",
            "exit block"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_try_catch_destructured_binding() {
    let (events, diags) = parse("try {} catch ([a, b]) {}");
    assert_eq!(
        events,
        [
            "enter block",
            "exit block",
            "enter block",
            "declare a catch",
            "declare b catch",
            "exit block"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_try_without_catch_or_finally() {
    let (_, diags) = parse("try {}");
    assert_eq!(diags, ["MissingCatchOrFinallyForTryStatement"]);
}

#[test]
fn test_catch_without_try() {
    let (_, diags) = parse("catch (e) {}");
    assert_eq!(diags, ["CatchWithoutTry"]);
}

#[test]
fn test_finally_without_try() {
    let (_, diags) = parse("finally {}");
    assert_eq!(diags, ["FinallyWithoutTry"]);
}

#[test]
fn test_catch_with_string_parameter() {
    let (_, diags) = parse(r#"try {} catch ("junk") {}"#);
    assert_eq!(diags, ["ExpectedVariableNameForCatch"]);
}

#[test]
fn test_catch_with_empty_parentheses() {
    let (_, diags) = parse("try {} catch () {}");
    assert_eq!(diags, ["MissingCatchVariableBetweenParentheses"]);
}

#[test]
fn test_catch_type_annotation_any_is_allowed() {
    let (_, diags) = parse_ts("try {} catch (e: unknown) {}");
    assert!(diags.is_empty());
}

#[test]
fn test_catch_type_annotation_must_be_any() {
    let (_, diags) = parse_ts("try {} catch (e: Foo) {}");
    assert_eq!(diags, ["TypeScriptCatchTypeAnnotationMustBeAny"]);
}

// ============================================================================
// do / while / with / if
// ============================================================================

#[test]
fn test_do_while() {
    let (events, diags) = parse("do x(); while (c);");
    assert_eq!(events, ["use x", "use c"]);
    assert!(diags.is_empty());
}

#[test]
fn test_do_without_while() {
    let (_, diags) = parse("do {}");
    assert_eq!(diags, ["MissingWhileAndConditionForDoWhileStatement"]);
}

#[test]
fn test_while_loop() {
    let (events, diags) = parse("while (c) x();");
    assert_eq!(events, ["use c", "use x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_with_statement() {
    let (events, diags) = parse("with (o) { x(); }");
    assert_eq!(
        events,
        [
            "use o",
            "enter with",
            "enter block",
            "use x",
            "exit block",
            "exit with"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_if_else() {
    let (events, diags) = parse("if (c) a(); else b();");
    assert_eq!(events, ["use c", "use a", "use b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_else_without_if() {
    let (events, diags) = parse("else x();");
    assert_eq!(events, ["use x"]);
    assert_eq!(diags, ["ElseHasNoIf"]);
}

#[test]
fn test_else_missing_if() {
    let (events, diags) = parse("if (c) {} else (d) {}");
    assert_eq!(
        events,
        [
            "use c",
            "enter block",
            "exit block",
            "use d",
            "enter block",
            "exit block"
        ]
    );
    assert_eq!(diags, ["MissingIfAfterElse"]);
}

#[test]
fn test_if_condition_without_parentheses() {
    let (events, diags) = parse("if c {}");
    assert_eq!(events, ["use c", "enter block", "exit block"]);
    assert_eq!(diags, ["ExpectedParenthesesAroundCondition"]);
}

// ============================================================================
// for loops
// ============================================================================

#[test]
fn test_c_style_for_loop() {
    let (events, diags) = parse("for (let i = 0; i < 10; ++i) body();");
    assert_eq!(
        events,
        [
            "enter for",
            "declare i let =",
            "use i",
            "use body",
            "use i",
            "assign i",
            "exit for"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_for_of_expression_target() {
    let (events, diags) = parse("for (x of xs) {}");
    assert_eq!(
        events,
        ["use xs", "assign x", "enter block", "exit block"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_for_in_legacy_var_initializer_ordering() {
    let (events, diags) = parse("for (var x = a in b) {}");
    assert_eq!(
        events,
        [
            "use a",
            "declare x var =",
            "use b",
            "enter block",
            "exit block"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_for_in_let_evaluates_iterable_before_declaring() {
    let (events, diags) = parse("for (let x in b) {}");
    assert_eq!(
        events,
        [
            "enter for",
            "use b",
            "declare x let",
            "enter block",
            "exit block",
            "exit for"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_for_in_let_with_initializer_is_reported() {
    let (_, diags) = parse("for (let x = a in b) {}");
    assert_eq!(diags, ["CannotAssignToLoopVariableInForOfOrInLoop"]);
}

#[test]
fn test_for_of_const() {
    let (events, diags) = parse("for (const x of xs) {}");
    assert_eq!(
        events,
        [
            "enter for",
            "use xs",
            "declare x const",
            "enter block",
            "exit block",
            "exit for"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_for_await() {
    let (_, diags) = parse("async function f() { for await (const x of xs) {} }");
    assert!(diags.is_empty());
}

#[test]
fn test_for_async_of_is_reported() {
    let (events, diags) = parse("for (async of xs) {}");
    assert_eq!(
        events,
        ["use xs", "assign async", "enter block", "exit block"]
    );
    assert_eq!(diags, ["CannotAssignToVariableNamedAsyncInForOfLoop"]);
}

#[test]
fn test_for_let_of_with_no_bindings() {
    let (events, diags) = parse("for (let of xs) {}");
    assert_eq!(
        events,
        ["enter for", "use xs", "enter block", "exit block", "exit for"]
    );
    assert_eq!(diags, ["LetWithNoBindings"]);
}

#[test]
fn test_for_let_of_declares_of() {
    let (events, diags) = parse("for (let of of xs) {}");
    assert_eq!(
        events,
        [
            "enter for",
            "use xs",
            "declare of let",
            "enter block",
            "exit block",
            "exit for"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_empty_for_head() {
    let (events, diags) = parse("for (;;) {}");
    assert_eq!(events, ["enter block", "exit block"]);
    assert!(diags.is_empty());
}

#[test]
fn test_stray_semicolon_in_for_of() {
    let (_, diags) = parse("for (a of b; c) {}");
    assert_eq!(diags, ["UnexpectedSemicolonInForOfLoop"]);
}

#[test]
fn test_missing_semicolons_in_for_head() {
    let (events, diags) = parse("for (a b) {}");
    assert_eq!(events, ["use a", "use b", "enter block", "exit block"]);
    assert_eq!(
        diags,
        [
            "MissingSemicolonBetweenForLoopInitAndCondition",
            "CStyleForLoopIsMissingThirdComponent"
        ]
    );
}

#[test]
fn test_for_without_header() {
    let (_, diags) = parse("for () {}");
    assert_eq!(diags, ["MissingHeaderOfForLoop"]);
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_function_declaration_with_parameters() {
    let (events, diags) = parse("function f(a, b = c, [d], ...e) {}");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "declare a param",
            "use c",
            "declare b param",
            "declare d param",
            "declare e param",
            "enter function body",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_trailing_comma_after_spread_parameter() {
    let (_, diags) = parse("function f(...rest,) {}");
    assert_eq!(diags, ["CommaNotAllowedAfterSpreadParameter"]);
}

#[test]
fn test_literal_parameter_is_reported() {
    let (_, diags) = parse("function f(42) {}");
    assert_eq!(diags, ["UnexpectedLiteralInParameterList"]);
}

#[test]
fn test_function_with_arrow_operator() {
    let (_, diags) = parse("function f() => {}");
    assert_eq!(diags, ["FunctionsOrMethodsShouldNotHaveArrowOperator"]);
}

#[test]
fn test_function_missing_parameter_list() {
    let (events, diags) = parse("function f { g(); }");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "enter function body",
            "use g",
            "exit function"
        ]
    );
    assert_eq!(diags, ["MissingFunctionParameterList"]);
}

#[test]
fn test_anonymous_function_statement() {
    let (events, diags) = parse("function() {}");
    assert_eq!(
        events,
        ["enter function", "enter function body", "exit function"]
    );
    assert_eq!(diags, ["MissingNameInFunctionStatement"]);
}

#[test]
fn test_generator_star_after_name() {
    let (_, diags) = parse("function g*() {}");
    assert_eq!(diags, ["GeneratorFunctionStarBelongsBeforeName"]);
}

#[test]
fn test_leading_star_function_statement() {
    let (events, diags) = parse("*function f() { yield x; }");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "enter function body",
            "use x",
            "exit function"
        ]
    );
    assert_eq!(diags, ["GeneratorFunctionStarBelongsAfterKeywordFunction"]);
}

#[test]
fn test_typescript_generic_function() {
    let (events, diags) = parse_ts("function f<T extends U>(x: T) {}");
    assert_eq!(
        events,
        [
            "declare f function",
            "enter function",
            "declare T generic param",
            "type use U",
            "type use T",
            "declare x param",
            "enter function body",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_empty_generic_parameter_list() {
    let (_, diags) = parse_ts("function f<>() {}");
    assert_eq!(diags, ["TypeScriptGenericParameterListIsEmpty"]);
}

#[test]
fn test_generics_in_javascript_are_reported() {
    let (_, diags) = parse("function f<T>() {}");
    assert_eq!(diags, ["TypeScriptGenericsNotAllowedInJavaScript"]);
}

#[test]
fn test_named_function_expression() {
    let (events, diags) = parse("(function f() {});");
    assert_eq!(
        events,
        [
            "enter named function f",
            "enter function body",
            "exit named function"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_arrow_function_with_parameters() {
    let (events, diags) = parse("(a, b) => a;");
    assert_eq!(
        events,
        [
            "enter function",
            "declare a param",
            "declare b param",
            "enter function body",
            "use a",
            "exit function"
        ]
    );
    assert!(diags.is_empty());
}

// ============================================================================
// Classes
// ============================================================================

#[test]
fn test_class_with_method() {
    let (events, diags) = parse("class C { m(a) { b(); } }");
    assert_eq!(
        events,
        [
            "declare C class",
            "enter class",
            "enter function",
            "declare a param",
            "enter function body",
            "use b",
            "exit function",
            "exit class"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_class_extends() {
    let (events, diags) = parse("class D extends B {}");
    assert_eq!(
        events,
        ["declare D class", "enter class", "use B", "exit class"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_class_without_name() {
    let (_, diags) = parse("class {}");
    assert_eq!(diags, ["MissingNameInClassStatement"]);
}

#[test]
fn test_exported_class_without_name() {
    let (_, diags) = parse("export class {}");
    assert_eq!(diags, ["MissingNameOfExportedClass"]);
}

#[test]
fn test_export_default_class_may_be_anonymous() {
    let (_, diags) = parse("export default class {}");
    assert!(diags.is_empty());
}

#[test]
fn test_class_implements_in_typescript() {
    let (events, diags) = parse_ts("class C implements I {}");
    assert_eq!(
        events,
        ["declare C class", "enter class", "type use I", "exit class"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_class_implements_in_javascript_is_reported() {
    let (_, diags) = parse("class C implements I {}");
    assert_eq!(diags, ["TypeScriptImplementsNotAllowedInJavaScript"]);
}

#[test]
fn test_class_static_block() {
    let (events, diags) = parse("class C { static { x(); } }");
    assert_eq!(
        events,
        [
            "declare C class",
            "enter class",
            "enter block",
            "use x",
            "exit block",
            "exit class"
        ]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_class_field_with_initializer() {
    let (events, diags) = parse("class C { p = x; }");
    assert_eq!(
        events,
        ["declare C class", "enter class", "use x", "exit class"]
    );
    assert!(diags.is_empty());
}

#[test]
fn test_class_index_signature() {
    let (events, diags) = parse_ts("class C { [k: string]: number; }");
    assert_eq!(
        events,
        [
            "declare C class",
            "enter class",
            "enter index signature",
            "declare k param",
            "exit index signature",
            "exit class"
        ]
    );
    assert!(diags.is_empty());
}

// ============================================================================
// Expression statements and recovery
// ============================================================================

#[test]
fn test_assignment_expression() {
    let (events, diags) = parse("a = b;");
    assert_eq!(events, ["use b", "assign a"]);
    assert!(diags.is_empty());
}

#[test]
fn test_member_assignment() {
    let (events, diags) = parse("a.b = c;");
    assert_eq!(events, ["use a", "use c"]);
    assert!(diags.is_empty());
}

#[test]
fn test_compound_assignment_reads_then_writes() {
    let (events, diags) = parse("a += b;");
    assert_eq!(events, ["use a", "use b", "assign a"]);
    assert!(diags.is_empty());
}

#[test]
fn test_destructuring_assignment() {
    let (events, diags) = parse("[a, b] = c;");
    assert_eq!(events, ["use c", "assign a", "assign b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_update_expression() {
    let (events, diags) = parse("x++;");
    assert_eq!(events, ["use x", "assign x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_call_chain() {
    let (events, diags) = parse("f(a)(b);");
    assert_eq!(events, ["use f", "use a", "use b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_tagged_template() {
    let (events, diags) = parse("tag`x${y}`;");
    assert_eq!(events, ["use tag", "use y"]);
    assert!(diags.is_empty());
}

#[test]
fn test_regexp_statement() {
    let (events, diags) = parse("/re/.test(s);");
    assert_eq!(events, ["use s"]);
    assert!(diags.is_empty());
}

#[test]
fn test_object_literal_values() {
    let (events, diags) = parse("o = { a: b, c };");
    assert_eq!(events, ["use b", "use c", "assign o"]);
    assert!(diags.is_empty());
}

#[test]
fn test_conditional_expression() {
    let (events, diags) = parse("c ? a : b;");
    assert_eq!(events, ["use c", "use a", "use b"]);
    assert!(diags.is_empty());
}

#[test]
fn test_unmatched_close_paren_is_consumed() {
    let (events, diags) = parse("x);");
    assert_eq!(events, ["use x"]);
    assert_eq!(diags, ["UnmatchedParenthesis"]);
}

#[test]
fn test_unmatched_right_curly_at_module_level() {
    let (events, diags) = parse("}");
    assert!(events.is_empty());
    assert_eq!(diags, ["UnmatchedRightCurly"]);
}

#[test]
fn test_unclosed_block() {
    let (events, diags) = parse("{ x();");
    assert_eq!(events, ["enter block", "use x", "exit block"]);
    assert_eq!(diags, ["UnclosedCodeBlock"]);
}

#[test]
fn test_statement_after_recovery() {
    // The first statement is garbage; the second still parses.
    let (events, diags) = parse("?\nlet x = 1;");
    assert_eq!(events, ["declare x let ="]);
    assert_eq!(diags, ["UnexpectedToken"]);
}

// ============================================================================
// JSX
// ============================================================================

#[test]
fn test_jsx_element_with_expressions() {
    let (events, diags) = parse_with(
        "x = <div a={b}>{c}</div>;",
        ParserOptions {
            typescript: false,
            jsx: true,
        },
    );
    assert_eq!(events, ["use b", "use c", "assign x"]);
    assert!(diags.is_empty());
}

#[test]
fn test_jsx_component_is_a_use() {
    let (events, diags) = parse_with(
        "w = <Widget />;",
        ParserOptions {
            typescript: false,
            jsx: true,
        },
    );
    assert_eq!(events, ["use Widget", "assign w"]);
    assert!(diags.is_empty());
}

#[test]
fn test_jsx_disabled_is_reported() {
    let (_, diags) = parse("x = <div />;");
    assert!(diags.contains(&"JsxNotAllowed"));
}
