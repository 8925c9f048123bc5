//! Visitor-stream invariants.
//!
//! These tests check the properties the event stream guarantees to
//! consumers: scope enter/exit balance on all inputs, evaluation-order
//! event emission, deterministic reparsing, and cooperative depth-limit
//! unwinding.

use bumpalo::Bump;
use fastlint_ast::{BufferingVisitor, VisitorEvent};
use fastlint_parser::{Parser, ParserOptions};

fn parse_events(source: &str, options: ParserOptions) -> (Vec<VisitorEvent>, Vec<&'static str>) {
    let arena = Bump::new();
    let mut parser = Parser::new(&arena, source, options);
    let mut visitor = BufferingVisitor::new();
    parser.parse_and_visit_module(&mut visitor);
    let diags = parser.take_diagnostics();
    let diag_names = diags.diagnostics().iter().map(|d| d.name()).collect();
    (visitor.into_events(), diag_names)
}

/// Each enter event's matching exit, for the balance checker.
fn scope_delta(event: &VisitorEvent) -> Option<(&'static str, i32)> {
    use VisitorEvent::*;
    Some(match event {
        EnterBlockScope => ("block", 1),
        ExitBlockScope => ("block", -1),
        EnterClassScope => ("class", 1),
        ExitClassScope => ("class", -1),
        EnterEnumScope => ("enum", 1),
        ExitEnumScope => ("enum", -1),
        EnterForScope => ("for", 1),
        ExitForScope => ("for", -1),
        EnterFunctionScope => ("function", 1),
        ExitFunctionScope => ("function", -1),
        EnterIndexSignatureScope => ("index signature", 1),
        ExitIndexSignatureScope => ("index signature", -1),
        EnterInterfaceScope => ("interface", 1),
        ExitInterfaceScope => ("interface", -1),
        EnterNamedFunctionScope { .. } => ("named function", 1),
        ExitNamedFunctionScope => ("named function", -1),
        EnterTypeAliasScope => ("type alias", 1),
        ExitTypeAliasScope => ("type alias", -1),
        EnterWithScope => ("with", 1),
        ExitWithScope => ("with", -1),
        _ => return None,
    })
}

/// Assert every scope enter has a matching exit at the correct nesting
/// depth, and that the stream ends with exactly one end-of-module.
fn assert_scopes_balanced(events: &[VisitorEvent]) {
    let mut stack: Vec<&'static str> = Vec::new();
    for event in events {
        if let Some((name, delta)) = scope_delta(event) {
            if delta > 0 {
                stack.push(name);
            } else {
                let top = stack.pop();
                assert_eq!(top, Some(name), "mismatched scope exit: {:?}", event);
            }
        }
    }
    assert!(stack.is_empty(), "unclosed scopes: {:?}", stack);
    assert_eq!(
        events.last(),
        Some(&VisitorEvent::EndOfModule),
        "missing end-of-module event"
    );
    let end_count = events
        .iter()
        .filter(|e| matches!(e, VisitorEvent::EndOfModule))
        .count();
    assert_eq!(end_count, 1);
}

// ============================================================================
// Scope balance
// ============================================================================

const MALFORMED_SOURCES: &[&str] = &[
    "",
    "{",
    "}",
    "{{{}",
    "function f( {",
    "function () {",
    "class C extends {",
    "class {",
    "if (x {",
    "for (let x of) {}",
    "for (;;",
    "try {",
    "try {} catch (",
    "switch (x) {",
    "switch (x) { case",
    "let x = ;",
    "let 42;",
    "import {a from 'm';",
    "export {",
    "interface I { m( }",
    "enum E { = }",
    "do do do x; while(y); while(z);",
    "`unterminated ${ expr",
    "((((((((((",
    "a ? b :",
    "x = { y: function() {",
    "*",
    "type T = ;",
    "with (o)",
    "label: label2:",
];

#[test]
fn test_scopes_balance_on_malformed_inputs() {
    for source in MALFORMED_SOURCES {
        for typescript in [false, true] {
            let (events, _) = parse_events(
                source,
                ParserOptions {
                    typescript,
                    jsx: false,
                },
            );
            assert_scopes_balanced(&events);
        }
    }
}

#[test]
fn test_scopes_balance_on_well_formed_input() {
    let source = r#"
        import {readFile} from "fs";
        let cache = new Map();
        async function load(name) {
            if (cache.has(name)) return cache.get(name);
            try {
                const data = await readFile(name);
                cache.set(name, data);
                return data;
            } catch (error) {
                for (const listener of listeners) listener(error);
                throw error;
            }
        }
        class Loader {
            constructor(base) { this.base = base; }
            load(name) { return load(this.base + name); }
        }
        export { Loader };
    "#;
    let (events, diags) = parse_events(source, ParserOptions::default());
    assert_scopes_balanced(&events);
    assert!(diags.is_empty(), "unexpected diagnostics: {:?}", diags);
}

// ============================================================================
// Depth limit
// ============================================================================

#[test]
fn test_depth_limit_on_nested_blocks() {
    let mut source = String::new();
    for _ in 0..300 {
        source.push('{');
    }
    for _ in 0..300 {
        source.push('}');
    }
    let (events, diags) = parse_events(&source, ParserOptions::default());
    assert!(diags.contains(&"DepthLimitExceeded"));
    assert_scopes_balanced(&events);
}

#[test]
fn test_depth_limit_on_nested_parens() {
    let mut source = String::new();
    for _ in 0..300 {
        source.push('(');
    }
    source.push('x');
    for _ in 0..300 {
        source.push(')');
    }
    source.push(';');
    let (events, diags) = parse_events(&source, ParserOptions::default());
    assert!(diags.contains(&"DepthLimitExceeded"));
    assert_scopes_balanced(&events);
}

#[test]
fn test_no_depth_diagnostic_under_the_limit() {
    let mut source = String::new();
    for _ in 0..20 {
        source.push('{');
    }
    for _ in 0..20 {
        source.push('}');
    }
    let (events, diags) = parse_events(&source, ParserOptions::default());
    assert!(diags.is_empty());
    assert_scopes_balanced(&events);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_reparsing_is_deterministic() {
    let sources = [
        "let x = 1; function f(a) { return a + x; }",
        "for (var x = a in b) {}",
        "let 42; { x); } else",
        "class C { m() { `t${u}`; } }",
    ];
    for source in sources {
        let first = parse_events(source, ParserOptions::default());
        let second = parse_events(source, ParserOptions::default());
        assert_eq!(first.0, second.0, "source: {}", source);
        assert_eq!(first.1, second.1, "source: {}", source);
    }
}

// ============================================================================
// Evaluation-order laws
// ============================================================================

#[test]
fn test_for_var_in_buffers_initializer_before_iterable() {
    use VisitorEvent::*;
    let (events, diags) = parse_events("for (var x = a in b) {}", ParserOptions::default());
    assert!(diags.is_empty());
    let significant: Vec<&VisitorEvent> = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                VariableUse { .. } | VariableDeclaration { .. } | EnterBlockScope | ExitBlockScope
            )
        })
        .collect();
    // use(a), declare(x), use(b), then the body.
    assert!(matches!(significant[0], VariableUse { .. }));
    assert!(matches!(significant[1], VariableDeclaration { .. }));
    assert!(matches!(significant[2], VariableUse { .. }));
    assert!(matches!(significant[3], EnterBlockScope));
    assert!(matches!(significant[4], ExitBlockScope));
}

#[test]
fn test_for_let_in_evaluates_iterable_before_declaration() {
    use VisitorEvent::*;
    let (events, diags) = parse_events("for (let x in b) {}", ParserOptions::default());
    assert!(diags.is_empty());
    let use_index = events
        .iter()
        .position(|e| matches!(e, VariableUse { .. }))
        .expect("missing use event");
    let declare_index = events
        .iter()
        .position(|e| matches!(e, VariableDeclaration { .. }))
        .expect("missing declaration event");
    assert!(use_index < declare_index);
}

#[test]
fn test_default_value_is_evaluated_before_binding() {
    use VisitorEvent::*;
    // In `let {a = b} = c;` the events run use(c), use(b), declare(a).
    let (events, diags) = parse_events("let {a = b} = c;", ParserOptions::default());
    assert!(diags.is_empty());
    let positions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter_map(|(i, e)| {
            matches!(e, VariableUse { .. } | VariableDeclaration { .. }).then_some(i)
        })
        .collect();
    assert_eq!(positions.len(), 3);
    assert!(matches!(events[positions[0]], VariableUse { .. })); // c
    assert!(matches!(events[positions[1]], VariableUse { .. })); // b
    assert!(matches!(events[positions[2]], VariableDeclaration { .. })); // a
}

// ============================================================================
// Buffering re-export behavior
// ============================================================================

#[test]
fn test_local_export_flushes_buffered_uses() {
    use VisitorEvent::*;
    let (events, _) = parse_events("export {a, b};", ParserOptions::default());
    let exports = events
        .iter()
        .filter(|e| matches!(e, VariableExportUse { .. }))
        .count();
    assert_eq!(exports, 2);
}

#[test]
fn test_reexport_discards_buffered_uses() {
    use VisitorEvent::*;
    let (events, _) = parse_events(r#"export {a, b} from "m";"#, ParserOptions::default());
    assert!(events
        .iter()
        .all(|e| !matches!(e, VariableExportUse { .. } | VariableUse { .. })));
}
