//! The parse-event visitor interface.
//!
//! The parser drives a [`ParseVisitor`] with declarations, uses, and scope
//! boundaries in evaluation order. Consumers (scope analyzers, rule
//! engines, tests) implement the trait; [`NullVisitor`] discards events
//! and [`BufferingVisitor`] records them for deferred replay when
//! evaluation order differs from syntactic order.

use fastlint_lexer::Identifier;

/// What kind of declaration a `visit_variable_declaration` event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    Catch,
    Import,
    ImportType,
    Enum,
    GenericParameter,
    TypeAlias,
    Interface,
    Namespace,
}

/// Whether a declaration had an `=` initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarInitKind {
    Normal,
    InitializedWithEquals,
}

/// Structured parse events, in evaluation order.
///
/// Every `visit_enter_*_scope` is matched by exactly one
/// `visit_exit_*_scope` at the correct nesting depth, on success and error
/// paths alike.
pub trait ParseVisitor {
    fn visit_variable_declaration(
        &mut self,
        name: Identifier,
        kind: VarKind,
        init_kind: VarInitKind,
    ) {
        let _ = (name, kind, init_kind);
    }
    fn visit_variable_use(&mut self, name: Identifier) {
        let _ = name;
    }
    fn visit_variable_export_use(&mut self, name: Identifier) {
        let _ = name;
    }
    fn visit_variable_type_use(&mut self, name: Identifier) {
        let _ = name;
    }
    fn visit_variable_assignment(&mut self, name: Identifier) {
        let _ = name;
    }

    fn visit_enter_block_scope(&mut self) {}
    fn visit_exit_block_scope(&mut self) {}
    fn visit_enter_class_scope(&mut self) {}
    fn visit_exit_class_scope(&mut self) {}
    fn visit_enter_enum_scope(&mut self) {}
    fn visit_exit_enum_scope(&mut self) {}
    fn visit_enter_for_scope(&mut self) {}
    fn visit_exit_for_scope(&mut self) {}
    fn visit_enter_function_scope(&mut self) {}
    fn visit_enter_function_scope_body(&mut self) {}
    fn visit_exit_function_scope(&mut self) {}
    fn visit_enter_index_signature_scope(&mut self) {}
    fn visit_exit_index_signature_scope(&mut self) {}
    fn visit_enter_interface_scope(&mut self) {}
    fn visit_exit_interface_scope(&mut self) {}
    /// A function expression's own name scope: the name is visible inside
    /// the function but not outside.
    fn visit_enter_named_function_scope(&mut self, name: Identifier) {
        let _ = name;
    }
    fn visit_exit_named_function_scope(&mut self) {}
    fn visit_enter_type_alias_scope(&mut self) {}
    fn visit_exit_type_alias_scope(&mut self) {}
    fn visit_enter_with_scope(&mut self) {}
    fn visit_exit_with_scope(&mut self) {}

    fn visit_end_of_module(&mut self) {}
}

/// A visitor that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVisitor;

impl ParseVisitor for NullVisitor {}

/// One recorded visitor event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorEvent {
    VariableDeclaration {
        name: Identifier,
        kind: VarKind,
        init_kind: VarInitKind,
    },
    VariableUse {
        name: Identifier,
    },
    VariableExportUse {
        name: Identifier,
    },
    VariableTypeUse {
        name: Identifier,
    },
    VariableAssignment {
        name: Identifier,
    },
    EnterBlockScope,
    ExitBlockScope,
    EnterClassScope,
    ExitClassScope,
    EnterEnumScope,
    ExitEnumScope,
    EnterForScope,
    ExitForScope,
    EnterFunctionScope,
    EnterFunctionScopeBody,
    ExitFunctionScope,
    EnterIndexSignatureScope,
    ExitIndexSignatureScope,
    EnterInterfaceScope,
    ExitInterfaceScope,
    EnterNamedFunctionScope {
        name: Identifier,
    },
    ExitNamedFunctionScope,
    EnterTypeAliasScope,
    ExitTypeAliasScope,
    EnterWithScope,
    ExitWithScope,
    EndOfModule,
}

impl VisitorEvent {
    /// Deliver this event to a visitor.
    pub fn replay<V: ParseVisitor + ?Sized>(self, v: &mut V) {
        match self {
            VisitorEvent::VariableDeclaration {
                name,
                kind,
                init_kind,
            } => v.visit_variable_declaration(name, kind, init_kind),
            VisitorEvent::VariableUse { name } => v.visit_variable_use(name),
            VisitorEvent::VariableExportUse { name } => v.visit_variable_export_use(name),
            VisitorEvent::VariableTypeUse { name } => v.visit_variable_type_use(name),
            VisitorEvent::VariableAssignment { name } => v.visit_variable_assignment(name),
            VisitorEvent::EnterBlockScope => v.visit_enter_block_scope(),
            VisitorEvent::ExitBlockScope => v.visit_exit_block_scope(),
            VisitorEvent::EnterClassScope => v.visit_enter_class_scope(),
            VisitorEvent::ExitClassScope => v.visit_exit_class_scope(),
            VisitorEvent::EnterEnumScope => v.visit_enter_enum_scope(),
            VisitorEvent::ExitEnumScope => v.visit_exit_enum_scope(),
            VisitorEvent::EnterForScope => v.visit_enter_for_scope(),
            VisitorEvent::ExitForScope => v.visit_exit_for_scope(),
            VisitorEvent::EnterFunctionScope => v.visit_enter_function_scope(),
            VisitorEvent::EnterFunctionScopeBody => v.visit_enter_function_scope_body(),
            VisitorEvent::ExitFunctionScope => v.visit_exit_function_scope(),
            VisitorEvent::EnterIndexSignatureScope => v.visit_enter_index_signature_scope(),
            VisitorEvent::ExitIndexSignatureScope => v.visit_exit_index_signature_scope(),
            VisitorEvent::EnterInterfaceScope => v.visit_enter_interface_scope(),
            VisitorEvent::ExitInterfaceScope => v.visit_exit_interface_scope(),
            VisitorEvent::EnterNamedFunctionScope { name } => {
                v.visit_enter_named_function_scope(name)
            }
            VisitorEvent::ExitNamedFunctionScope => v.visit_exit_named_function_scope(),
            VisitorEvent::EnterTypeAliasScope => v.visit_enter_type_alias_scope(),
            VisitorEvent::ExitTypeAliasScope => v.visit_exit_type_alias_scope(),
            VisitorEvent::EnterWithScope => v.visit_enter_with_scope(),
            VisitorEvent::ExitWithScope => v.visit_exit_with_scope(),
            VisitorEvent::EndOfModule => v.visit_end_of_module(),
        }
    }
}

/// A visitor that records events for later replay.
///
/// Used wherever the parser must emit events in evaluation order that
/// differs from syntactic order (`for (var x = init in iterable)`, named
/// export lists). `move_into` replays the recording exactly once.
#[derive(Debug, Default)]
pub struct BufferingVisitor {
    events: Vec<VisitorEvent>,
}

impl BufferingVisitor {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// The recorded events, in recording order.
    pub fn events(&self) -> &[VisitorEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replay all recorded events into `v`, leaving this buffer empty.
    pub fn move_into<V: ParseVisitor + ?Sized>(&mut self, v: &mut V) {
        for event in self.events.drain(..) {
            event.replay(v);
        }
    }

    /// Take the recorded events without replaying them.
    pub fn into_events(self) -> Vec<VisitorEvent> {
        self.events
    }
}

impl ParseVisitor for BufferingVisitor {
    fn visit_variable_declaration(
        &mut self,
        name: Identifier,
        kind: VarKind,
        init_kind: VarInitKind,
    ) {
        self.events.push(VisitorEvent::VariableDeclaration {
            name,
            kind,
            init_kind,
        });
    }
    fn visit_variable_use(&mut self, name: Identifier) {
        self.events.push(VisitorEvent::VariableUse { name });
    }
    fn visit_variable_export_use(&mut self, name: Identifier) {
        self.events.push(VisitorEvent::VariableExportUse { name });
    }
    fn visit_variable_type_use(&mut self, name: Identifier) {
        self.events.push(VisitorEvent::VariableTypeUse { name });
    }
    fn visit_variable_assignment(&mut self, name: Identifier) {
        self.events.push(VisitorEvent::VariableAssignment { name });
    }
    fn visit_enter_block_scope(&mut self) {
        self.events.push(VisitorEvent::EnterBlockScope);
    }
    fn visit_exit_block_scope(&mut self) {
        self.events.push(VisitorEvent::ExitBlockScope);
    }
    fn visit_enter_class_scope(&mut self) {
        self.events.push(VisitorEvent::EnterClassScope);
    }
    fn visit_exit_class_scope(&mut self) {
        self.events.push(VisitorEvent::ExitClassScope);
    }
    fn visit_enter_enum_scope(&mut self) {
        self.events.push(VisitorEvent::EnterEnumScope);
    }
    fn visit_exit_enum_scope(&mut self) {
        self.events.push(VisitorEvent::ExitEnumScope);
    }
    fn visit_enter_for_scope(&mut self) {
        self.events.push(VisitorEvent::EnterForScope);
    }
    fn visit_exit_for_scope(&mut self) {
        self.events.push(VisitorEvent::ExitForScope);
    }
    fn visit_enter_function_scope(&mut self) {
        self.events.push(VisitorEvent::EnterFunctionScope);
    }
    fn visit_enter_function_scope_body(&mut self) {
        self.events.push(VisitorEvent::EnterFunctionScopeBody);
    }
    fn visit_exit_function_scope(&mut self) {
        self.events.push(VisitorEvent::ExitFunctionScope);
    }
    fn visit_enter_index_signature_scope(&mut self) {
        self.events.push(VisitorEvent::EnterIndexSignatureScope);
    }
    fn visit_exit_index_signature_scope(&mut self) {
        self.events.push(VisitorEvent::ExitIndexSignatureScope);
    }
    fn visit_enter_interface_scope(&mut self) {
        self.events.push(VisitorEvent::EnterInterfaceScope);
    }
    fn visit_exit_interface_scope(&mut self) {
        self.events.push(VisitorEvent::ExitInterfaceScope);
    }
    fn visit_enter_named_function_scope(&mut self, name: Identifier) {
        self.events
            .push(VisitorEvent::EnterNamedFunctionScope { name });
    }
    fn visit_exit_named_function_scope(&mut self) {
        self.events.push(VisitorEvent::ExitNamedFunctionScope);
    }
    fn visit_enter_type_alias_scope(&mut self) {
        self.events.push(VisitorEvent::EnterTypeAliasScope);
    }
    fn visit_exit_type_alias_scope(&mut self) {
        self.events.push(VisitorEvent::ExitTypeAliasScope);
    }
    fn visit_enter_with_scope(&mut self) {
        self.events.push(VisitorEvent::EnterWithScope);
    }
    fn visit_exit_with_scope(&mut self) {
        self.events.push(VisitorEvent::ExitWithScope);
    }
    fn visit_end_of_module(&mut self) {
        self.events.push(VisitorEvent::EndOfModule);
    }
}
