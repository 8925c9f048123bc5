//! fastlint_ast: Expression AST and the parse-event visitor interface.
//!
//! The statement parser emits structured events through [`ParseVisitor`]
//! while building arena-allocated [`Expression`] trees for the pieces of
//! the grammar that need reassociation (bindings, initializers,
//! conditions).

pub mod expression;
pub mod visitor;

pub use expression::{Expression, FunctionAttributes, ObjectEntry};
pub use visitor::{BufferingVisitor, NullVisitor, ParseVisitor, VarInitKind, VarKind, VisitorEvent};
