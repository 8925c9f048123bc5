//! fastlint_parser: Statement-level recursive descent parser for
//! JavaScript and TypeScript.
//!
//! The parser consumes tokens from `fastlint_lexer` and drives a
//! `fastlint_ast::ParseVisitor` with declarations, uses, and scope
//! boundaries in evaluation order, reporting location-precise diagnostics
//! for malformed input instead of aborting. Expression trees are
//! arena-allocated and live only as long as the parse call.

mod expression;
mod parser;
mod precedence;
mod type_annotations;

pub use parser::{Parser, ParserOptions, StatementMode};
pub use precedence::Precedence;

/// The two signals that unwind the statement tree. Both leave visitor
/// scopes balanced; neither is an application error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// The parser met a token at a position with no defined recovery.
    /// A diagnostic has already been reported at the raise site; the
    /// nearest statement loop resynchronizes and resumes.
    Unexpected,
    /// The recursion depth guard tripped. Unwinds the whole enclosing
    /// statement tree to the module loop.
    DepthLimitExceeded,
}

pub type ParseResult<T = ()> = Result<T, Interrupt>;
