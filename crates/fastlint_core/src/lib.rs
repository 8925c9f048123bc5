//! fastlint_core: Core utilities for the fastlint JavaScript/TypeScript linter.
//!
//! Provides source spans and string interning used throughout the
//! lexer/parser pipeline.

pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{Name, StringInterner};
pub use text::{Span, TextPos};
