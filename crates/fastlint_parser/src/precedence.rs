//! The precedence record threaded through expression parsing.

/// Controls which operators the expression parser may consume at the
/// current position. The statement parser narrows these flags at grammar
/// positions where an operator would be ambiguous (`in` inside a `for`
/// head, commas in parameter lists, ...).
#[derive(Debug, Clone, Copy)]
pub struct Precedence {
    /// Allow the comma (sequence) operator.
    pub commas: bool,
    /// Allow the `in` operator. False inside `for` loop initializers,
    /// where `in` separates the loop target from the iterated object.
    pub in_operator: bool,
    /// Allow binary operators and assignment at this level. Disabled when
    /// parsing the operand of a unary operator.
    pub binary_operators: bool,
    /// Allow `?:`.
    pub conditional_operator: bool,
    /// Whether a `{` directly after `=>` is the arrow's body. False in
    /// positions where the brace belongs to an enclosing statement.
    pub trailing_curly_is_arrow_body: bool,
    /// Allow a TypeScript `: Type` annotation after a binding-shaped
    /// expression (parameter lists and parenthesized arrow parameters).
    pub colon_type_annotation: bool,
}

impl Default for Precedence {
    fn default() -> Self {
        Self {
            commas: true,
            in_operator: true,
            binary_operators: true,
            conditional_operator: true,
            trailing_curly_is_arrow_body: true,
            colon_type_annotation: false,
        }
    }
}
