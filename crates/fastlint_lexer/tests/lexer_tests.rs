//! Lexer integration tests.
//!
//! Verifies token kinds, ASI-relevant newline flags, transactions,
//! synthetic semicolon insertion, and rescanning entry points.

use fastlint_lexer::{Lexer, TokenKind};

/// Helper: lex the whole source and return the token kinds.
fn lex(source: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(source);
    let mut kinds = Vec::new();
    loop {
        let kind = lexer.peek().kind;
        kinds.push(kind);
        if kind == TokenKind::EndOfFile {
            return kinds;
        }
        lexer.skip();
    }
}

fn diag_names(source: &str) -> Vec<&'static str> {
    let mut lexer = Lexer::new(source);
    while lexer.peek().kind != TokenKind::EndOfFile {
        lexer.skip();
    }
    lexer
        .take_diagnostics()
        .diagnostics()
        .iter()
        .map(|d| d.name())
        .collect()
}

// ============================================================================
// Token kinds
// ============================================================================

#[test]
fn test_lex_variable_declaration() {
    use TokenKind::*;
    assert_eq!(
        lex("let x = 42;"),
        vec![KwLet, Identifier, Equal, Number, Semicolon, EndOfFile]
    );
}

#[test]
fn test_lex_contextual_keywords() {
    use TokenKind::*;
    assert_eq!(
        lex("of as from type async"),
        vec![KwOf, KwAs, KwFrom, KwType, KwAsync, EndOfFile]
    );
}

#[test]
fn test_lex_punctuation_maximal_munch() {
    use TokenKind::*;
    assert_eq!(
        lex(">>>= ** ??= ?. ... =>"),
        vec![
            GreaterGreaterGreaterEqual,
            StarStar,
            QuestionQuestionEqual,
            QuestionDot,
            DotDotDot,
            EqualGreater,
            EndOfFile
        ]
    );
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    use TokenKind::*;
    // `x ? .5 : y` must not lex `?.`.
    assert_eq!(
        lex("x ?.5 : y"),
        vec![Identifier, Question, Number, Colon, Identifier, EndOfFile]
    );
}

#[test]
fn test_lex_numbers() {
    use TokenKind::*;
    assert_eq!(
        lex("0 1.5 0x1f 0b101 0o17 10n 1_000 .5"),
        vec![
            Number, Number, Number, Number, Number, Number, Number, Number, EndOfFile
        ]
    );
}

#[test]
fn test_lex_strings_and_templates() {
    use TokenKind::*;
    assert_eq!(lex(r#"'a' "b""#), vec![String, String, EndOfFile]);
    assert_eq!(lex("`plain`"), vec![CompleteTemplate, EndOfFile]);
    assert_eq!(
        lex("`a${b"),
        vec![IncompleteTemplate, Identifier, EndOfFile]
    );
}

#[test]
fn test_lex_private_identifier() {
    use TokenKind::*;
    assert_eq!(
        lex("this.#secret"),
        vec![KwThis, Dot, PrivateIdentifier, EndOfFile]
    );
}

#[test]
fn test_lex_comments_are_trivia() {
    use TokenKind::*;
    assert_eq!(
        lex("a // line\n/* block */ b"),
        vec![Identifier, Identifier, EndOfFile]
    );
}

#[test]
fn test_lex_shebang() {
    use TokenKind::*;
    assert_eq!(lex("#!/usr/bin/env node\nx"), vec![Identifier, EndOfFile]);
}

#[test]
fn test_escaped_reserved_keyword() {
    use TokenKind::*;
    assert_eq!(
        lex("\\u{69}f"),
        vec![ReservedKeywordWithEscapeSequence, EndOfFile]
    );
    let mut lexer = Lexer::new("\\u{69}f");
    assert!(lexer.peek().escape_sequence.is_some());
    // An escaped contextual keyword is a plain identifier.
    assert_eq!(lex("\\u{6f}f"), vec![Identifier, EndOfFile]);
}

#[test]
fn test_identifier_names_are_interned() {
    let mut lexer = Lexer::new("hello hello world");
    let a = lexer.peek().name;
    lexer.skip();
    let b = lexer.peek().name;
    lexer.skip();
    let c = lexer.peek().name;
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(lexer.interner().resolve(a), "hello");
}

// ============================================================================
// Newline flags
// ============================================================================

#[test]
fn test_has_leading_newline() {
    let mut lexer = Lexer::new("a\nb c");
    assert!(!lexer.peek().has_leading_newline);
    lexer.skip();
    assert!(lexer.peek().has_leading_newline); // b
    lexer.skip();
    assert!(!lexer.peek().has_leading_newline); // c
}

#[test]
fn test_newline_inside_block_comment_counts() {
    let mut lexer = Lexer::new("a /* x\ny */ b");
    lexer.skip();
    assert!(lexer.peek().has_leading_newline);
}

// ============================================================================
// Spans
// ============================================================================

#[test]
fn test_token_spans_are_byte_offsets() {
    let mut lexer = Lexer::new("let  xyz");
    assert_eq!(lexer.peek().begin, 0);
    assert_eq!(lexer.peek().end, 3);
    lexer.skip();
    assert_eq!(lexer.peek().begin, 5);
    assert_eq!(lexer.peek().end, 8);
    assert_eq!(lexer.end_of_previous_token(), 3);
}

// ============================================================================
// Synthetic semicolons
// ============================================================================

#[test]
fn test_insert_semicolon_pushes_back_current_token() {
    let mut lexer = Lexer::new("a b");
    lexer.skip(); // now at `b`
    lexer.insert_semicolon();
    assert_eq!(lexer.peek().kind, TokenKind::Semicolon);
    assert_eq!(lexer.peek().begin, 1);
    assert_eq!(lexer.peek().end, 1);
    lexer.skip();
    assert_eq!(lexer.peek().kind, TokenKind::Identifier);
    assert_eq!(lexer.peek().begin, 2);
}

// ============================================================================
// Transactions
// ============================================================================

#[test]
fn test_transaction_rollback_redelivers_tokens() {
    let mut lexer = Lexer::new("a b c");
    let transaction = lexer.begin_transaction();
    lexer.skip();
    lexer.skip();
    assert_eq!(lexer.peek().begin, 4); // c
    lexer.roll_back_transaction(transaction);
    assert_eq!(lexer.peek().begin, 0); // a again
    lexer.skip();
    assert_eq!(lexer.peek().begin, 2); // b
}

#[test]
fn test_transaction_commit_keeps_tokens_consumed() {
    let mut lexer = Lexer::new("a b");
    let transaction = lexer.begin_transaction();
    lexer.skip();
    lexer.commit_transaction(transaction);
    assert_eq!(lexer.peek().begin, 2);
}

#[test]
fn test_transaction_rollback_discards_diagnostics() {
    let mut lexer = Lexer::new("a 'unterminated");
    let transaction = lexer.begin_transaction();
    lexer.skip(); // scans the broken string
    assert_eq!(lexer.diagnostics().len(), 1);
    lexer.roll_back_transaction(transaction);
    assert!(lexer.diagnostics().is_empty());
}

#[test]
fn test_nested_transactions_are_lifo() {
    let mut lexer = Lexer::new("a b c d");
    let outer = lexer.begin_transaction();
    lexer.skip();
    let inner = lexer.begin_transaction();
    lexer.skip();
    lexer.roll_back_transaction(inner);
    assert_eq!(lexer.peek().begin, 2); // b
    lexer.roll_back_transaction(outer);
    assert_eq!(lexer.peek().begin, 0); // a
}

// ============================================================================
// Rescanning
// ============================================================================

#[test]
fn test_reparse_as_regexp() {
    let mut lexer = Lexer::new("/ab[/]c/gi x");
    assert_eq!(lexer.peek().kind, TokenKind::Slash);
    lexer.reparse_as_regexp();
    assert_eq!(lexer.peek().kind, TokenKind::Regexp);
    assert_eq!(lexer.peek().begin, 0);
    assert_eq!(lexer.peek().end, 10);
    lexer.skip();
    assert_eq!(lexer.peek().kind, TokenKind::Identifier);
}

#[test]
fn test_template_continuation() {
    let mut lexer = Lexer::new("`a${b}c${d}e`");
    assert_eq!(lexer.peek().kind, TokenKind::IncompleteTemplate);
    lexer.skip();
    assert_eq!(lexer.peek().kind, TokenKind::Identifier); // b
    lexer.skip();
    assert_eq!(lexer.peek().kind, TokenKind::RightCurly);
    lexer.skip_in_template();
    assert_eq!(lexer.peek().kind, TokenKind::IncompleteTemplate); // }c${
    lexer.skip();
    lexer.skip(); // d
    assert_eq!(lexer.peek().kind, TokenKind::RightCurly);
    lexer.skip_in_template();
    assert_eq!(lexer.peek().kind, TokenKind::CompleteTemplate); // }e`
}

#[test]
fn test_skip_as_greater_splits_shift_tokens() {
    let mut lexer = Lexer::new("A>>");
    lexer.skip();
    assert_eq!(lexer.peek().kind, TokenKind::GreaterGreater);
    lexer.skip_as_greater();
    assert_eq!(lexer.peek().kind, TokenKind::Greater);
    assert_eq!(lexer.peek().begin, 2);
    lexer.skip_as_greater();
    assert_eq!(lexer.peek().kind, TokenKind::EndOfFile);
}

// ============================================================================
// Lexer diagnostics
// ============================================================================

#[test]
fn test_unclosed_string_literal() {
    assert_eq!(diag_names("'oops"), vec!["UnclosedStringLiteral"]);
}

#[test]
fn test_unclosed_block_comment() {
    assert_eq!(diag_names("/* oops"), vec!["UnclosedBlockComment"]);
}

#[test]
fn test_unclosed_template() {
    assert_eq!(diag_names("`oops"), vec!["UnclosedTemplate"]);
}

#[test]
fn test_consecutive_underscores_in_number() {
    assert_eq!(
        diag_names("1__000"),
        vec!["NumberLiteralContainsConsecutiveUnderscores"]
    );
}
