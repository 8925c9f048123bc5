//! Token kinds and token records produced by the lexer.
//!
//! The token taxonomy distinguishes reserved keywords, strict-mode-only
//! reserved keywords, and contextual keywords (including the
//! TypeScript-only ones). The parser's statement dispatch and its
//! ambiguity resolution (`let`, `async`, `type`, ...) are driven entirely
//! by these kinds.

use fastlint_core::intern::Name;
use fastlint_core::text::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    EndOfFile,

    // Identifier-shaped tokens and literals
    Identifier,
    PrivateIdentifier,
    /// A reserved keyword written with a Unicode escape sequence, e.g.
    /// `\u{69}f`. Reported when used in a keyword-sensitive position.
    ReservedKeywordWithEscapeSequence,
    Number,
    String,
    Regexp,
    /// A template with no substitutions, or the closing piece of one.
    CompleteTemplate,
    /// A template piece ending in `${`.
    IncompleteTemplate,

    // Punctuation
    Ampersand,
    AmpersandAmpersand,
    AmpersandAmpersandEqual,
    AmpersandEqual,
    Bang,
    BangEqual,
    BangEqualEqual,
    Circumflex,
    CircumflexEqual,
    Colon,
    Comma,
    Dot,
    DotDotDot,
    Equal,
    EqualEqual,
    EqualEqualEqual,
    EqualGreater,
    Greater,
    GreaterEqual,
    GreaterGreater,
    GreaterGreaterEqual,
    GreaterGreaterGreater,
    GreaterGreaterGreaterEqual,
    LeftCurly,
    LeftParen,
    LeftSquare,
    Less,
    LessEqual,
    LessLess,
    LessLessEqual,
    Minus,
    MinusEqual,
    MinusMinus,
    Percent,
    PercentEqual,
    Pipe,
    PipeEqual,
    PipePipe,
    PipePipeEqual,
    Plus,
    PlusEqual,
    PlusPlus,
    Question,
    QuestionDot,
    QuestionQuestion,
    QuestionQuestionEqual,
    RightCurly,
    RightParen,
    RightSquare,
    Semicolon,
    Slash,
    SlashEqual,
    Star,
    StarEqual,
    StarStar,
    StarStarEqual,
    Tilde,

    // Reserved keywords
    KwAwait,
    KwBreak,
    KwCase,
    KwCatch,
    KwClass,
    KwConst,
    KwContinue,
    KwDebugger,
    KwDefault,
    KwDelete,
    KwDo,
    KwElse,
    KwEnum,
    KwExport,
    KwExtends,
    KwFalse,
    KwFinally,
    KwFor,
    KwFunction,
    KwIf,
    KwImport,
    KwIn,
    KwInstanceof,
    KwNew,
    KwNull,
    KwReturn,
    KwSuper,
    KwSwitch,
    KwThis,
    KwThrow,
    KwTrue,
    KwTry,
    KwTypeof,
    KwVar,
    KwVoid,
    KwWhile,
    KwWith,
    KwYield,

    // Reserved only in strict mode
    KwImplements,
    KwInterface,
    KwPackage,
    KwPrivate,
    KwProtected,
    KwPublic,

    // Contextual keywords
    KwAbstract,
    KwAny,
    KwAs,
    KwAssert,
    KwAsserts,
    KwAsync,
    KwBigint,
    KwBoolean,
    KwConstructor,
    KwDeclare,
    KwFrom,
    KwGet,
    KwGlobal,
    KwInfer,
    KwIntrinsic,
    KwIs,
    KwKeyof,
    KwLet,
    KwModule,
    KwNamespace,
    KwNever,
    KwNumber,
    KwObject,
    KwOf,
    KwOut,
    KwOverride,
    KwReadonly,
    KwRequire,
    KwSet,
    KwStatic,
    KwString,
    KwSymbol,
    KwType,
    KwUndefined,
    KwUnique,
    KwUnknown,
}

impl TokenKind {
    /// Keywords reserved in all code, including `await` and `yield`.
    pub fn is_reserved_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwAwait
                | KwBreak
                | KwCase
                | KwCatch
                | KwClass
                | KwConst
                | KwContinue
                | KwDebugger
                | KwDefault
                | KwDelete
                | KwDo
                | KwElse
                | KwEnum
                | KwExport
                | KwExtends
                | KwFalse
                | KwFinally
                | KwFor
                | KwFunction
                | KwIf
                | KwImport
                | KwIn
                | KwInstanceof
                | KwNew
                | KwNull
                | KwReturn
                | KwSuper
                | KwSwitch
                | KwThis
                | KwThrow
                | KwTrue
                | KwTry
                | KwTypeof
                | KwVar
                | KwVoid
                | KwWhile
                | KwWith
                | KwYield
        )
    }

    /// Keywords reserved only in strict mode. Outside strict mode these
    /// behave as plain identifiers.
    pub fn is_strict_only_reserved_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwImplements | KwInterface | KwPackage | KwPrivate | KwProtected | KwPublic
        )
    }

    /// Reserved keywords plus strict-mode-only reserved keywords.
    pub fn is_strict_reserved_keyword(self) -> bool {
        self.is_reserved_keyword() || self.is_strict_only_reserved_keyword()
    }

    /// Contextual keywords: identifiers the lexer tags distinctly because
    /// they act as keywords in specific grammatical positions.
    pub fn is_contextual_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwAbstract
                | KwAny
                | KwAs
                | KwAssert
                | KwAsserts
                | KwAsync
                | KwBigint
                | KwBoolean
                | KwConstructor
                | KwDeclare
                | KwFrom
                | KwGet
                | KwGlobal
                | KwInfer
                | KwIntrinsic
                | KwIs
                | KwKeyof
                | KwLet
                | KwModule
                | KwNamespace
                | KwNever
                | KwNumber
                | KwObject
                | KwOf
                | KwOut
                | KwOverride
                | KwReadonly
                | KwRequire
                | KwSet
                | KwStatic
                | KwString
                | KwSymbol
                | KwType
                | KwUndefined
                | KwUnique
                | KwUnknown
        )
    }

    /// Contextual keywords that only mean anything in TypeScript.
    pub fn is_typescript_only_contextual_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwAbstract
                | KwAny
                | KwAssert
                | KwAsserts
                | KwBigint
                | KwBoolean
                | KwConstructor
                | KwDeclare
                | KwGlobal
                | KwInfer
                | KwIntrinsic
                | KwIs
                | KwKeyof
                | KwModule
                | KwNamespace
                | KwNever
                | KwNumber
                | KwObject
                | KwOut
                | KwOverride
                | KwReadonly
                | KwRequire
                | KwString
                | KwSymbol
                | KwUndefined
                | KwUnique
                | KwUnknown
        )
    }

    /// Any keyword, reserved or contextual.
    pub fn is_keyword(self) -> bool {
        self.is_strict_reserved_keyword() || self.is_contextual_keyword()
    }

    /// An identifier, or any keyword that can act as an identifier in some
    /// position (contextual and strict-mode-only keywords).
    pub fn is_identifier_like(self) -> bool {
        self == TokenKind::Identifier
            || self.is_contextual_keyword()
            || self.is_strict_only_reserved_keyword()
    }

    /// Operators which can only appear in binary position.
    pub fn is_binary_only_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Ampersand
                | AmpersandAmpersand
                | BangEqual
                | BangEqualEqual
                | Circumflex
                | EqualEqual
                | EqualEqualEqual
                | Greater
                | GreaterEqual
                | GreaterGreater
                | GreaterGreaterGreater
                | KwInstanceof
                | Less
                | LessEqual
                | LessLess
                | Percent
                | Pipe
                | PipePipe
                | QuestionQuestion
                | Star
                | StarStar
        )
    }

    /// Compound assignment operators (`+=`, `&=`, ...). `/=` is excluded
    /// because it may begin a regexp literal.
    pub fn is_compound_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            AmpersandEqual
                | CircumflexEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
                | LessLessEqual
                | MinusEqual
                | PercentEqual
                | PipeEqual
                | PlusEqual
                | StarEqual
                | StarStarEqual
        )
    }

    /// Conditional assignment operators (`&&=`, `||=`, `??=`).
    pub fn is_conditional_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            AmpersandAmpersandEqual | PipePipeEqual | QuestionQuestionEqual
        )
    }
}

/// An identifier occurrence: where it is and which interned name it spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    pub span: Span,
    pub name: Name,
}

impl Identifier {
    pub fn new(span: Span, name: Name) -> Self {
        Self { span, name }
    }
}

/// A single lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first byte of this token.
    pub begin: u32,
    /// Byte offset one past the last byte of this token.
    pub end: u32,
    /// Whether a line terminator appears between the previous token and
    /// this one. Drives automatic semicolon insertion.
    pub has_leading_newline: bool,
    /// The interned text of identifier-shaped tokens and keywords. For
    /// other tokens this is the empty name.
    pub name: Name,
    /// For `ReservedKeywordWithEscapeSequence`: the location of the first
    /// escape sequence, so the parser can report it where keyword-ness
    /// matters.
    pub escape_sequence: Option<Span>,
}

impl Token {
    pub fn span(&self) -> Span {
        Span::new(self.begin, self.end)
    }

    /// The identifier this token spells. Only meaningful for
    /// identifier-shaped tokens and keywords.
    pub fn identifier_name(&self) -> Identifier {
        Identifier::new(self.span(), self.name)
    }

    /// Slice this token's text out of the source buffer.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span().to_range()]
    }
}
