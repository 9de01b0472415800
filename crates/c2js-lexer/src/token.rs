//! Token kinds and payloads (spec.md §4.2 "Token kinds", "Numeric
//! literals", "Character and string literals").

use bitflags::bitflags;
use c2js_common::interner::Atom;
use c2js_common::span::Span;

use crate::keywords::Keyword;

bitflags! {
    /// Per-token flags the parser needs for whitespace-sensitive grammar
    /// (e.g. distinguishing a function-like macro invocation, or just
    /// general diagnostics formatting).
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TokenFlags: u8 {
        const AT_LINE_START          = 0b01;
        const PRECEDED_BY_WHITESPACE = 0b10;
    }
}

bitflags! {
    /// `u`/`U` and `l`/`L` (repeated for `long long`) integer suffixes,
    /// recorded rather than resolved so the parser picks the literal's
    /// type per C99 §6.4.4.1.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct IntSuffix: u8 {
        const UNSIGNED  = 0b001;
        const LONG      = 0b010;
        const LONGLONG  = 0b100;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct FloatSuffix: u8 {
        const FLOAT       = 0b01;
        const LONGDOUBLE  = 0b10;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    Decimal,
    Hex,
    Octal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Lt,
    Gt,
    Not,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Question,
    Colon,
    Semicolon,
    Comma,
    Dot,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Arrow,
    PlusPlus,
    MinusMinus,
    Shl,
    Shr,
    Le,
    Ge,
    EqEq,
    Ne,
    AmpAmp,
    PipePipe,
    Ellipsis,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident(Atom),
    IntLiteral {
        text: Atom,
        radix: Radix,
        suffix: IntSuffix,
    },
    FloatLiteral {
        text: Atom,
        suffix: FloatSuffix,
    },
    CharLiteral {
        value: i64,
        wide: bool,
    },
    StringLiteral {
        value: Atom,
        wide: bool,
    },
    Punct(Punct),
    /// A byte the grammar has no punctuator for (e.g. a stray `` ` ``); the
    /// lexer reports a `lex-error` diagnostic and keeps scanning rather than
    /// aborting the whole file.
    Unknown(char),
    Eof,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
}

impl Token {
    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}
