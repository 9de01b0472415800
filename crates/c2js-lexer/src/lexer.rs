//! The scanning engine (spec.md §4.2): turns preprocessed text into a
//! single-token-lookahead stream of [`Token`]s, silently consuming the
//! `# <line> "<file>"` markers the preprocessor left at physical line starts
//! and using them to report the *logical* (file, line, column) a diagnostic
//! should blame rather than the expanded stream's own coordinates.

use c2js_common::diagnostics::DiagnosticKind;
use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_common::span::{SourceLocation, Span};

use crate::keywords;
use crate::token::{FloatSuffix, IntSuffix, Punct, Radix, Token, TokenFlags, TokenKind};

/// Tokenizes one expanded translation unit. Holds exactly one token of
/// lookahead, as the teacher's scanner/parser pair does, so the parser can
/// call `peek` to decide a production without consuming the token.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    /// Byte offset of the start of the current physical line, for column math.
    line_start: usize,
    /// Logical line number as reported by the most recent `#` marker (or the
    /// physical line count, absent any marker).
    line: u32,
    file: Atom,
    at_line_start: bool,
    lookahead: Option<Token>,
}

impl Lexer {
    pub fn new(text: &str, file: Atom) -> Self {
        Lexer {
            chars: text.chars().collect(),
            pos: 0,
            line_start: 0,
            line: 1,
            file,
            at_line_start: true,
            lookahead: None,
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self, session: &mut CompilerSession) -> Token {
        if self.lookahead.is_none() {
            let token = self.scan_token(session);
            self.lookahead = Some(token);
        }
        self.lookahead.clone().expect("just filled")
    }

    /// Consume and return the next token.
    pub fn bump(&mut self, session: &mut CompilerSession) -> Token {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.scan_token(session),
        }
    }

    /// Best-effort (file, line, column) for a span produced by this lexer,
    /// resolved against its current line-tracking state. Exact for the token
    /// just scanned; the parser uses this to blame diagnostics against the
    /// token it is currently holding.
    pub fn location_for(&self, span: Span) -> SourceLocation {
        self.location_at(span.start as usize)
    }

    fn location_at(&self, offset: usize) -> SourceLocation {
        let column = (offset.saturating_sub(self.line_start) + 1) as u32;
        SourceLocation {
            file: self.file,
            line: self.line,
            column,
            offset: offset as u32,
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip `[ \t]*`, not newlines — used inside a `#` marker line, where a
    /// newline should be left for the caller to notice.
    fn skip_horizontal_space(&mut self) {
        while matches!(self.peek_char(), Some(' ') | Some('\t')) {
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self, preceded_by_whitespace: &mut bool) {
        loop {
            match self.peek_char() {
                Some('\n') => {
                    *preceded_by_whitespace = true;
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                    self.at_line_start = true;
                }
                Some(c) if c.is_whitespace() => {
                    *preceded_by_whitespace = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }
    }

    /// If positioned at a `# <line> "<file>"` marker at the start of a line,
    /// consume it (updating `line`/`file`) and return `true`. Otherwise leave
    /// `pos` untouched and return `false`.
    fn try_consume_line_marker(&mut self, session: &mut CompilerSession) -> bool {
        let save = (self.pos, self.line, self.line_start);
        self.pos += 1; // '#'
        self.skip_horizontal_space();
        let digits_start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == digits_start {
            (self.pos, self.line, self.line_start) = save;
            return false;
        }
        let line_text: String = self.chars[digits_start..self.pos].iter().collect();
        let new_line: u32 = line_text.parse().unwrap_or(1);
        self.skip_horizontal_space();
        if self.peek_char() == Some('"') {
            self.pos += 1;
            let name_start = self.pos;
            while self.peek_char().is_some_and(|c| c != '"' && c != '\n') {
                self.pos += 1;
            }
            let name: String = self.chars[name_start..self.pos].iter().collect();
            if self.peek_char() == Some('"') {
                self.pos += 1;
            }
            self.file = session.intern(&name);
        }
        while self.peek_char().is_some_and(|c| c != '\n') {
            self.pos += 1;
        }
        if self.peek_char() == Some('\n') {
            self.pos += 1;
        }
        self.line = new_line;
        self.line_start = self.pos;
        self.at_line_start = true;
        true
    }

    fn scan_token(&mut self, session: &mut CompilerSession) -> Token {
        let mut preceded_by_whitespace = false;
        loop {
            self.skip_whitespace(&mut preceded_by_whitespace);
            if self.at_line_start && self.peek_char() == Some('#') {
                if self.try_consume_line_marker(session) {
                    continue;
                }
            }
            break;
        }

        let at_line_start = self.at_line_start;
        let start = self.pos;

        if self.peek_char().is_none() {
            return self.make_token(TokenKind::Eof, start, start, at_line_start, preceded_by_whitespace);
        }
        self.at_line_start = false;

        let c = self.peek_char().expect("checked above");
        let kind = if c == '_' || c.is_alphabetic() {
            self.scan_ident_or_keyword(session)
        } else if c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit())) {
            self.scan_number(session)
        } else if c == '"' {
            self.scan_string(session, false)
        } else if c == '\'' {
            self.scan_char(false)
        } else if c == 'L' && matches!(self.peek_at(1), Some('"') | Some('\'')) {
            self.pos += 1;
            if self.peek_char() == Some('"') {
                self.scan_string(session, true)
            } else {
                self.scan_char(true)
            }
        } else {
            self.scan_punct(session)
        };

        let end = self.pos;
        self.make_token(kind, start, end, at_line_start, preceded_by_whitespace)
    }

    fn make_token(
        &self,
        kind: TokenKind,
        start: usize,
        end: usize,
        at_line_start: bool,
        preceded_by_whitespace: bool,
    ) -> Token {
        let mut flags = TokenFlags::empty();
        if at_line_start {
            flags |= TokenFlags::AT_LINE_START;
        }
        if preceded_by_whitespace {
            flags |= TokenFlags::PRECEDED_BY_WHITESPACE;
        }
        Token {
            kind,
            span: Span::new(start as u32, end as u32),
            flags,
        }
    }

    fn scan_ident_or_keyword(&mut self, session: &mut CompilerSession) -> TokenKind {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c == '_' || c.is_alphanumeric()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match keywords::lookup(&text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident(session.intern(&text)),
        }
    }

    fn scan_number(&mut self, session: &mut CompilerSession) -> TokenKind {
        let start = self.pos;
        let mut is_float = false;
        let mut radix = Radix::Decimal;

        if self.peek_char() == Some('0') && matches!(self.peek_at(1), Some('x') | Some('X')) {
            radix = Radix::Hex;
            self.pos += 2;
            while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            if self.peek_char() == Some('.') {
                is_float = true;
                self.pos += 1;
                while self.peek_char().is_some_and(|c| c.is_ascii_hexdigit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek_char(), Some('p') | Some('P')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.pos += 1;
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
        } else {
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek_char() == Some('.') {
                is_float = true;
                self.pos += 1;
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if matches!(self.peek_char(), Some('e') | Some('E')) {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    self.pos += 1;
                }
                while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            }
            if !is_float {
                let digits = &self.chars[start..self.pos];
                if digits.len() > 1 && digits[0] == '0' {
                    radix = Radix::Octal;
                }
            }
        }

        let digits_end = self.pos;
        if is_float {
            let mut suffix = FloatSuffix::empty();
            match self.peek_char() {
                Some('f') | Some('F') => {
                    suffix |= FloatSuffix::FLOAT;
                    self.pos += 1;
                }
                Some('l') | Some('L') => {
                    suffix |= FloatSuffix::LONGDOUBLE;
                    self.pos += 1;
                }
                _ => {}
            }
            let text: String = self.chars[start..digits_end].iter().collect();
            TokenKind::FloatLiteral {
                text: session.intern(&text),
                suffix,
            }
        } else {
            let mut suffix = IntSuffix::empty();
            loop {
                match self.peek_char() {
                    Some('u') | Some('U') if !suffix.contains(IntSuffix::UNSIGNED) => {
                        suffix |= IntSuffix::UNSIGNED;
                        self.pos += 1;
                    }
                    Some('l') | Some('L') if !suffix.contains(IntSuffix::LONGLONG) => {
                        if suffix.contains(IntSuffix::LONG) {
                            suffix |= IntSuffix::LONGLONG;
                        } else {
                            suffix |= IntSuffix::LONG;
                        }
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
            let text: String = self.chars[start..digits_end].iter().collect();
            TokenKind::IntLiteral {
                text: session.intern(&text),
                radix,
                suffix,
            }
        }
    }

    /// Decode one escape sequence, `self.pos` positioned just past the `\`.
    fn scan_escape(&mut self) -> char {
        let Some(c) = self.peek_char() else {
            return '\\';
        };
        self.pos += 1;
        match c {
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            '?' => '?',
            '0'..='7' => {
                let mut value = c.to_digit(8).expect("octal digit");
                let mut count = 1;
                while count < 3 {
                    match self.peek_char().and_then(|d| d.to_digit(8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                            count += 1;
                        }
                        None => break,
                    }
                }
                char::from_u32(value).unwrap_or('\0')
            }
            'x' => {
                let mut value: u32 = 0;
                while let Some(d) = self.peek_char().and_then(|d| d.to_digit(16)) {
                    value = value.wrapping_mul(16).wrapping_add(d);
                    self.pos += 1;
                }
                char::from_u32(value).unwrap_or('\0')
            }
            other => other,
        }
    }

    fn scan_string(&mut self, session: &mut CompilerSession, wide: bool) -> TokenKind {
        self.pos += 1; // opening '"'
        let mut value = String::new();
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    let loc = self.location_at(self.pos);
                    session
                        .diagnostics
                        .error(DiagnosticKind::Lex, loc, "unterminated string literal");
                    break;
                }
                Some('"') => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    value.push(self.scan_escape());
                }
                Some(c) => {
                    value.push(c);
                    self.pos += 1;
                }
            }
        }
        TokenKind::StringLiteral {
            value: session.intern(&value),
            wide,
        }
    }

    fn scan_char(&mut self, wide: bool) -> TokenKind {
        self.pos += 1; // opening '\''
        let value = match self.peek_char() {
            Some('\\') => {
                self.pos += 1;
                self.scan_escape() as i64
            }
            Some(c) => {
                self.pos += 1;
                c as i64
            }
            None => 0,
        };
        // A multi-character constant (e.g. 'ab') is legal but implementation
        // defined; we keep the first character's value and consume the rest.
        while self.peek_char().is_some_and(|c| c != '\'' && c != '\n') {
            self.pos += 1;
        }
        if self.peek_char() == Some('\'') {
            self.pos += 1;
        }
        TokenKind::CharLiteral { value, wide }
    }

    fn scan_punct(&mut self, session: &mut CompilerSession) -> TokenKind {
        let start = self.pos;
        let c = self.bump_char().expect("checked by caller");
        use Punct::*;
        let punct = match c {
            '+' => {
                if self.eat('+') {
                    PlusPlus
                } else if self.eat('=') {
                    PlusEq
                } else {
                    Plus
                }
            }
            '-' => {
                if self.eat('>') {
                    Arrow
                } else if self.eat('-') {
                    MinusMinus
                } else if self.eat('=') {
                    MinusEq
                } else {
                    Minus
                }
            }
            '*' => {
                if self.eat('=') {
                    StarEq
                } else {
                    Star
                }
            }
            '/' => {
                if self.eat('=') {
                    SlashEq
                } else {
                    Slash
                }
            }
            '%' => {
                if self.eat('=') {
                    PercentEq
                } else {
                    Percent
                }
            }
            '=' => {
                if self.eat('=') {
                    EqEq
                } else {
                    Assign
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') {
                        ShlEq
                    } else {
                        Shl
                    }
                } else if self.eat('=') {
                    Le
                } else {
                    Lt
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('=') {
                        ShrEq
                    } else {
                        Shr
                    }
                } else if self.eat('=') {
                    Ge
                } else {
                    Gt
                }
            }
            '!' => {
                if self.eat('=') {
                    Ne
                } else {
                    Not
                }
            }
            '&' => {
                if self.eat('&') {
                    AmpAmp
                } else if self.eat('=') {
                    AmpEq
                } else {
                    Amp
                }
            }
            '|' => {
                if self.eat('|') {
                    PipePipe
                } else if self.eat('=') {
                    PipeEq
                } else {
                    Pipe
                }
            }
            '^' => {
                if self.eat('=') {
                    CaretEq
                } else {
                    Caret
                }
            }
            '~' => Tilde,
            '?' => Question,
            ':' => Colon,
            ';' => Semicolon,
            ',' => Comma,
            '.' => {
                if self.peek_char() == Some('.') && self.peek_at(1) == Some('.') {
                    self.pos += 2;
                    Ellipsis
                } else {
                    Dot
                }
            }
            '(' => LParen,
            ')' => RParen,
            '{' => LBrace,
            '}' => RBrace,
            '[' => LBracket,
            ']' => RBracket,
            other => {
                let loc = self.location_at(start);
                session.diagnostics.error(
                    DiagnosticKind::Lex,
                    loc,
                    format!("unexpected character '{other}'"),
                );
                return TokenKind::Unknown(other);
            }
        };
        TokenKind::Punct(punct)
    }
}

#[cfg(test)]
#[path = "../tests/lexer_tests.rs"]
mod tests;
