use crate::lexer::Lexer;
use crate::token::{FloatSuffix, IntSuffix, Punct, Radix, TokenFlags, TokenKind};
use crate::Keyword;
use c2js_common::session::CompilerSession;

fn tokens(src: &str) -> (Vec<TokenKind>, CompilerSession) {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut lexer = Lexer::new(src, file);
    let mut kinds = Vec::new();
    loop {
        let tok = lexer.bump(&mut session);
        if tok.is_eof() {
            break;
        }
        kinds.push(tok.kind);
    }
    (kinds, session)
}

#[test]
fn keyword_vs_identifier() {
    let (kinds, _session) = tokens("int foo_int inta");
    assert_eq!(kinds[0], TokenKind::Keyword(Keyword::Int));
    match &kinds[1] {
        TokenKind::Ident(_) => {}
        other => panic!("expected Ident, got {other:?}"),
    }
    match &kinds[2] {
        TokenKind::Ident(_) => {}
        other => panic!("expected Ident, got {other:?}"),
    }
}

#[test]
fn decimal_octal_hex_integer_radix() {
    let (kinds, session) = tokens("10 010 0x1A");
    let texts: Vec<_> = kinds
        .iter()
        .map(|k| match k {
            TokenKind::IntLiteral { text, radix, .. } => (session.resolve(*text).to_string(), *radix),
            other => panic!("expected IntLiteral, got {other:?}"),
        })
        .collect();
    assert_eq!(texts[0], ("10".to_string(), Radix::Decimal));
    assert_eq!(texts[1], ("010".to_string(), Radix::Octal));
    assert_eq!(texts[2], ("0x1A".to_string(), Radix::Hex));
}

#[test]
fn integer_suffix_combinations_are_recorded() {
    let (kinds, _session) = tokens("1UL 1LL 1u");
    let TokenKind::IntLiteral { suffix: s0, .. } = &kinds[0] else { panic!() };
    assert!(s0.contains(IntSuffix::UNSIGNED) && s0.contains(IntSuffix::LONG));
    let TokenKind::IntLiteral { suffix: s1, .. } = &kinds[1] else { panic!() };
    assert!(s1.contains(IntSuffix::LONGLONG));
    let TokenKind::IntLiteral { suffix: s2, .. } = &kinds[2] else { panic!() };
    assert!(s2.contains(IntSuffix::UNSIGNED) && !s2.contains(IntSuffix::LONG));
}

#[test]
fn float_literal_forms_and_suffixes() {
    let (kinds, session) = tokens("1.0 3.14f 2e10 0x1p4");
    let TokenKind::FloatLiteral { text, suffix } = &kinds[0] else { panic!() };
    assert_eq!(session.resolve(*text), "1.0");
    assert!(suffix.is_empty());
    let TokenKind::FloatLiteral { suffix, .. } = &kinds[1] else { panic!() };
    assert!(suffix.contains(FloatSuffix::FLOAT));
    let TokenKind::FloatLiteral { text, .. } = &kinds[2] else { panic!() };
    assert_eq!(session.resolve(*text), "2e10");
    let TokenKind::FloatLiteral { text, .. } = &kinds[3] else { panic!() };
    assert_eq!(session.resolve(*text), "0x1p4");
}

#[test]
fn string_literal_decodes_escapes() {
    let (kinds, session) = tokens(r#""a\nb\t\"c""#);
    let TokenKind::StringLiteral { value, wide } = &kinds[0] else { panic!() };
    assert!(!wide);
    assert_eq!(session.resolve(*value), "a\nb\t\"c");
}

#[test]
fn wide_string_and_char_literals() {
    let (kinds, session) = tokens(r#"L"hi" L'x'"#);
    let TokenKind::StringLiteral { value, wide } = &kinds[0] else { panic!() };
    assert!(wide);
    assert_eq!(session.resolve(*value), "hi");
    let TokenKind::CharLiteral { value, wide } = &kinds[1] else { panic!() };
    assert!(wide);
    assert_eq!(*value, 'x' as i64);
}

#[test]
fn char_literal_octal_and_hex_escapes() {
    let (kinds, _session) = tokens(r"'\101' '\x41'");
    let TokenKind::CharLiteral { value: a, .. } = &kinds[0] else { panic!() };
    assert_eq!(*a, 'A' as i64);
    let TokenKind::CharLiteral { value: b, .. } = &kinds[1] else { panic!() };
    assert_eq!(*b, 'A' as i64);
}

#[test]
fn punctuator_longest_match_wins() {
    let (kinds, _session) = tokens("<<= << <");
    assert_eq!(kinds[0], TokenKind::Punct(Punct::ShlEq));
    assert_eq!(kinds[1], TokenKind::Punct(Punct::Shl));
    assert_eq!(kinds[2], TokenKind::Punct(Punct::Lt));
}

#[test]
fn arrow_and_decrement_are_distinct_from_minus() {
    let (kinds, _session) = tokens("a->b a--b a-b");
    assert_eq!(kinds[1], TokenKind::Punct(Punct::Arrow));
    assert_eq!(kinds[4], TokenKind::Punct(Punct::MinusMinus));
    assert_eq!(kinds[7], TokenKind::Punct(Punct::Minus));
}

#[test]
fn ellipsis_does_not_swallow_a_single_dot() {
    let (kinds, _session) = tokens("a.b f(...)");
    assert_eq!(kinds[1], TokenKind::Punct(Punct::Dot));
    assert!(kinds.contains(&TokenKind::Punct(Punct::Ellipsis)));
}

#[test]
fn line_marker_updates_reported_file_and_line() {
    let mut session = CompilerSession::new();
    let main_file = session.intern("main.c");
    let header_name = session.intern("header.h");
    let src = "int a;\n# 5 \"header.h\"\nint b;\n";
    let mut lexer = Lexer::new(src, main_file);

    let first = lexer.bump(&mut session); // "int"
    assert_eq!(first.flags & TokenFlags::AT_LINE_START, TokenFlags::AT_LINE_START);

    // consume "a" ";"
    lexer.bump(&mut session);
    lexer.bump(&mut session);

    // next real token is past the marker line, so it should report line 5
    // in header.h rather than line 3 of the spliced stream.
    let after_marker = lexer.bump(&mut session); // "int" from `int b;`
    assert_eq!(after_marker.kind, TokenKind::Keyword(Keyword::Int));
    let loc = lexer.location_at(after_marker.span.start as usize);
    assert_eq!(loc.line, 5);
    assert_eq!(session.resolve(loc.file), session.resolve(header_name));
}

#[test]
fn peek_does_not_consume() {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut lexer = Lexer::new("int x;", file);
    let peeked = lexer.peek(&mut session);
    assert_eq!(peeked.kind, TokenKind::Keyword(Keyword::Int));
    let bumped = lexer.bump(&mut session);
    assert_eq!(bumped.kind, TokenKind::Keyword(Keyword::Int));
    let next = lexer.bump(&mut session);
    match next.kind {
        TokenKind::Ident(_) => {}
        other => panic!("expected Ident, got {other:?}"),
    }
}

#[test]
fn unknown_character_reports_lex_diagnostic_and_continues() {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut lexer = Lexer::new("int a `= 1;", file);
    loop {
        let tok = lexer.bump(&mut session);
        if tok.is_eof() {
            break;
        }
    }
    assert!(session.diagnostics.has_errors());
}

#[test]
fn preceded_by_whitespace_flag_tracks_gaps() {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut lexer = Lexer::new("a+b c + d", file);
    let a = lexer.bump(&mut session);
    let plus_tight = lexer.bump(&mut session);
    let b = lexer.bump(&mut session);
    let c = lexer.bump(&mut session);
    let plus_spaced = lexer.bump(&mut session);
    assert!(!a.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE));
    assert!(!plus_tight.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE));
    assert!(!b.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE));
    assert!(c.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE));
    assert!(plus_spaced.flags.contains(TokenFlags::PRECEDED_BY_WHITESPACE));
}
