use crate::macros::{expand, predefined, MacroDef, MacroKind};
use c2js_common::interner::Interner;
use rustc_hash::FxHashMap;

#[test]
fn object_like_macro_expands() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("WIDTH");
    macros.insert(name, MacroDef::object("80"));
    let result = expand("int w = WIDTH;", &macros, &mut interner);
    assert_eq!(result, "int w = 80;");
}

#[test]
fn predefined_macros_cover_named_groups() {
    let mut interner = Interner::new();
    let macros = predefined(&mut interner);
    for name in ["__STDC__", "NULL", "true", "false", "EOF", "SEEK_SET", "EXIT_SUCCESS", "INT_MAX"] {
        let atom = interner.intern(name);
        assert!(macros.contains_key(&atom), "missing predefined macro {name}");
    }
}

#[test]
fn function_like_macro_substitutes_arguments() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("MAX");
    let a = interner.intern("a");
    let b = interner.intern("b");
    macros.insert(
        name,
        MacroDef {
            kind: MacroKind::Function { params: vec![a, b], variadic: false },
            body: "((a) > (b) ? (a) : (b))".to_string(),
        },
    );
    let result = expand("int m = MAX(1, 2);", &macros, &mut interner);
    assert_eq!(result, "int m = ((1) > (2) ? (1) : (2));");
}

#[test]
fn function_like_macro_without_invocation_is_left_alone() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("MAX");
    let a = interner.intern("a");
    macros.insert(
        name,
        MacroDef {
            kind: MacroKind::Function { params: vec![a], variadic: false },
            body: "(a)".to_string(),
        },
    );
    let result = expand("void (*fp)(void) = MAX;", &macros, &mut interner);
    assert_eq!(result, "void (*fp)(void) = MAX;");
}

#[test]
fn stringize_operator_quotes_argument() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("STR");
    let x = interner.intern("x");
    macros.insert(
        name,
        MacroDef {
            kind: MacroKind::Function { params: vec![x], variadic: false },
            body: "#x".to_string(),
        },
    );
    let result = expand("STR(hello)", &macros, &mut interner);
    assert_eq!(result, "\"hello\"");
}

#[test]
fn token_paste_glues_operands() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("CAT");
    let a = interner.intern("a");
    let b = interner.intern("b");
    macros.insert(
        name,
        MacroDef {
            kind: MacroKind::Function { params: vec![a, b], variadic: false },
            body: "a ## b".to_string(),
        },
    );
    let result = expand("CAT(foo, bar)", &macros, &mut interner);
    assert_eq!(result, "foobar");
}

#[test]
fn variadic_macro_joins_remaining_args() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("LOG");
    let fmt = interner.intern("fmt");
    macros.insert(
        name,
        MacroDef {
            kind: MacroKind::Function { params: vec![fmt], variadic: true },
            body: "printf(fmt, __VA_ARGS__)".to_string(),
        },
    );
    let result = expand(r#"LOG("%d %d", x, y)"#, &macros, &mut interner);
    assert_eq!(result, "printf(\"%d %d\", x, y)");
}

#[test]
fn macro_reference_inside_string_literal_is_not_expanded() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("WIDTH");
    macros.insert(name, MacroDef::object("80"));
    let result = expand(r#"puts("WIDTH");"#, &macros, &mut interner);
    assert_eq!(result, r#"puts("WIDTH");"#);
}

#[test]
fn self_referential_macro_does_not_loop_forever() {
    let mut interner = Interner::new();
    let mut macros = FxHashMap::default();
    let name = interner.intern("FOO");
    macros.insert(name, MacroDef::object("FOO + 1"));
    // Must terminate (bounded rescan depth), not hang.
    let result = expand("FOO", &macros, &mut interner);
    assert!(result.contains("FOO"));
}
