use c2js_common::session::CompilerSession;
use c2js_parser::{ParseOutput, Parser};

fn generate(src: &str) -> String {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut parser = Parser::new(&mut session, src, file);
    parser.parse_translation_unit(&mut session);
    let ParseOutput { ast, symtab, mut types } = parser.into_output();
    let check = c2js_sema::check_translation_unit(&mut session, src, file, &ast, &symtab, &mut types);
    assert!(!session.diagnostics.has_errors(), "{}", session.diagnostics.summary());
    crate::generate_module(&mut session, &ast, &symtab, &types, &check)
}

#[test]
fn integer_addition_narrows_to_a_32_bit_int() {
    let js = generate("int f(int a, int b) { return a + b; }");
    assert!(js.contains("| 0"), "{js}");
}

#[test]
fn long_long_arithmetic_uses_bigint() {
    let js = generate("long long f(long long a, long long b) { return a + b; }");
    assert!(js.contains("n"), "expected a BigInt literal suffix somewhere: {js}");
}

#[test]
fn double_arithmetic_round_trips_through_raw_bits() {
    let js = generate("double f(double a, double b) { return a + b; }");
    assert!(js.contains("rt.f64("));
    assert!(js.contains("rt.f64bits("));
}

#[test]
fn integer_division_truncates_toward_zero() {
    let js = generate("int f(int a, int b) { return a / b; }");
    assert!(js.contains("Math.trunc"));
}

#[test]
fn pointer_addition_is_scaled_by_the_pointees_size() {
    let js = generate("int *f(int *p) { return p + 1; }");
    assert!(js.contains("* 4"));
}

#[test]
fn assignment_writes_through_the_address_exactly_once() {
    let js = generate("int f(int *p) { *p = 5; return *p; }");
    assert!(js.contains("rt.mem.writeInt32"));
    // the address is bound to a local before the write, not recomputed
    assert!(js.contains("const __t1 =") || js.contains("const __t2 ="));
}

#[test]
fn post_increment_returns_the_old_value() {
    let js = generate("int f(int *p) { return (*p)++; }");
    assert!(js.contains("__old"));
    assert!(js.contains("return __old"));
}

#[test]
fn pre_increment_returns_the_new_value() {
    let js = generate("int f(int *p) { return ++(*p); }");
    assert!(js.contains("return __new"));
}

#[test]
fn calling_an_allowlisted_math_function_lowers_to_math_dot() {
    let js = generate("double sin(double x); double f(double x) { return sin(x); }");
    assert!(js.contains("Math.sin"));
}

#[test]
fn calling_an_undeclared_kind_of_function_pointer_goes_through_call_function() {
    let js = generate("int f(int (*fp)(int), int x) { return fp(x); }");
    assert!(js.contains("rt.callFunction"));
}
