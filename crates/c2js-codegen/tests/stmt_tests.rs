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
fn if_else_maps_directly_to_js() {
    let js = generate("int f(int a) { if (a) { return 1; } else { return 0; } }");
    assert!(js.contains("if (") && js.contains("} else {"));
}

#[test]
fn while_loop_maps_directly_to_js() {
    let js = generate("int f(int n) { while (n) { n = n - 1; } return n; }");
    assert!(js.contains("while ("));
}

#[test]
fn switch_case_default_map_directly_to_js() {
    let js = generate("int f(int a) { switch (a) { case 1: return 1; default: return 0; } return 0; }");
    assert!(js.contains("switch ("));
    assert!(js.contains("case 1:"));
    assert!(js.contains("default:"));
}

#[test]
fn for_loop_lowers_its_declaration_init_to_a_plain_store_expression() {
    let js = generate("int f(void) { int sum = 0; for (int i = 0; i < 10; i = i + 1) { sum = sum + i; } return sum; }");
    assert!(js.contains("for ("));
}

#[test]
fn a_forward_goto_to_a_trailing_label_becomes_a_labeled_break() {
    let js = generate(
        "int f(int a) { if (a) { goto done; } a = 2; done: ; return a; }",
    );
    assert!(js.contains("break done;"));
    assert!(js.contains("done: {"));
}

#[test]
fn return_restores_the_stack_pointer_before_returning() {
    let js = generate("int f(int a) { return a; }");
    let ret_at = js.find("return __ret;").expect("a scalar return binds its value first");
    let restore_at = js.find("rt.mem.sp = __sp0;").expect("the frame is released before returning");
    assert!(restore_at < ret_at);
}
