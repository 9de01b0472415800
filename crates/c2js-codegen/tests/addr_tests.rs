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
fn a_struct_members_address_adds_its_compile_time_offset() {
    let js = generate(
        "struct P { int x; int y; }; int f(void) { struct P p; p.y = 1; return p.x; }",
    );
    // the second member sits at a non-zero offset inside the struct
    assert!(js.contains(" + 4)") || js.contains("+4)"));
}

#[test]
fn subscripting_a_pointer_scales_the_index_by_element_size() {
    let js = generate("int f(int *p) { return p[3]; }");
    assert!(js.contains("* 4"));
}

#[test]
fn dereferencing_a_pointer_uses_its_own_value_as_the_address() {
    let js = generate("int f(int *p) { return *p; }");
    assert!(js.contains("rt.mem.readInt32"));
}

#[test]
fn arrow_member_access_reads_through_the_pointer() {
    let js = generate("struct P { int x; }; int f(struct P *p) { return p->x; }");
    assert!(js.contains("rt.mem.readInt32"));
}
