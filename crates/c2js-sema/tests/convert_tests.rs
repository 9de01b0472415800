use c2js_common::session::CompilerSession;
use c2js_parser::{NodeKind, Parser};
use c2js_types::TypeKind;

fn check(src: &str) -> (CompilerSession, c2js_types::TypeRegistry, c2js_parser::Ast, crate::checker::CheckOutput) {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut parser = Parser::new(&mut session, src, file);
    parser.parse_translation_unit(&mut session);
    let c2js_parser::ParseOutput { ast, symtab, mut types } = parser.into_output();
    let output = crate::checker::check_translation_unit(&mut session, src, file, &ast, &symtab, &mut types);
    (session, types, ast, output)
}

#[test]
fn array_decays_to_a_pointer_at_use_site() {
    let src = "int a[4]; int x = a[0]; int *p = a;";
    let (_session, types, ast, output) = check(src);
    // The declarator itself keeps the array type (no decay at declaration).
    let NodeKind::Decl { ty: array_ty, .. } = &ast.get(ast.top_level[0]).kind else {
        panic!("expected the first declaration");
    };
    assert!(matches!(types.get(*array_ty).kind, TypeKind::Array(_)));

    // `int *p = a;` assigns the decayed array to a pointer with no cast
    // needed, since `compatible()` already treats array-decay-to-pointer as
    // matching the pointer's element type.
    let NodeKind::Decl { init: Some(init), .. } = &ast.get(ast.top_level[2]).kind else {
        panic!("expected the third declaration to have an initializer");
    };
    let init_ty = output.expr_types.get(init).expect("initializer gets a type");
    assert!(matches!(types.get(*init_ty).kind, TypeKind::Ptr(_)), "array use decays to pointer");
}

#[test]
fn assigning_incompatible_aggregate_types_is_a_type_error() {
    let src = "struct A { int x; }; struct B { int y; }; void f(void) { struct A a; struct B b; a = b; }";
    let (session, _types, _ast, _output) = check(src);
    assert!(session.diagnostics.has_errors(), "assigning unrelated struct tags must be a type error");
}

#[test]
fn pointer_to_void_converts_silently_both_ways() {
    let src = "void *p; int *q; void f(void) { q = p; p = q; }";
    let (session, _types, _ast, _output) = check(src);
    assert!(!session.diagnostics.has_errors(), "void* <-> T* needs no inserted cast diagnostic");
}
