use c2js_common::session::CompilerSession;
use c2js_parser::Parser;

fn check(src: &str) -> CompilerSession {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let mut parser = Parser::new(&mut session, src, file);
    parser.parse_translation_unit(&mut session);
    let c2js_parser::ParseOutput { ast, symtab, mut types } = parser.into_output();
    crate::checker::check_translation_unit(&mut session, src, file, &ast, &symtab, &mut types);
    session
}

#[test]
fn a_forward_goto_to_a_label_later_in_the_same_function_resolves() {
    let session = check("void f(void) { goto later; later: return; }");
    assert!(!session.diagnostics.has_errors());
}

#[test]
fn labels_do_not_leak_across_function_bodies() {
    let session = check("void f(void) { here: ; } void g(void) { goto here; }");
    assert!(session.diagnostics.has_errors(), "a label from one function must not resolve in another");
}

#[test]
fn a_label_nested_inside_every_kind_of_statement_is_still_collected() {
    let session = check(
        "void f(void) { \
             if (1) { while (1) { switch (0) { case 1: loop_label: break; } } } \
             goto loop_label; \
         }",
    );
    assert!(!session.diagnostics.has_errors());
}

#[test]
fn a_global_declarations_initializer_is_checked_too() {
    let session = check("int x = 1;");
    assert!(!session.diagnostics.has_errors());
}

#[test]
fn a_global_declarations_mismatched_initializer_is_a_type_error() {
    let session = check("struct S { int x; }; struct S s; int x = s;");
    assert!(session.diagnostics.has_errors());
}

#[test]
fn an_implicit_int_return_type_warns_but_does_not_error() {
    let session = check("static main(void) { return 0; }");
    assert!(!session.diagnostics.has_errors());
    assert!(
        session
            .diagnostics
            .iter()
            .any(|d| d.severity == c2js_common::diagnostics::Severity::Warning),
        "expected a warning for the implicit 'int' return type"
    );
}

#[test]
fn an_explicit_return_type_does_not_warn() {
    let session = check("int main(void) { return 0; }");
    assert!(!session.diagnostics.iter().any(|d| d.severity == c2js_common::diagnostics::Severity::Warning));
}
