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
fn module_has_the_fixed_section_order() {
    let js = generate("int main(void) { return 0; }");
    let header_at = js.find("\"use strict\"").unwrap();
    let reserve_at = js.find("rt.mem.reserveGlobals").unwrap();
    let func_at = js.find("function main").unwrap();
    let register_at = js.find("rt.registerFunction").unwrap();
    let entry_at = js.find("process.exitCode").unwrap();
    assert!(header_at < reserve_at);
    assert!(reserve_at < func_at);
    assert!(func_at < register_at);
    assert!(register_at < entry_at);
}

#[test]
fn main_with_no_parameters_is_called_with_no_arguments() {
    let js = generate("int main(void) { return 0; }");
    assert!(js.contains("main()"));
}

#[test]
fn main_taking_args_is_called_with_argc_and_argv() {
    let js = generate("int main(int argc, char **argv) { return argc; }");
    assert!(js.contains("main(rt.argc(), rt.argv())"));
}

#[test]
fn every_function_definition_is_registered_as_a_function_pointer() {
    let js = generate("int f(void) { return 1; } int main(void) { return f(); }");
    assert!(js.contains("= rt.registerFunction(f)"));
    assert!(js.contains("= rt.registerFunction(main)"));
}

#[test]
fn a_global_with_an_initializer_is_written_in_the_global_data_section() {
    let js = generate("int counter = 7; int main(void) { return counter; }");
    assert!(js.contains("rt.mem.writeInt32"));
    assert!(js.contains("7"));
}
