use super::*;

fn parser_for(src: &str) -> (Parser, CompilerSession) {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let parser = Parser::new(&mut session, src, file);
    (parser, session)
}

#[test]
fn function_definition_declares_params_and_marks_the_symbol_defined() {
    let src = "int add(int a, int b) { return a + b; }";
    let (mut parser, mut session) = parser_for(src);
    parser.parse_translation_unit(&mut session);
    assert_eq!(parser.ast.top_level.len(), 1);
    let NodeKind::FuncDef { symbol, params, .. } = &parser.ast.get(parser.ast.top_level[0]).kind else {
        panic!("expected a function definition");
    };
    assert_eq!(params.len(), 2);
    assert!(parser.symtab.get(*symbol).defined);
}

#[test]
fn a_declarator_list_shares_one_set_of_specifiers() {
    let src = "int a, *b, c[4];";
    let (mut parser, mut session) = parser_for(src);
    parser.parse_translation_unit(&mut session);
    assert_eq!(parser.ast.top_level.len(), 3);
}

#[test]
fn typedef_introduces_a_name_usable_as_a_later_type_specifier() {
    let src = "typedef unsigned int uint; uint x;";
    let (mut parser, mut session) = parser_for(src);
    parser.parse_translation_unit(&mut session);
    assert_eq!(parser.ast.top_level.len(), 2);
    let NodeKind::Decl { ty, .. } = &parser.ast.get(parser.ast.top_level[1]).kind else {
        panic!("expected the second top-level node to be a declaration");
    };
    assert!(!parser.types.get(*ty).signed);
}

#[test]
fn global_with_an_initializer_carries_the_initializer_node() {
    let src = "int x = 1 + 2;";
    let (mut parser, mut session) = parser_for(src);
    parser.parse_translation_unit(&mut session);
    let NodeKind::Decl { init, .. } = &parser.ast.get(parser.ast.top_level[0]).kind else {
        panic!("expected a declaration");
    };
    assert!(init.is_some());
}
