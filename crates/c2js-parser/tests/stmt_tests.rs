use super::*;

fn parser_for(src: &str) -> (Parser, CompilerSession) {
    let mut session = CompilerSession::new();
    let file = session.intern("test.c");
    let parser = Parser::new(&mut session, src, file);
    (parser, session)
}

#[test]
fn dangling_else_binds_to_the_nearest_if() {
    let src = "if (1) if (2) a; else b;";
    let (mut parser, mut session) = parser_for(src);
    let node = parser.parse_statement(&mut session);
    let NodeKind::If { else_branch: outer_else, then_branch, .. } = &parser.ast.get(node).kind else {
        panic!("expected an if statement");
    };
    assert!(outer_else.is_none(), "the outer `if` takes no `else` of its own");
    let NodeKind::If { else_branch: inner_else, .. } = &parser.ast.get(*then_branch).kind else {
        panic!("expected the nested if statement in the then-branch");
    };
    assert!(inner_else.is_some(), "`else` binds to the nearest unmatched `if`");
}

#[test]
fn for_loop_scopes_its_init_declaration() {
    let src = "for (int i = 0; i < 10; i = i + 1) ;";
    let (mut parser, mut session) = parser_for(src);
    let depth_before = parser.symtab.depth();
    let node = parser.parse_statement(&mut session);
    assert_eq!(parser.symtab.depth(), depth_before, "the for-loop's own scope is popped once parsed");
    assert!(matches!(parser.ast.get(node).kind, NodeKind::For { .. }));
}

#[test]
fn labeled_statement_registers_in_the_enclosing_function_scope() {
    let src = "done: return;";
    let (mut parser, mut session) = parser_for(src);
    parser.symtab.push_scope(true);
    let node = parser.parse_statement(&mut session);
    let NodeKind::Labeled { label, stmt } = &parser.ast.get(node).kind else {
        panic!("expected a labeled statement");
    };
    assert!(parser.symtab.lookup_label(*label).is_some());
    assert!(matches!(parser.ast.get(*stmt).kind, NodeKind::Return { .. }));
    parser.symtab.pop_scope();
}

#[test]
fn switch_case_and_default_wrap_their_statement() {
    let src = "switch (1) { case 1: a; default: b; }";
    let (mut parser, mut session) = parser_for(src);
    let node = parser.parse_statement(&mut session);
    assert!(matches!(parser.ast.get(node).kind, NodeKind::Switch { .. }));
}
