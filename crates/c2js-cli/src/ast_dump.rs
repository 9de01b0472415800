//! `--dump-ast`: prints the translation unit's top-level declarations after
//! semantic analysis (spec.md §6's "debug aid"). This is deliberately a
//! thin `Debug`-based dump, not a pretty-printer reconstructing C syntax —
//! the spec treats the AST-dump utility as an external collaborator and
//! only asks that one exist.

use c2js_parser::Ast;

pub fn dump(ast: &Ast) {
    println!("# AST dump ({} top-level declaration(s))", ast.top_level.len());
    for (i, &id) in ast.top_level.iter().enumerate() {
        let node = ast.get(id);
        println!("--- top_level[{i}] @ {:?} ---", node.span);
        println!("{:#?}", node.kind);
    }
}
