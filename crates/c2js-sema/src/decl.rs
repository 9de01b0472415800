//! Top-level declaration checking (spec.md §4.4): function bodies get a
//! label pre-pass (for forward `goto`s) and a return-type context; plain
//! declarations just have their initializer checked against their type.

use c2js_common::interner::Atom;
use c2js_parser::{NodeId, NodeKind};
use rustc_hash::FxHashSet;

use crate::checker::Checker;

impl<'a> Checker<'a> {
    pub(crate) fn check_top_level(&mut self, id: NodeId) {
        let span = self.ast.get(id).span;
        match self.ast.get(id).kind.clone() {
            NodeKind::FuncDef { ty, body, implicit_return_type, name, .. } => {
                self.check_func_def(span, ty, body, implicit_return_type, name)
            }
            NodeKind::Decl { init, ty, .. } => {
                if let Some(init) = init {
                    self.check_initializer(init, ty);
                }
            }
            NodeKind::TypedefDecl { .. } => {}
            other => unreachable!("{other:?} is not a top-level declaration"),
        }
    }

    fn check_func_def(&mut self, span: c2js_common::span::Span, ty: c2js_types::TypeId, body: NodeId, implicit_return_type: bool, name: Atom) {
        if implicit_return_type {
            let fname = self.session.resolve(name).to_string();
            self.warning_semantic(
                span,
                format!("return type of '{fname}' defaults to 'int' (no type specifier given)"),
            );
        }
        let return_type = match &self.types.get(ty).kind {
            c2js_types::TypeKind::Function(data) => data.return_type,
            _ => unreachable!("a FuncDef's type is always a function type"),
        };
        let saved_return = self.current_return_type.replace(return_type);
        let new_labels = self.collect_labels(body);
        let saved_labels = std::mem::replace(&mut self.current_labels, new_labels);
        self.check_stmt(body);
        self.current_labels = saved_labels;
        self.current_return_type = saved_return;
    }

    /// Pre-pass collecting every label a `goto` inside this function body
    /// could legally target, since the parser's label scope is popped (and
    /// discarded) once its function body finishes parsing.
    fn collect_labels(&self, body: NodeId) -> FxHashSet<Atom> {
        let mut labels = FxHashSet::default();
        self.collect_labels_into(body, &mut labels);
        labels
    }

    fn collect_labels_into(&self, id: NodeId, out: &mut FxHashSet<Atom>) {
        match &self.ast.get(id).kind {
            NodeKind::Block { stmts } => {
                for &s in stmts {
                    self.collect_labels_into(s, out);
                }
            }
            NodeKind::Labeled { label, stmt } => {
                out.insert(*label);
                self.collect_labels_into(*stmt, out);
            }
            NodeKind::CaseStmt { stmt, .. } | NodeKind::DefaultStmt { stmt } => {
                self.collect_labels_into(*stmt, out);
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.collect_labels_into(*then_branch, out);
                if let Some(e) = else_branch {
                    self.collect_labels_into(*e, out);
                }
            }
            NodeKind::Switch { body, .. }
            | NodeKind::While { body, .. }
            | NodeKind::For { body, .. } => self.collect_labels_into(*body, out),
            NodeKind::DoWhile { body, .. } => self.collect_labels_into(*body, out),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod tests;
