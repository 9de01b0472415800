//! Statement checking (spec.md §4.4): condition scalar-ness, `break`/
//! `continue`/`case`/`default` nesting, and `goto` label resolution.

use c2js_common::span::Span;
use c2js_parser::{NodeId, NodeKind};

use crate::checker::{BlockContext, Checker, SwitchContext};

impl<'a> Checker<'a> {
    pub(crate) fn check_stmt(&mut self, id: NodeId) {
        let span = self.ast.get(id).span;
        match self.ast.get(id).kind.clone() {
            NodeKind::Block { stmts } => {
                for s in stmts {
                    self.check_stmt(s);
                }
            }
            NodeKind::Labeled { stmt, .. } => self.check_stmt(stmt),
            NodeKind::CaseStmt { value, stmt } => {
                self.check_case_label(span, value);
                self.check_stmt(stmt);
            }
            NodeKind::DefaultStmt { stmt } => {
                self.check_default_label(span);
                self.check_stmt(stmt);
            }
            NodeKind::ExprStmt { expr } => {
                self.check_expr(expr);
            }
            NodeKind::NullStmt => {}
            NodeKind::If { cond, then_branch, else_branch } => {
                self.check_condition(cond);
                self.check_stmt(then_branch);
                if let Some(e) = else_branch {
                    self.check_stmt(e);
                }
            }
            NodeKind::Switch { cond, body } => {
                self.check_condition(cond);
                self.context_stack.push(BlockContext::Switch(SwitchContext {
                    seen_cases: Default::default(),
                    has_default: false,
                }));
                self.check_stmt(body);
                self.context_stack.pop();
            }
            NodeKind::While { cond, body } => {
                self.check_condition(cond);
                self.context_stack.push(BlockContext::Loop);
                self.check_stmt(body);
                self.context_stack.pop();
            }
            NodeKind::DoWhile { body, cond } => {
                self.context_stack.push(BlockContext::Loop);
                self.check_stmt(body);
                self.context_stack.pop();
                self.check_condition(cond);
            }
            NodeKind::For { init, cond, step, body } => {
                if let Some(init) = init {
                    // A `for` init clause is a `Decl`, a `Block` of several
                    // (`for (int i = 0, j = 1; ...)`), or an `ExprStmt` —
                    // `check_stmt` already handles all three.
                    self.check_stmt(init);
                }
                if let Some(cond) = cond {
                    self.check_condition(cond);
                }
                if let Some(step) = step {
                    self.check_expr(step);
                }
                self.context_stack.push(BlockContext::Loop);
                self.check_stmt(body);
                self.context_stack.pop();
            }
            NodeKind::Goto { label } => {
                if !self.current_labels.contains(&label) {
                    let name = self.session.resolve(label).to_string();
                    self.error_semantic(span, format!("use of undeclared label '{name}'"));
                }
            }
            NodeKind::Continue => {
                if !self.context_stack.iter().any(|c| matches!(c, BlockContext::Loop)) {
                    self.error_semantic(span, "'continue' statement not in a loop");
                }
            }
            NodeKind::Break => {
                if self.context_stack.is_empty() {
                    self.error_semantic(span, "'break' statement not in a loop or switch");
                }
            }
            NodeKind::Return { value } => {
                let return_ty = self.current_return_type;
                match (value, return_ty) {
                    (Some(v), Some(ret_ty)) => {
                        let v_ty = self.check_expr(v);
                        let v_span = self.ast.get(v).span;
                        self.convert_to(v, v_span, v_ty, ret_ty);
                    }
                    (Some(v), None) => {
                        self.check_expr(v);
                    }
                    (None, _) => {}
                }
            }
            NodeKind::Decl { init, ty, .. } => {
                if let Some(init) = init {
                    self.check_initializer(init, ty);
                }
            }
            NodeKind::TypedefDecl { .. } => {}
            other => unreachable!("{other:?} is not a statement node"),
        }
    }

    fn check_condition(&mut self, cond: NodeId) {
        let ty = self.check_expr(cond);
        if !self.types.get(ty).is_scalar() {
            let span = self.ast.get(cond).span;
            self.error_type(span, "controlling expression must have scalar type");
        }
    }

    fn check_case_label(&mut self, span: Span, value: i64) {
        match self.context_stack.iter_mut().rev().find_map(|c| match c {
            BlockContext::Switch(sw) => Some(sw),
            BlockContext::Loop => None,
        }) {
            Some(sw) => {
                if !sw.seen_cases.insert(value) {
                    self.error_semantic(span, format!("duplicate case value '{value}'"));
                }
            }
            None => self.error_semantic(span, "'case' statement not in a switch"),
        }
    }

    fn check_default_label(&mut self, span: Span) {
        match self.context_stack.iter_mut().rev().find_map(|c| match c {
            BlockContext::Switch(sw) => Some(sw),
            BlockContext::Loop => None,
        }) {
            Some(sw) => {
                if sw.has_default {
                    self.error_semantic(span, "multiple 'default' labels in one switch");
                }
                sw.has_default = true;
            }
            None => self.error_semantic(span, "'default' statement not in a switch"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/stmt_tests.rs"]
mod tests;
