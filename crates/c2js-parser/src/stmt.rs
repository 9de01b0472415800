//! Statement parsing (spec.md §4.3): compound statements push/pop a
//! `c2js-symtab` scope as they're entered and left, mirroring how control
//! flow nests lexical scope in C. Labels attach to the nearest enclosing
//! *function* scope regardless of block nesting, per `SymbolTable::declare_label`.

use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_lexer::{Keyword, Punct, TokenKind};
use c2js_symtab::{SymbolId, SymbolKind, StorageClass, LabelInfo};

use crate::ast::{NodeId, NodeKind};
use crate::declarator::ParamDecl;
use crate::parser::Parser;

impl Parser {
    /// The outermost `{ ... }` of a function definition: establishes the
    /// function scope that `goto` labels bind to (spec.md §4.3), declares
    /// the parameters into it, then parses the body in that same scope.
    pub(crate) fn parse_function_body(
        &mut self,
        session: &mut CompilerSession,
        params: &[ParamDecl],
    ) -> (NodeId, Vec<SymbolId>) {
        self.symtab.push_scope(true);
        let mut param_syms = Vec::new();
        for p in params {
            if let Some(name) = p.name {
                let sym = self
                    .symtab
                    .declare(name, SymbolKind::Param, p.ty, StorageClass::None)
                    .unwrap_or_else(|existing| existing);
                param_syms.push(sym);
            }
        }
        let node = self.parse_compound_stmt(session);
        self.symtab.pop_scope();
        (node, param_syms)
    }

    fn parse_block(&mut self, session: &mut CompilerSession) -> NodeId {
        self.symtab.push_scope(false);
        let node = self.parse_compound_stmt(session);
        self.symtab.pop_scope();
        node
    }

    fn parse_compound_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.expect_punct(session, Punct::LBrace);
        let mut stmts = Vec::new();
        while !self.at_punct(Punct::RBrace) && !self.at_eof() {
            if self.starts_decl_specifiers() {
                self.parse_local_declaration(session, &mut stmts);
            } else {
                stmts.push(self.parse_statement(session));
            }
        }
        let end = self.cur_span();
        self.expect_punct(session, Punct::RBrace);
        let span = start.merge(end);
        self.ast.alloc(NodeKind::Block { stmts }, span)
    }

    pub(crate) fn parse_statement(&mut self, session: &mut CompilerSession) -> NodeId {
        if self.at_punct(Punct::LBrace) {
            return self.parse_block(session);
        }
        if self.at_punct(Punct::Semicolon) {
            let span = self.cur_span();
            self.bump(session);
            return self.ast.alloc(NodeKind::NullStmt, span);
        }
        if self.at_keyword(Keyword::If) {
            return self.parse_if_stmt(session);
        }
        if self.at_keyword(Keyword::Switch) {
            return self.parse_switch_stmt(session);
        }
        if self.at_keyword(Keyword::While) {
            return self.parse_while_stmt(session);
        }
        if self.at_keyword(Keyword::Do) {
            return self.parse_do_while_stmt(session);
        }
        if self.at_keyword(Keyword::For) {
            return self.parse_for_stmt(session);
        }
        if self.at_keyword(Keyword::Goto) {
            return self.parse_goto_stmt(session);
        }
        if self.at_keyword(Keyword::Continue) {
            let span = self.cur_span();
            self.bump(session);
            self.expect_punct(session, Punct::Semicolon);
            return self.ast.alloc(NodeKind::Continue, span);
        }
        if self.at_keyword(Keyword::Break) {
            let span = self.cur_span();
            self.bump(session);
            self.expect_punct(session, Punct::Semicolon);
            return self.ast.alloc(NodeKind::Break, span);
        }
        if self.at_keyword(Keyword::Return) {
            return self.parse_return_stmt(session);
        }
        if self.at_keyword(Keyword::Case) {
            return self.parse_case_stmt(session);
        }
        if self.at_keyword(Keyword::Default) {
            return self.parse_default_stmt(session);
        }
        if let Some(name) = self.cur_ident() {
            if matches!(self.peek2(session), TokenKind::Punct(Punct::Colon)) {
                return self.parse_labeled_stmt(session, name);
            }
        }
        self.parse_expr_stmt(session)
    }

    fn parse_if_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `if`
        self.expect_punct(session, Punct::LParen);
        let cond = self.parse_expression(session);
        self.expect_punct(session, Punct::RParen);
        let then_branch = self.parse_statement(session);
        let else_branch = if self.eat_keyword(session, Keyword::Else) {
            Some(self.parse_statement(session))
        } else {
            None
        };
        let end = else_branch.map_or_else(|| self.ast.get(then_branch).span, |n| self.ast.get(n).span);
        let span = start.merge(end);
        self.ast.alloc(NodeKind::If { cond, then_branch, else_branch }, span)
    }

    fn parse_switch_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `switch`
        self.expect_punct(session, Punct::LParen);
        let cond = self.parse_expression(session);
        self.expect_punct(session, Punct::RParen);
        let body = self.parse_statement(session);
        let span = start.merge(self.ast.get(body).span);
        self.ast.alloc(NodeKind::Switch { cond, body }, span)
    }

    fn parse_while_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `while`
        self.expect_punct(session, Punct::LParen);
        let cond = self.parse_expression(session);
        self.expect_punct(session, Punct::RParen);
        let body = self.parse_statement(session);
        let span = start.merge(self.ast.get(body).span);
        self.ast.alloc(NodeKind::While { cond, body }, span)
    }

    fn parse_do_while_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `do`
        let body = self.parse_statement(session);
        self.eat_keyword(session, Keyword::While);
        self.expect_punct(session, Punct::LParen);
        let cond = self.parse_expression(session);
        self.expect_punct(session, Punct::RParen);
        let end = self.cur_span();
        self.expect_punct(session, Punct::Semicolon);
        let span = start.merge(end);
        self.ast.alloc(NodeKind::DoWhile { body, cond }, span)
    }

    fn parse_for_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `for`
        self.expect_punct(session, Punct::LParen);
        // The for-loop header is its own scope (C99 §6.8.5): a declaration
        // in the init-clause is visible only to the loop.
        self.symtab.push_scope(false);
        let init = if self.at_punct(Punct::Semicolon) {
            self.bump(session);
            None
        } else if self.starts_decl_specifiers() {
            let mut decls = Vec::new();
            self.parse_local_declaration(session, &mut decls);
            match decls.len() {
                0 => None,
                1 => Some(decls[0]),
                _ => {
                    let span = self.ast.get(decls[0]).span;
                    Some(self.ast.alloc(NodeKind::Block { stmts: decls }, span))
                }
            }
        } else {
            let expr = self.parse_expression(session);
            let span = self.ast.get(expr).span;
            self.expect_punct(session, Punct::Semicolon);
            Some(self.ast.alloc(NodeKind::ExprStmt { expr }, span))
        };
        let cond = if self.at_punct(Punct::Semicolon) { None } else { Some(self.parse_expression(session)) };
        self.expect_punct(session, Punct::Semicolon);
        let step = if self.at_punct(Punct::RParen) { None } else { Some(self.parse_expression(session)) };
        self.expect_punct(session, Punct::RParen);
        let body = self.parse_statement(session);
        self.symtab.pop_scope();
        let span = start.merge(self.ast.get(body).span);
        self.ast.alloc(NodeKind::For { init, cond, step, body }, span)
    }

    fn parse_goto_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `goto`
        let label = match self.cur_ident() {
            Some(n) => {
                self.bump(session);
                n
            }
            None => {
                let span = self.cur_span();
                self.error_at(session, span, "expected a label name after 'goto'");
                session.intern("")
            }
        };
        let end = self.cur_span();
        self.expect_punct(session, Punct::Semicolon);
        let span = start.merge(end);
        self.ast.alloc(NodeKind::Goto { label }, span)
    }

    fn parse_labeled_stmt(&mut self, session: &mut CompilerSession, name: Atom) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // identifier
        self.bump(session); // `:`
        let info = LabelInfo { defined_at: Some(start), referenced: false };
        if self.symtab.declare_label(name, info).is_err() {
            let spelling = session.resolve(name).to_string();
            self.error_at(session, start, format!("redefinition of label '{spelling}'"));
        }
        let stmt = self.parse_statement(session);
        let span = start.merge(self.ast.get(stmt).span);
        self.ast.alloc(NodeKind::Labeled { label: name, stmt }, span)
    }

    fn parse_case_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `case`
        let value = self.parse_const_int_expr(session);
        self.expect_punct(session, Punct::Colon);
        let stmt = self.parse_statement(session);
        let span = start.merge(self.ast.get(stmt).span);
        self.ast.alloc(NodeKind::CaseStmt { value, stmt }, span)
    }

    fn parse_default_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `default`
        self.expect_punct(session, Punct::Colon);
        let stmt = self.parse_statement(session);
        let span = start.merge(self.ast.get(stmt).span);
        self.ast.alloc(NodeKind::DefaultStmt { stmt }, span)
    }

    fn parse_return_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let start = self.cur_span();
        self.bump(session); // `return`
        let value = if self.at_punct(Punct::Semicolon) { None } else { Some(self.parse_expression(session)) };
        let end = self.cur_span();
        self.expect_punct(session, Punct::Semicolon);
        let span = start.merge(end);
        self.ast.alloc(NodeKind::Return { value }, span)
    }

    fn parse_expr_stmt(&mut self, session: &mut CompilerSession) -> NodeId {
        let expr = self.parse_expression(session);
        let end = self.cur_span();
        if !self.expect_punct(session, Punct::Semicolon) {
            self.synchronize(session);
        }
        let span = self.ast.get(expr).span.merge(end);
        self.ast.alloc(NodeKind::ExprStmt { expr }, span)
    }
}

#[cfg(test)]
#[path = "../tests/stmt_tests.rs"]
mod tests;
