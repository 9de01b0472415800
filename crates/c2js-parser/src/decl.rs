//! Top-level and block-scoped declarations (spec.md §4.3): the
//! translation-unit driver, external declarations (including function
//! definitions), and local declarations with their init-declarator-lists.
//! Both declaration forms share [`Parser::bind_one_declaration`] — they only
//! differ in whether a bare declarator followed by `{` introduces a
//! function body.

use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_common::span::Span;
use c2js_lexer::Punct;
use c2js_symtab::{StorageClass, SymbolKind};
use c2js_types::{TypeId, TypeKind};

use crate::ast::{NodeId, NodeKind};
use crate::parser::Parser;

impl Parser {
    /// Parses the whole token stream as a sequence of external declarations,
    /// populating `self.ast.top_level` in source order.
    pub fn parse_translation_unit(&mut self, session: &mut CompilerSession) {
        let mut top = Vec::new();
        while !self.at_eof() {
            if !self.starts_decl_specifiers() {
                let span = self.cur_span();
                self.error_at(session, span, "expected a declaration");
                self.synchronize(session);
                continue;
            }
            self.parse_external_declaration(session, &mut top);
        }
        self.ast.top_level = top;
    }

    fn parse_external_declaration(&mut self, session: &mut CompilerSession, out: &mut Vec<NodeId>) {
        let spec = self.parse_decl_specifiers(session);
        if self.eat_punct(session, Punct::Semicolon) {
            // A tag-only declaration (`struct S { ... };`) or a stray `;`.
            return;
        }

        let declarator = self.parse_declarator(session);
        let (ty, name, span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);

        if !spec.is_typedef && self.at_punct(Punct::LBrace) {
            let Some(name) = name else {
                self.error_at(session, span, "function definition requires a name");
                self.synchronize(session);
                return;
            };
            let symbol = self
                .symtab
                .declare(name, SymbolKind::Func, ty, spec.storage)
                .unwrap_or_else(|existing| existing);
            self.symtab.get_mut(symbol).defined = true;
            let params = crate::declarator::outermost_params(&declarator)
                .map(<[_]>::to_vec)
                .unwrap_or_default();
            let (body, param_syms) = self.parse_function_body(session, &params);
            out.push(self.ast.alloc(
                NodeKind::FuncDef {
                    name,
                    symbol,
                    ty,
                    params: param_syms,
                    body,
                    implicit_return_type: spec.implicit_int,
                },
                span,
            ));
            return;
        }

        self.bind_one_declaration(session, &spec, name, ty, span, out);
        while self.eat_punct(session, Punct::Comma) {
            let declarator = self.parse_declarator(session);
            let (ty, name, span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
            self.bind_one_declaration(session, &spec, name, ty, span, out);
        }
        self.expect_punct(session, Punct::Semicolon);
    }

    /// A block-scoped declaration (spec.md §4.3): same grammar as an
    /// external declaration minus the function-definition case, since a
    /// nested function body isn't legal C.
    pub(crate) fn parse_local_declaration(&mut self, session: &mut CompilerSession, out: &mut Vec<NodeId>) {
        let spec = self.parse_decl_specifiers(session);
        if self.eat_punct(session, Punct::Semicolon) {
            return;
        }
        let declarator = self.parse_declarator(session);
        let (ty, name, span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
        self.bind_one_declaration(session, &spec, name, ty, span, out);
        while self.eat_punct(session, Punct::Comma) {
            let declarator = self.parse_declarator(session);
            let (ty, name, span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
            self.bind_one_declaration(session, &spec, name, ty, span, out);
        }
        self.expect_punct(session, Punct::Semicolon);
    }

    /// Declares one name from a declaration's specifiers (a typedef, or a
    /// variable/prototype with an optional initializer) and appends the
    /// resulting AST node to `out`.
    fn bind_one_declaration(
        &mut self,
        session: &mut CompilerSession,
        spec: &crate::parser::DeclSpec,
        name: Option<Atom>,
        ty: TypeId,
        span: Span,
        out: &mut Vec<NodeId>,
    ) {
        if spec.is_typedef {
            let Some(name) = name else {
                self.error_at(session, span, "typedef requires a name");
                return;
            };
            if self.symtab.declare(name, SymbolKind::Typedef, ty, StorageClass::Typedef).is_err() {
                let spelling = session.resolve(name).to_string();
                self.error_at(session, span, format!("redefinition of '{spelling}'"));
            }
            out.push(self.ast.alloc(NodeKind::TypedefDecl { name, ty }, span));
            return;
        }

        let symbol = name.map(|n| {
            // A declarator whose resolved type is a function names a
            // prototype (no body, or this call wouldn't have reached here).
            let kind = if matches!(self.types.get(ty).kind, TypeKind::Function(_)) {
                SymbolKind::Func
            } else {
                SymbolKind::Var
            };
            self.symtab.declare(n, kind, ty, spec.storage).unwrap_or_else(|existing| existing)
        });
        let init = if self.eat_punct(session, Punct::Assign) {
            Some(self.parse_initializer(session))
        } else {
            None
        };
        let full_span = init.map_or(span, |i| span.merge(self.ast.get(i).span));
        out.push(self.ast.alloc(NodeKind::Decl { name, symbol, ty, init }, full_span));
    }
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod tests;
