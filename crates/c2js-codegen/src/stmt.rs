//! Statement emission (spec.md §4.5 "Control flow").
//!
//! `if`/`while`/`do`/`for`/`switch`/`case`/`default`/`break`/`continue` map
//! directly onto their JS counterparts. `goto` is only lowered for the
//! common "jump to a cleanup label at the end of the enclosing block"
//! pattern, via a JS labeled block plus a labeled `break` — the spec
//! explicitly does not require arbitrary-goto support (spec.md §4.5
//! "Control flow"); any other goto emits a runtime throw instead of
//! silently miscompiling.

use c2js_common::interner::Atom;
use c2js_parser::{NodeId, NodeKind};
use c2js_symtab::StorageClass;

use crate::emitter::Emitter;
use crate::numeric::{mode_of, unwrap_double, NumMode};

impl<'a> Emitter<'a> {
    pub(crate) fn emit_stmt(&mut self, id: NodeId, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        match self.ast.get(id).kind.clone() {
            NodeKind::Block { stmts } => self.emit_block(&stmts, indent),
            NodeKind::Labeled { stmt, .. } => self.emit_stmt(stmt, indent),
            NodeKind::CaseStmt { value, stmt } => {
                format!("{pad}case {value}:\n{}", self.emit_stmt(stmt, indent))
            }
            NodeKind::DefaultStmt { stmt } => {
                format!("{pad}default:\n{}", self.emit_stmt(stmt, indent))
            }
            NodeKind::ExprStmt { expr } => format!("{pad}{};\n", self.emit_expr(expr)),
            NodeKind::NullStmt => String::new(),
            NodeKind::If { cond, then_branch, else_branch } => {
                let cty = self.expr_type(cond);
                let cv = self.emit_expr(cond);
                let c = self.to_bool_js(&cv, cty);
                let then_code = self.emit_stmt(then_branch, indent + 1);
                match else_branch {
                    Some(e) => {
                        let else_code = self.emit_stmt(e, indent + 1);
                        format!(
                            "{pad}if ({c}) {{\n{then_code}{pad}}} else {{\n{else_code}{pad}}}\n"
                        )
                    }
                    None => format!("{pad}if ({c}) {{\n{then_code}{pad}}}\n"),
                }
            }
            NodeKind::Switch { cond, body } => {
                let value = self.to_switch_value(cond);
                let body_code = self.emit_stmt(body, indent + 1);
                format!("{pad}switch ({value}) {{\n{body_code}{pad}}}\n")
            }
            NodeKind::While { cond, body } => {
                let cty = self.expr_type(cond);
                let cv = self.emit_expr(cond);
                let c = self.to_bool_js(&cv, cty);
                let body_code = self.emit_stmt(body, indent + 1);
                format!("{pad}while ({c}) {{\n{body_code}{pad}}}\n")
            }
            NodeKind::DoWhile { body, cond } => {
                let body_code = self.emit_stmt(body, indent + 1);
                let cty = self.expr_type(cond);
                let cv = self.emit_expr(cond);
                let c = self.to_bool_js(&cv, cty);
                format!("{pad}do {{\n{body_code}{pad}}} while ({c});\n")
            }
            NodeKind::For { init, cond, step, body } => {
                let init_code = init.map(|i| self.emit_for_init(i)).unwrap_or_default();
                let cond_code = cond
                    .map(|c| {
                        let cty = self.expr_type(c);
                        let cv = self.emit_expr(c);
                        self.to_bool_js(&cv, cty)
                    })
                    .unwrap_or_default();
                let step_code = step.map(|s| self.emit_expr(s)).unwrap_or_default();
                let body_code = self.emit_stmt(body, indent + 1);
                format!("{pad}for ({init_code}; {cond_code}; {step_code}) {{\n{body_code}{pad}}}\n")
            }
            NodeKind::Goto { label } => self.emit_goto(label, &pad),
            NodeKind::Continue => format!("{pad}continue;\n"),
            NodeKind::Break => format!("{pad}break;\n"),
            NodeKind::Return { value } => self.emit_return(value, &pad),
            NodeKind::Decl { symbol, ty, init, .. } => self.emit_local_decl(symbol, ty, init, &pad),
            NodeKind::TypedefDecl { .. } => String::new(),
            other => unreachable!("{other:?} is not a statement node"),
        }
    }

    fn emit_block(&mut self, stmts: &[NodeId], indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let trailing_label = stmts.last().and_then(|&last| match self.ast.get(last).kind.clone() {
            NodeKind::Labeled { label, .. } => Some(label),
            _ => None,
        });
        if let Some(label) = trailing_label {
            self.goto_labels.push(label);
            let label_str = self.session.resolve(label).to_string();
            let mut body = String::new();
            for &s in stmts {
                body.push_str(&self.emit_stmt(s, indent + 1));
            }
            self.goto_labels.pop();
            format!("{pad}{label_str}: {{\n{body}{pad}}}\n")
        } else {
            let mut body = String::new();
            for &s in stmts {
                body.push_str(&self.emit_stmt(s, indent));
            }
            body
        }
    }

    fn emit_goto(&mut self, label: Atom, pad: &str) -> String {
        if self.goto_labels.contains(&label) {
            let name = self.session.resolve(label).to_string();
            format!("{pad}break {name};\n")
        } else {
            let name = self.session.resolve(label).to_string();
            format!(
                "{pad}throw new Error(\"unsupported goto to '{name}'\"); // backward/cross-block goto is not lowered\n"
            )
        }
    }

    fn emit_return(&mut self, value: Option<NodeId>, pad: &str) -> String {
        if let Some(dst) = self.struct_return_dest.clone() {
            match value {
                Some(v) => {
                    let src = self.emit_expr(v);
                    let size = self.types.get(self.expr_type(v)).size;
                    format!(
                        "{pad}rt.memcpy({dst}, {src}, {size});\n{pad}rt.mem.sp = __sp0;\n{pad}return {dst};\n"
                    )
                }
                None => format!("{pad}rt.mem.sp = __sp0;\n{pad}return {dst};\n"),
            }
        } else {
            match value {
                Some(v) => {
                    let vty = self.expr_type(v);
                    let val = self.emit_expr(v);
                    let ret_ty = self
                        .current_return_type
                        .unwrap_or_else(|| unreachable!("a return with a value always has a function return type"));
                    let val = self.convert_value(v, vty, ret_ty, &val);
                    format!("{pad}const __ret = {val};\n{pad}rt.mem.sp = __sp0;\n{pad}return __ret;\n")
                }
                None => format!("{pad}rt.mem.sp = __sp0;\n{pad}return;\n"),
            }
        }
    }

    fn emit_local_decl(&mut self, symbol: Option<c2js_symtab::SymbolId>, ty: c2js_types::TypeId, init: Option<NodeId>, pad: &str) -> String {
        let Some(symbol) = symbol else { return String::new() };
        if self.symtab.get(symbol).storage == StorageClass::Static {
            // Already reserved and queued for one-time initialization by
            // `Emitter::emit_function`'s static pre-pass.
            return String::new();
        }
        let Some(init) = init else { return String::new() };
        let addr = self.symbol_addr(symbol);
        let code = self.emit_initializer(addr, ty, init);
        format!("{pad}{code}")
    }

    fn emit_for_init(&mut self, id: NodeId) -> String {
        match self.ast.get(id).kind.clone() {
            NodeKind::ExprStmt { expr } => self.emit_expr(expr),
            NodeKind::NullStmt => String::new(),
            NodeKind::Decl { symbol: Some(sym), ty, init: Some(e), .. } => {
                let addr = self.symbol_addr(sym);
                let vty = self.expr_type(e);
                let v = self.emit_expr(e);
                let v = self.convert_value(e, vty, ty, &v);
                self.store_expr(&addr, ty, &v)
            }
            NodeKind::Decl { init: None, .. } => String::new(),
            NodeKind::Block { stmts } => stmts
                .iter()
                .map(|&s| self.emit_for_init(s))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            other => unreachable!("{other:?} is not a valid for-init clause"),
        }
    }

    fn to_switch_value(&mut self, cond: NodeId) -> String {
        let ty = self.expr_type(cond);
        let v = self.emit_expr(cond);
        match mode_of(self.types, ty) {
            NumMode::F64Bits => format!("Math.trunc({})", unwrap_double(&v)),
            NumMode::U64 => format!("Number({v})"),
            NumMode::Number => v,
        }
    }
}

#[cfg(test)]
#[path = "../tests/stmt_tests.rs"]
mod tests;
