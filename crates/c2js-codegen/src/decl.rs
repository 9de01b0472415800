//! Function and declaration emission (spec.md §4.5 "Memory model",
//! "Aggregate handling", "Static locals", "String literals").

use c2js_parser::{Designator, NodeId, NodeKind};
use c2js_symtab::{StorageClass, SymbolId};
use c2js_types::{TypeId, TypeKind};
use rustc_hash::FxHashMap;

use crate::emitter::Emitter;
use crate::numeric::scalar_access;

impl<'a> Emitter<'a> {
    /// Emits one top-level function definition, building a fresh stack
    /// frame for its parameters and locals (spec.md §4.5's per-function
    /// `FrameMap`).
    pub(crate) fn emit_function(&mut self, id: NodeId) -> String {
        let (name, ty, params, body) = match self.ast.get(id).kind.clone() {
            NodeKind::FuncDef { name, ty, params, body, .. } => (name, ty, params, body),
            other => unreachable!("{other:?} is not a function definition"),
        };
        let return_type = match self.types.get(ty).kind {
            TypeKind::Function(ref f) => f.return_type,
            _ => unreachable!("a FuncDef's type is always a function type"),
        };
        let struct_return = matches!(self.types.get(return_type).kind, TypeKind::Struct(_) | TypeKind::Union(_));

        let mut locals: Vec<(SymbolId, TypeId)> =
            params.iter().map(|&p| (p, self.symtab.get(p).ty)).collect();
        self.collect_locals(body, &mut locals);
        let (frame, frame_size) = layout_frame(self, &locals);
        self.frame = frame;
        self.frame_size = frame_size;
        self.struct_return_dest = struct_return.then(|| "__dst".to_string());
        self.current_return_type = Some(return_type);

        let mut statics = Vec::new();
        self.collect_statics(body, &mut statics);
        for (sym, sty, init) in statics {
            self.reserve_global(sym, sty);
            if let Some(init) = init {
                let addr = self.symbol_addr(sym);
                let code = self.emit_initializer(addr, sty, init);
                self.static_init.push_str(&code);
            }
        }

        let name_str = self.session.resolve(name).to_string();
        let param_names: Vec<String> = (0..params.len()).map(|i| format!("__p{i}")).collect();
        let mut sig_params = Vec::new();
        if struct_return {
            sig_params.push("__dst".to_string());
        }
        sig_params.extend(param_names.iter().cloned());

        let mut out = String::new();
        out.push_str(&format!("function {name_str}({}) {{\n", sig_params.join(", ")));
        out.push_str(&format!("  const __sp0 = rt.mem.sp; const bp = rt.mem.sp - {frame_size}; rt.mem.sp = bp;\n"));
        for (i, &p) in params.iter().enumerate() {
            let off = self.frame[&p];
            let pty = self.symtab.get(p).ty;
            match scalar_access(self.types, pty) {
                Some(acc) => out.push_str(&format!(
                    "  rt.mem.{}((bp + ({off})), {});\n",
                    acc.setter, param_names[i]
                )),
                None => {
                    let size = self.types.get(pty).size;
                    out.push_str(&format!(
                        "  rt.memcpy((bp + ({off})), {}, {size});\n",
                        param_names[i]
                    ));
                }
            }
        }
        out.push_str(&self.emit_stmt(body, 1));
        out.push_str("  rt.mem.sp = __sp0;\n");
        if struct_return {
            out.push_str("  return __dst;\n");
        } else if !matches!(self.types.get(return_type).kind, TypeKind::Void) {
            // A function falling off its end without an explicit `return`
            // has undefined behavior in C; emitting a zero return keeps the
            // generated JS well-formed instead of returning `undefined`.
            out.push_str("  return 0;\n");
        }
        out.push_str("}\n\n");
        out
    }

    /// Collects every local variable (including `for`-init declarations)
    /// needing stack-frame space; `static` locals are excluded since they
    /// live in the global region instead (spec.md §4.5 "Static locals").
    fn collect_locals(&self, id: NodeId, out: &mut Vec<(SymbolId, TypeId)>) {
        match self.ast.get(id).kind.clone() {
            NodeKind::Block { stmts } => {
                for s in stmts {
                    self.collect_locals(s, out);
                }
            }
            NodeKind::Decl { symbol: Some(sym), ty, .. } => {
                if self.symtab.get(sym).storage != StorageClass::Static {
                    out.push((sym, ty));
                }
            }
            NodeKind::Labeled { stmt, .. } => self.collect_locals(stmt, out),
            NodeKind::CaseStmt { stmt, .. } | NodeKind::DefaultStmt { stmt } => {
                self.collect_locals(stmt, out)
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.collect_locals(then_branch, out);
                if let Some(e) = else_branch {
                    self.collect_locals(e, out);
                }
            }
            NodeKind::Switch { body, .. }
            | NodeKind::While { body, .. }
            | NodeKind::DoWhile { body, .. } => self.collect_locals(body, out),
            NodeKind::For { init, body, .. } => {
                if let Some(init) = init {
                    self.collect_locals(init, out);
                }
                self.collect_locals(body, out);
            }
            _ => {}
        }
    }

    /// Mirrors `collect_locals`'s walk but gathers `static` locals instead,
    /// which need a one-time global-region slot and load-time initializer
    /// rather than a stack-frame offset (spec.md §4.5 "Static locals").
    fn collect_statics(&self, id: NodeId, out: &mut Vec<(SymbolId, TypeId, Option<NodeId>)>) {
        match self.ast.get(id).kind.clone() {
            NodeKind::Block { stmts } => {
                for s in stmts {
                    self.collect_statics(s, out);
                }
            }
            NodeKind::Decl { symbol: Some(sym), ty, init, .. } => {
                if self.symtab.get(sym).storage == StorageClass::Static {
                    out.push((sym, ty, init));
                }
            }
            NodeKind::Labeled { stmt, .. } => self.collect_statics(stmt, out),
            NodeKind::CaseStmt { stmt, .. } | NodeKind::DefaultStmt { stmt } => {
                self.collect_statics(stmt, out)
            }
            NodeKind::If { then_branch, else_branch, .. } => {
                self.collect_statics(then_branch, out);
                if let Some(e) = else_branch {
                    self.collect_statics(e, out);
                }
            }
            NodeKind::Switch { body, .. }
            | NodeKind::While { body, .. }
            | NodeKind::DoWhile { body, .. } => self.collect_statics(body, out),
            NodeKind::For { init, body, .. } => {
                if let Some(init) = init {
                    self.collect_statics(init, out);
                }
                self.collect_statics(body, out);
            }
            _ => {}
        }
    }

    /// Reserves a `static` local's (or a top-level global's) storage and
    /// returns the JS statements that run its initializer once, at module
    /// load (spec.md §4.5 "global-data initialization section").
    pub(crate) fn emit_global_init(&mut self, symbol: SymbolId, init: NodeId) -> String {
        let ty = self.symtab.get(symbol).ty;
        let addr = self.symbol_addr(symbol);
        self.emit_initializer(addr, ty, init)
    }

    /// Writes an initializer's value(s) into memory starting at `addr`,
    /// recursing for brace initializers exactly as `c2js-sema`'s
    /// `check_initializer` validated them: positionally for arrays,
    /// positionally-or-by-designator for struct/union members.
    pub(crate) fn emit_initializer(&mut self, addr: String, ty: TypeId, init: NodeId) -> String {
        if let NodeKind::InitList { elements } = self.ast.get(init).kind.clone() {
            return match self.types.get(ty).kind.clone() {
                TypeKind::Array(arr) => {
                    let elem_size = self.types.get(arr.element).size.max(1);
                    let mut out = String::new();
                    for (i, el) in elements.into_iter().enumerate() {
                        let el_addr = format!("({addr} + {})", i as u32 * elem_size);
                        out.push_str(&self.emit_initializer_element(el_addr, arr.element, el));
                    }
                    out
                }
                TypeKind::Struct(agg) | TypeKind::Union(agg) => {
                    let members = agg.members.clone();
                    let mut positional = 0usize;
                    let mut out = String::new();
                    for el in elements {
                        let member = match &self.ast.get(el).kind {
                            NodeKind::Designated { designator: Designator::Field(name), .. } => {
                                members.iter().find(|m| m.name == *name).cloned()
                            }
                            _ => {
                                let m = members.get(positional).cloned();
                                positional += 1;
                                m
                            }
                        };
                        if let Some(m) = member {
                            let el_addr = format!("({addr} + {})", m.offset);
                            out.push_str(&self.emit_initializer_element(el_addr, m.ty, el));
                        }
                    }
                    out
                }
                _ => String::new(),
            };
        }
        let value_ty = self.expr_type(init);
        let value = self.emit_expr(init);
        let value = self.convert_value(init, value_ty, ty, &value);
        self.store(&addr, ty, &value)
    }

    fn emit_initializer_element(&mut self, addr: String, ty: TypeId, el: NodeId) -> String {
        if let NodeKind::Designated { init, .. } = self.ast.get(el).kind.clone() {
            self.emit_initializer(addr, ty, init)
        } else {
            self.emit_initializer(addr, ty, el)
        }
    }

    /// Writes `value` (already narrowed/converted) through the typed
    /// setter for `ty`, or `memcpy`s for an aggregate.
    pub(crate) fn store(&mut self, addr: &str, ty: TypeId, value: &str) -> String {
        format!("{};\n", self.store_expr(addr, ty, value))
    }

    /// Same write as [`Emitter::store`] but as a bare JS expression with no
    /// trailing `;` — usable inside a `for(...)` init/step clause.
    pub(crate) fn store_expr(&mut self, addr: &str, ty: TypeId, value: &str) -> String {
        match scalar_access(self.types, ty) {
            Some(acc) => format!("rt.mem.{}({addr}, {value})", acc.setter),
            None => {
                let size = self.types.get(ty).size;
                format!("rt.memcpy({addr}, {value}, {size})")
            }
        }
    }
}

/// Assigns descending `bp`-relative offsets to each local/parameter in
/// declaration order, aligned to each one's type, and returns the total
/// (8-byte-rounded) frame size (spec.md §4.5 "Stack frame").
fn layout_frame(emitter: &Emitter, locals: &[(SymbolId, TypeId)]) -> (FxHashMap<SymbolId, i32>, u32) {
    let mut map = FxHashMap::default();
    let mut cursor: i64 = 0;
    for &(sym, ty) in locals {
        let data = emitter.types.get(ty);
        let (size, align) = (data.size.max(1) as i64, data.align.max(1) as i64);
        cursor -= size;
        cursor = -(((-cursor) + align - 1) / align * align);
        map.insert(sym, cursor as i32);
    }
    let frame_size = (-cursor) as u32;
    let frame_size = (frame_size + 7) / 8 * 8;
    (map, frame_size)
}

#[cfg(test)]
#[path = "../tests/decl_tests.rs"]
mod tests;
