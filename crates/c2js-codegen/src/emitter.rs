//! The `Emitter`'s shared state and module assembly (spec.md §4.5). Mirrors
//! `tsz-emitter`'s `EmitContext` pattern of one mutable emission-state
//! struct threaded through recursive `emit_*` methods, except the state here
//! (frame offsets, global offsets, the string pool) is memory-model
//! bookkeeping rather than transform flags.

use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_parser::{Ast, NodeId, NodeKind};
use c2js_sema::CheckOutput;
use c2js_symtab::{StorageClass, SymbolId, SymbolKind, SymbolTable};
use c2js_types::TypeRegistry;
use rustc_hash::FxHashMap;

/// Global region offsets start here, leaving room for runtime bookkeeping
/// below address zero to stay a recognizably invalid/null-ish range (spec.md
/// §4.5 "Global region: a bump allocator returning aligned offsets from
/// 4096 onwards").
pub(crate) const GLOBAL_BASE: u32 = 4096;

pub struct Emitter<'a> {
    pub(crate) ast: &'a Ast,
    pub(crate) symtab: &'a SymbolTable,
    pub(crate) types: &'a TypeRegistry,
    pub(crate) session: &'a mut CompilerSession,
    pub(crate) check: &'a CheckOutput,

    /// Module-wide global-region offsets, keyed by symbol (spec.md §4.5
    /// "Globals: FxHashMap<SymbolId, u32>").
    pub(crate) globals: FxHashMap<SymbolId, u32>,
    pub(crate) next_global_offset: u32,

    /// Current function's local stack-frame offsets, relative to `bp`
    /// (negative: locals live below the saved frame pointer). Rebuilt fresh
    /// per function (spec.md §4.5 "FrameMap: FxHashMap<SymbolId, i32>").
    pub(crate) frame: FxHashMap<SymbolId, i32>,
    pub(crate) frame_size: u32,

    /// Deduplicated string-literal pool: each distinct literal is
    /// materialized once via `allocString` (spec.md §4.5 "String literals").
    pub(crate) string_pool: Vec<Atom>,
    pub(crate) string_pool_index: FxHashMap<Atom, usize>,

    /// Function-pointer JS binding names (`__fp0`, `__fp1`, …), assigned in
    /// source order to every top-level function definition up front (spec.md
    /// §4.5 "Function pointers"); simpler than detecting which functions
    /// actually have their address taken, and harmless since unused
    /// registrations are just a few more `registerFunction` calls. The id
    /// behind each binding is assigned by the runtime's `registerFunction`,
    /// not by the compiler (spec.md §6), so the generated code captures it
    /// into a `const` rather than baking in a literal.
    pub(crate) func_ids: FxHashMap<SymbolId, String>,

    pub(crate) temp_counter: u32,

    /// Set while emitting a function whose return type is a struct/union:
    /// the JS parameter name holding the caller-provided destination
    /// address that `return s;` must memcpy into (spec.md §4.5 "Aggregate
    /// handling").
    pub(crate) struct_return_dest: Option<String>,

    /// The enclosing function's declared return type, used to convert a
    /// `return expr;`'s value to the right representation.
    pub(crate) current_return_type: Option<c2js_types::TypeId>,

    /// Labels currently reachable via a JS labeled `break`, innermost last —
    /// pushed when a block's last statement is a label, popped once that
    /// block finishes emitting (spec.md §4.5's restricted goto lowering).
    pub(crate) goto_labels: Vec<Atom>,

    /// JS statements initializing every `static` local encountered so far,
    /// across every function, appended into the module's global-data
    /// section so each runs exactly once at load time (spec.md §4.5
    /// "Static locals").
    pub(crate) static_init: String,
}

/// Runs code generation over a fully checked translation unit, producing the
/// emitted JavaScript module text (spec.md §4.5 "Module structure").
pub fn generate_module(
    session: &mut CompilerSession,
    ast: &Ast,
    symtab: &SymbolTable,
    types: &TypeRegistry,
    check: &CheckOutput,
) -> String {
    let mut emitter = Emitter {
        ast,
        symtab,
        types,
        session,
        check,
        globals: FxHashMap::default(),
        next_global_offset: GLOBAL_BASE,
        frame: FxHashMap::default(),
        frame_size: 0,
        string_pool: Vec::new(),
        string_pool_index: FxHashMap::default(),
        func_ids: FxHashMap::default(),
        temp_counter: 0,
        struct_return_dest: None,
        current_return_type: None,
        goto_labels: Vec::new(),
        static_init: String::new(),
    };
    tracing::debug!(top_level_items = ast.top_level.len(), "codegen started");

    for (i, &id) in ast.top_level.iter().enumerate() {
        if let NodeKind::FuncDef { symbol, .. } = &ast.get(id).kind {
            emitter.func_ids.insert(*symbol, format!("__fp{i}"));
        }
    }

    let mut functions = String::new();
    let mut global_data = String::new();
    for &id in &ast.top_level {
        match ast.get(id).kind.clone() {
            NodeKind::FuncDef { .. } => functions.push_str(&emitter.emit_function(id)),
            NodeKind::Decl { symbol, init, ty, .. } => {
                if let Some(symbol) = symbol {
                    if !matches!(emitter.symtab.get(symbol).storage, StorageClass::Typedef) {
                        emitter.reserve_global(symbol, ty);
                        if let Some(init) = init {
                            global_data.push_str(&emitter.emit_global_init(symbol, init));
                        }
                    }
                }
            }
            NodeKind::TypedefDecl { .. } => {}
            other => unreachable!("{other:?} is not a top-level item"),
        }
    }

    let js = emitter.assemble(functions, global_data);
    tracing::debug!(functions = emitter.func_ids.len(), bytes = js.len(), "codegen finished");
    js
}

impl<'a> Emitter<'a> {
    /// Reserves `symbol`'s storage in the global region, aligned to its
    /// type, unless it already has an offset (an earlier `extern`
    /// declaration of the same symbol already reserved one).
    pub(crate) fn reserve_global(&mut self, symbol: SymbolId, ty: c2js_types::TypeId) {
        if self.globals.contains_key(&symbol) {
            return;
        }
        let data = self.types.get(ty);
        let (size, align) = (data.size.max(1), data.align.max(1));
        let offset = (self.next_global_offset + align - 1) / align * align;
        self.globals.insert(symbol, offset);
        self.next_global_offset = offset + size;
    }

    /// The JS expression for `symbol`'s address: a local's `bp`-relative
    /// offset, a global's constant offset, or (only reachable for a
    /// function symbol used as data, never called directly) its registered
    /// pointer id — see `Emitter::function_pointer_id` for that case
    /// instead.
    pub(crate) fn symbol_addr(&mut self, symbol: SymbolId) -> String {
        if let Some(&off) = self.frame.get(&symbol) {
            return format!("(bp + ({off}))");
        }
        let ty = self.symtab.get(symbol).ty;
        self.reserve_global(symbol, ty);
        format!("{}", self.globals[&symbol])
    }

    pub(crate) fn function_pointer_id(&self, symbol: SymbolId) -> String {
        self.func_ids
            .get(&symbol)
            .cloned()
            .unwrap_or_else(|| unreachable!("every function definition is pre-registered"))
    }

    /// Deduplicated allocation index for a string literal atom, materialized
    /// once in the global-data section (spec.md §4.5 "String literals").
    pub(crate) fn string_index(&mut self, atom: Atom) -> usize {
        if let Some(&i) = self.string_pool_index.get(&atom) {
            return i;
        }
        let i = self.string_pool.len();
        self.string_pool.push(atom);
        self.string_pool_index.insert(atom, i);
        i
    }

    pub(crate) fn fresh_temp(&mut self) -> String {
        self.temp_counter += 1;
        format!("__t{}", self.temp_counter)
    }

    /// Assembles the final module text in the order spec.md §4.5's "Module
    /// structure" fixes: header, `reserveGlobals`, function definitions,
    /// function-pointer registration, global-data initialization, entry
    /// point.
    fn assemble(mut self, functions: String, global_data: String) -> String {
        let mut out = String::new();
        out.push_str("\"use strict\";\n");
        out.push_str("const rt = require(\"./c2js-runtime\");\n\n");
        out.push_str(&format!("rt.mem.reserveGlobals({});\n\n", self.next_global_offset));
        out.push_str(&functions);
        out.push('\n');
        for (&symbol, binding) in &self.func_ids.clone() {
            let name = self.session.resolve(self.symtab.get(symbol).name);
            out.push_str(&format!("const {binding} = rt.registerFunction({name});\n"));
        }
        out.push('\n');
        for (i, &atom) in self.string_pool.clone().iter().enumerate() {
            let text = self.session.resolve(atom).to_string();
            out.push_str(&format!(
                "const __str{i} = rt.mem.allocString({});\n",
                js_string_literal(&text)
            ));
        }
        out.push_str(&global_data);
        out.push_str(&self.static_init);
        out.push('\n');
        out.push_str(&self.emit_entry_point());
        out
    }

    fn emit_entry_point(&mut self) -> String {
        let main = self.symtab.lookup(self.session.intern("main"));
        let Some(main) = main.filter(|&s| self.symtab.get(s).kind == SymbolKind::Func) else {
            return String::new();
        };
        let takes_args = match &self.types.get(self.symtab.get(main).ty).kind {
            c2js_types::TypeKind::Function(f) => !f.params.is_empty(),
            _ => false,
        };
        let call = if takes_args { "main(rt.argc(), rt.argv())" } else { "main()" };
        format!(
            "try {{\n  const __rc = {call};\n  process.exitCode = Number(__rc);\n}} catch (e) {{\n  if (e && e.code !== undefined) {{\n    process.exitCode = e.code;\n  }} else {{\n    throw e;\n  }}\n}}\n"
        )
    }
}

/// A JS double-quoted string literal for `text`, escaping the handful of
/// characters that matter (spec.md doesn't mandate a specific escaping
/// convention; this one round-trips any byte string `allocString` expects).
pub(crate) fn js_string_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
#[path = "../tests/emitter_tests.rs"]
mod tests;
