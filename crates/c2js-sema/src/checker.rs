//! The `Checker`'s shared state and entry point. Statement, expression, and
//! declaration traversal live in `stmt.rs`, `expr.rs`, and `decl.rs` as
//! further `impl Checker` blocks, mirroring how `c2js-parser` splits one
//! large stateful struct's behavior across files by concern.

use c2js_common::diagnostics::DiagnosticKind;
use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_common::span::{LineMap, Span};
use c2js_parser::{Ast, NodeId};
use c2js_symtab::SymbolTable;
use c2js_types::{TypeId, TypeRegistry};
use rustc_hash::{FxHashMap, FxHashSet};

/// The kind of the innermost loop/switch a statement is nested in, used to
/// validate `break`/`continue`/`case`/`default` (spec.md §4.4's check list).
pub(crate) enum BlockContext {
    Loop,
    Switch(SwitchContext),
}

pub(crate) struct SwitchContext {
    pub(crate) seen_cases: FxHashSet<i64>,
    pub(crate) has_default: bool,
}

/// What every `check_*` method needs: the parser's read-only outputs, the
/// mutable type registry (conversions can allocate new pointer/qualified
/// types), the session for interning and diagnostics, and the two side
/// tables this pass produces.
pub struct Checker<'a> {
    pub(crate) ast: &'a Ast,
    pub(crate) symtab: &'a SymbolTable,
    pub(crate) types: &'a mut TypeRegistry,
    pub(crate) session: &'a mut CompilerSession,
    pub(crate) line_map: LineMap,
    pub(crate) file: Atom,
    pub(crate) expr_types: FxHashMap<NodeId, TypeId>,
    pub(crate) casts: FxHashMap<NodeId, TypeId>,
    pub(crate) context_stack: Vec<BlockContext>,
    pub(crate) current_return_type: Option<TypeId>,
    pub(crate) current_labels: FxHashSet<Atom>,
}

/// The two side tables consumed by `c2js-codegen` (SPEC_FULL §4.4): every
/// expression node's computed (decayed, "as used") type, and the set of
/// nodes at which an implicit conversion was inserted, keyed by the node
/// being converted with the type it's converted to.
pub struct CheckOutput {
    pub expr_types: FxHashMap<NodeId, TypeId>,
    pub casts: FxHashMap<NodeId, TypeId>,
}

/// Runs the semantic analyzer over a fully parsed translation unit. Per
/// spec.md §4.3's diagnostics policy this should only be called once parsing
/// reported zero errors; it is harmless (if noisy) to call otherwise, since
/// every expression still gets *some* type recorded.
pub fn check_translation_unit(
    session: &mut CompilerSession,
    source: &str,
    file: Atom,
    ast: &Ast,
    symtab: &SymbolTable,
    types: &mut TypeRegistry,
) -> CheckOutput {
    let mut checker = Checker {
        ast,
        symtab,
        types,
        session,
        line_map: LineMap::build(source, Vec::new()),
        file,
        expr_types: FxHashMap::default(),
        casts: FxHashMap::default(),
        context_stack: Vec::new(),
        current_return_type: None,
        current_labels: FxHashSet::default(),
    };
    let top_level = checker.ast.top_level.clone();
    tracing::debug!(declarations = top_level.len(), "semantic analysis started");
    for id in top_level {
        checker.check_top_level(id);
    }
    tracing::debug!(
        exprs_typed = checker.expr_types.len(),
        casts_inserted = checker.casts.len(),
        "semantic analysis finished"
    );
    CheckOutput {
        expr_types: checker.expr_types,
        casts: checker.casts,
    }
}

impl<'a> Checker<'a> {
    pub(crate) fn error_type(&mut self, span: Span, message: impl Into<String>) {
        let loc = self.line_map.resolve(span.start, self.file);
        self.session.diagnostics.error(DiagnosticKind::Type, loc, message);
    }

    pub(crate) fn error_semantic(&mut self, span: Span, message: impl Into<String>) {
        let loc = self.line_map.resolve(span.start, self.file);
        self.session.diagnostics.error(DiagnosticKind::Semantic, loc, message);
    }

    /// A non-fatal diagnostic (§6/§7: warnings never affect the exit code).
    pub(crate) fn warning_semantic(&mut self, span: Span, message: impl Into<String>) {
        let loc = self.line_map.resolve(span.start, self.file);
        self.session.diagnostics.warning(DiagnosticKind::Semantic, loc, message);
    }

    /// Records `id`'s computed ("as used", already-decayed) type.
    pub(crate) fn record_type(&mut self, id: NodeId, ty: TypeId) -> TypeId {
        self.expr_types.insert(id, ty);
        ty
    }

    pub(crate) fn type_of(&self, id: NodeId) -> TypeId {
        *self
            .expr_types
            .get(&id)
            .expect("check_expr records a type for every node it visits")
    }
}
