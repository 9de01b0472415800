//! `Symbol`: one declared name (spec.md §3 "Symbol").

use c2js_common::arena::ArenaIndex;
use c2js_common::interner::Atom;
use c2js_common::span::Span;
use c2js_types::TypeId;

pub type SymbolId = ArenaIndex<Symbol>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Var,
    Func,
    Typedef,
    EnumConst,
    Param,
}

/// C99 storage-class specifiers (spec.md §4 declarations). `None` is the
/// default storage class implied when a declaration names none explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageClass {
    None,
    Extern,
    Static,
    Auto,
    Register,
    Typedef,
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: Atom,
    pub kind: SymbolKind,
    pub ty: TypeId,
    pub storage: StorageClass,
    /// True once a defining declaration (not just a declaration) has been
    /// seen — distinguishes `extern int x;` from `int x;`.
    pub defined: bool,
    pub is_local: bool,
    /// Set for `SymbolKind::EnumConst`.
    pub enum_value: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct LabelInfo {
    pub defined_at: Option<Span>,
    pub referenced: bool,
}
