//! `Scope`: one level of the scope stack (spec.md §3 "Scope").

use crate::symbol::{LabelInfo, SymbolId};
use c2js_common::interner::Atom;
use c2js_types::TypeId;
use rustc_hash::FxHashMap;

pub struct Scope {
    pub names: FxHashMap<Atom, SymbolId>,
    /// The tag namespace: `struct`/`union`/`enum` names are independent of
    /// ordinary identifiers (`struct foo` and a variable `foo` don't clash).
    pub tags: FxHashMap<Atom, TypeId>,
    pub labels: FxHashMap<Atom, LabelInfo>,
    pub is_function_scope: bool,
}

impl Scope {
    pub fn new(is_function_scope: bool) -> Self {
        Scope {
            names: FxHashMap::default(),
            tags: FxHashMap::default(),
            labels: FxHashMap::default(),
            is_function_scope,
        }
    }
}
