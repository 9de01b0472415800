//! The scope stack and symbol table (spec.md §3 "Symbol", §3 "Scope").
//!
//! A `SymbolTable` is a stack of [`Scope`]s: entering a block, a function
//! body, or function parameter list pushes a scope; leaving it pops one.
//! Lookups walk from the innermost scope outward. File scope (the bottom of
//! the stack) is never popped.

pub mod scope;
pub mod symbol;

pub use scope::Scope;
pub use symbol::{LabelInfo, StorageClass, Symbol, SymbolId, SymbolKind};

use c2js_common::arena::Arena;
use c2js_common::interner::Atom;
use c2js_types::TypeId;

pub struct SymbolTable {
    symbols: Arena<Symbol>,
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            symbols: Arena::new(),
            scopes: vec![Scope::new(false)],
        }
    }

    pub fn push_scope(&mut self, is_function_scope: bool) {
        self.scopes.push(Scope::new(is_function_scope));
    }

    /// Pops the innermost scope. Panics if called at file scope, which is a
    /// compiler-internal invariant violation, not a user-facing error.
    pub fn pop_scope(&mut self) -> Scope {
        assert!(self.scopes.len() > 1, "cannot pop file scope");
        self.scopes.pop().expect("just checked non-empty")
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_file_scope(&self) -> bool {
        self.scopes.len() == 1
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("file scope always present")
    }

    fn current(&self) -> &Scope {
        self.scopes.last().expect("file scope always present")
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        self.symbols.get(id)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        self.symbols.get_mut(id)
    }

    /// Declares `name` in the current scope. Returns `Err(existing)` without
    /// modifying the table if `name` already names something in this exact
    /// scope (the caller decides whether that is a redefinition error or,
    /// for a `extern` re-declaration, a benign merge).
    pub fn declare(
        &mut self,
        name: Atom,
        kind: SymbolKind,
        ty: TypeId,
        storage: StorageClass,
    ) -> Result<SymbolId, SymbolId> {
        if let Some(&existing) = self.current().names.get(&name) {
            return Err(existing);
        }
        let is_local = !self.is_file_scope();
        let id = self.symbols.alloc(Symbol {
            name,
            kind,
            ty,
            storage,
            defined: false,
            is_local,
            enum_value: None,
        });
        self.current_mut().names.insert(name, id);
        Ok(id)
    }

    /// Looks up `name` starting at the innermost scope and walking outward.
    pub fn lookup(&self, name: Atom) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.names.get(&name).copied())
    }

    pub fn lookup_in_current_scope(&self, name: Atom) -> Option<SymbolId> {
        self.current().names.get(&name).copied()
    }

    /// Declares a tag (`struct`/`union`/`enum` name) in the current scope.
    /// Per `c2js-types`' I-T2, a fresh `TypeId` is expected here for every
    /// new tag: this call does not itself decide "already declared," the
    /// caller should `lookup_tag_in_current_scope` first.
    pub fn declare_tag(&mut self, name: Atom, ty: TypeId) {
        self.current_mut().tags.insert(name, ty);
    }

    pub fn lookup_tag(&self, name: Atom) -> Option<TypeId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.tags.get(&name).copied())
    }

    pub fn lookup_tag_in_current_scope(&self, name: Atom) -> Option<TypeId> {
        self.current().tags.get(&name).copied()
    }

    /// Declares a `goto` label. Labels live in the nearest enclosing
    /// function scope regardless of how many blocks are nested inside it
    /// (GLOSSARY: function scope is the label namespace).
    pub fn declare_label(&mut self, name: Atom, info: LabelInfo) -> Result<(), LabelInfo> {
        let scope = self
            .scopes
            .iter_mut()
            .rev()
            .find(|s| s.is_function_scope)
            .expect("label declared outside any function scope");
        if let Some(existing) = scope.labels.get(&name) {
            return Err(existing.clone());
        }
        scope.labels.insert(name, info);
        Ok(())
    }

    pub fn lookup_label(&self, name: Atom) -> Option<&LabelInfo> {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.is_function_scope)
            .and_then(|s| s.labels.get(&name))
    }
}

#[cfg(test)]
#[path = "../tests/symtab_tests.rs"]
mod symtab_tests;
