//! Decay, lvalue-ness, and implicit-conversion insertion (spec.md §4.4's
//! "Rules" section and GLOSSARY's "Decay" entry).

use c2js_common::span::Span;
use c2js_parser::{NodeId, NodeKind};
use c2js_symtab::SymbolKind;
use c2js_types::{Qualifiers, TypeKind};

use crate::checker::Checker;

impl<'a> Checker<'a> {
    /// Array-to-pointer and function-to-pointer decay, applied at every use
    /// site (not at the declaration) per the GLOSSARY's "Decay" entry.
    pub(crate) fn decay(&mut self, ty: c2js_types::TypeId) -> c2js_types::TypeId {
        match &self.types.get(ty).kind {
            TypeKind::Array(arr) => {
                let element = arr.element;
                self.types.pointer(element, Qualifiers::empty())
            }
            TypeKind::Function(_) => self.types.pointer(ty, Qualifiers::empty()),
            _ => ty,
        }
    }

    /// Whether `id` designates an object whose address can be taken / that
    /// can appear on the left of `=` (spec.md §4.4's "non-lvalue assignment
    /// target" check).
    pub(crate) fn is_lvalue(&self, id: NodeId) -> bool {
        match &self.ast.get(id).kind {
            NodeKind::Ident { symbol, .. } => {
                !matches!(self.symtab.get(*symbol).kind, SymbolKind::EnumConst | SymbolKind::Func)
            }
            NodeKind::Unary { op: c2js_parser::UnaryOp::Deref, .. } => true,
            NodeKind::Member { .. } | NodeKind::PtrMember { .. } | NodeKind::Subscript { .. } => true,
            NodeKind::CompoundLiteral { .. } => true,
            NodeKind::Paren { inner } => self.is_lvalue(*inner),
            _ => false,
        }
    }

    /// Converts an already-typed expression `id` (whose current type is
    /// `from`) to `to`, recording an inserted cast unless the types are
    /// already compatible. Used at every implicit-conversion site spec.md
    /// §4.4 names: assignment, return, argument passing, initializer.
    pub(crate) fn convert_to(
        &mut self,
        id: NodeId,
        span: Span,
        from: c2js_types::TypeId,
        to: c2js_types::TypeId,
    ) {
        if self.types.compatible(from, to) {
            return;
        }
        let from_data = self.types.get(from);
        let to_data = self.types.get(to);
        let (from_arith, from_ptr, from_void) = (from_data.is_arithmetic(), from_data.is_pointer(), from_data.is_void());
        let (to_arith, to_ptr, to_void) = (to_data.is_arithmetic(), to_data.is_pointer(), to_data.is_void());

        let convertible = match (from_arith, from_ptr, from_void, to_arith, to_ptr, to_void) {
            (true, _, false, true, _, false) => true, // arithmetic <-> arithmetic
            (_, true, _, _, true, _) => true,          // pointer <-> pointer (pointee mismatch allowed, as most C compilers only warn)
            (true, _, false, _, true, _) => true,      // integer -> pointer
            (_, true, _, true, _, false) => true,      // pointer -> integer
            _ => false,
        };

        if !convertible {
            self.error_type(span, "type mismatch in implicit conversion");
            return;
        }
        self.casts.insert(id, to);
    }

    /// Default argument promotions applied to variadic call arguments and to
    /// any argument passed where no prototype parameter type is known
    /// (float→double, integer promotions), spec.md §4.4's "Call sites" rule.
    pub(crate) fn default_argument_promote(&mut self, ty: c2js_types::TypeId) -> c2js_types::TypeId {
        if self.types.get(ty).kind == TypeKind::Float {
            return self.types.double();
        }
        self.types.integer_promote(ty)
    }
}

#[cfg(test)]
#[path = "../tests/convert_tests.rs"]
mod tests;
