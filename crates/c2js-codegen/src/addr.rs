//! Address computation (spec.md §4.5 "Address computation"): every lvalue
//! lowers to a JavaScript expression evaluating to its byte offset in the
//! runtime's linear memory.

use c2js_parser::{NodeId, NodeKind, UnaryOp};
use c2js_types::{TypeId, TypeKind};

use crate::emitter::Emitter;

impl<'a> Emitter<'a> {
    pub(crate) fn expr_type(&self, id: NodeId) -> TypeId {
        *self
            .check
            .expr_types
            .get(&id)
            .unwrap_or_else(|| unreachable!("semantic analysis types every expression node"))
    }

    fn member_offset(&self, agg_ty: TypeId, field: c2js_common::interner::Atom) -> u32 {
        match &self.types.get(agg_ty).kind {
            TypeKind::Struct(agg) | TypeKind::Union(agg) => agg
                .members
                .iter()
                .find(|m| m.name == field)
                .map(|m| m.offset)
                .unwrap_or_else(|| unreachable!("sema already validated this member exists")),
            _ => unreachable!("sema already validated this is a struct/union"),
        }
    }

    /// The address expression for an lvalue node (spec.md §4.5's
    /// identifier/dereference/member/subscript address rules).
    pub(crate) fn addr_of(&mut self, id: NodeId) -> String {
        match self.ast.get(id).kind.clone() {
            NodeKind::Ident { symbol, .. } => self.symbol_addr(symbol),
            NodeKind::Unary { op: UnaryOp::Deref, operand } => self.emit_expr(operand),
            NodeKind::Member { base, field } => {
                let base_addr = self.addr_of(base);
                let base_ty = self.expr_type(base);
                let offset = self.member_offset(base_ty, field);
                format!("({base_addr} + {offset})")
            }
            NodeKind::PtrMember { base, field } => {
                let base_val = self.emit_expr(base);
                let ptr_ty = self.expr_type(base);
                let pointee = match self.types.get(ptr_ty).kind {
                    TypeKind::Ptr(inner) => inner,
                    _ => unreachable!("sema already validated this is a pointer"),
                };
                let offset = self.member_offset(pointee, field);
                format!("({base_val} + {offset})")
            }
            NodeKind::Subscript { base, index } => {
                let base_val = self.emit_expr(base);
                let index_val = self.emit_expr(index);
                let base_ty = self.expr_type(base);
                let elem = match self.types.get(base_ty).kind {
                    TypeKind::Ptr(inner) => inner,
                    _ => unreachable!("sema already validated this is a pointer/array"),
                };
                let elem_size = self.types.get(elem).size.max(1);
                format!("({base_val} + ({index_val}) * {elem_size})")
            }
            NodeKind::Paren { inner } => self.addr_of(inner),
            NodeKind::CompoundLiteral { ty, init } => {
                // Materialized once, as a fresh global-region temporary
                // (simplification: a compound literal used as an lvalue is
                // rare enough outside initializer position to not warrant
                // stack-frame placement), with its writes wrapped in an IIFE
                // so the literal can still appear inside a larger expression.
                let data = self.types.get(ty);
                let (size, align) = (data.size.max(1), data.align.max(1));
                let aligned = (self.next_global_offset + align - 1) / align * align;
                self.next_global_offset = aligned + size;
                let init_code = self.emit_initializer(format!("{aligned}"), ty, init);
                format!("(function(){{ {init_code}return {aligned}; }})()")
            }
            other => unreachable!("{other:?} is not an lvalue (sema should have rejected it)"),
        }
    }
}

#[cfg(test)]
#[path = "../tests/addr_tests.rs"]
mod tests;
