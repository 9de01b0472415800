//! Expression type computation (spec.md §4.4): post-order over an
//! expression's children before the expression itself, per SPEC_FULL §4.4.

use c2js_common::span::Span;
use c2js_parser::{AssignOp, BinOp, Designator, NodeId, NodeKind, UnaryOp};
use c2js_symtab::StorageClass;
use c2js_types::{TypeId, TypeKind};

use crate::checker::Checker;

impl<'a> Checker<'a> {
    /// Computes and records `id`'s decayed ("as used") type, returning it.
    pub(crate) fn check_expr(&mut self, id: NodeId) -> TypeId {
        let raw = self.compute_raw_type(id);
        let used = self.decay(raw);
        self.record_type(id, used)
    }

    /// Like [`Checker::check_expr`] but returns the *undecayed* type, for the
    /// two contexts the GLOSSARY's decay rule explicitly exempts: the
    /// operand of `sizeof` and of unary `&`. The node's entry in `ExprTypes`
    /// still holds the decayed type, for codegen sites that don't care.
    pub(crate) fn check_expr_undecayed(&mut self, id: NodeId) -> TypeId {
        let raw = self.compute_raw_type(id);
        let used = self.decay(raw);
        self.record_type(id, used);
        raw
    }

    fn compute_raw_type(&mut self, id: NodeId) -> TypeId {
        let span = self.ast.get(id).span;
        match self.ast.get(id).kind.clone() {
            NodeKind::IntLit { ty, .. } | NodeKind::FloatLit { ty, .. } | NodeKind::CharLit { ty, .. } => ty,
            NodeKind::StringLit { ty, .. } => ty,
            NodeKind::Ident { symbol, .. } => self.symtab.get(symbol).ty,
            NodeKind::Paren { inner } => self.compute_raw_type(inner),
            NodeKind::Comma { lhs, rhs } => {
                self.check_expr(lhs);
                self.check_expr(rhs)
            }
            NodeKind::Assign { op, lhs, rhs } => self.check_assign(span, op, lhs, rhs),
            NodeKind::Binary { op, lhs, rhs } => self.check_binary(span, op, lhs, rhs),
            NodeKind::Unary { op, operand } => self.check_unary(span, op, operand),
            NodeKind::PreIncDec { operand, .. } | NodeKind::PostIncDec { operand, .. } => {
                let ty = self.check_expr(operand);
                if !self.is_lvalue(operand) {
                    self.error_type(span, "increment/decrement requires a modifiable lvalue");
                }
                ty
            }
            NodeKind::Ternary { cond, then_branch, else_branch } => {
                let cond_ty = self.check_expr(cond);
                if !self.types.get(cond_ty).is_scalar() {
                    self.error_type(span, "condition of '?:' must have scalar type");
                }
                let then_ty = self.check_expr(then_branch);
                let else_ty = self.check_expr(else_branch);
                if self.types.get(then_ty).is_arithmetic() && self.types.get(else_ty).is_arithmetic() {
                    self.types.usual_arithmetic_conversion(then_ty, else_ty)
                } else {
                    then_ty
                }
            }
            NodeKind::Member { base, field } => self.check_member(span, base, field, false),
            NodeKind::PtrMember { base, field } => self.check_member(span, base, field, true),
            NodeKind::Subscript { base, index } => self.check_subscript(span, base, index),
            NodeKind::Call { callee, args } => self.check_call(span, callee, &args),
            NodeKind::Cast { ty, operand } => {
                self.check_expr(operand);
                ty
            }
            NodeKind::SizeofExpr { operand } => {
                self.check_expr_undecayed(operand);
                self.types.long(false)
            }
            NodeKind::SizeofType { .. } => self.types.long(false),
            NodeKind::CompoundLiteral { ty, init } => {
                self.check_initializer(init, ty);
                ty
            }
            NodeKind::InitList { elements } => {
                // An `InitList` reached directly (not through a declaration or
                // compound literal, e.g. a malformed nested brace) has no
                // target type to check elements against; just type each
                // element so codegen has something to consult.
                for el in elements {
                    self.check_expr(el);
                }
                self.types.int(true)
            }
            NodeKind::Designated { init, .. } => self.check_expr(init),
            other => unreachable!("{other:?} is not an expression node"),
        }
    }

    fn check_assign(&mut self, span: Span, op: AssignOp, lhs: NodeId, rhs: NodeId) -> TypeId {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        if !self.is_lvalue(lhs) {
            self.error_type(span, "assignment requires a modifiable lvalue");
            return lhs_ty;
        }
        let rhs_span = self.ast.get(rhs).span;
        let converted_rhs_ty = if op == AssignOp::Assign {
            rhs_ty
        } else {
            // `a += b` behaves as `a = a + b` for the rule's purposes: the
            // arithmetic result, not the bare rhs type, is what converts.
            self.types.usual_arithmetic_conversion(lhs_ty, rhs_ty)
        };
        self.convert_to(rhs, rhs_span, converted_rhs_ty, lhs_ty);
        lhs_ty
    }

    fn check_binary(&mut self, span: Span, op: BinOp, lhs: NodeId, rhs: NodeId) -> TypeId {
        let lhs_ty = self.check_expr(lhs);
        let rhs_ty = self.check_expr(rhs);
        match op {
            BinOp::LogAnd | BinOp::LogOr => {
                if !self.types.get(lhs_ty).is_scalar() || !self.types.get(rhs_ty).is_scalar() {
                    self.error_type(span, "operands of '&&'/'||' must have scalar type");
                }
                self.types.int(true)
            }
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => {
                self.types.int(true)
            }
            BinOp::Add | BinOp::Sub => {
                let lp = self.types.get(lhs_ty).is_pointer();
                let rp = self.types.get(rhs_ty).is_pointer();
                if lp && rp {
                    if op == BinOp::Sub {
                        self.types.long(true)
                    } else {
                        self.error_type(span, "cannot add two pointers");
                        lhs_ty
                    }
                } else if lp {
                    lhs_ty
                } else if rp {
                    rhs_ty
                } else {
                    self.types.usual_arithmetic_conversion(lhs_ty, rhs_ty)
                }
            }
            _ => self.types.usual_arithmetic_conversion(lhs_ty, rhs_ty),
        }
    }

    fn check_unary(&mut self, span: Span, op: UnaryOp, operand: NodeId) -> TypeId {
        match op {
            UnaryOp::AddrOf => {
                if !self.is_lvalue(operand) {
                    self.error_type(span, "cannot take the address of a non-lvalue");
                }
                if let NodeKind::Ident { symbol, .. } = self.ast.get(operand).kind.clone() {
                    if self.symtab.get(symbol).storage == StorageClass::Register {
                        let name = self.session.resolve(self.symtab.get(symbol).name).to_string();
                        self.warning_semantic(span, format!("address of register-qualified '{name}' is taken"));
                    }
                }
                let raw = self.check_expr_undecayed(operand);
                self.types.pointer(raw, c2js_types::Qualifiers::empty())
            }
            UnaryOp::Deref => {
                let ty = self.check_expr(operand);
                match self.types.get(ty).kind.clone() {
                    TypeKind::Ptr(inner) => inner,
                    _ => {
                        self.error_type(span, "cannot dereference a non-pointer value");
                        self.types.int(true)
                    }
                }
            }
            UnaryOp::Not => {
                let ty = self.check_expr(operand);
                if !self.types.get(ty).is_scalar() {
                    self.error_type(span, "operand of '!' must have scalar type");
                }
                self.types.int(true)
            }
            UnaryOp::Plus | UnaryOp::Neg | UnaryOp::BitNot => {
                let ty = self.check_expr(operand);
                if self.types.get(ty).is_floating() {
                    ty
                } else {
                    self.types.integer_promote(ty)
                }
            }
        }
    }

    fn check_member(&mut self, span: Span, base: NodeId, field: c2js_common::interner::Atom, via_pointer: bool) -> TypeId {
        let base_ty = self.check_expr(base);
        let agg_ty = if via_pointer {
            match self.types.get(base_ty).kind.clone() {
                TypeKind::Ptr(inner) => inner,
                _ => {
                    self.error_type(span, "member reference base type is not a pointer");
                    return self.types.int(true);
                }
            }
        } else {
            base_ty
        };
        let member_ty = match self.types.get(agg_ty).kind.clone() {
            TypeKind::Struct(agg) | TypeKind::Union(agg) => {
                Ok(agg.members.iter().find(|m| m.name == field).map(|m| m.ty))
            }
            _ => Err(()),
        };
        match member_ty {
            Ok(Some(ty)) => ty,
            Ok(None) => {
                let name = self.session.resolve(field).to_string();
                self.error_type(span, format!("no member named '{name}'"));
                self.types.int(true)
            }
            Err(()) => {
                self.error_type(span, "member access on a non-struct/union type");
                self.types.int(true)
            }
        }
    }

    fn check_subscript(&mut self, span: Span, base: NodeId, index: NodeId) -> TypeId {
        let base_ty = self.check_expr(base);
        self.check_expr(index);
        match self.types.get(base_ty).kind.clone() {
            TypeKind::Ptr(inner) => inner,
            _ => {
                self.error_type(span, "subscripted value is not a pointer or array");
                self.types.int(true)
            }
        }
    }

    fn check_call(&mut self, span: Span, callee: NodeId, args: &[NodeId]) -> TypeId {
        let callee_ty = self.check_expr(callee);
        let func_data = match &self.types.get(callee_ty).kind {
            TypeKind::Ptr(inner) => match &self.types.get(*inner).kind {
                TypeKind::Function(data) => Some(data.clone()),
                _ => None,
            },
            TypeKind::Function(data) => Some(data.clone()),
            _ => None,
        };
        let Some(func_data) = func_data else {
            self.error_type(span, "called object is not a function");
            for &a in args {
                self.check_expr(a);
            }
            return self.types.int(true);
        };
        for (i, &arg) in args.iter().enumerate() {
            let arg_ty = self.check_expr(arg);
            let arg_span = self.ast.get(arg).span;
            match func_data.params.get(i) {
                Some(&param_ty) => self.convert_to(arg, arg_span, arg_ty, param_ty),
                None => {
                    // Variadic argument, or no prototype: default argument
                    // promotions only, no specific target type (§4.4).
                    let promoted = self.default_argument_promote(arg_ty);
                    if promoted != arg_ty {
                        self.casts.insert(arg, promoted);
                    }
                }
            }
        }
        if args.len() < func_data.params.len() {
            self.error_type(span, "too few arguments in call");
        } else if args.len() > func_data.params.len() && !func_data.variadic {
            self.error_type(span, "too many arguments in call");
        }
        func_data.return_type
    }

    /// Typechecks an initializer (`= expr` or `= { ... }`) against a
    /// declaration's or compound literal's target type, inserting conversions
    /// element-by-element for a brace initializer (spec.md §4.4's
    /// "initializer" conversion site).
    pub(crate) fn check_initializer(&mut self, init: NodeId, target_ty: TypeId) {
        let init_span = self.ast.get(init).span;
        if let NodeKind::InitList { elements } = self.ast.get(init).kind.clone() {
            self.record_type(init, target_ty);
            match &self.types.get(target_ty).kind.clone() {
                TypeKind::Array(arr) => {
                    let element_ty = arr.element;
                    for el in elements {
                        self.check_initializer_element(el, element_ty);
                    }
                }
                TypeKind::Struct(agg) | TypeKind::Union(agg) => {
                    let members = agg.members.clone();
                    let mut positional = 0usize;
                    for el in elements {
                        let member_ty = match &self.ast.get(el).kind {
                            NodeKind::Designated { designator: Designator::Field(name), .. } => {
                                members.iter().find(|m| m.name == *name).map(|m| m.ty)
                            }
                            _ => {
                                let ty = members.get(positional).map(|m| m.ty);
                                positional += 1;
                                ty
                            }
                        };
                        match member_ty {
                            Some(ty) => self.check_initializer_element(el, ty),
                            None => {
                                self.check_expr(el);
                            }
                        }
                    }
                }
                _ => {
                    for el in elements {
                        self.check_initializer_element(el, target_ty);
                    }
                }
            }
            return;
        }
        let init_ty = self.check_expr(init);
        self.convert_to(init, init_span, init_ty, target_ty);
    }

    fn check_initializer_element(&mut self, el: NodeId, target_ty: TypeId) {
        if let NodeKind::Designated { init, .. } = self.ast.get(el).kind.clone() {
            self.check_initializer(init, target_ty);
            self.record_type(el, target_ty);
        } else {
            self.check_initializer(el, target_ty);
        }
    }
}

#[cfg(test)]
#[path = "../tests/expr_tests.rs"]
mod tests;
