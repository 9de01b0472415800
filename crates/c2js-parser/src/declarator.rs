//! Declarator construction and resolution (spec.md §4.3 "Declarators"):
//! "a declarator binds a name and a type derived from a base type by
//! prepending pointer levels and appending array/function suffixes." This
//! module splits that into two phases, per SPEC_FULL §4.3: `parse_declarator`
//! (in `parser.rs`) builds the `Declarator` tree below in a single forward
//! pass with no re-lexing, and [`resolve`] walks that tree against a known
//! base type once the declaration specifiers have been parsed.
//!
//! A parenthesized declarator changes which suffixes bind to which pointers
//! (`int *a[3]` is an array of pointers, `int (*a)[3]` is a pointer to an
//! array) — [`DeclaratorCore::Grouped`] carries that grouping explicitly so
//! [`resolve`] can apply suffixes to the right base before recursing inward,
//! matching the classic C "declarator reading" rule without ever needing to
//! re-scan tokens.

use c2js_common::interner::Atom;
use c2js_common::span::Span;
use c2js_types::{ExprRef, FunctionData, Qualifiers, TypeId, TypeRegistry};

#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Option<Atom>,
    pub ty: TypeId,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum DeclaratorSuffix {
    /// `[size]`; `size: None, vla: false` is an incomplete array (`int a[];`,
    /// completed later from an initializer); `vla: true` records a
    /// non-constant size expression deferred to `c2js-sema`.
    Array { size: Option<i64>, vla_size: Option<ExprRef> },
    Function { params: Vec<ParamDecl>, variadic: bool, old_style_kr: bool },
}

#[derive(Clone, Debug)]
pub enum DeclaratorCore {
    Name(Option<Atom>, Span),
    Grouped(Box<Declarator>),
}

#[derive(Clone, Debug)]
pub struct DirectDeclarator {
    pub core: DeclaratorCore,
    pub suffixes: Vec<DeclaratorSuffix>,
}

#[derive(Clone, Debug)]
pub struct Declarator {
    pub pointers: Vec<Qualifiers>,
    pub direct: DirectDeclarator,
}

fn apply_suffix(reg: &mut TypeRegistry, base: TypeId, suffix: &DeclaratorSuffix) -> TypeId {
    match suffix {
        DeclaratorSuffix::Array { size: Some(n), .. } => reg.array(base, *n),
        DeclaratorSuffix::Array { size: None, vla_size: Some(expr) } => reg.vla(base, Some(*expr)),
        DeclaratorSuffix::Array { size: None, vla_size: None } => reg.array(base, -1),
        DeclaratorSuffix::Function { params, variadic, old_style_kr } => reg.function(FunctionData {
            return_type: base,
            params: params.iter().map(|p| p.ty).collect(),
            variadic: *variadic,
            old_style_kr: *old_style_kr,
        }),
    }
}

/// Resolve `declarator` against `base`, returning the declared type, the
/// declared name (`None` for an abstract declarator), and the name's span
/// (or the declarator's own span if abstract).
pub fn resolve(reg: &mut TypeRegistry, base: TypeId, declarator: &Declarator) -> (TypeId, Option<Atom>, Span) {
    match &declarator.direct.core {
        DeclaratorCore::Name(name, span) => {
            let mut ty = base;
            for q in &declarator.pointers {
                ty = reg.pointer(ty, *q);
            }
            for suffix in &declarator.direct.suffixes {
                ty = apply_suffix(reg, ty, suffix);
            }
            (ty, *name, *span)
        }
        DeclaratorCore::Grouped(inner) => {
            let mut effective_base = base;
            for suffix in &declarator.direct.suffixes {
                effective_base = apply_suffix(reg, effective_base, suffix);
            }
            let (mut ty, name, span) = resolve(reg, effective_base, inner);
            for q in &declarator.pointers {
                ty = reg.pointer(ty, *q);
            }
            (ty, name, span)
        }
    }
}

/// Parameters attached to the outermost function suffix of `declarator`, if
/// its direct-declarator ends in one — used by the caller to bind parameter
/// symbols when this declarator turns out to introduce a function definition.
pub fn outermost_params(declarator: &Declarator) -> Option<&[ParamDecl]> {
    match &declarator.direct.core {
        DeclaratorCore::Name(..) => declarator.direct.suffixes.iter().find_map(|s| match s {
            DeclaratorSuffix::Function { params, .. } => Some(params.as_slice()),
            _ => None,
        }),
        DeclaratorCore::Grouped(inner) => {
            if declarator.direct.suffixes.is_empty() {
                outermost_params(inner)
            } else {
                declarator.direct.suffixes.iter().find_map(|s| match s {
                    DeclaratorSuffix::Function { params, .. } => Some(params.as_slice()),
                    _ => None,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/declarator_tests.rs"]
mod tests;
