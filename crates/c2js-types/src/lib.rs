//! The C99 type registry (spec.md §3 "Type", §4.3 layout rules).
//!
//! Types are arena-allocated and referenced by [`TypeId`], a `Copy` index.
//! Primitive types are process-/session-wide singletons (invariant I-T1):
//! [`TypeRegistry`] caches one [`TypeId`] per primitive kind+signedness and
//! hands out the same id on every call, so `TypeId` equality is exactly type
//! identity for primitives. A struct/union tag resolves to exactly one type
//! object per scope (I-T2) — callers (the parser, consulting the symbol
//! table's tag namespace) are responsible for not re-registering a tag that
//! already has a type in the current scope; two calls to
//! [`TypeRegistry::new_struct`] always produce two distinct, incompatible
//! `TypeId`s, which is what makes same-named tags in different scopes
//! incompatible even with identical layout.

pub mod layout;
pub mod qualifiers;

use c2js_common::arena::{Arena, ArenaIndex};
use c2js_common::interner::Atom;
use smallvec::SmallVec;

pub use qualifiers::Qualifiers;

pub type TypeId = ArenaIndex<TypeData>;

/// Index of an as-yet-unevaluated AST expression, used for VLA size
/// expressions and bitfield widths before constant folding. Opaque here
/// because `c2js-types` sits below `c2js-parser` in the dependency order
/// (§2); the parser's `NodeId` is reinterpreted from this raw index.
pub type ExprRef = u32;

/// The discriminant kinds from spec.md §3, one variant per listed kind.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeKind {
    Void,
    Bool,
    Char,
    Short,
    Int,
    Long,
    LongLong,
    Float,
    Double,
    LongDouble,
    Enum(EnumData),
    Ptr(TypeId),
    Array(ArrayData),
    Vla(VlaData),
    Struct(AggregateData),
    Union(AggregateData),
    Function(FunctionData),
    Complex(TypeId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumData {
    pub tag: Option<Atom>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    pub element: TypeId,
    /// Element count; negative means an incomplete array type (`int a[];`).
    pub count: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VlaData {
    pub element: TypeId,
    pub size_expr: Option<ExprRef>,
}

/// A struct/union member (spec.md §3 "Member"). Anonymous struct/union
/// members are flattened by the parser before being pushed here, so lookup
/// in `AggregateData::members` is always one level deep.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: Atom,
    pub ty: TypeId,
    pub offset: u32,
    /// Bit width, or `-1` if this member is not a bitfield.
    pub bit_width: i32,
    pub bit_offset: u32,
    pub index: u32,
}

impl Member {
    pub fn is_bitfield(&self) -> bool {
        self.bit_width >= 0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregateData {
    pub tag: Option<Atom>,
    pub members: SmallVec<[Member; 8]>,
    pub size: u32,
    pub align: u32,
    pub flexible_array_member: bool,
    pub complete: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionData {
    pub return_type: TypeId,
    pub params: SmallVec<[TypeId; 4]>,
    pub variadic: bool,
    /// K&R declarator: parameter names but no parameter types (GLOSSARY).
    pub old_style_kr: bool,
}

/// A type object: the kind plus the common attributes every kind carries
/// (byte size, alignment, signedness, qualifiers, inline flag).
#[derive(Clone, Debug, PartialEq)]
pub struct TypeData {
    pub kind: TypeKind,
    pub size: u32,
    pub align: u32,
    pub signed: bool,
    pub qualifiers: Qualifiers,
    pub inline: bool,
}

impl TypeData {
    pub fn is_integer(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Bool
                | TypeKind::Char
                | TypeKind::Short
                | TypeKind::Int
                | TypeKind::Long
                | TypeKind::LongLong
                | TypeKind::Enum(_)
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Float | TypeKind::Double | TypeKind::LongDouble
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_scalar(&self) -> bool {
        self.is_arithmetic() || matches!(self.kind, TypeKind::Ptr(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Ptr(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(self.kind, TypeKind::Void)
    }

    pub fn is_complete(&self) -> bool {
        match &self.kind {
            TypeKind::Void => false,
            TypeKind::Array(a) => a.count >= 0,
            TypeKind::Struct(a) | TypeKind::Union(a) => a.complete,
            _ => true,
        }
    }

    /// Integer conversion rank, used by the usual arithmetic conversions
    /// (spec.md §4.4). Higher rank wins between integer types of the same
    /// signedness; `Bool` is lowest, `LongLong` highest.
    pub fn integer_rank(&self) -> u8 {
        match self.kind {
            TypeKind::Bool => 0,
            TypeKind::Char => 1,
            TypeKind::Short => 2,
            TypeKind::Int => 3,
            TypeKind::Enum(_) => 3,
            TypeKind::Long => 4,
            TypeKind::LongLong => 5,
            _ => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PrimKey {
    kind: u8,
    signed: bool,
}

const K_VOID: u8 = 0;
const K_BOOL: u8 = 1;
const K_CHAR: u8 = 2;
const K_SHORT: u8 = 3;
const K_INT: u8 = 4;
const K_LONG: u8 = 5;
const K_LONGLONG: u8 = 6;
const K_FLOAT: u8 = 7;
const K_DOUBLE: u8 = 8;
const K_LONGDOUBLE: u8 = 9;

/// Owns every `TypeData` allocated during one compilation and caches
/// primitive singletons (I-T1).
pub struct TypeRegistry {
    arena: Arena<TypeData>,
    primitives: rustc_hash::FxHashMap<PrimKey, TypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry {
            arena: Arena::new(),
            primitives: rustc_hash::FxHashMap::default(),
        }
    }

    pub fn get(&self, id: TypeId) -> &TypeData {
        self.arena.get(id)
    }

    fn primitive(&mut self, kind: u8, signed: bool, size: u32, align: u32, tkind: TypeKind) -> TypeId {
        let key = PrimKey { kind, signed };
        if let Some(&id) = self.primitives.get(&key) {
            return id;
        }
        let id = self.arena.alloc(TypeData {
            kind: tkind,
            size,
            align,
            signed,
            qualifiers: Qualifiers::empty(),
            inline: false,
        });
        self.primitives.insert(key, id);
        id
    }

    pub fn void(&mut self) -> TypeId {
        self.primitive(K_VOID, false, 0, 1, TypeKind::Void)
    }
    pub fn bool_(&mut self) -> TypeId {
        self.primitive(K_BOOL, false, 1, 1, TypeKind::Bool)
    }
    pub fn char_(&mut self, signed: bool) -> TypeId {
        self.primitive(K_CHAR, signed, 1, 1, TypeKind::Char)
    }
    pub fn short(&mut self, signed: bool) -> TypeId {
        self.primitive(K_SHORT, signed, 2, 2, TypeKind::Short)
    }
    pub fn int(&mut self, signed: bool) -> TypeId {
        self.primitive(K_INT, signed, 4, 4, TypeKind::Int)
    }
    /// `sizeof(long) == 4`, fixed by invariant I-T3 to match the memory model.
    pub fn long(&mut self, signed: bool) -> TypeId {
        self.primitive(K_LONG, signed, 4, 4, TypeKind::Long)
    }
    /// `sizeof(long long) == 8`, fixed by invariant I-T3.
    pub fn long_long(&mut self, signed: bool) -> TypeId {
        self.primitive(K_LONGLONG, signed, 8, 8, TypeKind::LongLong)
    }
    pub fn float(&mut self) -> TypeId {
        self.primitive(K_FLOAT, true, 4, 4, TypeKind::Float)
    }
    pub fn double(&mut self) -> TypeId {
        self.primitive(K_DOUBLE, true, 8, 8, TypeKind::Double)
    }
    pub fn long_double(&mut self) -> TypeId {
        self.primitive(K_LONGDOUBLE, true, 8, 8, TypeKind::LongDouble)
    }

    /// `sizeof(ptr) == 4`, fixed by invariant I-T3.
    pub fn pointer(&mut self, base: TypeId, qualifiers: Qualifiers) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Ptr(base),
            size: 4,
            align: 4,
            signed: false,
            qualifiers,
            inline: false,
        })
    }

    pub fn array(&mut self, element: TypeId, count: i64) -> TypeId {
        let elem_size = self.get(element).size;
        let size = if count >= 0 {
            elem_size.saturating_mul(count as u32)
        } else {
            0
        };
        self.arena.alloc(TypeData {
            kind: TypeKind::Array(ArrayData { element, count }),
            size,
            align: self.get(element).align,
            signed: false,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    pub fn vla(&mut self, element: TypeId, size_expr: Option<ExprRef>) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Vla(VlaData { element, size_expr }),
            size: 0,
            align: self.get(element).align,
            signed: false,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    /// Creates a fresh, incomplete struct type for a new tag declaration.
    /// Per I-T2 this is never cached: the caller (parser + symbol table's
    /// tag namespace) is the single source of truth for "does this tag
    /// already have a type in this scope."
    pub fn new_struct(&mut self, tag: Option<Atom>) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Struct(AggregateData {
                tag,
                members: SmallVec::new(),
                size: 0,
                align: 1,
                flexible_array_member: false,
                complete: false,
            }),
            size: 0,
            align: 1,
            signed: false,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    pub fn new_union(&mut self, tag: Option<Atom>) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Union(AggregateData {
                tag,
                members: SmallVec::new(),
                size: 0,
                align: 1,
                flexible_array_member: false,
                complete: false,
            }),
            size: 0,
            align: 1,
            signed: false,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    pub fn new_enum(&mut self, tag: Option<Atom>) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Enum(EnumData { tag }),
            size: 4,
            align: 4,
            signed: true,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    pub fn function(&mut self, data: FunctionData) -> TypeId {
        self.arena.alloc(TypeData {
            kind: TypeKind::Function(data),
            size: 0,
            align: 1,
            signed: false,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    pub fn complex(&mut self, base: TypeId) -> TypeId {
        let base_size = self.get(base).size;
        self.arena.alloc(TypeData {
            kind: TypeKind::Complex(base),
            size: base_size * 2,
            align: self.get(base).align,
            signed: true,
            qualifiers: Qualifiers::empty(),
            inline: false,
        })
    }

    /// Complete a struct/union's member list and compute layout (spec.md
    /// §4.3 struct/union definitions, §4.5's packing rule, and the layout
    /// module's monotonicity guarantee).
    pub fn complete_aggregate(
        &mut self,
        id: TypeId,
        members: Vec<layout::RawMember>,
        flexible_array_member: bool,
    ) {
        let is_union = matches!(self.get(id).kind, TypeKind::Union(_));
        let laid_out = if is_union {
            layout::layout_union(self, &members)
        } else {
            layout::layout_struct(self, &members)
        };

        let data = self.arena.get_mut(id);
        let agg = match &mut data.kind {
            TypeKind::Struct(a) | TypeKind::Union(a) => a,
            _ => unreachable!("complete_aggregate called on non-aggregate TypeId"),
        };
        agg.members = laid_out.members;
        agg.size = laid_out.size;
        agg.align = laid_out.align;
        agg.flexible_array_member = flexible_array_member;
        agg.complete = true;
        data.size = laid_out.size;
        data.align = laid_out.align;
    }

    pub fn qualified(&mut self, base: TypeId, qualifiers: Qualifiers) -> TypeId {
        if self.get(base).qualifiers == qualifiers {
            return base;
        }
        let mut data = self.get(base).clone();
        data.qualifiers = qualifiers;
        self.arena.alloc(data)
    }

    /// Type compatibility (spec.md §8 "reflexive and symmetric"; I-T4 for
    /// qualified/unqualified variants). Two distinct tagged types are never
    /// compatible even with identical layout (I-T2), which falls out here
    /// because struct/union compares by `TypeId` identity, not by shape.
    pub fn compatible(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let da = self.get(a);
        let db = self.get(b);
        match (&da.kind, &db.kind) {
            (TypeKind::Struct(_), TypeKind::Struct(_)) => false,
            (TypeKind::Union(_), TypeKind::Union(_)) => false,
            (TypeKind::Enum(_), TypeKind::Enum(_)) => false,
            (TypeKind::Ptr(pa), TypeKind::Ptr(pb)) => {
                self.get(*pa).is_void() || self.get(*pb).is_void() || self.compatible(*pa, *pb)
            }
            (TypeKind::Array(aa), TypeKind::Array(ab)) => {
                self.compatible(aa.element, ab.element)
                    && (aa.count < 0 || ab.count < 0 || aa.count == ab.count)
            }
            (TypeKind::Function(fa), TypeKind::Function(fb)) => {
                fa.params.len() == fb.params.len()
                    && fa.variadic == fb.variadic
                    && self.compatible(fa.return_type, fb.return_type)
                    && fa
                        .params
                        .iter()
                        .zip(fb.params.iter())
                        .all(|(&p, &q)| self.compatible(p, q))
            }
            _ => {
                std::mem::discriminant(&da.kind) == std::mem::discriminant(&db.kind)
                    && da.signed == db.signed
            }
        }
    }

    /// Usual arithmetic conversions (spec.md §4.4), commutative by
    /// construction since only the *pair* of ranks/kinds is inspected.
    pub fn usual_arithmetic_conversion(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if self.get(a).kind == TypeKind::LongDouble || self.get(b).kind == TypeKind::LongDouble {
            return self.long_double();
        }
        if self.get(a).kind == TypeKind::Double || self.get(b).kind == TypeKind::Double {
            return self.double();
        }
        if self.get(a).kind == TypeKind::Float || self.get(b).kind == TypeKind::Float {
            return self.float();
        }
        let pa = self.integer_promote(a);
        let pb = self.integer_promote(b);
        let da = self.get(pa);
        let db = self.get(pb);
        let (rank_a, rank_b) = (da.integer_rank(), db.integer_rank());
        if rank_a == rank_b {
            if da.signed == db.signed {
                return pa;
            }
            return if da.signed { pb } else { pa };
        }
        let (higher, higher_rank, lower, lower_signed) = if rank_a > rank_b {
            (pa, rank_a, pb, db.signed)
        } else {
            (pb, rank_b, pa, da.signed)
        };
        let higher_signed = self.get(higher).signed;
        if higher_signed == lower_signed {
            return higher;
        }
        if !higher_signed {
            // higher rank is unsigned: it wins outright.
            return higher;
        }
        // Higher rank is signed, lower is unsigned: unsigned wins unless the
        // signed type strictly dominates the unsigned type's range, which
        // for our fixed widths (I-T3) only happens when ranks differ, so the
        // signed higher-rank type can represent every value of the lower,
        // smaller-rank unsigned type.
        let _ = (higher_rank, lower);
        higher
    }

    /// Integer promotions (spec.md §4.4): below `int` rank promotes to
    /// `int` (or `unsigned int` if the value range would not fit, which for
    /// our representable kinds never applies since char/short always fit in
    /// `int`).
    pub fn integer_promote(&mut self, t: TypeId) -> TypeId {
        let data = self.get(t);
        if data.is_floating() || data.is_pointer() {
            return t;
        }
        match data.kind {
            TypeKind::Bool | TypeKind::Char | TypeKind::Short => self.int(true),
            TypeKind::Enum(_) => self.int(true),
            _ => t,
        }
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod registry_tests;
