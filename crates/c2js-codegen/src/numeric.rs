//! Numeric lowering (spec.md §4.5 "Numeric lowering"): which of JavaScript's
//! two native numeric towers represents a C value, and the typed
//! memory-access primitive the runtime exposes for it.

use c2js_types::{TypeId, TypeKind, TypeRegistry};

/// Which evaluation mode a binary operator (or a scalar's storage) uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumMode {
    /// `double`/`long double`: stored as BigInt raw IEEE-754 bits, unwrapped
    /// to a `Number` to compute, rewrapped to store.
    F64Bits,
    /// `long long`/`unsigned long long`: a native BigInt used as a 64-bit
    /// integer.
    U64,
    /// Everything else: a plain `Number`, masked/truncated on store.
    Number,
}

pub fn mode_of(types: &TypeRegistry, ty: TypeId) -> NumMode {
    match types.get(ty).kind {
        TypeKind::Double | TypeKind::LongDouble => NumMode::F64Bits,
        TypeKind::LongLong => NumMode::U64,
        _ => NumMode::Number,
    }
}

/// The runtime's typed getter/setter pair for a scalar type's memory slot,
/// and the integer mask width to apply after assigning through a `Number`
/// setter (spec.md §4.5's "final narrowing" rule). Aggregates and functions
/// have no scalar accessor; callers go through `memcpy`/pointer decay
/// instead.
pub struct ScalarAccess {
    pub getter: &'static str,
    pub setter: &'static str,
}

pub fn scalar_access(types: &TypeRegistry, ty: TypeId) -> Option<ScalarAccess> {
    let data = types.get(ty);
    if data.is_pointer() {
        return Some(ScalarAccess { getter: "readUint32", setter: "writeUint32" });
    }
    match data.kind {
        TypeKind::Bool => Some(ScalarAccess { getter: "readUint8", setter: "writeUint8" }),
        TypeKind::Char => {
            if data.signed {
                Some(ScalarAccess { getter: "readInt8", setter: "writeInt8" })
            } else {
                Some(ScalarAccess { getter: "readUint8", setter: "writeUint8" })
            }
        }
        TypeKind::Short => {
            if data.signed {
                Some(ScalarAccess { getter: "readInt16", setter: "writeInt16" })
            } else {
                Some(ScalarAccess { getter: "readUint16", setter: "writeUint16" })
            }
        }
        TypeKind::Int | TypeKind::Long | TypeKind::Enum(_) => {
            if data.signed {
                Some(ScalarAccess { getter: "readInt32", setter: "writeInt32" })
            } else {
                Some(ScalarAccess { getter: "readUint32", setter: "writeUint32" })
            }
        }
        TypeKind::LongLong => {
            if data.signed {
                Some(ScalarAccess { getter: "readBigInt64", setter: "writeBigInt64" })
            } else {
                Some(ScalarAccess { getter: "readBigUint64", setter: "writeBigUint64" })
            }
        }
        TypeKind::Float => Some(ScalarAccess { getter: "readFloat32", setter: "writeFloat32" }),
        TypeKind::Double | TypeKind::LongDouble => {
            // Raw IEEE-754 bits, stored through the same 64-bit accessor as
            // signed `long long` and converted at the boundary via
            // `rt.f64`/`rt.f64bits` (spec.md §6).
            Some(ScalarAccess { getter: "readBigInt64", setter: "writeBigInt64" })
        }
        _ => None,
    }
}

/// Wraps a raw JS expression `expr` computing a `Number`/BigInt value so it
/// is safely narrowed to `ty`'s width before being written through its
/// setter — the "masking on assignment" rule (spec.md §4.5).
pub fn mask_for_store(types: &TypeRegistry, ty: TypeId, expr: &str) -> String {
    let data = types.get(ty);
    match data.kind {
        TypeKind::Bool => format!("(({expr}) !== 0 ? 1 : 0)"),
        TypeKind::Char if data.signed => format!("(({expr}) << 24 >> 24)"),
        TypeKind::Char => format!("(({expr}) & 0xff)"),
        TypeKind::Short if data.signed => format!("(({expr}) << 16 >> 16)"),
        TypeKind::Short => format!("(({expr}) & 0xffff)"),
        TypeKind::Int | TypeKind::Long if data.signed => format!("(({expr}) | 0)"),
        TypeKind::Int | TypeKind::Long => format!("(({expr}) >>> 0)"),
        _ => expr.to_string(),
    }
}

/// Lifts a JS expression for an integer/pointer value to `BigInt` for
/// `long long` arithmetic (spec.md §4.5's u64 mode).
pub fn bigint_lift(expr: &str) -> String {
    format!("BigInt({expr})")
}

/// Unwraps a raw-bits `double` slot (already a `BigInt`) into the `Number`
/// used to compute on, via the runtime's bit-reinterpret helper.
pub fn unwrap_double(expr: &str) -> String {
    format!("rt.f64({expr})")
}

/// Rewraps a computed `Number` back into the raw-bits `BigInt` storage
/// representation of a `double`.
pub fn wrap_double(expr: &str) -> String {
    format!("rt.f64bits({expr})")
}

#[cfg(test)]
#[path = "../tests/numeric_tests.rs"]
mod tests;
