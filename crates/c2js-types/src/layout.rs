//! Struct/union layout computation (spec.md §4.3 struct/union definitions,
//! §8's "member offsets are monotonically non-decreasing in declaration
//! order" testable property).
//!
//! Bitfield packing order is one of spec.md's named Open Questions; this
//! module fixes the convention documented in DESIGN.md: bitfields pack
//! LSB-first into a storage unit sized to the bitfield's declared type,
//! a member that doesn't fit the remaining bits of the current unit starts
//! a fresh unit aligned to its own type, and a zero-width bitfield forces
//! the next member (bitfield or not) to start a fresh unit without itself
//! occupying storage.

use crate::{Member, TypeId, TypeRegistry};
use smallvec::SmallVec;

/// A member as the parser hands it to [`TypeRegistry::complete_aggregate`],
/// before offsets are known.
pub struct RawMember {
    pub name: c2js_common::interner::Atom,
    pub ty: TypeId,
    /// `None` for an ordinary member, `Some(width)` for a bitfield
    /// (`width == 0` is the anonymous zero-width separator).
    pub bit_width: Option<u32>,
}

pub struct LaidOut {
    pub members: SmallVec<[Member; 8]>,
    pub size: u32,
    pub align: u32,
}

fn align_up(offset: u32, align: u32) -> u32 {
    if align == 0 {
        return offset;
    }
    (offset + align - 1) / align * align
}

pub fn layout_struct(registry: &mut TypeRegistry, raw: &[RawMember]) -> LaidOut {
    let mut members = SmallVec::new();
    let mut cursor: u32 = 0;
    let mut max_align: u32 = 1;

    struct Unit {
        start: u32,
        size: u32,
        bits_used: u32,
    }
    let mut unit: Option<Unit> = None;

    for (i, m) in raw.iter().enumerate() {
        let ty = registry.get(m.ty);
        let (ty_size, ty_align) = (ty.size.max(1), ty.align.max(1));
        max_align = max_align.max(ty_align);

        match m.bit_width {
            Some(0) => {
                // Zero-width bitfield: close the current unit, emit nothing.
                unit = None;
            }
            Some(w) => {
                let bits_capacity = ty_size * 8;
                let needs_new_unit = match &unit {
                    Some(u) => u.size != ty_size || u.bits_used + w > bits_capacity,
                    None => true,
                };
                if needs_new_unit {
                    let start = align_up(cursor, ty_align);
                    cursor = start + ty_size;
                    unit = Some(Unit {
                        start,
                        size: ty_size,
                        bits_used: 0,
                    });
                }
                let u = unit.as_mut().expect("unit just ensured present");
                members.push(Member {
                    name: m.name,
                    ty: m.ty,
                    offset: u.start,
                    bit_width: w as i32,
                    bit_offset: u.bits_used,
                    index: i as u32,
                });
                u.bits_used += w;
            }
            None => {
                unit = None;
                let offset = align_up(cursor, ty_align);
                cursor = offset + ty_size;
                members.push(Member {
                    name: m.name,
                    ty: m.ty,
                    offset,
                    bit_width: -1,
                    bit_offset: 0,
                    index: i as u32,
                });
            }
        }
    }

    let size = align_up(cursor, max_align);
    LaidOut {
        members,
        size,
        align: max_align,
    }
}

pub fn layout_union(registry: &mut TypeRegistry, raw: &[RawMember]) -> LaidOut {
    let mut members = SmallVec::new();
    let mut max_size: u32 = 0;
    let mut max_align: u32 = 1;

    for (i, m) in raw.iter().enumerate() {
        let ty = registry.get(m.ty);
        let (ty_size, ty_align) = (ty.size.max(1), ty.align.max(1));
        max_size = max_size.max(ty_size);
        max_align = max_align.max(ty_align);
        let bit_width = m.bit_width.map(|w| w as i32).unwrap_or(-1);
        if m.bit_width == Some(0) {
            continue;
        }
        members.push(Member {
            name: m.name,
            ty: m.ty,
            offset: 0,
            bit_width,
            bit_offset: 0,
            index: i as u32,
        });
    }

    let size = align_up(max_size, max_align);
    LaidOut {
        members,
        size,
        align: max_align,
    }
}

#[cfg(test)]
#[path = "../tests/layout_tests.rs"]
mod layout_tests;
