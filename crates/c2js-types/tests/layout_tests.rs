use crate::layout::{layout_struct, layout_union, RawMember};
use crate::TypeRegistry;
use c2js_common::interner::Atom;

fn atom(n: u32) -> Atom {
    Atom::from_raw(n)
}

#[test]
fn struct_offsets_are_monotonically_non_decreasing() {
    let mut reg = TypeRegistry::new();
    let c = reg.char_(true);
    let i = reg.int(true);
    let raw = vec![
        RawMember { name: atom(0), ty: c, bit_width: None },
        RawMember { name: atom(1), ty: i, bit_width: None },
        RawMember { name: atom(2), ty: c, bit_width: None },
    ];
    let laid_out = layout_struct(&mut reg, &raw);
    let mut last = 0u32;
    for m in &laid_out.members {
        assert!(m.offset >= last, "offsets must be non-decreasing in declaration order");
        last = m.offset;
    }
    // char, then int aligned to 4, then char right after.
    assert_eq!(laid_out.members[0].offset, 0);
    assert_eq!(laid_out.members[1].offset, 4);
    assert_eq!(laid_out.members[2].offset, 8);
    assert_eq!(laid_out.size, 12); // padded to int's alignment
    assert_eq!(laid_out.align, 4);
}

#[test]
fn bitfields_pack_into_shared_storage_unit() {
    let mut reg = TypeRegistry::new();
    let i = reg.int(true);
    let raw = vec![
        RawMember { name: atom(0), ty: i, bit_width: Some(3) },
        RawMember { name: atom(1), ty: i, bit_width: Some(5) },
    ];
    let laid_out = layout_struct(&mut reg, &raw);
    assert_eq!(laid_out.members[0].offset, laid_out.members[1].offset, "both fit in one storage unit");
    assert_eq!(laid_out.members[0].bit_offset, 0);
    assert_eq!(laid_out.members[1].bit_offset, 3);
    assert_eq!(laid_out.size, 4);
}

#[test]
fn bitfield_overflowing_unit_starts_new_storage() {
    let mut reg = TypeRegistry::new();
    let i = reg.int(true);
    let raw = vec![
        RawMember { name: atom(0), ty: i, bit_width: Some(30) },
        RawMember { name: atom(1), ty: i, bit_width: Some(10) },
    ];
    let laid_out = layout_struct(&mut reg, &raw);
    assert_eq!(laid_out.members[0].offset, 0);
    assert_eq!(laid_out.members[1].offset, 4, "doesn't fit remaining 2 bits, opens a new unit");
    assert_eq!(laid_out.size, 8);
}

#[test]
fn zero_width_bitfield_forces_new_unit() {
    let mut reg = TypeRegistry::new();
    let i = reg.int(true);
    let raw = vec![
        RawMember { name: atom(0), ty: i, bit_width: Some(3) },
        RawMember { name: atom(1), ty: i, bit_width: Some(0) },
        RawMember { name: atom(2), ty: i, bit_width: Some(3) },
    ];
    let laid_out = layout_struct(&mut reg, &raw);
    // zero-width separator emits no member of its own.
    assert_eq!(laid_out.members.len(), 2);
    assert_eq!(laid_out.members[0].offset, 0);
    assert_eq!(laid_out.members[1].offset, 4);
    assert_eq!(laid_out.members[1].bit_offset, 0);
}

#[test]
fn union_members_all_start_at_offset_zero() {
    let mut reg = TypeRegistry::new();
    let c = reg.char_(true);
    let i = reg.int(true);
    let raw = vec![
        RawMember { name: atom(0), ty: c, bit_width: None },
        RawMember { name: atom(1), ty: i, bit_width: None },
    ];
    let laid_out = layout_union(&mut reg, &raw);
    assert!(laid_out.members.iter().all(|m| m.offset == 0));
    assert_eq!(laid_out.size, 4);
    assert_eq!(laid_out.align, 4);
}

#[test]
fn complete_aggregate_updates_registry() {
    let mut reg = TypeRegistry::new();
    let tag = atom(9);
    let id = reg.new_struct(Some(tag));
    let i = reg.int(true);
    reg.complete_aggregate(
        id,
        vec![RawMember { name: atom(0), ty: i, bit_width: None }],
        false,
    );
    assert!(reg.get(id).is_complete());
    assert_eq!(reg.get(id).size, 4);
}
