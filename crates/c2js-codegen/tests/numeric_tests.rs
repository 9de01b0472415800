use crate::numeric::{mask_for_store, mode_of, scalar_access, NumMode};
use c2js_types::{Qualifiers, TypeRegistry};

#[test]
fn double_and_long_long_use_the_bigint_towers() {
    let mut reg = TypeRegistry::new();
    let d = reg.double();
    let ll = reg.long_long(true);
    let i = reg.int(true);
    assert_eq!(mode_of(&reg, d), NumMode::F64Bits);
    assert_eq!(mode_of(&reg, ll), NumMode::U64);
    assert_eq!(mode_of(&reg, i), NumMode::Number);
}

#[test]
fn every_scalar_kind_has_a_typed_accessor() {
    let mut reg = TypeRegistry::new();
    let b = reg.bool_();
    let c = reg.char_(true);
    let s = reg.short(true);
    let i = reg.int(true);
    let ll = reg.long_long(false);
    let f = reg.float();
    let d = reg.double();
    let inner = reg.int(true);
    let p = reg.pointer(inner, Qualifiers::empty());
    for ty in [b, c, s, i, ll, f, d, p] {
        assert!(scalar_access(&reg, ty).is_some());
    }
}

#[test]
fn aggregates_and_void_have_no_scalar_accessor() {
    let mut reg = TypeRegistry::new();
    let v = reg.void();
    assert!(scalar_access(&reg, v).is_none());
}

#[test]
fn storing_into_a_narrower_int_masks_to_its_width() {
    let mut reg = TypeRegistry::new();
    let c = reg.char_(false);
    assert_eq!(mask_for_store(&reg, c, "300"), "((300) & 0xff)");
    let sc = reg.char_(true);
    assert_eq!(mask_for_store(&reg, sc, "300"), "((300) << 24 >> 24)");
}
