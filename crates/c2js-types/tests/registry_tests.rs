use crate::qualifiers::Qualifiers;
use crate::{FunctionData, TypeKind, TypeRegistry};

#[test]
fn primitives_are_singletons() {
    let mut reg = TypeRegistry::new();
    let a = reg.int(true);
    let b = reg.int(true);
    assert_eq!(a, b);

    let unsigned = reg.int(false);
    assert_ne!(a, unsigned, "signed and unsigned int are distinct singletons");
}

#[test]
fn pointer_and_long_widths() {
    let mut reg = TypeRegistry::new();
    let v = reg.void();
    let ptr = reg.pointer(v, Qualifiers::empty());
    assert_eq!(reg.get(ptr).size, 4);
    let long = reg.long(true);
    assert_eq!(reg.get(long).size, 4);
    let longlong = reg.long_long(true);
    assert_eq!(reg.get(longlong).size, 8);
}

#[test]
fn two_tags_with_same_name_are_distinct_types() {
    let mut reg = TypeRegistry::new();
    let tag = c2js_common::interner::Atom::from_raw(1);
    let a = reg.new_struct(Some(tag));
    let b = reg.new_struct(Some(tag));
    assert_ne!(a, b, "distinct tag registrations are never the same TypeId");
    assert!(!reg.compatible(a, b));
}

#[test]
fn void_pointers_are_compatible_with_any_pointer() {
    let mut reg = TypeRegistry::new();
    let v = reg.void();
    let i = reg.int(true);
    let void_ptr = reg.pointer(v, Qualifiers::empty());
    let int_ptr = reg.pointer(i, Qualifiers::empty());
    assert!(reg.compatible(void_ptr, int_ptr));
}

#[test]
fn qualified_and_unqualified_share_size_and_align() {
    let mut reg = TypeRegistry::new();
    let i = reg.int(true);
    let qi = reg.qualified(i, Qualifiers::CONST);
    assert_eq!(reg.get(i).size, reg.get(qi).size);
    assert_eq!(reg.get(i).align, reg.get(qi).align);
    assert!(reg.compatible(i, qi));
}

#[test]
fn usual_arithmetic_conversion_prefers_double() {
    let mut reg = TypeRegistry::new();
    let i = reg.int(true);
    let d = reg.double();
    let result = reg.usual_arithmetic_conversion(i, d);
    assert_eq!(reg.get(result).kind, TypeKind::Double);
}

#[test]
fn usual_arithmetic_conversion_is_commutative() {
    let mut reg = TypeRegistry::new();
    let u = reg.int(false);
    let l = reg.long(true);
    let ab = reg.usual_arithmetic_conversion(u, l);
    let ba = reg.usual_arithmetic_conversion(l, u);
    assert_eq!(ab, ba);
}

#[test]
fn char_and_short_promote_to_int() {
    let mut reg = TypeRegistry::new();
    let c = reg.char_(true);
    let promoted = reg.integer_promote(c);
    assert_eq!(reg.get(promoted).kind, TypeKind::Int);
}

#[test]
fn function_types_compatible_by_shape_not_identity() {
    let mut reg = TypeRegistry::new();
    let ret = reg.int(true);
    let param = reg.int(true);
    let mut params = smallvec::SmallVec::new();
    params.push(param);
    let f1 = reg.function(FunctionData {
        return_type: ret,
        params: params.clone(),
        variadic: false,
        old_style_kr: false,
    });
    let f2 = reg.function(FunctionData {
        return_type: ret,
        params,
        variadic: false,
        old_style_kr: false,
    });
    assert_ne!(f1, f2);
    assert!(reg.compatible(f1, f2));
}
