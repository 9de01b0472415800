use crate::runtime::lookup;

#[test]
fn sin_lowers_to_math_sin_with_double_unwrap_wrap() {
    let shim = lookup("sin").expect("sin is an allowlisted math function");
    assert_eq!(shim.target, "Math.sin");
    assert!(shim.unwrap_double_args);
    assert!(shim.wrap_double_result);
    assert!(!shim.variadic);
}

#[test]
fn printf_lowers_to_a_variadic_runtime_shim() {
    let shim = lookup("printf").expect("printf is an allowlisted libc function");
    assert_eq!(shim.target, "rt.printf");
    assert!(shim.variadic);
    assert!(!shim.unwrap_double_args);
}

#[test]
fn malloc_does_not_touch_doubles() {
    let shim = lookup("malloc").expect("malloc is an allowlisted libc function");
    assert!(!shim.unwrap_double_args);
    assert!(!shim.wrap_double_result);
}

#[test]
fn unknown_names_are_not_shimmed() {
    assert!(lookup("my_own_helper").is_none());
}
