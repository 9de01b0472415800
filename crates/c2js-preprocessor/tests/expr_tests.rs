use crate::expr::evaluate;

#[test]
fn arithmetic_precedence() {
    assert_eq!(evaluate("1 + 2 * 3"), 7);
    assert_eq!(evaluate("(1 + 2) * 3"), 9);
}

#[test]
fn comparisons_and_logical_operators() {
    assert_eq!(evaluate("1 < 2 && 3 > 2"), 1);
    assert_eq!(evaluate("1 == 2 || 0"), 0);
}

#[test]
fn bitwise_operators() {
    assert_eq!(evaluate("6 & 3"), 2);
    assert_eq!(evaluate("6 | 1"), 7);
    assert_eq!(evaluate("5 ^ 1"), 4);
    assert_eq!(evaluate("1 << 4"), 16);
}

#[test]
fn division_by_zero_yields_zero_not_panic() {
    assert_eq!(evaluate("1 / 0"), 0);
    assert_eq!(evaluate("1 % 0"), 0);
}

#[test]
fn undefined_identifier_is_zero() {
    assert_eq!(evaluate("SOME_UNDEFINED_NAME"), 0);
    assert_eq!(evaluate("SOME_UNDEFINED_NAME + 1"), 1);
}

#[test]
fn hex_and_octal_literals() {
    assert_eq!(evaluate("0x10"), 16);
    assert_eq!(evaluate("010"), 8);
}

#[test]
fn unary_operators() {
    assert_eq!(evaluate("-5 + 3"), -2);
    assert_eq!(evaluate("!0"), 1);
    assert_eq!(evaluate("!5"), 0);
}

#[test]
fn character_literal() {
    assert_eq!(evaluate("'A'"), 65);
}
