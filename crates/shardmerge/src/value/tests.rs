use crate::{
    types::Decimal,
    value::{Value, ValueKind, canonical_cmp, strict_order_cmp},
};
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn v_i(x: i64) -> Value {
    Value::Int(x)
}
fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn null_sorts_before_every_non_null_value() {
    for value in [v_i(i64::MIN), v_txt(""), Value::Bool(false), Value::float(-1e300)] {
        assert_eq!(canonical_cmp(&Value::Null, &value), Ordering::Less);
        assert_eq!(canonical_cmp(&value, &Value::Null), Ordering::Greater);
    }
    assert_eq!(canonical_cmp(&Value::Null, &Value::Null), Ordering::Equal);
}

#[test]
fn strict_order_rejects_mixed_kinds() {
    assert_eq!(strict_order_cmp(&v_i(1), &Value::Uint(1)), None);
    assert_eq!(strict_order_cmp(&v_i(1), &v_i(2)), Some(Ordering::Less));
    assert_eq!(
        strict_order_cmp(&v_txt("b"), &v_txt("a")),
        Some(Ordering::Greater)
    );
}

#[test]
fn canonical_cmp_orders_lists_lexicographically() {
    let short = Value::from(vec![1i64, 2]);
    let long = Value::from(vec![1i64, 2, 0]);
    let bigger = Value::from(vec![1i64, 3]);

    assert_eq!(canonical_cmp(&short, &long), Ordering::Less);
    assert_eq!(canonical_cmp(&long, &bigger), Ordering::Less);
}

#[test]
fn to_decimal_widens_numeric_kinds_only() {
    assert_eq!(v_i(-4).to_decimal(), Some(Decimal::from_i64(-4)));
    assert_eq!(Value::Uint(9).to_decimal(), Some(Decimal::from_u64(9)));
    assert_eq!(Value::float(2.5).to_decimal(), Some(Decimal::new(25, 1)));
    assert_eq!(v_txt("1").to_decimal(), None);
    assert_eq!(Value::Null.to_decimal(), None);
}

#[test]
fn to_f64_covers_every_numeric_kind() {
    assert_eq!(v_i(-4).to_f64(), Some(-4.0));
    assert_eq!(Value::Uint(9).to_f64(), Some(9.0));
    assert_eq!(Value::float(1e300).to_f64(), Some(1e300));
    assert_eq!(Value::Decimal(Decimal::new(25, 1)).to_f64(), Some(2.5));
    assert_eq!(v_txt("1").to_f64(), None);
    assert!(ValueKind::Float64.is_numeric() && !ValueKind::Text.is_numeric());
}

#[test]
fn from_decimal_as_restores_input_family() {
    let total = Decimal::from_i64(15);

    assert_eq!(Value::from_decimal_as(total, ValueKind::Int), v_i(15));
    assert_eq!(Value::from_decimal_as(total, ValueKind::Uint), Value::Uint(15));
    assert_eq!(
        Value::from_decimal_as(total, ValueKind::Float64),
        Value::float(15.0)
    );
    assert_eq!(
        Value::from_decimal_as(Decimal::new(15, 1), ValueKind::Int),
        Value::Decimal(Decimal::new(15, 1))
    );
}

#[test]
fn as_count_rejects_negative_and_non_integer() {
    assert_eq!(v_i(3).as_count(), Some(3));
    assert_eq!(v_i(-3).as_count(), None);
    assert_eq!(Value::float(3.0).as_count(), None);
}

#[test]
fn kind_compatibility_treats_null_as_wildcard() {
    assert!(ValueKind::Null.is_compatible(ValueKind::Text));
    assert!(ValueKind::Int.is_compatible(ValueKind::Null));
    assert!(!ValueKind::Int.is_compatible(ValueKind::Uint));
    assert_eq!(ValueKind::Null.merge(ValueKind::Int), ValueKind::Int);
}
