use crate::value::Value;
use std::cmp::Ordering;

/// Total comparator used by ordering and distinct surfaces.
///
/// Ordering rules:
/// 1. `Null` sorts before any non-null value
/// 2. Same-kind values compare by their natural order
/// 3. Mixed kinds compare by kind rank only and must remain deterministic
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::List(a), Value::List(b)) => canonical_cmp_list(a, b),
        _ => strict_order_cmp(left, right).unwrap_or_else(|| left.kind().cmp(&right.kind())),
    }
}

/// Strict comparator for identical orderable kinds.
///
/// Returns `None` for mismatched or non-orderable kinds.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Uint(a), Value::Uint(b)) => Some(a.cmp(b)),
        (Value::Float64(a), Value::Float64(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn canonical_cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}
