use crate::{
    error::InternalError,
    merge::{
        layout::{OrderDirection, OrderSpec, TupleLayout},
        operation::ExitOperation,
        tuple::{Tuple, non_null_tuples},
    },
    value::{Value, canonical_cmp},
};
use std::cmp::Ordering;

///
/// ResolvedSortKey
///
/// One order key resolved from path to tuple position.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ResolvedSortKey {
    position: usize,
    direction: OrderDirection,
}

///
/// OrderMerge
///
/// Global stable sort of the concatenated shard tuples.
///
/// Keys compare left to right; a `Null` key sorts before any non-null key
/// in both directions, and full ties keep their accumulator order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderMerge {
    keys: Vec<ResolvedSortKey>,
}

impl OrderMerge {
    /// Resolve every sort key against the layout once, before any merge runs.
    pub fn new(order: &OrderSpec, layout: &TupleLayout) -> Result<Self, InternalError> {
        if order.is_empty() {
            return Err(InternalError::projection_unsupported(
                "order merge requires at least one sort key",
            ));
        }

        let keys = order
            .keys
            .iter()
            .map(|(target, direction)| {
                Ok(ResolvedSortKey {
                    position: layout.resolve(target)?,
                    direction: *direction,
                })
            })
            .collect::<Result<Vec<_>, InternalError>>()?;

        Ok(Self { keys })
    }

    fn compare(&self, left: &Tuple, right: &Tuple) -> Ordering {
        for key in &self.keys {
            let ordering = compare_key(
                left.get(key.position).unwrap_or(&Value::Null),
                right.get(key.position).unwrap_or(&Value::Null),
                key.direction,
            );

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }
}

// Nulls lead regardless of direction; only non-null comparisons flip.
fn compare_key(left: &Value, right: &Value, direction: OrderDirection) -> Ordering {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match direction {
            OrderDirection::Asc => canonical_cmp(left, right),
            OrderDirection::Desc => canonical_cmp(right, left),
        },
    }
}

impl ExitOperation for OrderMerge {
    fn name(&self) -> &'static str {
        "order"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let mut tuples = non_null_tuples(tuples);

        // `sort_by` is stable; equal keys keep accumulator order.
        tuples.sort_by(|left, right| self.compare(left, right));

        Ok(tuples)
    }
}
