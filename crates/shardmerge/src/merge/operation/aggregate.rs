use crate::{
    error::InternalError,
    merge::{
        operation::{ExitOperation, numeric::FloatSum},
        tuple::{Tuple, non_null_tuples},
    },
    types::Decimal,
    value::{Value, ValueKind, strict_order_cmp},
};
use std::{cmp::Ordering, collections::HashSet};

///
/// AggregateAlgebra
///
/// How shard-local partial aggregates recombine into one global value.
/// AVG is handled by `AvgMerge` since it needs a (value, count) pair.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AggregateAlgebra {
    Sum,
    Min,
    Max,
    Count,
    DistinctUnion,
}

///
/// AggregateMerge
///
/// Folds every shard's partial aggregate into a single-tuple result.
/// The partial is read from `position`, the aggregated path's slot in the
/// tuple layout.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AggregateMerge {
    algebra: AggregateAlgebra,
    position: usize,
}

impl AggregateMerge {
    /// Fold the leading tuple element.
    #[must_use]
    pub const fn new(algebra: AggregateAlgebra) -> Self {
        Self::at(algebra, 0)
    }

    #[must_use]
    pub const fn at(algebra: AggregateAlgebra, position: usize) -> Self {
        Self { algebra, position }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub const fn algebra(&self) -> AggregateAlgebra {
        self.algebra
    }
}

impl ExitOperation for AggregateMerge {
    fn name(&self) -> &'static str {
        match self.algebra {
            AggregateAlgebra::Sum => "aggregate_sum",
            AggregateAlgebra::Min => "aggregate_min",
            AggregateAlgebra::Max => "aggregate_max",
            AggregateAlgebra::Count => "aggregate_count",
            AggregateAlgebra::DistinctUnion => "aggregate_count_distinct",
        }
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let partials: Vec<Value> = non_null_tuples(tuples)
            .into_iter()
            .map(|tuple| tuple.into_value_at(self.position))
            .filter(|value| !value.is_null())
            .collect();

        let merged = match self.algebra {
            AggregateAlgebra::Sum => merge_sum(&partials)?,
            AggregateAlgebra::Min => merge_extremum(partials, Ordering::Less)?,
            AggregateAlgebra::Max => merge_extremum(partials, Ordering::Greater)?,
            AggregateAlgebra::Count => merge_count(&partials)?,
            AggregateAlgebra::DistinctUnion => merge_distinct_union(partials)?,
        };

        Ok(vec![Tuple::Scalar(merged)])
    }
}

// Integer and decimal partials sum in the decimal domain; floats sum in
// f64 with compensation. The total comes back in the input family.
fn merge_sum(partials: &[Value]) -> Result<Value, InternalError> {
    let Some(first) = partials.first() else {
        return Ok(Value::Null);
    };

    let kind = first.kind();
    if !kind.is_numeric() {
        return Err(InternalError::merge_invariant(format!(
            "sum partials must be numeric, found {kind}"
        )));
    }
    if let Some(mixed) = partials.iter().find(|partial| partial.kind() != kind) {
        return Err(InternalError::merge_invariant(format!(
            "sum partials mix {kind} and {}",
            mixed.kind()
        )));
    }

    if kind == ValueKind::Float64 {
        let mut total = FloatSum::default();
        for partial in partials {
            if let Value::Float64(value) = partial {
                total.add(value.get());
            }
        }

        return Ok(Value::float(total.total()?));
    }

    let mut total = Decimal::ZERO;
    for partial in partials {
        let Some(value) = partial.to_decimal() else {
            return Err(InternalError::merge_invariant(format!(
                "sum partial is not numeric: {partial:?}"
            )));
        };
        total = total.checked_add(value).ok_or_else(|| {
            InternalError::merge_internal("sum accumulator overflowed decimal bounds")
        })?;
    }

    Ok(Value::from_decimal_as(total, kind))
}

// Keep the partial that compares `wanted` against the current best.
fn merge_extremum(partials: Vec<Value>, wanted: Ordering) -> Result<Value, InternalError> {
    let mut best: Option<Value> = None;

    for partial in partials {
        best = match best {
            None => Some(partial),
            Some(current) => {
                let ordering = strict_order_cmp(&partial, &current).ok_or_else(|| {
                    InternalError::merge_invariant(format!(
                        "cannot order {} partial against {} partial",
                        partial.kind(),
                        current.kind()
                    ))
                })?;

                if ordering == wanted {
                    Some(partial)
                } else {
                    Some(current)
                }
            }
        };
    }

    Ok(best.unwrap_or(Value::Null))
}

// Counts add; every shard must report the same integer kind, which the
// total keeps.
fn merge_count(partials: &[Value]) -> Result<Value, InternalError> {
    let kind = partials.first().map_or(ValueKind::Int, Value::kind);
    let mut total = 0u64;

    for partial in partials {
        if partial.kind() != kind {
            return Err(InternalError::merge_invariant(format!(
                "count partials mix {kind} and {}",
                partial.kind()
            )));
        }
        let Some(count) = partial.as_count() else {
            return Err(InternalError::merge_invariant(format!(
                "count partial is not a non-negative integer: {partial:?}"
            )));
        };
        total = total
            .checked_add(count)
            .ok_or_else(|| InternalError::merge_internal("count accumulator overflowed u64"))?;
    }

    if kind == ValueKind::Uint {
        Ok(Value::Uint(total))
    } else {
        i64::try_from(total)
            .map(Value::Int)
            .map_err(|_| InternalError::merge_internal("count total exceeds i64 range"))
    }
}

// Union of the shard-local distinct sets. A bare count cannot be merged:
// the same value may be counted on several shards.
fn merge_distinct_union(partials: Vec<Value>) -> Result<Value, InternalError> {
    if partials.is_empty() {
        return Ok(Value::Null);
    }

    let mut union: HashSet<Value> = HashSet::new();
    for partial in partials {
        match partial {
            Value::List(values) => {
                union.extend(values.into_iter().filter(|value| !value.is_null()));
            }
            Value::Int(_) | Value::Uint(_) => {
                return Err(InternalError::merge_unsupported(
                    "count distinct cannot be merged from shard-local counts; shards must expose their distinct value sets",
                ));
            }
            other => {
                return Err(InternalError::merge_invariant(format!(
                    "count distinct partial must be a value set, found {}",
                    other.kind()
                )));
            }
        }
    }

    i64::try_from(union.len())
        .map(Value::Int)
        .map_err(|_| InternalError::merge_internal("distinct union size exceeds i64 range"))
}
