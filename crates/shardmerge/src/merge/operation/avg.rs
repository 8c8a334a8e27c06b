use crate::{
    error::InternalError,
    merge::{
        operation::{ExitOperation, numeric::FloatSum},
        tuple::{Tuple, non_null_tuples},
    },
    types::Decimal,
    value::{Value, ValueKind},
};

///
/// AvgMerge
///
/// Count-weighted average across shards. Each shard contributes an
/// `(average, count)` row; shards with no rows contribute nothing.
///
/// global = Σ(avgᵢ × countᵢ) / Σ(countᵢ)
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AvgMerge;

impl ExitOperation for AvgMerge {
    fn name(&self) -> &'static str {
        "aggregate_avg"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let mut partials = Vec::new();

        for tuple in non_null_tuples(tuples) {
            let (average, count) = match tuple {
                Tuple::Row(values) => match <[Value; 2]>::try_from(values) {
                    Ok([average, count]) => (average, count),
                    Err(values) => return Err(avg_arity_error(values.len())),
                },
                Tuple::Scalar(_) => return Err(avg_arity_error(1)),
            };

            if average.is_null() || count.is_null() {
                continue;
            }
            let Some(count) = count.as_count() else {
                return Err(InternalError::merge_invariant(format!(
                    "avg partial count is not a non-negative integer: {count:?}"
                )));
            };
            if count == 0 {
                continue;
            }
            if !average.kind().is_numeric() {
                return Err(InternalError::merge_invariant(format!(
                    "avg partial average is not numeric: {average:?}"
                )));
            }

            partials.push((average, count));
        }

        if partials.is_empty() {
            return Ok(vec![Tuple::null()]);
        }

        let merged = if partials
            .iter()
            .any(|(average, _)| average.kind() == ValueKind::Float64)
        {
            float_average(&partials)?
        } else {
            decimal_average(&partials)?
        };

        Ok(vec![Tuple::Scalar(merged)])
    }
}

fn avg_arity_error(arity: usize) -> InternalError {
    InternalError::merge_invariant(format!(
        "avg partial must be an (average, count) row, found arity {arity}"
    ))
}

// Any float partial moves the whole fold into f64.
fn float_average(partials: &[(Value, u64)]) -> Result<Value, InternalError> {
    let mut weighted_sum = FloatSum::default();
    let mut total_count = 0u64;

    for (average, count) in partials {
        let Some(average) = average.to_f64() else {
            return Err(InternalError::merge_invariant(format!(
                "avg partial average is not numeric: {average:?}"
            )));
        };
        #[allow(clippy::cast_precision_loss)]
        let weight = *count as f64;
        weighted_sum.add(average * weight);
        total_count = total_count
            .checked_add(*count)
            .ok_or_else(|| InternalError::merge_internal("avg count overflowed u64"))?;
    }

    #[allow(clippy::cast_precision_loss)]
    let average = weighted_sum.total()? / total_count as f64;

    Ok(Value::float(average))
}

// Integer and decimal averages weight exactly; the result is Decimal when
// any shard reported a Decimal average, Float64 otherwise.
fn decimal_average(partials: &[(Value, u64)]) -> Result<Value, InternalError> {
    let mut weighted_sum = Decimal::ZERO;
    let mut total_count = Decimal::ZERO;
    let mut output_kind = ValueKind::Float64;

    for (average, count) in partials {
        let Some(local_average) = average.to_decimal() else {
            return Err(InternalError::merge_invariant(format!(
                "avg partial average is not numeric: {average:?}"
            )));
        };
        if average.kind() == ValueKind::Decimal {
            output_kind = ValueKind::Decimal;
        }

        let count = Decimal::from_u64(*count);
        weighted_sum = local_average
            .checked_mul(count)
            .and_then(|weighted| weighted_sum.checked_add(weighted))
            .ok_or_else(|| {
                InternalError::merge_internal("avg weighted sum overflowed decimal bounds")
            })?;
        total_count = total_count.checked_add(count).ok_or_else(|| {
            InternalError::merge_internal("avg count overflowed decimal bounds")
        })?;
    }

    let average = weighted_sum
        .checked_div(total_count)
        .ok_or_else(|| InternalError::merge_internal("avg division overflowed"))?;

    Ok(Value::from_decimal_as(average, output_kind))
}
