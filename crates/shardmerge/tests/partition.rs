//! Merged results must not depend on how rows were split across shards or
//! on the order shards answered in.

use proptest::prelude::*;
use shardmerge::{
    error::InternalError,
    merge::{
        AggregateDescriptor, AggregateKind, ConcatenateAllStrategy, ExitOperationsCollector,
        FirstNonNullStrategy, OrderSpec, PartialResult, SequentialShardAccess,
        ShardAccessStrategy, Tuple, TupleLayout,
    },
    types::ShardId,
    value::Value,
};
use std::collections::BTreeSet;

const SHARDS: u32 = 4;

fn shard_ids() -> Vec<ShardId> {
    (0..SHARDS).map(ShardId::new).collect()
}

fn partition<T: Clone>(assigned: &[(T, u32)]) -> Vec<Vec<T>> {
    let mut shards = vec![Vec::new(); SHARDS as usize];
    for (item, shard) in assigned {
        shards[*shard as usize].push(item.clone());
    }

    shards
}

// Each shard pre-aggregates locally, then the merge folds the partials.
fn merge_aggregate(kind: AggregateKind, shards: &[Vec<i64>]) -> Value {
    let local = |values: &Vec<i64>| -> Tuple {
        match kind {
            AggregateKind::Count => Tuple::from(values.len() as i64),
            AggregateKind::Sum if !values.is_empty() => Tuple::from(values.iter().sum::<i64>()),
            AggregateKind::Min => values.iter().min().copied().into(),
            AggregateKind::Max => values.iter().max().copied().into(),
            _ => Tuple::null(),
        }
    };
    let op = |shard: ShardId| -> Result<PartialResult, InternalError> {
        Ok(PartialResult::new(vec![local(&shards[shard.get() as usize])]))
    };
    let collector = ExitOperationsCollector::builder(TupleLayout::scalar("v").expect("layout"))
        .aggregate(AggregateDescriptor::new(kind, Some("v")).expect("descriptor"))
        .build()
        .expect("collector");

    SequentialShardAccess::new()
        .apply(
            &shard_ids(),
            &op,
            &ConcatenateAllStrategy::default(),
            &collector,
        )
        .expect("merge")
        .into_scalar()
        .expect("scalar")
}

// Run one aggregate over per-shard partial tuples built by `local`.
fn merge_partials(
    descriptor: AggregateDescriptor,
    layout: TupleLayout,
    shards: &[Vec<i64>],
    local: impl Fn(&[i64]) -> Tuple + Sync,
) -> Value {
    let op = |shard: ShardId| -> Result<PartialResult, InternalError> {
        Ok(PartialResult::new(vec![local(
            shards[shard.get() as usize].as_slice(),
        )]))
    };
    let collector = ExitOperationsCollector::builder(layout)
        .aggregate(descriptor)
        .build()
        .expect("collector");

    SequentialShardAccess::new()
        .apply(
            &shard_ids(),
            &op,
            &ConcatenateAllStrategy::default(),
            &collector,
        )
        .expect("merge")
        .into_scalar()
        .expect("scalar")
}

// Shard-local AVG partial: (average, count), or a null average when empty.
#[allow(clippy::cast_precision_loss)]
fn local_avg(values: &[i64]) -> Tuple {
    if values.is_empty() {
        return Tuple::row([Value::Null, Value::Int(0)]);
    }
    let sum: i64 = values.iter().sum();

    Tuple::row([
        Value::float(sum as f64 / values.len() as f64),
        Value::Int(values.len() as i64),
    ])
}

// Shard-local DISTINCT_COUNT partial: the local distinct value set.
fn local_distinct(values: &[i64]) -> Tuple {
    if values.is_empty() {
        return Tuple::null();
    }
    let set: BTreeSet<i64> = values.iter().copied().collect();

    Tuple::Scalar(Value::from(set.into_iter().collect::<Vec<_>>()))
}

fn arb_assigned_values() -> impl Strategy<Value = Vec<(i64, u32)>> {
    prop::collection::vec((-1_000_000i64..1_000_000, 0..SHARDS), 0..40)
}

proptest! {
    #[test]
    fn sum_is_partition_independent(assigned in arb_assigned_values()) {
        let all: Vec<i64> = assigned.iter().map(|(value, _)| *value).collect();
        let expected = if all.is_empty() {
            Value::Null
        } else {
            Value::Int(all.iter().sum())
        };

        prop_assert_eq!(merge_aggregate(AggregateKind::Sum, &partition(&assigned)), expected);
    }

    #[test]
    fn min_max_are_partition_independent(assigned in arb_assigned_values()) {
        let all: Vec<i64> = assigned.iter().map(|(value, _)| *value).collect();
        let shards = partition(&assigned);

        prop_assert_eq!(
            merge_aggregate(AggregateKind::Min, &shards),
            Value::from(all.iter().min().copied())
        );
        prop_assert_eq!(
            merge_aggregate(AggregateKind::Max, &shards),
            Value::from(all.iter().max().copied())
        );
    }

    #[test]
    fn count_is_partition_independent(assigned in arb_assigned_values()) {
        prop_assert_eq!(
            merge_aggregate(AggregateKind::Count, &partition(&assigned)),
            Value::Int(assigned.len() as i64)
        );
    }

    #[test]
    fn avg_is_partition_independent(
        assigned in prop::collection::vec((-1_000i64..1_000, 0..SHARDS), 0..40)
    ) {
        let all: Vec<i64> = assigned.iter().map(|(value, _)| *value).collect();
        let merged = merge_partials(
            AggregateDescriptor::new(AggregateKind::Avg, Some("v")).expect("descriptor"),
            TupleLayout::new(["v", "n"]).expect("layout"),
            &partition(&assigned),
            local_avg,
        );

        if all.is_empty() {
            prop_assert_eq!(merged, Value::Null);
        } else {
            #[allow(clippy::cast_precision_loss)]
            let expected = all.iter().sum::<i64>() as f64 / all.len() as f64;
            let Value::Float64(actual) = merged else {
                return Err(TestCaseError::fail(format!("expected a float, got {merged:?}")));
            };
            prop_assert!((actual.get() - expected).abs() < 1e-9, "{} != {}", actual.get(), expected);
        }
    }

    #[test]
    fn distinct_count_is_partition_independent(
        assigned in prop::collection::vec((0i64..12, 0..SHARDS), 0..40)
    ) {
        let all: BTreeSet<i64> = assigned.iter().map(|(value, _)| *value).collect();
        let merged = merge_partials(
            AggregateDescriptor::new(AggregateKind::DistinctCount, Some("v")).expect("descriptor"),
            TupleLayout::scalar("v").expect("layout"),
            &partition(&assigned),
            local_distinct,
        );

        let expected = if all.is_empty() {
            Value::Null
        } else {
            Value::Int(all.len() as i64)
        };
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn ordered_page_is_partition_independent(
        keys in prop::collection::vec((0i64..6, 0..SHARDS), 0..30)
    ) {
        // (id, key) with unique ids so the full order is total
        let assigned: Vec<((i64, i64), u32)> = keys
            .iter()
            .enumerate()
            .map(|(id, &(key, shard))| ((id as i64, key), shard))
            .collect();
        let shards = partition(&assigned);
        let op = |shard: ShardId| -> Result<PartialResult, InternalError> {
            Ok(shards[shard.get() as usize]
                .iter()
                .map(|&(id, key)| Tuple::row([id, key]))
                .collect())
        };
        let collector =
            ExitOperationsCollector::builder(TupleLayout::new(["id", "key"]).expect("layout"))
                .order_by(OrderSpec::new().asc("key").asc("id"))
                .first_result(2)
                .max_results(Some(3))
                .project("id")
                .build()
                .expect("collector");

        let merged = SequentialShardAccess::new()
            .apply(&shard_ids(), &op, &ConcatenateAllStrategy::default(), &collector)
            .expect("merge");

        let mut expected: Vec<(i64, i64)> = assigned.iter().map(|(row, _)| *row).collect();
        expected.sort_by_key(|&(id, key)| (key, id));
        let expected: Vec<Tuple> = expected
            .into_iter()
            .skip(2)
            .take(3)
            .map(|(id, _)| Tuple::from(id))
            .collect();

        prop_assert_eq!(merged.into_tuples(), expected);
    }

    #[test]
    fn ordering_is_idempotent(
        rows in prop::collection::vec((0i64..5, prop::option::of(0i64..5)), 0..25)
    ) {
        let collector =
            ExitOperationsCollector::builder(TupleLayout::new(["a", "b"]).expect("layout"))
                .order_by(OrderSpec::new().desc("b").asc("a"))
                .build()
                .expect("collector");
        let tuples: Vec<Tuple> = rows
            .into_iter()
            .map(|(a, b)| Tuple::row([Value::Int(a), Value::from(b)]))
            .collect();

        let once = collector.apply(tuples).expect("first pass");
        let twice = collector.apply(once.clone()).expect("second pass");

        prop_assert_eq!(once, twice);
    }

    #[test]
    fn first_non_null_ignores_call_order(
        (hit, order) in (1u32..8).prop_flat_map(|n| {
            (0..n, Just((0..n).map(ShardId::new).collect::<Vec<_>>()).prop_shuffle())
        })
    ) {
        let op = |shard: ShardId| -> Result<PartialResult, InternalError> {
            Ok(if shard.get() == hit {
                PartialResult::new(vec![Tuple::from(i64::from(hit) + 100)])
            } else {
                PartialResult::empty()
            })
        };
        let exit = FirstNonNullStrategy::new();

        let merged = SequentialShardAccess::new()
            .apply(&order, &op, &exit, &ExitOperationsCollector::passthrough())
            .expect("lookup");

        prop_assert_eq!(exit.winning_shard(), Some(ShardId::new(hit)));
        prop_assert_eq!(merged.into_scalar().expect("scalar"), Value::Int(i64::from(hit) + 100));
    }
}
