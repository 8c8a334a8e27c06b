use crate::{
    config::{MergeConfig, TieBreak},
    merge::{
        collector::ExitOperationsCollector,
        layout::{OrderSpec, TupleLayout},
        strategy::{
            ConcatenateAllStrategy, ExitStrategy, FirstNonNullStrategy, MergedResult,
            StrategyState,
        },
        tuple::{PartialResult, Tuple},
    },
    obs::MergeMetrics,
    types::ShardId,
    value::Value,
};
use std::sync::Arc;

// ---- helpers -----------------------------------------------------------

fn partial(values: &[i64]) -> PartialResult {
    values.iter().copied().map(Tuple::from).collect()
}

fn shard(id: u32) -> ShardId {
    ShardId::new(id)
}

fn ordered_by_key() -> ExitOperationsCollector {
    ExitOperationsCollector::builder(TupleLayout::new(["tag", "key"]).expect("layout"))
        .order_by(OrderSpec::new().asc("key"))
        .build()
        .expect("collector")
}

fn tagged(tag: &str, key: i64) -> Tuple {
    Tuple::row([Value::from(tag), Value::Int(key)])
}

fn tags(result: &MergedResult) -> Vec<&str> {
    result
        .tuples()
        .iter()
        .map(|tuple| match tuple.primary() {
            Value::Text(tag) => tag.as_str(),
            other => panic!("expected text tag, found {other:?}"),
        })
        .collect()
}

// ---- concatenate ---------------------------------------------------------

#[test]
fn concatenate_never_halts_and_keeps_everything() {
    let strategy = ConcatenateAllStrategy::default();

    assert!(!strategy.add_result(partial(&[1, 2]), shard(0)));
    assert!(!strategy.add_result(partial(&[3]), shard(1)));
    assert_eq!(strategy.accumulated(), 3);
    assert_eq!(strategy.state(), StrategyState::Accumulating);

    let merged = strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    assert_eq!(merged.len(), 3);
    assert_eq!(strategy.state(), StrategyState::Done);
}

#[test]
fn concatenate_rejects_second_compile() {
    let strategy = ConcatenateAllStrategy::default();
    let collector = ExitOperationsCollector::passthrough();

    strategy.compile_results(&collector).expect("first compile");
    let err = strategy
        .compile_results(&collector)
        .expect_err("second compile");

    assert!(err.message.contains("compiled twice"));
}

#[test]
fn concatenate_ignores_results_after_compile() {
    let metrics = Arc::new(MergeMetrics::new());
    let strategy = ConcatenateAllStrategy::with_sink(MergeConfig::default(), metrics.clone());

    strategy.add_result(partial(&[1]), shard(0));
    strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    strategy.add_result(partial(&[2]), shard(1));

    let report = metrics.report();
    assert_eq!(report.shard_results, 1);
    assert_eq!(report.late_results, 1);
    assert_eq!(report.merges_finished, 1);
}

#[test]
fn shard_then_row_tie_break_is_independent_of_arrival_order() {
    let arrivals = [
        (shard(2), vec![tagged("c0", 1), tagged("c1", 0)]),
        (shard(0), vec![tagged("a0", 1)]),
        (shard(1), vec![tagged("b0", 1), tagged("b1", 0)]),
    ];

    let forward = ConcatenateAllStrategy::default();
    for (id, tuples) in arrivals.iter().cloned() {
        forward.add_result(PartialResult::new(tuples), id);
    }
    let backward = ConcatenateAllStrategy::default();
    for (id, tuples) in arrivals.iter().rev().cloned() {
        backward.add_result(PartialResult::new(tuples), id);
    }

    let collector = ordered_by_key();
    let forward = forward.compile_results(&collector).expect("compile");
    let backward = backward.compile_results(&collector).expect("compile");

    assert_eq!(tags(&forward), ["b1", "c1", "a0", "b0", "c0"]);
    assert_eq!(forward, backward);
}

#[test]
fn arrival_tie_break_follows_accumulation_order() {
    let strategy =
        ConcatenateAllStrategy::new(MergeConfig::default().with_tie_break(TieBreak::Arrival));
    strategy.add_result(PartialResult::new(vec![tagged("first", 1)]), shard(9));
    strategy.add_result(PartialResult::new(vec![tagged("second", 1)]), shard(0));

    let merged = strategy.compile_results(&ordered_by_key()).expect("compile");
    assert_eq!(tags(&merged), ["first", "second"]);
}

#[test]
fn max_merged_tuples_fails_instead_of_truncating() {
    let strategy = ConcatenateAllStrategy::new(MergeConfig::default().with_max_merged_tuples(2));
    strategy.add_result(partial(&[1, 2]), shard(0));
    strategy.add_result(partial(&[3]), shard(1));

    let err = strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect_err("over cap");
    assert!(err.message.contains("max_merged_tuples"));
    assert_eq!(strategy.state(), StrategyState::Done);
}

// ---- first non-null ------------------------------------------------------

#[test]
fn first_non_null_wins_and_halts() {
    let strategy = FirstNonNullStrategy::new();

    assert!(!strategy.add_result(PartialResult::empty(), shard(0)));
    assert!(!strategy.add_result(PartialResult::new(vec![Tuple::null()]), shard(1)));
    assert!(strategy.add_result(partial(&[42]), shard(2)));
    assert_eq!(strategy.state(), StrategyState::Halted);
    assert!(strategy.add_result(partial(&[7]), shard(3)));

    assert_eq!(strategy.winning_shard(), Some(shard(2)));
    let merged = strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    assert_eq!(merged.into_scalar().expect("scalar"), Value::Int(42));
}

#[test]
fn first_non_null_reports_late_results() {
    let metrics = Arc::new(MergeMetrics::new());
    let strategy = FirstNonNullStrategy::with_sink(metrics.clone());

    assert!(strategy.add_result(partial(&[1]), shard(0)));
    assert!(strategy.add_result(partial(&[2]), shard(1)));
    assert!(strategy.add_result(PartialResult::empty(), shard(2)));
    assert_eq!(metrics.report().late_results, 2);

    strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    assert!(strategy.add_result(partial(&[3]), shard(3)));
    assert_eq!(metrics.report().late_results, 3);
    assert_eq!(strategy.winning_shard(), Some(shard(0)));
}

#[test]
fn first_non_null_ignores_results_after_compiling_without_winner() {
    let metrics = Arc::new(MergeMetrics::new());
    let strategy = FirstNonNullStrategy::with_sink(metrics.clone());

    strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");

    assert!(!strategy.add_result(partial(&[9]), shard(0)));
    assert_eq!(strategy.winning_shard(), None);
    assert_eq!(metrics.report().late_results, 1);
}

#[test]
fn first_non_null_over_all_null_shards_is_null() {
    let strategy = FirstNonNullStrategy::new();
    for id in 0..4 {
        assert!(!strategy.add_result(PartialResult::empty(), shard(id)));
    }

    let merged = strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    assert!(merged.is_empty());
    assert_eq!(merged.into_scalar().expect("scalar"), Value::Null);
    assert_eq!(strategy.winning_shard(), None);
}

#[test]
fn first_non_null_has_exactly_one_winner_under_concurrency() {
    let strategy = FirstNonNullStrategy::new();

    std::thread::scope(|scope| {
        for id in 0..8u32 {
            let strategy = &strategy;
            scope.spawn(move || {
                strategy.add_result(partial(&[i64::from(id)]), shard(id));
            });
        }
    });

    let winner = strategy.winning_shard().expect("one shard wins");
    let merged = strategy
        .compile_results(&ExitOperationsCollector::passthrough())
        .expect("compile");
    assert_eq!(
        merged.into_scalar().expect("scalar"),
        Value::Int(i64::from(winner.get()))
    );
}

#[test]
fn into_scalar_rejects_multi_row_results() {
    let merged = MergedResult::new(vec![Tuple::from(1i64), Tuple::from(2i64)]);

    assert!(merged.into_scalar().is_err());
}
