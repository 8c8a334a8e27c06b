use crate::obs::sink::{MergeEvent, MetricsSink};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

///
/// MergeMetrics
///
/// Lock-free counter set; safe to share across shard threads.
///

#[derive(Debug, Default)]
pub struct MergeMetrics {
    shard_results: AtomicU64,
    tuples_accumulated: AtomicU64,
    late_results: AtomicU64,
    halts: AtomicU64,
    shards_skipped: AtomicU64,
    stages_applied: AtomicU64,
    merges_finished: AtomicU64,
    rows_emitted: AtomicU64,
}

impl MergeMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every counter.
    #[must_use]
    pub fn report(&self) -> MergeReport {
        MergeReport {
            shard_results: self.shard_results.load(Ordering::Relaxed),
            tuples_accumulated: self.tuples_accumulated.load(Ordering::Relaxed),
            late_results: self.late_results.load(Ordering::Relaxed),
            halts: self.halts.load(Ordering::Relaxed),
            shards_skipped: self.shards_skipped.load(Ordering::Relaxed),
            stages_applied: self.stages_applied.load(Ordering::Relaxed),
            merges_finished: self.merges_finished.load(Ordering::Relaxed),
            rows_emitted: self.rows_emitted.load(Ordering::Relaxed),
        }
    }
}

fn bump(counter: &AtomicU64, by: u64) {
    counter.fetch_add(by, Ordering::Relaxed);
}

impl MetricsSink for MergeMetrics {
    fn record(&self, event: MergeEvent) {
        match event {
            MergeEvent::ShardResultAdded { tuples, .. } => {
                bump(&self.shard_results, 1);
                bump(&self.tuples_accumulated, tuples);
            }
            MergeEvent::LateResultIgnored { .. } => bump(&self.late_results, 1),
            MergeEvent::ScatterHalted { .. } => bump(&self.halts, 1),
            MergeEvent::ShardSkipped { .. } => bump(&self.shards_skipped, 1),
            MergeEvent::StageApplied { .. } => bump(&self.stages_applied, 1),
            MergeEvent::MergeFinished { rows } => {
                bump(&self.merges_finished, 1);
                bump(&self.rows_emitted, rows);
            }
        }
    }
}

///
/// MergeReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MergeReport {
    pub shard_results: u64,
    pub tuples_accumulated: u64,
    pub late_results: u64,
    pub halts: u64,
    pub shards_skipped: u64,
    pub stages_applied: u64,
    pub merges_finished: u64,
    pub rows_emitted: u64,
}

///
/// TESTS
///
