//! Metrics sink boundary.
//!
//! Merge logic MUST NOT depend on a concrete counter set.
//! All instrumentation flows through MergeEvent and MetricsSink.
use crate::types::ShardId;
use std::{fmt, sync::Arc};

///
/// MergeEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MergeEvent {
    ShardResultAdded {
        shard: ShardId,
        tuples: u64,
    },
    LateResultIgnored {
        shard: ShardId,
    },
    ScatterHalted {
        shard: ShardId,
    },
    ShardSkipped {
        shard: ShardId,
    },
    StageApplied {
        stage: &'static str,
        rows_in: u64,
        rows_out: u64,
    },
    MergeFinished {
        rows: u64,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink: fmt::Debug + Send + Sync {
    fn record(&self, event: MergeEvent);
}

/// Shared handle type strategies and collectors hold.
pub type SharedSink = Arc<dyn MetricsSink>;

///
/// NoopMetricsSink
/// Default sink when the caller does not collect merge telemetry.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMetricsSink;

impl MetricsSink for NoopMetricsSink {
    fn record(&self, _: MergeEvent) {}
}

#[must_use]
pub fn noop_sink() -> SharedSink {
    Arc::new(NoopMetricsSink)
}
