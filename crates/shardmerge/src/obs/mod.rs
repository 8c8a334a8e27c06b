//! Observability: merge telemetry and the sink boundary it flows through.
//!
//! Sinks are handed to strategies and collectors explicitly; nothing here
//! keeps process-global state.

mod metrics;
mod sink;

// re-exports
pub use metrics::{MergeMetrics, MergeReport};
pub use sink::{MergeEvent, MetricsSink, NoopMetricsSink, SharedSink, noop_sink};
