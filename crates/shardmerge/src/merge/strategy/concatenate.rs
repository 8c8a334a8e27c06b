use crate::{
    config::{MergeConfig, TieBreak},
    error::InternalError,
    merge::{
        collector::ExitOperationsCollector,
        strategy::{ExitStrategy, MergedResult, StrategyState, begin_compile, lock},
        tuple::{PartialResult, Tuple},
    },
    obs::{MergeEvent, SharedSink, noop_sink},
    types::ShardId,
};
use std::sync::Mutex;
use tracing::{debug, warn};

///
/// SourcedTuple
///
/// One accumulated tuple plus where it came from.
///

#[derive(Debug)]
struct SourcedTuple {
    shard: ShardId,
    row: usize,
    tuple: Tuple,
}

#[derive(Debug)]
struct ConcatState {
    state: StrategyState,
    entries: Vec<SourcedTuple>,
}

///
/// ConcatenateAllStrategy
///
/// Appends every shard's tuples and never halts scattering. Used whenever
/// the pipeline needs the complete cross-shard set.
///

#[derive(Debug)]
pub struct ConcatenateAllStrategy {
    config: MergeConfig,
    sink: SharedSink,
    inner: Mutex<ConcatState>,
}

impl ConcatenateAllStrategy {
    #[must_use]
    pub fn new(config: MergeConfig) -> Self {
        Self::with_sink(config, noop_sink())
    }

    #[must_use]
    pub fn with_sink(config: MergeConfig, sink: SharedSink) -> Self {
        Self {
            config,
            sink,
            inner: Mutex::new(ConcatState {
                state: StrategyState::Accumulating,
                entries: Vec::new(),
            }),
        }
    }

    /// Number of tuples accumulated so far, null tuples included.
    #[must_use]
    pub fn accumulated(&self) -> usize {
        lock(&self.inner).entries.len()
    }

    fn take_entries(&self) -> Result<Vec<SourcedTuple>, InternalError> {
        let mut inner = lock(&self.inner);
        let settled = begin_compile(&mut inner.state)?;
        debug!(state = %settled, tuples = inner.entries.len(), "compiling concatenated results");

        Ok(std::mem::take(&mut inner.entries))
    }

    fn finish(&self) {
        lock(&self.inner).state = StrategyState::Done;
    }

    fn compile_entries(
        &self,
        mut entries: Vec<SourcedTuple>,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError> {
        if let Some(max) = self.config.max_merged_tuples
            && entries.len() > max
        {
            return Err(InternalError::strategy_unsupported(format!(
                "accumulated {} tuples, exceeding max_merged_tuples {max}",
                entries.len()
            )));
        }

        // Stable: rows of one shard keep their local order either way.
        if self.config.tie_break == TieBreak::ShardThenRow {
            entries.sort_by_key(|entry| (entry.shard, entry.row));
        }

        let tuples = entries.into_iter().map(|entry| entry.tuple).collect();
        let merged = collector.apply(tuples)?;
        self.sink.record(MergeEvent::MergeFinished {
            rows: merged.len() as u64,
        });

        Ok(MergedResult::new(merged))
    }
}

impl Default for ConcatenateAllStrategy {
    fn default() -> Self {
        Self::new(MergeConfig::default())
    }
}

impl ExitStrategy for ConcatenateAllStrategy {
    fn add_result(&self, partial: PartialResult, shard: ShardId) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.state.accepts_results() {
            drop(inner);
            warn!(%shard, "shard result arrived after accumulation closed; ignoring");
            self.sink.record(MergeEvent::LateResultIgnored { shard });

            return false;
        }

        let tuples = partial.into_tuples();
        let count = tuples.len();
        inner.entries.extend(
            tuples
                .into_iter()
                .enumerate()
                .map(|(row, tuple)| SourcedTuple { shard, row, tuple }),
        );
        drop(inner);

        self.sink.record(MergeEvent::ShardResultAdded {
            shard,
            tuples: count as u64,
        });

        false
    }

    fn compile_results(
        &self,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError> {
        let entries = self.take_entries()?;
        let merged = self.compile_entries(entries, collector);
        self.finish();

        merged
    }

    fn state(&self) -> StrategyState {
        lock(&self.inner).state
    }
}
