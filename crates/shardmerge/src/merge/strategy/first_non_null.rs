use crate::{
    error::InternalError,
    merge::{
        collector::ExitOperationsCollector,
        strategy::{ExitStrategy, MergedResult, StrategyState, begin_compile, lock},
        tuple::PartialResult,
    },
    obs::{MergeEvent, SharedSink, noop_sink},
    types::ShardId,
};
use std::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug)]
struct FirstState {
    state: StrategyState,
    winner: Option<(ShardId, PartialResult)>,
}

///
/// FirstNonNullStrategy
///
/// Point-lookup strategy: the first shard to supply a non-null partial wins
/// and every later call is a no-op. If no shard answers, the result is null.
///

#[derive(Debug)]
pub struct FirstNonNullStrategy {
    sink: SharedSink,
    inner: Mutex<FirstState>,
}

impl FirstNonNullStrategy {
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(noop_sink())
    }

    #[must_use]
    pub const fn with_sink(sink: SharedSink) -> Self {
        Self {
            sink,
            inner: Mutex::new(FirstState {
                state: StrategyState::Accumulating,
                winner: None,
            }),
        }
    }

    /// The shard whose partial won, once one has.
    #[must_use]
    pub fn winning_shard(&self) -> Option<ShardId> {
        lock(&self.inner).winner.as_ref().map(|(shard, _)| *shard)
    }
}

impl Default for FirstNonNullStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitStrategy for FirstNonNullStrategy {
    fn add_result(&self, partial: PartialResult, shard: ShardId) -> bool {
        let mut inner = lock(&self.inner);
        if !inner.state.accepts_results() {
            let halted = inner.winner.is_some();
            drop(inner);
            warn!(%shard, "shard result arrived after accumulation closed; ignoring");
            self.sink.record(MergeEvent::LateResultIgnored { shard });

            return halted;
        }
        if partial.is_null() {
            return false;
        }

        // compare-and-set under the lock: only the first non-null caller gets here
        let tuples = partial.len() as u64;
        inner.winner = Some((shard, partial));
        inner.state = StrategyState::Halted;
        drop(inner);

        debug!(%shard, "first non-null shard result won; scattering may halt");
        self.sink.record(MergeEvent::ShardResultAdded { shard, tuples });
        self.sink.record(MergeEvent::ScatterHalted { shard });

        true
    }

    fn compile_results(
        &self,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError> {
        let winner = {
            let mut inner = lock(&self.inner);
            begin_compile(&mut inner.state)?;
            inner.winner.as_ref().map(|(_, partial)| partial.clone())
        };

        let merged = match winner {
            Some(partial) => collector.apply(partial.into_tuples()).map(MergedResult::new),
            None => Ok(MergedResult::null()),
        };
        lock(&self.inner).state = StrategyState::Done;

        if let Ok(merged) = &merged {
            self.sink.record(MergeEvent::MergeFinished {
                rows: merged.len() as u64,
            });
        }

        merged
    }

    fn state(&self) -> StrategyState {
        lock(&self.inner).state
    }
}
