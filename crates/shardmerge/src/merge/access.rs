//! Shard access coordinators: drive one operation across a shard set,
//! feed every partial into the exit strategy, then compile.

use crate::{
    error::InternalError,
    merge::{
        collector::ExitOperationsCollector,
        strategy::{ExitStrategy, MergedResult},
        tuple::PartialResult,
    },
    obs::{MergeEvent, SharedSink, noop_sink},
    types::ShardId,
};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

///
/// ShardOperation
///
/// The per-shard half of a scatter-gather query. Closures of the right
/// shape implement it directly.
///

pub trait ShardOperation: Sync {
    fn execute(&self, shard: ShardId) -> Result<PartialResult, InternalError>;

    fn operation_name(&self) -> &'static str {
        "shard_operation"
    }
}

impl<F> ShardOperation for F
where
    F: Fn(ShardId) -> Result<PartialResult, InternalError> + Sync,
{
    fn execute(&self, shard: ShardId) -> Result<PartialResult, InternalError> {
        self(shard)
    }
}

///
/// ShardAccessStrategy
///

pub trait ShardAccessStrategy {
    /// Run `operation` on `shards`, accumulate through `exit`, and compile.
    /// The first shard error aborts the query; nothing is compiled.
    fn apply<O>(
        &self,
        shards: &[ShardId],
        operation: &O,
        exit: &dyn ExitStrategy,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError>
    where
        O: ShardOperation + ?Sized;
}

///
/// SequentialShardAccess
///
/// Visits shards in the given order and stops issuing calls once the
/// strategy signals halt.
///

#[derive(Debug)]
pub struct SequentialShardAccess {
    sink: SharedSink,
}

impl SequentialShardAccess {
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(noop_sink())
    }

    #[must_use]
    pub const fn with_sink(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Default for SequentialShardAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardAccessStrategy for SequentialShardAccess {
    fn apply<O>(
        &self,
        shards: &[ShardId],
        operation: &O,
        exit: &dyn ExitStrategy,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError>
    where
        O: ShardOperation + ?Sized,
    {
        let mut remaining = shards.iter();
        for &shard in remaining.by_ref() {
            let partial = operation.execute(shard)?;
            if exit.add_result(partial, shard) {
                debug!(
                    %shard,
                    operation = operation.operation_name(),
                    "exit strategy halted sequential scatter"
                );
                break;
            }
        }
        for &shard in remaining {
            self.sink.record(MergeEvent::ShardSkipped { shard });
        }

        exit.compile_results(collector)
    }
}

///
/// ParallelShardAccess
///
/// One scoped thread per shard. Once the strategy signals halt, shards
/// that have not started yet are skipped; in-flight calls run to
/// completion and their results are offered to the strategy as usual.
///

#[derive(Debug)]
pub struct ParallelShardAccess {
    sink: SharedSink,
}

impl ParallelShardAccess {
    #[must_use]
    pub fn new() -> Self {
        Self::with_sink(noop_sink())
    }

    #[must_use]
    pub const fn with_sink(sink: SharedSink) -> Self {
        Self { sink }
    }
}

impl Default for ParallelShardAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardAccessStrategy for ParallelShardAccess {
    fn apply<O>(
        &self,
        shards: &[ShardId],
        operation: &O,
        exit: &dyn ExitStrategy,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError>
    where
        O: ShardOperation + ?Sized,
    {
        let stop = AtomicBool::new(false);

        let outcomes: Vec<Result<(), InternalError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = shards
                .iter()
                .map(|&shard| {
                    let stop = &stop;
                    let sink = &self.sink;
                    scope.spawn(move || {
                        if stop.load(Ordering::Acquire) {
                            sink.record(MergeEvent::ShardSkipped { shard });
                            return Ok(());
                        }

                        match operation.execute(shard) {
                            Ok(partial) => {
                                if exit.add_result(partial, shard) {
                                    stop.store(true, Ordering::Release);
                                }
                                Ok(())
                            }
                            Err(err) => {
                                warn!(
                                    %shard,
                                    operation = operation.operation_name(),
                                    error = %err,
                                    "shard operation failed"
                                );
                                stop.store(true, Ordering::Release);
                                Err(err)
                            }
                        }
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        Err(InternalError::access_internal(
                            "shard thread panicked during scatter",
                        ))
                    })
                })
                .collect()
        });

        // Shard order, not completion order, picks the reported error.
        outcomes.into_iter().collect::<Result<(), _>>()?;

        exit.compile_results(collector)
    }
}

///
/// TESTS
///
