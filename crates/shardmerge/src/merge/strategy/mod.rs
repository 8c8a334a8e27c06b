//! Exit strategies: per-query accumulators that collect shard partials,
//! decide whether scattering may halt, and compile the final result.

mod concatenate;
mod first_non_null;

#[cfg(test)]
mod tests;

use crate::{
    error::InternalError,
    merge::{
        collector::ExitOperationsCollector,
        tuple::{PartialResult, Tuple},
    },
    types::ShardId,
    value::Value,
};
use derive_more::Display;
use std::sync::{Mutex, MutexGuard};

// re-exports
pub use concatenate::ConcatenateAllStrategy;
pub use first_non_null::FirstNonNullStrategy;

///
/// StrategyState
///
/// ACCUMULATING → (HALTED | EXHAUSTED) → COMPILING → DONE
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum StrategyState {
    #[display("accumulating")]
    Accumulating,
    #[display("halted")]
    Halted,
    #[display("exhausted")]
    Exhausted,
    #[display("compiling")]
    Compiling,
    #[display("done")]
    Done,
}

impl StrategyState {
    /// Whether `add_result` still folds partials in.
    #[must_use]
    pub const fn accepts_results(self) -> bool {
        matches!(self, Self::Accumulating)
    }
}

///
/// ExitStrategy
///
/// `add_result` may be called concurrently from one thread per shard; each
/// implementation serializes its own accumulator. `compile_results` runs
/// once, single-threaded, after accumulation is complete.
///

pub trait ExitStrategy: Send + Sync {
    /// Fold one shard's partial in. Returns true when scattering may halt.
    /// The signal is advisory; the coordinator owns cancellation.
    fn add_result(&self, partial: PartialResult, shard: ShardId) -> bool;

    /// Run the pipeline over the accumulated tuples.
    fn compile_results(
        &self,
        collector: &ExitOperationsCollector,
    ) -> Result<MergedResult, InternalError>;

    fn state(&self) -> StrategyState;
}

///
/// MergedResult
///
/// Final, globally merged output: the tuple sequence a non-sharded
/// execution of the same query would have produced.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MergedResult {
    tuples: Vec<Tuple>,
}

impl MergedResult {
    #[must_use]
    pub const fn new(tuples: Vec<Tuple>) -> Self {
        Self { tuples }
    }

    #[must_use]
    pub const fn null() -> Self {
        Self { tuples: Vec::new() }
    }

    #[must_use]
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.tuples.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    #[must_use]
    pub fn into_tuples(self) -> Vec<Tuple> {
        self.tuples
    }

    /// Single-value view for aggregate and point-lookup queries.
    /// An empty result reads as `Null`.
    pub fn into_scalar(self) -> Result<Value, InternalError> {
        let mut tuples = self.tuples;
        match tuples.len() {
            0 => Ok(Value::Null),
            1 => Ok(tuples.remove(0).into_value_at(0)),
            n => Err(InternalError::strategy_invariant(format!(
                "expected at most one merged tuple for a scalar result, found {n}"
            ))),
        }
    }
}

// Recover the guard from a poisoned lock; accumulator state stays
// consistent because every critical section is a single push or swap.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

// Shared entry check for `compile_results`: refuse a second compile and
// record which terminal accumulation state preceded it.
fn begin_compile(state: &mut StrategyState) -> Result<StrategyState, InternalError> {
    let previous = *state;
    match previous {
        StrategyState::Accumulating => *state = StrategyState::Exhausted,
        StrategyState::Halted | StrategyState::Exhausted => {}
        StrategyState::Compiling | StrategyState::Done => {
            return Err(InternalError::strategy_invariant(format!(
                "exit strategy compiled twice (state: {previous})"
            )));
        }
    }
    let settled = *state;
    *state = StrategyState::Compiling;

    Ok(settled)
}
