//! Exit operations: stateless `Vec<Tuple> -> Vec<Tuple>` transforms run over
//! the merged shard results. Every operation drops null tuples first.

mod aggregate;
mod avg;
mod distinct;
mod numeric;
mod order;
mod projection;
mod window;


use crate::{error::InternalError, merge::tuple::Tuple};
use std::fmt;

// re-exports
pub use aggregate::{AggregateAlgebra, AggregateMerge};
pub use avg::AvgMerge;
pub use distinct::DistinctMerge;
pub use order::OrderMerge;
pub use projection::PropertyProjectionMerge;
pub use window::{FirstResultMerge, MaxResultsMerge};

///
/// ExitOperation
///
/// One post-processing pass over the concatenated shard tuples.
/// Implementations hold no mutable state and may be applied repeatedly.
///

pub trait ExitOperation: fmt::Debug + Send + Sync {
    /// Stable stage label used in logs and metrics.
    fn name(&self) -> &'static str;

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError>;
}
