//! ShardMerge: the merge side of scatter-gather queries. Shard partials are
//! accumulated by an exit strategy and post-processed by an ordered
//! pipeline of exit operations into the result a single-node execution
//! would have produced.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod error;
pub mod merge;
pub mod obs;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, coordinators, or sinks are re-exported here.
///

pub mod prelude {
    pub use crate::{
        merge::{
            AggregateDescriptor, AggregateKind, ConcatenateAllStrategy, ExitOperationsCollector,
            ExitStrategy, FirstNonNullStrategy, MergedResult, OrderSpec, PartialResult, Tuple,
            TupleLayout,
        },
        types::ShardId,
        value::Value,
    };
}
