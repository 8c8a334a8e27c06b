//! Cross-shard merge: tuples, descriptors, the exit-operation pipeline,
//! exit strategies, and the coordinators that drive them.

pub mod access;
pub mod collector;
pub mod descriptor;
pub mod dispatch;
pub mod layout;
pub mod operation;
pub mod strategy;
pub mod tuple;

// re-exports
pub use access::{ParallelShardAccess, SequentialShardAccess, ShardAccessStrategy, ShardOperation};
pub use collector::{CollectorBuilder, ExitOperationsCollector};
pub use descriptor::{AggregateDescriptor, AggregateKind, ProjectionRequest};
pub use dispatch::ProjectionMergeDispatcher;
pub use layout::{OrderDirection, OrderSpec, SortTarget, TupleLayout};
pub use strategy::{
    ConcatenateAllStrategy, ExitStrategy, FirstNonNullStrategy, MergedResult, StrategyState,
};
pub use tuple::{PartialResult, Tuple};
