mod decimal;
mod float64;
mod shard;

pub use decimal::Decimal;
pub use float64::Float64;
pub use shard::ShardId;
