use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// ShardId
///
/// Opaque handle naming the partition a partial result came from.
/// Only used for provenance, diagnostics and tie-breaking.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[display("shard:{_0}")]
pub struct ShardId(u32);

impl ShardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for ShardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}
