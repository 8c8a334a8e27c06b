//! Merge configuration, loadable from TOML.

use crate::error::InternalError;
use serde::Deserialize;

///
/// TieBreak
///
/// How tuples with fully equal sort keys are ordered relative to each other.
///
/// Arrival      → accumulator arrival order; non-deterministic under
///                parallel scatter.
/// ShardThenRow → shard id, then the row's index within its shard.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    Arrival,
    #[default]
    ShardThenRow,
}

///
/// MergeConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub tie_break: TieBreak,

    /// Upper bound on tuples a strategy may accumulate before compiling.
    /// Exceeding it fails the merge instead of truncating.
    pub max_merged_tuples: Option<usize>,
}

impl MergeConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, InternalError> {
        let config: Self = toml::from_str(source).map_err(|err| {
            InternalError::config_unsupported(format!("invalid merge config: {err}"))
        })?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), InternalError> {
        if self.max_merged_tuples == Some(0) {
            return Err(InternalError::config_unsupported(
                "max_merged_tuples must be greater than zero when set",
            ));
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    #[must_use]
    pub const fn with_max_merged_tuples(mut self, max: usize) -> Self {
        self.max_merged_tuples = Some(max);
        self
    }
}

///
/// TESTS
///
