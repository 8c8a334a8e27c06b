mod compare;
mod kind;

#[cfg(test)]
mod tests;

use crate::types::{Decimal, Float64};

// re-exports
pub use compare::{canonical_cmp, strict_order_cmp};
pub use kind::ValueKind;

///
/// Value
///
/// One projected column value as returned by a shard.
///
/// Null  → SQL NULL; a shard-local aggregate over zero rows is reported this way.
/// List  → an ordered collection; distinct-count partials carry their local
///         distinct value set as a list.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float64(Float64),
    Decimal(Decimal),
    Text(String),
    List(Vec<Self>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Uint(_) => ValueKind::Uint,
            Self::Float64(_) => ValueKind::Float64,
            Self::Decimal(_) => ValueKind::Decimal,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Build a Float64 value, mapping non-finite input to `Null`.
    #[must_use]
    pub fn float(v: f64) -> Self {
        Float64::try_new(v).map_or(Self::Null, Self::Float64)
    }

    /// Widen a numeric value into the decimal accumulation domain.
    ///
    /// Returns `None` for non-numeric values and for floats outside the
    /// representable decimal range.
    #[must_use]
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            Self::Int(v) => Some(Decimal::from_i64(*v)),
            Self::Uint(v) => Some(Decimal::from_u64(*v)),
            Self::Float64(v) => Decimal::from_f64(v.get()),
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view in the f64 domain, used when any float takes part in a
    /// fold. Integers and decimals beyond 2^53 lose precision.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Uint(v) => Some(*v as f64),
            Self::Float64(v) => Some(v.get()),
            Self::Decimal(v) => v.to_f64(),
            _ => None,
        }
    }

    /// Read a shard-local count, accepting either signed or unsigned integers.
    #[must_use]
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Int(v) => u64::try_from(*v).ok(),
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }

    /// Convert one decimal accumulator back into the value family of `kind`.
    ///
    /// Integer families fall back to `Decimal` when the total no longer fits,
    /// matching a non-sharded database that widens on overflow.
    #[must_use]
    pub fn from_decimal_as(total: Decimal, kind: ValueKind) -> Self {
        match kind {
            ValueKind::Int => total.to_i64().map_or(Self::Decimal(total), Self::Int),
            ValueKind::Uint => total.to_u64().map_or(Self::Decimal(total), Self::Uint),
            ValueKind::Float64 => total.to_f64().map_or(Self::Decimal(total), Self::float),
            _ => Self::Decimal(total),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::float(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
