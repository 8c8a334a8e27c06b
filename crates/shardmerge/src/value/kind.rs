use derive_more::Display;

///
/// ValueKind
///
/// Per-position type tag used by the cross-shard shape check.
/// `Null` is compatible with every other kind.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ValueKind {
    #[display("null")]
    Null,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("uint")]
    Uint,
    #[display("float64")]
    Float64,
    #[display("decimal")]
    Decimal,
    #[display("text")]
    Text,
    #[display("list")]
    List,
}

impl ValueKind {
    /// Returns true when values of the two kinds may share one tuple position.
    #[must_use]
    pub fn is_compatible(self, other: Self) -> bool {
        self == other || self == Self::Null || other == Self::Null
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float64 | Self::Decimal)
    }

    /// Combine two observed kinds for one position, preferring the non-null one.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        match self {
            Self::Null => other,
            _ => self,
        }
    }
}
