use crate::error::InternalError;
use derive_more::Display;
use std::str::FromStr;

///
/// AggregateKind
///
/// Closed set of projection kinds the merge engine can recombine.
/// Anything else is rejected while the descriptor is built.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum AggregateKind {
    #[display("sum")]
    Sum,
    #[display("min")]
    Min,
    #[display("max")]
    Max,
    #[display("count")]
    Count,
    #[display("count_distinct")]
    DistinctCount,
    #[display("avg")]
    Avg,
    #[display("row_count")]
    RowCount,
    #[display("property")]
    Property,
}

impl AggregateKind {
    /// Whether the kind folds all shard partials into one value.
    #[must_use]
    pub const fn is_aggregate(self) -> bool {
        !matches!(self, Self::Property)
    }

    const fn requires_path(self) -> bool {
        !matches!(self, Self::RowCount)
    }
}

impl FromStr for AggregateKind {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Self::Sum,
            "min" => Self::Min,
            "max" => Self::Max,
            "count" => Self::Count,
            "count_distinct" | "distinct_count" | "countdistinct" => Self::DistinctCount,
            "avg" | "average" => Self::Avg,
            "row_count" | "rowcount" => Self::RowCount,
            "property" => Self::Property,
            _ => return Err(InternalError::unsupported_projection(s)),
        };

        Ok(kind)
    }
}

///
/// ProjectionRequest
///
/// Projection as handed over by the query translation layer, before the
/// merge engine has accepted it.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectionRequest {
    pub function: String,
    pub property_path: Option<String>,
}

impl ProjectionRequest {
    #[must_use]
    pub fn new(function: impl Into<String>, property_path: Option<&str>) -> Self {
        Self {
            function: function.into(),
            property_path: property_path.map(str::to_string),
        }
    }
}

///
/// AggregateDescriptor
///
/// Immutable `{kind, property_path}` pair that drives which merge algebra
/// applies. Construction is the only validation point.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AggregateDescriptor {
    kind: AggregateKind,
    property_path: Option<String>,
}

impl AggregateDescriptor {
    pub fn new(kind: AggregateKind, property_path: Option<&str>) -> Result<Self, InternalError> {
        let property_path = property_path.map(str::trim).filter(|path| !path.is_empty());

        match (kind.requires_path(), property_path) {
            (true, None) => Err(InternalError::projection_unsupported(format!(
                "{kind} projection requires a property path"
            ))),
            (false, Some(path)) => Err(InternalError::projection_unsupported(format!(
                "{kind} projection does not take a property path, got '{path}'"
            ))),
            (_, path) => Ok(Self {
                kind,
                property_path: path.map(str::to_string),
            }),
        }
    }

    /// Accept one translated projection, rejecting unknown functions eagerly.
    pub fn from_projection(request: &ProjectionRequest) -> Result<Self, InternalError> {
        let kind = request.function.parse::<AggregateKind>()?;

        Self::new(kind, request.property_path.as_deref())
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub fn property_path(&self) -> Option<&str> {
        self.property_path.as_deref()
    }
}

///
/// TESTS
///
