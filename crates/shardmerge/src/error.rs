use crate::value::ValueKind;
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured merge error with a stable internal classification.
/// Not a stable API; intended for internal use and may change without notice.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    /// Construct the fatal unsupported-projection error raised while a
    /// descriptor is being built, before any shard is contacted.
    pub fn unsupported_projection(kind: impl Into<String>) -> Self {
        let kind = kind.into();

        Self {
            class: ErrorClass::Unsupported,
            origin: ErrorOrigin::Projection,
            message: format!("unsupported projection kind: '{kind}'"),
            detail: Some(ErrorDetail::UnsupportedProjection { kind }),
        }
    }

    /// Construct the fatal inconsistent-tuple-shape error.
    pub(crate) fn inconsistent_shape(shape: ShapeMismatch) -> Self {
        Self {
            class: ErrorClass::InvariantViolation,
            origin: ErrorOrigin::Tuple,
            message: format!("inconsistent tuple shape across shards: {shape}"),
            detail: Some(ErrorDetail::InconsistentTupleShape(shape)),
        }
    }

    /// Construct a projection-origin unsupported error.
    pub(crate) fn projection_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Projection,
            message.into(),
        )
    }

    /// Construct a merge-origin unsupported error.
    pub(crate) fn merge_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Merge, message.into())
    }

    /// Construct a merge-origin invariant violation.
    pub(crate) fn merge_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Merge,
            message.into(),
        )
    }

    /// Construct a merge-origin internal error.
    pub(crate) fn merge_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Merge, message.into())
    }

    /// Construct a strategy-origin invariant violation.
    pub(crate) fn strategy_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Strategy,
            message.into(),
        )
    }

    /// Construct a strategy-origin unsupported error.
    pub(crate) fn strategy_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Strategy,
            message.into(),
        )
    }

    /// Construct an access-origin internal error.
    pub(crate) fn access_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Access, message.into())
    }

    /// Construct a config-origin unsupported error.
    pub(crate) fn config_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, message.into())
    }

    #[must_use]
    pub const fn is_unsupported_projection(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::UnsupportedProjection { .. }))
    }

    #[must_use]
    pub const fn is_inconsistent_shape(&self) -> bool {
        matches!(self.detail, Some(ErrorDetail::InconsistentTupleShape(_)))
    }
}

///
/// ErrorDetail
///
/// Structured detail carried by [`InternalError`] for the fatal merge
/// conditions callers are expected to match on.
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error("unsupported projection kind: {kind}")]
    UnsupportedProjection { kind: String },

    #[error("{0}")]
    InconsistentTupleShape(ShapeMismatch),
}

///
/// ShapeMismatch
///
/// The first disagreement found between two shards' tuples for the same
/// logical query. Positions and indexes are zero-based.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ShapeMismatch {
    RowVersusScalar {
        index: usize,
    },
    Arity {
        index: usize,
        expected: usize,
        found: usize,
    },
    Kind {
        index: usize,
        position: usize,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowVersusScalar { index } => {
                write!(f, "tuple {index} mixes row and scalar shapes")
            }
            Self::Arity {
                index,
                expected,
                found,
            } => write!(f, "tuple {index} has arity {found}, expected {expected}"),
            Self::Kind {
                index,
                position,
                expected,
                found,
            } => write!(
                f,
                "tuple {index} position {position} holds {found}, expected {expected}"
            ),
        }
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Internal,
    Unsupported,
    InvariantViolation,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Internal => "internal",
            Self::Unsupported => "unsupported",
            Self::InvariantViolation => "invariant_violation",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Projection,
    Tuple,
    Merge,
    Strategy,
    Access,
    Config,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Projection => "projection",
            Self::Tuple => "tuple",
            Self::Merge => "merge",
            Self::Strategy => "strategy",
            Self::Access => "access",
            Self::Config => "config",
        };
        write!(f, "{label}")
    }
}
