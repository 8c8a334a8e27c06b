use crate::error::InternalError;
use std::collections::BTreeMap;

///
/// TupleLayout
///
/// Static capability table mapping property paths to tuple positions.
/// Built once per logical query by the translation layer; position 0 is the
/// projected value and later positions are the appended order-by keys.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TupleLayout {
    paths: Vec<String>,
    positions: BTreeMap<String, usize>,
}

impl TupleLayout {
    /// Build a layout from the property path at each tuple position.
    ///
    /// Duplicate paths resolve to their first position.
    pub fn new<I, S>(paths: I) -> Result<Self, InternalError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            return Err(InternalError::projection_unsupported(
                "tuple layout requires at least the projected position",
            ));
        }

        let mut positions = BTreeMap::new();
        for (position, path) in paths.iter().enumerate() {
            if path.is_empty() {
                return Err(InternalError::projection_unsupported(format!(
                    "tuple layout position {position} has an empty property path"
                )));
            }
            positions.entry(path.clone()).or_insert(position);
        }

        Ok(Self { paths, positions })
    }

    /// Layout for a single-column projection.
    pub fn scalar(path: impl Into<String>) -> Result<Self, InternalError> {
        Self::new([path.into()])
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn path_at(&self, position: usize) -> Option<&str> {
        self.paths.get(position).map(String::as_str)
    }

    #[must_use]
    pub fn position_of(&self, path: &str) -> Option<usize> {
        self.positions.get(path).copied()
    }

    /// Resolve one sort target to a tuple position.
    pub fn resolve(&self, target: &SortTarget) -> Result<usize, InternalError> {
        match target {
            SortTarget::Path(path) => self.position_of(path).ok_or_else(|| {
                InternalError::projection_unsupported(format!(
                    "property path '{path}' is not part of the merged tuple layout"
                ))
            }),
            SortTarget::Position(position) if *position < self.arity() => Ok(*position),
            SortTarget::Position(position) => {
                Err(InternalError::projection_unsupported(format!(
                    "tuple position {position} is outside the layout arity {}",
                    self.arity()
                )))
            }
        }
    }
}

///
/// SortTarget
///
/// Either a named property path or an explicit auxiliary tuple position.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SortTarget {
    Path(String),
    Position(usize),
}

impl From<&str> for SortTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<usize> for SortTarget {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

///
/// OrderDirection
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

///
/// OrderSpec
///
/// Ordered list of sort keys, applied left to right.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OrderSpec {
    pub(crate) keys: Vec<(SortTarget, OrderDirection)>,
}

impl OrderSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    #[must_use]
    pub fn asc(mut self, target: impl Into<SortTarget>) -> Self {
        self.keys.push((target.into(), OrderDirection::Asc));
        self
    }

    #[must_use]
    pub fn desc(mut self, target: impl Into<SortTarget>) -> Self {
        self.keys.push((target.into(), OrderDirection::Desc));
        self
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

///
/// TESTS
///
