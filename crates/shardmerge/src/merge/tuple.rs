use crate::{
    error::{InternalError, ShapeMismatch},
    value::{Value, ValueKind},
};

static NULL_VALUE: Value = Value::Null;

///
/// Tuple
///
/// One row of a shard's partial result.
///
/// Scalar → the query projected a single value.
/// Row    → element 0 is the projected value; elements 1..k are auxiliary
///          order-by keys appended so the merge can sort without
///          re-deriving them.
///
/// `Scalar(Value::Null)` is the null tuple a shard emits for "no matching
/// aggregate row".
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Tuple {
    Scalar(Value),
    Row(Vec<Value>),
}

impl Tuple {
    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(Value::Null)
    }

    #[must_use]
    pub fn row<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::Row(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Row(values) => values.len(),
        }
    }

    /// The projected value: the scalar itself, or element 0 of a row.
    #[must_use]
    pub fn primary(&self) -> &Value {
        self.get(0).unwrap_or(&NULL_VALUE)
    }

    /// Value at one tuple position; a scalar only has position 0.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        match self {
            Self::Scalar(value) => (position == 0).then_some(value),
            Self::Row(values) => values.get(position),
        }
    }

    #[must_use]
    pub fn into_value_at(self, position: usize) -> Value {
        match self {
            Self::Scalar(value) if position == 0 => value,
            Self::Scalar(_) => Value::Null,
            Self::Row(mut values) => {
                if position < values.len() {
                    values.swap_remove(position)
                } else {
                    Value::Null
                }
            }
        }
    }

    const fn is_row(&self) -> bool {
        matches!(self, Self::Row(_))
    }
}

// Scalar tuples convert from anything a `Value` converts from.
macro_rules! impl_scalar_tuple_from {
    ( $( $ty:ty ),* $(,)? ) => {
        $(
            impl From<$ty> for Tuple {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.into())
                }
            }
        )*
    };
}

impl_scalar_tuple_from!(
    Value,
    bool,
    i32,
    i64,
    u64,
    f64,
    &str,
    String,
    crate::types::Decimal,
    Option<i64>,
    Option<f64>,
);

///
/// PartialResult
///
/// The tuples one shard returned for one scatter. Read-only once handed to
/// an exit strategy.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PartialResult {
    tuples: Vec<Tuple>,
}

impl PartialResult {
    #[must_use]
    pub const fn new(tuples: Vec<Tuple>) -> Self {
        Self { tuples }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { tuples: Vec::new() }
    }

    /// A partial is null when it carries no non-null tuple.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.tuples.iter().all(Tuple::is_null)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.tuples.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    #[must_use]
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    #[must_use]
    pub fn into_tuples(self) -> Vec<Tuple> {
        self.tuples
    }
}

impl From<Vec<Tuple>> for PartialResult {
    fn from(tuples: Vec<Tuple>) -> Self {
        Self::new(tuples)
    }
}

impl FromIterator<Tuple> for PartialResult {
    fn from_iter<I: IntoIterator<Item = Tuple>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

///
/// TupleShape
///
/// Row/scalar form, arity and per-position kinds observed so far.
/// Positions that have only held `Null` stay `ValueKind::Null` until a
/// concrete kind arrives.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TupleShape {
    row: bool,
    kinds: Vec<ValueKind>,
}

impl TupleShape {
    fn of(tuple: &Tuple) -> Self {
        let kinds = match tuple {
            Tuple::Scalar(value) => vec![value.kind()],
            Tuple::Row(values) => values.iter().map(Value::kind).collect(),
        };

        Self {
            row: tuple.is_row(),
            kinds,
        }
    }

    #[must_use]
    pub const fn arity(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn kind_at(&self, position: usize) -> Option<ValueKind> {
        self.kinds.get(position).copied()
    }

    // Fold one more tuple into the shape, failing on the first disagreement.
    fn absorb(&mut self, index: usize, tuple: &Tuple) -> Result<(), ShapeMismatch> {
        if self.row != tuple.is_row() {
            return Err(ShapeMismatch::RowVersusScalar { index });
        }
        if self.arity() != tuple.arity() {
            return Err(ShapeMismatch::Arity {
                index,
                expected: self.arity(),
                found: tuple.arity(),
            });
        }

        for (position, expected) in self.kinds.iter_mut().enumerate() {
            let found = tuple.get(position).map_or(ValueKind::Null, Value::kind);
            if !expected.is_compatible(found) {
                return Err(ShapeMismatch::Kind {
                    index,
                    position,
                    expected: *expected,
                    found,
                });
            }
            *expected = expected.merge(found);
        }

        Ok(())
    }
}

/// Verify every non-null tuple shares one shape; returns that shape, or
/// `None` when there were no non-null tuples.
pub fn check_shape(tuples: &[Tuple]) -> Result<Option<TupleShape>, InternalError> {
    let mut shape: Option<TupleShape> = None;

    for (index, tuple) in tuples.iter().enumerate() {
        if tuple.is_null() {
            continue;
        }

        match shape.as_mut() {
            None => shape = Some(TupleShape::of(tuple)),
            Some(shape) => shape
                .absorb(index, tuple)
                .map_err(InternalError::inconsistent_shape)?,
        }
    }

    Ok(shape)
}

/// Drop the null tuples, preserving the order of the rest.
#[must_use]
pub fn non_null_tuples(tuples: Vec<Tuple>) -> Vec<Tuple> {
    let mut tuples = tuples;
    tuples.retain(|tuple| !tuple.is_null());

    tuples
}

///
/// TESTS
///
