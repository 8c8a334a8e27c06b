use crate::{
    error::InternalError,
    merge::{
        layout::{SortTarget, TupleLayout},
        operation::ExitOperation,
        tuple::{Tuple, non_null_tuples},
    },
};

///
/// PropertyProjectionMerge
///
/// Reduces each tuple to its projected property, discarding the auxiliary
/// order-by keys that were only carried for merge-time sorting.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PropertyProjectionMerge {
    property_path: String,
    position: usize,
}

impl PropertyProjectionMerge {
    /// Bind the projected path to its tuple position once, up front.
    pub fn new(property_path: &str, layout: &TupleLayout) -> Result<Self, InternalError> {
        let position = layout.resolve(&SortTarget::Path(property_path.to_string()))?;

        Ok(Self {
            property_path: property_path.to_string(),
            position,
        })
    }

    #[must_use]
    pub fn property_path(&self) -> &str {
        &self.property_path
    }
}

impl ExitOperation for PropertyProjectionMerge {
    fn name(&self) -> &'static str {
        "property_projection"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        Ok(non_null_tuples(tuples)
            .into_iter()
            .map(|tuple| Tuple::Scalar(tuple.into_value_at(self.position)))
            .collect())
    }
}
