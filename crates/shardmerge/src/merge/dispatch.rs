use crate::{
    error::InternalError,
    merge::{
        descriptor::{AggregateDescriptor, AggregateKind},
        layout::{SortTarget, TupleLayout},
        operation::{
            AggregateAlgebra, AggregateMerge, AvgMerge, ExitOperation, PropertyProjectionMerge,
        },
    },
};

///
/// ProjectionMergeDispatcher
///
/// Maps one accepted projection descriptor to the exit operation that
/// implements its merge algebra. The match is exhaustive over
/// `AggregateKind`; there is no runtime fallthrough.
///

pub struct ProjectionMergeDispatcher;

impl ProjectionMergeDispatcher {
    /// Select the merge operation for `descriptor`, binding its property
    /// path to a tuple position in `layout`. Paths the layout does not
    /// carry are rejected here, before any shard is queried.
    pub fn dispatch(
        descriptor: &AggregateDescriptor,
        layout: &TupleLayout,
    ) -> Result<Box<dyn ExitOperation>, InternalError> {
        let position = match descriptor.property_path() {
            Some(path) => layout.resolve(&SortTarget::Path(path.to_string()))?,
            None => 0,
        };
        let fold = |algebra| -> Box<dyn ExitOperation> {
            Box::new(AggregateMerge::at(algebra, position))
        };

        let op: Box<dyn ExitOperation> = match descriptor.kind() {
            AggregateKind::Sum => fold(AggregateAlgebra::Sum),
            AggregateKind::Min => fold(AggregateAlgebra::Min),
            AggregateKind::Max => fold(AggregateAlgebra::Max),
            AggregateKind::Count | AggregateKind::RowCount => fold(AggregateAlgebra::Count),
            AggregateKind::DistinctCount => fold(AggregateAlgebra::DistinctUnion),
            AggregateKind::Avg => {
                // (average, count) rows: the averaged path leads.
                if position != 0 {
                    return Err(InternalError::projection_unsupported(format!(
                        "avg partials carry the averaged value first; '{}' is at position {position}",
                        descriptor.property_path().unwrap_or_default()
                    )));
                }

                Box::new(AvgMerge)
            }
            AggregateKind::Property => {
                let path = descriptor.property_path().ok_or_else(|| {
                    InternalError::projection_unsupported("property projection lost its path")
                })?;

                Box::new(PropertyProjectionMerge::new(path, layout)?)
            }
        };

        Ok(op)
    }
}

///
/// TESTS
///
