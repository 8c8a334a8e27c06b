use crate::{
    error::InternalError,
    merge::{
        descriptor::AggregateDescriptor,
        dispatch::ProjectionMergeDispatcher,
        layout::{OrderSpec, TupleLayout},
        operation::{
            DistinctMerge, ExitOperation, FirstResultMerge, MaxResultsMerge, OrderMerge,
            PropertyProjectionMerge,
        },
        tuple::{Tuple, check_shape, non_null_tuples},
    },
    obs::{MergeEvent, SharedSink, noop_sink},
};
use std::fmt;
use tracing::debug;

///
/// ExitOperationsCollector
///
/// Ordered post-processing pipeline run once over the accumulated tuples.
///
/// Stage order is fixed regardless of builder call order:
/// shape check → null filter → distinct → aggregate | order → offset →
/// limit → projection.
///

pub struct ExitOperationsCollector {
    stages: Vec<Box<dyn ExitOperation>>,
    sink: SharedSink,
}

impl ExitOperationsCollector {
    #[must_use]
    pub fn builder(layout: TupleLayout) -> CollectorBuilder {
        CollectorBuilder::new(layout)
    }

    /// A pipeline that only validates shape and drops null tuples.
    #[must_use]
    pub fn passthrough() -> Self {
        Self {
            stages: Vec::new(),
            sink: noop_sink(),
        }
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage over `tuples`, in pipeline order.
    pub fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        check_shape(&tuples)?;
        let mut tuples = non_null_tuples(tuples);

        for stage in &self.stages {
            let rows_in = tuples.len();
            tuples = stage.apply(tuples)?;
            let rows_out = tuples.len();

            debug!(stage = stage.name(), rows_in, rows_out, "merge stage applied");
            self.sink.record(MergeEvent::StageApplied {
                stage: stage.name(),
                rows_in: rows_in as u64,
                rows_out: rows_out as u64,
            });
        }

        Ok(tuples)
    }
}

impl fmt::Debug for ExitOperationsCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitOperationsCollector")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

///
/// CollectorBuilder
///
/// Collects the per-query merge parameters. All path resolution and the
/// aggregate exclusivity checks (ordering, pagination, projection,
/// distinct) happen in `build`, before any shard is queried.
///

pub struct CollectorBuilder {
    layout: TupleLayout,
    distinct: bool,
    order: Option<OrderSpec>,
    first_result: Option<usize>,
    max_results: Option<usize>,
    aggregate: Option<AggregateDescriptor>,
    projection: Option<String>,
    sink: SharedSink,
}

impl CollectorBuilder {
    fn new(layout: TupleLayout) -> Self {
        Self {
            layout,
            distinct: false,
            order: None,
            first_result: None,
            max_results: None,
            aggregate: None,
            projection: None,
            sink: noop_sink(),
        }
    }

    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderSpec) -> Self {
        self.order = Some(order);
        self
    }

    #[must_use]
    pub const fn first_result(mut self, offset: usize) -> Self {
        self.first_result = Some(offset);
        self
    }

    /// `None` means unbounded.
    #[must_use]
    pub const fn max_results(mut self, limit: Option<usize>) -> Self {
        self.max_results = limit;
        self
    }

    #[must_use]
    pub fn aggregate(mut self, descriptor: AggregateDescriptor) -> Self {
        self.aggregate = Some(descriptor);
        self
    }

    /// Strip auxiliary order keys, keeping only `property_path`.
    #[must_use]
    pub fn project(mut self, property_path: impl Into<String>) -> Self {
        self.projection = Some(property_path.into());
        self
    }

    #[must_use]
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn build(self) -> Result<ExitOperationsCollector, InternalError> {
        // Property descriptors are pass-through projections, not folds.
        let projection = match (&self.projection, &self.aggregate) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(descriptor)) if !descriptor.kind().is_aggregate() => {
                descriptor.property_path().map(str::to_string)
            }
            _ => None,
        };
        let aggregate = self
            .aggregate
            .filter(|descriptor| descriptor.kind().is_aggregate());
        let paginated = self.first_result.is_some() || self.max_results.is_some();

        if let Some(descriptor) = &aggregate {
            if self.order.is_some() || paginated {
                return Err(InternalError::projection_unsupported(format!(
                    "{} aggregate cannot be combined with ordering or pagination",
                    descriptor.kind()
                )));
            }
            if projection.is_some() {
                return Err(InternalError::projection_unsupported(format!(
                    "{} aggregate cannot be combined with a property projection",
                    descriptor.kind()
                )));
            }
            // Distinct would collapse equal shard partials, not source rows.
            if self.distinct {
                return Err(InternalError::projection_unsupported(format!(
                    "{} aggregate cannot be combined with distinct; use count distinct",
                    descriptor.kind()
                )));
            }
        }

        let mut stages: Vec<Box<dyn ExitOperation>> = Vec::new();
        if self.distinct {
            stages.push(Box::new(DistinctMerge));
        }
        if let Some(descriptor) = &aggregate {
            stages.push(ProjectionMergeDispatcher::dispatch(descriptor, &self.layout)?);
        }
        if let Some(order) = &self.order {
            stages.push(Box::new(OrderMerge::new(order, &self.layout)?));
        }
        if let Some(offset) = self.first_result {
            stages.push(Box::new(FirstResultMerge::new(offset)));
        }
        if let Some(limit) = self.max_results {
            stages.push(Box::new(MaxResultsMerge::new(limit)));
        }
        if let Some(path) = projection {
            stages.push(Box::new(PropertyProjectionMerge::new(&path, &self.layout)?));
        }

        Ok(ExitOperationsCollector {
            stages,
            sink: self.sink,
        })
    }
}

///
/// TESTS
///
