use crate::{
    error::InternalError,
    merge::{
        operation::ExitOperation,
        tuple::{Tuple, non_null_tuples},
    },
};
use std::collections::HashSet;

///
/// DistinctMerge
///
/// Drops tuples already seen on another shard, keeping first occurrence.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DistinctMerge;

impl ExitOperation for DistinctMerge {
    fn name(&self) -> &'static str {
        "distinct"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let tuples = non_null_tuples(tuples);
        let mut seen = HashSet::with_capacity(tuples.len());
        let mut distinct = Vec::with_capacity(tuples.len());

        for tuple in tuples {
            if seen.insert(tuple.clone()) {
                distinct.push(tuple);
            }
        }

        Ok(distinct)
    }
}
