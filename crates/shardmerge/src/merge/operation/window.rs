use crate::{
    error::InternalError,
    merge::{
        operation::ExitOperation,
        tuple::{Tuple, non_null_tuples},
    },
};

///
/// FirstResultMerge
///
/// OFFSET over the globally ordered sequence.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FirstResultMerge {
    offset: usize,
}

impl FirstResultMerge {
    #[must_use]
    pub const fn new(offset: usize) -> Self {
        Self { offset }
    }
}

impl ExitOperation for FirstResultMerge {
    fn name(&self) -> &'static str {
        "first_result"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let mut tuples = non_null_tuples(tuples);
        if self.offset >= tuples.len() {
            return Ok(Vec::new());
        }

        tuples.drain(..self.offset);
        Ok(tuples)
    }
}

///
/// MaxResultsMerge
///
/// LIMIT over the globally ordered sequence; keeps a prefix.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MaxResultsMerge {
    limit: usize,
}

impl MaxResultsMerge {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl ExitOperation for MaxResultsMerge {
    fn name(&self) -> &'static str {
        "max_results"
    }

    fn apply(&self, tuples: Vec<Tuple>) -> Result<Vec<Tuple>, InternalError> {
        let mut tuples = non_null_tuples(tuples);
        tuples.truncate(self.limit);

        Ok(tuples)
    }
}
