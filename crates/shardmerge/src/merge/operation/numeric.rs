use crate::error::InternalError;

///
/// FloatSum
///
/// Neumaier-compensated f64 accumulator for Float64 partials. Float values
/// stay in the f64 domain: the decimal accumulator would truncate tiny
/// magnitudes and reject anything past its ~7.9e28 range.
///

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FloatSum {
    sum: f64,
    compensation: f64,
}

impl FloatSum {
    pub(crate) fn add(&mut self, value: f64) {
        let total = self.sum + value;
        if self.sum.abs() >= value.abs() {
            self.compensation += (self.sum - total) + value;
        } else {
            self.compensation += (value - total) + self.sum;
        }
        self.sum = total;
    }

    /// The compensated total; fails once it leaves the finite range.
    pub(crate) fn total(self) -> Result<f64, InternalError> {
        let total = self.sum + self.compensation;
        if total.is_finite() {
            Ok(total)
        } else {
            Err(InternalError::merge_internal(
                "float accumulator overflowed the finite f64 range",
            ))
        }
    }
}

///
/// TESTS
///
