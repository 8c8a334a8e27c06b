use derive_more::{Add, AddAssign, Display, FromStr, Sum};
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal as WrappedDecimal;

///
/// Decimal
///
/// Arbitrary-precision accumulator used by SUM and AVG merges so that
/// combining many shard partials does not drift the way f64 addition does.
///

#[derive(
    Add,
    AddAssign,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Sum,
)]
pub struct Decimal(WrappedDecimal);

impl Decimal {
    pub const ZERO: Self = Self(WrappedDecimal::ZERO);

    #[must_use]
    /// Construct a decimal from mantissa and scale.
    pub fn new(num: i64, scale: u32) -> Self {
        Self(WrappedDecimal::new(num, scale))
    }

    #[must_use]
    pub fn from_i64(n: i64) -> Self {
        Self(WrappedDecimal::from(n))
    }

    #[must_use]
    pub fn from_u64(n: u64) -> Self {
        Self(WrappedDecimal::from(n))
    }

    /// Lossy conversion from a finite f64; `None` when out of range.
    #[must_use]
    pub fn from_f64(n: f64) -> Option<Self> {
        WrappedDecimal::from_f64(n).map(Self)
    }

    ///
    /// CHECKED ARITHMETIC
    ///

    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    #[must_use]
    pub fn checked_mul(self, rhs: Self) -> Option<Self> {
        self.0.checked_mul(rhs.0).map(Self)
    }

    /// Checked division; returns `None` on division by zero or overflow.
    #[must_use]
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        self.0.checked_div(rhs.0).map(Self)
    }

    ///
    /// CONVERSIONS
    ///

    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        if self.is_integer() {
            self.0.to_i64()
        } else {
            None
        }
    }

    #[must_use]
    pub fn to_u64(&self) -> Option<u64> {
        if self.is_integer() {
            self.0.to_u64()
        } else {
            None
        }
    }

    #[must_use]
    pub fn to_f64(&self) -> Option<f64> {
        self.0.to_f64()
    }

    /// Returns true if the normalized decimal has no fractional component.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.normalize().scale() == 0
    }

    #[must_use]
    /// Normalize trailing zeros.
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl From<WrappedDecimal> for Decimal {
    fn from(d: WrappedDecimal) -> Self {
        Self(d)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::from_i64(n)
    }
}

///
/// TESTS
///
