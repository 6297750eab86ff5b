use serde::{Deserialize, Serialize};

/// Number of minor units (e.g. cents) in one major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// A monetary amount expressed as an integer number of minor currency units, which is how the order-management API
/// reports order totals (`"value": 12345` means 123.45).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// The amount in major units. `12345` minor units convert to exactly `123.45`: the division is correctly rounded,
    /// so the result is the closest `f64` to the decimal value.
    #[allow(clippy::cast_precision_loss)]
    pub fn to_major(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS_PER_MAJOR as f64
    }
}

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}
