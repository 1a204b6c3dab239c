//! Tolerance ratio for cross-database comparisons

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Minimum fraction of the secondary count the primary count must reach.
///
/// A check passes when `secondary * ratio <= primary`. The default of `1.0`
/// requires the primary database to hold at least as many rows as the
/// secondary. Ratios above `1.0` are accepted but require the primary to
/// exceed the secondary by a margin.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Exact match: the primary must not fall below the secondary
    pub const EXACT: Tolerance = Tolerance(1.0);

    /// Create a tolerance, rejecting zero, negative and non-finite ratios
    pub fn new(ratio: f64) -> CoreResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(CoreError::InvalidTolerance { value: ratio });
        }
        if ratio > 1.0 {
            log::warn!(
                "Tolerance {} is above 1: the primary count must exceed the secondary count",
                ratio
            );
        }
        Ok(Self(ratio))
    }

    /// The raw ratio
    pub fn ratio(&self) -> f64 {
        self.0
    }

    /// The ratio expressed as a percentage (e.g. `0.95` -> `95`)
    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }

    /// Does `primary` reach this fraction of `secondary`?
    pub fn accepts(&self, primary: i64, secondary: i64) -> bool {
        (secondary as f64) * self.0 <= primary as f64
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::EXACT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Tolerance::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(t: Tolerance) -> Self {
        t.0
    }
}

impl std::fmt::Display for Tolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pct = (self.percent() * 1e6).round() / 1e6;
        write!(f, "{}%", pct)
    }
}

#[cfg(test)]
#[path = "tolerance_test.rs"]
mod tests;
