//! Path cost value type.
//!
//! Problems report transition costs as raw `f64`. Solvers convert each one
//! through [`Cost::new`] at the point of use, so a negative or non-finite cost
//! is rejected before it can reach the frontier.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Why a raw `f64` is not a valid transition cost.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CostError {
    /// The value is below zero.
    #[error("negative cost {raw}")]
    Negative { raw: f64 },
    /// The value is NaN or infinite.
    #[error("non-finite cost {raw}")]
    NotFinite { raw: f64 },
}

/// A finite, non-negative cost.
///
/// `Ord` is total (via [`f64::total_cmp`]), which is sound because NaN and
/// negative zero never get inside. Path costs are accumulated with
/// [`Cost::checked_add`], so an overflowing sum is an error rather than `+inf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cost(f64);

impl Cost {
    /// The cost of the empty path.
    pub const ZERO: Self = Self(0.0);

    /// Validate a raw transition cost.
    ///
    /// `-0.0` is normalized to `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::NotFinite`] for NaN or infinities and
    /// [`CostError::Negative`] for values below zero.
    pub fn new(raw: f64) -> Result<Self, CostError> {
        if !raw.is_finite() {
            return Err(CostError::NotFinite { raw });
        }
        if raw < 0.0 {
            return Err(CostError::Negative { raw });
        }
        // Adding 0.0 maps -0.0 to +0.0 and leaves every other value unchanged.
        Ok(Self(raw + 0.0))
    }

    /// Sum of two costs.
    ///
    /// # Errors
    ///
    /// [`CostError::NotFinite`] if the sum overflows to infinity.
    pub fn checked_add(self, rhs: Self) -> Result<Self, CostError> {
        let sum = self.0 + rhs.0;
        if sum.is_finite() {
            Ok(Self(sum))
        } else {
            Err(CostError::NotFinite { raw: sum })
        }
    }

    /// The underlying value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Decimal rendering used in canonical artifacts.
    ///
    /// Canonical JSON carries integers only, so costs travel as strings.
    /// Rust's shortest round-trip formatting makes this deterministic.
    #[must_use]
    pub fn to_canonical_string(self) -> String {
        format!("{}", self.0)
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
