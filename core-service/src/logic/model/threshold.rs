//! Decision Threshold Configuration
//!
//! Probability cutoff at or above which an employee is classified as
//! "will leave".

use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};

/// Calibrated cutoff for the shipped classifier. Chosen on the validation
/// set to trade recall for precision on the minority class; 0.5 is not the
/// intended operating point.
pub const DEFAULT_THRESHOLD: f64 = 0.68;

/// Threshold Configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Base threshold (0.0 - 1.0)
    pub base_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            base_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    pub fn new(base: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&base) {
            return Err(AttritionError::validation(
                "threshold",
                format!("must be within [0, 1], got {}", base),
            ));
        }
        Ok(Self { base_threshold: base })
    }

    /// Closed at the threshold: `p == threshold` leaves
    pub fn will_leave(&self, probability: f64) -> bool {
        probability >= self.base_threshold
    }
}
