//! Full prediction record handed to the CLI, the HTTP layer and the
//! narrative layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::risk::RiskTier;
use crate::logic::features::{EmployeeProfile, LlmContext, NamedFeatures, VectorOrigin};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub employee_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_index: Option<usize>,
    pub attrition_probability: f64,
    pub will_leave: bool,
    pub risk_level: RiskTier,
    pub threshold: f64,
    /// Ground-truth label, test rows only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_attrition: Option<u8>,
    pub features: NamedFeatures,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_input: Option<EmployeeProfile>,
    #[serde(default)]
    pub llm_context: LlmContext,
    pub source: VectorOrigin,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn probability_percent(&self) -> f64 {
        self.attrition_probability * 100.0
    }

    pub fn decision_label(&self) -> &'static str {
        if self.will_leave {
            "Will Leave"
        } else {
            "Will Stay"
        }
    }

    /// Matches the ground-truth label when one is known
    pub fn is_correct(&self) -> Option<bool> {
        self.actual_attrition
            .map(|actual| (actual == 1) == self.will_leave)
    }
}
