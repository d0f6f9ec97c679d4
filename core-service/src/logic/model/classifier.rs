//! Binary classifiers returning P(attrition = 1).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};

/// A fitted binary classifier over a fixed column count.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    fn n_features(&self) -> usize;

    /// Column names the model was fit on, when the artifact records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Probability of the positive class for a single row
    fn predict_proba(&self, row: &[f64]) -> Result<f64>;
}

/// Logistic regression exported as plain coefficients.
///
/// Stored as `attrition_model.json`:
/// `{ "feature_names": [...], "coefficients": [...], "intercept": f }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            feature_names: None,
            coefficients,
            intercept,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AttritionError::Artifact(format!("cannot read model {}: {}", path.display(), e))
        })?;
        let model: LogisticModel = serde_json::from_str(&raw)?;
        if let Some(names) = &model.feature_names {
            if names.len() != model.coefficients.len() {
                return Err(AttritionError::Artifact(format!(
                    "model lists {} feature names for {} coefficients",
                    names.len(),
                    model.coefficients.len()
                )));
            }
        }
        if model.coefficients.iter().any(|c| !c.is_finite()) || !model.intercept.is_finite() {
            return Err(AttritionError::Artifact(
                "model coefficients must be finite".to_string(),
            ));
        }
        log::info!(
            "Loaded logistic model from {} ({} coefficients)",
            path.display(),
            model.coefficients.len()
        );
        Ok(model)
    }

    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.intercept
            + row
                .iter()
                .zip(&self.coefficients)
                .map(|(x, w)| x * w)
                .sum::<f64>()
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl Classifier for LogisticModel {
    fn name(&self) -> &str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.coefficients.len() {
            return Err(AttritionError::model_input(
                self.coefficients.len(),
                row.len(),
                "classifier input",
            ));
        }
        Ok(sigmoid(self.decision_function(row)))
    }
}
