//! Prediction Service
//!
//! Vector -> (optional) scaling -> classifier -> threshold -> risk tier.

use std::borrow::Cow;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::artifacts::ModelArtifacts;
use super::risk::{RiskScheme, RiskTier};
use super::threshold::ThresholdConfig;
use crate::error::{AttritionError, Result};
use crate::logic::features::{FeatureVector, VectorOrigin};

/// Raw classifier decision for one vector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub probability: f64,
    pub will_leave: bool,
    pub risk_level: RiskTier,
}

#[derive(Debug, Clone)]
pub struct PredictionService {
    artifacts: Arc<ModelArtifacts>,
    threshold: ThresholdConfig,
    scheme: RiskScheme,
}

impl PredictionService {
    pub fn new(artifacts: Arc<ModelArtifacts>, threshold: ThresholdConfig, scheme: RiskScheme) -> Self {
        Self {
            artifacts,
            threshold,
            scheme,
        }
    }

    pub fn artifacts(&self) -> &Arc<ModelArtifacts> {
        &self.artifacts
    }

    pub fn threshold(&self) -> ThresholdConfig {
        self.threshold
    }

    pub fn scheme(&self) -> RiskScheme {
        self.scheme
    }

    /// Prepare the classifier input for `vector`.
    ///
    /// Test rows were persisted after scaling during training, so only
    /// profile-derived vectors pass through the scaler here.
    pub fn model_input<'a>(&self, vector: &'a FeatureVector) -> Result<Cow<'a, [f64]>> {
        // validate_hash logs the mismatch itself
        self.artifacts
            .layout()
            .validate_hash(vector.layout_hash(), vector.len())?;

        match vector.origin() {
            VectorOrigin::TestRow => Ok(Cow::Borrowed(vector.as_slice())),
            VectorOrigin::Profile => {
                let scaled = self
                    .artifacts
                    .scaler()
                    .transform(vector.as_slice())
                    .map_err(|e| {
                        log::error!("Scaler rejected feature vector: {}", e);
                        e
                    })?;
                Ok(Cow::Owned(scaled))
            }
        }
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        let input = self.model_input(vector)?;
        let probability = self
            .artifacts
            .classifier()
            .predict_proba(&input)
            .map_err(|e| {
                log::error!(
                    "Classifier '{}' rejected input: {}",
                    self.artifacts.classifier().name(),
                    e
                );
                e
            })?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(AttritionError::Artifact(format!(
                "classifier returned {} which is not a probability",
                probability
            )));
        }

        let prediction = self.classify(probability);
        log::debug!(
            "Predicted {:.4} ({}) for {:?} vector",
            prediction.probability,
            prediction.risk_level,
            vector.origin()
        );
        Ok(prediction)
    }

    /// Apply threshold and tiering to an already computed probability
    pub fn classify(&self, probability: f64) -> Prediction {
        Prediction {
            probability,
            will_leave: self.threshold.will_leave(probability),
            risk_level: self.scheme.tier(probability),
        }
    }
}
