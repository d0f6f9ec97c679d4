//! Model Module - scaling, classification and decision policy
//!
//! The artifact bundle is loaded once; `PredictionService` turns feature
//! vectors into probabilities, decisions and risk tiers.

pub mod artifacts;
pub mod classifier;
#[cfg(feature = "onnx")]
pub mod onnx;
pub mod result;
pub mod risk;
pub mod scaler;
pub mod service;
pub mod threshold;

// Re-export common types
pub use artifacts::{ModelArtifacts, ModelMetadata};
pub use classifier::{Classifier, LogisticModel};
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;
pub use result::PredictionResult;
pub use risk::{RiskScheme, RiskTier};
pub use scaler::StandardScaler;
pub use service::{Prediction, PredictionService};
pub use threshold::{ThresholdConfig, DEFAULT_THRESHOLD};
