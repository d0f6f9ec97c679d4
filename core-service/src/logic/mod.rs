//! Logic Module - Business Logic & Engines
//!
//! ## Architecture
//! - `features/` - Column layout, encoding tables, schema, vector builder
//! - `dataset/` - Pre-encoded test rows
//! - `model/` - Scaler, classifier, threshold and risk tiers
//! - `narrative/` - LLM engagement analysis and session logs
//! - `predictor` - Facade used by the CLI and HTTP service

pub mod dataset;
pub mod features;
pub mod model;
pub mod narrative;
pub mod predictor;

#[cfg(test)]
pub mod fixtures;

pub use predictor::{AttritionPredictor, PredictorConfig};
