//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden from the environment (or a `.env` file).

use crate::logic::model::{RiskScheme, DEFAULT_THRESHOLD};
use crate::logic::features::CategoricalPolicy;

/// Directory holding `feature_columns.json`, `scaler.json` and the classifier
pub const DEFAULT_ARTIFACTS_DIR: &str = "models";

/// Pre-encoded test rows persisted alongside the training run
pub const DEFAULT_TEST_DATA_PATH: &str = "data/test_data/test_data_with_predictions.csv";

/// Simplified-attribute schema
pub const DEFAULT_SCHEMA_PATH: &str = "config/simplified_features.json";

/// Narrative session logs
pub const DEFAULT_OUTPUTS_DIR: &str = "outputs";

/// Narrative sessions the HTTP server keeps for follow-up chat
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Generative Language model used for narratives
pub const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash";

/// Generative Language API base URL
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Sampling temperature for narratives
pub const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;

/// Narrative request timeout (seconds)
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Employee Attrition Analysis";

// ============================================
// Helper functions to read from env with fallback
// ============================================

pub fn get_artifacts_dir() -> String {
    std::env::var("ATTRITION_ARTIFACTS_DIR")
        .unwrap_or_else(|_| DEFAULT_ARTIFACTS_DIR.to_string())
}

pub fn get_test_data_path() -> String {
    std::env::var("ATTRITION_TEST_DATA")
        .unwrap_or_else(|_| DEFAULT_TEST_DATA_PATH.to_string())
}

/// Schema file; the built-in schema is used when the file does not exist
pub fn get_schema_path() -> String {
    std::env::var("ATTRITION_SCHEMA")
        .unwrap_or_else(|_| DEFAULT_SCHEMA_PATH.to_string())
}

/// Optional JSON replacement for the built-in encoding tables
pub fn get_encoding_path() -> Option<String> {
    std::env::var("ATTRITION_ENCODING").ok().filter(|s| !s.is_empty())
}

pub fn get_outputs_dir() -> String {
    std::env::var("ATTRITION_OUTPUTS_DIR")
        .unwrap_or_else(|_| DEFAULT_OUTPUTS_DIR.to_string())
}

/// Decision threshold; invalid or out-of-range values fall back to the default
pub fn get_threshold() -> f64 {
    std::env::var("ATTRITION_THRESHOLD")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|t| (0.0..=1.0).contains(t))
        .unwrap_or(DEFAULT_THRESHOLD)
}

pub fn get_risk_scheme() -> RiskScheme {
    std::env::var("ATTRITION_RISK_SCHEME")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

pub fn get_categorical_policy() -> CategoricalPolicy {
    std::env::var("ATTRITION_CATEGORICAL_POLICY")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Session cap; zero or unparsable values fall back to the default
pub fn get_max_sessions() -> usize {
    std::env::var("ATTRITION_MAX_SESSIONS")
        .ok()
        .and_then(|n| n.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_SESSIONS)
}

/// API key for the narrative collaborator, if configured
pub fn get_google_api_key() -> Option<String> {
    std::env::var("GOOGLE_API_KEY").ok().filter(|s| !s.is_empty())
}

pub fn get_llm_model() -> String {
    std::env::var("ATTRITION_LLM_MODEL")
        .unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string())
}

pub fn get_llm_base_url() -> String {
    std::env::var("ATTRITION_LLM_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string())
}

pub fn get_llm_timeout_secs() -> u64 {
    std::env::var("ATTRITION_LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_sessions_falls_back_to_default() {
        std::env::remove_var("ATTRITION_MAX_SESSIONS");
        assert_eq!(get_max_sessions(), DEFAULT_MAX_SESSIONS);
        assert_eq!(DEFAULT_MAX_SESSIONS, 256);
    }
}
