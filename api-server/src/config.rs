//! Configuration module

use std::env;
use std::path::PathBuf;

use attrition_core::constants;
use attrition_core::PredictorConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Artifact, data and decision-policy settings
    pub predictor: PredictorConfig,

    /// Directory for narrative session logs
    pub outputs_dir: PathBuf,

    /// Narrative sessions kept for follow-up chat
    pub max_sessions: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),

            predictor: PredictorConfig::from_env(),

            outputs_dir: constants::get_outputs_dir().into(),

            max_sessions: constants::get_max_sessions(),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
