//! Error taxonomy for the attrition engine.
//!
//! Boundary layers map these onto their own surfaces: the CLI re-prompts on
//! `Validation`, the HTTP service turns `NotFound` into a 404 and so on.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AttritionError>;

#[derive(Debug, Error)]
pub enum AttritionError {
    /// Test-row index outside `[0, N-1]`.
    #[error("{message}")]
    NotFound {
        index: usize,
        max_index: Option<usize>,
        message: String,
    },

    /// Out-of-range or unparsable user input.
    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },

    /// The vector handed to the scaler/classifier does not match what they
    /// were fit on. Never corrected silently.
    #[error("Model input mismatch: expected {expected} columns, got {actual} ({detail})")]
    ModelInput {
        expected: usize,
        actual: usize,
        detail: String,
    },

    /// The narrative collaborator failed or timed out.
    #[error("Narrative generation failed: {0}")]
    UpstreamNarrative(String),

    /// Inconsistent artifacts, tables or schema detected at load time.
    #[error("Artifact error: {0}")]
    Artifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AttritionError {
    pub fn not_found(index: usize, len: usize) -> Self {
        let max_index = len.checked_sub(1);
        let message = match max_index {
            Some(max) => format!("Employee index {} not found. Max index: {}", index, max),
            None => format!("Employee index {} not found. Test dataset is empty", index),
        };
        AttritionError::NotFound { index, max_index, message }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AttritionError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn model_input(expected: usize, actual: usize, detail: impl Into<String>) -> Self {
        AttritionError::ModelInput {
            expected,
            actual,
            detail: detail.into(),
        }
    }

    /// Recoverable errors leave the request retryable with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AttritionError::NotFound { .. }
                | AttritionError::Validation { .. }
                | AttritionError::UpstreamNarrative(_)
        )
    }
}
