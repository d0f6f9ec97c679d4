//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use attrition_core::AttritionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Resource errors
    NotFound(String),

    // Validation errors
    ValidationError(String),

    // Vector/artifact mismatch
    ModelInputError(String),

    // Narrative collaborator errors
    UpstreamNarrative(String),
    NarrativeUnavailable,

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ModelInputError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamNarrative(_) => StatusCode::BAD_GATEWAY,
            AppError::NarrativeUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API clients; internal detail stays in the logs
    pub fn public_message(&self) -> &str {
        match self {
            AppError::NotFound(msg)
            | AppError::ValidationError(msg)
            | AppError::UpstreamNarrative(msg) => msg,
            AppError::ModelInputError(_) => "Model input mismatch",
            AppError::NarrativeUnavailable => "Narrative analysis is not configured",
            AppError::InternalError(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ModelInputError(msg) => tracing::error!("Model input error: {}", msg),
            AppError::UpstreamNarrative(msg) => tracing::warn!("Narrative service error: {}", msg),
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let status = self.status();
        let body = Json(json!({
            "error": self.public_message(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<AttritionError> for AppError {
    fn from(err: AttritionError) -> Self {
        match err {
            AttritionError::NotFound { message, .. } => AppError::NotFound(message),
            e @ AttritionError::Validation { .. } => AppError::ValidationError(e.to_string()),
            e @ AttritionError::ModelInput { .. } => AppError::ModelInputError(e.to_string()),
            AttritionError::UpstreamNarrative(msg) => AppError::UpstreamNarrative(msg),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err = AppError::InternalError("background task failed: panicked".to_string());
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = AppError::ModelInputError("expected 78 columns, got 77".to_string());
        assert_eq!(err.public_message(), "Model input mismatch");

        let err = AppError::UpstreamNarrative("quota exceeded".to_string());
        assert_eq!(err.public_message(), "quota exceeded");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }
}
