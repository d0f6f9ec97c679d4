//! Prediction followed by narrative analysis in one call

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attrition_core::logic::features::EmployeeProfile;
use attrition_core::logic::model::PredictionResult;
use attrition_core::logic::narrative::conversation_starters;

use super::narrative::{analyzer, run_analysis};
use super::predict::resolve_index;
use crate::{AppError, AppResult, AppState};

/// Exactly one of `employee_index` or `profile`; neither means a random test row
#[derive(Debug, Default, Deserialize)]
pub struct PipelineRequest {
    pub employee_index: Option<usize>,
    pub profile: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PipelineResponse {
    pub prediction: PredictionResult,
    pub analysis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    pub conversation_starters: Vec<String>,
    pub session_id: Option<Uuid>,
}

pub async fn run(
    State(state): State<AppState>,
    Json(req): Json<PipelineRequest>,
) -> AppResult<Json<PipelineResponse>> {
    let prediction = match (req.employee_index, req.profile) {
        (Some(_), Some(_)) => {
            return Err(AppError::ValidationError(
                "Provide either employee_index or profile, not both".to_string(),
            ))
        }
        (_, Some(body)) => {
            let profile = EmployeeProfile::from_json(body)?;
            state.predictor.predict_profile(&profile)?
        }
        (requested, None) => {
            let index = resolve_index(&state, requested)?;
            state.predictor.predict_from_test_data(index)?
        }
    };

    let starters = conversation_starters(prediction.attrition_probability)
        .iter()
        .map(|s| s.to_string())
        .collect();

    // The prediction stands even when the narrative fails
    let outcome = match analyzer(&state) {
        Ok(analyzer) => run_analysis(&state, analyzer, prediction.clone()).await,
        Err(e) => Err(e),
    };

    let response = match outcome {
        Ok((analysis, session_id)) => PipelineResponse {
            prediction,
            analysis: Some(analysis.content),
            analysis_error: None,
            conversation_starters: analysis.conversation_starters,
            session_id,
        },
        Err(e) => {
            tracing::warn!("Pipeline analysis for {} failed: {:?}", prediction.employee_name, e);
            let reason = e.public_message().to_string();
            PipelineResponse {
                prediction,
                analysis: None,
                analysis_error: Some(reason),
                conversation_starters: starters,
                session_id: None,
            }
        }
    };

    Ok(Json(response))
}
