//! Prediction handlers

use axum::{extract::State, Json};
use serde::Deserialize;

use attrition_core::logic::dataset::TestDataInfo;
use attrition_core::logic::features::{EmployeeProfile, SimplifiedSchema};
use attrition_core::logic::model::PredictionResult;

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct TestRowRequest {
    /// Omitted: a random row is chosen
    pub employee_index: Option<usize>,
}

pub async fn schema(State(state): State<AppState>) -> Json<SimplifiedSchema> {
    Json(state.predictor.schema().clone())
}

pub async fn test_data_info(State(state): State<AppState>) -> Json<TestDataInfo> {
    Json(state.predictor.test_data_info())
}

pub(crate) fn resolve_index(state: &AppState, requested: Option<usize>) -> AppResult<usize> {
    match requested {
        Some(index) => Ok(index),
        None => state
            .predictor
            .random_test_index()
            .ok_or_else(|| AppError::NotFound("Test dataset is empty".to_string())),
    }
}

/// Predict a pre-encoded test row
pub async fn test_row(
    State(state): State<AppState>,
    Json(req): Json<TestRowRequest>,
) -> AppResult<Json<PredictionResult>> {
    let index = resolve_index(&state, req.employee_index)?;
    let result = state.predictor.predict_from_test_data(index)?;
    Ok(Json(result))
}

/// Predict from a simplified profile
pub async fn profile(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<PredictionResult>> {
    let profile = EmployeeProfile::from_json(body)?;
    let result = state.predictor.predict_profile(&profile)?;
    Ok(Json(result))
}
