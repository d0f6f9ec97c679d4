//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use attrition_core::logic::model::ModelMetadata;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    timestamp: i64,
    model: ModelMetadata,
    test_employees: usize,
    narrative_enabled: bool,
    active_sessions: usize,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        timestamp: chrono::Utc::now().timestamp(),
        model: state.predictor.service().artifacts().metadata().clone(),
        test_employees: state.predictor.test_data_info().total_employees,
        narrative_enabled: state.analyzer.is_some(),
        active_sessions: state.sessions.len(),
    })
}
