//! LLM analysis and chat handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use attrition_core::logic::model::PredictionResult;
use attrition_core::logic::narrative::{Analysis, ChatContext, EngagementAnalyzer};

use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
    pub conversation_starters: Vec<String>,
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 4000))]
    pub question: String,
    pub session_id: Option<Uuid>,
    pub context: Option<ChatContext>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: Option<Uuid>,
}

pub(crate) fn analyzer(state: &AppState) -> AppResult<EngagementAnalyzer> {
    state.analyzer.clone().ok_or(AppError::NarrativeUnavailable)
}

/// Run the analysis off the async runtime and register its session
pub(crate) async fn run_analysis(
    state: &AppState,
    analyzer: EngagementAnalyzer,
    result: PredictionResult,
) -> AppResult<(Analysis, Option<Uuid>)> {
    let analysis =
        tokio::task::spawn_blocking(move || analyzer.analyze(&result)).await??;
    let session_id = analysis
        .session
        .as_ref()
        .map(|session| state.sessions.insert(Arc::clone(session)));
    Ok((analysis, session_id))
}

/// Narrative for a previously obtained prediction
pub async fn analyze(
    State(state): State<AppState>,
    Json(prediction): Json<PredictionResult>,
) -> AppResult<Json<AnalyzeResponse>> {
    let analyzer = analyzer(&state)?;
    let (analysis, session_id) = run_analysis(&state, analyzer, prediction).await?;

    Ok(Json(AnalyzeResponse {
        analysis: analysis.content,
        conversation_starters: analysis.conversation_starters,
        session_id,
    }))
}

/// Follow-up question, logged to the session when one is given
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    req.validate()?;
    let analyzer = analyzer(&state)?;

    let session = match req.session_id {
        Some(id) => Some(
            state
                .sessions
                .get(&id)
                .ok_or_else(|| AppError::NotFound(format!("Session {} not found", id)))?,
        ),
        None => None,
    };

    let question = req.question.trim().to_string();
    let context = req.context;
    let response = tokio::task::spawn_blocking(move || {
        analyzer.chat(&question, context.as_ref(), session.as_deref())
    })
    .await??;

    Ok(Json(ChatResponse {
        response,
        session_id: req.session_id,
    }))
}
