//! Engagement Analyzer
//!
//! Turns a prediction into an HR narrative and answers follow-up questions.
//! Narrative failures surface as `UpstreamNarrative` and never touch the
//! prediction itself.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::client::NarrativeClient;
use super::prompt::{analysis_prompt, chat_prompt, ChatContext, ANALYSIS_SYSTEM_PROMPT};
use super::session::NarrativeSession;
use super::starters::conversation_starters;
use crate::error::Result;
use crate::logic::model::PredictionResult;

/// Analysis text plus the session its follow-ups are logged to
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub content: String,
    pub conversation_starters: Vec<String>,
    #[serde(skip)]
    pub session: Option<Arc<NarrativeSession>>,
}

#[derive(Clone)]
pub struct EngagementAnalyzer {
    client: Arc<dyn NarrativeClient>,
    outputs_dir: PathBuf,
}

impl EngagementAnalyzer {
    pub fn new(client: Arc<dyn NarrativeClient>, outputs_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            outputs_dir: outputs_dir.into(),
        }
    }

    pub fn outputs_dir(&self) -> &std::path::Path {
        &self.outputs_dir
    }

    pub fn analyze(&self, result: &PredictionResult) -> Result<Analysis> {
        let prompt = analysis_prompt(result);
        let content = self.client.complete(ANALYSIS_SYSTEM_PROMPT, &prompt)?;

        // A log that cannot be written does not discard the analysis
        let session = match NarrativeSession::create(&self.outputs_dir, result, &content) {
            Ok(session) => Some(Arc::new(session)),
            Err(e) => {
                log::warn!("Could not save analysis for {}: {}", result.employee_name, e);
                None
            }
        };

        Ok(Analysis {
            content,
            conversation_starters: conversation_starters(result.attrition_probability)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            session,
        })
    }

    /// Answer a follow-up question. With a session, its context is used and
    /// the exchange is logged; otherwise `context` (if any) frames the question.
    pub fn chat(
        &self,
        question: &str,
        context: Option<&ChatContext>,
        session: Option<&NarrativeSession>,
    ) -> Result<String> {
        let context = session.map(|s| s.context()).or(context);
        let (system, user) = chat_prompt(question, context);
        let response = self.client.complete(system, &user)?;

        if let Some(session) = session {
            if let Err(e) = session.append_exchange(question, &response) {
                log::warn!("Could not log chat exchange: {}", e);
            }
        }
        Ok(response)
    }
}
