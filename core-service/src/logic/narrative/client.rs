//! Narrative collaborator client
//!
//! Blocking calls to the Generative Language `generateContent` endpoint.
//! Callers running on an async runtime must move calls onto a blocking thread.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::constants;
use crate::error::{AttritionError, Result};

/// Produces free text for a (system, user) message pair
pub trait NarrativeClient: Send + Sync {
    fn complete(&self, system: &str, user: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl NarrativeConfig {
    /// `None` when no API key is configured
    pub fn from_env() -> Option<Self> {
        let api_key = constants::get_google_api_key()?;
        Some(Self {
            api_key,
            model: constants::get_llm_model(),
            base_url: constants::get_llm_base_url(),
            temperature: constants::DEFAULT_LLM_TEMPERATURE,
            timeout_secs: constants::get_llm_timeout_secs(),
        })
    }
}

// ============================================================================
// RESPONSE SHAPE
// ============================================================================

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AttritionError::UpstreamNarrative("response had no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AttritionError::UpstreamNarrative(format!(
            "empty response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }
    Ok(text)
}

// ============================================================================
// GEMINI
// ============================================================================

pub struct GeminiClient {
    agent: ureq::Agent,
    config: NarrativeConfig,
}

impl GeminiClient {
    pub fn new(config: NarrativeConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { agent, config }
    }

    pub fn from_env() -> Option<Self> {
        NarrativeConfig::from_env().map(Self::new)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl NarrativeClient for GeminiClient {
    fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "systemInstruction": { "parts": [{ "text": system }] },
            "contents": [{ "role": "user", "parts": [{ "text": user }] }],
            "generationConfig": { "temperature": self.config.temperature },
        });

        log::debug!("Requesting narrative from {}", self.config.model);

        let response = self
            .agent
            .post(&self.endpoint())
            .set("x-goog-api-key", &self.config.api_key)
            .send_json(body);

        match response {
            Ok(resp) => {
                let parsed: GenerateResponse = resp
                    .into_json()
                    .map_err(|e| AttritionError::UpstreamNarrative(format!("invalid response: {}", e)))?;
                extract_text(parsed)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let detail = resp.into_string().unwrap_or_default();
                log::warn!("Narrative request rejected with status {}", code);
                Err(AttritionError::UpstreamNarrative(format!(
                    "status {}: {}",
                    code,
                    detail.chars().take(300).collect::<String>()
                )))
            }
            Err(e) => {
                log::warn!("Narrative request failed: {}", e);
                Err(AttritionError::UpstreamNarrative(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "## Risk" }, { "text": "\nHigh" }] },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "## Risk\nHigh");
    }

    #[test]
    fn test_extract_text_rejects_empty() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        }))
        .unwrap();
        let err = extract_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));

        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(
            extract_text(response),
            Err(AttritionError::UpstreamNarrative(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let client = GeminiClient::new(NarrativeConfig {
            api_key: "k".into(),
            model: "gemini-1.5-flash".into(),
            base_url: "https://example.test/v1beta/".into(),
            temperature: 0.7,
            timeout_secs: 5,
        });
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
