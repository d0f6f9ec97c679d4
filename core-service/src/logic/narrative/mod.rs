//! Narrative Module - LLM engagement analysis
//!
//! Prompt assembly, the collaborator client, session logs and the analyzer
//! that ties them together.

pub mod analyzer;
pub mod client;
pub mod prompt;
pub mod session;
pub mod starters;

pub use analyzer::{Analysis, EngagementAnalyzer};
pub use client::{GeminiClient, NarrativeClient, NarrativeConfig};
pub use prompt::ChatContext;
pub use session::NarrativeSession;
pub use starters::conversation_starters;
