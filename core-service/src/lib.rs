//! Employee attrition engine
//!
//! Feature vector construction from pre-encoded test rows or simplified
//! profiles, probability scoring against trained artifacts and optional
//! LLM engagement narratives.

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{AttritionError, Result};
pub use logic::{AttritionPredictor, PredictorConfig};
