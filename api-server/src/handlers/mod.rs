//! HTTP handlers

pub mod health;
pub mod narrative;
pub mod pipeline;
pub mod predict;
