//! Features Module - Feature Vector Builder
//!
//! Converts test rows and simplified profiles into the ordered vector the
//! trained scaler/classifier expect.
//!
//! - `layout` - ordered model columns (single source of truth for order)
//! - `tables` - normalization / default / categorical encoding tables
//! - `schema` - simplified-attribute schema used at input boundaries
//! - `builder` - the two build paths

pub mod builder;
pub mod context;
pub mod layout;
pub mod profile;
pub mod schema;
pub mod tables;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use builder::FeatureVectorBuilder;
pub use context::LlmContext;
pub use layout::{compute_layout_hash, ColumnLayout, LayoutInfo};
pub use profile::{AttributeValue, EmployeeProfile, NAME_KEY};
pub use schema::{AttributeKind, AttributeSpec, CategoricalPolicy, InfoField, SimplifiedSchema};
pub use tables::{CategoryLookup, EncodingTables, Normalization};
pub use vector::{FeatureVector, NamedFeatures, VectorOrigin};
