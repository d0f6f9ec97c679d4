//! Feature Vector Builder
//!
//! Turns either a pre-encoded test row or a simplified profile into the exact
//! vector the scaler/classifier expect. Both paths are pure: the layout,
//! tables and dataset are read-only.

use std::sync::Arc;

use super::context::LlmContext;
use super::layout::ColumnLayout;
use super::profile::{AttributeValue, EmployeeProfile};
use super::tables::{CategoryLookup, EncodingTables};
use super::vector::{FeatureVector, VectorOrigin};
use crate::error::Result;
use crate::logic::dataset::TestDataset;

#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    layout: Arc<ColumnLayout>,
    tables: Arc<EncodingTables>,
}

impl FeatureVectorBuilder {
    /// Tables are checked against the layout here, once
    pub fn new(layout: Arc<ColumnLayout>, tables: Arc<EncodingTables>) -> Result<Self> {
        tables.validate(&layout)?;
        Ok(Self { layout, tables })
    }

    pub fn layout(&self) -> &Arc<ColumnLayout> {
        &self.layout
    }

    pub fn tables(&self) -> &EncodingTables {
        &self.tables
    }

    /// Restrict a stored test row to the layout columns. No transformation:
    /// stored rows are already encoded.
    pub fn build_from_test_row(&self, dataset: &TestDataset, index: usize) -> Result<FeatureVector> {
        self.layout.validate_hash(dataset.layout_hash(), dataset.column_count())?;
        let row = dataset.row(index)?;
        FeatureVector::from_values(self.layout.clone(), row.values.to_vec(), VectorOrigin::TestRow)
    }

    /// Assemble a vector from a simplified profile.
    ///
    /// Every layout column starts at 0.0. Numeric attributes are normalized
    /// into their own column, categorical selections set one one-hot column,
    /// and anything that maps to no column lands in the returned context.
    pub fn build_from_profile(&self, profile: &EmployeeProfile) -> (FeatureVector, LlmContext) {
        let mut vector = FeatureVector::zeroed(self.layout.clone(), VectorOrigin::Profile);
        let mut context = LlmContext::new();

        for (attribute, value) in profile.iter() {
            if let Some(norm) = self.tables.normalization(attribute) {
                match numeric_value(value) {
                    Some(raw) => {
                        vector.set(attribute, norm.apply(raw));
                    }
                    None => {
                        log::warn!("Non-numeric value for {}: {}", attribute, value);
                        context.insert(attribute, value.to_string());
                    }
                }
                continue;
            }

            let label = value.to_string();
            match self.tables.category_column(attribute, &label) {
                Some(CategoryLookup::Column(column)) => {
                    vector.set(column, 1.0);
                }
                Some(CategoryLookup::Reference) => {}
                Some(CategoryLookup::Unmapped) | None => {
                    context.insert(attribute, label);
                }
            }
        }

        // Omitted optional attributes carry "no information", not 0
        for (attribute, default) in &self.tables.defaults {
            if profile.get(attribute).is_none() {
                if let Some(norm) = self.tables.normalization(attribute) {
                    vector.set(attribute, norm.apply(*default));
                }
            }
        }

        log::debug!(
            "Built profile vector for {} ({} context entries)",
            profile.display_name(),
            context.len()
        );

        (vector, context)
    }
}

fn numeric_value(value: &AttributeValue) -> Option<f64> {
    match value {
        AttributeValue::Number(n) => Some(*n),
        AttributeValue::Text(s) => s.trim().parse().ok(),
    }
}
