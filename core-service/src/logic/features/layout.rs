//! Column Layout - Centralized Feature Definition
//!
//! **CRITICAL: This type controls the feature schema**
//!
//! The ordered column list persisted at training time is the single source of
//! truth for FeatureVector key order. The scaler and classifier were fit on
//! exactly this order, so it is never re-sorted or regenerated: it is loaded
//! as-is and every downstream artifact is checked against its hash.

use std::collections::HashMap;
use std::path::Path;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of an ordered column list
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash<S: AsRef<str>>(names: &[S]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&(names.len() as u32).to_le_bytes());

    // Hash all column names in order
    for name in names {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// COLUMN LAYOUT
// ============================================================================

/// Ordered model columns with O(1) name lookup
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    names: Vec<String>,
    index: HashMap<String, usize>,
    hash: u32,
}

impl ColumnLayout {
    /// Build a layout from column names in training order
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(AttritionError::Artifact("Column layout is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(AttritionError::Artifact(format!(
                    "Duplicate column in layout: {}",
                    name
                )));
            }
        }

        let hash = compute_layout_hash(&names);

        Ok(Self { names, index, hash })
    }

    /// Load `feature_columns.json` (a JSON array of column names)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let names: Vec<String> = serde_json::from_str(&content)?;
        let layout = Self::new(names)?;

        log::info!(
            "Loaded column layout from {} ({} columns, hash {:08x})",
            path.display(),
            layout.len(),
            layout.hash()
        );

        Ok(layout)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// Get column index by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get column name by index
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// True when `names` is this layout in the same order
    pub fn matches(&self, names: &[String]) -> bool {
        self.names.as_slice() == names
    }

    /// Validate that data produced for another layout is compatible
    pub fn validate_hash(&self, incoming_hash: u32, incoming_len: usize) -> Result<()> {
        if incoming_hash != self.hash || incoming_len != self.len() {
            let err = AttritionError::model_input(
                self.len(),
                incoming_len,
                format!(
                    "layout hash {:08x} does not match expected {:08x}",
                    incoming_hash, self.hash
                ),
            );
            log::error!("{}", err);
            return Err(err);
        }
        Ok(())
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            hash: self.hash,
            feature_count: self.len(),
            feature_names: self.names.clone(),
        }
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
