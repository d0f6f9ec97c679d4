//! Feature Vector - Core data structure for ML input
//!
//! **Layout-bound feature vector**
//!
//! A vector always holds exactly one value per layout column, in layout
//! order, and remembers the hash of the layout it was built for so the
//! prediction service can refuse a vector from a different artifact set.

use std::fmt;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::layout::ColumnLayout;
use crate::error::{AttritionError, Result};

// ============================================================================
// ORIGIN
// ============================================================================

/// Which builder path produced a vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorOrigin {
    /// Pre-encoded row from the persisted test dataset
    TestRow,
    /// Assembled from a simplified, human-entered profile
    Profile,
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Feature values keyed by the model's column layout
#[derive(Debug, Clone)]
pub struct FeatureVector {
    layout: Arc<ColumnLayout>,
    values: Vec<f64>,
    origin: VectorOrigin,
}

impl FeatureVector {
    /// Every layout column set to 0.0
    pub fn zeroed(layout: Arc<ColumnLayout>, origin: VectorOrigin) -> Self {
        let values = vec![0.0; layout.len()];
        Self { layout, values, origin }
    }

    /// Wrap values already in layout order
    pub fn from_values(
        layout: Arc<ColumnLayout>,
        values: Vec<f64>,
        origin: VectorOrigin,
    ) -> Result<Self> {
        if values.len() != layout.len() {
            return Err(AttritionError::model_input(
                layout.len(),
                values.len(),
                "feature vector length differs from column layout",
            ));
        }
        Ok(Self { layout, values, origin })
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout.hash()
    }

    pub fn origin(&self) -> VectorOrigin {
        self.origin
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in layout order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Get feature by column name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.layout.index_of(name).map(|i| self.values[i])
    }

    /// Set feature by column name; false if the column is not in the layout
    pub(crate) fn set(&mut self, name: &str, value: f64) -> bool {
        match self.layout.index_of(name) {
            Some(i) => {
                self.values[i] = value;
                true
            }
            None => false,
        }
    }

    /// (column, value) pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.layout
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Owned copy for echoing into a prediction result
    pub fn to_named(&self) -> NamedFeatures {
        NamedFeatures(
            self.iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

// ============================================================================
// NAMED FEATURES
// ============================================================================

/// Ordered column → value pairs, serialized as a JSON object in layout order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedFeatures(pub Vec<(String, f64)>);

impl NamedFeatures {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Suffixes of one-hot columns under `prefix` that are set to 1.0
    pub fn active_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0.iter().filter_map(move |(name, value)| {
            if *value == 1.0 {
                name.strip_prefix(prefix)
            } else {
                None
            }
        })
    }

    /// Suffix of the largest positive column under `prefix`. Decodes both
    /// raw one-hot rows and rows stored after scaling, where the active
    /// column is the only one above its mean.
    pub fn dominant_with_prefix<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        self.0
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .filter_map(|(name, value)| name.strip_prefix(prefix).map(|suffix| (suffix, *value)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(suffix, _)| suffix)
    }
}

impl Serialize for NamedFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NamedFeatures {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct NamedVisitor;

        impl<'de> Visitor<'de> for NamedVisitor {
            type Value = NamedFeatures;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to number")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    entries.push((name, value));
                }
                Ok(NamedFeatures(entries))
            }
        }

        deserializer.deserialize_map(NamedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> Arc<ColumnLayout> {
        Arc::new(
            ColumnLayout::new(vec![
                "Age".to_string(),
                "Department_Sales".to_string(),
                "Department_Research & Development".to_string(),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_zeroed_vector_covers_layout() {
        let v = FeatureVector::zeroed(layout(), VectorOrigin::Profile);
        assert_eq!(v.len(), 3);
        assert!(v.iter().all(|(_, value)| value == 0.0));
    }

    #[test]
    fn test_set_unknown_column_is_rejected() {
        let mut v = FeatureVector::zeroed(layout(), VectorOrigin::Profile);
        assert!(v.set("Age", 1.5));
        assert!(!v.set("Department_Marketing", 1.0));
        assert_eq!(v.get("Age"), Some(1.5));
        assert_eq!(v.get("Department_Marketing"), None);
    }

    #[test]
    fn test_from_values_length_mismatch() {
        let result = FeatureVector::from_values(layout(), vec![0.0; 2], VectorOrigin::TestRow);
        assert!(matches!(
            result,
            Err(AttritionError::ModelInput { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_serialization_keeps_layout_order() {
        let mut v = FeatureVector::zeroed(layout(), VectorOrigin::Profile);
        v.set("Department_Sales", 1.0);

        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(
            json,
            r#"{"Age":0.0,"Department_Sales":1.0,"Department_Research & Development":0.0}"#
        );

        let named: NamedFeatures = serde_json::from_str(&json).unwrap();
        assert_eq!(named, v.to_named());
        assert_eq!(named.0[2].0, "Department_Research & Development");
    }

    #[test]
    fn test_active_with_prefix() {
        let mut v = FeatureVector::zeroed(layout(), VectorOrigin::Profile);
        v.set("Department_Sales", 1.0);
        let named = v.to_named();
        let active: Vec<&str> = named.active_with_prefix("Department_").collect();
        assert_eq!(active, vec!["Sales"]);
    }

    #[test]
    fn test_dominant_with_prefix_on_scaled_values() {
        let mut v = FeatureVector::zeroed(layout(), VectorOrigin::TestRow);
        v.set("Department_Research & Development", 0.73);
        v.set("Department_Sales", -0.66);
        let named = v.to_named();
        assert_eq!(
            named.dominant_with_prefix("Department_"),
            Some("Research & Development")
        );

        let zeroed = FeatureVector::zeroed(layout(), VectorOrigin::Profile).to_named();
        assert_eq!(zeroed.dominant_with_prefix("Department_"), None);
    }
}
