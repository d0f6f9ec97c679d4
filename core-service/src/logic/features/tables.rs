//! Encoding Tables - simplified attribute → model column mapping
//!
//! Three explicit tables drive profile encoding:
//! - `normalization`: numeric attribute → (center, scale); the target column
//!   carries the attribute's name
//! - `defaults`: raw value substituted for an omitted optional numeric attribute
//! - `categories`: attribute → option label → one-hot column (`null` marks a
//!   reference level that is encoded as all zeros)
//!
//! Tables are validated against the column layout when loaded, so a typo in
//! either side fails at startup instead of producing an all-zero feature.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::layout::ColumnLayout;
use crate::error::{AttritionError, Result};

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

/// attribute, center, scale
///
/// Centers and scales approximate the training-time distribution of each
/// attribute.
const NORMALIZATION: &[(&str, f64, f64)] = &[
    ("Age", 35.0, 10.0),
    ("MonthlyIncome", 6000.0, 4000.0),
    ("YearsAtCompany", 5.0, 5.0),
    ("DistanceFromHome", 10.0, 10.0),
    ("TotalWorkingYears", 11.0, 8.0),
    ("YearsInCurrentRole", 4.0, 4.0),
    ("YearsSinceLastPromotion", 2.0, 3.0),
    ("YearsWithCurrManager", 4.0, 4.0),
    ("TrainingTimesLastYear", 3.0, 1.0),
];

/// Domain means for optional numeric attributes. Each equals the attribute's
/// center, so an omitted attribute normalizes to exactly 0.0.
const OPTIONAL_DEFAULTS: &[(&str, f64)] = &[
    ("YearsInCurrentRole", 4.0),
    ("YearsSinceLastPromotion", 2.0),
    ("YearsWithCurrManager", 4.0),
    ("TrainingTimesLastYear", 3.0),
];

const SATISFACTION: &[&str] = &["Low", "Medium", "High", "Very High"];

/// attribute → (option label, one-hot column)
const CATEGORIES: &[(&str, &[(&str, &str)])] = &[
    ("OverTime", &[("Yes", "OverTime_Yes"), ("No", "OverTime_No")]),
    ("Department", &[
        ("Sales", "Department_Sales"),
        ("Research & Development", "Department_Research & Development"),
        ("Human Resources", "Department_Human Resources"),
    ]),
    ("JobLevel", &[
        ("Entry Level", "JobLevel_Entry Level"),
        ("Junior Level", "JobLevel_Junior Level"),
        ("Mid Level", "JobLevel_Mid Level"),
        ("Senior Level", "JobLevel_Senior Level"),
        ("Executive Level", "JobLevel_Executive Level"),
    ]),
    ("WorkLifeBalance", &[
        ("Bad", "WorkLifeBalance_Bad"),
        ("Good", "WorkLifeBalance_Good"),
        ("Better", "WorkLifeBalance_Better"),
        ("Best", "WorkLifeBalance_Best"),
    ]),
    ("MaritalStatus", &[
        ("Single", "MaritalStatus_Single"),
        ("Married", "MaritalStatus_Married"),
        ("Divorced", "MaritalStatus_Divorced"),
    ]),
    ("BusinessTravel", &[
        ("Travel_Rarely", "BusinessTravel_Travel_Rarely"),
        ("Travel_Frequently", "BusinessTravel_Travel_Frequently"),
        ("Non-Travel", "BusinessTravel_Non-Travel"),
    ]),
    ("Education", &[
        ("Below College", "Education_Below College"),
        ("College", "Education_College"),
        ("Bachelor", "Education_Bachelor"),
        ("Master", "Education_Master"),
        ("Doctor", "Education_Doctor"),
    ]),
    ("EducationField", &[
        ("Life Sciences", "EducationField_Life Sciences"),
        ("Medical", "EducationField_Medical"),
        ("Marketing", "EducationField_Marketing"),
        ("Technical Degree", "EducationField_Technical Degree"),
        ("Human Resources", "EducationField_Human Resources"),
        ("Other", "EducationField_Other"),
    ]),
    ("Gender", &[("Male", "Gender_Male"), ("Female", "Gender_Female")]),
    ("JobRole", &[
        ("Sales Executive", "JobRole_Sales Executive"),
        ("Research Scientist", "JobRole_Research Scientist"),
        ("Laboratory Technician", "JobRole_Laboratory Technician"),
        ("Manufacturing Director", "JobRole_Manufacturing Director"),
        ("Healthcare Representative", "JobRole_Healthcare Representative"),
        ("Manager", "JobRole_Manager"),
        ("Sales Representative", "JobRole_Sales Representative"),
        ("Research Director", "JobRole_Research Director"),
        ("Human Resources", "JobRole_Human Resources"),
    ]),
    ("PerformanceRating", &[
        ("Excellent", "PerformanceRating_Excellent"),
        ("Outstanding", "PerformanceRating_Outstanding"),
    ]),
];

/// Four-level satisfaction scales share one label set
const SATISFACTION_ATTRIBUTES: &[&str] = &[
    "JobSatisfaction",
    "EnvironmentSatisfaction",
    "JobInvolvement",
    "RelationshipSatisfaction",
];

static BUILTIN: Lazy<EncodingTables> = Lazy::new(|| {
    let normalization = NORMALIZATION
        .iter()
        .map(|&(attr, center, scale)| (attr.to_string(), Normalization { center, scale }))
        .collect();

    let defaults = OPTIONAL_DEFAULTS
        .iter()
        .map(|&(attr, value)| (attr.to_string(), value))
        .collect();

    let mut categories: BTreeMap<String, BTreeMap<String, Option<String>>> = CATEGORIES
        .iter()
        .map(|&(attr, options)| {
            let map = options
                .iter()
                .map(|&(label, column)| (label.to_string(), Some(column.to_string())))
                .collect();
            (attr.to_string(), map)
        })
        .collect();

    for attr in SATISFACTION_ATTRIBUTES {
        let map = SATISFACTION
            .iter()
            .map(|label| (label.to_string(), Some(format!("{}_{}", attr, label))))
            .collect();
        categories.insert(attr.to_string(), map);
    }

    EncodingTables { normalization, defaults, categories }
});

// ============================================================================
// TYPES
// ============================================================================

/// Affine normalization `(value - center) / scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    pub center: f64,
    pub scale: f64,
}

impl Normalization {
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }
}

/// Result of resolving a categorical selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLookup<'a> {
    /// Set this one-hot column to 1.0
    Column(&'a str),
    /// Known option encoded as all zeros
    Reference,
    /// Attribute is categorical but the option has no column
    Unmapped,
}

/// The three encoding tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingTables {
    pub normalization: BTreeMap<String, Normalization>,
    #[serde(default)]
    pub defaults: BTreeMap<String, f64>,
    pub categories: BTreeMap<String, BTreeMap<String, Option<String>>>,
}

impl EncodingTables {
    /// Tables matching the built-in simplified schema
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Load replacement tables from JSON
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let tables: Self = serde_json::from_str(&content)?;
        log::info!(
            "Loaded encoding tables from {} ({} numeric, {} categorical)",
            path.as_ref().display(),
            tables.normalization.len(),
            tables.categories.len()
        );
        Ok(tables)
    }

    pub fn normalization(&self, attribute: &str) -> Option<Normalization> {
        self.normalization.get(attribute).copied()
    }

    pub fn default_for(&self, attribute: &str) -> Option<f64> {
        self.defaults.get(attribute).copied()
    }

    pub fn is_numeric(&self, attribute: &str) -> bool {
        self.normalization.contains_key(attribute)
    }

    pub fn is_categorical(&self, attribute: &str) -> bool {
        self.categories.contains_key(attribute)
    }

    /// Resolve (attribute, option); `None` if the attribute is not categorical
    pub fn category_column(&self, attribute: &str, option: &str) -> Option<CategoryLookup<'_>> {
        let options = self.categories.get(attribute)?;
        Some(match options.get(option) {
            Some(Some(column)) => CategoryLookup::Column(column.as_str()),
            Some(None) => CategoryLookup::Reference,
            None => CategoryLookup::Unmapped,
        })
    }

    /// Check every table entry against the layout. All problems are reported
    /// in one error.
    pub fn validate(&self, layout: &ColumnLayout) -> Result<()> {
        let mut problems = Vec::new();

        for (attr, norm) in &self.normalization {
            if !norm.scale.is_finite() || norm.scale == 0.0 || !norm.center.is_finite() {
                problems.push(format!("{}: invalid center/scale ({}, {})", attr, norm.center, norm.scale));
            }
            if !layout.contains(attr) {
                problems.push(format!("{}: numeric column not in layout", attr));
            }
            if self.categories.contains_key(attr) {
                problems.push(format!("{}: declared both numeric and categorical", attr));
            }
        }

        for attr in self.defaults.keys() {
            if !self.normalization.contains_key(attr) {
                problems.push(format!("{}: default given for an attribute with no normalization", attr));
            }
        }

        for (attr, options) in &self.categories {
            for (label, column) in options {
                if let Some(column) = column {
                    if !layout.contains(column) {
                        problems.push(format!("{}={}: column '{}' not in layout", attr, label, column));
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AttritionError::Artifact(format!(
                "Encoding tables do not match column layout: {}",
                problems.join("; ")
            )))
        }
    }
}

impl Default for EncodingTables {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_constants() {
        let tables = EncodingTables::builtin();
        let age = tables.normalization("Age").unwrap();
        assert_eq!(age.apply(35.0), 0.0);
        assert_eq!(age.apply(45.0), 1.0);
        assert_eq!(tables.normalization("MonthlyIncome").unwrap().apply(10000.0), 1.0);
    }

    #[test]
    fn test_defaults_are_distinct_table() {
        let tables = EncodingTables::builtin();
        assert!(tables.default_for("Age").is_none());
        assert_eq!(tables.default_for("YearsInCurrentRole"), Some(4.0));
        for attr in tables.defaults.keys() {
            assert!(tables.is_numeric(attr));
        }
    }

    #[test]
    fn test_category_lookup() {
        let tables = EncodingTables::builtin();
        assert_eq!(
            tables.category_column("Department", "Sales"),
            Some(CategoryLookup::Column("Department_Sales"))
        );
        assert_eq!(
            tables.category_column("JobSatisfaction", "Very High"),
            Some(CategoryLookup::Column("JobSatisfaction_Very High"))
        );
        assert_eq!(
            tables.category_column("EducationField", "Astrophysics"),
            Some(CategoryLookup::Unmapped)
        );
        assert_eq!(tables.category_column("Age", "35"), None);
    }

    #[test]
    fn test_validate_catches_typo() {
        let layout = ColumnLayout::new(vec!["Age".to_string(), "Departmnet_Sales".to_string()]).unwrap();
        let mut tables = EncodingTables {
            normalization: BTreeMap::new(),
            defaults: BTreeMap::new(),
            categories: BTreeMap::new(),
        };
        tables.normalization.insert("Age".to_string(), Normalization { center: 35.0, scale: 10.0 });
        tables.categories.insert(
            "Department".to_string(),
            [("Sales".to_string(), Some("Department_Sales".to_string()))].into_iter().collect(),
        );

        let err = tables.validate(&layout).unwrap_err().to_string();
        assert!(err.contains("Department_Sales"));
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let layout = ColumnLayout::new(vec!["Age".to_string()]).unwrap();
        let tables = EncodingTables {
            normalization: [("Age".to_string(), Normalization { center: 35.0, scale: 0.0 })]
                .into_iter()
                .collect(),
            defaults: BTreeMap::new(),
            categories: BTreeMap::new(),
        };
        assert!(tables.validate(&layout).is_err());
    }

    #[test]
    fn test_reference_level_from_json() {
        let json = r#"{
            "normalization": {"Age": {"center": 35.0, "scale": 10.0}},
            "categories": {"OverTime": {"Yes": "OverTime_Yes", "No": null}}
        }"#;
        let tables: EncodingTables = serde_json::from_str(json).unwrap();
        assert_eq!(tables.category_column("OverTime", "No"), Some(CategoryLookup::Reference));

        let layout = ColumnLayout::new(vec!["Age".to_string(), "OverTime_Yes".to_string()]).unwrap();
        assert!(tables.validate(&layout).is_ok());
    }
}
