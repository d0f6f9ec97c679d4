//! Simplified-attribute schema
//!
//! Declares, per attribute, the prompt shown to the user, its type and its
//! valid range or option list. Input boundaries (CLI prompts, HTTP bodies)
//! validate against it so out-of-range values never reach the scaler.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::profile::{AttributeValue, EmployeeProfile, NAME_KEY};
use super::tables::{CategoryLookup, EncodingTables};
use crate::error::{AttritionError, Result};

// ============================================================================
// CATEGORICAL POLICY
// ============================================================================

/// How categorical input outside the declared options is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalPolicy {
    /// Every categorical value must be one of the declared options
    Strict,
    /// `choice_with_other` attributes also accept free text, which is
    /// routed to the narrative context instead of the model
    #[default]
    AllowOther,
}

impl FromStr for CategoricalPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "strict" => Ok(CategoricalPolicy::Strict),
            "allow_other" | "other" => Ok(CategoricalPolicy::AllowOther),
            other => Err(format!("unknown categorical policy: {}", other)),
        }
    }
}

// ============================================================================
// SCHEMA TYPES
// ============================================================================

/// Identifier fields (not model inputs)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoField {
    pub key: String,
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Choice {
        options: Vec<String>,
    },
    ChoiceWithOther {
        options: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSpec {
    pub key: String,
    pub question: String,
    #[serde(flatten)]
    pub kind: AttributeKind,
    #[serde(default)]
    pub optional: bool,
}

impl AttributeSpec {
    fn number(key: &str, question: &str, min: f64, max: f64) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            kind: AttributeKind::Number { min: Some(min), max: Some(max) },
            optional: false,
        }
    }

    fn choice(key: &str, question: &str, options: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            kind: AttributeKind::Choice {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
            optional: false,
        }
    }

    fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn with_other(mut self) -> Self {
        if let AttributeKind::Choice { options } = self.kind {
            self.kind = AttributeKind::ChoiceWithOther { options };
        }
        self
    }

    pub fn options(&self) -> &[String] {
        match &self.kind {
            AttributeKind::Choice { options } | AttributeKind::ChoiceWithOther { options } => options,
            AttributeKind::Number { .. } => &[],
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Number { .. })
    }

    /// 1-based option selection, as offered by the CLI
    pub fn option_by_number(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.options().get(i))
            .map(String::as_str)
    }

    /// Range-check a numeric value
    pub fn check_number(&self, value: f64) -> Result<f64> {
        let AttributeKind::Number { min, max } = &self.kind else {
            return Err(AttritionError::validation(&self.key, "expected one of the listed options"));
        };
        if !value.is_finite() {
            return Err(AttritionError::validation(&self.key, "Please enter a valid number"));
        }
        if let Some(min) = min {
            if value < *min {
                return Err(AttritionError::validation(&self.key, format!("Value must be >= {}", min)));
            }
        }
        if let Some(max) = max {
            if value > *max {
                return Err(AttritionError::validation(&self.key, format!("Value must be <= {}", max)));
            }
        }
        Ok(value)
    }

    /// Check a categorical selection under `policy`
    pub fn check_choice(&self, value: &str, policy: CategoricalPolicy) -> Result<String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(AttritionError::validation(&self.key, "a value is required"));
        }

        match &self.kind {
            AttributeKind::Number { .. } => {
                Err(AttritionError::validation(&self.key, "Please enter a valid number"))
            }
            AttributeKind::Choice { options } => match_option(&self.key, options, value),
            AttributeKind::ChoiceWithOther { options } => match policy {
                CategoricalPolicy::Strict => match_option(&self.key, options, value),
                CategoricalPolicy::AllowOther => Ok(match_option(&self.key, options, value)
                    .unwrap_or_else(|_| value.to_string())),
            },
        }
    }

    /// Validate one raw value into its typed form
    pub fn parse_value(&self, raw: &AttributeValue, policy: CategoricalPolicy) -> Result<AttributeValue> {
        match (&self.kind, raw) {
            (AttributeKind::Number { .. }, AttributeValue::Number(n)) => {
                self.check_number(*n).map(AttributeValue::Number)
            }
            (AttributeKind::Number { .. }, AttributeValue::Text(s)) => {
                let n: f64 = s
                    .trim()
                    .parse()
                    .map_err(|_| AttritionError::validation(&self.key, "Please enter a valid number"))?;
                self.check_number(n).map(AttributeValue::Number)
            }
            (_, AttributeValue::Text(s)) => self.check_choice(s, policy).map(AttributeValue::Text),
            (_, AttributeValue::Number(n)) => {
                // Numeric labels such as StockOptionLevel "1"
                self.check_choice(&n.to_string(), policy).map(AttributeValue::Text)
            }
        }
    }
}

/// Exact match first, then case-insensitive
fn match_option(key: &str, options: &[String], value: &str) -> Result<String> {
    options
        .iter()
        .find(|o| o.as_str() == value)
        .or_else(|| options.iter().find(|o| o.eq_ignore_ascii_case(value)))
        .cloned()
        .ok_or_else(|| {
            AttritionError::validation(key, format!("must be one of: {}", options.join(", ")))
        })
}

// ============================================================================
// SCHEMA
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedSchema {
    pub employee_info: Vec<InfoField>,
    pub features: Vec<AttributeSpec>,
}

impl SimplifiedSchema {
    /// Schema mirroring the standard employee form
    pub fn builtin() -> Self {
        const SATISFACTION: &[&str] = &["Low", "Medium", "High", "Very High"];

        Self {
            employee_info: vec![InfoField {
                key: NAME_KEY.to_string(),
                question: "Employee name".to_string(),
            }],
            features: vec![
                AttributeSpec::number("Age", "Age", 18.0, 65.0),
                AttributeSpec::number("MonthlyIncome", "Monthly income", 1000.0, 50000.0),
                AttributeSpec::number("YearsAtCompany", "Years at company", 0.0, 40.0),
                AttributeSpec::number("TotalWorkingYears", "Total years of experience", 0.0, 45.0),
                AttributeSpec::number("DistanceFromHome", "Distance from home (km)", 1.0, 50.0),
                AttributeSpec::choice("OverTime", "Works overtime?", &["Yes", "No"]),
                AttributeSpec::choice("JobSatisfaction", "Job satisfaction", SATISFACTION),
                AttributeSpec::choice("WorkLifeBalance", "Work-life balance", &["Bad", "Good", "Better", "Best"]),
                AttributeSpec::choice("EnvironmentSatisfaction", "Environment satisfaction", SATISFACTION),
                AttributeSpec::choice(
                    "JobLevel",
                    "Job level",
                    &["Entry Level", "Junior Level", "Mid Level", "Senior Level", "Executive Level"],
                ),
                AttributeSpec::choice("Department", "Department", &["Sales", "Research & Development", "Human Resources"]),
                AttributeSpec::choice("MaritalStatus", "Marital status", &["Single", "Married", "Divorced"]),
                AttributeSpec::choice(
                    "BusinessTravel",
                    "Business travel",
                    &["Travel_Rarely", "Travel_Frequently", "Non-Travel"],
                ),
                AttributeSpec::choice("Education", "Education", &["Below College", "College", "Bachelor", "Master", "Doctor"]),
                AttributeSpec::choice(
                    "EducationField",
                    "Education field",
                    &["Life Sciences", "Medical", "Marketing", "Technical Degree", "Human Resources", "Other"],
                )
                .with_other(),
                AttributeSpec::choice("Gender", "Gender", &["Male", "Female"]),
                AttributeSpec::choice("JobInvolvement", "Job involvement", SATISFACTION),
                AttributeSpec::choice(
                    "JobRole",
                    "Job role",
                    &[
                        "Sales Executive",
                        "Research Scientist",
                        "Laboratory Technician",
                        "Manufacturing Director",
                        "Healthcare Representative",
                        "Manager",
                        "Sales Representative",
                        "Research Director",
                        "Human Resources",
                    ],
                ),
                AttributeSpec::choice("RelationshipSatisfaction", "Relationship satisfaction", SATISFACTION),
                AttributeSpec::choice("PerformanceRating", "Performance rating", &["Excellent", "Outstanding"]),
                AttributeSpec::number("YearsInCurrentRole", "Years in current role", 0.0, 40.0).optional(),
                AttributeSpec::number("YearsSinceLastPromotion", "Years since last promotion", 0.0, 40.0).optional(),
                AttributeSpec::number("YearsWithCurrManager", "Years with current manager", 0.0, 40.0).optional(),
                AttributeSpec::number("TrainingTimesLastYear", "Trainings attended last year", 0.0, 10.0).optional(),
            ],
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let schema: Self = serde_json::from_str(&content)?;
        log::info!(
            "Loaded simplified schema from {} ({} attributes)",
            path.as_ref().display(),
            schema.features.len()
        );
        Ok(schema)
    }

    /// Load `path` if it exists, otherwise fall back to the built-in schema
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            log::info!(
                "Schema file {} not found, using built-in schema",
                path.as_ref().display()
            );
            Ok(Self::builtin())
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeSpec> {
        self.features.iter().find(|a| a.key == key)
    }

    /// Every declared attribute must be encodable: numeric attributes need a
    /// normalization entry, each listed option must resolve to a column or a
    /// reference level.
    pub fn validate(&self, tables: &EncodingTables) -> Result<()> {
        let mut problems = Vec::new();

        for spec in &self.features {
            if spec.is_numeric() {
                if tables.normalization(&spec.key).is_none() {
                    problems.push(format!("{}: no normalization entry", spec.key));
                }
                if spec.optional && tables.default_for(&spec.key).is_none() {
                    problems.push(format!("{}: optional attribute without default", spec.key));
                }
                continue;
            }

            for option in spec.options() {
                match tables.category_column(&spec.key, option) {
                    Some(CategoryLookup::Column(_)) | Some(CategoryLookup::Reference) => {}
                    Some(CategoryLookup::Unmapped) => {
                        problems.push(format!("{}={}: option has no column mapping", spec.key, option))
                    }
                    None => problems.push(format!("{}: no categorical mapping", spec.key)),
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(AttritionError::Artifact(format!(
                "Schema does not match encoding tables: {}",
                problems.join("; ")
            )))
        }
    }

    /// Validate raw user input into a typed profile.
    ///
    /// Required attributes must be present; attributes the schema does not
    /// declare are passed through unchanged.
    pub fn parse_input(&self, raw: &EmployeeProfile, policy: CategoricalPolicy) -> Result<EmployeeProfile> {
        let mut profile = EmployeeProfile {
            name: raw.name.as_ref().map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            ..Default::default()
        };

        for spec in &self.features {
            match raw.get(&spec.key) {
                Some(value) => {
                    let parsed = spec.parse_value(value, policy)?;
                    profile.attributes.insert(spec.key.clone(), parsed);
                }
                None if spec.optional => {}
                None => {
                    return Err(AttritionError::validation(&spec.key, "a value is required"));
                }
            }
        }

        for (key, value) in raw.iter() {
            if self.attribute(key).is_none() {
                profile.attributes.insert(key.to_string(), value.clone());
            }
        }

        Ok(profile)
    }
}

impl Default for SimplifiedSchema {
    fn default() -> Self {
        Self::builtin()
    }
}
