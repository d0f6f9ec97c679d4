//! Employee Profile - simplified, human-entered attributes

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};

/// Key of the identifier attribute
pub const NAME_KEY: &str = "name";

/// A single attribute value as entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

/// Attribute name → value, plus the employee's name as identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl EmployeeProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(attribute, value);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<AttributeValue>) {
        let attribute = attribute.into();
        let value = value.into();
        if attribute == NAME_KEY {
            self.name = Some(value.to_string());
        } else {
            self.attributes.insert(attribute, value);
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributeValue> {
        self.attributes.get(attribute)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.attributes.is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Build from a JSON object. `null` entries are dropped; nested values
    /// are rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let object = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(AttritionError::validation(
                    "employee_data",
                    format!("expected an object, got {}", other),
                ))
            }
        };

        let mut profile = Self::default();
        for (key, value) in object {
            match value {
                serde_json::Value::Null => {}
                serde_json::Value::Number(n) => {
                    let n = n.as_f64().ok_or_else(|| {
                        AttritionError::validation(key.as_str(), "number out of range")
                    })?;
                    profile.insert(key, n);
                }
                serde_json::Value::String(s) => profile.insert(key, s),
                serde_json::Value::Bool(b) => {
                    profile.insert(key, if b { "Yes" } else { "No" });
                }
                _ => {
                    return Err(AttritionError::validation(
                        key.as_str(),
                        "expected a number or a string",
                    ))
                }
            }
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_is_kept_apart() {
        let profile = EmployeeProfile::default().with("name", "A").with("Age", 45.0);
        assert_eq!(profile.name.as_deref(), Some("A"));
        assert!(profile.get("name").is_none());
        assert_eq!(profile.get("Age"), Some(&AttributeValue::Number(45.0)));
    }

    #[test]
    fn test_from_json_drops_nulls() {
        let profile = EmployeeProfile::from_json(json!({
            "name": "A",
            "Age": 45,
            "Department": "Sales",
            "JobRole": null,
            "OverTime": true
        }))
        .unwrap();

        assert_eq!(profile.display_name(), "A");
        assert_eq!(profile.attributes.len(), 3);
        assert_eq!(profile.get("OverTime"), Some(&AttributeValue::Text("Yes".to_string())));
    }

    #[test]
    fn test_from_json_rejects_nested() {
        let result = EmployeeProfile::from_json(json!({"Age": [1, 2]}));
        assert!(matches!(result, Err(AttritionError::Validation { .. })));
    }

    #[test]
    fn test_serde_flattens_attributes() {
        let profile = EmployeeProfile::new("A").with("Age", 45.0).with("Department", "Sales");
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value, json!({"name": "A", "Age": 45.0, "Department": "Sales"}));

        let back: EmployeeProfile = serde_json::from_value(value).unwrap();
        assert_eq!(back, profile);
    }
}
