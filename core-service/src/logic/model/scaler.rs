//! Standardization fitted at training time.
//!
//! Stored as `scaler.json`: `{ "feature_names": [...], "mean": [...], "scale": [...] }`.
//! `feature_names` is optional for scalers fit on bare arrays; when present it
//! must equal the column layout exactly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};
use crate::logic::features::ColumnLayout;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        let scaler = Self {
            feature_names: None,
            mean,
            scale,
        };
        scaler.check_shape()?;
        Ok(scaler)
    }

    /// Identity transform over `n` columns
    pub fn identity(n: usize) -> Self {
        Self {
            feature_names: None,
            mean: vec![0.0; n],
            scale: vec![1.0; n],
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            AttritionError::Artifact(format!("cannot read scaler {}: {}", path.display(), e))
        })?;
        let scaler: StandardScaler = serde_json::from_str(&raw)?;
        scaler.check_shape()?;
        log::info!(
            "Loaded scaler from {} ({} features)",
            path.display(),
            scaler.n_features()
        );
        Ok(scaler)
    }

    fn check_shape(&self) -> Result<()> {
        if self.mean.len() != self.scale.len() {
            return Err(AttritionError::Artifact(format!(
                "scaler mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != self.mean.len() {
                return Err(AttritionError::Artifact(format!(
                    "scaler lists {} feature names for {} statistics",
                    names.len(),
                    self.mean.len()
                )));
            }
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Confirm the scaler was fit on this exact layout
    pub fn check_layout(&self, layout: &ColumnLayout) -> Result<()> {
        if self.n_features() != layout.len() {
            return Err(AttritionError::model_input(
                layout.len(),
                self.n_features(),
                "scaler was fit on a different column count",
            ));
        }
        if let Some(names) = &self.feature_names {
            if !layout.matches(names) {
                let first_diff = layout
                    .names()
                    .iter()
                    .zip(names)
                    .position(|(a, b)| a != b)
                    .unwrap_or(0);
                return Err(AttritionError::model_input(
                    layout.len(),
                    names.len(),
                    format!(
                        "scaler column {} is '{}', layout expects '{}'",
                        first_diff,
                        names[first_diff],
                        layout.names()[first_diff]
                    ),
                ));
            }
        }
        Ok(())
    }

    /// `(x - mean) / scale`. Zero-variance columns keep scale 1.
    pub fn transform(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.n_features() {
            return Err(AttritionError::model_input(
                self.n_features(),
                values.len(),
                "scaler input",
            ));
        }
        Ok(values
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let scaler = StandardScaler::new(vec![1.0, 0.5, 3.0], vec![2.0, 0.5, 0.0]).unwrap();
        let out = scaler.transform(&[3.0, 1.0, 5.0]).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 2.0]);
    }

    #[test]
    fn test_transform_rejects_wrong_length() {
        let scaler = StandardScaler::identity(3);
        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            AttritionError::ModelInput { expected: 3, actual: 2, .. }
        ));
    }

    #[test]
    fn test_check_layout_names() {
        let layout =
            ColumnLayout::new(vec!["Age".into(), "OverTime_Yes".into()]).unwrap();
        let mut scaler = StandardScaler::identity(2);
        scaler.feature_names = Some(vec!["Age".into(), "OverTime_Yes".into()]);
        assert!(scaler.check_layout(&layout).is_ok());

        scaler.feature_names = Some(vec!["OverTime_Yes".into(), "Age".into()]);
        let err = scaler.check_layout(&layout).unwrap_err();
        assert!(err.to_string().contains("column 0"));

        let short = StandardScaler::identity(1);
        assert!(matches!(
            short.check_layout(&layout),
            Err(AttritionError::ModelInput { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        fs::write(&path, r#"{"mean": [0.0, 1.0], "scale": [1.0, 2.0]}"#).unwrap();
        let scaler = StandardScaler::load(&path).unwrap();
        assert_eq!(scaler.n_features(), 2);
        assert!(scaler.feature_names.is_none());

        fs::write(&path, r#"{"mean": [0.0], "scale": [1.0, 2.0]}"#).unwrap();
        assert!(matches!(
            StandardScaler::load(&path),
            Err(AttritionError::Artifact(_))
        ));
    }
}
