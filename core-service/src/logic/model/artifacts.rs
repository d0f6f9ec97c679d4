//! Trained artifact bundle: column layout, scaler and classifier.
//!
//! Loaded once at startup and shared read-only afterwards. Every cross-check
//! between the three pieces happens here so that a bundle which loads is a
//! bundle which can predict.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classifier::{Classifier, LogisticModel};
use super::scaler::StandardScaler;
use crate::error::{AttritionError, Result};
use crate::logic::features::ColumnLayout;

pub const FEATURE_COLUMNS_FILE: &str = "feature_columns.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const LOGISTIC_MODEL_FILE: &str = "attrition_model.json";
pub const ONNX_MODEL_FILE: &str = "attrition_model.onnx";

/// Status snapshot reported by `/health` and the CLI banner
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub artifacts_dir: Option<PathBuf>,
    pub loaded_at: DateTime<Utc>,
}

pub struct ModelArtifacts {
    layout: Arc<ColumnLayout>,
    scaler: StandardScaler,
    classifier: Box<dyn Classifier>,
    metadata: ModelMetadata,
}

impl std::fmt::Debug for ModelArtifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelArtifacts")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl ModelArtifacts {
    /// Load `feature_columns.json`, `scaler.json` and a classifier from `dir`.
    ///
    /// With the `onnx` feature an `attrition_model.onnx` takes precedence over
    /// the JSON logistic model.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        log::info!("Loading model artifacts from {}", dir.display());

        let layout = Arc::new(ColumnLayout::load(dir.join(FEATURE_COLUMNS_FILE))?);
        let scaler = StandardScaler::load(dir.join(SCALER_FILE))?;
        let classifier = load_classifier(dir, layout.len())?;

        let mut artifacts = Self::from_parts(layout, scaler, classifier)?;
        artifacts.metadata.artifacts_dir = Some(dir.to_path_buf());
        Ok(artifacts)
    }

    pub fn from_parts(
        layout: Arc<ColumnLayout>,
        scaler: StandardScaler,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self> {
        scaler.check_layout(&layout)?;

        if classifier.n_features() != layout.len() {
            return Err(AttritionError::model_input(
                layout.len(),
                classifier.n_features(),
                format!("classifier '{}' was fit on a different column count", classifier.name()),
            ));
        }
        if let Some(names) = classifier.feature_names() {
            if !layout.matches(names) {
                return Err(AttritionError::model_input(
                    layout.len(),
                    names.len(),
                    "classifier column names differ from the layout",
                ));
            }
        }

        let metadata = ModelMetadata {
            model_name: classifier.name().to_string(),
            feature_count: layout.len(),
            layout_hash: layout.hash(),
            artifacts_dir: None,
            loaded_at: Utc::now(),
        };
        log::info!(
            "Model artifacts ready: {} over {} columns (layout {:08x})",
            metadata.model_name,
            metadata.feature_count,
            metadata.layout_hash
        );

        Ok(Self {
            layout,
            scaler,
            classifier,
            metadata,
        })
    }

    pub fn layout(&self) -> &Arc<ColumnLayout> {
        &self.layout
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

#[cfg(feature = "onnx")]
fn load_classifier(dir: &Path, layout_width: usize) -> Result<Box<dyn Classifier>> {
    let onnx_path = dir.join(ONNX_MODEL_FILE);
    if onnx_path.exists() {
        let model = super::onnx::OnnxClassifier::load(&onnx_path, layout_width)?;
        return Ok(Box::new(model));
    }
    Ok(Box::new(LogisticModel::load(dir.join(LOGISTIC_MODEL_FILE))?))
}

#[cfg(not(feature = "onnx"))]
fn load_classifier(dir: &Path, _layout_width: usize) -> Result<Box<dyn Classifier>> {
    if dir.join(ONNX_MODEL_FILE).exists() {
        log::warn!(
            "{} present but ONNX support is not compiled in; using {}",
            ONNX_MODEL_FILE,
            LOGISTIC_MODEL_FILE
        );
    }
    Ok(Box::new(LogisticModel::load(dir.join(LOGISTIC_MODEL_FILE))?))
}
