//! ONNX Runtime backend for classifiers exported with skl2onnx.
//!
//! Expects a float input of shape `[1, n_features]` and a probability output
//! of shape `[1, 2]` (`zipmap=False`). Column 1 is the positive class. The
//! input width is read from the model itself so a model exported over a
//! different column list is rejected when the artifacts are assembled.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use super::classifier::Classifier;
use crate::error::{AttritionError, Result};

const PROBABILITY_OUTPUT: &str = "probabilities";

pub struct OnnxClassifier {
    session: Mutex<Session>,
    n_features: usize,
    output_name: String,
}

fn artifact_err(context: &str, e: impl std::fmt::Display) -> AttritionError {
    AttritionError::Artifact(format!("{}: {}", context, e))
}

/// Last axis of the declared input shape; `None` when it is dynamic.
fn declared_width(dims: &[i64]) -> Option<usize> {
    match dims.last() {
        Some(&d) if d > 0 => Some(d as usize),
        _ => None,
    }
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>, layout_width: usize) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AttritionError::Artifact(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| artifact_err("Session builder error", e))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| artifact_err("Optimization error", e))?
            .commit_from_file(path)
            .map_err(|e| artifact_err("Load model error", e))?;

        // Prefer the probability head; fall back to the last declared output
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == PROBABILITY_OUTPUT)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| AttritionError::Artifact("model declares no outputs".to_string()))?;

        let declared = session
            .inputs
            .first()
            .and_then(|input| input.input_type.tensor_shape())
            .and_then(|shape| declared_width(shape));
        let n_features = match declared {
            Some(width) => width,
            None => {
                log::warn!(
                    "{} declares a dynamic input width; assuming {} columns",
                    path.display(),
                    layout_width
                );
                layout_width
            }
        };

        log::info!(
            "Loaded ONNX model from {} ({} inputs, output '{}')",
            path.display(),
            n_features,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            n_features,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        "onnx"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(AttritionError::model_input(
                self.n_features,
                row.len(),
                "classifier input",
            ));
        }

        let data: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let input_array = Array2::from_shape_vec((1, self.n_features), data)
            .map_err(|e| artifact_err("Array shape error", e))?;
        let input_tensor =
            Value::from_array(input_array).map_err(|e| artifact_err("Tensor error", e))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| artifact_err("Inference error", e))?;
        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| AttritionError::Artifact("No output from model".to_string()))?;
        let (_, probs) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| artifact_err("Extract error", e))?;

        let positive = match probs.len() {
            0 => return Err(AttritionError::Artifact("empty model output".to_string())),
            1 => probs[0],
            _ => probs[1],
        };
        Ok(f64::from(positive))
    }
}
