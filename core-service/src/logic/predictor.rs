//! Attrition Predictor
//!
//! Owns the loaded artifacts, the test dataset and the simplified schema, and
//! exposes the two prediction paths used by every entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::constants;
use crate::error::{AttritionError, Result};
use crate::logic::dataset::{TestDataInfo, TestDataset};
use crate::logic::features::{
    CategoricalPolicy, EmployeeProfile, EncodingTables, FeatureVectorBuilder, LlmContext,
    SimplifiedSchema, VectorOrigin,
};
use crate::logic::model::{
    ModelArtifacts, PredictionResult, PredictionService, RiskScheme, ThresholdConfig,
};

/// Where to find everything the predictor loads
#[derive(Debug, Clone)]
pub struct PredictorConfig {
    pub artifacts_dir: PathBuf,
    pub test_data_path: PathBuf,
    pub schema_path: PathBuf,
    pub encoding_path: Option<PathBuf>,
    pub threshold: f64,
    pub risk_scheme: RiskScheme,
    pub categorical_policy: CategoricalPolicy,
}

impl PredictorConfig {
    pub fn from_env() -> Self {
        Self {
            artifacts_dir: constants::get_artifacts_dir().into(),
            test_data_path: constants::get_test_data_path().into(),
            schema_path: constants::get_schema_path().into(),
            encoding_path: constants::get_encoding_path().map(PathBuf::from),
            threshold: constants::get_threshold(),
            risk_scheme: constants::get_risk_scheme(),
            categorical_policy: constants::get_categorical_policy(),
        }
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: constants::DEFAULT_ARTIFACTS_DIR.into(),
            test_data_path: constants::DEFAULT_TEST_DATA_PATH.into(),
            schema_path: constants::DEFAULT_SCHEMA_PATH.into(),
            encoding_path: None,
            threshold: crate::logic::model::DEFAULT_THRESHOLD,
            risk_scheme: RiskScheme::default(),
            categorical_policy: CategoricalPolicy::default(),
        }
    }
}

#[derive(Debug)]
pub struct AttritionPredictor {
    builder: FeatureVectorBuilder,
    service: PredictionService,
    dataset: TestDataset,
    schema: SimplifiedSchema,
    policy: CategoricalPolicy,
}

impl AttritionPredictor {
    pub fn load(config: &PredictorConfig) -> Result<Self> {
        let artifacts = Arc::new(ModelArtifacts::load(&config.artifacts_dir)?);
        let tables = match &config.encoding_path {
            Some(path) => EncodingTables::load(path)?,
            None => EncodingTables::builtin(),
        };
        let schema = SimplifiedSchema::load_or_builtin(&config.schema_path)?;
        let dataset = TestDataset::load(&config.test_data_path, artifacts.layout())?;
        log::info!(
            "Loaded {} test employees from {}",
            dataset.len(),
            config.test_data_path.display()
        );

        Self::from_parts(
            artifacts,
            tables,
            schema,
            dataset,
            ThresholdConfig::new(config.threshold)?,
            config.risk_scheme,
            config.categorical_policy,
        )
    }

    pub fn from_parts(
        artifacts: Arc<ModelArtifacts>,
        tables: EncodingTables,
        schema: SimplifiedSchema,
        dataset: TestDataset,
        threshold: ThresholdConfig,
        scheme: RiskScheme,
        policy: CategoricalPolicy,
    ) -> Result<Self> {
        schema.validate(&tables)?;
        let builder = FeatureVectorBuilder::new(artifacts.layout().clone(), Arc::new(tables))?;
        artifacts
            .layout()
            .validate_hash(dataset.layout_hash(), dataset.column_count())?;
        let service = PredictionService::new(artifacts, threshold, scheme);

        Ok(Self {
            builder,
            service,
            dataset,
            schema,
            policy,
        })
    }

    /// Predict for a pre-encoded test row
    pub fn predict_from_test_data(&self, index: usize) -> Result<PredictionResult> {
        let vector = self.builder.build_from_test_row(&self.dataset, index)?;
        let row = self.dataset.row(index)?;
        let prediction = self.service.predict(&vector)?;

        log::info!(
            "Test employee {}: probability {:.3}, risk {}",
            index,
            prediction.probability,
            prediction.risk_level
        );

        Ok(PredictionResult {
            employee_name: format!("Test Employee {}", index),
            employee_index: Some(index),
            attrition_probability: prediction.probability,
            will_leave: prediction.will_leave,
            risk_level: prediction.risk_level,
            threshold: self.service.threshold().base_threshold,
            actual_attrition: row.actual_attrition,
            features: vector.to_named(),
            simplified_input: None,
            llm_context: LlmContext::new(),
            source: VectorOrigin::TestRow,
            predicted_at: Utc::now(),
        })
    }

    /// Validate `raw` against the schema, encode and predict
    pub fn predict_profile(&self, raw: &EmployeeProfile) -> Result<PredictionResult> {
        if raw.is_empty() {
            return Err(AttritionError::validation(
                "profile",
                "No employee data provided",
            ));
        }

        let profile = self.schema.parse_input(raw, self.policy)?;
        let (vector, llm_context) = self.builder.build_from_profile(&profile);
        let prediction = self.service.predict(&vector)?;

        log::info!(
            "Profile '{}': probability {:.3}, risk {}",
            profile.display_name(),
            prediction.probability,
            prediction.risk_level
        );

        Ok(PredictionResult {
            employee_name: profile.display_name().to_string(),
            employee_index: None,
            attrition_probability: prediction.probability,
            will_leave: prediction.will_leave,
            risk_level: prediction.risk_level,
            threshold: self.service.threshold().base_threshold,
            actual_attrition: None,
            features: vector.to_named(),
            simplified_input: Some(profile),
            llm_context,
            source: VectorOrigin::Profile,
            predicted_at: Utc::now(),
        })
    }

    pub fn test_data_info(&self) -> TestDataInfo {
        self.dataset.info()
    }

    pub fn random_test_index(&self) -> Option<usize> {
        self.dataset.random_index()
    }

    pub fn schema(&self) -> &SimplifiedSchema {
        &self.schema
    }

    pub fn policy(&self) -> CategoricalPolicy {
        self.policy
    }

    pub fn service(&self) -> &PredictionService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::fixtures::{demo_predictor, demo_profile};
    use crate::logic::model::RiskTier;

    #[test]
    fn test_predict_from_test_data() {
        let predictor = demo_predictor();
        let result = predictor.predict_from_test_data(1).unwrap();
        assert_eq!(result.employee_name, "Test Employee 1");
        assert_eq!(result.employee_index, Some(1));
        assert_eq!(result.actual_attrition, Some(1));
        assert!(result.will_leave);
        assert_eq!(result.risk_level, RiskTier::VeryHigh);
        assert_eq!(result.is_correct(), Some(true));
        assert_eq!(result.source, VectorOrigin::TestRow);
        assert!(result.simplified_input.is_none());
    }

    #[test]
    fn test_predict_from_test_data_out_of_range() {
        let predictor = demo_predictor();
        let max = predictor.test_data_info().max_index.unwrap();
        let err = predictor.predict_from_test_data(max + 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Employee index {} not found. Max index: {}", max + 1, max)
        );
    }

    #[test]
    fn test_predict_profile() {
        let predictor = demo_predictor();
        let result = predictor.predict_profile(&demo_profile()).unwrap();
        assert_eq!(result.employee_name, "John Doe");
        assert!(result.will_leave);
        assert_eq!(result.threshold, 0.68);
        assert_eq!(result.features.get("OverTime_Yes"), Some(1.0));
        assert!(result.simplified_input.is_some());
        assert!(result.actual_attrition.is_none());
    }

    #[test]
    fn test_predict_profile_is_deterministic() {
        let predictor = demo_predictor();
        let a = predictor.predict_profile(&demo_profile()).unwrap();
        let b = predictor.predict_profile(&demo_profile()).unwrap();
        assert_eq!(a.attrition_probability, b.attrition_probability);
        assert_eq!(a.features, b.features);
    }

    #[test]
    fn test_predict_profile_rejects_bad_input() {
        let predictor = demo_predictor();
        let err = predictor.predict_profile(&EmployeeProfile::default()).unwrap_err();
        assert!(matches!(err, AttritionError::Validation { .. }));

        let profile = demo_profile().with("Age", 12.0);
        let err = predictor.predict_profile(&profile).unwrap_err();
        match err {
            AttritionError::Validation { field, .. } => assert_eq!(field, "Age"),
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_free_text_option_reaches_context() {
        let predictor = demo_predictor();
        let profile = demo_profile().with("EducationField", "Marine Biology");
        let result = predictor.predict_profile(&profile).unwrap();
        assert_eq!(
            result.llm_context.get("EducationField"),
            Some("Marine Biology")
        );
        assert!(result
            .features
            .active_with_prefix("EducationField_")
            .next()
            .is_none());
    }

    #[test]
    fn test_test_data_info() {
        let info = demo_predictor().test_data_info();
        assert_eq!(info.total_employees, 3);
        assert_eq!(info.available_indices, "0 to 2");
    }
}
