//! Shared test fixtures: a full one-hot layout matching the built-in tables,
//! a small logistic model over it and three pre-encoded test rows.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::logic::dataset::TestDataset;
use crate::logic::features::{
    CategoricalPolicy, ColumnLayout, EmployeeProfile, EncodingTables, FeatureVectorBuilder,
    SimplifiedSchema,
};
use crate::logic::model::{
    LogisticModel, ModelArtifacts, RiskScheme, StandardScaler, ThresholdConfig,
};
use crate::logic::predictor::{AttritionPredictor, PredictorConfig};

const NUMERIC: &[&str] = &[
    "Age",
    "DailyRate",
    "DistanceFromHome",
    "HourlyRate",
    "MonthlyIncome",
    "MonthlyRate",
    "NumCompaniesWorked",
    "PercentSalaryHike",
    "TotalWorkingYears",
    "TrainingTimesLastYear",
    "YearsAtCompany",
    "YearsInCurrentRole",
    "YearsSinceLastPromotion",
    "YearsWithCurrManager",
];

const SATISFACTION: &[&str] = &["High", "Low", "Medium", "Very High"];

const CATEGORICAL: &[(&str, &[&str])] = &[
    ("BusinessTravel", &["Non-Travel", "Travel_Frequently", "Travel_Rarely"]),
    ("Department", &["Human Resources", "Research & Development", "Sales"]),
    ("Education", &["Bachelor", "Below College", "College", "Doctor", "Master"]),
    ("EducationField", &["Human Resources", "Life Sciences", "Marketing", "Medical", "Other", "Technical Degree"]),
    ("EnvironmentSatisfaction", SATISFACTION),
    ("Gender", &["Female", "Male"]),
    ("JobInvolvement", SATISFACTION),
    ("JobLevel", &["Entry Level", "Executive Level", "Junior Level", "Mid Level", "Senior Level"]),
    ("JobRole", &[
        "Healthcare Representative",
        "Human Resources",
        "Laboratory Technician",
        "Manager",
        "Manufacturing Director",
        "Research Director",
        "Research Scientist",
        "Sales Executive",
        "Sales Representative",
    ]),
    ("JobSatisfaction", SATISFACTION),
    ("MaritalStatus", &["Divorced", "Married", "Single"]),
    ("OverTime", &["No", "Yes"]),
    ("PerformanceRating", &["Excellent", "Outstanding"]),
    ("RelationshipSatisfaction", SATISFACTION),
    ("StockOptionLevel", &["0", "1", "2", "3"]),
    ("WorkLifeBalance", &["Bad", "Best", "Better", "Good"]),
];

/// Same columns, same order as `models/feature_columns.json`
pub fn demo_columns() -> Vec<String> {
    let mut columns: Vec<String> = NUMERIC.iter().map(|s| s.to_string()).collect();
    for (attr, options) in CATEGORICAL {
        for option in options.iter() {
            columns.push(format!("{}_{}", attr, option));
        }
    }
    columns
}

pub fn demo_layout() -> Arc<ColumnLayout> {
    Arc::new(ColumnLayout::new(demo_columns()).unwrap())
}

pub fn demo_builder() -> FeatureVectorBuilder {
    FeatureVectorBuilder::new(demo_layout(), Arc::new(EncodingTables::builtin())).unwrap()
}

const DEMO_WEIGHTS: &[(&str, f64)] = &[
    ("OverTime_Yes", 1.5),
    ("JobSatisfaction_Low", 0.9),
    ("MaritalStatus_Single", 0.7),
    ("MonthlyIncome", -0.6),
    ("Age", -0.4),
    ("YearsAtCompany", -0.3),
];

const DEMO_INTERCEPT: f64 = -1.0;

fn row_with(layout: &ColumnLayout, ones: &[(&str, f64)]) -> Vec<f64> {
    let mut values = vec![0.0; layout.len()];
    for (name, value) in ones {
        values[layout.index_of(name).unwrap()] = *value;
    }
    values
}

/// Identity scaler and a hand-weighted logistic model
pub fn demo_artifacts() -> Arc<ModelArtifacts> {
    let layout = demo_layout();
    let coefficients = row_with(&layout, DEMO_WEIGHTS);
    let model = LogisticModel::new(coefficients, DEMO_INTERCEPT);
    let scaler = StandardScaler::identity(layout.len());
    Arc::new(ModelArtifacts::from_parts(layout, scaler, Box::new(model)).unwrap())
}

/// Rows: 0 -> Low (stays), 1 -> Very High (left), 2 -> Medium (stayed)
pub fn demo_dataset(layout: &ColumnLayout) -> TestDataset {
    let rows = vec![
        (row_with(layout, &[]), Some(0)),
        (
            row_with(
                layout,
                &[
                    ("OverTime_Yes", 1.0),
                    ("MaritalStatus_Single", 1.0),
                    ("JobSatisfaction_Low", 1.0),
                ],
            ),
            Some(1),
        ),
        (row_with(layout, &[("OverTime_Yes", 1.0), ("Age", 1.0)]), Some(0)),
    ];
    TestDataset::from_rows(layout, rows).unwrap()
}

pub fn demo_predictor() -> AttritionPredictor {
    let artifacts = demo_artifacts();
    let dataset = demo_dataset(artifacts.layout());
    AttritionPredictor::from_parts(
        artifacts,
        EncodingTables::builtin(),
        SimplifiedSchema::builtin(),
        dataset,
        ThresholdConfig::default(),
        RiskScheme::FourTier,
        CategoricalPolicy::AllowOther,
    )
    .unwrap()
}

/// Complete high-risk profile covering every required attribute
pub fn demo_profile() -> EmployeeProfile {
    EmployeeProfile::new("John Doe")
        .with("Age", 28.0)
        .with("MonthlyIncome", 3000.0)
        .with("YearsAtCompany", 2.0)
        .with("TotalWorkingYears", 5.0)
        .with("DistanceFromHome", 15.0)
        .with("OverTime", "Yes")
        .with("JobSatisfaction", "Low")
        .with("WorkLifeBalance", "Bad")
        .with("EnvironmentSatisfaction", "Low")
        .with("JobLevel", "Entry Level")
        .with("Department", "Sales")
        .with("MaritalStatus", "Single")
        .with("BusinessTravel", "Travel_Frequently")
        .with("Education", "Bachelor")
        .with("EducationField", "Marketing")
        .with("Gender", "Male")
        .with("JobInvolvement", "Medium")
        .with("JobRole", "Sales Representative")
        .with("RelationshipSatisfaction", "Medium")
        .with("PerformanceRating", "Excellent")
}

fn repo_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join(relative)
}

/// Predictor over the artifacts and scaled test rows shipped in the repo
pub fn shipped_predictor() -> AttritionPredictor {
    let config = PredictorConfig {
        artifacts_dir: repo_path("models"),
        test_data_path: repo_path("data/test_data/test_data_with_predictions.csv"),
        schema_path: repo_path("config/simplified_features.json"),
        ..PredictorConfig::default()
    };
    AttritionPredictor::load(&config).unwrap()
}
