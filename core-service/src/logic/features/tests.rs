//! Builder tests over the full demo layout

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{
    ColumnLayout, EmployeeProfile, EncodingTables, FeatureVectorBuilder, Normalization,
    VectorOrigin,
};
use crate::error::AttritionError;
use crate::logic::dataset::TestDataset;
use crate::logic::fixtures::{demo_builder, demo_columns, demo_layout};

fn key_set(names: impl Iterator<Item = String>) -> BTreeSet<String> {
    names.collect()
}

#[test]
fn test_end_to_end_profile_vector() {
    let builder = demo_builder();
    let profile = EmployeeProfile::new("A")
        .with("Age", 45.0)
        .with("MonthlyIncome", 10000.0)
        .with("YearsAtCompany", 10.0)
        .with("DistanceFromHome", 20.0)
        .with("OverTime", "Yes")
        .with("Department", "Sales");

    let (vector, context) = builder.build_from_profile(&profile);

    let expected_ones = [
        "Age",
        "MonthlyIncome",
        "YearsAtCompany",
        "DistanceFromHome",
        "OverTime_Yes",
        "Department_Sales",
    ];
    for (name, value) in vector.iter() {
        if expected_ones.contains(&name) {
            assert_eq!(value, 1.0, "{} should be 1.0", name);
        } else {
            assert_eq!(value, 0.0, "{} should be 0.0", name);
        }
    }
    assert!(context.is_empty());
    assert_eq!(vector.origin(), VectorOrigin::Profile);
}

#[test]
fn test_key_set_invariant_across_profiles() {
    let builder = demo_builder();
    let expected = key_set(demo_columns().into_iter());

    let profiles = vec![
        EmployeeProfile::default(),
        EmployeeProfile::new("B").with("Age", 30.0),
        EmployeeProfile::new("C")
            .with("YearsInCurrentRole", 7.0)
            .with("JobRole", "Manager")
            .with("Hobby", "Sailing"),
    ];

    for profile in &profiles {
        let (vector, _) = builder.build_from_profile(profile);
        assert_eq!(vector.len(), expected.len());
        assert_eq!(key_set(vector.iter().map(|(n, _)| n.to_string())), expected);
        // Layout order, never re-sorted
        let names: Vec<String> = vector.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, demo_columns());
    }
}

#[test]
fn test_normalization_round_trip() {
    let builder = demo_builder();

    let (v, _) = builder.build_from_profile(&EmployeeProfile::new("A").with("Age", 35.0));
    assert_eq!(v.get("Age"), Some(0.0));

    let (v, _) = builder.build_from_profile(&EmployeeProfile::new("A").with("Age", 45.0));
    assert_eq!(v.get("Age"), Some(1.0));
}

#[test]
fn test_one_hot_exclusivity() {
    let builder = demo_builder();
    let (vector, _) = builder.build_from_profile(&EmployeeProfile::new("A").with("Department", "Sales"));

    let department: Vec<(&str, f64)> = vector
        .iter()
        .filter(|(name, _)| name.starts_with("Department_"))
        .collect();
    assert_eq!(department.len(), 3);
    assert_eq!(department.iter().filter(|(_, v)| *v == 1.0).count(), 1);
    assert_eq!(vector.get("Department_Sales"), Some(1.0));
    assert_eq!(vector.get("Department_Human Resources"), Some(0.0));
    assert_eq!(vector.get("Department_Research & Development"), Some(0.0));
}

#[test]
fn test_other_category_goes_to_context_only() {
    let builder = demo_builder();
    let profile = EmployeeProfile::new("A").with("EducationField", "Marine Biology");

    let (vector, context) = builder.build_from_profile(&profile);

    assert!(vector
        .iter()
        .filter(|(name, _)| name.starts_with("EducationField_"))
        .all(|(_, v)| v == 0.0));
    assert_eq!(context.get("EducationField"), Some("Marine Biology"));
}

#[test]
fn test_listed_other_option_is_a_column() {
    let builder = demo_builder();
    let (vector, context) =
        builder.build_from_profile(&EmployeeProfile::new("A").with("EducationField", "Other"));
    assert_eq!(vector.get("EducationField_Other"), Some(1.0));
    assert!(context.is_empty());
}

#[test]
fn test_unknown_attribute_passes_through_but_name_does_not() {
    let builder = demo_builder();
    let profile = EmployeeProfile::new("Jane Doe").with("Hobby", "Chess");
    let (_, context) = builder.build_from_profile(&profile);

    assert_eq!(context.get("Hobby"), Some("Chess"));
    assert!(context.get("name").is_none());
    assert_eq!(context.len(), 1);
}

#[test]
fn test_optional_defaults_apply_when_omitted() {
    let layout = Arc::new(ColumnLayout::new(vec!["Age".to_string(), "YearsInCurrentRole".to_string()]).unwrap());
    let tables = EncodingTables {
        normalization: [
            ("Age".to_string(), Normalization { center: 35.0, scale: 10.0 }),
            ("YearsInCurrentRole".to_string(), Normalization { center: 4.0, scale: 4.0 }),
        ]
        .into_iter()
        .collect(),
        defaults: [("YearsInCurrentRole".to_string(), 4.23)].into_iter().collect(),
        categories: Default::default(),
    };
    let builder = FeatureVectorBuilder::new(layout, Arc::new(tables)).unwrap();

    let (omitted, _) = builder.build_from_profile(&EmployeeProfile::new("A"));
    let expected = (4.23 - 4.0) / 4.0;
    assert!((omitted.get("YearsInCurrentRole").unwrap() - expected).abs() < 1e-12);
    // Required attributes without a default stay at 0.0
    assert_eq!(omitted.get("Age"), Some(0.0));

    let (given, _) = builder.build_from_profile(&EmployeeProfile::new("A").with("YearsInCurrentRole", 8.0));
    assert_eq!(given.get("YearsInCurrentRole"), Some(1.0));
}

#[test]
fn test_numeric_text_is_parsed() {
    let builder = demo_builder();
    let (vector, context) = builder.build_from_profile(&EmployeeProfile::new("A").with("Age", "45"));
    assert_eq!(vector.get("Age"), Some(1.0));
    assert!(context.is_empty());

    let (vector, context) = builder.build_from_profile(&EmployeeProfile::new("A").with("Age", "forty"));
    assert_eq!(vector.get("Age"), Some(0.0));
    assert_eq!(context.get("Age"), Some("forty"));
}

#[test]
fn test_builder_rejects_tables_outside_layout() {
    let layout = Arc::new(ColumnLayout::new(vec!["Age".to_string()]).unwrap());
    let result = FeatureVectorBuilder::new(layout, Arc::new(EncodingTables::builtin()));
    assert!(matches!(result, Err(AttritionError::Artifact(_))));
}

#[test]
fn test_build_from_test_row_bounds() {
    let builder = demo_builder();
    let layout = demo_layout();
    let n = 4;
    let rows = (0..n)
        .map(|i| (vec![i as f64; layout.len()], Some((i % 2) as u8)))
        .collect();
    let dataset = TestDataset::from_rows(&layout, rows).unwrap();

    for i in 0..n {
        let vector = builder.build_from_test_row(&dataset, i).unwrap();
        assert_eq!(vector.origin(), VectorOrigin::TestRow);
        assert_eq!(key_set(vector.iter().map(|(n, _)| n.to_string())), key_set(demo_columns().into_iter()));
        assert!(vector.as_slice().iter().all(|v| *v == i as f64));
    }

    assert!(builder.build_from_test_row(&dataset, n - 1).is_ok());
    match builder.build_from_test_row(&dataset, n) {
        Err(AttritionError::NotFound { max_index, .. }) => assert_eq!(max_index, Some(n - 1)),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_build_from_test_row_rejects_foreign_dataset() {
    let builder = demo_builder();
    let other = ColumnLayout::new(vec!["Age".to_string()]).unwrap();
    let dataset = TestDataset::from_rows(&other, vec![(vec![1.0], None)]).unwrap();

    assert!(matches!(
        builder.build_from_test_row(&dataset, 0),
        Err(AttritionError::ModelInput { .. })
    ));
}
