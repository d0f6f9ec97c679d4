use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{AttritionError, Result};
use crate::logic::features::ColumnLayout;

/// Ground-truth outcome column in the test CSV
pub const ACTUAL_ATTRITION_COLUMN: &str = "Actual_Attrition";

/// Read-only table of pre-encoded rows, values stored in layout order
#[derive(Debug, Clone)]
pub struct TestDataset {
    layout_hash: u32,
    columns: usize,
    values: Vec<f64>,
    actual: Vec<Option<u8>>,
}

/// Borrowed view of one row
#[derive(Debug, Clone, Copy)]
pub struct TestRow<'a> {
    pub index: usize,
    pub values: &'a [f64],
    pub actual_attrition: Option<u8>,
}

/// Test-data bounds for callers choosing an index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDataInfo {
    pub total_employees: usize,
    pub available_indices: String,
    pub max_index: Option<usize>,
}

impl TestDataset {
    /// Load the CSV, keeping only the layout columns (in layout order).
    /// Extra columns such as stored predictions are ignored.
    pub fn load(path: impl AsRef<Path>, layout: &ColumnLayout) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        let mut positions = Vec::with_capacity(layout.len());
        let mut missing = Vec::new();
        for name in layout.names() {
            match headers.iter().position(|h| h == name) {
                Some(pos) => positions.push(pos),
                None => missing.push(name.as_str()),
            }
        }
        if !missing.is_empty() {
            return Err(AttritionError::Artifact(format!(
                "Test data {} is missing {} layout column(s): {}",
                path.display(),
                missing.len(),
                missing.join(", ")
            )));
        }
        let actual_pos = headers.iter().position(|h| h == ACTUAL_ATTRITION_COLUMN);

        let mut values = Vec::new();
        let mut actual = Vec::new();
        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            for (&pos, name) in positions.iter().zip(layout.names()) {
                let field = record.get(pos).unwrap_or("");
                let value = parse_cell(field).ok_or_else(|| {
                    AttritionError::Artifact(format!(
                        "Test data row {} column {}: cannot parse '{}'",
                        row_idx, name, field
                    ))
                })?;
                values.push(value);
            }
            actual.push(
                actual_pos
                    .and_then(|pos| record.get(pos))
                    .and_then(parse_outcome),
            );
        }

        log::info!(
            "Loaded {} test rows from {} ({} columns)",
            actual.len(),
            path.display(),
            layout.len()
        );

        Ok(Self {
            layout_hash: layout.hash(),
            columns: layout.len(),
            values,
            actual,
        })
    }

    /// Build from in-memory rows (each row in layout order)
    pub fn from_rows(layout: &ColumnLayout, rows: Vec<(Vec<f64>, Option<u8>)>) -> Result<Self> {
        let mut values = Vec::with_capacity(rows.len() * layout.len());
        let mut actual = Vec::with_capacity(rows.len());
        for (i, (row, outcome)) in rows.into_iter().enumerate() {
            if row.len() != layout.len() {
                return Err(AttritionError::model_input(
                    layout.len(),
                    row.len(),
                    format!("test row {}", i),
                ));
            }
            values.extend(row);
            actual.push(outcome);
        }
        Ok(Self {
            layout_hash: layout.hash(),
            columns: layout.len(),
            values,
            actual,
        })
    }

    pub fn len(&self) -> usize {
        self.actual.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }

    pub fn layout_hash(&self) -> u32 {
        self.layout_hash
    }

    pub fn column_count(&self) -> usize {
        self.columns
    }

    /// Row by integer index; NotFound names the valid maximum
    pub fn row(&self, index: usize) -> Result<TestRow<'_>> {
        if index >= self.len() {
            return Err(AttritionError::not_found(index, self.len()));
        }
        let start = index * self.columns;
        Ok(TestRow {
            index,
            values: &self.values[start..start + self.columns],
            actual_attrition: self.actual[index],
        })
    }

    pub fn info(&self) -> TestDataInfo {
        let max_index = self.len().checked_sub(1);
        TestDataInfo {
            total_employees: self.len(),
            available_indices: match max_index {
                Some(max) => format!("0 to {}", max),
                None => "none".to_string(),
            },
            max_index,
        }
    }

    /// Uniformly random valid index, `None` for an empty dataset
    pub fn random_index(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(rand::thread_rng().gen_range(0..self.len()))
        }
    }
}

/// Numeric cell; one-hot columns may be written as booleans
fn parse_cell(field: &str) -> Option<f64> {
    match field {
        "True" | "true" => Some(1.0),
        "False" | "false" => Some(0.0),
        _ => field.parse().ok(),
    }
}

fn parse_outcome(field: &str) -> Option<u8> {
    match field {
        "Yes" | "yes" | "True" | "true" => Some(1),
        "No" | "no" | "False" | "false" => Some(0),
        _ => field.parse::<f64>().ok().map(|v| if v >= 0.5 { 1 } else { 0 }),
    }
}
