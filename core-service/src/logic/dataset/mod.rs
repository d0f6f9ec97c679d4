//! Dataset Module - persisted test rows
//!
//! Rows saved alongside the training run, already encoded in model-column
//! form, plus the ground-truth outcome for comparison.

pub mod test_data;


pub use test_data::{TestDataInfo, TestDataset, TestRow, ACTUAL_ATTRITION_COLUMN};
