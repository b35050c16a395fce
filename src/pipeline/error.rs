//! Error and warning types for WoE/IV analysis

use polars::prelude::PolarsError;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while validating input or analyzing a feature.
#[derive(Debug, Error)]
pub enum WoeError {
    /// The reserved outcome column is absent from the dataset.
    #[error("Target column '{column}' not found in dataset")]
    MissingTarget { column: String },

    /// The outcome column holds something other than 0 and 1.
    #[error("Target column '{column}' must be binary (0/1). Found value: {value}")]
    NonBinaryTarget { column: String, value: String },

    /// The outcome column contains null values.
    #[error("Target column '{column}' contains {count} null value(s)")]
    NullTarget { column: String, count: usize },

    /// The dataset has no rows.
    #[error("Dataset is empty - at least one row is required")]
    EmptyDataset,

    /// A categorical feature exceeds the distinct-value cap.
    #[error(
        "Feature '{feature}' is non-numeric with {count} distinct values (limit {limit}). Please check it!"
    )]
    TooManyCategories {
        feature: String,
        count: usize,
        limit: usize,
    },

    /// A value classified as a numeral could not be converted to a float.
    #[error("Feature '{feature}' has numeral '{value}' that cannot be converted to a number")]
    UnconvertibleNumeral { feature: String, value: String },

    /// The feature being split is the outcome column itself.
    #[error("Feature '{feature}' conflicts with the target column name")]
    TargetConflict { feature: String },

    /// A configuration value is out of range.
    #[error("Invalid binning configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),
}

/// Non-fatal conditions returned alongside (or instead of) a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnalysisWarning {
    /// Cut points were requested for the outcome column; no cut points produced.
    TargetConflict { feature: String },
}

impl std::fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisWarning::TargetConflict { feature } => {
                write!(f, "Feature name '{}' conflicts with the target column", feature)
            }
        }
    }
}

pub type WoeResult<T> = std::result::Result<T, WoeError>;
