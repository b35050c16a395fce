//! Outcome column validation
//!
//! The outcome column must exist, be non-empty and hold only 0/1 values.
//! Anything else is a hard validation failure: silently tolerating a bad
//! target would corrupt every downstream count.

use polars::prelude::*;

use super::error::{WoeError, WoeResult};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Validate the outcome column and return its values as 0/1 bytes.
///
/// Accepts any dtype that casts to Float64 (integers, floats, booleans, numeric
/// strings) as long as every value is 0 or 1.
pub fn extract_outcomes(df: &DataFrame, target: &str) -> WoeResult<Vec<u8>> {
    let target_col = df.column(target).map_err(|_| WoeError::MissingTarget {
        column: target.to_string(),
    })?;

    if target_col.len() == 0 {
        return Err(WoeError::EmptyDataset);
    }

    let null_count = target_col.null_count();
    if null_count > 0 {
        return Err(WoeError::NullTarget {
            column: target.to_string(),
            count: null_count,
        });
    }

    let float_col = target_col
        .cast(&DataType::Float64)
        .map_err(|_| non_binary(target, target_col))?;
    let values = float_col.f64()?;

    let mut outcomes = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        match value {
            Some(v) if (v - 1.0).abs() < TOLERANCE => outcomes.push(1),
            Some(v) if v.abs() < TOLERANCE => outcomes.push(0),
            // A null after casting means the raw value did not parse
            _ => {
                return Err(WoeError::NonBinaryTarget {
                    column: target.to_string(),
                    value: raw_value(target_col, idx),
                })
            }
        }
    }

    Ok(outcomes)
}

fn non_binary(target: &str, column: &Column) -> WoeError {
    WoeError::NonBinaryTarget {
        column: target.to_string(),
        value: format!("column of dtype {}", column.dtype()),
    }
}

fn raw_value(column: &Column, idx: usize) -> String {
    column
        .get(idx)
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "?".to_string())
}

/// Share of outcome = 1 rows
pub fn bad_rate(outcomes: &[u8]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    outcomes.iter().filter(|&&y| y == 1).count() as f64 / outcomes.len() as f64
}
