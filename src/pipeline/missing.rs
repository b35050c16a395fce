//! Missing value statistics per feature

use polars::prelude::*;
use serde::Serialize;

use super::error::WoeResult;

/// Missingness of one feature split by outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingStats {
    pub sample_count: usize,
    pub missing_count: usize,
    pub missing_rate: f64,
    /// Missing rows with outcome = 1
    pub missing_bad_count: usize,
    /// None when nothing is missing
    pub missing_bad_rate: Option<f64>,
    pub nonmissing_count: usize,
    /// Present rows with outcome = 1
    pub nonmissing_bad_count: usize,
    /// None when everything is missing
    pub nonmissing_bad_rate: Option<f64>,
}

/// Per-row missing mask: null, or NaN in float columns
pub fn missing_mask(column: &Column) -> WoeResult<Vec<bool>> {
    let mask = if column.dtype().is_float() {
        let float_col = column.cast(&DataType::Float64)?;
        float_col
            .f64()?
            .iter()
            .map(|v| v.map_or(true, |x| x.is_nan()))
            .collect()
    } else {
        let nulls = column.is_null();
        nulls.iter().map(|v| v.unwrap_or(true)).collect()
    };
    Ok(mask)
}

/// Count missing and present rows and their bad rates.
pub fn compute_missing_stats(missing: &[bool], outcomes: &[u8]) -> MissingStats {
    let sample_count = outcomes.len();
    let mut missing_count = 0usize;
    let mut missing_bad_count = 0usize;
    let mut nonmissing_bad_count = 0usize;

    for (&is_missing, &y) in missing.iter().zip(outcomes.iter()) {
        if is_missing {
            missing_count += 1;
            if y == 1 {
                missing_bad_count += 1;
            }
        } else if y == 1 {
            nonmissing_bad_count += 1;
        }
    }

    let nonmissing_count = sample_count - missing_count;
    let rate = |part: usize, whole: usize| (whole > 0).then(|| part as f64 / whole as f64);

    MissingStats {
        sample_count,
        missing_count,
        missing_rate: rate(missing_count, sample_count).unwrap_or(0.0),
        missing_bad_count,
        missing_bad_rate: rate(missing_bad_count, missing_count),
        nonmissing_count,
        nonmissing_bad_count,
        nonmissing_bad_rate: rate(nonmissing_bad_count, nonmissing_count),
    }
}
