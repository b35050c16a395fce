//! Dataset-level summary: one row per feature column
//!
//! Every column except the target is analyzed independently. A feature that
//! fails analysis still gets a row (with empty statistics) plus a diagnostic,
//! so the output always lines up with the input columns.

use indicatif::ProgressBar;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::classify::FeatureKind;
use super::config::BinningConfig;
use super::error::WoeResult;
use super::feature::{analyze_column, FeatureReport};
use super::missing::{compute_missing_stats, missing_mask};
use super::monotonicity::{Direction, Monotonicity};
use super::target::{bad_rate, extract_outcomes};
use super::tree::{DecisionTreeSplitter, SplitFinder};
use super::woe::BinStatistics;

/// Position of the bin with the highest bad rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakRiskLocation {
    /// First bin
    Low,
    /// Last non-null bin
    High,
    /// The null bin
    Null,
    /// Anywhere else
    Middle,
}

impl std::fmt::Display for PeakRiskLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeakRiskLocation::Low => write!(f, "low"),
            PeakRiskLocation::High => write!(f, "high"),
            PeakRiskLocation::Null => write!(f, "null"),
            PeakRiskLocation::Middle => write!(f, "middle"),
        }
    }
}

impl PeakRiskLocation {
    /// Locate the first bin holding the maximum bad rate.
    ///
    /// The null bin reports `Null` wherever it sits; otherwise the first bin is
    /// `Low` and the last non-null bin is `High`.
    pub fn locate(bins: &[BinStatistics]) -> Option<Self> {
        let (peak_idx, _) = bins
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, bin)| match best {
                Some((_, peak)) if bin.bad_rate <= peak => best,
                _ => Some((idx, bin.bad_rate)),
            })?;

        if bins[peak_idx].bin.is_null() {
            return Some(PeakRiskLocation::Null);
        }
        if peak_idx == 0 {
            return Some(PeakRiskLocation::Low);
        }
        let last_non_null = bins.iter().rposition(|b| !b.bin.is_null());
        if Some(peak_idx) == last_non_null {
            Some(PeakRiskLocation::High)
        } else {
            Some(PeakRiskLocation::Middle)
        }
    }
}

/// Summary statistics for one feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummaryRow {
    pub feature_name: String,
    /// Storage dtype of the column
    pub declared_type: String,
    /// None when the feature failed analysis
    pub feature_kind: Option<FeatureKind>,
    pub total_iv: Option<f64>,
    pub bin_count: Option<usize>,
    pub sample_count: usize,
    pub missing_count: usize,
    pub missing_rate: f64,
    pub missing_bad_count: usize,
    pub missing_bad_rate: Option<f64>,
    pub nonmissing_count: usize,
    pub nonmissing_bad_count: usize,
    pub nonmissing_bad_rate: Option<f64>,
    pub dataset_bad_rate: f64,
    pub risk_correlation: Option<f64>,
    pub monotonicity: Option<Monotonicity>,
    pub direction: Option<Direction>,
    pub peak_risk_location: Option<PeakRiskLocation>,
}

/// Why a feature's statistics are missing from the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDiagnostic {
    pub feature: String,
    pub message: String,
}

/// Result of a dataset pass
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub target: String,
    pub dataset_bad_rate: f64,
    /// One row per feature, in column order
    pub rows: Vec<FeatureSummaryRow>,
    /// Bin tables for every feature that analyzed cleanly, in column order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reports: Vec<FeatureReport>,
    pub diagnostics: Vec<FeatureDiagnostic>,
}

impl DatasetSummary {
    pub fn row(&self, feature: &str) -> Option<&FeatureSummaryRow> {
        self.rows.iter().find(|r| r.feature_name == feature)
    }

    pub fn report(&self, feature: &str) -> Option<&FeatureReport> {
        self.reports.iter().find(|r| r.feature_name == feature)
    }

    /// Rows sorted by total IV descending; failed features last
    pub fn ranked_by_iv(&self) -> Vec<&FeatureSummaryRow> {
        let mut ranked: Vec<&FeatureSummaryRow> = self.rows.iter().collect();
        ranked.sort_by(|a, b| {
            let ka = a.total_iv.unwrap_or(f64::NEG_INFINITY);
            let kb = b.total_iv.unwrap_or(f64::NEG_INFINITY);
            kb.total_cmp(&ka)
        });
        ranked
    }
}

/// Summarize every feature column of `df` against the `target` column.
pub fn summarize_dataset(
    df: &DataFrame,
    target: &str,
    config: &BinningConfig,
) -> WoeResult<DatasetSummary> {
    summarize_dataset_with_progress(df, target, config, &ProgressBar::hidden())
}

/// Same as [`summarize_dataset`], advancing `pb` once per feature.
pub fn summarize_dataset_with_progress(
    df: &DataFrame,
    target: &str,
    config: &BinningConfig,
    pb: &ProgressBar,
) -> WoeResult<DatasetSummary> {
    summarize_dataset_with(df, target, config, &DecisionTreeSplitter, pb)
}

/// Dataset pass with a caller-supplied tree backend.
pub fn summarize_dataset_with(
    df: &DataFrame,
    target: &str,
    config: &BinningConfig,
    splitter: &dyn SplitFinder,
    pb: &ProgressBar,
) -> WoeResult<DatasetSummary> {
    config.validate()?;
    let outcomes = extract_outcomes(df, target)?;
    let dataset_bad_rate = bad_rate(&outcomes);

    let features: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|col| col.name().as_str() != target)
        .collect();
    pb.set_length(features.len() as u64);

    let results: Vec<(FeatureSummaryRow, Result<FeatureReport, FeatureDiagnostic>)> = features
        .par_iter()
        .map(|column| {
            let result = summarize_column(column, target, &outcomes, dataset_bad_rate, config, splitter);
            pb.inc(1);
            result
        })
        .collect::<WoeResult<_>>()?;

    let mut rows = Vec::with_capacity(results.len());
    let mut reports = Vec::new();
    let mut diagnostics = Vec::new();
    for (row, outcome) in results {
        rows.push(row);
        match outcome {
            Ok(report) => reports.push(report),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    Ok(DatasetSummary {
        target: target.to_string(),
        dataset_bad_rate,
        rows,
        reports,
        diagnostics,
    })
}

/// Missingness plus the isolated feature pipeline for one column.
///
/// Only a failure to read the column's null mask escapes; analysis errors are
/// folded into the returned diagnostic.
fn summarize_column(
    column: &Column,
    target: &str,
    outcomes: &[u8],
    dataset_bad_rate: f64,
    config: &BinningConfig,
    splitter: &dyn SplitFinder,
) -> WoeResult<(FeatureSummaryRow, Result<FeatureReport, FeatureDiagnostic>)> {
    let feature_name = column.name().to_string();
    let missing = compute_missing_stats(&missing_mask(column)?, outcomes);

    let mut row = FeatureSummaryRow {
        feature_name: feature_name.clone(),
        declared_type: column.dtype().to_string(),
        feature_kind: None,
        total_iv: None,
        bin_count: None,
        sample_count: missing.sample_count,
        missing_count: missing.missing_count,
        missing_rate: missing.missing_rate,
        missing_bad_count: missing.missing_bad_count,
        missing_bad_rate: missing.missing_bad_rate,
        nonmissing_count: missing.nonmissing_count,
        nonmissing_bad_count: missing.nonmissing_bad_count,
        nonmissing_bad_rate: missing.nonmissing_bad_rate,
        dataset_bad_rate,
        risk_correlation: None,
        monotonicity: None,
        direction: None,
        peak_risk_location: None,
    };

    let outcome = match analyze_column(column, target, outcomes, config, splitter) {
        Ok(report) => {
            row.feature_kind = Some(report.feature_kind);
            row.total_iv = Some(report.total_iv);
            row.bin_count = Some(report.bins.len());
            row.risk_correlation = report.monotonicity.correlation;
            row.monotonicity = Some(report.monotonicity.monotonicity);
            row.direction = Some(report.monotonicity.direction);
            row.peak_risk_location = report.peak_risk();
            Ok(report)
        }
        Err(e) => Err(FeatureDiagnostic {
            feature: feature_name,
            message: e.to_string(),
        }),
    };

    Ok((row, outcome))
}
