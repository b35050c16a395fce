//! Single-feature WoE/IV report
//!
//! Runs classification, cut-point derivation, binning, aggregation and the
//! monotonicity check for one column.

use polars::prelude::*;
use serde::Serialize;

use super::binning::assign_bins;
use super::classify::{extract_feature_values, FeatureKind, FeatureValues};
use super::config::BinningConfig;
use super::cut_points::{continuous_cut_points, CutPointOutcome, CutPoints};
use super::error::{AnalysisWarning, WoeError, WoeResult};
use super::monotonicity::{analyze_monotonicity, MonotonicityAnalysis};
use super::summary::PeakRiskLocation;
use super::target::extract_outcomes;
use super::tree::{DecisionTreeSplitter, SplitFinder};
use super::woe::{aggregate_bins, BinStatistics};

/// Bin-level WoE/IV table for one feature
#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub feature_name: String,
    pub feature_kind: FeatureKind,
    /// Interval boundaries; empty unless the feature was interval-binned
    pub cut_points: CutPoints,
    /// Bins in presentation order
    pub bins: Vec<BinStatistics>,
    pub total_iv: f64,
    pub monotonicity: MonotonicityAnalysis,
}

impl FeatureReport {
    /// Where the highest bad rate sits among the bins
    pub fn peak_risk(&self) -> Option<PeakRiskLocation> {
        PeakRiskLocation::locate(&self.bins)
    }

    pub fn has_null_bin(&self) -> bool {
        self.bins.iter().any(|b| b.bin.is_null())
    }
}

/// Analyze one feature of `df` against the `target` outcome column.
///
/// Errors propagate unchanged: a missing or non-binary target, a feature that
/// does not exist, or a categorical feature with too many distinct values.
pub fn analyze_feature(
    df: &DataFrame,
    feature: &str,
    target: &str,
    config: &BinningConfig,
) -> WoeResult<FeatureReport> {
    config.validate()?;
    let outcomes = extract_outcomes(df, target)?;
    let column = df.column(feature)?;
    analyze_column(column, target, &outcomes, config, &DecisionTreeSplitter)
}

/// Analyze a column whose outcomes were already validated.
pub fn analyze_column(
    column: &Column,
    target: &str,
    outcomes: &[u8],
    config: &BinningConfig,
    splitter: &dyn SplitFinder,
) -> WoeResult<FeatureReport> {
    let feature_name = column.name().to_string();
    let values = extract_feature_values(column, config.max_categories)?;

    let cut_points = match &values {
        FeatureValues::Numeric(numbers) if values.distinct_count() > 2 => {
            match continuous_cut_points(&feature_name, target, numbers, outcomes, config, splitter) {
                CutPointOutcome::Points(points) => points,
                CutPointOutcome::Skipped(AnalysisWarning::TargetConflict { feature }) => {
                    return Err(WoeError::TargetConflict { feature })
                }
            }
        }
        _ => CutPoints::empty(),
    };

    let assignment = assign_bins(&values, &cut_points);
    let bins = aggregate_bins(&assignment, outcomes);
    let total_iv = bins.first().map(|b| b.total_iv).unwrap_or(0.0);
    let monotonicity = analyze_monotonicity(&bins);

    Ok(FeatureReport {
        feature_name,
        feature_kind: values.kind(),
        cut_points,
        bins,
        total_iv,
        monotonicity,
    })
}
