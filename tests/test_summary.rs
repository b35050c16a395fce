//! Dataset summaries: one row per feature, failures isolated

use indicatif::ProgressBar;
use polars::prelude::*;
use woebin::pipeline::{
    summarize_dataset, summarize_dataset_with, summarize_dataset_with_progress, BinningConfig,
    Direction, FeatureKind, Monotonicity, PeakRiskLocation, SplitFinder, WoeError,
};

mod common;
use common::assert_close;

#[test]
fn test_rows_in_column_order_without_target() {
    let df = common::create_test_dataframe();
    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    let names: Vec<&str> = summary
        .rows
        .iter()
        .map(|r| r.feature_name.as_str())
        .collect();
    assert_eq!(names, vec!["age", "flag", "grade", "constant"]);
    assert_eq!(summary.target, "y");
    assert_close(summary.dataset_bad_rate, 0.5, 1e-12);
    assert!(summary.diagnostics.is_empty());
    assert_eq!(summary.reports.len(), 4);
}

#[test]
fn test_missing_statistics_per_feature() {
    let df = common::create_test_dataframe();
    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    let flag = summary.row("flag").unwrap();
    assert_eq!(flag.declared_type, "i32");
    assert_eq!(flag.feature_kind, Some(FeatureKind::Numeric));
    assert_eq!(flag.bin_count, Some(3));
    assert_eq!(flag.sample_count, 10);
    assert_eq!(flag.missing_count, 1);
    assert_close(flag.missing_rate, 0.1, 1e-12);
    assert_eq!(flag.missing_bad_count, 0);
    assert_eq!(flag.missing_bad_rate, Some(0.0));
    assert_eq!(flag.nonmissing_count, 9);
    assert_eq!(flag.nonmissing_bad_count, 5);
    assert_close(flag.nonmissing_bad_rate.unwrap(), 5.0 / 9.0, 1e-12);

    let age = summary.row("age").unwrap();
    assert_eq!(age.missing_count, 0);
    assert_eq!(age.missing_bad_rate, None);
}

#[test]
fn test_categorical_and_constant_rows() {
    let df = common::create_test_dataframe();
    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    let grade = summary.row("grade").unwrap();
    assert_eq!(grade.feature_kind, Some(FeatureKind::Categorical));
    assert_eq!(grade.bin_count, Some(4));

    let labels: Vec<String> = summary
        .report("grade")
        .unwrap()
        .bins
        .iter()
        .map(|b| b.label())
        .collect();
    assert_eq!(labels, vec!["A", "B", "C", "null"]);

    // One bin: no trend can be measured
    let constant = summary.row("constant").unwrap();
    assert_eq!(constant.bin_count, Some(1));
    assert_eq!(constant.total_iv, Some(0.0));
    assert_eq!(constant.risk_correlation, None);
    assert_eq!(constant.monotonicity, Some(Monotonicity::None));
    assert_eq!(constant.direction, Some(Direction::None));
    assert_eq!(constant.peak_risk_location, Some(PeakRiskLocation::Low));
}

#[test]
fn test_failing_feature_still_gets_a_row() {
    let mut df = common::create_high_cardinality_dataframe(101);
    let score: Vec<f64> = (0..1000).map(|i| (i % 37) as f64).collect();
    df.with_column(Column::new("score".into(), score)).unwrap();

    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    assert_eq!(summary.rows.len(), 2);
    let code = summary.row("code").unwrap();
    assert_eq!(code.feature_kind, None);
    assert_eq!(code.total_iv, None);
    assert_eq!(code.bin_count, None);
    assert_eq!(code.monotonicity, None);
    assert_eq!(code.sample_count, 1000);

    assert_eq!(summary.diagnostics.len(), 1);
    assert_eq!(summary.diagnostics[0].feature, "code");
    assert!(summary.diagnostics[0].message.contains("101"));

    assert!(summary.row("score").unwrap().total_iv.is_some());
    assert!(summary.report("code").is_none());

    // Failed features rank last
    let ranked = summary.ranked_by_iv();
    assert_eq!(ranked.last().unwrap().feature_name, "code");
}

#[test]
fn test_invalid_target_is_fatal() {
    let df = df! {
        "y" => [Some(0i32), None, Some(1)],
        "x" => [1.0f64, 2.0, 3.0],
    }
    .unwrap();

    let err = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap_err();
    assert!(matches!(err, WoeError::NullTarget { .. }));

    let err = summarize_dataset(&df, "missing", &BinningConfig::default()).unwrap_err();
    assert!(matches!(err, WoeError::MissingTarget { .. }));
}

#[test]
fn test_linear_risk_summary() {
    let df = common::create_linear_risk_dataframe(42);
    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    let x = summary.row("x").unwrap();
    assert!(x.total_iv.unwrap() > 0.0);
    assert_eq!(x.monotonicity, Some(Monotonicity::Strong));
    assert_eq!(x.direction, Some(Direction::NegativeFactor));
    assert!(x.peak_risk_location.is_some());
}

#[test]
fn test_progress_bar_advances_per_feature() {
    let df = common::create_large_test_dataframe(200, 12, 3);
    let pb = ProgressBar::hidden();

    let summary =
        summarize_dataset_with_progress(&df, "target", &BinningConfig::default(), &pb).unwrap();

    assert_eq!(summary.rows.len(), 12);
    assert_eq!(pb.position(), 12);
    assert_eq!(pb.length(), Some(12));
    let names: Vec<String> = (0..12).map(|i| format!("feature_{}", i)).collect();
    let got: Vec<String> = summary.rows.iter().map(|r| r.feature_name.clone()).collect();
    assert_eq!(got, names);
}

/// Splits every feature at its median
struct MedianSplitter;

impl SplitFinder for MedianSplitter {
    fn fit(&self, values: &[f64], _outcomes: &[u8], _config: &BinningConfig) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        vec![sorted[sorted.len() / 2]]
    }
}

#[test]
fn test_custom_split_finder() {
    let df = common::create_test_dataframe();
    let summary = summarize_dataset_with(
        &df,
        "y",
        &BinningConfig::default(),
        &MedianSplitter,
        &ProgressBar::hidden(),
    )
    .unwrap();

    // Median of age is 52.0; the largest value below it is 47.0
    let age = summary.report("age").unwrap();
    assert_eq!(
        age.cut_points.as_slice(),
        &[f64::NEG_INFINITY, 47.0, f64::INFINITY]
    );
    assert_eq!(age.bins.len(), 2);
}
