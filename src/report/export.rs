//! Writing summaries and bin tables to CSV, Parquet and JSON

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::*;
use serde::Serialize;

use crate::pipeline::{
    BinningConfig, DatasetSummary, FeatureDiagnostic, FeatureKind, FeatureReport,
    FeatureSummaryRow,
};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct ExportMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    pub woebin_version: String,
    pub input_file: String,
    pub target_column: String,
    pub config: BinningConfig,
}

/// Dataset-level totals
#[derive(Serialize)]
pub struct ExportOverview {
    pub features_analyzed: usize,
    pub numeric_features: usize,
    pub categorical_features: usize,
    pub failed_features: usize,
    pub dataset_bad_rate: f64,
    /// Mean total IV over features that analyzed cleanly
    pub avg_iv: f64,
}

/// Complete JSON export
#[derive(Serialize)]
pub struct AnalysisExport<'a> {
    pub metadata: ExportMetadata,
    pub summary: ExportOverview,
    pub features: &'a [FeatureSummaryRow],
    pub bin_tables: &'a [FeatureReport],
    pub diagnostics: &'a [FeatureDiagnostic],
}

/// Run details recorded in the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub config: &'a BinningConfig,
}

fn overview(summary: &DatasetSummary) -> ExportOverview {
    let kinds = |kind: FeatureKind| {
        summary
            .rows
            .iter()
            .filter(|r| r.feature_kind == Some(kind))
            .count()
    };
    let ivs: Vec<f64> = summary.rows.iter().filter_map(|r| r.total_iv).collect();
    let avg_iv = if ivs.is_empty() {
        0.0
    } else {
        ivs.iter().sum::<f64>() / ivs.len() as f64
    };

    ExportOverview {
        features_analyzed: summary.rows.len(),
        numeric_features: kinds(FeatureKind::Numeric),
        categorical_features: kinds(FeatureKind::Categorical),
        failed_features: summary.diagnostics.len(),
        dataset_bad_rate: summary.dataset_bad_rate,
        avg_iv,
    }
}

/// Export the summary and every bin table to a JSON file
pub fn export_analysis_json(
    summary: &DatasetSummary,
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = AnalysisExport {
        metadata: ExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            woebin_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            target_column: summary.target.clone(),
            config: params.config.clone(),
        },
        summary: overview(summary),
        features: &summary.rows,
        bin_tables: &summary.reports,
        diagnostics: &summary.diagnostics,
    };

    let json =
        serde_json::to_string_pretty(&export).context("Failed to serialize analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write analysis to {}", output_path.display()))?;

    Ok(())
}

fn opt_u64(value: Option<usize>) -> Option<u64> {
    value.map(|v| v as u64)
}

fn opt_string<T: ToString>(value: Option<T>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn column_of<R, T>(name: &str, rows: &[R], f: impl Fn(&R) -> T) -> Column
where
    Series: NamedFrom<Vec<T>, [T]>,
{
    Column::new(name.into(), rows.iter().map(f).collect::<Vec<T>>())
}

/// One row per feature, columns in summary order
pub fn summary_to_dataframe(summary: &DatasetSummary) -> PolarsResult<DataFrame> {
    let rows = summary.rows.as_slice();

    DataFrame::new(vec![
        column_of("feature_name", rows, |r| r.feature_name.clone()),
        column_of("declared_type", rows, |r| r.declared_type.clone()),
        column_of("feature_kind", rows, |r| opt_string(r.feature_kind)),
        column_of("total_iv", rows, |r| r.total_iv),
        column_of("bin_count", rows, |r| opt_u64(r.bin_count)),
        column_of("sample_count", rows, |r| r.sample_count as u64),
        column_of("missing_count", rows, |r| r.missing_count as u64),
        column_of("missing_rate", rows, |r| r.missing_rate),
        column_of("missing_bad_count", rows, |r| r.missing_bad_count as u64),
        column_of("missing_bad_rate", rows, |r| r.missing_bad_rate),
        column_of("nonmissing_count", rows, |r| r.nonmissing_count as u64),
        column_of("nonmissing_bad_count", rows, |r| r.nonmissing_bad_count as u64),
        column_of("nonmissing_bad_rate", rows, |r| r.nonmissing_bad_rate),
        column_of("dataset_bad_rate", rows, |r| r.dataset_bad_rate),
        column_of("risk_correlation", rows, |r| r.risk_correlation),
        column_of("monotonicity", rows, |r| opt_string(r.monotonicity)),
        column_of("direction", rows, |r| opt_string(r.direction)),
        column_of("peak_risk_location", rows, |r| opt_string(r.peak_risk_location)),
    ])
}

/// One row per bin of a single feature
pub fn bins_to_dataframe(report: &FeatureReport) -> PolarsResult<DataFrame> {
    let bins = report.bins.as_slice();

    DataFrame::new(vec![
        column_of("feature_name", bins, |_| report.feature_name.clone()),
        column_of("bin_label", bins, |b| b.label()),
        column_of("count_outcome_1", bins, |b| b.count_outcome_1 as u64),
        column_of("count_outcome_0", bins, |b| b.count_outcome_0 as u64),
        column_of("count_total", bins, |b| b.count_total as u64),
        column_of("share_outcome_1", bins, |b| b.share_outcome_1),
        column_of("share_outcome_0", bins, |b| b.share_outcome_0),
        column_of("share_total", bins, |b| b.share_total),
        column_of("bad_rate", bins, |b| b.bad_rate),
        column_of("woe", bins, |b| b.woe),
        column_of("iv", bins, |b| b.iv),
        column_of("total_iv", bins, |b| b.total_iv),
    ])
}

/// Save a frame to file (CSV or Parquet based on extension)
pub fn save_dataframe(df: &mut DataFrame, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        _ => anyhow::bail!(
            "Unsupported output format: {}. Supported formats: csv, parquet",
            extension
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::summarize_dataset;
    use tempfile::TempDir;

    fn sample_summary() -> DatasetSummary {
        let df = df! {
            "y" => [0i32, 1, 0, 1, 0, 0],
            "grade" => [Some("A"), Some("B"), Some("A"), None, Some("B"), Some("A")],
            "score" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
        }
        .unwrap();
        summarize_dataset(&df, "y", &BinningConfig::default()).unwrap()
    }

    #[test]
    fn test_summary_frame_has_one_row_per_feature() {
        let summary = sample_summary();
        let df = summary_to_dataframe(&summary).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 18);
        let names = df.column("feature_name").unwrap();
        assert_eq!(names.str().unwrap().get(0), Some("grade"));
        assert_eq!(names.str().unwrap().get(1), Some("score"));
    }

    #[test]
    fn test_bins_frame_matches_report() {
        let summary = sample_summary();
        let report = summary.report("grade").unwrap();
        let df = bins_to_dataframe(report).unwrap();
        assert_eq!(df.height(), report.bins.len());
        let labels = df.column("bin_label").unwrap();
        assert_eq!(labels.str().unwrap().get(2), Some("null"));
    }

    #[test]
    fn test_save_csv_and_parquet() {
        let summary = sample_summary();
        let temp_dir = TempDir::new().unwrap();

        let mut df = summary_to_dataframe(&summary).unwrap();
        let csv_path = temp_dir.path().join("summary.csv");
        save_dataframe(&mut df, &csv_path).unwrap();
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.starts_with("feature_name,declared_type,feature_kind,total_iv"));

        let parquet_path = temp_dir.path().join("summary.parquet");
        save_dataframe(&mut df, &parquet_path).unwrap();
        assert!(parquet_path.exists());

        let bad_path = temp_dir.path().join("summary.txt");
        assert!(save_dataframe(&mut df, &bad_path).is_err());
    }

    #[test]
    fn test_json_export_contains_metadata_and_bins() {
        let summary = sample_summary();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("analysis.json");
        let config = BinningConfig::default();

        export_analysis_json(
            &summary,
            &path,
            &ExportParams {
                input_file: "data.csv",
                config: &config,
            },
        )
        .unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["metadata"]["target_column"], "y");
        assert_eq!(value["metadata"]["config"]["criterion"], "entropy");
        assert_eq!(value["summary"]["features_analyzed"], 2);
        assert_eq!(value["features"].as_array().unwrap().len(), 2);
        assert_eq!(value["bin_tables"][0]["feature_name"], "grade");
        assert_eq!(value["bin_tables"][0]["bins"][0]["bin_label"], "A");

        let cuts = value["bin_tables"][1]["cut_points"].as_array().unwrap();
        assert_eq!(cuts.first().unwrap(), "-inf");
        assert_eq!(cuts.last().unwrap(), "inf");
    }
}
