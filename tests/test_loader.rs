//! Loading datasets from disk and feeding them to the analysis

use std::io::Write;

use polars::prelude::*;
use tempfile::TempDir;
use woebin::pipeline::{
    load_dataset, load_dataset_with_progress, summarize_dataset, BinningConfig, FeatureKind,
};

mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("loans.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "income,grade,y").unwrap();
    writeln!(file, "1200.5,A,0").unwrap();
    writeln!(file, "800,B,1").unwrap();
    writeln!(file, ",A,0").unwrap();
    drop(file);

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(cols, 3);
    assert_eq!(df.get_column_names(), &["income", "grade", "y"]);
    assert_eq!(df.column("income").unwrap().null_count(), 1);
    assert!(mem_mb >= 0.0);
}

#[test]
fn test_load_parquet_round_trip_keeps_dtypes() {
    let mut df = common::create_test_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded, rows, cols, _) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 10);
    assert_eq!(cols, 5);
    assert_eq!(loaded.column("flag").unwrap().dtype(), &DataType::Int32);
    assert_eq!(loaded.column("grade").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("loans.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let err = load_dataset(&bad_path, 100)
        .err()
        .expect("xlsx should be rejected");
    assert!(err.to_string().contains("Unsupported file format"));
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/loans.csv");
    assert!(load_dataset_with_progress(path, 100).is_err());
}

#[test]
fn test_csv_text_numbers_are_numeric_features() {
    // Quoted numbers may load as strings; classification reads the values
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("text.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "score,y").unwrap();
    for i in 0..20 {
        writeln!(file, "\"{}\",{}", i, i % 2).unwrap();
    }
    drop(file);

    let (df, _, _, _) = load_dataset_with_progress(&csv_path, 100).unwrap();
    let summary = summarize_dataset(&df, "y", &BinningConfig::default()).unwrap();

    assert_eq!(summary.rows[0].feature_kind, Some(FeatureKind::Numeric));
}

#[test]
fn test_full_scan_schema_inference() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("late_float.csv");

    // Integers for 50 rows, then a float
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "x,y").unwrap();
    for i in 0..50 {
        writeln!(file, "{},{}", i, i % 2).unwrap();
    }
    writeln!(file, "50.5,1").unwrap();
    drop(file);

    let (df, rows, _, _) = load_dataset_with_progress(&csv_path, 0).unwrap();
    assert_eq!(rows, 51);
    assert_eq!(df.column("x").unwrap().dtype(), &DataType::Float64);
}
