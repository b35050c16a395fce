//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use tempfile::TempDir;

/// Small mixed dataset with known characteristics
///
/// - `y`: binary outcome (0/1)
/// - `age`: numeric with many distinct values
/// - `flag`: numeric with two distinct values plus a null
/// - `grade`: categorical with a null
/// - `constant`: a single value
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "y" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        "age" => [21.0f64, 25.0, 33.0, 41.0, 47.0, 52.0, 58.0, 61.0, 66.0, 70.0],
        "flag" => [Some(0i32), Some(1), Some(0), Some(1), None, Some(1), Some(0), Some(1), Some(0), Some(0)],
        "grade" => [Some("A"), Some("B"), Some("A"), Some("C"), None, Some("B"), Some("A"), Some("C"), Some("A"), Some("B")],
        "constant" => [5.0f64; 10],
    }
    .unwrap()
}

/// 1000 rows where risk rises linearly with `x`
///
/// P(y = 1 | x) = x / 100 for x uniform in [0, 100).
pub fn create_linear_risk_dataframe(seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 1000;

    let x: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..100.0)).collect();
    let y: Vec<i32> = x
        .iter()
        .map(|&v| {
            let p = v / 100.0;
            i32::from(rng.gen::<f64>() < p)
        })
        .collect();

    df! {
        "x" => x,
        "y" => y,
    }
    .unwrap()
}

/// Random numeric features against a random target
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 1);
    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("target".into(), target));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Categorical column with `categories` distinct values cycling over 1000 rows
pub fn create_high_cardinality_dataframe(categories: usize) -> DataFrame {
    let rows = 1000;
    let values: Vec<String> = (0..rows).map(|i| format!("cat_{}", i % categories)).collect();
    let target: Vec<i32> = (0..rows).map(|i| (i % 2) as i32).collect();
    df! {
        "y" => target,
        "code" => values,
    }
    .unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats are within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {} to be within {} of {}",
        actual,
        tol,
        expected
    );
}
