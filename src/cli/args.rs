//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::pipeline::{
    BinningConfig, SplitCriterion, DEFAULT_MAX_CATEGORIES, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_LEAF_NODES, DEFAULT_MIN_SAMPLES_LEAF,
};

/// woebin - Weight of Evidence and Information Value for every feature of a dataset
#[derive(Parser, Debug)]
#[command(name = "woebin")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,

    /// Binary outcome column (values 0/1)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Output file path (CSV or Parquet, determined by extension).
    /// For the dataset summary this defaults to '<input>_iv_summary.csv' next to the input.
    /// For the feature subcommand the bin table is only written when this is given.
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Also write a JSON export with run metadata and every feature's bin table.
    /// Defaults to '<input>_iv_analysis.json' when no path is given.
    #[arg(long, value_name = "PATH")]
    pub export_json: Option<Option<PathBuf>>,

    /// Impurity measure for the binning tree: "entropy" or "gini"
    #[arg(long, global = true, default_value = "entropy")]
    pub criterion: SplitCriterion,

    /// Maximum depth of the binning tree (0 = unlimited)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of tree leaves, and therefore interval bins (0 = unlimited)
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_LEAF_NODES, value_parser = validate_max_leaf_nodes)]
    pub max_leaf_nodes: usize,

    /// Minimum fraction of non-missing rows per tree leaf, in (0.0, 0.5]
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_SAMPLES_LEAF, value_parser = validate_min_samples_leaf)]
    pub min_samples_leaf: f64,

    /// Categorical features with more distinct values than this are reported as failed
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CATEGORIES)]
    pub max_categories: usize,

    /// Columns to drop before processing (comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Overwrite existing output files without asking
    #[arg(long, global = true, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, global = true, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the bin table, IV and trend verdict of a single feature
    Feature {
        /// Feature column to analyze
        name: String,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Summary output path, deriving '<stem>_iv_summary.csv' from the input if not given.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(
            self.output
                .clone()
                .unwrap_or_else(|| sibling_path(input, "_iv_summary.csv")),
        )
    }

    /// JSON export path, if the export was requested.
    pub fn json_export_path(&self) -> Option<PathBuf> {
        match &self.export_json {
            None => None,
            Some(Some(path)) => Some(path.clone()),
            Some(None) => self
                .input
                .as_ref()
                .map(|input| sibling_path(input, "_iv_analysis.json")),
        }
    }

    /// Binning options with 0 mapped to "unlimited"
    pub fn binning_config(&self) -> BinningConfig {
        let limit = |value: usize| (value > 0).then_some(value);
        BinningConfig {
            criterion: self.criterion,
            max_depth: limit(self.max_depth),
            max_leaf_nodes: limit(self.max_leaf_nodes),
            min_samples_leaf: self.min_samples_leaf,
            max_categories: self.max_categories,
        }
    }
}

fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    parent.join(format!("{}{}", stem, suffix))
}

/// Validator for min_samples_leaf parameter
fn validate_min_samples_leaf(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value > 0.0 && value <= 0.5 {
        Ok(value)
    } else {
        Err(format!(
            "min_samples_leaf must be in (0.0, 0.5], got {}",
            value
        ))
    }
}

/// Validator for max_leaf_nodes parameter
fn validate_max_leaf_nodes(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid count", s))?;

    if value == 1 {
        Err("max_leaf_nodes must be 0 (unlimited) or at least 2".to_string())
    } else {
        Ok(value)
    }
}
