//! woebin: WoE/IV feature evaluation CLI
//!
//! Bins every feature of a dataset against a binary target and reports
//! Information Value, monotonicity and missing-value statistics.

mod cli;
mod pipeline;
mod report;
mod utils;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use polars::prelude::DataFrame;

use cli::{confirm_overwrite, Cli, Commands};
use pipeline::{
    analyze_feature, load_dataset_with_progress, summarize_dataset_with_progress, BinningConfig,
};
use report::{
    bins_to_dataframe, display_feature_report, display_summary, export_analysis_json,
    save_dataframe, summary_to_dataframe, ExportParams,
};
use utils::{
    create_progress_bar, create_spinner, finish_with_success, finish_with_warning, print_banner,
    print_completion, print_config, print_count, print_info, print_step_header, print_step_time,
    print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let target = cli.target.clone().ok_or_else(|| {
        anyhow::anyhow!("Target column is required. Use -t/--target to specify.")
    })?;

    let config = cli.binning_config();
    config.validate().context("Invalid binning options")?;

    print_banner(env!("CARGO_PKG_VERSION"));

    let summary_output = match cli.command {
        Some(Commands::Feature { .. }) => cli.output.clone(),
        None => cli.output_path(),
    };
    print_config(input, &target, summary_output.as_deref(), &config);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (mut df, rows, cols, memory_mb) =
        load_dataset_with_progress(input, cli.infer_schema_length)?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    if !cli.drop_columns.is_empty() {
        df = df.drop_many(&cli.drop_columns);
        print_info(&format!(
            "Dropped {} column(s) before analysis",
            cols - df.width()
        ));
    }

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    if !column_names.contains(&target) {
        anyhow::bail!(
            "Target column '{}' not found in dataset. Available columns: {:?}",
            target,
            column_names
        );
    }
    print_step_time(step_start.elapsed());

    match &cli.command {
        Some(Commands::Feature { name }) => {
            run_feature(&df, name, &target, &config, cli.output.as_deref(), cli.no_confirm)?
        }
        None => {
            let output_path = summary_output.ok_or_else(|| {
                anyhow::anyhow!("Could not derive an output path from the input file")
            })?;
            run_summary(&cli, &df, input, &target, &config, &output_path)?
        }
    }

    print_completion();

    Ok(())
}

/// Bin table for a single feature, optionally saved to file
fn run_feature(
    df: &DataFrame,
    feature: &str,
    target: &str,
    config: &BinningConfig,
    output: Option<&Path>,
    no_confirm: bool,
) -> Result<()> {
    print_step_header(2, "Feature Analysis");
    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Binning {}...", feature));
    let report = analyze_feature(df, feature, target, config)
        .with_context(|| format!("Failed to analyze feature '{}'", feature))?;
    finish_with_success(&spinner, "Binning complete");
    print_step_time(step_start.elapsed());

    display_feature_report(&report);

    if let Some(path) = output {
        print_step_header(3, "Save Results");
        if confirm_overwrite(path, no_confirm)? {
            let mut bins = bins_to_dataframe(&report)?;
            save_dataframe(&mut bins, path)?;
            print_success(&format!("Saved bin table to {}", path.display()));
        } else {
            print_info("Skipped writing the bin table");
        }
    }

    Ok(())
}

/// Dataset summary: terminal table, summary file and optional JSON export
fn run_summary(
    cli: &Cli,
    df: &DataFrame,
    input: &Path,
    target: &str,
    config: &BinningConfig,
    output_path: &Path,
) -> Result<()> {
    print_step_header(2, "WoE / IV Analysis");
    let step_start = Instant::now();
    let pb = create_progress_bar(df.width().saturating_sub(1) as u64, "Binning features");
    let summary = summarize_dataset_with_progress(df, target, config, &pb)?;

    if summary.diagnostics.is_empty() {
        finish_with_success(&pb, "All features analyzed");
    } else {
        finish_with_warning(&pb, "Some features could not be analyzed");
        print_count(
            "feature(s) that failed analysis",
            summary.diagnostics.len(),
            Some("(listed below the summary)"),
        );
    }
    print_step_time(step_start.elapsed());

    display_summary(&summary);

    print_step_header(3, "Save Results");
    let step_start = Instant::now();
    if confirm_overwrite(output_path, cli.no_confirm)? {
        let spinner = create_spinner("Writing summary...");
        let mut frame = summary_to_dataframe(&summary)?;
        save_dataframe(&mut frame, output_path)?;
        finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));
    } else {
        print_warning("Summary not written");
    }

    if let Some(json_path) = cli.json_export_path() {
        if confirm_overwrite(&json_path, cli.no_confirm)? {
            let input_file = input.display().to_string();
            export_analysis_json(
                &summary,
                &json_path,
                &ExportParams {
                    input_file: &input_file,
                    config,
                },
            )?;
            print_success(&format!("Exported analysis to {}", json_path.display()));
        }
    }
    print_step_time(step_start.elapsed());

    Ok(())
}
