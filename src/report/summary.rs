//! Terminal tables for dataset summaries and single-feature bin tables

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{DatasetSummary, Direction, FeatureReport, Monotonicity};

/// Conventional reading of a total IV value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IvStrength {
    Unpredictive,
    Weak,
    Medium,
    Strong,
    Suspicious,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        if iv < 0.02 {
            IvStrength::Unpredictive
        } else if iv < 0.1 {
            IvStrength::Weak
        } else if iv < 0.3 {
            IvStrength::Medium
        } else if iv < 0.5 {
            IvStrength::Strong
        } else {
            IvStrength::Suspicious
        }
    }

    fn color(self) -> Color {
        match self {
            IvStrength::Unpredictive => Color::DarkGrey,
            IvStrength::Weak => Color::White,
            IvStrength::Medium => Color::Cyan,
            IvStrength::Strong => Color::Green,
            IvStrength::Suspicious => Color::Yellow,
        }
    }
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IvStrength::Unpredictive => write!(f, "unpredictive"),
            IvStrength::Weak => write!(f, "weak"),
            IvStrength::Medium => write!(f, "medium"),
            IvStrength::Strong => write!(f, "strong"),
            IvStrength::Suspicious => write!(f, "suspicious"),
        }
    }
}

fn trend_color(monotonicity: Monotonicity) -> Color {
    match monotonicity {
        Monotonicity::Strong => Color::Green,
        Monotonicity::Weak => Color::Yellow,
        Monotonicity::None => Color::White,
    }
}

/// Horizontal bar for a fraction in [0, 1]
fn share_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn print_section(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn missing_cell() -> Cell {
    Cell::new("-").fg(Color::DarkGrey)
}

/// Render the per-feature summary, strongest IV first.
pub fn display_summary(summary: &DatasetSummary) {
    print_section("📋", "FEATURE SUMMARY");

    println!(
        "    Target: {}   Bad rate: {}",
        style(&summary.target).cyan(),
        style(format!("{:.2}%", summary.dataset_bad_rate * 100.0)).yellow()
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        [
            "Feature", "Type", "Kind", "Bins", "IV", "Strength", "Missing", "Trend",
            "Direction", "Peak",
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for row in summary.ranked_by_iv() {
        let mut cells = vec![
            Cell::new(&row.feature_name),
            Cell::new(&row.declared_type).fg(Color::DarkGrey),
            row.feature_kind.map_or_else(missing_cell, Cell::new),
            row.bin_count
                .map_or_else(missing_cell, |n| Cell::new(n).set_alignment(CellAlignment::Right)),
        ];

        match row.total_iv {
            Some(iv) => {
                let strength = IvStrength::from_iv(iv);
                cells.push(
                    Cell::new(format!("{:.4}", iv))
                        .fg(strength.color())
                        .set_alignment(CellAlignment::Right),
                );
                cells.push(Cell::new(strength).fg(strength.color()));
            }
            None => {
                cells.push(Cell::new("failed").fg(Color::Red));
                cells.push(missing_cell());
            }
        }

        cells.push(
            Cell::new(format!("{:.1}%", row.missing_rate * 100.0))
                .fg(if row.missing_count > 0 {
                    Color::Yellow
                } else {
                    Color::White
                })
                .set_alignment(CellAlignment::Right),
        );
        cells.push(
            row.monotonicity
                .map_or_else(missing_cell, |m| Cell::new(m).fg(trend_color(m))),
        );
        cells.push(row.direction.map_or_else(missing_cell, Cell::new));
        cells.push(row.peak_risk_location.map_or_else(missing_cell, Cell::new));

        table.add_row(cells);
    }

    print_indented(&table);

    if !summary.diagnostics.is_empty() {
        print_section("⚠️ ", "FAILED FEATURES");
        for diagnostic in &summary.diagnostics {
            println!(
                "      {} {}",
                style(&diagnostic.feature).red().bold(),
                style(&diagnostic.message).dim()
            );
        }
    }
}

/// Render one feature's bin table with its IV and trend verdict.
pub fn display_feature_report(report: &FeatureReport) {
    print_section("📊", &format!("BINS: {}", report.feature_name));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(
        [
            "Bin", "Count", "Bad", "Good", "Share", "", "Bad rate", "WoE", "IV",
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for bin in &report.bins {
        let label = Cell::new(bin.label());
        table.add_row(vec![
            if bin.bin.is_null() {
                label.fg(Color::DarkGrey)
            } else {
                label
            },
            Cell::new(bin.count_total).set_alignment(CellAlignment::Right),
            Cell::new(bin.count_outcome_1).set_alignment(CellAlignment::Right),
            Cell::new(bin.count_outcome_0).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", bin.share_total * 100.0))
                .set_alignment(CellAlignment::Right),
            Cell::new(share_bar(bin.share_total, 12)).fg(Color::Cyan),
            Cell::new(format!("{:.2}%", bin.bad_rate * 100.0))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:+.4}", bin.woe))
                .fg(if bin.woe > 0.0 { Color::Red } else { Color::Green })
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", bin.iv)).set_alignment(CellAlignment::Right),
        ]);
    }

    print_indented(&table);

    let analysis = &report.monotonicity;
    println!();
    println!(
        "    Kind: {}   Total IV: {} ({})",
        style(report.feature_kind).cyan(),
        style(format!("{:.4}", report.total_iv)).yellow().bold(),
        IvStrength::from_iv(report.total_iv)
    );
    let correlation = analysis
        .correlation
        .map_or_else(|| "undefined".to_string(), |rho| format!("{:+.3}", rho));
    let trend = match analysis.direction {
        Direction::None => format!("{}", analysis.monotonicity),
        direction => format!("{}, {}", analysis.monotonicity, direction),
    };
    println!(
        "    Trend: {}   Spearman rho: {}",
        style(trend).cyan(),
        style(correlation).dim()
    );
    if let Some(peak) = report.peak_risk() {
        println!("    Peak risk: {}", style(peak).cyan());
    }
}
