//! Terminal styling for the woebin CLI

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::BinningConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static TREE: Emoji<'_, '_> = Emoji("🌳 ", "");

pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("woebin").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Weight of Evidence and Information Value with tree binning").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, target: &str, output: Option<&Path>, config: &BinningConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let limit = |value: Option<usize>| value.map_or_else(|| "none".to_string(), |v| v.to_string());

    println!("    ┌{}┐", line);
    println!("    │ {:<52}│", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_path(input, 38));
    println!("    │  {} Target: {:<39}│", TARGET, truncate_string(target, 38));
    if let Some(output) = output {
        println!("    │  {} Output: {:<39}│", SAVE, truncate_path(output, 38));
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {} Criterion:        {:<29}│",
        TREE,
        style(config.criterion).yellow()
    );
    println!(
        "    │     Max depth:        {:<29}│",
        style(limit(config.max_depth)).yellow()
    );
    println!(
        "    │     Max leaf nodes:   {:<29}│",
        style(limit(config.max_leaf_nodes)).yellow()
    );
    println!(
        "    │     Min samples leaf: {:<29}│",
        style(format!("{:.1}%", config.min_samples_leaf * 100.0)).yellow()
    );
    println!(
        "    │     Max categories:   {:<29}│",
        style(config.max_categories).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("({:.2}s)", elapsed.as_secs_f64())).dim()
    );
}

pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("woebin analysis complete!").green().bold()
    );
    println!();
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(info) => println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        ),
        None => println!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

/// Keep the tail of `s`, which for paths is the informative part
fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("abcdefghijkl", 8), "...hijkl");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("ééééééééé", 6), "...ééé");
    }
}
