//! Monotonicity of risk across ordered bins
//!
//! Measures how consistently the bad rate moves with bin order using the
//! Spearman rank correlation, and classifies trend strength and direction.

use serde::Serialize;

use super::woe::BinStatistics;

/// |rho| at or above this is a strong trend
pub const STRONG_THRESHOLD: f64 = 0.8;

/// |rho| at or above this (and below strong) is a weak trend
pub const WEAK_THRESHOLD: f64 = 0.6;

/// Strength of the rank relationship between bin order and bad rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Monotonicity {
    Strong,
    Weak,
    None,
}

impl std::fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Monotonicity::Strong => write!(f, "strong"),
            Monotonicity::Weak => write!(f, "weak"),
            Monotonicity::None => write!(f, "none"),
        }
    }
}

/// Effect of the feature on risk as bins increase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Risk falls as bins increase
    PositiveFactor,
    /// Risk rises as bins increase
    NegativeFactor,
    /// No meaningful trend
    None,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::PositiveFactor => write!(f, "positive factor"),
            Direction::NegativeFactor => write!(f, "negative factor"),
            Direction::None => write!(f, "none"),
        }
    }
}

/// Trend verdict for a feature's bins
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonotonicityAnalysis {
    /// Spearman correlation between bin order and bad rate (None when undefined)
    pub correlation: Option<f64>,
    pub monotonicity: Monotonicity,
    pub direction: Direction,
}

/// Average ranks (1-based), ties share the mean of their positions
fn rank(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }
        let avg_rank = (i + j) as f64 / 2.0 + 0.5;
        for item in &indexed[i..j] {
            ranks[item.0] = avg_rank;
        }
        i = j;
    }
    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Spearman rank correlation; None for fewer than two points or a constant series
pub fn spearman_correlation(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    pearson(&rank(x), &rank(y))
}

/// Classify a correlation coefficient into trend strength and direction
pub fn classify_correlation(correlation: Option<f64>) -> (Monotonicity, Direction) {
    let Some(rho) = correlation.filter(|r| !r.is_nan()) else {
        return (Monotonicity::None, Direction::None);
    };

    let monotonicity = if rho.abs() >= STRONG_THRESHOLD {
        Monotonicity::Strong
    } else if rho.abs() >= WEAK_THRESHOLD {
        Monotonicity::Weak
    } else {
        return (Monotonicity::None, Direction::None);
    };

    let direction = if rho < 0.0 {
        Direction::PositiveFactor
    } else {
        Direction::NegativeFactor
    };

    (monotonicity, direction)
}

/// Trend of bad rates taken in bin order
pub fn analyze_bad_rates(bad_rates: &[f64]) -> MonotonicityAnalysis {
    let order: Vec<f64> = (0..bad_rates.len()).map(|i| i as f64).collect();
    let correlation = spearman_correlation(&order, bad_rates);
    let (monotonicity, direction) = classify_correlation(correlation);
    MonotonicityAnalysis {
        correlation,
        monotonicity,
        direction,
    }
}

/// Trend of an ordered bin table, ignoring the null bin
pub fn analyze_monotonicity(bins: &[BinStatistics]) -> MonotonicityAnalysis {
    let bad_rates: Vec<f64> = bins
        .iter()
        .filter(|b| !b.bin.is_null())
        .map(|b| b.bad_rate)
        .collect();
    analyze_bad_rates(&bad_rates)
}
