//! Binning configuration shared by every feature in an analysis run

use serde::{Deserialize, Serialize};

use super::error::{WoeError, WoeResult};

/// Default maximum tree depth
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Default maximum number of leaves (and therefore bins)
pub const DEFAULT_MAX_LEAF_NODES: usize = 8;

/// Default minimum fraction of non-missing samples per leaf
pub const DEFAULT_MIN_SAMPLES_LEAF: f64 = 0.05;

/// Categorical features with more distinct values than this are rejected
pub const DEFAULT_MAX_CATEGORIES: usize = 100;

/// Impurity measure used by the decision-tree splitter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitCriterion {
    /// Shannon entropy (information gain)
    #[default]
    Entropy,
    /// Gini impurity
    Gini,
}

impl std::fmt::Display for SplitCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitCriterion::Entropy => write!(f, "entropy"),
            SplitCriterion::Gini => write!(f, "gini"),
        }
    }
}

impl std::str::FromStr for SplitCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "entropy" => Ok(SplitCriterion::Entropy),
            "gini" => Ok(SplitCriterion::Gini),
            _ => Err(format!(
                "Unknown split criterion: '{}'. Use 'entropy' or 'gini'.",
                s
            )),
        }
    }
}

/// Options applied uniformly to every feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    /// Splitting criterion for the tree
    pub criterion: SplitCriterion,
    /// Maximum tree depth (None = unbounded)
    pub max_depth: Option<usize>,
    /// Maximum number of leaves (None = unbounded)
    pub max_leaf_nodes: Option<usize>,
    /// Minimum fraction of non-missing samples in each leaf
    pub min_samples_leaf: f64,
    /// Distinct-value cap for categorical features
    pub max_categories: usize,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            criterion: SplitCriterion::Entropy,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            max_leaf_nodes: Some(DEFAULT_MAX_LEAF_NODES),
            min_samples_leaf: DEFAULT_MIN_SAMPLES_LEAF,
            max_categories: DEFAULT_MAX_CATEGORIES,
        }
    }
}

impl BinningConfig {
    /// Check that every option is in range.
    pub fn validate(&self) -> WoeResult<()> {
        if !(self.min_samples_leaf > 0.0 && self.min_samples_leaf <= 0.5) {
            return Err(WoeError::InvalidConfig(format!(
                "min_samples_leaf must be in (0.0, 0.5], got {}",
                self.min_samples_leaf
            )));
        }
        if self.max_depth == Some(0) {
            return Err(WoeError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if matches!(self.max_leaf_nodes, Some(n) if n < 2) {
            return Err(WoeError::InvalidConfig(
                "max_leaf_nodes must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    /// Minimum leaf size in rows for a node holding `n_samples` rows.
    pub fn min_leaf_samples(&self, n_samples: usize) -> usize {
        ((self.min_samples_leaf * n_samples as f64).ceil() as usize).max(1)
    }
}
