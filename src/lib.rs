//! woebin: Weight of Evidence and Information Value library
//!
//! Bins every feature of a dataset against a binary outcome (decision-tree
//! cut points for numeric features, one bin per value for categorical ones),
//! then reports WoE/IV per bin, a monotonicity verdict and missing-value
//! statistics per feature.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
