//! Pipeline module - classification, binning and WoE/IV evaluation

pub mod binning;
pub mod classify;
pub mod config;
pub mod cut_points;
pub mod error;
pub mod feature;
pub mod loader;
pub mod missing;
pub mod monotonicity;
pub mod summary;
pub mod target;
pub mod tree;
pub mod woe;

pub use binning::*;
pub use classify::*;
pub use config::*;
pub use cut_points::*;
pub use error::*;
pub use feature::*;
pub use loader::*;
pub use missing::*;
pub use monotonicity::*;
pub use summary::*;
pub use target::*;
pub use tree::{DecisionTree, DecisionTreeSplitter, SplitFinder, TreeNode};
pub use woe::*;
