//! Single-feature decision tree used to find split thresholds
//!
//! The pipeline only needs thresholds back from a fitted tree, so tree
//! learning sits behind the [`SplitFinder`] trait. [`DecisionTreeSplitter`]
//! is the built-in backend: a binary classification tree over one feature
//! that grows best-first when a leaf budget is set, and depth-first otherwise.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::config::{BinningConfig, SplitCriterion};

/// Gains at or below this are treated as no improvement
const MIN_GAIN: f64 = 1e-12;

/// Anything that can fit a single-feature classifier and report its thresholds.
pub trait SplitFinder: Send + Sync {
    /// Fit against binary `outcomes` and return the internal-node thresholds.
    ///
    /// `values` and `outcomes` are parallel slices of non-missing rows.
    fn fit(&self, values: &[f64], outcomes: &[u8], config: &BinningConfig) -> Vec<f64>;
}

/// Node of a fitted tree. Leaves carry no threshold.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub depth: usize,
    pub n_samples: usize,
    pub events: usize,
    pub impurity: f64,
    pub threshold: Option<f64>,
    pub left: Option<usize>,
    pub right: Option<usize>,
    start: usize,
    end: usize,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.threshold.is_none()
    }
}

/// A fitted tree; node 0 is the root.
#[derive(Debug, Clone, Default)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Distinct internal-node thresholds, ascending
    pub fn thresholds(&self) -> Vec<f64> {
        let mut thresholds: Vec<f64> = self.nodes.iter().filter_map(|n| n.threshold).collect();
        thresholds.sort_by(|a, b| a.total_cmp(b));
        thresholds.dedup();
        thresholds
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Built-in tree learner backing [`SplitFinder`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionTreeSplitter;

/// Best split of a node's row range
#[derive(Debug, Clone, Copy)]
struct Split {
    /// Offset (within the node) where the right child starts
    index: usize,
    threshold: f64,
    /// Impurity decrease weighted by the node's share of all rows
    improvement: f64,
}

/// Frontier entry for best-first growth
struct Candidate {
    node: usize,
    split: Split,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    // Largest improvement first; earlier nodes win ties
    fn cmp(&self, other: &Self) -> Ordering {
        self.split
            .improvement
            .total_cmp(&other.split.improvement)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Impurity of a node with `events` positives out of `total` rows
pub fn impurity(events: usize, total: usize, criterion: SplitCriterion) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = events as f64 / total as f64;
    match criterion {
        SplitCriterion::Gini => 2.0 * p * (1.0 - p),
        SplitCriterion::Entropy => {
            let term = |q: f64| if q > 0.0 { -q * q.log2() } else { 0.0 };
            term(p) + term(1.0 - p)
        }
    }
}

/// Find the split of `pairs` (sorted by value) that maximizes impurity decrease
/// while keeping at least `min_leaf` rows on each side.
fn find_best_split(
    pairs: &[(f64, u8)],
    min_leaf: usize,
    total_rows: usize,
    criterion: SplitCriterion,
) -> Option<Split> {
    let n = pairs.len();
    if n < 2 * min_leaf || n < 2 {
        return None;
    }

    let total_events = pairs.iter().filter(|(_, y)| *y == 1).count();
    let parent = impurity(total_events, n, criterion);

    let mut best: Option<Split> = None;
    let mut best_gain = MIN_GAIN;
    let mut left_events = 0usize;

    for i in 0..n - 1 {
        if pairs[i].1 == 1 {
            left_events += 1;
        }

        let left_count = i + 1;
        let right_count = n - left_count;
        if left_count < min_leaf || right_count < min_leaf {
            continue;
        }

        // Never split between equal values
        if pairs[i].0 == pairs[i + 1].0 {
            continue;
        }

        let right_events = total_events - left_events;
        let child = (left_count as f64 * impurity(left_events, left_count, criterion)
            + right_count as f64 * impurity(right_events, right_count, criterion))
            / n as f64;
        let gain = parent - child;

        if gain > best_gain {
            best_gain = gain;
            best = Some(Split {
                index: left_count,
                threshold: pairs[i].0 / 2.0 + pairs[i + 1].0 / 2.0,
                improvement: gain * n as f64 / total_rows as f64,
            });
        }
    }

    best
}

impl DecisionTreeSplitter {
    /// Grow a tree over `values`/`outcomes` under the limits in `config`.
    pub fn build(&self, values: &[f64], outcomes: &[u8], config: &BinningConfig) -> DecisionTree {
        let mut pairs: Vec<(f64, u8)> = values
            .iter()
            .copied()
            .zip(outcomes.iter().copied())
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let n = pairs.len();
        if n == 0 {
            return DecisionTree::default();
        }

        let min_leaf = config.min_leaf_samples(n);
        let mut tree = DecisionTree::default();
        Self::push_node(&mut tree, &pairs, 0, n, 0, config.criterion);

        match config.max_leaf_nodes {
            Some(max_leaves) => {
                Self::grow_best_first(&mut tree, &pairs, min_leaf, max_leaves, config)
            }
            None => Self::grow_depth_first(&mut tree, &pairs, min_leaf, config),
        }

        tree
    }

    fn push_node(
        tree: &mut DecisionTree,
        pairs: &[(f64, u8)],
        start: usize,
        end: usize,
        depth: usize,
        criterion: SplitCriterion,
    ) -> usize {
        let events = pairs[start..end].iter().filter(|(_, y)| *y == 1).count();
        let n_samples = end - start;
        tree.nodes.push(TreeNode {
            depth,
            n_samples,
            events,
            impurity: impurity(events, n_samples, criterion),
            threshold: None,
            left: None,
            right: None,
            start,
            end,
        });
        tree.nodes.len() - 1
    }

    /// Best split for a node, or None when the node must stay a leaf
    fn candidate(
        tree: &DecisionTree,
        pairs: &[(f64, u8)],
        node: usize,
        min_leaf: usize,
        config: &BinningConfig,
    ) -> Option<Split> {
        let n = &tree.nodes[node];
        if config.max_depth.is_some_and(|d| n.depth >= d) {
            return None;
        }
        if n.impurity <= MIN_GAIN {
            return None;
        }
        find_best_split(&pairs[n.start..n.end], min_leaf, pairs.len(), config.criterion)
    }

    /// Turn `node` into an internal node and return its children
    fn apply_split(
        tree: &mut DecisionTree,
        pairs: &[(f64, u8)],
        node: usize,
        split: Split,
        criterion: SplitCriterion,
    ) -> (usize, usize) {
        let (start, end, depth) = {
            let n = &tree.nodes[node];
            (n.start, n.end, n.depth)
        };
        let mid = start + split.index;
        let left = Self::push_node(tree, pairs, start, mid, depth + 1, criterion);
        let right = Self::push_node(tree, pairs, mid, end, depth + 1, criterion);

        let parent = &mut tree.nodes[node];
        parent.threshold = Some(split.threshold);
        parent.left = Some(left);
        parent.right = Some(right);
        (left, right)
    }

    fn grow_best_first(
        tree: &mut DecisionTree,
        pairs: &[(f64, u8)],
        min_leaf: usize,
        max_leaves: usize,
        config: &BinningConfig,
    ) {
        let mut frontier = BinaryHeap::new();
        if let Some(split) = Self::candidate(tree, pairs, 0, min_leaf, config) {
            frontier.push(Candidate { node: 0, split });
        }

        let mut leaves = 1;
        while leaves < max_leaves {
            let Some(Candidate { node, split }) = frontier.pop() else {
                break;
            };
            let (left, right) = Self::apply_split(tree, pairs, node, split, config.criterion);
            leaves += 1;

            for child in [left, right] {
                if let Some(split) = Self::candidate(tree, pairs, child, min_leaf, config) {
                    frontier.push(Candidate { node: child, split });
                }
            }
        }
    }

    fn grow_depth_first(
        tree: &mut DecisionTree,
        pairs: &[(f64, u8)],
        min_leaf: usize,
        config: &BinningConfig,
    ) {
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            if let Some(split) = Self::candidate(tree, pairs, node, min_leaf, config) {
                let (left, right) = Self::apply_split(tree, pairs, node, split, config.criterion);
                stack.push(right);
                stack.push(left);
            }
        }
    }
}

impl SplitFinder for DecisionTreeSplitter {
    fn fit(&self, values: &[f64], outcomes: &[u8], config: &BinningConfig) -> Vec<f64> {
        self.build(values, outcomes, config).thresholds()
    }
}
