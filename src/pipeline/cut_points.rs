//! Cut-point derivation for continuous features

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

use super::binning::format_float;
use super::config::BinningConfig;
use super::error::AnalysisWarning;
use super::tree::SplitFinder;

/// Ordered interval boundaries, bracketed by -inf and +inf.
///
/// Empty when binning does not apply (fewer than two distinct values).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutPoints(Vec<f64>);

/// Boundaries serialize as float labels so the infinities survive JSON
impl Serialize for CutPoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for bound in &self.0 {
            seq.serialize_element(&format_float(*bound))?;
        }
        seq.end()
    }
}

impl CutPoints {
    /// Bracket interior points with infinities. Points are sorted and deduplicated.
    pub fn from_interior(mut points: Vec<f64>) -> Self {
        points.retain(|p| p.is_finite());
        points.sort_by(|a, b| a.total_cmp(b));
        points.dedup();

        let mut bounds = Vec::with_capacity(points.len() + 2);
        bounds.push(f64::NEG_INFINITY);
        bounds.extend(points);
        bounds.push(f64::INFINITY);
        Self(bounds)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Adjacent (lower, upper) boundary pairs
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.0.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Result of asking for a feature's cut points
#[derive(Debug, Clone, PartialEq)]
pub enum CutPointOutcome {
    Points(CutPoints),
    /// No cut points were produced; the caller decides whether to skip the feature
    Skipped(AnalysisWarning),
}

/// Round half-to-even at two decimals
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// Pass a float through its shortest string form to drop representation noise
pub fn normalize_float(x: f64) -> f64 {
    x.to_string().parse().unwrap_or(x)
}

/// Derive cut points from the non-missing `(value, outcome)` rows of a feature.
///
/// Each tree threshold is replaced by the largest observed value strictly below
/// it, rounded to two decimals. With fewer than two distinct values the result
/// is empty.
pub fn cut_points_from_tree(
    values: &[f64],
    outcomes: &[u8],
    config: &BinningConfig,
    splitter: &dyn SplitFinder,
) -> CutPoints {
    let mut distinct: Vec<f64> = values.to_vec();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    if distinct.len() < 2 {
        return CutPoints::empty();
    }

    let thresholds = splitter.fit(values, outcomes, config);

    let mut points: Vec<f64> = Vec::with_capacity(thresholds.len());
    for threshold in thresholds {
        let below = distinct.partition_point(|v| *v < threshold);
        if below == 0 {
            continue;
        }
        let point = round2(distinct[below - 1]);
        if !points.contains(&point) {
            points.push(point);
        }
    }

    let points = points.into_iter().map(normalize_float).collect();
    CutPoints::from_interior(points)
}

/// Cut points for a named feature, guarding against splitting the target itself.
///
/// `values` holds one entry per row (None = missing); missing rows are dropped
/// before the tree is fitted.
pub fn continuous_cut_points(
    feature: &str,
    target: &str,
    values: &[Option<f64>],
    outcomes: &[u8],
    config: &BinningConfig,
    splitter: &dyn SplitFinder,
) -> CutPointOutcome {
    if feature == target {
        return CutPointOutcome::Skipped(AnalysisWarning::TargetConflict {
            feature: feature.to_string(),
        });
    }

    let (present, present_outcomes): (Vec<f64>, Vec<u8>) = values
        .iter()
        .zip(outcomes.iter())
        .filter_map(|(v, y)| v.map(|v| (v, *y)))
        .unzip();

    CutPointOutcome::Points(cut_points_from_tree(&present, &present_outcomes, config, splitter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tree::DecisionTreeSplitter;

    #[test]
    fn test_serialized_bounds_keep_infinities() {
        let json = serde_json::to_string(&CutPoints::from_interior(vec![19.0])).unwrap();
        assert_eq!(json, r#"["-inf","19.0","inf"]"#);
        assert_eq!(serde_json::to_string(&CutPoints::empty()).unwrap(), "[]");
    }

    /// Splitter returning fixed thresholds
    struct FixedSplitter(Vec<f64>);

    impl SplitFinder for FixedSplitter {
        fn fit(&self, _values: &[f64], _outcomes: &[u8], _config: &BinningConfig) -> Vec<f64> {
            self.0.clone()
        }
    }

    #[test]
    fn test_round2_half_to_even() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-3.456), -3.46);
    }

    #[test]
    fn test_from_interior_brackets_with_infinities() {
        let cuts = CutPoints::from_interior(vec![5.0, 1.0, 5.0]);
        assert_eq!(cuts.as_slice(), &[f64::NEG_INFINITY, 1.0, 5.0, f64::INFINITY]);
        assert_eq!(cuts.intervals().count(), 3);
    }

    #[test]
    fn test_threshold_maps_to_largest_value_below() {
        let values = [1.111, 2.226, 3.0, 4.0];
        let outcomes = [0, 0, 1, 1];
        let splitter = FixedSplitter(vec![2.613, 3.5]);

        let cuts = cut_points_from_tree(&values, &outcomes, &BinningConfig::default(), &splitter);
        assert_eq!(cuts.as_slice(), &[f64::NEG_INFINITY, 2.23, 3.0, f64::INFINITY]);
    }

    #[test]
    fn test_rounded_duplicates_are_dropped() {
        let values = [1.001, 1.004, 2.0];
        let outcomes = [0, 1, 1];
        let splitter = FixedSplitter(vec![1.0025, 1.5]);

        let cuts = cut_points_from_tree(&values, &outcomes, &BinningConfig::default(), &splitter);
        assert_eq!(cuts.as_slice(), &[f64::NEG_INFINITY, 1.0, f64::INFINITY]);
    }

    #[test]
    fn test_single_distinct_value_gives_empty() {
        let values = [3.0, 3.0, 3.0];
        let outcomes = [0, 1, 0];
        let cuts = cut_points_from_tree(
            &values,
            &outcomes,
            &BinningConfig::default(),
            &DecisionTreeSplitter,
        );
        assert!(cuts.is_empty());
    }

    #[test]
    fn test_no_thresholds_gives_trivial_cut_points() {
        let values = [1.0, 2.0, 3.0];
        let outcomes = [0, 0, 0];
        let splitter = FixedSplitter(Vec::new());

        let cuts = cut_points_from_tree(&values, &outcomes, &BinningConfig::default(), &splitter);
        assert_eq!(cuts.as_slice(), &[f64::NEG_INFINITY, f64::INFINITY]);
    }

    #[test]
    fn test_target_conflict_is_a_warning() {
        let outcome = continuous_cut_points(
            "y",
            "y",
            &[Some(0.0), Some(1.0)],
            &[0, 1],
            &BinningConfig::default(),
            &DecisionTreeSplitter,
        );
        assert_eq!(
            outcome,
            CutPointOutcome::Skipped(AnalysisWarning::TargetConflict {
                feature: "y".to_string()
            })
        );
    }

    #[test]
    fn test_missing_values_are_ignored() {
        let values = [Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), None];
        let outcomes = [0, 1, 0, 1, 1, 0];
        let config = BinningConfig {
            min_samples_leaf: 0.25,
            ..Default::default()
        };

        match continuous_cut_points("x", "y", &values, &outcomes, &config, &DecisionTreeSplitter) {
            CutPointOutcome::Points(cuts) => {
                assert_eq!(cuts.as_slice(), &[f64::NEG_INFINITY, 2.0, f64::INFINITY]);
            }
            other => panic!("expected cut points, got {:?}", other),
        }
    }
}
