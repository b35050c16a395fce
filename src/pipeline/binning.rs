//! Row-to-bin assignment

use serde::{Serialize, Serializer};

use super::classify::FeatureValues;
use super::cut_points::CutPoints;

/// Label of the bin holding missing values
pub const NULL_LABEL: &str = "null";

/// Residual missing-value text folded into the null bin
const NAN_LABEL: &str = "nan";

/// A partition of a feature's values
#[derive(Debug, Clone, PartialEq)]
pub enum Bin {
    /// Half-open interval `(lower, upper]`
    Interval { lower: f64, upper: f64 },
    /// A raw value rendered as text
    Value(String),
    /// Missing values
    Null,
}

impl Bin {
    pub fn is_null(&self) -> bool {
        matches!(self, Bin::Null)
    }

    /// Left boundary for interval bins
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            Bin::Interval { lower, .. } => Some(*lower),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Bin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bin::Interval { lower, upper } => {
                write!(f, "({}, {}]", format_float(*lower), format_float(*upper))
            }
            Bin::Value(v) => write!(f, "{}", v),
            Bin::Null => write!(f, "{}", NULL_LABEL),
        }
    }
}

impl Serialize for Bin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// Per-row bins for one feature
#[derive(Debug, Clone, PartialEq)]
pub struct BinAssignment {
    pub bins: Vec<Bin>,
    /// True when rows were placed into cut-point intervals
    pub interval_binned: bool,
}

/// Render a float the way scientific tooling prints it: always with a
/// fractional part or exponent (`3.0`, `0.25`, `1e+16`, `inf`).
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        return NAN_LABEL.to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let abs = x.abs();
    if abs != 0.0 && !(1e-4..1e16).contains(&abs) {
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(d) => ('-', d),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    let formatted = x.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}

/// Interval `(cuts[i-1], cuts[i]]` containing `x`, if any
fn interval_for(x: f64, cuts: &[f64]) -> Option<Bin> {
    let idx = cuts.partition_point(|c| *c < x);
    if idx == 0 || idx >= cuts.len() {
        return None;
    }
    Some(Bin::Interval {
        lower: cuts[idx - 1],
        upper: cuts[idx],
    })
}

/// Assign each row to a bin.
///
/// Numeric features with more than two distinct values and non-empty cut
/// points use intervals; other numeric features use their raw values. Missing
/// values, values outside every interval and literal `nan` land in the null bin.
pub fn assign_bins(values: &FeatureValues, cut_points: &CutPoints) -> BinAssignment {
    let (bins, interval_binned): (Vec<Bin>, bool) = match values {
        FeatureValues::Numeric(numbers) => {
            if values.distinct_count() > 2 && !cut_points.is_empty() {
                let cuts = cut_points.as_slice();
                let bins = numbers
                    .iter()
                    .map(|v| v.and_then(|x| interval_for(x, cuts)).unwrap_or(Bin::Null))
                    .collect();
                (bins, true)
            } else {
                let bins = numbers
                    .iter()
                    .map(|v| match v {
                        Some(x) => Bin::Value(format_float(*x)),
                        None => Bin::Null,
                    })
                    .collect();
                (bins, false)
            }
        }
        FeatureValues::Categorical(strings) => {
            let bins = strings
                .iter()
                .map(|v| match v {
                    Some(s) => Bin::Value(s.clone()),
                    None => Bin::Null,
                })
                .collect();
            (bins, false)
        }
    };

    let bins = bins
        .into_iter()
        .map(|bin| match bin {
            Bin::Value(ref v) if v == NAN_LABEL || v == NULL_LABEL => Bin::Null,
            other => other,
        })
        .collect();

    BinAssignment {
        bins,
        interval_binned,
    }
}
