//! Weight of Evidence (WoE) and Information Value (IV) aggregation per bin

use std::collections::BTreeMap;

use serde::Serialize;

use super::binning::{Bin, BinAssignment};

/// WoE statistics for one bin
#[derive(Debug, Clone, Serialize)]
pub struct BinStatistics {
    /// The bin (serialized as its label)
    #[serde(rename = "bin_label")]
    pub bin: Bin,
    /// Rows with outcome = 1
    pub count_outcome_1: usize,
    /// Rows with outcome = 0
    pub count_outcome_0: usize,
    /// All rows in the bin
    pub count_total: usize,
    /// Share of all outcome = 1 rows that fall in this bin
    pub share_outcome_1: f64,
    /// Share of all outcome = 0 rows that fall in this bin
    pub share_outcome_0: f64,
    /// Share of all rows that fall in this bin
    pub share_total: f64,
    /// count_outcome_1 / count_total
    pub bad_rate: f64,
    pub woe: f64,
    /// Contribution to total IV from this bin
    pub iv: f64,
    /// Sum of `iv` over every bin of the feature
    pub total_iv: f64,
}

impl BinStatistics {
    pub fn label(&self) -> String {
        self.bin.label()
    }
}

/// `part / whole`, or 0 when `whole` is 0
fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Calculate WoE and IV contribution for a bin.
///
/// Uses the ln(%bad/%good) convention: WoE > 0 marks a bin riskier than
/// average. When either share is zero the log-ratio is undefined and both
/// WoE and IV are 0.
pub fn calculate_woe_iv(
    events: usize,
    non_events: usize,
    total_events: usize,
    total_non_events: usize,
) -> (f64, f64) {
    let dist_events = share(events, total_events);
    let dist_non_events = share(non_events, total_non_events);
    woe_iv_from_shares(dist_events, dist_non_events)
}

fn woe_iv_from_shares(dist_events: f64, dist_non_events: f64) -> (f64, f64) {
    if dist_events == 0.0 || dist_non_events == 0.0 {
        return (0.0, 0.0);
    }
    let woe = (dist_events / dist_non_events).ln();
    let iv = (dist_events - dist_non_events) * woe;
    if woe.is_finite() && iv.is_finite() {
        (woe, iv)
    } else {
        (0.0, 0.0)
    }
}

/// Group rows by bin and compute per-bin WoE/IV plus the total IV.
///
/// Interval bins come back ascending by left boundary with the null bin last.
/// Other bins come back ascending by label.
pub fn aggregate_bins(assignment: &BinAssignment, outcomes: &[u8]) -> Vec<BinStatistics> {
    // label -> (bin, events, non_events)
    let mut groups: BTreeMap<String, (Bin, usize, usize)> = BTreeMap::new();
    for (bin, &y) in assignment.bins.iter().zip(outcomes.iter()) {
        let entry = groups
            .entry(bin.label())
            .or_insert_with(|| (bin.clone(), 0, 0));
        if y == 1 {
            entry.1 += 1;
        } else {
            entry.2 += 1;
        }
    }

    let total_events: usize = groups.values().map(|(_, e, _)| e).sum();
    let total_non_events: usize = groups.values().map(|(_, _, ne)| ne).sum();
    let total_samples = total_events + total_non_events;

    let mut stats: Vec<BinStatistics> = groups
        .into_values()
        .map(|(bin, events, non_events)| {
            let count = events + non_events;
            let share_outcome_1 = share(events, total_events);
            let share_outcome_0 = share(non_events, total_non_events);
            let (woe, iv) = woe_iv_from_shares(share_outcome_1, share_outcome_0);

            BinStatistics {
                bin,
                count_outcome_1: events,
                count_outcome_0: non_events,
                count_total: count,
                share_outcome_1,
                share_outcome_0,
                share_total: share(count, total_samples),
                bad_rate: share(events, count),
                woe,
                iv,
                total_iv: 0.0,
            }
        })
        .collect();

    let total_iv: f64 = stats.iter().map(|s| s.iv).sum();
    for s in &mut stats {
        s.total_iv = total_iv;
    }

    if assignment.interval_binned && stats.len() > 1 {
        // Null has no ordinal; it sorts after every interval
        stats.sort_by(|a, b| {
            let ka = a.bin.lower_bound().unwrap_or(f64::INFINITY);
            let kb = b.bin.lower_bound().unwrap_or(f64::INFINITY);
            ka.total_cmp(&kb).then_with(|| a.bin.is_null().cmp(&b.bin.is_null()))
        });
    }

    stats
}
