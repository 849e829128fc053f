//! Five-number summary for the report's box-plot chart.

use serde::{Deserialize, Serialize};

use crate::member::MemberId;
use crate::numbers::i64_to_f64;

/// Five-number summary of a metric series, plus the member sitting closest
/// to the median for "highlight the median member" affordances.
///
/// Quartiles use linear interpolation on the sorted series (the R-7 /
/// inclusive-median convention): the p-quantile is the value at rank
/// `p * (n - 1)`, interpolating between adjacent order statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub median_member: MemberId,
}

/// Compute box-plot stats over `(member, value)` samples.
///
/// Returns `None` for an empty series — callers render an explicit "no
/// data" state, never a zero-valued chart. The median-member pointer breaks
/// distance ties by first occurrence in input order.
#[must_use]
pub fn box_plot_stats(samples: &[(MemberId, i64)]) -> Option<BoxPlotStats> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted: Vec<f64> = samples.iter().map(|(_, v)| i64_to_f64(*v)).collect();
    sorted.sort_by(f64::total_cmp);

    let median = quantile(&sorted, 0.5);
    let median_member = samples
        .iter()
        .min_by(|(_, a), (_, b)| {
            let da = (i64_to_f64(*a) - median).abs();
            let db = (i64_to_f64(*b) - median).abs();
            da.total_cmp(&db)
        })
        .map(|(id, _)| id.clone())?;

    Some(BoxPlotStats {
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median,
        q3: quantile(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
        median_member,
    })
}

/// R-7 quantile of a sorted, non-empty series.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let rank = p * i64_to_f64(sorted.len() as i64 - 1);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let weight = rank - rank.floor();
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}
