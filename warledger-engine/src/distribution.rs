//! Histogram binning for the report's metric distribution chart.
//!
//! Bins are computed once per report and reused verbatim by every renderer;
//! independent re-binning is exactly the drift bug this module exists to
//! prevent.

use serde::{Deserialize, Serialize};

use crate::category::EventCategory;
use crate::classify::is_violator;
use crate::format::format_number;
use crate::member::{MemberEventDelta, MemberId};

const DEFAULT_TARGET_BINS: usize = 6;

/// Bin-count policy for distribution histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinningCfg {
    /// Upper bound on the number of bins; narrow series produce fewer.
    #[serde(default = "default_target_bins")]
    pub target_bins: usize,
}

const fn default_target_bins() -> usize {
    DEFAULT_TARGET_BINS
}

impl Default for BinningCfg {
    fn default() -> Self {
        Self {
            target_bins: DEFAULT_TARGET_BINS,
        }
    }
}

/// One histogram bucket with inclusive integer bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionBin {
    /// Human-readable range, e.g. `"15K-22K"`; identical on every surface.
    pub label: String,
    pub lower: i64,
    pub upper: i64,
    pub count: u32,
}

/// The series a category's distribution chart plots, in input order.
///
/// Battle and Siege plot participants' primary metric; Forbidden plots
/// violators' power gain.
#[must_use]
pub fn metric_series(
    category: EventCategory,
    deltas: &[MemberEventDelta],
) -> Vec<(MemberId, i64)> {
    deltas
        .iter()
        .filter(|m| match category {
            EventCategory::Battle | EventCategory::Siege => m.participated,
            EventCategory::Forbidden => is_violator(category, m),
        })
        .map(|m| (m.member_id.clone(), category.primary_delta(m)))
        .collect()
}

/// Bucket a numeric series into contiguous equal-width bins.
///
/// The bins partition `[min(series), max(series)]` with no overlap and no
/// gaps; the sum of counts always equals the series length. An empty series
/// yields an empty vector, never an error.
#[must_use]
pub fn bin_series(values: &[i64], cfg: &BinningCfg) -> Vec<DistributionBin> {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return Vec::new();
    };

    let span = max - min + 1;
    let target = cfg.target_bins.max(1) as i64;
    let width = ((span + target - 1) / target).max(1);
    let bin_count = (span + width - 1) / width;

    let mut bins: Vec<DistributionBin> = (0..bin_count)
        .map(|i| {
            let lower = min + i * width;
            let upper = (lower + width - 1).min(max);
            DistributionBin {
                label: format!("{}-{}", format_number(lower), format_number(upper)),
                lower,
                upper,
                count: 0,
            }
        })
        .collect();

    for &value in values {
        let idx = ((value - min) / width) as usize;
        bins[idx].count += 1;
    }

    bins
}
