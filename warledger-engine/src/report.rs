//! Report assembly.
//!
//! `assemble_report` is the root of the pipeline: a pure function of the
//! event metadata and its member deltas. Equal inputs always produce a
//! byte-identical report, which is what lets three independent render
//! surfaces show the same numbers without coordinating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::boxplot::{BoxPlotStats, box_plot_stats};
use crate::category::{EventCategory, EventStatus};
use crate::distribution::{BinningCfg, DistributionBin, bin_series, metric_series};
use crate::groups::{GroupStandings, aggregate_groups};
use crate::member::MemberEventDelta;
use crate::ranking::{Rankings, build_rankings};
use crate::summary::{EventSummary, summarize};

/// Stable event identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Event identity and window bounds as supplied by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMeta {
    pub id: EventId,
    pub name: String,
    pub category: EventCategory,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub event_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_end: Option<DateTime<Utc>>,
}

/// Tunables for report assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportCfg {
    #[serde(default)]
    pub distribution: BinningCfg,
}

impl ReportCfg {
    /// Parse a config from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the config shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The single assembled output every render surface consumes.
///
/// Sorted fields (`group_stats`, the lists inside `rankings`, and
/// `distribution`) carry their ordering as a contract: consumers project
/// them verbatim and never re-sort or re-derive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    pub meta: EventMeta,
    pub summary: EventSummary,
    pub group_stats: GroupStandings,
    pub rankings: Rankings,
    pub distribution: Vec<DistributionBin>,
    /// Absent (never zero-filled) when the filtered series is empty.
    pub box_plot: Option<BoxPlotStats>,
    /// Raw per-member deltas for the sortable analytics table.
    pub members: Vec<MemberEventDelta>,
}

/// Assemble the canonical report for one event.
///
/// Pure and deterministic: no hidden state, no I/O, no iteration-order
/// dependence. Empty populations produce empty/absent structures, never an
/// error.
#[must_use]
pub fn assemble_report(
    meta: EventMeta,
    deltas: &[MemberEventDelta],
    cfg: &ReportCfg,
) -> EventReport {
    let category = meta.category;
    let series = metric_series(category, deltas);
    let values: Vec<i64> = series.iter().map(|(_, v)| *v).collect();

    EventReport {
        summary: summarize(category, deltas),
        group_stats: aggregate_groups(category, deltas),
        rankings: build_rankings(category, deltas),
        distribution: bin_series(&values, &cfg.distribution),
        box_plot: box_plot_stats(&series),
        members: deltas.to_vec(),
        meta,
    }
}

/// One-line event rollup for list surfaces (recent-events carousel, season
/// event cards).
///
/// Stats are only computed for completed events; for events still pending
/// or analyzing every stat field is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDigest {
    pub event_id: EventId,
    pub name: String,
    pub category: EventCategory,
    pub status: EventStatus,
    pub event_start: Option<DateTime<Utc>>,
    pub event_end: Option<DateTime<Utc>>,
    pub participation_rate: Option<f64>,
    /// Category primary total: merit for Battle, contribution+assist for
    /// Siege. `None` for Forbidden, which has no performance total.
    pub primary_total: Option<i64>,
    pub mvp_name: Option<String>,
    pub absent_count: Option<u32>,
    pub violator_count: Option<u32>,
    pub absent_names: Vec<String>,
    pub participant_names: Vec<String>,
}

/// Build the list digest for one event.
#[must_use]
pub fn event_digest(meta: &EventMeta, deltas: &[MemberEventDelta]) -> EventDigest {
    let mut digest = EventDigest {
        event_id: meta.id.clone(),
        name: meta.name.clone(),
        category: meta.category,
        status: meta.status,
        event_start: meta.event_start,
        event_end: meta.event_end,
        participation_rate: None,
        primary_total: None,
        mvp_name: None,
        absent_count: None,
        violator_count: None,
        absent_names: Vec::new(),
        participant_names: Vec::new(),
    };

    if !meta.status.is_completed() {
        return digest;
    }

    let summary = summarize(meta.category, deltas);
    digest.absent_count = Some(summary.absent_count);
    digest.absent_names = summary.absent_names.clone();
    digest.participant_names = summary.participant_names.clone();

    match meta.category {
        EventCategory::Battle => {
            digest.participation_rate = Some(summary.participation_rate);
            digest.primary_total = Some(summary.total_merit);
            digest.mvp_name = summary.mvp.map(|mvp| mvp.member_name);
        }
        EventCategory::Siege => {
            digest.participation_rate = Some(summary.participation_rate);
            digest.primary_total = Some(summary.total_contribution + summary.total_assist);
            digest.mvp_name = summary.contribution_mvp.map(|mvp| mvp.member_name);
        }
        EventCategory::Forbidden => {
            digest.violator_count = Some(summary.violator_count);
        }
    }

    digest
}
