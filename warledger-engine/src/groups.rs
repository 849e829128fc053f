//! Per-group rollups.
//!
//! Groups are sorted here, once, and nowhere else. `GroupStandings` exposes
//! read-only access so no consumer can re-derive a different order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::category::EventCategory;
use crate::classify::is_violator;
use crate::member::MemberEventDelta;
use crate::numbers::{guarded_avg, guarded_rate};

/// Aggregated statistics for one group in one event.
///
/// `member_count` counts eligible members only: new members are excluded
/// from every denominator. Category-specific fields outside the event's
/// category stay at their zero defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group_name: String,
    pub member_count: u32,
    pub participated_count: u32,
    pub absent_count: u32,
    /// Percentage in 0-100, one decimal, 0.0 for empty groups.
    pub participation_rate: f64,

    // Battle
    #[serde(default)]
    pub total_merit: i64,
    #[serde(default)]
    pub avg_merit: f64,
    #[serde(default)]
    pub merit_min: i64,
    #[serde(default)]
    pub merit_max: i64,

    // Siege; contribution and assist stay separate so renderers can combine
    // them without the engine pre-summing.
    #[serde(default)]
    pub total_contribution: i64,
    #[serde(default)]
    pub avg_contribution: f64,
    #[serde(default)]
    pub total_assist: i64,
    #[serde(default)]
    pub avg_assist: f64,
    #[serde(default)]
    pub combined_min: i64,
    #[serde(default)]
    pub combined_max: i64,

    // Forbidden
    #[serde(default)]
    pub violator_count: u32,
}

impl GroupStats {
    fn empty(group_name: &str) -> Self {
        Self {
            group_name: group_name.to_string(),
            member_count: 0,
            participated_count: 0,
            absent_count: 0,
            participation_rate: 0.0,
            total_merit: 0,
            avg_merit: 0.0,
            merit_min: 0,
            merit_max: 0,
            total_contribution: 0,
            avg_contribution: 0.0,
            total_assist: 0,
            avg_assist: 0.0,
            combined_min: 0,
            combined_max: 0,
            violator_count: 0,
        }
    }
}

/// Group stats in their canonical report order.
///
/// Ordering guarantee: Battle descends by total merit, Siege by combined
/// contribution+assist total, Forbidden by violator count; ties break by
/// group name ascending. Consumers project this order verbatim — there is
/// deliberately no mutable access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupStandings(Vec<GroupStats>);

impl GroupStandings {
    #[must_use]
    pub fn as_slice(&self) -> &[GroupStats] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GroupStats> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a GroupStandings {
    type Item = &'a GroupStats;
    type IntoIter = std::slice::Iter<'a, GroupStats>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Roll member deltas up into sorted per-group statistics.
///
/// Members without a group assignment are skipped here; they still count in
/// the alliance-wide [`crate::summary::EventSummary`].
#[must_use]
pub fn aggregate_groups(category: EventCategory, deltas: &[MemberEventDelta]) -> GroupStandings {
    // BTreeMap keeps grouping iteration deterministic regardless of input order.
    let mut by_group: BTreeMap<&str, Vec<&MemberEventDelta>> = BTreeMap::new();
    for delta in deltas {
        if let Some(group) = delta.group_name.as_deref() {
            by_group.entry(group).or_default().push(delta);
        }
    }

    let mut stats: Vec<GroupStats> = by_group
        .iter()
        .map(|(name, members)| group_stats(category, name, members))
        .collect();

    stats.sort_by(|a, b| {
        sort_key(category, b)
            .cmp(&sort_key(category, a))
            .then_with(|| a.group_name.cmp(&b.group_name))
    });

    GroupStandings(stats)
}

const fn sort_key(category: EventCategory, stats: &GroupStats) -> i64 {
    match category {
        EventCategory::Battle => stats.total_merit,
        EventCategory::Siege => stats.total_contribution + stats.total_assist,
        EventCategory::Forbidden => stats.violator_count as i64,
    }
}

fn group_stats(
    category: EventCategory,
    group_name: &str,
    members: &[&MemberEventDelta],
) -> GroupStats {
    let eligible: Vec<&MemberEventDelta> =
        members.iter().copied().filter(|m| m.is_eligible()).collect();

    let member_count = eligible.len() as u32;
    let participated_count = eligible.iter().filter(|m| m.participated).count() as u32;
    let absent_count = eligible.iter().filter(|m| m.is_absent).count() as u32;

    let mut stats = GroupStats {
        member_count,
        participated_count,
        absent_count,
        participation_rate: guarded_rate(participated_count, member_count),
        ..GroupStats::empty(group_name)
    };

    let participants: Vec<&MemberEventDelta> =
        eligible.iter().copied().filter(|m| m.participated).collect();

    match category {
        EventCategory::Battle => {
            let merits: Vec<i64> = participants.iter().map(|m| m.merit_diff).collect();
            if !merits.is_empty() {
                stats.total_merit = merits.iter().sum();
                stats.avg_merit = guarded_avg(stats.total_merit, merits.len() as u32);
                stats.merit_min = merits.iter().copied().min().unwrap_or(0);
                stats.merit_max = merits.iter().copied().max().unwrap_or(0);
            }
        }
        EventCategory::Siege => {
            if !participants.is_empty() {
                let combined: Vec<i64> = participants
                    .iter()
                    .map(|m| m.contribution_diff + m.assist_diff)
                    .collect();
                stats.total_contribution = participants.iter().map(|m| m.contribution_diff).sum();
                stats.total_assist = participants.iter().map(|m| m.assist_diff).sum();
                let count = participants.len() as u32;
                stats.avg_contribution = guarded_avg(stats.total_contribution, count);
                stats.avg_assist = guarded_avg(stats.total_assist, count);
                stats.combined_min = combined.iter().copied().min().unwrap_or(0);
                stats.combined_max = combined.iter().copied().max().unwrap_or(0);
            }
        }
        EventCategory::Forbidden => {
            stats.violator_count = eligible
                .iter()
                .filter(|m| is_violator(category, m))
                .count() as u32;
        }
    }

    stats
}
