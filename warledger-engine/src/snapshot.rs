//! Snapshot diffing: turn a before/after pair of member snapshots into the
//! per-member delta ledger the report engine consumes.
//!
//! Cumulative counters (merit, contribution, assist, donation) only ever
//! grow in the source game, so their diffs clamp at zero to absorb CSV
//! corrections; power is a gauge and keeps its sign.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::category::EventCategory;
use crate::classify::participation_flags;
use crate::member::{MemberEventDelta, MemberId};

/// One member's cumulative totals at a single snapshot instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSnapshot {
    pub member_id: MemberId,
    pub member_name: String,
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub total_merit: i64,
    #[serde(default)]
    pub total_contribution: i64,
    #[serde(default)]
    pub total_assist: i64,
    #[serde(default)]
    pub total_donation: i64,
    #[serde(default)]
    pub power_value: i64,
}

/// Diff an event's before/after snapshots into delta records.
///
/// Members present in both snapshots get clamped diffs and classification
/// flags. Members only in the after snapshot are new (zeroed diffs, excluded
/// from rate denominators). Members only in the before snapshot left during
/// the event and are recorded absent with zeroed diffs.
///
/// Output order is deterministic: after-snapshot members in after order,
/// then departed members in before order.
#[must_use]
pub fn compute_event_deltas(
    category: EventCategory,
    before: &[MemberSnapshot],
    after: &[MemberSnapshot],
) -> Vec<MemberEventDelta> {
    let before_map: HashMap<&MemberId, &MemberSnapshot> =
        before.iter().map(|snap| (&snap.member_id, snap)).collect();
    let after_ids: HashSet<&MemberId> = after.iter().map(|snap| &snap.member_id).collect();

    let mut deltas = Vec::with_capacity(before.len().max(after.len()));

    for snap in after {
        if let Some(prev) = before_map.get(&snap.member_id) {
            deltas.push(diff_returning_member(category, prev, snap));
        } else {
            deltas.push(new_member_delta(snap));
        }
    }

    for snap in before {
        if !after_ids.contains(&snap.member_id) {
            deltas.push(departed_member_delta(snap));
        }
    }

    deltas
}

fn diff_returning_member(
    category: EventCategory,
    before: &MemberSnapshot,
    after: &MemberSnapshot,
) -> MemberEventDelta {
    let merit_diff = (after.total_merit - before.total_merit).max(0);
    let contribution_diff = (after.total_contribution - before.total_contribution).max(0);
    let assist_diff = (after.total_assist - before.total_assist).max(0);
    let donation_diff = (after.total_donation - before.total_donation).max(0);
    let power_diff = after.power_value - before.power_value;

    let flags = participation_flags(category, merit_diff, contribution_diff, assist_diff);

    MemberEventDelta {
        member_id: after.member_id.clone(),
        member_name: after.member_name.clone(),
        group_name: after.group_name.clone(),
        merit_diff,
        contribution_diff,
        assist_diff,
        donation_diff,
        power_diff,
        participated: flags.participated,
        is_new_member: false,
        is_absent: flags.is_absent,
    }
}

fn new_member_delta(snap: &MemberSnapshot) -> MemberEventDelta {
    MemberEventDelta {
        group_name: snap.group_name.clone(),
        is_new_member: true,
        ..MemberEventDelta::new(snap.member_id.as_str(), &snap.member_name)
    }
}

fn departed_member_delta(snap: &MemberSnapshot) -> MemberEventDelta {
    MemberEventDelta {
        group_name: snap.group_name.clone(),
        is_absent: true,
        ..MemberEventDelta::new(snap.member_id.as_str(), &snap.member_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: &str, merit: i64, power: i64) -> MemberSnapshot {
        MemberSnapshot {
            member_id: MemberId::new(id),
            member_name: id.to_string(),
            group_name: Some("vanguard".to_string()),
            total_merit: merit,
            total_contribution: 0,
            total_assist: 0,
            total_donation: 0,
            power_value: power,
        }
    }

    #[test]
    fn returning_member_gets_clamped_diffs_and_flags() {
        let before = vec![snap("a", 1000, 50_000)];
        let after = vec![snap("a", 6000, 49_000)];
        let deltas = compute_event_deltas(EventCategory::Battle, &before, &after);

        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].merit_diff, 5000);
        assert_eq!(deltas[0].power_diff, -1000);
        assert!(deltas[0].participated);
        assert!(!deltas[0].is_absent);
    }

    #[test]
    fn shrinking_counters_clamp_to_zero() {
        let before = vec![snap("a", 9000, 0)];
        let after = vec![snap("a", 8000, 0)];
        let deltas = compute_event_deltas(EventCategory::Battle, &before, &after);

        assert_eq!(deltas[0].merit_diff, 0);
        assert!(!deltas[0].participated);
        assert!(deltas[0].is_absent);
    }

    #[test]
    fn new_member_is_flagged_and_zeroed() {
        let before = vec![snap("a", 100, 0)];
        let after = vec![snap("a", 100, 0), snap("b", 7777, 9)];
        let deltas = compute_event_deltas(EventCategory::Battle, &before, &after);

        let new = deltas.iter().find(|d| d.member_id.as_str() == "b").unwrap();
        assert!(new.is_new_member);
        assert!(!new.participated);
        assert!(!new.is_absent);
        assert_eq!(new.merit_diff, 0);
        assert_eq!(new.power_diff, 0);
    }

    #[test]
    fn departed_member_is_recorded_absent() {
        let before = vec![snap("a", 100, 0), snap("b", 200, 0)];
        let after = vec![snap("a", 150, 0)];
        let deltas = compute_event_deltas(EventCategory::Battle, &before, &after);

        assert_eq!(deltas.len(), 2);
        let gone = &deltas[1];
        assert_eq!(gone.member_id.as_str(), "b");
        assert!(gone.is_absent);
        assert!(!gone.is_new_member);
        assert_eq!(gone.merit_diff, 0);
    }

    #[test]
    fn output_order_is_after_then_departed() {
        let before = vec![snap("z", 1, 0), snap("a", 1, 0)];
        let after = vec![snap("m", 2, 0)];
        let deltas = compute_event_deltas(EventCategory::Battle, &before, &after);
        let order: Vec<&str> = deltas.iter().map(|d| d.member_id.as_str()).collect();
        assert_eq!(order, vec!["m", "z", "a"]);
    }

    #[test]
    fn forbidden_diff_carries_power_but_no_attendance() {
        let before = vec![snap("a", 100, 10_000)];
        let after = vec![snap("a", 100, 12_500)];
        let deltas = compute_event_deltas(EventCategory::Forbidden, &before, &after);

        assert_eq!(deltas[0].power_diff, 2500);
        assert!(!deltas[0].participated);
        assert!(!deltas[0].is_absent);
    }
}
