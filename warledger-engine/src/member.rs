//! Member identity and the per-event delta ledger entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable member identifier carried through snapshots, deltas, and reports.
///
/// Ordering on the id is the deterministic tie-break for every ranking in
/// the engine, so two runs over the same input can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    /// Construct an id from a string slice, trimming whitespace.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable record of one member's metric changes across one event window.
///
/// Computed once by the delta source (or [`crate::snapshot::compute_event_deltas`])
/// and never mutated afterwards; every report is a pure function of a slice
/// of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEventDelta {
    pub member_id: MemberId,
    pub member_name: String,
    /// Group assignment; members without one are excluded from group rollups
    /// but still count toward the alliance-wide summary.
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub merit_diff: i64,
    #[serde(default)]
    pub contribution_diff: i64,
    #[serde(default)]
    pub assist_diff: i64,
    #[serde(default)]
    pub donation_diff: i64,
    /// Signed: a drop in power during a monitored window is meaningful data.
    #[serde(default)]
    pub power_diff: i64,
    #[serde(default)]
    pub participated: bool,
    #[serde(default)]
    pub is_new_member: bool,
    #[serde(default)]
    pub is_absent: bool,
}

impl MemberEventDelta {
    /// Create a zeroed delta record for the given member.
    #[must_use]
    pub fn new(member_id: &str, member_name: &str) -> Self {
        Self {
            member_id: MemberId::new(member_id),
            member_name: member_name.to_string(),
            group_name: None,
            merit_diff: 0,
            contribution_diff: 0,
            assist_diff: 0,
            donation_diff: 0,
            power_diff: 0,
            participated: false,
            is_new_member: false,
            is_absent: false,
        }
    }

    /// Members that existed before the event; only these count toward
    /// participation-rate denominators.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        !self.is_new_member
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_id_trims_and_orders() {
        let a = MemberId::new("  alpha ");
        assert_eq!(a.as_str(), "alpha");
        assert!(a < MemberId::new("beta"));
    }

    #[test]
    fn delta_deserializes_with_defaults() {
        let delta: MemberEventDelta =
            serde_json::from_str(r#"{"member_id":"m1","member_name":"Scout"}"#).unwrap();
        assert_eq!(delta.member_id, MemberId::new("m1"));
        assert_eq!(delta.merit_diff, 0);
        assert!(delta.group_name.is_none());
        assert!(!delta.participated);
        assert!(delta.is_eligible());
    }
}
