//! Alliance-wide event summary.

use serde::{Deserialize, Serialize};

use crate::category::EventCategory;
use crate::classify::is_violator;
use crate::member::{MemberEventDelta, MemberId};
use crate::numbers::{guarded_avg, guarded_complement_rate, guarded_rate};

/// Pointer to a standout member plus the score that earned the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MvpRef {
    pub member_id: MemberId,
    pub member_name: String,
    pub score: i64,
}

/// Alliance-wide rollup for one event.
///
/// MVP pointers and the compliance rate are optional on purpose: absent
/// means "no qualifying data", and renderers must show an explicit empty
/// state rather than a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub total_members: u32,
    pub participated_count: u32,
    pub absent_count: u32,
    pub new_member_count: u32,
    /// Percentage in 0-100, one decimal; denominator excludes new members.
    pub participation_rate: f64,

    pub total_merit: i64,
    pub total_contribution: i64,
    pub total_assist: i64,
    /// Averages are over participants, not the full roster.
    pub avg_merit: f64,
    pub avg_contribution: f64,
    pub avg_assist: f64,

    /// Battle MVP: highest merit gain, if anyone gained merit.
    pub mvp: Option<MvpRef>,
    /// Siege dual MVPs, ranked independently.
    pub contribution_mvp: Option<MvpRef>,
    pub assist_mvp: Option<MvpRef>,

    pub violator_count: u32,
    /// Forbidden only; percentage over the full roster, guarded to 100.0
    /// when the roster is empty. `None` for Battle/Siege.
    pub compliance_rate: Option<f64>,

    pub participant_names: Vec<String>,
    pub absent_names: Vec<String>,
}

/// Compute the alliance-wide summary for one event.
#[must_use]
pub fn summarize(category: EventCategory, deltas: &[MemberEventDelta]) -> EventSummary {
    let total_members = deltas.len() as u32;
    let participated_count = deltas.iter().filter(|m| m.participated).count() as u32;
    let new_member_count = deltas.iter().filter(|m| m.is_new_member).count() as u32;
    let absent_count = deltas.iter().filter(|m| m.is_absent).count() as u32;

    let eligible_members = total_members - new_member_count;
    let participation_rate = guarded_rate(participated_count, eligible_members);

    let total_merit: i64 = deltas.iter().map(|m| m.merit_diff).sum();
    let total_contribution: i64 = deltas.iter().map(|m| m.contribution_diff).sum();
    let total_assist: i64 = deltas.iter().map(|m| m.assist_diff).sum();

    let mut summary = EventSummary {
        total_members,
        participated_count,
        absent_count,
        new_member_count,
        participation_rate,
        total_merit,
        total_contribution,
        total_assist,
        avg_merit: guarded_avg(total_merit, participated_count),
        avg_contribution: guarded_avg(total_contribution, participated_count),
        avg_assist: guarded_avg(total_assist, participated_count),
        mvp: None,
        contribution_mvp: None,
        assist_mvp: None,
        violator_count: 0,
        compliance_rate: None,
        participant_names: deltas
            .iter()
            .filter(|m| m.participated)
            .map(|m| m.member_name.clone())
            .collect(),
        absent_names: deltas
            .iter()
            .filter(|m| m.is_absent)
            .map(|m| m.member_name.clone())
            .collect(),
    };

    match category {
        EventCategory::Battle => {
            summary.mvp = best_by(deltas, |m| m.merit_diff);
        }
        EventCategory::Siege => {
            summary.contribution_mvp = best_by(deltas, |m| m.contribution_diff);
            summary.assist_mvp = best_by(deltas, |m| m.assist_diff);
        }
        EventCategory::Forbidden => {
            summary.violator_count =
                deltas.iter().filter(|m| is_violator(category, m)).count() as u32;
            summary.compliance_rate =
                Some(guarded_complement_rate(summary.violator_count, total_members));
        }
    }

    summary
}

/// Best member by `score`, requiring a positive score to qualify.
///
/// Ties resolve to the lowest member id so equal inputs can never produce
/// two different MVPs.
fn best_by<F>(deltas: &[MemberEventDelta], score: F) -> Option<MvpRef>
where
    F: Fn(&MemberEventDelta) -> i64,
{
    deltas
        .iter()
        .filter(|m| score(m) > 0)
        .min_by(|a, b| {
            score(b)
                .cmp(&score(a))
                .then_with(|| a.member_id.cmp(&b.member_id))
        })
        .map(|m| MvpRef {
            member_id: m.member_id.clone(),
            member_name: m.member_name.clone(),
            score: score(m),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberId;

    fn battler(id: &str, merit: i64) -> MemberEventDelta {
        MemberEventDelta {
            merit_diff: merit,
            participated: merit > 0,
            is_absent: merit == 0,
            ..MemberEventDelta::new(id, id)
        }
    }

    #[test]
    fn battle_summary_matches_known_scenario() {
        // 10 members, 8 with merit gain, 2 flat.
        let mut deltas: Vec<MemberEventDelta> =
            (0..8).map(|i| battler(&format!("m{i}"), 1000 + i)).collect();
        deltas.push(battler("idle1", 0));
        deltas.push(battler("idle2", 0));

        let summary = summarize(EventCategory::Battle, &deltas);
        assert_eq!(summary.total_members, 10);
        assert_eq!(summary.participated_count, 8);
        assert_eq!(summary.absent_count, 2);
        assert!((summary.participation_rate - 80.0).abs() < f64::EPSILON);
        assert_eq!(summary.mvp.as_ref().unwrap().score, 1007);
        assert!(summary.compliance_rate.is_none());
        assert_eq!(summary.participant_names.len(), 8);
        assert_eq!(summary.absent_names, vec!["idle1", "idle2"]);
    }

    #[test]
    fn new_members_shrink_the_denominator() {
        let mut rookie = battler("rookie", 0);
        rookie.is_new_member = true;
        rookie.is_absent = false;
        let deltas = vec![battler("a", 500), battler("b", 0), rookie];

        let summary = summarize(EventCategory::Battle, &deltas);
        assert_eq!(summary.total_members, 3);
        assert_eq!(summary.new_member_count, 1);
        assert!((summary.participation_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_event_produces_zeroed_summary() {
        let summary = summarize(EventCategory::Battle, &[]);
        assert_eq!(summary.total_members, 0);
        assert!((summary.participation_rate).abs() < f64::EPSILON);
        assert!(summary.mvp.is_none());
        assert!(summary.participant_names.is_empty());
    }

    #[test]
    fn siege_dual_mvps_are_independent() {
        let mut a = MemberEventDelta::new("a", "a");
        a.contribution_diff = 500;
        a.assist_diff = 1;
        a.participated = true;
        let mut b = MemberEventDelta::new("b", "b");
        b.contribution_diff = 100;
        b.assist_diff = 90;
        b.participated = true;

        let summary = summarize(EventCategory::Siege, &[a, b]);
        assert_eq!(
            summary.contribution_mvp.as_ref().unwrap().member_id,
            MemberId::new("a")
        );
        assert_eq!(
            summary.assist_mvp.as_ref().unwrap().member_id,
            MemberId::new("b")
        );
        assert!(summary.mvp.is_none());
    }

    #[test]
    fn mvp_requires_a_positive_score() {
        let deltas = vec![battler("a", 0), battler("b", 0)];
        let summary = summarize(EventCategory::Battle, &deltas);
        assert!(summary.mvp.is_none());
    }

    #[test]
    fn mvp_tie_resolves_to_lowest_member_id() {
        let deltas = vec![battler("zed", 700), battler("amy", 700)];
        let summary = summarize(EventCategory::Battle, &deltas);
        assert_eq!(summary.mvp.unwrap().member_id, MemberId::new("amy"));
    }

    #[test]
    fn forbidden_compliance_counts_the_full_roster() {
        let mut sneak = MemberEventDelta::new("s", "s");
        sneak.power_diff = 800;
        let mut rookie = MemberEventDelta::new("r", "r");
        rookie.is_new_member = true;
        rookie.power_diff = 0;
        let clean = MemberEventDelta::new("c", "c");

        let summary = summarize(EventCategory::Forbidden, &[sneak, rookie, clean]);
        assert_eq!(summary.violator_count, 1);
        assert!((summary.compliance_rate.unwrap() - 66.7).abs() < 1e-9);
    }

    #[test]
    fn zero_violators_means_exactly_full_compliance() {
        let deltas = vec![MemberEventDelta::new("a", "a"), MemberEventDelta::new("b", "b")];
        let summary = summarize(EventCategory::Forbidden, &deltas);
        assert_eq!(summary.violator_count, 0);
        assert!((summary.compliance_rate.unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_forbidden_roster_guards_to_full_compliance() {
        let summary = summarize(EventCategory::Forbidden, &[]);
        assert!((summary.compliance_rate.unwrap() - 100.0).abs() < f64::EPSILON);
    }
}
