//! Participation classification.
//!
//! The one place that decides what "showed up" means for each category.
//! Everything downstream (group rollups, summaries, rankings) reads the
//! flags this module produces instead of re-deriving them.

use crate::category::EventCategory;
use crate::member::MemberEventDelta;

/// Attendance flags for a member that existed in both snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Participation {
    pub participated: bool,
    pub is_absent: bool,
}

/// Classify a returning member from its raw metric deltas.
///
/// Battle counts merit gain; Siege counts contribution or assist gain;
/// Forbidden tracks violations instead, so both flags stay false there.
/// New members and departed members are flagged by the snapshot differ,
/// not here.
#[must_use]
pub const fn participation_flags(
    category: EventCategory,
    merit_diff: i64,
    contribution_diff: i64,
    assist_diff: i64,
) -> Participation {
    let participated = match category {
        EventCategory::Battle => merit_diff > 0,
        EventCategory::Siege => contribution_diff > 0 || assist_diff > 0,
        EventCategory::Forbidden => false,
    };
    let is_absent = !participated && category.tracks_participation();
    Participation {
        participated,
        is_absent,
    }
}

/// Whether a member violated a restricted-zone window.
///
/// Any measured power increase counts; there is no grace band.
#[must_use]
pub const fn is_violator(category: EventCategory, delta: &MemberEventDelta) -> bool {
    matches!(category, EventCategory::Forbidden) && delta.power_diff > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn battle_requires_merit_gain() {
        let flags = participation_flags(EventCategory::Battle, 1, 0, 0);
        assert!(flags.participated);
        assert!(!flags.is_absent);

        let flags = participation_flags(EventCategory::Battle, 0, 500, 500);
        assert!(!flags.participated);
        assert!(flags.is_absent);
    }

    #[test]
    fn siege_accepts_contribution_or_assist() {
        assert!(participation_flags(EventCategory::Siege, 0, 10, 0).participated);
        assert!(participation_flags(EventCategory::Siege, 0, 0, 3).participated);
        let flags = participation_flags(EventCategory::Siege, 9000, 0, 0);
        assert!(!flags.participated);
        assert!(flags.is_absent);
    }

    #[test]
    fn forbidden_never_marks_attendance() {
        let flags = participation_flags(EventCategory::Forbidden, 100, 100, 100);
        assert!(!flags.participated);
        assert!(!flags.is_absent);
    }

    #[test]
    fn violation_is_any_power_increase() {
        let mut delta = MemberEventDelta::new("m1", "Lurker");
        delta.power_diff = 1;
        assert!(is_violator(EventCategory::Forbidden, &delta));
        delta.power_diff = 0;
        assert!(!is_violator(EventCategory::Forbidden, &delta));
        delta.power_diff = -250;
        assert!(!is_violator(EventCategory::Forbidden, &delta));
        delta.power_diff = 1;
        assert!(!is_violator(EventCategory::Battle, &delta));
    }
}
