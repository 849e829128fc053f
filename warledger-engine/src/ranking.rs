//! Ranked member lists.
//!
//! Ranks are positional and dense: sorted order gets 1, 2, 3, ... even when
//! scores tie. Ties in score order break by member id ascending, never by
//! arrival order. The engine always builds the full list; truncation to a
//! top-N is a rendering concern, served by [`Rankings::truncated`].

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::category::EventCategory;
use crate::classify::is_violator;
use crate::member::{MemberEventDelta, MemberId};

/// One row in a performance ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopMemberItem {
    /// 1-based dense rank.
    pub rank: u32,
    pub member_id: MemberId,
    pub member_name: String,
    pub group_name: Option<String>,
    /// The metric this list is ordered by.
    pub score: i64,
    pub merit_diff: Option<i64>,
    pub contribution_diff: Option<i64>,
    pub assist_diff: Option<i64>,
}

/// One row in a violation list; rank denotes severity order, not merit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolatorItem {
    pub rank: u32,
    pub member_id: MemberId,
    pub member_name: String,
    pub group_name: Option<String>,
    pub power_diff: i64,
}

/// Category-shaped rankings for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rankings {
    Battle {
        top_members: Vec<TopMemberItem>,
    },
    Siege {
        contributors: Vec<TopMemberItem>,
        assisters: Vec<TopMemberItem>,
    },
    Forbidden {
        violators: Vec<ViolatorItem>,
    },
}

impl Rankings {
    #[must_use]
    pub const fn category(&self) -> EventCategory {
        match self {
            Self::Battle { .. } => EventCategory::Battle,
            Self::Siege { .. } => EventCategory::Siege,
            Self::Forbidden { .. } => EventCategory::Forbidden,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Battle { top_members } => top_members.is_empty(),
            Self::Siege {
                contributors,
                assisters,
            } => contributors.is_empty() && assisters.is_empty(),
            Self::Forbidden { violators } => violators.is_empty(),
        }
    }

    /// Rendering-layer projection: the same rankings cut to the first `n`
    /// rows per list. Ranks are preserved, never recomputed.
    #[must_use]
    pub fn truncated(&self, n: usize) -> Self {
        match self {
            Self::Battle { top_members } => Self::Battle {
                top_members: top_members.iter().take(n).cloned().collect(),
            },
            Self::Siege {
                contributors,
                assisters,
            } => Self::Siege {
                contributors: contributors.iter().take(n).cloned().collect(),
                assisters: assisters.iter().take(n).cloned().collect(),
            },
            Self::Forbidden { violators } => Self::Forbidden {
                violators: violators.iter().take(n).cloned().collect(),
            },
        }
    }
}

/// Build the full rankings for one event.
#[must_use]
pub fn build_rankings(category: EventCategory, deltas: &[MemberEventDelta]) -> Rankings {
    match category {
        EventCategory::Battle => Rankings::Battle {
            top_members: ranked_members(
                deltas.iter().filter(|m| m.participated),
                |m| m.merit_diff,
                |m, score| TopMemberItem {
                    rank: 0,
                    member_id: m.member_id.clone(),
                    member_name: m.member_name.clone(),
                    group_name: m.group_name.clone(),
                    score,
                    merit_diff: Some(m.merit_diff),
                    contribution_diff: None,
                    assist_diff: None,
                },
            ),
        },
        EventCategory::Siege => Rankings::Siege {
            contributors: ranked_members(
                deltas.iter().filter(|m| m.contribution_diff > 0),
                |m| m.contribution_diff,
                siege_item,
            ),
            assisters: ranked_members(
                deltas.iter().filter(|m| m.assist_diff > 0),
                |m| m.assist_diff,
                siege_item,
            ),
        },
        EventCategory::Forbidden => {
            let mut violators: Vec<&MemberEventDelta> = deltas
                .iter()
                .filter(|m| is_violator(category, m))
                .collect();
            violators.sort_by(|a, b| score_order(a.power_diff, b.power_diff, a, b));
            Rankings::Forbidden {
                violators: violators
                    .into_iter()
                    .enumerate()
                    .map(|(i, m)| ViolatorItem {
                        rank: i as u32 + 1,
                        member_id: m.member_id.clone(),
                        member_name: m.member_name.clone(),
                        group_name: m.group_name.clone(),
                        power_diff: m.power_diff,
                    })
                    .collect(),
            }
        }
    }
}

fn siege_item(m: &MemberEventDelta, score: i64) -> TopMemberItem {
    TopMemberItem {
        rank: 0,
        member_id: m.member_id.clone(),
        member_name: m.member_name.clone(),
        group_name: m.group_name.clone(),
        score,
        merit_diff: None,
        contribution_diff: Some(m.contribution_diff),
        assist_diff: Some(m.assist_diff),
    }
}

fn ranked_members<'a, I, S, B>(candidates: I, score: S, build: B) -> Vec<TopMemberItem>
where
    I: Iterator<Item = &'a MemberEventDelta>,
    S: Fn(&MemberEventDelta) -> i64,
    B: Fn(&MemberEventDelta, i64) -> TopMemberItem,
{
    let mut members: Vec<&MemberEventDelta> = candidates.collect();
    members.sort_by(|a, b| score_order(score(a), score(b), a, b));
    members
        .into_iter()
        .enumerate()
        .map(|(i, m)| {
            let mut item = build(m, score(m));
            item.rank = i as u32 + 1;
            item
        })
        .collect()
}

fn score_order(
    score_a: i64,
    score_b: i64,
    a: &MemberEventDelta,
    b: &MemberEventDelta,
) -> Ordering {
    score_b
        .cmp(&score_a)
        .then_with(|| a.member_id.cmp(&b.member_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(id: &str, contribution: i64, assist: i64) -> MemberEventDelta {
        let mut delta = MemberEventDelta::new(id, id);
        delta.contribution_diff = contribution;
        delta.assist_diff = assist;
        delta.participated = contribution > 0 || assist > 0;
        delta
    }

    fn battler(id: &str, merit: i64) -> MemberEventDelta {
        let mut delta = MemberEventDelta::new(id, id);
        delta.merit_diff = merit;
        delta.participated = merit > 0;
        delta
    }

    #[test]
    fn battle_ranks_are_dense_and_ordered() {
        let deltas = vec![battler("c", 100), battler("a", 900), battler("b", 500)];
        let Rankings::Battle { top_members } = build_rankings(EventCategory::Battle, &deltas)
        else {
            panic!("expected battle rankings");
        };
        let ranks: Vec<(u32, i64)> = top_members.iter().map(|m| (m.rank, m.score)).collect();
        assert_eq!(ranks, vec![(1, 900), (2, 500), (3, 100)]);
    }

    #[test]
    fn tied_scores_stay_positional_not_collapsed() {
        // [500, 300, 300, 100] must rank 1,2,3,4 - not competition-style 1,2,2,4.
        let deltas = vec![
            contributor("d", 100, 0),
            contributor("b", 300, 0),
            contributor("a", 500, 0),
            contributor("c", 300, 0),
        ];
        let Rankings::Siege { contributors, .. } =
            build_rankings(EventCategory::Siege, &deltas)
        else {
            panic!("expected siege rankings");
        };
        let rows: Vec<(u32, &str, i64)> = contributors
            .iter()
            .map(|m| (m.rank, m.member_id.as_str(), m.score))
            .collect();
        assert_eq!(
            rows,
            vec![(1, "a", 500), (2, "b", 300), (3, "c", 300), (4, "d", 100)]
        );
    }

    #[test]
    fn siege_lists_rank_independently() {
        let deltas = vec![contributor("a", 500, 5), contributor("b", 100, 900)];
        let Rankings::Siege {
            contributors,
            assisters,
        } = build_rankings(EventCategory::Siege, &deltas)
        else {
            panic!("expected siege rankings");
        };
        assert_eq!(contributors[0].member_id.as_str(), "a");
        assert_eq!(assisters[0].member_id.as_str(), "b");
        // A member may appear in both lists.
        assert_eq!(contributors.len(), 2);
        assert_eq!(assisters.len(), 2);
    }

    #[test]
    fn zero_scores_never_enter_siege_lists() {
        let deltas = vec![contributor("a", 500, 0), contributor("b", 0, 40)];
        let Rankings::Siege {
            contributors,
            assisters,
        } = build_rankings(EventCategory::Siege, &deltas)
        else {
            panic!("expected siege rankings");
        };
        assert_eq!(contributors.len(), 1);
        assert_eq!(assisters.len(), 1);
    }

    #[test]
    fn forbidden_orders_by_severity() {
        let mut a = MemberEventDelta::new("a", "a");
        a.power_diff = 3000;
        let mut b = MemberEventDelta::new("b", "b");
        b.power_diff = 5000;
        let clean = MemberEventDelta::new("c", "c");

        let Rankings::Forbidden { violators } =
            build_rankings(EventCategory::Forbidden, &[a, b, clean])
        else {
            panic!("expected forbidden rankings");
        };
        let rows: Vec<(u32, &str)> = violators
            .iter()
            .map(|v| (v.rank, v.member_id.as_str()))
            .collect();
        assert_eq!(rows, vec![(1, "b"), (2, "a")]);
    }

    #[test]
    fn truncation_preserves_ranks() {
        let deltas: Vec<MemberEventDelta> = (0..10i64)
            .map(|i| battler(&format!("m{i}"), 1000 - i))
            .collect();
        let rankings = build_rankings(EventCategory::Battle, &deltas);
        let Rankings::Battle { top_members } = rankings.truncated(5) else {
            panic!("expected battle rankings");
        };
        assert_eq!(top_members.len(), 5);
        assert_eq!(top_members[4].rank, 5);
    }
}
