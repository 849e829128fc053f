//! Event categories and lifecycle status.
//!
//! The category is the single dispatch axis for every category-aware rule in
//! the engine: participation semantics, ranking shape, group ordering, and
//! which metric feeds the distribution chart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::member::MemberEventDelta;

/// Raised when an event category string does not name a known category.
///
/// An unknown category is a caller configuration bug, not a recoverable
/// runtime state: classification and ranking rules are undefined without it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event category '{0}' (expected battle, siege, or forbidden)")]
pub struct UnknownCategory(pub String);

/// Raised when an event status string does not name a known status.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown event status '{0}' (expected pending, analyzing, or completed)")]
pub struct UnknownStatus(pub String);

/// Closed set of event categories tracked by the alliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    /// Open-field battle, scored by merit gain.
    #[default]
    Battle,
    /// Siege, scored by contribution and assist gains independently.
    Siege,
    /// Restricted-zone monitoring window; tracks violations, not attendance.
    Forbidden,
}

impl EventCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Battle => "battle",
            Self::Siege => "siege",
            Self::Forbidden => "forbidden",
        }
    }

    /// Whether attendance is meaningful for this category.
    ///
    /// Forbidden-zone events monitor violations instead; participation and
    /// absence flags stay false for every member.
    #[must_use]
    pub const fn tracks_participation(self) -> bool {
        !matches!(self, Self::Forbidden)
    }

    /// Whether rankings for this category come as two independent lists.
    #[must_use]
    pub const fn uses_dual_ranking(self) -> bool {
        matches!(self, Self::Siege)
    }

    /// The delta that scores a member for this category.
    ///
    /// Battle scores merit, Siege scores contribution plus assist, and
    /// Forbidden "scores" the severity of the power change.
    #[must_use]
    pub const fn primary_delta(self, delta: &MemberEventDelta) -> i64 {
        match self {
            Self::Battle => delta.merit_diff,
            Self::Siege => delta.contribution_diff + delta.assist_diff,
            Self::Forbidden => delta.power_diff,
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "battle" => Ok(Self::Battle),
            "siege" => Ok(Self::Siege),
            "forbidden" => Ok(Self::Forbidden),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Lifecycle status of an event.
///
/// Only `Completed` events carry computed stats in list digests; the other
/// states surface as "still processing" placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Pending,
    Analyzing,
    Completed,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "analyzing" => Ok(Self::Analyzing),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
