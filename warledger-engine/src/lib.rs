//! Warledger Report Engine
//!
//! Platform-agnostic analytics for alliance event reports. This crate turns
//! a set of per-member snapshot deltas for one event into a single canonical
//! [`EventReport`]; the chat digest, mobile tab, and desktop analytics page
//! are all pure projections of that one object, so every surface shows
//! identical numbers and orderings. No I/O, no UI, no platform-specific
//! dependencies live here.

pub mod boxplot;
pub mod category;
pub mod classify;
pub mod distribution;
pub mod format;
pub mod groups;
pub mod member;
pub mod numbers;
pub mod ranking;
pub mod report;
pub mod snapshot;
pub mod summary;

// Re-export commonly used types
pub use boxplot::{BoxPlotStats, box_plot_stats};
pub use category::{EventCategory, EventStatus, UnknownCategory, UnknownStatus};
pub use classify::{Participation, is_violator, participation_flags};
pub use distribution::{BinningCfg, DistributionBin, bin_series, metric_series};
pub use format::{format_duration, format_event_time, format_number, format_rate};
pub use groups::{GroupStandings, GroupStats, aggregate_groups};
pub use member::{MemberEventDelta, MemberId};
pub use ranking::{Rankings, TopMemberItem, ViolatorItem, build_rankings};
pub use report::{
    EventDigest, EventId, EventMeta, EventReport, ReportCfg, assemble_report, event_digest,
};
pub use snapshot::{MemberSnapshot, compute_event_deltas};
pub use summary::{EventSummary, MvpRef, summarize};

/// Trait for abstracting delta loading operations.
/// Platform-specific implementations (database, cache layer, fixtures)
/// should provide this.
pub trait DeltaSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load one event's metadata and member deltas.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be loaded.
    fn load_event(
        &self,
        event_id: &EventId,
    ) -> Result<(EventMeta, Vec<MemberEventDelta>), Self::Error>;
}

/// Main entry point tying a delta source to report assembly.
///
/// The engine holds no mutable state; it only pairs a source with a report
/// configuration so callers get identical reports for identical inputs.
pub struct ReportEngine<S>
where
    S: DeltaSource,
{
    source: S,
    cfg: ReportCfg,
}

impl<S> ReportEngine<S>
where
    S: DeltaSource,
{
    /// Create an engine with the default report configuration.
    pub fn new(source: S) -> Self {
        Self {
            source,
            cfg: ReportCfg::default(),
        }
    }

    /// Create an engine with an explicit report configuration.
    pub const fn with_cfg(source: S, cfg: ReportCfg) -> Self {
        Self { source, cfg }
    }

    /// Access the underlying delta source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Assemble the full report for one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the delta source cannot load the event.
    pub fn build_report(&self, event_id: &EventId) -> Result<EventReport, S::Error> {
        let (meta, deltas) = self.source.load_event(event_id)?;
        Ok(assemble_report(meta, &deltas, &self.cfg))
    }

    /// Build the one-line list digest for one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the delta source cannot load the event.
    pub fn build_digest(&self, event_id: &EventId) -> Result<EventDigest, S::Error> {
        let (meta, deltas) = self.source.load_event(event_id)?;
        Ok(event_digest(&meta, &deltas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Default)]
    struct FixtureSource;

    impl DeltaSource for FixtureSource {
        type Error = Infallible;

        fn load_event(
            &self,
            event_id: &EventId,
        ) -> Result<(EventMeta, Vec<MemberEventDelta>), Self::Error> {
            let meta = EventMeta {
                id: event_id.clone(),
                name: "Fixture Clash".to_string(),
                category: EventCategory::Battle,
                status: EventStatus::Completed,
                event_start: None,
                event_end: None,
            };
            let mut hero = MemberEventDelta::new("hero", "Hero");
            hero.group_name = Some("vanguard".to_string());
            hero.merit_diff = 12_000;
            hero.participated = true;
            let mut idle = MemberEventDelta::new("idle", "Idle");
            idle.group_name = Some("vanguard".to_string());
            idle.is_absent = true;
            Ok((meta, vec![hero, idle]))
        }
    }

    #[test]
    fn engine_builds_report_from_source() {
        let engine = ReportEngine::new(FixtureSource);
        let report = engine.build_report(&EventId::new("evt-9")).unwrap();
        assert_eq!(report.meta.id, EventId::new("evt-9"));
        assert_eq!(report.summary.participated_count, 1);
        assert!((report.summary.participation_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn engine_builds_digest_from_source() {
        let engine = ReportEngine::new(FixtureSource);
        let digest = engine.build_digest(&EventId::new("evt-9")).unwrap();
        assert_eq!(digest.mvp_name.as_deref(), Some("Hero"));
        assert_eq!(digest.absent_count, Some(1));
    }

    #[test]
    fn engine_respects_custom_binning() {
        let cfg = ReportCfg {
            distribution: BinningCfg { target_bins: 2 },
        };
        let engine = ReportEngine::with_cfg(FixtureSource, cfg);
        let report = engine.build_report(&EventId::new("evt-9")).unwrap();
        assert!(report.distribution.len() <= 2);
    }
}
