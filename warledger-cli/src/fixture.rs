//! Event fixtures: JSON files holding one or more events with either
//! pre-computed deltas or raw before/after snapshots.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use warledger_engine::snapshot::MemberSnapshot;
use warledger_engine::{
    DeltaSource, EventId, EventMeta, MemberEventDelta, compute_event_deltas,
};

/// Errors raised while loading or resolving event fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fixture contains no events")]
    Empty,
    #[error("event '{0}' not found in fixture")]
    UnknownEvent(EventId),
}

/// One event as stored on disk.
///
/// Either `deltas` is populated directly, or `before`/`after` snapshot rows
/// are provided and the deltas are computed on load.
#[derive(Debug, Clone, Deserialize)]
struct EventFixture {
    meta: EventMeta,
    #[serde(default)]
    deltas: Vec<MemberEventDelta>,
    #[serde(default)]
    before: Vec<MemberSnapshot>,
    #[serde(default)]
    after: Vec<MemberSnapshot>,
}

impl EventFixture {
    fn into_event(self) -> (EventMeta, Vec<MemberEventDelta>) {
        let deltas = if self.deltas.is_empty() && !self.after.is_empty() {
            compute_event_deltas(self.meta.category, &self.before, &self.after)
        } else {
            self.deltas
        };
        (self.meta, deltas)
    }
}

/// A fixture file is either a single event object or an array of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    One(EventFixture),
    Many(Vec<EventFixture>),
}

/// In-memory event store backing the CLI's [`DeltaSource`].
pub struct FixtureStore {
    order: Vec<EventId>,
    events: HashMap<EventId, (EventMeta, Vec<MemberEventDelta>)>,
}

impl FixtureStore {
    /// Load a fixture file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds no events.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let raw = std::fs::read_to_string(path)?;
        let parsed: FixtureFile = serde_json::from_str(&raw)?;
        let fixtures = match parsed {
            FixtureFile::One(fixture) => vec![fixture],
            FixtureFile::Many(fixtures) => fixtures,
        };
        if fixtures.is_empty() {
            return Err(FixtureError::Empty);
        }

        let mut order = Vec::with_capacity(fixtures.len());
        let mut events = HashMap::with_capacity(fixtures.len());
        for fixture in fixtures {
            let (meta, deltas) = fixture.into_event();
            order.push(meta.id.clone());
            events.insert(meta.id.clone(), (meta, deltas));
        }
        Ok(Self { order, events })
    }

    /// Ids in fixture-file order.
    #[must_use]
    pub fn event_ids(&self) -> &[EventId] {
        &self.order
    }

    /// The first event in the fixture, for when the caller names none.
    #[must_use]
    pub fn first_event_id(&self) -> &EventId {
        &self.order[0]
    }
}

impl DeltaSource for FixtureStore {
    type Error = FixtureError;

    fn load_event(
        &self,
        event_id: &EventId,
    ) -> Result<(EventMeta, Vec<MemberEventDelta>), Self::Error> {
        self.events
            .get(event_id)
            .cloned()
            .ok_or_else(|| FixtureError::UnknownEvent(event_id.clone()))
    }
}
