//! Observability channel handed to every store operation.
//!
//! Operations never log on their own; they report what they changed to a [`Sink`].

use parking_lot::Mutex;
use std::fmt::Debug;
use tracing::{debug, info, warn};

/// Something an operation did to the store, or failed to find out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SlotWritten { location: String, index: u32, value: String },
    SlotDeleted { location: String, index: u32, value: String },
    SlotMoved { location: String, from: u32, to: u32, value: String },
    /// Apply found the value already listed and did not insert it again.
    DuplicateSkipped { location: String, index: u32, value: String },
    ListDeleted { location: String },
    FlagSet { location: String, name: String },
    FlagCleared { location: String, name: String },
    /// A state query failed and was reported as "not hardened".
    QueryFailed { item: String, error: String },
}

pub trait Sink: Debug + Send + Sync {
    fn emit(&self, event: Event);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, event: Event) {
        match event {
            Event::SlotWritten { location, index, value } => {
                info!(%location, index, %value, "Slot written");
            },
            Event::SlotDeleted { location, index, value } => {
                info!(%location, index, %value, "Slot deleted");
            },
            Event::SlotMoved { location, from, to, value } => {
                debug!(%location, from, to, %value, "Slot renumbered");
            },
            Event::DuplicateSkipped { location, index, value } => {
                debug!(%location, index, %value, "Value already listed, insert skipped");
            },
            Event::ListDeleted { location } => info!(%location, "Empty list location deleted"),
            Event::FlagSet { location, name } => info!(%location, %name, "Activation flag set"),
            Event::FlagCleared { location, name } => {
                info!(%location, %name, "Activation flag cleared");
            },
            Event::QueryFailed { item, error } => {
                warn!(%item, %error, "State query failed, reporting not hardened");
            },
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    /// Drains the recorded events.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl Sink for RecordingSink {
    fn emit(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl Sink for NullSink {
    fn emit(&self, _event: Event) {}
}
