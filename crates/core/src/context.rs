use crate::sink::{Event, Sink};
use harden_hive::Hive;

/// The store and the sink an operation runs against.
///
/// Passed by reference into every list, item, and group operation; nothing in this
/// crate reaches for process-wide state.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    hive: &'a dyn Hive,
    sink: &'a dyn Sink,
}

impl<'a> Context<'a> {
    #[must_use]
    pub const fn new(hive: &'a dyn Hive, sink: &'a dyn Sink) -> Self {
        Self { hive, sink }
    }

    #[must_use]
    pub const fn hive(&self) -> &'a dyn Hive {
        self.hive
    }

    #[must_use]
    pub const fn sink(&self) -> &'a dyn Sink {
        self.sink
    }

    pub fn emit(&self, event: Event) {
        self.sink.emit(event);
    }
}
