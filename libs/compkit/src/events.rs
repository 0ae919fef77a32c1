//! Lifecycle event reporting.
//!
//! The manager never prints. It hands events to an [`EventSink`] supplied at
//! construction; the default sink drops them.

use std::fmt;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Initialized,
    ToBuild,
    Built,
    Closed,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Initialized => "INITIALIZED",
            EventKind::ToBuild => "TO BUILD",
            EventKind::Built => "BUILT",
            EventKind::Closed => "CLOSED",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub kind: EventKind,
    pub category: String,
    pub description: String,
}

impl LifecycleEvent {
    pub fn new(kind: EventKind, category: &str, description: &str) -> Self {
        Self {
            kind,
            category: category.to_owned(),
            description: description.to_owned(),
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=== Component: {} ==> {}", self.description, self.kind)
    }
}

pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &LifecycleEvent);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn on_event(&self, _event: &LifecycleEvent) {}
}

/// Forwards events to `tracing` under the `compkit::lifecycle` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&self, event: &LifecycleEvent) {
        tracing::info!(
            target: "compkit::lifecycle",
            category = %event.category,
            "{event}"
        );
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl CollectingSink {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().clone()
    }

    /// Categories of the events of one kind, in emission order.
    pub fn categories(&self, kind: EventKind) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.category.clone())
            .collect()
    }

    pub fn take(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl EventSink for CollectingSink {
    fn on_event(&self, event: &LifecycleEvent) {
        self.events.lock().push(event.clone());
    }
}
