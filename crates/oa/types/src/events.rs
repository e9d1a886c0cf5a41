//! Change events raised by detector tasks.
//!
//! Detectors create a signal and publish it right away through the task's
//! `EventBus`; handlers registered for the event kind are called in
//! registration order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::instance::{Instance, InstanceId};

// ── Identifier Types ────────────────────────────────────────────────────

/// Unique identifier of a raised change event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

/// Kind of change event, used as the handler registration key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Anomaly,
    Drift,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anomaly => write!(f, "anomaly"),
            Self::Drift => write!(f, "drift"),
        }
    }
}

// ── Signals ─────────────────────────────────────────────────────────────

/// An anomaly tied to a single instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointAnomaly {
    pub id: EventId,
    pub status: bool,
    pub tstamp: DateTime<Utc>,
    pub instances: Vec<InstanceId>,
    /// Name of the task that raised the anomaly.
    pub raised_by: String,
    pub visualize: bool,
}

impl PointAnomaly {
    pub fn new(instance: &Instance, raised_by: impl Into<String>, visualize: bool) -> Self {
        Self {
            id: EventId::new(),
            status: true,
            tstamp: instance.tstamp,
            instances: vec![instance.id],
            raised_by: raised_by.into(),
            visualize,
        }
    }
}

/// A drift reported by a drift detector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriftSignal {
    pub id: EventId,
    pub status: bool,
    pub tstamp: DateTime<Utc>,
    pub instances: Vec<InstanceId>,
    pub raised_by: String,
    pub visualize: bool,
}

impl DriftSignal {
    pub fn new(instance: &Instance, raised_by: impl Into<String>, visualize: bool) -> Self {
        Self {
            id: EventId::new(),
            status: true,
            tstamp: instance.tstamp,
            instances: vec![instance.id],
            raised_by: raised_by.into(),
            visualize,
        }
    }
}

/// Any event a detector task can raise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChangeEvent {
    Anomaly(PointAnomaly),
    Drift(DriftSignal),
}

impl ChangeEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Anomaly(_) => EventKind::Anomaly,
            Self::Drift(_) => EventKind::Drift,
        }
    }

    pub fn tstamp(&self) -> DateTime<Utc> {
        match self {
            Self::Anomaly(a) => a.tstamp,
            Self::Drift(d) => d.tstamp,
        }
    }
}

// ── Event Bus ───────────────────────────────────────────────────────────

/// Callback invoked for a raised event.
pub type EventHandler = Box<dyn FnMut(&ChangeEvent) + Send>;

/// Per-task registry of event handlers.
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<EventKind, Vec<EventHandler>>,
    raised: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_event_handler(&mut self, kind: EventKind, handler: EventHandler) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Publish an event. Returns the number of handlers called.
    pub fn raise_event(&mut self, event: &ChangeEvent) -> usize {
        self.raised += 1;
        let called = match self.handlers.get_mut(&event.kind()) {
            Some(handlers) => {
                for handler in handlers.iter_mut() {
                    handler(event);
                }
                handlers.len()
            }
            None => 0,
        };
        trace!(kind = ?event.kind(), handlers = called, "event raised");
        called
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.get(&kind).map_or(0, Vec::len)
    }

    /// Total number of events raised through this bus.
    pub fn raised_count(&self) -> u64 {
        self.raised
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("anomaly_handlers", &self.handler_count(EventKind::Anomaly))
            .field("drift_handlers", &self.handler_count(EventKind::Drift))
            .field("raised", &self.raised)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::FeatureData;
    use std::sync::{Arc, Mutex};

    fn instance() -> Instance {
        Instance::new(InstanceId(1), FeatureData::from_values(vec![0.5]))
    }

    #[test]
    fn handlers_receive_matching_kind_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let sink = seen.clone();
        bus.register_event_handler(
            EventKind::Drift,
            Box::new(move |e| sink.lock().unwrap().push(e.kind())),
        );

        let anomaly = ChangeEvent::Anomaly(PointAnomaly::new(&instance(), "t1", false));
        assert_eq!(bus.raise_event(&anomaly), 0);

        let drift = ChangeEvent::Drift(DriftSignal::new(&instance(), "t1", false));
        assert_eq!(bus.raise_event(&drift), 1);

        assert_eq!(*seen.lock().unwrap(), vec![EventKind::Drift]);
        assert_eq!(bus.raised_count(), 2);
    }

    #[test]
    fn signal_references_instance() {
        let inst = instance();
        let anomaly = PointAnomaly::new(&inst, "hst", true);
        assert!(anomaly.status);
        assert_eq!(anomaly.instances, vec![InstanceId(1)]);
        assert_eq!(anomaly.tstamp, inst.tstamp);
        assert_eq!(anomaly.raised_by, "hst");
    }

    #[test]
    fn events_serialize() {
        let event = ChangeEvent::Drift(DriftSignal::new(&instance(), "adwin", false));
        let json = serde_json::to_string(&event).unwrap();
        let back: ChangeEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
