//! Stream task core shared by all online-adaptive tasks.
//!
//! Wrappers hold a `StreamTask` by value and delegate the host-side concerns
//! to it: naming, adaptivity switch, visualization flag, log level and the
//! event bus.

use serde::{Deserialize, Serialize};

use crate::events::{ChangeEvent, EventBus, EventHandler, EventKind};

/// How much a task logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Informational messages, warnings and errors.
    #[default]
    All,
    /// Warnings and errors only.
    Warnings,
    /// Silent.
    Nothing,
}

impl LogLevel {
    pub fn logs_info(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn logs_warnings(&self) -> bool {
        !matches!(self, Self::Nothing)
    }
}

/// Host-side state of a stream task.
#[derive(Debug)]
pub struct StreamTask {
    name: String,
    ada: bool,
    visualize: bool,
    logging: LogLevel,
    events: EventBus,
}

impl StreamTask {
    pub fn new(name: impl Into<String>, ada: bool, visualize: bool, logging: LogLevel) -> Self {
        Self {
            name: name.into(),
            ada,
            visualize,
            logging,
            events: EventBus::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_adaptive(&self) -> bool {
        self.ada
    }

    pub fn switch_adaptivity(&mut self, ada: bool) {
        self.ada = ada;
    }

    pub fn visualization(&self) -> bool {
        self.visualize
    }

    pub fn logging(&self) -> LogLevel {
        self.logging
    }

    pub fn register_event_handler(&mut self, kind: EventKind, handler: EventHandler) {
        self.events.register_event_handler(kind, handler);
    }

    pub fn raise_event(&mut self, event: &ChangeEvent) -> usize {
        self.events.raise_event(event)
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_levels_gate_messages() {
        assert!(LogLevel::All.logs_info());
        assert!(!LogLevel::Warnings.logs_info());
        assert!(LogLevel::Warnings.logs_warnings());
        assert!(!LogLevel::Nothing.logs_warnings());
    }

    #[test]
    fn adaptivity_can_be_switched() {
        let mut task = StreamTask::new("t1", true, false, LogLevel::Nothing);
        assert!(task.is_adaptive());
        task.switch_adaptivity(false);
        assert!(!task.is_adaptive());
        assert_eq!(task.name(), "t1");
    }

    #[test]
    fn log_level_deserializes_snake_case() {
        let level: LogLevel = serde_json::from_str("\"warnings\"").unwrap();
        assert_eq!(level, LogLevel::Warnings);
    }
}
