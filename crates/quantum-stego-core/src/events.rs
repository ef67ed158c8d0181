use std::collections::VecDeque;
use std::fmt::{self, Display, Formatter};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
    Rejected,
}

impl Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::Success => "success",
            Outcome::Failure => "failure",
            Outcome::Rejected => "rejected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationEvent {
    pub timestamp: DateTime<Utc>,
    pub operation: &'static str,
    pub outcome: Outcome,
    pub detail: Option<String>,
}

impl OperationEvent {
    pub fn new(operation: &'static str, outcome: Outcome) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            outcome,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// receives one event per orchestrator operation, fire and forget
pub trait EventSink {
    fn record(&mut self, event: OperationEvent);
}

/// forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&mut self, event: OperationEvent) {
        let timestamp = event.timestamp.to_rfc3339();
        let detail = event.detail.as_deref().unwrap_or("");
        match event.outcome {
            Outcome::Success => info!("{timestamp} {} {} {detail}", event.operation, event.outcome),
            _ => warn!("{timestamp} {} {} {detail}", event.operation, event.outcome),
        }
    }
}

/// Keeps the most recent events in memory. Clones share the same buffer,
/// so one clone can be handed to the orchestrator and the other inspected.
#[derive(Debug, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<VecDeque<OperationEvent>>>,
    capacity: usize,
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(256)
    }
}

impl MemorySink {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn events(&self) -> Vec<OperationEvent> {
        match self.events.lock() {
            Ok(events) => events.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventSink for MemorySink {
    fn record(&mut self, event: OperationEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        while events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }
}
