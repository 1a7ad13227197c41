//! Progress events and the sink the orchestrator emits them through.
//!
//! The orchestrator never touches a transport directly; it calls `emit`
//! with a [`Progress`] value and the caller's [`ProgressSink`] fans that
//! out however its runtime requires (websocket broadcast, log line,
//! buffered replay for a late-joining subscriber).

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A phase of the orchestrator's linear pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Parsing,
    Rag,
    LlmGeneration,
    ComplianceValidation,
    Saving,
    Complete,
    Error,
}

/// Outcome reported alongside a [`Phase`] at a given point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    InProgress,
    Completed,
    Error,
    Warning,
}

/// A single progress notification. Events within one phase are enqueued in
/// the order the orchestrator produces them; subscribers must not reorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    pub phase: Phase,
    pub status: Status,
    pub message: String,
    pub data: Option<HashMap<String, serde_json::Value>>,
}

impl Progress {
    pub fn new(phase: Phase, status: Status, message: impl Into<String>) -> Self {
        Self {
            phase,
            status,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: HashMap<String, serde_json::Value>) -> Self {
        self.data = Some(data);
        self
    }
}

/// The progress sink the orchestrator is driven with. Must not block the
/// caller; the orchestrator treats a panicking or failing sink as non-fatal
/// (it catches nothing itself — the sink is a plain closure, so callers
/// that need isolation should catch inside their own `emit` implementation).
pub type ProgressSink = Arc<dyn Fn(Progress) + Send + Sync>;

/// A no-op sink, useful for tests and for callers that don't want progress
/// events at all.
pub fn noop_sink() -> ProgressSink {
    Arc::new(|_progress: Progress| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn noop_sink_accepts_any_event() {
        let sink = noop_sink();
        sink(Progress::new(Phase::Parsing, Status::InProgress, "reading file"));
    }

    #[test]
    fn sink_can_capture_events_for_assertions() {
        let captured: Arc<Mutex<Vec<Progress>>> = Arc::new(Mutex::new(Vec::new()));
        let captured_for_sink = captured.clone();
        let sink: ProgressSink = Arc::new(move |p: Progress| captured_for_sink.lock().unwrap().push(p));

        sink(Progress::new(Phase::Complete, Status::Completed, "done"));

        let events = captured.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase, Phase::Complete);
    }
}
