//! Event model shared by every pipeline stage.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category assigned to an event by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Equipment stopped working (opens a repair window).
    Failure,
    /// Equipment restored (closes the open repair window, if any).
    Repair,
    /// Everything else: status lines, operator notes, speed changes.
    Neutral,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Failure => "failure",
            EventCategory::Repair => "repair",
            EventCategory::Neutral => "neutral",
        }
    }
}

/// A parsed log record before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub timestamp: NaiveDateTime,
    /// Event name column, trimmed.
    pub raw_event: String,
    /// Explicit code column when present, otherwise the event name.
    pub code: String,
}

/// A classified event. Immutable once built; discarded at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub timestamp: NaiveDateTime,
    pub raw_event: String,
    pub code: String,
    pub category: EventCategory,
}

impl Event {
    pub fn is_failure(&self) -> bool {
        self.category == EventCategory::Failure
    }

    pub fn is_repair(&self) -> bool {
        self.category == EventCategory::Repair
    }
}

/// Signed elapsed minutes from `from` to `to`, millisecond precision.
pub fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
