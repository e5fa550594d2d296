//! Operating-time intervals between consecutive failures.
//!
//! One interval per failure, measured from the previous failure (or from the
//! window start for the first), plus a trailing interval from the last
//! failure to the window end. A log without failures yields one full-window
//! interval. Non-positive gaps between failures (duplicate or out-of-order
//! timestamps) are dropped and counted; the synthetic boundary intervals are
//! simply omitted when the window clips them to zero or less.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::conf::WindowConfig;
use crate::event::{minutes_between, Event};

/// Uptime since the previous reference point (prior failure or window start).
#[derive(Debug, Clone, Serialize)]
pub struct FailureInterval {
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub operation_minutes: f64,
    /// False for the trailing interval that ends at the window edge.
    pub closed_by_failure: bool,
}

/// Result of one interval pass.
#[derive(Debug, Clone)]
pub struct IntervalOutcome {
    pub intervals: Vec<FailureInterval>,
    pub discarded_intervals: u64,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
}

impl IntervalOutcome {
    pub fn total_operation_minutes(&self) -> f64 {
        self.intervals.iter().map(|i| i.operation_minutes).sum()
    }

    pub fn window_minutes(&self) -> f64 {
        minutes_between(self.window_start, self.window_end)
    }
}

/// Resolve the observation window: caller override first, then the first and
/// last event timestamps. `None` when the sequence is empty and the override
/// does not cover both edges.
fn resolve_window(
    events: &[Event],
    config: &WindowConfig,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let start = config
        .start
        .or_else(|| events.first().map(|e| e.timestamp))?;
    let end = config.end.or_else(|| events.last().map(|e| e.timestamp))?;
    Some((start, end))
}

/// Walk the failures of an already-sorted classified sequence. `None` only
/// when no observation window can be resolved at all.
pub fn analyze_intervals(events: &[Event], config: &WindowConfig) -> Option<IntervalOutcome> {
    let (window_start, window_end) = resolve_window(events, config)?;

    let mut intervals = Vec::new();
    let mut discarded: u64 = 0;
    let mut previous: Option<&Event> = None;

    for failure in events.iter().filter(|e| e.is_failure()) {
        let (started_at, from_window_edge) = match previous {
            None => (window_start, true),
            Some(prior) => (prior.timestamp, false),
        };
        let minutes = minutes_between(started_at, failure.timestamp);
        if minutes > 0.0 {
            intervals.push(FailureInterval {
                started_at,
                ended_at: failure.timestamp,
                operation_minutes: minutes,
                closed_by_failure: true,
            });
        } else if !from_window_edge {
            tracing::debug!(
                code = %failure.code,
                minutes,
                "interval: non-positive gap between failures, dropping"
            );
            discarded += 1;
        }
        previous = Some(failure);
    }

    // Trailing uptime: last failure → window end, or the whole window when
    // the log contains no failures at all.
    let trailing_start = previous.map(|f| f.timestamp).unwrap_or(window_start);
    let trailing_minutes = minutes_between(trailing_start, window_end);
    if trailing_minutes > 0.0 {
        intervals.push(FailureInterval {
            started_at: trailing_start,
            ended_at: window_end,
            operation_minutes: trailing_minutes,
            closed_by_failure: false,
        });
    }

    Some(IntervalOutcome {
        intervals,
        discarded_intervals: discarded,
        window_start,
        window_end,
    })
}
