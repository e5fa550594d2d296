//! Failure→repair pairing over the classified sequence.
//!
//! A two-state walk: idle until a failure opens a repair window, then
//! awaiting repair until the next repair closes it. At most one window is
//! open at a time — further failures while a window is open are counted but
//! never open a second window, so only the first open failure pairs with the
//! next repair. A pairing whose duration falls outside the plausibility bound
//! is discarded (the repair is still consumed and the window closes).

use serde::Serialize;

use crate::conf::PairingConfig;
use crate::event::{minutes_between, Event};

/// One completed failure→repair pairing.
#[derive(Debug, Clone, Serialize)]
pub struct RepairPeriod {
    pub failure: Event,
    pub repair: Event,
    pub duration_minutes: f64,
}

/// Result of one pairing pass.
#[derive(Debug, Clone, Default)]
pub struct PairingOutcome {
    pub periods: Vec<RepairPeriod>,
    pub failure_count: u64,
    pub repair_count: u64,
    /// Pairings discarded for violating the plausibility bound.
    pub invalid_pairings: u64,
}

impl PairingOutcome {
    pub fn paired_failures(&self) -> u64 {
        self.periods.len() as u64
    }

    /// Failures that never produced a repair period: the trailing open
    /// window, failures ignored while another window was open, and failures
    /// whose pairing was discarded as implausible.
    pub fn unresolved_failures(&self) -> u64 {
        self.failure_count - self.paired_failures()
    }
}

/// Walk the classified sequence once, in chronological order.
///
/// `open_failure` is the state: `None` is idle, `Some` is awaiting repair.
pub fn pair_repairs(events: &[Event], config: &PairingConfig) -> PairingOutcome {
    let mut outcome = PairingOutcome::default();
    let mut open_failure: Option<Event> = None;

    for event in events {
        if event.is_failure() {
            outcome.failure_count += 1;
            if open_failure.is_none() {
                open_failure = Some(event.clone());
            } else {
                // Single-open-window policy: keep the first failure.
                tracing::trace!(
                    code = %event.code,
                    "pairing: failure while window already open, not re-opening"
                );
            }
        } else if event.is_repair() {
            outcome.repair_count += 1;
            if let Some(failure) = open_failure.take() {
                let duration = minutes_between(failure.timestamp, event.timestamp);
                if duration > config.min_repair_minutes && duration <= config.max_repair_minutes {
                    outcome.periods.push(RepairPeriod {
                        failure,
                        repair: event.clone(),
                        duration_minutes: duration,
                    });
                } else {
                    tracing::debug!(
                        code = %failure.code,
                        duration_minutes = duration,
                        "pairing: duration outside plausibility bound, discarding"
                    );
                    outcome.invalid_pairings += 1;
                }
            }
        }
    }

    if let Some(failure) = open_failure {
        tracing::debug!(code = %failure.code, "pairing: input ended with open failure window");
    }

    outcome
}
