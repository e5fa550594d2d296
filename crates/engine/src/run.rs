//! Single-run orchestration: parser → classifier → pairing/intervals →
//! report → alerts.
//!
//! One call is a pure function of (raw text, rule table, configuration).
//! The engine keeps nothing between calls: re-running after the log grew
//! means re-parsing the full input, there is no memoized intermediate state
//! to invalidate. Independent runs may execute in parallel freely.

use crate::alert;
use crate::classify::RuleTable;
use crate::conf::AnalysisConfig;
use crate::error::{EngineError, EngineResult};
use crate::interval;
use crate::pairing;
use crate::parser;
use crate::report::{self, MetricsReport};

/// Run the whole pipeline over one event log.
///
/// The only error surface is misconfiguration; malformed input degrades into
/// the report's skip/discard counters, and input with no analyzable events
/// returns the clearly-marked empty report.
pub fn analyze(
    input: &str,
    rules: &RuleTable,
    config: &AnalysisConfig,
) -> EngineResult<MetricsReport> {
    config.validate().map_err(EngineError::InvalidConfig)?;

    let parsed = parser::parse_events(input, &config.parser);
    tracing::debug!(
        events = parsed.events.len(),
        skipped = parsed.skipped_lines,
        "analyze: parse pass complete"
    );
    if parsed.events.is_empty() {
        tracing::info!(
            skipped_lines = parsed.skipped_lines,
            "analyze: no analyzable events in input"
        );
        return Ok(MetricsReport::empty_input(parsed.skipped_lines));
    }

    let events = rules.classify(&parsed.events);

    let pairing = pairing::pair_repairs(&events, &config.pairing);
    // Non-empty events always resolve a window; this is the no-window backstop.
    let Some(intervals) = interval::analyze_intervals(&events, &config.window) else {
        return Ok(MetricsReport::empty_input(parsed.skipped_lines));
    };

    let alerts = match config.alert.threshold_minutes {
        Some(threshold) => alert::evaluate_alerts(&events, threshold),
        None => Vec::new(),
    };

    let report = report::build_report(
        &events,
        parsed.skipped_lines,
        &pairing,
        &intervals,
        alerts,
        config,
    );
    tracing::info!(
        failures = report.failure_count,
        unresolved = report.unresolved_failure_count,
        alerts = report.alerts.len(),
        "analyze: run complete"
    );
    Ok(report)
}
