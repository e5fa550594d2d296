//! Aggregate — pure report assembly from the stage outcomes.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

use crate::alert::AlertRecord;
use crate::conf::AnalysisConfig;
use crate::event::{minutes_between, Event};
use crate::interval::IntervalOutcome;
use crate::pairing::PairingOutcome;

use super::model::{
    CodeCount, CodeStats, DurationStats, MetricValue, MetricsReport, ReportStatus,
};
use super::trend;

/// Assemble the full report for one run.
pub fn build_report(
    events: &[Event],
    skipped_lines: u64,
    pairing: &PairingOutcome,
    intervals: &IntervalOutcome,
    alerts: Vec<AlertRecord>,
    config: &AnalysisConfig,
) -> MetricsReport {
    let durations: Vec<f64> = pairing.periods.iter().map(|p| p.duration_minutes).collect();
    let availability = availability_percent(intervals);

    MetricsReport {
        status: ReportStatus::Complete,
        window_start: Some(intervals.window_start),
        window_end: Some(intervals.window_end),
        event_count: events.len() as u64,
        failure_count: pairing.failure_count,
        paired_failure_count: pairing.paired_failures(),
        unresolved_failure_count: pairing.unresolved_failures(),
        repair_count: pairing.repair_count,
        skipped_line_count: skipped_lines,
        invalid_pairing_count: pairing.invalid_pairings,
        discarded_interval_count: intervals.discarded_intervals,
        mttr: DurationStats::from_samples(&durations),
        mtbf_minutes: mtbf_minutes(
            intervals.total_operation_minutes(),
            pairing.failure_count,
        ),
        availability_percent: MetricValue::Value(availability),
        composite_score: composite_score(availability, config),
        failure_trend: trend::daily_failure_trend(events),
        top_codes: failure_code_frequency(events),
        per_code_stats: per_code_stats(events, pairing, intervals),
        alerts,
    }
}

/// Total operating time over the window, as a percentage clamped to [0, 100].
/// A degenerate zero-length window had no observable downtime.
fn availability_percent(intervals: &IntervalOutcome) -> f64 {
    let window = intervals.window_minutes();
    if window <= 0.0 {
        return 100.0;
    }
    let pct = intervals.total_operation_minutes() / window * 100.0;
    if pct.is_finite() {
        pct.clamp(0.0, 100.0)
    } else {
        100.0
    }
}

/// Total operating minutes divided by failure count. Undefined below two
/// failures: one failure gives a "gap" that is just the window itself.
fn mtbf_minutes(total_operation_minutes: f64, failure_count: u64) -> MetricValue {
    if failure_count < 2 {
        return MetricValue::InsufficientData;
    }
    MetricValue::Value(total_operation_minutes / failure_count as f64)
}

/// OEE-style composite: availability% × performance% × quality% / 10000.
/// Omitted rates count as 100%, so with both unset this is availability.
fn composite_score(availability: f64, config: &AnalysisConfig) -> MetricValue {
    let performance = config.composite.performance_rate.unwrap_or(100.0);
    let quality = config.composite.quality_rate.unwrap_or(100.0);
    MetricValue::Value(availability * performance * quality / 10_000.0)
}

/// Failure-code frequency table: descending count, ties in first-seen order.
fn failure_code_frequency(events: &[Event]) -> Vec<CodeCount> {
    let mut rows: Vec<CodeCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for event in events.iter().filter(|e| e.is_failure()) {
        match index.get(event.code.as_str()) {
            Some(&row) => rows[row].count += 1,
            None => {
                index.insert(event.code.as_str(), rows.len());
                rows.push(CodeCount {
                    code: event.code.clone(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-seen order within equal counts.
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Per-failure-code MTTR/MTBF sub-tables, keyed by code.
fn per_code_stats(
    events: &[Event],
    pairing: &PairingOutcome,
    intervals: &IntervalOutcome,
) -> BTreeMap<String, CodeStats> {
    // Failure timestamps per code, in chronological order.
    let mut failures_by_code: BTreeMap<&str, Vec<NaiveDateTime>> = BTreeMap::new();
    for event in events.iter().filter(|e| e.is_failure()) {
        failures_by_code
            .entry(event.code.as_str())
            .or_default()
            .push(event.timestamp);
    }

    // Repair durations per failure code.
    let mut durations_by_code: HashMap<&str, Vec<f64>> = HashMap::new();
    for period in &pairing.periods {
        durations_by_code
            .entry(period.failure.code.as_str())
            .or_default()
            .push(period.duration_minutes);
    }

    failures_by_code
        .into_iter()
        .map(|(code, timestamps)| {
            let mttr = match durations_by_code.get(code) {
                Some(samples) => MetricValue::Value(
                    samples.iter().sum::<f64>() / samples.len() as f64,
                ),
                None => MetricValue::InsufficientData,
            };
            let mtbf = per_code_mtbf(
                &timestamps,
                intervals.window_start,
                intervals.window_end,
            );
            (
                code.to_string(),
                CodeStats {
                    occurrences: timestamps.len() as u64,
                    mttr_minutes: mttr,
                    mtbf_minutes: mtbf,
                },
            )
        })
        .collect()
}

/// Same interval walk as the global MTBF, restricted to one code's failures.
fn per_code_mtbf(
    timestamps: &[NaiveDateTime],
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> MetricValue {
    if timestamps.len() < 2 {
        return MetricValue::InsufficientData;
    }

    let mut total = 0.0;
    let mut previous = window_start;
    for &at in timestamps {
        let gap = minutes_between(previous, at);
        if gap > 0.0 {
            total += gap;
        }
        previous = at;
    }
    let trailing = minutes_between(previous, window_end);
    if trailing > 0.0 {
        total += trailing;
    }

    MetricValue::Value(total / timestamps.len() as f64)
}
