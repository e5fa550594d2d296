//! Model — the JSON-serializable report types.
//!
//! Map-valued fields use `BTreeMap` and list-valued fields carry their own
//! ordering, so serializing the same report twice yields identical bytes.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use super::trend::TrendDirection;
use crate::alert::AlertRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The pipeline ran over at least one analyzable event.
    Complete,
    /// No analyzable events at all; every count is zero and every metric
    /// is undefined.
    EmptyInput,
}

/// A metric that is either a number or explicitly undefined.
///
/// Serializes as the number itself, or as the string `"insufficient_data"` —
/// never as zero, so a missing metric cannot be mistaken for a measured one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Value(f64),
    InsufficientData,
}

impl MetricValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::InsufficientData => None,
        }
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, MetricValue::InsufficientData)
    }
}

impl Serialize for MetricValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            MetricValue::Value(v) => serializer.serialize_f64(*v),
            MetricValue::InsufficientData => serializer.serialize_str("insufficient_data"),
        }
    }
}

/// Mean with min/max/std over a set of duration samples.
#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    pub mean_minutes: MetricValue,
    pub min_minutes: MetricValue,
    pub max_minutes: MetricValue,
    pub std_dev_minutes: MetricValue,
}

impl DurationStats {
    pub fn insufficient() -> Self {
        Self {
            mean_minutes: MetricValue::InsufficientData,
            min_minutes: MetricValue::InsufficientData,
            max_minutes: MetricValue::InsufficientData,
            std_dev_minutes: MetricValue::InsufficientData,
        }
    }

    /// Population statistics over the samples; undefined for an empty set.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::insufficient();
        }

        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean_minutes: MetricValue::Value(mean),
            min_minutes: MetricValue::Value(min),
            max_minutes: MetricValue::Value(max),
            std_dev_minutes: MetricValue::Value(variance.sqrt()),
        }
    }
}

/// One row of the failure-code frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: u64,
}

/// Per-failure-code sub-table entry.
#[derive(Debug, Clone, Serialize)]
pub struct CodeStats {
    pub occurrences: u64,
    pub mttr_minutes: MetricValue,
    pub mtbf_minutes: MetricValue,
}

/// The aggregate output of one analysis run. Recomputed whole on every run,
/// never partially updated.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub status: ReportStatus,
    pub window_start: Option<NaiveDateTime>,
    pub window_end: Option<NaiveDateTime>,
    pub event_count: u64,
    pub failure_count: u64,
    pub paired_failure_count: u64,
    pub unresolved_failure_count: u64,
    pub repair_count: u64,
    pub skipped_line_count: u64,
    pub invalid_pairing_count: u64,
    pub discarded_interval_count: u64,
    pub mttr: DurationStats,
    pub mtbf_minutes: MetricValue,
    pub availability_percent: MetricValue,
    pub composite_score: MetricValue,
    pub failure_trend: TrendDirection,
    pub top_codes: Vec<CodeCount>,
    pub per_code_stats: BTreeMap<String, CodeStats>,
    pub alerts: Vec<AlertRecord>,
}

impl MetricsReport {
    /// The clearly-marked report for input with nothing to analyze.
    pub fn empty_input(skipped_lines: u64) -> Self {
        Self {
            status: ReportStatus::EmptyInput,
            window_start: None,
            window_end: None,
            event_count: 0,
            failure_count: 0,
            paired_failure_count: 0,
            unresolved_failure_count: 0,
            repair_count: 0,
            skipped_line_count: skipped_lines,
            invalid_pairing_count: 0,
            discarded_interval_count: 0,
            mttr: DurationStats::insufficient(),
            mtbf_minutes: MetricValue::InsufficientData,
            availability_percent: MetricValue::InsufficientData,
            composite_score: MetricValue::InsufficientData,
            failure_trend: TrendDirection::Flat,
            top_codes: Vec::new(),
            per_code_stats: BTreeMap::new(),
            alerts: Vec::new(),
        }
    }
}
