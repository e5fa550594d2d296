//! Daily failure-count trend.
//!
//! A heuristic signal, not a statistical test: least-squares slope over the
//! per-day failure counts (missing days count as zero), classified by sign
//! with a small dead zone around flat.

use serde::Serialize;

use crate::event::Event;

/// Slopes with magnitude below this are reported as flat.
const FLAT_SLOPE_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Falling,
    Flat,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Falling => "falling",
            TrendDirection::Flat => "flat",
        }
    }
}

/// Classify the daily failure-count slope of a chronologically sorted
/// sequence. Fewer than two distinct days is flat by definition.
pub fn daily_failure_trend(events: &[Event]) -> TrendDirection {
    let dates: Vec<chrono::NaiveDate> = events
        .iter()
        .filter(|e| e.is_failure())
        .map(|e| e.timestamp.date())
        .collect();

    let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
        return TrendDirection::Flat;
    };
    let span_days = last.signed_duration_since(first).num_days();
    if span_days < 1 {
        return TrendDirection::Flat;
    }

    let mut counts = vec![0.0_f64; span_days as usize + 1];
    for date in &dates {
        let day = date.signed_duration_since(first).num_days() as usize;
        counts[day] += 1.0;
    }

    let slope = least_squares_slope(&counts);
    if slope.abs() < FLAT_SLOPE_THRESHOLD {
        TrendDirection::Flat
    } else if slope > 0.0 {
        TrendDirection::Rising
    } else {
        TrendDirection::Falling
    }
}

/// Slope of the least-squares line through (0, ys[0]), (1, ys[1]), …
fn least_squares_slope(ys: &[f64]) -> f64 {
    let n = ys.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = ys.iter().sum::<f64>() / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (x, y) in ys.iter().enumerate() {
        let dx = x as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventCategory;
    use chrono::NaiveDate;

    fn failure_on(day: u32, hour: u32) -> Event {
        Event {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            raw_event: "x".to_string(),
            code: "x".to_string(),
            category: EventCategory::Failure,
        }
    }

    #[test]
    fn test_rising_counts() {
        // 1, 2, 3 failures across three days: slope 1.0
        let events = vec![
            failure_on(1, 8),
            failure_on(2, 8),
            failure_on(2, 9),
            failure_on(3, 8),
            failure_on(3, 9),
            failure_on(3, 10),
        ];
        assert_eq!(daily_failure_trend(&events), TrendDirection::Rising);
    }

    #[test]
    fn test_falling_counts() {
        let events = vec![
            failure_on(1, 8),
            failure_on(1, 9),
            failure_on(1, 10),
            failure_on(2, 8),
            failure_on(2, 9),
            failure_on(3, 8),
        ];
        assert_eq!(daily_failure_trend(&events), TrendDirection::Falling);
    }

    #[test]
    fn test_steady_counts_are_flat() {
        let events = vec![
            failure_on(1, 8),
            failure_on(2, 8),
            failure_on(3, 8),
        ];
        assert_eq!(daily_failure_trend(&events), TrendDirection::Flat);
    }

    #[test]
    fn test_single_day_is_flat() {
        let events = vec![failure_on(1, 8), failure_on(1, 9), failure_on(1, 10)];
        assert_eq!(daily_failure_trend(&events), TrendDirection::Flat);
    }

    #[test]
    fn test_no_failures_is_flat() {
        assert_eq!(daily_failure_trend(&[]), TrendDirection::Flat);
    }

    #[test]
    fn test_gap_days_count_as_zero() {
        // Failures on day 1 and a burst on day 5: rising despite the gap.
        let events = vec![
            failure_on(1, 8),
            failure_on(5, 8),
            failure_on(5, 9),
            failure_on(5, 10),
            failure_on(5, 11),
        ];
        assert_eq!(daily_failure_trend(&events), TrendDirection::Rising);
    }

    #[test]
    fn test_least_squares_slope_of_line() {
        assert!((least_squares_slope(&[0.0, 1.0, 2.0, 3.0]) - 1.0).abs() < 1e-12);
        assert!((least_squares_slope(&[5.0, 5.0, 5.0])).abs() < 1e-12);
        assert!(least_squares_slope(&[3.0, 2.0, 1.0]) < 0.0);
    }
}
