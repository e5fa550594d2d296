//! Recurrence alerts: same failure code striking again too soon.
//!
//! Purely advisory. Failures are grouped by code; for every code with at
//! least two occurrences, consecutive gaps below the caller's threshold are
//! collected into one alert record per code. Repairs and neutral events
//! never trigger alerts.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::{minutes_between, Event};

/// A pair of same-code failures closer together than the threshold.
#[derive(Debug, Clone, Serialize)]
pub struct RecurrencePair {
    pub earlier: NaiveDateTime,
    pub later: NaiveDateTime,
    pub gap_minutes: f64,
}

/// One alert per offending failure code.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    pub code: String,
    pub occurrence_timestamps: Vec<NaiveDateTime>,
    pub threshold_minutes: f64,
    pub triggered_pairs: Vec<RecurrencePair>,
}

/// Scan the classified sequence for fast recurrences of the same code.
/// Records come out in first-seen code order.
pub fn evaluate_alerts(events: &[Event], threshold_minutes: f64) -> Vec<AlertRecord> {
    // Group failure timestamps by code, keeping first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut by_code: HashMap<String, Vec<NaiveDateTime>> = HashMap::new();
    for event in events.iter().filter(|e| e.is_failure()) {
        let slot = by_code.entry(event.code.clone()).or_insert_with(|| {
            order.push(event.code.clone());
            Vec::new()
        });
        slot.push(event.timestamp);
    }

    let mut records = Vec::new();
    for code in order {
        let timestamps = &by_code[&code];
        if timestamps.len() < 2 {
            continue;
        }

        let triggered: Vec<RecurrencePair> = timestamps
            .windows(2)
            .filter_map(|pair| {
                let gap = minutes_between(pair[0], pair[1]);
                (gap < threshold_minutes).then(|| RecurrencePair {
                    earlier: pair[0],
                    later: pair[1],
                    gap_minutes: gap,
                })
            })
            .collect();

        if !triggered.is_empty() {
            tracing::debug!(
                code = %code,
                pairs = triggered.len(),
                threshold_minutes,
                "alert: recurrence below threshold"
            );
            records.push(AlertRecord {
                code,
                occurrence_timestamps: timestamps.clone(),
                threshold_minutes,
                triggered_pairs: triggered,
            });
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventCategory;
    use chrono::NaiveDate;

    fn ts(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(minutes)
    }

    fn failure(minutes: i64, code: &str) -> Event {
        Event {
            timestamp: ts(minutes),
            raw_event: code.to_string(),
            code: code.to_string(),
            category: EventCategory::Failure,
        }
    }

    fn repair(minutes: i64) -> Event {
        Event {
            timestamp: ts(minutes),
            raw_event: "restart".to_string(),
            code: "restart".to_string(),
            category: EventCategory::Repair,
        }
    }

    #[test]
    fn test_only_close_pair_triggers() {
        // Gaps of 100 and 30 minutes against a 60-minute threshold.
        let events = vec![
            failure(0, "W0547"),
            failure(100, "W0547"),
            failure(130, "W0547"),
        ];
        let records = evaluate_alerts(&events, 60.0);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.code, "W0547");
        assert_eq!(record.occurrence_timestamps.len(), 3);
        assert_eq!(record.triggered_pairs.len(), 1);
        assert_eq!(record.triggered_pairs[0].earlier, ts(100));
        assert_eq!(record.triggered_pairs[0].later, ts(130));
        assert_eq!(record.triggered_pairs[0].gap_minutes, 30.0);
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_trigger() {
        let events = vec![failure(0, "W0547"), failure(60, "W0547")];
        assert!(evaluate_alerts(&events, 60.0).is_empty());
    }

    #[test]
    fn test_single_occurrence_never_triggers() {
        let events = vec![failure(0, "W0547"), failure(10, "E0431")];
        assert!(evaluate_alerts(&events, 60.0).is_empty());
    }

    #[test]
    fn test_codes_evaluated_independently() {
        let events = vec![
            failure(0, "W0547"),
            failure(5, "E0431"),
            failure(10, "W0547"),
            failure(300, "E0431"),
        ];
        let records = evaluate_alerts(&events, 60.0);

        // Only W0547 recurs within the threshold (gap 10); E0431's gap is 295.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, "W0547");
    }

    #[test]
    fn test_record_order_is_first_seen() {
        let events = vec![
            failure(0, "B"),
            failure(1, "A"),
            failure(2, "B"),
            failure(3, "A"),
        ];
        let records = evaluate_alerts(&events, 60.0);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "B");
        assert_eq!(records[1].code, "A");
    }

    #[test]
    fn test_repairs_do_not_alert() {
        let events = vec![repair(0), repair(1), repair(2)];
        assert!(evaluate_alerts(&events, 60.0).is_empty());
    }

    #[test]
    fn test_multiple_triggered_pairs_in_one_record() {
        let events = vec![
            failure(0, "W0547"),
            failure(10, "W0547"),
            failure(15, "W0547"),
        ];
        let records = evaluate_alerts(&events, 60.0);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].triggered_pairs.len(), 2);
    }
}
