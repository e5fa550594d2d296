//! Event-log parsing: raw text into an ordered sequence of raw events.
//!
//! One record per logical line, delimiter-separated `date, time, name[, code]`
//! columns. Continuation lines that carry only a time reuse the date of the
//! most recent dated record. Anything that does not yield a valid timestamped
//! event is skipped and counted, never fatal.

mod record;

pub use record::RecordLine;

use crate::conf::ParserConfig;
use crate::event::RawEvent;

/// Result of one parse pass.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Events in stable chronological order: sorted by timestamp, input
    /// order preserved for equal timestamps.
    pub events: Vec<RawEvent>,
    pub skipped_lines: u64,
}

/// Parse the whole input in a single pass.
pub fn parse_events(input: &str, config: &ParserConfig) -> ParseOutcome {
    let mut events: Vec<RawEvent> = Vec::new();
    let mut skipped: u64 = 0;
    // Date context carried forward to continuation lines within this pass.
    let mut current_date: Option<chrono::NaiveDate> = None;

    for (line_no, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(config.header_marker.as_str()) {
            skipped += 1;
            continue;
        }

        match record::interpret_line(line, config) {
            RecordLine::Dated {
                date,
                time,
                name,
                code,
            } => {
                current_date = Some(date);
                events.push(build_event(date.and_time(time), name, code));
            }
            RecordLine::Continuation { time, name, code } => match current_date {
                Some(date) => events.push(build_event(date.and_time(time), name, code)),
                None => {
                    tracing::debug!(line = line_no + 1, "parser: continuation before any dated record");
                    skipped += 1;
                }
            },
            RecordLine::Unusable => {
                tracing::debug!(line = line_no + 1, "parser: skipping unparseable line");
                skipped += 1;
            }
        }
    }

    // Stable sort: ties keep input order.
    events.sort_by_key(|e| e.timestamp);

    ParseOutcome {
        events,
        skipped_lines: skipped,
    }
}

fn build_event(timestamp: chrono::NaiveDateTime, name: &str, code: Option<&str>) -> RawEvent {
    RawEvent {
        timestamp,
        raw_event: name.to_string(),
        code: code.unwrap_or(name).to_string(),
    }
}
