//! Per-line record interpretation.

use chrono::{NaiveDate, NaiveTime};

use crate::conf::ParserConfig;

/// What a single input line turned out to be.
#[derive(Debug, PartialEq)]
pub enum RecordLine<'a> {
    /// Full record: date, time, name and optional code.
    Dated {
        date: NaiveDate,
        time: NaiveTime,
        name: &'a str,
        code: Option<&'a str>,
    },
    /// Time-only record that belongs to the date of the preceding record.
    Continuation {
        time: NaiveTime,
        name: &'a str,
        code: Option<&'a str>,
    },
    /// No valid date+time+name combination.
    Unusable,
}

/// Split a line on the configured delimiter and classify it.
pub(super) fn interpret_line<'a>(line: &'a str, config: &ParserConfig) -> RecordLine<'a> {
    let mut fields: Vec<&str> = line
        .split(config.field_delimiter.as_str())
        .map(str::trim)
        .collect();

    // Continuation lines may start with the delimiter (empty date column).
    while fields.first() == Some(&"") {
        fields.remove(0);
    }
    let Some(&first) = fields.first() else {
        return RecordLine::Unusable;
    };

    if let Ok(date) = NaiveDate::parse_from_str(first, &config.date_format) {
        let Some(time) = fields
            .get(1)
            .and_then(|f| NaiveTime::parse_from_str(f, &config.time_format).ok())
        else {
            return RecordLine::Unusable;
        };
        let Some(name) = non_empty(fields.get(2)) else {
            return RecordLine::Unusable;
        };
        RecordLine::Dated {
            date,
            time,
            name,
            code: non_empty(fields.get(3)),
        }
    } else if let Ok(time) = NaiveTime::parse_from_str(first, &config.time_format) {
        let Some(name) = non_empty(fields.get(1)) else {
            return RecordLine::Unusable;
        };
        RecordLine::Continuation {
            time,
            name,
            code: non_empty(fields.get(2)),
        }
    } else {
        RecordLine::Unusable
    }
}

fn non_empty<'a>(field: Option<&&'a str>) -> Option<&'a str> {
    field.copied().filter(|f| !f.is_empty())
}
