//! Model — AnalysisConfig and related structs.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// All knobs for a single analysis run.
///
/// Every field has a documented default so a partial TOML table (or an empty
/// one) deserializes into a working configuration. The classification rule
/// table is deliberately *not* part of this struct; rules are caller data,
/// compiled separately via [`crate::classify::RuleTable`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub parser: ParserConfig,
    pub pairing: PairingConfig,
    pub window: WindowConfig,
    pub alert: AlertConfig,
    pub composite: CompositeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// chrono format string for the date column.
    pub date_format: String,
    /// chrono format string for the time column.
    pub time_format: String,
    /// Column separator, may be multi-byte.
    pub field_delimiter: String,
    /// Lines starting with this marker are section separators, not records.
    pub header_marker: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingConfig {
    /// Exclusive lower bound on a plausible repair duration, in minutes.
    pub min_repair_minutes: f64,
    /// Inclusive upper bound on a plausible repair duration, in minutes.
    pub max_repair_minutes: f64,
}

/// Observation window override. Unset bounds fall back to the first/last
/// event timestamp of the parsed log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Recurrence threshold in minutes. No default: alerting only runs when
    /// the caller sets one.
    pub threshold_minutes: Option<f64>,
}

/// Caller-supplied rates for the OEE-style composite score. Omitted rates
/// count as 100%, so with both unset the composite equals availability.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub performance_rate: Option<f64>,
    pub quality_rate: Option<f64>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".to_string(),
            time_format: "%H:%M".to_string(),
            field_delimiter: "\t".to_string(),
            header_marker: "===".to_string(),
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            min_repair_minutes: 0.0,
            max_repair_minutes: 1440.0,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.parser.validate()?;
        self.pairing.validate()?;
        self.window.validate()?;
        self.alert.validate()?;
        self.composite.validate()
    }
}

impl ParserConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.date_format.is_empty() {
            return Err("parser.date_format must not be empty".to_string());
        }
        if self.time_format.is_empty() {
            return Err("parser.time_format must not be empty".to_string());
        }
        if self.field_delimiter.is_empty() {
            return Err("parser.field_delimiter must not be empty".to_string());
        }
        if self.header_marker.is_empty() {
            return Err("parser.header_marker must not be empty".to_string());
        }
        Ok(())
    }
}

impl PairingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_repair_minutes.is_finite() || !self.max_repair_minutes.is_finite() {
            return Err("pairing bounds must be finite".to_string());
        }
        if self.min_repair_minutes < 0.0 {
            return Err("pairing.min_repair_minutes must be >= 0".to_string());
        }
        if self.max_repair_minutes <= self.min_repair_minutes {
            return Err(
                "pairing.max_repair_minutes must be > pairing.min_repair_minutes".to_string(),
            );
        }
        Ok(())
    }
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end <= start {
                return Err("window.end must be after window.start".to_string());
            }
        }
        Ok(())
    }
}

impl AlertConfig {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(threshold) = self.threshold_minutes {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err("alert.threshold_minutes must be > 0".to_string());
            }
        }
        Ok(())
    }
}

impl CompositeConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, rate) in [
            ("composite.performance_rate", self.performance_rate),
            ("composite.quality_rate", self.quality_rate),
        ] {
            if let Some(value) = rate {
                if !value.is_finite() || value <= 0.0 || value > 100.0 {
                    return Err(format!("{} must be within (0, 100]", name));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_parser_defaults() {
        let cfg = ParserConfig::default();
        assert_eq!(cfg.date_format, "%Y-%m-%d");
        assert_eq!(cfg.time_format, "%H:%M");
        assert_eq!(cfg.field_delimiter, "\t");
        assert_eq!(cfg.header_marker, "===");
    }

    #[test]
    fn test_pairing_defaults() {
        let cfg = PairingConfig::default();
        assert_eq!(cfg.min_repair_minutes, 0.0);
        assert_eq!(cfg.max_repair_minutes, 1440.0);
    }

    #[test]
    fn test_optional_knobs_default_unset() {
        let cfg = AnalysisConfig::default();
        assert!(cfg.window.start.is_none());
        assert!(cfg.window.end.is_none());
        assert!(cfg.alert.threshold_minutes.is_none());
        assert!(cfg.composite.performance_rate.is_none());
        assert!(cfg.composite.quality_rate.is_none());
    }

    // ── Validation ───────────────────────────────────────────────

    #[test]
    fn test_default_config_validates() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_pairing_bounds() {
        let cfg = PairingConfig {
            min_repair_minutes: 60.0,
            max_repair_minutes: 30.0,
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("max_repair_minutes"), "got: {}", err);
    }

    #[test]
    fn test_rejects_negative_pairing_minimum() {
        let cfg = PairingConfig {
            min_repair_minutes: -1.0,
            max_repair_minutes: 1440.0,
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_delimiter() {
        let cfg = ParserConfig {
            field_delimiter: String::new(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("field_delimiter"), "got: {}", err);
    }

    #[test]
    fn test_rejects_inverted_window() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let cfg = WindowConfig {
            start: Some(start),
            end: Some(end),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_alert_threshold() {
        let cfg = AlertConfig {
            threshold_minutes: Some(0.0),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_composite_rate() {
        let cfg = CompositeConfig {
            performance_rate: Some(130.0),
            quality_rate: None,
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("performance_rate"), "got: {}", err);
    }

    #[test]
    fn test_accepts_full_composite_rates() {
        let cfg = CompositeConfig {
            performance_rate: Some(100.0),
            quality_rate: Some(95.5),
        };
        assert!(cfg.validate().is_ok());
    }

    // ── Serialization round-trip ─────────────────────────────────

    #[test]
    fn test_toml_round_trip() {
        let cfg = AnalysisConfig::default();
        let toml_str = toml::to_string(&cfg).expect("Should serialize to TOML");
        let back: AnalysisConfig = toml::from_str(&toml_str).expect("Should deserialize from TOML");
        assert_eq!(back.parser.date_format, cfg.parser.date_format);
        assert_eq!(back.pairing.max_repair_minutes, cfg.pairing.max_repair_minutes);
        assert!(back.alert.threshold_minutes.is_none());
    }

    #[test]
    fn test_deserialize_partial_toml() {
        // Only override the pairing bound; rest should use defaults via #[serde(default)]
        let toml_str = r#"
            [pairing]
            max_repair_minutes = 480.0

            [alert]
            threshold_minutes = 60.0
        "#;
        let cfg: AnalysisConfig = toml::from_str(toml_str).expect("Should accept partial TOML");
        assert_eq!(cfg.pairing.max_repair_minutes, 480.0);
        assert_eq!(cfg.pairing.min_repair_minutes, 0.0); // default
        assert_eq!(cfg.alert.threshold_minutes, Some(60.0));
        assert_eq!(cfg.parser.date_format, "%Y-%m-%d"); // default
    }

    #[test]
    fn test_deserialize_window_override() {
        let toml_str = r#"
            [window]
            start = "2024-03-01T06:00:00"
            end = "2024-03-01T18:00:00"
        "#;
        let cfg: AnalysisConfig = toml::from_str(toml_str).expect("Should parse window bounds");
        assert!(cfg.window.start.is_some());
        assert!(cfg.window.end.is_some());
        assert!(cfg.validate().is_ok());
    }
}
