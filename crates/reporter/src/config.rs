//! Reporter configuration: engine settings plus the deployment rule table.
//!
//! The rule table lives here, not in the engine — failure/repair vocabulary
//! differs per machine, so each deployment ships its own TOML.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use engine::classify::ClassifyRule;
use engine::conf::AnalysisConfig;
use engine::event::EventCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReporterConfig {
    pub analysis: AnalysisConfig,
    /// Category for events no rule matches.
    pub default_category: EventCategory,
    /// Ordered rule table; first match wins.
    pub rules: Vec<ClassifyRule>,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            default_category: EventCategory::Neutral,
            rules: Vec::new(),
        }
    }
}

impl ReporterConfig {
    /// Load configuration from file, with environment overrides.
    /// Priority: Environment Variables > Config File
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("REPORTER_CONFIG_FILE").unwrap_or_else(|_| "reporter.toml".to_string());

        if !Path::new(&config_path).exists() {
            bail!(
                "configuration file not found at {} (set REPORTER_CONFIG_FILE)",
                config_path
            );
        }
        tracing::info!("Loading configuration from: {}", config_path);
        let mut config = Self::from_file(&config_path)?;

        // Environment variables override file config for the run-level knobs.
        if let Ok(threshold) = std::env::var("REPORTER_ALERT_THRESHOLD_MINUTES") {
            config.analysis.alert.threshold_minutes = Some(
                threshold
                    .parse()
                    .context("REPORTER_ALERT_THRESHOLD_MINUTES must be a number")?,
            );
        }

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let config: ReporterConfig =
            toml::from_str(&contents).with_context(|| format!("invalid TOML in {}", path))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ReporterConfig::default();
        assert_eq!(cfg.default_category, EventCategory::Neutral);
        assert!(cfg.rules.is_empty());
        assert!(cfg.analysis.alert.threshold_minutes.is_none());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            default_category = "failure"

            [[rules]]
            pattern = "starting speed"
            category = "repair"

            [[rules]]
            pattern = "W05"
            category = "failure"

            [analysis.pairing]
            max_repair_minutes = 480.0

            [analysis.alert]
            threshold_minutes = 60.0
        "#;
        let cfg: ReporterConfig = toml::from_str(toml_str).expect("Should parse reporter TOML");

        assert_eq!(cfg.default_category, EventCategory::Failure);
        assert_eq!(cfg.rules.len(), 2);
        assert_eq!(cfg.rules[0].pattern, "starting speed");
        assert_eq!(cfg.rules[0].category, EventCategory::Repair);
        assert_eq!(cfg.analysis.pairing.max_repair_minutes, 480.0);
        assert_eq!(cfg.analysis.alert.threshold_minutes, Some(60.0));
    }

    #[test]
    fn test_rule_order_preserved() {
        let toml_str = r#"
            [[rules]]
            pattern = "a"
            category = "failure"

            [[rules]]
            pattern = "b"
            category = "repair"

            [[rules]]
            pattern = "c"
            category = "neutral"
        "#;
        let cfg: ReporterConfig = toml::from_str(toml_str).unwrap();
        let patterns: Vec<&str> = cfg.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
            [[rules]]
            pattern = "break"
            category = "failure"
        "#;
        let cfg: ReporterConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.default_category, EventCategory::Neutral);
        assert_eq!(cfg.analysis.pairing.max_repair_minutes, 1440.0);
    }
}
