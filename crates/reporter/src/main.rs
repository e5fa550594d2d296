//! Batch reporter: event log in, JSON reliability report out.
//!
//! All I/O lives here; the engine itself never touches the file system.
//! Diagnostics go to stderr via tracing so stdout stays machine-readable.

mod config;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use engine::classify::RuleTable;
use engine::run::analyze;

use config::ReporterConfig;

fn main() -> Result<()> {
    init_logging();

    let log_path = std::env::args()
        .nth(1)
        .context("usage: reporter <event-log-file>")?;

    let config = ReporterConfig::load()?;
    let rules = RuleTable::compile(config.rules.clone(), config.default_category)
        .context("failed to compile classification rule table")?;
    tracing::info!(rules = rules.len(), "Compiled classification rule table");

    let input = std::fs::read_to_string(&log_path)
        .with_context(|| format!("failed to read event log {}", log_path))?;

    let report = analyze(&input, &rules, &config.analysis)?;
    tracing::info!(
        failures = report.failure_count,
        unresolved = report.unresolved_failure_count,
        skipped_lines = report.skipped_line_count,
        alerts = report.alerts.len(),
        "Analysis complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initialise the tracing / logging subsystem. Events go to stderr so the
/// report on stdout can be piped untouched.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reporter=info,engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
