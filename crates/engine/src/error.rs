use thiserror::Error;

/// Construction-time misconfiguration.
///
/// Everything that goes wrong *inside* an analysis run (unparseable lines,
/// implausible pairings, out-of-order intervals) degrades into counters on
/// the report instead of erroring; see the per-stage modules.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("classification rule table is empty")]
    EmptyRuleTable,

    #[error("invalid classification pattern '{pattern}': {message}")]
    InvalidRulePattern { pattern: String, message: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

// Convenience type alias
pub type EngineResult<T> = Result<T, EngineError>;
