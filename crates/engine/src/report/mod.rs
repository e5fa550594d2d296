//! Report module — descriptive statistics assembled from the stage outcomes.

pub mod aggregate;
pub mod model;
pub mod trend;

pub use aggregate::build_report;
pub use model::{
    CodeCount, CodeStats, DurationStats, MetricValue, MetricsReport, ReportStatus,
};
pub use trend::TrendDirection;
