//! Conf module — analysis configuration model and validation.

pub mod model;

pub use model::{
    AlertConfig, AnalysisConfig, CompositeConfig, PairingConfig, ParserConfig, WindowConfig,
};
