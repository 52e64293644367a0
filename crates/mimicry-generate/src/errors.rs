use mimicry_config::ConfigurationError;
use thiserror::Error;

/// Errors emitted by the generation engine.
///
/// Only fatal problems surface here; recoverable anomalies end up in the
/// [`GenerationReport`](crate::model::GenerationReport) instead.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
