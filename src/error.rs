//! Error types for configuration loading and the simulation driver.

use thiserror::Error;

/// Errors raised while loading, saving or validating a [`Config`](crate::Config)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while driving the simulation loop
#[derive(Debug, Error)]
pub enum SimError {
    /// A tick failed once the restart budget was spent
    #[error("tick {tick} failed: {message}")]
    TickPanicked { tick: u64, message: String },
    /// The first tick after a restart failed again
    #[error("restart after tick {tick} failed")]
    RestartFailed { tick: u64 },
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
