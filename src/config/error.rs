//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Call depth limit must be at least 1")]
    InvalidCallDepth,

    #[error("Step iteration limit must be at least 1")]
    InvalidIterationLimit,

    #[error("Session timeout must be at least 1 second")]
    InvalidSessionTimeout,

    #[error("Cleanup interval must be at least 1 second")]
    InvalidCleanupInterval,
}
