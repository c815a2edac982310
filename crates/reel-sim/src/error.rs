//! Error types for the reel simulation

use thiserror::Error;

/// Simulation error type
///
/// Spin execution itself never fails; only configuration surfaces do.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid win probability: {0} (expected a value in [0, 1])")]
    InvalidProbability(f64),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Operation not allowed while a spin is in progress")]
    SpinInProgress,
}

impl SimError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yml::Error> for SimError {
    fn from(err: serde_yml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias
pub type SimResult<T> = Result<T, SimError>;
