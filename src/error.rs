//! Error types for Mindpulse
//!
//! Scoring itself is total and never returns an error. These variants cover the
//! boundaries around it: parsing device JSON, loading configuration and history,
//! and encoding snapshots.

use thiserror::Error;

/// Errors that can occur outside the scoring core
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
