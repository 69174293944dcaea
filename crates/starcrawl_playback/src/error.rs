// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types.

use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Failed to parse timing config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization error
    #[error("Failed to serialize timing config: {0}")]
    Serialize(#[from] ron::Error),

    /// A field holds an unusable value
    #[error("Invalid timing config: {field} {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Errors raised by host inputs to the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    /// Speed multiplier must be finite and positive
    #[error("Invalid playback speed: {0}")]
    InvalidSpeed(f64),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
