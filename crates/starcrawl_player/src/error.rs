// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player errors.

use starcrawl_playback::{ConfigError, PlaybackError};
use std::path::PathBuf;
use thiserror::Error;

/// Anything that stops the player from running
#[derive(Debug, Error)]
pub enum PlayerError {
    /// A file could not be read or written
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File extension is neither JSON nor RON
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Malformed JSON document
    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Malformed RON document
    #[error("Invalid RON in {}: {source}", path.display())]
    Ron {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ron::error::SpannedError,
    },

    /// Timing configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Host input rejected by the engine
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// A script step cannot be run
    #[error("Invalid script step {index}: {reason}")]
    Script {
        /// Position of the step in the script
        index: usize,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Frame interval must be finite and positive
    #[error("Invalid frame interval: {0} ms")]
    InvalidFrameInterval(f64),

    /// The async runtime could not be created
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Result type for the player
pub type Result<T> = std::result::Result<T, PlayerError>;
