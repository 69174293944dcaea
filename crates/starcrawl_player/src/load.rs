// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loading content, scripts and timing configuration from disk.

use crate::error::{PlayerError, Result};
use serde::de::DeserializeOwned;
use starcrawl_playback::TimingConfig;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Ron,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| PlayerError::UnsupportedFormat("No extension".to_string()))?;

        match ext.as_str() {
            "json" => Ok(Self::Json),
            "ron" => Ok(Self::Ron),
            _ => Err(PlayerError::UnsupportedFormat(ext)),
        }
    }
}

/// Parse a document already read from `path`
pub fn parse_document<T: DeserializeOwned>(path: &Path, text: &str) -> Result<T> {
    match Format::from_path(path)? {
        Format::Json => serde_json::from_str(text).map_err(|source| PlayerError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Format::Ron => ron::from_str(text).map_err(|source| PlayerError::Ron {
            path: path.to_path_buf(),
            source,
        }),
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PlayerError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Read and parse a JSON or RON document
pub async fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = read_text(path).await?;
    parse_document(path, &text)
}

/// Read and validate a RON timing config
pub async fn load_config(path: &Path) -> Result<TimingConfig> {
    let text = read_text(path).await?;
    Ok(TimingConfig::from_ron(&text)?)
}

/// Write the default timing config as RON
pub async fn write_default_config(path: &Path) -> Result<()> {
    let text = TimingConfig::default().to_ron()?;
    tokio::fs::write(path, text)
        .await
        .map_err(|source| PlayerError::Io {
            path: path.to_path_buf(),
            source,
        })
}
