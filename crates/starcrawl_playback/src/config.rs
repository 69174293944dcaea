// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timing configuration.
//!
//! Holds the baseline phase durations, the reduced-motion fallbacks, the
//! crawl travel range and the polling cadence. Stored as RON.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current timing config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Phase durations, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseSeconds {
    /// Opening caption
    pub opening_text_secs: f64,
    /// Receding logo
    pub logo_secs: f64,
    /// Scrolling crawl
    pub crawl_secs: f64,
}

impl PhaseSeconds {
    /// Cinematic defaults
    pub const STANDARD: PhaseSeconds = PhaseSeconds {
        opening_text_secs: 6.0,
        logo_secs: 8.0,
        crawl_secs: 45.0,
    };

    /// Short fixed values used when reduced motion is requested
    pub const REDUCED_MOTION: PhaseSeconds = PhaseSeconds {
        opening_text_secs: 1.0,
        logo_secs: 1.0,
        crawl_secs: 5.0,
    };

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("opening_text_secs", self.opening_text_secs),
            ("logo_secs", self.logo_secs),
            ("crawl_secs", self.crawl_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be a finite, non-negative number of seconds",
                });
            }
        }
        Ok(())
    }
}

/// Playback timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Format version
    pub version: u32,
    /// Baseline phase durations
    pub phases: PhaseSeconds,
    /// Durations used under reduced motion
    pub reduced_motion: PhaseSeconds,
    /// How long before the end of the logo phase the crawl is cued
    pub preroll_secs: f64,
    /// Progress polling cadence
    pub poll_interval_ms: f64,
    /// Crawl offset at progress 0 (percent)
    pub crawl_start_y: f64,
    /// Crawl offset at progress 1 (percent)
    pub crawl_end_y: f64,
    /// Crawl progress at which the fade-out begins
    pub fade_start: f64,
    /// Normalized seek values at or below this snap to the start
    pub seek_start_epsilon: f64,
    /// Seek times (seconds) below this snap to the start
    pub seek_start_min_secs: f64,
    /// Keyboard skip step (seconds)
    pub skip_secs: f64,
    /// Idle delay before playback controls hide
    pub controls_hide_ms: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            phases: PhaseSeconds::STANDARD,
            reduced_motion: PhaseSeconds::REDUCED_MOTION,
            preroll_secs: 3.0,
            poll_interval_ms: 100.0,
            crawl_start_y: 100.0,
            crawl_end_y: -200.0,
            fade_start: 0.7,
            seek_start_epsilon: 0.001,
            seek_start_min_secs: 0.1,
            skip_secs: 5.0,
            controls_hide_ms: 3000.0,
        }
    }
}

impl TimingConfig {
    /// Default config with custom baseline phase durations
    pub fn with_phases(opening_text_secs: f64, logo_secs: f64, crawl_secs: f64) -> Self {
        Self {
            phases: PhaseSeconds {
                opening_text_secs,
                logo_secs,
                crawl_secs,
            },
            ..Self::default()
        }
    }

    /// Check every field for usable values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::Invalid {
                field: "version",
                reason: "is newer than this build supports",
            });
        }
        self.phases.validate()?;
        self.reduced_motion.validate()?;

        if !self.preroll_secs.is_finite() || self.preroll_secs < 0.0 {
            return Err(ConfigError::Invalid {
                field: "preroll_secs",
                reason: "must be a finite, non-negative number of seconds",
            });
        }
        if !self.poll_interval_ms.is_finite() || self.poll_interval_ms <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms",
                reason: "must be positive",
            });
        }
        if !(0.0..1.0).contains(&self.fade_start) {
            return Err(ConfigError::Invalid {
                field: "fade_start",
                reason: "must lie in [0, 1)",
            });
        }
        if !self.crawl_start_y.is_finite() || !self.crawl_end_y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "crawl_start_y",
                reason: "crawl offsets must be finite",
            });
        }
        if !self.skip_secs.is_finite() || self.skip_secs <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "skip_secs",
                reason: "must be positive",
            });
        }
        if !self.controls_hide_ms.is_finite() || self.controls_hide_ms < 0.0 {
            return Err(ConfigError::Invalid {
                field: "controls_hide_ms",
                reason: "must be a finite, non-negative number of milliseconds",
            });
        }
        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: TimingConfig = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default().struct_names(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Load from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

/// Host environment preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Environment {
    /// User asked for reduced motion
    pub reduced_motion: bool,
    /// Primary pointer is precise (mouse/trackpad) rather than touch
    pub fine_pointer: bool,
}
