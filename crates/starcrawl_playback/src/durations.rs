// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phase durations and playback speed.
//!
//! Durations are kept at their baseline (speed 1) values so that progress
//! fractions do not move when the speed changes. Wall-clock lengths are
//! derived on demand through [`PlaybackSpeed`].

use crate::config::{Environment, TimingConfig};
use crate::error::{PlaybackError, Result};
use crate::state::Phase;
use serde::{Deserialize, Serialize};

/// Speed multiplier applied to wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// Normal speed
    pub const NORMAL: PlaybackSpeed = PlaybackSpeed(1.0);

    /// Create a speed multiplier, rejecting non-finite or non-positive values
    pub fn new(factor: f64) -> Result<Self> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(PlaybackError::InvalidSpeed(factor))
        }
    }

    /// Raw multiplier
    pub fn factor(self) -> f64 {
        self.0
    }

    /// Wall-clock seconds needed to play `content_secs` of animation
    pub fn to_wall(self, content_secs: f64) -> f64 {
        content_secs / self.0
    }

    /// Animation seconds played during `wall_secs` of wall-clock time
    pub fn to_content(self, wall_secs: f64) -> f64 {
        wall_secs * self.0
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Baseline duration of each phase plus their sum, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Durations {
    /// Opening caption
    pub opening_text: f64,
    /// Receding logo
    pub logo: f64,
    /// Scrolling crawl
    pub crawl: f64,
    /// `opening_text + logo + crawl`
    pub total: f64,
}

impl Durations {
    /// Build from the three phase durations
    pub fn new(opening_text: f64, logo: f64, crawl: f64) -> Self {
        Self {
            opening_text,
            logo,
            crawl,
            total: opening_text + logo + crawl,
        }
    }

    /// Resolve the durations for a session.
    ///
    /// Reduced motion collapses every phase to the short fixed values from
    /// the config.
    pub fn resolve(config: &TimingConfig, environment: &Environment) -> Self {
        let phases = if environment.reduced_motion {
            config.reduced_motion
        } else {
            config.phases
        };
        Self::new(phases.opening_text_secs, phases.logo_secs, phases.crawl_secs)
    }

    /// Duration of a single phase
    pub fn of(&self, phase: Phase) -> f64 {
        match phase {
            Phase::OpeningText => self.opening_text,
            Phase::Logo => self.logo,
            Phase::Crawl => self.crawl,
        }
    }

    /// Offset of a phase from the start of the sequence
    pub fn offset_of(&self, phase: Phase) -> f64 {
        match phase {
            Phase::OpeningText => 0.0,
            Phase::Logo => self.opening_text,
            Phase::Crawl => self.opening_text + self.logo,
        }
    }
}

/// Resolve the speed a session will actually run at.
///
/// Reduced motion pins playback to normal speed.
pub fn effective_speed(requested: PlaybackSpeed, environment: &Environment) -> PlaybackSpeed {
    if environment.reduced_motion {
        PlaybackSpeed::NORMAL
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_durations() {
        let durations = Durations::resolve(&TimingConfig::default(), &Environment::default());
        assert_eq!(durations.opening_text, 6.0);
        assert_eq!(durations.logo, 8.0);
        assert_eq!(durations.crawl, 45.0);
        assert_eq!(durations.total, 59.0);
    }

    #[test]
    fn test_reduced_motion_durations() {
        let env = Environment {
            reduced_motion: true,
            ..Environment::default()
        };
        let durations = Durations::resolve(&TimingConfig::default(), &env);
        assert_eq!(durations, Durations::new(1.0, 1.0, 5.0));
        assert_eq!(durations.total, 7.0);
    }

    #[test]
    fn test_phase_offsets() {
        let durations = Durations::new(6.0, 8.0, 5.0);
        assert_eq!(durations.offset_of(Phase::OpeningText), 0.0);
        assert_eq!(durations.offset_of(Phase::Logo), 6.0);
        assert_eq!(durations.offset_of(Phase::Crawl), 14.0);
        assert_eq!(durations.of(Phase::Crawl), 5.0);
    }

    #[test]
    fn test_speed_conversion() {
        let speed = PlaybackSpeed::new(2.0).unwrap();
        assert_eq!(speed.to_wall(45.0), 22.5);
        assert_eq!(speed.to_content(10.0), 20.0);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        assert_eq!(PlaybackSpeed::new(0.0), Err(PlaybackError::InvalidSpeed(0.0)));
        assert!(PlaybackSpeed::new(-1.5).is_err());
        assert!(PlaybackSpeed::new(f64::NAN).is_err());
        assert!(PlaybackSpeed::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_reduced_motion_pins_speed() {
        let fast = PlaybackSpeed::new(3.0).unwrap();
        let env = Environment {
            reduced_motion: true,
            ..Environment::default()
        };
        assert_eq!(effective_speed(fast, &env), PlaybackSpeed::NORMAL);
        assert_eq!(effective_speed(fast, &Environment::default()), fast);
    }
}
