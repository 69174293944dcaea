// SPDX-License-Identifier: MIT OR Apache-2.0
//! Crawl position and fade formulas.
//!
//! Natural playback, resume, seek and the progress poll all derive the crawl's
//! offset and opacity from these functions, so a given crawl progress always
//! renders the same way regardless of how it was reached.

use crate::config::TimingConfig;
use crate::tween::TweenValues;

/// Crawl progress at which the fade-out ends
pub const FADE_END: f64 = 1.0;

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Vertical offset for a crawl progress
pub fn y_position(start_y: f64, end_y: f64, progress: f64) -> f64 {
    lerp(start_y, end_y, progress)
}

/// Opacity for a crawl progress: fully opaque until `fade_start`, then a
/// linear fade to zero at the end.
pub fn opacity(fade_start: f64, progress: f64) -> f64 {
    if progress < fade_start {
        return 1.0;
    }
    let fade = (progress - fade_start) / (FADE_END - fade_start);
    (1.0 - fade).max(0.0)
}

/// Crawl travel range and fade point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlMotion {
    /// Offset at progress 0
    pub start_y: f64,
    /// Offset at progress 1
    pub end_y: f64,
    /// Progress at which the fade begins
    pub fade_start: f64,
}

impl CrawlMotion {
    /// Read the motion parameters from a config
    pub fn from_config(config: &TimingConfig) -> Self {
        Self {
            start_y: config.crawl_start_y,
            end_y: config.crawl_end_y,
            fade_start: config.fade_start,
        }
    }

    /// Offset at `progress`
    pub fn y(&self, progress: f64) -> f64 {
        y_position(self.start_y, self.end_y, progress)
    }

    /// Opacity at `progress`
    pub fn opacity(&self, progress: f64) -> f64 {
        opacity(self.fade_start, progress)
    }

    /// Offset and opacity at `progress`
    pub fn frame(&self, progress: f64) -> TweenValues {
        TweenValues::both(self.y(progress), self.opacity(progress))
    }

    /// Parked position before the crawl starts
    pub fn start_frame(&self) -> TweenValues {
        TweenValues::both(self.start_y, 1.0)
    }

    /// Final offset and opacity
    pub fn end_frame(&self) -> TweenValues {
        self.frame(1.0)
    }
}

impl Default for CrawlMotion {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_y_position_endpoints() {
        let motion = CrawlMotion::default();
        assert_eq!(motion.y(0.0), 100.0);
        assert_eq!(motion.y(1.0), -200.0);
        assert!((motion.y(0.5) - -50.0).abs() < EPS);
    }

    #[test]
    fn test_opacity_holds_then_fades() {
        assert_eq!(opacity(0.7, 0.0), 1.0);
        assert_eq!(opacity(0.7, 0.69), 1.0);
        assert!((opacity(0.7, 0.7) - 1.0).abs() < EPS);
        assert!((opacity(0.7, 0.85) - 0.5).abs() < EPS);
        assert!(opacity(0.7, 1.0).abs() < EPS);
        assert_eq!(opacity(0.7, 1.5), 0.0);
    }

    #[test]
    fn test_frames() {
        let motion = CrawlMotion::default();
        assert_eq!(motion.start_frame(), TweenValues::both(100.0, 1.0));
        let end = motion.end_frame();
        assert_eq!(end.y, Some(-200.0));
        assert!(end.opacity.unwrap().abs() < EPS);
    }
}
