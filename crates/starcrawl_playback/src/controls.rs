// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback controls helpers: keyboard shortcuts, relative skips, the
//! progress slider and time labels.

use crate::progress::ProgressInfo;
use serde::{Deserialize, Serialize};

/// Keyboard shortcut recognized during playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    /// Space
    TogglePause,
    /// Left arrow
    SkipBackward,
    /// Right arrow
    SkipForward,
    /// Escape
    Close,
}

impl Shortcut {
    /// Map a key name to a shortcut.
    ///
    /// Keys typed into a text input are never shortcuts.
    pub fn from_key(key: &str, target_is_text_input: bool) -> Option<Self> {
        if target_is_text_input {
            return None;
        }
        match key {
            " " | "Space" | "Spacebar" => Some(Self::TogglePause),
            "ArrowLeft" | "Left" => Some(Self::SkipBackward),
            "ArrowRight" | "Right" => Some(Self::SkipForward),
            "Escape" | "Esc" => Some(Self::Close),
            _ => None,
        }
    }

    /// Skip delta in seconds for skip shortcuts
    pub fn skip_delta(self, skip_secs: f64) -> Option<f64> {
        match self {
            Self::SkipBackward => Some(-skip_secs),
            Self::SkipForward => Some(skip_secs),
            _ => None,
        }
    }
}

/// Progress after skipping `delta_secs` from the current position.
///
/// An empty timeline leaves progress where it is.
pub fn compute_seek_progress(current: f64, elapsed: f64, remaining: f64, delta_secs: f64) -> f64 {
    let total = elapsed + remaining;
    if total <= 0.0 {
        return current;
    }
    (current + delta_secs / total).clamp(0.0, 1.0)
}

/// Seek target for a relative skip, or `None` if the skip goes nowhere
pub fn skip_target(info: &ProgressInfo, delta_secs: f64) -> Option<f64> {
    let target = compute_seek_progress(info.progress, info.elapsed, info.remaining, delta_secs);
    (target != info.progress).then_some(target)
}

/// Value bounds of the progress slider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRange {
    /// Lowest value
    pub min: f64,
    /// Highest value
    pub max: f64,
    /// Snap increment; zero disables snapping
    pub step: f64,
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            step: 0.001,
        }
    }
}

/// Slider value under a pointer at `pointer_x`.
///
/// A track with no width keeps `current`.
pub fn value_from_x(pointer_x: f64, track_left: f64, track_width: f64, range: SliderRange, current: f64) -> f64 {
    if track_width <= 0.0 {
        return current;
    }
    let fraction = ((pointer_x - track_left) / track_width).clamp(0.0, 1.0);
    let raw = range.min + fraction * (range.max - range.min);
    if range.step <= 0.0 {
        return raw;
    }
    let snapped = range.min + ((raw - range.min) / range.step).round() * range.step;
    snapped.clamp(range.min, range.max)
}

/// Format seconds as `M:SS`
pub fn format_time(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total = seconds.abs().floor() as u64;
    format!("{sign}{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!(Shortcut::from_key(" ", false), Some(Shortcut::TogglePause));
        assert_eq!(Shortcut::from_key("ArrowLeft", false), Some(Shortcut::SkipBackward));
        assert_eq!(Shortcut::from_key("Escape", false), Some(Shortcut::Close));
        assert_eq!(Shortcut::from_key("ArrowRight", true), None);
        assert_eq!(Shortcut::from_key("q", false), None);
        assert_eq!(Shortcut::SkipForward.skip_delta(5.0), Some(5.0));
        assert_eq!(Shortcut::Close.skip_delta(5.0), None);
    }

    #[test]
    fn test_seek_progress_clamps() {
        assert!((compute_seek_progress(0.5, 30.0, 30.0, 6.0) - 0.6).abs() < 1e-9);
        assert_eq!(compute_seek_progress(0.02, 1.0, 49.0, -5.0), 0.0);
        assert_eq!(compute_seek_progress(0.98, 49.0, 1.0, 5.0), 1.0);
        assert_eq!(compute_seek_progress(0.3, 0.0, 0.0, 5.0), 0.3);
    }

    #[test]
    fn test_skip_at_boundary_is_noop() {
        let info = ProgressInfo {
            progress: 0.0,
            elapsed: 0.0,
            remaining: 59.0,
            crawl_progress: 0.0,
        };
        assert_eq!(skip_target(&info, -5.0), None);
        assert!(skip_target(&info, 5.0).is_some());
    }

    #[test]
    fn test_zero_width_track_keeps_value() {
        let range = SliderRange::default();
        assert_eq!(value_from_x(250.0, 0.0, 0.0, range, 0.42), 0.42);
    }

    #[test]
    fn test_value_from_x_snaps_to_step() {
        let range = SliderRange {
            min: 0.0,
            max: 1.0,
            step: 0.25,
        };
        assert_eq!(value_from_x(60.0, 10.0, 100.0, range, 0.0), 0.5);
        assert_eq!(value_from_x(-50.0, 10.0, 100.0, range, 0.7), 0.0);
        assert_eq!(value_from_x(500.0, 10.0, 100.0, range, 0.0), 1.0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(59.9), "0:59");
        assert_eq!(format_time(125.0), "2:05");
        assert_eq!(format_time(-7.5), "-0:07");
    }
}
