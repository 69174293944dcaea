// SPDX-License-Identifier: MIT OR Apache-2.0
//! Periodic progress reporting.
//!
//! While playback runs, a fixed-period poll reads the overall timeline and
//! notifies the host. During the crawl it also pushes the faded opacity to
//! the renderer. The poll never declares completion.

use crate::clock::Timestamp;
use crate::session::{PlaybackEvent, Session};
use crate::timer::Interval;
use crate::tween::{TweenControl, TweenValues};
use serde::{Deserialize, Serialize};

/// Snapshot of playback progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// Overall progress in `[0, 1]`
    pub progress: f64,
    /// Seconds played, capped at the total
    pub elapsed: f64,
    /// Seconds left, never negative
    pub remaining: f64,
    /// Crawl progress in `[0, 1]`
    pub crawl_progress: f64,
}

/// Owns the overall timeline and the progress poll
#[derive(Debug)]
pub(crate) struct ProgressReporter {
    interval: Interval,
}

impl ProgressReporter {
    pub fn new(period_ms: f64) -> Self {
        Self {
            interval: Interval::new(period_ms),
        }
    }

    /// Start the overall timeline for a fresh run
    pub fn start<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        self.interval.clear();
        s.timing.overall.start(now);
        self.sync(s, now);
    }

    pub fn stop(&mut self) {
        self.interval.clear();
    }

    pub fn pause<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        self.interval.clear();
        s.timing.overall.pause(now);
    }

    pub fn resume<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        s.timing.overall.resume(now);
        self.sync(s, now);
    }

    /// Run the poll exactly while playback is running
    pub fn sync<T: TweenControl>(&mut self, s: &Session<T>, now: Timestamp) {
        if s.is_running() && s.timing.overall.is_started() {
            self.interval.ensure_armed(now);
        } else {
            self.interval.clear();
        }
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.interval.due()
    }

    /// Report progress if a poll period has elapsed
    pub fn poll<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        if !self.interval.poll(now) {
            return;
        }
        if !s.is_running() {
            self.interval.clear();
            return;
        }

        let info = s.progress_info(now);
        if info.remaining <= 0.0 {
            self.interval.clear();
            return;
        }

        if s.state.animation_started && s.timing.crawl.is_started() {
            s.timing.crawl_progress = info.crawl_progress;
            let opacity = s.motion.opacity(info.crawl_progress);
            s.tween.set(TweenValues::opacity(opacity));
        }

        tracing::trace!(
            session = %s.id,
            progress = info.progress,
            elapsed = info.elapsed,
            remaining = info.remaining,
            "Progress poll"
        );
        s.emit(PlaybackEvent::ProgressChanged {
            progress: info.progress,
            elapsed: info.elapsed,
            remaining: info.remaining,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, TimingConfig};
    use crate::state::PlaybackAction;
    use crate::testing::RecordingTween;

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    fn session() -> Session<RecordingTween> {
        let mut s = Session::new(
            TimingConfig::with_phases(1.0, 1.0, 2.0),
            Environment::default(),
            RecordingTween::default(),
        );
        s.playing = true;
        s
    }

    #[test]
    fn test_polls_every_period() {
        let mut s = session();
        let mut reporter = ProgressReporter::new(100.0);
        reporter.start(&mut s, ms(0.0));
        assert_eq!(reporter.next_deadline(), Some(ms(100.0)));

        reporter.poll(&mut s, ms(50.0));
        assert!(s.take_events().is_empty());

        reporter.poll(&mut s, ms(100.0));
        let events = s.take_events();
        assert_eq!(events.len(), 1);
        let PlaybackEvent::ProgressChanged { progress, elapsed, remaining } = events[0] else {
            panic!("expected progress event");
        };
        assert!((progress - 0.025).abs() < 1e-9);
        assert!((elapsed - 0.1).abs() < 1e-9);
        assert!((remaining - 3.9).abs() < 1e-9);
    }

    #[test]
    fn test_paused_reporter_is_silent() {
        let mut s = session();
        let mut reporter = ProgressReporter::new(100.0);
        reporter.start(&mut s, ms(0.0));

        s.paused = true;
        reporter.pause(&mut s, ms(50.0));
        assert_eq!(reporter.next_deadline(), None);
        reporter.poll(&mut s, ms(500.0));
        assert!(s.take_events().is_empty());

        s.paused = false;
        reporter.resume(&mut s, ms(1_050.0));
        assert_eq!(reporter.next_deadline(), Some(ms(1_150.0)));
        reporter.poll(&mut s, ms(1_150.0));
        let events = s.take_events();
        let PlaybackEvent::ProgressChanged { elapsed, .. } = events[0] else {
            panic!("expected progress event");
        };
        assert!((elapsed - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_crawl_opacity_follows_fade() {
        let mut s = session();
        let mut reporter = ProgressReporter::new(100.0);
        reporter.start(&mut s, ms(0.0));
        s.dispatch(PlaybackAction::SetPhase(crate::state::Phase::Crawl));
        s.dispatch(PlaybackAction::StartAnimation);
        s.timing.crawl.start(ms(0.0));

        // 1.7s into a 2s crawl: progress 0.85, halfway through the fade
        reporter.interval.clear();
        reporter.interval.ensure_armed(ms(1_600.0));
        reporter.poll(&mut s, ms(1_700.0));
        assert!((s.tween.opacity.unwrap() - 0.5).abs() < 1e-9);
        assert!((s.timing.crawl_progress - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_stops_when_nothing_remains() {
        let mut s = session();
        let mut reporter = ProgressReporter::new(100.0);
        reporter.start(&mut s, ms(0.0));
        reporter.interval.clear();
        reporter.interval.ensure_armed(ms(4_000.0));
        reporter.poll(&mut s, ms(4_100.0));
        assert!(s.take_events().is_empty());
        assert_eq!(reporter.next_deadline(), None);
    }

    #[test]
    fn test_never_completes() {
        let mut s = session();
        let mut reporter = ProgressReporter::new(100.0);
        reporter.start(&mut s, ms(0.0));
        reporter.poll(&mut s, ms(3_999.0));
        assert!(!s.state.is_complete);
        assert!(!s.timing.completion.has_fired());
    }
}
