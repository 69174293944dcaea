// SPDX-License-Identifier: MIT OR Apache-2.0
//! Wall-clock bookkeeping for the three playback timelines.
//!
//! Every timeline keeps a start timestamp, the milliseconds spent paused so
//! far, and the start of the pause in progress (if any). Elapsed time is
//! always recomputed from those three values at read time:
//!
//! `elapsed = now - start - paused - (now - pause_start)`

use crate::state::CompletionGuard;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A wall-clock instant in milliseconds, measured from an arbitrary origin
/// chosen by the host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
    /// The scheduler origin
    pub const ZERO: Timestamp = Timestamp(0.0);

    /// Create a timestamp from milliseconds
    pub fn from_millis(millis: f64) -> Self {
        Self(millis)
    }

    /// Create a timestamp from seconds
    pub fn from_secs(secs: f64) -> Self {
        Self(secs * 1000.0)
    }

    /// Milliseconds since the origin
    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Seconds since the origin
    pub fn as_secs(self) -> f64 {
        self.0 / 1000.0
    }

    /// Offset by a number of seconds
    pub fn after_secs(self, secs: f64) -> Self {
        Self(self.0 + secs * 1000.0)
    }

    /// Offset backwards by a number of seconds
    pub fn before_secs(self, secs: f64) -> Self {
        Self(self.0 - secs * 1000.0)
    }

    /// The earlier of two timestamps
    pub fn min(self, other: Self) -> Self {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }
}

impl Add<f64> for Timestamp {
    type Output = Timestamp;

    fn add(self, millis: f64) -> Timestamp {
        Timestamp(self.0 + millis)
    }
}

impl Sub for Timestamp {
    type Output = f64;

    /// Milliseconds between two timestamps
    fn sub(self, rhs: Timestamp) -> f64 {
        self.0 - rhs.0
    }
}

/// Identifies one of the three tracked timelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeline {
    /// Whole sequence, all phases
    Overall,
    /// The current phase only
    Phase,
    /// The crawl tween
    Crawl,
}

/// Pause-aware clock for a single timeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimingRef {
    start: Option<Timestamp>,
    paused_ms: f64,
    pause_start: Option<Timestamp>,
}

impl TimingRef {
    /// Start (or restart) the timeline at `now`, running
    pub fn start(&mut self, now: Timestamp) {
        self.start = Some(now);
        self.paused_ms = 0.0;
        self.pause_start = None;
    }

    /// Forget the timeline entirely
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether the timeline has a start reference
    pub fn is_started(&self) -> bool {
        self.start.is_some()
    }

    /// Whether a pause is in progress
    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    /// Start timestamp, if started
    pub fn start_time(&self) -> Option<Timestamp> {
        self.start
    }

    /// Milliseconds accumulated by completed pauses
    pub fn paused_ms(&self) -> f64 {
        self.paused_ms
    }

    /// Begin a pause. Repeated calls keep the first pause start.
    pub fn pause(&mut self, now: Timestamp) {
        if self.start.is_some() && self.pause_start.is_none() {
            self.pause_start = Some(now);
        }
    }

    /// End the pause in progress, folding its length into the paused total.
    ///
    /// Returns the length of the pause that ended, in milliseconds.
    pub fn resume(&mut self, now: Timestamp) -> f64 {
        match self.pause_start.take() {
            Some(pause_start) => {
                let pause = (now - pause_start).max(0.0);
                self.paused_ms += pause;
                pause
            }
            None => 0.0,
        }
    }

    /// Milliseconds of running time net of every pause
    pub fn elapsed_ms(&self, now: Timestamp) -> f64 {
        let Some(start) = self.start else {
            return 0.0;
        };
        let current_pause = self.pause_start.map_or(0.0, |p| now - p);
        (now - start - self.paused_ms - current_pause).max(0.0)
    }

    /// Rewrite the reference so that it reads `elapsed_ms` at `now`.
    ///
    /// When `paused` is set the timeline is left frozen at that value until
    /// the next [`resume`](Self::resume).
    pub fn rebase(&mut self, now: Timestamp, elapsed_ms: f64, paused: bool) {
        self.start = Some(Timestamp::from_millis(now.as_millis() - elapsed_ms.max(0.0)));
        self.paused_ms = 0.0;
        self.pause_start = paused.then_some(now);
    }
}

/// Owned timing context shared by every driver.
///
/// Only the engine writes to it; drivers receive it by reference.
#[derive(Debug, Clone, Default)]
pub struct TimingContext {
    /// Whole-sequence timeline
    pub overall: TimingRef,
    /// Current phase timeline
    pub phase: TimingRef,
    /// Crawl tween timeline
    pub crawl: TimingRef,
    /// Last computed crawl progress in `[0, 1]`
    pub crawl_progress: f64,
    /// One-shot completion guard
    pub completion: CompletionGuard,
}

impl TimingContext {
    /// Timeline accessor
    pub fn timeline(&self, timeline: Timeline) -> &TimingRef {
        match timeline {
            Timeline::Overall => &self.overall,
            Timeline::Phase => &self.phase,
            Timeline::Crawl => &self.crawl,
        }
    }

    /// Mutable timeline accessor
    pub fn timeline_mut(&mut self, timeline: Timeline) -> &mut TimingRef {
        match timeline {
            Timeline::Overall => &mut self.overall,
            Timeline::Phase => &mut self.phase,
            Timeline::Crawl => &mut self.crawl,
        }
    }

    /// Pause every started timeline
    pub fn pause_all(&mut self, now: Timestamp) {
        self.overall.pause(now);
        self.phase.pause(now);
        self.crawl.pause(now);
    }

    /// Clear all refs, the stored progress and the completion guard
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rescale every started timeline after a playback-speed change.
    ///
    /// Each timeline keeps its normalized position; only the wall-clock
    /// reference is recomputed from that position at the new rate.
    pub fn rescale(&mut self, now: Timestamp, old_rate: f64, new_rate: f64) {
        for timeline in [Timeline::Overall, Timeline::Phase, Timeline::Crawl] {
            let timing = self.timeline_mut(timeline);
            if !timing.is_started() {
                continue;
            }
            let content_ms = timing.elapsed_ms(now) * old_rate;
            let paused = timing.is_paused();
            timing.rebase(now, content_ms / new_rate, paused);
        }
    }
}

/// `num / den` clamped to `[0, 1]`, treating an empty denominator as done.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 || !den.is_finite() {
        return 1.0;
    }
    (num / den).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: f64) -> Timestamp {
        Timestamp::from_millis(v)
    }

    #[test]
    fn test_unstarted_ref_reads_zero() {
        let timing = TimingRef::default();
        assert_eq!(timing.elapsed_ms(ms(5_000.0)), 0.0);
        assert!(!timing.is_started());
    }

    #[test]
    fn test_elapsed_excludes_completed_and_current_pauses() {
        let mut timing = TimingRef::default();
        timing.start(ms(1_000.0));
        timing.pause(ms(3_000.0));
        // Frozen while paused
        assert_eq!(timing.elapsed_ms(ms(3_000.0)), 2_000.0);
        assert_eq!(timing.elapsed_ms(ms(9_000.0)), 2_000.0);

        assert_eq!(timing.resume(ms(10_000.0)), 7_000.0);
        assert_eq!(timing.paused_ms(), 7_000.0);
        assert_eq!(timing.elapsed_ms(ms(11_000.0)), 3_000.0);
    }

    #[test]
    fn test_repeated_pause_keeps_first_start() {
        let mut timing = TimingRef::default();
        timing.start(ms(0.0));
        timing.pause(ms(1_000.0));
        timing.pause(ms(4_000.0));
        timing.resume(ms(5_000.0));
        assert_eq!(timing.elapsed_ms(ms(5_000.0)), 1_000.0);
    }

    #[test]
    fn test_resume_without_pause_is_noop() {
        let mut timing = TimingRef::default();
        timing.start(ms(0.0));
        assert_eq!(timing.resume(ms(2_000.0)), 0.0);
        assert_eq!(timing.elapsed_ms(ms(2_000.0)), 2_000.0);
    }

    #[test]
    fn test_rebase_running_and_paused() {
        let mut timing = TimingRef::default();
        timing.rebase(ms(10_000.0), 4_000.0, false);
        assert_eq!(timing.elapsed_ms(ms(10_000.0)), 4_000.0);
        assert_eq!(timing.elapsed_ms(ms(11_000.0)), 5_000.0);

        timing.rebase(ms(20_000.0), 1_500.0, true);
        assert!(timing.is_paused());
        assert_eq!(timing.elapsed_ms(ms(25_000.0)), 1_500.0);
        timing.resume(ms(25_000.0));
        assert_eq!(timing.elapsed_ms(ms(26_000.0)), 2_500.0);
    }

    #[test]
    fn test_rescale_keeps_content_position() {
        let mut ctx = TimingContext::default();
        ctx.crawl.start(ms(0.0));
        // 10s of wall time at 1x is 10s of content
        ctx.rescale(ms(10_000.0), 1.0, 2.0);
        // At 2x the same content position is 5s of wall time
        assert_eq!(ctx.crawl.elapsed_ms(ms(10_000.0)), 5_000.0);
        assert!(!ctx.overall.is_started());
    }

    #[test]
    fn test_ratio_handles_empty_denominator() {
        assert_eq!(ratio(3.0, 0.0), 1.0);
        assert_eq!(ratio(3.0, 6.0), 0.5);
        assert_eq!(ratio(-1.0, 6.0), 0.0);
        assert_eq!(ratio(9.0, 6.0), 1.0);
    }
}
