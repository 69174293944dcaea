// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phase transition driver.
//!
//! Advances opening text → logo → crawl from the phase timeline. While the
//! logo recedes, a second timer cues the crawl a few seconds before the logo
//! phase ends. Once the crawl is cued in the crawl phase, timing belongs to
//! the crawl driver and this driver stays idle.

use crate::clock::{Timeline, Timestamp};
use crate::session::Session;
use crate::state::{Phase, PlaybackAction};
use crate::timer::{earliest, Timer};
use crate::tween::TweenControl;

/// Owns the phase-advance and crawl pre-roll timers
#[derive(Debug, Default)]
pub(crate) struct PhaseDriver {
    advance: Timer,
    preroll: Timer,
}

impl PhaseDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both timers
    pub fn cancel(&mut self) {
        self.advance.clear();
        self.preroll.clear();
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        earliest([self.advance.due(), self.preroll.due()])
    }

    pub fn pause<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        self.cancel();
        s.timing.phase.pause(now);
    }

    pub fn resume<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        let pause_ms = s.timing.phase.resume(now);
        if pause_ms > 0.0 {
            tracing::debug!(session = %s.id, pause_ms, "Phase clock resumed");
        }
        self.sync(s, now);
    }

    /// Re-derive both timers from the phase timeline.
    ///
    /// Always clears first, so a timer armed for an earlier state can never
    /// outlive it.
    pub fn sync<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) {
        self.cancel();
        if !s.playing {
            return;
        }
        let phase = s.state.phase;
        if phase == Phase::Crawl && s.state.crawl_started {
            return;
        }

        if !s.timing.phase.is_started() {
            s.timing.phase.start(now);
            if s.paused {
                s.timing.phase.pause(now);
            }
        }
        if !s.is_running() {
            return;
        }

        if phase == Phase::Crawl {
            // Crawl phase reached without a cue; the crawl driver picks it up
            return;
        }

        // Deadlines may lie in the past after a late tick; firing then
        // starts the next phase at the missed deadline.
        let elapsed = s.position(Timeline::Phase, now);
        let remaining = s.durations.of(phase) - elapsed;
        self.advance.arm(now + s.wall_ms(remaining));

        if phase == Phase::Logo && !s.state.crawl_started {
            let lead = (remaining - s.config.preroll_secs).max(-elapsed);
            self.preroll.arm(now + s.wall_ms(lead));
        }
    }

    /// Fire the earliest due timer, if any. Returns whether one fired.
    ///
    /// The next phase's clock starts at the timer's deadline rather than at
    /// `now`, so a late tick does not push later phases back.
    pub fn fire_next<T: TweenControl>(&mut self, s: &mut Session<T>, now: Timestamp) -> bool {
        let preroll_first = match (self.preroll.due(), self.advance.due()) {
            (Some(preroll), Some(advance)) => preroll <= advance,
            (Some(_), None) => true,
            _ => false,
        };

        if preroll_first {
            let Some(at) = self.preroll.take_due(now) else {
                return false;
            };
            tracing::debug!(session = %s.id, at = at.as_secs(), "Crawl pre-roll cued");
            s.dispatch(PlaybackAction::StartCrawl);
            s.cue_crawl(at);
            return true;
        }

        let Some(at) = self.advance.take_due(now) else {
            return false;
        };
        if let Some(next) = s.state.phase.next() {
            s.set_phase(next);
            s.timing.phase.start(at);
        }
        true
    }
}
