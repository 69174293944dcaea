// SPDX-License-Identifier: MIT OR Apache-2.0
//! Seeking to a normalized position.
//!
//! [`resolve_seek_target`] maps a progress value onto a phase and local
//! progress. [`SeekResolver`] applies it: every timeline is rewritten so that
//! the elapsed values read back match the target, and the crawl is placed on
//! the exact frame for that position.

use crate::clock::Timestamp;
use crate::config::TimingConfig;
use crate::crawl;
use crate::durations::Durations;
use crate::session::{PlaybackEvent, Session};
use crate::state::{Phase, PlaybackAction};
use crate::tween::TweenControl;
use serde::{Deserialize, Serialize};

/// Where a seek lands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeekTarget {
    /// Phase containing the target
    pub phase: Phase,
    /// Progress within that phase in `[0, 1]`
    pub phase_progress: f64,
    /// Crawl progress in `[0, 1]`; zero before the crawl phase
    pub crawl_progress: f64,
    /// Target position in seconds from the start of the sequence
    pub overall_time: f64,
}

impl SeekTarget {
    /// The very start of the sequence
    pub const START: SeekTarget = SeekTarget {
        phase: Phase::OpeningText,
        phase_progress: 0.0,
        crawl_progress: 0.0,
        overall_time: 0.0,
    };
}

/// Map a normalized progress onto phase-local coordinates.
///
/// Values at or below the config's epsilon, or that land within its minimum
/// seek time, snap to the start of the sequence.
pub fn resolve_seek_target(seek_to: f64, durations: &Durations, config: &TimingConfig) -> SeekTarget {
    let seek_time = seek_to * durations.total;
    if seek_to <= config.seek_start_epsilon || seek_time < config.seek_start_min_secs {
        return SeekTarget::START;
    }

    let logo_start = durations.offset_of(Phase::Logo);
    let crawl_start = durations.offset_of(Phase::Crawl);
    let phase = if seek_time < logo_start {
        Phase::OpeningText
    } else if seek_time < crawl_start {
        Phase::Logo
    } else {
        Phase::Crawl
    };

    let local = seek_time - durations.offset_of(phase);
    let phase_progress = crate::clock::ratio(local, durations.of(phase));
    let crawl_progress = if phase == Phase::Crawl {
        phase_progress
    } else {
        0.0
    };

    SeekTarget {
        phase,
        phase_progress,
        crawl_progress,
        overall_time: seek_time,
    }
}

/// Applies seek requests, ignoring repeats of the last value
#[derive(Debug, Default)]
pub(crate) struct SeekResolver {
    last: Option<f64>,
}

impl SeekResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last applied value
    pub fn clear(&mut self) {
        self.last = None;
    }

    /// Apply a seek request. Returns whether anything changed.
    ///
    /// `None`, a value outside `[0, 1]`, or a stopped session clears the
    /// guard without seeking.
    pub fn apply<T: TweenControl>(
        &mut self,
        s: &mut Session<T>,
        seek_to: Option<f64>,
        now: Timestamp,
    ) -> bool {
        let Some(seek_to) = seek_to.filter(|v| (0.0..=1.0).contains(v)) else {
            self.last = None;
            return false;
        };
        if !s.playing {
            self.last = None;
            return false;
        }
        if self.last == Some(seek_to) {
            return false;
        }
        self.last = Some(seek_to);

        let target = resolve_seek_target(seek_to, &s.durations, &s.config);
        tracing::debug!(
            session = %s.id,
            seek_to,
            phase = %target.phase,
            phase_progress = target.phase_progress,
            paused = s.paused,
            "Seek"
        );

        let overall_ms = s.wall_ms(target.overall_time);
        let paused = s.paused;
        s.timing.overall.rebase(now, overall_ms, paused);
        s.timing.completion.reset();
        s.take_crawl_cue();
        s.stop_tween();

        match target.phase {
            Phase::Crawl => seek_crawl(s, &target, now),
            phase => seek_before_crawl(s, phase, &target, now),
        }
        true
    }
}

/// Reset the state machine into `phase`, notifying only on a real change
fn rewind_to<T: TweenControl>(s: &mut Session<T>, phase: Phase) {
    let before = s.state.phase;
    s.dispatch(PlaybackAction::Reset);
    s.dispatch(PlaybackAction::SetPhase(phase));
    if before != phase {
        s.emit(PlaybackEvent::PhaseChanged(phase));
    }
}

fn seek_before_crawl<T: TweenControl>(
    s: &mut Session<T>,
    phase: Phase,
    target: &SeekTarget,
    now: Timestamp,
) {
    rewind_to(s, phase);
    let phase_ms = s.wall_ms(target.phase_progress * s.durations.of(phase));
    let paused = s.paused;
    s.timing.phase.rebase(now, phase_ms, paused);
    s.timing.crawl.clear();
    s.timing.crawl_progress = 0.0;
    let start = s.motion.start_frame();
    s.tween.set(start);
}

fn seek_crawl<T: TweenControl>(s: &mut Session<T>, target: &SeekTarget, now: Timestamp) {
    rewind_to(s, Phase::Crawl);
    s.dispatch(PlaybackAction::StartCrawl);
    s.dispatch(PlaybackAction::StartAnimation);
    s.timing.phase.clear();

    let progress = target.crawl_progress;
    let crawl_ms = s.wall_ms(progress * s.durations.crawl);
    let paused = s.paused;
    s.timing.crawl.rebase(now, crawl_ms, paused);
    s.timing.crawl_progress = progress;
    let frame = s.motion.frame(progress);
    s.tween.set(frame);

    let remaining = s.durations.crawl * (1.0 - progress);
    if remaining <= 0.0 {
        crawl::finish(s, now);
    } else if !paused {
        let end = s.motion.end_frame();
        s.start_tween(end, remaining, now);
    }
}
