// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback session context.
//!
//! A [`Session`] is the single-writer context handed by reference to every
//! driver: resolved durations, host flags, the state machine, the timing
//! refs, the tween control and the outgoing event queue.

use crate::clock::{ratio, Timeline, Timestamp, TimingContext};
use crate::config::{Environment, TimingConfig};
use crate::durations::{effective_speed, Durations, PlaybackSpeed};
use crate::motion::CrawlMotion;
use crate::progress::ProgressInfo;
use crate::state::{Phase, PlaybackAction, PlaybackState};
use crate::tween::{Transition, TweenControl, TweenId, TweenValues};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification raised to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// The phase changed
    PhaseChanged(Phase),
    /// Periodic progress report
    ProgressChanged {
        /// Overall progress in `[0, 1]`
        progress: f64,
        /// Seconds played
        elapsed: f64,
        /// Seconds left
        remaining: f64,
    },
    /// The sequence finished
    Completed,
}

/// Shared driver context
pub(crate) struct Session<T> {
    pub id: SessionId,
    pub config: TimingConfig,
    pub environment: Environment,
    pub motion: CrawlMotion,
    pub durations: Durations,
    pub requested_speed: PlaybackSpeed,
    pub speed: PlaybackSpeed,
    pub playing: bool,
    pub paused: bool,
    pub state: PlaybackState,
    pub timing: TimingContext,
    pub tween: T,
    active_tween: Option<TweenId>,
    last_tween: TweenId,
    crawl_cue: Option<Timestamp>,
    events: Vec<PlaybackEvent>,
}

impl<T: TweenControl> Session<T> {
    pub fn new(config: TimingConfig, environment: Environment, tween: T) -> Self {
        let durations = Durations::resolve(&config, &environment);
        let requested_speed = PlaybackSpeed::NORMAL;
        Self {
            id: SessionId::new(),
            motion: CrawlMotion::from_config(&config),
            durations,
            requested_speed,
            speed: effective_speed(requested_speed, &environment),
            config,
            environment,
            playing: false,
            paused: false,
            state: PlaybackState::default(),
            timing: TimingContext::default(),
            tween,
            active_tween: None,
            last_tween: TweenId(0),
            crawl_cue: None,
            events: Vec::new(),
        }
    }

    /// Whether drivers may advance the timeline
    pub fn is_running(&self) -> bool {
        self.playing && !self.paused && !self.state.is_complete
    }

    /// Animation seconds played on a timeline, net of pauses and speed
    pub fn position(&self, timeline: Timeline, now: Timestamp) -> f64 {
        let wall_secs = self.timing.timeline(timeline).elapsed_ms(now) / 1000.0;
        self.speed.to_content(wall_secs)
    }

    /// Wall-clock milliseconds needed to play `content_secs`
    pub fn wall_ms(&self, content_secs: f64) -> f64 {
        self.speed.to_wall(content_secs) * 1000.0
    }

    /// Normalized crawl progress at `now`
    pub fn crawl_progress(&self, now: Timestamp) -> f64 {
        ratio(self.position(Timeline::Crawl, now), self.durations.crawl)
    }

    pub fn progress_info(&self, now: Timestamp) -> ProgressInfo {
        let total = self.durations.total;
        let elapsed = self.position(Timeline::Overall, now).min(total.max(0.0));
        let crawl_progress = if self.timing.crawl.is_started() {
            self.crawl_progress(now)
        } else {
            self.timing.crawl_progress
        };
        ProgressInfo {
            progress: ratio(elapsed, total),
            elapsed,
            remaining: (total - elapsed).max(0.0),
            crawl_progress,
        }
    }

    pub fn dispatch(&mut self, action: PlaybackAction) {
        self.state.dispatch(action);
    }

    /// Move to `phase`, notifying the host when it actually changes
    pub fn set_phase(&mut self, phase: Phase) {
        if self.state.phase == phase {
            return;
        }
        tracing::debug!(session = %self.id, from = %self.state.phase, to = %phase, "Phase change");
        self.dispatch(PlaybackAction::SetPhase(phase));
        self.emit(PlaybackEvent::PhaseChanged(phase));
    }

    pub fn emit(&mut self, event: PlaybackEvent) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Animate to `target` over `content_secs` of animation time
    pub fn start_tween(&mut self, target: TweenValues, content_secs: f64, now: Timestamp) -> TweenId {
        let id = self.last_tween.next();
        self.last_tween = id;
        self.active_tween = Some(id);
        let transition = Transition::linear(self.speed.to_wall(content_secs), now);
        self.tween.start(id, target, transition);
        id
    }

    pub fn stop_tween(&mut self) {
        self.active_tween = None;
        self.tween.stop();
    }

    pub fn active_tween(&self) -> Option<TweenId> {
        self.active_tween
    }

    /// Forget the active tween without touching the renderer
    pub fn release_tween(&mut self) {
        self.active_tween = None;
    }

    /// Record when the crawl was cued, so its clock starts on time
    pub fn cue_crawl(&mut self, at: Timestamp) {
        self.crawl_cue = Some(at);
    }

    pub fn take_crawl_cue(&mut self) -> Option<Timestamp> {
        self.crawl_cue.take()
    }

    /// Park the crawl at its start offset
    pub fn park_crawl(&mut self) {
        self.stop_tween();
        let start = self.motion.start_frame();
        self.tween.set(start);
    }

    /// Drop all per-session state
    pub fn reset(&mut self) {
        let phase = self.state.phase;
        self.timing.reset();
        self.dispatch(PlaybackAction::Reset);
        self.crawl_cue = None;
        if phase != Phase::OpeningText {
            self.emit(PlaybackEvent::PhaseChanged(Phase::OpeningText));
        }
    }
}
