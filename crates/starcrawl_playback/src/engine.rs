// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host façade.
//!
//! [`CrawlEngine`] owns the session and every driver. The host forwards its
//! signals (playing, paused, seek, content, speed) and calls
//! [`tick`](CrawlEngine::tick) from a single scheduler, sleeping until
//! [`next_deadline`](CrawlEngine::next_deadline) between calls.

use crate::clock::Timestamp;
use crate::config::{Environment, TimingConfig};
use crate::content::CrawlContent;
use crate::crawl;
use crate::durations::{effective_speed, Durations, PlaybackSpeed};
use crate::error::Result;
use crate::phases::PhaseDriver;
use crate::progress::{ProgressInfo, ProgressReporter};
use crate::seek::SeekResolver;
use crate::session::{PlaybackEvent, Session, SessionId};
use crate::state::{Phase, PlaybackState};
use crate::timer::earliest;
use crate::tween::{TweenControl, TweenId};

/// Maximum timer firings handled in one settle pass
const MAX_SETTLE_STEPS: usize = 8;

/// Playback timing engine for one crawl surface
pub struct CrawlEngine<T: TweenControl> {
    session: Session<T>,
    phases: PhaseDriver,
    progress: ProgressReporter,
    seek: SeekResolver,
    content: Option<CrawlContent>,
}

impl<T: TweenControl> CrawlEngine<T> {
    /// Create an idle engine
    pub fn new(config: TimingConfig, environment: Environment, tween: T) -> Self {
        let progress = ProgressReporter::new(config.poll_interval_ms);
        Self {
            session: Session::new(config, environment, tween),
            phases: PhaseDriver::new(),
            progress,
            seek: SeekResolver::new(),
            content: None,
        }
    }

    /// Identifier of the current (or last) playback session
    pub fn session_id(&self) -> SessionId {
        self.session.id
    }

    /// State machine snapshot
    pub fn state(&self) -> PlaybackState {
        self.session.state
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.session.state.phase
    }

    /// Whether the host has started playback
    pub fn is_playing(&self) -> bool {
        self.session.playing
    }

    /// Whether the host has paused playback
    pub fn is_paused(&self) -> bool {
        self.session.paused
    }

    /// Whether the sequence has finished
    pub fn is_complete(&self) -> bool {
        self.session.state.is_complete
    }

    /// Speed in effect
    pub fn speed(&self) -> PlaybackSpeed {
        self.session.speed
    }

    /// Phase durations for the current session
    pub fn durations(&self) -> Durations {
        self.session.durations
    }

    /// Timing configuration
    pub fn config(&self) -> &TimingConfig {
        &self.session.config
    }

    /// Host environment
    pub fn environment(&self) -> Environment {
        self.session.environment
    }

    /// Authored content, once set
    pub fn content(&self) -> Option<&CrawlContent> {
        self.content.as_ref()
    }

    /// Tween renderer
    pub fn tween(&self) -> &T {
        &self.session.tween
    }

    /// Mutable tween renderer
    pub fn tween_mut(&mut self) -> &mut T {
        &mut self.session.tween
    }

    /// Replace the environment. Takes effect when playback next starts.
    pub fn set_environment(&mut self, environment: Environment) {
        self.session.environment = environment;
    }

    /// Host playing signal.
    ///
    /// Starting creates every timeline fresh; stopping clears them, resets
    /// the state machine and parks the crawl at its start offset.
    pub fn set_playing(&mut self, playing: bool, now: Timestamp) {
        if self.session.playing == playing {
            return;
        }
        self.session.playing = playing;
        if playing {
            self.begin(now);
        } else {
            self.teardown(now);
        }
    }

    /// Host paused signal
    pub fn set_paused(&mut self, paused: bool, now: Timestamp) {
        if self.session.paused == paused {
            return;
        }
        self.session.paused = paused;
        if !self.session.playing {
            return;
        }

        let s = &mut self.session;
        if paused {
            self.phases.pause(s, now);
            crawl::pause(s, now);
            self.progress.pause(s, now);
            tracing::debug!(session = %s.id, at = now.as_secs(), phase = %s.state.phase, "Paused");
        } else {
            tracing::debug!(session = %s.id, at = now.as_secs(), phase = %s.state.phase, "Resumed");
            self.progress.resume(s, now);
            self.phases.resume(s, now);
            crawl::resume(s, now);
        }
        self.settle(now);
    }

    /// Host seek signal with a normalized position.
    ///
    /// `None` clears the repeat guard, so the same position can be sought
    /// again afterwards.
    pub fn seek(&mut self, seek_to: Option<f64>, now: Timestamp) {
        if self.seek.apply(&mut self.session, seek_to, now) {
            self.settle(now);
        }
    }

    /// Provide authored content. Returns `true` if it differed from the
    /// previous value, in which case playback restarts from the beginning.
    pub fn set_content(&mut self, content: CrawlContent, now: Timestamp) -> bool {
        if self.content.as_ref() == Some(&content) {
            return false;
        }
        self.content = Some(content);
        tracing::debug!(session = %self.session.id, "Content changed");

        if self.session.playing {
            self.phases.cancel();
            self.progress.stop();
            self.seek.clear();
            self.begin(now);
        } else {
            self.session.reset();
            self.session.park_crawl();
        }
        true
    }

    /// Change the playback speed multiplier.
    ///
    /// Positions are kept; only the remaining wall-clock time changes. Under
    /// reduced motion the request is remembered but playback stays at normal
    /// speed.
    pub fn set_speed(&mut self, factor: f64, now: Timestamp) -> Result<()> {
        let requested = PlaybackSpeed::new(factor)?;
        let s = &mut self.session;
        s.requested_speed = requested;
        if s.environment.reduced_motion {
            tracing::debug!(session = %s.id, factor, "Speed change ignored under reduced motion");
            return Ok(());
        }

        let old = s.speed;
        if old == requested {
            return Ok(());
        }
        s.timing.rescale(now, old.factor(), requested.factor());
        s.speed = requested;
        tracing::debug!(session = %s.id, from = old.factor(), to = requested.factor(), "Speed changed");

        crawl::retime(s, now);
        self.settle(now);
        Ok(())
    }

    /// Advance to `now`: fire due timers, start or finish the crawl and run
    /// the progress poll
    pub fn tick(&mut self, now: Timestamp) {
        if !self.session.playing {
            return;
        }
        self.settle(now);
        self.progress.poll(&mut self.session, now);
    }

    /// The renderer finished the tween `id`
    pub fn tween_settled(&mut self, id: TweenId, now: Timestamp) {
        crawl::settled(&mut self.session, id, now);
        self.settle(now);
    }

    /// Earliest instant at which [`tick`](Self::tick) has work to do
    pub fn next_deadline(&self) -> Option<Timestamp> {
        earliest([
            self.phases.next_deadline(),
            self.progress.next_deadline(),
            crawl::deadline(&self.session),
        ])
    }

    /// Progress recomputed from the timelines at `now`
    pub fn progress_info(&self, now: Timestamp) -> ProgressInfo {
        self.session.progress_info(now)
    }

    /// Drain events raised since the last call
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        self.session.take_events()
    }

    fn begin(&mut self, now: Timestamp) {
        let s = &mut self.session;
        s.reset();
        s.id = SessionId::new();
        s.durations = Durations::resolve(&s.config, &s.environment);
        s.speed = effective_speed(s.requested_speed, &s.environment);
        s.park_crawl();

        s.timing.phase.start(now);
        self.progress.start(s, now);
        if s.paused {
            s.timing.pause_all(now);
        }
        tracing::info!(
            session = %s.id,
            total_secs = s.durations.total,
            speed = s.speed.factor(),
            reduced_motion = s.environment.reduced_motion,
            paused = s.paused,
            "Playback started"
        );
        self.settle(now);
    }

    fn teardown(&mut self, now: Timestamp) {
        self.phases.cancel();
        self.progress.stop();
        self.seek.clear();
        let s = &mut self.session;
        s.reset();
        s.park_crawl();
        tracing::info!(session = %s.id, at = now.as_secs(), "Playback stopped");
    }

    /// Fire due timers until none are left, then re-derive every deadline
    fn settle(&mut self, now: Timestamp) {
        let s = &mut self.session;
        for _ in 0..MAX_SETTLE_STEPS {
            self.phases.sync(s, now);
            let fired = self.phases.fire_next(s, now);
            crawl::maybe_start(s, now);
            crawl::check_elapsed(s, now);
            if !fired {
                break;
            }
        }
        self.phases.sync(s, now);
        self.progress.sync(s, now);
    }
}
