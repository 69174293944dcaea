// SPDX-License-Identifier: MIT OR Apache-2.0
//! Real-time host for the playback engine.
//!
//! Plays the role of the UI around the crawl: it forwards host actions,
//! renders tween values through [`LinearTween`], reports settled tweens back
//! to the engine and logs every event. All engine work happens on one task.

use crate::error::{PlayerError, Result};
use crate::script::HostAction;
use starcrawl_playback::{
    format_time, skip_target, ControlsVisibility, CrawlContent, CrawlEngine, CrawlMotion,
    Environment, GateResponse, InteractionGate, LinearTween, PauseToggle, Phase, PlaybackEvent,
    PointerKind, Shortcut, Timestamp, TimingConfig,
};
use starcrawl_playback::timer::{earliest, Timer};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// How long a seek request stays set before the host clears it
const SEEK_CLEAR_MS: f64 = 200.0;

/// Outcome of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSummary {
    /// Whether the sequence played to the end
    pub completed: bool,
    /// Phases entered, in order
    pub phases: Vec<Phase>,
    /// Wall-clock milliseconds from start to exit
    pub wall_ms: f64,
}

/// Engine plus the host-side state around it
pub struct Player {
    engine: CrawlEngine<LinearTween>,
    gate: InteractionGate,
    controls: ControlsVisibility,
    seek_clear: Timer,
    frame_ms: f64,
    summary: PlaybackSummary,
    finished: bool,
}

impl Player {
    /// Create an idle player, rendering every `frame_ms` while a tween runs
    pub fn new(config: TimingConfig, environment: Environment, frame_ms: f64) -> Result<Self> {
        if !frame_ms.is_finite() || frame_ms <= 0.0 {
            return Err(PlayerError::InvalidFrameInterval(frame_ms));
        }
        let motion = CrawlMotion::from_config(&config);
        let controls = ControlsVisibility::new(config.controls_hide_ms);
        let tween = LinearTween::new(motion.start_y, 1.0);
        Ok(Self {
            engine: CrawlEngine::new(config, environment, tween),
            gate: InteractionGate::new(&environment),
            controls,
            seek_clear: Timer::default(),
            frame_ms,
            summary: PlaybackSummary::default(),
            finished: false,
        })
    }

    /// The engine being driven
    pub fn engine(&self) -> &CrawlEngine<LinearTween> {
        &self.engine
    }

    /// Hand authored content to the engine before starting
    pub fn load_content(&mut self, content: CrawlContent) {
        self.engine.set_content(content, Timestamp::ZERO);
    }

    /// Request a playback speed before starting
    pub fn set_speed(&mut self, factor: f64) -> Result<()> {
        self.engine.set_speed(factor, Timestamp::ZERO)?;
        Ok(())
    }

    /// Whether the run is over
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Start playback at `now`
    pub fn start(&mut self, now: Timestamp) {
        self.summary.phases.push(Phase::OpeningText);
        self.engine.set_paused(false, now);
        self.engine.set_playing(true, now);
        self.controls.show(now);
        self.sync_gate();
    }

    /// Apply one host action
    pub fn apply(&mut self, action: HostAction, now: Timestamp) -> Result<()> {
        // Catch the rendered values up before the input can freeze them
        self.engine.tween_mut().evaluate(now);
        match action {
            HostAction::Pause => self.set_paused(true, now),
            HostAction::Resume => self.set_paused(false, now),
            HostAction::Seek(t) => self.seek(t, now),
            HostAction::Skip(delta) => self.skip(delta, now),
            HostAction::Speed(factor) => self.engine.set_speed(factor, now)?,
            HostAction::Stop => self.stop(now),
            HostAction::Key { key, text_input } => {
                if let Some(shortcut) = Shortcut::from_key(&key, text_input) {
                    self.shortcut(shortcut, now);
                }
            }
            HostAction::Tap { interactive } => self.pointer(PointerKind::Touch, interactive, now),
            HostAction::Click { interactive } => self.pointer(PointerKind::Click, interactive, now),
        }
        self.frame(now);
        Ok(())
    }

    /// Render one frame: advance tweens, tick the engine, handle events
    pub fn frame(&mut self, now: Timestamp) {
        if self.finished {
            return;
        }
        if let Some(id) = self.engine.tween_mut().advance(now) {
            self.engine.tween_settled(id, now);
        }
        self.engine.tick(now);

        if self.seek_clear.take_due(now).is_some() {
            self.engine.seek(None, now);
        }
        if self.controls.tick(now) {
            tracing::trace!("Controls hidden");
            self.sync_gate();
        }

        for event in self.engine.take_events() {
            self.handle_event(event, now);
        }
    }

    /// When the next frame is needed
    pub fn next_wake(&self, now: Timestamp) -> Option<Timestamp> {
        if self.finished {
            return None;
        }
        let render = self
            .engine
            .tween()
            .is_animating()
            .then(|| now + self.frame_ms);
        earliest([
            self.engine.next_deadline(),
            render,
            self.seek_clear.due(),
            self.controls.next_deadline(),
        ])
    }

    /// Drive playback until it ends, applying actions as they arrive
    pub async fn run(
        mut self,
        mut actions: mpsc::UnboundedReceiver<HostAction>,
        start: Instant,
    ) -> Result<PlaybackSummary> {
        let clock = |at: Instant| Timestamp::from_millis(at.duration_since(start).as_secs_f64() * 1000.0);
        let mut script_open = true;

        self.start(clock(Instant::now()));
        while !self.finished {
            let now = clock(Instant::now());
            self.frame(now);
            if self.finished {
                break;
            }

            let wake = self
                .next_wake(now)
                .map_or(start + Duration::from_secs(3600), |at| {
                    start + Duration::from_secs_f64(at.as_secs().max(0.0))
                });

            tokio::select! {
                () = tokio::time::sleep_until(wake) => {}
                action = actions.recv(), if script_open => match action {
                    Some(action) => self.apply(action, clock(Instant::now()))?,
                    None => script_open = false,
                },
            }
        }

        self.summary.wall_ms = clock(Instant::now()).as_millis();
        Ok(self.summary)
    }

    fn set_paused(&mut self, paused: bool, now: Timestamp) {
        if !self.engine.is_playing() {
            return;
        }
        self.engine.set_paused(paused, now);
        if paused {
            self.controls.pin();
        } else {
            self.controls.show(now);
        }
        self.sync_gate();
    }

    fn seek(&mut self, seek_to: f64, now: Timestamp) {
        let total = self.engine.durations().total;
        tracing::info!(
            to = %format_time(seek_to * total),
            of = %format_time(total),
            "Seek"
        );
        self.engine.seek(Some(seek_to), now);
        self.seek_clear.arm(now + SEEK_CLEAR_MS);
        self.controls.show(now);
        self.sync_gate();
    }

    fn skip(&mut self, delta_secs: f64, now: Timestamp) {
        let info = self.engine.progress_info(now);
        match skip_target(&info, delta_secs) {
            Some(target) => self.seek(target, now),
            None => tracing::debug!(delta_secs, "Skip has nowhere to go"),
        }
    }

    fn shortcut(&mut self, shortcut: Shortcut, now: Timestamp) {
        match shortcut {
            Shortcut::TogglePause => {
                let paused = self.engine.is_paused();
                self.set_paused(!paused, now);
            }
            Shortcut::SkipBackward | Shortcut::SkipForward => {
                let skip_secs = self.engine.config().skip_secs;
                if let Some(delta) = shortcut.skip_delta(skip_secs) {
                    self.skip(delta, now);
                }
            }
            Shortcut::Close => self.stop(now),
        }
    }

    fn pointer(&mut self, kind: PointerKind, interactive: bool, now: Timestamp) {
        let playing = self.engine.is_playing();
        let paused = self.engine.is_paused();
        let Some(GateResponse {
            show_controls,
            toggle,
            ..
        }) = self
            .gate
            .handle(kind, &interactive, |on_control| *on_control, playing, paused)
        else {
            return;
        };

        if show_controls {
            self.controls.show(now);
        }
        match toggle {
            Some(PauseToggle::Pause) => self.set_paused(true, now),
            Some(PauseToggle::Resume) => self.set_paused(false, now),
            None => tracing::debug!("Controls revealed"),
        }
        self.sync_gate();
    }

    fn stop(&mut self, now: Timestamp) {
        self.engine.set_paused(false, now);
        self.engine.set_playing(false, now);
        self.controls.hide();
        self.sync_gate();
        self.finished = true;
    }

    fn sync_gate(&mut self) {
        self.gate
            .sync(self.engine.is_playing(), self.controls.is_visible());
    }

    fn handle_event(&mut self, event: PlaybackEvent, now: Timestamp) {
        match event {
            PlaybackEvent::PhaseChanged(phase) => {
                tracing::info!(%phase, at = %format_time(now.as_secs()), "Phase");
                if self.summary.phases.last() != Some(&phase) {
                    self.summary.phases.push(phase);
                }
            }
            PlaybackEvent::ProgressChanged {
                progress,
                elapsed,
                remaining,
            } => {
                tracing::debug!(
                    percent = (progress * 1000.0).round() / 10.0,
                    elapsed = %format_time(elapsed),
                    remaining = %format_time(-remaining),
                    "Progress"
                );
            }
            PlaybackEvent::Completed => {
                tracing::info!(at = %format_time(now.as_secs()), "Crawl complete");
                self.summary.completed = true;
                self.stop(now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Timestamp {
        Timestamp::from_millis(v as f64)
    }

    fn reduced() -> Environment {
        Environment {
            reduced_motion: true,
            ..Environment::default()
        }
    }

    /// Step frames every 50ms until the player finishes or `until` passes
    fn drive(player: &mut Player, from: u64, until: u64) {
        for t in (from..=until).step_by(50) {
            player.frame(ms(t));
            if player.is_finished() {
                break;
            }
        }
    }

    #[test]
    fn test_plays_to_completion() {
        let mut player = Player::new(TimingConfig::default(), reduced(), 16.0).unwrap();
        player.start(ms(0));
        drive(&mut player, 0, 10_000);

        assert!(player.is_finished());
        assert!(player.summary.completed);
        assert_eq!(
            player.summary.phases,
            vec![Phase::OpeningText, Phase::Logo, Phase::Crawl]
        );
        assert!(!player.engine().is_playing());
        assert_eq!(player.next_wake(ms(10_000)), None);
    }

    #[test]
    fn test_space_toggles_pause_unless_typing() {
        let mut player = Player::new(TimingConfig::default(), reduced(), 16.0).unwrap();
        player.start(ms(0));
        let space = |text_input| HostAction::Key {
            key: " ".to_string(),
            text_input,
        };

        player.apply(space(true), ms(100)).unwrap();
        assert!(!player.engine().is_paused());
        player.apply(space(false), ms(200)).unwrap();
        assert!(player.engine().is_paused());
        assert!(player.controls.is_visible());
        player.apply(space(false), ms(300)).unwrap();
        assert!(!player.engine().is_paused());
    }

    #[test]
    fn test_seek_is_cleared_after_delay() {
        let mut player = Player::new(TimingConfig::default(), reduced(), 16.0).unwrap();
        player.start(ms(0));
        player.apply(HostAction::Seek(0.5), ms(100)).unwrap();
        assert_eq!(player.seek_clear.due(), Some(ms(300)));
        player.frame(ms(300));
        assert!(!player.seek_clear.is_armed());
    }

    #[test]
    fn test_skip_back_at_start_does_nothing() {
        let mut player = Player::new(TimingConfig::default(), Environment::default(), 16.0).unwrap();
        player.start(ms(0));
        player.apply(HostAction::Skip(-5.0), ms(0)).unwrap();
        assert!(!player.seek_clear.is_armed());

        player.apply(HostAction::Skip(5.0), ms(0)).unwrap();
        assert!(player.seek_clear.is_armed());
        let elapsed = player.engine().progress_info(ms(0)).elapsed;
        assert!((elapsed - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_first_tap_reveals_then_toggles() {
        let mut player = Player::new(TimingConfig::default(), Environment::default(), 16.0).unwrap();
        player.start(ms(0));
        // Controls auto-hide after 3s, re-arming the first-tap behavior
        player.frame(ms(3_000));
        assert!(!player.controls.is_visible());

        player.apply(HostAction::Tap { interactive: false }, ms(3_100)).unwrap();
        assert!(!player.engine().is_paused());
        assert!(player.controls.is_visible());

        player.apply(HostAction::Tap { interactive: false }, ms(3_200)).unwrap();
        assert!(player.engine().is_paused());

        player.apply(HostAction::Tap { interactive: true }, ms(3_300)).unwrap();
        assert!(player.engine().is_paused());
    }

    #[test]
    fn test_escape_stops() {
        let mut player = Player::new(TimingConfig::default(), Environment::default(), 16.0).unwrap();
        player.start(ms(0));
        player
            .apply(
                HostAction::Key {
                    key: "Escape".to_string(),
                    text_input: false,
                },
                ms(1_000),
            )
            .unwrap();
        assert!(player.is_finished());
        assert!(!player.summary.completed);
    }

    #[test]
    fn test_rejects_unusable_frame_interval() {
        for frame_ms in [0.0, -16.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Player::new(TimingConfig::default(), Environment::default(), frame_ms),
                Err(PlayerError::InvalidFrameInterval(_))
            ));
        }
    }

    #[test]
    fn test_pause_between_frames_freezes_at_pause_time() {
        let mut player = Player::new(TimingConfig::default(), reduced(), 16.0).unwrap();
        player.start(ms(0));
        drive(&mut player, 0, 2_000);
        assert!(player.engine().tween().is_animating());

        // Crawl tween runs 100 -> -200 over 5s from 1s; paused 1.01s in
        player.apply(HostAction::Pause, ms(2_010)).unwrap();
        let y = player.engine().tween().values().y.unwrap();
        assert!((y - (100.0 - 300.0 * 1.01 / 5.0)).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_speed_is_an_error() {
        let mut player = Player::new(TimingConfig::default(), Environment::default(), 16.0).unwrap();
        player.start(ms(0));
        assert!(player.apply(HostAction::Speed(0.0), ms(10)).is_err());
    }
}
