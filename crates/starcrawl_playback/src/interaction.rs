// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer interaction gate.
//!
//! Decides what a tap or click on the playback surface should do. On touch
//! devices the first tap only reveals the controls; the next one toggles
//! pause. Events on interactive elements are left to those elements.

use crate::clock::Timestamp;
use crate::config::Environment;
use crate::timer::Timer;
use serde::{Deserialize, Serialize};

/// Source of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    /// Touch end
    Touch,
    /// Mouse click
    Click,
}

/// Pause toggle requested by an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseToggle {
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
}

/// What the host should do with a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateResponse {
    /// Suppress the platform's default handling
    pub prevent_default: bool,
    /// Reveal the controls overlay
    pub show_controls: bool,
    /// Pause or resume playback
    pub toggle: Option<PauseToggle>,
}

/// Tracks whether the controls have been revealed by a first tap
#[derive(Debug, Clone, Default)]
pub struct InteractionGate {
    controls_shown_once: bool,
    fine_pointer: bool,
}

impl InteractionGate {
    /// Create a gate for the host's input environment
    pub fn new(environment: &Environment) -> Self {
        Self {
            controls_shown_once: false,
            fine_pointer: environment.fine_pointer,
        }
    }

    /// Whether a first tap has already revealed the controls
    pub fn controls_shown_once(&self) -> bool {
        self.controls_shown_once
    }

    /// Follow playback and controls visibility.
    ///
    /// Hidden controls or a stopped sequence re-arm the first-tap behavior.
    pub fn sync(&mut self, playing: bool, controls_visible: bool) {
        self.controls_shown_once = playing && controls_visible;
    }

    /// Route a pointer event.
    ///
    /// Returns `None` when the event should be left alone: playback stopped,
    /// a mouse click on a coarse-pointer device, or a target that
    /// `is_interactive` claims.
    pub fn handle<E>(
        &mut self,
        kind: PointerKind,
        target: &E,
        is_interactive: impl Fn(&E) -> bool,
        playing: bool,
        paused: bool,
    ) -> Option<GateResponse> {
        if !playing {
            return None;
        }
        if kind == PointerKind::Click && !self.fine_pointer {
            return None;
        }
        if is_interactive(target) {
            return None;
        }

        let prevent_default = kind == PointerKind::Touch;
        if kind == PointerKind::Touch && !self.controls_shown_once {
            self.controls_shown_once = true;
            return Some(GateResponse {
                prevent_default,
                show_controls: true,
                toggle: None,
            });
        }

        let toggle = if paused {
            PauseToggle::Resume
        } else {
            PauseToggle::Pause
        };
        Some(GateResponse {
            prevent_default,
            show_controls: true,
            toggle: Some(toggle),
        })
    }
}

/// Auto-hiding controls overlay
#[derive(Debug, Clone)]
pub struct ControlsVisibility {
    visible: bool,
    hide_after_ms: f64,
    hide: Timer,
}

impl ControlsVisibility {
    /// Hidden overlay that hides itself `hide_after_ms` after being shown
    pub fn new(hide_after_ms: f64) -> Self {
        Self {
            visible: false,
            hide_after_ms,
            hide: Timer::default(),
        }
    }

    /// Whether the overlay is showing
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the overlay and restart the hide delay
    pub fn show(&mut self, now: Timestamp) {
        self.visible = true;
        self.hide.arm(now + self.hide_after_ms);
    }

    /// Hide immediately
    pub fn hide(&mut self) {
        self.visible = false;
        self.hide.clear();
    }

    /// Keep the overlay up while paused
    pub fn pin(&mut self) {
        self.visible = true;
        self.hide.clear();
    }

    /// Pending hide deadline
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.hide.due()
    }

    /// Apply the hide delay. Returns `true` if the overlay just hid.
    pub fn tick(&mut self, now: Timestamp) -> bool {
        if self.hide.take_due(now).is_some() {
            self.visible = false;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_gate() -> InteractionGate {
        InteractionGate::new(&Environment::default())
    }

    fn not_interactive(_: &()) -> bool {
        false
    }

    #[test]
    fn test_first_tap_only_shows_controls() {
        let mut gate = touch_gate();
        let first = gate
            .handle(PointerKind::Touch, &(), not_interactive, true, false)
            .unwrap();
        assert!(first.prevent_default && first.show_controls);
        assert_eq!(first.toggle, None);

        let second = gate
            .handle(PointerKind::Touch, &(), not_interactive, true, false)
            .unwrap();
        assert_eq!(second.toggle, Some(PauseToggle::Pause));
    }

    #[test]
    fn test_hidden_controls_rearm_first_tap() {
        let mut gate = touch_gate();
        gate.handle(PointerKind::Touch, &(), not_interactive, true, false);
        gate.sync(true, false);
        let tap = gate
            .handle(PointerKind::Touch, &(), not_interactive, true, true)
            .unwrap();
        assert_eq!(tap.toggle, None);
    }

    #[test]
    fn test_click_needs_fine_pointer() {
        let mut coarse = touch_gate();
        assert_eq!(coarse.handle(PointerKind::Click, &(), not_interactive, true, false), None);

        let mut fine = InteractionGate::new(&Environment {
            fine_pointer: true,
            ..Environment::default()
        });
        let click = fine
            .handle(PointerKind::Click, &(), not_interactive, true, true)
            .unwrap();
        assert!(!click.prevent_default);
        assert_eq!(click.toggle, Some(PauseToggle::Resume));
    }

    #[test]
    fn test_interactive_targets_and_stopped_playback_are_ignored() {
        let mut gate = touch_gate();
        assert_eq!(gate.handle(PointerKind::Touch, &"button", |t| *t == "button", true, false), None);
        assert_eq!(gate.handle(PointerKind::Touch, &(), not_interactive, false, false), None);
        assert!(!gate.controls_shown_once());
    }

    #[test]
    fn test_controls_hide_after_delay() {
        let mut controls = ControlsVisibility::new(3_000.0);
        controls.show(Timestamp::from_millis(1_000.0));
        assert!(!controls.tick(Timestamp::from_millis(3_999.0)));
        assert!(controls.tick(Timestamp::from_millis(4_000.0)));
        assert!(!controls.is_visible());

        controls.pin();
        assert_eq!(controls.next_deadline(), None);
        assert!(controls.is_visible());
    }
}
