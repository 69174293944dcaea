// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback state machine.
//!
//! The machine performs no timing of its own. Drivers feed it
//! [`PlaybackAction`]s and it updates the phase and flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Animation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Opening caption
    #[default]
    OpeningText,
    /// Receding logo
    Logo,
    /// Perspective-scrolling crawl
    Crawl,
}

impl Phase {
    /// The phase that follows this one, if any
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::OpeningText => Some(Phase::Logo),
            Phase::Logo => Some(Phase::Crawl),
            Phase::Crawl => None,
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Phase::OpeningText => "opening-text",
            Phase::Logo => "logo",
            Phase::Crawl => "crawl",
        }
    }

    /// All phases in playback order
    pub fn all() -> &'static [Phase] {
        &[Phase::OpeningText, Phase::Logo, Phase::Crawl]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Actions accepted by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackAction {
    /// Move to a phase
    SetPhase(Phase),
    /// Crawl text has been cued (may happen during the logo phase)
    StartCrawl,
    /// Crawl tween has actually been issued
    StartAnimation,
    /// Sequence finished
    Complete,
    /// Back to the initial state
    Reset,
}

/// Phase plus crawl/completion flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    /// Current phase
    pub phase: Phase,
    /// Crawl text cued
    pub crawl_started: bool,
    /// Crawl tween issued
    pub animation_started: bool,
    /// Sequence finished
    pub is_complete: bool,
}

impl PlaybackState {
    /// Apply an action
    pub fn dispatch(&mut self, action: PlaybackAction) {
        match action {
            PlaybackAction::SetPhase(phase) => self.phase = phase,
            PlaybackAction::StartCrawl => self.crawl_started = true,
            PlaybackAction::StartAnimation => self.animation_started = true,
            PlaybackAction::Complete => self.is_complete = true,
            PlaybackAction::Reset => *self = Self::default(),
        }
    }

    /// Whether the crawl text should be visible
    pub fn crawl_visible(&self) -> bool {
        self.crawl_started || self.phase == Phase::Crawl
    }
}

/// One-shot guard for the completion callback.
///
/// Kept apart from [`PlaybackState::is_complete`] so that every code path
/// that detects completion can call [`fire`](Self::fire) and only the first
/// one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompletionGuard {
    fired: bool,
}

impl CompletionGuard {
    /// Returns `true` exactly once until the next [`reset`](Self::reset)
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }

    /// Whether completion has been declared
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Re-arm the guard
    pub fn reset(&mut self) {
        self.fired = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(Phase::OpeningText.next(), Some(Phase::Logo));
        assert_eq!(Phase::Logo.next(), Some(Phase::Crawl));
        assert_eq!(Phase::Crawl.next(), None);
        assert_eq!(Phase::Logo.to_string(), "logo");
    }

    #[test]
    fn test_dispatch_flags() {
        let mut state = PlaybackState::default();
        state.dispatch(PlaybackAction::SetPhase(Phase::Logo));
        state.dispatch(PlaybackAction::StartCrawl);
        assert!(state.crawl_visible());
        assert!(!state.animation_started);

        state.dispatch(PlaybackAction::StartAnimation);
        state.dispatch(PlaybackAction::Complete);
        assert!(state.animation_started);
        assert!(state.is_complete);

        state.dispatch(PlaybackAction::Reset);
        assert_eq!(state, PlaybackState::default());
    }

    #[test]
    fn test_completion_guard_fires_once() {
        let mut guard = CompletionGuard::default();
        assert!(guard.fire());
        assert!(!guard.fire());
        assert!(guard.has_fired());
        guard.reset();
        assert!(guard.fire());
    }
}
