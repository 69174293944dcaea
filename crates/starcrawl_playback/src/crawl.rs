// SPDX-License-Identifier: MIT OR Apache-2.0
//! Crawl animation driver.
//!
//! Issues the crawl tween once the crawl is cued, pauses and resumes it
//! against the crawl timeline, and is the only place that declares the
//! sequence complete.

use crate::clock::Timestamp;
use crate::session::{PlaybackEvent, Session};
use crate::state::{Phase, PlaybackAction};
use crate::tween::{TweenControl, TweenId};

/// Whether the crawl tween should be issued now
pub(crate) fn should_start<T: TweenControl>(s: &Session<T>) -> bool {
    s.state.crawl_visible()
        && s.playing
        && !s.paused
        && !s.state.animation_started
        && !s.state.is_complete
}

/// Issue the crawl tween if it is due. Returns whether it started.
///
/// A crawl cued by the pre-roll timer starts its clock at the cue time, so a
/// late tick continues from the right position instead of restarting.
pub(crate) fn maybe_start<T: TweenControl>(s: &mut Session<T>, now: Timestamp) -> bool {
    if !should_start(s) {
        return false;
    }
    let started_at = s.take_crawl_cue().map_or(now, |cue| cue.min(now));

    s.dispatch(PlaybackAction::StartCrawl);
    s.dispatch(PlaybackAction::StartAnimation);
    s.timing.crawl.start(started_at);
    s.timing.crawl_progress = 0.0;
    tracing::debug!(session = %s.id, at = started_at.as_secs(), "Crawl animation started");

    if started_at < now {
        continue_from_current(s, now);
    } else if s.durations.crawl <= 0.0 {
        finish(s, now);
    } else {
        let start = s.motion.start_frame();
        s.tween.set(start);
        let end = s.motion.end_frame();
        let duration = s.durations.crawl;
        s.start_tween(end, duration, now);
    }
    true
}

/// Re-issue the tween from the crawl's current position to its end
pub(crate) fn continue_from_current<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    let progress = s.crawl_progress(now);
    s.timing.crawl_progress = progress;
    let remaining = s.durations.crawl * (1.0 - progress);
    if remaining <= 0.0 {
        finish(s, now);
        return;
    }
    let frame = s.motion.frame(progress);
    s.tween.set(frame);
    let end = s.motion.end_frame();
    s.start_tween(end, remaining, now);
}

pub(crate) fn pause<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    if !s.state.animation_started {
        return;
    }
    s.stop_tween();
    s.timing.crawl.pause(now);
    s.timing.crawl_progress = s.crawl_progress(now);
}

pub(crate) fn resume<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    let pause_ms = s.timing.crawl.resume(now);
    if !s.state.animation_started || s.state.is_complete || !s.playing {
        return;
    }
    tracing::debug!(session = %s.id, pause_ms, "Crawl resumed");
    continue_from_current(s, now);
}

/// Re-issue a running tween after a speed change
pub(crate) fn retime<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    if !s.state.animation_started || !s.is_running() {
        return;
    }
    s.stop_tween();
    continue_from_current(s, now);
}

/// Complete once the crawl timeline has run its full length
pub(crate) fn check_elapsed<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    if s.state.animation_started
        && s.is_running()
        && s.timing.crawl.is_started()
        && s.crawl_progress(now) >= 1.0
    {
        finish(s, now);
    }
}

/// Wall-clock time at which the crawl timeline runs out
pub(crate) fn deadline<T: TweenControl>(s: &Session<T>) -> Option<Timestamp> {
    if !s.state.animation_started || !s.is_running() || s.timing.crawl.is_paused() {
        return None;
    }
    let start = s.timing.crawl.start_time()?;
    Some(start + s.timing.crawl.paused_ms() + s.wall_ms(s.durations.crawl))
}

/// Handle the renderer reporting a finished tween.
///
/// Signals from a stopped or superseded tween are ignored.
pub(crate) fn settled<T: TweenControl>(s: &mut Session<T>, id: TweenId, now: Timestamp) {
    if s.active_tween() != Some(id) || !s.is_running() {
        tracing::trace!(session = %s.id, tween = id.0, "Ignoring stale tween settlement");
        return;
    }
    s.release_tween();
    finish(s, now);
}

/// Declare the crawl finished. Completion is raised at most once per run.
pub(crate) fn finish<T: TweenControl>(s: &mut Session<T>, now: Timestamp) {
    s.release_tween();
    s.timing.crawl_progress = 1.0;
    if !s.timing.completion.fire() {
        return;
    }
    let end = s.motion.end_frame();
    s.tween.set(end);
    // A crawl shorter than the pre-roll ends while the logo is still up
    s.set_phase(Phase::Crawl);
    s.dispatch(PlaybackAction::Complete);
    s.emit(PlaybackEvent::Completed);
    tracing::info!(session = %s.id, at = now.as_secs(), "Playback complete");
}
