// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback timing engine for Star Crawl.
//!
//! This crate sequences a cinematic scrolling-text crawl:
//! - Opening text, receding logo and perspective crawl phases
//! - Pause and resume that exclude paused time from every timeline
//! - Seeking to any normalized position
//! - Playback speed changes mid-sequence
//! - Periodic progress reports and a single completion signal
//!
//! ## Architecture
//!
//! The engine is built on:
//! - Pause-aware timing refs owned by one [`CrawlEngine`]
//! - Deadline timers re-derived from those refs after every input
//! - An explicit state machine advanced by `tick(now)`
//! - A [`TweenControl`] seam through which the renderer is driven
//!
//! Rendering, text layout and the controls overlay belong to the host.

pub mod clock;
pub mod config;
pub mod content;
pub mod controls;
pub mod durations;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod motion;
pub mod progress;
pub mod seek;
pub mod session;
pub mod state;
pub mod timer;
pub mod tween;

mod crawl;
mod phases;

#[cfg(test)]
mod testing;

pub use clock::{Timestamp, Timeline, TimingContext, TimingRef};
pub use config::{Environment, PhaseSeconds, TimingConfig, CONFIG_FORMAT_VERSION};
pub use content::CrawlContent;
pub use controls::{compute_seek_progress, format_time, skip_target, value_from_x, Shortcut, SliderRange};
pub use durations::{Durations, PlaybackSpeed};
pub use engine::CrawlEngine;
pub use error::{ConfigError, PlaybackError, Result};
pub use interaction::{ControlsVisibility, GateResponse, InteractionGate, PauseToggle, PointerKind};
pub use motion::CrawlMotion;
pub use progress::ProgressInfo;
pub use seek::{resolve_seek_target, SeekTarget};
pub use session::{PlaybackEvent, SessionId};
pub use state::{Phase, PlaybackState};
pub use tween::{Easing, LinearTween, Transition, TweenControl, TweenId, TweenValues};
