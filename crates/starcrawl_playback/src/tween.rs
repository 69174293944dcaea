// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tween control seam.
//!
//! The engine never paints anything. It instructs a [`TweenControl`] to
//! assign values immediately (`set`), animate towards a target (`start`) or
//! freeze where it is (`stop`). [`LinearTween`] is a reference renderer that
//! evaluates those instructions against a clock.

use crate::clock::{ratio, Timestamp};
use crate::motion::lerp;
use serde::{Deserialize, Serialize};

/// Identifier of a started tween.
///
/// Ids increase monotonically per engine so that a settlement signal from an
/// older tween can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TweenId(pub u64);

impl TweenId {
    /// The id following this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Easing curve for a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant rate
    #[default]
    Linear,
    /// Quadratic ease-in
    EaseIn,
    /// Quadratic ease-out
    EaseOut,
    /// Quadratic ease-in/out
    EaseInOut,
}

impl Easing {
    /// Map normalized time `t` in `[0, 1]` through the curve
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Partial assignment of the animated values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TweenValues {
    /// Vertical offset (percent)
    pub y: Option<f64>,
    /// Opacity in `[0, 1]`
    pub opacity: Option<f64>,
}

impl TweenValues {
    /// Offset and opacity
    pub fn both(y: f64, opacity: f64) -> Self {
        Self {
            y: Some(y),
            opacity: Some(opacity),
        }
    }

    /// Offset only
    pub fn y(y: f64) -> Self {
        Self {
            y: Some(y),
            opacity: None,
        }
    }

    /// Opacity only
    pub fn opacity(opacity: f64) -> Self {
        Self {
            y: None,
            opacity: Some(opacity),
        }
    }
}

/// Timing of an animated transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Wall-clock length in seconds
    pub duration_secs: f64,
    /// Easing curve
    pub easing: Easing,
    /// When the transition begins
    pub issued_at: Timestamp,
}

impl Transition {
    /// Linear transition
    pub fn linear(duration_secs: f64, issued_at: Timestamp) -> Self {
        Self {
            duration_secs,
            easing: Easing::Linear,
            issued_at,
        }
    }
}

/// Capability to drive the rendered crawl values
pub trait TweenControl {
    /// Assign values immediately, cancelling any animation of those values
    fn set(&mut self, values: TweenValues);

    /// Animate towards `target`. The host reports the end of the transition
    /// back to the engine with the same `id`.
    fn start(&mut self, id: TweenId, target: TweenValues, transition: Transition);

    /// Freeze every animated value where it currently is
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ChannelAnim {
    from: f64,
    to: f64,
    start: Timestamp,
    duration_ms: f64,
    easing: Easing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Channel {
    value: f64,
    anim: Option<ChannelAnim>,
}

impl Channel {
    fn new(value: f64) -> Self {
        Self { value, anim: None }
    }

    fn set(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.value = value;
            self.anim = None;
        }
    }

    fn start(&mut self, to: Option<f64>, transition: &Transition) {
        let Some(to) = to else {
            return;
        };
        if transition.duration_secs <= 0.0 {
            self.value = to;
            self.anim = None;
            return;
        }
        self.anim = Some(ChannelAnim {
            from: self.value,
            to,
            start: transition.issued_at,
            duration_ms: transition.duration_secs * 1000.0,
            easing: transition.easing,
        });
    }

    fn advance(&mut self, now: Timestamp) {
        let Some(anim) = self.anim else {
            return;
        };
        let t = ratio(now - anim.start, anim.duration_ms);
        self.value = lerp(anim.from, anim.to, anim.easing.apply(t));
        if t >= 1.0 {
            self.anim = None;
        }
    }
}

/// Reference renderer that evaluates tween instructions over time.
///
/// Call [`advance`](Self::advance) once per frame before reading
/// [`values`](Self::values); it returns the id of a tween that has just run to
/// its end.
#[derive(Debug, Clone)]
pub struct LinearTween {
    y: Channel,
    opacity: Channel,
    active: Option<TweenId>,
    now: Timestamp,
}

impl LinearTween {
    /// Create a renderer parked at the given values
    pub fn new(y: f64, opacity: f64) -> Self {
        Self {
            y: Channel::new(y),
            opacity: Channel::new(opacity),
            active: None,
            now: Timestamp::ZERO,
        }
    }

    /// Bring animated values up to `now` without reporting settlement.
    ///
    /// Hosts call this before acting on input between frames, so that a
    /// [`stop`](TweenControl::stop) freezes values at the input time.
    pub fn evaluate(&mut self, now: Timestamp) {
        self.now = now;
        self.y.advance(now);
        self.opacity.advance(now);
    }

    /// Evaluate animated values at `now`; returns a settled tween id
    pub fn advance(&mut self, now: Timestamp) -> Option<TweenId> {
        self.evaluate(now);
        if self.is_animating() {
            None
        } else {
            self.active.take()
        }
    }

    /// Whether any value is still moving
    pub fn is_animating(&self) -> bool {
        self.y.anim.is_some() || self.opacity.anim.is_some()
    }

    /// Id of the running tween
    pub fn active(&self) -> Option<TweenId> {
        self.active
    }

    /// Current values
    pub fn values(&self) -> TweenValues {
        TweenValues::both(self.y.value, self.opacity.value)
    }
}

impl Default for LinearTween {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl TweenControl for LinearTween {
    fn set(&mut self, values: TweenValues) {
        self.y.set(values.y);
        self.opacity.set(values.opacity);
    }

    fn start(&mut self, id: TweenId, target: TweenValues, transition: Transition) {
        self.y.advance(transition.issued_at);
        self.opacity.advance(transition.issued_at);
        self.y.start(target.y, &transition);
        self.opacity.start(target.opacity, &transition);
        self.active = Some(id);
    }

    fn stop(&mut self) {
        self.y.advance(self.now);
        self.opacity.advance(self.now);
        self.y.anim = None;
        self.opacity.anim = None;
        self.active = None;
    }
}
