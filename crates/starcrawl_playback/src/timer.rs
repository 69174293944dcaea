// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deadline-based timers.
//!
//! The engine is driven by an external scheduler calling `tick(now)`, so
//! timeouts and intervals are plain deadlines owned by the driver that arms
//! them. Clearing a deadline is the cancellation; nothing can fire after it.

use crate::clock::Timestamp;

/// One-shot deadline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Timer {
    due: Option<Timestamp>,
}

impl Timer {
    /// Arm (or re-arm) the timer
    pub fn arm(&mut self, due: Timestamp) {
        self.due = Some(due);
    }

    /// Cancel the timer
    pub fn clear(&mut self) {
        self.due = None;
    }

    /// Deadline, if armed
    pub fn due(&self) -> Option<Timestamp> {
        self.due
    }

    /// Whether the timer is armed
    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Whether the timer is armed and due at `now`
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.due.is_some_and(|due| due <= now)
    }

    /// Disarm and return the deadline if it has passed
    pub fn take_due(&mut self, now: Timestamp) -> Option<Timestamp> {
        if self.is_due(now) {
            self.due.take()
        } else {
            None
        }
    }
}

/// Repeating deadline with a fixed period.
///
/// A late tick fires once and schedules the next deadline one period after
/// `now`; missed periods are not replayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period_ms: f64,
    next: Timer,
}

impl Interval {
    /// Create a disarmed interval
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next: Timer::default(),
        }
    }

    /// Period in milliseconds
    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }

    /// Start firing one period after `now`, unless already armed
    pub fn ensure_armed(&mut self, now: Timestamp) {
        if !self.next.is_armed() {
            self.next.arm(now + self.period_ms);
        }
    }

    /// Stop firing
    pub fn clear(&mut self) {
        self.next.clear();
    }

    /// Whether the interval is running
    pub fn is_armed(&self) -> bool {
        self.next.is_armed()
    }

    /// Next deadline, if running
    pub fn due(&self) -> Option<Timestamp> {
        self.next.due()
    }

    /// Returns `true` if a period elapsed, re-arming for the next one
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if self.next.take_due(now).is_some() {
            self.next.arm(now + self.period_ms);
            true
        } else {
            false
        }
    }
}

/// Earliest of several optional deadlines
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Timestamp>>) -> Option<Timestamp> {
    deadlines.into_iter().flatten().reduce(Timestamp::min)
}
