// SPDX-License-Identifier: MIT OR Apache-2.0
//! Test double for the tween seam.

use crate::tween::{Transition, TweenControl, TweenId, TweenValues};

/// One instruction received by [`RecordingTween`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenCall {
    Set(TweenValues),
    Start(TweenId, TweenValues, Transition),
    Stop,
}

/// Records every instruction and tracks the last assigned values
#[derive(Debug, Clone, Default)]
pub struct RecordingTween {
    pub calls: Vec<TweenCall>,
    pub y: Option<f64>,
    pub opacity: Option<f64>,
}

impl RecordingTween {
    pub fn starts(&self) -> Vec<(TweenId, TweenValues, Transition)> {
        self.calls
            .iter()
            .filter_map(|call| match *call {
                TweenCall::Start(id, target, transition) => Some((id, target, transition)),
                _ => None,
            })
            .collect()
    }

    pub fn last_start(&self) -> Option<(TweenId, TweenValues, Transition)> {
        self.starts().last().copied()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TweenControl for RecordingTween {
    fn set(&mut self, values: TweenValues) {
        if values.y.is_some() {
            self.y = values.y;
        }
        if values.opacity.is_some() {
            self.opacity = values.opacity;
        }
        self.calls.push(TweenCall::Set(values));
    }

    fn start(&mut self, id: TweenId, target: TweenValues, transition: Transition) {
        self.calls.push(TweenCall::Start(id, target, transition));
    }

    fn stop(&mut self) {
        self.calls.push(TweenCall::Stop);
    }
}
