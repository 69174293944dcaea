// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted host actions.
//!
//! A script is a list of actions at wall-clock offsets from the start of
//! playback, written in RON or JSON:
//!
//! ```ron
//! (steps: [
//!     (at_secs: 2.0, action: Pause),
//!     (at_secs: 4.0, action: Resume),
//!     (at_secs: 5.0, action: Seek(0.5)),
//!     (at_secs: 6.0, action: Key(key: "ArrowRight")),
//! ])
//! ```

use crate::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Something the host does to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostAction {
    /// Pause playback
    Pause,
    /// Resume playback
    Resume,
    /// Seek to a normalized position
    Seek(f64),
    /// Skip by a number of seconds (negative skips back)
    Skip(f64),
    /// Change the speed multiplier
    Speed(f64),
    /// Stop playback
    Stop,
    /// Key press
    Key {
        /// Key name, e.g. `" "` or `"ArrowLeft"`
        key: String,
        /// Whether focus is in a text input
        #[serde(default)]
        text_input: bool,
    },
    /// Touch on the playback surface
    Tap {
        /// Whether the touch landed on a control
        #[serde(default)]
        interactive: bool,
    },
    /// Mouse click on the playback surface
    Click {
        /// Whether the click landed on a control
        #[serde(default)]
        interactive: bool,
    },
}

/// One timed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Seconds after playback starts
    pub at_secs: f64,
    /// What to do
    pub action: HostAction,
}

/// Ordered list of timed actions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Steps, in any order
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

impl Script {
    /// Check every step and sort them by time
    pub fn validated(mut self) -> Result<Self> {
        for (index, step) in self.steps.iter().enumerate() {
            if !step.at_secs.is_finite() || step.at_secs < 0.0 {
                return Err(PlayerError::Script {
                    index,
                    reason: "offset must be a finite, non-negative number of seconds",
                });
            }
            match step.action {
                HostAction::Seek(t) if !(0.0..=1.0).contains(&t) => {
                    return Err(PlayerError::Script {
                        index,
                        reason: "seek position must lie in [0, 1]",
                    });
                }
                HostAction::Skip(delta) if !delta.is_finite() => {
                    return Err(PlayerError::Script {
                        index,
                        reason: "skip must be finite",
                    });
                }
                _ => {}
            }
        }
        self.steps.sort_by(|a, b| a.at_secs.total_cmp(&b.at_secs));
        Ok(self)
    }

    /// Whether the script has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Send each step's action once its offset from `start` is reached.
///
/// Returns when the script is exhausted or the receiver is gone.
pub async fn feed(script: Script, start: Instant, tx: mpsc::UnboundedSender<HostAction>) {
    for step in script.steps {
        tokio::time::sleep_until(start + std::time::Duration::from_secs_f64(step.at_secs)).await;
        tracing::debug!(at_secs = step.at_secs, action = ?step.action, "Script step");
        if tx.send(step.action).is_err() {
            break; // Player finished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::parse_document;
    use std::path::Path;

    #[test]
    fn test_parse_ron_script() {
        let text = r#"(steps: [
            (at_secs: 5.0, action: Seek(0.5)),
            (at_secs: 2.0, action: Pause),
            (at_secs: 6.0, action: Key(key: "ArrowRight")),
            (at_secs: 7.0, action: Tap(interactive: true)),
        ])"#;
        let script: Script = parse_document(Path::new("script.ron"), text).unwrap();
        let script = script.validated().unwrap();

        let actions: Vec<_> = script.steps.iter().map(|s| s.action.clone()).collect();
        assert_eq!(
            actions,
            vec![
                HostAction::Pause,
                HostAction::Seek(0.5),
                HostAction::Key {
                    key: "ArrowRight".to_string(),
                    text_input: false
                },
                HostAction::Tap { interactive: true },
            ]
        );
    }

    #[test]
    fn test_parse_json_script() {
        let text = r#"{"steps": [
            {"at_secs": 1, "action": {"Speed": 2.0}},
            {"at_secs": 3, "action": "Stop"}
        ]}"#;
        let script: Script = parse_document(Path::new("script.json"), text).unwrap();
        assert_eq!(script.steps[0].action, HostAction::Speed(2.0));
        assert_eq!(script.steps[1].action, HostAction::Stop);
    }

    #[test]
    fn test_rejects_bad_steps() {
        let negative = Script {
            steps: vec![ScriptStep {
                at_secs: -1.0,
                action: HostAction::Pause,
            }],
        };
        assert!(matches!(
            negative.validated(),
            Err(PlayerError::Script { index: 0, .. })
        ));

        let seek = Script {
            steps: vec![
                ScriptStep {
                    at_secs: 1.0,
                    action: HostAction::Pause,
                },
                ScriptStep {
                    at_secs: 2.0,
                    action: HostAction::Seek(1.5),
                },
            ],
        };
        assert!(matches!(seek.validated(), Err(PlayerError::Script { index: 1, .. })));
    }
}
