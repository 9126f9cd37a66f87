//! Scene presentation state machine.
//!
//! # States
//! - Main: anything other than the BRB scene is on program output
//! - Brb: the be-right-back scene is on program output
//!
//! # State Transitions
//! ```text
//! Main → Brb: verdict unhealthy
//! Brb → Main: verdict healthy
//! ```
//!
//! The state is read back from OBS every tick, so a scene changed by hand is
//! picked up on the next tick.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Main,
    Brb,
}

impl SceneKind {
    pub fn classify(current_scene: &str, brb_scene: &str) -> Self {
        if current_scene == brb_scene {
            SceneKind::Brb
        } else {
            SceneKind::Main
        }
    }
}

/// Command to issue after a verdict, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneAction {
    SwitchToBrb,
    SwitchToMain,
    Hold,
}

/// Edge-triggered: only a mismatch between verdict and scene produces a switch.
pub fn decide(healthy: bool, current: SceneKind) -> SceneAction {
    match (healthy, current) {
        (false, SceneKind::Main) => SceneAction::SwitchToBrb,
        (true, SceneKind::Brb) => SceneAction::SwitchToMain,
        _ => SceneAction::Hold,
    }
}
