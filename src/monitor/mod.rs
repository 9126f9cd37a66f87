//! Stream health monitoring subsystem.
//!
//! # Data Flow
//! ```text
//! Every tick (runner.rs):
//!     OBS stream status + media cursor
//!     → verdict.rs (bitrate threshold, freeze detection)
//!     → scene.rs (current scene vs verdict)
//!     → at most one SetCurrentProgramScene
//! ```
//!
//! # Design Decisions
//! - Both signals are always evaluated; either one failing is enough
//! - Scene changes are edge-triggered: no command while scene matches verdict
//! - Cursor memory is cleared whenever the OBS session is lost
//! - A failed tick never ends the loop

pub mod error;
pub mod runner;
pub mod scene;
pub mod verdict;

pub use error::MonitorError;
pub use runner::{MonitorSettings, StreamMonitor, TickOutcome};
pub use scene::{SceneAction, SceneKind};
pub use verdict::{UnhealthyReason, Verdict};
