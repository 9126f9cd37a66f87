//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging/metrics → Connect OBS → Start monitor → Start listener
//!
//! Supervision (supervisor.rs):
//!     Monitor panics → Backoff → Restart with fresh state
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Broadcast → Monitor exits, listener drains → Exit
//! ```
//!
//! # Design Decisions
//! - Failing to reach OBS at startup is not fatal
//! - Bad config or an unbindable listener is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::Shutdown;
