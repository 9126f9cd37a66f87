//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to OBS:
//!     → timeouts.rs (enforce the per-call deadline)
//!
//! Monitor task panics:
//!     → backoff.rs (delay before the supervisor restarts it)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Failed ticks are not retried; the next tick is the retry

pub mod backoff;
pub mod timeouts;
