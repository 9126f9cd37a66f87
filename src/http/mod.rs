//! Control surface subsystem.
//!
//! # Data Flow
//! ```text
//! GET /start | /stop | /health
//!     → server.rs (Axum, request ID, timeout, trace)
//!     → handlers.rs (one OBS call each)
//!     → response.rs ({status, message} + status code)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::{ApiResponse, ApiStatus, ControlError};
pub use server::{AppState, HttpServer, X_REQUEST_ID};
