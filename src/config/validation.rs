//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Detect a scene pair that cannot be told apart
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} {reason}")]
    OutOfRange { field: &'static str, reason: &'static str },

    #[error("scenes.main and scenes.brb must differ (both are '{0}')")]
    SameScene(String),
}

/// Check the configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "server.bind_address",
            value: config.server.bind_address.clone(),
        });
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "server.request_timeout_secs" });
    }

    if config.obs.host.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "obs.host" });
    }
    if config.obs.port == 0 {
        errors.push(ValidationError::Zero { field: "obs.port" });
    }
    if config.obs.timeout_secs == 0 {
        errors.push(ValidationError::Zero { field: "obs.timeout_secs" });
    }

    if config.scenes.main.is_empty() {
        errors.push(ValidationError::Empty { field: "scenes.main" });
    }
    if config.scenes.brb.is_empty() {
        errors.push(ValidationError::Empty { field: "scenes.brb" });
    }
    if !config.scenes.main.is_empty() && config.scenes.main == config.scenes.brb {
        errors.push(ValidationError::SameScene(config.scenes.main.clone()));
    }

    if config.monitor.source_name.is_empty() {
        errors.push(ValidationError::Empty { field: "monitor.source_name" });
    }

    if config.supervisor.max_delay_ms < config.supervisor.base_delay_ms {
        errors.push(ValidationError::OutOfRange {
            field: "supervisor.max_delay_ms",
            reason: "must not be below supervisor.base_delay_ms",
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
