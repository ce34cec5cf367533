//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (template name exists in the set)
//! - Validate value ranges (status codes, addresses, header names)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ErrorPagesConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::ErrorPagesConfig;
use crate::rotation::RotationMode;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("default_code {0} is not a valid HTTP status code")]
    InvalidDefaultCode(u16),

    #[error("template \"{0}\" is not defined in [templates]")]
    UnknownTemplate(String),

    #[error("rotation mode {0:?} needs at least one template")]
    NoTemplates(RotationMode),

    #[error("invalid bind address \"{0}\"")]
    InvalidBindAddress(String),

    #[error("invalid metrics address \"{0}\"")]
    InvalidMetricsAddress(String),

    #[error("invalid code pattern \"{0}\" (expected 3 digits or '*')")]
    InvalidCodePattern(String),

    #[error("invalid proxy header name \"{0}\"")]
    InvalidProxyHeader(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ErrorPagesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !(100..=999).contains(&config.default_code) {
        errors.push(ValidationError::InvalidDefaultCode(config.default_code));
    }

    match config.rotation_mode {
        RotationMode::Disabled | RotationMode::RandomOnStartup => {
            if config.templates.get(&config.template_name).is_none() {
                errors.push(ValidationError::UnknownTemplate(config.template_name.clone()));
            }
        }
        RotationMode::RandomOnEachRequest | RotationMode::RandomHourly | RotationMode::RandomDaily => {
            if config.templates.is_empty() {
                errors.push(ValidationError::NoTemplates(config.rotation_mode));
            }
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    for key in config.codes.keys() {
        let valid = key.len() == 3 && key.chars().all(|c| c.is_ascii_digit() || c == '*');
        if !valid {
            errors.push(ValidationError::InvalidCodePattern(key.to_string()));
        }
    }

    for header in &config.proxy_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidProxyHeader(header.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
