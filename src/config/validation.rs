//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resource URLs are present and well formed
//! - Value ranges (interval and timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be greater than 0"));
    }

    let primary = &config.resources.primary;
    check_probe_url("resources.primary.image_url", &primary.image_url, &mut errors);
    check_probe_url("resources.primary.style_url", &primary.style_url, &mut errors);

    let fallback = &config.resources.fallback;
    check_fallback_url("resources.fallback.image_url", &fallback.image_url, &mut errors);
    check_fallback_url("resources.fallback.style_url", &fallback.style_url, &mut errors);

    if config.monitor.interval_ms == 0 {
        errors.push(ValidationError::new("monitor.interval_ms", "must be greater than 0"));
    }
    if config.monitor.timeout_ms == 0 {
        errors.push(ValidationError::new("monitor.timeout_ms", "must be greater than 0"));
    }

    if config.site.cookie_name.is_empty() {
        errors.push(ValidationError::new("site.cookie_name", "is required"));
    }

    let format = config.observability.log_format.as_str();
    if format != "pretty" && format != "json" {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("must be \"pretty\" or \"json\" (got \"{}\")", format),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Probed URLs must be absolute http(s).
fn check_probe_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError::new(field, "is required"));
        return;
    }
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("must use http or https (got '{}')", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            field,
            format!("'{}' is not a valid URL: {}", value, e),
        )),
    }
}

/// Fallback URLs are only rendered, so site-relative paths are allowed too.
fn check_fallback_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.starts_with('/') {
        return;
    }
    check_probe_url(field, value, errors);
}
