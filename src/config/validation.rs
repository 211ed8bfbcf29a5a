//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, paths and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ExporterConfig → Result<(), Vec<ValidationError>>
//! - Runs once on the fully resolved config (defaults + file + flags)

use axum::http::Uri;

use crate::config::schema::ExporterConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the resolved configuration.
pub fn validate_config(config: &ExporterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.web.socket_addr() {
        errors.push(ValidationError::new(
            "web.listen_address",
            format!("'{}' is not a socket address: {}", config.web.listen_address, e),
        ));
    }

    let path = &config.web.telemetry_path;
    if !path.starts_with('/') {
        errors.push(ValidationError::new("web.telemetry_path", "must start with '/'"));
    } else if path == "/" {
        errors.push(ValidationError::new(
            "web.telemetry_path",
            "'/' is reserved for the landing page",
        ));
    }

    if config.web.request_timeout_secs == 0 {
        errors.push(ValidationError::new("web.request_timeout_secs", "must be > 0"));
    }

    match config.traefik.address.parse::<Uri>() {
        Ok(uri) => {
            if uri.scheme_str() != Some("http") {
                errors.push(ValidationError::new(
                    "traefik.address",
                    format!("'{}' must use the http scheme", config.traefik.address),
                ));
            }
            if uri.authority().is_none() {
                errors.push(ValidationError::new(
                    "traefik.address",
                    format!("'{}' has no host", config.traefik.address),
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new(
            "traefik.address",
            format!("'{}' is not a valid URI: {}", config.traefik.address, e),
        )),
    }

    if config.traefik.timeout_secs == 0 {
        errors.push(ValidationError::new("traefik.timeout_secs", "must be > 0"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "'{}' is not one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
