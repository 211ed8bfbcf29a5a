//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file. Every
//! field has a default so an empty file (or no file) is a valid config.

use std::net::{AddrParseError, SocketAddr};

use serde::{Deserialize, Serialize};

/// Root configuration for the exporter.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ExporterConfig {
    /// Exposition endpoint settings.
    pub web: WebConfig,

    /// Upstream Traefik health endpoint.
    pub traefik: TraefikConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Exposition endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WebConfig {
    /// Bind address (e.g., "0.0.0.0:9000").
    pub listen_address: String,

    /// Path under which metrics are exposed.
    pub telemetry_path: String,

    /// Upper bound on serving a single request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9000".to_string(),
            telemetry_path: "/metrics".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl WebConfig {
    /// Parsed listen address. A bare port (`:9000`) binds every interface.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        match self.listen_address.strip_prefix(':') {
            Some(port) => format!("0.0.0.0:{}", port).parse(),
            None => self.listen_address.parse(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TraefikConfig {
    /// Health endpoint URI (http only).
    pub address: String,

    /// Deadline for one scrape (connect + full response), in seconds.
    pub timeout_secs: u64,
}

impl Default for TraefikConfig {
    fn default() -> Self {
        Self {
            address: "http://localhost:8080/health".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
