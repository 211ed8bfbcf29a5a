//! Command-line flags.
//!
//! Flags override values from the config file, which override built-in
//! defaults.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{load_config, ConfigError, ExporterConfig};

#[derive(Debug, Parser)]
#[command(name = "traefik-exporter")]
#[command(version, about = "Prometheus exporter for Traefik's health endpoint", long_about = None)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on for web interface and telemetry.
    #[arg(long = "web.listen-address")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "web.telemetry-path")]
    pub telemetry_path: Option<String>,

    /// HTTP API address of a Traefik or agent.
    #[arg(long = "traefik.address")]
    pub traefik_address: Option<String>,

    /// Timeout in seconds for trying to get stats from Traefik.
    #[arg(long = "timeout")]
    pub timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long = "log-level")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Resolve defaults, the optional config file, then flag overrides.
    pub fn resolve_config(&self) -> Result<ExporterConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ExporterConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ExporterConfig) {
        if let Some(addr) = &self.listen_address {
            config.web.listen_address = addr.clone();
        }
        if let Some(path) = &self.telemetry_path {
            config.web.telemetry_path = path.clone();
        }
        if let Some(addr) = &self.traefik_address {
            config.traefik.address = addr.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.traefik.timeout_secs = secs;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let cli = Cli::try_parse_from(["traefik-exporter"]).unwrap();
        assert_eq!(cli.resolve_config().unwrap(), ExporterConfig::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "traefik-exporter",
            "--web.listen-address",
            "127.0.0.1:9100",
            "--web.telemetry-path",
            "/stats",
            "--traefik.address",
            "http://traefik:8080/health",
            "--timeout",
            "2",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.web.listen_address, "127.0.0.1:9100");
        assert_eq!(config.web.telemetry_path, "/stats");
        assert_eq!(config.traefik.address, "http://traefik:8080/health");
        assert_eq!(config.traefik.timeout_secs, 2);
        assert_eq!(config.observability.log_level, "debug");
        assert_eq!(config.web.request_timeout_secs, 30);
    }

    #[test]
    fn test_flags_override_file() {
        let path = std::env::temp_dir().join(format!(
            "traefik-exporter-cli-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "[traefik]\naddress = \"http://from-file:8080/health\"\ntimeout_secs = 9\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "traefik-exporter".to_string(),
            "--config".to_string(),
            path.display().to_string(),
            "--timeout".to_string(),
            "3".to_string(),
        ])
        .unwrap();
        let config = cli.resolve_config();
        let _ = std::fs::remove_file(&path);
        let config = config.unwrap();

        assert_eq!(config.traefik.address, "http://from-file:8080/health");
        assert_eq!(config.traefik.timeout_secs, 3);
    }

    #[test]
    fn test_bare_port_listen_address_flag() {
        let cli = Cli::try_parse_from(["traefik-exporter", "--web.listen-address", ":9000"]).unwrap();
        let config = cli.resolve_config().unwrap();

        assert_eq!(crate::config::validate_config(&config), Ok(()));
        assert_eq!(config.web.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["traefik-exporter", "--timeout", "5s"]).is_err());
    }
}
