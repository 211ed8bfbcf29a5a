//! Prometheus exporter for Traefik's health endpoint.
//!
//! # Architecture Overview
//!
//! ```text
//!  Prometheus                ┌──────────────────────────────────────────────┐
//!  scrape                    │               TRAEFIK EXPORTER                │
//!  ──────────────────────────┼─▶ http::server ──▶ exporter::Exporter         │
//!                            │                        │                      │
//!                            │                        ▼                      │
//!                            │               exporter::engine ──▶ health ────┼──▶ Traefik
//!                            │                        │          client      │    /health
//!                            │                        ▼                      │
//!  text exposition           │               exporter::registry              │
//!  ◀─────────────────────────┼── http::response ◀─────┘                      │
//!                            │                                               │
//!                            │  config + cli │ observability │ lifecycle     │
//!                            └──────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod exporter;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ExporterConfig;
pub use exporter::Exporter;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
