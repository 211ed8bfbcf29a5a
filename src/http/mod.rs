//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Prometheus scrape
//!     → server.rs (Axum router, trace + timeout layers)
//!     → Exporter::collect
//!     → response.rs (text exposition encoding)
//!     → Send to collector
//! ```

pub mod response;
pub mod server;

pub use server::HttpServer;
