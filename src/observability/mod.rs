//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (exporter build info gauge)
//! ```
//!
//! # Design Decisions
//! - Structured fields over formatted messages
//! - Upstream metrics live in the exporter core, not here

pub mod logging;
pub mod metrics;
