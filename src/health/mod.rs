//! Upstream health scraping subsystem.
//!
//! # Data Flow
//! ```text
//! CollectionEngine
//!     → client.rs (GET <traefik.address> with deadline)
//!     → types.rs (decode HealthRecord | classify ScrapeError)
//!     → back to the engine for translation
//! ```
//!
//! # Design Decisions
//! - One request per collection cycle, no retries
//! - A single deadline covers connect and the full body read
//! - Decode is best effort: unknown fields ignored, missing fields zeroed

pub mod client;
pub mod types;

pub use client::HealthClient;
pub use types::{HealthRecord, ScrapeError};
