//! Traefik metrics exporter core.
//!
//! # Data Flow
//! ```text
//! serving layer
//!     → Exporter::collect (facade)
//!     → engine.rs (lock, fetch, translate)
//!     → registry.rs (update / materialize labeled gauges)
//!     → Vec<MetricFamily> back to the serving layer
//! ```
//!
//! # Design Decisions
//! - One registry per process, shared through `Arc<Mutex<_>>`, never global
//! - Describe and collect take the same lock as a collection cycle

pub mod engine;
pub mod registry;

use std::sync::Arc;

use prometheus::core::Desc;
use prometheus::proto::MetricFamily;
use tokio::sync::Mutex;

use crate::health::HealthClient;

pub use engine::{CollectionEngine, CycleOutcome};
pub use registry::MetricRegistry;

/// Entry point used by the serving layer.
#[derive(Clone)]
pub struct Exporter {
    engine: Arc<CollectionEngine>,
    registry: Arc<Mutex<MetricRegistry>>,
}

impl Exporter {
    pub fn new(client: HealthClient, registry: MetricRegistry) -> Self {
        let registry = Arc::new(Mutex::new(registry));
        let engine = Arc::new(CollectionEngine::new(client, registry.clone()));
        Self { engine, registry }
    }

    /// Descriptors of every instrument known so far.
    pub async fn describe(&self) -> Vec<Desc> {
        self.registry.lock().await.descriptors()
    }

    /// Run one collection cycle.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        self.engine.collect().await
    }
}
