//! Scrape-translate-publish cycle.
//!
//! # States
//! ```text
//! Scraping → Published         (fetch + decode succeeded)
//! Scraping → PublishedFailure  (network, status or decode error)
//! ```
//! Both states are terminal; every trigger starts a fresh cycle.

use std::sync::Arc;
use std::time::Instant;

use prometheus::proto::MetricFamily;
use tokio::sync::Mutex;

use crate::exporter::registry::MetricRegistry;
use crate::health::{HealthClient, HealthRecord, ScrapeError};

/// Terminal state of one collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Published,
    PublishedFailure,
}

/// Runs one collection cycle at a time against the shared registry.
pub struct CollectionEngine {
    client: HealthClient,
    registry: Arc<Mutex<MetricRegistry>>,
}

impl CollectionEngine {
    pub fn new(client: HealthClient, registry: Arc<Mutex<MetricRegistry>>) -> Self {
        Self { client, registry }
    }

    /// Scrape the upstream and return the families to emit.
    ///
    /// The registry lock is held from the fetch until the families are read,
    /// so concurrent callers queue and each sees exactly one scrape.
    pub async fn collect(&self) -> Vec<MetricFamily> {
        let mut registry = self.registry.lock().await;
        let start = Instant::now();

        let scraped = self.client.fetch().await;
        let (outcome, families) = publish(&mut registry, scraped);

        tracing::debug!(
            outcome = ?outcome,
            families = families.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Collection cycle finished"
        );

        families
    }
}

/// Translate one scrape result into registry updates.
pub fn publish(
    registry: &mut MetricRegistry,
    scraped: Result<HealthRecord, ScrapeError>,
) -> (CycleOutcome, Vec<MetricFamily>) {
    match scraped {
        Ok(record) => {
            apply_record(registry, &record);
            (CycleOutcome::Published, registry.all_instruments())
        }
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "Scrape failed");
            registry.up().set(0.0);
            (CycleOutcome::PublishedFailure, registry.liveness_only())
        }
    }
}

fn apply_record(registry: &mut MetricRegistry, record: &HealthRecord) {
    registry.up().set(1.0);
    registry.uptime().set(record.uptime_sec);
    registry.response_time_total().set(record.total_response_time_sec);
    registry.response_time_avg().set(record.average_response_time_sec);

    registry.reset_current_to_zero();
    for (status_code, count) in &record.status_code_count {
        registry.ensure_current_instrument(status_code).set(*count);
    }

    // Totals are cumulative upstream; codes missing this cycle keep their
    // last value.
    for (status_code, count) in &record.total_status_code_count {
        registry.ensure_total_instrument(status_code).set(*count);
    }
}
