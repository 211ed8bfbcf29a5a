//! Exported instrument registry.
//!
//! # Responsibilities
//! - Declare the fixed, unlabeled gauges at construction
//! - Materialize per-status-code gauges the first time a code is observed
//! - Produce metric families and descriptors for the serving layer
//!
//! # Design Decisions
//! - No internal locking: every mutator takes `&mut self` and the engine
//!   holds its cycle lock for the whole translation
//! - Labeled gauges are never evicted; a status code once seen stays exported
//! - Current and total maps are independent

use std::collections::HashMap;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, GaugeVec, Opts};

/// Namespace prefixed to every exported metric.
pub const NAMESPACE: &str = "traefik";

/// Label carrying the HTTP status code on per-code gauges.
pub const STATUS_CODE_LABEL: &str = "statusCode";

fn gauge(name: &str, help: &str) -> prometheus::Result<Gauge> {
    Gauge::with_opts(Opts::new(name, help).namespace(NAMESPACE))
}

fn status_code_gauges(name: &str, help: &str) -> prometheus::Result<GaugeVec> {
    GaugeVec::new(Opts::new(name, help).namespace(NAMESPACE), &[STATUS_CODE_LABEL])
}

/// Owns every instrument the exporter publishes.
pub struct MetricRegistry {
    up: Gauge,
    uptime: Gauge,
    response_time_total: Gauge,
    response_time_avg: Gauge,

    count_current: GaugeVec,
    count_total: GaugeVec,

    /// Materialized children of `count_current`, keyed by status code.
    current: HashMap<String, Gauge>,
    /// Materialized children of `count_total`, keyed by status code.
    total: HashMap<String, Gauge>,
}

impl MetricRegistry {
    /// Declare the fixed instruments. Liveness starts at 0.
    pub fn new() -> prometheus::Result<Self> {
        let up = gauge("up", "Is traefik up ?")?;
        up.set(0.0);

        Ok(Self {
            up,
            uptime: gauge("uptime", "Current Traefik uptime")?,
            response_time_total: gauge(
                "request_response_time_total",
                "Total response time of Traefik requests",
            )?,
            response_time_avg: gauge(
                "request_response_time_avg",
                "Average response time of Traefik requests",
            )?,
            count_current: status_code_gauges(
                "request_count_current",
                "Number of request Traefik is handling",
            )?,
            count_total: status_code_gauges(
                "request_count_total",
                "Number of request handled by Traefik",
            )?,
            current: HashMap::new(),
            total: HashMap::new(),
        })
    }

    pub fn up(&self) -> &Gauge {
        &self.up
    }

    pub fn uptime(&self) -> &Gauge {
        &self.uptime
    }

    pub fn response_time_total(&self) -> &Gauge {
        &self.response_time_total
    }

    pub fn response_time_avg(&self) -> &Gauge {
        &self.response_time_avg
    }

    /// Current-count gauge for `status_code`, created at 0 if absent.
    pub fn ensure_current_instrument(&mut self, status_code: &str) -> &Gauge {
        let family = &self.count_current;
        self.current
            .entry(status_code.to_string())
            .or_insert_with(|| {
                tracing::debug!(status_code, "Materializing current request count gauge");
                family.with_label_values(&[status_code])
            })
    }

    /// Total-count gauge for `status_code`, created at 0 if absent.
    pub fn ensure_total_instrument(&mut self, status_code: &str) -> &Gauge {
        let family = &self.count_total;
        self.total
            .entry(status_code.to_string())
            .or_insert_with(|| {
                tracing::debug!(status_code, "Materializing total request count gauge");
                family.with_label_values(&[status_code])
            })
    }

    /// Zero every current-count gauge so codes missing from the next scrape
    /// read 0 instead of a stale value.
    pub fn reset_current_to_zero(&mut self) {
        for gauge in self.current.values() {
            gauge.set(0.0);
        }
    }

    /// Fixed instruments followed by every materialized labeled instrument.
    pub fn all_instruments(&self) -> Vec<MetricFamily> {
        let mut families = Vec::with_capacity(6);
        families.extend(self.up.collect());
        families.extend(self.uptime.collect());
        families.extend(self.response_time_total.collect());
        families.extend(self.response_time_avg.collect());
        families.extend(self.count_current.collect());
        families.extend(self.count_total.collect());

        // An untouched vec collects to a family without samples, which the
        // text encoder rejects.
        families.retain(|mf| !mf.get_metric().is_empty());
        families
    }

    /// Only the liveness gauge, emitted on failed cycles.
    pub fn liveness_only(&self) -> Vec<MetricFamily> {
        self.up.collect()
    }

    /// Descriptors of every instrument currently known.
    pub fn descriptors(&self) -> Vec<Desc> {
        let mut descs: Vec<Desc> = Vec::new();
        for collector in [
            &self.up,
            &self.uptime,
            &self.response_time_total,
            &self.response_time_avg,
        ] {
            descs.extend(collector.desc().into_iter().cloned());
        }
        if !self.current.is_empty() {
            descs.extend(self.count_current.desc().into_iter().cloned());
        }
        if !self.total.is_empty() {
            descs.extend(self.count_total.desc().into_iter().cloned());
        }
        descs
    }

    pub fn current_count(&self, status_code: &str) -> Option<f64> {
        self.current.get(status_code).map(Gauge::get)
    }

    pub fn total_count(&self, status_code: &str) -> Option<f64> {
        self.total.get(status_code).map(Gauge::get)
    }

    pub fn is_up(&self) -> bool {
        self.up.get() == 1.0
    }

    /// Status codes with a materialized current-count gauge, sorted.
    pub fn current_status_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.current.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Status codes with a materialized total-count gauge, sorted.
    pub fn total_status_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.total.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> Option<&'a MetricFamily> {
        families.iter().find(|mf| mf.get_name() == name)
    }

    #[test]
    fn test_fixed_instruments_declared() {
        let registry = MetricRegistry::new().unwrap();
        let names: Vec<String> = registry
            .all_instruments()
            .iter()
            .map(|mf| mf.get_name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "traefik_up",
                "traefik_uptime",
                "traefik_request_response_time_total",
                "traefik_request_response_time_avg",
            ]
        );
        assert!(!registry.is_up());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let mut registry = MetricRegistry::new().unwrap();
        registry.ensure_current_instrument("200").set(5.0);
        registry.ensure_current_instrument("200");

        assert_eq!(registry.current_count("200"), Some(5.0));
        assert_eq!(registry.current_status_codes(), vec!["200"]);

        let families = registry.all_instruments();
        let current = family(&families, "traefik_request_count_current").unwrap();
        assert_eq!(current.get_metric().len(), 1);
    }

    #[test]
    fn test_new_instrument_starts_at_zero_with_label() {
        let mut registry = MetricRegistry::new().unwrap();
        assert_eq!(registry.ensure_total_instrument("502").get(), 0.0);

        let families = registry.all_instruments();
        let total = family(&families, "traefik_request_count_total").unwrap();
        let label = &total.get_metric()[0].get_label()[0];
        assert_eq!(label.get_name(), STATUS_CODE_LABEL);
        assert_eq!(label.get_value(), "502");
    }

    #[test]
    fn test_reset_only_touches_current() {
        let mut registry = MetricRegistry::new().unwrap();
        registry.ensure_current_instrument("200").set(5.0);
        registry.ensure_current_instrument("404").set(2.0);
        registry.ensure_total_instrument("200").set(100.0);

        registry.reset_current_to_zero();

        assert_eq!(registry.current_count("200"), Some(0.0));
        assert_eq!(registry.current_count("404"), Some(0.0));
        assert_eq!(registry.total_count("200"), Some(100.0));
    }

    #[test]
    fn test_maps_are_independent() {
        let mut registry = MetricRegistry::new().unwrap();
        registry.ensure_total_instrument("500");

        assert_eq!(registry.current_count("500"), None);
        assert_eq!(registry.total_status_codes(), vec!["500"]);
        assert!(registry.current_status_codes().is_empty());

        let families = registry.all_instruments();
        assert!(family(&families, "traefik_request_count_current").is_none());
        assert!(family(&families, "traefik_request_count_total").is_some());
    }

    #[test]
    fn test_liveness_only() {
        let mut registry = MetricRegistry::new().unwrap();
        registry.ensure_current_instrument("200");

        let families = registry.liveness_only();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].get_name(), "traefik_up");
    }

    #[test]
    fn test_descriptors_track_materialized_families() {
        let mut registry = MetricRegistry::new().unwrap();
        assert_eq!(registry.descriptors().len(), 4);

        registry.ensure_current_instrument("200");
        let descs = registry.descriptors();
        assert_eq!(descs.len(), 5);

        let current = descs
            .iter()
            .find(|d| d.fq_name == "traefik_request_count_current")
            .unwrap();
        assert_eq!(current.variable_labels, vec![STATUS_CODE_LABEL.to_string()]);
    }
}
