//! Exporter self-metrics.
//!
//! # Metrics
//! - `traefik_exporter_build_info` (gauge): always 1, labeled with the crate
//!   version
//!
//! Rendered by the serving layer on every scrape, independent of whether the
//! upstream scrape succeeded.

use prometheus::{Gauge, Opts};

pub const EXPORTER_NAMESPACE: &str = "traefik_exporter";

pub fn build_info() -> prometheus::Result<Gauge> {
    let gauge = Gauge::with_opts(
        Opts::new(
            "build_info",
            "A metric with a constant '1' value labeled by the version of traefik_exporter.",
        )
        .namespace(EXPORTER_NAMESPACE)
        .const_label("version", env!("CARGO_PKG_VERSION")),
    )?;
    gauge.set(1.0);
    Ok(gauge)
}
