//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the telemetry and landing page handlers
//! - Wire up middleware (tracing, request timeout)
//! - Serve on a bound listener until shutdown is broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use prometheus::core::Collector;
use prometheus::Gauge;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::WebConfig;
use crate::exporter::Exporter;
use crate::http::response::{landing_page, Exposition, MetricsError};
use crate::lifecycle::shutdown;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub exporter: Exporter,
    pub build_info: Gauge,
    pub telemetry_path: Arc<str>,
}

/// HTTP server exposing the exporter.
pub struct HttpServer {
    router: Router,
    config: WebConfig,
}

impl HttpServer {
    pub fn new(config: WebConfig, exporter: Exporter) -> prometheus::Result<Self> {
        let state = AppState {
            exporter,
            build_info: metrics::build_info()?,
            telemetry_path: Arc::from(config.telemetry_path.as_str()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    #[allow(deprecated)]
    fn build_router(config: &WebConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.telemetry_path, get(metrics_handler))
            .route("/", get(index_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            telemetry_path = %self.config.telemetry_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Scrape Traefik and render everything in the text exposition format.
async fn metrics_handler(State(state): State<AppState>) -> Result<Exposition, MetricsError> {
    let mut families = state.exporter.collect().await;
    families.extend(state.build_info.collect());

    Exposition::encode(&families)
}

async fn index_handler(State(state): State<AppState>) -> impl IntoResponse {
    landing_page(&state.telemetry_path)
}
