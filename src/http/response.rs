//! Response rendering for the exposition endpoints.
//!
//! # Responsibilities
//! - Encode metric families in the Prometheus text format
//! - Render the static landing page

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, TextEncoder};

/// Error type for metrics endpoint failures.
#[derive(Debug)]
pub enum MetricsError {
    EncodingFailed(String),
}

impl IntoResponse for MetricsError {
    fn into_response(self) -> Response {
        match self {
            MetricsError::EncodingFailed(e) => {
                tracing::error!(error = %e, "Failed to encode metrics");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response()
            }
        }
    }
}

/// Encoded exposition body with its content type.
pub struct Exposition {
    content_type: String,
    body: Vec<u8>,
}

impl Exposition {
    pub fn encode(families: &[MetricFamily]) -> Result<Self, MetricsError> {
        let encoder = TextEncoder::new();
        let mut body = Vec::new();
        encoder
            .encode(families, &mut body)
            .map_err(|e| MetricsError::EncodingFailed(e.to_string()))?;

        Ok(Self {
            content_type: encoder.format_type().to_string(),
            body,
        })
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl IntoResponse for Exposition {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

/// Landing page pointing at the telemetry path.
pub fn landing_page(telemetry_path: &str) -> Html<String> {
    Html(format!(
        "<html>\n\
         <head><title>Traefik Exporter</title></head>\n\
         <body>\n\
         <h1>Traefik Exporter</h1>\n\
         <p><a href='{telemetry_path}'>Metrics</a></p>\n\
         </body>\n\
         </html>\n"
    ))
}
