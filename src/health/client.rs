//! Upstream health endpoint client.
//!
//! # Responsibilities
//! - Issue one GET against the configured Traefik health URI
//! - Bound the whole exchange (connect, headers, body) by a single deadline
//! - Follow up to ten redirects within that deadline
//! - Classify failures as network, status or decode errors

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, uri::PathAndQuery, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::health::types::{HealthRecord, ScrapeError};

/// Upper bound on the health payload size.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

const USER_AGENT: &str = concat!("traefik-exporter/", env!("CARGO_PKG_VERSION"));

/// Client for Traefik's health endpoint.
#[derive(Clone)]
pub struct HealthClient {
    uri: Uri,
    timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl HealthClient {
    pub fn new(uri: Uri, timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            uri,
            timeout,
            client,
        }
    }

    /// Fetch and decode one health record. Never retries.
    pub async fn fetch(&self) -> Result<HealthRecord, ScrapeError> {
        match time::timeout(self.timeout, self.fetch_inner()).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Network(format!(
                "timed out after {:?}",
                self.timeout
            ))),
        }
    }

    async fn fetch_inner(&self) -> Result<HealthRecord, ScrapeError> {
        let mut uri = self.uri.clone();
        let mut hops = 0;

        let response = loop {
            let request = Request::builder()
                .method(Method::GET)
                .uri(uri.clone())
                .header(header::USER_AGENT, USER_AGENT)
                .header(header::ACCEPT, "application/json")
                .body(Body::empty())
                .map_err(|e| ScrapeError::Network(e.to_string()))?;

            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ScrapeError::Network(e.to_string()))?;

            if !is_followed_redirect(response.status()) {
                break response;
            }
            let Some(location) = response.headers().get(header::LOCATION) else {
                // Nothing to follow; surfaces as a status failure below.
                break response;
            };

            hops += 1;
            if hops > MAX_REDIRECTS {
                return Err(ScrapeError::Network(format!(
                    "stopped after {} redirects",
                    MAX_REDIRECTS
                )));
            }

            let next = resolve_location(&uri, location)?;
            tracing::debug!(from = %uri, to = %next, status = %response.status(), "Following redirect");
            uri = next;
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus(status.as_u16()));
        }

        let body = axum::body::to_bytes(Body::new(response.into_body()), MAX_BODY_BYTES)
            .await
            .map_err(|e| ScrapeError::Network(format!("failed to read body: {}", e)))?;

        tracing::trace!(uri = %uri, bytes = body.len(), "Health payload received");

        HealthRecord::from_slice(&body)
    }
}

fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolve a `Location` header against the URI that produced it.
fn resolve_location(base: &Uri, location: &header::HeaderValue) -> Result<Uri, ScrapeError> {
    let location = location
        .to_str()
        .map_err(|e| ScrapeError::Network(format!("invalid redirect location: {}", e)))?;
    let target: Uri = location
        .parse()
        .map_err(|e| ScrapeError::Network(format!("invalid redirect location '{}': {}", location, e)))?;

    let resolved = if target.scheme().is_some() {
        target
    } else {
        let path = if location.starts_with('/') {
            location.to_string()
        } else {
            // Relative reference: replace the last segment of the base path.
            let base_path = base.path();
            let dir = &base_path[..base_path.rfind('/').map_or(0, |i| i + 1)];
            format!("{}{}", if dir.is_empty() { "/" } else { dir }, location)
        };
        let path_and_query: PathAndQuery = path
            .parse()
            .map_err(|e| ScrapeError::Network(format!("invalid redirect location '{}': {}", location, e)))?;

        let mut parts = base.clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        Uri::from_parts(parts)
            .map_err(|e| ScrapeError::Network(format!("invalid redirect location '{}': {}", location, e)))?
    };

    if resolved.scheme_str() != Some("http") {
        return Err(ScrapeError::Network(format!(
            "unsupported redirect to '{}'",
            resolved
        )));
    }
    Ok(resolved)
}
