//! Upstream health payload and scrape error definitions.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Decoded body of Traefik's `/health` endpoint.
///
/// Only the fields the exporter republishes are decoded; anything else in the
/// payload is ignored. Missing or `null` fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthRecord {
    /// Seconds since the proxy started.
    #[serde(deserialize_with = "null_as_zero")]
    pub uptime_sec: f64,

    /// Requests seen in the current window, keyed by status code.
    #[serde(deserialize_with = "null_as_empty")]
    pub status_code_count: HashMap<String, f64>,

    /// Requests seen since startup, keyed by status code.
    #[serde(deserialize_with = "null_as_empty")]
    pub total_status_code_count: HashMap<String, f64>,

    /// Sum of all response times, in seconds.
    #[serde(deserialize_with = "null_as_zero")]
    pub total_response_time_sec: f64,

    /// Mean response time, in seconds.
    #[serde(deserialize_with = "null_as_zero")]
    pub average_response_time_sec: f64,
}

impl HealthRecord {
    /// Decode a record from a raw response body.
    ///
    /// Only the first JSON value is read; anything after it is ignored. A
    /// top-level `null` yields an all-zero record.
    pub fn from_slice(body: &[u8]) -> Result<Self, ScrapeError> {
        let mut values =
            serde_json::Deserializer::from_slice(body).into_iter::<Option<HealthRecord>>();
        match values.next() {
            Some(Ok(record)) => Ok(record.unwrap_or_default()),
            Some(Err(e)) => Err(ScrapeError::Decode(e.to_string())),
            None => Err(ScrapeError::Decode("empty body".to_string())),
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<HashMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts = Option::<HashMap<String, Option<f64>>>::deserialize(deserializer)?;
    Ok(counts
        .unwrap_or_default()
        .into_iter()
        .map(|(code, n)| (code, n.unwrap_or_default()))
        .collect())
}

/// Why a scrape of the upstream failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScrapeError {
    /// Connect failure, transport error or expired deadline.
    #[error("Can't scrape Traefik: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("Can't scrape Traefik: status {0}")]
    UpstreamStatus(u16),

    /// Body was not a valid health payload.
    #[error("Can't scrape Traefik: invalid JSON body: {0}")]
    Decode(String),
}

impl ScrapeError {
    /// Stable tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Network(_) => "network",
            ScrapeError::UpstreamStatus(_) => "status",
            ScrapeError::Decode(_) => "decode",
        }
    }
}
