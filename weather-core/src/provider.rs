use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, warn};

use crate::{
    Config,
    error::QueryError,
    model::{ConditionsData, GeoLocation, PlaceName},
};

pub mod forecast;
pub mod geocoding;

pub use forecast::OpenMeteoForecast;
pub use geocoding::OpenMeteoGeocoder;

/// Turns a place name into the best-matching location.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    /// Yields `NotFound` for an empty search, `Network` for transport/status failures.
    async fn resolve(&self, place: &PlaceName) -> Result<GeoLocation, QueryError>;
}

/// Retrieves the current atmospheric snapshot at a location.
#[async_trait]
pub trait ConditionsFetcher: Send + Sync + Debug {
    /// Yields `Network` for transport/status failures and `MalformedResponse`
    /// when any required metric is absent.
    async fn fetch(&self, location: &GeoLocation) -> Result<ConditionsData, QueryError>;
}

/// HTTP client shared by both upstream calls.
///
/// Idle connections are not pooled, so each call owns its connection and
/// drops it on every exit path.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .pool_max_idle_per_host(0)
        .user_agent(concat!("weather-core/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}

/// Perform one GET and return the body of a successful response.
async fn get_body(
    http: &Client,
    url: &str,
    query: &[(&str, String)],
    service: &str,
) -> Result<String, QueryError> {
    debug!(%url, ?query, "sending {service} request");

    let res = http.get(url).query(query).send().await.map_err(|e| {
        warn!(error = %e, "{service} request failed");
        QueryError::from(e)
    })?;

    let status = res.status();
    let body = res.text().await.map_err(|e| {
        warn!(error = %e, "failed to read {service} response body");
        QueryError::from(e)
    })?;

    if !status.is_success() {
        warn!(%status, "{service} returned non-success status");
        return Err(QueryError::Network(format!(
            "{service} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }

    Ok(body)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
