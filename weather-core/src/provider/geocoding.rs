use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    Config,
    error::QueryError,
    model::{GeoLocation, PlaceName, UNKNOWN_COUNTRY},
};

use super::{LocationResolver, get_body};

/// Open-Meteo name search.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
    language: String,
    count: u8,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            url: config.geocoding_url.clone(),
            language: config.language.clone(),
            count: config.result_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    // Candidates stay untyped; only the first one has to be well formed.
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
}

/// Pick the first candidate from a name-search body.
fn parse_search(place: &PlaceName, body: &str) -> Result<GeoLocation, QueryError> {
    let parsed: SearchResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::MalformedResponse(format!("name search body: {e}")))?;

    let Some(first) = parsed.results.and_then(|r| r.into_iter().next()) else {
        debug!(%place, "name search returned no candidates");
        return Err(QueryError::NotFound { place: place.to_string() });
    };

    let best: SearchResult = serde_json::from_value(first)
        .map_err(|e| QueryError::MalformedResponse(format!("first search result: {e}")))?;

    if !(-90.0..=90.0).contains(&best.latitude) || !(-180.0..=180.0).contains(&best.longitude) {
        return Err(QueryError::MalformedResponse(format!(
            "coordinates out of range: ({}, {})",
            best.latitude, best.longitude
        )));
    }

    let country = best
        .country
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

    Ok(GeoLocation {
        latitude: best.latitude,
        longitude: best.longitude,
        resolved_name: best.name,
        country,
    })
}

#[async_trait]
impl LocationResolver for OpenMeteoGeocoder {
    async fn resolve(&self, place: &PlaceName) -> Result<GeoLocation, QueryError> {
        let query = [
            ("name", place.as_str().to_string()),
            ("count", self.count.to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let body = get_body(&self.http, &self.url, &query, "name search").await?;
        let location = parse_search(place, &body)?;

        info!(
            name = %location.resolved_name,
            country = %location.country,
            lat = location.latitude,
            lon = location.longitude,
            "resolved location"
        );
        Ok(location)
    }
}
