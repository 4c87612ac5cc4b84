use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Config,
    error::QueryError,
    model::{ConditionsData, GeoLocation},
};

use super::{ConditionsFetcher, get_body};

/// Metrics requested from the conditions service. Units are the service
/// defaults: Celsius, percent, km/h.
pub const CURRENT_METRICS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

/// Open-Meteo current conditions.
#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, config: &Config) -> Self {
        Self { http, url: config.forecast_url.clone() }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: Option<String>,
    temperature_2m: Option<f64>,
    relative_humidity_2m: Option<f64>,
    weather_code: Option<i32>,
    wind_speed_10m: Option<f64>,
}

fn parse_conditions(body: &str) -> Result<ConditionsData, QueryError> {
    let parsed: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| QueryError::MalformedResponse(format!("conditions body: {e}")))?;

    let current = parsed
        .current
        .ok_or_else(|| QueryError::MalformedResponse("missing field 'current'".into()))?;

    let (Some(temperature), Some(humidity), Some(code), Some(wind)) = (
        current.temperature_2m,
        current.relative_humidity_2m,
        current.weather_code,
        current.wind_speed_10m,
    ) else {
        let missing: Vec<&str> = [
            ("temperature_2m", current.temperature_2m.is_none()),
            ("relative_humidity_2m", current.relative_humidity_2m.is_none()),
            ("weather_code", current.weather_code.is_none()),
            ("wind_speed_10m", current.wind_speed_10m.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        return Err(QueryError::MalformedResponse(format!(
            "missing field(s) in 'current': {}",
            missing.join(", ")
        )));
    };

    if !(0.0..=100.0).contains(&humidity) {
        return Err(QueryError::MalformedResponse(format!(
            "relative humidity out of range: {humidity}"
        )));
    }
    if wind < 0.0 {
        return Err(QueryError::MalformedResponse(format!("negative wind speed: {wind}")));
    }

    Ok(ConditionsData {
        temperature_c: temperature,
        humidity_pct: humidity.round() as u8,
        wind_speed_kph: wind,
        condition_code: code,
        observed_at: current.time.as_deref().and_then(parse_observation_time),
    })
}

fn parse_observation_time(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[async_trait]
impl ConditionsFetcher for OpenMeteoForecast {
    async fn fetch(&self, location: &GeoLocation) -> Result<ConditionsData, QueryError> {
        let query = [
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_METRICS.to_string()),
        ];

        let body = get_body(&self.http, &self.url, &query, "conditions").await?;
        let conditions = parse_conditions(&body)?;

        debug!(?conditions, "fetched current conditions");
        Ok(conditions)
    }
}
