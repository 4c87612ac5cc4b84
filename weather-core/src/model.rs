use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{error::InvalidPlaceName, vocabulary};

/// Country used when the name search does not report one.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A non-empty, trimmed place name as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceName(String);

impl PlaceName {
    pub fn parse(raw: &str) -> Result<Self, InvalidPlaceName> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InvalidPlaceName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coordinates and identity of the best name-search match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub resolved_name: String,
    pub country: String,
}

/// Current metrics as returned by the conditions service, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionsData {
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kph: f64,
    pub condition_code: i32,
    pub observed_at: Option<NaiveDateTime>,
}

/// The complete result of one successful query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub resolved_name: String,
    pub country: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kph: f64,
    pub condition_code: i32,
    pub condition_text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<NaiveDateTime>,
}

impl WeatherSnapshot {
    /// Combine location identity with fetched metrics. Condition text is always filled.
    pub fn assemble(location: GeoLocation, conditions: ConditionsData) -> Self {
        Self {
            resolved_name: location.resolved_name,
            country: location.country,
            temperature_c: conditions.temperature_c,
            humidity_pct: conditions.humidity_pct,
            wind_speed_kph: conditions.wind_speed_kph,
            condition_code: conditions.condition_code,
            condition_text: vocabulary::text_for(conditions.condition_code),
            observed_at: conditions.observed_at,
        }
    }
}
