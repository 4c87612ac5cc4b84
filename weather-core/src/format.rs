use std::fmt::Write;

use crate::model::WeatherSnapshot;

/// Render a snapshot as the fixed, labelled report shown to the user.
pub fn render(snapshot: &WeatherSnapshot) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "City: {}", snapshot.resolved_name);
    let _ = writeln!(out, "Country: {}", snapshot.country);
    let _ = writeln!(out, "Temperature: {:.1}°C", snapshot.temperature_c);
    let _ = writeln!(out, "Condition: {}", snapshot.condition_text);
    let _ = writeln!(out, "Humidity: {}%", snapshot.humidity_pct);
    let _ = write!(out, "Wind Speed: {:.1} km/h", snapshot.wind_speed_kph);
    out
}
