//! WMO weather interpretation codes, as reported by the conditions service.

/// Text used for any code outside the table.
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Human-readable label for a condition code. Never fails.
pub fn text_for(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Foggy",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => UNKNOWN_CONDITION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_documented_labels() {
        let expected = [
            (0, "Clear sky"),
            (1, "Mainly clear"),
            (2, "Partly cloudy"),
            (3, "Overcast"),
            (45, "Foggy"),
            (48, "Foggy"),
            (51, "Light drizzle"),
            (53, "Moderate drizzle"),
            (55, "Dense drizzle"),
            (56, "Light freezing drizzle"),
            (57, "Dense freezing drizzle"),
            (61, "Slight rain"),
            (63, "Moderate rain"),
            (65, "Heavy rain"),
            (66, "Light freezing rain"),
            (67, "Heavy freezing rain"),
            (71, "Slight snow fall"),
            (73, "Moderate snow fall"),
            (75, "Heavy snow fall"),
            (77, "Snow grains"),
            (80, "Slight rain showers"),
            (81, "Moderate rain showers"),
            (82, "Violent rain showers"),
            (85, "Slight snow showers"),
            (86, "Heavy snow showers"),
            (95, "Thunderstorm"),
            (96, "Thunderstorm with slight hail"),
            (99, "Thunderstorm with heavy hail"),
        ];

        for (code, label) in expected {
            assert_eq!(text_for(code), label, "code {code}");
        }
    }

    #[test]
    fn every_code_in_range_is_either_listed_or_unknown() {
        let listed = [
            0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81,
            82, 85, 86, 95, 96, 99,
        ];

        for code in 0..=100 {
            let text = text_for(code);
            assert_eq!(text == UNKNOWN_CONDITION, !listed.contains(&code), "code {code}");
        }
    }

    #[test]
    fn unmapped_codes_fall_back_to_unknown() {
        for code in [-1, 4, 44, 50, 100, i32::MIN, i32::MAX] {
            assert_eq!(text_for(code), UNKNOWN_CONDITION, "code {code}");
        }
    }
}
