//! Distance and duration conversions for the Routes API.
//!
//! Routes v2 reports durations as protobuf `Duration` strings (`"123s"`) and
//! distances as integer meters. Callers get the legacy `{text, value}` pair
//! instead, with placeholder text when Google omitted the field.

use serde::{Deserialize, Serialize};

pub const UNKNOWN_DISTANCE: &str = "Unknown distance";
pub const UNKNOWN_DURATION: &str = "Unknown duration";

/// Human-readable text plus the raw integer value (meters or seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: i64,
}

/// Parse a protobuf duration string (`"123s"`, `"12.5s"`) into whole seconds.
/// Fractional seconds are truncated.
///
/// Returns `None` for absent or unparseable input.
pub fn parse_duration_seconds(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    let number = raw.strip_suffix('s').unwrap_or(raw);
    if let Ok(seconds) = number.parse::<i64>() {
        return Some(seconds);
    }
    number
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite())
        .map(|seconds| seconds.trunc() as i64)
}

/// Duration field for a protobuf duration string.
pub fn duration_field(raw: Option<&str>) -> TextValue {
    match parse_duration_seconds(raw) {
        Some(seconds) => TextValue {
            text: format_duration(seconds),
            value: seconds,
        },
        None => TextValue {
            text: UNKNOWN_DURATION.to_string(),
            value: 0,
        },
    }
}

/// Distance field for an optional meter count.
pub fn distance_field(meters: Option<i64>) -> TextValue {
    match meters {
        Some(meters) => TextValue {
            text: format_distance(meters),
            value: meters,
        },
        None => TextValue {
            text: UNKNOWN_DISTANCE.to_string(),
            value: 0,
        },
    }
}

pub fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        return format!("{} secs", seconds);
    }
    let total_minutes = (seconds as f64 / 60.0).round() as i64;
    if total_minutes < 60 {
        return plural(total_minutes, "min");
    }
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if minutes == 0 {
        plural(hours, "hour")
    } else {
        format!("{} {}", plural(hours, "hour"), plural(minutes, "min"))
    }
}

pub fn format_distance(meters: i64) -> String {
    if meters < 1000 {
        format!("{} m", meters)
    } else {
        format!("{:.1} km", meters as f64 / 1000.0)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_strings_drop_the_suffix() {
        assert_eq!(parse_duration_seconds(Some("123s")), Some(123));
        assert_eq!(parse_duration_seconds(Some("0s")), Some(0));
        assert_eq!(parse_duration_seconds(Some("12.6s")), Some(12));
        assert_eq!(parse_duration_seconds(Some("45")), Some(45));
        assert_eq!(parse_duration_seconds(Some("soon")), None);
        assert_eq!(parse_duration_seconds(None), None);
    }

    #[test]
    fn absent_fields_use_placeholders() {
        assert_eq!(
            duration_field(None),
            TextValue {
                text: "Unknown duration".to_string(),
                value: 0
            }
        );
        assert_eq!(
            distance_field(None),
            TextValue {
                text: "Unknown distance".to_string(),
                value: 0
            }
        );
    }

    #[test]
    fn duration_text() {
        assert_eq!(duration_field(Some("123s")).value, 123);
        assert_eq!(format_duration(42), "42 secs");
        assert_eq!(format_duration(60), "1 min");
        assert_eq!(format_duration(125), "2 mins");
        assert_eq!(format_duration(3600), "1 hour");
        assert_eq!(format_duration(3600 + 25 * 60), "1 hour 25 mins");
        assert_eq!(format_duration(2 * 3600 + 60), "2 hours 1 min");
        assert_eq!(format_duration(3599), "1 hour");
    }

    #[test]
    fn distance_text() {
        assert_eq!(format_distance(850), "850 m");
        assert_eq!(format_distance(1000), "1.0 km");
        assert_eq!(format_distance(12_345), "12.3 km");
        assert_eq!(distance_field(Some(2500)).text, "2.5 km");
    }
}
