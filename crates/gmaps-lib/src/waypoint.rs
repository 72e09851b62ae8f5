//! Coordinates and the address-vs-coordinate waypoint heuristic.
//!
//! Routing tools accept free text for every origin and destination. A string
//! that looks like `"lat,lng"` with both values in range is sent to Google as
//! a coordinate pair; everything else is sent as an address. The test is a
//! known approximation: an address such as `"12,34"` is read as a coordinate.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static COORDINATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d{1,2}(\.\d+)?,\s*-?\d{1,3}(\.\d+)?$")
        .expect("coordinate pattern is a valid regex")
});

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// `lat,lng`, the form the legacy endpoints take.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Output-side point in the legacy `{lat, lng}` shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An origin or destination for the Routes API.
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    Address(String),
    Coordinate(Coordinate),
}

impl Waypoint {
    /// Classify free text as a coordinate pair or an address.
    pub fn classify(input: &str) -> Self {
        parse_coordinate(input)
            .map(Waypoint::Coordinate)
            .unwrap_or_else(|| Waypoint::Address(input.to_string()))
    }

    pub fn is_coordinate(&self) -> bool {
        matches!(self, Waypoint::Coordinate(_))
    }

    /// Routes v2 `Waypoint` message.
    pub(crate) fn to_api(&self) -> ApiWaypoint {
        match self {
            Waypoint::Address(address) => ApiWaypoint {
                address: Some(address.clone()),
                location: None,
            },
            Waypoint::Coordinate(coordinate) => ApiWaypoint {
                address: None,
                location: Some(ApiLocation {
                    lat_lng: ApiLatLng::from(*coordinate),
                }),
            },
        }
    }
}

fn parse_coordinate(input: &str) -> Option<Coordinate> {
    if !COORDINATE_PATTERN.is_match(input) {
        return None;
    }
    let (lat, lng) = input.split_once(',')?;
    let coordinate = Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ApiWaypoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiLocation>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiLocation {
    pub lat_lng: ApiLatLng,
}

/// `google.type.LatLng` as used by Places (New) and Routes v2.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ApiLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinate> for ApiLatLng {
    fn from(value: Coordinate) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

impl From<ApiLatLng> for LatLng {
    fn from(value: ApiLatLng) -> Self {
        LatLng::new(value.latitude, value.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinate_pairs_are_detected() {
        assert_eq!(
            Waypoint::classify("37.4,-122.1"),
            Waypoint::Coordinate(Coordinate::new(37.4, -122.1))
        );
        assert_eq!(
            Waypoint::classify("-33.8688, 151.2093"),
            Waypoint::Coordinate(Coordinate::new(-33.8688, 151.2093))
        );
        assert!(Waypoint::classify("90,180").is_coordinate());
        assert!(Waypoint::classify("-90,-180").is_coordinate());
    }

    #[test]
    fn out_of_range_pairs_are_addresses() {
        assert_eq!(
            Waypoint::classify("91,0"),
            Waypoint::Address("91,0".to_string())
        );
        assert!(!Waypoint::classify("45,181").is_coordinate());
    }

    #[test]
    fn text_is_an_address() {
        for input in [
            "1600 Amphitheatre Parkway, Mountain View",
            "Paris",
            "37.4, -122.1, 5",
            "123.4,5",
            " 37.4,-122.1",
            "37.,-122",
            "",
        ] {
            assert_eq!(
                Waypoint::classify(input),
                Waypoint::Address(input.to_string()),
                "{input:?} should be an address"
            );
        }
    }

    #[test]
    fn known_ambiguity_is_preserved() {
        // "12,34" could be a street address; it is always read as a coordinate.
        assert!(Waypoint::classify("12,34").is_coordinate());
    }

    #[test]
    fn api_waypoint_shapes() {
        let address = serde_json::to_value(Waypoint::classify("Berlin").to_api()).unwrap();
        assert_eq!(address, json!({"address": "Berlin"}));

        let coordinate = serde_json::to_value(Waypoint::classify("52.5,13.4").to_api()).unwrap();
        assert_eq!(
            coordinate,
            json!({"location": {"latLng": {"latitude": 52.5, "longitude": 13.4}}})
        );
    }

    #[test]
    fn coordinate_display_is_lat_comma_lng() {
        assert_eq!(Coordinate::new(37.4, -122.1).to_string(), "37.4,-122.1");
    }

    #[test]
    fn coordinate_range_checks() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
