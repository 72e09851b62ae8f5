//! Typed tool inputs and their validation.
//!
//! Each tool's argument bag is deserialized into one of these structs, then
//! checked with [`Validate`] before any upstream request is built. Optional
//! fields may be absent or `null`.

use chrono::DateTime;
use gmaps_lib::{
    Coordinate, DirectionsRequest, Error, MatrixRequest, PlaceSearch, Result, TravelMode,
};
use serde::Deserialize;

/// Largest search bias radius the Places API accepts, in meters.
pub const MAX_SEARCH_RADIUS_METERS: f64 = 50_000.0;

/// Common validation trait for tool inputs.
pub trait Validate {
    /// Validate the input, naming the offending parameter on failure.
    fn validate(&self) -> Result<()>;
}

// ============================================================================
// TOOL INPUTS
// ============================================================================

/// Input for `maps_geocode`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeInput {
    pub address: String,
}

/// Input for `maps_reverse_geocode`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReverseGeocodeInput {
    pub latitude: f64,
    pub longitude: f64,
}

/// A `{latitude, longitude}` object as accepted by several tools.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLngInput {
    pub latitude: f64,
    pub longitude: f64,
}

/// Input for `maps_search_places`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPlacesInput {
    pub query: String,

    /// Center of the location bias.
    #[serde(default)]
    pub location: Option<LatLngInput>,

    /// Bias radius in meters (max 50000).
    #[serde(default)]
    pub radius: Option<f64>,
}

/// Input for `maps_place_details`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDetailsInput {
    pub place_id: String,
}

/// Input for `maps_distance_matrix`.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceMatrixInput {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,

    /// "driving", "walking", "bicycling", "transit" or "two_wheeler".
    #[serde(default)]
    pub mode: Option<String>,
}

/// Input for `maps_elevation`.
#[derive(Debug, Clone, Deserialize)]
pub struct ElevationInput {
    pub locations: Vec<LatLngInput>,
}

/// Input for `maps_directions`.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsInput {
    pub origin: String,
    pub destination: String,

    #[serde(default)]
    pub mode: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(default)]
    pub departure_time: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(default)]
    pub arrival_time: Option<String>,
}

// ============================================================================
// VALIDATION
// ============================================================================

impl Validate for GeocodeInput {
    fn validate(&self) -> Result<()> {
        require_text("address", &self.address)
    }
}

impl Validate for ReverseGeocodeInput {
    fn validate(&self) -> Result<()> {
        require_coordinate("latitude", "longitude", self.latitude, self.longitude)
    }
}

impl Validate for LatLngInput {
    fn validate(&self) -> Result<()> {
        require_coordinate("latitude", "longitude", self.latitude, self.longitude)
    }
}

impl Validate for SearchPlacesInput {
    fn validate(&self) -> Result<()> {
        require_text("query", &self.query)?;
        if let Some(location) = &self.location {
            require_coordinate(
                "location.latitude",
                "location.longitude",
                location.latitude,
                location.longitude,
            )?;
        }
        if let Some(radius) = self.radius {
            if !(radius > 0.0 && radius <= MAX_SEARCH_RADIUS_METERS) {
                return Err(Error::invalid_argument(
                    "radius",
                    format!(
                        "must be greater than 0 and at most {} meters",
                        MAX_SEARCH_RADIUS_METERS
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for PlaceDetailsInput {
    fn validate(&self) -> Result<()> {
        require_text("place_id", &self.place_id)?;
        // The id becomes a URL path segment.
        if self
            .place_id
            .chars()
            .any(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(Error::invalid_argument(
                "place_id",
                "must not contain '/', '?', '#' or whitespace",
            ));
        }
        Ok(())
    }
}

impl Validate for DistanceMatrixInput {
    fn validate(&self) -> Result<()> {
        require_list("origins", &self.origins)?;
        require_list("destinations", &self.destinations)
    }
}

impl Validate for ElevationInput {
    fn validate(&self) -> Result<()> {
        if self.locations.is_empty() {
            return Err(Error::invalid_argument(
                "locations",
                "must contain at least one location",
            ));
        }
        for (index, location) in self.locations.iter().enumerate() {
            require_coordinate(
                &format!("locations[{}].latitude", index),
                &format!("locations[{}].longitude", index),
                location.latitude,
                location.longitude,
            )?;
        }
        Ok(())
    }
}

impl Validate for DirectionsInput {
    fn validate(&self) -> Result<()> {
        require_text("origin", &self.origin)?;
        require_text("destination", &self.destination)?;
        if let Some(departure) = &self.departure_time {
            require_timestamp("departure_time", departure)?;
        }
        if let Some(arrival) = &self.arrival_time {
            require_timestamp("arrival_time", arrival)?;
        }
        if self.departure_time.is_some() && self.arrival_time.is_some() {
            return Err(Error::invalid_argument(
                "arrival_time",
                "cannot be combined with departure_time",
            ));
        }
        Ok(())
    }
}

fn require_text(param: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(param, "must not be empty"));
    }
    Ok(())
}

fn require_coordinate(lat_param: &str, lng_param: &str, latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid_argument(lat_param, "must be between -90 and 90"));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid_argument(lng_param, "must be between -180 and 180"));
    }
    Ok(())
}

fn require_list(param: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::invalid_argument(param, "must contain at least one entry"));
    }
    for (index, value) in values.iter().enumerate() {
        require_text(&format!("{}[{}]", param, index), value)?;
    }
    Ok(())
}

fn require_timestamp(param: &str, value: &str) -> Result<()> {
    DateTime::parse_from_rfc3339(value)
        .map(|_| ())
        .map_err(|err| Error::invalid_argument(param, format!("must be an RFC 3339 timestamp ({})", err)))
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<ReverseGeocodeInput> for Coordinate {
    fn from(input: ReverseGeocodeInput) -> Self {
        Coordinate::new(input.latitude, input.longitude)
    }
}

impl From<LatLngInput> for Coordinate {
    fn from(input: LatLngInput) -> Self {
        Coordinate::new(input.latitude, input.longitude)
    }
}

impl From<SearchPlacesInput> for PlaceSearch {
    fn from(input: SearchPlacesInput) -> Self {
        PlaceSearch {
            query: input.query,
            location: input.location.map(Coordinate::from),
            radius: input.radius,
        }
    }
}

impl From<DistanceMatrixInput> for MatrixRequest {
    fn from(input: DistanceMatrixInput) -> Self {
        MatrixRequest {
            mode: TravelMode::from_mode(input.mode.as_deref()),
            origins: input.origins,
            destinations: input.destinations,
        }
    }
}

impl From<DirectionsInput> for DirectionsRequest {
    fn from(input: DirectionsInput) -> Self {
        DirectionsRequest {
            mode: TravelMode::from_mode(input.mode.as_deref()),
            origin: input.origin,
            destination: input.destination,
            departure_time: input.departure_time,
            arrival_time: input.arrival_time,
        }
    }
}

impl ElevationInput {
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.locations.iter().copied().map(Coordinate::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).expect("valid input shape")
    }

    #[test]
    fn blank_address_is_rejected() {
        let input: GeocodeInput = parse(json!({"address": "   "}));
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid argument 'address': must not be empty");
    }

    #[test]
    fn reverse_geocode_checks_ranges() {
        let input: ReverseGeocodeInput = parse(json!({"latitude": 91.0, "longitude": 0.0}));
        assert!(input.validate().is_err());

        let input: ReverseGeocodeInput = parse(json!({"latitude": 0.0, "longitude": -181.0}));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'longitude'"));

        let input: ReverseGeocodeInput = parse(json!({"latitude": -90, "longitude": 180}));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn search_radius_bounds() {
        for radius in [0.0, -5.0, 50_000.5] {
            let input: SearchPlacesInput = parse(json!({"query": "coffee", "radius": radius}));
            let err = input.validate().unwrap_err();
            assert!(err.to_string().contains("'radius'"), "{radius}");
        }

        let input: SearchPlacesInput = parse(json!({
            "query": "coffee",
            "location": {"latitude": 37.7, "longitude": -122.4},
            "radius": 50000
        }));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn search_location_is_range_checked() {
        let input: SearchPlacesInput = parse(json!({
            "query": "coffee",
            "location": {"latitude": 100.0, "longitude": 0.0}
        }));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'location.latitude'"));
    }

    #[test]
    fn null_optionals_are_absent() {
        let input: SearchPlacesInput =
            parse(json!({"query": "coffee", "location": null, "radius": null}));
        assert!(input.validate().is_ok());
        let search = PlaceSearch::from(input);
        assert!(search.location.is_none());
        assert!(search.radius.is_none());
    }

    #[test]
    fn place_id_must_be_a_path_segment() {
        for bad in ["", "a/b", "abc?x=1", "abc#frag", "ab c"] {
            let input: PlaceDetailsInput = parse(json!({"place_id": bad}));
            assert!(input.validate().is_err(), "{bad:?} should be rejected");
        }
        let input: PlaceDetailsInput = parse(json!({"place_id": "ChIJN1t_tDeuEmsRUsoyG83frY4"}));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn matrix_lists_must_be_populated() {
        let input: DistanceMatrixInput = parse(json!({"origins": [], "destinations": ["B"]}));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'origins'"));

        let input: DistanceMatrixInput = parse(json!({"origins": ["A"], "destinations": ["B", ""]}));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'destinations[1]'"));
    }

    #[test]
    fn matrix_mode_is_permissive() {
        let input: DistanceMatrixInput =
            parse(json!({"origins": ["A"], "destinations": ["B"], "mode": "hovercraft"}));
        assert!(input.validate().is_ok());
        assert_eq!(MatrixRequest::from(input).mode, TravelMode::Drive);

        let input: DistanceMatrixInput =
            parse(json!({"origins": ["A"], "destinations": ["B"], "mode": "two_wheeler"}));
        assert_eq!(MatrixRequest::from(input).mode, TravelMode::TwoWheeler);
    }

    #[test]
    fn elevation_requires_valid_points() {
        let input: ElevationInput = parse(json!({"locations": []}));
        assert!(input.validate().is_err());

        let input: ElevationInput = parse(json!({"locations": [
            {"latitude": 10.0, "longitude": 10.0},
            {"latitude": -95.0, "longitude": 10.0}
        ]}));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'locations[1].latitude'"));

        let input: ElevationInput =
            parse(json!({"locations": [{"latitude": 39.7391536, "longitude": -104.9847034}]}));
        assert_eq!(input.coordinates(), vec![Coordinate::new(39.7391536, -104.9847034)]);
    }

    #[test]
    fn directions_timestamps_are_rfc3339() {
        let input: DirectionsInput = parse(json!({
            "origin": "A",
            "destination": "B",
            "departure_time": "tomorrow at noon"
        }));
        let err = input.validate().unwrap_err();
        assert!(err.to_string().contains("'departure_time'"));

        let input: DirectionsInput = parse(json!({
            "origin": "A",
            "destination": "B",
            "mode": "transit",
            "arrival_time": "2030-05-01T09:30:00-07:00"
        }));
        assert!(input.validate().is_ok());
        let request = DirectionsRequest::from(input);
        assert_eq!(request.mode, TravelMode::Transit);
        assert_eq!(request.arrival_time.as_deref(), Some("2030-05-01T09:30:00-07:00"));
    }

    #[test]
    fn directions_times_are_exclusive() {
        let input: DirectionsInput = parse(json!({
            "origin": "A",
            "destination": "B",
            "departure_time": "2030-05-01T08:00:00Z",
            "arrival_time": "2030-05-01T09:30:00Z"
        }));
        assert!(input.validate().is_err());
    }
}
