//! Forward and reverse geocoding through the legacy Geocoding API.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{LegacyStatus, MapsClient};
use crate::error::{Error, Operation, Result};
use crate::waypoint::{Coordinate, LatLng};

const ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocodeResponse {
    status: String,
    error_message: Option<String>,
    results: Vec<GeocodeResult>,
}

impl LegacyStatus for GeocodeResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GeocodeResult {
    place_id: String,
    formatted_address: String,
    geometry: Geometry,
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Geometry {
    location: LatLng,
}

/// One component of a structured address (street number, locality, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    pub types: Vec<String>,
}

/// Output of `maps_geocode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeOutput {
    pub location: LatLng,
    pub formatted_address: String,
    pub place_id: String,
}

/// Output of `maps_reverse_geocode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReverseGeocodeOutput {
    pub formatted_address: String,
    pub place_id: String,
    pub address_components: Vec<AddressComponent>,
}

/// Resolve a free-text address to its first geocoding match.
pub async fn geocode(client: &MapsClient, address: &str) -> Result<GeocodeOutput> {
    info!(address, "geocoding address");
    let response: GeocodeResponse = client
        .get_legacy(
            Operation::Geocode,
            &client.endpoints().geocode,
            &[("address", address.to_string())],
        )
        .await?;

    let first = first_result(Operation::Geocode, response)?;
    Ok(GeocodeOutput {
        location: first.geometry.location,
        formatted_address: first.formatted_address,
        place_id: first.place_id,
    })
}

/// Resolve a coordinate to the first matching address.
pub async fn reverse_geocode(
    client: &MapsClient,
    coordinate: Coordinate,
) -> Result<ReverseGeocodeOutput> {
    info!(%coordinate, "reverse geocoding coordinate");
    let response: GeocodeResponse = client
        .get_legacy(
            Operation::ReverseGeocode,
            &client.endpoints().geocode,
            &[("latlng", coordinate.to_string())],
        )
        .await?;

    let first = first_result(Operation::ReverseGeocode, response)?;
    Ok(ReverseGeocodeOutput {
        formatted_address: first.formatted_address,
        place_id: first.place_id,
        address_components: first.address_components,
    })
}

fn first_result(operation: Operation, response: GeocodeResponse) -> Result<GeocodeResult> {
    response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| Error::upstream(operation, ZERO_RESULTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubResponse, StubServer, TEST_API_KEY};
    use serde_json::json;

    #[test]
    fn legacy_response_tolerates_missing_fields() {
        let response: GeocodeResponse =
            serde_json::from_value(json!({"status": "OK", "results": [{}]})).unwrap();
        let first = first_result(Operation::Geocode, response).unwrap();
        assert_eq!(first.place_id, "");
        assert_eq!(first.geometry.location, LatLng::default());
        assert!(first.address_components.is_empty());
    }

    #[test]
    fn empty_results_are_zero_results() {
        let response: GeocodeResponse =
            serde_json::from_value(json!({"status": "OK", "results": []})).unwrap();
        let err = first_result(Operation::ReverseGeocode, response).unwrap_err();
        assert_eq!(err.to_string(), "Reverse geocoding failed: ZERO_RESULTS");
    }

    #[tokio::test]
    async fn geocode_sends_address_and_key() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::json(json!({
                "status": "OK",
                "results": [{
                    "place_id": "ChIJ2eUgeAK6j4ARbn5u_wAGqWA",
                    "formatted_address": "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA",
                    "geometry": {"location": {"lat": 37.4224764, "lng": -122.0842499}}
                }]
            })),
        )])
        .await;

        let output = geocode(&stub.client(), "1600 Amphitheatre Parkway")
            .await
            .unwrap();
        assert_eq!(output.location, LatLng::new(37.4224764, -122.0842499));
        assert_eq!(
            output.formatted_address,
            "1600 Amphitheatre Pkwy, Mountain View, CA 94043, USA"
        );
        assert_eq!(output.place_id, "ChIJ2eUgeAK6j4ARbn5u_wAGqWA");

        let request = stub.single_request();
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/geocode/json");
        assert_eq!(
            request.query_param("address"),
            Some("1600 Amphitheatre Parkway")
        );
        assert_eq!(request.query_param("key"), Some(TEST_API_KEY));
        assert_eq!(request.header("x-goog-api-key"), None);
    }

    #[tokio::test]
    async fn reverse_geocode_sends_latlng() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::json(json!({
                "status": "OK",
                "results": [{
                    "place_id": "P1",
                    "formatted_address": "Mountain View, CA",
                    "address_components": [
                        {"long_name": "Mountain View", "short_name": "Mountain View", "types": ["locality", "political"]}
                    ]
                }]
            })),
        )])
        .await;

        let output = reverse_geocode(&stub.client(), Coordinate::new(37.4224764, -122.0842499))
            .await
            .unwrap();
        assert_eq!(output.formatted_address, "Mountain View, CA");
        assert_eq!(output.address_components.len(), 1);
        assert_eq!(output.address_components[0].types, ["locality", "political"]);

        let request = stub.single_request();
        assert_eq!(
            request.query_param("latlng"),
            Some("37.4224764,-122.0842499")
        );
        assert_eq!(request.query_param("key"), Some(TEST_API_KEY));
    }

    #[tokio::test]
    async fn status_error_message_is_surfaced() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::json(json!({
                "status": "REQUEST_DENIED",
                "error_message": "The provided API key is invalid.",
                "results": []
            })),
        )])
        .await;

        let err = geocode(&stub.client(), "Paris").await.unwrap_err();
        assert!(err.is_upstream());
        assert_eq!(
            err.to_string(),
            "Geocoding failed: The provided API key is invalid."
        );
    }

    #[tokio::test]
    async fn bare_status_is_surfaced() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::json(json!({"status": "OVER_QUERY_LIMIT", "results": []})),
        )])
        .await;

        let err = geocode(&stub.client(), "Paris").await.unwrap_err();
        assert_eq!(err.to_string(), "Geocoding failed: OVER_QUERY_LIMIT");
    }

    #[tokio::test]
    async fn ok_without_results_is_zero_results() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::json(json!({"status": "OK", "results": []})),
        )])
        .await;

        let err = geocode(&stub.client(), "nowhere at all").await.unwrap_err();
        assert_eq!(err.to_string(), "Geocoding failed: ZERO_RESULTS");
    }

    #[tokio::test]
    async fn non_json_failure_reports_http_status() {
        let stub = StubServer::start([(
            "/geocode/json",
            StubResponse::raw(502, "<html>bad gateway</html>"),
        )])
        .await;

        let err = geocode(&stub.client(), "Paris").await.unwrap_err();
        assert_eq!(err.to_string(), "Geocoding failed: HTTP 502 Bad Gateway");
    }
}
