//! Elevation lookups through the legacy Elevation API.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{LegacyStatus, MapsClient};
use crate::error::{Operation, Result};
use crate::waypoint::{Coordinate, LatLng};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ElevationResponse {
    status: String,
    error_message: Option<String>,
    results: Vec<ElevationSample>,
}

impl LegacyStatus for ElevationResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Elevation at one requested point. `resolution` is the distance in meters
/// between the data points Google interpolated from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSample {
    pub elevation: f64,
    pub location: LatLng,
    pub resolution: f64,
}

/// Output of `maps_elevation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElevationOutput {
    pub results: Vec<ElevationSample>,
}

/// Look up the elevation of every point in one request.
pub async fn elevation(client: &MapsClient, locations: &[Coordinate]) -> Result<ElevationOutput> {
    info!(points = locations.len(), "requesting elevation");
    let response: ElevationResponse = client
        .get_legacy(
            Operation::Elevation,
            &client.endpoints().elevation,
            &[("locations", pipe_joined(locations))],
        )
        .await?;

    Ok(ElevationOutput {
        results: response.results,
    })
}

fn pipe_joined(locations: &[Coordinate]) -> String {
    locations
        .iter()
        .map(Coordinate::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{StubResponse, StubServer, TEST_API_KEY};
    use serde_json::json;

    #[test]
    fn locations_are_pipe_joined() {
        let joined = pipe_joined(&[
            Coordinate::new(39.7391536, -104.9847034),
            Coordinate::new(36.455556, -116.866667),
        ]);
        assert_eq!(joined, "39.7391536,-104.9847034|36.455556,-116.866667");
    }

    #[tokio::test]
    async fn elevation_returns_one_sample_per_point() {
        let stub = StubServer::start([(
            "/elevation/json",
            StubResponse::json(json!({
                "status": "OK",
                "results": [
                    {"elevation": 1608.637939453125, "location": {"lat": 39.7391536, "lng": -104.9847034}, "resolution": 4.771975994110107},
                    {"elevation": -50.78903579711914, "location": {"lat": 36.455556, "lng": -116.866667}, "resolution": 19.08790397644043}
                ]
            })),
        )])
        .await;

        let output = elevation(
            &stub.client(),
            &[
                Coordinate::new(39.7391536, -104.9847034),
                Coordinate::new(36.455556, -116.866667),
            ],
        )
        .await
        .unwrap();
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.results[0].elevation, 1608.637939453125);
        assert_eq!(output.results[1].location, LatLng::new(36.455556, -116.866667));

        let request = stub.single_request();
        assert_eq!(
            request.query_param("locations"),
            Some("39.7391536,-104.9847034|36.455556,-116.866667")
        );
        assert_eq!(request.query_param("key"), Some(TEST_API_KEY));
    }

    #[tokio::test]
    async fn elevation_status_failure() {
        let stub = StubServer::start([(
            "/elevation/json",
            StubResponse::json(json!({"status": "INVALID_REQUEST", "results": []})),
        )])
        .await;

        let err = elevation(&stub.client(), &[Coordinate::new(0.0, 0.0)])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Elevation request failed: INVALID_REQUEST");
    }
}
