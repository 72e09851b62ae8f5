//! Distance matrices and directions through the Routes API v2.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::client::MapsClient;
use crate::error::{Error, Operation, Result};
use crate::travel::TravelMode;
use crate::units::{distance_field, duration_field, TextValue};
use crate::waypoint::{ApiWaypoint, Waypoint};

const MATRIX_FIELD_MASK: &str =
    "originIndex,destinationIndex,duration,distanceMeters,status,condition";

const ROUTES_FIELD_MASK: &str = "routes.description,routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline,routes.legs.steps.navigationInstruction,routes.legs.steps.distanceMeters,routes.legs.steps.staticDuration,routes.legs.steps.travelMode";

const ROUTE_EXISTS: &str = "ROUTE_EXISTS";
const NO_ROUTE: &str = "No route found";

/// Status of a matrix cell that no upstream element filled.
pub const CELL_NOT_FOUND: &str = "NOT_FOUND";

// ============================================================================
// DISTANCE MATRIX
// ============================================================================

/// Arguments for a distance matrix: every origin against every destination.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRequest {
    pub origins: Vec<String>,
    pub destinations: Vec<String>,
    pub mode: TravelMode,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteMatrixBody {
    origins: Vec<MatrixWaypoint>,
    destinations: Vec<MatrixWaypoint>,
    travel_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_preference: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct MatrixWaypoint {
    waypoint: ApiWaypoint,
}

impl MatrixRequest {
    fn to_body(&self) -> RouteMatrixBody {
        let waypoints = |inputs: &[String]| {
            inputs
                .iter()
                .map(|input| MatrixWaypoint {
                    waypoint: Waypoint::classify(input).to_api(),
                })
                .collect()
        };
        RouteMatrixBody {
            origins: waypoints(&self.origins),
            destinations: waypoints(&self.destinations),
            travel_mode: self.mode.api_name(),
            routing_preference: self.mode.routing_preference(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RpcStatus {
    code: i64,
    message: String,
}

// Indices are signed on the wire; absent means 0.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct MatrixElement {
    origin_index: i64,
    destination_index: i64,
    status: Option<RpcStatus>,
    condition: String,
    distance_meters: Option<i64>,
    duration: Option<String>,
}

/// Output of `maps_distance_matrix`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceMatrixOutput {
    pub origin_addresses: Vec<String>,
    pub destination_addresses: Vec<String>,
    pub results: Vec<MatrixRow>,
}

/// All destinations for one origin, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub elements: Vec<MatrixCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub status: String,
    pub distance: TextValue,
    pub duration: TextValue,
}

impl MatrixCell {
    fn unfilled() -> Self {
        Self {
            status: CELL_NOT_FOUND.to_string(),
            distance: distance_field(None),
            duration: duration_field(None),
        }
    }

    fn from_element(element: &MatrixElement) -> Self {
        let status = match &element.status {
            Some(status) if status.code != 0 => {
                warn!(
                    code = status.code,
                    message = %status.message,
                    "route matrix element reported an error"
                );
                "ERROR"
            }
            _ if element.condition == ROUTE_EXISTS => "OK",
            _ => "ZERO_RESULTS",
        };
        Self {
            status: status.to_string(),
            distance: distance_field(element.distance_meters),
            duration: duration_field(element.duration.as_deref()),
        }
    }
}

/// Compute travel distance and time for every origin/destination pair in a
/// single upstream request.
pub async fn distance_matrix(
    client: &MapsClient,
    request: &MatrixRequest,
) -> Result<DistanceMatrixOutput> {
    info!(
        origins = request.origins.len(),
        destinations = request.destinations.len(),
        mode = %request.mode,
        "computing distance matrix"
    );
    let elements: Vec<MatrixElement> = client
        .post_new(
            Operation::DistanceMatrix,
            &client.endpoints().route_matrix,
            MATRIX_FIELD_MASK,
            &request.to_body(),
        )
        .await?;

    Ok(DistanceMatrixOutput {
        origin_addresses: request.origins.clone(),
        destination_addresses: request.destinations.clone(),
        results: assemble_matrix(
            request.origins.len(),
            request.destinations.len(),
            &elements,
        ),
    })
}

/// Rebuild the `origins x destinations` grid from the flat element list.
///
/// Elements pointing outside the grid, or at a cell that is already filled,
/// are dropped. Cells nothing points at stay [`CELL_NOT_FOUND`].
fn assemble_matrix(origins: usize, destinations: usize, elements: &[MatrixElement]) -> Vec<MatrixRow> {
    let mut grid: Vec<Vec<Option<MatrixCell>>> = vec![vec![None; destinations]; origins];

    for element in elements {
        let cell = usize::try_from(element.origin_index)
            .ok()
            .zip(usize::try_from(element.destination_index).ok())
            .and_then(|(row, column)| grid.get_mut(row)?.get_mut(column));
        match cell {
            Some(slot) if slot.is_none() => *slot = Some(MatrixCell::from_element(element)),
            Some(_) => warn!(
                origin_index = element.origin_index,
                destination_index = element.destination_index,
                "duplicate route matrix element dropped"
            ),
            None => warn!(
                origin_index = element.origin_index,
                destination_index = element.destination_index,
                "route matrix element outside the requested grid dropped"
            ),
        }
    }

    grid.into_iter()
        .map(|row| MatrixRow {
            elements: row
                .into_iter()
                .map(|cell| cell.unwrap_or_else(MatrixCell::unfilled))
                .collect(),
        })
        .collect()
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// Arguments for a single origin to destination route.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
    /// RFC 3339 timestamp.
    pub departure_time: Option<String>,
    /// RFC 3339 timestamp.
    pub arrival_time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesBody<'a> {
    origin: ApiWaypoint,
    destination: ApiWaypoint,
    travel_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    routing_preference: Option<&'static str>,
    compute_alternative_routes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    departure_time: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arrival_time: Option<&'a str>,
}

impl DirectionsRequest {
    fn to_body(&self) -> ComputeRoutesBody<'_> {
        ComputeRoutesBody {
            origin: Waypoint::classify(&self.origin).to_api(),
            destination: Waypoint::classify(&self.destination).to_api(),
            travel_mode: self.mode.api_name(),
            routing_preference: self.mode.routing_preference(),
            compute_alternative_routes: false,
            departure_time: self.departure_time.as_deref(),
            arrival_time: self.arrival_time.as_deref(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ComputeRoutesResponse {
    routes: Vec<RouteResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RouteResource {
    description: String,
    distance_meters: Option<i64>,
    duration: Option<String>,
    polyline: PolylineResource,
    legs: Vec<LegResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PolylineResource {
    encoded_polyline: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LegResource {
    steps: Vec<StepResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct StepResource {
    navigation_instruction: NavigationInstruction,
    distance_meters: Option<i64>,
    static_duration: Option<String>,
    travel_mode: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NavigationInstruction {
    instructions: String,
}

/// Output of `maps_directions`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectionsOutput {
    pub routes: Vec<RouteOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOutput {
    pub summary: String,
    pub distance: TextValue,
    pub duration: TextValue,
    pub polyline: String,
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub instructions: String,
    pub distance: TextValue,
    pub duration: TextValue,
    pub travel_mode: String,
}

/// Compute one route between two waypoints.
pub async fn directions(client: &MapsClient, request: &DirectionsRequest) -> Result<DirectionsOutput> {
    info!(
        origin = %request.origin,
        destination = %request.destination,
        mode = %request.mode,
        "computing directions"
    );
    let response: ComputeRoutesResponse = client
        .post_new(
            Operation::Directions,
            &client.endpoints().compute_routes,
            ROUTES_FIELD_MASK,
            &request.to_body(),
        )
        .await?;

    if response.routes.is_empty() {
        return Err(Error::upstream(Operation::Directions, NO_ROUTE));
    }

    Ok(DirectionsOutput {
        routes: response.routes.into_iter().map(reshape_route).collect(),
    })
}

fn reshape_route(route: RouteResource) -> RouteOutput {
    let steps = route
        .legs
        .into_iter()
        .next()
        .map(|leg| leg.steps)
        .unwrap_or_default();

    RouteOutput {
        summary: route.description,
        distance: distance_field(route.distance_meters),
        duration: duration_field(route.duration.as_deref()),
        polyline: route.polyline.encoded_polyline,
        steps: steps
            .into_iter()
            .map(|step| RouteStep {
                instructions: step.navigation_instruction.instructions,
                distance: distance_field(step.distance_meters),
                duration: duration_field(step.static_duration.as_deref()),
                travel_mode: step.travel_mode,
            })
            .collect(),
    }
}
