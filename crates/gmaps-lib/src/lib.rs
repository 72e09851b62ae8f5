//! Google Maps adapter library entry points.
//!
//! This crate owns everything that talks to Google: configuration, the HTTP
//! client, and one transcoder per upstream endpoint family. Each transcoder
//! builds the outbound request, issues exactly one call, and reshapes the
//! upstream JSON into the flat output schema exposed to MCP clients. Higher
//! level consumers (the MCP server, the CLI) should only depend on the
//! functions exported here instead of reimplementing behavior.
//!
//! # Testing
//!
//! The `test-utils` feature exposes `test_utils::StubServer`, a local HTTP
//! server that stands in for every Google endpoint.

pub mod client;
pub mod config;
pub mod elevation;
pub mod error;
pub mod geocoding;
pub mod places;
pub mod result;
pub mod routes;
pub mod travel;
pub mod units;
pub mod waypoint;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::MapsClient;
pub use config::{Endpoints, MapsConfig};
pub use elevation::{elevation, ElevationOutput, ElevationSample};
pub use error::{Error, Operation, Result};
pub use geocoding::{geocode, reverse_geocode, GeocodeOutput, ReverseGeocodeOutput};
pub use places::{
    place_details, search_places, PlaceDetailsOutput, PlaceSearch, SearchPlacesOutput,
};
pub use result::{Content, ToolResult};
pub use routes::{
    directions, distance_matrix, DirectionsOutput, DirectionsRequest, DistanceMatrixOutput,
    MatrixRequest,
};
pub use travel::TravelMode;
pub use units::TextValue;
pub use waypoint::{Coordinate, LatLng, Waypoint};
