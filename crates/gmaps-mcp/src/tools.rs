//! The fixed registry of tools this server exposes.
//!
//! Order is part of the contract: `tools/list` returns the descriptors
//! exactly as they appear here.

use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value};

pub const GEOCODE: &str = "maps_geocode";
pub const REVERSE_GEOCODE: &str = "maps_reverse_geocode";
pub const SEARCH_PLACES: &str = "maps_search_places";
pub const PLACE_DETAILS: &str = "maps_place_details";
pub const DISTANCE_MATRIX: &str = "maps_distance_matrix";
pub const ELEVATION: &str = "maps_elevation";
pub const DIRECTIONS: &str = "maps_directions";

/// Name, description and JSON Schema of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

static TOOLS: Lazy<Vec<ToolDescriptor>> = Lazy::new(|| {
    vec![
        ToolDescriptor {
            name: GEOCODE,
            description: "Convert an address into geographic coordinates",
            input_schema: object_schema(
                json!({
                    "address": {"type": "string", "description": "The address to geocode"}
                }),
                &["address"],
            ),
        },
        ToolDescriptor {
            name: REVERSE_GEOCODE,
            description: "Convert coordinates into an address",
            input_schema: object_schema(
                json!({
                    "latitude": {"type": "number", "description": "Latitude coordinate"},
                    "longitude": {"type": "number", "description": "Longitude coordinate"}
                }),
                &["latitude", "longitude"],
            ),
        },
        ToolDescriptor {
            name: SEARCH_PLACES,
            description: "Search for places using Google Places API",
            input_schema: object_schema(
                json!({
                    "query": {"type": "string", "description": "Search query"},
                    "location": {
                        "type": "object",
                        "properties": {
                            "latitude": {"type": "number"},
                            "longitude": {"type": "number"}
                        },
                        "description": "Optional center point for the search"
                    },
                    "radius": {
                        "type": "number",
                        "description": "Search radius in meters (max 50000)"
                    }
                }),
                &["query"],
            ),
        },
        ToolDescriptor {
            name: PLACE_DETAILS,
            description: "Get detailed information about a specific place",
            input_schema: object_schema(
                json!({
                    "place_id": {"type": "string", "description": "The place ID to get details for"}
                }),
                &["place_id"],
            ),
        },
        ToolDescriptor {
            name: DISTANCE_MATRIX,
            description: "Calculate travel distance and time for multiple origins and destinations",
            input_schema: object_schema(
                json!({
                    "origins": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Array of origin addresses or coordinates"
                    },
                    "destinations": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Array of destination addresses or coordinates"
                    },
                    "mode": mode_schema()
                }),
                &["origins", "destinations"],
            ),
        },
        ToolDescriptor {
            name: ELEVATION,
            description: "Get elevation data for locations on the earth",
            input_schema: object_schema(
                json!({
                    "locations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "latitude": {"type": "number"},
                                "longitude": {"type": "number"}
                            },
                            "required": ["latitude", "longitude"]
                        },
                        "description": "Array of locations to get elevation for"
                    }
                }),
                &["locations"],
            ),
        },
        ToolDescriptor {
            name: DIRECTIONS,
            description: "Get directions between two points",
            input_schema: object_schema(
                json!({
                    "origin": {"type": "string", "description": "Starting point address or coordinates"},
                    "destination": {"type": "string", "description": "Ending point address or coordinates"},
                    "mode": mode_schema(),
                    "departure_time": {
                        "type": "string",
                        "description": "Departure time as an RFC 3339 timestamp"
                    },
                    "arrival_time": {
                        "type": "string",
                        "description": "Arrival time as an RFC 3339 timestamp"
                    }
                }),
                &["origin", "destination"],
            ),
        },
    ]
});

/// Every tool, in registry order.
pub fn tool_descriptors() -> &'static [ToolDescriptor] {
    &TOOLS
}

/// Look a tool up by exact name.
pub fn find_tool(name: &str) -> Option<&'static ToolDescriptor> {
    TOOLS.iter().find(|tool| tool.name == name)
}

fn object_schema(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn mode_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["driving", "walking", "bicycling", "transit", "two_wheeler"],
        "description": "Travel mode (driving, walking, bicycling, transit, two_wheeler)"
    })
}
