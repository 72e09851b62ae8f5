//! Tool dispatch and JSON-RPC method handling.
//!
//! [`MapsServer`] is stateless apart from the shared HTTP client. Every tool
//! call produces a [`ToolResult`]; unknown tools, invalid arguments and
//! upstream failures all come back as `isError: true` envelopes rather than
//! protocol errors.

use std::time::Instant;

use gmaps_lib::{
    directions, distance_matrix, elevation, geocode, place_details, reverse_geocode,
    search_places, Coordinate, MapsClient, MapsConfig, ToolResult,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::error::RpcError;
use crate::tools::{self, ToolDescriptor};
use crate::types::*;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "google-maps";

const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
struct CallParams {
    name: Option<String>,
    #[serde(default)]
    arguments: Value,
}

/// Dispatcher for the Google Maps tools.
#[derive(Debug, Clone)]
pub struct MapsServer {
    client: MapsClient,
}

impl MapsServer {
    /// Build a server from configuration. Fails only if the HTTP client
    /// cannot be constructed.
    pub fn new(config: MapsConfig) -> gmaps_lib::Result<Self> {
        Ok(Self::from_client(MapsClient::new(config)?))
    }

    pub fn from_client(client: MapsClient) -> Self {
        Self { client }
    }

    pub fn list_tools(&self) -> &'static [ToolDescriptor] {
        tools::tool_descriptors()
    }

    /// Run one tool call. Never fails; errors are folded into the envelope.
    pub async fn call_tool(&self, name: &str, arguments: Value) -> ToolResult {
        let Some(tool) = tools::find_tool(name) else {
            warn!(tool = name, "unknown tool requested");
            return ToolResult::error(format!("Unknown tool: {}", name));
        };

        info!(tool = tool.name, "tool call");
        let started = Instant::now();
        let result = self.dispatch(tool.name, arguments).await;
        info!(
            tool = tool.name,
            is_error = result.is_error,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "tool call finished"
        );
        result
    }

    async fn dispatch(&self, tool: &'static str, arguments: Value) -> ToolResult {
        let client = &self.client;
        match tool {
            tools::GEOCODE => match parse_input::<GeocodeInput>(tool, arguments) {
                Ok(input) => ToolResult::from_outcome(geocode(client, &input.address).await),
                Err(invalid) => invalid,
            },
            tools::REVERSE_GEOCODE => match parse_input::<ReverseGeocodeInput>(tool, arguments) {
                Ok(input) => {
                    ToolResult::from_outcome(reverse_geocode(client, Coordinate::from(input)).await)
                }
                Err(invalid) => invalid,
            },
            tools::SEARCH_PLACES => match parse_input::<SearchPlacesInput>(tool, arguments) {
                Ok(input) => {
                    ToolResult::from_outcome(search_places(client, &input.into()).await)
                }
                Err(invalid) => invalid,
            },
            tools::PLACE_DETAILS => match parse_input::<PlaceDetailsInput>(tool, arguments) {
                Ok(input) => ToolResult::from_outcome(place_details(client, &input.place_id).await),
                Err(invalid) => invalid,
            },
            tools::DISTANCE_MATRIX => match parse_input::<DistanceMatrixInput>(tool, arguments) {
                Ok(input) => {
                    ToolResult::from_outcome(distance_matrix(client, &input.into()).await)
                }
                Err(invalid) => invalid,
            },
            tools::ELEVATION => match parse_input::<ElevationInput>(tool, arguments) {
                Ok(input) => ToolResult::from_outcome(elevation(client, &input.coordinates()).await),
                Err(invalid) => invalid,
            },
            tools::DIRECTIONS => match parse_input::<DirectionsInput>(tool, arguments) {
                Ok(input) => ToolResult::from_outcome(directions(client, &input.into()).await),
                Err(invalid) => invalid,
            },
            other => ToolResult::error(format!("Unknown tool: {}", other)),
        }
    }

    /// Handle one decoded JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, message: Value) -> Option<Value> {
        let Some(object) = message.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("expected a JSON object"),
            ));
        };

        let id = object.get("id").cloned();
        let Some(method) = object.get("method").and_then(Value::as_str) else {
            return id.map(|id| error_response(id, RpcError::invalid_request("missing method")));
        };
        let Some(id) = id else {
            debug!(method, "notification received");
            return None;
        };

        debug!(method, %id, "request received");
        let outcome = match method {
            "initialize" => Ok(initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(json!({ "tools": self.list_tools() })),
            "tools/call" => self.handle_tool_call(object.get("params")).await,
            other => {
                warn!(method = other, "unknown method");
                Err(RpcError::method_not_found(other))
            }
        };

        Some(match outcome {
            Ok(result) => json!({"jsonrpc": JSONRPC_VERSION, "id": id, "result": result}),
            Err(error) => error_response(id, error),
        })
    }

    async fn handle_tool_call(&self, params: Option<&Value>) -> Result<Value, RpcError> {
        let params = params.cloned().unwrap_or(Value::Null);
        let params: CallParams = serde_json::from_value(params)
            .map_err(|err| RpcError::invalid_params(err.to_string()))?;
        let name = params
            .name
            .ok_or_else(|| RpcError::invalid_params("missing tool name"))?;

        let result = self.call_tool(&name, params.arguments).await;
        serde_json::to_value(&result).map_err(|err| RpcError::internal(err.to_string()))
    }
}

/// Build a JSON-RPC error response.
pub fn error_response(id: Value, error: RpcError) -> Value {
    json!({"jsonrpc": JSONRPC_VERSION, "id": id, "error": error})
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "serverInfo": {"name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION")},
        "capabilities": {"tools": {}}
    })
}

/// Deserialize and validate a tool's argument bag. Absent arguments are an
/// empty object.
fn parse_input<T>(tool: &str, arguments: Value) -> Result<T, ToolResult>
where
    T: DeserializeOwned + Validate,
{
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    let input: T = serde_json::from_value(arguments).map_err(|err| invalid_arguments(tool, err))?;
    input.validate().map_err(|err| invalid_arguments(tool, err))?;
    Ok(input)
}

fn invalid_arguments(tool: &str, reason: impl std::fmt::Display) -> ToolResult {
    warn!(tool, reason = %reason, "invalid tool arguments");
    ToolResult::error(format!("Invalid arguments for {}: {}", tool, reason))
}
