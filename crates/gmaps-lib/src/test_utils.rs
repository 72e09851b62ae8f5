//! Stub upstream server for exercising transcoders over real HTTP.
//!
//! The stub binds an ephemeral port on 127.0.0.1, answers each path with a
//! canned status and body, and records every request it receives so tests
//! can assert on the exact query string, headers and JSON body that went out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

use crate::client::MapsClient;
use crate::config::{Endpoints, MapsConfig};

/// API key configured on every stub-backed client.
pub const TEST_API_KEY: &str = "test-api-key";

/// Canned reply for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
}

impl StubResponse {
    pub fn json(body: Value) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// One request as seen by the stub.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    /// Parsed JSON body, or `Value::Null` for empty and non-JSON bodies.
    pub body: Value,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, StubResponse>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Running stub server. The listener task lives as long as the runtime.
pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start a stub answering `path -> response`. Paths are the ones
    /// [`Endpoints::rooted_at`] produces, e.g. `/geocode/json`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start<'a>(routes: impl IntoIterator<Item = (&'a str, StubResponse)>) -> Self {
        let routes: HashMap<String, StubResponse> = routes
            .into_iter()
            .map(|(path, response)| (path.to_string(), response))
            .collect();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes),
            requests: Arc::clone(&requests),
        };

        let app = Router::new().fallback(record).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub listener address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server");
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Configuration pointing every endpoint at this stub.
    pub fn config(&self) -> MapsConfig {
        MapsConfig::new(TEST_API_KEY)
            .expect("test key is not blank")
            .with_endpoints(Endpoints::rooted_at(&self.base_url))
    }

    pub fn client(&self) -> MapsClient {
        MapsClient::new(self.config()).expect("build stub client")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("stub request log").clone()
    }

    /// The only request received so far.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one request was recorded.
    pub fn single_request(&self) -> RecordedRequest {
        let mut requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one upstream request");
        requests.remove(0)
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query,
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect(),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    state
        .requests
        .lock()
        .expect("stub request log")
        .push(recorded);

    match state.routes.get(&path) {
        Some(response) => (
            StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            response.body.clone(),
        ),
        None => (
            StatusCode::NOT_FOUND,
            json!({"error": {"code": 404, "message": format!("no stub for {}", path), "status": "NOT_FOUND"}})
                .to_string(),
        ),
    }
}
