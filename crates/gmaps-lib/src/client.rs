//! Shared HTTP plumbing for the legacy and "New" Google endpoints.
//!
//! Legacy endpoints (Geocoding, Elevation) authenticate with a `key` query
//! parameter and report failures through a `status` string in a 200 body.
//! The Places (New) and Routes v2 endpoints authenticate with the
//! `X-Goog-Api-Key` header, require an `X-Goog-FieldMask` header, and report
//! failures through the HTTP status and an `error` object.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{Endpoints, MapsConfig};
use crate::error::{Error, Operation, Result};

const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";
const LEGACY_OK: &str = "OK";

/// Status envelope shared by the legacy JSON endpoints.
pub(crate) trait LegacyStatus {
    fn status(&self) -> &str;
    fn error_message(&self) -> Option<&str>;
}

/// HTTP client bound to one configuration.
///
/// Cloning is cheap: the connection pool and configuration are shared.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: Client,
    config: Arc<MapsConfig>,
}

impl MapsClient {
    pub fn new(config: MapsConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Http)?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &MapsConfig {
        &self.config
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.config.endpoints
    }

    /// GET a legacy endpoint and check its `status` field.
    pub(crate) async fn get_legacy<T>(
        &self,
        operation: Operation,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T>
    where
        T: DeserializeOwned + LegacyStatus,
    {
        debug!(operation = %operation, url, ?params, "calling legacy endpoint");

        let response = self
            .http
            .get(url)
            .query(params)
            .query(&[("key", self.config.api_key())])
            .send()
            .await
            .map_err(strip_url)?;
        let status = response.status();
        let body = response.text().await.map_err(strip_url)?;

        let parsed: T = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(Error::upstream(operation, http_status_message(status)))
            }
            Err(err) => return Err(Error::Json(err)),
        };

        if parsed.status() != LEGACY_OK {
            let message = parsed
                .error_message()
                .filter(|message| !message.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    if parsed.status().is_empty() {
                        http_status_message(status)
                    } else {
                        parsed.status().to_string()
                    }
                });
            warn!(operation = %operation, upstream_status = parsed.status(), "upstream rejected request");
            return Err(Error::upstream(operation, message));
        }

        Ok(parsed)
    }

    /// POST a JSON body to a Places (New) / Routes v2 endpoint.
    pub(crate) async fn post_new<B, T>(
        &self,
        operation: Operation,
        url: &str,
        field_mask: &str,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(operation = %operation, url, field_mask, "calling places/routes endpoint");
        let request = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.config.api_key())
            .header(FIELD_MASK_HEADER, field_mask)
            .json(body);
        execute_new(operation, request).await
    }

    /// GET a Places (New) resource.
    pub(crate) async fn get_new<T>(&self, operation: Operation, url: &str, field_mask: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!(operation = %operation, url, "calling places endpoint");
        let request = self
            .http
            .get(url)
            .header(API_KEY_HEADER, self.config.api_key())
            .header(FIELD_MASK_HEADER, field_mask);
        execute_new(operation, request).await
    }
}

async fn execute_new<T>(operation: Operation, request: RequestBuilder) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(strip_url)?;
    let status = response.status();
    let body = response.text().await.map_err(strip_url)?;

    let value: Value = if body.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(Error::upstream(operation, http_status_message(status)))
            }
            Err(err) => return Err(Error::Json(err)),
        }
    };

    if let Some(message) = api_error_message(&value) {
        warn!(operation = %operation, http_status = %status, "upstream returned error object");
        return Err(Error::upstream(operation, message));
    }
    if !status.is_success() {
        warn!(operation = %operation, http_status = %status, "upstream returned HTTP error");
        return Err(Error::upstream(operation, http_status_message(status)));
    }

    Ok(serde_json::from_value(value)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    code: i64,
    message: String,
    status: String,
}

/// Extract the message of a Google `error` object, if the body carries one.
fn api_error_message(value: &Value) -> Option<String> {
    let error = value.get("error")?;
    if let Some(text) = error.as_str() {
        return Some(text.to_string());
    }
    let body: ApiErrorBody = serde_json::from_value(error.clone()).unwrap_or_default();
    if !body.message.trim().is_empty() {
        Some(body.message)
    } else if !body.status.is_empty() {
        Some(body.status)
    } else {
        Some(format!("HTTP {}", body.code))
    }
}

fn http_status_message(status: StatusCode) -> String {
    format!("HTTP {}", status)
}

fn strip_url(err: reqwest::Error) -> Error {
    Error::Http(err.without_url())
}

fn user_agent() -> String {
    format!("gmaps-lib/{version}", version = env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_object_message_is_preferred() {
        let value = json!({"error": {"code": 400, "message": "Invalid textQuery", "status": "INVALID_ARGUMENT"}});
        assert_eq!(api_error_message(&value).as_deref(), Some("Invalid textQuery"));
    }

    #[test]
    fn error_object_falls_back_to_status_then_code() {
        let value = json!({"error": {"code": 403, "status": "PERMISSION_DENIED"}});
        assert_eq!(api_error_message(&value).as_deref(), Some("PERMISSION_DENIED"));

        let value = json!({"error": {"code": 500}});
        assert_eq!(api_error_message(&value).as_deref(), Some("HTTP 500"));
    }

    #[test]
    fn bodies_without_error_pass() {
        assert_eq!(api_error_message(&json!({"places": []})), None);
        assert_eq!(api_error_message(&json!([{"originIndex": 1}])), None);
    }

    #[test]
    fn client_debug_does_not_leak_key() {
        let client = MapsClient::new(MapsConfig::new("secret-key").unwrap()).unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }
}
