//! Runtime configuration: the API key, upstream endpoint URLs and an optional
//! request timeout.
//!
//! The key is read once at startup and handed to [`crate::MapsClient`];
//! transcoders never consult the environment themselves. Every endpoint URL
//! can be overridden so tests can point the client at a local stub server.

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
const GEOCODE_URL_ENV: &str = "GOOGLE_MAPS_GEOCODE_URL";
const ELEVATION_URL_ENV: &str = "GOOGLE_MAPS_ELEVATION_URL";
const SEARCH_TEXT_URL_ENV: &str = "GOOGLE_PLACES_SEARCH_TEXT_URL";
const PLACE_DETAILS_URL_ENV: &str = "GOOGLE_PLACES_DETAILS_URL";
const ROUTE_MATRIX_URL_ENV: &str = "GOOGLE_ROUTES_MATRIX_URL";
const COMPUTE_ROUTES_URL_ENV: &str = "GOOGLE_ROUTES_DIRECTIONS_URL";
const TIMEOUT_ENV: &str = "GOOGLE_MAPS_TIMEOUT_SECS";

/// Upstream endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Legacy Geocoding API (forward and reverse).
    pub geocode: String,
    /// Legacy Elevation API.
    pub elevation: String,
    /// Places API (New) text search.
    pub places_search_text: String,
    /// Places API (New) details; the place id is appended as a path segment.
    pub place_details: String,
    /// Routes API v2 computeRouteMatrix.
    pub route_matrix: String,
    /// Routes API v2 computeRoutes.
    pub compute_routes: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://maps.googleapis.com/maps/api/geocode/json".to_string(),
            elevation: "https://maps.googleapis.com/maps/api/elevation/json".to_string(),
            places_search_text: "https://places.googleapis.com/v1/places:searchText".to_string(),
            place_details: "https://places.googleapis.com/v1/places".to_string(),
            route_matrix: "https://routes.googleapis.com/distanceMatrix/v2:computeRouteMatrix"
                .to_string(),
            compute_routes: "https://routes.googleapis.com/directions/v2:computeRoutes"
                .to_string(),
        }
    }
}

impl Endpoints {
    /// All endpoints below a single base URL, using plain path segments.
    ///
    /// Intended for stub servers: `{base}/geocode/json`, `{base}/elevation/json`,
    /// `{base}/places/searchText`, `{base}/places/{id}`, `{base}/routes/matrix`
    /// and `{base}/routes/directions`.
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocode: format!("{base}/geocode/json"),
            elevation: format!("{base}/elevation/json"),
            places_search_text: format!("{base}/places/searchText"),
            place_details: format!("{base}/places"),
            route_matrix: format!("{base}/routes/matrix"),
            compute_routes: format!("{base}/routes/directions"),
        }
    }

    /// Details URL for a single place id.
    pub fn place_details_url(&self, place_id: &str) -> String {
        format!("{}/{}", self.place_details.trim_end_matches('/'), place_id)
    }
}

/// Immutable adapter configuration.
#[derive(Clone)]
pub struct MapsConfig {
    api_key: String,
    pub endpoints: Endpoints,
    /// Overall request timeout. `None` leaves reqwest's defaults in place.
    pub timeout: Option<Duration>,
}

impl MapsConfig {
    /// Create a configuration with the default Google endpoints.
    ///
    /// Returns [`Error::MissingApiKey`] when the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        Ok(Self {
            api_key,
            endpoints: Endpoints::default(),
            timeout: None,
        })
    }

    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map so they do
    /// not have to mutate the global environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV).ok_or(Error::MissingApiKey)?;
        let mut config = Self::new(api_key)?;

        let defaults = Endpoints::default();
        let pick = |name: &str, default: String| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(default)
        };
        config.endpoints = Endpoints {
            geocode: pick(GEOCODE_URL_ENV, defaults.geocode),
            elevation: pick(ELEVATION_URL_ENV, defaults.elevation),
            places_search_text: pick(SEARCH_TEXT_URL_ENV, defaults.places_search_text),
            place_details: pick(PLACE_DETAILS_URL_ENV, defaults.place_details),
            route_matrix: pick(ROUTE_MATRIX_URL_ENV, defaults.route_matrix),
            compute_routes: pick(COMPUTE_ROUTES_URL_ENV, defaults.compute_routes),
        };

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| Error::InvalidConfig {
                    name: TIMEOUT_ENV.to_string(),
                    reason: format!("expected a positive number of seconds, got '{raw}'"),
                })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

// The key never appears in logs.
impl fmt::Debug for MapsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapsConfig")
            .field("api_key", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = MapsConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn blank_key_is_rejected() {
        let err = MapsConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn defaults_point_at_google() {
        let config = MapsConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "k")])).unwrap();
        assert_eq!(config.api_key(), "k");
        assert_eq!(config.endpoints, Endpoints::default());
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn endpoint_and_timeout_overrides() {
        let config = MapsConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "k"),
            (GEOCODE_URL_ENV, "http://localhost:9/geo"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(config.endpoints.geocode, "http://localhost:9/geo");
        assert_eq!(
            config.endpoints.elevation,
            Endpoints::default().elevation
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn invalid_timeout_is_reported() {
        let err = MapsConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "k"), (TIMEOUT_ENV, "soon")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = MapsConfig::new("super-secret").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn rooted_endpoints_and_details_url() {
        let endpoints = Endpoints::rooted_at("http://127.0.0.1:4000/");
        assert_eq!(endpoints.geocode, "http://127.0.0.1:4000/geocode/json");
        assert_eq!(
            endpoints.place_details_url("ChIJ123"),
            "http://127.0.0.1:4000/places/ChIJ123"
        );
    }
}
