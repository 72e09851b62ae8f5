use std::fmt;

use thiserror::Error;

/// Convenient result alias for the Google Maps library.
pub type Result<T> = std::result::Result<T, Error>;

/// Upstream operation a request belongs to.
///
/// The label is the prefix of every failure message surfaced to callers, e.g.
/// `Geocoding failed: ZERO_RESULTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Geocode,
    ReverseGeocode,
    SearchPlaces,
    PlaceDetails,
    DistanceMatrix,
    Elevation,
    Directions,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Geocode => "Geocoding",
            Operation::ReverseGeocode => "Reverse geocoding",
            Operation::SearchPlaces => "Place search",
            Operation::PlaceDetails => "Place details request",
            Operation::DistanceMatrix => "Distance matrix request",
            Operation::Elevation => "Elevation request",
            Operation::Directions => "Directions request",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key was configured. Fatal at startup.
    #[error("GOOGLE_MAPS_API_KEY environment variable is required")]
    MissingApiKey,

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {name}: {reason}")]
    InvalidConfig { name: String, reason: String },

    /// Raised when a tool argument fails validation.
    #[error("invalid argument '{param}': {reason}")]
    InvalidArgument { param: String, reason: String },

    /// Google rejected the request (non-OK status, HTTP error, or error object).
    #[error("{operation} failed: {message}")]
    Upstream { operation: Operation, message: String },

    /// Wrapper for HTTP client errors. The request URL is stripped before
    /// wrapping because legacy endpoints carry the API key in the query.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn upstream(operation: Operation, message: impl Into<String>) -> Self {
        Error::Upstream {
            operation,
            message: message.into(),
        }
    }

    pub fn invalid_argument(param: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidArgument {
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error originated from Google rather than from this process.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }
}
