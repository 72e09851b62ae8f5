use std::fmt;

use tracing::debug;

/// Routes v2 travel mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TravelMode {
    #[default]
    Drive,
    Walk,
    Bicycle,
    Transit,
    TwoWheeler,
}

impl TravelMode {
    /// Map the tool-facing mode name (`driving`, `walking`, `bicycling`,
    /// `transit`, `two_wheeler`) to a Routes travel mode.
    ///
    /// Matching is case-insensitive. Unknown or absent modes fall back to
    /// [`TravelMode::Drive`] rather than failing the call.
    pub fn from_mode(mode: Option<&str>) -> Self {
        let Some(raw) = mode else {
            return TravelMode::Drive;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "driving" => TravelMode::Drive,
            "walking" => TravelMode::Walk,
            "bicycling" => TravelMode::Bicycle,
            "transit" => TravelMode::Transit,
            "two_wheeler" => TravelMode::TwoWheeler,
            other => {
                debug!(mode = other, "unrecognised travel mode, defaulting to DRIVE");
                TravelMode::Drive
            }
        }
    }

    /// Wire name used in the request body.
    pub fn api_name(self) -> &'static str {
        match self {
            TravelMode::Drive => "DRIVE",
            TravelMode::Walk => "WALK",
            TravelMode::Bicycle => "BICYCLE",
            TravelMode::Transit => "TRANSIT",
            TravelMode::TwoWheeler => "TWO_WHEELER",
        }
    }

    /// `TRAFFIC_AWARE` is only accepted for motorised road modes.
    pub fn routing_preference(self) -> Option<&'static str> {
        match self {
            TravelMode::Drive | TravelMode::TwoWheeler => Some("TRAFFIC_AWARE"),
            TravelMode::Walk | TravelMode::Bicycle | TravelMode::Transit => None,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}
