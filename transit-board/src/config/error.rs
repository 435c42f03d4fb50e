//! Configuration error types.

use std::path::PathBuf;

use crate::domain::InvalidStopId;

/// Malformed or missing configuration.
///
/// Fatal to the cycle that hits it; the previous cache entry is retained.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for the expected shape
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A station entry has no name
    #[error("station entry missing name")]
    StationMissingName,

    /// A station entry has no line codes
    #[error("station {0} missing lines")]
    StationMissingLines(String),

    /// A station entry has neither a directions list nor stop_id + direction
    #[error("station {0} missing directions/stop_id configuration")]
    StationMissingDirections(String),

    /// A direction object has no code
    #[error("station {0} direction missing code")]
    DirectionMissingCode(String),

    /// A direction object has no stop id
    #[error("station {station} direction {code} missing stop_id")]
    DirectionMissingStopId { station: String, code: String },

    /// A configured stop id is malformed
    #[error("station {station}: {source}")]
    InvalidStopId {
        station: String,
        #[source]
        source: InvalidStopId,
    },

    /// Corridor tracking is enabled without any routes
    #[error("inbound tracker routes cannot be empty")]
    CorridorMissingRoutes,

    /// Corridor direction is not N or S
    #[error("inbound tracker direction must be 'N' or 'S', got {0:?}")]
    CorridorDirection(String),

    /// Corridor window is missing a boundary station
    #[error("tracking_window must include {0}")]
    CorridorMissingBoundary(&'static str),

    /// Corridor has no destination checkpoints
    #[error("inbound tracker needs at least one destination station")]
    CorridorMissingCheckpoints,
}
