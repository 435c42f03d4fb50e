//! Stop table error types.

use std::path::PathBuf;

use crate::domain::Direction;

/// Errors from loading the stop table or resolving names against it.
#[derive(Debug, thiserror::Error)]
pub enum StopError {
    /// The stop table file could not be opened
    #[error("failed to read stop table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stop table CSV is malformed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No platform matches the station name in the requested direction
    #[error("no stop_id found for {name} ({direction})")]
    NotFound { name: String, direction: Direction },

    /// Platform suffixes only exist for north/south travel
    #[error("unsupported direction suffix: {0}")]
    UnsupportedDirection(Direction),
}
