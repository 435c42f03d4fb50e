//! Application state for the web layer.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::board::TransitBoard;
use crate::config::{DisplayConfig, LocationConfig};

/// Shared application state.
///
/// Handlers only read from the board; the fetch loop owns the writes.
pub struct AppState<P> {
    /// Board context populated by the fetch loop
    pub board: Arc<TransitBoard<P>>,

    /// Health thresholds and frontend display settings
    pub display: DisplayConfig,

    /// Home location for station walking distances
    pub location: LocationConfig,

    /// Process start, for uptime reporting
    pub started_at: DateTime<Utc>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(
        board: Arc<TransitBoard<P>>,
        display: DisplayConfig,
        location: LocationConfig,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            board,
            display,
            location,
            started_at,
        }
    }
}

// Derived Clone would demand `P: Clone`.
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            board: Arc::clone(&self.board),
            display: self.display.clone(),
            location: self.location.clone(),
            started_at: self.started_at,
        }
    }
}
