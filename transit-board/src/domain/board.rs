//! Rider-facing board entries: station arrivals and tracked inbound trains.

use std::fmt;

use chrono::{DateTime, Utc};

use super::StopId;

/// One upcoming arrival at a configured station platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrival {
    /// Line shown to the rider; always the trip's real route, which may
    /// differ from the station's configured lines during service changes.
    pub line: String,
    /// Configured station name.
    pub station: String,
    /// Stable id of the configured station block.
    pub station_block_id: String,
    /// Direction code of the platform (e.g. "N").
    pub direction: String,
    /// Rider-facing label (e.g. "Uptown").
    pub direction_label: String,
    /// Optional destination text from configuration.
    pub direction_destination: Option<String>,
    /// Whole minutes until arrival, never negative.
    pub minutes_until: i64,
    /// Route id reported by the feed.
    pub route_id: String,
    /// Platform stop id.
    pub stop_id: StopId,
    /// Predicted arrival instant.
    pub arrives_at: DateTime<Utc>,
    /// When the feed set this arrival came from was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Which part of the corridor a tracked train was selected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowBucket {
    /// Between the corridor's start and end stations.
    Inflight,
    /// Not yet at the start station, admitted as one of the next N.
    ApproachingStart,
}

impl WindowBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            WindowBucket::Inflight => "inflight",
            WindowBucket::ApproachingStart => "approaching_start",
        }
    }
}

impl fmt::Display for WindowBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A train's timing at one destination checkpoint.
///
/// Both values are `None` once the train has passed the checkpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointEta {
    pub name: String,
    pub eta_minutes: Option<i64>,
    pub leave_by_minutes: Option<i64>,
}

/// A train being tracked along the configured corridor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTrain {
    pub trip_id: String,
    pub route_id: String,
    /// Human-readable position, e.g. "Approaching 14 St-Union Sq".
    pub current_position: String,
    /// One entry per configured checkpoint, in configuration order.
    pub checkpoints: Vec<CheckpointEta>,
    pub bucket: WindowBucket,
}

impl InboundTrain {
    /// ETA at the first configured checkpoint, the board's sort key.
    pub fn first_checkpoint_eta(&self) -> Option<i64> {
        self.checkpoints.first().and_then(|c| c.eta_minutes)
    }

    /// Sort key that places trains past their first checkpoint last.
    pub(crate) fn sort_key(&self) -> i64 {
        self.first_checkpoint_eta().unwrap_or(i64::MAX)
    }
}
