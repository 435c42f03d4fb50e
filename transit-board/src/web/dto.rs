//! Data transfer objects for web responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{CorridorConfig, DisplayConfig, LocationConfig, StationBlock};
use crate::domain::{Arrival, CheckpointEta, InboundTrain};
use crate::stops::{GeoPoint, walk_minutes};

/// Fallback tracking window text when no corridor is configured.
pub const DEFAULT_TRACKING_WINDOW: &str = "Inbound";

/// Floor for the frontend poll interval.
const MIN_REFRESH_INTERVAL_MS: u64 = 1000;

/// An arrival as served to the board.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    /// Route actually running (may differ from the station's lines)
    pub line: String,

    pub station: String,
    pub station_block_id: String,

    /// Direction code, e.g. "N"
    pub direction: String,

    /// e.g. "Uptown"
    pub direction_label: String,

    pub direction_destination: Option<String>,
    pub minutes_until: i64,
    pub route_id: String,
    pub stop_id: String,

    /// Predicted arrival, Unix seconds
    pub arrives_at: i64,

    /// When the feeds behind this arrival were fetched, Unix seconds
    pub timestamp: i64,
}

/// Response for `/api/subway`.
#[derive(Debug, Serialize)]
pub struct SubwayResponse {
    pub success: bool,
    pub data: Vec<ArrivalResult>,

    /// Unix seconds of the last successful cycle
    pub last_updated: Option<i64>,

    /// Seconds since the last successful cycle, never negative
    pub staleness_seconds: Option<i64>,
}

/// A checkpoint ETA as served.
#[derive(Debug, Serialize)]
pub struct CheckpointResult {
    pub name: String,
    pub eta_minutes: Option<i64>,
    pub leave_by_minutes: Option<i64>,
}

/// A tracked inbound train as served.
#[derive(Debug, Serialize)]
pub struct InboundTrainResult {
    pub trip_id: String,
    pub route_id: String,
    pub current_position: String,

    /// "inflight" or "approaching_start"
    pub window_bucket: &'static str,

    pub checkpoints: Vec<CheckpointResult>,
}

/// Response for `/api/inbound`.
#[derive(Debug, Serialize)]
pub struct InboundResponse {
    pub trains: Vec<InboundTrainResult>,

    /// ISO-8601 UTC, e.g. "2024-06-01T08:00:00Z"
    pub last_updated: Option<String>,

    /// e.g. "Grand Central-42 St → Brooklyn Bridge-City Hall (+1 @ start)"
    pub tracking_window: String,

    pub label: Option<String>,
}

/// Read-only configuration the frontend renders from.
#[derive(Debug, Serialize)]
pub struct FrontendConfig {
    pub display: DisplayResult,
    pub location: LocationResult,
    pub subway: SubwayBlocks,
}

#[derive(Debug, Serialize)]
pub struct DisplayResult {
    pub refresh_interval_ms: u64,
    pub staleness_warning_sec: u64,
    pub staleness_critical_sec: u64,
    pub theme: Option<String>,
    pub orientation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LocationResult {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubwayBlocks {
    pub stations: Vec<StationBlockResult>,
}

#[derive(Debug, Serialize)]
pub struct StationBlockResult {
    pub id: String,
    pub name: String,
    pub lines: Vec<String>,

    /// Straight-line distance from the configured home location
    pub distance_miles: Option<f64>,
    pub walk_minutes: Option<u32>,

    pub directions: Vec<DirectionResult>,
}

#[derive(Debug, Serialize)]
pub struct DirectionResult {
    pub code: String,
    pub label: String,
    pub destination: Option<String>,
    pub stop_id: String,
}

/// Response for `/api/config`.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub success: bool,
    pub data: FrontendConfig,
}

// Conversion implementations

impl ArrivalResult {
    pub fn from_arrival(arrival: &Arrival) -> Self {
        Self {
            line: arrival.line.clone(),
            station: arrival.station.clone(),
            station_block_id: arrival.station_block_id.clone(),
            direction: arrival.direction.clone(),
            direction_label: arrival.direction_label.clone(),
            direction_destination: arrival.direction_destination.clone(),
            minutes_until: arrival.minutes_until,
            route_id: arrival.route_id.clone(),
            stop_id: arrival.stop_id.as_str().to_string(),
            arrives_at: arrival.arrives_at.timestamp(),
            timestamp: arrival.fetched_at.timestamp(),
        }
    }
}

impl SubwayResponse {
    /// Build from cached arrivals as of `now`.
    pub fn new(
        arrivals: &[Arrival],
        last_updated: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            success: true,
            data: arrivals.iter().map(ArrivalResult::from_arrival).collect(),
            last_updated: last_updated.map(|at| at.timestamp()),
            staleness_seconds: last_updated.map(|at| (now - at).num_seconds().max(0)),
        }
    }
}

impl CheckpointResult {
    fn from_checkpoint(checkpoint: &CheckpointEta) -> Self {
        Self {
            name: checkpoint.name.clone(),
            eta_minutes: checkpoint.eta_minutes,
            leave_by_minutes: checkpoint.leave_by_minutes,
        }
    }
}

impl InboundTrainResult {
    pub fn from_train(train: &InboundTrain) -> Self {
        Self {
            trip_id: train.trip_id.clone(),
            route_id: train.route_id.clone(),
            current_position: train.current_position.clone(),
            window_bucket: train.bucket.as_str(),
            checkpoints: train
                .checkpoints
                .iter()
                .map(CheckpointResult::from_checkpoint)
                .collect(),
        }
    }
}

impl InboundResponse {
    pub fn new(
        trains: &[InboundTrain],
        last_updated: Option<DateTime<Utc>>,
        corridor: Option<&CorridorConfig>,
    ) -> Self {
        Self {
            trains: trains.iter().map(InboundTrainResult::from_train).collect(),
            last_updated: last_updated.map(format_iso_utc),
            tracking_window: corridor
                .map(CorridorConfig::window_description)
                .unwrap_or_else(|| DEFAULT_TRACKING_WINDOW.to_string()),
            label: corridor.and_then(|c| c.label.clone()),
        }
    }
}

impl FrontendConfig {
    pub fn new(display: &DisplayConfig, location: &LocationConfig, blocks: &[StationBlock]) -> Self {
        let home = location.point();
        Self {
            display: DisplayResult {
                refresh_interval_ms: display.refresh_interval_ms.max(MIN_REFRESH_INTERVAL_MS),
                staleness_warning_sec: display.staleness_warning_sec,
                staleness_critical_sec: display.staleness_critical_sec,
                theme: display.theme.clone(),
                orientation: display.orientation.clone(),
            },
            location: LocationResult {
                name: location.name.clone(),
                lat: location.lat,
                lng: location.lng,
            },
            subway: SubwayBlocks {
                stations: blocks
                    .iter()
                    .map(|block| StationBlockResult::from_block(block, home))
                    .collect(),
            },
        }
    }
}

impl StationBlockResult {
    pub fn from_block(block: &StationBlock, home: Option<GeoPoint>) -> Self {
        let distance_miles = home
            .zip(block.location)
            .map(|(home, station)| home.distance_miles(&station));
        Self {
            id: block.id.clone(),
            name: block.name.clone(),
            lines: block.lines.clone(),
            distance_miles,
            walk_minutes: distance_miles.and_then(walk_minutes),
            directions: block
                .directions
                .iter()
                .map(|d| DirectionResult {
                    code: d.code.clone(),
                    label: d.label.clone(),
                    destination: d.destination.clone(),
                    stop_id: d.stop_id.as_str().to_string(),
                })
                .collect(),
        }
    }
}

fn format_iso_utc(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
