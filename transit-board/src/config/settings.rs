//! Top-level application configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::stops::GeoPoint;

use super::corridor::InboundTrackerConfig;
use super::error::ConfigError;
use super::stations::StationEntry;

/// Everything read from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub subway: SubwayConfig,
    pub inbound_tracker: Option<InboundTrackerConfig>,
    pub display: DisplayConfig,
    pub location: LocationConfig,
    pub feeds: FeedSettings,
}

/// Monitored stations and polling cadence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubwayConfig {
    pub stations: Vec<StationEntry>,
    /// Seconds between fetch cycles.
    pub poll_interval_seconds: u64,
}

impl Default for SubwayConfig {
    fn default() -> Self {
        Self {
            stations: Vec::new(),
            poll_interval_seconds: 30,
        }
    }
}

/// Display settings. Staleness thresholds are seconds since last update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub staleness_warning_sec: u64,
    pub staleness_critical_sec: u64,
    /// How often the frontend polls the API.
    pub refresh_interval_ms: u64,
    pub theme: Option<String>,
    pub orientation: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            staleness_warning_sec: 60,
            staleness_critical_sec: 120,
            refresh_interval_ms: 15_000,
            theme: None,
            orientation: None,
        }
    }
}

/// Where the board hangs, for walking distances to each station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl LocationConfig {
    pub fn point(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

/// Feed fetch tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Maximum feed age before the cycle is aborted.
    pub stale_threshold_secs: u64,
    /// Per-request network timeout.
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            stale_threshold_secs: 120,
            timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Interval between fetch cycles, never zero.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.subway.poll_interval_seconds.max(1))
    }

    /// Every line code whose feed a cycle needs: station lines then corridor routes.
    pub fn required_lines(&self) -> Vec<String> {
        let station_lines = self.subway.stations.iter().flat_map(|s| s.lines.iter());
        let corridor_routes = self
            .inbound_tracker
            .iter()
            .flat_map(|t| t.tracked_routes().iter());

        station_lines
            .chain(corridor_routes)
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }
}
