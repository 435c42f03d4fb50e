//! Inbound corridor tracker configuration.

use serde::Deserialize;

use crate::domain::Direction;

use super::error::ConfigError;

/// Default minutes between leaving and reaching the platform.
pub const DEFAULT_BUFFER_MINUTES: i64 = 3;

/// Default cap on tracked trains.
pub const DEFAULT_MAX_TRAINS: usize = 5;

/// Corridor tracking as authored in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundTrackerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub routes: Vec<String>,
    /// `N` or `S`; southbound when absent.
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub tracking_window: TrackingWindow,
    #[serde(default)]
    pub destination_stations: Vec<DestinationEntry>,
    #[serde(default)]
    pub building_buffer_minutes: Option<i64>,
    #[serde(default)]
    pub max_trains: Option<i64>,
    /// Parent station ids in travel order; the Lexington Avenue southbound
    /// corridor when empty.
    #[serde(default)]
    pub corridor_order: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// Segment of the line being tracked.
///
/// `north_boundary` / `south_boundary` are the legacy spellings of
/// `start_station` / `end_station`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackingWindow {
    pub start_station: Option<String>,
    pub end_station: Option<String>,
    pub north_boundary: Option<String>,
    pub south_boundary: Option<String>,
    pub include_next_at_start: Option<i64>,
}

/// A destination checkpoint as authored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DestinationEntry {
    pub name: Option<String>,
    pub walk_time_minutes: Option<i64>,
}

/// A named checkpoint the rider may leave for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub name: String,
    pub walk_minutes: i64,
}

/// Validated corridor parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorridorConfig {
    pub label: Option<String>,
    pub routes: Vec<String>,
    pub direction: Direction,
    pub start_station: String,
    pub end_station: String,
    pub include_next_at_start: usize,
    pub checkpoints: Vec<Checkpoint>,
    pub buffer_minutes: i64,
    pub max_trains: usize,
    pub corridor_order: Vec<String>,
}

impl CorridorConfig {
    /// Human-readable window, e.g. `Grand Central-42 St → Brooklyn Bridge (+1 @ start)`.
    pub fn window_description(&self) -> String {
        let mut description = format!("{} → {}", self.start_station, self.end_station);
        if self.include_next_at_start > 0 {
            description.push_str(&format!(" (+{} @ start)", self.include_next_at_start));
        }
        description
    }
}

impl InboundTrackerConfig {
    /// Validate into corridor parameters. Returns `None` when disabled.
    pub fn validate(&self) -> Result<Option<CorridorConfig>, ConfigError> {
        if !self.enabled {
            return Ok(None);
        }

        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect();
        if routes.is_empty() {
            return Err(ConfigError::CorridorMissingRoutes);
        }

        let direction = match self.direction.as_deref().map(str::trim) {
            None | Some("") => Direction::South,
            Some(raw) => match Direction::parse(raw) {
                Ok(d @ (Direction::North | Direction::South)) => d,
                _ => return Err(ConfigError::CorridorDirection(raw.to_string())),
            },
        };

        let window = &self.tracking_window;
        let start_station = first_non_empty(&[&window.start_station, &window.north_boundary])
            .ok_or(ConfigError::CorridorMissingBoundary("start_station"))?;
        let end_station = first_non_empty(&[&window.end_station, &window.south_boundary])
            .ok_or(ConfigError::CorridorMissingBoundary("end_station"))?;

        let checkpoints: Vec<Checkpoint> = self
            .destination_stations
            .iter()
            .filter_map(|entry| {
                let name = entry.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
                Some(Checkpoint {
                    name: name.to_string(),
                    walk_minutes: entry.walk_time_minutes.unwrap_or(0).max(0),
                })
            })
            .collect();
        if checkpoints.is_empty() {
            return Err(ConfigError::CorridorMissingCheckpoints);
        }

        let max_trains = self
            .max_trains
            .map(|n| n.max(1) as usize)
            .unwrap_or(DEFAULT_MAX_TRAINS);

        Ok(Some(CorridorConfig {
            label: self.label.clone().filter(|l| !l.trim().is_empty()),
            routes,
            direction,
            start_station,
            end_station,
            include_next_at_start: window.include_next_at_start.unwrap_or(0).max(0) as usize,
            checkpoints,
            buffer_minutes: self
                .building_buffer_minutes
                .unwrap_or(DEFAULT_BUFFER_MINUTES)
                .max(0),
            max_trains,
            corridor_order: self
                .corridor_order
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }))
    }

    /// Route codes this tracker needs feeds for, or none when disabled.
    pub fn tracked_routes(&self) -> &[String] {
        if self.enabled { &self.routes } else { &[] }
    }
}

fn first_non_empty(candidates: &[&Option<String>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}
