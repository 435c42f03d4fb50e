//! Configuration: monitored stations, the tracked corridor, and tunables.
//!
//! Raw structs mirror the JSON file; validation turns them into the
//! resolved records the fetch cycle works with.

mod corridor;
mod error;
mod settings;
mod stations;

pub use corridor::{
    Checkpoint, CorridorConfig, DEFAULT_BUFFER_MINUTES, DEFAULT_MAX_TRAINS, DestinationEntry,
    InboundTrackerConfig, TrackingWindow,
};
pub use error::ConfigError;
pub use settings::{AppConfig, DisplayConfig, FeedSettings, LocationConfig, SubwayConfig};
pub use stations::{
    DirectionEntry, DirectionSpec, StationBlock, StationDirection, StationEntry,
    expand_station_directions, resolve_station_blocks, station_block_id,
};
