//! Static stop reference data.
//!
//! Provides the stop id → name/parent/location table loaded once from GTFS
//! `stops.txt`, plus deterministic name resolution against it.

mod error;
mod names;
mod resolve;
mod table;

pub use error::StopError;
pub use names::{names_match, normalize_station_name};
pub use resolve::{GeoPoint, walk_minutes};
pub use table::{StopRecord, StopTable};

#[cfg(test)]
pub(crate) use table::fixtures;
