//! Inbound corridor tracking.
//!
//! Answers "which trains heading my way are worth leaving for?" for a
//! named stretch of line, even when the feed's per-stop timing is patchy.

mod ordering;
mod timeline;
mod tracker;

pub use ordering::CorridorOrdering;
pub use timeline::{StopTime, TripTimeline, resolve_trip_direction};
pub use tracker::{ResolvedCheckpoint, ResolvedCorridor, track_inbound};
