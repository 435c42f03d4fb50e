//! Per-trip stop timeline derived from feed updates.

use chrono::{DateTime, Utc};

use crate::domain::{Direction, StopId};
use crate::feed::FeedTrip;
use crate::stops::StopTable;

/// One timed stop on a trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop_id: String,
    pub at: DateTime<Utc>,
}

/// A trip's timed stops in chronological order.
///
/// Updates without a stop id or any usable time are dropped individually.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripTimeline {
    stops: Vec<StopTime>,
}

impl TripTimeline {
    pub fn from_trip(trip: &FeedTrip) -> Self {
        let mut stops: Vec<StopTime> = trip
            .stop_time_updates
            .iter()
            .filter_map(|update| {
                Some(StopTime {
                    stop_id: update.stop_id.clone()?,
                    at: update.effective_time()?,
                })
            })
            .collect();
        stops.sort_by_key(|s| s.at);
        Self { stops }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Time the trip reaches `stop_id`. A repeated stop resolves to its
    /// latest visit.
    pub fn time_at(&self, stop_id: &StopId) -> Option<DateTime<Utc>> {
        self.stops
            .iter()
            .rev()
            .find(|s| s.stop_id == stop_id.as_str())
            .map(|s| s.at)
    }

    /// First stop at or after `now`.
    pub fn next_stop(&self, now: DateTime<Utc>) -> Option<&StopTime> {
        self.stops.iter().find(|s| s.at >= now)
    }

    /// Last stop at or before `now`.
    pub fn previous_stop(&self, now: DateTime<Utc>) -> Option<&StopTime> {
        self.stops.iter().take_while(|s| s.at <= now).last()
    }

    /// "Approaching X", "At X" or "In transit".
    pub fn position_label(&self, stops: &StopTable, now: DateTime<Utc>) -> String {
        let name = |stop: &StopTime| {
            stops
                .name_of(&stop.stop_id)
                .unwrap_or(stop.stop_id.as_str())
                .to_string()
        };

        if let Some(next) = self.next_stop(now) {
            format!("Approaching {}", name(next))
        } else if let Some(last) = self.stops.last() {
            format!("At {}", name(last))
        } else {
            "In transit".to_string()
        }
    }
}

/// Direction of travel for a trip.
///
/// An explicit direction wins, then the numeric direction id (0 north,
/// 1 south), then the majority platform suffix of its stops. A tied or
/// empty vote is unknown.
pub fn resolve_trip_direction(trip: &FeedTrip) -> Option<Direction> {
    if let Some(direction) = trip.direction {
        return Some(direction);
    }
    match trip.direction_id {
        Some(0) => return Some(Direction::North),
        Some(1) => return Some(Direction::South),
        _ => {}
    }

    let (mut north, mut south) = (0usize, 0usize);
    for stop_id in trip.stop_time_updates.iter().filter_map(|u| u.stop_id.as_deref()) {
        match stop_id.chars().last().map(|c| c.to_ascii_uppercase()) {
            Some('N') => north += 1,
            Some('S') => south += 1,
            _ => {}
        }
    }

    match north.cmp(&south) {
        std::cmp::Ordering::Greater => Some(Direction::North),
        std::cmp::Ordering::Less => Some(Direction::South),
        std::cmp::Ordering::Equal => None,
    }
}
