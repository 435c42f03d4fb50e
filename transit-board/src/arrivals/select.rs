//! Choosing the next arrivals per platform.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::config::StationDirection;
use crate::domain::{Arrival, minutes_until};

use super::collect::ArrivalCandidate;

/// Arrivals kept per station direction.
pub const ARRIVALS_PER_DIRECTION: usize = 2;

/// Turn per-direction candidates into the rider-facing board.
///
/// Within each direction candidates are ordered by time, deduplicated by
/// (route, stop, instant) and cut to [`ARRIVALS_PER_DIRECTION`]. Output
/// follows configuration order.
pub fn select_arrivals(
    candidates: Vec<Vec<ArrivalCandidate>>,
    directions: &[StationDirection],
    now: DateTime<Utc>,
    fetched_at: DateTime<Utc>,
) -> Vec<Arrival> {
    let mut arrivals = Vec::new();

    for (direction, mut candidates) in directions.iter().zip(candidates) {
        candidates.sort_by_key(|c| c.arrives_at);

        let mut seen = HashSet::new();
        let selected = candidates
            .into_iter()
            .filter(|c| seen.insert((c.route_id.clone(), c.stop_id.clone(), c.arrives_at)))
            .take(ARRIVALS_PER_DIRECTION);

        arrivals.extend(selected.map(|c| Arrival {
            line: c.route_id.clone(),
            station: direction.station_name.clone(),
            station_block_id: direction.station_block_id.clone(),
            direction: direction.direction_code.clone(),
            direction_label: direction.direction_label.clone(),
            direction_destination: direction.direction_destination.clone(),
            minutes_until: minutes_until(c.arrives_at, now),
            route_id: c.route_id,
            stop_id: c.stop_id,
            arrives_at: c.arrives_at,
            fetched_at,
        }));
    }

    arrivals
}
