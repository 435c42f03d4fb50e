//! Matching feed stop-times to configured platforms.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::StationDirection;
use crate::domain::StopId;
use crate::feed::FeedSet;
use crate::stops::StopTable;

/// A future stop-time at a configured platform, before selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalCandidate {
    pub arrives_at: DateTime<Utc>,
    pub route_id: String,
    pub stop_id: StopId,
}

/// Collect candidates for each station direction, index-aligned with `directions`.
///
/// Trips are deliberately not filtered by the station's configured lines:
/// service changes route other lines over a platform and those arrivals are
/// real. Directions whose stop id is unknown to `stops` are skipped with a
/// warning and yield no candidates.
pub fn collect_candidates(
    feeds: &FeedSet,
    directions: &[StationDirection],
    stops: &StopTable,
    now: DateTime<Utc>,
) -> Vec<Vec<ArrivalCandidate>> {
    directions
        .iter()
        .map(|direction| {
            if !stops.contains(direction.stop_id.as_str()) {
                warn!(
                    stop_id = %direction.stop_id,
                    station = %direction.station_name,
                    "unknown stop_id; skipping station direction"
                );
                return Vec::new();
            }
            candidates_for(feeds, &direction.stop_id, now)
        })
        .collect()
}

fn candidates_for(feeds: &FeedSet, stop_id: &StopId, now: DateTime<Utc>) -> Vec<ArrivalCandidate> {
    let mut candidates = Vec::new();
    for trip in feeds.trips() {
        for update in &trip.stop_time_updates {
            if update.stop_id.as_deref() != Some(stop_id.as_str()) {
                continue;
            }
            let Some(arrives_at) = update.effective_time() else {
                continue;
            };
            if arrives_at < now {
                continue;
            }
            candidates.push(ArrivalCandidate {
                arrives_at,
                route_id: trip.route_id.clone(),
                stop_id: stop_id.clone(),
            });
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrivals::test_support::{direction, feed_set, now, secs};
    use crate::stops::fixtures::lexington_table;

    #[test]
    fn collects_future_matches_across_routes() {
        let feeds = feed_set(vec![
            ("4", "t1", vec![("419N", 60), ("418N", 120)]),
            ("6", "t2", vec![("419N", 180)]),
            ("5", "t3", vec![("419S", 240)]),
        ]);
        let table = lexington_table();
        let dirs = vec![direction("Wall St", &["4", "5"], "N", "419N")];

        let candidates = collect_candidates(&feeds, &dirs, &table, now());

        assert_eq!(candidates.len(), 1);
        let routes: Vec<&str> = candidates[0].iter().map(|c| c.route_id.as_str()).collect();
        assert_eq!(routes, vec!["4", "6"]);
    }

    #[test]
    fn past_times_excluded_but_now_kept() {
        let feeds = feed_set(vec![("4", "t1", vec![("419N", -30)]), ("4", "t2", vec![("419N", 0)])]);
        let table = lexington_table();
        let dirs = vec![direction("Wall St", &["4"], "N", "419N")];

        let candidates = collect_candidates(&feeds, &dirs, &table, now());
        assert_eq!(candidates[0].len(), 1);
        assert_eq!(candidates[0][0].arrives_at, secs(0));
    }

    #[test]
    fn unknown_stop_skipped() {
        let feeds = feed_set(vec![("4", "t1", vec![("999N", 60)])]);
        let table = lexington_table();
        let dirs = vec![
            direction("Nowhere", &["4"], "N", "999N"),
            direction("Wall St", &["4"], "N", "419N"),
        ];

        let candidates = collect_candidates(&feeds, &dirs, &table, now());
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].is_empty());
        assert!(candidates[1].is_empty());
    }
}
