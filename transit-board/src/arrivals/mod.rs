//! Next-arrival boards for configured stations.
//!
//! Collection walks every trip in the feed set looking for the configured
//! platforms; selection orders, deduplicates and trims per direction.

mod collect;
mod select;

pub use collect::{ArrivalCandidate, collect_candidates};
pub use select::{ARRIVALS_PER_DIRECTION, select_arrivals};

use chrono::{DateTime, Utc};

use crate::config::StationDirection;
use crate::domain::Arrival;
use crate::feed::FeedSet;
use crate::stops::StopTable;

/// Build the arrival board for one cycle.
pub fn build_arrivals(
    feeds: &FeedSet,
    directions: &[StationDirection],
    stops: &StopTable,
    now: DateTime<Utc>,
) -> Vec<Arrival> {
    let candidates = collect_candidates(feeds, directions, stops, now);
    select_arrivals(candidates, directions, now, now)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Duration, Utc};

    use crate::config::{StationDirection, station_block_id};
    use crate::domain::{StopId, direction_label};
    use crate::feed::{DecodedFeed, FeedSet, FeedTrip, StopTimeUpdate};

    pub(crate) fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_717_228_800, 0).unwrap()
    }

    pub(crate) fn secs(offset: i64) -> DateTime<Utc> {
        now() + Duration::seconds(offset)
    }

    pub(crate) fn direction(name: &str, lines: &[&str], code: &str, stop: &str) -> StationDirection {
        let lines: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        StationDirection {
            station_block_id: station_block_id(name, &lines, None),
            station_name: name.to_string(),
            direction_code: code.to_string(),
            direction_label: direction_label(&lines, code).to_string(),
            direction_destination: None,
            stop_id: StopId::parse(stop).unwrap(),
            lines,
        }
    }

    /// Trips as (route, trip id, [(stop id, seconds from now)]).
    pub(crate) fn trip(route: &str, trip_id: &str, stops: &[(&str, i64)]) -> FeedTrip {
        FeedTrip {
            route_id: route.to_string(),
            trip_id: trip_id.to_string(),
            stop_time_updates: stops
                .iter()
                .map(|(stop, offset)| StopTimeUpdate {
                    stop_id: Some(stop.to_string()),
                    arrival: Some(secs(*offset)),
                    departure: None,
                })
                .collect(),
            ..Default::default()
        }
    }

    pub(crate) fn feed_set(trips: Vec<(&str, &str, Vec<(&str, i64)>)>) -> FeedSet {
        let trips = trips
            .into_iter()
            .map(|(route, id, stops)| trip(route, id, &stops))
            .collect();
        FeedSet::new(vec![(
            "gtfs-1234567".to_string(),
            DecodedFeed {
                generated_at: Some(now()),
                trips,
            },
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::stops::fixtures::lexington_table;

    #[test]
    fn wall_street_uptown_board() {
        let feeds = feed_set(vec![
            ("4", "t1", vec![("419N", 60)]),
            ("6", "t2", vec![("419N", 180)]),
            ("4", "t3", vec![("419N", 400)]),
        ]);
        let dirs = vec![direction("Wall St", &["4", "5"], "N", "419N")];

        let arrivals = build_arrivals(&feeds, &dirs, &lexington_table(), now());

        assert_eq!(arrivals.len(), 2);
        assert_eq!(arrivals[0].arrives_at, secs(60));
        assert_eq!(arrivals[0].route_id, "4");
        assert_eq!(arrivals[1].arrives_at, secs(180));
        assert_eq!(arrivals[1].route_id, "6");
        assert!(arrivals.iter().all(|a| a.fetched_at == now()));
    }
}
