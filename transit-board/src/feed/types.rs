//! Decoded feed types.
//!
//! The shape every decoder produces: a generation instant plus trips with
//! ordered stop-time updates. Nothing here is specific to a wire format.

use chrono::{DateTime, Utc};

use crate::domain::Direction;

/// One decoded feed snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFeed {
    /// When the producer generated this snapshot. `None` when absent or zero.
    pub generated_at: Option<DateTime<Utc>>,
    pub trips: Vec<FeedTrip>,
}

/// A single trip and its predicted stop times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedTrip {
    pub route_id: String,
    pub trip_id: String,
    /// Direction stated outright by the producer.
    pub direction: Option<Direction>,
    /// Numeric GTFS direction (0 or 1), when present.
    pub direction_id: Option<u32>,
    /// In feed order.
    pub stop_time_updates: Vec<StopTimeUpdate>,
}

/// A predicted arrival/departure at one stop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopTimeUpdate {
    pub stop_id: Option<String>,
    pub arrival: Option<DateTime<Utc>>,
    pub departure: Option<DateTime<Utc>>,
}

impl StopTimeUpdate {
    /// Arrival time, falling back to departure.
    pub fn effective_time(&self) -> Option<DateTime<Utc>> {
        self.arrival.or(self.departure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn effective_time_prefers_arrival() {
        let arr = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let dep = Utc.with_ymd_and_hms(2024, 6, 1, 8, 1, 0).unwrap();

        let both = StopTimeUpdate {
            stop_id: Some("419N".into()),
            arrival: Some(arr),
            departure: Some(dep),
        };
        assert_eq!(both.effective_time(), Some(arr));

        let dep_only = StopTimeUpdate {
            departure: Some(dep),
            ..both.clone()
        };
        let dep_only = StopTimeUpdate {
            arrival: None,
            ..dep_only
        };
        assert_eq!(dep_only.effective_time(), Some(dep));

        assert_eq!(StopTimeUpdate::default().effective_time(), None);
    }
}
