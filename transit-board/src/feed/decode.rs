//! Turning raw feed bytes into [`DecodedFeed`]s.

use prost::Message;
use tracing::debug;

use crate::domain::instant_from_unix;

use super::error::FeedError;
use super::types::{DecodedFeed, FeedTrip, StopTimeUpdate};

/// Decodes one feed payload.
///
/// Implementations must treat absent or zero timestamps as "no data".
pub trait FeedDecoder: Send + Sync {
    fn decode(&self, feed: &str, bytes: &[u8]) -> Result<DecodedFeed, FeedError>;
}

/// GTFS-realtime protobuf decoder.
///
/// Only trip updates are read; vehicle positions and alerts are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GtfsRealtimeDecoder;

impl FeedDecoder for GtfsRealtimeDecoder {
    fn decode(&self, feed: &str, bytes: &[u8]) -> Result<DecodedFeed, FeedError> {
        let message =
            gtfs_realtime::FeedMessage::decode(bytes).map_err(|e| FeedError::Decode {
                feed: feed.to_string(),
                message: e.to_string(),
            })?;

        let generated_at = message
            .header
            .timestamp
            .and_then(|ts| i64::try_from(ts).ok())
            .and_then(instant_from_unix);

        let trips: Vec<FeedTrip> = message
            .entity
            .into_iter()
            .filter_map(|entity| entity.trip_update)
            .map(convert_trip_update)
            .collect();

        debug!(feed, trips = trips.len(), ?generated_at, "decoded feed");

        Ok(DecodedFeed {
            generated_at,
            trips,
        })
    }
}

fn convert_trip_update(update: gtfs_realtime::TripUpdate) -> FeedTrip {
    let stop_time_updates = update
        .stop_time_update
        .into_iter()
        .map(|stu| StopTimeUpdate {
            stop_id: stu.stop_id.filter(|id| !id.is_empty()),
            arrival: stu.arrival.and_then(|e| e.time).and_then(instant_from_unix),
            departure: stu.departure.and_then(|e| e.time).and_then(instant_from_unix),
        })
        .collect();

    FeedTrip {
        route_id: update.trip.route_id.unwrap_or_default(),
        trip_id: update.trip.trip_id.unwrap_or_default(),
        direction: None,
        direction_id: update.trip.direction_id,
        stop_time_updates,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders for protobuf payloads.

    use gtfs_realtime::trip_update::{StopTimeEvent, StopTimeUpdate as PbStopTimeUpdate};
    use gtfs_realtime::{FeedEntity, FeedHeader, FeedMessage, TripDescriptor, TripUpdate};
    use prost::Message;

    pub(crate) fn encode(timestamp: Option<u64>, trips: Vec<(&str, &str, Vec<(&str, i64)>)>) -> Vec<u8> {
        let entity = trips
            .into_iter()
            .enumerate()
            .map(|(idx, (route, trip, stops))| FeedEntity {
                id: idx.to_string(),
                trip_update: Some(TripUpdate {
                    trip: TripDescriptor {
                        trip_id: Some(trip.to_string()),
                        route_id: Some(route.to_string()),
                        ..Default::default()
                    },
                    stop_time_update: stops
                        .into_iter()
                        .map(|(stop, time)| PbStopTimeUpdate {
                            stop_id: Some(stop.to_string()),
                            arrival: Some(StopTimeEvent {
                                time: Some(time),
                                ..Default::default()
                            }),
                            ..Default::default()
                        })
                        .collect(),
                    ..Default::default()
                }),
                ..Default::default()
            })
            .collect();

        FeedMessage {
            header: FeedHeader {
                gtfs_realtime_version: "2.0".to_string(),
                timestamp,
                ..Default::default()
            },
            entity,
        }
        .encode_to_vec()
    }
}
