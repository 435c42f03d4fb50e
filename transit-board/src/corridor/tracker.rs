//! Inbound train tracking along the configured corridor.
//!
//! Each qualifying trip is placed in one of two buckets. A train is
//! *inflight* when it has left the start station and not yet reached the
//! end; when the feed omits the start stop, its neighbouring stops' parent
//! stations are located on the corridor instead. Optionally the next few
//! trains still *approaching* the start are admitted as well.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::CorridorConfig;
use crate::domain::{
    CheckpointEta, InboundTrain, StopId, WindowBucket, leave_by, minutes_until,
};
use crate::feed::{FeedSet, FeedTrip};
use crate::stops::{StopError, StopTable};

use super::ordering::CorridorOrdering;
use super::timeline::{TripTimeline, resolve_trip_direction};

/// A destination checkpoint with its platform resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCheckpoint {
    pub name: String,
    pub walk_minutes: i64,
    pub stop_id: StopId,
}

/// Corridor stations resolved to platforms for the tracked direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCorridor {
    pub start: StopId,
    pub end: StopId,
    pub start_parent: Option<String>,
    pub end_parent: Option<String>,
    pub checkpoints: Vec<ResolvedCheckpoint>,
}

impl ResolvedCorridor {
    /// Resolve every named station. Any unresolvable name fails the corridor.
    pub fn resolve(config: &CorridorConfig, stops: &StopTable) -> Result<Self, StopError> {
        let start = stops.resolve(&config.start_station, config.direction)?;
        let end = stops.resolve(&config.end_station, config.direction)?;

        let checkpoints = config
            .checkpoints
            .iter()
            .map(|checkpoint| {
                Ok(ResolvedCheckpoint {
                    name: checkpoint.name.clone(),
                    walk_minutes: checkpoint.walk_minutes,
                    stop_id: stops.resolve(&checkpoint.name, config.direction)?,
                })
            })
            .collect::<Result<Vec<_>, StopError>>()?;

        Ok(Self {
            start_parent: stops.parent_of(start.as_str()).map(str::to_string),
            end_parent: stops.parent_of(end.as_str()).map(str::to_string),
            start,
            end,
            checkpoints,
        })
    }
}

/// Where a trip sits relative to the tracking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Inflight,
    /// Not yet at the start; minutes until it gets there.
    Approaching(i64),
    Outside,
}

/// Track inbound trains for one cycle.
///
/// Trips must match a configured route and the tracked direction, still be
/// heading for the end station, and have a time for every checkpoint.
pub fn track_inbound(
    feeds: &FeedSet,
    config: &CorridorConfig,
    stops: &StopTable,
    now: DateTime<Utc>,
) -> Result<Vec<InboundTrain>, StopError> {
    let corridor = ResolvedCorridor::resolve(config, stops)?;
    let ordering = CorridorOrdering::from_config(&config.corridor_order);

    let mut inflight = Vec::new();
    let mut approaching = Vec::new();

    for trip in feeds.trips() {
        if !tracks_trip(config, trip) {
            continue;
        }

        let timeline = TripTimeline::from_trip(trip);
        if timeline.is_empty() {
            continue;
        }

        let Some(end_time) = timeline.time_at(&corridor.end) else {
            continue;
        };
        if end_time <= now {
            continue;
        }
        let Some(checkpoints) = checkpoint_etas(&timeline, &corridor, config.buffer_minutes, now)
        else {
            continue;
        };

        let placement = classify(
            &timeline,
            &corridor,
            &ordering,
            stops,
            config.include_next_at_start,
            now,
        );

        let train = |bucket| InboundTrain {
            trip_id: trip.trip_id.clone(),
            route_id: trip.route_id.clone(),
            current_position: timeline.position_label(stops, now),
            checkpoints: checkpoints.clone(),
            bucket,
        };

        match placement {
            Placement::Inflight => inflight.push(train(WindowBucket::Inflight)),
            Placement::Approaching(eta) => {
                approaching.push((eta, train(WindowBucket::ApproachingStart)))
            }
            Placement::Outside => {}
        }
    }

    debug!(
        inflight = inflight.len(),
        approaching = approaching.len(),
        "corridor trips classified"
    );

    Ok(assemble(
        inflight,
        approaching,
        config.include_next_at_start,
        config.max_trains,
    ))
}

fn tracks_trip(config: &CorridorConfig, trip: &FeedTrip) -> bool {
    let route = trip.route_id.trim();
    if route.is_empty() || trip.trip_id.trim().is_empty() {
        return false;
    }
    if !config.routes.iter().any(|r| r.eq_ignore_ascii_case(route)) {
        return false;
    }
    resolve_trip_direction(trip) == Some(config.direction)
}

/// ETA and leave-by per checkpoint, or `None` if any checkpoint has no time.
fn checkpoint_etas(
    timeline: &TripTimeline,
    corridor: &ResolvedCorridor,
    buffer_minutes: i64,
    now: DateTime<Utc>,
) -> Option<Vec<CheckpointEta>> {
    corridor
        .checkpoints
        .iter()
        .map(|checkpoint| {
            let at = timeline.time_at(&checkpoint.stop_id)?;
            let (eta_minutes, leave_by_minutes) = if at <= now {
                (None, None)
            } else {
                let eta = minutes_until(at, now);
                (
                    Some(eta),
                    Some(leave_by(eta, buffer_minutes, checkpoint.walk_minutes)),
                )
            };
            Some(CheckpointEta {
                name: checkpoint.name.clone(),
                eta_minutes,
                leave_by_minutes,
            })
        })
        .collect()
}

pub(crate) fn classify(
    timeline: &TripTimeline,
    corridor: &ResolvedCorridor,
    ordering: &CorridorOrdering,
    stops: &StopTable,
    include_next_at_start: usize,
    now: DateTime<Utc>,
) -> Placement {
    let start_time = timeline.time_at(&corridor.start);
    let end_time = timeline.time_at(&corridor.end);

    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start <= now && now < end {
            return Placement::Inflight;
        }
    }

    let next = timeline.next_stop(now);
    let next_parent = next.and_then(|s| stops.parent_of(&s.stop_id));
    let last_parent = timeline
        .previous_stop(now)
        .and_then(|s| stops.parent_of(&s.stop_id));
    let start_parent = corridor.start_parent.as_deref();
    let end_parent = corridor.end_parent.as_deref();

    if ordering.is_between(next_parent, start_parent, end_parent)
        || ordering.is_between(last_parent, start_parent, end_parent)
    {
        debug!(
            next_parent,
            last_parent,
            start_parent,
            end_parent,
            "inflight by corridor position"
        );
        return Placement::Inflight;
    }

    if include_next_at_start == 0 {
        return Placement::Outside;
    }

    let reaches_start = start_time.or_else(|| {
        next.filter(|_| next_parent.is_some() && next_parent == start_parent)
            .map(|s| s.at)
    });
    match reaches_start {
        Some(at) if at >= now => Placement::Approaching(minutes_until(at, now)),
        _ => Placement::Outside,
    }
}

/// Merge buckets into the final board.
///
/// Inflight trains come first by first-checkpoint ETA; only the
/// `include_next_at_start` soonest approaching trains are admitted. A trip
/// appears once, inflight taking precedence.
pub(crate) fn assemble(
    mut inflight: Vec<InboundTrain>,
    mut approaching: Vec<(i64, InboundTrain)>,
    include_next_at_start: usize,
    max_trains: usize,
) -> Vec<InboundTrain> {
    inflight.sort_by_key(InboundTrain::sort_key);
    approaching.sort_by_key(|(eta, _)| *eta);

    let mut seen = HashSet::new();
    let mut selected: Vec<InboundTrain> = inflight
        .into_iter()
        .chain(
            approaching
                .into_iter()
                .take(include_next_at_start)
                .map(|(_, train)| train),
        )
        .filter(|train| seen.insert(train.trip_id.clone()))
        .collect();

    selected.sort_by_key(InboundTrain::sort_key);
    selected.truncate(max_trains.max(1));
    selected
}
