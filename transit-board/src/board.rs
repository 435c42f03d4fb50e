//! The board context: one fetch cycle from feeds to cached boards.
//!
//! A [`TransitBoard`] owns everything a cycle needs (resolved station
//! directions, the corridor, the stop table, the feed provider) along with
//! the last-good snapshots and the keyed cache readers are served from.
//! Cycle failures are caught here: they are logged, recorded against the
//! affected source, and the previous snapshot stays in place.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::arrivals::build_arrivals;
use crate::cache::{CacheEntry, EntryMetadata, LastGood, SourceCache};
use crate::config::{
    AppConfig, ConfigError, CorridorConfig, StationBlock, StationDirection,
    expand_station_directions, resolve_station_blocks,
};
use crate::corridor::track_inbound;
use crate::domain::{Arrival, InboundTrain};
use crate::feed::{FeedError, FeedProvider, FeedSet, acquire_feeds, required_feeds};
use crate::stops::{StopError, StopTable};

/// Cache key for station arrivals.
pub const SUBWAY_SOURCE: &str = "subway";

/// Cache key for tracked inbound trains.
pub const INBOUND_SOURCE: &str = "inbound";

/// Sources reported on by health checks.
pub const HEALTH_SOURCES: [&str; 2] = [SUBWAY_SOURCE, INBOUND_SOURCE];

/// Errors caught at the cycle boundary.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Stop(#[from] StopError),
}

/// What one cycle leaves for readers: fresh results, or the previous ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub arrivals: Vec<Arrival>,
    pub inbound: Vec<InboundTrain>,
}

pub struct TransitBoard<P> {
    provider: P,
    stops: StopTable,
    blocks: Vec<StationBlock>,
    directions: Vec<StationDirection>,
    corridor: Option<CorridorConfig>,
    feeds: Vec<String>,
    stale_threshold_secs: u64,

    last_arrivals: LastGood<Vec<Arrival>>,
    last_inbound: LastGood<Vec<InboundTrain>>,
    subway: SourceCache<Vec<Arrival>>,
    inbound: SourceCache<Vec<InboundTrain>>,
}

impl<P: FeedProvider> TransitBoard<P> {
    /// Validate configuration and build an empty board.
    pub fn new(config: &AppConfig, stops: StopTable, provider: P) -> Result<Self, ConfigError> {
        let blocks = resolve_station_blocks(&config.subway.stations)?;
        let directions = expand_station_directions(&blocks);
        let corridor = match &config.inbound_tracker {
            Some(tracker) => tracker.validate()?,
            None => None,
        };

        let lines = config.required_lines();
        let feeds = required_feeds(lines.iter().map(String::as_str));

        info!(
            stations = blocks.len(),
            directions = directions.len(),
            feeds = ?feeds,
            corridor = ?corridor.as_ref().map(|c| c.window_description()),
            "board configured"
        );

        Ok(Self {
            provider,
            stops,
            blocks,
            directions,
            corridor,
            feeds,
            stale_threshold_secs: config.feeds.stale_threshold_secs,
            last_arrivals: LastGood::new(),
            last_inbound: LastGood::new(),
            subway: SourceCache::new(),
            inbound: SourceCache::new(),
        })
    }

    /// Run one fetch cycle.
    ///
    /// A feed failure aborts the whole cycle and leaves both sources on their
    /// previous snapshot. A corridor failure only affects inbound trains.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> BoardSnapshot {
        let feeds = match acquire_feeds(
            &self.provider,
            &self.feeds,
            now,
            self.stale_threshold_secs,
        )
        .await
        {
            Ok(feeds) => feeds,
            Err(err) => {
                let err = CycleError::from(err);
                warn!(error = %err, "fetch cycle failed; keeping last good data");
                self.subway
                    .record_error(SUBWAY_SOURCE, err.to_string(), now)
                    .await;
                self.inbound
                    .record_error(INBOUND_SOURCE, err.to_string(), now)
                    .await;
                return BoardSnapshot {
                    arrivals: self.last_arrivals.value_or_default().await,
                    inbound: self.last_inbound.value_or_default().await,
                };
            }
        };

        let arrivals = build_arrivals(&feeds, &self.directions, &self.stops, now);
        self.last_arrivals.store(arrivals.clone(), now).await;
        self.subway.set(SUBWAY_SOURCE, arrivals.clone(), now).await;

        let inbound = match self.track(&feeds, now) {
            Ok(trains) => {
                self.last_inbound.store(trains.clone(), now).await;
                self.inbound.set(INBOUND_SOURCE, trains.clone(), now).await;
                trains
            }
            Err(err) => {
                warn!(error = %err, "inbound tracking failed; keeping last good trains");
                self.inbound
                    .record_error(INBOUND_SOURCE, err.to_string(), now)
                    .await;
                self.last_inbound.value_or_default().await
            }
        };

        info!(
            feeds = feeds.len(),
            arrivals = arrivals.len(),
            inbound = inbound.len(),
            "fetch cycle complete"
        );

        BoardSnapshot { arrivals, inbound }
    }

    fn track(&self, feeds: &FeedSet, now: DateTime<Utc>) -> Result<Vec<InboundTrain>, CycleError> {
        match &self.corridor {
            Some(corridor) => Ok(track_inbound(feeds, corridor, &self.stops, now)?),
            None => Ok(Vec::new()),
        }
    }
}

impl<P> TransitBoard<P> {
    /// Cached station arrivals with bookkeeping.
    pub async fn arrivals(&self) -> CacheEntry<Vec<Arrival>> {
        self.subway.get(SUBWAY_SOURCE).await
    }

    /// Cached inbound trains with bookkeeping.
    pub async fn inbound(&self) -> CacheEntry<Vec<InboundTrain>> {
        self.inbound.get(INBOUND_SOURCE).await
    }

    /// Metadata for every source written so far, sorted by key.
    pub fn source_metadata(&self) -> Vec<(String, EntryMetadata)> {
        let mut all = self.subway.all_metadata();
        all.extend(self.inbound.all_metadata());
        all.sort_by(|a, b| a.0.cmp(&b.0));
        all
    }

    pub fn station_blocks(&self) -> &[StationBlock] {
        &self.blocks
    }

    pub fn corridor(&self) -> Option<&CorridorConfig> {
        self.corridor.as_ref()
    }

    /// Feeds fetched each cycle, in catalog order.
    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }
}
