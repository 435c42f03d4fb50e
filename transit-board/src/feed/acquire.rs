//! Fetching the feed set for one cycle, with the freshness guard.

use std::future::Future;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, warn};

use super::error::FeedError;
use super::types::{DecodedFeed, FeedTrip};

/// Source of decoded feeds.
///
/// Implemented by the HTTP client and by [`MockFeedProvider`](super::MockFeedProvider).
pub trait FeedProvider: Send + Sync {
    /// Fetch and decode one named feed.
    fn fetch_feed(
        &self,
        feed: &str,
    ) -> impl Future<Output = Result<DecodedFeed, FeedError>> + Send;
}

/// All feeds fetched for one cycle, in request order. Every member passed
/// the freshness check against the same instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSet {
    feeds: Vec<(String, DecodedFeed)>,
}

impl FeedSet {
    pub fn new(feeds: Vec<(String, DecodedFeed)>) -> Self {
        Self { feeds }
    }

    /// Every trip across every feed.
    pub fn trips(&self) -> impl Iterator<Item = &FeedTrip> {
        self.feeds.iter().flat_map(|(_, feed)| feed.trips.iter())
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

/// Reject a feed generated more than `threshold_secs` before `now`.
///
/// A feed without a generation instant cannot be shown fresh and is rejected.
pub fn check_freshness(
    name: &str,
    feed: &DecodedFeed,
    now: DateTime<Utc>,
    threshold_secs: u64,
) -> Result<(), FeedError> {
    let stale = match feed.generated_at {
        Some(generated_at) => (now - generated_at).num_seconds() > threshold_secs as i64,
        None => true,
    };

    if stale {
        warn!(
            feed = name,
            generated_at = ?feed.generated_at,
            threshold_secs,
            "feed is stale"
        );
        return Err(FeedError::Stale {
            feed: name.to_string(),
            generated_at: feed.generated_at,
            threshold_secs,
        });
    }
    Ok(())
}

/// Fetch every named feed concurrently and check each for freshness.
///
/// Fails fast: the first fetch, decode or freshness error aborts the whole
/// set, so callers never see a mix of fresh and stale feeds.
pub async fn acquire_feeds<P: FeedProvider>(
    provider: &P,
    names: &[String],
    now: DateTime<Utc>,
    threshold_secs: u64,
) -> Result<FeedSet, FeedError> {
    let feeds = try_join_all(names.iter().map(|name| async move {
        let feed = provider.fetch_feed(name).await?;
        check_freshness(name, &feed, now, threshold_secs)?;
        debug!(feed = %name, trips = feed.trips.len(), "feed accepted");
        Ok::<_, FeedError>((name.clone(), feed))
    }))
    .await?;

    Ok(FeedSet::new(feeds))
}
