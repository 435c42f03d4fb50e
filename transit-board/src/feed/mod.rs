//! Real-time feed acquisition.
//!
//! Feeds are fetched per cycle, decoded into trips with stop-time updates,
//! and checked for freshness before anything downstream sees them.
//!
//! Key characteristics:
//! - Several lines share one feed; the catalog maps line codes to feeds
//! - Absent or zero timestamps mean "no data", never the Unix epoch
//! - A stale or failed feed fails the whole set

mod acquire;
mod catalog;
mod client;
mod decode;
mod error;
mod mock;
mod types;

pub use acquire::{FeedProvider, FeedSet, acquire_feeds, check_freshness};
pub use catalog::{DEFAULT_BASE_URL, feed_for_line, feed_url, required_feeds};
pub use client::{FeedClient, FeedClientConfig};
pub use decode::{FeedDecoder, GtfsRealtimeDecoder};
pub use error::FeedError;
pub use mock::MockFeedProvider;
pub use types::{DecodedFeed, FeedTrip, StopTimeUpdate};
