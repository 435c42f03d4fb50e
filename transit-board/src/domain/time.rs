//! Countdown arithmetic for arrival boards.
//!
//! Feeds report instants as unix seconds, where an absent or zero value means
//! "no prediction". Everything rider-facing is whole minutes, floored, and
//! never negative.

use chrono::{DateTime, Utc};

/// Convert feed-reported unix seconds into an instant.
///
/// Zero and negative values are treated as "no data" rather than epoch time.
///
/// # Examples
///
/// ```
/// use transit_board::domain::instant_from_unix;
///
/// assert!(instant_from_unix(0).is_none());
/// assert_eq!(instant_from_unix(1_700_000_000).unwrap().timestamp(), 1_700_000_000);
/// ```
pub fn instant_from_unix(secs: i64) -> Option<DateTime<Utc>> {
    if secs <= 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

/// Whole minutes from `now` until `at`, floored, never negative.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use transit_board::domain::minutes_until;
///
/// let now = Utc::now();
/// assert_eq!(minutes_until(now + Duration::seconds(119), now), 1);
/// assert_eq!(minutes_until(now - Duration::seconds(30), now), 0);
/// ```
pub fn minutes_until(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    if at <= now {
        return 0;
    }
    (at - now).num_seconds().div_euclid(60).max(0)
}

/// Minutes left before a rider must set off to make a train.
///
/// `eta_minutes` is the train's ETA at the checkpoint; the rider needs
/// `buffer_minutes` plus `walk_minutes` to get there.
///
/// # Examples
///
/// ```
/// use transit_board::domain::leave_by;
///
/// assert_eq!(leave_by(10, 3, 2), 5);
/// assert_eq!(leave_by(2, 3, 2), 0);
/// ```
pub fn leave_by(eta_minutes: i64, buffer_minutes: i64, walk_minutes: i64) -> i64 {
    (eta_minutes - (buffer_minutes + walk_minutes)).max(0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    proptest! {
        /// Future instants floor to whole minutes
        #[test]
        fn future_floors(secs in 1i64..100_000) {
            let now = base();
            prop_assert_eq!(minutes_until(now + Duration::seconds(secs), now), secs / 60);
        }

        /// Past instants are always zero
        #[test]
        fn past_is_zero(secs in 0i64..100_000) {
            let now = base();
            prop_assert_eq!(minutes_until(now - Duration::seconds(secs), now), 0);
        }

        /// Leave-by is never negative and never exceeds the ETA
        #[test]
        fn leave_by_bounded(eta in 0i64..500, buffer in 0i64..30, walk in 0i64..30) {
            let value = leave_by(eta, buffer, walk);
            prop_assert!(value >= 0);
            prop_assert!(value <= eta);
        }
    }
}
