//! Stop identifier types.

use std::borrow::Borrow;
use std::fmt;

use super::Direction;

/// Error returned when parsing an invalid stop identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid stop id: {reason}")]
pub struct InvalidStopId {
    reason: &'static str,
}

/// A platform-level stop identifier such as `419N`.
///
/// Stop ids are non-empty and contain no whitespace. Directional platforms
/// carry their travel direction as a trailing `N`/`S` suffix; parent
/// stations (e.g. `419`) carry none.
///
/// # Examples
///
/// ```
/// use transit_board::domain::{Direction, StopId};
///
/// let wall_st = StopId::parse(" 419N ").unwrap();
/// assert_eq!(wall_st.as_str(), "419N");
/// assert_eq!(wall_st.direction_suffix(), Some(Direction::North));
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("41 9N").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopId(String);

impl StopId {
    /// Parse a stop id, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidStopId> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(InvalidStopId {
                reason: "must not be empty",
            });
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(InvalidStopId {
                reason: "must not contain whitespace",
            });
        }

        Ok(StopId(trimmed.to_string()))
    }

    /// Returns the stop id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The platform direction encoded in the trailing suffix, if any.
    pub fn direction_suffix(&self) -> Option<Direction> {
        match self.0.chars().last()?.to_ascii_uppercase() {
            'N' => Some(Direction::North),
            'S' => Some(Direction::South),
            _ => None,
        }
    }

    /// Whether this id ends with the platform suffix for `direction`.
    pub fn has_suffix(&self, direction: Direction) -> bool {
        self.direction_suffix() == Some(direction)
    }
}

impl Borrow<str> for StopId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
