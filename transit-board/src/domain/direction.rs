//! Travel directions and their rider-facing labels.

use std::fmt;

/// Lines whose north/south platforms are signed "Uptown"/"Downtown".
const UPTOWN_LINES: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "A", "C", "E", "B", "D", "F", "M", "N", "Q", "R", "W",
];

/// Error returned when parsing an unknown direction code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction code: {0:?}")]
pub struct InvalidDirection(pub String);

/// A compass travel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Parse a one-letter direction code (`N`, `S`, `E`, `W`), ignoring case
    /// and surrounding whitespace.
    pub fn parse(code: &str) -> Result<Self, InvalidDirection> {
        match code.trim().to_ascii_uppercase().as_str() {
            "N" => Ok(Direction::North),
            "S" => Ok(Direction::South),
            "E" => Ok(Direction::East),
            "W" => Ok(Direction::West),
            _ => Err(InvalidDirection(code.to_string())),
        }
    }

    /// The one-letter code.
    pub fn code(self) -> &'static str {
        match self {
            Direction::North => "N",
            Direction::South => "S",
            Direction::East => "E",
            Direction::West => "W",
        }
    }

    /// Generic compass label, e.g. "Northbound".
    pub fn compass_label(self) -> &'static str {
        match self {
            Direction::North => "Northbound",
            Direction::South => "Southbound",
            Direction::East => "Eastbound",
            Direction::West => "Westbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Derive a rider-facing label for a platform direction.
///
/// North/south platforms served by any uptown/downtown line read "Uptown"
/// or "Downtown"; everything else gets its compass label, and codes that
/// aren't compass directions read "Unknown direction".
///
/// # Examples
///
/// ```
/// use transit_board::domain::direction_label;
///
/// let lex = vec!["4".to_string(), "5".to_string()];
/// assert_eq!(direction_label(&lex, "N"), "Uptown");
///
/// let jz = vec!["J".to_string()];
/// assert_eq!(direction_label(&jz, "S"), "Southbound");
/// assert_eq!(direction_label(&jz, "X"), "Unknown direction");
/// ```
pub fn direction_label(lines: &[String], code: &str) -> &'static str {
    let Ok(direction) = Direction::parse(code) else {
        return "Unknown direction";
    };

    let uptown = lines
        .iter()
        .map(|line| line.trim().to_ascii_uppercase())
        .any(|line| UPTOWN_LINES.iter().any(|up| *up == line));

    match direction {
        Direction::North if uptown => "Uptown",
        Direction::South if uptown => "Downtown",
        other => other.compass_label(),
    }
}
