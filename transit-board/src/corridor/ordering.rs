//! Physical stop order along a tracked line segment.

use std::collections::HashMap;

/// Lexington Avenue local/express parents, Grand Central southbound to Fulton St.
const LEXINGTON_SOUTHBOUND: &[&str] = &[
    "631", // Grand Central-42 St
    "632", // 33 St
    "633", // 28 St
    "634", // 23 St
    "635", // 14 St-Union Sq
    "636", // Astor Pl
    "637", // Bleecker St
    "638", // Spring St
    "639", // Canal St
    "640", // Brooklyn Bridge-City Hall
    "419", // Wall St
    "418", // Fulton St
];

/// Parent station ids in travel order, with reverse lookup.
///
/// Increasing index is the direction of travel being tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorridorOrdering {
    index: HashMap<String, usize>,
}

impl CorridorOrdering {
    pub fn new<S: Into<String>>(parents: impl IntoIterator<Item = S>) -> Self {
        let mut index = HashMap::new();
        for (i, parent) in parents.into_iter().enumerate() {
            index.entry(parent.into()).or_insert(i);
        }
        Self { index }
    }

    /// The Lexington Avenue southbound corridor.
    pub fn lexington_southbound() -> Self {
        Self::new(LEXINGTON_SOUTHBOUND.iter().copied())
    }

    /// Configured order, or the Lexington corridor when none is given.
    pub fn from_config(parents: &[String]) -> Self {
        if parents.is_empty() {
            Self::lexington_southbound()
        } else {
            Self::new(parents.iter().cloned())
        }
    }

    /// Position of a parent station, if it lies on the corridor.
    pub fn position(&self, parent: &str) -> Option<usize> {
        self.index.get(parent).copied()
    }

    /// Whether `candidate` lies after `start`, up to and including `end`.
    ///
    /// Uses corridor positions when both bounds are on the corridor (in
    /// either direction). Otherwise parent ids are compared numerically,
    /// excluding the start itself. Any missing id is never between.
    pub fn is_between(
        &self,
        candidate: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> bool {
        let (Some(candidate), Some(start), Some(end)) = (candidate, start, end) else {
            return false;
        };

        if let (Some(start_idx), Some(end_idx)) = (self.position(start), self.position(end)) {
            let Some(idx) = self.position(candidate) else {
                return false;
            };
            return if start_idx < end_idx {
                start_idx < idx && idx <= end_idx
            } else if start_idx > end_idx {
                end_idx <= idx && idx < start_idx
            } else {
                false
            };
        }

        let (Ok(candidate), Ok(start), Ok(end)) = (
            candidate.parse::<i64>(),
            start.parse::<i64>(),
            end.parse::<i64>(),
        ) else {
            return false;
        };
        let (lower, upper) = (start.min(end), start.max(end));
        (lower..=upper).contains(&candidate) && candidate != start
    }
}

impl Default for CorridorOrdering {
    fn default() -> Self {
        Self::lexington_southbound()
    }
}
