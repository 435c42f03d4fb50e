//! Station name normalization.
//!
//! Feeds, static data and riders spell the same station many ways
//! ("14th Street–Union Square", "14 St-Union Sq"). Names are folded to a
//! canonical lowercase ASCII form before comparison.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Whole-word abbreviations applied after punctuation folding.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("street", "st"),
    ("avenue", "av"),
    ("ave", "av"),
    ("boulevard", "blvd"),
    ("road", "rd"),
    ("square", "sq"),
    ("center", "ctr"),
    ("terminal", "term"),
    ("junction", "jct"),
];

/// Fold a station name to its canonical comparison form.
///
/// Strips diacritics and case, drops punctuation (hyphens and slashes
/// separate words), removes ordinal suffixes ("42nd" → "42") and
/// abbreviates common street words.
///
/// # Examples
///
/// ```
/// use transit_board::stops::normalize_station_name;
///
/// assert_eq!(normalize_station_name("14th Street–Union Square"), "14 st union sq");
/// assert_eq!(normalize_station_name("Grand Central-42 St"), "grand central 42 st");
/// assert_eq!(normalize_station_name("  Wall St. "), "wall st");
/// ```
pub fn normalize_station_name(value: &str) -> String {
    let folded: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '–' | '—' | '/' => ' ',
            other => other,
        })
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    folded
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .map(fold_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether two names refer to the same station.
///
/// Matches on equality or when either normalized form is a prefix of the
/// other, so "Brooklyn Bridge" matches "Brooklyn Bridge-City Hall".
pub fn names_match(candidate: &str, target: &str) -> bool {
    let candidate = normalize_station_name(candidate);
    let target = normalize_station_name(target);

    if candidate.is_empty() || target.is_empty() {
        return false;
    }

    candidate == target || candidate.starts_with(&target) || target.starts_with(&candidate)
}

fn fold_word(word: &str) -> &str {
    if let Some(digits) = strip_ordinal(word) {
        return digits;
    }
    ABBREVIATIONS
        .iter()
        .find(|(long, _)| *long == word)
        .map(|(_, short)| *short)
        .unwrap_or(word)
}

/// "42nd" → "42"; anything else → None.
fn strip_ordinal(word: &str) -> Option<&str> {
    let split = word.find(|c: char| !c.is_ascii_digit())?;
    let (digits, suffix) = word.split_at(split);
    if digits.is_empty() {
        return None;
    }
    matches!(suffix, "st" | "nd" | "rd" | "th").then_some(digits)
}
