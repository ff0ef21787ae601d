//! Search-result highlighting.
//!
//! Turns `(text, query, current match)` into non-overlapping ranges to be colored by the
//! rendering layer. Offsets and lengths are counted in `char`s, not bytes, so a locator
//! produced by one caller lines up with the text another caller renders.

use serde::{Deserialize, Serialize};

/// Queries shorter than this (after trimming) highlight nothing.
pub const MIN_QUERY_CHARS: usize = 2;

// ===== SearchQuery =====

/// Validated, trimmed search query of at least [`MIN_QUERY_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    folded: Vec<char>,
}

impl SearchQuery {
    /// Smart constructor: trims and validates the query.
    /// Returns `None` if fewer than [`MIN_QUERY_CHARS`] characters remain.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let folded: Vec<char> = trimmed.chars().map(fold).collect();
        if folded.len() < MIN_QUERY_CHARS {
            return None;
        }
        Some(Self {
            raw: trimmed.to_string(),
            folded,
        })
    }

    /// The trimmed query text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Query length in chars.
    pub fn char_len(&self) -> usize {
        self.folded.len()
    }
}

// ===== Ranges =====

/// A match position as `(start, length)` in chars, used to single out the current match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchLocator {
    /// First char of the match.
    pub start: usize,
    /// Match length in chars.
    pub length: usize,
}

impl MatchLocator {
    /// Create a locator.
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }
}

/// A highlighted range `[start, end)` in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    /// First highlighted char.
    pub start: usize,
    /// One past the last highlighted char.
    pub end: usize,
    /// Whether this is the match the user is currently on.
    pub is_current: bool,
}

impl HighlightRange {
    /// Locator of this range.
    pub fn locator(&self) -> MatchLocator {
        MatchLocator::new(self.start, self.end - self.start)
    }
}

// ===== Matching =====

fn fold(c: char) -> char {
    // Single-char folding keeps text and query offsets aligned.
    c.to_lowercase().next().unwrap_or(c)
}

/// Find every match of `query` in `text`.
///
/// Matching is case-insensitive and overlap-free: after a match, scanning resumes at the
/// match end, so `"AA"` in `"AAAA"` yields `[0,2)` and `[2,4)`. A range whose
/// `(start, length)` equals `current` is flagged as current.
///
/// Queries shorter than [`MIN_QUERY_CHARS`] after trimming produce no ranges.
pub fn highlight(text: &str, query: &str, current: Option<MatchLocator>) -> Vec<HighlightRange> {
    match SearchQuery::new(query) {
        Some(query) => highlight_query(text, &query, current),
        None => Vec::new(),
    }
}

/// [`highlight`] for an already validated query.
pub fn highlight_query(
    text: &str,
    query: &SearchQuery,
    current: Option<MatchLocator>,
) -> Vec<HighlightRange> {
    let haystack: Vec<char> = text.chars().map(fold).collect();
    let needle = &query.folded;
    let mut ranges = Vec::new();

    if needle.len() > haystack.len() {
        return ranges;
    }

    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            let end = start + needle.len();
            let is_current = current == Some(MatchLocator::new(start, needle.len()));
            ranges.push(HighlightRange {
                start,
                end,
                is_current,
            });
            start = end;
        } else {
            start += 1;
        }
    }

    ranges
}

/// Number of matches `highlight` would return.
pub fn count_matches(text: &str, query: &str) -> usize {
    highlight(text, query, None).len()
}

/// Locator of the `index`-th match, for stepping through results.
pub fn nth_match(text: &str, query: &str, index: usize) -> Option<MatchLocator> {
    highlight(text, query, None)
        .get(index)
        .map(HighlightRange::locator)
}

// ===== Tests =====

#[cfg(test)]
#[path = "highlight_tests.rs"]
mod tests;
