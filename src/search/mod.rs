//! Search over retrieved text (pure).

pub mod highlight;

pub use highlight::{
    count_matches, highlight, highlight_query, nth_match, HighlightRange, MatchLocator,
    SearchQuery, MIN_QUERY_CHARS,
};
