//! Process-wide caches shared by all tabs.

pub mod titles;

pub use titles::{TitleCache, TitleCaches};
