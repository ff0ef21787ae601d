//! Lazily loaded trees shared by the category browser and the table of contents.

pub mod lazy_cache;

pub use lazy_cache::{LazyTreeCache, LoadHandle, LoadOutcome, LoadRequest};
