//! Async shell around the pure tab state.
//!
//! The state machine in [`crate::state`] only describes what must be fetched. This module
//! performs those fetches against a [`crate::store::BackingStore`] and hands the results
//! back, both for live intents ([`TabController`]) and for tabs restored from a session
//! ([`rehydrate`]).

pub mod controller;
pub mod rehydrate;

pub use controller::{fetch, run_category_load, run_toc_load, Fetched, TabController};
pub use rehydrate::rehydrate;
