//! Lectern
//!
//! State engine for a multi-tab reader of a hierarchical text library: a lazily loaded
//! category/book browser, per-book tables of contents, search highlighting, and session
//! persistence of every open tab.
//!
//! The crate follows a Pure Core / Impure Shell split. [`state`], [`tree`] and [`search`]
//! are synchronous and never touch the backing store; [`loader`] runs the fetches they ask
//! for and [`session`] persists them.

pub mod cache;
pub mod commands;
pub mod config;
pub mod loader;
pub mod logging;
pub mod model;
pub mod search;
pub mod session;
pub mod state;
pub mod store;
pub mod tree;

#[cfg(test)]
mod test_harness;
