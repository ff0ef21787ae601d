//! Error types for lectern.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via `?` and
//! `From` conversions up to [`AppError`], which is what the binary reports.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned from `main`
//!   - [`FetchError`] - A backing-store call failed
//!   - [`SessionError`] - The persisted session could not be decoded, read or written
//!   - [`ConfigError`](crate::config::ConfigError) - Config file unreadable or invalid
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing subscriber setup failed
//!
//! # Recovery Strategy
//!
//! No error is fatal to the set of open tabs. Every failure degrades the affected node or
//! tab to a well-defined default:
//!
//! - **Fetch failure**: the node reverts to collapsed and unloaded; the error is returned to
//!   the caller, which may retry by expanding again.
//! - **Stale result**: a fetch that completes after its generation was superseded is not an
//!   error at all. It surfaces as [`LoadOutcome::Stale`](crate::tree::LoadOutcome) and is
//!   dropped.
//! - **Deserialization failure**: the affected tab falls back to a fresh default state while
//!   the remaining tabs restore normally.

use super::identifiers::{EntityKind, TabId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
///
/// Domain errors convert into `AppError` via `From`, so `main` can use `?` throughout.
#[derive(Debug, Error)]
pub enum AppError {
    /// A backing-store call failed outside of any tab (e.g. loading the catalog roots).
    #[error("Backing store error: {0}")]
    Fetch(#[from] FetchError),

    /// Session persistence failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// A store fixture file is not valid JSON for the fixture schema.
    #[error("Invalid store fixture {path}: {reason}")]
    Fixture {
        /// Fixture path.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },

    /// Command output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    /// Generic I/O failure (reading fixtures, writing output).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A backing-store call failed.
///
/// Returned by every [`BackingStore`](crate::store::BackingStore) method. When a tree
/// expansion fails, the node is reverted to its collapsed, unloaded state before the error
/// is handed back, so the caller only has to decide whether to retry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The requested entity does not exist (anymore).
    ///
    /// Session restore treats this as "the persisted tab references a deleted entity" and
    /// falls back to a default tab.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Raw id of the missing entity.
        id: u64,
    },

    /// The store itself failed (connection lost, query error, ...).
    #[error("backing store failure: {0}")]
    Backend(String),
}

/// Errors reading or writing the persisted session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A persisted value for one tab could not be decoded.
    ///
    /// **Recovery**: the tab is replaced by a default tab; other tabs are unaffected.
    #[error("Tab {tab}: cannot decode `{key}`: {reason}")]
    Deserialization {
        /// Tab whose blob is malformed.
        tab: TabId,
        /// Key (without the tab namespace) that failed.
        key: String,
        /// Decoder message.
        reason: String,
    },

    /// The ordered tab list itself is malformed.
    #[error("Cannot decode tab list: {0}")]
    TabList(String),

    /// A value could not be encoded.
    #[error("Cannot encode `{key}`: {reason}")]
    Encode {
        /// Key being written.
        key: String,
        /// Encoder message.
        reason: String,
    },

    /// The persistence medium could not be read or written.
    #[error("Session file {path}: {source}")]
    Io {
        /// File backing the key-value store.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The persistence medium exists but is not a flat JSON object of strings.
    #[error("Session file {path} is corrupt: {reason}")]
    Corrupt {
        /// File backing the key-value store.
        path: PathBuf,
        /// Decoder message.
        reason: String,
    },
}

// ===== Tests =====
