//! Session persistence: flat key layout, key-value media, snapshot and restore.

pub mod keys;
pub mod kv;
pub mod session_store;

pub use keys::StateKeys;
pub use kv::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use session_store::{RestoredTab, SessionBlob, SessionStore};
