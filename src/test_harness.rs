//! Shared fixtures for unit tests.
//!
//! Every test that needs a populated backing store loads the same library fixture, so
//! ids used across modules refer to the same entities.

use crate::cache::TitleCaches;
use crate::loader::TabController;
use crate::model::{CatalogNode, CategoryId};
use crate::state::{SplitDefaults, TabState};
use crate::store::MemoryStore;
use std::sync::Arc;

/// The library fixture: two root categories, four books, two books with a TOC.
pub(crate) const LIBRARY: &str = include_str!("../tests/fixtures/library.json");

/// A fresh in-memory store over the library fixture.
pub(crate) fn library() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_json(LIBRARY).expect("library fixture parses"))
}

/// Root categories of the library fixture.
pub(crate) fn category_roots() -> Vec<CatalogNode> {
    vec![
        CatalogNode::Category(CategoryId::new(1)),
        CatalogNode::Category(CategoryId::new(3)),
    ]
}

/// A new tab over the library's roots with default splits.
pub(crate) fn fresh_tab() -> TabState {
    TabState::new(category_roots(), SplitDefaults::default())
}

/// A controller for a fresh tab over `store`, with its own title caches.
pub(crate) fn controller(store: Arc<MemoryStore>) -> TabController {
    TabController::new(fresh_tab(), store, Arc::new(TitleCaches::new()))
}
