//! Display-title memoization.
//!
//! Titles are looked up far more often than they change, and every lookup against the
//! backing store is slow. A `TitleCache` remembers every title it has seen for the life of
//! the process. There is no eviction and no invalidation here; if titles can change
//! underneath, the owner of the store is responsible for building a fresh cache.
//!
//! One cache per entity kind, because ids are only unique within a kind.

use crate::model::{BookId, CategoryId, EntityKind, FetchError, TocEntryId};
use crate::store::BackingStore;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Append-only `id -> title` map, safe to share between tabs.
///
/// Reads take a shared lock, so concurrent lookups from many tabs never block each other.
/// A poisoned lock is recovered rather than propagated: the map is only ever appended to,
/// so a panic mid-insert cannot leave it inconsistent.
#[derive(Debug, Default)]
pub struct TitleCache {
    titles: RwLock<HashMap<u64, String>>,
}

impl TitleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached title for `id`, if any.
    pub fn get(&self, id: u64) -> Option<String> {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Remember the title for `id`.
    pub fn put(&self, id: u64, title: impl Into<String>) {
        self.titles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, title.into());
    }

    /// Number of cached titles.
    pub fn len(&self) -> usize {
        self.titles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The process-wide set of title caches, one per entity kind.
///
/// Constructed once in `main` and handed to every tab as an `Arc<TitleCaches>`.
#[derive(Debug, Default)]
pub struct TitleCaches {
    /// Category titles.
    pub categories: TitleCache,
    /// Book titles.
    pub books: TitleCache,
    /// Table-of-contents entry titles.
    pub toc_entries: TitleCache,
}

impl TitleCaches {
    /// Create empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache for `kind`.
    pub fn for_kind(&self, kind: EntityKind) -> &TitleCache {
        match kind {
            EntityKind::Category => &self.categories,
            EntityKind::Book => &self.books,
            EntityKind::TocEntry => &self.toc_entries,
        }
    }

    /// Title of `id`, falling through to the store on a miss and caching the answer.
    pub async fn resolve(
        &self,
        store: &dyn BackingStore,
        id: u64,
        kind: EntityKind,
    ) -> Result<String, FetchError> {
        let cache = self.for_kind(kind);
        if let Some(title) = cache.get(id) {
            return Ok(title);
        }

        debug!(id, %kind, "title cache miss");
        let title = store.fetch_title(id, kind).await?;
        cache.put(id, title.clone());
        Ok(title)
    }

    /// Title of a category.
    pub async fn category_title(
        &self,
        store: &dyn BackingStore,
        id: CategoryId,
    ) -> Result<String, FetchError> {
        self.resolve(store, id.get(), EntityKind::Category).await
    }

    /// Title of a book.
    pub async fn book_title(
        &self,
        store: &dyn BackingStore,
        id: BookId,
    ) -> Result<String, FetchError> {
        self.resolve(store, id.get(), EntityKind::Book).await
    }

    /// Title of a table-of-contents entry.
    pub async fn toc_title(
        &self,
        store: &dyn BackingStore,
        id: TocEntryId,
    ) -> Result<String, FetchError> {
        self.resolve(store, id.get(), EntityKind::TocEntry).await
    }
}

// ===== Tests =====
