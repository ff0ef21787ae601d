//! In-memory backing store.
//!
//! Serves a fixed data set, typically loaded from a JSON fixture. Used by the CLI to
//! exercise sessions without a database, and by tests, which can make individual calls
//! fail, add latency, and count how often each call was made.

use super::BackingStore;
use crate::model::{
    Book, BookId, CatalogEntry, Category, CategoryId, CommentaryEntry, EntityKind, FetchError,
    Line, LineId, LineSource, TocEntry, TocEntryId,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Data set served by [`MemoryStore`]. This is also the JSON fixture schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreFixture {
    /// All categories.
    pub categories: Vec<Category>,
    /// All books.
    pub books: Vec<Book>,
    /// Table-of-contents entries of every book.
    pub toc_entries: Vec<TocEntry>,
    /// Lines of every book.
    pub lines: Vec<Line>,
    /// Commentaries of every line.
    pub commentaries: Vec<CommentaryEntry>,
}

/// Identifies one backing-store call, for counting and fault injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKey {
    /// `fetch_category_children(parent)`.
    CategoryChildren(Option<CategoryId>),
    /// `fetch_toc_children(book, parent)`.
    TocChildren(BookId, Option<TocEntryId>),
    /// `fetch_lines(source)`.
    Lines(LineSource),
    /// `fetch_commentaries(line)`.
    Commentaries(LineId),
    /// `fetch_title(id, kind)`.
    Title(EntityKind, u64),
}

/// [`BackingStore`] over an in-memory [`StoreFixture`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: StoreFixture,
    latency: Option<Duration>,
    failing: Mutex<HashSet<FetchKey>>,
    calls: Mutex<HashMap<FetchKey, usize>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Serve `data`.
    pub fn new(data: StoreFixture) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Parse a JSON fixture.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make `key` fail with a backend error until [`MemoryStore::heal`] is called.
    pub fn fail_on(&self, key: FetchKey) {
        lock(&self.failing).insert(key);
    }

    /// Stop failing `key`.
    pub fn heal(&self, key: FetchKey) {
        lock(&self.failing).remove(&key);
    }

    /// Number of times `key` was called, including failed calls.
    pub fn call_count(&self, key: FetchKey) -> usize {
        lock(&self.calls).get(&key).copied().unwrap_or(0)
    }

    /// Total number of calls of any kind.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// The served data set.
    pub fn data(&self) -> &StoreFixture {
        &self.data
    }

    async fn enter(&self, key: FetchKey) -> Result<(), FetchError> {
        *lock(&self.calls).entry(key).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if lock(&self.failing).contains(&key) {
            return Err(FetchError::Backend(format!("injected failure for {:?}", key)));
        }
        Ok(())
    }

    fn has_category(&self, id: CategoryId) -> bool {
        self.data.categories.iter().any(|c| c.id == id)
    }

    fn has_book(&self, id: BookId) -> bool {
        self.data.books.iter().any(|b| b.id == id)
    }

    fn has_toc_entry(&self, id: TocEntryId) -> bool {
        self.data.toc_entries.iter().any(|t| t.id == id)
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn fetch_category_children(
        &self,
        parent: Option<CategoryId>,
    ) -> Result<Vec<CatalogEntry>, FetchError> {
        self.enter(FetchKey::CategoryChildren(parent)).await?;

        if let Some(id) = parent {
            if !self.has_category(id) {
                return Err(FetchError::NotFound {
                    kind: EntityKind::Category,
                    id: id.get(),
                });
            }
        }

        let categories = self
            .data
            .categories
            .iter()
            .filter(|c| c.parent_id == parent)
            .cloned()
            .map(CatalogEntry::Category);
        let books = self
            .data
            .books
            .iter()
            .filter(|b| Some(b.category_id) == parent)
            .cloned()
            .map(CatalogEntry::Book);

        Ok(categories.chain(books).collect())
    }

    async fn fetch_toc_children(
        &self,
        book: BookId,
        parent: Option<TocEntryId>,
    ) -> Result<Vec<TocEntry>, FetchError> {
        self.enter(FetchKey::TocChildren(book, parent)).await?;

        if !self.has_book(book) {
            return Err(FetchError::NotFound {
                kind: EntityKind::Book,
                id: book.get(),
            });
        }
        if let Some(id) = parent {
            if !self.has_toc_entry(id) {
                return Err(FetchError::NotFound {
                    kind: EntityKind::TocEntry,
                    id: id.get(),
                });
            }
        }

        Ok(self
            .data
            .toc_entries
            .iter()
            .filter(|t| t.book_id == book && t.parent_id == parent)
            .cloned()
            .collect())
    }

    async fn fetch_lines(&self, source: LineSource) -> Result<Vec<Line>, FetchError> {
        self.enter(FetchKey::Lines(source)).await?;

        let mut lines: Vec<Line> = match source {
            LineSource::Book(book) => {
                if !self.has_book(book) {
                    return Err(FetchError::NotFound {
                        kind: EntityKind::Book,
                        id: book.get(),
                    });
                }
                self.data
                    .lines
                    .iter()
                    .filter(|l| l.book_id == book)
                    .cloned()
                    .collect()
            }
            LineSource::TocEntry(entry) => {
                if !self.has_toc_entry(entry) {
                    return Err(FetchError::NotFound {
                        kind: EntityKind::TocEntry,
                        id: entry.get(),
                    });
                }
                self.data
                    .lines
                    .iter()
                    .filter(|l| l.toc_entry_id == Some(entry))
                    .cloned()
                    .collect()
            }
        };
        lines.sort_by_key(|l| l.index);
        Ok(lines)
    }

    async fn fetch_commentaries(&self, line: LineId) -> Result<Vec<CommentaryEntry>, FetchError> {
        self.enter(FetchKey::Commentaries(line)).await?;

        Ok(self
            .data
            .commentaries
            .iter()
            .filter(|c| c.line_id == line)
            .cloned()
            .collect())
    }

    async fn fetch_title(&self, id: u64, kind: EntityKind) -> Result<String, FetchError> {
        self.enter(FetchKey::Title(kind, id)).await?;

        let title = match kind {
            EntityKind::Category => self
                .data
                .categories
                .iter()
                .find(|c| c.id.get() == id)
                .map(|c| c.title.clone()),
            EntityKind::Book => self
                .data
                .books
                .iter()
                .find(|b| b.id.get() == id)
                .map(|b| b.title.clone()),
            EntityKind::TocEntry => self
                .data
                .toc_entries
                .iter()
                .find(|t| t.id.get() == id)
                .map(|t| t.title.clone()),
        };
        title.ok_or(FetchError::NotFound { kind, id })
    }
}

// ===== Tests =====
