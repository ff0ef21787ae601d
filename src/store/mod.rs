//! Backing store abstraction.
//!
//! The storage engine behind the catalog, the tables of contents and the book text is an
//! external collaborator. This trait is the only way the state engine reaches it, which
//! lets the application inject a database-backed implementation and tests inject
//! [`MemoryStore`].

pub mod memory;

pub use memory::{FetchKey, MemoryStore, StoreFixture};

use crate::model::{
    BookId, CatalogEntry, CategoryId, CommentaryEntry, EntityKind, FetchError, Line, LineId,
    LineSource, TocEntry, TocEntryId,
};
use async_trait::async_trait;

/// Read access to catalog, table-of-contents and content data.
///
/// Every call may suspend. Failures are reported as [`FetchError`], never swallowed.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Children of a category, or the root categories when `parent` is `None`.
    ///
    /// Sub-categories come before books; each group keeps the store's order.
    async fn fetch_category_children(
        &self,
        parent: Option<CategoryId>,
    ) -> Result<Vec<CatalogEntry>, FetchError>;

    /// Children of a table-of-contents entry, or the book's top-level entries when
    /// `parent` is `None`.
    async fn fetch_toc_children(
        &self,
        book: BookId,
        parent: Option<TocEntryId>,
    ) -> Result<Vec<TocEntry>, FetchError>;

    /// Lines of a book or of one table-of-contents entry, in reading order.
    async fn fetch_lines(&self, source: LineSource) -> Result<Vec<Line>, FetchError>;

    /// Commentaries attached to a line.
    async fn fetch_commentaries(&self, line: LineId) -> Result<Vec<CommentaryEntry>, FetchError>;

    /// Display title of an entity.
    async fn fetch_title(&self, id: u64, kind: EntityKind) -> Result<String, FetchError>;
}
