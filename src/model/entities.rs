//! Catalog, table-of-contents and content entities.
//!
//! These are the records the backing store hands back. The state engine only
//! looks at ids, parent links and titles; `Line` and `CommentaryEntry`
//! payloads are carried through untouched for the rendering layer.

use super::identifiers::{BookId, CategoryId, CommentatorId, LineId, TocEntryId};
use serde::{Deserialize, Serialize};

/// A catalog category. Categories form a forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: CategoryId,
    /// Parent category, `None` for a root category.
    pub parent_id: Option<CategoryId>,
    /// Display title.
    pub title: String,
}

/// A book, always a leaf of the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book id.
    pub id: BookId,
    /// Owning category.
    pub category_id: CategoryId,
    /// Display title.
    pub title: String,
}

/// One entry of a book's table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Entry id.
    pub id: TocEntryId,
    /// Book this entry belongs to.
    pub book_id: BookId,
    /// Parent entry, `None` for a top-level entry.
    pub parent_id: Option<TocEntryId>,
    /// Display title.
    pub title: String,
    /// Nesting level, 0 for top-level entries.
    pub level: u32,
}

/// A line of book text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    /// Line id.
    pub id: LineId,
    /// Book the line belongs to.
    pub book_id: BookId,
    /// Closest table-of-contents entry, if any.
    pub toc_entry_id: Option<TocEntryId>,
    /// Position of the line within the book.
    pub index: u32,
    /// Raw text.
    pub text: String,
}

/// A commentary attached to a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentaryEntry {
    /// Line being commented on.
    pub line_id: LineId,
    /// Commentator id.
    pub commentator_id: CommentatorId,
    /// Commentator display name.
    pub commentator: String,
    /// Raw commentary text.
    pub text: String,
}

/// Key of a node in the category/book browser.
///
/// Categories and books share one tree but have separate id spaces, so the
/// tree is keyed by this sum type rather than by a raw id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CatalogNode {
    /// A category node (expandable).
    Category(CategoryId),
    /// A book node (leaf).
    Book(BookId),
}

impl CatalogNode {
    /// The category id if this node is a category.
    pub fn as_category(self) -> Option<CategoryId> {
        match self {
            CatalogNode::Category(id) => Some(id),
            CatalogNode::Book(_) => None,
        }
    }
}

/// A child record returned when listing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CatalogEntry {
    /// A sub-category.
    Category(Category),
    /// A book filed under the category.
    Book(Book),
}

impl CatalogEntry {
    /// Tree key for this record.
    pub fn node(&self) -> CatalogNode {
        match self {
            CatalogEntry::Category(c) => CatalogNode::Category(c.id),
            CatalogEntry::Book(b) => CatalogNode::Book(b.id),
        }
    }

    /// Display title.
    pub fn title(&self) -> &str {
        match self {
            CatalogEntry::Category(c) => &c.title,
            CatalogEntry::Book(b) => &b.title,
        }
    }
}

/// What a content retrieval is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LineSource {
    /// Every line of a book.
    Book(BookId),
    /// The lines under one table-of-contents entry.
    TocEntry(TocEntryId),
}
