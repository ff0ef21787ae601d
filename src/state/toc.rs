//! Table-of-contents browser state.

use super::scroll::ScrollPosition;
use crate::model::{BookId, TocEntryId};
use crate::tree::LazyTreeCache;

/// Table of contents of the open book.
#[derive(Debug, Clone, Default)]
pub struct TocState {
    /// Book the tree belongs to.
    pub book: Option<BookId>,
    /// Expandable TOC tree. Its roots arrive asynchronously after a book is opened.
    pub tree: LazyTreeCache<TocEntryId>,
    /// Whether the top-level entries have arrived.
    pub roots_loaded: bool,
    /// Selected chapter (TOC entry).
    pub selected_chapter: Option<TocEntryId>,
    /// TOC scroll position.
    pub scroll: ScrollPosition,
}

impl TocState {
    /// Reset to the defaults for `book`.
    ///
    /// The tree is reset in place rather than replaced so its epoch keeps increasing and
    /// loads issued for the previous book are recognized as stale.
    pub fn reset_for(&mut self, book: Option<BookId>) {
        self.book = book;
        self.tree.reset(Vec::new());
        self.roots_loaded = false;
        self.selected_chapter = None;
        self.scroll = ScrollPosition::top();
    }
}
