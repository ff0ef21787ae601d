//! Category/book browser state.

use super::scroll::ScrollPosition;
use crate::model::{BookId, CatalogNode, CategoryId};
use crate::tree::LazyTreeCache;

/// What the book browser shows and where it is.
#[derive(Debug, Clone)]
pub struct NavigationState {
    /// Expandable catalog tree.
    pub tree: LazyTreeCache<CatalogNode>,
    /// Highlighted category.
    pub selected_category: Option<CategoryId>,
    /// Open book.
    pub selected_book: Option<BookId>,
    /// Filter typed into the browser's search box.
    pub search_text: String,
    /// Browser scroll position.
    pub scroll: ScrollPosition,
}

impl NavigationState {
    /// Fresh browser over the given root nodes.
    pub fn new(roots: Vec<CatalogNode>) -> Self {
        Self {
            tree: LazyTreeCache::new(roots),
            selected_category: None,
            selected_book: None,
            search_text: String::new(),
            scroll: ScrollPosition::top(),
        }
    }

    /// Categories currently expanded, ascending.
    pub fn expanded_categories(&self) -> Vec<CategoryId> {
        self.tree
            .expanded()
            .into_iter()
            .filter_map(CatalogNode::as_category)
            .collect()
    }
}
