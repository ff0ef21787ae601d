//! Scroll positions of the tab's lists.

use serde::{Deserialize, Serialize};

/// Position of a lazily rendered list: first visible item and pixel offset into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScrollPosition {
    /// Index of the first visible item.
    pub index: usize,
    /// Offset into that item.
    pub offset: u32,
}

impl ScrollPosition {
    /// Create a position.
    pub fn new(index: usize, offset: u32) -> Self {
        Self { index, offset }
    }

    /// Top of the list.
    pub fn top() -> Self {
        Self::default()
    }
}

/// The scrollable lists of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    /// Category/book browser.
    BookTree,
    /// Table of contents.
    Toc,
    /// Book text.
    Content,
    /// Commentaries pane.
    Commentaries,
    /// Targum pane.
    Targum,
}
