//! User intents and the effects they request.
//!
//! The presentation layer submits [`Intent`]s; [`TabState::apply`](super::TabState::apply)
//! applies each one and answers with an [`Effect`] describing any data that must now be
//! fetched. The async shell in [`crate::loader`] runs effects and hands the results back.

use super::layout::SplitAxis;
use super::scroll::{ScrollPosition, ScrollTarget};
use crate::model::{
    BookId, CatalogNode, CategoryId, CommentatorId, LineId, LineSource, TargumSourceId,
    TocEntryId,
};
use crate::tree::LoadRequest;

/// Everything a user can do to a tab.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Highlight a category in the browser.
    SelectCategory(Option<CategoryId>),
    /// Open a book. Resets table of contents and text pane when the book changes.
    SelectBook(BookId),
    /// Jump to a table-of-contents entry.
    SelectChapter(Option<TocEntryId>),
    /// Select a line of text.
    SelectLine(Option<LineId>),
    /// Edit the browser search box.
    SearchTextChanged(String),
    /// Expand a category in the browser.
    ExpandCategory(CategoryId),
    /// Collapse a category in the browser.
    CollapseCategory(CategoryId),
    /// Expand a table-of-contents entry.
    ExpandTocEntry(TocEntryId),
    /// Collapse a table-of-contents entry.
    CollapseTocEntry(TocEntryId),
    /// A list was scrolled.
    Scroll(ScrollTarget, ScrollPosition),
    /// A split divider was dragged to a new ratio.
    DragSplit(SplitAxis, f64),
    /// Hide or show the pane on one side of a split.
    TogglePane(SplitAxis),
    /// Show or hide the commentaries pane.
    ToggleCommentaries,
    /// Show or hide the targum pane.
    ToggleTargum,
    /// Add or remove a commentator for a line.
    ToggleCommentator {
        /// Line the selection applies to.
        line: LineId,
        /// Commentator toggled.
        commentator: CommentatorId,
    },
    /// Add or remove a targum source for a line.
    ToggleTargumSource {
        /// Line the selection applies to.
        line: LineId,
        /// Source toggled.
        source: TargumSourceId,
    },
}

/// Fetch of a book's top-level table-of-contents entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TocRootsRequest {
    /// Book whose TOC is requested.
    pub book: BookId,
    /// Tab generation the request belongs to.
    pub generation: u64,
}

/// Fetch of the lines shown in the text pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRequest {
    /// What to load.
    pub source: LineSource,
    /// Tab generation the request belongs to.
    pub generation: u64,
}

/// Fetch of the commentaries on the selected line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentaryRequest {
    /// Line whose commentaries are requested.
    pub line: LineId,
    /// Tab generation the request belongs to.
    pub generation: u64,
}

/// Data an intent asks the shell to fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing to fetch.
    None,
    /// Children of a catalog category.
    LoadCategoryChildren(LoadRequest<CatalogNode>),
    /// Children of a table-of-contents entry.
    LoadTocChildren {
        /// Book the entry belongs to.
        book: BookId,
        /// Tree request.
        request: LoadRequest<TocEntryId>,
    },
    /// A different book was opened: its TOC roots and text are needed.
    BookSwitched {
        /// Top-level TOC entries.
        toc_roots: TocRootsRequest,
        /// Book text.
        lines: ContentRequest,
    },
    /// New text for the text pane.
    LoadLines(ContentRequest),
    /// Commentaries for the selected line.
    LoadCommentaries(CommentaryRequest),
}

/// Loads needed to rebuild a restored tab from the live store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reloads {
    /// Previously expanded categories.
    pub categories: Vec<LoadRequest<CatalogNode>>,
    /// Book the TOC requests belong to.
    pub book: Option<BookId>,
    /// Previously expanded TOC entries.
    pub toc: Vec<LoadRequest<TocEntryId>>,
    /// TOC roots of the selected book.
    pub toc_roots: Option<TocRootsRequest>,
    /// Text of the selected chapter or book.
    pub lines: Option<ContentRequest>,
    /// Commentaries of the selected line, if the pane was open.
    pub commentaries: Option<CommentaryRequest>,
}

impl Reloads {
    /// Number of fetches this plan will issue.
    pub fn len(&self) -> usize {
        self.categories.len()
            + self.toc.len()
            + usize::from(self.toc_roots.is_some())
            + usize::from(self.lines.is_some())
            + usize::from(self.commentaries.is_some())
    }

    /// Whether nothing has to be fetched.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
