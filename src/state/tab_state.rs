//! Per-tab state and intent dispatch.
//!
//! `TabState` aggregates everything one tab shows: the book browser, the table of contents,
//! the text pane and the split layout. It is pure data; all transitions are synchronous.
//! Anything that needs the backing store comes back as an [`Effect`], and the fetched data
//! is handed back through the `apply_*` methods, which drop results belonging to a
//! superseded book selection.

use super::content::ContentState;
use super::intent::{
    CommentaryRequest, ContentRequest, Effect, Intent, Reloads, TocRootsRequest,
};
use super::layout::{LayoutState, SplitDefaults};
use super::navigation::NavigationState;
use super::scroll::ScrollTarget;
use super::toc::TocState;
use crate::model::{
    BookId, CatalogEntry, CatalogNode, CategoryId, CommentaryEntry, FetchError, Line,
    LineSource, TocEntry, TocEntryId,
};
use crate::tree::{LoadHandle, LoadOutcome, LoadRequest};
use tracing::debug;

/// State of one open tab.
///
/// Exclusively owned by its tab; no two tabs share any part of it.
#[derive(Debug, Clone)]
pub struct TabState {
    /// Book browser.
    pub navigation: NavigationState,
    /// Table of contents of the open book.
    pub toc: TocState,
    /// Text pane.
    pub content: ContentState,
    /// Split ratios.
    pub layout: LayoutState,
    defaults: SplitDefaults,
    generation: u64,
    lines_source: Option<LineSource>,
    revision: u64,
}

impl TabState {
    /// A fresh tab over the catalog's root nodes.
    pub fn new(category_roots: Vec<CatalogNode>, defaults: SplitDefaults) -> Self {
        Self {
            navigation: NavigationState::new(category_roots),
            toc: TocState::default(),
            content: ContentState::default(),
            layout: LayoutState::new(&defaults),
            defaults,
            generation: 0,
            lines_source: None,
            revision: 0,
        }
    }

    /// Book-selection generation. Incremented every time a different book is opened.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Change counter for observers; bumped by every intent and every visible result.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Split defaults this tab was created with.
    pub fn split_defaults(&self) -> &SplitDefaults {
        &self.defaults
    }

    /// Apply one intent, returning whatever must be fetched as a consequence.
    pub fn apply(&mut self, intent: Intent) -> Effect {
        self.revision += 1;

        match intent {
            Intent::SelectCategory(category) => {
                self.navigation.selected_category = category;
                Effect::None
            }
            Intent::SelectBook(book) => self.select_book(book),
            Intent::SelectChapter(chapter) => {
                if chapter.is_some() && self.toc.book.is_none() {
                    debug!(?chapter, "ignoring chapter selection with no open book");
                    return Effect::None;
                }
                self.toc.selected_chapter = chapter;
                match chapter {
                    Some(entry) => self.request_lines(LineSource::TocEntry(entry)),
                    None => Effect::None,
                }
            }
            Intent::SelectLine(line) => {
                self.content.selected_line = line;
                self.content.commentaries = None;
                self.commentaries_effect()
            }
            Intent::SearchTextChanged(text) => {
                self.navigation.search_text = text;
                Effect::None
            }
            Intent::ExpandCategory(id) => {
                match self.navigation.tree.expand(CatalogNode::Category(id)) {
                    LoadHandle::Fetch(request) => Effect::LoadCategoryChildren(request),
                    LoadHandle::Ready(_) | LoadHandle::InFlight => Effect::None,
                }
            }
            Intent::CollapseCategory(id) => {
                self.navigation.tree.collapse(CatalogNode::Category(id));
                Effect::None
            }
            Intent::ExpandTocEntry(id) => {
                let Some(book) = self.toc.book else {
                    debug!(entry = %id, "ignoring TOC expand with no open book");
                    return Effect::None;
                };
                match self.toc.tree.expand(id) {
                    LoadHandle::Fetch(request) => Effect::LoadTocChildren { book, request },
                    LoadHandle::Ready(_) | LoadHandle::InFlight => Effect::None,
                }
            }
            Intent::CollapseTocEntry(id) => {
                self.toc.tree.collapse(id);
                Effect::None
            }
            Intent::Scroll(target, position) => {
                match target {
                    ScrollTarget::BookTree => self.navigation.scroll = position,
                    ScrollTarget::Toc => self.toc.scroll = position,
                    pane => {
                        if let Some(scroll) = self.content.scroll_mut(pane) {
                            *scroll = position;
                        }
                    }
                }
                Effect::None
            }
            Intent::DragSplit(axis, ratio) => {
                self.layout.pane_mut(axis).drag(ratio);
                Effect::None
            }
            Intent::TogglePane(axis) => {
                self.layout.pane_mut(axis).toggle();
                Effect::None
            }
            Intent::ToggleCommentaries => {
                self.content.show_commentaries = !self.content.show_commentaries;
                self.content.commentaries = None;
                self.commentaries_effect()
            }
            Intent::ToggleTargum => {
                self.content.show_targum = !self.content.show_targum;
                Effect::None
            }
            Intent::ToggleCommentator { line, commentator } => {
                self.content.toggle_commentator(line, commentator);
                Effect::None
            }
            Intent::ToggleTargumSource { line, source } => {
                self.content.toggle_targum_source(line, source);
                Effect::None
            }
        }
    }

    fn select_book(&mut self, book: BookId) -> Effect {
        if self.navigation.selected_book == Some(book) {
            return Effect::None;
        }

        self.navigation.selected_book = Some(book);
        self.generation += 1;
        self.toc.reset_for(Some(book));
        self.content = ContentState::default();
        debug!(book = %book, generation = self.generation, "book switched");

        Effect::BookSwitched {
            toc_roots: TocRootsRequest {
                book,
                generation: self.generation,
            },
            lines: self.content_request(LineSource::Book(book)),
        }
    }

    /// Commentaries of the selected line, when the commentaries pane is open.
    fn commentaries_request(&self) -> Option<CommentaryRequest> {
        let line = self.content.selected_line?;
        self.content.show_commentaries.then_some(CommentaryRequest {
            line,
            generation: self.generation,
        })
    }

    fn commentaries_effect(&self) -> Effect {
        self.commentaries_request()
            .map_or(Effect::None, Effect::LoadCommentaries)
    }

    fn request_lines(&mut self, source: LineSource) -> Effect {
        Effect::LoadLines(self.content_request(source))
    }

    fn content_request(&mut self, source: LineSource) -> ContentRequest {
        self.lines_source = Some(source);
        ContentRequest {
            source,
            generation: self.generation,
        }
    }

    // ===== Results =====

    /// Hand back the children of a catalog category.
    pub fn apply_category_children(
        &mut self,
        request: LoadRequest<CatalogNode>,
        result: Result<Vec<CatalogEntry>, FetchError>,
    ) -> LoadOutcome {
        let result = result.map(|entries| entries.iter().map(CatalogEntry::node).collect());
        let outcome = self.navigation.tree.complete(request, result);
        self.note(&outcome);
        outcome
    }

    /// Hand back the children of a TOC entry.
    pub fn apply_toc_children(
        &mut self,
        book: BookId,
        request: LoadRequest<TocEntryId>,
        result: Result<Vec<TocEntry>, FetchError>,
    ) -> LoadOutcome {
        if self.toc.book != Some(book) {
            debug!(book = %book, "dropping TOC children for a closed book");
            return LoadOutcome::Stale;
        }
        let result = result.map(|entries| entries.iter().map(|e| e.id).collect());
        let outcome = self.toc.tree.complete(request, result);
        self.note(&outcome);
        outcome
    }

    /// Hand back a book's top-level TOC entries.
    pub fn apply_toc_roots(
        &mut self,
        request: TocRootsRequest,
        result: Result<Vec<TocEntry>, FetchError>,
    ) -> LoadOutcome {
        if request.generation != self.generation || self.toc.book != Some(request.book) {
            debug!(book = %request.book, generation = request.generation, "dropping stale TOC roots");
            return LoadOutcome::Stale;
        }
        let outcome = match result {
            Ok(entries) => {
                self.toc.tree.seed_roots(entries.iter().map(|e| e.id).collect());
                self.toc.roots_loaded = true;
                LoadOutcome::Applied { visible: true }
            }
            Err(err) => LoadOutcome::Failed(err),
        };
        self.note(&outcome);
        outcome
    }

    /// Hand back lines for the text pane.
    pub fn apply_lines(
        &mut self,
        request: ContentRequest,
        result: Result<Vec<Line>, FetchError>,
    ) -> LoadOutcome {
        if request.generation != self.generation || self.lines_source != Some(request.source) {
            debug!(source = ?request.source, generation = request.generation, "dropping stale lines");
            return LoadOutcome::Stale;
        }
        let outcome = match result {
            Ok(lines) => {
                self.content.lines = Some(lines);
                LoadOutcome::Applied { visible: true }
            }
            Err(err) => LoadOutcome::Failed(err),
        };
        self.note(&outcome);
        outcome
    }

    /// Hand back the commentaries of a line.
    ///
    /// Dropped unless it still matches the selected line of the open pane.
    pub fn apply_commentaries(
        &mut self,
        request: CommentaryRequest,
        result: Result<Vec<CommentaryEntry>, FetchError>,
    ) -> LoadOutcome {
        if self.commentaries_request() != Some(request) {
            debug!(line = %request.line, generation = request.generation, "dropping stale commentaries");
            return LoadOutcome::Stale;
        }
        let outcome = match result {
            Ok(entries) => {
                self.content.commentaries = Some(entries);
                LoadOutcome::Applied { visible: true }
            }
            Err(err) => LoadOutcome::Failed(err),
        };
        self.note(&outcome);
        outcome
    }

    fn note(&mut self, outcome: &LoadOutcome) {
        match outcome {
            LoadOutcome::Applied { visible: true } | LoadOutcome::Failed(_) => self.revision += 1,
            LoadOutcome::Applied { visible: false } | LoadOutcome::Stale => {}
        }
    }

    // ===== Restore =====

    /// Re-expand persisted nodes and list every fetch needed to rebuild the tab.
    ///
    /// The caller has already restored selections; this marks the expanded sets as pending
    /// and returns the loads that repopulate them from the live store.
    pub fn plan_reloads(
        &mut self,
        expanded_categories: impl IntoIterator<Item = CategoryId>,
        expanded_toc_entries: impl IntoIterator<Item = TocEntryId>,
    ) -> Reloads {
        let categories = self
            .navigation
            .tree
            .restore_expanded(expanded_categories.into_iter().map(CatalogNode::Category));

        let Some(book) = self.navigation.selected_book else {
            return Reloads {
                categories,
                ..Reloads::default()
            };
        };

        self.toc.book = Some(book);
        let toc = self.toc.tree.restore_expanded(expanded_toc_entries);
        let source = match self.toc.selected_chapter {
            Some(entry) => LineSource::TocEntry(entry),
            None => LineSource::Book(book),
        };
        self.lines_source = Some(source);
        let commentaries = self.commentaries_request();

        Reloads {
            categories,
            book: Some(book),
            toc,
            toc_roots: Some(TocRootsRequest {
                book,
                generation: self.generation,
            }),
            lines: Some(ContentRequest {
                source,
                generation: self.generation,
            }),
            commentaries,
        }
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "tab_state_tests.rs"]
mod tests;
