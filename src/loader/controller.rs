//! Runs the effects of one tab against the backing store.
//!
//! [`fetch`] performs the store calls an [`Effect`] asks for and returns a [`Fetched`]
//! value; [`Fetched::apply_to`] hands the data back to a [`TabState`]. The two halves are
//! separate so a shell can keep several fetches in flight and apply them in completion
//! order. [`TabController`] is the simple sequential composition of both.

use crate::cache::TitleCaches;
use crate::model::{
    BookId, CatalogEntry, CatalogNode, CommentaryEntry, EntityKind, FetchError, Line, TocEntry,
    TocEntryId,
};
use crate::state::{CommentaryRequest, ContentRequest, Effect, Intent, TabState, TocRootsRequest};
use crate::store::BackingStore;
use crate::tree::{LoadOutcome, LoadRequest};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetch the children of a catalog node.
///
/// Books are leaves of the catalog; expanding one yields no children.
pub async fn run_category_load(
    store: &dyn BackingStore,
    request: LoadRequest<CatalogNode>,
) -> Result<Vec<CatalogEntry>, FetchError> {
    match request.node {
        CatalogNode::Category(id) => store.fetch_category_children(Some(id)).await,
        CatalogNode::Book(_) => Ok(Vec::new()),
    }
}

/// Fetch the children of a table-of-contents entry of `book`.
pub async fn run_toc_load(
    store: &dyn BackingStore,
    book: BookId,
    request: LoadRequest<TocEntryId>,
) -> Result<Vec<TocEntry>, FetchError> {
    store.fetch_toc_children(book, Some(request.node)).await
}

/// Data fetched for one effect, not yet applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched {
    /// Children of a catalog node.
    CategoryChildren {
        /// Originating request.
        request: LoadRequest<CatalogNode>,
        /// Store answer.
        result: Result<Vec<CatalogEntry>, FetchError>,
    },
    /// Children of a table-of-contents entry.
    TocChildren {
        /// Book the entry belongs to.
        book: BookId,
        /// Originating request.
        request: LoadRequest<TocEntryId>,
        /// Store answer.
        result: Result<Vec<TocEntry>, FetchError>,
    },
    /// Everything a newly opened book needs.
    Book {
        /// Originating TOC roots request.
        toc_roots: TocRootsRequest,
        /// Top-level TOC entries.
        roots: Result<Vec<TocEntry>, FetchError>,
        /// Originating text request.
        lines_request: ContentRequest,
        /// Book text.
        lines: Result<Vec<Line>, FetchError>,
    },
    /// Text for the text pane.
    Lines {
        /// Originating request.
        request: ContentRequest,
        /// Store answer.
        result: Result<Vec<Line>, FetchError>,
    },
    /// Commentaries of the selected line.
    Commentaries {
        /// Originating request.
        request: CommentaryRequest,
        /// Store answer.
        result: Result<Vec<CommentaryEntry>, FetchError>,
    },
}

/// Perform the store calls `effect` asks for. `Effect::None` fetches nothing.
pub async fn fetch(store: &dyn BackingStore, effect: Effect) -> Option<Fetched> {
    match effect {
        Effect::None => None,
        Effect::LoadCategoryChildren(request) => Some(Fetched::CategoryChildren {
            request,
            result: run_category_load(store, request).await,
        }),
        Effect::LoadTocChildren { book, request } => Some(Fetched::TocChildren {
            book,
            request,
            result: run_toc_load(store, book, request).await,
        }),
        Effect::BookSwitched { toc_roots, lines } => {
            let (roots, text) = futures::join!(
                store.fetch_toc_children(toc_roots.book, None),
                store.fetch_lines(lines.source),
            );
            Some(Fetched::Book {
                toc_roots,
                roots,
                lines_request: lines,
                lines: text,
            })
        }
        Effect::LoadLines(request) => Some(Fetched::Lines {
            request,
            result: store.fetch_lines(request.source).await,
        }),
        Effect::LoadCommentaries(request) => Some(Fetched::Commentaries {
            request,
            result: store.fetch_commentaries(request.line).await,
        }),
    }
}

impl Fetched {
    /// Hand the data to `state` and record any titles it carries.
    ///
    /// Returns the first failure. Stale results are dropped silently.
    pub fn apply_to(self, state: &mut TabState, titles: &TitleCaches) -> Result<(), FetchError> {
        match self {
            Fetched::CategoryChildren { request, result } => {
                if let Ok(entries) = &result {
                    remember_catalog_titles(titles, entries);
                }
                settle(state.apply_category_children(request, result))
            }
            Fetched::TocChildren {
                book,
                request,
                result,
            } => {
                if let Ok(entries) = &result {
                    remember_toc_titles(titles, entries);
                }
                settle(state.apply_toc_children(book, request, result))
            }
            Fetched::Book {
                toc_roots,
                roots,
                lines_request,
                lines,
            } => {
                if let Ok(entries) = &roots {
                    remember_toc_titles(titles, entries);
                }
                let roots = settle(state.apply_toc_roots(toc_roots, roots));
                let lines = settle(state.apply_lines(lines_request, lines));
                roots.and(lines)
            }
            Fetched::Lines { request, result } => settle(state.apply_lines(request, result)),
            Fetched::Commentaries { request, result } => {
                settle(state.apply_commentaries(request, result))
            }
        }
    }
}

fn settle(outcome: LoadOutcome) -> Result<(), FetchError> {
    if let LoadOutcome::Failed(err) = &outcome {
        warn!(error = %err, "load failed");
    }
    outcome.into_result()
}

pub(crate) fn remember_catalog_titles(titles: &TitleCaches, entries: &[CatalogEntry]) {
    for entry in entries {
        match entry {
            CatalogEntry::Category(category) => titles
                .for_kind(EntityKind::Category)
                .put(category.id.get(), category.title.clone()),
            CatalogEntry::Book(book) => titles
                .for_kind(EntityKind::Book)
                .put(book.id.get(), book.title.clone()),
        }
    }
}

pub(crate) fn remember_toc_titles(titles: &TitleCaches, entries: &[TocEntry]) {
    let cache = titles.for_kind(EntityKind::TocEntry);
    for entry in entries {
        cache.put(entry.id.get(), entry.title.clone());
    }
}

// ===== TabController =====

/// One tab's state bound to the store and the shared title caches.
///
/// Each submitted intent is applied and its effect run to completion before `submit`
/// returns.
pub struct TabController {
    state: TabState,
    store: Arc<dyn BackingStore>,
    titles: Arc<TitleCaches>,
}

impl TabController {
    /// Bind `state` to a store and the shared title caches.
    pub fn new(state: TabState, store: Arc<dyn BackingStore>, titles: Arc<TitleCaches>) -> Self {
        Self {
            state,
            store,
            titles,
        }
    }

    /// Current tab state.
    pub fn state(&self) -> &TabState {
        &self.state
    }

    /// Shared title caches.
    pub fn titles(&self) -> &TitleCaches {
        &self.titles
    }

    /// Release the tab state.
    pub fn into_state(self) -> TabState {
        self.state
    }

    /// Apply `intent` and run whatever it requested.
    ///
    /// A failed fetch has already been reverted in the state when the error is returned.
    pub async fn submit(&mut self, intent: Intent) -> Result<(), FetchError> {
        debug!(?intent, "submit");
        let effect = self.state.apply(intent);
        self.run(effect).await
    }

    /// Run an effect produced outside `submit`.
    pub async fn run(&mut self, effect: Effect) -> Result<(), FetchError> {
        match fetch(self.store.as_ref(), effect).await {
            Some(fetched) => fetched.apply_to(&mut self.state, &self.titles),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for TabController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabController")
            .field("state", &self.state)
            .field("titles", &self.titles)
            .finish_non_exhaustive()
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
