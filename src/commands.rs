//! Subcommands behind the `lectern` binary.
//!
//! `main` only parses arguments and resolves configuration; everything it runs lives here
//! so it can be tested without spawning the binary.

use crate::cache::TitleCaches;
use crate::config::ResolvedConfig;
use crate::loader::rehydrate;
use crate::model::{AppError, CatalogEntry, CatalogNode, FetchError, SessionError, TabId};
use crate::search::{highlight, MatchLocator};
use crate::session::{
    FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, RestoredTab, SessionStore,
};
use crate::state::{Reloads, TabState};
use crate::store::{BackingStore, MemoryStore};
use futures::future::join_all;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

// ===== highlight =====

/// Highlight ranges of `query` in `text`, encoded as a JSON array.
pub fn highlight_json(
    text: &str,
    query: &str,
    current: Option<MatchLocator>,
) -> Result<String, AppError> {
    Ok(serde_json::to_string(&highlight(text, query, current))?)
}

/// Parse a `START:LEN` match locator.
pub fn parse_locator(raw: &str) -> Result<MatchLocator, String> {
    let (start, length) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected START:LEN, got {raw:?}"))?;
    let start = start
        .trim()
        .parse()
        .map_err(|e| format!("invalid start {start:?}: {e}"))?;
    let length = length
        .trim()
        .parse()
        .map_err(|e| format!("invalid length {length:?}: {e}"))?;
    Ok(MatchLocator::new(start, length))
}

// ===== session =====

/// What one tab looks like after restore and rehydration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSummary {
    /// Tab id.
    pub tab: TabId,
    /// Title of the open book.
    pub book: Option<String>,
    /// Title of the selected chapter.
    pub chapter: Option<String>,
    /// Number of expanded categories.
    pub expanded_categories: usize,
    /// Number of expanded table-of-contents entries.
    pub expanded_toc_entries: usize,
    /// Lines loaded into the text pane.
    pub lines: usize,
    /// Why the tab was reset to defaults, if it was.
    pub fallback: Option<String>,
}

/// Result of the `session` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// Whether the session was written back.
    pub persisted: bool,
    /// Every open tab, in order.
    pub tabs: Vec<TabSummary>,
}

/// Read a store fixture from disk.
pub fn load_fixture(path: &Path) -> Result<MemoryStore, AppError> {
    let json = std::fs::read_to_string(path)?;
    MemoryStore::from_json(&json).map_err(|e| AppError::Fixture {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Root nodes of the catalog.
pub async fn category_roots(store: &dyn BackingStore) -> Result<Vec<CatalogNode>, FetchError> {
    Ok(store
        .fetch_category_children(None)
        .await?
        .iter()
        .map(CatalogEntry::node)
        .collect())
}

/// Restore every tab from `kv`, rebuild it from `store`, summarize it and save it back.
///
/// An empty session opens a single default tab.
pub async fn restore_session(
    store: &dyn BackingStore,
    titles: &TitleCaches,
    kv: &mut dyn KeyValueStore,
    sessions: &SessionStore,
) -> Result<SessionReport, AppError> {
    let roots = category_roots(store).await?;

    let mut restored = sessions.load(kv, &roots);
    if restored.is_empty() {
        info!("no saved tabs, opening a fresh one");
        restored.push(RestoredTab {
            id: TabId::new(1),
            state: TabState::new(roots.clone(), sessions.split_defaults()),
            reloads: Reloads::default(),
            fallback: None,
        });
    }

    let headers: Vec<(TabId, Option<String>)> = restored
        .iter()
        .map(|t| (t.id, t.fallback.as_ref().map(ToString::to_string)))
        .collect();
    let states = join_all(
        restored
            .into_iter()
            .map(|tab| rehydrate(tab, store, titles)),
    )
    .await;

    let mut tabs = Vec::with_capacity(states.len());
    for ((id, fallback), state) in headers.iter().zip(&states) {
        tabs.push(summarize(*id, state, fallback.clone(), store, titles).await);
    }

    let open: Vec<(TabId, &TabState)> = headers
        .iter()
        .map(|(id, _)| *id)
        .zip(states.iter())
        .collect();
    sessions.save(kv, &open)?;

    Ok(SessionReport {
        persisted: sessions.is_enabled(),
        tabs,
    })
}

async fn summarize(
    id: TabId,
    state: &TabState,
    fallback: Option<String>,
    store: &dyn BackingStore,
    titles: &TitleCaches,
) -> TabSummary {
    let book = match state.navigation.selected_book {
        Some(book) => titles.book_title(store, book).await.ok(),
        None => None,
    };
    let chapter = match state.toc.selected_chapter {
        Some(entry) => titles.toc_title(store, entry).await.ok(),
        None => None,
    };

    TabSummary {
        tab: id,
        book,
        chapter,
        expanded_categories: state.navigation.expanded_categories().len(),
        expanded_toc_entries: state.toc.tree.expanded().len(),
        lines: state.content.lines.as_ref().map_or(0, Vec::len),
        fallback,
    }
}

/// The `session` subcommand: restore, rehydrate, summarize and save against a fixture.
///
/// A corrupt session file is replaced rather than aborting the run.
pub async fn run_session(fixture: &Path, config: &ResolvedConfig) -> Result<SessionReport, AppError> {
    let store = load_fixture(fixture)?;
    let titles = TitleCaches::new();
    let sessions = SessionStore::new(config.persist_session, config.splits);

    if !config.persist_session {
        let mut kv = MemoryKeyValueStore::new();
        return restore_session(&store, &titles, &mut kv, &sessions).await;
    }

    let path = &config.session_file_path;
    let mut kv = match FileKeyValueStore::open(path) {
        Ok(kv) => kv,
        Err(err @ SessionError::Corrupt { .. }) => {
            warn!(error = %err, "discarding unreadable session file");
            FileKeyValueStore::empty(path)
        }
        Err(err) => return Err(err.into()),
    };
    restore_session(&store, &titles, &mut kv, &sessions).await
}

// ===== Tests =====

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
