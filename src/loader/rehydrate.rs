//! Rebuild a restored tab's loaded data from the live store.

use super::controller::{
    remember_catalog_titles, remember_toc_titles, run_category_load, run_toc_load,
};
use crate::cache::TitleCaches;
use crate::model::{EntityKind, FetchError, TabId};
use crate::session::RestoredTab;
use crate::state::TabState;
use crate::store::BackingStore;
use crate::tree::LoadOutcome;
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Re-issue every reload of a restored tab and apply the answers.
///
/// A selected book, chapter or category that no longer exists turns the tab into a fresh
/// default tab. All other failures only affect their own node, which reverts to collapsed.
pub async fn rehydrate(
    restored: RestoredTab,
    store: &dyn BackingStore,
    titles: &TitleCaches,
) -> TabState {
    let RestoredTab {
        id,
        mut state,
        reloads,
        ..
    } = restored;

    if let Err(err) = validate_selection(id, &state, store, titles).await {
        warn!(tab = %id, error = %err, "selection vanished from the store, resetting tab");
        return TabState::new(
            state.navigation.tree.roots().to_vec(),
            *state.split_defaults(),
        );
    }

    debug!(tab = %id, fetches = reloads.len(), "rehydrating");

    let categories = join_all(reloads.categories.iter().map(|&request| async move {
        (request, run_category_load(store, request).await)
    }));
    let toc = join_all(reloads.book.into_iter().flat_map(|book| {
        reloads.toc.iter().map(move |&request| async move {
            (book, request, run_toc_load(store, book, request).await)
        })
    }));
    let toc_roots = async {
        match reloads.toc_roots {
            Some(request) => Some((request, store.fetch_toc_children(request.book, None).await)),
            None => None,
        }
    };
    let lines = async {
        match reloads.lines {
            Some(request) => Some((request, store.fetch_lines(request.source).await)),
            None => None,
        }
    };

    let commentaries = async {
        match reloads.commentaries {
            Some(request) => Some((request, store.fetch_commentaries(request.line).await)),
            None => None,
        }
    };

    let (categories, toc, toc_roots, lines, commentaries) =
        futures::join!(categories, toc, toc_roots, lines, commentaries);

    let mut failures = 0usize;
    let mut note = |outcome: LoadOutcome| {
        if let LoadOutcome::Failed(err) = outcome {
            warn!(tab = %id, error = %err, "reload failed");
            failures += 1;
        }
    };

    for (request, result) in categories {
        if let Ok(entries) = &result {
            remember_catalog_titles(titles, entries);
        }
        note(state.apply_category_children(request, result));
    }
    for (book, request, result) in toc {
        if let Ok(entries) = &result {
            remember_toc_titles(titles, entries);
        }
        note(state.apply_toc_children(book, request, result));
    }
    if let Some((request, result)) = toc_roots {
        if let Ok(entries) = &result {
            remember_toc_titles(titles, entries);
        }
        note(state.apply_toc_roots(request, result));
    }
    if let Some((request, result)) = lines {
        note(state.apply_lines(request, result));
    }
    if let Some((request, result)) = commentaries {
        note(state.apply_commentaries(request, result));
    }

    info!(tab = %id, fetches = reloads.len(), failures, "tab rehydrated");
    state
}

/// Check that every persisted selection still names an entity in the store.
///
/// Only `NotFound` is fatal. Other lookup failures are logged and the selection is kept.
async fn validate_selection(
    id: TabId,
    state: &TabState,
    store: &dyn BackingStore,
    titles: &TitleCaches,
) -> Result<(), FetchError> {
    let selections = [
        state
            .navigation
            .selected_book
            .map(|book| (EntityKind::Book, book.get())),
        state
            .toc
            .selected_chapter
            .map(|chapter| (EntityKind::TocEntry, chapter.get())),
        state
            .navigation
            .selected_category
            .map(|category| (EntityKind::Category, category.get())),
    ];

    for (kind, entity) in selections.into_iter().flatten() {
        match titles.resolve(store, entity, kind).await {
            Ok(_) => {}
            Err(err @ FetchError::NotFound { .. }) => return Err(err),
            Err(err) => warn!(tab = %id, %kind, entity, error = %err, "could not validate selection"),
        }
    }
    Ok(())
}

// ===== Tests =====

#[cfg(test)]
#[path = "rehydrate_tests.rs"]
mod tests;
