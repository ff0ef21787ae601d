//! Snapshot and restore of all open tabs.
//!
//! `snapshot` flattens every tab into the key layout of [`super::keys`]; `restore` reads it
//! back. Loaded tree children are never persisted: a restored tab only remembers which
//! nodes were expanded, and [`crate::loader::rehydrate`] refetches their children from the
//! live store. Scroll positions, selections and split ratios are restored verbatim.
//!
//! A tab whose keys cannot be decoded is replaced by a fresh default tab. The other tabs
//! restore normally.

use super::keys::{self, tab_key, tab_prefix, StateKeys};
use super::kv::KeyValueStore;
use crate::model::{
    BookId, CatalogNode, CategoryId, CommentatorId, LineId, SessionError, TabId, TargumSourceId,
    TocEntryId,
};
use crate::state::{Reloads, ScrollPosition, SplitAxis, SplitDefaults, SplitPane, TabState};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

// ===== SessionBlob =====

/// The flat persisted form of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBlob {
    entries: BTreeMap<String, String>,
}

impl SessionBlob {
    /// Empty blob.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every session key out of a key-value store.
    pub fn from_store(kv: &dyn KeyValueStore) -> Self {
        let entries = kv
            .keys()
            .into_iter()
            .filter(|k| k.starts_with(keys::SESSION_PREFIX) || k.starts_with(keys::TAB_PREFIX))
            .filter_map(|k| kv.get(&k).map(|v| (k, v)))
            .collect();
        Self { entries }
    }

    /// Raw value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Set the raw value of `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// All entries, ascending by key.
    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the blob holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn put<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(value).map_err(|e| SessionError::Encode {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.entries.insert(key, encoded);
        Ok(())
    }
}

// ===== TabReader =====

/// Decodes one tab's namespace. Missing keys read as `None`; malformed keys are errors.
struct TabReader<'a> {
    blob: &'a SessionBlob,
    tab: TabId,
}

impl TabReader<'_> {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        let Some(raw) = self.blob.get(&tab_key(self.tab, key)) else {
            return Ok(None);
        };
        serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| SessionError::Deserialization {
                tab: self.tab,
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, SessionError> {
        Ok(self.get(key)?.unwrap_or_default())
    }

    /// Optional id: both a missing key and `null` mean "nothing selected".
    fn get_id<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SessionError> {
        Ok(self.get::<Option<T>>(key)?.flatten())
    }

    fn scroll(&self, index_key: &str, offset_key: &str) -> Result<ScrollPosition, SessionError> {
        Ok(ScrollPosition::new(
            self.get_or_default(index_key)?,
            self.get_or_default(offset_key)?,
        ))
    }

    fn split(&self, axis: SplitAxis, defaults: &SplitDefaults) -> Result<SplitPane, SessionError> {
        let default = defaults.for_axis(axis);
        let position_key = StateKeys::split_position(axis);
        let position: f64 = self.get(position_key)?.unwrap_or(default);
        let previous: Option<f64> = self.get_id(StateKeys::previous_split_position(axis))?;

        SplitPane::restored(axis, default, position, previous).ok_or_else(|| {
            SessionError::Deserialization {
                tab: self.tab,
                key: position_key.to_string(),
                reason: format!("ratio out of range: {position} (previous {previous:?})"),
            }
        })
    }
}

// ===== RestoredTab =====

/// One tab read back from a session.
#[derive(Debug)]
pub struct RestoredTab {
    /// Tab id, as persisted.
    pub id: TabId,
    /// Restored state. Expanded nodes are pending until `reloads` complete.
    pub state: TabState,
    /// Fetches that rebuild the tab's loaded data.
    pub reloads: Reloads,
    /// Why the tab fell back to defaults, if it did.
    pub fallback: Option<SessionError>,
}

// ===== SessionStore =====

/// Serializes the open tabs to the flat key layout and back.
#[derive(Debug, Clone)]
pub struct SessionStore {
    persist: bool,
    defaults: SplitDefaults,
}

impl SessionStore {
    /// Create a store. With `persist` off, nothing is ever written or read.
    pub fn new(persist: bool, defaults: SplitDefaults) -> Self {
        Self { persist, defaults }
    }

    /// Whether session persistence is enabled.
    pub fn is_enabled(&self) -> bool {
        self.persist
    }

    /// Split defaults given to fresh and fallback tabs.
    pub fn split_defaults(&self) -> SplitDefaults {
        self.defaults
    }

    /// Flatten `tabs` (in display order) into a blob stamped with the current time.
    pub fn snapshot(&self, tabs: &[(TabId, &TabState)]) -> Result<SessionBlob, SessionError> {
        self.snapshot_at(tabs, Utc::now())
    }

    /// Flatten `tabs` into a blob stamped with `saved_at`.
    pub fn snapshot_at(
        &self,
        tabs: &[(TabId, &TabState)],
        saved_at: DateTime<Utc>,
    ) -> Result<SessionBlob, SessionError> {
        let mut blob = SessionBlob::new();
        let ids: Vec<TabId> = tabs.iter().map(|(id, _)| *id).collect();
        blob.put(keys::TAB_LIST.to_string(), &ids)?;
        blob.put(keys::SAVED_AT.to_string(), &saved_at.to_rfc3339())?;

        for (id, tab) in tabs {
            write_tab(&mut blob, *id, tab)?;
        }
        Ok(blob)
    }

    /// Rebuild tabs from a blob. Never fails: undecodable tabs fall back to defaults.
    pub fn restore(&self, blob: &SessionBlob, category_roots: &[CatalogNode]) -> Vec<RestoredTab> {
        let ids: Vec<TabId> = match blob.get(keys::TAB_LIST).map(serde_json::from_str) {
            None => return Vec::new(),
            Some(Ok(ids)) => ids,
            Some(Err(e)) => {
                warn!(error = %SessionError::TabList(e.to_string()), "discarding persisted session");
                return Vec::new();
            }
        };

        ids.into_iter()
            .map(|id| match self.read_tab(blob, id, category_roots) {
                Ok((state, reloads)) => RestoredTab {
                    id,
                    state,
                    reloads,
                    fallback: None,
                },
                Err(err) => {
                    warn!(tab = %id, error = %err, "tab falls back to defaults");
                    RestoredTab {
                        id,
                        state: TabState::new(category_roots.to_vec(), self.defaults),
                        reloads: Reloads::default(),
                        fallback: Some(err),
                    }
                }
            })
            .collect()
    }

    fn read_tab(
        &self,
        blob: &SessionBlob,
        id: TabId,
        category_roots: &[CatalogNode],
    ) -> Result<(TabState, Reloads), SessionError> {
        let r = TabReader { blob, tab: id };
        let mut tab = TabState::new(category_roots.to_vec(), self.defaults);

        tab.navigation.selected_category = r.get_id::<CategoryId>(StateKeys::SELECTED_CATEGORY)?;
        tab.navigation.selected_book = r.get_id::<BookId>(StateKeys::SELECTED_BOOK)?;
        tab.navigation.search_text = r.get_or_default(StateKeys::SEARCH_TEXT)?;
        tab.navigation.scroll = r.scroll(
            StateKeys::BOOK_TREE_SCROLL_INDEX,
            StateKeys::BOOK_TREE_SCROLL_OFFSET,
        )?;
        let expanded_categories: Vec<CategoryId> =
            r.get_or_default(StateKeys::EXPANDED_CATEGORIES)?;

        tab.toc.selected_chapter = r.get_id::<TocEntryId>(StateKeys::SELECTED_CHAPTER)?;
        tab.toc.scroll = r.scroll(StateKeys::TOC_SCROLL_INDEX, StateKeys::TOC_SCROLL_OFFSET)?;
        let expanded_toc: Vec<TocEntryId> = r.get_or_default(StateKeys::EXPANDED_TOC_ENTRIES)?;

        let content = &mut tab.content;
        content.selected_line = r.get_id::<LineId>(StateKeys::SELECTED_LINE)?;
        content.show_commentaries = r.get_or_default(StateKeys::SHOW_COMMENTARIES)?;
        content.show_targum = r.get_or_default(StateKeys::SHOW_TARGUM)?;
        content.scroll.lines = r.scroll(
            StateKeys::CONTENT_SCROLL_INDEX,
            StateKeys::CONTENT_SCROLL_OFFSET,
        )?;
        content.scroll.commentaries = r.scroll(
            StateKeys::COMMENTARIES_SCROLL_INDEX,
            StateKeys::COMMENTARIES_SCROLL_OFFSET,
        )?;
        content.scroll.targum = r.scroll(
            StateKeys::TARGUM_SCROLL_INDEX,
            StateKeys::TARGUM_SCROLL_OFFSET,
        )?;
        content.selected_commentators =
            r.get_or_default::<BTreeMap<LineId, BTreeSet<CommentatorId>>>(
                StateKeys::SELECTED_COMMENTATORS,
            )?;
        content.selected_targum_sources =
            r.get_or_default::<BTreeMap<LineId, BTreeSet<TargumSourceId>>>(
                StateKeys::SELECTED_TARGUM_SOURCES,
            )?;

        for axis in SplitAxis::ALL {
            *tab.layout.pane_mut(axis) = r.split(axis, &self.defaults)?;
        }

        let reloads = tab.plan_reloads(expanded_categories, expanded_toc);
        Ok((tab, reloads))
    }

    /// Replace the session in `kv` with the given tabs and flush it.
    pub fn save(
        &self,
        kv: &mut dyn KeyValueStore,
        tabs: &[(TabId, &TabState)],
    ) -> Result<(), SessionError> {
        if !self.persist {
            return Ok(());
        }

        let blob = self.snapshot(tabs)?;
        kv.remove_prefix(keys::SESSION_PREFIX);
        kv.remove_prefix(keys::TAB_PREFIX);
        for (key, value) in blob.entries() {
            kv.set(key, value.clone());
        }
        kv.flush()?;

        info!(tabs = tabs.len(), keys = blob.len(), "session saved");
        Ok(())
    }

    /// Read the session out of `kv`.
    pub fn load(&self, kv: &dyn KeyValueStore, category_roots: &[CatalogNode]) -> Vec<RestoredTab> {
        if !self.persist {
            return Vec::new();
        }

        let restored = self.restore(&SessionBlob::from_store(kv), category_roots);
        let fallbacks = restored.iter().filter(|t| t.fallback.is_some()).count();
        info!(tabs = restored.len(), fallbacks, "session restored");
        restored
    }

    /// Forget a closed tab: drop its keys and its entry in the tab list.
    pub fn remove_tab(&self, kv: &mut dyn KeyValueStore, tab: TabId) -> Result<(), SessionError> {
        if !self.persist {
            return Ok(());
        }

        kv.remove_prefix(&tab_prefix(tab));
        let remaining: Vec<TabId> = kv
            .get(keys::TAB_LIST)
            .and_then(|raw| serde_json::from_str::<Vec<TabId>>(&raw).ok())
            .unwrap_or_default()
            .into_iter()
            .filter(|id| *id != tab)
            .collect();
        let encoded = serde_json::to_string(&remaining).map_err(|e| SessionError::Encode {
            key: keys::TAB_LIST.to_string(),
            reason: e.to_string(),
        })?;
        kv.set(keys::TAB_LIST, encoded);
        kv.flush()
    }
}

fn write_tab(blob: &mut SessionBlob, id: TabId, tab: &TabState) -> Result<(), SessionError> {
    let key = |name: &str| tab_key(id, name);
    let nav = &tab.navigation;
    let toc = &tab.toc;
    let content = &tab.content;

    blob.put(key(StateKeys::SELECTED_CATEGORY), &nav.selected_category)?;
    blob.put(key(StateKeys::SELECTED_BOOK), &nav.selected_book)?;
    blob.put(key(StateKeys::SEARCH_TEXT), &nav.search_text)?;
    blob.put(key(StateKeys::EXPANDED_CATEGORIES), &nav.expanded_categories())?;
    blob.put(key(StateKeys::BOOK_TREE_SCROLL_INDEX), &nav.scroll.index)?;
    blob.put(key(StateKeys::BOOK_TREE_SCROLL_OFFSET), &nav.scroll.offset)?;

    blob.put(key(StateKeys::SELECTED_CHAPTER), &toc.selected_chapter)?;
    blob.put(key(StateKeys::EXPANDED_TOC_ENTRIES), &toc.tree.expanded())?;
    blob.put(key(StateKeys::TOC_SCROLL_INDEX), &toc.scroll.index)?;
    blob.put(key(StateKeys::TOC_SCROLL_OFFSET), &toc.scroll.offset)?;

    blob.put(key(StateKeys::SELECTED_LINE), &content.selected_line)?;
    blob.put(key(StateKeys::SHOW_COMMENTARIES), &content.show_commentaries)?;
    blob.put(key(StateKeys::SHOW_TARGUM), &content.show_targum)?;
    blob.put(key(StateKeys::CONTENT_SCROLL_INDEX), &content.scroll.lines.index)?;
    blob.put(key(StateKeys::CONTENT_SCROLL_OFFSET), &content.scroll.lines.offset)?;
    blob.put(
        key(StateKeys::COMMENTARIES_SCROLL_INDEX),
        &content.scroll.commentaries.index,
    )?;
    blob.put(
        key(StateKeys::COMMENTARIES_SCROLL_OFFSET),
        &content.scroll.commentaries.offset,
    )?;
    blob.put(key(StateKeys::TARGUM_SCROLL_INDEX), &content.scroll.targum.index)?;
    blob.put(key(StateKeys::TARGUM_SCROLL_OFFSET), &content.scroll.targum.offset)?;
    blob.put(
        key(StateKeys::SELECTED_COMMENTATORS),
        &content.selected_commentators,
    )?;
    blob.put(
        key(StateKeys::SELECTED_TARGUM_SOURCES),
        &content.selected_targum_sources,
    )?;

    for axis in SplitAxis::ALL {
        let pane = tab.layout.pane(axis);
        blob.put(key(StateKeys::split_position(axis)), &pane.position())?;
        blob.put(
            key(StateKeys::previous_split_position(axis)),
            &pane.previous(),
        )?;
    }
    Ok(())
}

// ===== Tests =====

#[cfg(test)]
#[path = "session_store_tests.rs"]
mod tests;
