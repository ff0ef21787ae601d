//! Lazily loaded, expandable tree cache.
//!
//! `LazyTreeCache` is a pure state machine: it never talks to the backing store itself.
//! `expand` tells the caller whether a fetch is needed by handing back a [`LoadRequest`];
//! the caller runs the request and feeds the result into `complete`. This keeps the cache
//! synchronous and testable, while the async shell in [`crate::loader`] does the waiting.
//!
//! # Invariants
//!
//! - A node in `expanded` always has cached children or an outstanding fetch in `pending`.
//! - Cached children are only dropped by `invalidate` (which also clears expansion and
//!   pending state for every dropped node) or by `reset`.
//! - Results tagged with an old epoch (issued before the last `reset`) are never applied.

use crate::model::FetchError;
use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use tracing::debug;

/// A fetch the caller must run for a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadRequest<K> {
    /// Node whose children are requested.
    pub node: K,
    /// Cache epoch the request was issued in.
    pub epoch: u64,
}

/// Result of [`LazyTreeCache::expand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadHandle<K> {
    /// Children were already cached.
    Ready(Vec<K>),
    /// A fetch for this node is already running; its completion will serve this expand too.
    InFlight,
    /// No data yet: the caller must run this request and pass the result to `complete`.
    Fetch(LoadRequest<K>),
}

/// What happened when a fetch result was handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Children were cached. `visible` is false when the node was collapsed while the fetch
    /// was running, so nothing on screen changes.
    Applied {
        /// Whether the node is currently expanded.
        visible: bool,
    },
    /// The result belonged to a superseded generation and was dropped.
    Stale,
    /// The fetch failed; the node reverted to collapsed and unloaded.
    Failed(FetchError),
}

impl LoadOutcome {
    /// Convert into a `Result`, keeping only the failure.
    pub fn into_result(self) -> Result<(), FetchError> {
        match self {
            LoadOutcome::Failed(err) => Err(err),
            LoadOutcome::Applied { .. } | LoadOutcome::Stale => Ok(()),
        }
    }
}

/// Expandable tree whose children are fetched on demand.
///
/// One instance backs one tree in one tab. Roots are seeded at construction and never
/// fetched lazily.
#[derive(Debug, Clone)]
pub struct LazyTreeCache<K> {
    roots: Vec<K>,
    expanded: HashSet<K>,
    children: HashMap<K, Vec<K>>,
    pending: HashSet<K>,
    epoch: u64,
    revision: u64,
}

impl<K> Default for LazyTreeCache<K> {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            expanded: HashSet::new(),
            children: HashMap::new(),
            pending: HashSet::new(),
            epoch: 0,
            revision: 0,
        }
    }
}

impl<K> LazyTreeCache<K>
where
    K: Copy + Eq + Hash + Ord + std::fmt::Debug,
{
    /// Create a cache seeded with the tree's root nodes.
    pub fn new(roots: Vec<K>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    /// Root nodes, in display order.
    pub fn roots(&self) -> &[K] {
        &self.roots
    }

    /// Replace the root list without touching the epoch.
    ///
    /// Used when the root level of a tree arrives asynchronously (a book's top-level
    /// table of contents) while node loads from the same epoch may still be running.
    pub fn seed_roots(&mut self, roots: Vec<K>) {
        self.roots = roots;
        self.revision += 1;
    }

    /// Mark `node` expanded, reporting whether its children must be fetched.
    pub fn expand(&mut self, node: K) -> LoadHandle<K> {
        let newly_expanded = self.expanded.insert(node);

        if let Some(children) = self.children.get(&node) {
            if newly_expanded {
                self.revision += 1;
            }
            return LoadHandle::Ready(children.clone());
        }

        if self.pending.contains(&node) {
            debug!(?node, "expand joined in-flight load");
            return LoadHandle::InFlight;
        }

        self.pending.insert(node);
        self.revision += 1;
        LoadHandle::Fetch(LoadRequest {
            node,
            epoch: self.epoch,
        })
    }

    /// Hand back the result of a fetch issued by `expand` or `restore_expanded`.
    pub fn complete(
        &mut self,
        request: LoadRequest<K>,
        result: Result<Vec<K>, FetchError>,
    ) -> LoadOutcome {
        if request.epoch != self.epoch {
            debug!(node = ?request.node, epoch = request.epoch, current = self.epoch, "dropping stale load");
            return LoadOutcome::Stale;
        }

        let node = request.node;
        self.pending.remove(&node);

        match result {
            Ok(children) => {
                self.children.insert(node, children);
                let visible = self.expanded.contains(&node);
                if visible {
                    self.revision += 1;
                }
                LoadOutcome::Applied { visible }
            }
            Err(err) => {
                self.expanded.remove(&node);
                self.revision += 1;
                LoadOutcome::Failed(err)
            }
        }
    }

    /// Hide `node`'s children. A running fetch is not cancelled; its result is still cached.
    pub fn collapse(&mut self, node: K) {
        if self.expanded.remove(&node) {
            self.revision += 1;
        }
    }

    /// Whether `node` is shown expanded.
    pub fn is_expanded(&self, node: K) -> bool {
        self.expanded.contains(&node)
    }

    /// Whether a fetch for `node` is outstanding.
    pub fn is_pending(&self, node: K) -> bool {
        self.pending.contains(&node)
    }

    /// Cached children of `node`, `None` if they have not been loaded.
    pub fn children_of(&self, node: K) -> Option<&[K]> {
        self.children.get(&node).map(Vec::as_slice)
    }

    /// Expanded nodes in ascending id order.
    pub fn expanded(&self) -> Vec<K> {
        let mut nodes: Vec<K> = self.expanded.iter().copied().collect();
        nodes.sort();
        nodes
    }

    /// Drop cached children, expansion and pending state for `node` and every descendant
    /// currently cached under it.
    pub fn invalidate(&mut self, node: K) {
        let mut stack = vec![node];
        let mut seen = HashSet::new();

        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(children) = self.children.remove(&current) {
                stack.extend(children);
            }
            self.expanded.remove(&current);
            self.pending.remove(&current);
        }

        debug!(?node, dropped = seen.len(), "invalidated subtree");
        self.revision += 1;
    }

    /// Forget everything and start a new epoch with a fresh root list.
    ///
    /// Every request issued before the reset becomes stale.
    pub fn reset(&mut self, roots: Vec<K>) {
        self.roots = roots;
        self.expanded.clear();
        self.children.clear();
        self.pending.clear();
        self.epoch += 1;
        self.revision += 1;
    }

    /// Re-expand nodes recorded by a previous session.
    ///
    /// Every node is marked expanded and pending, and one fetch per node is returned.
    /// Children are always rebuilt from the live store, never from persisted data.
    pub fn restore_expanded(&mut self, nodes: impl IntoIterator<Item = K>) -> Vec<LoadRequest<K>> {
        let mut requests = Vec::new();
        for node in nodes {
            match self.expand(node) {
                LoadHandle::Fetch(request) => requests.push(request),
                LoadHandle::Ready(_) | LoadHandle::InFlight => {}
            }
        }
        requests
    }

    /// Current epoch. Bumped by `reset`.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Change counter for observers. Bumped whenever the visible tree changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Visible nodes in display order, depth-first, with their depth.
    ///
    /// Expanded nodes whose children are still loading contribute no rows yet.
    pub fn visible_rows(&self) -> Vec<(K, usize)> {
        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        let mut stack: Vec<(K, usize)> = self.roots.iter().rev().map(|&k| (k, 0)).collect();

        while let Some((node, depth)) = stack.pop() {
            // A malformed store could report a cycle.
            if !seen.insert(node) {
                continue;
            }
            rows.push((node, depth));
            if !self.expanded.contains(&node) {
                continue;
            }
            if let Some(children) = self.children.get(&node) {
                stack.extend(children.iter().rev().map(|&k| (k, depth + 1)));
            }
        }
        rows
    }

    #[cfg(test)]
    pub(crate) fn invariant_holds(&self) -> bool {
        self.expanded
            .iter()
            .all(|k| self.children.contains_key(k) || self.pending.contains(k))
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "lazy_cache_tests.rs"]
mod tests;
