//! Book text pane state: selected line, side panes and per-line source selections.

use super::scroll::{ScrollPosition, ScrollTarget};
use crate::model::{CommentaryEntry, CommentatorId, Line, LineId, TargumSourceId};
use std::collections::{BTreeMap, BTreeSet};

/// Scroll positions of the text pane and its side panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentScroll {
    /// Book text.
    pub lines: ScrollPosition,
    /// Commentaries pane.
    pub commentaries: ScrollPosition,
    /// Targum pane.
    pub targum: ScrollPosition,
}

/// Text pane state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    /// Selected line.
    pub selected_line: Option<LineId>,
    /// Commentaries pane visible.
    pub show_commentaries: bool,
    /// Targum pane visible.
    pub show_targum: bool,
    /// Per-pane scroll.
    pub scroll: ContentScroll,
    /// Commentators chosen per line.
    pub selected_commentators: BTreeMap<LineId, BTreeSet<CommentatorId>>,
    /// Targum sources chosen per line.
    pub selected_targum_sources: BTreeMap<LineId, BTreeSet<TargumSourceId>>,
    /// Loaded lines. Never persisted; rebuilt from the store.
    pub lines: Option<Vec<Line>>,
    /// Commentaries of the selected line while the pane is open. Never persisted.
    pub commentaries: Option<Vec<CommentaryEntry>>,
}

impl ContentState {
    /// Scroll position of one of the content panes. `None` for non-content targets.
    pub fn scroll_mut(&mut self, target: ScrollTarget) -> Option<&mut ScrollPosition> {
        match target {
            ScrollTarget::Content => Some(&mut self.scroll.lines),
            ScrollTarget::Commentaries => Some(&mut self.scroll.commentaries),
            ScrollTarget::Targum => Some(&mut self.scroll.targum),
            ScrollTarget::BookTree | ScrollTarget::Toc => None,
        }
    }

    /// Add or remove `commentator` for `line`.
    pub fn toggle_commentator(&mut self, line: LineId, commentator: CommentatorId) {
        toggle_member(&mut self.selected_commentators, line, commentator);
    }

    /// Add or remove `source` for `line`.
    pub fn toggle_targum_source(&mut self, line: LineId, source: TargumSourceId) {
        toggle_member(&mut self.selected_targum_sources, line, source);
    }
}

fn toggle_member<T: Ord>(map: &mut BTreeMap<LineId, BTreeSet<T>>, line: LineId, value: T) {
    let set = map.entry(line).or_default();
    if !set.remove(&value) {
        set.insert(value);
    }
    // No empty sets, so an untouched line and a cleared line persist the same way.
    if set.is_empty() {
        map.remove(&line);
    }
}
