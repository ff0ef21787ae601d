//! Flat key layout of the persisted session.
//!
//! Each open tab gets its own namespace, `tab.<tabId>.<key>`. Session-wide keys live under
//! `session.`. Values are JSON-encoded strings.

use crate::model::TabId;
use crate::state::SplitAxis;

/// Ordered list of open tab ids.
pub const TAB_LIST: &str = "session.tabs";
/// RFC 3339 timestamp of the last save.
pub const SAVED_AT: &str = "session.savedAt";

/// Prefix of every session-wide key.
pub const SESSION_PREFIX: &str = "session.";
/// Prefix of every per-tab key.
pub const TAB_PREFIX: &str = "tab.";

/// Per-tab key names.
pub struct StateKeys;

impl StateKeys {
    /// Selected category id or null.
    pub const SELECTED_CATEGORY: &'static str = "selectedCategory";
    /// Selected book id or null.
    pub const SELECTED_BOOK: &'static str = "selectedBook";
    /// Browser search text.
    pub const SEARCH_TEXT: &'static str = "searchText";
    /// Expanded category ids.
    pub const EXPANDED_CATEGORIES: &'static str = "expandedCategories";
    /// Browser scroll index.
    pub const BOOK_TREE_SCROLL_INDEX: &'static str = "bookTreeScrollIndex";
    /// Browser scroll offset.
    pub const BOOK_TREE_SCROLL_OFFSET: &'static str = "bookTreeScrollOffset";
    /// Selected TOC entry id or null.
    pub const SELECTED_CHAPTER: &'static str = "selectedChapter";
    /// Expanded TOC entry ids.
    pub const EXPANDED_TOC_ENTRIES: &'static str = "expandedTocEntries";
    /// TOC scroll index.
    pub const TOC_SCROLL_INDEX: &'static str = "tocScrollIndex";
    /// TOC scroll offset.
    pub const TOC_SCROLL_OFFSET: &'static str = "tocScrollOffset";
    /// Selected line id or null.
    pub const SELECTED_LINE: &'static str = "selectedLine";
    /// Commentaries pane visibility.
    pub const SHOW_COMMENTARIES: &'static str = "showCommentaries";
    /// Targum pane visibility.
    pub const SHOW_TARGUM: &'static str = "showTargum";
    /// Text scroll index.
    pub const CONTENT_SCROLL_INDEX: &'static str = "contentScrollIndex";
    /// Text scroll offset.
    pub const CONTENT_SCROLL_OFFSET: &'static str = "contentScrollOffset";
    /// Commentaries scroll index.
    pub const COMMENTARIES_SCROLL_INDEX: &'static str = "commentariesScrollIndex";
    /// Commentaries scroll offset.
    pub const COMMENTARIES_SCROLL_OFFSET: &'static str = "commentariesScrollOffset";
    /// Targum scroll index.
    pub const TARGUM_SCROLL_INDEX: &'static str = "targumScrollIndex";
    /// Targum scroll offset.
    pub const TARGUM_SCROLL_OFFSET: &'static str = "targumScrollOffset";
    /// Commentators selected per line, `{lineId: [commentatorId]}`.
    pub const SELECTED_COMMENTATORS: &'static str = "selectedCommentators";
    /// Targum sources selected per line, `{lineId: [sourceId]}`.
    pub const SELECTED_TARGUM_SOURCES: &'static str = "selectedTargumSources";

    /// Live ratio key of a split.
    pub fn split_position(axis: SplitAxis) -> &'static str {
        match axis {
            SplitAxis::Main => "mainSplitPanePosition",
            SplitAxis::Toc => "tocSplitPanePosition",
            SplitAxis::Content => "contentSplitPanePosition",
            SplitAxis::Targum => "targumSplitPanePosition",
        }
    }

    /// Remembered ratio key of a split.
    pub fn previous_split_position(axis: SplitAxis) -> &'static str {
        match axis {
            SplitAxis::Main => "previousMainSplitPosition",
            SplitAxis::Toc => "previousTocSplitPosition",
            SplitAxis::Content => "previousContentSplitPosition",
            SplitAxis::Targum => "previousTargumSplitPosition",
        }
    }
}

/// Namespace prefix of one tab, `tab.<id>.`.
pub fn tab_prefix(tab: TabId) -> String {
    format!("{TAB_PREFIX}{tab}.")
}

/// Fully qualified key of `key` for `tab`.
pub fn tab_key(tab: TabId, key: &str) -> String {
    format!("{}{}", tab_prefix(tab), key)
}
