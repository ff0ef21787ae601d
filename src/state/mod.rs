//! Per-tab UI state machine (pure).
//!
//! All state transitions are synchronous and testable without a backing store.

pub mod content;
pub mod intent;
pub mod layout;
pub mod navigation;
pub mod scroll;
pub mod tab_state;
pub mod toc;

// Re-export for convenience
pub use content::{ContentScroll, ContentState};
pub use intent::{
    CommentaryRequest, ContentRequest, Effect, Intent, Reloads, TocRootsRequest,
};
pub use layout::{LayoutState, SplitAxis, SplitDefaults, SplitPane};
pub use navigation::NavigationState;
pub use scroll::{ScrollPosition, ScrollTarget};
pub use tab_state::TabState;
pub use toc::TocState;
