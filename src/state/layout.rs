//! Split-pane layout state.
//!
//! Every split is a ratio in `[0, 1]`. Hiding a pane remembers the live ratio as the
//! "previous" ratio and snaps the split to the pane's collapsed value; showing it again
//! restores the previous ratio, or the configured default when there is none.

use serde::{Deserialize, Serialize};

/// Tolerance when comparing a ratio against the collapsed value.
const RATIO_EPSILON: f64 = 1e-6;

/// The four splits of a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAxis {
    /// Book tree | everything else. Collapses to 0.
    Main,
    /// Table of contents | book text. Collapses to 0.
    Toc,
    /// Book text | commentaries. Collapses to 1.
    Content,
    /// Book text | targum. Collapses to 1.
    Targum,
}

impl SplitAxis {
    /// All axes, in persistence order.
    pub const ALL: [SplitAxis; 4] = [
        SplitAxis::Main,
        SplitAxis::Toc,
        SplitAxis::Content,
        SplitAxis::Targum,
    ];

    /// Ratio the split snaps to when its pane is hidden.
    pub fn collapsed_ratio(self) -> f64 {
        match self {
            SplitAxis::Main | SplitAxis::Toc => 0.0,
            SplitAxis::Content | SplitAxis::Targum => 1.0,
        }
    }
}

/// Default ratios for newly opened tabs, and for panes shown without a remembered ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitDefaults {
    /// Main split default.
    pub main: f64,
    /// Table-of-contents split default.
    pub toc: f64,
    /// Commentaries split default.
    pub content: f64,
    /// Targum split default.
    pub targum: f64,
}

impl Default for SplitDefaults {
    fn default() -> Self {
        Self {
            main: 0.3,
            toc: 0.3,
            content: 0.7,
            targum: 0.8,
        }
    }
}

impl SplitDefaults {
    /// Default for `axis`.
    pub fn for_axis(&self, axis: SplitAxis) -> f64 {
        match axis {
            SplitAxis::Main => self.main,
            SplitAxis::Toc => self.toc,
            SplitAxis::Content => self.content,
            SplitAxis::Targum => self.targum,
        }
    }
}

/// Whether `ratio` is a usable split ratio.
pub fn is_valid_ratio(ratio: f64) -> bool {
    ratio.is_finite() && (0.0..=1.0).contains(&ratio)
}

/// One split ratio plus what it needs to undo a collapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPane {
    position: f64,
    previous: Option<f64>,
    default: f64,
    collapsed: f64,
}

impl SplitPane {
    /// A pane at its default ratio.
    pub fn new(axis: SplitAxis, default: f64) -> Self {
        Self {
            position: default,
            previous: None,
            default,
            collapsed: axis.collapsed_ratio(),
        }
    }

    /// Rebuild a pane from persisted values. Returns `None` for out-of-range ratios.
    pub fn restored(
        axis: SplitAxis,
        default: f64,
        position: f64,
        previous: Option<f64>,
    ) -> Option<Self> {
        if !is_valid_ratio(position) || previous.is_some_and(|p| !is_valid_ratio(p)) {
            return None;
        }
        Some(Self {
            position,
            previous,
            ..Self::new(axis, default)
        })
    }

    /// Live ratio.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Ratio remembered by the last hide, if any.
    pub fn previous(&self) -> Option<f64> {
        self.previous
    }

    /// Whether the pane is collapsed.
    pub fn is_hidden(&self) -> bool {
        (self.position - self.collapsed).abs() < RATIO_EPSILON
    }

    /// Move the split. Values are clamped into `[0, 1]`; NaN is ignored.
    pub fn drag(&mut self, ratio: f64) -> bool {
        if ratio.is_nan() {
            return false;
        }
        self.position = ratio.clamp(0.0, 1.0);
        true
    }

    /// Collapse the pane, remembering the live ratio. Hiding a hidden pane does nothing.
    pub fn hide(&mut self) {
        if self.is_hidden() {
            return;
        }
        self.previous = Some(self.position);
        self.position = self.collapsed;
    }

    /// Restore the pane to its remembered ratio, or the default if none was recorded.
    pub fn show(&mut self) {
        if !self.is_hidden() {
            return;
        }
        let collapsed = self.collapsed;
        self.position = self
            .previous
            .filter(|p| (p - collapsed).abs() >= RATIO_EPSILON)
            .unwrap_or(self.default);
    }

    /// Hide a visible pane or show a hidden one.
    pub fn toggle(&mut self) {
        if self.is_hidden() {
            self.show();
        } else {
            self.hide();
        }
    }
}

/// All splits of a tab.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Book tree | rest.
    pub main: SplitPane,
    /// Table of contents | text.
    pub toc: SplitPane,
    /// Text | commentaries.
    pub content: SplitPane,
    /// Text | targum.
    pub targum: SplitPane,
}

impl LayoutState {
    /// Layout with every split at its default.
    pub fn new(defaults: &SplitDefaults) -> Self {
        Self {
            main: SplitPane::new(SplitAxis::Main, defaults.main),
            toc: SplitPane::new(SplitAxis::Toc, defaults.toc),
            content: SplitPane::new(SplitAxis::Content, defaults.content),
            targum: SplitPane::new(SplitAxis::Targum, defaults.targum),
        }
    }

    /// The split for `axis`.
    pub fn pane(&self, axis: SplitAxis) -> &SplitPane {
        match axis {
            SplitAxis::Main => &self.main,
            SplitAxis::Toc => &self.toc,
            SplitAxis::Content => &self.content,
            SplitAxis::Targum => &self.targum,
        }
    }

    /// The split for `axis`, mutably.
    pub fn pane_mut(&mut self, axis: SplitAxis) -> &mut SplitPane {
        match axis {
            SplitAxis::Main => &mut self.main,
            SplitAxis::Toc => &mut self.toc,
            SplitAxis::Content => &mut self.content,
            SplitAxis::Targum => &mut self.targum,
        }
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new(&SplitDefaults::default())
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hide_then_show_restores_previous_ratio() {
        let mut pane = SplitPane::new(SplitAxis::Main, 0.25);
        pane.drag(0.3);

        pane.hide();
        assert_eq!(pane.position(), 0.0);
        assert_eq!(pane.previous(), Some(0.3));
        assert!(pane.is_hidden());

        pane.show();
        assert_eq!(pane.position(), 0.3);
        assert!(!pane.is_hidden());
    }

    #[test]
    fn content_split_collapses_to_one() {
        let mut pane = SplitPane::new(SplitAxis::Content, 0.7);

        pane.hide();

        assert_eq!(pane.position(), 1.0);
    }

    #[test]
    fn hiding_twice_keeps_first_previous() {
        let mut pane = SplitPane::new(SplitAxis::Toc, 0.4);
        pane.hide();
        pane.hide();
        pane.show();

        assert_eq!(pane.position(), 0.4);
    }

    #[test]
    fn show_without_previous_uses_default() {
        // A pane persisted while collapsed, before its previous ratio was written.
        let mut pane =
            SplitPane::restored(SplitAxis::Main, 0.3, 0.0, None).expect("valid ratios");
        assert!(pane.is_hidden());

        pane.show();

        assert_eq!(pane.position(), 0.3);
    }

    #[test]
    fn show_ignores_previous_equal_to_collapsed() {
        let mut pane =
            SplitPane::restored(SplitAxis::Targum, 0.8, 1.0, Some(1.0)).expect("valid ratios");

        pane.show();

        assert_eq!(pane.position(), 0.8);
    }

    #[test]
    fn drag_clamps_and_rejects_nan() {
        let mut pane = SplitPane::new(SplitAxis::Main, 0.3);

        assert!(pane.drag(1.7));
        assert_eq!(pane.position(), 1.0);
        assert!(pane.drag(-0.5));
        assert_eq!(pane.position(), 0.0);
        assert!(!pane.drag(f64::NAN));
        assert_eq!(pane.position(), 0.0);
    }

    #[test]
    fn restored_rejects_out_of_range_ratios() {
        assert!(SplitPane::restored(SplitAxis::Main, 0.3, 1.5, None).is_none());
        assert!(SplitPane::restored(SplitAxis::Main, 0.3, 0.5, Some(f64::INFINITY)).is_none());
    }

    #[test]
    fn toggle_alternates() {
        let mut layout = LayoutState::default();
        let pane = layout.pane_mut(SplitAxis::Targum);

        pane.toggle();
        assert!(pane.is_hidden());
        pane.toggle();
        assert_eq!(pane.position(), 0.8);
    }
}
