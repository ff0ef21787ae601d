//! Tests for TabState intent dispatch and result application.

use super::*;
use crate::model::{CommentaryEntry, CommentatorId, LineId};
use crate::state::layout::SplitAxis;
use crate::state::scroll::ScrollPosition;

// ===== Helpers =====

fn tab() -> TabState {
    TabState::new(
        vec![
            CatalogNode::Category(CategoryId::new(1)),
            CatalogNode::Category(CategoryId::new(2)),
        ],
        SplitDefaults::default(),
    )
}

fn toc_entry(id: u64, book: u64, parent: Option<u64>) -> TocEntry {
    TocEntry {
        id: TocEntryId::new(id),
        book_id: BookId::new(book),
        parent_id: parent.map(TocEntryId::new),
        title: format!("Entry {id}"),
        level: u32::from(parent.is_some()),
    }
}

fn open_book(tab: &mut TabState, book: u64) -> (TocRootsRequest, ContentRequest) {
    match tab.apply(Intent::SelectBook(BookId::new(book))) {
        Effect::BookSwitched { toc_roots, lines } => (toc_roots, lines),
        other => panic!("expected BookSwitched, got {:?}", other),
    }
}

// ===== Navigation =====

#[test]
fn expand_category_requests_children_once() {
    let mut tab = tab();

    let first = tab.apply(Intent::ExpandCategory(CategoryId::new(1)));
    let second = tab.apply(Intent::ExpandCategory(CategoryId::new(1)));

    assert!(matches!(first, Effect::LoadCategoryChildren(_)));
    assert_eq!(second, Effect::None);
}

#[test]
fn category_children_become_visible_after_load() {
    let mut tab = tab();
    let Effect::LoadCategoryChildren(request) = tab.apply(Intent::ExpandCategory(CategoryId::new(1)))
    else {
        panic!("expected a category load");
    };

    let outcome = tab.apply_category_children(
        request,
        Ok(vec![CatalogEntry::Book(crate::model::Book {
            id: BookId::new(10),
            category_id: CategoryId::new(1),
            title: "Genesis".to_string(),
        })]),
    );

    assert_eq!(outcome, LoadOutcome::Applied { visible: true });
    assert_eq!(
        tab.navigation
            .tree
            .children_of(CatalogNode::Category(CategoryId::new(1))),
        Some(&[CatalogNode::Book(BookId::new(10))][..])
    );
    assert_eq!(tab.navigation.expanded_categories(), vec![CategoryId::new(1)]);
}

#[test]
fn failed_category_load_collapses_node() {
    let mut tab = tab();
    let Effect::LoadCategoryChildren(request) = tab.apply(Intent::ExpandCategory(CategoryId::new(2)))
    else {
        panic!("expected a category load");
    };

    let outcome =
        tab.apply_category_children(request, Err(FetchError::Backend("offline".to_string())));

    assert!(matches!(outcome, LoadOutcome::Failed(_)));
    assert!(tab.navigation.expanded_categories().is_empty());
}

#[test]
fn search_text_and_selection_update_navigation_only() {
    let mut tab = tab();

    tab.apply(Intent::SelectCategory(Some(CategoryId::new(2))));
    tab.apply(Intent::SearchTextChanged("brei".to_string()));

    assert_eq!(tab.navigation.selected_category, Some(CategoryId::new(2)));
    assert_eq!(tab.navigation.search_text, "brei");
    assert_eq!(tab.content, ContentState::default());
}

// ===== Book switch =====

#[test]
fn selecting_book_requests_toc_roots_and_lines() {
    let mut tab = tab();

    let (toc_roots, lines) = open_book(&mut tab, 10);

    assert_eq!(toc_roots.book, BookId::new(10));
    assert_eq!(lines.source, LineSource::Book(BookId::new(10)));
    assert_eq!(toc_roots.generation, tab.generation());
    assert_eq!(tab.generation(), 1);
}

#[test]
fn reselecting_same_book_is_a_no_op() {
    let mut tab = tab();
    open_book(&mut tab, 10);

    let effect = tab.apply(Intent::SelectBook(BookId::new(10)));

    assert_eq!(effect, Effect::None);
    assert_eq!(tab.generation(), 1);
}

#[test]
fn book_switch_resets_toc_and_discards_late_toc_results() {
    let mut tab = tab();
    let (roots_a, _) = open_book(&mut tab, 10);
    tab.apply_toc_roots(roots_a, Ok(vec![toc_entry(100, 10, None)]));
    let Effect::LoadTocChildren { book, request } =
        tab.apply(Intent::ExpandTocEntry(TocEntryId::new(100)))
    else {
        panic!("expected a TOC load");
    };
    assert!(tab.toc.tree.is_expanded(TocEntryId::new(100)));

    open_book(&mut tab, 20);
    let outcome =
        tab.apply_toc_children(book, request, Ok(vec![toc_entry(101, 10, Some(100))]));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(tab.toc.tree.expanded().is_empty());
    assert_eq!(tab.toc.tree.children_of(TocEntryId::new(100)), None);
    assert_eq!(tab.toc.book, Some(BookId::new(20)));
}

#[test]
fn book_switch_keeps_navigation_tree_expansion() {
    let mut tab = tab();
    tab.apply(Intent::ExpandCategory(CategoryId::new(1)));

    open_book(&mut tab, 10);

    assert_eq!(tab.navigation.expanded_categories(), vec![CategoryId::new(1)]);
}

#[test]
fn book_switch_resets_content() {
    let mut tab = tab();
    open_book(&mut tab, 10);
    tab.apply(Intent::SelectLine(Some(LineId::new(5))));
    tab.apply(Intent::ToggleCommentaries);
    tab.apply(Intent::ToggleCommentator {
        line: LineId::new(5),
        commentator: CommentatorId::new(1),
    });

    open_book(&mut tab, 20);

    assert_eq!(tab.content, ContentState::default());
}

#[test]
fn late_lines_for_previous_book_are_dropped() {
    let mut tab = tab();
    let (_, lines_a) = open_book(&mut tab, 10);
    let (_, lines_b) = open_book(&mut tab, 20);

    assert_eq!(tab.apply_lines(lines_a, Ok(Vec::new())), LoadOutcome::Stale);
    assert!(tab.content.lines.is_none());
    assert_eq!(
        tab.apply_lines(lines_b, Ok(Vec::new())),
        LoadOutcome::Applied { visible: true }
    );
    assert_eq!(tab.content.lines, Some(Vec::new()));
}

#[test]
fn stale_toc_roots_are_dropped() {
    let mut tab = tab();
    let (roots_a, _) = open_book(&mut tab, 10);
    open_book(&mut tab, 20);

    let outcome = tab.apply_toc_roots(roots_a, Ok(vec![toc_entry(100, 10, None)]));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(tab.toc.tree.roots().is_empty());
    assert!(!tab.toc.roots_loaded);
}

#[test]
fn chapter_selection_supersedes_book_lines() {
    let mut tab = tab();
    let (_, book_lines) = open_book(&mut tab, 10);

    let Effect::LoadLines(chapter_lines) =
        tab.apply(Intent::SelectChapter(Some(TocEntryId::new(100))))
    else {
        panic!("expected a lines load");
    };

    assert_eq!(tab.apply_lines(book_lines, Ok(Vec::new())), LoadOutcome::Stale);
    assert_eq!(chapter_lines.source, LineSource::TocEntry(TocEntryId::new(100)));
    assert_eq!(tab.toc.selected_chapter, Some(TocEntryId::new(100)));
}

#[test]
fn toc_expand_without_book_is_ignored() {
    let mut tab = tab();

    assert_eq!(tab.apply(Intent::ExpandTocEntry(TocEntryId::new(1))), Effect::None);
    assert!(tab.toc.tree.expanded().is_empty());
}

#[test]
fn chapter_selection_without_book_is_ignored() {
    let mut tab = tab();

    assert_eq!(
        tab.apply(Intent::SelectChapter(Some(TocEntryId::new(100)))),
        Effect::None
    );
    assert_eq!(tab.toc.selected_chapter, None);
}

// ===== Commentaries =====

fn commentary(line: u64, commentator: u64) -> CommentaryEntry {
    CommentaryEntry {
        line_id: LineId::new(line),
        commentator_id: CommentatorId::new(commentator),
        commentator: format!("Commentator {commentator}"),
        text: "gloss".to_string(),
    }
}

#[test]
fn opening_commentaries_requests_the_selected_line() {
    let mut tab = tab();
    open_book(&mut tab, 10);
    assert_eq!(tab.apply(Intent::SelectLine(Some(LineId::new(5)))), Effect::None);

    let Effect::LoadCommentaries(request) = tab.apply(Intent::ToggleCommentaries) else {
        panic!("expected a commentaries load");
    };
    assert_eq!(request.line, LineId::new(5));

    let outcome = tab.apply_commentaries(request, Ok(vec![commentary(5, 7)]));

    assert_eq!(outcome, LoadOutcome::Applied { visible: true });
    assert_eq!(tab.content.commentaries, Some(vec![commentary(5, 7)]));
}

#[test]
fn selecting_a_line_with_commentaries_open_requests_it() {
    let mut tab = tab();
    open_book(&mut tab, 10);
    tab.apply(Intent::ToggleCommentaries);

    let effect = tab.apply(Intent::SelectLine(Some(LineId::new(6))));

    assert!(matches!(
        effect,
        Effect::LoadCommentaries(CommentaryRequest { line, .. }) if line == LineId::new(6)
    ));
}

#[test]
fn commentaries_for_a_previous_line_are_dropped() {
    let mut tab = tab();
    open_book(&mut tab, 10);
    tab.apply(Intent::ToggleCommentaries);
    let Effect::LoadCommentaries(first) = tab.apply(Intent::SelectLine(Some(LineId::new(5))))
    else {
        panic!("expected a commentaries load");
    };
    tab.apply(Intent::SelectLine(Some(LineId::new(6))));

    assert_eq!(
        tab.apply_commentaries(first, Ok(vec![commentary(5, 7)])),
        LoadOutcome::Stale
    );
    assert_eq!(tab.content.commentaries, None);
}

#[test]
fn closing_commentaries_clears_and_drops_late_results() {
    let mut tab = tab();
    open_book(&mut tab, 10);
    tab.apply(Intent::SelectLine(Some(LineId::new(5))));
    let Effect::LoadCommentaries(request) = tab.apply(Intent::ToggleCommentaries) else {
        panic!("expected a commentaries load");
    };

    assert_eq!(tab.apply(Intent::ToggleCommentaries), Effect::None);

    assert_eq!(
        tab.apply_commentaries(request, Ok(vec![commentary(5, 7)])),
        LoadOutcome::Stale
    );
    assert_eq!(tab.content.commentaries, None);
}

// ===== Layout and scroll =====

#[test]
fn hide_and_show_main_pane_restores_ratio() {
    let mut tab = tab();
    tab.apply(Intent::DragSplit(SplitAxis::Main, 0.3));

    tab.apply(Intent::TogglePane(SplitAxis::Main));
    assert_eq!(tab.layout.main.position(), 0.0);
    assert_eq!(tab.layout.main.previous(), Some(0.3));

    tab.apply(Intent::TogglePane(SplitAxis::Main));
    assert_eq!(tab.layout.main.position(), 0.3);
}

#[test]
fn scroll_intents_route_to_their_pane() {
    let mut tab = tab();

    tab.apply(Intent::Scroll(ScrollTarget::BookTree, ScrollPosition::new(4, 12)));
    tab.apply(Intent::Scroll(ScrollTarget::Toc, ScrollPosition::new(2, 0)));
    tab.apply(Intent::Scroll(ScrollTarget::Targum, ScrollPosition::new(9, 3)));

    assert_eq!(tab.navigation.scroll, ScrollPosition::new(4, 12));
    assert_eq!(tab.toc.scroll, ScrollPosition::new(2, 0));
    assert_eq!(tab.content.scroll.targum, ScrollPosition::new(9, 3));
    assert_eq!(tab.content.scroll.lines, ScrollPosition::top());
}

#[test]
fn every_intent_bumps_revision() {
    let mut tab = tab();
    let before = tab.revision();

    tab.apply(Intent::ToggleTargum);

    assert!(tab.revision() > before);
    assert!(tab.content.show_targum);
}

// ===== Restore planning =====

#[test]
fn plan_reloads_requests_every_expanded_node() {
    let mut tab = tab();
    tab.navigation.selected_book = Some(BookId::new(10));
    tab.toc.selected_chapter = Some(TocEntryId::new(101));

    let reloads = tab.plan_reloads(
        [CategoryId::new(1), CategoryId::new(2)],
        [TocEntryId::new(100)],
    );

    assert_eq!(reloads.categories.len(), 2);
    assert_eq!(reloads.toc.len(), 1);
    assert_eq!(reloads.book, Some(BookId::new(10)));
    assert_eq!(
        reloads.lines.map(|l| l.source),
        Some(LineSource::TocEntry(TocEntryId::new(101)))
    );
    assert_eq!(reloads.len(), 5);
    assert!(tab.toc.tree.is_pending(TocEntryId::new(100)));
}

#[test]
fn plan_reloads_requests_commentaries_of_an_open_pane() {
    let mut tab = tab();
    tab.navigation.selected_book = Some(BookId::new(10));
    tab.content.selected_line = Some(LineId::new(1000));
    tab.content.show_commentaries = true;

    let reloads = tab.plan_reloads(Vec::<CategoryId>::new(), Vec::<TocEntryId>::new());

    assert_eq!(reloads.commentaries.map(|c| c.line), Some(LineId::new(1000)));
    assert_eq!(reloads.len(), 3);
}

#[test]
fn plan_reloads_without_book_skips_toc() {
    let mut tab = tab();

    let reloads = tab.plan_reloads([CategoryId::new(1)], [TocEntryId::new(100)]);

    assert_eq!(reloads.categories.len(), 1);
    assert!(reloads.toc.is_empty());
    assert!(reloads.toc_roots.is_none());
    assert!(reloads.lines.is_none());
}
