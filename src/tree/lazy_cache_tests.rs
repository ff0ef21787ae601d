//! Tests for LazyTreeCache.

use super::*;

fn cache() -> LazyTreeCache<u64> {
    LazyTreeCache::new(vec![1, 2, 3])
}

fn fetch_request(handle: LoadHandle<u64>) -> LoadRequest<u64> {
    match handle {
        LoadHandle::Fetch(request) => request,
        other => panic!("expected a fetch request, got {:?}", other),
    }
}

// ===== expand =====

#[test]
fn expand_unloaded_node_requests_fetch_and_marks_pending() {
    let mut tree = cache();

    let request = fetch_request(tree.expand(1));

    assert_eq!(request.node, 1);
    assert!(tree.is_expanded(1));
    assert!(tree.is_pending(1));
    assert_eq!(tree.children_of(1), None);
    assert!(tree.invariant_holds());
}

#[test]
fn completed_expand_caches_children() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));

    let outcome = tree.complete(request, Ok(vec![10, 11]));

    assert_eq!(outcome, LoadOutcome::Applied { visible: true });
    assert!(tree.is_expanded(1));
    assert!(!tree.is_pending(1));
    assert_eq!(tree.children_of(1), Some(&[10, 11][..]));
    assert!(tree.invariant_holds());
}

#[test]
fn second_expand_while_pending_joins_in_flight_load() {
    let mut tree = cache();
    let _request = fetch_request(tree.expand(1));

    let second = tree.expand(1);

    assert_eq!(second, LoadHandle::InFlight);
    assert!(tree.is_pending(1));
}

#[test]
fn expand_with_cached_children_is_ready_immediately() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));
    tree.complete(request, Ok(vec![10]));
    tree.collapse(1);

    let handle = tree.expand(1);

    assert_eq!(handle, LoadHandle::Ready(vec![10]));
    assert!(tree.is_expanded(1));
}

// ===== collapse =====

#[test]
fn collapse_clears_expansion_regardless_of_cache_state() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));
    tree.collapse(1);
    assert!(!tree.is_expanded(1));

    tree.complete(request, Ok(vec![10]));
    tree.expand(1);
    tree.collapse(1);
    assert!(!tree.is_expanded(1));
}

#[test]
fn result_arriving_after_collapse_is_cached_without_reexpanding() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));
    tree.collapse(1);
    let revision_before = tree.revision();

    let outcome = tree.complete(request, Ok(vec![10, 11]));

    assert_eq!(outcome, LoadOutcome::Applied { visible: false });
    assert!(!tree.is_expanded(1));
    assert_eq!(tree.children_of(1), Some(&[10, 11][..]));
    assert_eq!(tree.revision(), revision_before, "hidden result is not a visible change");
    assert_eq!(tree.expand(1), LoadHandle::Ready(vec![10, 11]));
}

// ===== failure =====

#[test]
fn failed_fetch_reverts_node_to_collapsed_and_unloaded() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(2));

    let outcome = tree.complete(request, Err(FetchError::Backend("boom".to_string())));

    assert!(matches!(outcome, LoadOutcome::Failed(FetchError::Backend(_))));
    assert!(!tree.is_expanded(2));
    assert!(!tree.is_pending(2));
    assert_eq!(tree.children_of(2), None);
    assert!(tree.invariant_holds());
}

#[test]
fn expand_after_failure_issues_a_fresh_fetch() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(2));
    tree.complete(request, Err(FetchError::Backend("boom".to_string())));

    assert!(matches!(tree.expand(2), LoadHandle::Fetch(_)));
}

// ===== invalidate =====

#[test]
fn invalidate_drops_node_and_cached_descendants() {
    let mut tree = cache();
    let r1 = fetch_request(tree.expand(1));
    tree.complete(r1, Ok(vec![10, 11]));
    let r10 = fetch_request(tree.expand(10));
    tree.complete(r10, Ok(vec![100]));
    let _r11 = fetch_request(tree.expand(11));

    tree.invalidate(1);

    for node in [1, 10, 11] {
        assert!(!tree.is_expanded(node), "{node} should be collapsed");
        assert!(!tree.is_pending(node), "{node} should not be pending");
        assert_eq!(tree.children_of(node), None, "{node} should be unloaded");
    }
    assert!(tree.invariant_holds());
}

#[test]
fn invalidate_leaves_unrelated_subtrees_alone() {
    let mut tree = cache();
    let r1 = fetch_request(tree.expand(1));
    tree.complete(r1, Ok(vec![10]));
    let r2 = fetch_request(tree.expand(2));
    tree.complete(r2, Ok(vec![20]));

    tree.invalidate(1);

    assert!(tree.is_expanded(2));
    assert_eq!(tree.children_of(2), Some(&[20][..]));
}

#[test]
fn reexpand_after_invalidate_behaves_as_fresh_expand() {
    let mut tree = cache();
    let r1 = fetch_request(tree.expand(1));
    tree.complete(r1, Ok(vec![10]));
    tree.invalidate(1);

    let request = fetch_request(tree.expand(1));
    tree.complete(request, Ok(vec![12, 13]));

    assert_eq!(tree.children_of(1), Some(&[12, 13][..]));
}

// ===== reset / epochs =====

#[test]
fn results_from_before_reset_are_stale() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));

    tree.reset(vec![7, 8]);
    let outcome = tree.complete(request, Ok(vec![10]));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(tree.children_of(1), None);
    assert_eq!(tree.roots(), &[7, 8]);
    assert!(tree.expanded().is_empty());
}

#[test]
fn stale_failures_are_not_reported() {
    let mut tree = cache();
    let request = fetch_request(tree.expand(1));
    tree.reset(vec![1]);

    let outcome = tree.complete(request, Err(FetchError::Backend("late".to_string())));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(outcome.into_result(), Ok(()));
}

#[test]
fn seed_roots_keeps_epoch() {
    let mut tree: LazyTreeCache<u64> = LazyTreeCache::default();
    let request = fetch_request(tree.expand(5));

    tree.seed_roots(vec![5, 6]);

    assert_eq!(tree.complete(request, Ok(vec![50])), LoadOutcome::Applied { visible: true });
}

// ===== restore_expanded =====

#[test]
fn restore_expanded_issues_one_request_per_node() {
    let mut tree = cache();

    let requests = tree.restore_expanded([3, 1, 1]);

    let nodes: Vec<u64> = requests.iter().map(|r| r.node).collect();
    assert_eq!(nodes, vec![3, 1]);
    assert_eq!(tree.expanded(), vec![1, 3]);
    assert!(tree.invariant_holds());
}

// ===== visible_rows =====

#[test]
fn visible_rows_walks_expanded_nodes_depth_first() {
    let mut tree = LazyTreeCache::new(vec![1, 2]);
    let r1 = fetch_request(tree.expand(1));
    tree.complete(r1, Ok(vec![10, 11]));
    let r10 = fetch_request(tree.expand(10));
    tree.complete(r10, Ok(vec![100]));

    assert_eq!(
        tree.visible_rows(),
        vec![(1, 0), (10, 1), (100, 2), (11, 1), (2, 0)]
    );
}

#[test]
fn visible_rows_skips_cycles() {
    let mut tree = LazyTreeCache::new(vec![1]);
    let r1 = fetch_request(tree.expand(1));
    tree.complete(r1, Ok(vec![2]));
    let r2 = fetch_request(tree.expand(2));
    tree.complete(r2, Ok(vec![1]));

    assert_eq!(tree.visible_rows(), vec![(1, 0), (2, 1)]);
}
