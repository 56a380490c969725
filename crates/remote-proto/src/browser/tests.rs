use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;

use crate::error::TransportError;
use crate::protocol::{MediaContent, Node, NodeId, NodeType};
use super::navigation::next_path;
use super::*;

// ── Fakes ────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeCatalog {
    children: HashMap<String, Vec<Node>>,
    files: HashMap<String, Vec<Node>>,
    broken: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeCatalog {
    fn with_children(mut self, id: &str, names: &[&str]) -> Self {
        let nodes = names.iter().map(|n| Node::container(*n, *n)).collect();
        self.children.insert(id.to_string(), nodes);
        self
    }

    fn with_files(mut self, id: &str, names: &[&str]) -> Self {
        let nodes = names
            .iter()
            .map(|n| {
                Node::playable(
                    *n,
                    *n,
                    MediaContent::Audio {
                        artist: Some("Someone".to_string()),
                        duration_secs: 180.0,
                    },
                )
            })
            .collect();
        self.files.insert(id.to_string(), nodes);
        self
    }

    fn broken(mut self, id: &str) -> Self {
        self.broken.insert(id.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn browse_children(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        self.calls.lock().unwrap().push(format!("children:{}", id));
        if self.broken.contains(id.as_str()) {
            return Err(TransportError::new("connection refused"));
        }
        Ok(self.children.get(id.as_str()).cloned().unwrap_or_default())
    }

    async fn browse_files(&self, id: &NodeId) -> Result<Vec<Node>, TransportError> {
        self.calls.lock().unwrap().push(format!("files:{}", id));
        Ok(self.files.get(id.as_str()).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeResolver {
    resolved: AtomicUsize,
    failing: Mutex<HashSet<String>>,
}

impl FakeResolver {
    fn failing(ids: &[&str]) -> Self {
        Self {
            resolved: AtomicUsize::new(0),
            failing: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn heal(&self) {
        self.failing.lock().unwrap().clear();
    }

    fn count(&self) -> usize {
        self.resolved.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetailResolver for FakeResolver {
    async fn resolve(&self, node: &Node) -> Result<RowDetail, TransportError> {
        self.resolved.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(node.id.as_str()) {
            return Err(TransportError::new("image service unavailable"));
        }
        Ok(RowDetail::for_node(node, format!("http://art/{}", node.id)))
    }
}

fn browser() -> Browser {
    Browser::new(FILTER_QUIET_WINDOW)
}

fn ids(path: &[NodeId]) -> Vec<&str> {
    path.iter().map(NodeId::as_str).collect()
}

fn visible_names(b: &Browser) -> Vec<String> {
    (0..b.visible_len())
        .filter_map(|i| b.visible_node(i))
        .map(|n| n.name.clone())
        .collect()
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{:03}", prefix, i)).collect()
}

// ── Data source ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_children_prefers_structural_listing() {
    let catalog = FakeCatalog::default()
        .with_children("1", &["Albums", "Artists"])
        .with_files("1", &["stray.mp3"]);

    let nodes = catalog.fetch_children(&NodeId::new("1")).await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(catalog.calls(), vec!["children:1"]);
}

#[tokio::test]
async fn test_fetch_children_falls_back_to_files() {
    let catalog = FakeCatalog::default().with_files("2", &["a.flac", "b.flac"]);

    let nodes = catalog.fetch_children(&NodeId::new("2")).await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| n.node_type == NodeType::Playable));
    assert_eq!(catalog.calls(), vec!["children:2", "files:2"]);

    let empty = catalog.fetch_children(&NodeId::new("3")).await.unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_fetch_children_error_skips_fallback() {
    let catalog = FakeCatalog::default().broken("9");
    let err = catalog.fetch_children(&NodeId::new("9")).await.unwrap_err();
    assert_eq!(err.message, "connection refused");
    assert_eq!(catalog.calls(), vec!["children:9"]);
}

// ── Navigation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_select_truncates_on_revisit_and_appends_new() {
    let catalog = FakeCatalog::default()
        .with_children("Music", &["Rock", "Jazz"])
        .with_children("Rock", &["Led Zeppelin"]);
    let mut b = browser();

    let r = b.select_node(&catalog, NodeId::new("Music"), false).await;
    assert_eq!(r.unwrap(), Navigated::Applied);
    assert_eq!(ids(b.path()), vec!["Music"]);
    assert_eq!(visible_names(&b), vec!["Rock", "Jazz"]);

    b.select_node(&catalog, NodeId::new("Music"), false).await.unwrap();
    assert_eq!(ids(b.path()), vec!["Music"]);
    assert_eq!(visible_names(&b), vec!["Rock", "Jazz"]);

    b.select_node(&catalog, NodeId::new("Rock"), false).await.unwrap();
    assert_eq!(ids(b.path()), vec!["Music", "Rock"]);
    assert_eq!(visible_names(&b), vec!["Led Zeppelin"]);
}

#[tokio::test]
async fn test_jump_back_to_breadcrumb() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["B"])
        .with_children("B", &["C"])
        .with_children("C", &["D"]);
    let mut b = browser();
    for id in ["A", "B", "C"] {
        b.select_node(&catalog, NodeId::new(id), false).await.unwrap();
    }
    assert_eq!(ids(b.path()), vec!["A", "B", "C"]);

    let ticket = b.jump_to_breadcrumb(0).unwrap();
    assert_eq!(ticket.id, NodeId::new("A"));
    let result = catalog.fetch_children(&ticket.id).await;
    b.finish_navigation(ticket, result).unwrap();
    assert_eq!(ids(b.path()), vec!["A"]);
    assert_eq!(visible_names(&b), vec!["B"]);

    assert!(b.jump_to_breadcrumb(5).is_none());
}

#[tokio::test]
async fn test_reset_flag_clears_path() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["B"])
        .with_children("B", &["x"])
        .with_children("Z", &["y"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();

    b.select_node(&catalog, NodeId::new("Z"), true).await.unwrap();
    assert!(b.path().is_empty());
    assert_eq!(visible_names(&b), vec!["y"]);
}

#[tokio::test]
async fn test_enter_command_resets_only_when_root_changes() {
    let catalog = FakeCatalog::default()
        .with_children("audio", &["Albums"])
        .with_children("Albums", &["Blue"])
        .with_children("video", &["Movies"]);
    let mut b = browser();

    let ticket = b.enter_command(NodeId::new("audio")).unwrap();
    assert!(ticket.reset);
    let result = catalog.fetch_children(&ticket.id).await;
    b.finish_navigation(ticket, result).unwrap();
    b.select_node(&catalog, NodeId::new("Albums"), false).await.unwrap();
    assert_eq!(ids(b.path()), vec!["Albums"]);

    // Same command again: stay where we are.
    assert!(b.enter_command(NodeId::new("audio")).is_none());
    assert_eq!(ids(b.path()), vec!["Albums"]);

    let ticket = b.enter_command(NodeId::new("video")).unwrap();
    let result = catalog.fetch_children(&ticket.id).await;
    b.finish_navigation(ticket, result).unwrap();
    assert!(b.path().is_empty());
    assert_eq!(b.root(), Some(&NodeId::new("video")));
    assert_eq!(visible_names(&b), vec!["Movies"]);
}

#[tokio::test]
async fn test_failed_command_entry_keeps_root_and_can_retry() {
    let mut catalog = FakeCatalog::default()
        .with_children("audio", &["Albums"])
        .with_children("video", &["Movies"])
        .broken("video");
    let mut b = browser();
    let t = b.enter_command(NodeId::new("audio")).unwrap();
    let r = catalog.fetch_children(&t.id).await;
    b.finish_navigation(t, r).unwrap();

    let t = b.enter_command(NodeId::new("video")).unwrap();
    let r = catalog.fetch_children(&t.id).await;
    assert!(b.finish_navigation(t, r).is_err());
    assert_eq!(b.root(), Some(&NodeId::new("audio")));
    assert_eq!(visible_names(&b), vec!["Albums"]);
    assert_eq!(b.home().unwrap().id, NodeId::new("audio"));

    catalog.broken.clear();
    let t = b.enter_command(NodeId::new("video")).unwrap();
    let r = catalog.fetch_children(&t.id).await;
    assert_eq!(b.finish_navigation(t, r).unwrap(), Navigated::Applied);
    assert_eq!(b.root(), Some(&NodeId::new("video")));
    assert_eq!(visible_names(&b), vec!["Movies"]);
}

#[tokio::test]
async fn test_superseded_command_entry_keeps_root() {
    let catalog = FakeCatalog::default()
        .with_children("audio", &["Albums"])
        .with_children("Albums", &["Blue"])
        .with_children("video", &["Movies"]);
    let mut b = browser();
    let t = b.enter_command(NodeId::new("audio")).unwrap();
    let r = catalog.fetch_children(&t.id).await;
    b.finish_navigation(t, r).unwrap();

    let video = b.enter_command(NodeId::new("video")).unwrap();
    let albums = b.begin_navigation(NodeId::new("Albums"), false);
    let r = catalog.fetch_children(&albums.id).await;
    b.finish_navigation(albums, r).unwrap();
    let r = catalog.fetch_children(&video.id).await;
    assert_eq!(b.finish_navigation(video, r).unwrap(), Navigated::Superseded);

    assert_eq!(b.root(), Some(&NodeId::new("audio")));
    assert_eq!(ids(b.path()), vec!["Albums"]);
    assert_eq!(b.back().unwrap().id, NodeId::new("audio"));
    assert!(b.enter_command(NodeId::new("video")).is_some());
}

#[tokio::test]
async fn test_back_and_home() {
    let catalog = FakeCatalog::default()
        .with_children("root", &["A"])
        .with_children("A", &["B"])
        .with_children("B", &["C"]);
    let mut b = browser();
    assert!(b.back().is_none());
    assert!(b.home().is_none());

    let t = b.enter_command(NodeId::new("root")).unwrap();
    let r = catalog.fetch_children(&t.id).await;
    b.finish_navigation(t, r).unwrap();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();

    let t = b.back().unwrap();
    assert_eq!(t.id, NodeId::new("A"));
    assert!(!t.reset);
    let r = catalog.fetch_children(&t.id).await;
    b.finish_navigation(t, r).unwrap();
    assert_eq!(ids(b.path()), vec!["A"]);

    let t = b.back().unwrap();
    assert_eq!(t.id, NodeId::new("root"));
    assert!(t.reset);
    let r = catalog.fetch_children(&t.id).await;
    b.finish_navigation(t, r).unwrap();
    assert!(b.path().is_empty());
    assert_eq!(visible_names(&b), vec!["A"]);
}

#[tokio::test]
async fn test_stale_navigation_is_dropped() {
    let catalog = FakeCatalog::default()
        .with_children("slow", &["old"])
        .with_children("fast", &["new"]);
    let mut b = browser();

    let slow = b.begin_navigation(NodeId::new("slow"), false);
    let fast = b.begin_navigation(NodeId::new("fast"), false);
    assert!(fast.generation > slow.generation);

    let r = catalog.fetch_children(&fast.id).await;
    assert_eq!(b.finish_navigation(fast, r).unwrap(), Navigated::Applied);
    let r = catalog.fetch_children(&slow.id).await;
    assert_eq!(b.finish_navigation(slow, r).unwrap(), Navigated::Superseded);

    assert_eq!(ids(b.path()), vec!["fast"]);
    assert_eq!(visible_names(&b), vec!["new"]);
}

#[tokio::test]
async fn test_failed_navigation_keeps_state() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["one", "two"])
        .broken("B");
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.set_filter_text("o");
    b.take_signals();

    let err = b
        .select_node(&catalog, NodeId::new("B"), false)
        .await
        .unwrap_err();
    assert_eq!(err.message, "connection refused");
    assert_eq!(ids(b.path()), vec!["A"]);
    assert_eq!(visible_names(&b), vec!["one", "two"]);
    assert_eq!(b.filter_text(), "o");
    assert!(b.take_signals().is_empty());
}

#[tokio::test]
async fn test_navigation_clears_filter_and_signals_reset() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["apple", "banana"])
        .with_children("B", &["cherry"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    assert_eq!(b.take_signals(), vec![RenderSignal::Reset]);

    b.set_filter_text("ap");
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();
    assert_eq!(b.filter_text(), "");
    assert!(!b.filter_pending());
    assert_eq!(b.take_signals(), vec![RenderSignal::Reset]);
}

#[tokio::test]
async fn test_breadcrumbs_use_cached_names() {
    let mut catalog = FakeCatalog::default().with_children("B", &["C"]);
    catalog
        .children
        .insert("A".to_string(), vec![Node::container("B", "Blues")]);
    let resolver = FakeResolver::default();
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    assert_eq!(b.breadcrumbs(), vec!["A"]);

    b.load_more_rows(&resolver, 0, 0).await;
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();
    // "B" was resolved as a row of "A"; "A" itself never was.
    assert_eq!(b.breadcrumbs(), vec!["A", "Blues"]);
}

// ── Filter ───────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_debounced_filter_applies_last_text_once() {
    let catalog = FakeCatalog::default().with_children("A", &["Rock", "Rap", "Jazz", "Reggae"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.take_signals();

    for text in ["j", "r", "ra", "*a"] {
        b.set_filter_text(text);
        assert_eq!(b.filter_text(), text);
        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(!b.tick());
    }
    // Nothing recomputed while typing.
    assert_eq!(b.row_count(), 4);
    assert!(b.take_signals().is_empty());

    tokio::time::advance(Duration::from_millis(400)).await;
    assert!(b.tick());
    assert!(!b.tick());
    assert_eq!(visible_names(&b), vec!["Rap", "Jazz", "Reggae"]);
    assert_eq!(b.take_signals(), vec![RenderSignal::Reset]);
}

#[tokio::test(start_paused = true)]
async fn test_filter_does_not_touch_path_or_cache() {
    let catalog = FakeCatalog::default().with_children("A", &["Rock", "Jazz"]);
    let resolver = FakeResolver::default();
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.load_more_rows(&resolver, 0, 1).await;

    b.set_filter_text("rock");
    tokio::time::advance(FILTER_QUIET_WINDOW).await;
    assert!(b.tick());

    assert_eq!(ids(b.path()), vec!["A"]);
    assert_eq!(b.cache().len(), 2);
    assert_eq!(b.row_count(), 1);
    assert!(b.is_row_loaded(0));
    assert_eq!(resolver.count(), 2);
}

// ── Virtualization ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_load_more_rows_resolves_only_uncached() {
    let names = numbered("item", 500);
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    let catalog = FakeCatalog::default().with_children("big", &names);
    let resolver = FakeResolver::default();
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("big"), false).await.unwrap();
    assert_eq!(b.row_count(), 500);

    assert_eq!(b.load_more_rows(&resolver, 0, 479).await, 480);
    assert_eq!(resolver.count(), 480);
    b.take_signals();

    assert_eq!(b.load_more_rows(&resolver, 0, 499).await, 20);
    assert_eq!(resolver.count(), 500);
    assert!((0..500).all(|i| b.is_row_loaded(i)));
    assert_eq!(b.take_signals(), vec![RenderSignal::Refresh]);

    // Fully cached range: nothing to do, no signal.
    assert_eq!(b.load_more_rows(&resolver, 100, 200).await, 0);
    assert_eq!(resolver.count(), 500);
    assert!(b.take_signals().is_empty());
}

#[tokio::test]
async fn test_row_bounds() {
    let catalog = FakeCatalog::default().with_children("A", &["x", "y", "z"]);
    let resolver = FakeResolver::default();
    let mut b = browser();
    assert_eq!(b.row_count(), 0);
    assert!(!b.is_row_loaded(0));

    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    assert!(!b.is_row_loaded(3));
    assert!(b.row_state(3).is_none());

    // Stop past the end is clamped; start past the end is empty.
    assert_eq!(b.plan_rows(1, 99).nodes.len(), 2);
    assert!(b.plan_rows(3, 5).is_empty());
    assert!(b.plan_rows(2, 1).is_empty());

    assert_eq!(b.load_more_rows(&resolver, 2, 2).await, 1);
    assert!(b.is_row_loaded(2));
    assert!(!b.is_row_loaded(1));
    assert!(matches!(b.row_state(2), Some(RowState::Loaded(d)) if d.title == "z"));
    assert!(matches!(b.row_state(0), Some(RowState::Pending)));
}

#[tokio::test]
async fn test_stale_batch_merges_into_cache_only() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["a1", "a2"])
        .with_children("B", &["b1", "b2", "b3"]);
    let resolver = FakeResolver::default();
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();

    let batch = b.plan_rows(0, 1);
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();
    b.take_signals();

    let resolved = resolve_rows(&resolver, batch).await;
    assert_eq!(b.merge_rows(resolved), 2);

    assert!(b.cache().has(&NodeId::new("a1")));
    assert!(b.cache().has(&NodeId::new("a2")));
    assert_eq!(visible_names(&b), vec!["b1", "b2", "b3"]);
    assert!((0..3).all(|i| !b.is_row_loaded(i)));
    assert_eq!(b.take_signals(), vec![RenderSignal::Refresh]);
}

#[tokio::test]
async fn test_cache_survives_navigation() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["shared", "a"])
        .with_children("B", &["b", "shared"]);
    let resolver = FakeResolver::default();
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.load_more_rows(&resolver, 0, 1).await;

    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();
    assert!(!b.is_row_loaded(0));
    assert!(b.is_row_loaded(1));
    assert_eq!(b.load_more_rows(&resolver, 0, 1).await, 1);
    assert_eq!(resolver.count(), 3);
}

#[tokio::test]
async fn test_failed_rows_retry_on_next_load() {
    let catalog = FakeCatalog::default().with_children("A", &["ok", "bad"]);
    let resolver = FakeResolver::failing(&["bad"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();

    assert_eq!(b.load_more_rows(&resolver, 0, 1).await, 1);
    assert!(b.is_row_loaded(0));
    assert!(!b.is_row_loaded(1));
    assert!(matches!(b.row_state(1), Some(RowState::Failed)));

    // Planning the row again puts it back to pending.
    let batch = b.plan_rows(0, 1);
    assert_eq!(batch.nodes.len(), 1);
    assert!(matches!(b.row_state(1), Some(RowState::Pending)));

    resolver.heal();
    let resolved = resolve_rows(&resolver, batch).await;
    assert_eq!(b.merge_rows(resolved), 1);
    assert!(b.is_row_loaded(1));
}

#[tokio::test(start_paused = true)]
async fn test_failed_rows_cleared_on_reset() {
    let catalog = FakeCatalog::default().with_children("A", &["bad", "good"]);
    let resolver = FakeResolver::failing(&["bad"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();
    b.load_more_rows(&resolver, 0, 0).await;
    assert!(matches!(b.row_state(0), Some(RowState::Failed)));

    b.set_filter_text("*a");
    tokio::time::advance(FILTER_QUIET_WINDOW).await;
    assert!(b.tick());
    assert!(matches!(b.row_state(0), Some(RowState::Pending)));
}

#[tokio::test]
async fn test_failure_from_older_view_is_not_recorded() {
    let catalog = FakeCatalog::default()
        .with_children("A", &["bad"])
        .with_children("B", &["bad"]);
    let resolver = FakeResolver::failing(&["bad"]);
    let mut b = browser();
    b.select_node(&catalog, NodeId::new("A"), false).await.unwrap();

    let batch = b.plan_rows(0, 0);
    b.select_node(&catalog, NodeId::new("B"), false).await.unwrap();
    let resolved = resolve_rows(&resolver, batch).await;
    assert_eq!(b.merge_rows(resolved), 0);
    assert!(matches!(b.row_state(0), Some(RowState::Pending)));
}

// ── Properties ───────────────────────────────────────────────────────────────

fn path_strategy() -> impl Strategy<Value = Vec<NodeId>> {
    prop::collection::hash_set("[a-f]{1,2}", 0..8)
        .prop_map(|s| s.into_iter().map(NodeId::new).collect())
}

proptest! {
    #[test]
    fn next_path_ends_at_target_without_duplicates(
        path in path_strategy(),
        id in "[a-f]{1,2}",
    ) {
        let id = NodeId::new(id);
        let next = next_path(&path, &id);

        prop_assert_eq!(next.last(), Some(&id));
        let unique: HashSet<&NodeId> = next.iter().collect();
        prop_assert_eq!(unique.len(), next.len());
        match path.iter().position(|p| p == &id) {
            Some(k) => prop_assert_eq!(&next[..], &path[..=k]),
            None => {
                prop_assert_eq!(&next[..path.len()], &path[..]);
                prop_assert_eq!(next.len(), path.len() + 1);
            }
        }
    }

    #[test]
    fn visible_set_is_filtered_children_in_order(
        names in prop::collection::vec("[a-cA-C]{1,4}", 0..20),
        text in "\\*?[a-cA-C]{0,2}",
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        rt.block_on(async {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let catalog = FakeCatalog::default().with_children("root", &refs);
            let mut b = Browser::new(Duration::from_millis(10));
            b.select_node(&catalog, NodeId::new("root"), false).await.unwrap();

            b.set_filter_text(text.clone());
            tokio::time::advance(Duration::from_millis(10)).await;
            prop_assert!(b.tick());

            let expected: Vec<String> = names
                .iter()
                .filter(|n| filter::matches(n, &text))
                .cloned()
                .collect();
            prop_assert_eq!(visible_names(&b), expected);
            Ok(())
        })?;
    }
}
