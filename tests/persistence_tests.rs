//! Persistence end to end: file stores, backups, fallback loading,
//! legacy migration and debounced writes.

mod common;

use common::two_panes;
use par_grid::grid::{GridAction, check};
use par_grid::layout::{SplitDirection, TEXT_EDITOR_WIDGET};
use par_grid::persistence::{
    FileStore, LastFocused, LayoutPersister, LayoutStore, LoadSource, MemoryStore,
    PersistenceError, backup_key, capture_layout, decode_layout, default_layout, load_layout,
    save_layout,
};
use par_grid::regions::RegionState;
use par_grid::{GridConfig, LayoutEngine};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

/// Memory store that counts primary writes
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    primary_writes: AtomicUsize,
}

impl LayoutStore for CountingStore {
    fn load(&self, key: &str) -> par_grid::persistence::error::Result<Option<Vec<u8>>> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, bytes: &[u8]) -> par_grid::persistence::error::Result<()> {
        if key == "layout" {
            self.primary_writes.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.save(key, bytes)
    }

    fn remove(&self, key: &str) -> par_grid::persistence::error::Result<()> {
        self.inner.remove(key)
    }
}

fn config_without_backups() -> GridConfig {
    let mut config = GridConfig::default();
    config.persistence.max_backups = 0;
    config
}

// ============================================================================
// Round trip and fallback
// ============================================================================

#[test]
fn test_file_store_round_trip_reproduces_tree() {
    let temp = tempdir().unwrap();
    let store = FileStore::new(temp.path());
    let config = GridConfig::default();

    let state = two_panes(&["a", "b"], &["c"]);
    let state = par_grid::reduce(&state, GridAction::split("right", SplitDirection::Col));
    let layout = capture_layout(&state, &RegionState::default(), &LastFocused::default());
    save_layout(&store, "layout", &layout, 3).unwrap();
    assert!(temp.path().join("layout.json").exists());

    let outcome = load_layout(&store, "layout", &config);
    assert_eq!(outcome.source, LoadSource::Primary);
    assert_eq!(outcome.layout.editor_grid, layout.editor_grid);
    assert_eq!(outcome.layout.regions, layout.regions);
}

#[test]
fn test_corrupt_primary_falls_back_to_backup() {
    let store = MemoryStore::new();
    let config = GridConfig::default();

    let older = capture_layout(
        &two_panes(&["a"], &["b"]),
        &RegionState::default(),
        &LastFocused::default(),
    );
    save_layout(&store, "layout", &older, 3).unwrap();
    save_layout(&store, "layout", &default_layout(&config), 3).unwrap();
    store.save("layout", b"{ truncated").unwrap();

    let outcome = load_layout(&store, "layout", &config);
    assert_eq!(outcome.source, LoadSource::Backup(1));
    assert_eq!(outcome.layout.editor_grid, older.editor_grid);
}

#[test]
fn test_nothing_usable_falls_back_to_default() {
    let store = MemoryStore::new();
    let config = GridConfig::default();
    store.save("layout", b"[]").unwrap();
    store.save(&backup_key("layout", 1), b"null").unwrap();

    let outcome = load_layout(&store, "layout", &config);
    assert_eq!(outcome.source, LoadSource::Default);
    let expected = default_layout(&config);
    assert_eq!(outcome.layout.editor_grid, expected.editor_grid);
    assert_eq!(outcome.layout.regions, expected.regions);
}

#[test]
fn test_newer_version_is_rejected() {
    let payload = br#"{"version": 99, "editorGrid": {"type": "leaf", "id": "a"}, "regions": {}}"#;
    assert!(matches!(
        decode_layout(payload),
        Err(PersistenceError::UnsupportedVersion { found: 99, .. })
    ));
}

#[test]
fn test_backups_rotate_oldest_first() {
    let store = MemoryStore::new();
    let config = GridConfig::default();
    let mut layout = default_layout(&config);
    for height in [250.0, 300.0, 350.0, 400.0] {
        layout.regions.panel.height = height;
        save_layout(&store, "layout", &layout, 2).unwrap();
    }

    let height = |key: &str| {
        decode_layout(&store.load(key).unwrap().unwrap())
            .unwrap()
            .regions
            .panel
            .height
    };
    assert_eq!(height("layout"), 400.0);
    assert_eq!(height("layout.bak.1"), 350.0);
    assert_eq!(height("layout.bak.2"), 300.0);
    assert!(store.load("layout.bak.3").unwrap().is_none());
}

// ============================================================================
// Legacy payloads
// ============================================================================

#[test]
fn test_legacy_payload_migrates_and_restores() {
    let temp = tempdir().unwrap();
    let store = FileStore::new(temp.path());
    std::fs::write(
        temp.path().join("layout.json"),
        r#"{
            "layout": {
                "type": "split",
                "direction": "row",
                "sizes": [1, 3],
                "children": [
                    {"type": "leaf", "id": "l1", "tabs": [
                        {"id": "t1", "title": "main.rs", "content": "fn main() {}", "language": "rust"}
                    ]},
                    {"type": "leaf", "id": "l2", "tabs": [{"id": "t2", "title": "Welcome"}]}
                ]
            },
            "bottomPanel": {"visible": true, "height": 120},
            "activeLeafId": "l2"
        }"#,
    )
    .unwrap();

    let outcome = load_layout(&store, "layout", &GridConfig::default());
    assert_eq!(outcome.source, LoadSource::Primary);
    // Panel height raised to the region minimum
    assert!(outcome.layout.regions.panel.visible);
    assert_eq!(outcome.layout.regions.panel.height, 200.0);
    assert_eq!(outcome.layout.last_focused.leaf_id.as_deref(), Some("l2"));

    let engine = LayoutEngine::from_layout(GridConfig::default(), outcome.layout, None);
    let state = engine.state();
    assert_eq!(state.active_leaf_id(), "l2");
    let tab = state.tab("t1").expect("legacy tab restored");
    assert_eq!(tab.widget.kind, TEXT_EDITOR_WIDGET);
    assert_eq!(tab.widget.props["language"], "rust");
    let sizes = &state.root().as_split().expect("split").sizes;
    assert!((sizes[0] - 25.0).abs() < 1e-9);
    assert!(check(state).is_empty());
}

// ============================================================================
// Debounced writes
// ============================================================================

#[tokio::test]
async fn test_burst_of_mutations_costs_one_write() {
    let store = Arc::new(CountingStore::default());
    let (mut engine, source) = LayoutEngine::load(store.clone(), config_without_backups()).await;
    assert_eq!(source, LoadSource::Default);

    let leaf = engine.state().active_leaf_id().to_string();
    for _ in 0..5 {
        engine.dispatch(GridAction::split(leaf.clone(), SplitDirection::Row));
    }
    assert_eq!(store.primary_writes.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_millis(900)).await;
    assert_eq!(store.primary_writes.load(Ordering::SeqCst), 1);

    let saved = decode_layout(&store.load("layout").unwrap().unwrap()).unwrap();
    let current = engine.snapshot();
    assert_eq!(saved.editor_grid, current.editor_grid);
    assert_eq!(saved.last_focused, current.last_focused);
}

#[tokio::test]
async fn test_flush_writes_latest_state() {
    let store = Arc::new(MemoryStore::new());
    let mut persister = LayoutPersister::new(
        store.clone(),
        "layout",
        0,
        Duration::from_secs(30),
        tokio::runtime::Handle::current(),
    );
    let config = GridConfig::default();

    let mut first = default_layout(&config);
    first.regions.primary_side_bar.width = 240.0;
    let mut latest = first.clone();
    latest.regions.primary_side_bar.width = 420.0;
    persister.schedule(first);
    persister.schedule(latest);

    assert!(persister.flush());
    let saved = decode_layout(&store.load("layout").unwrap().unwrap()).unwrap();
    assert_eq!(saved.regions.primary_side_bar.width, 420.0);
}

#[tokio::test]
async fn test_engine_reload_restores_focus() {
    let temp = tempdir().unwrap();
    let store: Arc<dyn LayoutStore> = Arc::new(FileStore::new(temp.path()));

    let (mut engine, _) = LayoutEngine::load(Arc::clone(&store), GridConfig::default()).await;
    engine.dispatch(GridAction::split("leaf-1", SplitDirection::Row));
    let first = engine.state().root().as_split().expect("split").children[0]
        .id()
        .to_string();
    engine.dispatch(GridAction::focus_leaf(first.clone()));
    assert!(engine.flush());

    let (reloaded, source) = LayoutEngine::load(store, GridConfig::default()).await;
    assert_eq!(source, LoadSource::Primary);
    assert_eq!(reloaded.state().active_leaf_id(), first);
    assert_eq!(reloaded.focus_manager().focused(), Some(first.as_str()));
}
