//! Reducer scenarios over whole trees
//!
//! Covers the documented split/close/reorder/resize/restore walkthroughs plus
//! compaction cascades and focus history upkeep across structural changes.

mod common;

use common::{leaf, single, tab, tab_ids, two_panes};
use par_grid::grid::{GridAction, GridSettings, check, reduce};
use par_grid::layout::{LayoutNode, Split, SplitDirection, TEXT_EDITOR_WIDGET};
use par_grid::persistence::{NodeRecord, TabRecord, capture_node};
use par_grid::EditorGridState;

fn split_main(state: &EditorGridState) -> EditorGridState {
    reduce(
        state,
        GridAction::SplitLeaf {
            leaf_id: "main".into(),
            direction: SplitDirection::Row,
            ratio: Some(0.5),
            placement: Default::default(),
            seed: Default::default(),
            new_leaf_id: None,
        },
    )
}

// ============================================================================
// Split and close
// ============================================================================

#[test]
fn test_split_creates_row_with_cloned_tab() {
    let state = split_main(&single(&["a"]));

    let split = state.root().as_split().expect("root should be a split");
    assert_eq!(split.direction, SplitDirection::Row);
    assert_eq!(split.sizes, vec![50.0, 50.0]);
    assert_eq!(split.children.len(), 2);
    assert_eq!(split.children[0].id(), "main");
    assert_eq!(tab_ids(&state, "main"), vec!["a".to_string()]);

    let new_leaf = split.children[1].as_leaf().expect("second child should be a leaf");
    assert_eq!(state.active_leaf_id(), new_leaf.id);
    assert_eq!(new_leaf.tabs.len(), 1);
    assert_ne!(new_leaf.tabs[0].id, "a");
    assert_eq!(new_leaf.tabs[0].title, "A");
    assert!(check(&state).is_empty());
}

#[test]
fn test_closing_clone_compacts_back_to_single_leaf() {
    let split = split_main(&single(&["a"]));
    let clone_id = split.active_tab().expect("clone is active").id.clone();

    let state = reduce(&split, GridAction::close_tab(clone_id));
    assert!(state.root().is_leaf());
    assert_eq!(state.root().id(), "main");
    assert_eq!(state.active_leaf_id(), "main");
    assert_eq!(state.leaf_count(), 1);
    assert!(check(&state).is_empty());
}

#[test]
fn test_close_is_idempotent() {
    let state = single(&["a", "b"]);
    let once = reduce(&state, GridAction::close_tab("b"));
    let twice = reduce(&once, GridAction::close_tab("b"));
    assert_eq!(once, twice);
    assert_eq!(tab_ids(&twice, "main"), vec!["a".to_string()]);
}

#[test]
fn test_dirty_tab_close_is_refused_without_force() {
    let root = LayoutNode::leaf(par_grid::Leaf::new(
        "main",
        vec![tab("a").with_dirty(true), tab("b")],
    ));
    let state = EditorGridState::from_root(root, None, GridSettings::default(), 1);

    let refused = reduce(&state, GridAction::close_tab("a"));
    assert_eq!(refused, state);
    assert!(refused.tab("a").is_some());

    let forced = reduce(
        &state,
        GridAction::CloseTab {
            tab_id: "a".into(),
            force: true,
        },
    );
    assert!(forced.tab("a").is_none());
}

#[test]
fn test_compaction_cascades_through_nested_splits() {
    // left | (top / bottom)
    let root = LayoutNode::split(Split {
        id: "outer".into(),
        direction: SplitDirection::Row,
        children: vec![
            leaf("left", &["a"]),
            LayoutNode::split(Split {
                id: "inner".into(),
                direction: SplitDirection::Col,
                children: vec![leaf("top", &["b"]), leaf("bottom", &["c"])],
                sizes: vec![50.0, 50.0],
            }),
        ],
        sizes: vec![30.0, 70.0],
    });
    let state = EditorGridState::from_root(root, Some("bottom"), GridSettings::default(), 1);

    let state = reduce(&state, GridAction::close_tab("c"));
    let outer = state.root().as_split().expect("outer split survives");
    assert_eq!(outer.children.len(), 2);
    assert_eq!(outer.children[1].id(), "top");
    assert_eq!(outer.sizes, vec![30.0, 70.0]);
    assert!(state.leaf("bottom").is_none());
    assert!(state.leaf_index().contains_key("top"));
    assert!(check(&state).is_empty());
}

#[test]
fn test_empty_leaf_in_wide_split_is_removed() {
    let root = LayoutNode::split(Split {
        id: "row".into(),
        direction: SplitDirection::Row,
        children: vec![leaf("a", &["1"]), leaf("b", &["2"]), leaf("c", &["3"])],
        sizes: vec![20.0, 30.0, 50.0],
    });
    let state = EditorGridState::from_root(root, Some("b"), GridSettings::default(), 1);

    let state = reduce(&state, GridAction::close_tab("2"));
    let split = state.root().as_split().expect("still a split");
    assert_eq!(split.children.len(), 2);
    assert_ne!(state.active_leaf_id(), "b");
    assert!(check(&state).is_empty());
}

#[test]
fn test_closing_active_leaf_refocuses_previous_leaf() {
    let state = two_panes(&["a"], &["b"]);
    let state = reduce(&state, GridAction::focus_leaf("right"));
    assert_eq!(state.focus_history().last().map(String::as_str), Some("right"));

    let state = reduce(&state, GridAction::close_tab("b"));
    assert_eq!(state.active_leaf_id(), "left");
    assert!(state.focus_history().iter().all(|id| id != "right"));
}

// ============================================================================
// Tabs within and across leaves
// ============================================================================

#[test]
fn test_reorder_moves_first_tab_to_end() {
    let state = single(&["a", "b", "c"]);
    let state = reduce(
        &state,
        GridAction::ReorderTabs {
            leaf_id: "main".into(),
            from_index: 0,
            to_index: 2,
        },
    );
    assert_eq!(tab_ids(&state, "main"), vec!["b", "c", "a"]);
}

#[test]
fn test_reorder_out_of_range_is_noop() {
    let state = single(&["a", "b"]);
    let next = reduce(
        &state,
        GridAction::ReorderTabs {
            leaf_id: "main".into(),
            from_index: 0,
            to_index: 5,
        },
    );
    assert_eq!(next, state);
}

#[test]
fn test_move_tab_between_leaves() {
    let state = two_panes(&["a", "b"], &["c"]);
    let state = reduce(
        &state,
        GridAction::MoveTab {
            tab_id: "b".into(),
            target_leaf_id: "right".into(),
            index: Some(0),
        },
    );
    assert_eq!(tab_ids(&state, "left"), vec!["a"]);
    assert_eq!(tab_ids(&state, "right"), vec!["b", "c"]);
    assert_eq!(state.active_leaf_id(), "right");
    assert_eq!(state.active_tab().map(|t| t.id.as_str()), Some("b"));
    assert_eq!(
        state.leaf("left").and_then(|l| l.active_tab_id.clone()),
        Some("a".to_string())
    );
}

#[test]
fn test_activate_tab_switches_leaf() {
    let state = two_panes(&["a"], &["b", "c"]);
    let state = reduce(&state, GridAction::activate_tab("c"));
    assert_eq!(state.active_leaf_id(), "right");
    assert_eq!(state.active_tab().map(|t| t.id.as_str()), Some("c"));
}

#[test]
fn test_add_tab_with_node_id_is_refused() {
    let state = two_panes(&["a"], &["b"]);
    for taken in ["left", "right", "root"] {
        let next = reduce(
            &state,
            GridAction::AddTab {
                leaf_id: "right".into(),
                tab: tab(taken),
                index: None,
            },
        );
        assert_eq!(next, state);
        assert!(check(&next).is_empty());
    }
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_enforces_minimum_and_renormalizes() {
    let state = two_panes(&["a"], &["b"]);
    let state = reduce(
        &state,
        GridAction::ResizeSplit {
            split_id: "root".into(),
            sizes: vec![95.0, 5.0],
        },
    );
    let sizes = &state.root().as_split().expect("split").sizes;
    let total: f64 = sizes.iter().sum();
    assert!((total - 100.0).abs() < 0.01);
    assert!(sizes[1] >= 10.0 - 1e-9);
    assert!((sizes[0] - 90.0).abs() < 1e-6);
}

#[test]
fn test_resize_missing_split_is_noop() {
    let state = two_panes(&["a"], &["b"]);
    let next = reduce(
        &state,
        GridAction::ResizeSplit {
            split_id: "nope".into(),
            sizes: vec![40.0, 60.0],
        },
    );
    assert_eq!(next, state);
}

// ============================================================================
// Restore
// ============================================================================

#[test]
fn test_restore_infers_editor_widget_from_legacy_content() {
    let record = NodeRecord::Leaf {
        id: "main".into(),
        tabs: vec![TabRecord {
            id: "t1".into(),
            title: "notes.md".into(),
            closeable: true,
            content: Some("# Notes".into()),
            ..Default::default()
        }],
        active_tab_id: None,
    };
    let state = reduce(
        &EditorGridState::default(),
        GridAction::RestoreLayout {
            root: record,
            active_leaf_id: None,
        },
    );

    let restored = state.tab("t1").expect("legacy tab kept");
    assert_eq!(restored.widget.kind, TEXT_EDITOR_WIDGET);
    assert_eq!(restored.widget.props["content"], "# Notes");
    assert_eq!(state.active_leaf_id(), "main");
}

#[test]
fn test_restore_picks_valid_active_leaf() {
    let record = NodeRecord::Split {
        id: "s".into(),
        direction: SplitDirection::Col,
        children: vec![
            NodeRecord::Leaf {
                id: "x".into(),
                tabs: vec![],
                active_tab_id: None,
            },
            NodeRecord::Leaf {
                id: "y".into(),
                tabs: vec![],
                active_tab_id: None,
            },
        ],
        sizes: vec![50.0, 50.0],
    };
    let state = reduce(
        &EditorGridState::default(),
        GridAction::RestoreLayout {
            root: record,
            active_leaf_id: Some("gone".into()),
        },
    );
    assert_eq!(state.active_leaf_id(), "x");
    assert!(check(&state).is_empty());
}

#[test]
fn test_restore_keeps_current_leaf_when_none_requested() {
    let state = reduce(&two_panes(&["a"], &["b"]), GridAction::focus_leaf("right"));
    let record = capture_node(state.root());

    for requested in [None, Some("gone".to_string())] {
        let restored = reduce(
            &state,
            GridAction::RestoreLayout {
                root: record.clone(),
                active_leaf_id: requested,
            },
        );
        assert_eq!(restored.active_leaf_id(), "right");
    }

    // An explicit, existing request still wins
    let restored = reduce(
        &state,
        GridAction::RestoreLayout {
            root: record,
            active_leaf_id: Some("left".into()),
        },
    );
    assert_eq!(restored.active_leaf_id(), "left");
}
