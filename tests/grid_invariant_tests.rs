//! Property tests: every state reachable through the reducer is sound and
//! survives a save and restore unchanged
//!
//! Random action sequences are generated as small integer tuples and
//! resolved against the current state, so most of them hit real leaves,
//! tabs and splits while a share still reference stale ids.

mod common;

use common::{single, tab};
use par_grid::grid::{EditorGridState, GridAction, Placement, SplitSeed, check, reduce};
use par_grid::layout::{LayoutNode, SplitDirection, compact_tree};
use par_grid::persistence::{LastFocused, capture_layout, decode_layout, encode_layout};
use par_grid::regions::RegionState;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Step {
    op: u8,
    a: usize,
    b: usize,
    ratio: f64,
    flag: bool,
}

fn step() -> impl Strategy<Value = Step> {
    (0u8..16, 0usize..8, 0usize..8, 0.0f64..1.0, any::<bool>()).prop_map(
        |(op, a, b, ratio, flag)| Step {
            op,
            a,
            b,
            ratio,
            flag,
        },
    )
}

fn leaf_ids(state: &EditorGridState) -> Vec<String> {
    state.leaf_index().keys().cloned().collect()
}

fn tab_ids(state: &EditorGridState) -> Vec<String> {
    state
        .leaf_index()
        .values()
        .flat_map(|leaf| leaf.tabs.iter().map(|t| t.id.clone()))
        .collect()
}

fn split_ids(node: &LayoutNode, out: &mut Vec<(String, usize)>) {
    if let LayoutNode::Split(split) = node {
        out.push((split.id.clone(), split.children.len()));
        for child in &split.children {
            split_ids(child, out);
        }
    }
}

/// Pick an element by index, or a stale id when the pool is empty or `i` overflows
fn pick(pool: &[String], i: usize) -> String {
    pool.get(i % (pool.len() + 1))
        .cloned()
        .unwrap_or_else(|| "stale".to_string())
}

fn resolve(state: &EditorGridState, step: &Step, counter: usize) -> GridAction {
    let leaves = leaf_ids(state);
    let tabs = tab_ids(state);
    let direction = if step.flag {
        SplitDirection::Row
    } else {
        SplitDirection::Col
    };
    match step.op {
        0 | 1 => GridAction::AddTab {
            leaf_id: pick(&leaves, step.a),
            tab: tab(&format!("gen-{}", counter)).with_dirty(step.flag && step.b == 0),
            index: Some(step.b),
        },
        2 => GridAction::activate_tab(pick(&tabs, step.a)),
        3 | 4 => GridAction::CloseTab {
            tab_id: pick(&tabs, step.a),
            force: step.flag,
        },
        5 | 6 => GridAction::SplitLeaf {
            leaf_id: pick(&leaves, step.a),
            direction,
            ratio: Some(step.ratio),
            placement: if step.b % 2 == 0 {
                Placement::Before
            } else {
                Placement::After
            },
            seed: if step.b % 3 == 0 {
                SplitSeed::Empty
            } else {
                SplitSeed::CloneActive
            },
            new_leaf_id: None,
        },
        7 => GridAction::MergeLeaf {
            leaf_id: pick(&leaves, step.a),
        },
        8 => GridAction::MoveTab {
            tab_id: pick(&tabs, step.a),
            target_leaf_id: pick(&leaves, step.b),
            index: None,
        },
        9 => GridAction::ReorderTabs {
            leaf_id: pick(&leaves, step.a),
            from_index: step.b,
            to_index: step.a,
        },
        10 => {
            let mut splits = Vec::new();
            split_ids(state.root(), &mut splits);
            match splits.get(step.a % (splits.len() + 1)) {
                Some((id, count)) => {
                    let mut sizes = vec![step.ratio * 100.0; *count];
                    sizes[0] = 100.0 - step.ratio * 100.0;
                    GridAction::ResizeSplit {
                        split_id: id.clone(),
                        sizes,
                    }
                }
                None => GridAction::ResizeSplit {
                    split_id: "stale".into(),
                    sizes: vec![50.0, 50.0],
                },
            }
        }
        11 => GridAction::CloseAllTabs {
            leaf_id: pick(&leaves, step.a),
            force: step.flag,
        },
        12 => GridAction::CloseTabsToRight {
            leaf_id: pick(&leaves, step.a),
            tab_id: pick(&tabs, step.b),
            force: step.flag,
        },
        13 => GridAction::CloseOtherTabs {
            leaf_id: pick(&leaves, step.a),
            tab_id: pick(&tabs, step.b),
            force: step.flag,
        },
        14 => GridAction::focus_leaf(pick(&leaves, step.a)),
        _ if step.flag => GridAction::ToggleFocusMode,
        _ => GridAction::ExitFocusMode,
    }
}

proptest! {
    #[test]
    fn test_reachable_states_hold_invariants(steps in prop::collection::vec(step(), 1..60)) {
        let mut state = single(&["a", "b"]);
        for (i, step) in steps.iter().enumerate() {
            let action = resolve(&state, step, i);
            state = reduce(&state, action.clone());
            let violations = check(&state);
            prop_assert!(
                violations.is_empty(),
                "after {:?}: {:?}",
                action,
                violations
            );
        }
    }

    #[test]
    fn test_compaction_is_idempotent(steps in prop::collection::vec(step(), 1..40)) {
        let mut state = single(&["a"]);
        for (i, step) in steps.iter().enumerate() {
            state = reduce(&state, resolve(&state, step, i));
        }
        let once = compact_tree(state.root());
        let twice = compact_tree(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_reduce_is_deterministic(steps in prop::collection::vec(step(), 1..40)) {
        let mut left = single(&["a"]);
        let mut right = single(&["a"]);
        for (i, step) in steps.iter().enumerate() {
            left = reduce(&left, resolve(&left, step, i));
            right = reduce(&right, resolve(&right, step, i));
        }
        prop_assert_eq!(left, right);
    }

    #[test]
    fn test_second_close_is_noop(steps in prop::collection::vec(step(), 1..30), pick_tab in 0usize..8) {
        let mut state = single(&["a", "b"]);
        for (i, step) in steps.iter().enumerate() {
            state = reduce(&state, resolve(&state, step, i));
        }
        let tabs = tab_ids(&state);
        prop_assume!(!tabs.is_empty());
        let tab_id = tabs[pick_tab % tabs.len()].clone();
        let close = GridAction::CloseTab { tab_id, force: true };
        let once = reduce(&state, close.clone());
        let twice = reduce(&once, close);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_saved_layout_restores_identically(steps in prop::collection::vec(step(), 1..40)) {
        let mut state = single(&["a", "b"]);
        for (i, step) in steps.iter().enumerate() {
            state = reduce(&state, resolve(&state, step, i));
        }

        let layout = capture_layout(&state, &RegionState::default(), &LastFocused::default());
        let bytes = encode_layout(&layout).unwrap();
        let decoded = decode_layout(&bytes).unwrap();
        let restored = reduce(
            &single(&[]),
            GridAction::RestoreLayout {
                root: decoded.editor_grid,
                active_leaf_id: Some(state.active_leaf_id().to_string()),
            },
        );

        prop_assert_eq!(restored.root(), state.root());
        prop_assert_eq!(restored.active_leaf_id(), state.active_leaf_id());
        prop_assert!(check(&restored).is_empty());
    }
}
