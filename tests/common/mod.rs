//! Shared integration test helpers for par-grid.
//!
//! Include with `mod common;` at the top of a test file. The
//! `#[allow(dead_code)]` keeps files that use only some helpers quiet.

#![allow(dead_code)]

use par_grid::grid::{EditorGridState, GridSettings};
use par_grid::layout::{LayoutNode, Leaf, Split, SplitDirection, Tab, WidgetRef};

/// A clean, closeable placeholder tab titled after its id
pub fn tab(id: &str) -> Tab {
    Tab::new(id, id.to_uppercase(), WidgetRef::placeholder())
}

pub fn leaf(id: &str, tabs: &[&str]) -> LayoutNode {
    LayoutNode::leaf(Leaf::new(id, tabs.iter().map(|t| tab(t)).collect()))
}

/// State whose only leaf is `main` with the given tabs
pub fn single(tabs: &[&str]) -> EditorGridState {
    EditorGridState::from_root(leaf("main", tabs), None, GridSettings::default(), 1)
}

/// `left | right` row split at 50/50, `left` active
pub fn two_panes(left: &[&str], right: &[&str]) -> EditorGridState {
    let root = LayoutNode::split(Split {
        id: "root".into(),
        direction: SplitDirection::Row,
        children: vec![leaf("left", left), leaf("right", right)],
        sizes: vec![50.0, 50.0],
    });
    EditorGridState::from_root(root, Some("left"), GridSettings::default(), 1)
}

/// Tab ids of a leaf in order
pub fn tab_ids(state: &EditorGridState, leaf_id: &str) -> Vec<String> {
    state
        .leaf(leaf_id)
        .map(|leaf| leaf.tabs.iter().map(|t| t.id.clone()).collect())
        .unwrap_or_default()
}
