//! Structural checks over a grid snapshot
//!
//! `check` reports every broken rule instead of stopping at the first, so a
//! single run over a persisted layout shows everything that needs repair.

use super::sizes::sizes_valid;
use super::state::EditorGridState;
use crate::layout::{LayoutNode, NodeId, rebuild_leaf_index};
use std::collections::HashSet;
use std::fmt;

/// One broken invariant
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    TooFewChildren { split_id: NodeId, count: usize },
    SizeCountMismatch { split_id: NodeId, sizes: usize, children: usize },
    BadSizes { split_id: NodeId, sizes: Vec<f64> },
    DuplicateId(String),
    ActiveTabMissing { leaf_id: NodeId },
    LeafIndexMismatch,
    ActiveLeafMissing(NodeId),
    StaleFocusHistory(NodeId),
    DuplicateFocusHistory(NodeId),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::TooFewChildren { split_id, count } => {
                write!(f, "split {} has {} child(ren), needs at least 2", split_id, count)
            }
            Violation::SizeCountMismatch {
                split_id,
                sizes,
                children,
            } => write!(
                f,
                "split {} has {} sizes for {} children",
                split_id, sizes, children
            ),
            Violation::BadSizes { split_id, sizes } => write!(
                f,
                "split {} sizes {:?} do not sum to 100 or fall below the minimum",
                split_id, sizes
            ),
            Violation::DuplicateId(id) => write!(f, "id {} appears more than once", id),
            Violation::ActiveTabMissing { leaf_id } => {
                write!(f, "leaf {} has tabs but no valid active tab", leaf_id)
            }
            Violation::LeafIndexMismatch => f.write_str("leaf index does not match the tree"),
            Violation::ActiveLeafMissing(id) => write!(f, "active leaf {} is not in the tree", id),
            Violation::StaleFocusHistory(id) => {
                write!(f, "focus history names missing leaf {}", id)
            }
            Violation::DuplicateFocusHistory(id) => {
                write!(f, "focus history lists {} more than once", id)
            }
        }
    }
}

/// Every invariant broken by `state`; empty when the snapshot is sound
pub fn check(state: &EditorGridState) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_node(
        state.root(),
        state.settings().min_split_size,
        &mut HashSet::new(),
        &mut violations,
    );

    let rebuilt = rebuild_leaf_index(state.root());
    let index_matches = rebuilt.len() == state.leaf_index().len()
        && rebuilt
            .iter()
            .all(|(id, leaf)| state.leaf_index().get(id) == Some(leaf));
    if !index_matches {
        violations.push(Violation::LeafIndexMismatch);
    }

    if !rebuilt.contains_key(state.active_leaf_id()) {
        violations.push(Violation::ActiveLeafMissing(
            state.active_leaf_id().to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for id in state.focus_history() {
        if !rebuilt.contains_key(id) {
            violations.push(Violation::StaleFocusHistory(id.clone()));
        }
        if !seen.insert(id.as_str()) {
            violations.push(Violation::DuplicateFocusHistory(id.clone()));
        }
    }

    violations
}

fn check_node(
    node: &LayoutNode,
    min: f64,
    ids: &mut HashSet<String>,
    violations: &mut Vec<Violation>,
) {
    if !ids.insert(node.id().to_string()) {
        violations.push(Violation::DuplicateId(node.id().to_string()));
    }
    match node {
        LayoutNode::Leaf(leaf) => {
            for tab in &leaf.tabs {
                if !ids.insert(tab.id.clone()) {
                    violations.push(Violation::DuplicateId(tab.id.clone()));
                }
            }
            if !leaf.is_empty() && leaf.active_tab().is_none() {
                violations.push(Violation::ActiveTabMissing {
                    leaf_id: leaf.id.clone(),
                });
            }
        }
        LayoutNode::Split(split) => {
            if split.children.len() < 2 {
                violations.push(Violation::TooFewChildren {
                    split_id: split.id.clone(),
                    count: split.children.len(),
                });
            }
            if split.sizes.len() != split.children.len() {
                violations.push(Violation::SizeCountMismatch {
                    split_id: split.id.clone(),
                    sizes: split.sizes.len(),
                    children: split.children.len(),
                });
            } else if !sizes_valid(&split.sizes, min) {
                violations.push(Violation::BadSizes {
                    split_id: split.id.clone(),
                    sizes: split.sizes.clone(),
                });
            }
            for child in &split.children {
                check_node(child, min, ids, violations);
            }
        }
    }
}
