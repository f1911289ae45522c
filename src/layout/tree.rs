//! Structural algebra on the layout tree
//!
//! Every function here is pure: it reads a snapshot and, when it changes
//! anything, returns a new root that shares all untouched subtrees with the
//! input. Only the nodes on the path from the root to the change are
//! reallocated, so updates are O(depth).

use super::types::{Leaf, LayoutNode, NodeId, Split};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Authoritative lookup table from leaf id to leaf, in tree traversal order
pub type LeafIndex = IndexMap<NodeId, Arc<Leaf>>;

/// Child positions from the root down to a node
fn path_to(node: &LayoutNode, target_id: &str) -> Option<Vec<usize>> {
    if node.id() == target_id {
        return Some(Vec::new());
    }
    let LayoutNode::Split(split) = node else {
        return None;
    };
    for (i, child) in split.children.iter().enumerate() {
        if let Some(mut path) = path_to(child, target_id) {
            path.insert(0, i);
            return Some(path);
        }
    }
    None
}

/// Rebuild the spine along `path`, swapping the node at its end
fn replace_at_path(node: &LayoutNode, path: &[usize], replacement: LayoutNode) -> LayoutNode {
    let Some((&index, rest)) = path.split_first() else {
        return replacement;
    };
    match node {
        LayoutNode::Split(split) => {
            let mut updated = Split::clone(split);
            updated.children[index] = replace_at_path(&split.children[index], rest, replacement);
            LayoutNode::split(updated)
        }
        // Paths are computed from this same tree, so a leaf never has children
        LayoutNode::Leaf(_) => node.clone(),
    }
}

/// Return a new tree with the node matching `target_id` replaced
///
/// Returns `None` if no node has that id.
pub fn replace_node(root: &LayoutNode, target_id: &str, replacement: LayoutNode) -> Option<LayoutNode> {
    let path = path_to(root, target_id)?;
    Some(replace_at_path(root, &path, replacement))
}

/// Collapse every split left with exactly one child into that child
///
/// Idempotent; returns the input allocation when nothing needed collapsing.
pub fn compact_tree(root: &LayoutNode) -> LayoutNode {
    match root {
        LayoutNode::Leaf(_) => root.clone(),
        LayoutNode::Split(split) => {
            if split.children.len() == 1 {
                return compact_tree(&split.children[0]);
            }
            let children: Vec<LayoutNode> = split.children.iter().map(compact_tree).collect();
            let unchanged = children
                .iter()
                .zip(split.children.iter())
                .all(|(new, old)| new.ptr_eq(old));
            if unchanged {
                root.clone()
            } else {
                LayoutNode::split(Split {
                    id: split.id.clone(),
                    direction: split.direction,
                    children,
                    sizes: split.sizes.clone(),
                })
            }
        }
    }
}

/// Single traversal producing the leaf index
pub fn rebuild_leaf_index(root: &LayoutNode) -> LeafIndex {
    fn walk(node: &LayoutNode, index: &mut LeafIndex) {
        match node {
            LayoutNode::Leaf(leaf) => {
                index.insert(leaf.id.clone(), Arc::clone(leaf));
            }
            LayoutNode::Split(split) => {
                for child in &split.children {
                    walk(child, index);
                }
            }
        }
    }

    let mut index = LeafIndex::new();
    walk(root, &mut index);
    index
}

/// Find the split directly containing `id`, with the child position of `id`
pub fn find_parent_split(root: &LayoutNode, id: &str) -> Option<(Arc<Split>, usize)> {
    let LayoutNode::Split(split) = root else {
        return None;
    };
    for (i, child) in split.children.iter().enumerate() {
        if child.id() == id {
            return Some((Arc::clone(split), i));
        }
        if let Some(found) = find_parent_split(child, id) {
            return Some(found);
        }
    }
    None
}

/// Find any node by id
pub fn find_node<'a>(root: &'a LayoutNode, id: &str) -> Option<&'a LayoutNode> {
    if root.id() == id {
        return Some(root);
    }
    match root {
        LayoutNode::Leaf(_) => None,
        LayoutNode::Split(split) => split.children.iter().find_map(|c| find_node(c, id)),
    }
}

/// Find the leaf that holds `tab_id`
pub fn find_leaf_with_tab<'a>(index: &'a LeafIndex, tab_id: &str) -> Option<&'a Arc<Leaf>> {
    index.values().find(|leaf| leaf.contains_tab(tab_id))
}

/// First leaf of a subtree in traversal order
pub fn first_leaf(node: &LayoutNode) -> Option<&Arc<Leaf>> {
    match node {
        LayoutNode::Leaf(leaf) => Some(leaf),
        LayoutNode::Split(split) => split.children.first().and_then(first_leaf),
    }
}

/// Remove a node from its parent split
///
/// The removed child's share is handed to its siblings in proportion to their
/// sizes. A parent left with a single child is then collapsed by
/// [`compact_tree`]. Returns `None` when `id` is the root or not found.
pub fn remove_node(root: &LayoutNode, id: &str) -> Option<LayoutNode> {
    let (parent, index) = find_parent_split(root, id)?;

    let mut children = parent.children.clone();
    let mut sizes = parent.sizes.clone();
    children.remove(index);
    if index < sizes.len() {
        sizes.remove(index);
    }

    let total: f64 = sizes.iter().sum();
    if sizes.len() == children.len() && total > 0.0 {
        for size in &mut sizes {
            *size = *size * 100.0 / total;
        }
    } else {
        let share = 100.0 / children.len().max(1) as f64;
        sizes = vec![share; children.len()];
    }

    let replacement = LayoutNode::split(Split {
        id: parent.id.clone(),
        direction: parent.direction,
        children,
        sizes,
    });
    let updated = replace_node(root, &parent.id, replacement)?;
    Some(compact_tree(&updated))
}

/// Every node id and tab id in the tree
pub fn collect_ids(root: &LayoutNode) -> HashSet<String> {
    fn walk(node: &LayoutNode, ids: &mut HashSet<String>) {
        match node {
            LayoutNode::Leaf(leaf) => {
                ids.insert(leaf.id.clone());
                ids.extend(leaf.tabs.iter().map(|t| t.id.clone()));
            }
            LayoutNode::Split(split) => {
                ids.insert(split.id.clone());
                for child in &split.children {
                    walk(child, ids);
                }
            }
        }
    }

    let mut ids = HashSet::new();
    walk(root, &mut ids);
    ids
}
