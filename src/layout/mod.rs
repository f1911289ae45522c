//! Layout tree model
//!
//! The recursive split/leaf/tab structure and the pure helpers that rewrite
//! it. Other modules read leaves through the [`LeafIndex`] produced by
//! [`rebuild_leaf_index`] instead of walking the tree themselves.

pub mod geometry;
pub mod ids;
pub mod tree;
pub mod types;

pub use geometry::{LeafBounds, compute_leaf_bounds, leaf_at};
pub use ids::IdMinter;
pub use tree::{
    LeafIndex, collect_ids, compact_tree, find_leaf_with_tab, find_node, find_parent_split,
    first_leaf, rebuild_leaf_index, remove_node, replace_node,
};
pub use types::{
    Bounds, LayoutNode, Leaf, NodeId, PLACEHOLDER_WIDGET, Point, Split, SplitDirection,
    TEXT_EDITOR_WIDGET, Tab, TabId, WidgetRef,
};
