//! Pixel geometry for the layout tree
//!
//! Distributes an editor area across the tree by split sizes. The renderer
//! owns the real pixels; these bounds feed directional focus navigation and
//! give callers a consistent rectangle per leaf for drop-zone hit testing.

use super::types::{Bounds, LayoutNode, NodeId, Point, SplitDirection};
use indexmap::IndexMap;

/// Bounds of every leaf, in tree traversal order
pub type LeafBounds = IndexMap<NodeId, Bounds>;

/// Calculate bounds for all leaves given the total available area
///
/// `gap` is the divider thickness placed between adjacent children.
pub fn compute_leaf_bounds(root: &LayoutNode, area: Bounds, gap: f64) -> LeafBounds {
    let mut out = LeafBounds::new();
    calculate_bounds(root, area, gap.max(0.0), &mut out);
    out
}

fn calculate_bounds(node: &LayoutNode, bounds: Bounds, gap: f64, out: &mut LeafBounds) {
    match node {
        LayoutNode::Leaf(leaf) => {
            out.insert(leaf.id.clone(), bounds);
        }
        LayoutNode::Split(split) => {
            let count = split.children.len();
            if count == 0 {
                return;
            }
            let total = match split.direction {
                SplitDirection::Row => bounds.width,
                SplitDirection::Col => bounds.height,
            };
            let usable = (total - gap * (count - 1) as f64).max(0.0);
            let size_sum: f64 = split.sizes.iter().sum();

            let mut offset = 0.0;
            for (i, child) in split.children.iter().enumerate() {
                let share = match split.sizes.get(i) {
                    Some(size) if size_sum > 0.0 => size / size_sum,
                    _ => 1.0 / count as f64,
                };
                // Last child absorbs rounding so the children tile the area exactly
                let extent = if i + 1 == count {
                    (usable - offset).max(0.0)
                } else {
                    usable * share
                };
                let child_bounds = match split.direction {
                    SplitDirection::Row => Bounds::new(
                        bounds.x + offset + gap * i as f64,
                        bounds.y,
                        extent,
                        bounds.height,
                    ),
                    SplitDirection::Col => Bounds::new(
                        bounds.x,
                        bounds.y + offset + gap * i as f64,
                        bounds.width,
                        extent,
                    ),
                };
                calculate_bounds(child, child_bounds, gap, out);
                offset += extent;
            }
        }
    }
}

/// Leaf under a point, if any
pub fn leaf_at(bounds: &LeafBounds, point: Point) -> Option<&str> {
    bounds
        .iter()
        .find(|(_, b)| b.contains(point))
        .map(|(id, _)| id.as_str())
}
