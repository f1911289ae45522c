//! Capture live layout state into its persisted form

use super::migration::CURRENT_VERSION;
use super::{LastFocused, NodeRecord, PersistedLayout, TabRecord};
use crate::grid::EditorGridState;
use crate::layout::{LayoutNode, Tab};
use crate::regions::RegionState;

/// Snapshot the grid and regions into a versioned document
pub fn capture_layout(
    grid: &EditorGridState,
    regions: &RegionState,
    last_focused: &LastFocused,
) -> PersistedLayout {
    PersistedLayout {
        version: CURRENT_VERSION,
        saved_at: chrono::Utc::now().to_rfc3339(),
        editor_grid: capture_node(grid.root()),
        regions: regions.clone(),
        last_focused: last_focused.clone(),
    }
}

/// Recursively capture a layout node into a serializable form
pub fn capture_node(node: &LayoutNode) -> NodeRecord {
    match node {
        LayoutNode::Leaf(leaf) => NodeRecord::Leaf {
            id: leaf.id.clone(),
            tabs: leaf.tabs.iter().map(capture_tab).collect(),
            active_tab_id: leaf.active_tab_id.clone(),
        },
        LayoutNode::Split(split) => NodeRecord::Split {
            id: split.id.clone(),
            direction: split.direction,
            children: split.children.iter().map(capture_node).collect(),
            sizes: split.sizes.clone(),
        },
    }
}

fn capture_tab(tab: &Tab) -> TabRecord {
    TabRecord {
        id: tab.id.clone(),
        title: tab.title.clone(),
        icon: tab.icon.clone(),
        dirty: tab.dirty,
        closeable: tab.closeable,
        widget: Some(tab.widget.clone()),
        ..TabRecord::default()
    }
}
