//! Core types for the layout tree
//!
//! This module defines the fundamental data structures for the editor grid:
//! - An n-ary tree of splits and leaves for arbitrary nesting
//! - Tabs carrying an opaque widget reference
//! - Pixel bounds used by geometry helpers, docking and focus navigation
//!
//! Nodes are reference counted so that an updated tree shares every subtree
//! that was not on the path of the change.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifier of a split or leaf node
pub type NodeId = String;

/// Identifier of a tab
pub type TabId = String;

/// Widget type used when nothing better is known
pub const PLACEHOLDER_WIDGET: &str = "placeholder";

/// Widget type of a plain text editor
pub const TEXT_EDITOR_WIDGET: &str = "text-editor";

/// Axis along which a split lays out its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// Children side by side, left to right
    #[serde(alias = "horizontal")]
    Row,
    /// Children stacked, top to bottom
    #[serde(alias = "vertical", alias = "column")]
    Col,
}

/// Opaque reference to the widget a tab shows
///
/// The engine stores and forwards this pair; it never interprets `props`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRef {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub props: serde_json::Value,
}

impl WidgetRef {
    pub fn new(kind: impl Into<String>, props: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            props,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_WIDGET, serde_json::Value::Object(Default::default()))
    }

    pub fn is_placeholder(&self) -> bool {
        self.kind == PLACEHOLDER_WIDGET
    }
}

/// A unit of content inside a leaf
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub icon: Option<String>,
    /// Unsaved changes; closing requires `force`
    pub dirty: bool,
    pub closeable: bool,
    pub widget: WidgetRef,
}

impl Tab {
    /// Create a clean, closeable tab
    pub fn new(id: impl Into<TabId>, title: impl Into<String>, widget: WidgetRef) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: None,
            dirty: false,
            closeable: true,
            widget,
        }
    }

    /// The tab shown in an otherwise empty editor
    pub fn placeholder(id: impl Into<TabId>) -> Self {
        Self::new(id, "Welcome", WidgetRef::placeholder())
    }

    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    pub fn with_closeable(mut self, closeable: bool) -> Self {
        self.closeable = closeable;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// A node holding an ordered list of tabs, at most one of them active
#[derive(Debug, Clone, PartialEq)]
pub struct Leaf {
    pub id: NodeId,
    pub tabs: Vec<Tab>,
    /// Always one of `tabs` when `tabs` is non-empty, unset otherwise
    pub active_tab_id: Option<TabId>,
}

impl Leaf {
    /// Create a leaf; the first tab becomes active
    pub fn new(id: impl Into<NodeId>, tabs: Vec<Tab>) -> Self {
        let active_tab_id = tabs.first().map(|t| t.id.clone());
        Self {
            id: id.into(),
            tabs,
            active_tab_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn contains_tab(&self, tab_id: &str) -> bool {
        self.tab_index(tab_id).is_some()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let active = self.active_tab_id.as_deref()?;
        self.tabs.iter().find(|t| t.id == active)
    }

    /// Point `active_tab_id` at a tab that exists, preferring the current one
    pub fn repair_active_tab(&mut self) {
        let valid = self
            .active_tab_id
            .as_deref()
            .is_some_and(|id| self.contains_tab(id));
        if !valid {
            self.active_tab_id = self.tabs.first().map(|t| t.id.clone());
        }
    }
}

/// A node dividing space among two or more children along one axis
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub id: NodeId,
    pub direction: SplitDirection,
    pub children: Vec<LayoutNode>,
    /// Percentages parallel to `children`, summing to 100
    pub sizes: Vec<f64>,
}

/// A node in the layout tree
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    Split(Arc<Split>),
    Leaf(Arc<Leaf>),
}

impl LayoutNode {
    /// Create a new leaf node
    pub fn leaf(leaf: Leaf) -> Self {
        LayoutNode::Leaf(Arc::new(leaf))
    }

    /// Create a new split node
    pub fn split(split: Split) -> Self {
        LayoutNode::Split(Arc::new(split))
    }

    pub fn id(&self) -> &str {
        match self {
            LayoutNode::Split(split) => &split.id,
            LayoutNode::Leaf(leaf) => &leaf.id,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LayoutNode::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Arc<Leaf>> {
        match self {
            LayoutNode::Leaf(leaf) => Some(leaf),
            LayoutNode::Split(_) => None,
        }
    }

    pub fn as_split(&self) -> Option<&Arc<Split>> {
        match self {
            LayoutNode::Split(split) => Some(split),
            LayoutNode::Leaf(_) => None,
        }
    }

    /// Same node allocation (not just equal contents)
    pub fn ptr_eq(&self, other: &LayoutNode) -> bool {
        match (self, other) {
            (LayoutNode::Split(a), LayoutNode::Split(b)) => Arc::ptr_eq(a, b),
            (LayoutNode::Leaf(a), LayoutNode::Leaf(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Count leaves in this subtree
    pub fn leaf_count(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 1,
            LayoutNode::Split(split) => split.children.iter().map(LayoutNode::leaf_count).sum(),
        }
    }

    /// Depth of the deepest leaf (a lone leaf has depth 1)
    pub fn depth(&self) -> usize {
        match self {
            LayoutNode::Leaf(_) => 1,
            LayoutNode::Split(split) => {
                1 + split
                    .children
                    .iter()
                    .map(LayoutNode::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

/// A point in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounds of a pane in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// X position in pixels from left edge of the editor area
    pub x: f64,
    /// Y position in pixels from top of the editor area
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside these bounds
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }

    /// Get the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tab(id: &str) -> Tab {
        Tab::new(id, id.to_uppercase(), WidgetRef::placeholder())
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::new(10.0, 20.0, 100.0, 50.0);

        // Inside
        assert!(bounds.contains(Point::new(50.0, 40.0)));
        assert!(bounds.contains(Point::new(10.0, 20.0))); // Top-left corner

        // Outside
        assert!(!bounds.contains(Point::new(5.0, 40.0)));
        assert!(!bounds.contains(Point::new(110.0, 40.0))); // Right edge is exclusive
        assert!(!bounds.contains(Point::new(50.0, 80.0)));
    }

    #[test]
    fn test_leaf_new_activates_first_tab() {
        let leaf = Leaf::new("l1", vec![tab("a"), tab("b")]);
        assert_eq!(leaf.active_tab_id.as_deref(), Some("a"));
        assert_eq!(leaf.active_tab().map(|t| t.id.as_str()), Some("a"));

        let empty = Leaf::new("l2", Vec::new());
        assert!(empty.active_tab_id.is_none());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_repair_active_tab() {
        let mut leaf = Leaf::new("l1", vec![tab("a"), tab("b")]);
        leaf.active_tab_id = Some("gone".to_string());
        leaf.repair_active_tab();
        assert_eq!(leaf.active_tab_id.as_deref(), Some("a"));

        leaf.tabs.clear();
        leaf.repair_active_tab();
        assert!(leaf.active_tab_id.is_none());
    }

    #[test]
    fn test_direction_accepts_legacy_names() {
        let row: SplitDirection = serde_json::from_str("\"horizontal\"").unwrap();
        let col: SplitDirection = serde_json::from_str("\"vertical\"").unwrap();
        assert_eq!(row, SplitDirection::Row);
        assert_eq!(col, SplitDirection::Col);
        assert_eq!(serde_json::to_string(&row).unwrap(), "\"row\"");
    }

    #[test]
    fn test_leaf_count_and_depth() {
        let node = LayoutNode::split(Split {
            id: "s".to_string(),
            direction: SplitDirection::Row,
            children: vec![
                LayoutNode::leaf(Leaf::new("a", vec![tab("x")])),
                LayoutNode::split(Split {
                    id: "s2".to_string(),
                    direction: SplitDirection::Col,
                    children: vec![
                        LayoutNode::leaf(Leaf::new("b", Vec::new())),
                        LayoutNode::leaf(Leaf::new("c", Vec::new())),
                    ],
                    sizes: vec![50.0, 50.0],
                }),
            ],
            sizes: vec![50.0, 50.0],
        });
        assert_eq!(node.leaf_count(), 3);
        assert_eq!(node.depth(), 3);
    }
}
