//! Top-level editor grid state
//!
//! `EditorGridState` owns the layout tree together with everything derived
//! from it. The leaf index is rebuilt by [`EditorGridState::commit`] after
//! every structural change and is never edited by hand.

use crate::layout::{
    IdMinter, LayoutNode, Leaf, LeafIndex, NodeId, Tab, TabId, collect_ids, compact_tree,
    find_leaf_with_tab, rebuild_leaf_index,
};
use par_grid_config::GridConfig;
use std::sync::Arc;

/// Engine settings the reducer needs
#[derive(Debug, Clone, PartialEq)]
pub struct GridSettings {
    /// Minimum share (percent) of any split child
    pub min_split_size: f64,
    /// Share kept by the original leaf when splitting without an explicit ratio
    pub default_split_ratio: f64,
    /// Longest focus history kept
    pub focus_history_limit: usize,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::from(&GridConfig::default())
    }
}

impl From<&GridConfig> for GridSettings {
    fn from(config: &GridConfig) -> Self {
        Self {
            min_split_size: config.min_split_size,
            default_split_ratio: config.default_split_ratio,
            focus_history_limit: config.focus_history_limit,
        }
    }
}

/// Single-tab distraction-free overlay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusMode {
    pub active: bool,
    pub tab_id: Option<TabId>,
}

/// The layout tree and its derived lookup tables
#[derive(Debug, Clone, PartialEq)]
pub struct EditorGridState {
    pub(crate) root: LayoutNode,
    pub(crate) active_leaf_id: NodeId,
    pub(crate) leaf_index: LeafIndex,
    pub(crate) focus_history: Vec<NodeId>,
    pub(crate) focus_mode: FocusMode,
    pub(crate) settings: GridSettings,
    pub(crate) next_id: u64,
}

impl Default for EditorGridState {
    fn default() -> Self {
        Self::new(GridSettings::default())
    }
}

impl EditorGridState {
    /// One leaf holding a placeholder tab
    pub fn new(settings: GridSettings) -> Self {
        let root = LayoutNode::leaf(Leaf::new("leaf-1", vec![Tab::placeholder("tab-1")]));
        Self::from_root(root, None, settings, 2)
    }

    /// Build a state around an existing tree
    ///
    /// The active leaf falls back to the first leaf when `active_leaf_id` is
    /// missing from the tree.
    pub fn from_root(
        root: LayoutNode,
        active_leaf_id: Option<&str>,
        settings: GridSettings,
        next_id: u64,
    ) -> Self {
        let root = compact_tree(&root);
        let leaf_index = rebuild_leaf_index(&root);
        let active_leaf_id = active_leaf_id
            .filter(|id| leaf_index.contains_key(*id))
            .map(str::to_string)
            .or_else(|| leaf_index.keys().next().cloned())
            .unwrap_or_else(|| root.id().to_string());
        Self {
            focus_history: vec![active_leaf_id.clone()],
            root,
            active_leaf_id,
            leaf_index,
            focus_mode: FocusMode::default(),
            settings,
            next_id,
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn active_leaf_id(&self) -> &str {
        &self.active_leaf_id
    }

    pub fn active_leaf(&self) -> Option<&Arc<Leaf>> {
        self.leaf_index.get(&self.active_leaf_id)
    }

    /// Active tab of the active leaf
    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_leaf()?.active_tab()
    }

    pub fn leaf_index(&self) -> &LeafIndex {
        &self.leaf_index
    }

    pub fn leaf(&self, id: &str) -> Option<&Arc<Leaf>> {
        self.leaf_index.get(id)
    }

    /// Leaf holding `tab_id`
    pub fn leaf_with_tab(&self, tab_id: &str) -> Option<&Arc<Leaf>> {
        find_leaf_with_tab(&self.leaf_index, tab_id)
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.leaf_with_tab(tab_id)?
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
    }

    /// Most recent last, no duplicates
    pub fn focus_history(&self) -> &[NodeId] {
        &self.focus_history
    }

    pub fn focus_mode(&self) -> &FocusMode {
        &self.focus_mode
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_index.len()
    }

    /// Any tab anywhere with unsaved changes
    pub fn has_dirty_tabs(&self) -> bool {
        self.leaf_index
            .values()
            .any(|leaf| leaf.tabs.iter().any(|t| t.dirty))
    }

    /// Minter seeded with every id in the current tree
    pub(crate) fn minter(&self) -> IdMinter {
        IdMinter::new(collect_ids(&self.root), self.next_id)
    }

    /// Install a new tree and re-derive everything that depends on it
    ///
    /// Compacts the tree, rebuilds the leaf index, drops vanished leaves from
    /// the focus history, re-targets the active leaf if it vanished and leaves
    /// focus mode if its tab is gone.
    pub(crate) fn commit(mut self, root: LayoutNode) -> Self {
        self.root = compact_tree(&root);
        self.leaf_index = rebuild_leaf_index(&self.root);

        let index = &self.leaf_index;
        self.focus_history.retain(|id| index.contains_key(id));

        if !self.leaf_index.contains_key(&self.active_leaf_id) {
            let fallback = self
                .focus_history
                .last()
                .cloned()
                .or_else(|| self.leaf_index.keys().next().cloned());
            if let Some(id) = fallback {
                crate::debug_log!(
                    "GRID",
                    "Active leaf {} vanished, focusing {}",
                    self.active_leaf_id,
                    id
                );
                self.active_leaf_id = id;
            }
        }

        if let Some(tab_id) = self.focus_mode.tab_id.as_deref()
            && self.focus_mode.active
            && find_leaf_with_tab(&self.leaf_index, tab_id).is_none()
        {
            crate::debug_log!("GRID", "Focus mode tab {} closed, leaving focus mode", tab_id);
            self.focus_mode = FocusMode::default();
        }

        self
    }

    /// Make `leaf_id` active and move it to the end of the focus history
    pub(crate) fn focus(mut self, leaf_id: &str) -> Self {
        if !self.leaf_index.contains_key(leaf_id) {
            return self;
        }
        self.active_leaf_id = leaf_id.to_string();
        self.focus_history.retain(|id| id != leaf_id);
        self.focus_history.push(leaf_id.to_string());
        let limit = self.settings.focus_history_limit.max(1);
        if self.focus_history.len() > limit {
            let excess = self.focus_history.len() - limit;
            self.focus_history.drain(..excess);
        }
        self
    }
}
