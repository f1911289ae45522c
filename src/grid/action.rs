//! Actions accepted by the grid reducer

use crate::layout::{NodeId, SplitDirection, Tab, TabId};
use crate::persistence::NodeRecord;

/// Which side of the original leaf the new leaf lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Left of a row split, above in a column split
    Before,
    #[default]
    After,
}

/// Initial content of the leaf created by a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitSeed {
    /// Clone of the original leaf's active tab under a new id, or a placeholder
    #[default]
    CloneActive,
    /// No tabs; the caller moves a tab in right after
    Empty,
}

/// Every mutation of [`EditorGridState`](super::EditorGridState)
///
/// Ids that do not resolve make the action a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum GridAction {
    AddTab {
        leaf_id: NodeId,
        tab: Tab,
        /// Insert position; appended when `None` or past the end
        index: Option<usize>,
    },
    ActivateTab {
        tab_id: TabId,
    },
    CloseTab {
        tab_id: TabId,
        /// Close even when dirty or not closeable
        force: bool,
    },
    SplitLeaf {
        leaf_id: NodeId,
        direction: SplitDirection,
        /// Share kept by the original leaf (0.0-1.0)
        ratio: Option<f64>,
        placement: Placement,
        seed: SplitSeed,
        /// Explicit id for the new leaf; minted when `None`
        new_leaf_id: Option<NodeId>,
    },
    MergeLeaf {
        leaf_id: NodeId,
    },
    MoveTab {
        tab_id: TabId,
        target_leaf_id: NodeId,
        index: Option<usize>,
    },
    ReorderTabs {
        leaf_id: NodeId,
        from_index: usize,
        to_index: usize,
    },
    ResizeSplit {
        split_id: NodeId,
        sizes: Vec<f64>,
    },
    CloseAllTabs {
        leaf_id: NodeId,
        force: bool,
    },
    CloseTabsToRight {
        leaf_id: NodeId,
        tab_id: TabId,
        force: bool,
    },
    CloseOtherTabs {
        leaf_id: NodeId,
        tab_id: TabId,
        force: bool,
    },
    FocusLeaf {
        leaf_id: NodeId,
    },
    ToggleFocusMode,
    ExitFocusMode,
    RestoreLayout {
        root: NodeRecord,
        active_leaf_id: Option<NodeId>,
    },
}

impl GridAction {
    /// Split with the default ratio, cloning the active tab after the leaf
    pub fn split(leaf_id: impl Into<NodeId>, direction: SplitDirection) -> Self {
        GridAction::SplitLeaf {
            leaf_id: leaf_id.into(),
            direction,
            ratio: None,
            placement: Placement::After,
            seed: SplitSeed::CloneActive,
            new_leaf_id: None,
        }
    }

    pub fn close_tab(tab_id: impl Into<TabId>) -> Self {
        GridAction::CloseTab {
            tab_id: tab_id.into(),
            force: false,
        }
    }

    pub fn activate_tab(tab_id: impl Into<TabId>) -> Self {
        GridAction::ActivateTab {
            tab_id: tab_id.into(),
        }
    }

    pub fn focus_leaf(leaf_id: impl Into<NodeId>) -> Self {
        GridAction::FocusLeaf {
            leaf_id: leaf_id.into(),
        }
    }

    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            GridAction::AddTab { .. } => "ADD_TAB",
            GridAction::ActivateTab { .. } => "ACTIVATE_TAB",
            GridAction::CloseTab { .. } => "CLOSE_TAB",
            GridAction::SplitLeaf { .. } => "SPLIT_LEAF",
            GridAction::MergeLeaf { .. } => "MERGE_LEAF",
            GridAction::MoveTab { .. } => "MOVE_TAB",
            GridAction::ReorderTabs { .. } => "REORDER_TABS",
            GridAction::ResizeSplit { .. } => "RESIZE_SPLIT",
            GridAction::CloseAllTabs { .. } => "CLOSE_ALL_TABS",
            GridAction::CloseTabsToRight { .. } => "CLOSE_TABS_TO_RIGHT",
            GridAction::CloseOtherTabs { .. } => "CLOSE_OTHER_TABS",
            GridAction::FocusLeaf { .. } => "FOCUS_LEAF",
            GridAction::ToggleFocusMode => "TOGGLE_FOCUS_MODE",
            GridAction::ExitFocusMode => "EXIT_FOCUS_MODE",
            GridAction::RestoreLayout { .. } => "RESTORE_LAYOUT",
        }
    }
}
