//! Tab drag sessions
//!
//! A `DockingEngine` owns at most one drag at a time. Hover updates only
//! touch the session; the grid is changed once, on drop, through ordinary
//! reducer actions.

use super::zone::{DropZone, compute_drop_zone, zone_at};
use crate::grid::{EditorGridState, GridAction, SplitSeed, reduce};
use crate::layout::{Bounds, LeafBounds, NodeId, Point, TabId};
use par_grid_config::GridConfig;

/// Leaf and zone currently under the pointer
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub leaf_id: NodeId,
    pub zone: DropZone,
}

/// The active drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub tab_id: TabId,
    pub source_leaf_id: NodeId,
    pub target: Option<DropTarget>,
}

/// Owner of the single drag session
#[derive(Debug, Clone)]
pub struct DockingEngine {
    session: Option<DragSession>,
    center_ratio: f64,
}

impl Default for DockingEngine {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl DockingEngine {
    pub fn new(center_ratio: f64) -> Self {
        Self {
            session: None,
            center_ratio,
        }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.dock_center_ratio)
    }

    pub fn center_ratio(&self) -> f64 {
        self.center_ratio
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Zone of a pane under the pointer, using this engine's centre band
    pub fn compute_drop_zone(&self, pointer: Point, bounds: Bounds) -> DropZone {
        compute_drop_zone(pointer, bounds, self.center_ratio)
    }

    /// Begin dragging `tab_id`
    ///
    /// Returns false (and leaves any current drag alone) when a drag is
    /// already active or the tab does not exist.
    pub fn start_drag(&mut self, state: &EditorGridState, tab_id: &str) -> bool {
        if let Some(active) = &self.session {
            crate::debug_log!(
                "DOCK",
                "Drag of {} requested while {} is being dragged",
                tab_id,
                active.tab_id
            );
            return false;
        }
        let Some(leaf) = state.leaf_with_tab(tab_id) else {
            crate::debug_log!("DOCK", "Drag of unknown tab {}", tab_id);
            return false;
        };
        self.session = Some(DragSession {
            tab_id: tab_id.to_string(),
            source_leaf_id: leaf.id.clone(),
            target: None,
        });
        crate::debug_info!("DOCK", "Started dragging {} from {}", tab_id, leaf.id);
        true
    }

    /// Point the session at a pane, or at nothing when `target` is `None`
    pub fn update_hover(
        &mut self,
        pointer: Point,
        target: Option<(&str, Bounds)>,
    ) -> Option<DropZone> {
        let center_ratio = self.center_ratio;
        let session = self.session.as_mut()?;
        session.target = target.map(|(leaf_id, bounds)| DropTarget {
            leaf_id: leaf_id.to_string(),
            zone: compute_drop_zone(pointer, bounds, center_ratio),
        });
        let zone = session.target.as_ref().map(|t| t.zone);
        crate::debug_trace!("DOCK", "Hover at ({}, {}) -> {:?}", pointer.x, pointer.y, zone);
        zone
    }

    /// Hit-test the pointer against every leaf and update the hover target
    pub fn hover_at(&mut self, pointer: Point, leaf_bounds: &LeafBounds) -> Option<DropZone> {
        let hit = leaf_bounds.iter().find_map(|(id, bounds)| {
            zone_at(pointer, *bounds, self.center_ratio).map(|_| (id.as_str(), *bounds))
        });
        self.update_hover(pointer, hit)
    }

    /// Abandon the drag without touching the grid
    pub fn cancel(&mut self) -> Option<DragSession> {
        let session = self.session.take();
        if let Some(session) = &session {
            crate::debug_info!("DOCK", "Cancelled drag of {}", session.tab_id);
        }
        session
    }

    /// End the drag and return the actions that perform the drop
    ///
    /// Returns no actions when there is no target, the dragged tab or the
    /// target leaf no longer exists, or the drop would not move anything.
    pub fn drop(&mut self, state: &EditorGridState) -> Vec<GridAction> {
        match self.session.take() {
            Some(session) => plan_drop(state, &session),
            None => Vec::new(),
        }
    }

    /// End the drag and apply the drop to `state`
    ///
    /// Either every step applies and the tab lands in its new leaf, or the
    /// original state is returned.
    pub fn drop_into(&mut self, state: &EditorGridState) -> EditorGridState {
        let actions = self.drop(state);
        let Some(GridAction::MoveTab {
            tab_id,
            target_leaf_id,
            ..
        }) = actions.last().cloned()
        else {
            return state.clone();
        };

        let next = actions
            .into_iter()
            .fold(state.clone(), |current, action| reduce(&current, action));
        let landed = next
            .leaf_with_tab(&tab_id)
            .is_some_and(|leaf| leaf.id == target_leaf_id);
        if landed {
            next
        } else {
            crate::debug_log!("DOCK", "Drop of {} did not land, discarding", tab_id);
            state.clone()
        }
    }
}

fn plan_drop(state: &EditorGridState, session: &DragSession) -> Vec<GridAction> {
    let Some(target) = &session.target else {
        crate::debug_log!("DOCK", "Dropped {} outside any pane", session.tab_id);
        return Vec::new();
    };
    let Some(source) = state.leaf_with_tab(&session.tab_id) else {
        crate::debug_log!("DOCK", "Dragged tab {} no longer exists", session.tab_id);
        return Vec::new();
    };
    let Some(target_leaf) = state.leaf(&target.leaf_id) else {
        crate::debug_log!("DOCK", "Drop target {} no longer exists", target.leaf_id);
        return Vec::new();
    };
    let same_leaf = source.id == target_leaf.id;

    match target.zone.split() {
        None if same_leaf => Vec::new(),
        None => vec![GridAction::MoveTab {
            tab_id: session.tab_id.clone(),
            target_leaf_id: target_leaf.id.clone(),
            index: None,
        }],
        // Splitting a leaf to hold its own only tab changes nothing
        Some(_) if same_leaf && source.tabs.len() == 1 => Vec::new(),
        Some((direction, placement)) => {
            let new_leaf_id = format!("leaf-{}", uuid::Uuid::new_v4());
            vec![
                GridAction::SplitLeaf {
                    leaf_id: target_leaf.id.clone(),
                    direction,
                    ratio: None,
                    placement,
                    seed: SplitSeed::Empty,
                    new_leaf_id: Some(new_leaf_id.clone()),
                },
                GridAction::MoveTab {
                    tab_id: session.tab_id.clone(),
                    target_leaf_id: new_leaf_id,
                    index: None,
                },
            ]
        }
    }
}
