//! Registry of focusable panes
//!
//! Panes register on mount and unregister on unmount. Editor leaves live in
//! [`EDITOR_GROUP`]; focusing one of them yields a `FocusLeaf` action for the
//! reducer, so logical focus in the grid always goes through the state
//! machine. Panes in other groups (side bars, panel) are tracked here only.

use crate::grid::{EditorGridState, GridAction};
use crate::layout::{LeafBounds, NodeId};
use indexmap::IndexMap;

/// Group holding the editor grid's leaves
pub const EDITOR_GROUP: &str = "editor";

/// Direction for keyboard pane navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Registration of one focusable pane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEntry {
    /// Ordering key; ties keep registration order
    pub order: usize,
    pub group: String,
}

/// A pane with its 1-based navigation index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedPane {
    pub id: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FocusManager {
    entries: IndexMap<NodeId, FocusEntry>,
    focused: Option<NodeId>,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a pane
    pub fn register(&mut self, id: impl Into<NodeId>, order: usize, group: impl Into<String>) {
        let id = id.into();
        let group = group.into();
        crate::debug_trace!("FOCUS", "Register {} (order {}, group {})", id, order, group);
        self.entries.insert(id, FocusEntry { order, group });
    }

    /// Remove a pane; returns false if it was not registered
    pub fn unregister(&mut self, id: &str) -> bool {
        let removed = self.entries.shift_remove(id).is_some();
        if removed && self.focused.as_deref() == Some(id) {
            self.focused = None;
        }
        removed
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn entry(&self, id: &str) -> Option<&FocusEntry> {
        self.entries.get(id)
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move focus to a registered pane
    ///
    /// Returns the reducer action when the pane is an editor leaf. Unknown
    /// ids are ignored.
    pub fn focus(&mut self, id: &str) -> Option<GridAction> {
        let Some(entry) = self.entries.get(id) else {
            crate::debug_log!("FOCUS", "Focus request for unregistered pane {}", id);
            return None;
        };
        let is_editor = entry.group == EDITOR_GROUP;
        self.focused = Some(id.to_string());
        crate::debug_info!("FOCUS", "Focused {}", id);
        is_editor.then(|| GridAction::focus_leaf(id))
    }

    /// Panes of `group` sorted by ordering key, numbered from 1
    pub fn ordered_in(&self, group: &str) -> Vec<OrderedPane> {
        let mut panes: Vec<(&NodeId, &FocusEntry)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.group == group)
            .collect();
        // Stable sort keeps registration order for equal keys
        panes.sort_by_key(|(_, entry)| entry.order);
        panes
            .into_iter()
            .enumerate()
            .map(|(i, (id, _))| OrderedPane {
                id: id.clone(),
                index: i + 1,
            })
            .collect()
    }

    /// Editor leaves in navigation order
    pub fn ordered_panes(&self) -> Vec<OrderedPane> {
        self.ordered_in(EDITOR_GROUP)
    }

    /// Mirror the grid's leaves into the editor group
    ///
    /// Leaves are ordered by tree traversal. Vanished leaves are dropped and
    /// editor focus follows the grid's active leaf.
    pub fn sync_with_grid(&mut self, state: &EditorGridState) {
        let index = state.leaf_index();
        self.entries
            .retain(|id, entry| entry.group != EDITOR_GROUP || index.contains_key(id));
        for (order, id) in index.keys().enumerate() {
            self.entries.insert(
                id.clone(),
                FocusEntry {
                    order,
                    group: EDITOR_GROUP.to_string(),
                },
            );
        }

        let focus_in_editor = match self.focused.as_deref() {
            None => true,
            Some(id) => self
                .entries
                .get(id)
                .is_none_or(|entry| entry.group == EDITOR_GROUP),
        };
        if focus_in_editor {
            self.focused = Some(state.active_leaf_id().to_string());
        }
        crate::debug_trace!(
            "FOCUS",
            "Synced {} editor panes, focused {:?}",
            index.len(),
            self.focused
        );
    }

    /// Focus the `n`th editor pane (1-based)
    pub fn focus_index(&mut self, n: usize) -> Option<GridAction> {
        let pane = self.ordered_panes().into_iter().find(|p| p.index == n)?;
        self.focus(&pane.id)
    }

    /// Focus the editor pane after the focused one, wrapping around
    pub fn focus_next(&mut self) -> Option<GridAction> {
        self.cycle(1)
    }

    /// Focus the editor pane before the focused one, wrapping around
    pub fn focus_prev(&mut self) -> Option<GridAction> {
        self.cycle(-1)
    }

    fn cycle(&mut self, step: isize) -> Option<GridAction> {
        let panes = self.ordered_panes();
        if panes.is_empty() {
            return None;
        }
        let len = panes.len() as isize;
        let current = self
            .focused
            .as_deref()
            .and_then(|id| panes.iter().position(|p| p.id == id));
        let next = match current {
            Some(pos) => (pos as isize + step).rem_euclid(len) as usize,
            None if step > 0 => 0,
            None => panes.len() - 1,
        };
        let id = panes[next].id.clone();
        self.focus(&id)
    }

    /// Focus the nearest leaf in `direction` from the grid's active leaf
    pub fn focus_in_direction(
        &mut self,
        state: &EditorGridState,
        bounds: &LeafBounds,
        direction: NavigationDirection,
    ) -> Option<GridAction> {
        let target = find_leaf_in_direction(bounds, state.active_leaf_id(), direction)?;
        let target = target.to_string();
        self.focus(&target)
    }
}

/// Closest leaf in a direction, by centre distance
///
/// Only leaves whose centre lies strictly in `direction` qualify. Distance
/// is Manhattan with the off-axis component weighted double, which favours
/// aligned neighbours in grid-like layouts.
pub fn find_leaf_in_direction<'a>(
    bounds: &'a LeafBounds,
    from_id: &str,
    direction: NavigationDirection,
) -> Option<&'a str> {
    let from_center = bounds.get(from_id)?.center();

    let mut best: Option<(&str, f64)> = None;
    for (id, leaf_bounds) in bounds {
        if id == from_id {
            continue;
        }
        let center = leaf_bounds.center();
        let is_in_direction = match direction {
            NavigationDirection::Left => center.x < from_center.x,
            NavigationDirection::Right => center.x > from_center.x,
            NavigationDirection::Up => center.y < from_center.y,
            NavigationDirection::Down => center.y > from_center.y,
        };
        if !is_in_direction {
            continue;
        }

        let dx = (center.x - from_center.x).abs();
        let dy = (center.y - from_center.y).abs();
        let distance = match direction {
            NavigationDirection::Left | NavigationDirection::Right => dx + dy * 2.0,
            NavigationDirection::Up | NavigationDirection::Down => dy + dx * 2.0,
        };
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((id.as_str(), distance));
        }
    }
    best.map(|(id, _)| id)
}
