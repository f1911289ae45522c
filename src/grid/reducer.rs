//! The grid reducer
//!
//! `reduce` is total: an action that cannot apply (stale id, refused guard,
//! out-of-range index) returns a clone of the input state and logs why.
//! Nothing here blocks or touches I/O, so replaying the same actions against
//! the same state always yields the same tree.

use super::action::{GridAction, Placement, SplitSeed};
use super::sizes::{enforce_minimum_sizes, ratio_sizes};
use super::state::{EditorGridState, FocusMode};
use crate::layout::{
    LayoutNode, Leaf, NodeId, Split, SplitDirection, Tab, TabId, find_node, find_parent_split,
    first_leaf, remove_node, replace_node,
};
use crate::persistence::{NodeRecord, restore_tree};
use std::fmt;
use std::sync::Arc;

/// Why an action left the state untouched
#[derive(Debug)]
enum Ignored {
    Missing(&'static str, String),
    Guarded(TabId),
    Conflict(String),
    Invalid(&'static str),
    NoChange,
}

impl fmt::Display for Ignored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ignored::Missing(kind, id) => write!(f, "{} {} not found", kind, id),
            Ignored::Guarded(id) => write!(f, "tab {} is dirty or not closeable", id),
            Ignored::Conflict(id) => write!(f, "id {} already in use", id),
            Ignored::Invalid(reason) => f.write_str(reason),
            Ignored::NoChange => f.write_str("nothing to do"),
        }
    }
}

type Step = Result<EditorGridState, Ignored>;

/// Apply one action to a snapshot, returning the next snapshot
pub fn reduce(state: &EditorGridState, action: GridAction) -> EditorGridState {
    let name = action.name();
    match apply(state, action) {
        Ok(next) => {
            crate::debug_trace!(
                "GRID",
                "{} applied: {} leaves, active {}",
                name,
                next.leaf_count(),
                next.active_leaf_id()
            );
            next
        }
        Err(reason) => {
            crate::debug_log!("GRID", "{} ignored: {}", name, reason);
            state.clone()
        }
    }
}

fn apply(state: &EditorGridState, action: GridAction) -> Step {
    match action {
        GridAction::AddTab {
            leaf_id,
            tab,
            index,
        } => add_tab(state, &leaf_id, tab, index),
        GridAction::ActivateTab { tab_id } => activate_tab(state, &tab_id),
        GridAction::CloseTab { tab_id, force } => close_tab(state, &tab_id, force),
        GridAction::SplitLeaf {
            leaf_id,
            direction,
            ratio,
            placement,
            seed,
            new_leaf_id,
        } => split_leaf(
            state,
            &leaf_id,
            direction,
            ratio,
            placement,
            seed,
            new_leaf_id,
        ),
        GridAction::MergeLeaf { leaf_id } => merge_leaf(state, &leaf_id),
        GridAction::MoveTab {
            tab_id,
            target_leaf_id,
            index,
        } => move_tab(state, &tab_id, &target_leaf_id, index),
        GridAction::ReorderTabs {
            leaf_id,
            from_index,
            to_index,
        } => reorder_tabs(state, &leaf_id, from_index, to_index),
        GridAction::ResizeSplit { split_id, sizes } => resize_split(state, &split_id, &sizes),
        GridAction::CloseAllTabs { leaf_id, force } => {
            close_many(state, &leaf_id, force, |_, _| false, None)
        }
        GridAction::CloseTabsToRight {
            leaf_id,
            tab_id,
            force,
        } => {
            let pivot = require_leaf(state, &leaf_id)?
                .tab_index(&tab_id)
                .ok_or_else(|| Ignored::Missing("tab", tab_id.clone()))?;
            close_many(state, &leaf_id, force, |i, _| i <= pivot, None)
        }
        GridAction::CloseOtherTabs {
            leaf_id,
            tab_id,
            force,
        } => {
            if !require_leaf(state, &leaf_id)?.contains_tab(&tab_id) {
                return Err(Ignored::Missing("tab", tab_id));
            }
            close_many(state, &leaf_id, force, |_, t| t.id == tab_id, Some(tab_id.as_str()))
        }
        GridAction::FocusLeaf { leaf_id } => {
            require_leaf(state, &leaf_id)?;
            Ok(state.clone().focus(&leaf_id))
        }
        GridAction::ToggleFocusMode => toggle_focus_mode(state),
        GridAction::ExitFocusMode => exit_focus_mode(state),
        GridAction::RestoreLayout {
            root,
            active_leaf_id,
        } => restore_layout(state, &root, active_leaf_id.as_deref()),
    }
}

fn require_leaf<'a>(state: &'a EditorGridState, id: &str) -> Result<&'a Arc<Leaf>, Ignored> {
    state
        .leaf(id)
        .ok_or_else(|| Ignored::Missing("leaf", id.to_string()))
}

/// Swap a leaf into the tree by id
fn put_leaf(root: &LayoutNode, leaf: Leaf) -> Result<LayoutNode, Ignored> {
    let id = leaf.id.clone();
    replace_node(root, &id, LayoutNode::leaf(leaf)).ok_or(Ignored::Missing("leaf", id))
}

fn closable(tab: &Tab, force: bool) -> bool {
    force || (!tab.dirty && tab.closeable)
}

fn add_tab(state: &EditorGridState, leaf_id: &str, mut tab: Tab, index: Option<usize>) -> Step {
    let leaf = require_leaf(state, leaf_id)?;
    if state.leaf_with_tab(&tab.id).is_some() {
        // Opening something that is already open just brings it forward
        return activate_tab(state, &tab.id);
    }

    let mut minter = state.minter();
    if tab.id.is_empty() {
        tab.id = minter.fresh("tab");
    } else if !minter.claim(&tab.id) {
        // Not a tab id (checked above), so a leaf or split already owns it
        return Err(Ignored::Conflict(tab.id));
    }
    let next_id = minter.next_value();

    let mut updated = Leaf::clone(leaf);
    let at = index.unwrap_or(updated.tabs.len()).min(updated.tabs.len());
    updated.active_tab_id = Some(tab.id.clone());
    updated.tabs.insert(at, tab);

    let root = put_leaf(&state.root, updated)?;
    let mut next = state.clone().commit(root).focus(leaf_id);
    next.next_id = next_id;
    Ok(next)
}

fn activate_tab(state: &EditorGridState, tab_id: &str) -> Step {
    let leaf = state
        .leaf_with_tab(tab_id)
        .ok_or_else(|| Ignored::Missing("tab", tab_id.to_string()))?;
    let leaf_id = leaf.id.clone();

    let root = if leaf.active_tab_id.as_deref() == Some(tab_id) {
        state.root.clone()
    } else {
        let mut updated = Leaf::clone(leaf);
        updated.active_tab_id = Some(tab_id.to_string());
        put_leaf(&state.root, updated)?
    };

    let mut next = state.clone().commit(root).focus(&leaf_id);
    if next.focus_mode.active {
        next.focus_mode.tab_id = Some(tab_id.to_string());
    }
    Ok(next)
}

fn close_tab(state: &EditorGridState, tab_id: &str, force: bool) -> Step {
    let leaf = state
        .leaf_with_tab(tab_id)
        .ok_or_else(|| Ignored::Missing("tab", tab_id.to_string()))?;
    let guarded = leaf
        .tabs
        .iter()
        .any(|t| t.id == tab_id && !closable(t, force));
    if guarded {
        return Err(Ignored::Guarded(tab_id.to_string()));
    }
    remove_tabs(state, leaf, &[tab_id.to_string()], None)
}

/// Close every tab of a leaf not selected by `keep`, skipping guarded tabs
fn close_many(
    state: &EditorGridState,
    leaf_id: &str,
    force: bool,
    keep: impl Fn(usize, &Tab) -> bool,
    activate: Option<&str>,
) -> Step {
    let leaf = require_leaf(state, leaf_id)?;
    let doomed: Vec<TabId> = leaf
        .tabs
        .iter()
        .enumerate()
        .filter(|(i, t)| !keep(*i, t) && closable(t, force))
        .map(|(_, t)| t.id.clone())
        .collect();
    if doomed.is_empty() {
        return Err(Ignored::NoChange);
    }
    let skipped = leaf
        .tabs
        .iter()
        .enumerate()
        .filter(|(i, t)| !keep(*i, t) && !closable(t, force))
        .count();
    if skipped > 0 {
        crate::debug_log!("GRID", "Kept {} guarded tab(s) open in {}", skipped, leaf_id);
    }
    remove_tabs(state, leaf, &doomed, activate)
}

/// Remove tabs from one leaf and fix up its active tab
///
/// When the active tab goes, the tab that slides into its position becomes
/// active (or the last one). A leaf left empty is removed from its parent
/// unless it is the root.
fn remove_tabs(
    state: &EditorGridState,
    leaf: &Leaf,
    doomed: &[TabId],
    activate: Option<&str>,
) -> Step {
    let active_pos = leaf
        .active_tab_id
        .as_deref()
        .and_then(|id| leaf.tab_index(id));

    let mut updated = leaf.clone();
    updated.tabs.retain(|t| !doomed.contains(&t.id));

    let active_survives = updated
        .active_tab_id
        .as_deref()
        .is_some_and(|id| updated.contains_tab(id));
    if let Some(id) = activate.filter(|id| updated.contains_tab(id)) {
        updated.active_tab_id = Some(id.to_string());
    } else if !active_survives {
        let slot = active_pos
            .map(|p| {
                let removed_before = leaf.tabs[..p]
                    .iter()
                    .filter(|t| doomed.contains(&t.id))
                    .count();
                p - removed_before
            })
            .unwrap_or(0);
        let last = updated.tabs.len().saturating_sub(1);
        updated.active_tab_id = updated.tabs.get(slot.min(last)).map(|t| t.id.clone());
    }

    let leaf_id = updated.id.clone();
    let root = if updated.tabs.is_empty() && !state.root.is_leaf() {
        crate::debug_info!("GRID", "Leaf {} emptied, removing it", leaf_id);
        remove_node(&state.root, &leaf_id).ok_or(Ignored::Missing("leaf", leaf_id))?
    } else {
        put_leaf(&state.root, updated)?
    };
    Ok(state.clone().commit(root))
}

fn split_leaf(
    state: &EditorGridState,
    leaf_id: &str,
    direction: SplitDirection,
    ratio: Option<f64>,
    placement: Placement,
    seed: SplitSeed,
    new_leaf_id: Option<NodeId>,
) -> Step {
    let leaf = require_leaf(state, leaf_id)?;
    let mut minter = state.minter();
    let new_id = match new_leaf_id {
        Some(id) if minter.claim(&id) => id,
        Some(id) => return Err(Ignored::Conflict(id)),
        None => minter.fresh("leaf"),
    };

    let tabs = match seed {
        SplitSeed::Empty => Vec::new(),
        SplitSeed::CloneActive => {
            let tab_id = minter.fresh("tab");
            let tab = match leaf.active_tab() {
                Some(active) => Tab {
                    id: tab_id,
                    dirty: false,
                    ..active.clone()
                },
                None => Tab::placeholder(tab_id),
            };
            vec![tab]
        }
    };
    let split_id = minter.fresh("split");

    let settings = &state.settings;
    let ratio = ratio
        .filter(|r| r.is_finite() && *r > 0.0 && *r < 1.0)
        .unwrap_or(settings.default_split_ratio);
    let mut sizes = ratio_sizes(ratio, settings.min_split_size);

    let original = LayoutNode::Leaf(Arc::clone(leaf));
    let created = LayoutNode::leaf(Leaf::new(new_id.clone(), tabs));
    let children = match placement {
        Placement::After => vec![original, created],
        Placement::Before => {
            sizes.reverse();
            vec![created, original]
        }
    };

    let split = LayoutNode::split(Split {
        id: split_id,
        direction,
        children,
        sizes,
    });
    let root = replace_node(&state.root, leaf_id, split)
        .ok_or_else(|| Ignored::Missing("leaf", leaf_id.to_string()))?;

    crate::debug_info!("GRID", "Split {} {:?}, new leaf {}", leaf_id, direction, new_id);
    let mut next = state.clone().commit(root).focus(&new_id);
    next.next_id = minter.next_value();
    Ok(next)
}

fn merge_leaf(state: &EditorGridState, leaf_id: &str) -> Step {
    let leaf = require_leaf(state, leaf_id)?;
    let (parent, index) =
        find_parent_split(&state.root, leaf_id).ok_or(Ignored::Invalid("leaf is the root"))?;
    if parent.children.len() != 2 {
        return Err(Ignored::Invalid("parent split does not have exactly two children"));
    }

    let sibling = &parent.children[1 - index];
    let receiver = first_leaf(sibling).ok_or(Ignored::Invalid("sibling has no leaves"))?;
    let receiver_id = receiver.id.clone();

    // Tabs of the merged leaf join the nearest leaf of the sibling
    let promoted = if leaf.is_empty() {
        sibling.clone()
    } else {
        let mut updated = Leaf::clone(receiver);
        updated.tabs.extend(leaf.tabs.iter().cloned());
        updated.repair_active_tab();
        put_leaf(sibling, updated)?
    };

    let root = replace_node(&state.root, &parent.id, promoted)
        .ok_or_else(|| Ignored::Missing("split", parent.id.clone()))?;
    let next = state.clone().commit(root);
    if state.active_leaf_id == leaf_id {
        Ok(next.focus(&receiver_id))
    } else {
        Ok(next)
    }
}

fn move_tab(state: &EditorGridState, tab_id: &str, target_id: &str, index: Option<usize>) -> Step {
    let source = state
        .leaf_with_tab(tab_id)
        .ok_or_else(|| Ignored::Missing("tab", tab_id.to_string()))?;
    let target = require_leaf(state, target_id)?;
    if source.id == target.id {
        return Err(Ignored::NoChange);
    }
    let pos = source
        .tab_index(tab_id)
        .ok_or_else(|| Ignored::Missing("tab", tab_id.to_string()))?;

    let mut from = Leaf::clone(source);
    let tab = from.tabs.remove(pos);
    if from.active_tab_id.as_deref() == Some(tab_id) {
        let last = from.tabs.len().saturating_sub(1);
        from.active_tab_id = from.tabs.get(pos.min(last)).map(|t| t.id.clone());
    }

    let mut to = Leaf::clone(target);
    let at = index.unwrap_or(to.tabs.len()).min(to.tabs.len());
    to.active_tab_id = Some(tab.id.clone());
    to.tabs.insert(at, tab);

    let root = put_leaf(&state.root, to)?;
    let root = if from.tabs.is_empty() {
        let from_id = from.id.clone();
        remove_node(&root, &from_id).ok_or(Ignored::Missing("leaf", from_id))?
    } else {
        put_leaf(&root, from)?
    };

    crate::debug_info!("GRID", "Moved tab {} from {} to {}", tab_id, source.id, target_id);
    Ok(state.clone().commit(root).focus(target_id))
}

fn reorder_tabs(state: &EditorGridState, leaf_id: &str, from: usize, to: usize) -> Step {
    let leaf = require_leaf(state, leaf_id)?;
    let len = leaf.tabs.len();
    if from >= len || to >= len {
        return Err(Ignored::Invalid("tab index out of range"));
    }
    if from == to {
        return Err(Ignored::NoChange);
    }

    let mut updated = Leaf::clone(leaf);
    let tab = updated.tabs.remove(from);
    updated.tabs.insert(to, tab);
    let root = put_leaf(&state.root, updated)?;
    Ok(state.clone().commit(root))
}

fn resize_split(state: &EditorGridState, split_id: &str, sizes: &[f64]) -> Step {
    let split = find_node(&state.root, split_id)
        .and_then(LayoutNode::as_split)
        .ok_or_else(|| Ignored::Missing("split", split_id.to_string()))?;
    if sizes.len() != split.children.len() {
        return Err(Ignored::Invalid("size count does not match child count"));
    }
    if sizes.iter().any(|s| !s.is_finite()) {
        return Err(Ignored::Invalid("sizes must be finite"));
    }

    let enforced = enforce_minimum_sizes(sizes, state.settings.min_split_size);
    if enforced == split.sizes {
        return Err(Ignored::NoChange);
    }
    let mut updated = Split::clone(split);
    updated.sizes = enforced;
    let root = replace_node(&state.root, split_id, LayoutNode::split(updated))
        .ok_or_else(|| Ignored::Missing("split", split_id.to_string()))?;
    Ok(state.clone().commit(root))
}

fn toggle_focus_mode(state: &EditorGridState) -> Step {
    if state.focus_mode.active {
        return exit_focus_mode(state);
    }
    let tab_id = state
        .active_tab()
        .map(|t| t.id.clone())
        .ok_or(Ignored::Invalid("no active tab to focus"))?;
    let mut next = state.clone();
    next.focus_mode = FocusMode {
        active: true,
        tab_id: Some(tab_id),
    };
    Ok(next)
}

fn exit_focus_mode(state: &EditorGridState) -> Step {
    if !state.focus_mode.active {
        return Err(Ignored::NoChange);
    }
    let mut next = state.clone();
    next.focus_mode = FocusMode::default();
    Ok(next)
}

fn restore_layout(state: &EditorGridState, record: &NodeRecord, active: Option<&str>) -> Step {
    let (root, next_id) = restore_tree(record, state.settings.min_split_size, state.next_id)
        .ok_or(Ignored::Invalid("restored layout has no leaves"))?;
    // Requested leaf, else the current one if it survived, else the first leaf
    let survives = |id: &&str| find_node(&root, id).is_some_and(LayoutNode::is_leaf);
    let active = active
        .filter(survives)
        .or_else(|| Some(state.active_leaf_id()).filter(survives));
    let next = EditorGridState::from_root(root, active, state.settings.clone(), next_id);
    crate::debug_info!(
        "GRID",
        "Restored layout with {} leaves, active {}",
        next.leaf_count(),
        next.active_leaf_id()
    );
    Ok(next)
}
