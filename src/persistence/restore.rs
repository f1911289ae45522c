//! Rebuild a live layout tree from its persisted form
//!
//! Restoring repairs instead of rejecting: missing or duplicate ids are
//! re-minted, tabs without a widget get one inferred from legacy fields,
//! invalid sizes are re-normalized and empty splits are dropped. Sizes that
//! already hold are kept bit for bit.

use super::{NodeRecord, TabRecord};
use crate::grid::{enforce_minimum_sizes, sizes_valid};
use crate::layout::{
    IdMinter, LayoutNode, Leaf, Split, TEXT_EDITOR_WIDGET, Tab, WidgetRef,
};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Build a layout tree from a record
///
/// Returns the tree and the id counter to continue from, or `None` when the
/// record contains no leaf at all.
pub fn restore_tree(
    record: &NodeRecord,
    min_split_size: f64,
    next_id: u64,
) -> Option<(LayoutNode, u64)> {
    let mut minter = IdMinter::new(record_ids(record), next_id);
    let mut seen = HashSet::new();
    let root = restore_node(record, min_split_size, &mut minter, &mut seen)?;
    Some((root, minter.next_value()))
}

/// Widget for a tab record, inferring one for legacy tabs
///
/// Tabs saved with editor content or a file path become text editors that
/// keep those fields as props; anything else becomes a placeholder.
pub fn infer_widget(record: &TabRecord) -> WidgetRef {
    if let Some(widget) = &record.widget {
        return widget.clone();
    }
    if record.content.is_none() && record.file_path.is_none() {
        return WidgetRef::placeholder();
    }

    let mut props = Map::new();
    if let Some(content) = &record.content {
        props.insert("content".to_string(), Value::String(content.clone()));
    }
    if let Some(path) = &record.file_path {
        props.insert("filePath".to_string(), Value::String(path.clone()));
    }
    if let Some(language) = &record.language {
        props.insert("language".to_string(), Value::String(language.clone()));
    }
    WidgetRef::new(TEXT_EDITOR_WIDGET, Value::Object(props))
}

/// Every id named in the record, so minted ids never shadow a later one
fn record_ids(record: &NodeRecord) -> HashSet<String> {
    fn walk(record: &NodeRecord, ids: &mut HashSet<String>) {
        match record {
            NodeRecord::Leaf { id, tabs, .. } => {
                ids.insert(id.clone());
                ids.extend(tabs.iter().map(|t| t.id.clone()));
            }
            NodeRecord::Split { id, children, .. } => {
                ids.insert(id.clone());
                for child in children {
                    walk(child, ids);
                }
            }
        }
    }

    let mut ids = HashSet::new();
    walk(record, &mut ids);
    ids.remove("");
    ids
}

/// Keep `candidate` the first time it is seen, otherwise mint a new id
fn unique_id(
    candidate: &str,
    prefix: &str,
    minter: &mut IdMinter,
    seen: &mut HashSet<String>,
) -> String {
    if !candidate.is_empty() && seen.insert(candidate.to_string()) {
        return candidate.to_string();
    }
    let id = minter.fresh(prefix);
    log::warn!(
        "Layout restore: replacing missing or duplicate id '{}' with '{}'",
        candidate,
        id
    );
    seen.insert(id.clone());
    id
}

fn restore_node(
    record: &NodeRecord,
    min: f64,
    minter: &mut IdMinter,
    seen: &mut HashSet<String>,
) -> Option<LayoutNode> {
    match record {
        NodeRecord::Leaf {
            id,
            tabs,
            active_tab_id,
        } => {
            let id = unique_id(id, "leaf", minter, seen);
            let mut restored = Vec::with_capacity(tabs.len());
            let mut active = None;
            for tab in tabs {
                let tab_id = unique_id(&tab.id, "tab", minter, seen);
                if active.is_none() && active_tab_id.as_deref() == Some(tab.id.as_str()) {
                    active = Some(tab_id.clone());
                }
                restored.push(restore_tab(tab, tab_id));
            }
            let mut leaf = Leaf::new(id, restored);
            if active.is_some() {
                leaf.active_tab_id = active;
            }
            Some(LayoutNode::leaf(leaf))
        }
        NodeRecord::Split {
            id,
            direction,
            children,
            sizes,
        } => {
            let id = unique_id(id, "split", minter, seen);
            let sized = sizes.len() == children.len();
            let mut kept = Vec::with_capacity(children.len());
            let mut kept_sizes = Vec::with_capacity(children.len());
            for (i, child) in children.iter().enumerate() {
                if let Some(node) = restore_node(child, min, minter, seen) {
                    kept.push(node);
                    kept_sizes.push(if sized { sizes[i] } else { 1.0 });
                }
            }

            match kept.len() {
                0 => None,
                1 => kept.pop(),
                _ => {
                    let intact = sized && kept.len() == children.len();
                    let sizes = if intact && sizes_valid(&kept_sizes, min) {
                        kept_sizes
                    } else {
                        enforce_minimum_sizes(&scale_to_percent(&kept_sizes), min)
                    };
                    Some(LayoutNode::split(Split {
                        id,
                        direction: *direction,
                        sizes,
                        children: kept,
                    }))
                }
            }
        }
    }
}

/// Rescale arbitrary non-negative weights to percentages
fn scale_to_percent(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights
        .iter()
        .filter(|w| w.is_finite() && **w > 0.0)
        .sum();
    if total <= 0.0 {
        return vec![100.0 / weights.len().max(1) as f64; weights.len()];
    }
    weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { w * 100.0 / total } else { 0.0 })
        .collect()
}

fn restore_tab(record: &TabRecord, id: String) -> Tab {
    if record.widget.is_none() {
        log::info!(
            "Layout restore: inferring widget for legacy tab '{}'",
            record.title
        );
    }
    Tab {
        id,
        title: record.title.clone(),
        icon: record.icon.clone(),
        dirty: record.dirty,
        closeable: record.closeable,
        widget: infer_widget(record),
    }
}
