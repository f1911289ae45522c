//! Layout persistence
//!
//! The layout tree, the chrome regions and the last focus target are written
//! as one versioned JSON document. Writes are debounced, rotate a few
//! backups, and loads fall back to a backup and then to the default layout
//! instead of failing.

pub mod capture;
pub mod debounce;
pub mod error;
pub mod migration;
pub mod restore;
pub mod storage;
pub mod store;

pub use capture::{capture_layout, capture_node};
pub use debounce::LayoutPersister;
pub use error::PersistenceError;
pub use migration::{CURRENT_VERSION, migrate};
pub use restore::{infer_widget, restore_tree};
pub use storage::{
    LoadOutcome, LoadSource, backup_key, decode_layout, default_layout, encode_layout,
    load_layout, save_layout,
};
pub use store::{FileStore, LayoutStore, MemoryStore};

use crate::layout::{SplitDirection, WidgetRef};
use crate::regions::{Region, RegionState};
use serde::{Deserialize, Serialize};

/// Top-level persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedLayout {
    /// Schema version; see [`CURRENT_VERSION`]
    pub version: u32,
    /// Timestamp when the layout was saved (RFC 3339)
    #[serde(default)]
    pub saved_at: String,
    /// The editor grid tree
    pub editor_grid: NodeRecord,
    /// Chrome region visibility and sizes
    pub regions: RegionState,
    /// Where focus was when the layout was saved
    #[serde(default)]
    pub last_focused: LastFocused,
}

/// Recursive tree node as stored on disk
///
/// Ids may be missing or duplicated in hand-edited or legacy payloads;
/// restore mints replacements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum NodeRecord {
    Split {
        #[serde(default)]
        id: String,
        direction: SplitDirection,
        children: Vec<NodeRecord>,
        /// Percentages parallel to `children`
        #[serde(default)]
        sizes: Vec<f64>,
    },
    Leaf {
        #[serde(default)]
        id: String,
        #[serde(default)]
        tabs: Vec<TabRecord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        active_tab_id: Option<String>,
    },
}

impl NodeRecord {
    pub fn id(&self) -> &str {
        match self {
            NodeRecord::Split { id, .. } | NodeRecord::Leaf { id, .. } => id,
        }
    }
}

/// A tab as stored on disk
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub dirty: bool,
    #[serde(default = "default_closeable")]
    pub closeable: bool,
    /// Absent in payloads written before widgets existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetRef>,

    // Legacy editor fields, only read to infer a widget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_closeable() -> bool {
    true
}

/// Part of the window that held focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusRegion {
    #[default]
    EditorGrid,
    ActivityBar,
    PrimarySideBar,
    SecondarySideBar,
    Panel,
    StatusBar,
}

impl From<Region> for FocusRegion {
    fn from(region: Region) -> Self {
        match region {
            Region::ActivityBar => FocusRegion::ActivityBar,
            Region::PrimarySideBar => FocusRegion::PrimarySideBar,
            Region::SecondarySideBar => FocusRegion::SecondarySideBar,
            Region::Panel => FocusRegion::Panel,
            Region::StatusBar => FocusRegion::StatusBar,
        }
    }
}

/// Last focus target, restored on load
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastFocused {
    #[serde(default)]
    pub region: FocusRegion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<String>,
}
