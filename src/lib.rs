// Library exports for the editor layout engine
//
// Data flow: input (drag gesture, keystroke, menu action) -> docking engine
// or focus manager -> `GridAction` -> `grid::reduce` -> new tree -> focus
// re-sync -> debounced persistence. Only the reducer changes the tree.
//
// # Mutex Usage Policy
//
//   - `parking_lot::Mutex` for sync-only state (debug log file, in-memory
//     store, the pending-write slot shared with the debounce task).
//   - No tokio mutexes: the async side only sleeps and then hands the write
//     to `spawn_blocking`.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod cli;
pub mod docking;
pub mod engine;
pub mod focus;
pub mod grid;
pub mod layout;
pub mod persistence;
pub mod regions;

pub use docking::{DockingEngine, DropZone};
pub use engine::LayoutEngine;
pub use focus::{FocusManager, PaneNavigator};
pub use grid::{EditorGridState, GridAction, reduce};
pub use layout::{LayoutNode, Leaf, Split, SplitDirection, Tab};
pub use par_grid_config::GridConfig;
pub use persistence::{FileStore, LayoutStore, MemoryStore, PersistedLayout};
pub use regions::{Region, RegionAction, RegionState};
