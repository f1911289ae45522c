//! Drag-and-drop docking of tabs
//!
//! Dropping a tab on the centre of a pane moves it there; dropping on an edge
//! splits the pane and moves the tab into the new half.

mod session;
mod zone;

pub use session::{DockingEngine, DragSession, DropTarget};
pub use zone::{DropZone, compute_drop_zone, zone_at};
