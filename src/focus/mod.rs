//! Pane focus tracking and keyboard navigation

mod manager;
mod navigator;

pub use manager::{
    EDITOR_GROUP, FocusEntry, FocusManager, NavigationDirection, OrderedPane,
    find_leaf_in_direction,
};
pub use navigator::{NavigatorInput, PaneNavigator};
