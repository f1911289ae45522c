//! Jump-to-pane overlay
//!
//! While a navigation gesture is open each editor leaf carries a stable
//! 1-based label. Pressing a label's digit focuses that leaf and closes the
//! overlay; Escape or a click on the backdrop closes it without focusing.

use super::manager::{FocusManager, OrderedPane};
use crate::grid::GridAction;

/// Input delivered to an open navigator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorInput {
    Digit(u8),
    Escape,
    BackdropClick,
}

#[derive(Debug, Clone, Default)]
pub struct PaneNavigator {
    /// Labels frozen when the gesture started
    labels: Option<Vec<OrderedPane>>,
}

impl PaneNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.labels.is_some()
    }

    /// Labels of the open session
    pub fn labels(&self) -> &[OrderedPane] {
        self.labels.as_deref().unwrap_or(&[])
    }

    pub fn label_for(&self, id: &str) -> Option<usize> {
        self.labels().iter().find(|p| p.id == id).map(|p| p.index)
    }

    /// Open a session over the manager's editor panes
    ///
    /// Returns false if a session is already open or there is nothing to label.
    pub fn begin(&mut self, focus: &FocusManager) -> bool {
        if self.labels.is_some() {
            return false;
        }
        let panes = focus.ordered_panes();
        if panes.is_empty() {
            return false;
        }
        crate::debug_info!("FOCUS", "Pane navigator opened with {} panes", panes.len());
        self.labels = Some(panes);
        true
    }

    /// Pick label `n`, closing the session on a match
    pub fn select(&mut self, focus: &mut FocusManager, n: usize) -> Option<GridAction> {
        let id = self
            .labels()
            .iter()
            .find(|p| p.index == n)
            .map(|p| p.id.clone())?;
        self.labels = None;
        focus.focus(&id)
    }

    pub fn cancel(&mut self) {
        if self.labels.take().is_some() {
            crate::debug_info!("FOCUS", "Pane navigator cancelled");
        }
    }

    pub fn handle(&mut self, focus: &mut FocusManager, input: NavigatorInput) -> Option<GridAction> {
        if !self.is_active() {
            return None;
        }
        match input {
            NavigatorInput::Digit(d) => self.select(focus, usize::from(d)),
            NavigatorInput::Escape | NavigatorInput::BackdropClick => {
                self.cancel();
                None
            }
        }
    }
}
