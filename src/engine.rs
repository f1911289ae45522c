//! Engine facade
//!
//! `LayoutEngine` is what a host application holds. Every grid change goes
//! through [`LayoutEngine::dispatch`], which runs the reducer, re-syncs the
//! focus registry and schedules a debounced write of the new layout.

use crate::docking::DockingEngine;
use crate::focus::{FocusManager, NavigationDirection, NavigatorInput, PaneNavigator};
use crate::grid::{EditorGridState, GridAction, GridSettings, reduce};
use crate::layout::{Bounds, Point, compute_leaf_bounds};
use crate::persistence::{
    FocusRegion, LastFocused, LayoutPersister, LayoutStore, LoadOutcome, LoadSource,
    PersistedLayout, capture_layout, default_layout, load_layout,
};
use crate::regions::{Region, RegionAction, RegionState, reduce_regions};
use par_grid_config::GridConfig;
use std::sync::Arc;
use tokio::runtime::Handle;

pub struct LayoutEngine {
    config: GridConfig,
    grid: EditorGridState,
    regions: RegionState,
    last_focused: LastFocused,
    focus: FocusManager,
    docking: DockingEngine,
    navigator: PaneNavigator,
    persister: Option<LayoutPersister>,
}

impl LayoutEngine {
    /// Engine with the default layout and no persistence
    pub fn new(config: GridConfig) -> Self {
        let grid = EditorGridState::new(GridSettings::from(&config));
        let regions = RegionState::from_config(&config.regions);
        Self::assemble(config, grid, regions, LastFocused::default(), None)
    }

    /// Load the stored layout and return an engine that persists to `store`
    ///
    /// Never fails: an unusable store yields the default layout, and the
    /// returned source says which payload was used. Must run inside a tokio
    /// runtime, which also drives the debounced writes.
    pub async fn load(store: Arc<dyn LayoutStore>, config: GridConfig) -> (Self, LoadSource) {
        let key = config.persistence.storage_key.clone();
        let load_store = Arc::clone(&store);
        let load_config = config.clone();
        let outcome =
            tokio::task::spawn_blocking(move || load_layout(load_store.as_ref(), &key, &load_config))
                .await
                .unwrap_or_else(|e| {
                    log::error!("Layout load task failed: {}", e);
                    LoadOutcome {
                        layout: default_layout(&config),
                        source: LoadSource::Default,
                    }
                });

        let persister = LayoutPersister::from_config(store, &config.persistence, Handle::current());
        let engine = Self::from_layout(config, outcome.layout, Some(persister));
        (engine, outcome.source)
    }

    /// Build an engine from an already decoded layout
    pub fn from_layout(
        config: GridConfig,
        layout: PersistedLayout,
        persister: Option<LayoutPersister>,
    ) -> Self {
        let empty = EditorGridState::new(GridSettings::from(&config));
        let mut grid = reduce(
            &empty,
            GridAction::RestoreLayout {
                root: layout.editor_grid,
                active_leaf_id: layout.last_focused.leaf_id.clone(),
            },
        );
        if let Some(tab_id) = layout.last_focused.tab_id.as_deref()
            && grid.tab(tab_id).is_some()
        {
            grid = reduce(&grid, GridAction::activate_tab(tab_id));
        }
        let regions = layout.regions.normalized(config.regions.min_size);
        Self::assemble(config, grid, regions, layout.last_focused, persister)
    }

    fn assemble(
        config: GridConfig,
        grid: EditorGridState,
        regions: RegionState,
        last_focused: LastFocused,
        persister: Option<LayoutPersister>,
    ) -> Self {
        let mut focus = FocusManager::new();
        focus.sync_with_grid(&grid);
        let docking = DockingEngine::from_config(&config);
        Self {
            config,
            grid,
            regions,
            last_focused,
            focus,
            docking,
            navigator: PaneNavigator::new(),
            persister,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorGridState {
        &self.grid
    }

    pub fn regions(&self) -> &RegionState {
        &self.regions
    }

    pub fn last_focused(&self) -> &LastFocused {
        &self.last_focused
    }

    pub fn focus_manager(&self) -> &FocusManager {
        &self.focus
    }

    pub fn focus_manager_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    pub fn docking(&self) -> &DockingEngine {
        &self.docking
    }

    pub fn navigator(&self) -> &PaneNavigator {
        &self.navigator
    }

    /// Apply a grid action; returns true if the state changed
    pub fn dispatch(&mut self, action: GridAction) -> bool {
        let name = action.name();
        let next = reduce(&self.grid, action);
        if next == self.grid {
            crate::debug_trace!("GRID", "{} left the grid unchanged", name);
            return false;
        }
        self.grid = next;
        self.focus.sync_with_grid(&self.grid);
        self.last_focused = LastFocused {
            region: FocusRegion::EditorGrid,
            leaf_id: Some(self.grid.active_leaf_id().to_string()),
            tab_id: self.grid.active_tab().map(|tab| tab.id.clone()),
        };
        self.schedule_save();
        true
    }

    /// Apply a sequence of actions; returns how many changed the state
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = GridAction>) -> usize {
        actions
            .into_iter()
            .filter(|action| self.dispatch(action.clone()))
            .count()
    }

    /// Apply a region action; returns true if the regions changed
    pub fn dispatch_region(&mut self, action: RegionAction) -> bool {
        let next = reduce_regions(&self.regions, action, self.config.regions.min_size);
        if next == self.regions {
            return false;
        }
        self.regions = next;
        self.schedule_save();
        true
    }

    /// Record that a chrome region took focus
    pub fn focus_region(&mut self, region: Region) {
        self.last_focused.region = FocusRegion::from(region);
        self.schedule_save();
    }

    /// Focus a registered pane, routing editor leaves through the reducer
    pub fn focus_pane(&mut self, id: &str) -> bool {
        match self.focus.focus(id) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Move focus to the neighbouring leaf in `direction` within `area`
    pub fn focus_direction(&mut self, direction: NavigationDirection, area: Bounds) -> bool {
        let bounds = compute_leaf_bounds(self.grid.root(), area, 0.0);
        match self.focus.focus_in_direction(&self.grid, &bounds, direction) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    pub fn begin_navigation(&mut self) -> bool {
        self.navigator.begin(&self.focus)
    }

    pub fn navigator_input(&mut self, input: NavigatorInput) -> bool {
        match self.navigator.handle(&mut self.focus, input) {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    pub fn start_drag(&mut self, tab_id: &str) -> bool {
        self.docking.start_drag(&self.grid, tab_id)
    }

    /// Update the drag hover target from the pointer position within `area`
    pub fn drag_over(&mut self, pointer: Point, area: Bounds) {
        let bounds = compute_leaf_bounds(self.grid.root(), area, 0.0);
        self.docking.hover_at(pointer, &bounds);
    }

    pub fn cancel_drag(&mut self) {
        self.docking.cancel();
    }

    /// Finish the drag; returns true if the tab moved
    pub fn drop_tab(&mut self) -> bool {
        let next = self.docking.drop_into(&self.grid);
        if next == self.grid {
            return false;
        }
        self.grid = next;
        self.focus.sync_with_grid(&self.grid);
        self.last_focused = LastFocused {
            region: FocusRegion::EditorGrid,
            leaf_id: Some(self.grid.active_leaf_id().to_string()),
            tab_id: self.grid.active_tab().map(|tab| tab.id.clone()),
        };
        self.schedule_save();
        true
    }

    /// Persistable snapshot of the current layout
    pub fn snapshot(&self) -> PersistedLayout {
        capture_layout(&self.grid, &self.regions, &self.last_focused)
    }

    fn schedule_save(&mut self) {
        let snapshot = self.snapshot();
        if let Some(persister) = self.persister.as_mut() {
            persister.schedule(snapshot);
        }
    }

    /// Write any pending layout now; call on shutdown
    pub fn flush(&mut self) -> bool {
        self.persister.as_mut().is_some_and(|p| p.flush())
    }
}
