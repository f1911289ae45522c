//! Chrome regions around the editor grid
//!
//! Activity bar, side bars, panel and status bar carry a visibility flag;
//! the side bars and the panel also carry a size with a pixel minimum. This
//! state lives beside the layout tree and is persisted with it.

use par_grid_config::RegionConfig;
use serde::{Deserialize, Serialize};

/// Debug log category for region diagnostics
const LOG_CATEGORY: &str = "REGION";

/// A chrome region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Region {
    ActivityBar,
    PrimarySideBar,
    SecondarySideBar,
    Panel,
    StatusBar,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::ActivityBar,
        Region::PrimarySideBar,
        Region::SecondarySideBar,
        Region::Panel,
        Region::StatusBar,
    ];

    /// Regions with a user-adjustable size
    pub fn is_resizable(self) -> bool {
        matches!(
            self,
            Region::PrimarySideBar | Region::SecondarySideBar | Region::Panel
        )
    }
}

/// A region that is only shown or hidden
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedRegion {
    pub visible: bool,
}

/// A side bar with a width in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideBar {
    pub visible: bool,
    pub width: f64,
}

/// The bottom panel with a height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelRegion {
    pub visible: bool,
    pub height: f64,
}

/// Visibility and size of every chrome region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegionState {
    pub activity_bar: FixedRegion,
    pub primary_side_bar: SideBar,
    pub secondary_side_bar: SideBar,
    pub panel: PanelRegion,
    pub status_bar: FixedRegion,
}

impl Default for RegionState {
    fn default() -> Self {
        Self::from_config(&RegionConfig::default())
    }
}

impl RegionState {
    /// Initial regions from configuration, sizes raised to the minimum
    pub fn from_config(config: &RegionConfig) -> Self {
        let min = config.min_size;
        Self {
            activity_bar: FixedRegion {
                visible: config.show_activity_bar,
            },
            primary_side_bar: SideBar {
                visible: config.show_primary_side_bar,
                width: config.primary_side_bar_width.max(min),
            },
            secondary_side_bar: SideBar {
                visible: config.show_secondary_side_bar,
                width: config.secondary_side_bar_width.max(min),
            },
            panel: PanelRegion {
                visible: config.show_panel,
                height: config.panel_height.max(min),
            },
            status_bar: FixedRegion {
                visible: config.show_status_bar,
            },
        }
    }

    pub fn is_visible(&self, region: Region) -> bool {
        match region {
            Region::ActivityBar => self.activity_bar.visible,
            Region::PrimarySideBar => self.primary_side_bar.visible,
            Region::SecondarySideBar => self.secondary_side_bar.visible,
            Region::Panel => self.panel.visible,
            Region::StatusBar => self.status_bar.visible,
        }
    }

    /// Width or height of a resizable region
    pub fn size(&self, region: Region) -> Option<f64> {
        match region {
            Region::PrimarySideBar => Some(self.primary_side_bar.width),
            Region::SecondarySideBar => Some(self.secondary_side_bar.width),
            Region::Panel => Some(self.panel.height),
            Region::ActivityBar | Region::StatusBar => None,
        }
    }

    fn visible_mut(&mut self, region: Region) -> &mut bool {
        match region {
            Region::ActivityBar => &mut self.activity_bar.visible,
            Region::PrimarySideBar => &mut self.primary_side_bar.visible,
            Region::SecondarySideBar => &mut self.secondary_side_bar.visible,
            Region::Panel => &mut self.panel.visible,
            Region::StatusBar => &mut self.status_bar.visible,
        }
    }

    fn size_mut(&mut self, region: Region) -> Option<&mut f64> {
        match region {
            Region::PrimarySideBar => Some(&mut self.primary_side_bar.width),
            Region::SecondarySideBar => Some(&mut self.secondary_side_bar.width),
            Region::Panel => Some(&mut self.panel.height),
            Region::ActivityBar | Region::StatusBar => None,
        }
    }

    /// Raise every sized region to `min` and replace non-finite sizes
    pub fn normalized(mut self, min: f64) -> Self {
        for region in Region::ALL {
            if let Some(size) = self.size_mut(region)
                && !(size.is_finite() && *size >= min)
            {
                *size = min;
            }
        }
        self
    }
}

/// Changes to chrome regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RegionAction {
    SetVisible { region: Region, visible: bool },
    ToggleVisible { region: Region },
    /// New width (side bars) or height (panel) in pixels
    Resize { region: Region, size: f64 },
}

/// Apply a region action; invalid input returns the state unchanged
pub fn reduce_regions(state: &RegionState, action: RegionAction, min_size: f64) -> RegionState {
    let mut next = state.clone();
    match action {
        RegionAction::SetVisible { region, visible } => {
            *next.visible_mut(region) = visible;
        }
        RegionAction::ToggleVisible { region } => {
            let visible = next.visible_mut(region);
            *visible = !*visible;
        }
        RegionAction::Resize { region, size } => {
            if !size.is_finite() {
                crate::debug_log!(LOG_CATEGORY, "Ignoring non-finite size for {:?}", region);
                return next;
            }
            match next.size_mut(region) {
                Some(current) => *current = size.max(min_size),
                None => {
                    crate::debug_log!(LOG_CATEGORY, "{:?} is not resizable", region);
                }
            }
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config() {
        let state = RegionState::default();
        assert!(state.activity_bar.visible);
        assert!(state.primary_side_bar.visible);
        assert!(!state.secondary_side_bar.visible);
        assert!(!state.panel.visible);
        assert_eq!(state.primary_side_bar.width, 300.0);
        assert_eq!(state.panel.height, 250.0);
    }

    #[test]
    fn test_toggle_and_set_visible() {
        let state = RegionState::default();
        let toggled = reduce_regions(
            &state,
            RegionAction::ToggleVisible {
                region: Region::Panel,
            },
            200.0,
        );
        assert!(toggled.is_visible(Region::Panel));

        let hidden = reduce_regions(
            &toggled,
            RegionAction::SetVisible {
                region: Region::StatusBar,
                visible: false,
            },
            200.0,
        );
        assert!(!hidden.is_visible(Region::StatusBar));
    }

    #[test]
    fn test_resize_enforces_minimum() {
        let state = RegionState::default();
        let resized = reduce_regions(
            &state,
            RegionAction::Resize {
                region: Region::PrimarySideBar,
                size: 50.0,
            },
            200.0,
        );
        assert_eq!(resized.size(Region::PrimarySideBar), Some(200.0));

        let resized = reduce_regions(
            &state,
            RegionAction::Resize {
                region: Region::Panel,
                size: 420.0,
            },
            200.0,
        );
        assert_eq!(resized.size(Region::Panel), Some(420.0));
    }

    #[test]
    fn test_resize_fixed_region_is_noop() {
        let state = RegionState::default();
        let next = reduce_regions(
            &state,
            RegionAction::Resize {
                region: Region::StatusBar,
                size: 500.0,
            },
            200.0,
        );
        assert_eq!(next, state);
    }

    #[test]
    fn test_non_finite_resize_is_ignored() {
        let state = RegionState::default();
        for size in [f64::NAN, f64::INFINITY] {
            let next = reduce_regions(
                &state,
                RegionAction::Resize {
                    region: Region::Panel,
                    size,
                },
                200.0,
            );
            assert_eq!(next, state);
        }
        assert_eq!(LOG_CATEGORY, "REGION");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(RegionState::default()).unwrap();
        assert!(json.get("primarySideBar").is_some());
        assert_eq!(json["panel"]["height"], 250.0);
    }

    #[test]
    fn test_normalized_raises_small_sizes() {
        let mut state = RegionState::default();
        state.panel.height = 12.0;
        state.secondary_side_bar.width = f64::NAN;
        let state = state.normalized(200.0);
        assert_eq!(state.panel.height, 200.0);
        assert_eq!(state.secondary_side_bar.width, 200.0);
    }
}
