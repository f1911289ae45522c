//! Default values for layout engine settings.
//!
//! Each function is referenced from a `#[serde(default = "...")]` attribute so
//! that partially written config files keep working as new keys are added.

pub fn min_split_size() -> f64 {
    10.0 // Percent of the parent split
}

pub fn default_split_ratio() -> f64 {
    0.5
}

pub fn dock_center_ratio() -> f64 {
    0.6 // Middle 60% of a pane drops into the pane itself
}

pub fn focus_history_limit() -> usize {
    50
}

pub fn debounce_ms() -> u64 {
    300
}

/// Lower bound of the write coalescing window
pub const DEBOUNCE_MIN_MS: u64 = 250;

/// Upper bound of the write coalescing window
pub const DEBOUNCE_MAX_MS: u64 = 500;

pub fn max_backups() -> usize {
    3
}

pub fn storage_key() -> String {
    "layout".to_string()
}

pub fn region_min_size() -> f64 {
    200.0 // Pixels
}

pub fn primary_side_bar_width() -> f64 {
    300.0
}

pub fn secondary_side_bar_width() -> f64 {
    300.0
}

pub fn panel_height() -> f64 {
    250.0
}

pub fn bool_true() -> bool {
    true
}

pub fn bool_false() -> bool {
    false
}
