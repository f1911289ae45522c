//! Core `GridConfig` struct, YAML persistence and validation.
//!
//! The config file lives at `~/.config/par-grid/config.yaml` (XDG convention on
//! every platform except Windows). A missing file yields the defaults; a file
//! that exists but cannot be parsed or fails validation is an error so that a
//! typo never silently resets the user's settings.

use crate::defaults;
use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for the layout engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    // ========================================================================
    // Split Sizing
    // ========================================================================
    /// Smallest share (in percent) any child of a split may occupy
    #[serde(default = "crate::defaults::min_split_size")]
    pub min_split_size: f64,

    /// Share given to the original leaf when a leaf is split (0.0-1.0)
    #[serde(default = "crate::defaults::default_split_ratio")]
    pub default_split_ratio: f64,

    // ========================================================================
    // Docking & Focus
    // ========================================================================
    /// Fraction of a pane's width/height, centred, that resolves to the
    /// `center` drop zone while dragging a tab
    #[serde(default = "crate::defaults::dock_center_ratio")]
    pub dock_center_ratio: f64,

    /// Maximum number of leaf ids kept in the focus history
    #[serde(default = "crate::defaults::focus_history_limit")]
    pub focus_history_limit: usize,

    // ========================================================================
    // Persistence
    // ========================================================================
    #[serde(default)]
    pub persistence: PersistenceConfig,

    // ========================================================================
    // Chrome Regions
    // ========================================================================
    #[serde(default)]
    pub regions: RegionConfig,

    // ========================================================================
    // Debug Logging
    // ========================================================================
    /// Verbosity of the debug log file
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_split_size: defaults::min_split_size(),
            default_split_ratio: defaults::default_split_ratio(),
            dock_center_ratio: defaults::dock_center_ratio(),
            focus_history_limit: defaults::focus_history_limit(),
            persistence: PersistenceConfig::default(),
            regions: RegionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

/// Where and how often the layout is written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Write coalescing window in milliseconds (clamped to 250..=500)
    #[serde(default = "crate::defaults::debounce_ms")]
    pub debounce_ms: u64,

    /// Number of rotated backups kept next to the primary payload
    #[serde(default = "crate::defaults::max_backups")]
    pub max_backups: usize,

    /// Store key of the primary payload
    #[serde(default = "crate::defaults::storage_key")]
    pub storage_key: String,

    /// Directory for the file store (None = `<config dir>/par-grid/layouts`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::debounce_ms(),
            max_backups: defaults::max_backups(),
            storage_key: defaults::storage_key(),
            directory: None,
        }
    }
}

impl PersistenceConfig {
    /// Debounce window with the allowed range applied
    pub fn effective_debounce_ms(&self) -> u64 {
        self.debounce_ms
            .clamp(defaults::DEBOUNCE_MIN_MS, defaults::DEBOUNCE_MAX_MS)
    }

    /// Directory the file store writes into
    pub fn layouts_dir(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => dir.clone(),
            None => GridConfig::config_dir().join("layouts"),
        }
    }
}

/// Initial sizes and visibility of the chrome regions around the editor grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Minimum width/height in pixels for side bars and the panel
    #[serde(default = "crate::defaults::region_min_size")]
    pub min_size: f64,

    #[serde(default = "crate::defaults::primary_side_bar_width")]
    pub primary_side_bar_width: f64,

    #[serde(default = "crate::defaults::secondary_side_bar_width")]
    pub secondary_side_bar_width: f64,

    #[serde(default = "crate::defaults::panel_height")]
    pub panel_height: f64,

    #[serde(default = "crate::defaults::bool_true")]
    pub show_activity_bar: bool,

    #[serde(default = "crate::defaults::bool_true")]
    pub show_primary_side_bar: bool,

    #[serde(default = "crate::defaults::bool_false")]
    pub show_secondary_side_bar: bool,

    #[serde(default = "crate::defaults::bool_false")]
    pub show_panel: bool,

    #[serde(default = "crate::defaults::bool_true")]
    pub show_status_bar: bool,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_size: defaults::region_min_size(),
            primary_side_bar_width: defaults::primary_side_bar_width(),
            secondary_side_bar_width: defaults::secondary_side_bar_width(),
            panel_height: defaults::panel_height(),
            show_activity_bar: defaults::bool_true(),
            show_primary_side_bar: defaults::bool_true(),
            show_secondary_side_bar: defaults::bool_false(),
            show_panel: defaults::bool_false(),
            show_status_bar: defaults::bool_true(),
        }
    }
}

impl GridConfig {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file
    ///
    /// Returns the defaults when the file does not exist or is empty.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            log::info!("Config file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }

        let config: GridConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        log::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check every field against its accepted range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_split_size > 0.0 && self.min_split_size < 50.0) {
            return Err(ConfigError::Validation(format!(
                "min_split_size must be between 0 and 50 (exclusive), got {}",
                self.min_split_size
            )));
        }
        if !(self.default_split_ratio > 0.0 && self.default_split_ratio < 1.0) {
            return Err(ConfigError::Validation(format!(
                "default_split_ratio must be between 0 and 1 (exclusive), got {}",
                self.default_split_ratio
            )));
        }
        if !(self.dock_center_ratio > 0.0 && self.dock_center_ratio < 1.0) {
            return Err(ConfigError::Validation(format!(
                "dock_center_ratio must be between 0 and 1 (exclusive), got {}",
                self.dock_center_ratio
            )));
        }
        if self.focus_history_limit == 0 {
            return Err(ConfigError::Validation(
                "focus_history_limit must be at least 1".to_string(),
            ));
        }
        if self.persistence.max_backups > 20 {
            return Err(ConfigError::Validation(format!(
                "persistence.max_backups must be at most 20, got {}",
                self.persistence.max_backups
            )));
        }
        if self.persistence.storage_key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "persistence.storage_key must not be empty".to_string(),
            ));
        }
        if self.regions.min_size.is_nan() || self.regions.min_size <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "regions.min_size must be positive, got {}",
                self.regions.min_size
            )));
        }
        Ok(())
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("par-grid")
        }
        #[cfg(not(target_os = "windows"))]
        {
            match dirs::home_dir() {
                Some(home_dir) => home_dir.join(".config").join("par-grid"),
                // Fallback if home directory cannot be determined
                None => PathBuf::from("."),
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }
}
