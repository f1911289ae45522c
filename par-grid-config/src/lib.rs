//! Configuration system for the par-grid editor layout engine.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for the layout engine. It includes:
//!
//! - Split sizing limits and the default split ratio
//! - The docking centre band ratio
//! - Persistence settings (debounce window, backup rotation, storage location)
//! - Chrome region sizing defaults
//! - The log level type shared with the CLI

pub mod config;
pub mod defaults;
pub mod error;
mod types;

pub use config::{GridConfig, PersistenceConfig, RegionConfig};
pub use error::ConfigError;
pub use types::LogLevel;
