//! Typed error variants for the par-grid-config crate.
//!
//! `GridConfig::load` and `GridConfig::save` return `ConfigError` directly so
//! that callers can distinguish a missing directory from a malformed file or a
//! value that failed validation. Callers that use `anyhow` get the conversion
//! for free through `std::error::Error`.

use thiserror::Error;

/// Errors that can occur when loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string names the field and the accepted range.
    #[error("Config validation error: {0}")]
    Validation(String),
}
