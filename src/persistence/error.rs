//! Typed errors for layout persistence.
//!
//! These never reach the layout consumer: `load_layout` turns every variant
//! into a fallback. They surface through the store API, the CLI and logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing store failed to read, write or remove a payload.
    #[error("Layout store I/O failed: {0}")]
    Store(#[from] std::io::Error),

    /// The payload is not valid JSON or does not match the schema.
    #[error("Layout JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Required top-level fields are missing or have the wrong type.
    #[error("Invalid layout shape: {0}")]
    InvalidShape(String),

    /// The payload was written by a newer build.
    #[error("Layout version {found} is newer than supported version {current}")]
    UnsupportedVersion { found: u32, current: u32 },

    /// No migration is registered for an older version.
    #[error("No migration registered for layout version {0}")]
    MissingMigration(u32),

    /// Store keys must be plain file-name-safe identifiers.
    #[error("Invalid store key '{0}'")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
