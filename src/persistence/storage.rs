//! Encoding, backup rotation and fallback loading of layout payloads
//!
//! Payloads are JSON. Saving copies the previous primary payload into
//! `<key>.bak.1` (shifting older backups up) before writing. Loading tries the
//! primary payload, then each backup from newest to oldest, then the default
//! layout; it never fails.

use super::capture::capture_layout;
use super::error::{PersistenceError, Result};
use super::migration::migrate;
use super::store::LayoutStore;
use super::{LastFocused, PersistedLayout};
use crate::grid::{EditorGridState, GridSettings};
use crate::regions::RegionState;
use par_grid_config::GridConfig;
use serde_json::Value;

/// Where a loaded layout came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    /// Backup number (1 is the newest)
    Backup(usize),
    Default,
}

/// A loaded layout and its source
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub layout: PersistedLayout,
    pub source: LoadSource,
}

/// Store key of the `n`th backup
pub fn backup_key(key: &str, n: usize) -> String {
    format!("{}.bak.{}", key, n)
}

/// Serialize a layout for the store
pub fn encode_layout(layout: &PersistedLayout) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(layout)?)
}

/// Parse, migrate and validate a stored payload
pub fn decode_layout(bytes: &[u8]) -> Result<PersistedLayout> {
    let value: Value = serde_json::from_slice(bytes)?;
    let value = migrate(value)?;
    validate_shape(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// The tree and the regions must both be present objects
fn validate_shape(value: &Value) -> Result<()> {
    for field in ["editorGrid", "regions"] {
        match value.get(field) {
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(PersistenceError::InvalidShape(format!(
                    "'{}' is not an object",
                    field
                )));
            }
            None => {
                return Err(PersistenceError::InvalidShape(format!(
                    "missing '{}'",
                    field
                )));
            }
        }
    }
    Ok(())
}

/// The hard-coded layout used when nothing usable is stored
pub fn default_layout(config: &GridConfig) -> PersistedLayout {
    capture_layout(
        &EditorGridState::new(GridSettings::from(config)),
        &RegionState::from_config(&config.regions),
        &LastFocused::default(),
    )
}

/// Write a layout, rotating up to `max_backups` backups first
///
/// Backup failures are logged and never prevent the primary write.
pub fn save_layout(
    store: &dyn LayoutStore,
    key: &str,
    layout: &PersistedLayout,
    max_backups: usize,
) -> Result<()> {
    let bytes = encode_layout(layout)?;
    if max_backups > 0
        && let Err(e) = rotate_backups(store, key, max_backups)
    {
        log::warn!("Layout backup rotation for '{}' failed: {}", key, e);
    }
    store.save(key, &bytes)?;
    crate::debug_info!("PERSIST", "Saved layout '{}' ({} bytes)", key, bytes.len());
    Ok(())
}

/// Shift backups up by one and copy the current primary into slot 1
fn rotate_backups(store: &dyn LayoutStore, key: &str, max_backups: usize) -> Result<()> {
    let Some(current) = store.load(key)? else {
        return Ok(());
    };
    if let Err(e) = decode_layout(&current) {
        crate::debug_log!("PERSIST", "Not backing up unusable primary '{}': {}", key, e);
        return Ok(());
    }

    store.remove(&backup_key(key, max_backups))?;
    for n in (1..max_backups).rev() {
        if let Some(bytes) = store.load(&backup_key(key, n))? {
            store.save(&backup_key(key, n + 1), &bytes)?;
        }
    }
    store.save(&backup_key(key, 1), &current)?;
    Ok(())
}

fn read_layout(store: &dyn LayoutStore, key: &str) -> Result<Option<PersistedLayout>> {
    store.load(key)?.map(|bytes| decode_layout(&bytes)).transpose()
}

/// Load the layout stored under `key`, degrading to backups and then defaults
pub fn load_layout(store: &dyn LayoutStore, key: &str, config: &GridConfig) -> LoadOutcome {
    let keys = std::iter::once((key.to_string(), LoadSource::Primary)).chain(
        (1..=config.persistence.max_backups).map(|n| (backup_key(key, n), LoadSource::Backup(n))),
    );

    for (candidate, source) in keys {
        match read_layout(store, &candidate) {
            Ok(Some(mut layout)) => {
                layout.regions = layout.regions.normalized(config.regions.min_size);
                log::info!("Loaded layout from '{}' ({:?})", candidate, source);
                return LoadOutcome { layout, source };
            }
            Ok(None) => {
                crate::debug_log!("PERSIST", "No payload under '{}'", candidate);
            }
            Err(e) => {
                log::warn!("Stored layout '{}' is unusable: {}", candidate, e);
            }
        }
    }

    log::info!("No usable layout under '{}', using the default layout", key);
    LoadOutcome {
        layout: default_layout(config),
        source: LoadSource::Default,
    }
}
