//! Schema migrations for persisted layouts
//!
//! Each migration is a pure function from one version's JSON shape to the
//! next. `migrate` walks the chain from the payload's version up to
//! [`CURRENT_VERSION`], so adding version N+1 means registering one more step.

use super::error::{PersistenceError, Result};
use crate::regions::RegionState;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Version written by this build
pub const CURRENT_VERSION: u32 = 1;

type Migration = fn(Value) -> Result<Value>;

/// Migration steps keyed by the version they upgrade from
fn registry() -> BTreeMap<u32, Migration> {
    let mut steps: BTreeMap<u32, Migration> = BTreeMap::new();
    steps.insert(0, migrate_v0_to_v1);
    steps
}

/// Version of a raw payload; unversioned payloads are version 0
pub fn detect_version(value: &Value) -> Result<u32> {
    match value.get("version") {
        None | Some(Value::Null) => Ok(0),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| PersistenceError::InvalidShape(format!("bad version field {}", v))),
    }
}

/// Upgrade a raw payload to the current schema version
pub fn migrate(mut value: Value) -> Result<Value> {
    if !value.is_object() {
        return Err(PersistenceError::InvalidShape(
            "layout payload is not an object".to_string(),
        ));
    }

    let mut version = detect_version(&value)?;
    if version > CURRENT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: version,
            current: CURRENT_VERSION,
        });
    }

    let steps = registry();
    while version < CURRENT_VERSION {
        let step = steps
            .get(&version)
            .ok_or(PersistenceError::MissingMigration(version))?;
        value = step(value)?;
        version += 1;
        if let Some(obj) = value.as_object_mut() {
            obj.insert("version".to_string(), Value::from(version));
        }
        log::info!("Migrated layout payload to version {}", version);
    }
    Ok(value)
}

/// Version 0: unversioned payloads from before the regions model
///
/// - the tree lived under `layout`
/// - the bottom panel was `bottomPanel`, either top level or inside `regions`
/// - `regions` could be missing entirely
/// - the active leaf was a top-level `activeLeafId`
fn migrate_v0_to_v1(value: Value) -> Result<Value> {
    let Value::Object(mut obj) = value else {
        return Err(PersistenceError::InvalidShape(
            "layout payload is not an object".to_string(),
        ));
    };

    if !obj.contains_key("editorGrid")
        && let Some(tree) = obj.remove("layout")
    {
        obj.insert("editorGrid".to_string(), tree);
    }

    let mut regions = match obj.remove("regions") {
        Some(Value::Object(regions)) => regions,
        _ => match serde_json::to_value(RegionState::default())? {
            Value::Object(defaults) => defaults,
            _ => Map::new(),
        },
    };
    let legacy_panel = regions
        .remove("bottomPanel")
        .or_else(|| obj.remove("bottomPanel"));
    if let Some(panel) = legacy_panel {
        regions.entry("panel").or_insert(panel);
    }
    obj.insert("regions".to_string(), Value::Object(regions));

    if let Some(leaf_id) = obj.remove("activeLeafId")
        && !obj.contains_key("lastFocused")
    {
        let mut focused = Map::new();
        focused.insert("region".to_string(), Value::from("editorGrid"));
        focused.insert("leafId".to_string(), leaf_id);
        obj.insert("lastFocused".to_string(), Value::Object(focused));
    }

    Ok(Value::Object(obj))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unversioned_payload_is_version_zero() {
        assert_eq!(detect_version(&json!({"layout": {}})).unwrap(), 0);
        assert_eq!(detect_version(&json!({"version": 1})).unwrap(), 1);
        assert!(detect_version(&json!({"version": "one"})).is_err());
    }

    #[test]
    fn test_v0_moves_tree_and_panel() {
        let legacy = json!({
            "layout": {"type": "leaf", "id": "l1", "tabs": []},
            "bottomPanel": {"visible": true, "height": 320.0},
            "activeLeafId": "l1"
        });
        let migrated = migrate(legacy).unwrap();
        assert_eq!(migrated["version"], json!(CURRENT_VERSION));
        assert_eq!(migrated["editorGrid"]["id"], json!("l1"));
        assert!(migrated.get("layout").is_none());
        assert_eq!(migrated["regions"]["panel"]["height"], json!(320.0));
        assert_eq!(migrated["regions"]["primarySideBar"]["width"], json!(300.0));
        assert_eq!(migrated["lastFocused"]["leafId"], json!("l1"));
    }

    #[test]
    fn test_v0_keeps_existing_regions() {
        let legacy = json!({
            "layout": {"type": "leaf", "id": "l1"},
            "regions": {"statusBar": {"visible": false}, "bottomPanel": {"visible": false, "height": 210.0}}
        });
        let migrated = migrate(legacy).unwrap();
        assert_eq!(migrated["regions"]["statusBar"]["visible"], json!(false));
        assert_eq!(migrated["regions"]["panel"]["height"], json!(210.0));
        assert!(migrated["regions"].get("bottomPanel").is_none());
    }

    #[test]
    fn test_current_version_passes_through() {
        let payload = json!({"version": 1, "editorGrid": {"type": "leaf"}, "regions": {}});
        assert_eq!(migrate(payload.clone()).unwrap(), payload);
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = migrate(json!({"version": 99}));
        assert!(matches!(
            result,
            Err(PersistenceError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            migrate(json!([1, 2, 3])),
            Err(PersistenceError::InvalidShape(_))
        ));
    }
}
