//! Configuration file checks: report and fill keys missing from an older file.

use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use super::Config;
use crate::errors::{AppError, AppResult};

/// Keys a complete configuration file carries.
pub const KNOWN_KEYS: &[&str] = &[
    "database",
    "port",
    "hash_cost",
    "jwt_secret",
    "queue_name",
    "relay_timeout_ms",
];

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    let yaml: Value =
        serde_yaml::from_str(content).map_err(|e| AppError::Config(e.to_string()))?;
    match yaml {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config("configuration is not a YAML mapping".into())),
    }
}

/// Keys of [`KNOWN_KEYS`] absent from `content`.
pub fn missing_keys(content: &str) -> AppResult<Vec<&'static str>> {
    let map = parse_mapping(content)?;
    Ok(KNOWN_KEYS
        .iter()
        .copied()
        .filter(|k| !map.contains_key(Value::String(k.to_string())))
        .collect())
}

/// Add every missing key to the file at `path` with its default value.
/// Existing values are left untouched. Returns the keys that were added.
pub fn fill_missing(path: &Path) -> AppResult<Vec<&'static str>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    let mut map = parse_mapping(&content)?;

    let defaults = match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(m)) => m,
        _ => return Err(AppError::ConfigSave),
    };

    let mut added = Vec::new();
    for key in KNOWN_KEYS {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k)
            && let Some(v) = defaults.get(&k)
        {
            map.insert(k, v.clone());
            added.push(*key);
        }
    }

    if !added.is_empty() {
        let serialized =
            serde_yaml::to_string(&Value::Mapping(map)).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;
    }

    Ok(added)
}
