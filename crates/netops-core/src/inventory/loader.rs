//! Local (declarative) inventory loader

use super::model::{Device, InventorySnapshot, SnapshotSource};
use crate::error::{NetopsError, NetopsResult};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use tracing::{info, warn};

/// On-disk layout: `devices:` at the top level
#[derive(Debug, Default, Deserialize)]
struct InventoryDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    devices: Vec<Device>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Device>, D::Error> {
    Option::<Vec<Device>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Load a local inventory file.
///
/// The document is either a mapping with a `devices` list or a bare list of
/// device records. A missing file is [`NetopsError::NotFound`]; a file that
/// is not UTF-8, is not valid YAML, or whose top level has the wrong shape is
/// [`NetopsError::Parse`]. Every call re-reads the file.
pub fn load_local_inventory(path: impl AsRef<Path>) -> NetopsResult<InventorySnapshot> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => NetopsError::NotFound {
            path: path.to_path_buf(),
        },
        _ => NetopsError::Io(e),
    })?;
    let content = String::from_utf8(bytes)
        .map_err(|e| NetopsError::parse(path, format!("file is not valid UTF-8: {}", e)))?;
    let devices = parse_inventory(path, &content)?;

    info!(devices = devices.len(), path = %path.display(), "Loaded local inventory");
    Ok(InventorySnapshot::new(devices, SnapshotSource::Yaml))
}

fn parse_inventory(path: &Path, content: &str) -> NetopsResult<Vec<Device>> {
    if content.trim().is_empty() {
        warn!(path = %path.display(), "Inventory file is empty");
        return Ok(Vec::new());
    }

    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| NetopsError::parse(path, e.to_string()))?;

    match value {
        serde_yaml::Value::Null => {
            warn!(path = %path.display(), "Inventory file has no content");
            Ok(Vec::new())
        }
        serde_yaml::Value::Sequence(_) => {
            serde_path_to_error::deserialize::<_, Vec<Device>>(value)
                .map_err(|e| NetopsError::parse(path, describe(&e)))
        }
        serde_yaml::Value::Mapping(_) => {
            serde_path_to_error::deserialize::<_, InventoryDocument>(value)
                .map(|doc| doc.devices)
                .map_err(|e| NetopsError::parse(path, describe(&e)))
        }
        other => Err(NetopsError::parse(
            path,
            format!(
                "expected a `devices` list at the top level, found {}",
                kind_of(&other)
            ),
        )),
    }
}

fn describe(err: &serde_path_to_error::Error<serde_yaml::Error>) -> String {
    let at = err.path().to_string();
    if at == "." {
        err.inner().to_string()
    } else {
        format!("at `{}`: {}", at, err.inner())
    }
}

fn kind_of(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a list",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
