//! Save/load of the game as a JSON document
//!
//! Features:
//! - Every field optional on read; missing fields keep the current value
//! - Field-level leniency: one malformed field is skipped, not the whole save
//! - Atomic write (tmp file, then rename)

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::sim::GamePhase;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("Failed to access save file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode or decode save data: {0}")]
    Json(#[from] serde_json::Error),
}

/// One ball in the save document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vel: Option<[f32; 2]>,
}

/// The persisted world
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balls: Option<Vec<BallRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_compressions: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med_compression: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<GamePhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_score: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_achievement_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grav_vec: Option<[f32; 2]>,
}

/// Decode `key` from `obj`, logging and skipping a value of the wrong shape
fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key)?;
    match T::deserialize(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Ignoring malformed save field '{}': {}", key, e);
            None
        }
    }
}

impl BallRecord {
    fn from_value(value: &Value) -> Option<Self> {
        let Some(obj) = value.as_object() else {
            log::warn!("Ignoring malformed ball record: {}", value);
            return None;
        };
        Some(Self {
            size: field(obj, "size"),
            pos: field(obj, "pos"),
            vel: field(obj, "vel"),
        })
    }
}

impl SaveData {
    /// Permissive decode of a parsed document
    ///
    /// Never fails: anything unusable is left as `None`.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            log::warn!("Save document is not an object, ignoring it");
            return Self::default();
        };

        let balls = match obj.get("balls") {
            Some(Value::Array(items)) => {
                Some(items.iter().filter_map(BallRecord::from_value).collect())
            }
            Some(other) => {
                log::warn!("Ignoring malformed save field 'balls': {}", other);
                None
            }
            None => None,
        };

        Self {
            balls,
            last_compressions: field(obj, "last_compressions"),
            med_compression: field(obj, "med_compression"),
            state: field(obj, "state"),
            paused: field(obj, "paused"),
            score: field(obj, "score"),
            high_score: field(obj, "high_score"),
            next_achievement_size: field(obj, "next_achievement_size"),
            grav_vec: field(obj, "grav_vec"),
        }
    }

    /// Parse a JSON string. Only invalid JSON syntax is an error.
    pub fn from_json_str(json: &str) -> Result<Self, PersistError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    pub fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(self)?)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `data` to `path`, replacing any previous save atomically
pub fn save_to_file(path: &Path, data: &SaveData) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = data.to_json_string()?;
    let tmp = tmp_path(path);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    log::info!("Game saved to {}", path.display());
    Ok(())
}

/// Read a save from `path`; `Ok(None)` when there is no save yet
pub fn load_from_file(path: &Path) -> Result<Option<SaveData>, PersistError> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("No save found at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    let data = SaveData::from_json_str(&json)?;
    log::info!("Loaded save from {}", path.display());
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_document() {
        let json = r#"{
            "balls": [{"size": 3, "pos": [10.0, 20.0], "vel": [1.5, -2.0]}],
            "last_compressions": [0.0, 1.0],
            "med_compression": 1.0,
            "state": "EXTENDED",
            "score": 40,
            "high_score": 96,
            "next_achievement_size": 6,
            "grav_vec": [0.0, 200.0]
        }"#;
        let data = SaveData::from_json_str(json).unwrap();
        assert_eq!(
            data.balls,
            Some(vec![BallRecord {
                size: Some(3),
                pos: Some([10.0, 20.0]),
                vel: Some([1.5, -2.0]),
            }])
        );
        assert_eq!(data.last_compressions, Some(vec![0.0, 1.0]));
        assert_eq!(data.state, Some(GamePhase::Extended));
        assert_eq!(data.score, Some(40));
        assert_eq!(data.high_score, Some(96));
        assert_eq!(data.next_achievement_size, Some(6));
        assert_eq!(data.grav_vec, Some([0.0, 200.0]));
        assert_eq!(data.paused, None);
    }

    #[test]
    fn test_malformed_fields_are_skipped() {
        let json = r#"{
            "balls": [{"size": "big", "pos": [1.0, 2.0]}, 7],
            "state": "SOMETIMES",
            "score": -3,
            "high_score": 12,
            "grav_vec": [1.0]
        }"#;
        let data = SaveData::from_json_str(json).unwrap();
        assert_eq!(
            data.balls,
            Some(vec![BallRecord {
                size: None,
                pos: Some([1.0, 2.0]),
                vel: None,
            }])
        );
        assert_eq!(data.state, None);
        assert_eq!(data.score, None);
        assert_eq!(data.high_score, Some(12));
        assert_eq!(data.grav_vec, None);
    }

    #[test]
    fn test_non_object_document() {
        assert_eq!(SaveData::from_json_str("[1, 2]").unwrap(), SaveData::default());
        assert!(SaveData::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_state_names_on_the_wire() {
        let data = SaveData {
            state: Some(GamePhase::Lose),
            ..Default::default()
        };
        assert_eq!(data.to_json_string().unwrap(), r#"{"state":"LOSE"}"#);
    }

    #[test]
    fn test_file_roundtrip_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("balls-2050-persist-{}", std::process::id()));
        let path = dir.join("save.json");
        let _ = fs::remove_file(&path);
        assert!(load_from_file(&path).unwrap().is_none());

        let data = SaveData {
            score: Some(12),
            grav_vec: Some([-200.0, 0.0]),
            ..Default::default()
        };
        save_to_file(&path, &data).unwrap();
        assert!(!tmp_path(&path).exists());
        assert_eq!(load_from_file(&path).unwrap(), Some(data));
        let _ = fs::remove_dir_all(&dir);
    }
}
