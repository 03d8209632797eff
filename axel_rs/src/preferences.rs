//! Key-value boolean preferences, one JSON document per preference group.

use crate::error::{AxelError, AxelResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const KEEP_SCREEN_ON: &str = "KeepScreenOn";

pub trait PreferenceStore {
    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn put_bool(&mut self, key: &str, value: bool) -> AxelResult<()>;
}

/// In-memory store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, bool>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_bool(&mut self, key: &str, value: bool) -> AxelResult<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// File-backed store at `<dir>/<group>.json`
#[derive(Debug, Clone)]
pub struct JsonPreferences {
    path: PathBuf,
    values: BTreeMap<String, bool>,
}

impl JsonPreferences {
    /// Open a group. A missing file reads as empty; a corrupt one is logged
    /// and treated as empty so the next write replaces it.
    pub fn open(dir: &Path, group: &str) -> Self {
        let path = dir.join(format!("{}.json", group));
        let values: BTreeMap<String, bool> = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("Ignoring corrupt preferences {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Failed to read preferences {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        JsonPreferences { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> AxelResult<()> {
        let json = serde_json::to_string_pretty(&self.values)
            .map_err(|e| AxelError::Preferences(e.to_string()))?;
        // Replace atomically via a sibling temp file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| AxelError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| AxelError::io(&self.path, e))?;
        Ok(())
    }
}

impl PreferenceStore for JsonPreferences {
    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_bool(&mut self, key: &str, value: bool) -> AxelResult<()> {
        self.values.insert(key.to_string(), value);
        self.persist()
    }
}
