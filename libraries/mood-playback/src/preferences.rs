//! Volume preference persistence
//!
//! The volume level is the only value that survives a restart. It lives in a
//! `PreferenceStore` under [`VOLUME_KEY`] as a decimal string.

use crate::error::Result;
use crate::volume::Volume;
use mood_core::{MoodError, PreferenceStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Preference key holding the volume level
pub const VOLUME_KEY: &str = "music-player-volume";

/// Load the stored volume, falling back to `default` when absent or invalid
pub fn load_volume(store: &dyn PreferenceStore, default: u8) -> Volume {
    match store.get(VOLUME_KEY) {
        Some(raw) => Volume::parse(&raw).unwrap_or_else(|| {
            warn!(value = %raw, "Ignoring unparsable volume preference");
            Volume::new(i32::from(default))
        }),
        None => Volume::new(i32::from(default)),
    }
}

/// Persist the volume level
pub fn save_volume(store: &dyn PreferenceStore, volume: Volume) -> Result<()> {
    store.set(VOLUME_KEY, &volume.level().to_string())?;
    Ok(())
}

/// Preference store backed by a JSON object on disk
///
/// The whole file is read once on open and rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFilePreferenceStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty store; a corrupt file is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            BTreeMap::new()
        };

        debug!(path = %path.display(), entries = values.len(), "Opened preference file");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, values: &BTreeMap<String, String>) -> std::result::Result<(), MoodError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> std::result::Result<(), MoodError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| MoodError::preferences(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        self.write(&values)
    }
}
