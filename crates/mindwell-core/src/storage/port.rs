//! Key-value persistence port.
//!
//! The core persists small JSON documents through this port on every
//! mutation, last-write-wins. The port never surfaces failures: reads fall
//! back to the caller's default and writes are best-effort with a logged
//! warning, so the in-memory state always remains the source of truth.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Document keys used by the core.
pub mod keys {
    pub const PRESETS: &str = "presets";
    pub const ACTIVE_PRESET: &str = "active_preset";
    pub const SETTINGS: &str = "settings";
    pub const TIMER_STATE: &str = "timer_state";
    pub const SESSION_STATS: &str = "session_stats";
}

/// Raw string key-value store. Object safe so implementations can be
/// injected as `Box<dyn StoragePort>`.
pub trait StoragePort {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&mut self, key: &str, value: &str);
}

/// Read a document, falling back to `default` on any missing, unreadable,
/// or corrupted value. Never fails.
pub fn load<T: DeserializeOwned>(port: &dyn StoragePort, key: &str, default: T) -> T {
    let Some(raw) = port.get(key) else {
        return default;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("discarding corrupted document '{key}': {e}");
            default
        }
    }
}

/// Write a document. Best-effort: serialization or write failures are
/// logged and never returned to the caller.
pub fn save<T: Serialize>(port: &mut dyn StoragePort, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => port.put(key, &raw),
        Err(e) => log::warn!("failed to serialize document '{key}': {e}"),
    }
}

/// One JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store under the default app data directory.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(super::data_dir()?))
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StoragePort for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn put(&mut self, key: &str, value: &str) {
        if let Err(e) = std::fs::write(self.path(key), value) {
            log::warn!("failed to persist '{key}': {e}");
        }
    }
}

/// HashMap-backed store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }
}
