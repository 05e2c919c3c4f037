//! Persistent player preferences
//!
//! Coins and lifetime kill count survive restarts through a small
//! key/value store. The simulation only sees the `PrefStore` trait;
//! `JsonFileStore` is the shipping backend and `MemoryStore` keeps tests
//! free of filesystem traffic.

use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::PathBuf;

/// Key for the banked coin balance
pub const COINS_KEY: &str = "playerCoins";
/// Key for the lifetime enemy kill count
pub const KILLS_KEY: &str = "enemiesKilled";

/// Integer key/value persistence used for cross-run progression
pub trait PrefStore: Send + Debug {
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn put_int(&mut self, key: &str, value: i32);
}

/// In-memory store, nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, i32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
    }
}

/// JSON-file-backed store, flushed on every write
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, i32>,
}

impl JsonFileStore {
    /// Load from `path`, falling back to an empty store if the file is
    /// missing or unreadable
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("ignoring malformed prefs file {}: {e}", path.display());
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    fn flush(&self) {
        let json = match serde_json::to_string_pretty(&self.values) {
            Ok(json) => json,
            Err(e) => {
                log::error!("failed to serialize prefs: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent)
        {
            log::error!("failed to create prefs dir {}: {e}", parent.display());
            return;
        }
        if let Err(e) = fs::write(&self.path, json) {
            log::error!("failed to write prefs file {}: {e}", self.path.display());
        }
    }
}

impl PrefStore for JsonFileStore {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn put_int(&mut self, key: &str, value: i32) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}
