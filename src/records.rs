//! Best race times
//!
//! Persisted per board through a small key-value store. A stored value of 0
//! (or no value at all) means no run has been finished yet.

use std::collections::HashMap;

/// String key-value storage the best times live in
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Process-local store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("Failed to write {key} to LocalStorage");
                }
            }
            None => log::warn!("LocalStorage unavailable, {key} not saved"),
        }
    }
}

/// Best-time bookkeeping for one board
#[derive(Debug, Clone)]
pub struct BestTimes<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> BestTimes<S> {
    /// Storage key prefix; the board id is appended
    pub const STORAGE_KEY: &'static str = "marble_maze_best_time";

    pub fn new(store: S, board_id: &str) -> Self {
        Self {
            store,
            key: format!("{}.{}", Self::STORAGE_KEY, board_id),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored best in seconds, 0.0 when absent or unreadable
    pub fn load_raw(&self) -> f64 {
        match self.store.get(&self.key) {
            Some(text) => text.trim().parse::<f64>().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable best time {text:?} under {}", self.key);
                0.0
            }),
            None => 0.0,
        }
    }

    /// Stored best, `None` until a run has been finished
    pub fn load(&self) -> Option<f64> {
        Some(self.load_raw()).filter(|t| t.is_finite() && *t > 0.0)
    }

    /// Would `time` beat the stored best?
    pub fn qualifies(&self, time: f64) -> bool {
        time > 0.0 && self.load().is_none_or(|best| time < best)
    }

    /// Store `time` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, time: f64) -> bool {
        if !self.qualifies(time) {
            return false;
        }
        self.store.set(&self.key, &time.to_string());
        log::info!("New best time {} for {}", format_race_time(time), self.key);
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Format seconds as `m:ss.cc`
pub fn format_race_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let minutes = centis / 6000;
    let secs = (centis / 100) % 60;
    let hundredths = centis % 100;
    format!("{minutes}:{secs:02}.{hundredths:02}")
}
