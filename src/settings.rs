//! Game settings and preferences
//!
//! Persisted separately from best times in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::records::KeyValueStore;
use crate::sim::{BoardDefinition, GravityMapping};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Selected board id
    pub board: String,

    // === Controls ===
    /// Replace the board's own gravity scale (clamped to a sane range)
    pub gravity_scale_override: Option<f32>,
    /// Motion sensor sampling interval (ms)
    pub sensor_interval_ms: f64,

    // === Board ===
    /// Panel slab thickness
    pub panel_thickness: f32,
    /// Draw panel outlines (debug)
    pub show_panels: bool,

    // === Accessibility ===
    /// Reduced motion (gentler gravity)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            board: crate::boards::DEFAULT_BOARD.to_string(),

            gravity_scale_override: None,
            sensor_interval_ms: SENSOR_INTERVAL_MS,

            panel_thickness: PANEL_THICKNESS,
            show_panels: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Gravity scale to use on `board`
    pub fn effective_gravity_scale(&self, board: &BoardDefinition) -> f32 {
        let scale = self
            .gravity_scale_override
            .unwrap_or(board.gravity_scale)
            .clamp(1.0, MAX_GRAVITY_SCALE);
        if self.reduced_motion {
            scale.min(DEFAULT_GRAVITY_SCALE)
        } else {
            scale
        }
    }

    /// Tilt mapping for `board`
    pub fn gravity_mapping(&self, board: &BoardDefinition) -> GravityMapping {
        GravityMapping::with_scale(self.effective_gravity_scale(board))
    }

    /// Parse settings JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "marble_maze_settings";

    /// Read settings from `store`, falling back to defaults
    pub fn load_from<S: KeyValueStore>(store: &S) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Discarding unreadable settings: {e}"),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save_to<S: KeyValueStore>(&self, store: &mut S) {
        match serde_json::to_string(self) {
            Ok(json) => {
                store.set(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
            Err(e) => log::warn!("Failed to serialize settings: {e}"),
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::load_from(&crate::records::LocalStore)
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        self.save_to(&mut crate::records::LocalStore);
    }

    /// Native builds always start from defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
