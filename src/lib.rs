//! Marble Maze - a tilt-controlled marble race
//!
//! Core modules:
//! - `sim`: Deterministic core (panel synthesis, race timer, gravity feed)
//! - `boards`: Built-in board variants and generated practice boards
//! - `physics`: Collision body descriptions for the external physics engine
//! - `platform`: Browser bindings (device motion, JS export)
//! - `records`: Best-time persistence
//! - `settings`: Player preferences

pub mod boards;
pub mod physics;
pub mod platform;
pub mod records;
pub mod settings;
pub mod sim;

pub use records::{BestTimes, KeyValueStore, MemoryStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Grid cells per world unit when rasterizing a board
    pub const BOARD_RESOLUTION: f32 = 10.0;
    /// Panel slab thickness (top face at y = 0)
    pub const PANEL_THICKNESS: f32 = 0.1;

    /// Perimeter wall defaults
    pub const EDGE_HEIGHT: f32 = 0.3;
    pub const EDGE_THICKNESS: f32 = 0.1;

    /// Marble defaults
    pub const MARBLE_RADIUS: f32 = 0.1;
    /// Below this world y the marble has dropped through a hole
    pub const FALL_DEPTH: f32 = -1.0;

    /// Gravity magnitude for a fully tilted device (m/s²)
    pub const DEFAULT_GRAVITY_SCALE: f32 = 9.8;
    /// Upper bound accepted from settings
    pub const MAX_GRAVITY_SCALE: f32 = 20.0;
    /// Motion sensor sampling interval
    pub const SENSOR_INTERVAL_MS: f64 = 100.0;
}
