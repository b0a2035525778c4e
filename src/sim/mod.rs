//! Deterministic game core
//!
//! Board construction and per-tick race logic. This module must stay pure
//! and deterministic:
//! - Build is a single synchronous pass over literal board data
//! - Stable iteration order (scanline) for emitted panels
//! - No rendering or platform dependencies

pub mod board;
pub mod geometry;
pub mod gravity;
pub mod grid;
pub mod mask;
pub mod packer;
pub mod tick;
pub mod timer;

pub use board::{Bar, BoardDefinition, BoardError, BuiltBoard, Edge};
pub use geometry::{BoardGeometry, Panel};
pub use gravity::{
    GravityMapping, GravityReader, GravityWriter, MotionFeed, MotionSample, MotionThrottle,
    gravity_channel,
};
pub use grid::{GridCell, GridRect, OccupancyGrid};
pub use mask::{Hole, mask_hole, mask_holes};
pub use packer::{PanelPacker, pack};
pub use tick::{GameSession, TickInput, TickOutput};
pub use timer::{BoardAxis, Course, FinishZone, RaceEvent, RaceState, RaceTimer, StartLine};
