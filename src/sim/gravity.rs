//! Tilt-derived gravity
//!
//! The motion sensor writes into a single shared slot at its own pace; the
//! simulation reads whatever arrived last. Nothing is queued. Until the first
//! sample arrives the slot is empty and physics keeps its default gravity.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::SENSOR_INTERVAL_MS;

/// One raw accelerometer reading, device axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl MotionSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn axis(&self, axis: DeviceAxis) -> f32 {
        match axis {
            DeviceAxis::X => self.x,
            DeviceAxis::Y => self.y,
            DeviceAxis::Z => self.z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceAxis {
    X,
    Y,
    Z,
}

/// Source of one world gravity component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMap {
    pub from: DeviceAxis,
    /// +1.0 or -1.0
    pub sign: f32,
}

impl AxisMap {
    pub const fn new(from: DeviceAxis, sign: f32) -> Self {
        Self { from, sign }
    }
}

/// Fixed permutation + scale from device acceleration to world gravity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityMapping {
    /// World x, y, z in order
    pub axes: [AxisMap; 3],
    pub scale: f32,
}

impl Default for GravityMapping {
    /// Phone lying flat, screen up, top edge pointing at the far end of the board
    fn default() -> Self {
        Self {
            axes: [
                AxisMap::new(DeviceAxis::X, 1.0),
                AxisMap::new(DeviceAxis::Z, 1.0),
                AxisMap::new(DeviceAxis::Y, -1.0),
            ],
            scale: crate::consts::DEFAULT_GRAVITY_SCALE,
        }
    }
}

impl GravityMapping {
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Map a normalized (units of g) sample to world gravity
    pub fn apply(&self, sample: MotionSample) -> Vec3 {
        let component = |m: AxisMap| sample.axis(m.from) * m.sign * self.scale;
        Vec3::new(
            component(self.axes[0]),
            component(self.axes[1]),
            component(self.axes[2]),
        )
    }
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<Vec3>,
    /// Set on write, cleared by `take_latest`
    fresh: bool,
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    // A panicked writer leaves a complete Vec3 behind; keep using it
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sensor side of the gravity slot
#[derive(Debug, Clone)]
pub struct GravityWriter {
    slot: Arc<Mutex<Slot>>,
}

impl GravityWriter {
    /// Overwrite the slot; the previous value is dropped
    pub fn publish(&self, gravity: Vec3) {
        let mut slot = lock(&self.slot);
        slot.value = Some(gravity);
        slot.fresh = true;
    }
}

/// Simulation side of the gravity slot
#[derive(Debug, Clone)]
pub struct GravityReader {
    slot: Arc<Mutex<Slot>>,
}

impl GravityReader {
    /// Last published value, if any ever arrived
    pub fn latest(&self) -> Option<Vec3> {
        lock(&self.slot).value
    }

    /// Last published value, only if it has not been taken yet
    pub fn take_latest(&self) -> Option<Vec3> {
        let mut slot = lock(&self.slot);
        if slot.fresh {
            slot.fresh = false;
            slot.value
        } else {
            None
        }
    }
}

/// Create a connected writer/reader pair with an empty slot
pub fn gravity_channel() -> (GravityWriter, GravityReader) {
    let slot = Arc::new(Mutex::new(Slot::default()));
    (
        GravityWriter { slot: slot.clone() },
        GravityReader { slot },
    )
}

/// Drops samples that arrive faster than the sensor interval
#[derive(Debug, Clone)]
pub struct MotionThrottle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Default for MotionThrottle {
    fn default() -> Self {
        Self::new(SENSOR_INTERVAL_MS)
    }
}

impl MotionThrottle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    /// Should a sample arriving at `now_ms` be forwarded?
    pub fn accept(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

/// Sensor pipeline: throttle, map, publish
#[derive(Debug, Clone)]
pub struct MotionFeed {
    throttle: MotionThrottle,
    mapping: GravityMapping,
    writer: GravityWriter,
}

impl MotionFeed {
    pub fn new(writer: GravityWriter, mapping: GravityMapping, interval_ms: f64) -> Self {
        Self {
            throttle: MotionThrottle::new(interval_ms),
            mapping,
            writer,
        }
    }

    /// Handle one raw reading. Returns the published gravity when accepted.
    pub fn on_sample(&mut self, now_ms: f64, sample: MotionSample) -> Option<Vec3> {
        if !self.throttle.accept(now_ms) {
            return None;
        }
        let gravity = self.mapping.apply(sample);
        self.writer.publish(gravity);
        Some(gravity)
    }
}
