//! Hand-off to the rigid-body engine
//!
//! The engine itself lives outside this crate. Boards describe their static
//! geometry as [`BodySpec`]s and push them through [`PhysicsWorld`], which
//! the engine integration implements.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// How the body participates in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Never moves
    Fixed,
    /// Moved by the game, not by forces; still blocks the marble
    Kinematic,
}

/// Collision shape in body-local space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    /// Axis along local Y
    Cylinder { half_height: f32, radius: f32 },
}

/// Surface response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.3,
            friction: 0.5,
        }
    }
}

/// What a body represents on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRole {
    Panel(usize),
    Bar(usize),
    Edge(usize),
}

/// Full description of one collision body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub role: BodyRole,
    pub kind: BodyKind,
    pub shape: ColliderShape,
    pub position: Vec3,
    pub rotation: Quat,
    pub material: ColliderMaterial,
}

/// The slice of a physics engine the game core drives
pub trait PhysicsWorld {
    type Handle;

    /// Create a static or kinematic body
    fn add_body(&mut self, body: &BodySpec) -> Self::Handle;

    /// Replace global gravity
    fn set_gravity(&mut self, gravity: Vec3);

    /// Teleport the marble and zero its velocity
    fn reset_marble(&mut self, position: Vec3);
}

/// In-memory world that just records what it was told
#[derive(Debug, Clone, Default)]
pub struct RecordingWorld {
    pub bodies: Vec<BodySpec>,
    pub gravity: Option<Vec3>,
    pub resets: Vec<Vec3>,
}

impl PhysicsWorld for RecordingWorld {
    type Handle = usize;

    fn add_body(&mut self, body: &BodySpec) -> usize {
        self.bodies.push(*body);
        self.bodies.len() - 1
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = Some(gravity);
    }

    fn reset_marble(&mut self, position: Vec3) {
        self.resets.push(position);
    }
}
