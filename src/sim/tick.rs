//! Per-tick game update
//!
//! Runs once per simulation step after physics has moved the marble:
//! forwards fresh tilt gravity, advances the race timer, and reacts to its
//! events (marble reset, best-time save).

use glam::Vec3;

use super::gravity::GravityReader;
use super::timer::{Course, RaceEvent, RaceState, RaceTimer};
use crate::physics::PhysicsWorld;
use crate::records::{BestTimes, KeyValueStore};

/// Sample for a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Simulation time in seconds
    pub time: f64,
    /// Marble world position
    pub marble: Vec3,
}

/// What the HUD needs after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutput {
    pub elapsed: f64,
    pub best: Option<f64>,
    pub state: RaceState,
    pub event: Option<RaceEvent>,
}

/// One board's race: timer, gravity input and best-time persistence
pub struct GameSession<S: KeyValueStore> {
    timer: RaceTimer,
    gravity: GravityReader,
    best: BestTimes<S>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(course: Course, gravity: GravityReader, best: BestTimes<S>) -> Self {
        let timer = RaceTimer::new(course).with_best(best.load());
        Self {
            timer,
            gravity,
            best,
        }
    }

    pub fn timer(&self) -> &RaceTimer {
        &self.timer
    }

    pub fn best_times(&self) -> &BestTimes<S> {
        &self.best
    }

    /// Advance one tick
    pub fn tick<W: PhysicsWorld>(&mut self, input: &TickInput, world: &mut W) -> TickOutput {
        if let Some(gravity) = self.gravity.take_latest() {
            world.set_gravity(gravity);
        }

        let event = self.timer.update(input.time, input.marble);
        match event {
            Some(RaceEvent::FellThrough) => {
                world.reset_marble(self.timer.course().start);
            }
            Some(RaceEvent::Finished { time, new_best: true }) => {
                self.best.record(time);
            }
            _ => {}
        }

        TickOutput {
            elapsed: self.timer.elapsed(),
            best: self.timer.best(),
            state: self.timer.state(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::SIM_DT;
    use crate::physics::RecordingWorld;
    use crate::records::MemoryStore;
    use crate::sim::gravity::gravity_channel;
    use crate::sim::timer::{BoardAxis, FinishZone, StartLine};

    fn course() -> Course {
        Course {
            start: Vec3::new(0.0, 0.1, -1.5),
            start_line: StartLine::new(BoardAxis::Z, 0.2),
            finish: FinishZone::new(Vec2::new(-0.5, 1.5), Vec2::new(0.5, 2.0)),
            fall_depth: -0.5,
        }
    }

    fn input(tick: u32, z: f32) -> TickInput {
        TickInput {
            time: tick as f64 * SIM_DT as f64,
            marble: Vec3::new(0.0, 0.1, z),
        }
    }

    #[test]
    fn test_gravity_forwarded_once_per_sample() {
        let (writer, reader) = gravity_channel();
        let mut session = GameSession::new(course(), reader, BestTimes::new(MemoryStore::new(), "t"));
        let mut world = RecordingWorld::default();

        session.tick(&input(0, -1.5), &mut world);
        assert_eq!(world.gravity, None);

        writer.publish(Vec3::new(1.0, -9.8, 0.0));
        session.tick(&input(1, -1.5), &mut world);
        assert_eq!(world.gravity, Some(Vec3::new(1.0, -9.8, 0.0)));

        world.gravity = None;
        session.tick(&input(2, -1.5), &mut world);
        assert_eq!(world.gravity, None);
    }

    #[test]
    fn test_fall_resets_marble_to_start() {
        let (_writer, reader) = gravity_channel();
        let mut session = GameSession::new(course(), reader, BestTimes::new(MemoryStore::new(), "t"));
        let mut world = RecordingWorld::default();

        session.tick(&input(0, -1.0), &mut world);
        let out = session.tick(
            &TickInput {
                time: 1.0,
                marble: Vec3::new(0.0, -2.0, 0.0),
            },
            &mut world,
        );
        assert_eq!(out.event, Some(RaceEvent::FellThrough));
        assert_eq!(out.state, RaceState::Idle);
        assert_eq!(world.resets, vec![course().start]);
    }

    #[test]
    fn test_finish_persists_new_best() {
        let (_writer, reader) = gravity_channel();
        let mut session = GameSession::new(course(), reader, BestTimes::new(MemoryStore::new(), "t"));
        let mut world = RecordingWorld::default();

        let started = session.tick(&input(0, -1.0), &mut world);
        assert!(matches!(started.event, Some(RaceEvent::Started { .. })));

        let out = session.tick(&input(600, 1.8), &mut world);
        assert!(matches!(out.event, Some(RaceEvent::Finished { new_best: true, .. })));
        let stored = session.best_times().load().unwrap();
        assert!((stored - 10.0).abs() < 1e-3);
        assert_eq!(out.best, Some(stored));
    }

    #[test]
    fn test_stored_best_seeds_timer() {
        let mut store = MemoryStore::new();
        store.set("marble_maze_best_time.t", "4.5");
        let (_writer, reader) = gravity_channel();
        let mut session = GameSession::new(course(), reader, BestTimes::new(store, "t"));
        let mut world = RecordingWorld::default();
        assert_eq!(session.timer().best(), Some(4.5));

        session.tick(&input(0, -1.0), &mut world);
        let out = session.tick(&input(600, 1.8), &mut world);
        assert!(matches!(out.event, Some(RaceEvent::Finished { new_best: false, .. })));
        assert_eq!(session.best_times().load(), Some(4.5));
    }
}
