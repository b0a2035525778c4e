//! Race timer
//!
//! Two states: idle and running. A run starts when the marble crosses the
//! start line and ends either at the finish zone or by falling through a
//! hole. Crossing the start line again during a run does nothing.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Horizontal board axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardAxis {
    X,
    Z,
}

impl BoardAxis {
    #[inline]
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            BoardAxis::X => v.x,
            BoardAxis::Z => v.z,
        }
    }
}

/// Start threshold, relative to the marble's starting position
///
/// The marble is past the line once its displacement along `axis` goes
/// beyond `offset` in the direction of the offset's sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartLine {
    pub axis: BoardAxis,
    pub offset: f32,
}

impl StartLine {
    pub fn new(axis: BoardAxis, offset: f32) -> Self {
        Self { axis, offset }
    }

    pub fn is_past(&self, start: Vec3, pos: Vec3) -> bool {
        let d = self.axis.of(pos) - self.axis.of(start);
        if self.offset >= 0.0 {
            d > self.offset
        } else {
            d < self.offset
        }
    }
}

/// Axis-aligned finish rectangle on the board plane (world x, z)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinishZone {
    pub min: Vec2,
    pub max: Vec2,
}

impl FinishZone {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn contains(&self, pos: Vec3) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.z >= self.min.y && pos.z <= self.max.y
    }
}

/// Where the race starts, ends, and how far the marble may drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Marble spawn position (world)
    pub start: Vec3,
    pub start_line: StartLine,
    pub finish: FinishZone,
    /// World `y` below which the marble has fallen through a hole
    pub fall_depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RaceState {
    Idle,
    Running { started_at: f64 },
}

/// Something the caller must react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RaceEvent {
    /// Start line crossed
    Started { at: f64 },
    /// Finish zone reached
    Finished { time: f64, new_best: bool },
    /// Marble dropped below the fall depth; put it back at the start at rest
    FellThrough,
}

#[derive(Debug, Clone)]
pub struct RaceTimer {
    course: Course,
    state: RaceState,
    /// Displayed time: live while running, last result after a finish
    elapsed: f64,
    best: Option<f64>,
    /// Marble was past the start line on the previous sample
    was_past_start: bool,
}

impl RaceTimer {
    pub fn new(course: Course) -> Self {
        Self {
            course,
            state: RaceState::Idle,
            elapsed: 0.0,
            best: None,
            was_past_start: false,
        }
    }

    /// Seed the best time (e.g. from storage)
    pub fn with_best(mut self, best: Option<f64>) -> Self {
        self.best = best.filter(|b| *b > 0.0);
        self
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RaceState::Running { .. })
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }

    /// Feed one (time, marble position) sample
    pub fn update(&mut self, now: f64, marble: Vec3) -> Option<RaceEvent> {
        if marble.y < self.course.fall_depth {
            if let RaceState::Running { started_at } = self.state {
                log::debug!("Marble fell through after {:.2}s", now - started_at);
            }
            self.state = RaceState::Idle;
            self.elapsed = 0.0;
            self.was_past_start = false;
            return Some(RaceEvent::FellThrough);
        }

        let past_start = self.course.start_line.is_past(self.course.start, marble);
        let crossed = past_start && !self.was_past_start;
        self.was_past_start = past_start;

        match self.state {
            RaceState::Idle => {
                if crossed {
                    self.state = RaceState::Running { started_at: now };
                    self.elapsed = 0.0;
                    log::debug!("Race started at {now:.3}");
                    return Some(RaceEvent::Started { at: now });
                }
                None
            }
            RaceState::Running { started_at } => {
                self.elapsed = (now - started_at).max(0.0);
                if self.course.finish.contains(marble) {
                    let time = self.elapsed;
                    let new_best = self.best.is_none_or(|best| time < best);
                    if new_best {
                        self.best = Some(time);
                    }
                    self.state = RaceState::Idle;
                    log::info!("Race finished in {time:.2}s (new best: {new_best})");
                    return Some(RaceEvent::Finished { time, new_best });
                }
                None
            }
        }
    }
}
