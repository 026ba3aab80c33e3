//! Targets and hazards
//!
//! Targets move according to their motion kind and die on the first
//! projectile hit (ALIVE -> DESTROYED, terminal). Hazards ("bombs") wait
//! docked at the top of the world, fall when released, and drop a falling
//! target where they land.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::motion::Patrol;
use crate::consts::*;
use crate::settings::{Ballistics, World};

/// Target kinds a difficulty can allow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Stationary,
    Wandering,
    Oscillating,
    Circular,
    Falling,
}

/// How a target moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TargetMotion {
    Stationary,
    /// Random walk, one fixed step per tick, no clamping
    Wandering { diagonal: bool },
    /// Ping-pong between the origin and a nearby point
    Oscillating(Patrol),
    /// Orbit around `origin`, phase taken from the wall clock
    Circular { orbit: f32 },
    /// Accelerates downward, reappears above the top after leaving the world
    Falling { vy: f32 },
}

const AXIS_STEPS: [(f32, f32); 4] = [
    (WANDER_STEP, 0.0),
    (-WANDER_STEP, 0.0),
    (0.0, WANDER_STEP),
    (0.0, -WANDER_STEP),
];

const DIAGONAL_STEPS: [(f32, f32); 6] = [
    (WANDER_STEP, 0.0),
    (-WANDER_STEP, 0.0),
    (0.0, WANDER_STEP),
    (0.0, -WANDER_STEP),
    (WANDER_DIAGONAL_STEP, WANDER_DIAGONAL_STEP),
    (-WANDER_DIAGONAL_STEP, -WANDER_DIAGONAL_STEP),
];

/// What a moving entity needs from the world for one tick
pub struct MotionContext<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    /// Wall-clock seconds (drives circular orbits)
    pub wall_clock: f64,
    pub physics: &'a Ballistics,
    pub world: &'a World,
}

/// A destructible target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub color: u32,
    pub alive: bool,
    /// Spawn position (center of oscillation/orbit)
    pub origin: Vec2,
    pub motion: TargetMotion,
}

impl Target {
    /// Spawn a target of `kind` at `pos`
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        kind: TargetKind,
        pos: Vec2,
        radius: f32,
        color: u32,
        rng: &mut R,
    ) -> Self {
        let motion = match kind {
            TargetKind::Stationary => TargetMotion::Stationary,
            TargetKind::Wandering => TargetMotion::Wandering {
                diagonal: rng.random_bool(0.5),
            },
            TargetKind::Oscillating => {
                let offset = Vec2::new(
                    rng.random_range(-PATROL_RANGE..=PATROL_RANGE),
                    rng.random_range(-PATROL_RANGE..=PATROL_RANGE),
                );
                TargetMotion::Oscillating(Patrol::new(pos, pos + offset))
            }
            TargetKind::Circular => TargetMotion::Circular { orbit: ORBIT_RADIUS },
            TargetKind::Falling => TargetMotion::Falling {
                vy: FALLING_TARGET_KICK,
            },
        };
        let radius = if kind == TargetKind::Falling {
            FALLING_TARGET_RADIUS
        } else {
            radius
        };
        Self {
            id,
            pos,
            radius,
            color,
            alive: true,
            origin: pos,
            motion,
        }
    }

    pub fn kind(&self) -> TargetKind {
        match self.motion {
            TargetMotion::Stationary => TargetKind::Stationary,
            TargetMotion::Wandering { .. } => TargetKind::Wandering,
            TargetMotion::Oscillating(_) => TargetKind::Oscillating,
            TargetMotion::Circular { .. } => TargetKind::Circular,
            TargetMotion::Falling { .. } => TargetKind::Falling,
        }
    }

    /// Advance the target's motion by one frame
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, ctx: &mut MotionContext<'_, R>) {
        if !self.alive {
            return;
        }
        match &mut self.motion {
            TargetMotion::Stationary => {}
            TargetMotion::Wandering { diagonal } => {
                let steps: &[(f32, f32)] = if *diagonal { &DIAGONAL_STEPS } else { &AXIS_STEPS };
                if let Some(&(dx, dy)) = steps.choose(ctx.rng) {
                    self.pos += Vec2::new(dx, dy);
                }
            }
            TargetMotion::Oscillating(patrol) => {
                patrol.step(&mut self.pos, dt, OSCILLATION_RATE, PATROL_EPSILON);
            }
            TargetMotion::Circular { orbit } => {
                // Seconds taken directly as radians
                let theta = (ctx.wall_clock % 360.0) as f32;
                self.pos = self.origin + Vec2::new(theta.cos(), -theta.sin()) * *orbit;
            }
            TargetMotion::Falling { vy } => {
                let dt = dt * ctx.physics.time_scale;
                *vy -= ctx.physics.gravity * dt;
                self.pos.y -= *vy * dt;
                if self.pos.y > ctx.world.height + FALLING_RECYCLE_MARGIN {
                    self.pos.y = -FALLING_RECYCLE_MARGIN;
                    *vy = 0.0;
                }
            }
        }
    }

    /// Mark the target destroyed. Returns true only on the first call.
    pub fn destroy(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        was_alive
    }
}

/// A bomb hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Downward speed (screen space)
    pub vy: f32,
    pub alive: bool,
    /// False while docked at the top waiting for the next drop
    pub falling: bool,
}

impl Hazard {
    /// A hazard docked at the top of the world at `x`
    pub fn docked(id: u32, x: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, HAZARD_RADIUS),
            radius: HAZARD_RADIUS,
            vy: 0.0,
            alive: true,
            falling: false,
        }
    }

    /// Start falling. Returns false when destroyed or already falling.
    pub fn release(&mut self, fall_speed: f32) -> bool {
        if !self.alive || self.falling {
            return false;
        }
        self.falling = true;
        self.vy = fall_speed;
        true
    }

    /// Bring the hazard back docked at the top, alive
    pub fn dock(&mut self, x: f32) {
        self.pos = Vec2::new(x, self.radius);
        self.vy = 0.0;
        self.alive = true;
        self.falling = false;
    }

    /// Advance a falling hazard. Returns true when it reached the floor line.
    pub fn tick(&mut self, dt: f32, world: &World) -> bool {
        if !self.alive || !self.falling {
            return false;
        }
        self.pos.y += self.vy * dt;
        self.pos.y >= world.floor_y
    }

    /// Mark the hazard destroyed. Returns true only on the first call.
    pub fn destroy(&mut self) -> bool {
        let was_alive = self.alive;
        self.alive = false;
        self.falling = false;
        was_alive
    }
}
