//! Ballista - projectile ballistics core for a cannon-and-targets shooting game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (projectiles, launchers, targets, rounds)
//! - `settings`: Data-driven world, ballistics and difficulty tuning
//! - `scoreboard`: Round history for the scoring display
//!
//! Rendering, input capture and audio belong to the host. The host calls
//! [`sim::tick`] once per frame and draws [`sim::GameState::renderables`].

pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use scoreboard::{RoundSummary, Scoreboard};
pub use settings::{Ballistics, DifficultyPreset, HitTest, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest frame delta the simulation accepts; longer hitches are clamped
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// World dimensions (screen coordinates, y grows downward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Projectiles rest on this line
    pub const FLOOR_Y: f32 = 500.0;
    /// Distance of the side walls from the world edges
    pub const WALL_MARGIN: f32 = 20.0;

    /// Ballistics defaults
    pub const GRAVITY: f32 = 9.8;
    /// Ballistic integration runs this many times faster than frame time
    pub const BALLISTIC_TIME_SCALE: f32 = 10.0;
    /// Below this `vx² + vy²` a grounded projectile is resting
    pub const REST_THRESHOLD: f32 = 10.0;
    pub const RESTITUTION_DIVISOR: f32 = 2.0;
    /// Resting ticks a projectile survives
    pub const PROJECTILE_LIFETIME: i32 = 30;
    /// Radius gained by every projectile when fired
    pub const FIRE_RADIUS_BONUS: f32 = 5.0;

    /// Launcher defaults
    pub const MIN_POWER: f32 = 20.0;
    pub const MAX_POWER: f32 = 100.0;
    /// Charge gained per second while the fire button is held
    pub const CHARGE_RATE: f32 = 100.0;
    pub const PATROL_RATE: f32 = 1.0;
    pub const PATROL_EPSILON: f32 = 1.0;
    pub const PATROL_RANGE: f32 = 40.0;
    pub const LAUNCHER_RADIUS: f32 = 10.0;
    pub const LAUNCHER_START: (f32, f32) = (20.0, 450.0);
    pub const INITIAL_AIM_ANGLE: f32 = 1.0;

    /// Target defaults
    pub const TARGET_SPAWN_X: (f32, f32) = (600.0, 780.0);
    /// Spawn rows; the lower bound is also capped to the floor line
    pub const TARGET_SPAWN_Y: (f32, f32) = (300.0, 500.0);
    pub const WANDER_STEP: f32 = 5.0;
    pub const WANDER_DIAGONAL_STEP: f32 = 3.0;
    pub const OSCILLATION_RATE: f32 = 0.5;
    pub const ORBIT_RADIUS: f32 = 20.0;
    pub const FALLING_TARGET_RADIUS: f32 = 40.0;
    /// Initial upward kick of a freshly dropped falling target
    pub const FALLING_TARGET_KICK: f32 = 9.8;
    /// How far past the world edge a falling target goes before recycling
    pub const FALLING_RECYCLE_MARGIN: f32 = 40.0;

    /// Hazard (bomb) defaults
    pub const HAZARD_RADIUS: f32 = 15.0;
    pub const HAZARD_FALL_SPEED: f32 = 150.0;
    pub const HAZARD_DROP_INTERVAL: f32 = 5.0;

    /// Round defaults
    pub const ROUND_DELAY: f32 = 0.75;
    pub const QUEUE_REFILL_BATCH: usize = 15;
}

/// Packed `0xRRGGBB` colors
pub mod palette {
    pub const BLACK: u32 = 0x000000;
    pub const GRAY: u32 = 0x7D7D7D;
    pub const LIGHT_GRAY: u32 = 0xADADAD;
    pub const RED: u32 = 0xFF0000;
    pub const BLUE: u32 = 0x0000FF;
    pub const YELLOW: u32 = 0xFFC91F;
    pub const GREEN: u32 = 0x00FF00;
    pub const MAGENTA: u32 = 0xFF03B8;
    pub const CYAN: u32 = 0x00FFCC;

    /// Colors a freshly spawned target may take
    pub const TARGET_COLORS: [u32; 6] = [RED, BLUE, YELLOW, GREEN, MAGENTA, CYAN];
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Angle (radians) of the ray from `from` toward `toward`, in screen space.
///
/// Coincident points give 0 instead of an undefined direction.
#[inline]
pub fn aim_angle(from: Vec2, toward: Vec2) -> f32 {
    let d = toward - from;
    if d == Vec2::ZERO {
        return 0.0;
    }
    d.y.atan2(d.x)
}

/// Initial velocity for a shot of `power` along `angle`.
///
/// Vertical velocity is positive upward, so it is the negated screen-space sine.
#[inline]
pub fn launch_velocity(power: f32, angle: f32) -> Vec2 {
    Vec2::new(power * angle.cos(), -power * angle.sin())
}
