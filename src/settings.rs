//! Game settings and difficulty presets
//!
//! Everything tunable about the world, the ballistics and a round lives here.
//! Settings load from JSON; absent fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::{TargetKind, Variant};

/// Hit-test shape used for every projectile collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HitTest {
    /// Axis-aligned square of half-width `r1 + r2` around each center
    #[default]
    Box,
    /// True circle overlap (center distance <= `r1 + r2`)
    Circle,
}

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "medium" | "med" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }

    /// Round layout for this preset
    pub fn difficulty(&self) -> Difficulty {
        match self {
            DifficultyPreset::Easy => Difficulty {
                targets: 1,
                radius_range: (30.0, 40.0),
                allowed_targets: vec![TargetKind::Stationary],
                allowed_variants: Variant::ALL.to_vec(),
            },
            DifficultyPreset::Normal => Difficulty {
                targets: 2,
                radius_range: (20.0, 40.0),
                allowed_targets: vec![
                    TargetKind::Stationary,
                    TargetKind::Wandering,
                    TargetKind::Oscillating,
                ],
                allowed_variants: Variant::ALL.to_vec(),
            },
            DifficultyPreset::Hard => Difficulty {
                targets: 3,
                radius_range: (20.0, 30.0),
                allowed_targets: vec![
                    TargetKind::Stationary,
                    TargetKind::Wandering,
                    TargetKind::Oscillating,
                    TargetKind::Circular,
                ],
                allowed_variants: Variant::ALL.to_vec(),
            },
        }
    }
}

/// What a round looks like at a given difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Targets spawned per round
    pub targets: u32,
    /// Inclusive target radius range
    pub radius_range: (f32, f32),
    /// Target kinds drawn uniformly at spawn
    pub allowed_targets: Vec<TargetKind>,
    /// Projectile variants the queue is refilled from
    pub allowed_variants: Vec<Variant>,
}

/// World geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub floor_y: f32,
    pub wall_margin: f32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            floor_y: FLOOR_Y,
            wall_margin: WALL_MARGIN,
        }
    }
}

impl World {
    #[inline]
    pub fn left_wall(&self) -> f32 {
        self.wall_margin
    }

    #[inline]
    pub fn right_wall(&self) -> f32 {
        self.width - self.wall_margin
    }
}

/// Projectile integration parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ballistics {
    pub gravity: f32,
    /// Multiplier from frame time to ballistic time
    pub time_scale: f32,
    /// Grounded projectiles with `vx² + vy²` at or below this are resting
    pub rest_threshold: f32,
    /// Speed divisor applied on every bounce (> 1 loses energy)
    pub restitution: f32,
    /// Resting ticks before a projectile expires
    pub lifetime: i32,
    /// Radius added to every fired projectile
    pub fire_radius_bonus: f32,
}

impl Default for Ballistics {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            time_scale: BALLISTIC_TIME_SCALE,
            rest_threshold: REST_THRESHOLD,
            restitution: RESTITUTION_DIVISOR,
            lifetime: PROJECTILE_LIFETIME,
            fire_radius_bonus: FIRE_RADIUS_BONUS,
        }
    }
}

/// Launcher charge and motion tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherTuning {
    pub min_power: f32,
    pub max_power: f32,
    /// Power gained per second of charging
    pub charge_rate: f32,
    /// Fraction of the remaining patrol distance covered per second
    pub patrol_rate: f32,
    /// Patrol endpoints swap once closer than this
    pub patrol_epsilon: f32,
    /// Patrol endpoints are drawn within this offset of the start
    pub patrol_range: f32,
    /// Radius used when a projectile hit-tests a launcher
    pub hit_radius: f32,
}

impl Default for LauncherTuning {
    fn default() -> Self {
        Self {
            min_power: MIN_POWER,
            max_power: MAX_POWER,
            charge_rate: CHARGE_RATE,
            patrol_rate: PATROL_RATE,
            patrol_epsilon: PATROL_EPSILON,
            patrol_range: PATROL_RANGE,
            hit_radius: LAUNCHER_RADIUS,
        }
    }
}

/// Round pacing and scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundTuning {
    /// Seconds between a cleared round and the next setup
    pub round_delay: f32,
    /// Seconds between hazard drops
    pub hazard_drop_interval: f32,
    pub hazard_fall_speed: f32,
    pub hazard_count: u32,
    /// Launchers besides the starting one
    pub spare_launchers: u32,
    pub target_points: u64,
    pub hazard_points: u64,
    /// Variants added to the queue whenever it runs dry
    pub refill_batch: usize,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            round_delay: ROUND_DELAY,
            hazard_drop_interval: HAZARD_DROP_INTERVAL,
            hazard_fall_speed: HAZARD_FALL_SPEED,
            hazard_count: 1,
            spare_launchers: 2,
            target_points: 1,
            hazard_points: 2,
            refill_batch: QUEUE_REFILL_BATCH,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub world: World,
    pub ballistics: Ballistics,
    pub launcher: LauncherTuning,
    pub round: RoundTuning,
    pub difficulty: DifficultyPreset,
    pub hit_test: HitTest,
}

impl Settings {
    /// Create settings for a difficulty preset (other values default)
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        Self {
            difficulty: preset,
            ..Self::default()
        }
    }

    /// Parse settings from JSON and sanitize them
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp nonsensical values into a range the simulation can run with
    pub fn sanitized(mut self) -> Self {
        let w = &mut self.world;
        if !(w.width > 0.0) {
            w.width = WORLD_WIDTH;
        }
        if !(w.height > 0.0) {
            w.height = WORLD_HEIGHT;
        }
        w.wall_margin = w.wall_margin.clamp(0.0, w.width / 2.0);
        w.floor_y = w.floor_y.clamp(0.0, w.height);

        let b = &mut self.ballistics;
        if !(b.restitution > 1.0) {
            log::warn!("restitution {} keeps energy; using {}", b.restitution, RESTITUTION_DIVISOR);
            b.restitution = RESTITUTION_DIVISOR;
        }
        if !(b.time_scale > 0.0) {
            b.time_scale = BALLISTIC_TIME_SCALE;
        }
        b.lifetime = b.lifetime.max(0);
        b.rest_threshold = b.rest_threshold.max(0.0);
        b.fire_radius_bonus = b.fire_radius_bonus.max(0.0);

        let l = &mut self.launcher;
        l.min_power = l.min_power.max(0.0);
        if l.max_power < l.min_power {
            log::warn!("max_power {} below min_power {}; swapping", l.max_power, l.min_power);
            std::mem::swap(&mut l.min_power, &mut l.max_power);
        }
        l.charge_rate = l.charge_rate.max(0.0);
        l.patrol_rate = l.patrol_rate.max(0.0);
        l.patrol_epsilon = l.patrol_epsilon.max(f32::EPSILON);
        if !(l.hit_radius > 0.0) {
            l.hit_radius = LAUNCHER_RADIUS;
        }

        let r = &mut self.round;
        r.round_delay = r.round_delay.max(0.0);
        if !(r.hazard_drop_interval > 0.0) {
            r.hazard_drop_interval = HAZARD_DROP_INTERVAL;
        }
        r.refill_batch = r.refill_batch.max(1);

        self
    }
}
