//! Game state and round bookkeeping
//!
//! `GameState` is the round controller: it owns the launchers, targets,
//! hazards and the projectile pool, and is the only thing that adds or
//! removes them. The host reads it through the accessors below.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::launcher::{Launcher, LauncherId};
use super::pool::ProjectilePool;
use super::projectile::{Projectile, Variant};
use super::target::{Hazard, Target};
use crate::consts::LAUNCHER_START;
use crate::scoreboard::{RoundSummary, Scoreboard};
use crate::settings::{Difficulty, Settings};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Next round's targets not spawned yet
    Setup,
    /// Targets alive or projectiles in flight
    Active,
    /// Round cleared, waiting out the inter-round delay
    Clearing,
}

/// Something the host may want to react to (score display, sounds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, targets: u32 },
    Fired { launcher: LauncherId, projectile: u32, variant: Variant },
    TargetDestroyed { target: u32, projectile: u32, points: u64 },
    HazardDestroyed { hazard: u32, projectile: u32, points: u64 },
    /// A hazard hit the floor and dropped a falling target
    HazardLanded { hazard: u32, target: u32 },
    ControlSwapped { from: LauncherId, to: LauncherId },
    RoundCleared(RoundSummary),
}

/// Kinds of drawable entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Projectile,
    Target,
    Hazard,
    Launcher,
}

/// Read-only drawing data for one entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: u32,
}

/// Random value in `[lo, hi]`, or `lo` when the range is empty
pub(crate) fn random_between<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..=hi) } else { lo }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) settings: Settings,
    pub(crate) difficulty: Difficulty,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    /// Current round (1-based once the first round is set up)
    pub(crate) round: u32,
    pub(crate) score: u64,
    /// Simulated seconds since creation
    pub(crate) time: f64,
    pub(crate) pool: ProjectilePool,
    pub(crate) launchers: Vec<Launcher>,
    /// Index of the launcher taking player input
    pub(crate) active: usize,
    pub(crate) targets: Vec<Target>,
    pub(crate) hazards: Vec<Hazard>,
    /// Seconds since the last hazard drop
    pub(crate) drop_timer: f32,
    /// Seconds left before the next round is set up
    pub(crate) clear_timer: f32,
    pub(crate) targets_destroyed: u32,
    /// Events produced by the latest tick
    pub(crate) events: Vec<GameEvent>,
    pub(crate) scoreboard: Scoreboard,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed. The first tick sets up round 1.
    pub fn new(seed: u64, settings: Settings) -> Self {
        let settings = settings.sanitized();
        let difficulty = settings.difficulty.difficulty();
        let mut rng = Pcg32::seed_from_u64(seed);
        let pool = ProjectilePool::new(difficulty.allowed_variants.clone(), settings.round.refill_batch);

        let world = settings.world;
        let tuning = settings.launcher;
        // Spares stay above the floor line even in short custom worlds
        let spare_y_hi = (world.floor_y - 15.0).max(0.0);
        let spare_y_lo = (world.height / 2.0).min(spare_y_hi);
        let mut launchers = Vec::with_capacity(1 + settings.round.spare_launchers as usize);
        for i in 0..=settings.round.spare_launchers {
            let pos = if i == 0 {
                Vec2::new(LAUNCHER_START.0, LAUNCHER_START.1)
            } else {
                Vec2::new(
                    random_between(&mut rng, world.left_wall(), world.width / 2.0),
                    random_between(&mut rng, spare_y_lo, spare_y_hi),
                )
            };
            let mut launcher = Launcher::new(LauncherId(i), pos, tuning);
            if rng.random_bool(0.5) {
                let offset = Vec2::new(
                    random_between(&mut rng, -tuning.patrol_range, tuning.patrol_range),
                    random_between(&mut rng, -tuning.patrol_range, tuning.patrol_range),
                );
                launcher = launcher.with_patrol(pos + offset);
            }
            launchers.push(launcher);
        }
        if let Some(first) = launchers.first_mut() {
            first.set_active(true);
        }

        log::info!(
            "New game: seed {}, difficulty {}, {} launchers",
            seed,
            settings.difficulty.as_str(),
            launchers.len()
        );

        Self {
            seed,
            settings,
            difficulty,
            rng,
            phase: GamePhase::Setup,
            round: 0,
            score: 0,
            time: 0.0,
            pool,
            launchers,
            active: 0,
            targets: Vec::new(),
            hazards: Vec::new(),
            drop_timer: 0.0,
            clear_timer: 0.0,
            targets_destroyed: 0,
            events: Vec::new(),
            scoreboard: Scoreboard::new(),
            next_id: 1,
        }
    }

    /// Allocate a new target/hazard ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn difficulty(&self) -> &Difficulty {
        &self.difficulty
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    /// Simulated seconds elapsed
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn shots_since_last_hit(&self) -> u32 {
        self.pool.shots_since_last_hit()
    }

    /// Queued variants, next shot first
    pub fn upcoming_variants(&self) -> Vec<Variant> {
        self.pool.upcoming().collect()
    }

    pub fn targets_alive(&self) -> usize {
        self.targets.iter().filter(|t| t.alive).count()
    }

    pub fn active_launcher(&self) -> LauncherId {
        self.launchers[self.active].id
    }

    pub fn active_launcher_ref(&self) -> &Launcher {
        &self.launchers[self.active]
    }

    pub fn launchers(&self) -> &[Launcher] {
        &self.launchers
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.pool.iter()
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    /// Events produced by the latest tick
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Invoke `draw` once per live entity
    pub fn for_each_renderable<F: FnMut(Renderable)>(&self, mut draw: F) {
        for t in self.targets.iter().filter(|t| t.alive) {
            draw(Renderable { kind: EntityKind::Target, x: t.pos.x, y: t.pos.y, r: t.radius, color: t.color });
        }
        for h in self.hazards.iter().filter(|h| h.alive) {
            draw(Renderable {
                kind: EntityKind::Hazard,
                x: h.pos.x,
                y: h.pos.y,
                r: h.radius,
                color: crate::palette::BLACK,
            });
        }
        for l in &self.launchers {
            draw(Renderable {
                kind: EntityKind::Launcher,
                x: l.pos.x,
                y: l.pos.y,
                r: l.tuning.hit_radius,
                color: l.display_color(),
            });
        }
        for p in self.pool.iter() {
            draw(Renderable { kind: EntityKind::Projectile, x: p.pos.x, y: p.pos.y, r: p.radius, color: p.color });
        }
    }

    /// Snapshot of everything to draw this frame
    pub fn renderables(&self) -> Vec<Renderable> {
        let mut out = Vec::with_capacity(self.targets.len() + self.hazards.len() + self.launchers.len() + self.pool.len());
        self.for_each_renderable(|r| out.push(r));
        out
    }
}
