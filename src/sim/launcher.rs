//! Launchers ("guns") turn a charge-and-release gesture into projectiles
//!
//! Two independent flags drive a launcher: `active` (does it take player
//! input) and `charging` (is the fire button held). Only an active, charging
//! launcher can fire. Every input operation on an inactive launcher is a
//! silent no-op.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::motion::Patrol;
use super::pool::ProjectilePool;
use super::projectile::Variant;
use crate::consts::INITIAL_AIM_ANGLE;
use crate::settings::{Ballistics, LauncherTuning};
use crate::{aim_angle, launch_velocity, palette};

/// Stable launcher handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LauncherId(pub u32);

/// Where a launcher gets the variant of its next shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VariantSource {
    /// Next variant from the pool's queue
    #[default]
    Queue,
    /// Always this variant
    Fixed(Variant),
}

/// How a launcher moves on its own
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum LauncherMotion {
    #[default]
    Stationary,
    Patrol(Patrol),
}

/// A launcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Launcher {
    pub id: LauncherId,
    pub pos: Vec2,
    /// Aim angle (radians, screen space)
    pub angle: f32,
    /// Charge power, within `[min_power, max_power]`
    pub power: f32,
    pub charging: bool,
    /// Whether this launcher currently takes player input
    pub active: bool,
    pub source: VariantSource,
    pub motion: LauncherMotion,
    /// Charge indicator color
    pub color: u32,
    pub tuning: LauncherTuning,
}

impl Launcher {
    pub fn new(id: LauncherId, pos: Vec2, tuning: LauncherTuning) -> Self {
        Self {
            id,
            pos,
            angle: INITIAL_AIM_ANGLE,
            power: tuning.min_power,
            charging: false,
            active: false,
            source: VariantSource::Queue,
            motion: LauncherMotion::Stationary,
            color: palette::GRAY,
            tuning,
        }
    }

    /// Make this launcher patrol between its position and `to`
    pub fn with_patrol(mut self, to: Vec2) -> Self {
        self.motion = LauncherMotion::Patrol(Patrol::new(self.pos, to));
        self
    }

    /// Give or take player control; losing control cancels any charge
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if !active {
            self.reset_charge();
        }
    }

    fn reset_charge(&mut self) {
        self.charging = false;
        self.power = self.tuning.min_power;
        self.color = palette::GRAY;
    }

    /// Fire button pressed
    pub fn begin_charge(&mut self) {
        if !self.active {
            return;
        }
        self.charging = true;
    }

    /// Fire button released at `aim`: fire one projectile into `pool`.
    ///
    /// Returns the new projectile id, or `None` when inactive or not charging.
    pub fn end_charge<R: Rng + ?Sized>(
        &mut self,
        aim: Vec2,
        pool: &mut ProjectilePool,
        physics: &Ballistics,
        rng: &mut R,
    ) -> Option<u32> {
        if !self.active || !self.charging {
            return None;
        }
        self.angle = aim_angle(self.pos, aim);
        let vel = launch_velocity(self.power, self.angle);
        let id = pool.fire(self.source, self.id, self.pos, vel, physics, rng);
        log::debug!(
            "launcher {} fired projectile {} (power {:.1}, angle {:.2})",
            self.id.0,
            id,
            self.power,
            self.angle
        );
        self.reset_charge();
        Some(id)
    }

    /// Aim toward `sample` if given and refresh the charge indicator
    pub fn aim(&mut self, sample: Option<Vec2>) {
        if !self.active {
            return;
        }
        if let Some(p) = sample {
            self.angle = aim_angle(self.pos, p);
        }
        self.refresh_color();
    }

    /// Bind the variant for subsequent shots
    pub fn select_variant(&mut self, variant: Variant) {
        if !self.active {
            return;
        }
        self.source = VariantSource::Fixed(variant);
    }

    /// Grow the charge while the fire button is held
    pub fn power_up(&mut self, dt: f32) {
        if self.active && self.charging {
            self.power = (self.power + self.tuning.charge_rate * dt).min(self.tuning.max_power);
        }
        self.refresh_color();
    }

    /// Advance self-driven motion
    pub fn tick(&mut self, dt: f32) {
        if let LauncherMotion::Patrol(patrol) = &mut self.motion {
            patrol.step(&mut self.pos, dt, self.tuning.patrol_rate, self.tuning.patrol_epsilon);
        }
    }

    fn refresh_color(&mut self) {
        self.color = if self.active && self.charging {
            palette::RED
        } else {
            palette::GRAY
        };
    }

    /// Color to draw this launcher with
    pub fn display_color(&self) -> u32 {
        if self.active { self.color } else { palette::LIGHT_GRAY }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active_launcher(pos: Vec2) -> Launcher {
        let mut l = Launcher::new(LauncherId(1), pos, LauncherTuning::default());
        l.set_active(true);
        l
    }

    fn pool() -> ProjectilePool {
        ProjectilePool::new(Variant::ALL.to_vec(), 15)
    }

    #[test]
    fn test_release_without_charge_is_noop() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = pool();
        let mut l = active_launcher(Vec2::new(100.0, 450.0));
        let fired = l.end_charge(Vec2::new(200.0, 450.0), &mut pool, &Ballistics::default(), &mut rng);
        assert!(fired.is_none());
        assert!(pool.is_empty());
        assert_eq!(pool.shots_since_last_hit(), 0);
    }

    #[test]
    fn test_inactive_launcher_ignores_input() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pool = pool();
        let mut l = Launcher::new(LauncherId(2), Vec2::new(100.0, 450.0), LauncherTuning::default());
        let angle = l.angle;
        l.begin_charge();
        assert!(!l.charging);
        l.aim(Some(Vec2::new(0.0, 0.0)));
        assert_eq!(l.angle, angle);
        l.power_up(10.0);
        assert_eq!(l.power, l.tuning.min_power);
        l.select_variant(Variant::Heavy);
        assert_eq!(l.source, VariantSource::Queue);
        assert!(l.end_charge(Vec2::ZERO, &mut pool, &Ballistics::default(), &mut rng).is_none());
        assert_eq!(l.display_color(), palette::LIGHT_GRAY);
    }

    #[test]
    fn test_fire_sets_velocity_and_resets_charge() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = pool();
        let mut l = active_launcher(Vec2::new(100.0, 450.0));
        l.select_variant(Variant::Standard);
        l.begin_charge();
        assert_eq!(l.color, palette::GRAY);
        l.power_up(0.3);
        assert_eq!(l.color, palette::RED);
        assert!((l.power - 50.0).abs() < 1e-4);

        // Aim straight right
        let id = l
            .end_charge(Vec2::new(300.0, 450.0), &mut pool, &Ballistics::default(), &mut rng)
            .unwrap();
        let p = pool.get(id).unwrap();
        assert!((p.vel.x - 50.0).abs() < 1e-4);
        assert!(p.vel.y.abs() < 1e-4);
        assert_eq!(p.owner, l.id);
        assert_eq!(p.pos, l.pos);
        assert!(!l.charging);
        assert_eq!(l.power, l.tuning.min_power);
        assert_eq!(pool.shots_since_last_hit(), 1);
    }

    #[test]
    fn test_fire_at_own_position_has_zero_angle() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut pool = pool();
        let mut l = active_launcher(Vec2::new(100.0, 450.0));
        l.begin_charge();
        let id = l.end_charge(l.pos, &mut pool, &Ballistics::default(), &mut rng).unwrap();
        assert_eq!(l.angle, 0.0);
        assert!(pool.get(id).unwrap().vel.is_finite());
    }

    #[test]
    fn test_deactivation_cancels_charge() {
        let mut l = active_launcher(Vec2::ZERO);
        l.begin_charge();
        l.power_up(0.2);
        l.set_active(false);
        assert!(!l.charging);
        assert_eq!(l.power, l.tuning.min_power);
    }

    #[test]
    fn test_patrol_launcher_moves_stationary_does_not() {
        let mut still = Launcher::new(LauncherId(1), Vec2::new(50.0, 400.0), LauncherTuning::default());
        still.tick(0.5);
        assert_eq!(still.pos, Vec2::new(50.0, 400.0));

        let mut moving = Launcher::new(LauncherId(2), Vec2::new(50.0, 400.0), LauncherTuning::default())
            .with_patrol(Vec2::new(90.0, 400.0));
        moving.tick(0.5);
        assert!(moving.pos.x > 50.0 && moving.pos.x < 90.0);
    }

    proptest! {
        #[test]
        fn prop_charge_never_exceeds_max(steps in 1usize..2000, dt in 0.0f32..1.0) {
            let mut l = active_launcher(Vec2::ZERO);
            l.begin_charge();
            let mut last = l.power;
            for _ in 0..steps {
                l.power_up(dt);
                prop_assert!(l.power <= l.tuning.max_power);
                prop_assert!(l.power >= last);
                last = l.power;
            }
        }
    }
}
