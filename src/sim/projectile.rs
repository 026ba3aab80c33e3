//! Projectiles ("balls") and their flight model
//!
//! A projectile flies under gravity with horizontal damping, bounces off the
//! floor, the ceiling and the side walls with energy loss, and expires after
//! resting on the floor for too long or running out of bounces.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::launcher::LauncherId;
use crate::palette;
use crate::settings::{Ballistics, World};

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Standard,
    Heavy,
    Fast,
    Bouncy,
}

/// Per-variant physical parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantParams {
    /// Radius before the fire bonus is added
    pub base_radius: f32,
    /// Multiplier on world gravity
    pub gravity_scale: f32,
    /// Horizontal velocity factor applied every airborne step
    pub damping: f32,
    /// Reflections survived before expiring
    pub bounce_budget: u32,
    /// Bounce divisor; `None` uses the world setting
    pub restitution: Option<f32>,
    pub color: u32,
}

impl Variant {
    pub const ALL: [Variant; 4] = [Variant::Standard, Variant::Heavy, Variant::Fast, Variant::Bouncy];

    pub fn params(self) -> VariantParams {
        match self {
            Variant::Standard => VariantParams {
                base_radius: 10.0,
                gravity_scale: 1.0,
                damping: 0.99,
                bounce_budget: 4,
                restitution: None,
                color: palette::RED,
            },
            Variant::Heavy => VariantParams {
                base_radius: 15.0,
                gravity_scale: 1.0,
                damping: 0.99,
                bounce_budget: 4,
                restitution: None,
                color: palette::BLUE,
            },
            // Falls at 1.5 where the others fall at 1.2
            Variant::Fast => VariantParams {
                base_radius: 8.0,
                gravity_scale: 1.25,
                damping: 0.99,
                bounce_budget: 4,
                restitution: None,
                color: palette::GREEN,
            },
            Variant::Bouncy => VariantParams {
                base_radius: 10.0,
                gravity_scale: 1.0,
                damping: 0.99,
                bounce_budget: 15,
                restitution: Some(1.25_f32.sqrt()),
                color: palette::MAGENTA,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Standard => "Standard",
            Variant::Heavy => "Heavy",
            Variant::Fast => "Fast",
            Variant::Bouncy => "Bouncy",
        }
    }
}

/// Result of advancing a projectile one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Alive,
    Expired,
}

/// A fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Launcher that fired it (lookup only)
    pub owner: LauncherId,
    pub variant: Variant,
    pub pos: Vec2,
    /// Velocity; `vel.y` is positive upward
    pub vel: Vec2,
    pub radius: f32,
    /// Resting ticks left; expires once negative
    pub lifetime: i32,
    pub bounces_left: u32,
    pub damping: f32,
    pub gravity_scale: f32,
    pub restitution: f32,
    pub color: u32,
}

impl Projectile {
    /// Create a freshly fired projectile (fire bonus already applied)
    pub fn fire(
        id: u32,
        owner: LauncherId,
        variant: Variant,
        pos: Vec2,
        vel: Vec2,
        physics: &Ballistics,
    ) -> Self {
        let params = variant.params();
        Self {
            id,
            owner,
            variant,
            pos,
            vel,
            radius: params.base_radius + physics.fire_radius_bonus,
            lifetime: physics.lifetime,
            bounces_left: params.bounce_budget,
            damping: params.damping,
            gravity_scale: params.gravity_scale,
            restitution: params.restitution.unwrap_or(physics.restitution),
            color: params.color,
        }
    }

    /// Kinetic energy proxy
    #[inline]
    pub fn speed_sq(&self) -> f32 {
        self.vel.length_squared()
    }

    /// True when grounded and too slow to bounce
    pub fn is_resting(&self, physics: &Ballistics, world: &World) -> bool {
        self.pos.y >= world.floor_y && self.vel.y <= 0.0 && self.speed_sq() <= physics.rest_threshold
    }

    /// Consume one bounce; false if none were left
    fn spend_bounce(&mut self) -> bool {
        if self.bounces_left == 0 {
            return false;
        }
        self.bounces_left -= 1;
        true
    }

    /// Advance by one frame of `dt` seconds
    pub fn advance(&mut self, dt: f32, physics: &Ballistics, world: &World) -> Advance {
        let dt = dt * physics.time_scale;
        let grounded = self.pos.y >= world.floor_y && self.vel.y <= 0.0;

        if !grounded {
            self.vel.y -= physics.gravity * dt * self.gravity_scale;
            self.pos.y -= self.vel.y * dt;
            self.pos.x += self.vel.x * dt;
            self.vel.x *= self.damping;
        } else if self.speed_sq() > physics.rest_threshold {
            if !self.spend_bounce() {
                return Advance::Expired;
            }
            self.vel.y = -self.vel.y / self.restitution;
            self.vel.x *= 0.5;
            self.pos.y = world.floor_y;
        } else {
            self.vel = Vec2::ZERO;
            self.pos.y = world.floor_y;
            self.lifetime -= 1;
            if self.lifetime < 0 {
                return Advance::Expired;
            }
        }

        // Side walls and ceiling only reflect motion heading into them
        let (left, right) = (world.left_wall(), world.right_wall());
        if (self.pos.x >= right && self.vel.x > 0.0) || (self.pos.x <= left && self.vel.x < 0.0) {
            if !self.spend_bounce() {
                return Advance::Expired;
            }
            self.vel.x = -self.vel.x / self.restitution;
        }
        if self.pos.y <= 0.0 && self.vel.y > 0.0 {
            if !self.spend_bounce() {
                return Advance::Expired;
            }
            self.vel.y = -self.vel.y / self.restitution;
        }

        self.pos.x = self.pos.x.clamp(left, right.max(left));
        self.pos.y = self.pos.y.clamp(0.0, world.floor_y);
        Advance::Alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aim_angle, launch_velocity};
    use proptest::prelude::*;

    fn unit_physics() -> Ballistics {
        Ballistics {
            time_scale: 1.0,
            ..Ballistics::default()
        }
    }

    fn shot(variant: Variant, pos: Vec2, vel: Vec2) -> Projectile {
        Projectile::fire(1, LauncherId(0), variant, pos, vel, &Ballistics::default())
    }

    #[test]
    fn test_first_step_scenario() {
        let physics = unit_physics();
        let world = World::default();
        let vel = launch_velocity(20.0, 0.0);
        let mut p = Projectile::fire(1, LauncherId(0), Variant::Standard, Vec2::new(100.0, 450.0), vel, &physics);
        assert!((p.vel.x - 20.0).abs() < 1e-5);
        assert!(p.vel.y.abs() < 1e-5);

        assert_eq!(p.advance(0.1, &physics, &world), Advance::Alive);
        assert!((p.vel.y + 0.98).abs() < 1e-4);
        // y -= vy * dt, with vy negative the projectile sinks on screen
        assert!((p.pos.y - 450.098).abs() < 1e-3);
        assert!((p.pos.x - 102.0).abs() < 1e-4);
        assert!((p.vel.x - 19.8).abs() < 1e-4);
    }

    #[test]
    fn test_variant_table() {
        let physics = Ballistics::default();
        let pos = Vec2::new(100.0, 450.0);
        let vel = launch_velocity(50.0, aim_angle(pos, pos + Vec2::new(1.0, -1.0)));
        let radii: Vec<f32> = Variant::ALL
            .iter()
            .map(|&v| Projectile::fire(1, LauncherId(0), v, pos, vel, &physics).radius)
            .collect();
        assert_eq!(radii, vec![15.0, 20.0, 13.0, 15.0]);

        let bouncy = Projectile::fire(1, LauncherId(0), Variant::Bouncy, pos, vel, &physics);
        assert_eq!(bouncy.bounces_left, 15);
        assert!(bouncy.restitution > 1.0 && bouncy.restitution < physics.restitution);

        let fast = Projectile::fire(1, LauncherId(0), Variant::Fast, pos, vel, &physics);
        assert!((fast.gravity_scale - 1.5 / 1.2).abs() < 1e-6);
        assert_eq!(fast.bounces_left, 4);
    }

    #[test]
    fn test_floor_bounce_reflects_and_halves() {
        let physics = Ballistics::default();
        let world = World::default();
        let mut p = shot(Variant::Standard, Vec2::new(300.0, world.floor_y), Vec2::new(8.0, -12.0));
        assert_eq!(p.advance(0.016, &physics, &world), Advance::Alive);
        assert!((p.vel.y - 6.0).abs() < 1e-5);
        assert!((p.vel.x - 4.0).abs() < 1e-5);
        assert_eq!(p.bounces_left, 3);
        assert_eq!(p.pos.y, world.floor_y);
    }

    #[test]
    fn test_right_wall_bounce_clamps() {
        let physics = Ballistics::default();
        let world = World::default();
        let mut p = shot(Variant::Standard, Vec2::new(world.right_wall() - 1.0, 200.0), Vec2::new(60.0, 0.0));
        p.advance(0.05, &physics, &world);
        assert!(p.vel.x < 0.0);
        assert_eq!(p.pos.x, world.right_wall());
    }

    #[test]
    fn test_ceiling_keeps_projectile_in_world() {
        let physics = Ballistics::default();
        let world = World::default();
        let mut p = shot(Variant::Standard, Vec2::new(300.0, 5.0), Vec2::new(0.0, 100.0));
        p.advance(0.05, &physics, &world);
        assert_eq!(p.pos.y, 0.0);
        assert!(p.vel.y < 0.0);
    }

    #[test]
    fn test_exhausted_bounce_budget_expires() {
        let physics = Ballistics::default();
        let world = World::default();
        let mut p = shot(Variant::Standard, Vec2::new(300.0, world.floor_y), Vec2::new(0.0, -50.0));
        p.bounces_left = 0;
        assert_eq!(p.advance(0.016, &physics, &world), Advance::Expired);
    }

    #[test]
    fn test_resting_projectile_expires_after_lifetime() {
        let physics = Ballistics::default();
        let world = World::default();
        let mut p = shot(Variant::Standard, Vec2::new(300.0, world.floor_y), Vec2::ZERO);
        assert!(p.is_resting(&physics, &world));
        let lifetime = p.lifetime;
        for _ in 0..lifetime {
            assert_eq!(p.advance(0.016, &physics, &world), Advance::Alive);
        }
        assert_eq!(p.advance(0.016, &physics, &world), Advance::Expired);
    }

    proptest! {
        #[test]
        fn prop_floor_bounce_loses_energy(vx in -80.0f32..80.0, vy in -80.0f32..-4.0, x in 100.0f32..700.0) {
            let physics = Ballistics::default();
            let world = World::default();
            for variant in Variant::ALL {
                let mut p = shot(variant, Vec2::new(x, world.floor_y), Vec2::new(vx, vy));
                let before = p.speed_sq();
                p.advance(0.016, &physics, &world);
                prop_assert!(p.speed_sq() < before);
            }
        }

        #[test]
        fn prop_wall_bounce_loses_energy(vx in 1.0f32..80.0, vy in -50.0f32..50.0, y in 50.0f32..450.0) {
            let physics = Ballistics { time_scale: 1.0, gravity: 0.0, ..Ballistics::default() };
            let world = World::default();
            let mut p = shot(Variant::Standard, Vec2::new(world.right_wall(), y), Vec2::new(vx, vy));
            p.damping = 1.0;
            let before = p.speed_sq();
            p.advance(0.001, &physics, &world);
            prop_assert!(p.speed_sq() < before);
        }

        #[test]
        fn prop_lifetime_and_bounces_never_increase(
            vx in -100.0f32..100.0,
            vy in -100.0f32..100.0,
            dt in 0.001f32..0.1,
        ) {
            let physics = Ballistics::default();
            let world = World::default();
            let mut p = shot(Variant::Bouncy, Vec2::new(400.0, 300.0), Vec2::new(vx, vy));
            for _ in 0..500 {
                let (life, bounces) = (p.lifetime, p.bounces_left);
                if p.advance(dt, &physics, &world) == Advance::Expired {
                    break;
                }
                prop_assert!(p.lifetime <= life);
                prop_assert!(p.bounces_left <= bounces);
                prop_assert!(p.pos.x >= world.left_wall() && p.pos.x <= world.right_wall());
                prop_assert!(p.pos.y >= 0.0 && p.pos.y <= world.floor_y);
            }
        }
    }
}
