//! Hit testing between projectiles and everything they can strike
//!
//! Two shapes are supported: the axis-aligned box test the cannon games
//! traditionally used (each body is a square of half-width `r`) and a true
//! circle overlap test. Both are symmetric in their arguments.

use glam::Vec2;

use super::launcher::Launcher;
use super::projectile::Projectile;
use super::target::{Hazard, Target};
use crate::settings::HitTest;

/// Anything a projectile can hit
pub trait Collider {
    fn center(&self) -> Vec2;

    fn hit_radius(&self) -> f32;

    /// Destroyed bodies are never hit
    fn is_solid(&self) -> bool {
        true
    }
}

/// Axis-aligned box overlap
#[inline]
pub fn box_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    (b.x - a.x).abs() <= reach && (b.y - a.y).abs() <= reach
}

/// Circle overlap (touching counts)
#[inline]
pub fn circle_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) <= reach * reach
}

/// Check whether two bodies overlap under the given hit-test mode
pub fn overlaps<A, B>(a: &A, b: &B, mode: HitTest) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    if !a.is_solid() || !b.is_solid() {
        return false;
    }
    match mode {
        HitTest::Box => box_overlap(a.center(), a.hit_radius(), b.center(), b.hit_radius()),
        HitTest::Circle => circle_overlap(a.center(), a.hit_radius(), b.center(), b.hit_radius()),
    }
}

impl Projectile {
    /// Hit test against another body
    pub fn collides_with<C: Collider + ?Sized>(&self, other: &C, mode: HitTest) -> bool {
        overlaps(self, other, mode)
    }
}

impl Collider for Projectile {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hit_radius(&self) -> f32 {
        self.radius
    }
}

impl Collider for Target {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hit_radius(&self) -> f32 {
        self.radius
    }

    fn is_solid(&self) -> bool {
        self.alive
    }
}

impl Collider for Hazard {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hit_radius(&self) -> f32 {
        self.radius
    }

    fn is_solid(&self) -> bool {
        self.alive
    }
}

impl Collider for Launcher {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn hit_radius(&self) -> f32 {
        self.tuning.hit_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Ballistics;
    use crate::sim::{LauncherId, TargetKind, Variant};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn projectile_at(x: f32, y: f32) -> Projectile {
        Projectile::fire(1, LauncherId(0), Variant::Standard, Vec2::new(x, y), Vec2::ZERO, &Ballistics::default())
    }

    fn target_at(x: f32, y: f32, r: f32) -> Target {
        let mut rng = Pcg32::seed_from_u64(3);
        Target::spawn(9, TargetKind::Stationary, Vec2::new(x, y), r, 0, &mut rng)
    }

    #[test]
    fn test_box_corner_hits_where_circle_misses() {
        // Projectile radius 15, target radius 20: reach 35 on each axis
        let p = projectile_at(0.0, 0.0);
        let t = target_at(30.0, 30.0, 20.0);
        assert!(p.collides_with(&t, HitTest::Box));
        assert!(!p.collides_with(&t, HitTest::Circle));
    }

    #[test]
    fn test_touching_counts() {
        let p = projectile_at(0.0, 0.0);
        let t = target_at(35.0, 0.0, 20.0);
        assert!(p.collides_with(&t, HitTest::Box));
        assert!(p.collides_with(&t, HitTest::Circle));
    }

    #[test]
    fn test_destroyed_target_never_hit() {
        let p = projectile_at(100.0, 100.0);
        let mut t = target_at(100.0, 100.0, 20.0);
        assert!(p.collides_with(&t, HitTest::Box));
        t.destroy();
        assert!(!p.collides_with(&t, HitTest::Box));
        assert!(!overlaps(&t, &p, HitTest::Circle));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0, ra in 0.5f32..60.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0, rb in 0.5f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(box_overlap(a, ra, b, rb), box_overlap(b, rb, a, ra));
            prop_assert_eq!(circle_overlap(a, ra, b, rb), circle_overlap(b, rb, a, ra));

            let mut p = projectile_at(ax, ay);
            p.radius = ra;
            let t = target_at(bx, by, rb);
            for mode in [HitTest::Box, HitTest::Circle] {
                prop_assert_eq!(p.collides_with(&t, mode), overlaps(&t, &p, mode));
            }
        }

        #[test]
        fn prop_circle_hit_implies_box_hit(
            bx in -100.0f32..100.0, by in -100.0f32..100.0, rb in 0.5f32..60.0,
        ) {
            let p = projectile_at(0.0, 0.0);
            let t = target_at(bx, by, rb);
            if p.collides_with(&t, HitTest::Circle) {
                prop_assert!(p.collides_with(&t, HitTest::Box));
            }
        }
    }
}
