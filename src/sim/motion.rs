//! Ping-pong patrol motion shared by moving launchers and oscillating targets

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Back-and-forth motion between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Patrol {
    /// Point the patrol last left
    pub from: Vec2,
    /// Point the patrol is heading to
    pub to: Vec2,
}

impl Patrol {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }

    /// Move `pos` a `rate * dt` fraction of the way toward `to`.
    ///
    /// Once within `epsilon` of `to`, the endpoints swap and the patrol
    /// heads back.
    pub fn step(&mut self, pos: &mut Vec2, dt: f32, rate: f32, epsilon: f32) {
        let t = (rate * dt).clamp(0.0, 1.0);
        *pos += (self.to - *pos) * t;
        if pos.distance(self.to) <= epsilon {
            std::mem::swap(&mut self.from, &mut self.to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patrol_approaches_target() {
        let mut patrol = Patrol::new(Vec2::ZERO, Vec2::new(40.0, 0.0));
        let mut pos = Vec2::ZERO;
        patrol.step(&mut pos, 0.25, 1.0, 1.0);
        assert!((pos.x - 10.0).abs() < 1e-5);
        assert_eq!(patrol.to, Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_patrol_swaps_on_arrival() {
        let mut patrol = Patrol::new(Vec2::ZERO, Vec2::new(40.0, 0.0));
        let mut pos = Vec2::new(39.5, 0.0);
        patrol.step(&mut pos, 0.01, 1.0, 1.0);
        assert_eq!(patrol.to, Vec2::ZERO);
        assert_eq!(patrol.from, Vec2::new(40.0, 0.0));
    }

    #[test]
    fn test_patrol_ping_pongs() {
        let mut patrol = Patrol::new(Vec2::ZERO, Vec2::new(0.0, 30.0));
        let mut pos = Vec2::ZERO;
        let mut swaps = 0;
        let mut heading = patrol.to;
        for _ in 0..2000 {
            patrol.step(&mut pos, 1.0 / 60.0, 1.0, 1.0);
            if patrol.to != heading {
                swaps += 1;
                heading = patrol.to;
            }
        }
        assert!(swaps >= 2);
        assert!(pos.y >= -1e-3 && pos.y <= 30.0 + 1e-3);
    }
}
