//! Demo-mode player
//!
//! Picks the nearest alive target, charges the active launcher and releases
//! once the charge admits a drag-free ballistic solution. The plan is plain
//! input events, so a demo run goes through the same path as a human.

use std::f32::consts::{FRAC_PI_4, PI};

use glam::Vec2;

use super::state::GameState;
use super::tick::InputEvent;

/// Release once the charge exceeds the minimum speed by this factor
/// (horizontal damping eats some of the range).
const POWER_MARGIN: f32 = 0.9;

/// Distance of the synthetic aim point from the launcher
const AIM_REACH: f32 = 100.0;

/// Low-arc launch angle (screen space) hitting `to` from `from` at `speed`.
///
/// Ignores damping. Returns `None` when the target is out of reach.
pub fn firing_solution(from: Vec2, to: Vec2, speed: f32, gravity: f32) -> Option<f32> {
    let dx = to.x - from.x;
    // Upward is positive in ballistic space
    let dy = from.y - to.y;
    if gravity <= 0.0 {
        return Some(crate::aim_angle(from, to));
    }
    if dx.abs() < f32::EPSILON {
        return None;
    }

    let v2 = speed * speed;
    let disc = v2 * v2 - gravity * (gravity * dx * dx + 2.0 * dy * v2);
    if disc < 0.0 {
        return None;
    }
    let elevation = ((v2 - disc.sqrt()) / (gravity * dx.abs())).atan();
    let up_angle = if dx >= 0.0 { elevation } else { PI - elevation };
    Some(-up_angle)
}

/// Smallest launch speed reaching `to` from `from` (drag-free)
pub fn minimum_speed(from: Vec2, to: Vec2, gravity: f32) -> f32 {
    let dx = to.x - from.x;
    let dy = from.y - to.y;
    (gravity.max(0.0) * (dy + (dx * dx + dy * dy).sqrt())).sqrt()
}

/// Input events for the active launcher this frame
pub fn plan(state: &GameState) -> Vec<InputEvent> {
    let launcher = state.active_launcher_ref();
    let from = launcher.pos;
    let Some(target) = state
        .targets()
        .iter()
        .filter(|t| t.alive)
        .min_by(|a, b| a.pos.distance(from).total_cmp(&b.pos.distance(from)))
    else {
        return Vec::new();
    };
    let to = target.pos;

    // One shot in flight at a time
    if !state.pool().is_empty() {
        return vec![InputEvent::AimSample(to)];
    }
    if !launcher.charging {
        return vec![InputEvent::AimSample(to), InputEvent::FirePress];
    }

    let gravity_scale = state
        .pool()
        .peek_variant(launcher.source)
        .map(|v| v.params().gravity_scale)
        .unwrap_or(1.0);
    let gravity = state.settings().ballistics.gravity * gravity_scale;
    let wanted = (minimum_speed(from, to, gravity) / POWER_MARGIN).min(launcher.tuning.max_power);
    if launcher.power < wanted {
        return vec![InputEvent::AimSample(to)];
    }

    let angle = firing_solution(from, to, launcher.power, gravity).unwrap_or(if to.x >= from.x {
        -FRAC_PI_4
    } else {
        -3.0 * FRAC_PI_4
    });
    let aim = from + Vec2::new(angle.cos(), angle.sin()) * AIM_REACH;
    log::trace!("autopilot release at power {:.1}, angle {:.2}", launcher.power, angle);
    vec![InputEvent::FireRelease(aim)]
}
