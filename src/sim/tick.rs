//! Frame-stepped simulation tick
//!
//! Core game loop: apply input events, advance every entity by the frame
//! delta, resolve hits, then check whether the round is over.

use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;
use rand::seq::IndexedRandom;

use super::autopilot;
use super::projectile::Variant;
use super::state::{GameEvent, GamePhase, GameState, random_between};
use super::target::{Hazard, MotionContext, Target, TargetKind};
use crate::consts::*;
use crate::palette;
use crate::scoreboard::RoundSummary;

/// One input event from the host, in the order it happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved (world coordinates)
    AimSample(Vec2),
    FirePress,
    /// Fire button released with the pointer at this point
    FireRelease(Vec2),
    /// Bind a variant to the active launcher
    SelectVariant(Variant),
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
    /// Wall-clock seconds; `None` reads the system clock
    pub wall_clock: Option<f64>,
    /// Idle/demo mode - the autopilot drives the active launcher
    pub idle_mode: bool,
}

fn wall_clock_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if !dt.is_finite() || dt <= 0.0 {
        log::warn!("Rejected frame delta {dt}");
        return;
    }
    let dt = dt.min(MAX_FRAME_DT);

    state.events.clear();
    state.time += dt as f64;

    if state.phase == GamePhase::Setup {
        setup_round(state);
    }

    if state.phase == GamePhase::Clearing {
        for launcher in &mut state.launchers {
            launcher.tick(dt);
        }
        state.clear_timer -= dt;
        if state.clear_timer <= 0.0 {
            state.phase = GamePhase::Setup;
            setup_round(state);
        }
        return;
    }

    // Input is only taken while the round is live
    for event in &input.events {
        apply_input(state, event);
    }
    if input.idle_mode {
        for event in autopilot::plan(state) {
            apply_input(state, &event);
        }
    }

    let wall_clock = input.wall_clock.unwrap_or_else(wall_clock_now);
    advance_entities(state, dt, wall_clock);

    resolve_target_hits(state);
    resolve_hazard_hits(state);
    resolve_control_swap(state);

    update_hazard_drops(state, dt);
    check_round_clear(state);
}

/// Route one input event to the active launcher
fn apply_input(state: &mut GameState, event: &InputEvent) {
    let idx = state.active;
    match *event {
        InputEvent::AimSample(p) => state.launchers[idx].aim(Some(p)),
        InputEvent::FirePress => state.launchers[idx].begin_charge(),
        InputEvent::SelectVariant(v) => state.launchers[idx].select_variant(v),
        InputEvent::FireRelease(p) => {
            let fired = state.launchers[idx].end_charge(
                p,
                &mut state.pool,
                &state.settings.ballistics,
                &mut state.rng,
            );
            if let Some(id) = fired {
                let variant = state.pool.get(id).map(|p| p.variant).unwrap_or(Variant::Standard);
                state.events.push(GameEvent::Fired {
                    launcher: state.launchers[idx].id,
                    projectile: id,
                    variant,
                });
            }
        }
    }
}

fn advance_entities(state: &mut GameState, dt: f32, wall_clock: f64) {
    for launcher in &mut state.launchers {
        launcher.tick(dt);
        launcher.power_up(dt);
    }

    let mut ctx = MotionContext {
        rng: &mut state.rng,
        wall_clock,
        physics: &state.settings.ballistics,
        world: &state.settings.world,
    };
    for target in &mut state.targets {
        target.tick(dt, &mut ctx);
    }

    // Landed hazards drop a falling target and go back to the top
    let world = state.settings.world;
    let mut landed = Vec::new();
    for (i, hazard) in state.hazards.iter_mut().enumerate() {
        if hazard.tick(dt, &world) {
            landed.push(i);
        }
    }
    for i in landed {
        let x = state.hazards[i].pos.x;
        let target_id = state.next_entity_id();
        let color = palette::TARGET_COLORS.choose(&mut state.rng).copied().unwrap_or(palette::RED);
        let target = Target::spawn(
            target_id,
            TargetKind::Falling,
            Vec2::new(x, world.floor_y),
            FALLING_TARGET_RADIUS,
            color,
            &mut state.rng,
        );
        state.targets.push(target);

        let new_x = random_between(&mut state.rng, world.left_wall(), world.right_wall());
        let hazard = &mut state.hazards[i];
        hazard.dock(new_x);
        log::info!("Hazard {} landed at x={:.0}, dropped target {}", hazard.id, x, target_id);
        state.events.push(GameEvent::HazardLanded { hazard: hazard.id, target: target_id });
    }

    let expired = state.pool.advance(dt, &state.settings.ballistics, &world);
    if expired > 0 {
        log::trace!("{expired} projectiles expired");
    }
}

/// Projectile x target: destroy the target and consume the projectile
fn resolve_target_hits(state: &mut GameState) {
    let mode = state.settings.hit_test;
    let points = state.settings.round.target_points;
    for i in 0..state.targets.len() {
        let Some(pid) = state.pool.first_hit(&state.targets[i], mode, None) else {
            continue;
        };
        state.pool.remove(pid);
        let target = &mut state.targets[i];
        if target.destroy() {
            state.score += points;
            state.targets_destroyed += 1;
            state.pool.record_hit();
            log::debug!("Projectile {} destroyed target {}", pid, target.id);
            state.events.push(GameEvent::TargetDestroyed { target: target.id, projectile: pid, points });
        }
    }
}

/// Projectile x hazard: destroy the hazard for bonus points
fn resolve_hazard_hits(state: &mut GameState) {
    let mode = state.settings.hit_test;
    let points = state.settings.round.hazard_points;
    for i in 0..state.hazards.len() {
        let Some(pid) = state.pool.first_hit(&state.hazards[i], mode, None) else {
            continue;
        };
        state.pool.remove(pid);
        let hazard = &mut state.hazards[i];
        if hazard.destroy() {
            state.score += points;
            log::debug!("Projectile {} destroyed hazard {}", pid, hazard.id);
            state.events.push(GameEvent::HazardDestroyed { hazard: hazard.id, projectile: pid, points });
        }
    }
}

/// Projectile x inactive launcher: control moves to the struck launcher.
///
/// At most one swap per tick. The projectile's variant goes back to the
/// front of the queue.
fn resolve_control_swap(state: &mut GameState) {
    let mode = state.settings.hit_test;
    let struck = state.launchers.iter().enumerate().find_map(|(j, launcher)| {
        if j == state.active {
            return None;
        }
        state.pool.first_hit(launcher, mode, Some(launcher.id)).map(|pid| (j, pid))
    });
    let Some((j, pid)) = struck else {
        return;
    };

    if let Some(projectile) = state.pool.remove(pid) {
        state.pool.requeue_front(projectile.variant);
    }
    let from = state.launchers[state.active].id;
    state.launchers[state.active].set_active(false);
    state.launchers[j].set_active(true);
    state.active = j;
    let to = state.launchers[j].id;
    log::info!("Control swapped from launcher {} to launcher {}", from.0, to.0);
    state.events.push(GameEvent::ControlSwapped { from, to });
}

/// Release docked hazards and re-arm destroyed ones every drop interval
fn update_hazard_drops(state: &mut GameState, dt: f32) {
    let interval = state.settings.round.hazard_drop_interval;
    state.drop_timer += dt;
    if state.drop_timer < interval {
        return;
    }
    state.drop_timer -= interval;

    let world = state.settings.world;
    let fall_speed = state.settings.round.hazard_fall_speed;
    for hazard in &mut state.hazards {
        if hazard.alive {
            if hazard.release(fall_speed) {
                log::debug!("Hazard {} released", hazard.id);
            }
        } else {
            hazard.dock(random_between(&mut state.rng, world.left_wall(), world.right_wall()));
        }
    }
}

/// Round is over once no target is alive and nothing is in flight
fn check_round_clear(state: &mut GameState) {
    if state.targets_alive() > 0 || !state.pool.is_empty() {
        return;
    }

    let summary = RoundSummary {
        round: state.round,
        shots_since_last_hit: state.pool.shots_since_last_hit(),
        shots_fired: state.pool.shots_fired(),
        targets_destroyed: state.targets_destroyed,
        score: state.score,
    };
    let best = state.scoreboard.record(summary);
    log::info!(
        "Round {} cleared: {} shots, {} since last hit, score {}{}",
        summary.round,
        summary.shots_fired,
        summary.shots_since_last_hit,
        summary.score,
        if best { " (best)" } else { "" }
    );
    state.events.push(GameEvent::RoundCleared(summary));
    state.phase = GamePhase::Clearing;
    state.clear_timer = state.settings.round.round_delay;
}

/// Spawn the targets of the next round and reset the hazards
pub fn setup_round(state: &mut GameState) {
    state.round += 1;
    let world = state.settings.world;
    let (r_min, r_max) = state.difficulty.radius_range;
    let count = state.difficulty.targets;

    state.targets.clear();
    for _ in 0..count {
        let kind = state
            .difficulty
            .allowed_targets
            .choose(&mut state.rng)
            .copied()
            .unwrap_or(TargetKind::Stationary);
        // Targets below the floor line would be out of every projectile's reach
        let (x_hi, y_hi) = (TARGET_SPAWN_X.1.min(world.right_wall()), TARGET_SPAWN_Y.1.min(world.floor_y));
        let pos = Vec2::new(
            random_between(&mut state.rng, TARGET_SPAWN_X.0.min(x_hi), x_hi),
            random_between(&mut state.rng, TARGET_SPAWN_Y.0.min(y_hi), y_hi),
        );
        let radius = random_between(&mut state.rng, r_min, r_max);
        let color = palette::TARGET_COLORS.choose(&mut state.rng).copied().unwrap_or(palette::RED);
        let id = state.next_entity_id();
        let target = Target::spawn(id, kind, pos, radius, color, &mut state.rng);
        log::debug!("Round {}: spawned {:?} target {} at ({:.0}, {:.0})", state.round, kind, id, pos.x, pos.y);
        state.targets.push(target);
    }

    if state.hazards.is_empty() {
        for _ in 0..state.settings.round.hazard_count {
            let id = state.next_entity_id();
            let x = random_between(&mut state.rng, world.left_wall(), world.right_wall());
            state.hazards.push(Hazard::docked(id, x));
        }
    } else {
        for hazard in &mut state.hazards {
            hazard.dock(random_between(&mut state.rng, world.left_wall(), world.right_wall()));
        }
    }
    state.drop_timer = 0.0;

    state.pool.reset_round();
    state.pool.ensure_queue(&mut state.rng);
    state.targets_destroyed = 0;
    state.phase = GamePhase::Active;

    log::info!("Round {} started with {} targets", state.round, count);
    state.events.push(GameEvent::RoundStarted { round: state.round, targets: count });
}
