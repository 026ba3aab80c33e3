//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame delta in, state out
//! - Seeded RNG only (circular targets read the wall clock on purpose)
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod launcher;
pub mod motion;
pub mod pool;
pub mod projectile;
pub mod state;
pub mod target;
pub mod tick;

pub use collision::{Collider, box_overlap, circle_overlap, overlaps};
pub use launcher::{Launcher, LauncherId, LauncherMotion, VariantSource};
pub use motion::Patrol;
pub use pool::ProjectilePool;
pub use projectile::{Advance, Projectile, Variant, VariantParams};
pub use state::{EntityKind, GameEvent, GamePhase, GameState, Renderable};
pub use target::{Hazard, MotionContext, Target, TargetKind, TargetMotion};
pub use tick::{InputEvent, TickInput, setup_round, tick};
