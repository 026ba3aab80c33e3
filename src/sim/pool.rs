//! The projectile pool owns every live projectile and the variant queue
//!
//! Live projectiles keep insertion order (update and draw order). The queue
//! of upcoming variants is refilled in batches whenever a shot finds it
//! empty, so firing never fails.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::{Collider, overlaps};
use super::launcher::{LauncherId, VariantSource};
use super::projectile::{Advance, Projectile, Variant};
use crate::settings::{Ballistics, HitTest, World};

#[derive(Debug, Clone)]
pub struct ProjectilePool {
    live: Vec<Projectile>,
    queue: VecDeque<Variant>,
    /// Variants the queue is refilled from
    allowed: Vec<Variant>,
    refill_batch: usize,
    /// Shots since the last target hit
    shots_since_hit: u32,
    /// Shots this round
    shots_fired: u32,
    next_id: u32,
}

impl ProjectilePool {
    pub fn new(allowed: Vec<Variant>, refill_batch: usize) -> Self {
        let allowed = if allowed.is_empty() {
            vec![Variant::Standard]
        } else {
            allowed
        };
        Self {
            live: Vec::new(),
            queue: VecDeque::new(),
            allowed,
            refill_batch: refill_batch.max(1),
            shots_since_hit: 0,
            shots_fired: 0,
            next_id: 1,
        }
    }

    /// Append a batch of random variants to the queue
    pub fn refill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for _ in 0..self.refill_batch {
            let variant = self.allowed.choose(rng).copied().unwrap_or(Variant::Standard);
            self.queue.push_back(variant);
        }
    }

    /// Refill only if the queue is empty
    pub fn ensure_queue<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.queue.is_empty() {
            self.refill(rng);
        }
    }

    /// Variant the next queued shot will use
    pub fn peek_variant(&self, source: VariantSource) -> Option<Variant> {
        match source {
            VariantSource::Fixed(v) => Some(v),
            VariantSource::Queue => self.queue.front().copied(),
        }
    }

    fn take_variant<R: Rng + ?Sized>(&mut self, source: VariantSource, rng: &mut R) -> Variant {
        match source {
            VariantSource::Fixed(v) => v,
            VariantSource::Queue => {
                self.ensure_queue(rng);
                self.queue.pop_front().unwrap_or(Variant::Standard)
            }
        }
    }

    /// Create and register a projectile; returns its id
    pub fn fire<R: Rng + ?Sized>(
        &mut self,
        source: VariantSource,
        owner: LauncherId,
        pos: Vec2,
        vel: Vec2,
        physics: &Ballistics,
        rng: &mut R,
    ) -> u32 {
        let variant = self.take_variant(source, rng);
        let id = self.next_id;
        self.next_id += 1;
        self.shots_since_hit += 1;
        self.shots_fired += 1;
        self.live.push(Projectile::fire(id, owner, variant, pos, vel, physics));
        id
    }

    /// Put a variant back at the head of the queue
    pub fn requeue_front(&mut self, variant: Variant) {
        self.queue.push_front(variant);
    }

    /// Advance every live projectile and drop the expired ones.
    ///
    /// Returns how many expired.
    pub fn advance(&mut self, dt: f32, physics: &Ballistics, world: &World) -> usize {
        let before = self.live.len();
        self.live.retain_mut(|p| p.advance(dt, physics, world) == Advance::Alive);
        before - self.live.len()
    }

    /// First live projectile (in insertion order) hitting `other`,
    /// skipping those fired by `exclude_owner`
    pub fn first_hit<C: Collider + ?Sized>(
        &self,
        other: &C,
        mode: HitTest,
        exclude_owner: Option<LauncherId>,
    ) -> Option<u32> {
        self.live
            .iter()
            .filter(|p| Some(p.owner) != exclude_owner)
            .find(|p| overlaps(*p, other, mode))
            .map(|p| p.id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Projectile> {
        let idx = self.live.iter().position(|p| p.id == id)?;
        Some(self.live.remove(idx))
    }

    pub fn get(&self, id: u32) -> Option<&Projectile> {
        self.live.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every live projectile
    pub fn clear(&mut self) {
        self.live.clear();
    }

    pub fn upcoming(&self) -> impl Iterator<Item = Variant> + '_ {
        self.queue.iter().copied()
    }

    pub fn shots_since_last_hit(&self) -> u32 {
        self.shots_since_hit
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    /// A target was hit
    pub fn record_hit(&mut self) {
        self.shots_since_hit = 0;
    }

    /// A new round started
    pub fn reset_round(&mut self) {
        self.shots_since_hit = 0;
        self.shots_fired = 0;
    }
}
