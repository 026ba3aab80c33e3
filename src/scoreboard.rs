//! Round history for the scoring display
//!
//! Keeps the most recent round summaries (newest first) and the best round,
//! measured in shots fired.

use serde::{Deserialize, Serialize};

/// Maximum number of rounds to keep
pub const MAX_ROUNDS: usize = 10;

/// What happened in one cleared round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// Round number (1-based)
    pub round: u32,
    /// Shots fired since the last target hit when the round cleared
    pub shots_since_last_hit: u32,
    /// Shots fired during the round
    pub shots_fired: u32,
    /// Targets destroyed during the round
    pub targets_destroyed: u32,
    /// Running score at the end of the round
    pub score: u64,
}

/// Round history
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scoreboard {
    pub entries: Vec<RoundSummary>,
    best: Option<RoundSummary>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            best: None,
        }
    }

    /// Check if a round would beat the current best
    pub fn qualifies(&self, summary: &RoundSummary) -> bool {
        if summary.targets_destroyed == 0 {
            return false;
        }
        self.best
            .map(|b| summary.shots_fired < b.shots_fired)
            .unwrap_or(true)
    }

    /// Record a cleared round. Returns true if it is the new best.
    pub fn record(&mut self, summary: RoundSummary) -> bool {
        let is_best = self.qualifies(&summary);
        if is_best {
            self.best = Some(summary);
        }
        self.entries.insert(0, summary);
        self.entries.truncate(MAX_ROUNDS);
        is_best
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recently cleared round
    pub fn latest(&self) -> Option<&RoundSummary> {
        self.entries.first()
    }

    /// Round with the fewest shots fired
    pub fn best(&self) -> Option<&RoundSummary> {
        self.best.as_ref()
    }

    /// Average shots per cleared round over the kept history
    pub fn average_shots(&self) -> Option<f32> {
        if self.entries.is_empty() {
            return None;
        }
        let total: u32 = self.entries.iter().map(|e| e.shots_fired).sum();
        Some(total as f32 / self.entries.len() as f32)
    }
}
