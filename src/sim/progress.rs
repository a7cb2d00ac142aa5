//! Score and ship health

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_HEALTH;

/// Score and health counters. Mutated only through the adjustment methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    score: u32,
    health: i32,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        Self {
            score: 0,
            health: STARTING_HEALTH,
        }
    }

    pub fn add_score(&mut self, delta: u32) -> u32 {
        self.score = self.score.saturating_add(delta);
        self.score
    }

    /// Apply a health delta (negative for damage), clamped at zero
    pub fn adjust_health(&mut self, delta: i32) -> i32 {
        self.health = self.health.saturating_add(delta).max(0);
        debug_assert!(self.health >= 0);
        self.health
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    /// Health relative to the starting value, in [0, 1]
    pub fn health_fraction(&self) -> f32 {
        (self.health as f32 / STARTING_HEALTH as f32).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}
