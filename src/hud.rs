//! HUD labels
//!
//! Keeps the score and health labels in sync with progress events.

use crate::consts::STARTING_HEALTH;
use crate::sim::{GameEvent, GameState};

pub fn format_score(score: u32) -> String {
    format!("Score:  {score:04}")
}

/// Health as a percentage of the starting health, one decimal place
pub fn format_health(health: i32) -> String {
    let percent = f64::from(health.max(0)) * 100.0 / f64::from(STARTING_HEALTH);
    format!("Health:  {percent:.1}%")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score_label: String,
    pub health_label: String,
}

impl Hud {
    pub fn new(state: &GameState) -> Self {
        Self {
            score_label: format_score(state.progress.score()),
            health_label: format_health(state.progress.health()),
        }
    }

    /// Update labels from a progress event. Returns true if a label changed.
    pub fn apply(&mut self, event: &GameEvent) -> bool {
        match event {
            GameEvent::ScoreChanged { score } => {
                self.score_label = format_score(*score);
                true
            }
            GameEvent::HealthChanged { health } => {
                self.health_label = format_health(*health);
                true
            }
            _ => false,
        }
    }
}
