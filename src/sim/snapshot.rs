//! Read-only scene view for the rendering collaborator

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityKind};
use super::formation::Direction;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub live: bool,
    pub opacity: f32,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub frame: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub health: i32,
    pub direction: Direction,
    pub cadence: f64,
    pub entities: Vec<EntitySnapshot>,
}

impl GameState {
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            frame: self.frame,
            phase: self.phase,
            score: self.progress.score(),
            health: self.progress.health(),
            direction: self.formation.direction(),
            cadence: self.formation.cadence(),
            entities: self
                .registry
                .iter()
                .map(|e| EntitySnapshot {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.size,
                    live: e.live,
                    opacity: e.opacity,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(3);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.entities.len(), 31);
        assert_eq!(snapshot.health, 100);

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SceneSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entities.len(), snapshot.entities.len());
        assert_eq!(back.phase, GamePhase::Playing);
    }
}
