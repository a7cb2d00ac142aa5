//! Outbound simulation events
//!
//! The simulation never renders, plays audio or switches scenes itself. It
//! pushes `GameEvent`s into an outbox that the collaborators drain after
//! each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;

/// Which side a bullet belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Ship,
    Invader,
}

/// Sound cues, keyed by a fixed asset filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    ShipBullet,
    InvaderBullet,
    ShipHit,
    InvaderHit,
}

impl SoundCue {
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCue::ShipBullet => "ShipBullet.wav",
            SoundCue::InvaderBullet => "InvaderBullet.wav",
            SoundCue::ShipHit => "ShipHit.wav",
            SoundCue::InvaderHit => "InvaderHit.wav",
        }
    }

    /// Cue played when `side` fires
    pub fn for_shot(side: Side) -> Self {
        match side {
            Side::Ship => SoundCue::ShipBullet,
            Side::Invader => SoundCue::InvaderBullet,
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every invader destroyed
    FormationCleared,
    /// An invader reached the minimum altitude
    InvadersLanded,
    /// Ship health reached zero
    ShipDestroyed,
}

impl EndReason {
    pub fn is_win(self) -> bool {
        self == EndReason::FormationCleared
    }
}

/// Events for rendering, audio, HUD and scene-transition collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A bullet was spawned and should be animated from `from` to `to`
    BulletFired {
        id: EntityId,
        side: Side,
        from: Vec2,
        to: Vec2,
        duration: f64,
    },
    /// A bullet reached its destination and was removed
    BulletExpired { id: EntityId },
    InvaderDestroyed { id: EntityId },
    ShipDamaged { opacity: f32 },
    ShipDestroyed,
    ScoreChanged { score: u32 },
    HealthChanged { health: i32 },
    /// Formation reversed at a scene edge; `cadence` is the new step interval
    FormationReversed { cadence: f64 },
    Sound(SoundCue),
    /// Emitted exactly once per session
    GameOver(EndReason),
}
