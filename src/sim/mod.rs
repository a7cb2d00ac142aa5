//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `tick(now)` only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod contact;
pub mod entity;
pub mod events;
pub mod formation;
pub mod progress;
pub mod queue;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapons;

pub use collision::{CollisionResult, Scene, aabb_overlap, detect_contacts};
pub use contact::{Contact, ContactQueue, ContactResolver};
pub use entity::{Category, Entity, EntityId, EntityKind, IdSnapshot, InvaderType, Registry};
pub use events::{EndReason, GameEvent, Side, SoundCue};
pub use formation::{Direction, Formation};
pub use progress::Progress;
pub use queue::{EventQueue, Tap, TapQueue};
pub use snapshot::{EntitySnapshot, SceneSnapshot};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, end_condition, tick};
pub use weapons::Weapons;
