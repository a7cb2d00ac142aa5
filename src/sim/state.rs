//! Game state
//!
//! The simulation-state struct threaded through `tick`. It owns every
//! component and lends them to each other explicitly; nothing reaches into
//! global state.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Scene;
use super::contact::{ContactQueue, ContactResolver};
use super::entity::{Category, EntityId, EntityKind, InvaderType, Registry};
use super::events::{EndReason, GameEvent};
use super::formation::Formation;
use super::progress::Progress;
use super::queue::TapQueue;
use super::weapons::Weapons;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Suspended while the host is inactive; timers resume where they stopped
    Paused,
    /// Session ended; no further simulation
    GameOver(EndReason),
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub scene: Scene,
    pub phase: GamePhase,
    pub registry: Registry,
    pub formation: Formation,
    pub weapons: Weapons,
    pub contacts: ContactResolver,
    pub progress: Progress,
    /// Tap events from the input collaborator
    pub taps: TapQueue,
    /// Horizontal acceleration per unit of tilt
    pub tilt_accel: f32,
    /// Frames simulated so far
    pub frame: u64,
    /// Timestamp of the previous tick, for ship motion integration
    pub last_frame_time: Option<f64>,
    pub ship: EntityId,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New session with default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(&Settings {
            seed,
            ..Settings::default()
        })
    }

    /// New session: invader grid, ship, fresh counters
    pub fn with_settings(settings: &Settings) -> Self {
        let scene = Scene::new(settings.scene_width, settings.scene_height);
        let mut registry = Registry::new();
        setup_invaders(&mut registry, &scene);
        let ship = registry.spawn(EntityKind::Ship, Vec2::new(scene.width / 2.0, SHIP_HEIGHT / 2.0));

        log::info!(
            "New game: seed {}, {} invaders, scene {}x{}",
            settings.seed,
            registry.count(Category::Invader),
            scene.width,
            scene.height
        );

        Self {
            seed: settings.seed,
            scene,
            phase: GamePhase::Playing,
            registry,
            formation: Formation::new(
                settings.initial_cadence,
                settings.cadence_ratchet,
                settings.formation_step,
            ),
            weapons: Weapons::new(
                settings.ship_bullet_duration,
                settings.invader_bullet_duration,
                settings.bullet_grace,
            ),
            contacts: ContactResolver::new(settings.score_per_invader, settings.damage_per_hit),
            progress: Progress::new(),
            taps: TapQueue::new(),
            tilt_accel: settings.tilt_accel,
            frame: 0,
            last_frame_time: None,
            ship,
            rng: Pcg32::seed_from_u64(settings.seed),
            events: Vec::new(),
        }
    }

    /// Producer handle for tap input
    pub fn tap_queue(&self) -> TapQueue {
        self.taps.clone()
    }

    /// Producer handle for the collision-detection collaborator
    pub fn contact_queue(&self) -> ContactQueue {
        self.contacts.queue().clone()
    }

    /// Suspend the simulation. Only a running session can be paused.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused at frame {}", self.frame);
        true
    }

    /// Resume at time `now`. The time spent paused is skipped, so the
    /// formation cadence and bullet flights carry on where they stopped.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        let span = self.last_frame_time.map_or(0.0, |last| (now - last).max(0.0));
        self.formation.shift_clock(span);
        for motion in self.registry.iter_mut().filter_map(|e| e.motion.as_mut()) {
            motion.start += span;
        }
        if self.last_frame_time.is_some() {
            self.last_frame_time = Some(now);
        }
        self.phase = GamePhase::Playing;
        log::info!("Resumed after {span:.2}s");
        true
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    pub fn invader_count(&self) -> usize {
        self.registry.count(Category::Invader)
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }
}

/// Rows of invaders stacked upward from the middle of the scene, starting a
/// third of the way across
fn setup_invaders(registry: &mut Registry, scene: &Scene) {
    let origin = Vec2::new(scene.width / 3.0, scene.height / 2.0);
    for row in 0..INVADER_ROWS {
        let kind = EntityKind::Invader(InvaderType::for_row(row));
        let y = origin.y + row as f32 * INVADER_HEIGHT * 2.0;
        for col in 0..INVADER_COLS {
            let x = origin.x + col as f32 * (INVADER_WIDTH + INVADER_SPACING_X);
            registry.spawn(kind, Vec2::new(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::formation::Direction;

    #[test]
    fn test_new_game_layout() {
        let state = GameState::new(1);
        assert_eq!(state.invader_count(), 30);
        assert_eq!(state.registry.count(Category::Ship), 1);
        assert_eq!(state.progress.score(), 0);
        assert_eq!(state.progress.health(), 100);
        assert_eq!(state.formation.direction(), Direction::Right);
        assert_eq!(state.phase, GamePhase::Playing);

        let ship = state.registry.get(state.ship).unwrap();
        assert_eq!(ship.min().y, 0.0);

        // Row colours cycle A, B, C
        let kinds: Vec<_> = state
            .registry
            .live_in(Category::Invader)
            .step_by(INVADER_COLS as usize)
            .map(|e| e.kind)
            .collect();
        assert_eq!(kinds[0], EntityKind::Invader(InvaderType::A));
        assert_eq!(kinds[1], EntityKind::Invader(InvaderType::B));
        assert_eq!(kinds[2], EntityKind::Invader(InvaderType::C));
        assert_eq!(kinds[3], EntityKind::Invader(InvaderType::A));
    }

    #[test]
    fn test_grid_fits_in_scene() {
        let state = GameState::new(1);
        for invader in state.registry.live_in(Category::Invader) {
            assert!(invader.min().x > 0.0 && invader.max().x < state.scene.width);
            assert!(invader.max().y < state.scene.height);
            assert!(invader.min().y > MIN_INVADER_ALTITUDE);
        }
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut state = GameState::new(1);
        assert!(!state.resume(1.0));
        assert!(state.pause());
        assert!(state.is_paused());
        assert!(!state.pause());

        state.phase = GamePhase::GameOver(EndReason::ShipDestroyed);
        assert!(!state.pause());
        assert!(!state.resume(1.0));
    }

    #[test]
    fn test_resume_skips_paused_span() {
        let mut state = GameState::new(1);
        state.last_frame_time = Some(2.0);
        state.formation.shift_clock(1.5);
        let bullet = state.registry.spawn(EntityKind::ShipBullet, Vec2::new(10.0, 20.0));
        if let Some(entity) = state.registry.get_mut(bullet) {
            entity.motion = Some(crate::sim::entity::Motion {
                from: Vec2::new(10.0, 20.0),
                to: Vec2::new(10.0, 600.0),
                start: 1.8,
                duration: 1.0,
            });
        }

        assert!(state.pause());
        assert!(state.resume(12.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.last_frame_time, Some(12.0));
        assert!((state.formation.last_step() - 11.5).abs() < 1e-9);
        let motion = state.registry.get(bullet).unwrap().motion.unwrap();
        assert!((motion.start - 11.8).abs() < 1e-9);
    }

    #[test]
    fn test_queue_handles_are_shared() {
        let state = GameState::new(1);
        state.tap_queue().push(crate::sim::queue::Tap);
        assert_eq!(state.taps.len(), 1);
    }
}
