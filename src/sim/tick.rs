//! Frame driver
//!
//! Advances the simulation once per rendered frame in a fixed order.

use super::collision::{contain, detect_contacts};
use super::entity::Category;
use super::events::{EndReason, GameEvent, Side};
use super::state::{GamePhase, GameState};
use crate::consts::{MIN_INVADER_ALTITUDE, SHIP_DAMPING};

/// Longest frame gap integrated for ship motion (seconds)
const MAX_FRAME_DT: f64 = 0.1;

/// Continuous input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Accelerometer-style horizontal signal, roughly in [-1, 1]
    pub tilt: f32,
}

/// Why the session should end, if it should
pub fn end_condition(state: &GameState) -> Option<EndReason> {
    let mut invaders = state.registry.live_in(Category::Invader).peekable();
    if invaders.peek().is_none() {
        return Some(EndReason::FormationCleared);
    }
    if invaders.any(|e| e.min().y <= MIN_INVADER_ALTITUDE) {
        return Some(EndReason::InvadersLanded);
    }
    if !state.registry.is_live(state.ship) || state.progress.is_dead() {
        return Some(EndReason::ShipDestroyed);
    }
    None
}

/// Advance the game by one frame at time `now` (seconds).
/// Does nothing while paused or after the game is over.
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> GamePhase {
    if state.phase != GamePhase::Playing {
        return state.phase;
    }

    if let Some(reason) = end_condition(state) {
        state.phase = GamePhase::GameOver(reason);
        state.events.push(GameEvent::GameOver(reason));
        log::info!(
            "Game over ({reason:?}) at frame {}: score {}, health {}",
            state.frame,
            state.progress.score(),
            state.progress.health()
        );
        return state.phase;
    }

    state.frame += 1;
    let dt = state
        .last_frame_time
        .map_or(0.0, |last| (now - last).clamp(0.0, MAX_FRAME_DT));
    state.last_frame_time = Some(now);

    let GameState {
        scene,
        registry,
        weapons,
        contacts,
        progress,
        taps,
        rng,
        events,
        ..
    } = &mut *state;

    contacts.resolve_all(registry, progress, events);
    weapons.advance_bullets(now, registry, events);
    weapons.drain_input(taps, now, registry, scene, rng, events);
    apply_tilt(state, input.tilt, dt as f32);

    let GameState {
        scene,
        registry,
        formation,
        weapons,
        contacts,
        rng,
        events,
        ..
    } = &mut *state;

    if let Some(step) = formation.advance(now, registry, scene) {
        if step.reversed {
            events.push(GameEvent::FormationReversed {
                cadence: formation.cadence(),
            });
        }
    }
    weapons.fire(Side::Invader, now, registry, scene, rng, events);
    detect_contacts(registry, contacts.queue());

    state.phase
}

/// Turn the tilt signal into horizontal ship motion, kept inside the scene
fn apply_tilt(state: &mut GameState, tilt: f32, dt: f32) {
    let scene = state.scene;
    let accel = state.tilt_accel;
    let Some(ship) = state.registry.get_mut(state.ship) else {
        return;
    };
    if !ship.live || dt <= 0.0 {
        return;
    }

    ship.vel.x += tilt * accel * dt;
    ship.vel *= (1.0 - SHIP_DAMPING * dt).max(0.0);
    let (pos, clamped) = contain(ship.pos + ship.vel * dt, ship.size, &scene);
    if clamped {
        ship.vel.x = 0.0;
    }
    ship.pos = pos;
}
