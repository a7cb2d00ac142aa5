//! Invader formation movement
//!
//! The whole grid moves in lockstep on a timer. Hitting a side edge queues a
//! single downward step followed by a reversal, and every reversal makes the
//! timer shorter.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Scene;
use super::entity::{Category, Registry};
use crate::consts::EDGE_TOLERANCE;

/// Formation movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Right,
    Left,
    /// Step down once, then head right
    DownThenRight,
    /// Step down once, then head left
    DownThenLeft,
    /// Movement disabled
    None,
}

/// Outcome of a formation step that actually happened
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Direction used for this step's displacement
    pub direction: Direction,
    /// A boundary reversal ratcheted the cadence on this step
    pub reversed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    direction: Direction,
    /// Seconds per step
    cadence: f64,
    last_step: f64,
    ratchet: f64,
    step: f32,
}

impl Formation {
    pub fn new(cadence: f64, ratchet: f64, step: f32) -> Self {
        debug_assert!(cadence > 0.0, "cadence must be positive");
        debug_assert!(ratchet > 0.0 && ratchet <= 1.0, "ratchet must be in (0, 1]");
        Self {
            direction: Direction::Right,
            cadence,
            last_step: 0.0,
            ratchet,
            step,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn cadence(&self) -> f64 {
        self.cadence
    }

    pub fn last_step(&self) -> f64 {
        self.last_step
    }

    /// Move the step timer forward by `span` seconds, e.g. across a pause
    pub fn shift_clock(&mut self, span: f64) {
        self.last_step += span;
    }

    /// Disable (or re-enable) formation movement
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Step the formation if a full cadence has elapsed since the last step
    pub fn advance(&mut self, now: f64, registry: &mut Registry, scene: &Scene) -> Option<Step> {
        if now - self.last_step < self.cadence {
            return None;
        }

        let (next, reversed) = self.next_direction(registry, scene);
        if reversed {
            self.cadence *= self.ratchet;
            debug_assert!(self.cadence > 0.0, "cadence must stay positive");
            log::debug!(
                "Formation reversed: {:?} -> {:?}, cadence {:.3}s",
                self.direction,
                next,
                self.cadence
            );
        }
        self.direction = next;

        let offset = self.offset(registry, scene);
        let invaders = registry.find_by_category(Category::Invader);
        for id in &invaders {
            if let Some(entity) = registry.get_mut(id) {
                entity.pos += offset;
            }
        }
        self.last_step = now;

        log::trace!(
            "Formation step {:?} by ({:.1}, {:.1}), {} invaders",
            self.direction,
            offset.x,
            offset.y,
            invaders.len()
        );

        Some(Step {
            direction: self.direction,
            reversed,
        })
    }

    /// Transition rule. Returns the new direction and whether it was a boundary reversal.
    fn next_direction(&self, registry: &Registry, scene: &Scene) -> (Direction, bool) {
        match self.direction {
            Direction::Right => {
                let at_edge = registry
                    .live_in(Category::Invader)
                    .any(|e| e.max().x >= scene.width - EDGE_TOLERANCE);
                if at_edge {
                    (Direction::DownThenLeft, true)
                } else {
                    (Direction::Right, false)
                }
            }
            Direction::Left => {
                let at_edge = registry
                    .live_in(Category::Invader)
                    .any(|e| e.min().x <= EDGE_TOLERANCE);
                if at_edge {
                    (Direction::DownThenRight, true)
                } else {
                    (Direction::Left, false)
                }
            }
            Direction::DownThenLeft => (Direction::Left, false),
            Direction::DownThenRight => (Direction::Right, false),
            Direction::None => (Direction::None, false),
        }
    }

    /// Displacement for the current direction. Lateral steps stop at the scene edge.
    fn offset(&self, registry: &Registry, scene: &Scene) -> Vec2 {
        match self.direction {
            Direction::Right => {
                let room = registry
                    .live_in(Category::Invader)
                    .map(|e| scene.width - e.max().x)
                    .fold(f32::INFINITY, f32::min);
                Vec2::new(self.step.min(room).max(0.0), 0.0)
            }
            Direction::Left => {
                let room = registry
                    .live_in(Category::Invader)
                    .map(|e| e.min().x)
                    .fold(f32::INFINITY, f32::min);
                Vec2::new(-self.step.min(room).max(0.0), 0.0)
            }
            Direction::DownThenLeft | Direction::DownThenRight => Vec2::new(0.0, -self.step),
            Direction::None => Vec2::ZERO,
        }
    }
}
