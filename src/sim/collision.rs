//! Contact detection
//!
//! Stands in for the physics engine's contact callbacks: axis-aligned
//! overlap tests filtered by category bitmasks. Overlaps are only queued
//! here; the contact resolver decides what they mean on the next frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{Contact, ContactQueue};
use super::entity::{Category, Entity, Registry};
use crate::aabb_extent;

/// Category bitmasks
pub mod mask {
    pub const INVADER: u32 = 0x1 << 0;
    pub const SHIP_BULLET: u32 = 0x1 << 1;
    pub const SHIP: u32 = 0x1 << 2;
    pub const SCENE_EDGE: u32 = 0x1 << 3;
    pub const INVADER_BULLET: u32 = 0x1 << 4;
}

impl Category {
    /// Bit identifying this category
    pub fn mask(self) -> u32 {
        match self {
            Category::Invader => mask::INVADER,
            Category::Ship => mask::SHIP,
            Category::ShipBullet => mask::SHIP_BULLET,
            Category::InvaderBullet => mask::INVADER_BULLET,
        }
    }

    /// Categories whose overlap with this one produces a contact
    pub fn contact_test_mask(self) -> u32 {
        match self {
            Category::ShipBullet => mask::INVADER,
            Category::InvaderBullet => mask::SHIP,
            Category::Invader | Category::Ship => 0,
        }
    }

    /// Bodies this category is physically blocked by
    pub fn collision_mask(self) -> u32 {
        match self {
            Category::Invader | Category::Ship => mask::SCENE_EDGE,
            Category::ShipBullet | Category::InvaderBullet => 0,
        }
    }
}

/// Scene bounds, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
}

impl Scene {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Result of an overlap check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    pub hit: bool,
    /// Overlap depth along each axis (zero on a miss)
    pub penetration: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            penetration: Vec2::ZERO,
        }
    }
}

/// Overlap test between two centred boxes. Touching edges do not count.
pub fn aabb_overlap(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> CollisionResult {
    let (a_min, a_max) = aabb_extent(a_pos, a_size);
    let (b_min, b_max) = aabb_extent(b_pos, b_size);

    let overlap = a_max.min(b_max) - a_min.max(b_min);
    if overlap.x > 0.0 && overlap.y > 0.0 {
        CollisionResult {
            hit: true,
            penetration: overlap,
        }
    } else {
        CollisionResult::miss()
    }
}

/// True if either body's contact-test mask selects the other's category
pub fn wants_contact(a: Category, b: Category) -> bool {
    a.contact_test_mask() & b.mask() != 0 || b.contact_test_mask() & a.mask() != 0
}

/// Queue a contact for every overlapping pair the masks care about.
/// Returns the number of contacts queued.
pub fn detect_contacts(registry: &Registry, queue: &ContactQueue) -> usize {
    let live: Vec<&Entity> = registry.iter().filter(|e| e.live).collect();
    let mut found = 0;

    for (i, a) in live.iter().enumerate() {
        for b in &live[i + 1..] {
            if !wants_contact(a.category(), b.category()) {
                continue;
            }
            let result = aabb_overlap(a.pos, a.size, b.pos, b.size);
            if result.hit {
                log::trace!(
                    "contact {:?} <-> {:?}, depth ({:.1}, {:.1})",
                    a.id,
                    b.id,
                    result.penetration.x,
                    result.penetration.y
                );
                queue.push(Contact::new(a.id, b.id));
                found += 1;
            }
        }
    }

    found
}

/// Clamp a body inside the scene edge. Returns the clamped position and
/// whether clamping happened.
pub fn contain(pos: Vec2, size: Vec2, scene: &Scene) -> (Vec2, bool) {
    let half = size * 0.5;
    let max = Vec2::new(scene.width, scene.height) - half;
    let clamped = pos.clamp(half, max.max(half));
    (clamped, clamped != pos)
}
