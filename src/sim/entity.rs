//! Entity registry
//!
//! Owns every live simulation object. Ids are handed out monotonically and
//! never reused, so a queued contact can always tell a destroyed entity from
//! a live one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Stable entity identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Invader sprite variant (row colour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvaderType {
    A,
    B,
    C,
}

impl InvaderType {
    /// Row pattern of the formation: A, B, C, A, B, C, ...
    pub fn for_row(row: u32) -> Self {
        match row % 3 {
            0 => InvaderType::A,
            1 => InvaderType::B,
            _ => InvaderType::C,
        }
    }
}

/// Collision/lookup category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Invader,
    Ship,
    ShipBullet,
    InvaderBullet,
}

/// Full entity tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Invader(InvaderType),
    Ship,
    ShipBullet,
    InvaderBullet,
}

impl EntityKind {
    pub fn category(self) -> Category {
        match self {
            EntityKind::Invader(_) => Category::Invader,
            EntityKind::Ship => Category::Ship,
            EntityKind::ShipBullet => Category::ShipBullet,
            EntityKind::InvaderBullet => Category::InvaderBullet,
        }
    }

    /// Bounding box size for this kind
    pub fn size(self) -> Vec2 {
        match self {
            EntityKind::Invader(_) => Vec2::new(INVADER_WIDTH, INVADER_HEIGHT),
            EntityKind::Ship => Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            EntityKind::ShipBullet | EntityKind::InvaderBullet => {
                Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)
            }
        }
    }
}

/// Straight-line bullet flight scheduled at spawn time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub from: Vec2,
    pub to: Vec2,
    pub start: f64,
    pub duration: f64,
}

impl Motion {
    /// Fraction of the flight completed at `now`, in [0, 1]
    pub fn progress(&self, now: f64) -> f32 {
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn arrival(&self) -> f64 {
        self.start + self.duration
    }
}

/// A simulation object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Cleared when the entity is out of play but still registered (wrecked ship)
    pub live: bool,
    /// Visual attenuation (1 = opaque)
    pub opacity: f32,
    /// Ship velocity from tilt input
    #[serde(default)]
    pub vel: Vec2,
    /// Bullet flight
    #[serde(default)]
    pub motion: Option<Motion>,
}

impl Entity {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn min(&self) -> Vec2 {
        self.pos - self.size * 0.5
    }

    pub fn max(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Immutable, ordered list of ids taken at lookup time.
///
/// Iterating it does not borrow the registry, so callers may destroy or move
/// entities while walking the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSnapshot {
    ids: Vec<EntityId>,
}

impl IdSnapshot {
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[EntityId] {
        &self.ids
    }
}

impl<'a> IntoIterator for &'a IdSnapshot {
    type Item = EntityId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, EntityId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

/// Owner of all entities (sorted by id for deterministic iteration)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a new entity and return its id
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        // Ids only grow, so pushing keeps the vector sorted
        self.entities.push(Entity {
            id,
            kind,
            pos,
            size: kind.size(),
            live: true,
            opacity: 1.0,
            vel: Vec2::ZERO,
            motion: None,
        });
        log::trace!("spawn {:?} {:?} at ({:.1}, {:.1})", id, kind, pos.x, pos.y);
        id
    }

    /// Remove an entity. Unknown or already destroyed ids are ignored.
    pub fn destroy(&mut self, id: EntityId) {
        if let Ok(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            log::trace!("destroy {:?} {:?}", id, entity.kind);
        }
    }

    /// Ids of every live entity in `category`, ordered by id
    pub fn find_by_category(&self, category: Category) -> IdSnapshot {
        IdSnapshot {
            ids: self
                .live_in(category)
                .map(|entity| entity.id)
                .collect(),
        }
    }

    /// Live entities in `category`, borrowed
    pub fn live_in(&self, category: Category) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .filter(move |e| e.live && e.category() == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.live_in(category).count()
    }

    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.get(id).map(|e| e.pos)
    }

    pub fn set_position(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.get_mut(id) {
            entity.pos = pos;
        }
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).ok().map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.index_of(id) {
            Ok(i) => Some(&mut self.entities[i]),
            Err(_) => None,
        }
    }

    /// Registered and still in play
    pub fn is_live(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.live)
    }

    /// Take an entity out of play without removing it from the registry
    pub fn set_live(&mut self, id: EntityId, live: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.live = live;
        }
    }

    /// True if `id` was ever handed out by this registry
    pub fn was_issued(&self, id: EntityId) -> bool {
        id.0 >= 1 && id.0 < self.next_id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_of(&self, id: EntityId) -> Result<usize, usize> {
        self.entities.binary_search_by_key(&id, |e| e.id)
    }
}
