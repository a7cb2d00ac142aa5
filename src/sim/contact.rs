//! Contact resolution
//!
//! Contacts queued during a frame are resolved once, in arrival order, at the
//! start of the next tick. A record whose entity is already gone is stale and
//! dropped, which keeps resolution idempotent when the same bullet shows up
//! in several records.

use serde::{Deserialize, Serialize};

use super::entity::{Category, Entity, EntityId, Registry};
use super::events::{GameEvent, SoundCue};
use super::progress::Progress;
use super::queue::EventQueue;

/// Unordered pair of entities seen overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: EntityId,
    pub b: EntityId,
}

impl Contact {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }

    pub fn involves(&self, id: EntityId) -> bool {
        self.a == id || self.b == id
    }
}

pub type ContactQueue = EventQueue<Contact>;

/// What a pair of categories means when they touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    ShipHit { ship: EntityId, bullet: EntityId },
    InvaderHit { invader: EntityId, bullet: EntityId },
    Ignored,
}

fn classify(a: &Entity, b: &Entity) -> Pairing {
    use Category::*;
    match (a.category(), b.category()) {
        (Ship, InvaderBullet) => Pairing::ShipHit { ship: a.id, bullet: b.id },
        (InvaderBullet, Ship) => Pairing::ShipHit { ship: b.id, bullet: a.id },
        (Invader, ShipBullet) => Pairing::InvaderHit { invader: a.id, bullet: b.id },
        (ShipBullet, Invader) => Pairing::InvaderHit { invader: b.id, bullet: a.id },
        _ => Pairing::Ignored,
    }
}

/// Drains the contact queue and applies damage, destruction and scoring
#[derive(Debug, Clone)]
pub struct ContactResolver {
    queue: ContactQueue,
    score_per_invader: u32,
    damage_per_hit: i32,
}

impl ContactResolver {
    pub fn new(score_per_invader: u32, damage_per_hit: i32) -> Self {
        Self {
            queue: ContactQueue::new(),
            score_per_invader,
            damage_per_hit,
        }
    }

    /// Producer handle for the collision-detection collaborator
    pub fn queue(&self) -> &ContactQueue {
        &self.queue
    }

    pub fn enqueue(&self, contact: Contact) {
        self.queue.push(contact);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Resolve every queued contact. Returns how many took effect.
    pub fn resolve_all(
        &self,
        registry: &mut Registry,
        progress: &mut Progress,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let batch = self.queue.drain();
        let total = batch.len();
        let mut applied = 0;
        for contact in batch {
            if self.resolve(contact, registry, progress, events) {
                applied += 1;
            }
        }
        if total > 0 {
            log::debug!("Resolved {applied}/{total} contacts");
        }
        applied
    }

    /// Resolve a single contact. Returns false for stale or ignored pairs.
    pub fn resolve(
        &self,
        contact: Contact,
        registry: &mut Registry,
        progress: &mut Progress,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        debug_assert!(
            registry.was_issued(contact.a) && registry.was_issued(contact.b),
            "contact references an unregistered entity: {contact:?}"
        );

        let pairing = match (registry.get(contact.a), registry.get(contact.b)) {
            (Some(a), Some(b)) if a.live && b.live => classify(a, b),
            _ => {
                log::trace!("Discarding stale contact {contact:?}");
                return false;
            }
        };

        match pairing {
            Pairing::ShipHit { ship, bullet } => {
                self.ship_hit(ship, bullet, registry, progress, events);
                true
            }
            Pairing::InvaderHit { invader, bullet } => {
                registry.destroy(bullet);
                registry.destroy(invader);
                let score = progress.add_score(self.score_per_invader);
                events.push(GameEvent::Sound(SoundCue::InvaderHit));
                events.push(GameEvent::InvaderDestroyed { id: invader });
                events.push(GameEvent::ScoreChanged { score });
                log::debug!("Invader {invader:?} destroyed, score {score}");
                true
            }
            Pairing::Ignored => false,
        }
    }

    fn ship_hit(
        &self,
        ship: EntityId,
        bullet: EntityId,
        registry: &mut Registry,
        progress: &mut Progress,
        events: &mut Vec<GameEvent>,
    ) {
        registry.destroy(bullet);
        let health = progress.adjust_health(-self.damage_per_hit);
        events.push(GameEvent::Sound(SoundCue::ShipHit));
        events.push(GameEvent::HealthChanged { health });

        // The ship stays registered; a wreck is simply no longer live
        if health <= 0 {
            if let Some(entity) = registry.get_mut(ship) {
                entity.live = false;
                entity.opacity = 0.0;
                entity.vel = glam::Vec2::ZERO;
            }
            events.push(GameEvent::ShipDestroyed);
            log::info!("Ship destroyed");
        } else {
            let opacity = progress.health_fraction();
            if let Some(entity) = registry.get_mut(ship) {
                entity.opacity = opacity;
            }
            events.push(GameEvent::ShipDamaged { opacity });
            log::debug!("Ship hit, health {health}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityKind, InvaderType};
    use glam::Vec2;

    fn setup() -> (Registry, Progress, Vec<GameEvent>, ContactResolver) {
        (
            Registry::new(),
            Progress::new(),
            Vec::new(),
            ContactResolver::new(100, 20),
        )
    }

    #[test]
    fn test_invader_hit_scores_and_destroys_both() {
        let (mut registry, mut progress, mut events, resolver) = setup();
        let invader = registry.spawn(EntityKind::Invader(InvaderType::C), Vec2::new(10.0, 10.0));
        let bullet = registry.spawn(EntityKind::ShipBullet, Vec2::new(10.0, 10.0));

        // Order inside the record does not matter
        resolver.enqueue(Contact::new(bullet, invader));
        assert_eq!(resolver.resolve_all(&mut registry, &mut progress, &mut events), 1);

        assert_eq!(progress.score(), 100);
        assert!(registry.is_empty());
        assert!(events.contains(&GameEvent::Sound(SoundCue::InvaderHit)));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 100 }));
    }

    #[test]
    fn test_duplicate_contact_is_stale() {
        let (mut registry, mut progress, mut events, resolver) = setup();
        let invader = registry.spawn(EntityKind::Invader(InvaderType::A), Vec2::ZERO);
        let bullet = registry.spawn(EntityKind::ShipBullet, Vec2::ZERO);
        resolver.enqueue(Contact::new(invader, bullet));
        resolver.enqueue(Contact::new(invader, bullet));

        assert_eq!(resolver.resolve_all(&mut registry, &mut progress, &mut events), 1);
        assert_eq!(progress.score(), 100);
        assert_eq!(resolver.pending(), 0);
    }

    #[test]
    fn test_bullet_touching_two_invaders_kills_one() {
        let (mut registry, mut progress, mut events, resolver) = setup();
        let first = registry.spawn(EntityKind::Invader(InvaderType::A), Vec2::ZERO);
        let second = registry.spawn(EntityKind::Invader(InvaderType::A), Vec2::ZERO);
        let bullet = registry.spawn(EntityKind::ShipBullet, Vec2::ZERO);
        resolver.enqueue(Contact::new(first, bullet));
        resolver.enqueue(Contact::new(second, bullet));

        resolver.resolve_all(&mut registry, &mut progress, &mut events);
        assert_eq!(registry.count(Category::Invader), 1);
        assert!(registry.is_live(second));
        assert_eq!(progress.score(), 100);
    }

    #[test]
    fn test_ship_hit_attenuates_then_destroys() {
        let (mut registry, mut progress, mut events, resolver) = setup();
        let ship = registry.spawn(EntityKind::Ship, Vec2::ZERO);

        for expected in [80, 60, 40, 20] {
            let bullet = registry.spawn(EntityKind::InvaderBullet, Vec2::ZERO);
            resolver.enqueue(Contact::new(ship, bullet));
            resolver.resolve_all(&mut registry, &mut progress, &mut events);
            assert_eq!(progress.health(), expected);
            assert!(registry.is_live(ship));
            assert!(registry.count(Category::InvaderBullet) == 0);
        }
        let opacity = registry.get(ship).unwrap().opacity;
        assert!((opacity - 0.2).abs() < 1e-6);

        let bullet = registry.spawn(EntityKind::InvaderBullet, Vec2::ZERO);
        resolver.enqueue(Contact::new(bullet, ship));
        resolver.resolve_all(&mut registry, &mut progress, &mut events);
        assert_eq!(progress.health(), 0);
        assert!(!registry.is_live(ship));
        // Wreck is still registered
        assert!(registry.get(ship).is_some());
        assert!(events.contains(&GameEvent::ShipDestroyed));
    }

    #[test]
    fn test_other_pairs_are_ignored() {
        let (mut registry, mut progress, mut events, resolver) = setup();
        let ship = registry.spawn(EntityKind::Ship, Vec2::ZERO);
        let invader = registry.spawn(EntityKind::Invader(InvaderType::B), Vec2::ZERO);
        let ship_bullet = registry.spawn(EntityKind::ShipBullet, Vec2::ZERO);
        resolver.enqueue(Contact::new(ship, invader));
        resolver.enqueue(Contact::new(ship, ship_bullet));

        assert_eq!(resolver.resolve_all(&mut registry, &mut progress, &mut events), 0);
        assert_eq!(registry.len(), 3);
        assert_eq!(progress, Progress::new());
        assert!(events.is_empty());
    }
}
