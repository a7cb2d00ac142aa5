//! Bullets
//!
//! Each side may have a single bullet in flight. A bullet flies in a straight
//! line to a fixed point just outside the scene and is removed a short grace
//! interval after it arrives, which frees the side's slot again.

use glam::Vec2;
use rand::Rng;

use super::collision::Scene;
use super::entity::{Category, EntityId, EntityKind, Motion, Registry};
use super::events::{GameEvent, Side, SoundCue};
use super::queue::TapQueue;
use crate::consts::BULLET_HEIGHT;
use crate::lerp_clamped;

impl Side {
    pub fn bullet_kind(self) -> EntityKind {
        match self {
            Side::Ship => EntityKind::ShipBullet,
            Side::Invader => EntityKind::InvaderBullet,
        }
    }

    pub fn bullet_category(self) -> Category {
        self.bullet_kind().category()
    }
}

#[derive(Debug, Clone)]
pub struct Weapons {
    ship_duration: f64,
    invader_duration: f64,
    grace: f64,
}

impl Weapons {
    pub fn new(ship_duration: f64, invader_duration: f64, grace: f64) -> Self {
        Self {
            ship_duration,
            invader_duration,
            grace,
        }
    }

    /// Fire a bullet for `side` unless one is already in flight.
    ///
    /// Ship bullets leave the top of the ship; invader bullets leave the bottom
    /// of a randomly chosen invader.
    pub fn fire<R: Rng>(
        &self,
        side: Side,
        now: f64,
        registry: &mut Registry,
        scene: &Scene,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> Option<EntityId> {
        if registry.count(side.bullet_category()) > 0 {
            log::trace!("{side:?} bullet already in flight");
            return None;
        }

        let (from, to, duration) = match side {
            Side::Ship => {
                let ship = registry.live_in(Category::Ship).next()?;
                let from = ship.pos + Vec2::new(0.0, ship.size.y / 2.0 + BULLET_HEIGHT / 2.0);
                let to = Vec2::new(from.x, scene.height + BULLET_HEIGHT / 2.0);
                (from, to, self.ship_duration)
            }
            Side::Invader => {
                let invaders = registry.find_by_category(Category::Invader);
                if invaders.is_empty() {
                    return None;
                }
                let pick = invaders.as_slice()[rng.random_range(0..invaders.len())];
                let invader = registry.get(pick)?;
                let from =
                    invader.pos - Vec2::new(0.0, invader.size.y / 2.0 + BULLET_HEIGHT / 2.0);
                let to = Vec2::new(from.x, -BULLET_HEIGHT / 2.0);
                (from, to, self.invader_duration)
            }
        };

        let id = registry.spawn(side.bullet_kind(), from);
        if let Some(bullet) = registry.get_mut(id) {
            bullet.motion = Some(Motion {
                from,
                to,
                start: now,
                duration,
            });
        }

        events.push(GameEvent::BulletFired {
            id,
            side,
            from,
            to,
            duration,
        });
        events.push(GameEvent::Sound(SoundCue::for_shot(side)));
        log::debug!("{side:?} fired {id:?} at ({:.1}, {:.1})", from.x, from.y);

        Some(id)
    }

    /// Move bullets along their flights and remove the ones whose grace
    /// interval has run out. Returns the number removed.
    pub fn advance_bullets(
        &self,
        now: f64,
        registry: &mut Registry,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let mut bullets = registry.find_by_category(Category::ShipBullet).as_slice().to_vec();
        bullets.extend(registry.find_by_category(Category::InvaderBullet).iter());

        let mut expired = 0;
        for id in bullets {
            let Some(bullet) = registry.get_mut(id) else {
                continue;
            };
            let Some(motion) = bullet.motion else {
                continue;
            };

            bullet.pos = lerp_clamped(motion.from, motion.to, motion.progress(now));
            if now >= motion.arrival() + self.grace {
                registry.destroy(id);
                events.push(GameEvent::BulletExpired { id });
                expired += 1;
            }
        }
        expired
    }

    /// Fire one ship bullet per queued tap. The queue is always left empty.
    /// Returns the number of bullets actually fired.
    pub fn drain_input<R: Rng>(
        &self,
        taps: &TapQueue,
        now: f64,
        registry: &mut Registry,
        scene: &Scene,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        taps.drain()
            .into_iter()
            .filter_map(|_| self.fire(Side::Ship, now, registry, scene, rng, events))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::entity::InvaderType;
    use crate::sim::queue::Tap;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Fixture {
        registry: Registry,
        scene: Scene,
        rng: Pcg32,
        events: Vec<GameEvent>,
        weapons: Weapons,
        ship: EntityId,
    }

    fn fixture() -> Fixture {
        let mut registry = Registry::new();
        let ship = registry.spawn(EntityKind::Ship, Vec2::new(160.0, 8.0));
        for i in 0..3 {
            registry.spawn(
                EntityKind::Invader(InvaderType::A),
                Vec2::new(100.0 + i as f32 * 36.0, 300.0),
            );
        }
        Fixture {
            registry,
            scene: Scene::new(SCENE_WIDTH, SCENE_HEIGHT),
            rng: Pcg32::seed_from_u64(7),
            events: Vec::new(),
            weapons: Weapons::new(SHIP_BULLET_DURATION, INVADER_BULLET_DURATION, BULLET_GRACE),
            ship,
        }
    }

    impl Fixture {
        fn fire(&mut self, side: Side, now: f64) -> Option<EntityId> {
            self.weapons.fire(
                side,
                now,
                &mut self.registry,
                &self.scene,
                &mut self.rng,
                &mut self.events,
            )
        }
    }

    #[test]
    fn test_ship_fires_once_per_slot() {
        let mut f = fixture();
        let first = f.fire(Side::Ship, 0.0);
        let second = f.fire(Side::Ship, 0.0);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(f.registry.count(Category::ShipBullet), 1);

        let bullet = f.registry.get(first.unwrap()).unwrap();
        assert_eq!(bullet.pos, Vec2::new(160.0, 8.0 + SHIP_HEIGHT / 2.0 + BULLET_HEIGHT / 2.0));
        assert_eq!(bullet.motion.unwrap().to.y, SCENE_HEIGHT + BULLET_HEIGHT / 2.0);
        assert!(f.events.contains(&GameEvent::Sound(SoundCue::ShipBullet)));
    }

    #[test]
    fn test_sides_have_independent_slots() {
        let mut f = fixture();
        assert!(f.fire(Side::Ship, 0.0).is_some());
        assert!(f.fire(Side::Invader, 0.0).is_some());
        assert!(f.fire(Side::Invader, 0.0).is_none());
        assert_eq!(f.registry.count(Category::InvaderBullet), 1);
    }

    #[test]
    fn test_invader_bullet_starts_below_an_invader() {
        let mut f = fixture();
        let id = f.fire(Side::Invader, 0.0).unwrap();
        let bullet = f.registry.get(id).unwrap();
        let below = 300.0 - INVADER_HEIGHT / 2.0 - BULLET_HEIGHT / 2.0;
        assert_eq!(bullet.pos.y, below);
        assert!(f.registry.live_in(Category::Invader).any(|e| e.pos.x == bullet.pos.x));
        assert_eq!(bullet.motion.unwrap().to.y, -BULLET_HEIGHT / 2.0);
    }

    #[test]
    fn test_no_source_no_bullet() {
        let mut f = fixture();
        f.registry.set_live(f.ship, false);
        assert!(f.fire(Side::Ship, 0.0).is_none());

        for id in &f.registry.find_by_category(Category::Invader) {
            f.registry.destroy(id);
        }
        assert!(f.fire(Side::Invader, 0.0).is_none());
        assert!(f.events.is_empty());
    }

    #[test]
    fn test_bullet_moves_then_expires_after_grace() {
        let mut f = fixture();
        let id = f.fire(Side::Ship, 0.0).unwrap();
        let start = f.registry.position_of(id).unwrap();

        f.weapons.advance_bullets(0.5, &mut f.registry, &mut f.events);
        let mid = f.registry.position_of(id).unwrap();
        let end_y = SCENE_HEIGHT + BULLET_HEIGHT / 2.0;
        assert!((mid.y - (start.y + end_y) / 2.0).abs() < 1e-3);

        // Arrived but still inside the grace interval
        assert_eq!(f.weapons.advance_bullets(1.0, &mut f.registry, &mut f.events), 0);
        assert!(f.registry.is_live(id));

        assert_eq!(
            f.weapons.advance_bullets(1.0 + BULLET_GRACE, &mut f.registry, &mut f.events),
            1
        );
        assert!(f.registry.get(id).is_none());
        assert!(f.events.contains(&GameEvent::BulletExpired { id }));

        // Slot is free again
        assert!(f.fire(Side::Ship, 1.1).is_some());
    }

    #[test]
    fn test_drain_input_empties_queue() {
        let mut f = fixture();
        let taps = TapQueue::new();
        for _ in 0..3 {
            taps.push(Tap);
        }
        let fired = f.weapons.drain_input(
            &taps,
            0.0,
            &mut f.registry,
            &f.scene,
            &mut f.rng,
            &mut f.events,
        );
        assert_eq!(fired, 1);
        assert_eq!(taps.len(), 0);
        assert_eq!(f.registry.count(Category::ShipBullet), 1);
    }
}
