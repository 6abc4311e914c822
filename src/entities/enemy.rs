use super::entity::{Entity, EntityId, IdAllocator};
use super::projectile::{Projectile, ProjectileKind, Side};
use crate::config::{ENEMY_COOLDOWN, ENEMY_HEIGHT, ENEMY_WIDTH};

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Entity,
    /// Tier from the level file; also the starting lives
    pub tier: u32,
}

impl Enemy {
    pub fn new(id: EntityId, x: f64, y: f64, tier: u32, speed: f64) -> Self {
        Self {
            body: Entity::new(id, x, y, ENEMY_WIDTH, ENEMY_HEIGHT)
                .with_velocity(speed, 0.0)
                .with_lives(tier),
            tier,
        }
    }

    pub fn with_first_shot_at(mut self, clock: f64) -> Self {
        self.body.next_shot_time = clock;
        self
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    /// Fires one shot straight down from the bottom edge if the cooldown allows
    pub fn try_fire(&mut self, clock: f64, ids: &mut IdAllocator) -> Option<Projectile> {
        if !self.body.can_fire(clock) {
            return None;
        }
        self.body.reset_cooldown(clock, ENEMY_COOLDOWN);
        Some(Projectile::fire(
            ids.next_id(),
            ProjectileKind::Standard,
            Side::Hostile,
            self.body.center_x(),
            self.body.y + self.body.height,
        ))
    }
}
