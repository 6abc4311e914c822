use super::powerup::PowerUpKind;
use super::projectile::{ProjectileKind, Side};

/// Identifier handed out by a level to everything it spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Hands out sequential [`EntityId`]s
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// What an [`EntityId`] refers to, for presentation purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Player,
    Enemy { tier: u32 },
    Boss,
    Projectile { side: Side, kind: ProjectileKind },
    PowerUp(PowerUpKind),
}

/// The rectangle every entity lives in, anchored at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f64,
    pub height: f64,
}

impl PlayField {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Position, velocity and bounds shared by every simulated object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
    pub lives: u32,
    /// Game-clock time at which the next shot is allowed
    pub next_shot_time: f64,
}

impl Entity {
    pub fn new(id: EntityId, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
            lives: 1,
            next_shot_time: 0.0,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.vx = vx;
        self.vy = vy;
        self
    }

    pub fn with_lives(mut self, lives: u32) -> Self {
        self.lives = lives;
        self
    }

    /// Integrates position over `dt` seconds
    pub fn advance(&mut self, dt: f64) {
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    pub fn is_out_of_x_bounds(&self, field: &PlayField) -> bool {
        self.x <= 0.0 || self.x + self.width >= field.width
    }

    pub fn is_out_of_y_bounds(&self, field: &PlayField) -> bool {
        self.y <= 0.0 || self.y + self.height >= field.height
    }

    /// True when past a horizontal edge and still moving further out
    pub fn is_leaving_x_bounds(&self, field: &PlayField) -> bool {
        (self.x <= 0.0 && self.vx < 0.0) || (self.x + self.width >= field.width && self.vx > 0.0)
    }

    /// True when past a vertical edge and still moving further out
    pub fn is_leaving_y_bounds(&self, field: &PlayField) -> bool {
        (self.y <= 0.0 && self.vy < 0.0)
            || (self.y + self.height >= field.height && self.vy > 0.0)
    }

    pub fn is_below(&self, field: &PlayField) -> bool {
        self.y >= field.height
    }

    pub fn reverse_x_direction(&mut self) {
        self.vx = -self.vx;
    }

    pub fn reverse_y_direction(&mut self) {
        self.vy = -self.vy;
    }

    /// Axis-aligned bounding box overlap
    pub fn intersects(&self, other: &Entity) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Removes lives, clamping at zero
    pub fn take_damage(&mut self, damage: u32) {
        self.lives = self.lives.saturating_sub(damage);
    }

    pub fn is_alive(&self) -> bool {
        self.lives > 0
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn can_fire(&self, clock: f64) -> bool {
        clock >= self.next_shot_time
    }

    pub fn reset_cooldown(&mut self, clock: f64, cooldown: f64) {
        self.next_shot_time = clock + cooldown;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> PlayField {
        PlayField::new(400.0, 600.0)
    }

    #[test]
    fn test_advance_integrates_velocity() {
        let mut entity = Entity::new(EntityId(0), 10.0, 20.0, 5.0, 5.0).with_velocity(40.0, -80.0);
        entity.advance(0.25);
        assert_eq!(entity.x, 20.0);
        assert_eq!(entity.y, 0.0);
    }

    #[test]
    fn test_x_bounds_are_inclusive() {
        let mut entity = Entity::new(EntityId(0), 370.0, 100.0, 30.0, 30.0);
        assert!(entity.is_out_of_x_bounds(&field()));
        entity.x = 369.0;
        assert!(!entity.is_out_of_x_bounds(&field()));
        entity.x = 0.0;
        assert!(entity.is_out_of_x_bounds(&field()));
    }

    #[test]
    fn test_leaving_bounds_requires_outward_motion() {
        let mut entity = Entity::new(EntityId(0), 380.0, 100.0, 30.0, 30.0).with_velocity(10.0, 0.0);
        assert!(entity.is_leaving_x_bounds(&field()));
        entity.reverse_x_direction();
        assert!(!entity.is_leaving_x_bounds(&field()));
        assert!(entity.is_out_of_x_bounds(&field()));
    }

    #[test]
    fn test_id_allocator_is_sequential() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), EntityId(0));
        assert_eq!(ids.next_id(), EntityId(1));
    }

    #[test]
    fn test_intersects() {
        let a = Entity::new(EntityId(0), 0.0, 0.0, 10.0, 10.0);
        let b = Entity::new(EntityId(1), 5.0, 5.0, 10.0, 10.0);
        let c = Entity::new(EntityId(2), 10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // touching edges do not overlap
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut entity = Entity::new(EntityId(0), 0.0, 0.0, 1.0, 1.0).with_lives(2);
        entity.take_damage(5);
        assert_eq!(entity.lives, 0);
        assert!(!entity.is_alive());
    }

    #[test]
    fn test_cooldown() {
        let mut entity = Entity::new(EntityId(0), 0.0, 0.0, 1.0, 1.0);
        assert!(entity.can_fire(0.0));
        entity.reset_cooldown(2.0, 1.5);
        assert!(!entity.can_fire(3.0));
        assert!(entity.can_fire(3.5));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_lives_never_underflow(
                lives in 0u32..10,
                hits in prop::collection::vec(0u32..5, 0..10)
            ) {
                let mut entity = Entity::new(EntityId(0), 0.0, 0.0, 1.0, 1.0).with_lives(lives);
                for damage in hits {
                    entity.take_damage(damage);
                    prop_assert!(entity.lives <= lives);
                }
            }

            #[test]
            fn test_double_reversal_restores_velocity(vx in -500.0f64..500.0, vy in -500.0f64..500.0) {
                let mut entity = Entity::new(EntityId(0), 0.0, 0.0, 1.0, 1.0).with_velocity(vx, vy);
                entity.reverse_x_direction();
                entity.reverse_y_direction();
                prop_assert_eq!(entity.vx, -vx);
                entity.reverse_x_direction();
                entity.reverse_y_direction();
                prop_assert_eq!(entity.vx, vx);
                prop_assert_eq!(entity.vy, vy);
            }
        }
    }
}
