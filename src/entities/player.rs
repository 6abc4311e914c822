use super::entity::{Entity, EntityId, IdAllocator, PlayField};
use super::projectile::{Projectile, ProjectileKind, Side};
use crate::config::{
    PLAYER_BOTTOM_MARGIN, PLAYER_BURST_COOLDOWN, PLAYER_COOLDOWN, PLAYER_HEIGHT,
    PLAYER_MOVE_DISTANCE, PLAYER_WIDTH,
};

/// Lateral speed of the outer shots of a burst
const BURST_LATERAL_SPEED: f64 = 60.0;
const BURST_ROTATION: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponType {
    Standard,
    Heavy,
}

impl WeaponType {
    pub fn get_name(&self) -> &'static str {
        match self {
            WeaponType::Standard => "Laser",
            WeaponType::Heavy => "Missile",
        }
    }

    fn projectile_kind(&self, burst: bool) -> ProjectileKind {
        match (self, burst) {
            (WeaponType::Heavy, _) => ProjectileKind::Heavy,
            (WeaponType::Standard, true) => ProjectileKind::Burst,
            (WeaponType::Standard, false) => ProjectileKind::Standard,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Entity,
    /// Distance covered by a single move command
    pub move_distance: f64,
    pub current_weapon: WeaponType,
    pub burst_fire: bool,
}

impl Player {
    /// Places the player horizontally centred just above the bottom of the field
    pub fn new(id: EntityId, field: &PlayField, lives: u32) -> Self {
        let x = field.width / 2.0 - PLAYER_WIDTH / 2.0;
        let y = field.height - PLAYER_BOTTOM_MARGIN - PLAYER_HEIGHT;
        Self {
            body: Entity::new(id, x, y, PLAYER_WIDTH, PLAYER_HEIGHT).with_lives(lives),
            move_distance: PLAYER_MOVE_DISTANCE,
            current_weapon: WeaponType::Standard,
            burst_fire: false,
        }
    }

    /// Moves one step sideways, wrapping around the horizontal edges
    pub fn move_horizontal(&mut self, direction: Direction, field: &PlayField) {
        self.body.x += self.move_distance * direction.sign();
        if self.body.x + self.body.width > field.width {
            self.body.x = 0.0;
        } else if self.body.x < 0.0 {
            self.body.x = field.width - self.body.width;
        }
    }

    pub fn lives(&self) -> u32 {
        self.body.lives
    }

    pub fn is_alive(&self) -> bool {
        self.body.is_alive()
    }

    pub fn add_life(&mut self) {
        self.body.lives = self.body.lives.saturating_add(1);
    }

    pub fn cooldown(&self) -> f64 {
        if self.burst_fire {
            PLAYER_BURST_COOLDOWN
        } else {
            PLAYER_COOLDOWN
        }
    }

    /// Attempts to fire if the cooldown allows
    /// Returns the spawned projectiles, empty when still cooling down
    pub fn try_fire(&mut self, clock: f64, ids: &mut IdAllocator) -> Vec<Projectile> {
        if !self.body.can_fire(clock) {
            return vec![];
        }
        self.body.reset_cooldown(clock, self.cooldown());

        let kind = self.current_weapon.projectile_kind(self.burst_fire);
        let muzzle_x = self.body.center_x();
        let muzzle_y = self.body.y;
        let center = Projectile::fire(ids.next_id(), kind, Side::Friendly, muzzle_x, muzzle_y);

        if !self.burst_fire {
            return vec![center];
        }

        vec![
            Projectile::fire(ids.next_id(), kind, Side::Friendly, muzzle_x, muzzle_y)
                .with_lateral_speed(-BURST_LATERAL_SPEED)
                .with_rotation(-BURST_ROTATION),
            center,
            Projectile::fire(ids.next_id(), kind, Side::Friendly, muzzle_x, muzzle_y)
                .with_lateral_speed(BURST_LATERAL_SPEED)
                .with_rotation(BURST_ROTATION),
        ]
    }
}
