use log::debug;
use rand::Rng;

use super::entity::{Entity, EntityId, IdAllocator, PlayField};
use super::projectile::{Projectile, ProjectileKind, Side};
use crate::config::{
    BLAST_LATERAL_SPEED, BLAST_ROTATION, BLAST_Y_SPEED, BOSS_COOLDOWN, BOSS_DEFAULT_SPEED,
    BOSS_HEIGHT, BOSS_INVULNERABLE_PERIOD, BOSS_SPEED_RANGE, BOSS_START_SHOOTING_AFTER,
    BOSS_VULNERABLE_PERIOD, BOSS_WIDTH,
};

/// Single large hostile that alternates between taking and shrugging off damage
#[derive(Debug, Clone)]
pub struct Boss {
    pub body: Entity,
    vulnerable: bool,
    /// Game-clock time of the next vulnerability toggle
    switch_time: f64,
    /// Seconds spent invulnerable over the whole fight
    invulnerable_timer: f64,
}

impl Boss {
    /// Spawns the boss in the middle of the field, invulnerable
    pub fn new(id: EntityId, field: &PlayField, lives: u32, start_clock: f64) -> Self {
        let x = field.width / 2.0 - BOSS_WIDTH / 2.0;
        let y = field.height / 2.0 - BOSS_HEIGHT / 2.0;
        Self {
            body: Entity::new(id, x, y, BOSS_WIDTH, BOSS_HEIGHT)
                .with_velocity(BOSS_DEFAULT_SPEED, BOSS_DEFAULT_SPEED)
                .with_lives(lives),
            vulnerable: false,
            switch_time: start_clock + BOSS_INVULNERABLE_PERIOD,
            invulnerable_timer: 0.0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn is_vulnerable(&self) -> bool {
        self.vulnerable
    }

    pub fn switch_time(&self) -> f64 {
        self.switch_time
    }

    pub fn invulnerable_timer(&self) -> f64 {
        self.invulnerable_timer
    }

    /// Flips the vulnerability flag; the boss blasts when becoming vulnerable
    pub fn switch_vulnerability(&mut self, clock: f64, ids: &mut IdAllocator) -> Vec<Projectile> {
        self.vulnerable = !self.vulnerable;
        debug!(
            "boss {} at {clock:.2}",
            if self.vulnerable { "vulnerable" } else { "invulnerable" }
        );
        if self.vulnerable {
            self.switch_time = clock + BOSS_VULNERABLE_PERIOD;
            self.body.reset_cooldown(clock, BOSS_COOLDOWN);
            self.blast(ids)
        } else {
            self.switch_time = clock + BOSS_INVULNERABLE_PERIOD;
            vec![]
        }
    }

    /// Toggles vulnerability once the clock reaches the switch time
    pub fn attempt_vulnerability_switch(
        &mut self,
        clock: f64,
        ids: &mut IdAllocator,
    ) -> Vec<Projectile> {
        if clock >= self.switch_time {
            self.switch_vulnerability(clock, ids)
        } else {
            vec![]
        }
    }

    /// Bounces off the field edges, resampling speed on every bounce
    pub fn update_direction<R: Rng>(&mut self, field: &PlayField, rng: &mut R) {
        if self.body.is_leaving_x_bounds(field) {
            self.body.reverse_x_direction();
            self.set_random_speed(rng);
        }
        if self.body.is_leaving_y_bounds(field) {
            self.body.reverse_y_direction();
            self.set_random_speed(rng);
        }
    }

    /// Resamples both speed magnitudes, keeping the current directions
    pub fn set_random_speed<R: Rng>(&mut self, rng: &mut R) {
        let (min, max) = BOSS_SPEED_RANGE;
        self.body.vx = rng.random_range(min..=max).copysign(self.body.vx);
        self.body.vy = rng.random_range(min..=max).copysign(self.body.vy);
    }

    /// Single forward shots, only once invulnerable long enough
    pub fn try_fire(&mut self, clock: f64, dt: f64, ids: &mut IdAllocator) -> Option<Projectile> {
        if self.vulnerable {
            return None;
        }
        self.invulnerable_timer += dt;
        if self.invulnerable_timer < BOSS_START_SHOOTING_AFTER || !self.body.can_fire(clock) {
            return None;
        }
        self.body.reset_cooldown(clock, BOSS_COOLDOWN);
        Some(self.fireball(ids.next_id()))
    }

    /// Lives only drop while vulnerable
    pub fn absorb_hit(&mut self, damage: u32) -> bool {
        if self.vulnerable {
            self.body.take_damage(damage);
        }
        self.vulnerable
    }

    fn fireball(&self, id: EntityId) -> Projectile {
        Projectile::fire(
            id,
            ProjectileKind::Fireball,
            Side::Hostile,
            self.body.center_x(),
            self.body.y + self.body.height,
        )
    }

    fn blast(&self, ids: &mut IdAllocator) -> Vec<Projectile> {
        vec![
            self.fireball(ids.next_id()).with_vertical_speed(BLAST_Y_SPEED),
            self.fireball(ids.next_id())
                .with_vertical_speed(BLAST_Y_SPEED)
                .with_lateral_speed(-BLAST_LATERAL_SPEED)
                .with_rotation(BLAST_ROTATION),
            self.fireball(ids.next_id())
                .with_vertical_speed(BLAST_Y_SPEED)
                .with_lateral_speed(BLAST_LATERAL_SPEED)
                .with_rotation(-BLAST_ROTATION),
        ]
    }
}
