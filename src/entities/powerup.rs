use log::debug;

use super::entity::{Entity, EntityId};
use super::player::{Player, WeaponType};
use crate::config::{
    PLAYER_BOOSTED_MOVE_DISTANCE, PLAYER_MOVE_DISTANCE, POWER_UP_FALL_SPEED, POWER_UP_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUpKind {
    Speed,
    Heavy,
    BurstFire,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Speed, PowerUpKind::Heavy, PowerUpKind::BurstFire];

    /// Seconds the effect stays active once collected
    pub fn duration(&self) -> f64 {
        match self {
            PowerUpKind::Speed => 8.0,
            PowerUpKind::Heavy => 10.0,
            PowerUpKind::BurstFire => 6.0,
        }
    }

    pub fn get_name(&self) -> &'static str {
        match self {
            PowerUpKind::Speed => "Speed",
            PowerUpKind::Heavy => "Missiles",
            PowerUpKind::BurstFire => "Burst Fire",
        }
    }

    /// Sets the player's value for this effect; applying twice does not compound
    pub fn apply(&self, player: &mut Player) {
        match self {
            PowerUpKind::Speed => player.move_distance = PLAYER_BOOSTED_MOVE_DISTANCE,
            PowerUpKind::Heavy => player.current_weapon = WeaponType::Heavy,
            PowerUpKind::BurstFire => player.burst_fire = true,
        }
    }

    /// Restores the player's baseline value for this effect
    pub fn revert(&self, player: &mut Player) {
        match self {
            PowerUpKind::Speed => player.move_distance = PLAYER_MOVE_DISTANCE,
            PowerUpKind::Heavy => player.current_weapon = WeaponType::Standard,
            PowerUpKind::BurstFire => player.burst_fire = false,
        }
    }
}

/// A falling pickup carrying a timed effect
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub body: Entity,
    pub kind: PowerUpKind,
    pub duration: f64,
    pub activated_at: Option<f64>,
}

impl PowerUp {
    /// Creates an inert power-up centred on `center_x`
    pub fn new(id: EntityId, center_x: f64, y: f64, kind: PowerUpKind) -> Self {
        let body = Entity::new(id, center_x - POWER_UP_SIZE / 2.0, y, POWER_UP_SIZE, POWER_UP_SIZE)
            .with_velocity(0.0, POWER_UP_FALL_SPEED);
        Self {
            body,
            kind,
            duration: kind.duration(),
            activated_at: None,
        }
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn is_active(&self) -> bool {
        self.activated_at.is_some()
    }

    /// Falls while still uncollected
    pub fn advance(&mut self, dt: f64) {
        if !self.is_active() {
            self.body.advance(dt);
        }
    }

    pub fn activate(&mut self, clock: f64, player: &mut Player) {
        debug!("power-up {:?} activated at {clock:.2}", self.kind);
        self.kind.apply(player);
        self.activated_at = Some(clock);
    }

    /// Re-applies the effect and restarts the activation window
    pub fn reapply(&mut self, clock: f64, player: &mut Player) {
        debug!("power-up {:?} reapplied at {clock:.2}", self.kind);
        self.kind.apply(player);
        self.activated_at = Some(clock);
    }

    pub fn deactivate(&mut self, player: &mut Player) {
        debug!("power-up {:?} expired", self.kind);
        self.kind.revert(player);
        self.activated_at = None;
    }

    pub fn has_expired(&self, clock: f64) -> bool {
        self.activated_at
            .is_some_and(|activated_at| clock - activated_at >= self.duration)
    }

    pub fn get_char(&self) -> char {
        match self.kind {
            PowerUpKind::Speed => 'S',
            PowerUpKind::Heavy => 'M',
            PowerUpKind::BurstFire => 'B',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::PlayField;

    fn player() -> Player {
        Player::new(EntityId(0), &PlayField::new(400.0, 600.0), 3)
    }

    #[test]
    fn test_power_up_falls_until_collected() {
        let mut power_up = PowerUp::new(EntityId(1), 100.0, 0.0, PowerUpKind::Speed);
        power_up.advance(0.5);
        assert_eq!(power_up.body.y, 50.0);

        let mut player = player();
        power_up.activate(1.0, &mut player);
        power_up.advance(0.5);
        assert_eq!(power_up.body.y, 50.0);
    }

    #[test]
    fn test_speed_power_up_lifecycle() {
        let mut player = player();
        let mut power_up = PowerUp::new(EntityId(1), 100.0, 0.0, PowerUpKind::Speed);
        assert!(!power_up.is_active());

        power_up.activate(2.0, &mut player);
        assert!(power_up.is_active());
        assert_eq!(player.move_distance, PLAYER_BOOSTED_MOVE_DISTANCE);
        assert!(!power_up.has_expired(9.9));
        assert!(power_up.has_expired(10.0));

        power_up.deactivate(&mut player);
        assert!(!power_up.is_active());
        assert_eq!(player.move_distance, PLAYER_MOVE_DISTANCE);
    }

    #[test]
    fn test_reapply_resets_window_without_compounding() {
        let mut player = player();
        let mut power_up = PowerUp::new(EntityId(1), 100.0, 0.0, PowerUpKind::Speed);
        power_up.activate(0.0, &mut player);
        power_up.reapply(5.0, &mut player);
        assert_eq!(player.move_distance, PLAYER_BOOSTED_MOVE_DISTANCE);
        assert!(!power_up.has_expired(8.0));
        assert!(power_up.has_expired(13.0));
    }

    #[test]
    fn test_weapon_effects_revert_to_baseline() {
        let mut player = player();
        PowerUpKind::Heavy.apply(&mut player);
        PowerUpKind::BurstFire.apply(&mut player);
        assert_eq!(player.current_weapon, WeaponType::Heavy);
        assert!(player.burst_fire);

        PowerUpKind::Heavy.revert(&mut player);
        assert_eq!(player.current_weapon, WeaponType::Standard);
        assert!(player.burst_fire);
        PowerUpKind::BurstFire.revert(&mut player);
        assert!(!player.burst_fire);
    }
}
