//! Tunable game settings shared by the simulation and the front-end

/// Points awarded for every projectile that hits a formation enemy
pub const POINTS_PER_ENEMY_HIT: u32 = 25;

/// Horizontal enemy speed gained per level number (px/s)
pub const ENEMY_SPEED_FACTOR_BY_LEVEL: f64 = 10.0;
pub const ENEMY_WIDTH: f64 = 30.0;
pub const ENEMY_HEIGHT: f64 = 30.0;
pub const ENEMY_SPACING: f64 = 10.0;
/// Seconds between consecutive enemy shots
pub const ENEMY_COOLDOWN: f64 = 50.0;
/// Window for the randomized first-shot offset of each enemy
pub const ENEMY_FIRST_SHOT_WINDOW: (f64, f64) = (1.0, 40.0);
/// Chance that a destroyed enemy drops a power-up
pub const POWER_UP_DROP_CHANCE: f64 = 0.25;

pub const PLAYER_WIDTH: f64 = 40.0;
pub const PLAYER_HEIGHT: f64 = 40.0;
pub const PLAYER_LIVES: u32 = 3;
pub const PLAYER_LIVES_BOSS_LEVEL: u32 = 5;
/// Distance covered by one move command
pub const PLAYER_MOVE_DISTANCE: f64 = 10.0;
pub const PLAYER_BOOSTED_MOVE_DISTANCE: f64 = 25.0;
pub const PLAYER_COOLDOWN: f64 = 1.0;
pub const PLAYER_BURST_COOLDOWN: f64 = 0.3;
/// Gap between the player's bottom edge and the bottom of the field
pub const PLAYER_BOTTOM_MARGIN: f64 = 20.0;

pub const BOSS_WIDTH: f64 = 120.0;
pub const BOSS_HEIGHT: f64 = 80.0;
pub const BOSS_DEFAULT_SPEED: f64 = 60.0;
/// Range the boss speed magnitude is resampled from after a bounce
pub const BOSS_SPEED_RANGE: (f64, f64) = (40.0, 120.0);
pub const BOSS_COOLDOWN: f64 = 1.0;
/// Invulnerable time accumulated before the boss starts shooting
pub const BOSS_START_SHOOTING_AFTER: f64 = 2.0;
pub const BOSS_INVULNERABLE_PERIOD: f64 = 6.0;
pub const BOSS_VULNERABLE_PERIOD: f64 = 4.0;
pub const BLAST_Y_SPEED: f64 = 80.0;
pub const BLAST_LATERAL_SPEED: f64 = 15.0;
pub const BLAST_ROTATION: f64 = 45.0;

pub const POWER_UP_SIZE: f64 = 20.0;
pub const POWER_UP_FALL_SPEED: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Play-field width in world units
    pub field_width: f64,
    /// Play-field height in world units
    pub field_height: f64,
    /// Fixed simulation timestep in seconds
    pub step_seconds: f64,
    /// Number of the final level
    pub max_level: u32,
    /// Level number that is played against the boss
    pub boss_level: u32,
    /// Seed for every random decision made during a run
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: 400.0,
            field_height: 600.0,
            step_seconds: 1.0 / 60.0,
            max_level: 4,
            boss_level: 4,
            seed: 42,
        }
    }
}

impl GameConfig {
    pub fn is_boss_level(&self, level_number: u32) -> bool {
        level_number == self.boss_level
    }

    /// Clamps a requested level number into `1..=max_level`
    pub fn clamp_level(&self, level_number: u32) -> u32 {
        level_number.clamp(1, self.max_level.max(1))
    }
}
