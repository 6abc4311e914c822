//! A play session: the game clock, the level sequence and the seeded RNG.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::entities::{Direction, EntityId, PowerUpKind};
use crate::error::LevelError;
use crate::events::{EventSink, LevelOutcome};
use crate::level::Level;
use crate::loader::LevelSource;

/// Drives levels from a [`LevelSource`] on a fixed timestep
///
/// Every level gets its own RNG seeded from the session RNG, so a run is
/// fully determined by the configured seed and the commands issued.
pub struct Game<L: LevelSource, S: EventSink> {
    config: GameConfig,
    source: L,
    rng: StdRng,
    clock: f64,
    level: Level<StdRng, S>,
}

impl<L: LevelSource, S: EventSink> Game<L, S> {
    /// Starts a session on `first_level`, clamped to the configured range
    pub fn new(config: GameConfig, source: L, sink: S, first_level: u32) -> Result<Self, LevelError> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let number = config.clamp_level(first_level);
        let definition = source.load(number, &config).inspect_err(|err| {
            warn!("could not load level {number}: {err}");
        })?;
        let level = Level::new(definition, &config, 0.0, child_rng(&mut rng), sink);
        info!("session started on level {number} with seed {}", config.seed);

        Ok(Self {
            config,
            source,
            rng,
            clock: 0.0,
            level,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn level(&self) -> &Level<StdRng, S> {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level<StdRng, S> {
        &mut self.level
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.level.outcome()
    }

    pub fn sink(&self) -> &S {
        self.level.sink()
    }

    pub fn sink_mut(&mut self) -> &mut S {
        self.level.sink_mut()
    }

    /// Runs one fixed step; the clock is paused while a level is over
    pub fn advance(&mut self) -> LevelOutcome {
        if self.level.outcome().is_terminal() {
            return self.level.outcome();
        }
        let dt = self.config.step_seconds;
        self.clock += dt;
        self.level.step(dt, self.clock)
    }

    pub fn move_player(&mut self, direction: Direction) {
        self.level.move_player(direction);
    }

    pub fn fire(&mut self) -> usize {
        self.level.attempt_player_fire(self.clock)
    }

    pub fn destroy_first_hostile(&mut self) -> Option<EntityId> {
        self.level.force_destroy_first_hostile()
    }

    pub fn grant_life(&mut self) {
        self.level.grant_life();
    }

    pub fn grant_power_up(&mut self, kind: PowerUpKind) -> Option<EntityId> {
        self.level.force_grant_power_up(kind)
    }

    /// Replaces the current level with `number`, clamped to the configured range
    ///
    /// The running level is left untouched when the new one fails to load.
    pub fn jump_to_level(&mut self, number: u32) -> Result<u32, LevelError> {
        let number = self.config.clamp_level(number);
        let definition = self.source.load(number, &self.config).inspect_err(|err| {
            warn!("could not load level {number}: {err}");
        })?;
        let rng = child_rng(&mut self.rng);
        self.level.reload(definition, &self.config, self.clock, rng);
        Ok(number)
    }

    /// Moves on to the following level, staying on the last one at the end
    pub fn next_level(&mut self) -> Result<u32, LevelError> {
        self.jump_to_level(self.level.number().saturating_add(1))
    }

    pub fn restart_level(&mut self) -> Result<u32, LevelError> {
        self.jump_to_level(self.level.number())
    }
}

fn child_rng(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.random())
}
