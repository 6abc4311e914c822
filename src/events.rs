use crate::entities::{EntityId, EntityKind};

/// Terminal classification of a level attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Active,
    Lost,
    ClearedIntermediate,
    ClearedFinal,
}

impl LevelOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LevelOutcome::Active)
    }
}

/// Notifications emitted by the simulation for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PointsEarned(u32),
    LivesChanged(u32),
    LevelStarted { level: u32 },
    LevelEnded { outcome: LevelOutcome, level: u32 },
    Spawned { id: EntityId, kind: EntityKind },
    Despawned { id: EntityId, kind: EntityKind },
}

/// Receives notifications from a running level
pub trait EventSink {
    fn notify(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn notify(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn notify(&mut self, event: GameEvent) {
        (**self).notify(event);
    }
}

/// Running totals shown by the HUD
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scoreboard {
    pub points: u32,
    pub lives: u32,
    pub level: u32,
    pub last_outcome: Option<LevelOutcome>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_points(&mut self) {
        self.points = 0;
    }
}

impl EventSink for Scoreboard {
    fn notify(&mut self, event: GameEvent) {
        match event {
            GameEvent::PointsEarned(points) => self.points = self.points.saturating_add(points),
            GameEvent::LivesChanged(lives) => self.lives = lives,
            GameEvent::LevelStarted { level } => {
                self.level = level;
                self.last_outcome = None;
            }
            GameEvent::LevelEnded { outcome, level } => {
                self.level = level;
                self.last_outcome = Some(outcome);
            }
            GameEvent::Spawned { .. } | GameEvent::Despawned { .. } => {}
        }
    }
}
