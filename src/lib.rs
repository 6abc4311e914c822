// Library exports for the simulation core and its tests
pub use config::GameConfig;
pub use entities::{
    Boss, Direction, Enemy, Entity, EntityId, EntityKind, Formation, PlayField, Player, PowerUp,
    PowerUpKind, Projectile, ProjectileKind, Side, WeaponType,
};
pub use error::LevelError;
pub use events::{EventSink, GameEvent, LevelOutcome, Scoreboard};
pub use game::Game;
pub use level::{Hostiles, Level};
pub use loader::{BuiltinLevels, LevelDefinition, LevelDirectory, LevelLayout, LevelSource};

pub mod collision;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod game;
pub mod level;
pub mod loader;
