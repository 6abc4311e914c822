mod boss;
mod enemy;
mod entity;
mod formation;
mod player;
mod powerup;
mod projectile;

// Re-export all public types
pub use boss::Boss;
pub use enemy::Enemy;
pub use entity::{Entity, EntityId, EntityKind, IdAllocator, PlayField};
pub use formation::Formation;
pub use player::{Direction, Player, WeaponType};
pub use powerup::{PowerUp, PowerUpKind};
pub use projectile::{Projectile, ProjectileKind, Side, WeaponTemplate};
