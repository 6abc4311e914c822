//! Projectile resolution against a set of targets.
//!
//! Hits and bound exits are first marked, then the projectile list is
//! compacted once the scan is over, so nothing is removed mid-iteration
//! and each projectile damages at most one target.

use crate::config::POINTS_PER_ENEMY_HIT;
use crate::entities::{Boss, Enemy, Entity, PlayField, Player, Projectile};
use crate::events::{EventSink, GameEvent};

/// Something a projectile can hit
pub trait Target {
    fn body(&self) -> &Entity;

    /// Applies a hit and reports whether it inflicted damage
    fn absorb_hit(&mut self, damage: u32) -> bool;

    /// Points awarded for each hit on this target
    fn points_per_hit(&self) -> Option<u32> {
        None
    }
}

impl Target for Player {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn absorb_hit(&mut self, damage: u32) -> bool {
        self.body.take_damage(damage);
        true
    }
}

impl Target for Enemy {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn absorb_hit(&mut self, damage: u32) -> bool {
        self.body.take_damage(damage);
        true
    }

    fn points_per_hit(&self) -> Option<u32> {
        Some(POINTS_PER_ENEMY_HIT)
    }
}

impl Target for Boss {
    fn body(&self) -> &Entity {
        &self.body
    }

    fn absorb_hit(&mut self, damage: u32) -> bool {
        Boss::absorb_hit(self, damage)
    }
}

/// What a resolution pass did
#[derive(Debug, Default)]
pub struct Resolution {
    /// Projectiles that intersected a live target
    pub hits: usize,
    /// Hits that actually took lives away
    pub damaging_hits: usize,
    /// Every projectile taken out of play, hits and bound exits alike
    pub removed: Vec<Projectile>,
}

/// Resolves `projectiles` against `targets`
///
/// The first live target a projectile overlaps (in iteration order) takes the
/// hit. Targets are left in place with their lives reduced; pruning them is
/// up to the owner.
pub fn resolve_collisions<T, S>(
    projectiles: &mut Vec<Projectile>,
    targets: &mut [&mut T],
    field: &PlayField,
    sink: &mut S,
) -> Resolution
where
    T: Target + ?Sized,
    S: EventSink + ?Sized,
{
    let mut resolution = Resolution::default();
    let mut spent = vec![false; projectiles.len()];

    for (index, projectile) in projectiles.iter().enumerate() {
        for target in targets.iter_mut() {
            if !target.body().is_alive() || !projectile.body.intersects(target.body()) {
                continue;
            }
            if target.absorb_hit(projectile.damage) {
                resolution.damaging_hits += 1;
            }
            if let Some(points) = target.points_per_hit() {
                sink.notify(GameEvent::PointsEarned(points));
            }
            resolution.hits += 1;
            spent[index] = true;
            break;
        }
        if !spent[index] && projectile.is_out_of_bounds(field) {
            spent[index] = true;
        }
    }

    let (removed, kept): (Vec<_>, Vec<_>) = projectiles
        .drain(..)
        .zip(spent)
        .partition(|(_, spent)| *spent);
    projectiles.extend(kept.into_iter().map(|(projectile, _)| projectile));
    resolution.removed = removed.into_iter().map(|(projectile, _)| projectile).collect();
    resolution
}
