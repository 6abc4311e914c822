use rand::Rng;

use super::enemy::Enemy;
use super::entity::{IdAllocator, PlayField};
use super::projectile::Projectile;
use crate::config::{
    ENEMY_FIRST_SHOT_WINDOW, ENEMY_HEIGHT, ENEMY_SPACING, ENEMY_SPEED_FACTOR_BY_LEVEL, ENEMY_WIDTH,
};

/// Grid of enemies moving in horizontal lockstep
///
/// Row order is the order rows appear in the level file. Rows never stay
/// empty: destroyed enemies are pruned and empty rows go with them.
#[derive(Debug, Clone, Default)]
pub struct Formation {
    rows: Vec<Vec<Enemy>>,
}

impl Formation {
    /// Lays out a tier grid centred on the field; a zero tier leaves a gap
    pub fn from_grid<R: Rng>(
        grid: &[Vec<u32>],
        level_number: u32,
        field: &PlayField,
        start_clock: f64,
        rng: &mut R,
        ids: &mut IdAllocator,
    ) -> Self {
        let columns = grid.first().map_or(0, Vec::len);
        let grid_width = columns as f64 * (ENEMY_WIDTH + ENEMY_SPACING) - ENEMY_SPACING;
        let start_x = (field.width - grid_width) / 2.0;
        let mut y = field.height / 2.0 - ENEMY_HEIGHT * grid.len() as f64 / 2.0;
        let speed = ENEMY_SPEED_FACTOR_BY_LEVEL * level_number as f64;
        let (earliest, latest) = ENEMY_FIRST_SHOT_WINDOW;

        let mut rows = Vec::with_capacity(grid.len());
        for tiers in grid {
            let mut x = start_x;
            let mut row = Vec::new();
            for &tier in tiers {
                if tier > 0 {
                    let offset = rng.random_range(earliest..latest);
                    row.push(
                        Enemy::new(ids.next_id(), x, y, tier, speed)
                            .with_first_shot_at(start_clock + offset),
                    );
                }
                x += ENEMY_WIDTH + ENEMY_SPACING;
            }
            if !row.is_empty() {
                rows.push(row);
            }
            y += ENEMY_HEIGHT;
        }

        Self { rows }
    }

    pub fn from_rows(rows: Vec<Vec<Enemy>>) -> Self {
        Self {
            rows: rows.into_iter().filter(|row| !row.is_empty()).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Enemy>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<Enemy>] {
        &mut self.rows
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.rows.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    pub fn is_cleared(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn advance(&mut self, dt: f64) {
        for enemy in self.rows.iter_mut().flatten() {
            enemy.body.advance(dt);
        }
    }

    /// Reverses every enemy when an edge enemy of any row has crossed a side
    pub fn update_direction(&mut self, field: &PlayField) -> bool {
        let reverse = self.rows.iter().any(|row| {
            let first = row.first().is_some_and(|e| e.body.is_leaving_x_bounds(field));
            let last = row.last().is_some_and(|e| e.body.is_leaving_x_bounds(field));
            first || last
        });
        if reverse {
            for enemy in self.rows.iter_mut().flatten() {
                enemy.body.reverse_x_direction();
            }
        }
        reverse
    }

    /// Lets each enemy fire against its own cooldown
    pub fn try_fire(&mut self, clock: f64, ids: &mut IdAllocator) -> Vec<Projectile> {
        self.rows
            .iter_mut()
            .flatten()
            .filter_map(|enemy| enemy.try_fire(clock, ids))
            .collect()
    }

    /// Removes destroyed enemies and empty rows, returning what was removed
    pub fn prune(&mut self) -> Vec<Enemy> {
        let mut removed = Vec::new();
        for row in &mut self.rows {
            let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
                row.drain(..).partition(|enemy| !enemy.is_alive());
            *row = alive;
            removed.extend(dead);
        }
        self.rows.retain(|row| !row.is_empty());
        removed
    }

    /// Destroys the leftmost enemy of the bottom row
    pub fn destroy_first(&mut self) -> Option<Enemy> {
        let row = self.rows.last_mut()?;
        let enemy = if row.is_empty() { None } else { Some(row.remove(0)) };
        self.rows.retain(|row| !row.is_empty());
        enemy
    }
}
