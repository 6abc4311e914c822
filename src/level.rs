//! One playthrough of a level and its per-step pipeline.

use log::{debug, info};
use rand::Rng;

use crate::collision::{Resolution, resolve_collisions};
use crate::config::{
    GameConfig, PLAYER_LIVES, PLAYER_LIVES_BOSS_LEVEL, POWER_UP_DROP_CHANCE, POWER_UP_SIZE,
};
use crate::entities::{
    Boss, Direction, Enemy, EntityId, EntityKind, Formation, IdAllocator, PlayField, Player,
    PowerUp, PowerUpKind, Projectile, Side,
};
use crate::events::{EventSink, GameEvent, LevelOutcome};
use crate::loader::{LevelDefinition, LevelLayout};

/// The enemy behaviour a level is played against
#[derive(Debug, Clone)]
pub enum Hostiles {
    Formation(Formation),
    /// `None` once the boss has been destroyed
    Boss(Option<Boss>),
}

/// A hostile taken out of play during a step
#[derive(Debug, Clone, Copy)]
struct Casualty {
    id: EntityId,
    kind: EntityKind,
    center_x: f64,
    y: f64,
}

impl Casualty {
    fn enemy(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id(),
            kind: EntityKind::Enemy { tier: enemy.tier },
            center_x: enemy.body.center_x(),
            y: enemy.body.y,
        }
    }

    fn boss(boss: &Boss) -> Self {
        Self {
            id: boss.id(),
            kind: EntityKind::Boss,
            center_x: boss.body.center_x(),
            y: boss.body.y,
        }
    }
}

impl Hostiles {
    pub fn is_cleared(&self) -> bool {
        match self {
            Hostiles::Formation(formation) => formation.is_cleared(),
            Hostiles::Boss(boss) => boss.as_ref().is_none_or(|boss| !boss.body.is_alive()),
        }
    }

    pub fn formation(&self) -> Option<&Formation> {
        match self {
            Hostiles::Formation(formation) => Some(formation),
            Hostiles::Boss(_) => None,
        }
    }

    pub fn formation_mut(&mut self) -> Option<&mut Formation> {
        match self {
            Hostiles::Formation(formation) => Some(formation),
            Hostiles::Boss(_) => None,
        }
    }

    pub fn boss(&self) -> Option<&Boss> {
        match self {
            Hostiles::Boss(boss) => boss.as_ref(),
            Hostiles::Formation(_) => None,
        }
    }

    pub fn boss_mut(&mut self) -> Option<&mut Boss> {
        match self {
            Hostiles::Boss(boss) => boss.as_mut(),
            Hostiles::Formation(_) => None,
        }
    }

    fn advance(&mut self, dt: f64) {
        match self {
            Hostiles::Formation(formation) => formation.advance(dt),
            Hostiles::Boss(Some(boss)) => boss.body.advance(dt),
            Hostiles::Boss(None) => {}
        }
    }

    fn update_direction<R: Rng>(&mut self, field: &PlayField, rng: &mut R) {
        match self {
            Hostiles::Formation(formation) => {
                formation.update_direction(field);
            }
            Hostiles::Boss(Some(boss)) => boss.update_direction(field, rng),
            Hostiles::Boss(None) => {}
        }
    }

    fn try_fire(&mut self, clock: f64, dt: f64, ids: &mut IdAllocator) -> Vec<Projectile> {
        match self {
            Hostiles::Formation(formation) => formation.try_fire(clock, ids),
            Hostiles::Boss(Some(boss)) => {
                let mut shots: Vec<Projectile> = boss.try_fire(clock, dt, ids).into_iter().collect();
                shots.extend(boss.attempt_vulnerability_switch(clock, ids));
                shots
            }
            Hostiles::Boss(None) => vec![],
        }
    }

    /// Resolves friendly fire and takes destroyed hostiles out of play
    fn resolve_hits<S: EventSink>(
        &mut self,
        projectiles: &mut Vec<Projectile>,
        field: &PlayField,
        sink: &mut S,
    ) -> (Resolution, Vec<Casualty>) {
        match self {
            Hostiles::Formation(formation) => {
                let mut targets: Vec<&mut Enemy> =
                    formation.rows_mut().iter_mut().flatten().collect();
                let resolution = resolve_collisions(projectiles, &mut targets, field, sink);
                let casualties = formation.prune().iter().map(Casualty::enemy).collect();
                (resolution, casualties)
            }
            Hostiles::Boss(slot) => {
                let resolution = match slot.as_mut() {
                    Some(boss) => resolve_collisions(projectiles, &mut [boss], field, sink),
                    None => resolve_collisions::<Boss, S>(projectiles, &mut [], field, sink),
                };
                let casualties = match slot.take_if(|boss| !boss.body.is_alive()) {
                    Some(boss) => vec![Casualty::boss(&boss)],
                    None => vec![],
                };
                (resolution, casualties)
            }
        }
    }

    fn destroy_first(&mut self) -> Option<Casualty> {
        match self {
            Hostiles::Formation(formation) => formation.destroy_first().map(|e| Casualty::enemy(&e)),
            Hostiles::Boss(slot) => slot.take().map(|boss| Casualty::boss(&boss)),
        }
    }
}

/// A level being played
///
/// Owns the player, both projectile sets, the hostiles and the power-ups.
/// Randomness comes from `R` and notifications go to `S`, both supplied at
/// construction.
pub struct Level<R: Rng, S: EventSink> {
    number: u32,
    max_level: u32,
    field: PlayField,
    player: Player,
    friendly_projectiles: Vec<Projectile>,
    hostile_projectiles: Vec<Projectile>,
    hostiles: Hostiles,
    power_ups: Vec<PowerUp>,
    outcome: LevelOutcome,
    clock: f64,
    ids: IdAllocator,
    rng: R,
    sink: S,
}

impl<R: Rng, S: EventSink> Level<R, S> {
    pub fn new(
        definition: LevelDefinition,
        config: &GameConfig,
        start_clock: f64,
        rng: R,
        sink: S,
    ) -> Self {
        let field = PlayField::new(config.field_width, config.field_height);
        let mut level = Self {
            number: definition.number,
            max_level: config.max_level,
            field,
            player: Player::new(EntityId(0), &field, PLAYER_LIVES),
            friendly_projectiles: Vec::new(),
            hostile_projectiles: Vec::new(),
            hostiles: Hostiles::Formation(Formation::default()),
            power_ups: Vec::new(),
            outcome: LevelOutcome::Active,
            clock: start_clock,
            ids: IdAllocator::new(),
            rng,
            sink,
        };
        level.start(definition, start_clock);
        level
    }

    /// Replaces the level in place, keeping the notification sink
    pub fn reload(&mut self, definition: LevelDefinition, config: &GameConfig, start_clock: f64, rng: R) {
        self.max_level = config.max_level;
        self.field = PlayField::new(config.field_width, config.field_height);
        self.rng = rng;
        for (id, kind) in self.presented_entities() {
            self.sink.notify(GameEvent::Despawned { id, kind });
        }
        self.start(definition, start_clock);
    }

    fn start(&mut self, definition: LevelDefinition, start_clock: f64) {
        self.number = definition.number;
        self.clock = start_clock;
        self.outcome = LevelOutcome::Active;
        self.ids = IdAllocator::new();
        self.friendly_projectiles.clear();
        self.hostile_projectiles.clear();
        self.power_ups.clear();

        let lives = match definition.layout {
            LevelLayout::Boss { .. } => PLAYER_LIVES_BOSS_LEVEL,
            LevelLayout::Formation(_) => PLAYER_LIVES,
        };
        self.player = Player::new(self.ids.next_id(), &self.field, lives);
        self.hostiles = match definition.layout {
            LevelLayout::Formation(grid) => Hostiles::Formation(Formation::from_grid(
                &grid,
                self.number,
                &self.field,
                start_clock,
                &mut self.rng,
                &mut self.ids,
            )),
            LevelLayout::Boss { lives } => Hostiles::Boss(Some(Boss::new(
                self.ids.next_id(),
                &self.field,
                lives,
                start_clock,
            ))),
        };
        debug!(
            "level {} started at {start_clock:.2} against {}",
            self.number,
            match &self.hostiles {
                Hostiles::Formation(formation) => format!("{} enemies", formation.len()),
                Hostiles::Boss(_) => "the boss".to_string(),
            }
        );

        self.sink.notify(GameEvent::LevelStarted { level: self.number });
        self.sink.notify(GameEvent::LivesChanged(self.player.lives()));
        for (id, kind) in self.presented_entities() {
            self.sink.notify(GameEvent::Spawned { id, kind });
        }
    }

    /// Everything currently on screen
    fn presented_entities(&self) -> Vec<(EntityId, EntityKind)> {
        let mut entities = vec![(self.player.body.id, EntityKind::Player)];
        match &self.hostiles {
            Hostiles::Formation(formation) => entities.extend(
                formation
                    .enemies()
                    .map(|enemy| (enemy.id(), EntityKind::Enemy { tier: enemy.tier })),
            ),
            Hostiles::Boss(Some(boss)) => entities.push((boss.id(), EntityKind::Boss)),
            Hostiles::Boss(None) => {}
        }
        entities.extend(
            self.friendly_projectiles
                .iter()
                .chain(&self.hostile_projectiles)
                .map(|p| (p.id(), projectile_kind(p))),
        );
        entities.extend(
            self.power_ups
                .iter()
                .filter(|power_up| !power_up.is_active())
                .map(|power_up| (power_up.body.id, EntityKind::PowerUp(power_up.kind))),
        );
        entities
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn outcome(&self) -> LevelOutcome {
        self.outcome
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn is_final(&self) -> bool {
        self.number == self.max_level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn hostiles(&self) -> &Hostiles {
        &self.hostiles
    }

    pub fn hostiles_mut(&mut self) -> &mut Hostiles {
        &mut self.hostiles
    }

    pub fn friendly_projectiles(&self) -> &[Projectile] {
        &self.friendly_projectiles
    }

    pub fn friendly_projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.friendly_projectiles
    }

    pub fn hostile_projectiles(&self) -> &[Projectile] {
        &self.hostile_projectiles
    }

    pub fn hostile_projectiles_mut(&mut self) -> &mut Vec<Projectile> {
        &mut self.hostile_projectiles
    }

    /// Collected power-ups stay here, active, until they expire
    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn power_ups_mut(&mut self) -> &mut Vec<PowerUp> {
        &mut self.power_ups
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn move_player(&mut self, direction: Direction) {
        if self.outcome.is_terminal() {
            return;
        }
        self.player.move_horizontal(direction, &self.field);
    }

    /// Fires the player's weapon, returning how many projectiles were spawned
    pub fn attempt_player_fire(&mut self, clock: f64) -> usize {
        if self.outcome.is_terminal() {
            return 0;
        }
        let shots = self.player.try_fire(clock, &mut self.ids);
        let count = shots.len();
        for projectile in shots {
            self.spawn_projectile(projectile);
        }
        count
    }

    pub fn grant_life(&mut self) {
        if self.outcome.is_terminal() {
            return;
        }
        self.player.add_life();
        self.sink.notify(GameEvent::LivesChanged(self.player.lives()));
    }

    /// Drops a power-up just above the player; the boss level ignores it
    pub fn force_grant_power_up(&mut self, kind: PowerUpKind) -> Option<EntityId> {
        if self.outcome.is_terminal() || matches!(self.hostiles, Hostiles::Boss(_)) {
            return None;
        }
        let power_up = PowerUp::new(
            self.ids.next_id(),
            self.player.body.center_x(),
            self.player.body.y - POWER_UP_SIZE,
            kind,
        );
        let id = power_up.body.id;
        self.spawn_power_up(power_up);
        Some(id)
    }

    /// Removes the first hostile without awarding points
    pub fn force_destroy_first_hostile(&mut self) -> Option<EntityId> {
        if self.outcome.is_terminal() {
            return None;
        }
        let casualty = self.hostiles.destroy_first()?;
        self.sink.notify(GameEvent::Despawned {
            id: casualty.id,
            kind: casualty.kind,
        });
        Some(casualty.id)
    }

    /// Advances the simulation by `dt` seconds, `clock` being the game clock
    /// after the step. Does nothing once an outcome has been reached.
    pub fn step(&mut self, dt: f64, clock: f64) -> LevelOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        self.clock = self.clock.max(clock);
        let clock = self.clock;

        self.advance_movement(dt);
        self.hostiles.update_direction(&self.field, &mut self.rng);
        self.resolve_hostile_fire();
        for projectile in self.hostiles.try_fire(clock, dt, &mut self.ids) {
            self.spawn_projectile(projectile);
        }
        self.resolve_friendly_fire();
        self.update_power_ups(clock);
        self.check_outcome()
    }

    fn advance_movement(&mut self, dt: f64) {
        self.player.body.advance(dt);
        self.hostiles.advance(dt);
        for projectile in self
            .friendly_projectiles
            .iter_mut()
            .chain(self.hostile_projectiles.iter_mut())
        {
            projectile.advance(dt);
        }
        for power_up in &mut self.power_ups {
            power_up.advance(dt);
        }
    }

    fn resolve_hostile_fire(&mut self) {
        let resolution = resolve_collisions(
            &mut self.hostile_projectiles,
            &mut [&mut self.player],
            &self.field,
            &mut self.sink,
        );
        if resolution.damaging_hits > 0 {
            self.sink.notify(GameEvent::LivesChanged(self.player.lives()));
        }
        self.despawn_projectiles(&resolution.removed);
    }

    fn resolve_friendly_fire(&mut self) {
        let (resolution, casualties) =
            self.hostiles
                .resolve_hits(&mut self.friendly_projectiles, &self.field, &mut self.sink);
        self.despawn_projectiles(&resolution.removed);

        let drops_power_ups = matches!(self.hostiles, Hostiles::Formation(_));
        for casualty in casualties {
            self.sink.notify(GameEvent::Despawned {
                id: casualty.id,
                kind: casualty.kind,
            });
            if drops_power_ups && self.rng.random_bool(POWER_UP_DROP_CHANCE) {
                let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
                let power_up = PowerUp::new(self.ids.next_id(), casualty.center_x, casualty.y, kind);
                self.spawn_power_up(power_up);
            }
        }
    }

    /// Collects, expires and drops power-ups
    fn update_power_ups(&mut self, clock: f64) {
        let mut spent = vec![false; self.power_ups.len()];

        for index in 0..self.power_ups.len() {
            let power_up = &self.power_ups[index];
            if power_up.is_active() {
                continue;
            }
            let (id, kind) = (power_up.body.id, power_up.kind);
            if power_up.body.intersects(&self.player.body) {
                let already_active = self
                    .power_ups
                    .iter()
                    .position(|other| other.is_active() && other.kind == kind);
                match already_active {
                    Some(active) => {
                        self.power_ups[active].reapply(clock, &mut self.player);
                        spent[index] = true;
                    }
                    None => self.power_ups[index].activate(clock, &mut self.player),
                }
                self.sink.notify(GameEvent::Despawned {
                    id,
                    kind: EntityKind::PowerUp(kind),
                });
            } else if power_up.body.is_below(&self.field) {
                spent[index] = true;
                self.sink.notify(GameEvent::Despawned {
                    id,
                    kind: EntityKind::PowerUp(kind),
                });
            }
        }

        for (power_up, spent) in self.power_ups.iter_mut().zip(spent.iter_mut()) {
            if power_up.has_expired(clock) {
                power_up.deactivate(&mut self.player);
                *spent = true;
            }
        }

        let mut spent = spent.into_iter();
        self.power_ups.retain(|_| !spent.next().unwrap_or(false));
    }

    fn check_outcome(&mut self) -> LevelOutcome {
        let outcome = if !self.player.is_alive() {
            LevelOutcome::Lost
        } else if self.hostiles.is_cleared() {
            if self.is_final() {
                LevelOutcome::ClearedFinal
            } else {
                LevelOutcome::ClearedIntermediate
            }
        } else {
            LevelOutcome::Active
        };

        if outcome.is_terminal() {
            info!("level {} ended: {outcome:?} at {:.2}", self.number, self.clock);
            self.outcome = outcome;
            self.sink.notify(GameEvent::LevelEnded {
                outcome,
                level: self.number,
            });
        }
        outcome
    }

    fn spawn_projectile(&mut self, projectile: Projectile) {
        self.sink.notify(GameEvent::Spawned {
            id: projectile.id(),
            kind: projectile_kind(&projectile),
        });
        match projectile.side {
            Side::Friendly => self.friendly_projectiles.push(projectile),
            Side::Hostile => self.hostile_projectiles.push(projectile),
        }
    }

    fn spawn_power_up(&mut self, power_up: PowerUp) {
        self.sink.notify(GameEvent::Spawned {
            id: power_up.body.id,
            kind: EntityKind::PowerUp(power_up.kind),
        });
        self.power_ups.push(power_up);
    }

    fn despawn_projectiles(&mut self, removed: &[Projectile]) {
        for projectile in removed {
            self.sink.notify(GameEvent::Despawned {
                id: projectile.id(),
                kind: projectile_kind(projectile),
            });
        }
    }
}

fn projectile_kind(projectile: &Projectile) -> EntityKind {
    EntityKind::Projectile {
        side: projectile.side,
        kind: projectile.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PLAYER_BOOSTED_MOVE_DISTANCE, PLAYER_MOVE_DISTANCE, POINTS_PER_ENEMY_HIT};
    use crate::entities::ProjectileKind;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const DT: f64 = 1.0 / 60.0;

    fn level(definition: LevelDefinition) -> Level<StdRng, Vec<GameEvent>> {
        Level::new(definition, &GameConfig::default(), 0.0, StdRng::seed_from_u64(7), Vec::new())
    }

    fn single_enemy(number: u32) -> Level<StdRng, Vec<GameEvent>> {
        level(LevelDefinition::formation(number, vec![vec![1]]).unwrap())
    }

    fn enemy(level: &Level<StdRng, Vec<GameEvent>>) -> Enemy {
        level.hostiles().formation().unwrap().enemies().next().unwrap().clone()
    }

    fn aim_at_enemy(level: &mut Level<StdRng, Vec<GameEvent>>) {
        let target = enemy(level);
        let shot = Projectile::fire(
            EntityId(900),
            ProjectileKind::Standard,
            Side::Friendly,
            target.body.center_x(),
            target.body.y + target.body.height + 5.0,
        );
        level.friendly_projectiles_mut().push(shot);
    }

    fn aim_at_player(level: &mut Level<StdRng, Vec<GameEvent>>) {
        let player = level.player().body.clone();
        let shot = Projectile::fire(
            EntityId(901),
            ProjectileKind::Standard,
            Side::Hostile,
            player.center_x(),
            player.y + 5.0,
        );
        level.hostile_projectiles_mut().push(shot);
    }

    #[test]
    fn test_start_announces_level_and_entities() {
        let level = level(LevelDefinition::formation(2, vec![vec![1, 0, 2], vec![0, 0, 0], vec![3, 3, 3]]).unwrap());
        let events = level.sink();

        assert_eq!(events[0], GameEvent::LevelStarted { level: 2 });
        assert_eq!(events[1], GameEvent::LivesChanged(PLAYER_LIVES));
        let spawned: Vec<EntityKind> = events
            .iter()
            .filter_map(|event| match event {
                GameEvent::Spawned { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(spawned[0], EntityKind::Player);
        assert_eq!(spawned.len(), 6);
        assert_eq!(level.hostiles().formation().map(Formation::len), Some(5));
        assert_eq!(level.outcome(), LevelOutcome::Active);
    }

    #[test]
    fn test_boss_level_gives_extra_lives() {
        let level = level(LevelDefinition::boss(4, 20).unwrap());
        assert_eq!(level.player().lives(), PLAYER_LIVES_BOSS_LEVEL);
        assert_eq!(level.hostiles().boss().map(|boss| boss.body.lives), Some(20));
    }

    #[test]
    fn test_destroying_last_enemy_clears_level() {
        let mut level = single_enemy(1);
        aim_at_enemy(&mut level);

        let outcome = level.step(DT, DT);

        assert_eq!(outcome, LevelOutcome::ClearedIntermediate);
        assert!(level.friendly_projectiles().is_empty());
        let events = level.sink();
        assert_eq!(
            events
                .iter()
                .filter(|event| **event == GameEvent::PointsEarned(POINTS_PER_ENEMY_HIT))
                .count(),
            1
        );
        assert!(events.contains(&GameEvent::LevelEnded {
            outcome: LevelOutcome::ClearedIntermediate,
            level: 1,
        }));
    }

    #[test]
    fn test_clearing_final_level_wins() {
        let mut level = single_enemy(4);
        aim_at_enemy(&mut level);
        assert_eq!(level.step(DT, DT), LevelOutcome::ClearedFinal);
    }

    #[test]
    fn test_hostile_hit_costs_a_life() {
        let mut level = single_enemy(1);
        aim_at_player(&mut level);

        assert_eq!(level.step(DT, DT), LevelOutcome::Active);
        assert_eq!(level.player().lives(), PLAYER_LIVES - 1);
        assert!(level.hostile_projectiles().is_empty());
        assert_eq!(
            level.sink().last().copied(),
            Some(GameEvent::Despawned {
                id: EntityId(901),
                kind: EntityKind::Projectile {
                    side: Side::Hostile,
                    kind: ProjectileKind::Standard,
                },
            })
        );
        assert!(level.sink().contains(&GameEvent::LivesChanged(PLAYER_LIVES - 1)));
    }

    #[test]
    fn test_loss_takes_precedence_over_clear() {
        let mut level = single_enemy(1);
        level.player_mut().body.lives = 1;
        aim_at_player(&mut level);
        aim_at_enemy(&mut level);

        assert_eq!(level.step(DT, DT), LevelOutcome::Lost);
        assert!(level.hostiles().is_cleared());
        let ended: Vec<&GameEvent> = level
            .sink()
            .iter()
            .filter(|event| matches!(event, GameEvent::LevelEnded { .. }))
            .collect();
        assert_eq!(
            ended,
            vec![&GameEvent::LevelEnded {
                outcome: LevelOutcome::Lost,
                level: 1,
            }]
        );
    }

    #[test]
    fn test_terminal_level_ignores_steps_and_commands() {
        let mut level = single_enemy(1);
        level.player_mut().body.lives = 1;
        aim_at_player(&mut level);
        level.step(DT, DT);
        let recorded = level.sink().len();
        let x = level.player().body.x;

        assert_eq!(level.step(DT, 2.0 * DT), LevelOutcome::Lost);
        level.move_player(Direction::Left);
        level.grant_life();
        assert_eq!(level.attempt_player_fire(5.0), 0);
        assert!(level.force_destroy_first_hostile().is_none());

        assert_eq!(level.sink().len(), recorded);
        assert_eq!(level.clock(), DT);
        assert_eq!(level.player().body.x, x);
    }

    #[test]
    fn test_player_fire_spawns_friendly_projectile() {
        let mut level = single_enemy(1);
        assert_eq!(level.attempt_player_fire(0.0), 1);
        assert_eq!(level.attempt_player_fire(0.5), 0);
        assert_eq!(level.friendly_projectiles().len(), 1);
        assert!(matches!(
            level.sink().last(),
            Some(GameEvent::Spawned {
                kind: EntityKind::Projectile { side: Side::Friendly, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_projectiles_leaving_field_are_dropped() {
        let mut level = single_enemy(1);
        level.player_mut().body.x = 0.0;
        level.attempt_player_fire(0.0);
        let mut clock = 0.0;
        for _ in 0..150 {
            clock += DT;
            level.step(DT, clock);
        }
        assert!(level.friendly_projectiles().is_empty());
        assert_eq!(level.hostiles().formation().map(Formation::len), Some(1));
    }

    #[test]
    fn test_invulnerable_boss_shrugs_off_hits() {
        let mut level = level(LevelDefinition::boss(4, 3).unwrap());
        let boss = level.hostiles().boss().unwrap().body.clone();
        let shot = Projectile::fire(
            EntityId(900),
            ProjectileKind::Standard,
            Side::Friendly,
            boss.center_x(),
            boss.y + boss.height,
        );
        level.friendly_projectiles_mut().push(shot.clone());
        level.step(DT, DT);
        assert_eq!(level.hostiles().boss().map(|boss| boss.body.lives), Some(3));
        assert!(level.friendly_projectiles().is_empty());

        if let Some(boss) = level.hostiles.boss_mut() {
            boss.switch_vulnerability(DT, &mut level.ids);
        }
        let boss = level.hostiles().boss().unwrap().body.clone();
        let mut shot = shot;
        shot.body.x = boss.center_x() - shot.body.width / 2.0;
        shot.body.y = boss.y + 10.0;
        level.friendly_projectiles_mut().push(shot);
        level.step(DT, 2.0 * DT);
        assert_eq!(level.hostiles().boss().map(|boss| boss.body.lives), Some(2));
        // boss hits never score
        assert!(!level.sink().iter().any(|event| matches!(event, GameEvent::PointsEarned(_))));
    }

    #[test]
    fn test_destroying_boss_wins_final_level() {
        let mut level = level(LevelDefinition::boss(4, 20).unwrap());
        assert!(level.force_destroy_first_hostile().is_some());
        assert!(level.hostiles().boss().is_none());
        assert_eq!(level.step(DT, DT), LevelOutcome::ClearedFinal);
    }

    #[test]
    fn test_boss_level_ignores_power_up_cheat() {
        let mut level = level(LevelDefinition::boss(4, 5).unwrap());
        assert_eq!(level.force_grant_power_up(PowerUpKind::Heavy), None);
        assert!(level.power_ups().is_empty());
        level.step(DT, DT);
        assert_eq!(level.player().current_weapon, crate::entities::WeaponType::Standard);
    }

    #[test]
    fn test_cheat_destroys_bottom_left_enemy_without_points() {
        let mut level = level(LevelDefinition::formation(1, vec![vec![1, 1], vec![2, 2]]).unwrap());
        let bottom_left = level.hostiles().formation().unwrap().rows()[1][0].id();

        assert_eq!(level.force_destroy_first_hostile(), Some(bottom_left));
        assert_eq!(level.hostiles().formation().map(Formation::len), Some(3));
        assert!(!level.sink().iter().any(|event| matches!(event, GameEvent::PointsEarned(_))));
    }

    #[test]
    fn test_grant_life_notifies() {
        let mut level = single_enemy(1);
        level.grant_life();
        assert_eq!(level.player().lives(), PLAYER_LIVES + 1);
        assert_eq!(level.sink().last(), Some(&GameEvent::LivesChanged(PLAYER_LIVES + 1)));
    }

    #[test]
    fn test_power_up_applies_then_expires() {
        let mut level = single_enemy(1);
        level.force_grant_power_up(PowerUpKind::Speed);

        level.step(DT, DT);
        assert_eq!(level.player().move_distance, PLAYER_BOOSTED_MOVE_DISTANCE);
        assert!(level.power_ups()[0].is_active());

        level.step(DT, DT + PowerUpKind::Speed.duration() - 0.1);
        assert_eq!(level.player().move_distance, PLAYER_BOOSTED_MOVE_DISTANCE);

        level.step(DT, DT + PowerUpKind::Speed.duration() + 0.01);
        assert_eq!(level.player().move_distance, PLAYER_MOVE_DISTANCE);
        assert!(level.power_ups().is_empty());
    }

    #[test]
    fn test_recollecting_active_kind_restarts_its_window() {
        let mut level = single_enemy(1);
        level.force_grant_power_up(PowerUpKind::BurstFire);
        level.step(DT, DT);

        level.force_grant_power_up(PowerUpKind::BurstFire);
        level.step(DT, 5.0);
        assert_eq!(level.power_ups().len(), 1);
        assert_eq!(level.power_ups()[0].activated_at, Some(5.0));

        level.step(DT, DT + PowerUpKind::BurstFire.duration() + 1.0);
        assert!(level.player().burst_fire);
        level.step(DT, 5.0 + PowerUpKind::BurstFire.duration());
        assert!(!level.player().burst_fire);
    }

    #[test]
    fn test_uncollected_power_up_falls_away() {
        let mut level = single_enemy(1);
        level.player_mut().body.x = 0.0;
        let power_up = PowerUp::new(EntityId(950), 300.0, 599.0, PowerUpKind::Heavy);
        level.power_ups_mut().push(power_up);

        level.step(DT, DT);
        assert!(level.power_ups().is_empty());
        assert_eq!(level.player().current_weapon, crate::entities::WeaponType::Standard);
    }

    #[test]
    fn test_reload_replaces_entities_and_keeps_sink() {
        let mut level = single_enemy(1);
        let config = GameConfig::default();
        level.reload(LevelDefinition::boss(4, 5).unwrap(), &config, 3.0, StdRng::seed_from_u64(1));

        assert_eq!(level.number(), 4);
        assert_eq!(level.clock(), 3.0);
        assert!(level.hostiles().boss().is_some());
        let events = level.sink();
        assert!(events.contains(&GameEvent::LevelStarted { level: 1 }));
        assert!(events.contains(&GameEvent::LevelStarted { level: 4 }));
        assert!(events.iter().any(|event| matches!(
            event,
            GameEvent::Despawned { kind: EntityKind::Enemy { .. }, .. }
        )));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn run(seed: u64, steps: usize) -> Vec<GameEvent> {
            let definition = LevelDefinition::formation(2, vec![vec![1, 2, 1], vec![2, 0, 2]]).unwrap();
            let mut level =
                Level::new(definition, &GameConfig::default(), 0.0, StdRng::seed_from_u64(seed), Vec::new());
            let mut clock = 0.0;
            for step in 0..steps {
                clock += DT;
                if step % 30 == 0 {
                    level.attempt_player_fire(clock);
                }
                level.step(DT, clock);
            }
            level.into_sink()
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn test_same_seed_replays_identically(seed in 0u64..10_000, steps in 1usize..1_200) {
                prop_assert_eq!(run(seed, steps), run(seed, steps));
            }

            #[test]
            fn test_points_only_come_in_hit_sized_amounts(seed in 0u64..10_000) {
                for event in run(seed, 900) {
                    if let GameEvent::PointsEarned(points) = event {
                        prop_assert_eq!(points, POINTS_PER_ENEMY_HIT);
                    }
                }
            }
        }
    }
}
