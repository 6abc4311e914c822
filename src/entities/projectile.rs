use super::entity::{Entity, EntityId, PlayField};

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Friendly,
    Hostile,
}

impl Side {
    /// Vertical sign of travel: friendly shots fly up the screen
    pub fn forward(&self) -> f64 {
        match self {
            Side::Friendly => -1.0,
            Side::Hostile => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileKind {
    Standard,
    Heavy,
    Burst,
    Fireball,
}

/// Spawn parameters for one projectile kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponTemplate {
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub damage: u32,
}

impl ProjectileKind {
    pub fn template(&self) -> WeaponTemplate {
        match self {
            ProjectileKind::Standard => WeaponTemplate {
                width: 5.0,
                height: 20.0,
                speed: 300.0,
                damage: 1,
            },
            ProjectileKind::Heavy => WeaponTemplate {
                width: 20.0,
                height: 10.0,
                speed: 250.0,
                damage: 3,
            },
            ProjectileKind::Burst => WeaponTemplate {
                width: 5.0,
                height: 15.0,
                speed: 350.0,
                damage: 1,
            },
            ProjectileKind::Fireball => WeaponTemplate {
                width: 20.0,
                height: 30.0,
                speed: 200.0,
                damage: 2,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: Entity,
    pub damage: u32,
    pub side: Side,
    pub kind: ProjectileKind,
    /// Heading in degrees, 0 meaning straight ahead
    pub rotation: f64,
}

impl Projectile {
    /// Spawns a projectile whose leading edge sits on the firer's muzzle point
    pub fn fire(id: EntityId, kind: ProjectileKind, side: Side, muzzle_x: f64, muzzle_y: f64) -> Self {
        let template = kind.template();
        let y = match side {
            Side::Friendly => muzzle_y - template.height,
            Side::Hostile => muzzle_y,
        };
        let body = Entity::new(
            id,
            muzzle_x - template.width / 2.0,
            y,
            template.width,
            template.height,
        )
        .with_velocity(0.0, template.speed * side.forward());

        Self {
            body,
            damage: template.damage,
            side,
            kind,
            rotation: 0.0,
        }
    }

    pub fn with_lateral_speed(mut self, vx: f64) -> Self {
        self.body.vx = vx;
        self
    }

    pub fn with_vertical_speed(mut self, speed: f64) -> Self {
        self.body.vy = speed * self.side.forward();
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn advance(&mut self, dt: f64) {
        self.body.advance(dt);
    }

    pub fn is_out_of_bounds(&self, field: &PlayField) -> bool {
        self.body.is_out_of_y_bounds(field)
    }
}
