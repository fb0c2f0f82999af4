//! Hit resolution for the basic attack and the four elemental abilities.
//!
//! Everything here is a pure query over the enemy list : it reports what got
//! hit and which effects to spawn, the scene applies it.
use crate::config::Element;
use crate::effects::{Shape, VisualEffect};
use crate::enemy::Enemy;
use crate::engine::{Color, Point, Size};
use crate::sprite::Facing;

pub const BASIC_ATTACK_RANGE: f32 = 50.0;
pub const BASIC_ATTACK_DAMAGE: i32 = 25;

pub const WIND_RADIUS: f32 = 100.0;
pub const WIND_DAMAGE: i32 = 15;
pub const WIND_PUSH: f32 = 200.0;

pub const FIRE_RADIUS: f32 = 120.0;
pub const FIRE_DAMAGE: i32 = 30;
const FIRE_WAVE_COUNT: usize = 5;
const FIRE_WAVE_SPACING: f32 = 40.0;

pub const WATER_JET_LENGTH: f32 = 150.0;
pub const WATER_JET_HALF_HEIGHT: f32 = 50.0;
pub const WATER_DAMAGE: i32 = 20;
pub const WATER_PUSH: f32 = 300.0;

pub const LIGHTNING_DASH: f32 = 200.0;
pub const LIGHTNING_EDGE_MARGIN: f32 = 50.0;
pub const LIGHTNING_HALF_HEIGHT: f32 = 40.0;
pub const LIGHTNING_DAMAGE: i32 = 40;

const LIGHTNING_COLOR: Color = Color::from_rgb(0xffff44);
const LIGHTNING_ENEMY_FLASH_MS: f64 = 100.0;
const LIGHTNING_PLAYER_FLASH_MS: f64 = 200.0;

/// Where the player stands when the blow lands
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Attacker {
    pub position: Point,
    pub facing: Facing,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    /// index into the enemy slice the strike was resolved against
    pub enemy: usize,
    pub damage: i32,
    pub push: Option<f32>,
    pub flash: Option<(Color, f64)>,
}

impl Hit {
    fn new(enemy: usize, damage: i32) -> Self {
        Hit {
            enemy,
            damage,
            push: None,
            flash: None,
        }
    }

    fn pushing(mut self, velocity_x: f32) -> Self {
        self.push = Some(velocity_x);
        self
    }

    fn flashing(mut self, color: Color, duration_ms: f64) -> Self {
        self.flash = Some((color, duration_ms));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strike {
    pub hits: Vec<Hit>,
    pub effects: Vec<VisualEffect>,
    /// new player x after a dash
    pub teleport_to: Option<f32>,
    pub attacker_flash: Option<(Color, f64)>,
}

fn living(enemies: &[Enemy]) -> impl Iterator<Item = (usize, &Enemy)> {
    enemies.iter().enumerate().filter(|(_, enemy)| enemy.is_alive())
}

/// 50 unit circle around the player, facing only places the slash
pub fn basic_attack(attacker: Attacker, enemies: &[Enemy], sword_color: Color) -> Strike {
    let origin = attacker.position;
    let reach = attacker.facing.sign() * BASIC_ATTACK_RANGE;
    let slash = VisualEffect::new(
        Shape::Rectangle {
            center: Point::new(origin.x + reach, origin.y),
            size: Size::new(30.0, 5.0),
        },
        sword_color,
        1.0,
        200.0,
    );

    let hits = living(enemies)
        .filter(|(_, enemy)| origin.distance(enemy.position()) < BASIC_ATTACK_RANGE)
        .map(|(index, _)| Hit::new(index, BASIC_ATTACK_DAMAGE))
        .collect();

    Strike {
        hits,
        effects: vec![slash],
        ..Strike::default()
    }
}

/// Equipped sword id -> effect routine
pub fn special_ability(
    element: Element,
    attacker: Attacker,
    enemies: &[Enemy],
    world_width: f32,
) -> Strike {
    match element {
        Element::Wind => wind(attacker, enemies),
        Element::Fire => fire(attacker, enemies),
        Element::Water => water(attacker, enemies),
        Element::Lightning => lightning(attacker, enemies, world_width),
    }
}

/// circle around the player, pushes everything outwards
fn wind(attacker: Attacker, enemies: &[Enemy]) -> Strike {
    let origin = attacker.position;
    let gust = VisualEffect::new(
        Shape::Ellipse {
            center: origin,
            size: Size::new(100.0, 50.0),
        },
        Color::from_rgb(0x00ff88),
        0.3,
        500.0,
    )
    .scaling_to(2.0);

    let hits = living(enemies)
        .filter(|(_, enemy)| origin.distance(enemy.position()) < WIND_RADIUS)
        .map(|(index, enemy)| {
            let away = if enemy.position().x > origin.x {
                WIND_PUSH
            } else {
                -WIND_PUSH
            };
            Hit::new(index, WIND_DAMAGE).pushing(away)
        })
        .collect();

    Strike {
        hits,
        effects: vec![gust],
        ..Strike::default()
    }
}

/// wide wave of flame, damage only
fn fire(attacker: Attacker, enemies: &[Enemy]) -> Strike {
    let origin = attacker.position;
    let half_spread = FIRE_WAVE_SPACING * (FIRE_WAVE_COUNT / 2) as f32;
    let effects = (0..FIRE_WAVE_COUNT)
        .map(|i| {
            VisualEffect::new(
                Shape::Circle {
                    center: Point::new(
                        origin.x + i as f32 * FIRE_WAVE_SPACING - half_spread,
                        origin.y + 20.0,
                    ),
                    radius: 20.0,
                },
                Color::from_rgb(0xff4444),
                0.7,
                800.0,
            )
            .scaling_to(1.5)
            .delayed(i as f64 * 100.0)
        })
        .collect();

    let hits = living(enemies)
        .filter(|(_, enemy)| origin.distance(enemy.position()) < FIRE_RADIUS)
        .map(|(index, _)| Hit::new(index, FIRE_DAMAGE))
        .collect();

    Strike {
        hits,
        effects,
        ..Strike::default()
    }
}

/// jet in the facing direction, pushes along it
fn water(attacker: Attacker, enemies: &[Enemy]) -> Strike {
    let origin = attacker.position;
    let sign = attacker.facing.sign();
    let jet = VisualEffect::new(
        Shape::Rectangle {
            center: Point::new(origin.x + sign * WATER_JET_LENGTH / 2.0, origin.y),
            size: Size::new(WATER_JET_LENGTH, 20.0),
        },
        Color::from_rgb(0x4488ff),
        0.6,
        600.0,
    );

    let hits = living(enemies)
        .filter(|(_, enemy)| {
            let target = enemy.position();
            let ahead = (target.x - origin.x) * sign;
            ahead > 0.0
                && ahead < WATER_JET_LENGTH
                && (target.y - origin.y).abs() < WATER_JET_HALF_HEIGHT
        })
        .map(|(index, _)| Hit::new(index, WATER_DAMAGE).pushing(sign * WATER_PUSH))
        .collect();

    Strike {
        hits,
        effects: vec![jet],
        ..Strike::default()
    }
}

/// Dash up to 200 units, kept 50 units inside the world, hitting everything
/// in the 200 unit span that ends at the landing point
fn lightning(attacker: Attacker, enemies: &[Enemy], world_width: f32) -> Strike {
    let origin = attacker.position;
    let target_x = match attacker.facing {
        Facing::Left => (origin.x - LIGHTNING_DASH).max(LIGHTNING_EDGE_MARGIN),
        Facing::Right => {
            (origin.x + LIGHTNING_DASH).min(world_width - LIGHTNING_EDGE_MARGIN)
        }
    };
    let trail = VisualEffect::new(
        Shape::Line {
            from: origin,
            to: Point::new(target_x, origin.y),
            width: 5.0,
        },
        LIGHTNING_COLOR,
        0.8,
        300.0,
    );

    let hits = living(enemies)
        .filter(|(_, enemy)| {
            let target = enemy.position();
            let in_path = match attacker.facing {
                Facing::Left => target.x > target_x && target.x < target_x + LIGHTNING_DASH,
                Facing::Right => target.x < target_x && target.x > target_x - LIGHTNING_DASH,
            };
            in_path && (target.y - origin.y).abs() < LIGHTNING_HALF_HEIGHT
        })
        .map(|(index, _)| {
            Hit::new(index, LIGHTNING_DAMAGE)
                .flashing(LIGHTNING_COLOR, LIGHTNING_ENEMY_FLASH_MS)
        })
        .collect();

    Strike {
        hits,
        effects: vec![trail],
        teleport_to: Some(target_x),
        attacker_flash: Some((LIGHTNING_COLOR, LIGHTNING_PLAYER_FLASH_MS)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnemyConfig, EnemyKind};
    use approx::assert_relative_eq;

    fn enemies_at(points: &[(f32, f32)]) -> Vec<Enemy> {
        let config = EnemyConfig {
            kind: EnemyKind::Zombie,
            health: Some(30),
            speed: 50.0,
            score_value: None,
            color: Color::from_rgb(0x8b4513),
            can_fly: false,
        };
        points
            .iter()
            .enumerate()
            .map(|(index, &(x, y))| {
                let mut enemy = Enemy::spawn(index, &config);
                enemy.place(Point::new(x, y));
                enemy
            })
            .collect()
    }

    fn facing(facing: Facing) -> Attacker {
        Attacker {
            position: Point::new(400.0, 300.0),
            facing,
        }
    }

    fn hit_indices(strike: &Strike) -> Vec<usize> {
        strike.hits.iter().map(|hit| hit.enemy).collect()
    }

    #[test]
    fn basic_attack_hits_every_close_enemy() {
        let enemies = enemies_at(&[(430.0, 300.0), (370.0, 300.0), (460.0, 300.0)]);
        let strike = basic_attack(facing(Facing::Right), &enemies, Color::WHITE);
        assert_eq!(hit_indices(&strike), vec![0, 1]);
        assert_eq!(strike.hits[0].damage, 25);

        let strike = basic_attack(facing(Facing::Left), &enemies, Color::WHITE);
        assert_eq!(hit_indices(&strike), vec![0, 1]);
    }

    #[test]
    fn basic_attack_slash_follows_facing() {
        let enemies = enemies_at(&[(370.0, 300.0)]);
        let strike = basic_attack(facing(Facing::Right), &enemies, Color::WHITE);
        assert_eq!(hit_indices(&strike), vec![0]);
        match strike.effects[0].shape() {
            Shape::Rectangle { center, .. } => assert_relative_eq!(center.x, 450.0),
            other => panic!("unexpected slash shape {:?}", other),
        }

        let strike = basic_attack(facing(Facing::Left), &enemies, Color::WHITE);
        match strike.effects[0].shape() {
            Shape::Rectangle { center, .. } => assert_relative_eq!(center.x, 350.0),
            other => panic!("unexpected slash shape {:?}", other),
        }
    }

    #[test]
    fn dead_enemies_are_not_hit() {
        let mut enemies = enemies_at(&[(420.0, 300.0)]);
        enemies[0].vanish();
        let strike = basic_attack(facing(Facing::Right), &enemies, Color::WHITE);
        assert!(strike.hits.is_empty());
    }

    #[test]
    fn wind_pushes_away_from_the_player() {
        let enemies = enemies_at(&[(450.0, 300.0), (330.0, 300.0), (520.0, 300.0)]);
        let strike = special_ability(Element::Wind, facing(Facing::Right), &enemies, 800.0);
        assert_eq!(hit_indices(&strike), vec![0, 1]);
        assert_eq!(strike.hits[0].push, Some(200.0));
        assert_eq!(strike.hits[1].push, Some(-200.0));
        assert_eq!(strike.hits[0].damage, 15);
    }

    #[test]
    fn fire_hits_all_around_and_spawns_five_flames() {
        let enemies = enemies_at(&[(300.0, 300.0), (510.0, 300.0), (530.0, 300.0)]);
        let strike = special_ability(Element::Fire, facing(Facing::Left), &enemies, 800.0);
        assert_eq!(hit_indices(&strike), vec![0, 1]);
        assert!(strike.hits.iter().all(|hit| hit.damage == 30 && hit.push.is_none()));
        assert_eq!(strike.effects.len(), 5);
        match strike.effects[0].shape() {
            Shape::Circle { center, .. } => assert_relative_eq!(center.x, 320.0),
            other => panic!("unexpected flame shape {:?}", other),
        }
        assert_relative_eq!(strike.effects[4].delay_ms(), 400.0);
    }

    #[test]
    fn water_jet_is_directional_and_flat() {
        let enemies = enemies_at(&[
            (500.0, 320.0),
            (560.0, 300.0),
            (300.0, 300.0),
            (450.0, 360.0),
        ]);
        let strike = special_ability(Element::Water, facing(Facing::Right), &enemies, 800.0);
        assert_eq!(hit_indices(&strike), vec![0]);
        assert_eq!(strike.hits[0].push, Some(300.0));

        let strike = special_ability(Element::Water, facing(Facing::Left), &enemies, 800.0);
        assert_eq!(hit_indices(&strike), vec![2]);
        assert_eq!(strike.hits[0].push, Some(-300.0));
    }

    #[test]
    fn lightning_dashes_and_hits_the_path() {
        let enemies = enemies_at(&[(500.0, 310.0), (650.0, 300.0), (550.0, 350.0)]);
        let strike =
            special_ability(Element::Lightning, facing(Facing::Right), &enemies, 800.0);
        assert_eq!(strike.teleport_to, Some(600.0));
        assert_eq!(hit_indices(&strike), vec![0]);
        assert_eq!(strike.hits[0].damage, 40);
        assert!(strike.hits[0].flash.is_some());
        assert!(strike.attacker_flash.is_some());
    }

    #[test]
    fn lightning_dash_stays_inside_the_world() {
        let enemies = enemies_at(&[]);
        let near_right = Attacker {
            position: Point::new(700.0, 300.0),
            facing: Facing::Right,
        };
        let strike = special_ability(Element::Lightning, near_right, &enemies, 800.0);
        assert_eq!(strike.teleport_to, Some(750.0));

        let near_left = Attacker {
            position: Point::new(120.0, 300.0),
            facing: Facing::Left,
        };
        let strike = special_ability(Element::Lightning, near_left, &enemies, 800.0);
        assert_eq!(strike.teleport_to, Some(50.0));
    }
}
