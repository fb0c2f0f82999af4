use crate::config::{EnemyConfig, EnemyKind};
use crate::engine::{Color, Point, Rect, Renderer, Size};
use crate::physics::{Body, Stage};
use crate::sprite::{Facing, OniTexture, Texture, Tint, ZombieTexture};

// spawn layout : first enemy at x 400, then every 200 units
const SPAWN_X: f32 = 400.0;
const SPAWN_SPACING: f32 = 200.0;
const SPAWN_Y: f32 = 320.0;
const PATROL_HALF_WIDTH: f32 = 75.0;

const FLOAT_FREQUENCY: f64 = 0.003;
const FLOAT_AMPLITUDE: f32 = 20.0;

const DEFAULT_SCORE_VALUE: u32 = 100;
const DAMAGE_FLASH_MS: f64 = 100.0;
// patrol leaves velocity alone this long after a push
const STAGGER_MS: f64 = 250.0;

impl EnemyKind {
    pub fn default_health(&self) -> i32 {
        match self {
            EnemyKind::Zombie => 30,
            EnemyKind::Oni => 40,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            EnemyKind::Zombie => ZombieTexture::size(),
            EnemyKind::Oni => OniTexture::size(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Patrol {
    pub start: f32,
    pub end: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DamageOutcome {
    Survived,
    Defeated { score_value: u32 },
    /// already dead, nothing changed
    Ignored,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    kind: EnemyKind,
    body: Body,
    direction: Facing,
    health: i32,
    patrol: Patrol,
    speed: f32,
    score_value: u32,
    can_fly: bool,
    spawn_y: f32,
    tint: Tint,
    stagger_until: f64,
    alive: bool,
}

impl Enemy {
    /// `index` is the position in the level table and decides the spawn point
    pub fn spawn(index: usize, config: &EnemyConfig) -> Self {
        let x = SPAWN_X + index as f32 * SPAWN_SPACING;
        let spawn = Point::new(x, SPAWN_Y);
        let mut body = Body::new(spawn, config.kind.size());
        let can_fly = config.kind == EnemyKind::Oni && config.can_fly;
        if can_fly {
            body = body.without_gravity();
        }
        let health = match config.health {
            Some(health) if health > 0 => health,
            _ => config.kind.default_health(),
        };
        Enemy {
            kind: config.kind,
            body,
            direction: Facing::Right,
            health,
            patrol: Patrol {
                start: x - PATROL_HALF_WIDTH,
                end: x + PATROL_HALF_WIDTH,
            },
            speed: config.speed,
            score_value: config.score_value.unwrap_or(DEFAULT_SCORE_VALUE),
            can_fly,
            spawn_y: SPAWN_Y,
            tint: Tint::new(config.color),
            stagger_until: f64::NEG_INFINITY,
            alive: true,
        }
    }

    /// Two point patrol bounce, plus a sine float for flying Onis
    pub fn patrol(&mut self, now: f64) {
        if !self.alive {
            return;
        }
        let x = self.body.center.x;
        if self.direction == Facing::Right && x >= self.patrol.end {
            self.direction = Facing::Left;
        } else if self.direction == Facing::Left && x <= self.patrol.start {
            self.direction = Facing::Right;
        }

        if now >= self.stagger_until {
            self.body.velocity.x = self.direction.sign() * self.speed;
        }

        if self.can_fly {
            self.body.center.y =
                self.spawn_y + (now * FLOAT_FREQUENCY).sin() as f32 * FLOAT_AMPLITUDE;
            self.body.velocity.y = 0.0;
        }
    }

    pub fn step(&mut self, stage: &Stage, dt_ms: f32) {
        if self.alive {
            self.body.step(stage, dt_ms);
        }
    }

    pub fn take_damage(&mut self, damage: i32, now: f64) -> DamageOutcome {
        if !self.alive {
            return DamageOutcome::Ignored;
        }
        self.health -= damage;
        self.tint.flash(Color::RED, now, DAMAGE_FLASH_MS);
        if self.health <= 0 {
            self.alive = false;
            DamageOutcome::Defeated {
                score_value: self.score_value,
            }
        } else {
            DamageOutcome::Survived
        }
    }

    pub fn push(&mut self, velocity_x: f32, now: f64) {
        self.body.velocity.x = velocity_x;
        self.stagger_until = now + STAGGER_MS;
    }

    pub fn flash(&mut self, color: Color, now: f64, duration_ms: f64) {
        self.tint.flash(color, now, duration_ms);
    }

    /// removes without scoring, e.g. after falling out of the world
    pub fn vanish(&mut self) {
        self.alive = false;
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn position(&self) -> Point {
        self.body.center
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn direction(&self) -> Facing {
        self.direction
    }

    pub fn patrol_bounds(&self) -> Patrol {
        self.patrol
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// body colour at `now`, flashes included
    pub fn color(&self, now: f64) -> Color {
        self.tint.current(now)
    }

    /// never negative, whatever the overkill
    pub fn health(&self) -> i32 {
        self.health.max(0)
    }

    pub fn draw(&self, renderer: &Renderer, now: f64) {
        if !self.alive {
            return;
        }
        let rect = Rect::from_center(self.body.center, self.body.size);
        renderer.fill_rect(&rect, self.color(now), 1.0);
        let eye_x = match self.direction {
            Facing::Right => rect.right() - 8.0,
            Facing::Left => rect.left() + 3.0,
        };
        renderer.fill_rect(
            &Rect::new(Point::new(eye_x, rect.top() + 6.0), Size::new(5.0, 5.0)),
            Color::from_rgb(0xffee00),
            1.0,
        );
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, center: Point) {
        self.body.center = center;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zombie() -> EnemyConfig {
        EnemyConfig {
            kind: EnemyKind::Zombie,
            health: Some(30),
            speed: 50.0,
            score_value: Some(120),
            color: Color::from_rgb(0x8b4513),
            can_fly: false,
        }
    }

    #[test]
    fn spawn_layout_and_patrol_bounds() {
        let enemy = Enemy::spawn(2, &zombie());
        assert_relative_eq!(enemy.position().x, 800.0);
        assert_relative_eq!(enemy.position().y, 320.0);
        assert_eq!(
            enemy.patrol_bounds(),
            Patrol {
                start: 725.0,
                end: 875.0
            }
        );
    }

    #[test]
    fn missing_health_uses_kind_default() {
        let config = EnemyConfig {
            kind: EnemyKind::Oni,
            health: None,
            ..zombie()
        };
        assert_eq!(Enemy::spawn(0, &config).health(), 40);
        let config = EnemyConfig {
            health: Some(0),
            ..zombie()
        };
        assert_eq!(Enemy::spawn(0, &config).health(), 30);
    }

    #[test]
    fn reverses_at_patrol_end() {
        let mut enemy = Enemy::spawn(0, &zombie());
        enemy.patrol(0.0);
        assert_relative_eq!(enemy.body().velocity.x, 50.0);

        enemy.place(Point::new(475.0, 320.0));
        enemy.patrol(16.0);
        assert_eq!(enemy.direction(), Facing::Left);
        assert_relative_eq!(enemy.body().velocity.x, -50.0);

        enemy.place(Point::new(325.0, 320.0));
        enemy.patrol(32.0);
        assert_eq!(enemy.direction(), Facing::Right);
    }

    #[test]
    fn defeated_exactly_once() {
        let mut enemy = Enemy::spawn(0, &zombie());
        assert_eq!(enemy.take_damage(25, 0.0), DamageOutcome::Survived);
        assert_eq!(enemy.health(), 5);
        assert_eq!(
            enemy.take_damage(25, 10.0),
            DamageOutcome::Defeated { score_value: 120 }
        );
        assert_eq!(enemy.health(), 0);
        assert_eq!(enemy.take_damage(25, 20.0), DamageOutcome::Ignored);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn exact_damage_defeats() {
        let mut enemy = Enemy::spawn(0, &zombie());
        assert_eq!(enemy.take_damage(15, 0.0), DamageOutcome::Survived);
        assert_eq!(
            enemy.take_damage(15, 0.0),
            DamageOutcome::Defeated { score_value: 120 }
        );
    }

    #[test]
    fn flying_oni_floats_around_spawn_height() {
        let config = EnemyConfig {
            kind: EnemyKind::Oni,
            can_fly: true,
            ..zombie()
        };
        let mut oni = Enemy::spawn(1, &config);
        assert!(!oni.body().allow_gravity);
        let quarter_period = std::f64::consts::FRAC_PI_2 / 0.003;
        oni.patrol(quarter_period);
        assert_relative_eq!(oni.position().y, 340.0, epsilon = 0.01);
    }

    #[test]
    fn only_onis_fly() {
        let config = EnemyConfig {
            can_fly: true,
            ..zombie()
        };
        assert!(Enemy::spawn(0, &config).body().allow_gravity);
    }

    #[test]
    fn push_outlasts_patrol_for_the_stagger_window() {
        let mut enemy = Enemy::spawn(0, &zombie());
        enemy.push(-200.0, 1000.0);
        enemy.patrol(1100.0);
        assert_relative_eq!(enemy.body().velocity.x, -200.0);
        enemy.patrol(1250.0);
        assert_relative_eq!(enemy.body().velocity.x, 50.0);
    }
}
