use crate::collectible::{Collectible, Reward};
use crate::combat::{self, Attacker, Strike};
use crate::config::{Background, Controls, GameConfig};
use crate::effects::VisualEffect;
use crate::enemy::{DamageOutcome, Enemy};
use crate::engine::input::KeyState;
use crate::engine::{Color, DebugDraw, Interval, Point, Rect, Renderer, Size};
use crate::events::GameEvent;
use crate::physics::Stage;
use crate::sprite::samurai::Samurai;
use crate::sprite::{Facing, PlatformTexture, Texture};
use crate::stats::{Armory, Meter};
use anyhow::Result;

const CONTACT_DAMAGE: i32 = 10;
const HIT_COOLDOWN_MS: f64 = 1000.0;
const KNOCKBACK_SPEED: f32 = 200.0;
// movement input is ignored while the knockback plays out
const KNOCKBACK_MS: f64 = 200.0;
const HIT_FLASH_MS: f64 = 200.0;

const ENERGY_REGEN: i32 = 5;
const ENERGY_REGEN_PERIOD_MS: f64 = 1000.0;

/// What the player asked for this frame
/// - held keys   : left, right, jump
/// - fresh press : everything else, once per physical press
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub previous_sword: bool,
    pub next_sword: bool,
    pub attack: bool,
    pub ability: bool,
}

impl FrameInput {
    pub fn from_keys(keys: &KeyState, controls: &Controls) -> Self {
        let held = |codes: &[String]| codes.iter().any(|code| keys.is_pressed(code));
        let pressed = |codes: &[String]| codes.iter().any(|code| keys.was_just_pressed(code));
        FrameInput {
            left: held(&controls.move_left),
            right: held(&controls.move_right),
            jump: held(&controls.jump),
            previous_sword: pressed(&controls.previous_sword),
            next_sword: pressed(&controls.next_sword),
            attack: pressed(&controls.attack),
            ability: pressed(&controls.ability),
        }
    }
}

/// One running level : entities, counters and the simulated clock
pub struct Scene {
    level_name: String,
    background: Background,
    stage: Stage,
    samurai: Samurai,
    enemies: Vec<Enemy>,
    collectibles: Vec<Collectible>,
    effects: Vec<VisualEffect>,
    armory: Armory,
    health: Meter,
    energy: Meter,
    score: u32,
    last_hit: Option<f64>,
    knocked_back_until: f64,
    energy_timer: Interval,
    now: f64,
    game_over: bool,
    debug_bodies: bool,
    events: Vec<GameEvent>,
}

impl Scene {
    pub fn new(config: &GameConfig, level_index: usize, world: Size) -> Result<Self> {
        let level = config.level(level_index)?;
        let armory = Armory::new(config.elemental_swords.clone())?;

        let mut stage = Stage::new(world, config.physics.gravity);
        for platform in &level.platforms {
            stage.add_platform(Rect::new(
                Point::new(platform.x, platform.y),
                Size::new(platform.width, platform.height),
            ));
        }

        let defaults = config.player_defaults;
        let samurai = Samurai::new(
            Point::new(defaults.x, defaults.y),
            defaults.speed,
            defaults.jump_power,
            armory.current().color,
        );

        let enemies = level
            .enemies
            .iter()
            .enumerate()
            .map(|(index, enemy)| Enemy::spawn(index, enemy))
            .collect::<Vec<_>>();
        let collectibles = level
            .collectibles
            .iter()
            .map(Collectible::spawn)
            .collect::<Vec<_>>();

        log!(
            "Scene: '{}' loaded with {} enemies, {} collectibles, {} platforms",
            level.name,
            enemies.len(),
            collectibles.len(),
            stage.platforms().len()
        );

        Ok(Scene {
            level_name: level.name.clone(),
            background: level.background,
            stage,
            samurai,
            enemies,
            collectibles,
            effects: Vec::new(),
            armory,
            health: Meter::health(),
            energy: Meter::energy(),
            score: 0,
            last_hit: None,
            knocked_back_until: f64::NEG_INFINITY,
            energy_timer: Interval::new(ENERGY_REGEN_PERIOD_MS),
            now: 0.0,
            game_over: false,
            debug_bodies: config.physics.debug,
            events: Vec::new(),
        })
    }

    /// One simulated frame. A finished game is frozen, nothing moves any more.
    pub fn update(&mut self, input: &FrameInput, dt_ms: f32) {
        if self.game_over {
            return;
        }
        self.now += dt_ms as f64;

        // physics first, overlaps resolve against the new positions
        self.samurai.update(&self.stage, dt_ms);
        for enemy in self.enemies.iter_mut() {
            enemy.step(&self.stage, dt_ms);
        }
        for collectible in self.collectibles.iter_mut() {
            collectible.step(&self.stage, dt_ms);
        }
        self.collect_items();
        self.check_enemy_contact();
        if self.game_over {
            return;
        }

        self.handle_input(input);
        self.update_enemies();

        for _ in 0..self.energy_timer.tick(dt_ms as f64) {
            self.regenerate_energy();
        }
        let now = self.now;
        self.effects.retain(|effect| !effect.is_expired(now));
    }

    fn handle_input(&mut self, input: &FrameInput) {
        if self.now >= self.knocked_back_until {
            if input.left {
                self.samurai.run(Facing::Left);
            } else if input.right {
                self.samurai.run(Facing::Right);
            } else {
                self.samurai.stop();
            }
        }

        if input.jump && self.samurai.is_grounded() {
            self.samurai.jump();
        }

        if input.previous_sword {
            self.switch_sword(-1);
        }
        if input.next_sword {
            self.switch_sword(1);
        }
        if input.attack {
            self.basic_attack();
        }
        if input.ability {
            self.use_special_ability();
        }
    }

    fn switch_sword(&mut self, step: i32) {
        let index = self.armory.cycle(step);
        let color = self.armory.current().color;
        self.samurai.tint_mut().set_base(color);
        self.events.push(GameEvent::SwordChanged(index));
    }

    fn attacker(&self) -> Attacker {
        Attacker {
            position: self.samurai.position(),
            facing: self.samurai.facing(),
        }
    }

    fn basic_attack(&mut self) {
        let strike = combat::basic_attack(
            self.attacker(),
            &self.enemies,
            self.armory.current().color,
        );
        self.apply_strike(strike);
    }

    fn use_special_ability(&mut self) {
        let sword = self.armory.current();
        let element = sword.id;
        if !self.energy.try_spend(sword.energy_cost) {
            return;
        }
        self.events.push(GameEvent::EnergyChanged(self.energy.value()));

        let strike = combat::special_ability(
            element,
            self.attacker(),
            &self.enemies,
            self.stage.width(),
        );
        self.apply_strike(strike);
    }

    fn apply_strike(&mut self, strike: Strike) {
        let now = self.now;
        if let Some(x) = strike.teleport_to {
            self.samurai.teleport(x);
        }
        if let Some((color, duration)) = strike.attacker_flash {
            self.samurai.tint_mut().flash(color, now, duration);
        }
        for hit in &strike.hits {
            if let Some(push) = hit.push {
                self.enemies[hit.enemy].push(push, now);
            }
            // the damage flash goes on top of any strike flash
            if let Some((color, duration)) = hit.flash {
                self.enemies[hit.enemy].flash(color, now, duration);
            }
            self.damage_enemy(hit.enemy, hit.damage);
        }
        self.effects
            .extend(strike.effects.into_iter().map(|effect| effect.started_at(now)));
    }

    fn damage_enemy(&mut self, index: usize, damage: i32) {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return;
        };
        if let DamageOutcome::Defeated { score_value } = enemy.take_damage(damage, self.now) {
            log!("Scene: {:?} defeated, +{}", enemy.kind(), score_value);
            self.score += score_value;
            self.events.push(GameEvent::ScoreChanged(self.score));
        }
    }

    fn update_enemies(&mut self) {
        let now = self.now;
        for enemy in self.enemies.iter_mut() {
            enemy.patrol(now);
            if enemy.body().fell_out_of(&self.stage) {
                enemy.vanish();
            }
        }
        self.enemies.retain(Enemy::is_alive);
    }

    fn collect_items(&mut self) {
        let player = *self.samurai.body();
        let (picked, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut self.collectibles)
            .into_iter()
            .filter(|item| !item.body().fell_out_of(&self.stage))
            .partition(|item| item.body().overlaps(&player));
        self.collectibles = remaining;
        for item in picked {
            self.apply_reward(item.reward());
        }
    }

    fn apply_reward(&mut self, reward: Reward) {
        if reward.energy > 0 {
            self.energy.add(reward.energy);
            self.events.push(GameEvent::EnergyChanged(self.energy.value()));
        }
        self.score += reward.score;
        self.events.push(GameEvent::ScoreChanged(self.score));
    }

    fn check_enemy_contact(&mut self) {
        let player = *self.samurai.body();
        let contact = self
            .enemies
            .iter()
            .find(|enemy| enemy.is_alive() && enemy.body().overlaps(&player))
            .map(|enemy| enemy.position().x);
        if let Some(enemy_x) = contact {
            self.player_hit_enemy(enemy_x);
        }
    }

    fn player_hit_enemy(&mut self, enemy_x: f32) {
        if let Some(last_hit) = self.last_hit {
            if self.now - last_hit < HIT_COOLDOWN_MS {
                return;
            }
        }
        self.last_hit = Some(self.now);

        self.health.sub(CONTACT_DAMAGE);
        self.events.push(GameEvent::HealthChanged(self.health.value()));

        let away = if self.samurai.position().x < enemy_x {
            -KNOCKBACK_SPEED
        } else {
            KNOCKBACK_SPEED
        };
        self.samurai.knock_back(away);
        self.knocked_back_until = self.now + KNOCKBACK_MS;
        self.samurai
            .tint_mut()
            .flash(Color::RED, self.now, HIT_FLASH_MS);

        if self.health.is_empty() {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        log!("Scene: game over with {} points", self.score);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    fn regenerate_energy(&mut self) {
        if !self.energy.is_full() {
            self.energy.add(ENERGY_REGEN);
            self.events.push(GameEvent::EnergyChanged(self.energy.value()));
        }
    }

    /// events recorded since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn level_name(&self) -> &str {
        &self.level_name
    }

    pub fn health(&self) -> i32 {
        self.health.value()
    }

    pub fn energy(&self) -> i32 {
        self.energy.value()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn armory(&self) -> &Armory {
        &self.armory
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn samurai(&self) -> &Samurai {
        &self.samurai
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn effects(&self) -> &[VisualEffect] {
        &self.effects
    }

    pub fn bounds(&self) -> Rect {
        self.stage.bounds()
    }

    pub fn draw(&self, renderer: &Renderer) {
        let bounds = self.stage.bounds();
        renderer.clear(&bounds);
        renderer.fill_rect(&bounds, self.background.primary, 1.0);
        let horizon = Rect::new(
            Point::new(0.0, bounds.size.height * 0.6),
            Size::new(bounds.size.width, bounds.size.height * 0.4),
        );
        renderer.fill_rect(&horizon, self.background.secondary, 1.0);

        let platform_fill = PlatformTexture::metadata().fill;
        for platform in self.stage.platforms() {
            renderer.fill_rect(platform, platform_fill, 1.0);
        }
        for collectible in &self.collectibles {
            collectible.draw(renderer);
        }
        for enemy in &self.enemies {
            enemy.draw(renderer, self.now);
        }
        self.samurai.draw(renderer, self.now);
        for effect in &self.effects {
            effect.draw(renderer, self.now);
        }

        if self.debug_bodies {
            self.samurai.body().rect().draw_debug(renderer);
            for enemy in &self.enemies {
                enemy.body().rect().draw_debug(renderer);
            }
            for collectible in &self.collectibles {
                collectible.body().rect().draw_debug(renderer);
            }
        }
    }
}
