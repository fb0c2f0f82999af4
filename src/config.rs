//! Static game data : player tuning, swords, controls and level tables.
//!
//! Everything here deserializes from the optional `game_config.json` served
//! next to the wasm bundle. Missing fields fall back to the built in values so
//! a config file only has to carry what it overrides.
use crate::engine::Color;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

pub const MAX_HEALTH: i32 = 100;
pub const MAX_ENERGY: i32 = 100;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub player_defaults: PlayerDefaults,
    pub physics: PhysicsConfig,
    pub world: WorldConfig,
    pub elemental_swords: Vec<SwordConfig>,
    pub controls: Controls,
    pub levels: Vec<LevelConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            player_defaults: PlayerDefaults::default(),
            physics: PhysicsConfig::default(),
            world: WorldConfig::default(),
            elemental_swords: default_swords(),
            controls: Controls::default(),
            levels: vec![bamboo_forest(), volcano_temple()],
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.elemental_swords.is_empty() {
            return Err(anyhow!("Config has no elemental swords"));
        }
        if self.levels.is_empty() {
            return Err(anyhow!("Config has no levels"));
        }
        for sword in &self.elemental_swords {
            if !(0..=MAX_ENERGY).contains(&sword.energy_cost) {
                return Err(anyhow!(
                    "Sword '{}' costs {} energy, expected 0..={}",
                    sword.name,
                    sword.energy_cost,
                    MAX_ENERGY
                ));
            }
        }
        if self.player_defaults.speed < 0.0 || self.player_defaults.jump_power < 0.0 {
            return Err(anyhow!("Player speed and jump power must not be negative"));
        }
        if self.world.height <= 0.0 {
            return Err(anyhow!("World height must be positive"));
        }
        for level in &self.levels {
            level.validate()?;
        }
        Ok(())
    }

    pub fn level(&self, index: usize) -> Result<&LevelConfig> {
        self.levels.get(index).ok_or_else(|| {
            anyhow!(
                "Level {} does not exist, {} levels configured",
                index,
                self.levels.len()
            )
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerDefaults {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub jump_power: f32,
}

impl Default for PlayerDefaults {
    fn default() -> Self {
        PlayerDefaults {
            x: 100.0,
            y: 300.0,
            speed: 200.0,
            jump_power: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// outline every body
    pub debug: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            gravity: 600.0,
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// used when the canvas reports no width
    pub width: f32,
    pub height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            width: 800.0,
            height: 500.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wind,
    Fire,
    Water,
    Lightning,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwordConfig {
    pub id: Element,
    pub name: String,
    pub color: Color,
    pub energy_cost: i32,
}

fn default_swords() -> Vec<SwordConfig> {
    vec![
        SwordConfig {
            id: Element::Wind,
            name: "Wind Blade".into(),
            color: Color::from_rgb(0x00ff88),
            energy_cost: 20,
        },
        SwordConfig {
            id: Element::Fire,
            name: "Fire Blade".into(),
            color: Color::from_rgb(0xff4444),
            energy_cost: 25,
        },
        SwordConfig {
            id: Element::Water,
            name: "Water Blade".into(),
            color: Color::from_rgb(0x4488ff),
            energy_cost: 20,
        },
        SwordConfig {
            id: Element::Lightning,
            name: "Lightning Blade".into(),
            color: Color::from_rgb(0xffff44),
            energy_cost: 30,
        },
    ]
}

/// Key codes (`KeyboardEvent.code`) per action, any of them triggers it
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Controls {
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub jump: Vec<String>,
    pub attack: Vec<String>,
    pub ability: Vec<String>,
    pub previous_sword: Vec<String>,
    pub next_sword: Vec<String>,
}

impl Default for Controls {
    fn default() -> Self {
        let keys = |codes: &[&str]| codes.iter().map(|code| code.to_string()).collect();
        Controls {
            move_left: keys(&["KeyA"]),
            move_right: keys(&["KeyD"]),
            jump: keys(&["Space"]),
            attack: keys(&["KeyJ"]),
            ability: keys(&["KeyK"]),
            previous_sword: keys(&["KeyQ"]),
            next_sword: keys(&["KeyE"]),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    pub name: String,
    pub background: Background,
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
    #[serde(default)]
    pub enemies: Vec<EnemyConfig>,
    #[serde(default)]
    pub collectibles: Vec<CollectibleConfig>,
}

impl LevelConfig {
    fn validate(&self) -> Result<()> {
        for platform in &self.platforms {
            if platform.width <= 0.0 || platform.height <= 0.0 {
                return Err(anyhow!(
                    "Level '{}' has a platform without area at ({}, {})",
                    self.name,
                    platform.x,
                    platform.y
                ));
            }
        }
        for enemy in &self.enemies {
            if enemy.speed < 0.0 {
                return Err(anyhow!(
                    "Level '{}' has a {:?} with negative speed",
                    self.name,
                    enemy.kind
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct Background {
    pub primary: Color,
    pub secondary: Color,
}

/// top left corner plus size, like the level editor lays them out
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PlatformConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Zombie,
    Oni,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyConfig {
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    /// absent or zero means the kind's default
    #[serde(default)]
    pub health: Option<i32>,
    pub speed: f32,
    #[serde(default)]
    pub score_value: Option<u32>,
    pub color: Color,
    #[serde(default)]
    pub can_fly: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    Essence,
    Scroll,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectibleConfig {
    #[serde(rename = "type")]
    pub kind: CollectibleKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub score_value: Option<u32>,
}

fn bamboo_forest() -> LevelConfig {
    LevelConfig {
        name: "Bamboo Forest".into(),
        background: Background {
            primary: Color::from_rgb(0x1a2f1a),
            secondary: Color::from_rgb(0x2d4a2d),
        },
        platforms: vec![
            PlatformConfig {
                x: 0.0,
                y: 460.0,
                width: 1600.0,
                height: 40.0,
            },
            PlatformConfig {
                x: 220.0,
                y: 370.0,
                width: 140.0,
                height: 20.0,
            },
            PlatformConfig {
                x: 480.0,
                y: 300.0,
                width: 160.0,
                height: 20.0,
            },
            PlatformConfig {
                x: 740.0,
                y: 370.0,
                width: 140.0,
                height: 20.0,
            },
        ],
        enemies: vec![
            EnemyConfig {
                kind: EnemyKind::Zombie,
                health: Some(30),
                speed: 50.0,
                score_value: Some(100),
                color: Color::from_rgb(0x8b4513),
                can_fly: false,
            },
            EnemyConfig {
                kind: EnemyKind::Oni,
                health: Some(40),
                speed: 70.0,
                score_value: Some(150),
                color: Color::from_rgb(0x800080),
                can_fly: true,
            },
            EnemyConfig {
                kind: EnemyKind::Zombie,
                health: Some(30),
                speed: 50.0,
                score_value: Some(100),
                color: Color::from_rgb(0x8b4513),
                can_fly: false,
            },
        ],
        collectibles: vec![
            CollectibleConfig {
                kind: CollectibleKind::Essence,
                x: 290.0,
                y: 330.0,
                score_value: Some(50),
            },
            CollectibleConfig {
                kind: CollectibleKind::Scroll,
                x: 560.0,
                y: 260.0,
                score_value: Some(100),
            },
            CollectibleConfig {
                kind: CollectibleKind::Essence,
                x: 810.0,
                y: 330.0,
                score_value: Some(50),
            },
        ],
    }
}

fn volcano_temple() -> LevelConfig {
    LevelConfig {
        name: "Volcano Temple".into(),
        background: Background {
            primary: Color::from_rgb(0x3a1010),
            secondary: Color::from_rgb(0x5c1f1f),
        },
        platforms: vec![
            PlatformConfig {
                x: 0.0,
                y: 460.0,
                width: 1600.0,
                height: 40.0,
            },
            PlatformConfig {
                x: 300.0,
                y: 350.0,
                width: 120.0,
                height: 20.0,
            },
            PlatformConfig {
                x: 620.0,
                y: 350.0,
                width: 120.0,
                height: 20.0,
            },
        ],
        enemies: vec![
            EnemyConfig {
                kind: EnemyKind::Oni,
                health: Some(40),
                speed: 80.0,
                score_value: Some(150),
                color: Color::from_rgb(0xaa2222),
                can_fly: false,
            },
            EnemyConfig {
                kind: EnemyKind::Oni,
                health: Some(40),
                speed: 80.0,
                score_value: Some(200),
                color: Color::from_rgb(0x800080),
                can_fly: true,
            },
            EnemyConfig {
                kind: EnemyKind::Zombie,
                health: None,
                speed: 60.0,
                score_value: None,
                color: Color::from_rgb(0x8b4513),
                can_fly: false,
            },
            EnemyConfig {
                kind: EnemyKind::Oni,
                health: Some(40),
                speed: 80.0,
                score_value: Some(150),
                color: Color::from_rgb(0xaa2222),
                can_fly: false,
            },
        ],
        collectibles: vec![
            CollectibleConfig {
                kind: CollectibleKind::Scroll,
                x: 360.0,
                y: 310.0,
                score_value: Some(100),
            },
            CollectibleConfig {
                kind: CollectibleKind::Essence,
                x: 680.0,
                y: 310.0,
                score_value: Some(50),
            },
        ],
    }
}
