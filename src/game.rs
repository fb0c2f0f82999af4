use crate::browser;
use crate::config::GameConfig;
use crate::engine::input::KeyState;
use crate::engine::{Game, Renderer, Size, FRAME_SIZE};
use crate::events::{EventSink, GameEvent};
use crate::hud;
use crate::scene::{FrameInput, Scene};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::rc::Rc;

/// TABLE
/// ┌───────────────────── Game Architecture Overview ────────────────────────┐
/// │                                                                         │
/// │    ┌─────────────┐          ┌─────────────┐          ┌─────────────┐    │
/// │    │   lib.rs    │  start   │  engine.rs  │  update  │   game.rs   │    │
/// │    │  handle     ├─────────►│  GameLoop   ├─────────►│  Samurai-   │    │
/// │    │             │          │  KeyState   │          │  Elemental  │    │
/// │    └─────────────┘          └─────────────┘          └──────┬──────┘    │
/// │                                                             │           │
/// │                              ┌────────────┐            ┌────┴─────┐     │
/// │                              │ EventSink  │◄───────────┤ scene.rs │     │
/// │                              │ (JS hooks) │  events    │  Scene   │     │
/// │                              └────────────┘            └──────────┘     │
/// │                                                                         │
/// ├──────────────────────── Call Sequence ──────────────────────────────────┤
/// │  1. GameLoop drains keyboard events into KeyState                       │
/// │  2. SamuraiElemental turns KeyState into a FrameInput                   │
/// │  3. Scene::update : physics, overlaps, input, AI, timers                │
/// │  4. recorded GameEvents go out through the EventSink, same frame        │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum SamuraiElemental {
    /// config and canvas not resolved yet
    Loading(Setup),

    /// a level is running
    Loaded(Dojo),
}

pub struct Setup {
    config_path: Option<String>,
    level: usize,
    sink: Rc<dyn EventSink>,
}

pub struct Dojo {
    config: GameConfig,
    scene: Scene,
    sink: Rc<dyn EventSink>,
}

impl SamuraiElemental {
    pub const CONFIG_PATH: &'static str = "game_config.json";

    pub fn new(config_path: Option<String>, level: usize, sink: Rc<dyn EventSink>) -> Self {
        SamuraiElemental::Loading(Setup {
            config_path,
            level,
            sink,
        })
    }

    async fn fetch_config(path: &str) -> Result<GameConfig> {
        let config = browser::fetch_json::<GameConfig>(path)
            .await
            .with_context(|| format!("Failed to load game config from : {}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid game config in : {}", path))?;
        Ok(config)
    }

    /// a broken or missing config file is not fatal, the built in one is used
    async fn load_config(path: Option<&str>) -> GameConfig {
        let Some(path) = path else {
            return GameConfig::default();
        };
        match Self::fetch_config(path).await {
            Ok(config) => {
                log!("Config: loaded {}", path);
                config
            }
            Err(err) => {
                error!("Config: {:#}, falling back to built in config", err);
                GameConfig::default()
            }
        }
    }

    fn world_size(config: &GameConfig) -> Result<Size> {
        let (width, height) = browser::resize_canvas(config.world.height as u32)?;
        let width = if width == 0 {
            config.world.width
        } else {
            width as f32
        };
        Ok(Size::new(width, height as f32))
    }
}

#[async_trait(?Send)]
impl Game for SamuraiElemental {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            SamuraiElemental::Loading(setup) => {
                let config = Self::load_config(setup.config_path.as_deref()).await;
                let world = Self::world_size(&config)?;
                let scene = Scene::new(&config, setup.level, world)
                    .with_context(|| format!("Failed to build level {}", setup.level))?;
                let dojo = Dojo {
                    config,
                    scene,
                    sink: Rc::clone(&setup.sink),
                };
                dojo.announce();
                Ok(Box::new(SamuraiElemental::Loaded(dojo)))
            }
            SamuraiElemental::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if let SamuraiElemental::Loaded(dojo) = self {
            let input = FrameInput::from_keys(keystate, &dojo.config.controls);
            dojo.scene.update(&input, FRAME_SIZE);
            for event in dojo.scene.drain_events() {
                dojo.sink.dispatch(&event);
            }
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let SamuraiElemental::Loaded(dojo) = self {
            // draw order matters : scene -> hud
            dojo.scene.draw(renderer);
            hud::draw(&dojo.scene, &dojo.config.controls, renderer);
        }
    }
}

impl Dojo {
    /// push the starting values so the page shows them before the first change
    fn announce(&self) {
        let opening = [
            GameEvent::ScoreChanged(self.scene.score()),
            GameEvent::HealthChanged(self.scene.health()),
            GameEvent::EnergyChanged(self.scene.energy()),
            GameEvent::SwordChanged(self.scene.armory().index()),
        ];
        for event in &opening {
            self.sink.dispatch(event);
        }
    }
}
