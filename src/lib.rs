// ==================== Imports ====================
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsValue;

#[macro_use]
mod browser;
pub mod collectible;
pub mod combat;
pub mod config;
pub mod effects;
pub mod enemy;
pub mod engine;
pub mod events;
pub mod game;
pub mod hud;
pub mod physics;
pub mod scene;
pub mod sprite;
pub mod stats;

use engine::{GameLoop, LoopControl, LoopState};
use events::HudCallbacks;

// ==================== Exported Handle ====================
/// What the host page holds on to
/// - callbacks can be swapped at any time, even while running
/// - level and config path are read once, at start
#[wasm_bindgen(js_name = SamuraiElemental)]
pub struct GameHandle {
    callbacks: Rc<RefCell<HudCallbacks>>,
    control: LoopControl,
    level: usize,
    config_path: Option<String>,
    started: bool,
}

impl Default for GameHandle {
    fn default() -> Self {
        GameHandle {
            callbacks: Rc::new(RefCell::new(HudCallbacks::default())),
            control: LoopControl::default(),
            level: 0,
            config_path: Some(game::SamuraiElemental::CONFIG_PATH.to_string()),
            started: false,
        }
    }
}

impl GameHandle {
    fn update_callbacks(&self, update: impl FnOnce(&mut HudCallbacks)) {
        match self.callbacks.try_borrow_mut() {
            Ok(mut callbacks) => update(&mut callbacks),
            Err(_) => error!("SamuraiElemental: callbacks can't change while one is running"),
        }
    }
}

#[wasm_bindgen(js_class = SamuraiElemental)]
impl GameHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> GameHandle {
        GameHandle::default()
    }

    #[wasm_bindgen(js_name = setOnScoreChange)]
    pub fn set_on_score_change(&self, callback: js_sys::Function) {
        self.update_callbacks(|callbacks| callbacks.on_score_change = Some(callback));
    }

    #[wasm_bindgen(js_name = setOnHealthChange)]
    pub fn set_on_health_change(&self, callback: js_sys::Function) {
        self.update_callbacks(|callbacks| callbacks.on_health_change = Some(callback));
    }

    #[wasm_bindgen(js_name = setOnEnergyChange)]
    pub fn set_on_energy_change(&self, callback: js_sys::Function) {
        self.update_callbacks(|callbacks| callbacks.on_energy_change = Some(callback));
    }

    #[wasm_bindgen(js_name = setOnSwordChange)]
    pub fn set_on_sword_change(&self, callback: js_sys::Function) {
        self.update_callbacks(|callbacks| callbacks.on_sword_change = Some(callback));
    }

    #[wasm_bindgen(js_name = setOnGameOver)]
    pub fn set_on_game_over(&self, callback: js_sys::Function) {
        self.update_callbacks(|callbacks| callbacks.on_game_over = Some(callback));
    }

    #[wasm_bindgen(js_name = setLevel)]
    pub fn set_level(&mut self, level: usize) -> Result<(), JsValue> {
        if self.started {
            return Err(JsValue::from_str("level can't change after start"));
        }
        self.level = level;
        Ok(())
    }

    /// An empty path skips fetching and uses the built in config
    #[wasm_bindgen(js_name = setConfigPath)]
    pub fn set_config_path(&mut self, path: String) -> Result<(), JsValue> {
        if self.started {
            return Err(JsValue::from_str("config path can't change after start"));
        }
        self.config_path = if path.is_empty() { None } else { Some(path) };
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Err(JsValue::from_str("game already started"));
        }
        self.started = true;

        // setup better panic messages for debugging
        console_error_panic_hook::set_once();

        let game = game::SamuraiElemental::new(
            self.config_path.clone(),
            self.level,
            self.callbacks.clone(),
        );
        let control = self.control.clone();

        // spawns a new asynchronous task in local thread, for web assembly
        // environment, using wasm_bindgen_futures
        browser::spawn_local(async move {
            if let Err(err) = GameLoop::start(game, control).await {
                error!("SamuraiElemental: could not start, {:#}", err);
            }
        });

        Ok(())
    }

    pub fn pause(&self) {
        self.control.pause();
    }

    pub fn resume(&self) {
        self.control.resume();
    }

    /// Stops the loop for good, a destroyed handle can't be started again
    pub fn destroy(&mut self) {
        self.control.stop();
        self.started = true;
        log!("SamuraiElemental: destroyed");
    }

    #[wasm_bindgen(js_name = isPaused)]
    pub fn is_paused(&self) -> bool {
        self.control.state() == LoopState::Paused
    }
}

// ==================== Main Functions ====================
/// Main entry for Webassembly module
/// - starts level 0 with game_config.json, or the built in config
/// - no callbacks, the canvas HUD still shows everything
#[wasm_bindgen]
pub fn main_js() -> Result<(), JsValue> {
    let mut handle = GameHandle::new();
    // the loop keeps its own clone of the switch, dropping the handle is fine
    handle.start()
}
