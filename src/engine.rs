use crate::browser;
use anyhow::{anyhow, Result};
// ELI5: web assembly is a single threaded environment, so Rc RefCell > Mutex
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use self::input::KeyState;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, keystate: &KeyState);
    fn draw(&self, renderer: &Renderer);
}

// length of a frame in milliseconds
pub const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// a backgrounded tab resumes with a huge delta, don't try to catch up on it
const MAX_ACCUMULATED_DELTA: f32 = FRAME_SIZE * 15.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
    Stopped,
}

/// Shared switch between the running loop and whoever owns the game handle.
/// - Paused  : no simulation, still drawing
/// - Stopped : loop stops requesting frames
#[derive(Debug, Clone)]
pub struct LoopControl {
    state: Rc<Cell<LoopState>>,
}

impl Default for LoopControl {
    fn default() -> Self {
        LoopControl {
            state: Rc::new(Cell::new(LoopState::Running)),
        }
    }
}

impl LoopControl {
    pub fn state(&self) -> LoopState {
        self.state.get()
    }

    pub fn pause(&self) {
        if self.state.get() == LoopState::Running {
            self.state.set(LoopState::Paused);
        }
    }

    pub fn resume(&self) {
        if self.state.get() == LoopState::Paused {
            self.state.set(LoopState::Running);
        }
    }

    /// Terminal, a stopped loop never resumes
    pub fn stop(&self) {
        self.state.set(LoopState::Stopped);
    }
}

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static, control: LoopControl) -> Result<()> {
        let mut keyevent_receiver = input::prepare_input()?;
        let mut game = game.initialize().await?;
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let mut keystate = KeyState::new();

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            input::process_input(&mut keystate, &mut keyevent_receiver);
            let state = control.state();
            if state == LoopState::Stopped {
                log!("GameLoop: stopped");
                return;
            }
            game_loop.advance(perf, state, game.as_mut(), &mut keystate);
            game.draw(&renderer);

            if let Some(next_frame) = f.borrow().as_ref() {
                if let Err(err) = browser::request_animation_frame(next_frame) {
                    error!("GameLoop: {:#}", err);
                }
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    /// Simulation half of a frame : as many fixed steps as the elapsed time covers
    fn advance(
        &mut self,
        perf: f64,
        state: LoopState,
        game: &mut dyn Game,
        keystate: &mut KeyState,
    ) {
        match state {
            LoopState::Stopped => {}
            // presses made while paused must not fire after resume
            LoopState::Paused => keystate.end_frame(),
            LoopState::Running => {
                self.accumulated_delta += (perf - self.last_frame) as f32;
                self.accumulated_delta = self.accumulated_delta.min(MAX_ACCUMULATED_DELTA);
                while self.accumulated_delta > FRAME_SIZE {
                    game.update(keystate);
                    keystate.end_frame();
                    self.accumulated_delta -= FRAME_SIZE;
                }
            }
        }
        self.last_frame = perf;
    }
}

/// Fires every `period_ms` of simulated time, like a looping timer event
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period_ms: f64,
    elapsed_ms: f64,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Interval {
            period_ms,
            elapsed_ms: 0.0,
        }
    }

    /// advance by `dt_ms`, returns how many times the interval fired
    pub fn tick(&mut self, dt_ms: f64) -> u32 {
        if self.period_ms <= 0.0 {
            return 0;
        }
        self.elapsed_ms += dt_ms;
        let mut fired = 0;
        while self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            fired += 1;
        }
        fired
    }
}

// ==================== Geometry ====================
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

/// Axis aligned, `position` is the top left corner
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Rect {
            position: Point {
                x: center.x - size.width / 2.0,
                y: center.y - size.height / 2.0,
            },
            size,
        }
    }

    pub fn left(&self) -> f32 {
        self.position.x
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn top(&self) -> f32 {
        self.position.y
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.position.x + self.size.width / 2.0,
            y: self.position.y + self.size.height / 2.0,
        }
    }

    /// touching edges don't count as an intersection
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ==================== Color ====================
/// 0xRRGGBB, parsed from css style "#rrggbb" strings in the config
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);
    pub const RED: Color = Color(0xff0000);

    pub const fn from_rgb(rgb: u32) -> Self {
        Color(rgb & 0x00ff_ffff)
    }

    pub fn parse_hex(value: &str) -> Result<Self> {
        let digits = value.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(anyhow!("Invalid color '{}', expected #rrggbb", value));
        }
        u32::from_str_radix(digits, 16)
            .map(Color::from_rgb)
            .map_err(|err| anyhow!("Invalid color '{}' : {}", value, err))
    }

    pub fn css(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.css()
    }
}

// ==================== Renderer ====================
pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: Color, alpha: f32) {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_fill_style_str(&color.css());
        self.context.fill_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
        self.context.set_global_alpha(1.0);
    }

    pub fn stroke_rect(&self, rect: &Rect, color: Color) {
        self.context.set_stroke_style_str(&color.css());
        self.context.stroke_rect(
            rect.position.x.into(),
            rect.position.y.into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    /// `size` is the full width/height of the ellipse, not the radii
    pub fn fill_ellipse(&self, center: Point, size: Size, color: Color, alpha: f32) {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_fill_style_str(&color.css());
        self.context.begin_path();
        let traced = self.context.ellipse(
            center.x.into(),
            center.y.into(),
            (size.width / 2.0).max(0.0).into(),
            (size.height / 2.0).max(0.0).into(),
            0.0,
            0.0,
            std::f64::consts::TAU,
        );
        self.report("fill_ellipse", traced);
        self.context.fill();
        self.context.set_global_alpha(1.0);
    }

    pub fn draw_line(&self, from: Point, to: Point, width: f32, color: Color, alpha: f32) {
        self.context.set_global_alpha(alpha.clamp(0.0, 1.0).into());
        self.context.set_stroke_style_str(&color.css());
        self.context.set_line_width(width.into());
        self.context.begin_path();
        self.context.move_to(from.x.into(), from.y.into());
        self.context.line_to(to.x.into(), to.y.into());
        self.context.stroke();
        self.context.set_line_width(1.0);
        self.context.set_global_alpha(1.0);
    }

    pub fn draw_text(&self, text: &str, position: Point, style: &TextStyle) {
        self.context.set_font(&style.font);
        self.context.set_text_baseline("top");
        if style.stroke_width > 0.0 {
            self.context.set_line_width(style.stroke_width.into());
            self.context.set_stroke_style_str(&style.stroke.css());
            let stroked = self
                .context
                .stroke_text(text, position.x.into(), position.y.into());
            self.report("draw_text", stroked);
            self.context.set_line_width(1.0);
        }
        self.context.set_fill_style_str(&style.fill.css());
        let filled = self
            .context
            .fill_text(text, position.x.into(), position.y.into());
        self.report("draw_text", filled);
    }

    fn report(&self, operation: &str, result: std::result::Result<(), JsValue>) {
        if let Err(err) = result {
            error!("Renderer::{} failed : {:#?}", operation, err);
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextStyle {
    pub font: String,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

pub trait DebugDraw {
    fn draw_debug(&self, renderer: &Renderer);
}

impl DebugDraw for Rect {
    fn draw_debug(&self, renderer: &Renderer) {
        renderer.stroke_rect(self, Color::RED);
    }
}

// ==================== Input ====================
pub mod input {
    use crate::browser;
    use anyhow::{anyhow, Result};
    use futures::channel::mpsc::{unbounded, UnboundedReceiver};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;

    // keys the browser would otherwise use to scroll the page
    const CAPTURED_KEYS: [&str; 5] = ["Space", "ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"];

    /// Only the `KeyboardEvent.code` travels through the channel so the
    /// key state can be driven without a browser
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum KeyPress {
        KeyDown { code: String, repeat: bool },
        KeyUp { code: String },
    }

    /// Held keys plus the keys that went down since the last simulated frame.
    /// `just_pressed` survives until `end_frame` so a press landing between
    /// two fixed steps is still seen exactly once.
    #[derive(Debug, Default)]
    pub struct KeyState {
        pressed: HashSet<String>,
        just_pressed: HashSet<String>,
    }

    impl KeyState {
        pub fn new() -> Self {
            KeyState::default()
        }

        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed.contains(code)
        }

        pub fn was_just_pressed(&self, code: &str) -> bool {
            self.just_pressed.contains(code)
        }

        /// auto repeat from a held key is not a new press
        pub fn set_pressed(&mut self, code: &str, repeat: bool) {
            let newly_down = self.pressed.insert(code.to_string());
            if newly_down && !repeat {
                self.just_pressed.insert(code.to_string());
            }
        }

        pub fn set_released(&mut self, code: &str) {
            self.pressed.remove(code);
        }

        pub fn apply(&mut self, press: &KeyPress) {
            match press {
                KeyPress::KeyDown { code, repeat } => self.set_pressed(code, *repeat),
                KeyPress::KeyUp { code } => self.set_released(code),
            }
        }

        pub fn end_frame(&mut self) {
            self.just_pressed.clear();
        }
    }

    pub fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
        let (keydown_sender, keyevent_receiver) = unbounded();
        let keydown_sender = Rc::new(RefCell::new(keydown_sender));
        let keyup_sender = Rc::clone(&keydown_sender);

        let onkeydown = browser::closure_wrap(Box::new(move |keycode: web_sys::KeyboardEvent| {
            let code = keycode.code();
            if CAPTURED_KEYS.contains(&code.as_str()) {
                keycode.prevent_default();
            }
            let _ = keydown_sender.borrow_mut().start_send(KeyPress::KeyDown {
                code,
                repeat: keycode.repeat(),
            });
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let onkeyup = browser::closure_wrap(Box::new(move |keycode: web_sys::KeyboardEvent| {
            let _ = keyup_sender
                .borrow_mut()
                .start_send(KeyPress::KeyUp { code: keycode.code() });
        }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

        let window = browser::window().map_err(|err| anyhow!("prepare_input : {:#}", err))?;
        window.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
        window.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
        // listeners live as long as the page
        onkeydown.forget();
        onkeyup.forget();

        Ok(keyevent_receiver)
    }

    pub fn process_input(
        state: &mut KeyState,
        keyevent_receiver: &mut UnboundedReceiver<KeyPress>,
    ) {
        loop {
            match keyevent_receiver.try_next() {
                Ok(None) => break,
                Err(_err) => break,
                Ok(Some(press)) => state.apply(&press),
            }
        }
    }

}
