use crate::engine::{Color, Point, Rect, Renderer, Size};
use crate::physics::{Body, Stage};
use crate::sprite::state::{IsAirborne, IsGrounded, SamuraiContext, SamuraiState};
use crate::sprite::{Airborne, Facing, Grounded, PlayerTexture, Texture, Tint};

const PLAYER_BOUNCE: f32 = 0.2;

/// ┌──────────────── State Transition Flow ──────────────────┐
/// │  From State  →  Event      →  To State                  │
/// ├─────────────────────────────────────────────────────────┤
/// │  Grounded    →  Jump       →  Airborne                  │
/// │  Grounded    →  Update     →  Airborne (walked off)     │
/// │  Airborne    →  Update     →  Grounded (when landed)    │
/// │  any         →  Run / Stop / KnockBack / Teleport       │
/// │                            →  same state                │
/// └─────────────────────────────────────────────────────────┘
pub enum Event<'a> {
    Run(Facing),
    Stop,
    Jump,
    KnockBack(f32),
    Teleport(f32),
    Update(&'a Stage, f32),
}

#[derive(Debug, Copy, Clone)]
enum SamuraiStateMachine {
    Grounded(SamuraiState<Grounded>),
    Airborne(SamuraiState<Airborne>),
}

impl From<SamuraiState<Grounded>> for SamuraiStateMachine {
    fn from(state: SamuraiState<Grounded>) -> Self {
        SamuraiStateMachine::Grounded(state)
    }
}

impl From<SamuraiState<Airborne>> for SamuraiStateMachine {
    fn from(state: SamuraiState<Airborne>) -> Self {
        SamuraiStateMachine::Airborne(state)
    }
}

impl From<IsAirborne> for SamuraiStateMachine {
    fn from(is_airborne: IsAirborne) -> Self {
        match is_airborne {
            IsAirborne::Landed(grounded_state) => grounded_state.into(),
            IsAirborne::InProgress(airborne_state) => airborne_state.into(),
        }
    }
}

impl From<IsGrounded> for SamuraiStateMachine {
    fn from(is_grounded: IsGrounded) -> Self {
        match is_grounded {
            IsGrounded::Standing(grounded_state) => grounded_state.into(),
            IsGrounded::Falling(airborne_state) => airborne_state.into(),
        }
    }
}

impl SamuraiStateMachine {
    // consumes the current state, the old one can't be observed afterwards
    fn transition(self, event: Event, speed: f32, jump_power: f32) -> Self {
        use SamuraiStateMachine::*;
        match (self, event) {
            (Grounded(state), Event::Run(facing)) => state.run(facing, speed).into(),
            (Airborne(state), Event::Run(facing)) => state.run(facing, speed).into(),
            (Grounded(state), Event::Stop) => state.stop().into(),
            (Airborne(state), Event::Stop) => state.stop().into(),
            (Grounded(state), Event::KnockBack(x)) => state.knock_back(x).into(),
            (Airborne(state), Event::KnockBack(x)) => state.knock_back(x).into(),
            (Grounded(state), Event::Teleport(x)) => state.teleport(x).into(),
            (Airborne(state), Event::Teleport(x)) => state.teleport(x).into(),
            (Grounded(state), Event::Jump) => state.jump(jump_power).into(),
            (Grounded(state), Event::Update(stage, dt)) => state.update(stage, dt).into(),
            (Airborne(state), Event::Update(stage, dt)) => state.update(stage, dt).into(),
            // jumping while airborne keeps the current state
            (Airborne(_), Event::Jump) => self,
        }
    }

    fn context(&self) -> &SamuraiContext {
        match self {
            SamuraiStateMachine::Grounded(state) => state.context(),
            SamuraiStateMachine::Airborne(state) => state.context(),
        }
    }
}

/// The player character
pub struct Samurai {
    state: SamuraiStateMachine,
    speed: f32,
    jump_power: f32,
    tint: Tint,
}

impl Samurai {
    pub fn new(spawn: Point, speed: f32, jump_power: f32, sword_color: Color) -> Self {
        let body = Body::new(spawn, PlayerTexture::size())
            .with_bounce(PLAYER_BOUNCE)
            .with_world_bounds();
        Samurai {
            state: SamuraiStateMachine::Airborne(SamuraiState::new(body)),
            speed,
            jump_power,
            tint: Tint::new(sword_color),
        }
    }

    pub fn update(&mut self, stage: &Stage, dt_ms: f32) {
        self.apply(Event::Update(stage, dt_ms));
    }

    pub fn run(&mut self, facing: Facing) {
        self.apply(Event::Run(facing));
    }

    pub fn stop(&mut self) {
        self.apply(Event::Stop);
    }

    pub fn jump(&mut self) {
        self.apply(Event::Jump);
    }

    pub fn knock_back(&mut self, velocity_x: f32) {
        self.apply(Event::KnockBack(velocity_x));
    }

    pub fn teleport(&mut self, x: f32) {
        self.apply(Event::Teleport(x));
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event, self.speed, self.jump_power);
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self.state, SamuraiStateMachine::Grounded(_))
    }

    pub fn position(&self) -> Point {
        self.state.context().position()
    }

    pub fn facing(&self) -> Facing {
        self.state.context().facing
    }

    pub fn velocity(&self) -> Point {
        self.state.context().body.velocity
    }

    pub fn body(&self) -> &Body {
        &self.state.context().body
    }

    pub fn size(&self) -> Size {
        self.state.context().body.size
    }

    pub fn tint_mut(&mut self) -> &mut Tint {
        &mut self.tint
    }

    pub fn draw(&self, renderer: &Renderer, now: f64) {
        let rect = Rect::from_center(self.position(), self.size());
        renderer.fill_rect(&rect, self.tint.current(now), 1.0);
        // a notch on the facing side stands in for sprite flipping
        let notch_x = match self.facing() {
            Facing::Right => rect.right() - 6.0,
            Facing::Left => rect.left(),
        };
        renderer.fill_rect(
            &Rect::new(Point::new(notch_x, rect.top() + 8.0), Size::new(6.0, 6.0)),
            Color::BLACK,
            0.6,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FRAME_SIZE;
    use approx::assert_relative_eq;

    fn floor_stage() -> Stage {
        let mut stage = Stage::new(Size::new(800.0, 500.0), 600.0);
        stage.add_platform(Rect::new(Point::new(0.0, 460.0), Size::new(800.0, 40.0)));
        stage
    }

    fn settled_samurai(stage: &Stage) -> Samurai {
        let mut samurai = Samurai::new(Point::new(100.0, 420.0), 200.0, 400.0, Color::WHITE);
        for _ in 0..120 {
            samurai.update(stage, FRAME_SIZE);
        }
        samurai
    }

    #[test]
    fn spawns_airborne_and_lands() {
        let stage = floor_stage();
        let samurai = settled_samurai(&stage);
        assert!(samurai.is_grounded());
        assert_relative_eq!(samurai.position().y, 444.0, epsilon = 0.001);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let stage = floor_stage();
        let mut samurai = settled_samurai(&stage);
        samurai.jump();
        assert!(!samurai.is_grounded());
        assert_relative_eq!(samurai.velocity().y, -400.0);

        samurai.update(&stage, FRAME_SIZE);
        let rising = samurai.velocity().y;
        samurai.jump();
        assert_relative_eq!(samurai.velocity().y, rising);
    }

    #[test]
    fn run_sets_velocity_and_facing() {
        let stage = floor_stage();
        let mut samurai = settled_samurai(&stage);
        samurai.run(Facing::Left);
        assert_eq!(samurai.facing(), Facing::Left);
        assert_relative_eq!(samurai.velocity().x, -200.0);
        samurai.stop();
        assert_relative_eq!(samurai.velocity().x, 0.0);
        assert_eq!(samurai.facing(), Facing::Left);
    }

    #[test]
    fn teleport_moves_horizontally_only() {
        let stage = floor_stage();
        let mut samurai = settled_samurai(&stage);
        let before = samurai.position();
        samurai.teleport(300.0);
        assert_relative_eq!(samurai.position().x, 300.0);
        assert_relative_eq!(samurai.position().y, before.y);
    }
}
