/// All code relating to individual movement states lives here and enforces
/// unrepresentable states : a transition can only happen through the methods
/// provided
/// - PUBLIC  : SamuraiState and SamuraiContext
/// - PRIVATE : context mutators
///
/// Jumping is only reachable from `SamuraiState<Grounded>`, which is how
/// "jump only while standing on a surface" is enforced.
use crate::engine::Point;
use crate::physics::{Body, Stage};
use crate::sprite::{Airborne, Facing, Grounded};

pub enum IsAirborne {
    Landed(SamuraiState<Grounded>),
    InProgress(SamuraiState<Airborne>),
}

pub enum IsGrounded {
    Standing(SamuraiState<Grounded>),
    Falling(SamuraiState<Airborne>),
}

#[derive(Debug, Copy, Clone)]
/// Shared data for :
/// - physics : arcade body
/// - display : facing
pub struct SamuraiContext {
    pub body: Body,
    pub facing: Facing,
}

#[derive(Debug, Copy, Clone)]
pub struct SamuraiState<S> {
    context: SamuraiContext,
    // phantom marker, never read
    _state: S,
}

/// shared between all states
impl<S> SamuraiState<S> {
    pub fn context(&self) -> &SamuraiContext {
        &self.context
    }

    pub fn run(mut self, facing: Facing, speed: f32) -> Self {
        self.context = self.context.run(facing, speed);
        self
    }

    pub fn stop(mut self) -> Self {
        self.context = self.context.set_horizontal_velocity(0.0);
        self
    }

    pub fn knock_back(mut self, velocity_x: f32) -> Self {
        self.context = self.context.set_horizontal_velocity(velocity_x);
        self
    }

    pub fn teleport(mut self, x: f32) -> Self {
        self.context = self.context.teleport(x);
        self
    }
}

impl SamuraiState<Airborne> {
    /// spawned in the air, the first step drops onto whatever is below
    pub fn new(body: Body) -> Self {
        SamuraiState {
            context: SamuraiContext {
                body,
                facing: Facing::Right,
            },
            _state: Airborne,
        }
    }

    pub fn update(mut self, stage: &Stage, dt_ms: f32) -> IsAirborne {
        self.context = self.context.update(stage, dt_ms);
        if self.context.body.touching_down {
            IsAirborne::Landed(self.land())
        } else {
            IsAirborne::InProgress(self)
        }
    }

    fn land(self) -> SamuraiState<Grounded> {
        SamuraiState {
            context: self.context,
            _state: Grounded,
        }
    }
}

impl SamuraiState<Grounded> {
    pub fn update(mut self, stage: &Stage, dt_ms: f32) -> IsGrounded {
        self.context = self.context.update(stage, dt_ms);
        if self.context.body.touching_down {
            IsGrounded::Standing(self)
        } else {
            IsGrounded::Falling(self.fall())
        }
    }

    pub fn jump(self, jump_power: f32) -> SamuraiState<Airborne> {
        SamuraiState {
            // negative because top left is origin
            context: self.context.set_vertical_velocity(-jump_power),
            _state: Airborne,
        }
    }

    fn fall(self) -> SamuraiState<Airborne> {
        SamuraiState {
            context: self.context,
            _state: Airborne,
        }
    }
}

impl SamuraiContext {
    /// ::update per frame
    /// - body.step -> gravity, velocity, platform + world bound collision
    pub fn update(mut self, stage: &Stage, dt_ms: f32) -> Self {
        self.body.step(stage, dt_ms);
        self
    }

    pub fn position(&self) -> Point {
        self.body.center
    }

    fn run(mut self, facing: Facing, speed: f32) -> Self {
        self.facing = facing;
        self.body.velocity.x = facing.sign() * speed;
        self
    }

    fn set_horizontal_velocity(mut self, x: f32) -> Self {
        self.body.velocity.x = x;
        self
    }

    fn set_vertical_velocity(mut self, y: f32) -> Self {
        self.body.velocity.y = y;
        self
    }

    fn teleport(mut self, x: f32) -> Self {
        self.body.center.x = x;
        self
    }
}
