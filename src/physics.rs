use crate::engine::{Point, Rect, Size};

// slower rebounds than this settle instead of jittering on the ground
const MIN_REBOUND_SPEED: f32 = 30.0;
// bodies this far below the world are gone for good
const FALL_OUT_MARGIN: f32 = 200.0;
// overlaps thinner than this are resting contact, not penetration
const CONTACT_EPSILON: f32 = 0.01;

/// Static level geometry plus the rules every body is stepped with
#[derive(Debug, Clone)]
pub struct Stage {
    bounds: Rect,
    gravity: f32,
    platforms: Vec<Rect>,
}

impl Stage {
    pub fn new(size: Size, gravity: f32) -> Self {
        Stage {
            bounds: Rect::new(Point::new(0.0, 0.0), size),
            gravity,
            platforms: Vec::new(),
        }
    }

    pub fn add_platform(&mut self, platform: Rect) {
        self.platforms.push(platform);
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn width(&self) -> f32 {
        self.bounds.size.width
    }
}

/// Arcade body : center position, velocity in units per second
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Body {
    pub center: Point,
    pub size: Size,
    pub velocity: Point,
    pub bounce: f32,
    pub allow_gravity: bool,
    pub collide_world_bounds: bool,
    pub touching_down: bool,
}

impl Body {
    pub fn new(center: Point, size: Size) -> Self {
        Body {
            center,
            size,
            velocity: Point::default(),
            bounce: 0.0,
            allow_gravity: true,
            collide_world_bounds: false,
            touching_down: false,
        }
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    pub fn without_gravity(mut self) -> Self {
        self.allow_gravity = false;
        self
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center, self.size)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.rect().intersects(&other.rect())
    }

    pub fn fell_out_of(&self, stage: &Stage) -> bool {
        self.rect().top() > stage.bounds.bottom() + FALL_OUT_MARGIN
    }

    /// ::step per frame
    /// - gravity -> velocity
    /// - velocity -> position, one axis at a time
    /// - push out of platforms, then clamp to world bounds
    pub fn step(&mut self, stage: &Stage, dt_ms: f32) {
        let dt = dt_ms / 1000.0;
        self.touching_down = false;

        if self.allow_gravity {
            self.velocity.y += stage.gravity * dt;
        }

        self.center.x += self.velocity.x * dt;
        for platform in &stage.platforms {
            self.separate_x(platform);
        }

        self.center.y += self.velocity.y * dt;
        for platform in &stage.platforms {
            self.separate_y(platform);
        }

        if self.collide_world_bounds {
            self.clamp_to(&stage.bounds);
        }
    }

    fn separate_x(&mut self, platform: &Rect) {
        let rect = self.rect();
        let (overlap_x, overlap_y) = penetration(&rect, platform);
        if overlap_x <= CONTACT_EPSILON || overlap_y <= CONTACT_EPSILON {
            return;
        }
        // only a side hit when the vertical overlap is the deeper one
        if overlap_x >= overlap_y {
            return;
        }
        if rect.center().x < platform.center().x {
            self.center.x = platform.left() - self.size.width / 2.0;
        } else {
            self.center.x = platform.right() + self.size.width / 2.0;
        }
        self.velocity.x = -self.velocity.x * self.bounce;
    }

    fn separate_y(&mut self, platform: &Rect) {
        let rect = self.rect();
        let (overlap_x, overlap_y) = penetration(&rect, platform);
        if overlap_x <= CONTACT_EPSILON || overlap_y <= 0.0 {
            return;
        }
        if rect.center().y < platform.center().y {
            self.center.y = platform.top() - self.size.height / 2.0;
            self.land();
        } else {
            self.center.y = platform.bottom() + self.size.height / 2.0;
            if self.velocity.y < 0.0 {
                self.velocity.y = -self.velocity.y * self.bounce;
            }
        }
    }

    fn clamp_to(&mut self, bounds: &Rect) {
        let half_width = self.size.width / 2.0;
        let half_height = self.size.height / 2.0;
        if self.center.x - half_width < bounds.left() {
            self.center.x = bounds.left() + half_width;
            self.velocity.x = -self.velocity.x * self.bounce;
        } else if self.center.x + half_width > bounds.right() {
            self.center.x = bounds.right() - half_width;
            self.velocity.x = -self.velocity.x * self.bounce;
        }
        if self.center.y - half_height < bounds.top() {
            self.center.y = bounds.top() + half_height;
            self.velocity.y = -self.velocity.y * self.bounce;
        } else if self.center.y + half_height >= bounds.bottom() {
            self.center.y = bounds.bottom() - half_height;
            self.land();
        }
    }

    fn land(&mut self) {
        self.touching_down = true;
        if self.velocity.y > 0.0 {
            let rebound = self.velocity.y * self.bounce;
            self.velocity.y = if rebound < MIN_REBOUND_SPEED {
                0.0
            } else {
                -rebound
            };
        }
    }
}

fn penetration(a: &Rect, b: &Rect) -> (f32, f32) {
    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());
    (overlap_x, overlap_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FRAME_SIZE;
    use approx::assert_relative_eq;

    fn stage_with_floor() -> Stage {
        let mut stage = Stage::new(Size::new(800.0, 500.0), 600.0);
        stage.add_platform(Rect::new(Point::new(0.0, 460.0), Size::new(800.0, 40.0)));
        stage
    }

    #[test]
    fn gravity_accelerates_a_free_body() {
        let stage = Stage::new(Size::new(800.0, 500.0), 600.0);
        let mut body = Body::new(Point::new(100.0, 100.0), Size::new(10.0, 10.0));
        body.step(&stage, 1000.0);
        assert_relative_eq!(body.velocity.y, 600.0);
        assert_relative_eq!(body.center.y, 700.0);
    }

    #[test]
    fn body_comes_to_rest_on_a_platform() {
        let stage = stage_with_floor();
        let mut body = Body::new(Point::new(100.0, 400.0), Size::new(32.0, 32.0)).with_bounce(0.2);
        for _ in 0..240 {
            body.step(&stage, FRAME_SIZE);
        }
        assert!(body.touching_down);
        assert_relative_eq!(body.center.y, 444.0, epsilon = 0.001);
        assert_relative_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn fast_landing_rebounds_with_bounce() {
        let stage = stage_with_floor();
        let mut body = Body::new(Point::new(100.0, 440.0), Size::new(32.0, 32.0)).with_bounce(0.5);
        body.velocity.y = 400.0;
        body.step(&stage, FRAME_SIZE);
        assert!(body.touching_down);
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn side_hit_stops_horizontal_motion() {
        let mut stage = Stage::new(Size::new(800.0, 500.0), 0.0);
        stage.add_platform(Rect::new(Point::new(200.0, 0.0), Size::new(20.0, 500.0)));
        let mut body = Body::new(Point::new(180.0, 250.0), Size::new(32.0, 32.0));
        body.velocity.x = 300.0;
        body.step(&stage, FRAME_SIZE);
        assert_relative_eq!(body.center.x, 184.0);
        assert_relative_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn world_bounds_keep_the_body_inside() {
        let stage = Stage::new(Size::new(800.0, 500.0), 0.0);
        let mut body =
            Body::new(Point::new(790.0, 250.0), Size::new(32.0, 32.0)).with_world_bounds();
        body.velocity.x = 600.0;
        body.step(&stage, FRAME_SIZE);
        assert_relative_eq!(body.center.x, 784.0);
    }

    #[test]
    fn world_floor_counts_as_ground() {
        let stage = Stage::new(Size::new(800.0, 500.0), 600.0);
        let mut body =
            Body::new(Point::new(100.0, 490.0), Size::new(32.0, 32.0)).with_world_bounds();
        body.step(&stage, FRAME_SIZE);
        assert!(body.touching_down);
        assert_relative_eq!(body.center.y, 484.0);
    }

    #[test]
    fn unbounded_body_can_fall_out() {
        let stage = Stage::new(Size::new(800.0, 500.0), 600.0);
        let mut body = Body::new(Point::new(100.0, 450.0), Size::new(10.0, 10.0));
        assert!(!body.fell_out_of(&stage));
        body.center.y = 800.0;
        assert!(body.fell_out_of(&stage));
    }
}
