use crate::engine::{Color, Point, Rect, Renderer, Size};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    Rectangle { center: Point, size: Size },
    Ellipse { center: Point, size: Size },
    Circle { center: Point, radius: f32 },
    Line { from: Point, to: Point, width: f32 },
}

/// Fire and forget shape tweened from its start alpha to 0 (and optionally
/// scaled), removed once delay + duration has passed
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VisualEffect {
    shape: Shape,
    color: Color,
    alpha: f32,
    scale_to: f32,
    delay_ms: f64,
    duration_ms: f64,
    started_at: f64,
}

impl VisualEffect {
    pub fn new(shape: Shape, color: Color, alpha: f32, duration_ms: f64) -> Self {
        VisualEffect {
            shape,
            color,
            alpha,
            scale_to: 1.0,
            delay_ms: 0.0,
            duration_ms,
            started_at: 0.0,
        }
    }

    pub fn scaling_to(mut self, scale: f32) -> Self {
        self.scale_to = scale;
        self
    }

    pub fn delayed(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn started_at(mut self, now: f64) -> Self {
        self.started_at = now;
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// linear 0..=1, 0 while still delayed
    pub fn progress(&self, now: f64) -> f32 {
        let elapsed = now - self.started_at - self.delay_ms;
        if elapsed <= 0.0 || self.duration_ms <= 0.0 {
            return 0.0;
        }
        (elapsed / self.duration_ms).min(1.0) as f32
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.started_at >= self.delay_ms + self.duration_ms
    }

    pub fn current_alpha(&self, now: f64) -> f32 {
        self.alpha * (1.0 - self.progress(now))
    }

    pub fn current_scale(&self, now: f64) -> f32 {
        1.0 + (self.scale_to - 1.0) * self.progress(now)
    }

    pub fn draw(&self, renderer: &Renderer, now: f64) {
        if self.is_expired(now) {
            return;
        }
        let alpha = self.current_alpha(now);
        let scale = self.current_scale(now);
        match self.shape {
            Shape::Rectangle { center, size } => {
                let scaled = Size::new(size.width * scale, size.height * scale);
                renderer.fill_rect(&Rect::from_center(center, scaled), self.color, alpha);
            }
            Shape::Ellipse { center, size } => {
                let scaled = Size::new(size.width * scale, size.height * scale);
                renderer.fill_ellipse(center, scaled, self.color, alpha);
            }
            Shape::Circle { center, radius } => {
                let diameter = radius * 2.0 * scale;
                renderer.fill_ellipse(center, Size::new(diameter, diameter), self.color, alpha);
            }
            Shape::Line { from, to, width } => {
                renderer.draw_line(from, to, width, self.color, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ring() -> VisualEffect {
        VisualEffect::new(
            Shape::Circle {
                center: Point::new(0.0, 0.0),
                radius: 20.0,
            },
            Color::from_rgb(0xff4444),
            0.7,
            800.0,
        )
        .scaling_to(1.5)
    }

    #[test]
    fn fades_and_scales_linearly() {
        let effect = ring().started_at(1000.0);
        assert_relative_eq!(effect.current_alpha(1000.0), 0.7);
        assert_relative_eq!(effect.current_alpha(1400.0), 0.35);
        assert_relative_eq!(effect.current_scale(1400.0), 1.25);
        assert!(!effect.is_expired(1799.0));
        assert!(effect.is_expired(1800.0));
    }

    #[test]
    fn delay_holds_the_tween_back() {
        let effect = ring().delayed(300.0).started_at(0.0);
        assert_relative_eq!(effect.progress(200.0), 0.0);
        assert_relative_eq!(effect.progress(700.0), 0.5);
        assert!(!effect.is_expired(1000.0));
        assert!(effect.is_expired(1100.0));
    }
}
