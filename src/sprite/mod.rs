// TABLE:
// ┌──────────────────────────────────────────────────────────────────────────┐
// │                      Sprite Module Layout                                │
// ├───────────────────┬──────────────────────────────────────────────────────┤
// │ File              │ Holds                                                │
// ├───────────────────┼──────────────────────────────────────────────────────┤
// │ mod.rs            │ Placeholder textures, Facing, Tint, state markers    │
// │ state.rs          │ SamuraiState<S> typestates + SamuraiContext          │
// │ samurai.rs        │ SamuraiStateMachine + Samurai (what game code holds) │
// └───────────────────┴──────────────────────────────────────────────────────┘
// - no image assets : every texture is a coloured rectangle generated from
//   TextureMetadata, tinted at draw time
pub mod samurai;
pub mod state;

use crate::engine::{Color, Size};

#[derive(Debug, Clone, Copy)]
pub struct TextureMetadata {
    pub size: Size,
    pub fill: Color,
}

pub trait Texture {
    fn metadata() -> TextureMetadata;

    fn size() -> Size {
        Self::metadata().size
    }
}

macro_rules! texture {
    ($marker:ident, $width:literal x $height:literal, $fill:literal) => {
        #[derive(Debug, Copy, Clone)]
        pub struct $marker;

        impl Texture for $marker {
            fn metadata() -> TextureMetadata {
                TextureMetadata {
                    size: Size::new($width, $height),
                    fill: Color::from_rgb($fill),
                }
            }
        }
    };
}

texture!(PlayerTexture, 32.0 x 32.0, 0x4a90e2);
texture!(ZombieTexture, 30.0 x 30.0, 0x8b4513);
texture!(OniTexture, 35.0 x 35.0, 0x800080);
texture!(PlatformTexture, 800.0 x 20.0, 0x654321);
texture!(EssenceTexture, 16.0 x 16.0, 0xffd700);
texture!(ScrollTexture, 20.0 x 20.0, 0xffffff);

// ==================== Movement state markers ====================
// only differentiate SamuraiState<S> at compile time
#[derive(Debug, Copy, Clone)]
pub struct Grounded;

#[derive(Debug, Copy, Clone)]
pub struct Airborne;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Base colour plus a timed flash over it
/// - flash(red, now, 100) -> red until now + 100, then back to base
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tint {
    base: Color,
    flash: Option<(Color, f64)>,
}

impl Tint {
    pub fn new(base: Color) -> Self {
        Tint { base, flash: None }
    }

    pub fn set_base(&mut self, base: Color) {
        self.base = base;
    }

    pub fn flash(&mut self, color: Color, now: f64, duration_ms: f64) {
        self.flash = Some((color, now + duration_ms));
    }

    pub fn current(&self, now: f64) -> Color {
        match self.flash {
            Some((color, until)) if now < until => color,
            _ => self.base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_expires_back_to_base() {
        let mut tint = Tint::new(Color::from_rgb(0x00ff88));
        tint.flash(Color::RED, 1000.0, 100.0);
        assert_eq!(tint.current(1050.0), Color::RED);
        assert_eq!(tint.current(1100.0), Color::from_rgb(0x00ff88));
    }

    #[test]
    fn base_change_shows_after_flash() {
        let mut tint = Tint::new(Color::WHITE);
        tint.flash(Color::RED, 0.0, 200.0);
        tint.set_base(Color::BLACK);
        assert_eq!(tint.current(10.0), Color::RED);
        assert_eq!(tint.current(200.0), Color::BLACK);
    }

    #[test]
    fn textures_match_placeholder_sizes() {
        assert_eq!(PlayerTexture::size(), Size::new(32.0, 32.0));
        assert_eq!(OniTexture::size(), Size::new(35.0, 35.0));
        assert_eq!(ScrollTexture::metadata().fill, Color::WHITE);
    }
}
