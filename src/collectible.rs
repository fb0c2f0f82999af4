use crate::config::{CollectibleConfig, CollectibleKind};
use crate::engine::{Color, Point, Rect, Renderer, Size};
use crate::physics::{Body, Stage};
use crate::sprite::{EssenceTexture, ScrollTexture, Texture, TextureMetadata};

const COLLECTIBLE_BOUNCE: f32 = 0.3;
const ESSENCE_ENERGY: i32 = 20;

impl CollectibleKind {
    fn texture(&self) -> TextureMetadata {
        match self {
            CollectibleKind::Essence => EssenceTexture::metadata(),
            CollectibleKind::Scroll => ScrollTexture::metadata(),
        }
    }

    fn default_score_value(&self) -> u32 {
        match self {
            CollectibleKind::Essence => 50,
            CollectibleKind::Scroll => 100,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Reward {
    pub energy: i32,
    pub score: u32,
}

#[derive(Debug, Clone)]
pub struct Collectible {
    kind: CollectibleKind,
    body: Body,
    score_value: u32,
}

impl Collectible {
    pub fn spawn(config: &CollectibleConfig) -> Self {
        let texture = config.kind.texture();
        Collectible {
            kind: config.kind,
            body: Body::new(Point::new(config.x, config.y), texture.size)
                .with_bounce(COLLECTIBLE_BOUNCE),
            score_value: config
                .score_value
                .unwrap_or_else(|| config.kind.default_score_value()),
        }
    }

    /// essence : energy + score, scroll : score only
    pub fn reward(&self) -> Reward {
        match self.kind {
            CollectibleKind::Essence => Reward {
                energy: ESSENCE_ENERGY,
                score: self.score_value,
            },
            CollectibleKind::Scroll => Reward {
                energy: 0,
                score: self.score_value,
            },
        }
    }

    pub fn step(&mut self, stage: &Stage, dt_ms: f32) {
        self.body.step(stage, dt_ms);
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn draw(&self, renderer: &Renderer) {
        let rect = self.body.rect();
        renderer.fill_rect(&rect, self.kind.texture().fill, 1.0);
        if self.kind == CollectibleKind::Scroll {
            // rolled edge
            renderer.fill_rect(
                &Rect::new(rect.position, Size::new(rect.size.width, 3.0)),
                Color::from_rgb(0xc8a165),
                1.0,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essence_grants_energy_and_score() {
        let essence = Collectible::spawn(&CollectibleConfig {
            kind: CollectibleKind::Essence,
            x: 10.0,
            y: 10.0,
            score_value: Some(75),
        });
        assert_eq!(essence.reward(), Reward { energy: 20, score: 75 });
    }

    #[test]
    fn scroll_grants_only_score() {
        let scroll = Collectible::spawn(&CollectibleConfig {
            kind: CollectibleKind::Scroll,
            x: 10.0,
            y: 10.0,
            score_value: None,
        });
        assert_eq!(scroll.reward(), Reward { energy: 0, score: 100 });
        assert_eq!(scroll.body().size, Size::new(20.0, 20.0));
    }

    #[test]
    fn essence_defaults_to_fifty_points() {
        let essence = Collectible::spawn(&CollectibleConfig {
            kind: CollectibleKind::Essence,
            x: 0.0,
            y: 0.0,
            score_value: None,
        });
        assert_eq!(essence.reward().score, 50);
    }
}
