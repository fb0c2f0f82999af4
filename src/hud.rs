use crate::config::{Controls, MAX_ENERGY, MAX_HEALTH};
use crate::engine::{Color, Point, Rect, Renderer, Size, TextStyle};
use crate::scene::Scene;

const BAR_SIZE: Size = Size::new(150.0, 10.0);
const HEALTH_COLOR: Color = Color::from_rgb(0xe04848);
const ENERGY_COLOR: Color = Color::from_rgb(0x48a0e0);
const BAR_BACKGROUND: Color = Color::from_rgb(0x222222);

fn text(font: &str, fill: Color, stroke_width: f32) -> TextStyle {
    TextStyle {
        font: font.to_string(),
        fill,
        stroke: Color::BLACK,
        stroke_width,
    }
}

/// "KeyA" -> "A", "ArrowLeft" -> "LEFT", "Space" -> "SPACE"
fn key_label(code: &str) -> String {
    ["Key", "Digit", "Arrow"]
        .iter()
        .find_map(|prefix| code.strip_prefix(prefix))
        .unwrap_or(code)
        .to_uppercase()
}

/// first binding of an action, aliases are left out to keep the line short
fn first_key(codes: &[String]) -> String {
    codes
        .first()
        .map(|code| key_label(code))
        .unwrap_or_else(|| "-".to_string())
}

pub fn controls_hint(controls: &Controls) -> String {
    format!(
        "{}/{}: Move | {}: Jump | {}: Attack | {}: Ability | {}/{}: Switch Sword",
        first_key(&controls.move_left),
        first_key(&controls.move_right),
        first_key(&controls.jump),
        first_key(&controls.attack),
        first_key(&controls.ability),
        first_key(&controls.previous_sword),
        first_key(&controls.next_sword),
    )
}

/// Canvas overlay : equipped sword, gauges, score and the controls line
pub fn draw(scene: &Scene, controls: &Controls, renderer: &Renderer) {
    let bounds = scene.bounds();
    let sword = scene.armory().current();

    renderer.draw_text(
        &format!("Sword: {}", sword.name),
        Point::new(10.0, 10.0),
        &text("18px Arial, sans-serif", sword.color, 2.0),
    );

    draw_bar(renderer, Point::new(10.0, 36.0), scene.health(), MAX_HEALTH, HEALTH_COLOR);
    draw_bar(renderer, Point::new(10.0, 52.0), scene.energy(), MAX_ENERGY, ENERGY_COLOR);

    renderer.draw_text(
        &format!("Score: {}", scene.score()),
        Point::new(bounds.right() - 160.0, 10.0),
        &text("18px Arial, sans-serif", Color::WHITE, 2.0),
    );
    renderer.draw_text(
        scene.level_name(),
        Point::new(bounds.right() - 160.0, 32.0),
        &text("14px Arial, sans-serif", Color::WHITE, 1.0),
    );

    renderer.draw_text(
        &controls_hint(controls),
        Point::new(10.0, bounds.bottom() - 50.0),
        &text("14px Arial, sans-serif", Color::WHITE, 1.0),
    );

    if scene.is_game_over() {
        renderer.fill_rect(&bounds, Color::BLACK, 0.6);
        renderer.draw_text(
            "GAME OVER",
            Point::new(bounds.center().x - 90.0, bounds.center().y - 30.0),
            &text("36px Arial, sans-serif", Color::RED, 3.0),
        );
        renderer.draw_text(
            &format!("Final score: {}", scene.score()),
            Point::new(bounds.center().x - 70.0, bounds.center().y + 16.0),
            &text("18px Arial, sans-serif", Color::WHITE, 2.0),
        );
    }
}

fn draw_bar(renderer: &Renderer, position: Point, value: i32, max: i32, color: Color) {
    renderer.fill_rect(&Rect::new(position, BAR_SIZE), BAR_BACKGROUND, 0.8);
    let ratio = if max > 0 {
        (value.clamp(0, max) as f32) / max as f32
    } else {
        0.0
    };
    let filled = Size::new(BAR_SIZE.width * ratio, BAR_SIZE.height);
    renderer.fill_rect(&Rect::new(position, filled), color, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_hint() {
        assert_eq!(
            controls_hint(&Controls::default()),
            "A/D: Move | SPACE: Jump | J: Attack | K: Ability | Q/E: Switch Sword"
        );
    }

    #[test]
    fn rebound_keys_show_in_the_hint() {
        let controls = Controls {
            move_left: vec!["ArrowLeft".into(), "KeyA".into()],
            move_right: vec!["ArrowRight".into()],
            attack: vec!["Digit1".into()],
            ability: Vec::new(),
            ..Controls::default()
        };
        assert_eq!(
            controls_hint(&controls),
            "LEFT/RIGHT: Move | SPACE: Jump | 1: Attack | -: Ability | Q/E: Switch Sword"
        );
    }
}
