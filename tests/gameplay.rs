// Native integration tests for `samurai-elemental`.
// Only the headless parts of the crate are used here, no canvas or JS.

use samurai_elemental::config::{Element, EnemyKind, GameConfig};
use samurai_elemental::engine::{Size, FRAME_SIZE};
use samurai_elemental::events::GameEvent;
use samurai_elemental::scene::{FrameInput, Scene};
use samurai_elemental::stats::{Armory, Meter};

const WORLD: Size = Size::new(800.0, 500.0);

// One flat floor, one zombie standing still, one essence in the walking path.
const DOJO_JSON: &str = r##"{
    "physics": { "gravity": 600 },
    "levels": [{
        "name": "Training Dojo",
        "background": { "primary": "#223344", "secondary": "#112233" },
        "platforms": [{ "x": 0, "y": 460, "width": 800, "height": 40 }],
        "enemies": [{ "type": "zombie", "speed": 0, "color": "#8b4513" }],
        "collectibles": [{ "type": "essence", "x": 250, "y": 420 }]
    }]
}"##;

fn dojo_config() -> GameConfig {
    serde_json::from_str(DOJO_JSON).unwrap()
}

fn run(scene: &mut Scene, input: FrameInput, frames: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        scene.update(&input, FRAME_SIZE);
        events.extend(scene.drain_events());
    }
    events
}

#[test]
fn partial_json_config_keeps_defaults() {
    let config = dojo_config();
    config.validate().unwrap();

    assert_eq!(config.player_defaults.speed, 200.0);
    assert_eq!(config.elemental_swords.len(), 4);
    assert_eq!(config.elemental_swords[0].id, Element::Wind);
    assert_eq!(config.levels.len(), 1);

    let enemy = &config.levels[0].enemies[0];
    assert_eq!(enemy.kind, EnemyKind::Zombie);
    assert_eq!(enemy.health, None);
    assert_eq!(enemy.score_value, None);
}

#[test]
fn bad_colour_in_json_is_rejected() {
    let json = DOJO_JSON.replace("#8b4513", "brown");
    assert!(serde_json::from_str::<GameConfig>(&json).is_err());
}

#[test]
fn config_without_swords_fails_validation() {
    let mut config = dojo_config();
    config.elemental_swords.clear();
    assert!(config.validate().is_err());
}

#[test]
fn unknown_level_index_is_an_error() {
    let config = dojo_config();
    assert!(Scene::new(&config, 1, WORLD).is_err());
    assert!(Scene::new(&config, 0, WORLD).is_ok());
}

#[test]
fn built_in_levels_all_load() {
    let config = GameConfig::default();
    config.validate().unwrap();
    for index in 0..config.levels.len() {
        let scene = Scene::new(&config, index, WORLD).unwrap();
        assert_eq!(scene.level_name(), config.levels[index].name);
        assert_eq!(scene.health(), 100);
        assert_eq!(scene.energy(), 100);
        assert_eq!(scene.score(), 0);
    }
}

#[test]
fn walking_right_collects_essence_then_bumps_into_zombie() {
    let mut scene = Scene::new(&dojo_config(), 0, WORLD).unwrap();
    run(&mut scene, FrameInput::default(), 120);
    assert!(scene.samurai().is_grounded());

    let right = FrameInput {
        right: true,
        ..FrameInput::default()
    };
    let events = run(&mut scene, right, 150);

    assert!(scene.collectibles().is_empty());
    assert_eq!(scene.score(), 50);
    assert!(events.contains(&GameEvent::ScoreChanged(50)));

    let first_hit = events
        .iter()
        .position(|event| matches!(event, GameEvent::HealthChanged(_)))
        .unwrap();
    assert_eq!(events[first_hit], GameEvent::HealthChanged(90));
    assert!(scene.health() < 100);
    assert_eq!(scene.health() % 10, 0);
    assert!(!scene.is_game_over());
}

#[test]
fn two_basic_attacks_defeat_a_default_zombie() {
    let mut scene = Scene::new(&dojo_config(), 0, WORLD).unwrap();
    run(&mut scene, FrameInput::default(), 120);

    let right = FrameInput {
        right: true,
        ..FrameInput::default()
    };
    // stop short of the zombie, it stands at x 400
    while scene.samurai().position().x < 360.0 {
        run(&mut scene, right, 1);
    }
    run(&mut scene, FrameInput::default(), 1);
    assert_eq!(scene.enemies().len(), 1);

    let attack = FrameInput {
        attack: true,
        ..FrameInput::default()
    };
    let mut events = Vec::new();
    for _ in 0..2 {
        events.extend(run(&mut scene, attack, 1));
        events.extend(run(&mut scene, FrameInput::default(), 1));
    }
    assert!(scene.enemies().is_empty());
    // essence 50 + zombie 100
    assert_eq!(scene.score(), 150);
    assert!(events.contains(&GameEvent::ScoreChanged(150)));
}

#[test]
fn armory_cycles_in_both_directions() {
    let mut armory = Armory::new(GameConfig::default().elemental_swords).unwrap();
    assert_eq!(armory.len(), 4);
    assert_eq!(armory.cycle(-1), 3);
    assert_eq!(armory.current().id, Element::Lightning);
    assert_eq!(armory.cycle(1), 0);
    assert_eq!(armory.cycle(9), 1);
    assert!(Armory::new(Vec::new()).is_err());
}

#[test]
fn meters_stay_in_range() {
    let mut health = Meter::health();
    health.sub(250);
    assert_eq!(health.value(), 0);
    assert!(health.is_empty());

    let mut energy = Meter::energy();
    assert!(!energy.try_spend(101));
    assert!(energy.try_spend(30));
    energy.add(500);
    assert!(energy.is_full());
}
