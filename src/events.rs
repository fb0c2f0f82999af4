use js_sys::Function;
use std::cell::RefCell;
use wasm_bindgen::JsValue;

/// Everything the UI around the canvas cares about, recorded by the scene
/// during a frame and dispatched at the end of that same frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ScoreChanged(u32),
    HealthChanged(i32),
    EnergyChanged(i32),
    SwordChanged(usize),
    GameOver { score: u32 },
}

pub trait EventSink {
    fn dispatch(&self, event: &GameEvent);
}

/// Lets the exported handle swap callbacks while the loop holds the sink
impl<T: EventSink> EventSink for RefCell<T> {
    fn dispatch(&self, event: &GameEvent) {
        match self.try_borrow() {
            Ok(sink) => sink.dispatch(event),
            Err(_) => error!("EventSink: dropped {:?}, sink is being modified", event),
        }
    }
}

/// JS callbacks registered through the exported handle
/// - onScoreChange(score)
/// - onHealthChange(health)
/// - onEnergyChange(energy)
/// - onSwordChange(index)
/// - onGameOver(score)
#[derive(Default, Clone)]
pub struct HudCallbacks {
    pub on_score_change: Option<Function>,
    pub on_health_change: Option<Function>,
    pub on_energy_change: Option<Function>,
    pub on_sword_change: Option<Function>,
    pub on_game_over: Option<Function>,
}

impl HudCallbacks {
    fn call(name: &str, callback: &Option<Function>, value: f64) {
        if let Some(callback) = callback {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_f64(value)) {
                error!("{} callback threw : {:#?}", name, err);
            }
        }
    }
}

impl EventSink for HudCallbacks {
    fn dispatch(&self, event: &GameEvent) {
        match *event {
            GameEvent::ScoreChanged(score) => {
                Self::call("onScoreChange", &self.on_score_change, score.into())
            }
            GameEvent::HealthChanged(health) => {
                Self::call("onHealthChange", &self.on_health_change, health.into())
            }
            GameEvent::EnergyChanged(energy) => {
                Self::call("onEnergyChange", &self.on_energy_change, energy.into())
            }
            GameEvent::SwordChanged(index) => {
                Self::call("onSwordChange", &self.on_sword_change, index as f64)
            }
            GameEvent::GameOver { score } => {
                Self::call("onGameOver", &self.on_game_over, score.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<GameEvent>>,
    }

    impl EventSink for Recorder {
        fn dispatch(&self, event: &GameEvent) {
            self.seen.borrow_mut().push(*event);
        }
    }

    #[test]
    fn refcell_sink_forwards_events() {
        let shared = Rc::new(RefCell::new(Recorder::default()));
        let sink: Rc<dyn EventSink> = shared.clone();

        sink.dispatch(&GameEvent::ScoreChanged(100));
        sink.dispatch(&GameEvent::GameOver { score: 100 });

        assert_eq!(
            *shared.borrow().seen.borrow(),
            vec![GameEvent::ScoreChanged(100), GameEvent::GameOver { score: 100 }]
        );
    }

    #[test]
    fn refcell_sink_drops_events_while_borrowed_mutably() {
        let shared = Rc::new(RefCell::new(Recorder::default()));
        let sink: Rc<dyn EventSink> = shared.clone();

        {
            let _guard = shared.borrow_mut();
            sink.dispatch(&GameEvent::HealthChanged(90));
        }

        assert!(shared.borrow().seen.borrow().is_empty());
    }

    #[test]
    fn empty_callbacks_ignore_events() {
        let callbacks = HudCallbacks::default();
        callbacks.dispatch(&GameEvent::EnergyChanged(80));
        callbacks.dispatch(&GameEvent::SwordChanged(2));
    }
}
