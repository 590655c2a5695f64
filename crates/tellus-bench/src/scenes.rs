use tellus_core::constants::{BUTTON_LEFT, BUTTON_MIDDLE};
use tellus_core::controls::{apply_generation, spec, ControlId};
use tellus_core::interaction::InputEvent;
use tellus_core::state::{Reallocation, SceneState};

/// Offscreen viewport every scene renders at.
pub const BENCH_WIDTH: u32 = 640;
pub const BENCH_HEIGHT: u32 = 480;

/// Ticks between regenerations in the regenerate scene.
const REGENERATE_INTERVAL: u32 = 30;

/// Scripted input driving one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneScript {
    /// No input: every tick after the first is composite only.
    Idle,
    /// Middle-drag in a widening circle: intersection every tick.
    Orbit,
    /// Left button held at the centre: heightmap and intersection every tick.
    Sculpt,
    /// Periodic apply with a nudged persistence: the full chain.
    Regenerate,
}

/// Configuration for a single benchmark scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    pub name: &'static str,
    pub script: SceneScript,
}

pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "idle",
            script: SceneScript::Idle,
        },
        SceneConfig {
            name: "orbit",
            script: SceneScript::Orbit,
        },
        SceneConfig {
            name: "sculpt",
            script: SceneScript::Sculpt,
        },
        SceneConfig {
            name: "regenerate",
            script: SceneScript::Regenerate,
        },
    ]
}

fn centre() -> (f32, f32) {
    (BENCH_WIDTH as f32 / 2.0, BENCH_HEIGHT as f32 / 2.0)
}

impl SceneConfig {
    /// Input events queued before `tick`.
    pub fn events_for_tick(&self, tick: u32) -> Vec<InputEvent> {
        let (cx, cy) = centre();
        match self.script {
            SceneScript::Idle | SceneScript::Regenerate => Vec::new(),
            SceneScript::Orbit => {
                if tick == 0 {
                    return vec![InputEvent::PointerDown {
                        x: cx,
                        y: cy,
                        buttons: BUTTON_MIDDLE,
                    }];
                }
                let angle = tick as f32 * 0.1;
                let radius = 2.0 * tick as f32;
                vec![InputEvent::PointerMove {
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                    buttons: BUTTON_MIDDLE,
                }]
            }
            SceneScript::Sculpt => {
                if tick == 0 {
                    return vec![InputEvent::PointerDown {
                        x: cx,
                        y: cy,
                        buttons: BUTTON_LEFT,
                    }];
                }
                let wobble = (tick as f32 * 0.3).sin() * 8.0;
                vec![InputEvent::PointerMove {
                    x: cx + wobble,
                    y: cy,
                    buttons: BUTTON_LEFT,
                }]
            }
        }
    }

    /// Direct state changes before `tick`, as the settings panel would make.
    pub fn before_tick(&self, tick: u32, state: &mut SceneState) -> Option<Reallocation> {
        if self.script != SceneScript::Regenerate || tick == 0 || tick % REGENERATE_INTERVAL != 0 {
            return None;
        }
        let persistence = spec(ControlId::Persistence);
        let next = if persistence.read(state) < 0.6 { 0.65 } else { 0.5 };
        if let Err(e) = persistence.commit(state, next) {
            log::warn!("Scene {}: {e}", self.name);
        }
        Some(apply_generation(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(script: SceneScript) -> SceneConfig {
        SceneConfig {
            name: "test",
            script,
        }
    }

    #[test]
    fn test_standard_scene_names() {
        let names: Vec<&str> = standard_scenes().iter().map(|s| s.name).collect();
        assert_eq!(names, ["idle", "orbit", "sculpt", "regenerate"]);
    }

    #[test]
    fn test_idle_sends_nothing() {
        let idle = scene(SceneScript::Idle);
        let mut state = SceneState::default();
        for tick in 0..100 {
            assert!(idle.events_for_tick(tick).is_empty());
            assert!(idle.before_tick(tick, &mut state).is_none());
        }
    }

    #[test]
    fn test_orbit_starts_with_middle_press() {
        let events = scene(SceneScript::Orbit).events_for_tick(0);
        assert!(matches!(
            events[..],
            [InputEvent::PointerDown {
                buttons: BUTTON_MIDDLE,
                ..
            }]
        ));
    }

    #[test]
    fn test_regenerate_cadence() {
        let regen = scene(SceneScript::Regenerate);
        let mut state = SceneState::default();
        assert!(regen.before_tick(0, &mut state).is_none());
        assert!(regen.before_tick(1, &mut state).is_none());

        let realloc = regen.before_tick(REGENERATE_INTERVAL, &mut state);
        assert!(matches!(realloc, Some(Reallocation::Heightmap { .. })));
        assert_eq!(state.noise.persistence, 0.65);
        assert!(state.dirty.regenerate_noise);

        regen.before_tick(2 * REGENERATE_INTERVAL, &mut state);
        assert_eq!(state.noise.persistence, 0.5);
    }
}
