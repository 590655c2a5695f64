use glam::Mat3;

use crate::config::InteractionConfig;
use crate::constants::{BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
use crate::dirty::Pass;
use crate::math;
use crate::state::{Reallocation, SceneState};

/// Host input, queued by listeners and applied at the start of a tick.
/// Positions are in viewport pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32, buttons: u32 },
    PointerDown { x: f32, y: f32, buttons: u32 },
    PointerUp { x: f32, y: f32, buttons: u32 },
    Wheel { delta_y: f32 },
    Resize { width: u32, height: u32 },
}

/// Pointer state captured when a button went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub x: f32,
    pub y: f32,
    pub buttons: u32,
    pub rotation: Mat3,
}

/// Turns pointer input into orbit, sculpt and zoom changes on `SceneState`.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InteractionConfig,
    x: f32,
    y: f32,
    buttons: u32,
    drag: Option<DragStart>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            x: 0.0,
            y: 0.0,
            buttons: 0,
            drag: None,
        }
    }

    pub fn pointer(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn buttons(&self) -> u32 {
        self.buttons
    }

    pub fn drag(&self) -> Option<&DragStart> {
        self.drag.as_ref()
    }

    /// Apply one queued event. Returns a reallocation when the viewport changed.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        state: &mut SceneState,
    ) -> Option<Reallocation> {
        match *event {
            InputEvent::PointerMove { x, y, buttons } => {
                self.track(x, y, buttons);
                None
            }
            InputEvent::PointerDown { x, y, buttons } => {
                self.track(x, y, buttons);
                self.drag = Some(DragStart {
                    x,
                    y,
                    buttons,
                    rotation: state.camera.rotation(),
                });
                None
            }
            InputEvent::PointerUp { x, y, buttons } => {
                self.track(x, y, buttons);
                self.drag = None;
                None
            }
            InputEvent::Wheel { delta_y } => {
                self.zoom(delta_y, state);
                None
            }
            InputEvent::Resize { width, height } => Some(state.resize(width, height)),
        }
    }

    fn track(&mut self, x: f32, y: f32, buttons: u32) {
        self.x = x;
        self.y = y;
        self.buttons = buttons;
    }

    fn zoom(&mut self, delta_y: f32, state: &mut SceneState) {
        if delta_y == 0.0 || !delta_y.is_finite() {
            return;
        }
        let step = if delta_y > 0.0 {
            self.config.zoom_step
        } else {
            -self.config.zoom_step
        };
        let camera = &mut state.camera;
        camera.focal_length =
            (camera.focal_length + step).clamp(self.config.focal_min, self.config.focal_max);
        state.dirty.mark(Pass::Intersection);
    }

    /// Per-tick update from the held buttons: orbit on middle drag, sculpt on
    /// left/right.
    pub fn update(&mut self, state: &mut SceneState, elapsed_secs: f32) {
        self.orbit(state);
        self.sculpt(state, elapsed_secs);
    }

    fn orbit(&self, state: &mut SceneState) {
        let Some(start) = self.drag else {
            return;
        };
        if self.buttons & BUTTON_MIDDLE == 0 || start.buttons & BUTTON_MIDDLE == 0 {
            return;
        }

        let dx = self.x - start.x;
        let dy = start.y - self.y;
        let length = (dx * dx + dy * dy).sqrt();
        if length <= self.config.min_drag_length {
            return;
        }

        // Axis perpendicular to the drag, in the view plane.
        let camera = &state.camera;
        let axis = camera.right * (dy / length) + camera.up * (-dx / length);
        let angle = self.config.orbit_rate * length;

        let rotation = math::rotation_about_axis(axis, angle) * start.rotation;
        state.camera.set_rotation(rotation);
        state.dirty.mark(Pass::Intersection);
    }

    fn sculpt(&self, state: &mut SceneState, elapsed_secs: f32) {
        let left = self.buttons & BUTTON_LEFT != 0;
        let right = self.buttons & BUTTON_RIGHT != 0;
        let rate = match (left, right) {
            (true, true) => {
                state.sculpt.smooth = true;
                self.config.smooth_sculpt_rate
            }
            (true, false) => self.config.sculpt_rate,
            (false, true) => -self.config.sculpt_rate,
            (false, false) => return,
        };
        state.sculpt.mould = rate * elapsed_secs;
        state.dirty.mark(Pass::HeightmapEvolution);
        state.dirty.mark(Pass::Intersection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyFlags;

    fn setup() -> (InteractionController, SceneState) {
        let mut state = SceneState::default();
        state.dirty = DirtyFlags::default();
        (InteractionController::new(InteractionConfig::default()), state)
    }

    fn middle_drag(
        controller: &mut InteractionController,
        state: &mut SceneState,
        from: (f32, f32),
        to: (f32, f32),
    ) {
        controller.handle_event(
            &InputEvent::PointerDown {
                x: from.0,
                y: from.1,
                buttons: BUTTON_MIDDLE,
            },
            state,
        );
        controller.handle_event(
            &InputEvent::PointerMove {
                x: to.0,
                y: to.1,
                buttons: BUTTON_MIDDLE,
            },
            state,
        );
        controller.update(state, 0.016);
    }

    #[test]
    fn test_orbit_keeps_rotation_orthogonal() {
        let (mut controller, mut state) = setup();
        middle_drag(&mut controller, &mut state, (100.0, 100.0), (160.0, 70.0));

        let r = state.camera.rotation();
        assert_ne!(r, Mat3::IDENTITY);
        assert!(
            math::approx_eq(&(r.transpose() * r), &Mat3::IDENTITY, 1e-5),
            "R^T R not identity: {r:?}"
        );
        assert!(math::approx_eq(
            &(r * state.camera.rotation_inverse()),
            &Mat3::IDENTITY,
            1e-5
        ));
        assert!(state.dirty.refresh_depth);
    }

    #[test]
    fn test_orbit_angle_matches_drag_length() {
        let (mut controller, mut state) = setup();
        // 30-40-50 drag: angle = 0.005 * 50.
        middle_drag(&mut controller, &mut state, (0.0, 0.0), (30.0, -40.0));
        let r = state.camera.rotation();
        let angle = ((r.x_axis.x + r.y_axis.y + r.z_axis.z - 1.0) / 2.0).acos();
        assert!((angle - 0.25).abs() < 1e-4, "angle {angle}");
    }

    #[test]
    fn test_orbit_composes_from_snapshot() {
        let (mut controller, mut state) = setup();
        middle_drag(&mut controller, &mut state, (0.0, 0.0), (50.0, 0.0));
        let once = state.camera.rotation();
        // Repeating the update with the same pointer must not compound.
        controller.update(&mut state, 0.016);
        assert!(math::approx_eq(&state.camera.rotation(), &once, 1e-6));
    }

    #[test]
    fn test_zero_drag_changes_nothing() {
        let (mut controller, mut state) = setup();
        middle_drag(&mut controller, &mut state, (40.0, 40.0), (40.0, 40.0));
        assert_eq!(state.camera.rotation(), Mat3::IDENTITY);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_orbit_requires_middle_at_drag_start() {
        let (mut controller, mut state) = setup();
        controller.handle_event(
            &InputEvent::PointerDown {
                x: 0.0,
                y: 0.0,
                buttons: BUTTON_LEFT,
            },
            &mut state,
        );
        controller.handle_event(
            &InputEvent::PointerMove {
                x: 50.0,
                y: 0.0,
                buttons: BUTTON_LEFT | BUTTON_MIDDLE,
            },
            &mut state,
        );
        controller.update(&mut state, 0.0);
        assert_eq!(state.camera.rotation(), Mat3::IDENTITY);
    }

    #[test]
    fn test_pointer_up_ends_drag() {
        let (mut controller, mut state) = setup();
        middle_drag(&mut controller, &mut state, (0.0, 0.0), (50.0, 0.0));
        controller.handle_event(
            &InputEvent::PointerUp {
                x: 50.0,
                y: 0.0,
                buttons: 0,
            },
            &mut state,
        );
        assert!(controller.drag().is_none());
    }

    #[test]
    fn test_sculpt_rates() {
        let cases = [
            (BUTTON_LEFT, 0.2 * 0.5, false),
            (BUTTON_RIGHT, -0.2 * 0.5, false),
            (BUTTON_LEFT | BUTTON_RIGHT, 1.0 * 0.5, true),
        ];
        for (buttons, mould, smooth) in cases {
            let (mut controller, mut state) = setup();
            controller.handle_event(
                &InputEvent::PointerDown {
                    x: 10.0,
                    y: 10.0,
                    buttons,
                },
                &mut state,
            );
            controller.update(&mut state, 0.5);
            assert!(
                (state.sculpt.mould - mould).abs() < 1e-6,
                "buttons {buttons}: mould {}",
                state.sculpt.mould
            );
            assert_eq!(state.sculpt.smooth, smooth);
            assert!(state.dirty.refresh_heightmap);
            assert!(state.dirty.refresh_depth);
        }
    }

    #[test]
    fn test_release_off_canvas_stops_sculpt() {
        let (mut controller, mut state) = setup();
        controller.handle_event(
            &InputEvent::PointerDown {
                x: 5.0,
                y: 5.0,
                buttons: BUTTON_LEFT,
            },
            &mut state,
        );
        controller.handle_event(
            &InputEvent::PointerUp {
                x: -40.0,
                y: 5.0,
                buttons: 0,
            },
            &mut state,
        );
        assert_eq!(controller.buttons(), 0);
        assert!(controller.drag().is_none());

        controller.update(&mut state, 0.5);
        assert_eq!(state.sculpt.mould, 0.0);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_no_buttons_no_sculpt() {
        let (mut controller, mut state) = setup();
        controller.update(&mut state, 0.5);
        assert_eq!(state.sculpt.mould, 0.0);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_zoom_steps_and_clamps() {
        let (mut controller, mut state) = setup();
        controller.handle_event(&InputEvent::Wheel { delta_y: 120.0 }, &mut state);
        assert!((state.camera.focal_length - 0.325).abs() < 1e-6);
        assert!(state.dirty.refresh_depth);

        for _ in 0..100 {
            controller.handle_event(&InputEvent::Wheel { delta_y: -3.0 }, &mut state);
        }
        assert!((state.camera.focal_length - 0.1).abs() < 1e-6);

        for _ in 0..100 {
            controller.handle_event(&InputEvent::Wheel { delta_y: 1.0 }, &mut state);
        }
        assert!((state.camera.focal_length - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_wheel_ignored() {
        let (mut controller, mut state) = setup();
        controller.handle_event(&InputEvent::Wheel { delta_y: 0.0 }, &mut state);
        assert_eq!(state.camera.focal_length, 0.3);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_resize_event_requests_depth() {
        let (mut controller, mut state) = setup();
        let realloc = controller.handle_event(
            &InputEvent::Resize {
                width: 640,
                height: 480,
            },
            &mut state,
        );
        assert_eq!(
            realloc,
            Some(Reallocation::Depth {
                width: 1280,
                height: 960
            })
        );
        assert!(state.dirty.refresh_depth);
    }
}
