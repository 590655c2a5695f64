use std::cell::RefCell;
use std::rc::Rc;

use tellus_core::interaction::InputEvent;
use wasm_bindgen::prelude::*;

/// Events queued by the DOM listeners, drained once per frame.
///
/// Scene events carry physical pixels; egui events carry CSS pixels (egui
/// points, since `pixels_per_point` is the device-pixel ratio).
pub struct InputQueue {
    dpi_scale: f32,
    scene: Vec<InputEvent>,
    egui: Vec<egui::Event>,
}

impl InputQueue {
    pub fn new(dpi_scale: f32) -> Self {
        Self {
            dpi_scale,
            scene: Vec::new(),
            egui: Vec::new(),
        }
    }

    pub fn drain(&mut self) -> (Vec<InputEvent>, Vec<egui::Event>) {
        (
            std::mem::take(&mut self.scene),
            std::mem::take(&mut self.egui),
        )
    }

    /// Queue a pointer event at `css`, canvas-relative CSS pixels. Positions
    /// outside the canvas are kept as they are (negative or past the edge).
    fn push_pointer(&mut self, css: egui::Pos2, buttons: u32, button: i16, kind: PointerKind) {
        let x = css.x * self.dpi_scale;
        let y = css.y * self.dpi_scale;

        match kind {
            PointerKind::Move => {
                self.scene.push(InputEvent::PointerMove { x, y, buttons });
                self.egui.push(egui::Event::PointerMoved(css));
            }
            PointerKind::Down | PointerKind::Up => {
                let pressed = kind == PointerKind::Down;
                self.scene.push(if pressed {
                    InputEvent::PointerDown { x, y, buttons }
                } else {
                    InputEvent::PointerUp { x, y, buttons }
                });
                if let Some(button) = egui_button(button) {
                    self.egui.push(egui::Event::PointerButton {
                        pos: css,
                        button,
                        pressed,
                        modifiers: egui::Modifiers::default(),
                    });
                }
            }
        }
    }

    fn push_wheel(&mut self, e: &web_sys::WheelEvent) {
        let delta_y = e.delta_y() as f32;
        self.scene.push(InputEvent::Wheel { delta_y });
        let unit = if e.delta_mode() == 1 {
            egui::MouseWheelUnit::Line
        } else {
            egui::MouseWheelUnit::Point
        };
        self.egui.push(egui::Event::MouseWheel {
            unit,
            delta: egui::vec2(-e.delta_x() as f32, -delta_y),
            modifiers: egui::Modifiers::default(),
        });
    }

    fn push_resize(&mut self, width: u32, height: u32) {
        self.scene.push(InputEvent::Resize { width, height });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PointerKind {
    Move,
    Down,
    Up,
}

/// DOM `MouseEvent.button` to egui's button.
fn egui_button(button: i16) -> Option<egui::PointerButton> {
    match button {
        0 => Some(egui::PointerButton::Primary),
        1 => Some(egui::PointerButton::Middle),
        2 => Some(egui::PointerButton::Secondary),
        _ => None,
    }
}

/// Client (viewport) coordinates relative to the canvas box's top-left corner.
fn canvas_relative(client_x: i32, client_y: i32, left: f64, top: f64) -> egui::Pos2 {
    egui::pos2(
        (client_x as f64 - left) as f32,
        (client_y as f64 - top) as f32,
    )
}

/// Whether a queued event reaches the interaction controller.
///
/// While egui owns the pointer, moves, presses and wheel steps stay in the
/// panels. Releases always pass so a drag that ends over a panel still ends.
pub fn reaches_scene(event: &InputEvent, egui_wants_pointer: bool) -> bool {
    match event {
        InputEvent::PointerUp { .. } | InputEvent::Resize { .. } => true,
        InputEvent::PointerMove { .. }
        | InputEvent::PointerDown { .. }
        | InputEvent::Wheel { .. } => !egui_wants_pointer,
    }
}

/// Canvas backing-store size for its CSS box at `dpi_scale`.
pub fn physical_size(canvas: &web_sys::HtmlCanvasElement, dpi_scale: f32) -> (u32, u32) {
    let width = (canvas.client_width() as f32 * dpi_scale) as u32;
    let height = (canvas.client_height() as f32 * dpi_scale) as u32;
    (width.max(1), height.max(1))
}

/// Register pointer, wheel and resize listeners once at init.
/// Closures are leaked via `.forget()` since they live for the app lifetime.
///
/// Presses start on the canvas; moves and releases are taken from the window
/// so a drag that leaves the canvas keeps tracking and still ends.
pub fn register_input_listeners(
    canvas: &web_sys::HtmlCanvasElement,
    queue: Rc<RefCell<InputQueue>>,
) {
    let target: &web_sys::EventTarget = canvas.as_ref();
    let window = web_sys::window();

    for (event_name, kind) in [
        ("mousemove", PointerKind::Move),
        ("mousedown", PointerKind::Down),
        ("mouseup", PointerKind::Up),
    ] {
        let queue = queue.clone();
        let canvas_box = canvas.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                if kind == PointerKind::Down && e.button() == 1 {
                    // Keep middle-drag from starting autoscroll.
                    e.prevent_default();
                }
                let rect = canvas_box.get_bounding_client_rect();
                let css = canvas_relative(e.client_x(), e.client_y(), rect.left(), rect.top());
                queue
                    .borrow_mut()
                    .push_pointer(css, e.buttons() as u32, e.button(), kind);
            });
        let listener: Option<&web_sys::EventTarget> = match (kind, &window) {
            (PointerKind::Down, _) => Some(target),
            (_, Some(window)) => Some(AsRef::<web_sys::EventTarget>::as_ref(window)),
            (_, None) => None,
        };
        match listener {
            Some(listener) => listener
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
                .unwrap_or_else(|_| log::error!("failed to add {event_name} listener")),
            None => log::error!("no window for {event_name} listener"),
        }
        closure.forget();
    }

    // wheel (zoom)
    {
        let queue = queue.clone();
        let closure =
            Closure::<dyn FnMut(web_sys::WheelEvent)>::new(move |e: web_sys::WheelEvent| {
                e.prevent_default();
                queue.borrow_mut().push_wheel(&e);
            });
        // Non-passive so preventDefault works.
        let options = web_sys::AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .unwrap_or_else(|_| log::error!("failed to add wheel listener"));
        closure.forget();
    }

    // contextmenu: right button sculpts
    {
        let closure =
            Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
                e.prevent_default();
            });
        target
            .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
            .unwrap_or_else(|_| log::error!("failed to add contextmenu listener"));
        closure.forget();
    }

    // window resize: resize the backing store, then let the frame reallocate
    if let Some(window) = window {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_e: web_sys::Event| {
            let dpi_scale = web_sys::window()
                .map(|w| w.device_pixel_ratio() as f32)
                .unwrap_or(1.0);
            let (width, height) = physical_size(&canvas, dpi_scale);
            canvas.set_width(width);
            canvas.set_height(height);
            let mut queue = queue.borrow_mut();
            queue.dpi_scale = dpi_scale;
            queue.push_resize(width, height);
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .unwrap_or_else(|_| log::error!("failed to add resize listener"));
        closure.forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_always_reaches_scene() {
        let up = InputEvent::PointerUp {
            x: 1.0,
            y: 2.0,
            buttons: 0,
        };
        assert!(reaches_scene(&up, true));
        assert!(reaches_scene(&up, false));
    }

    #[test]
    fn test_panel_captures_pointer() {
        let down = InputEvent::PointerDown {
            x: 1.0,
            y: 2.0,
            buttons: 4,
        };
        let wheel = InputEvent::Wheel { delta_y: 3.0 };
        assert!(!reaches_scene(&down, true));
        assert!(!reaches_scene(&wheel, true));
        assert!(reaches_scene(&down, false));
        assert!(reaches_scene(&wheel, false));
    }

    #[test]
    fn test_resize_ignores_panels() {
        let resize = InputEvent::Resize {
            width: 10,
            height: 10,
        };
        assert!(reaches_scene(&resize, true));
    }

    #[test]
    fn test_egui_button_mapping() {
        assert_eq!(egui_button(0), Some(egui::PointerButton::Primary));
        assert_eq!(egui_button(1), Some(egui::PointerButton::Middle));
        assert_eq!(egui_button(2), Some(egui::PointerButton::Secondary));
        assert_eq!(egui_button(3), None);
    }

    #[test]
    fn test_canvas_relative_outside_box() {
        let inside = canvas_relative(130, 90, 100.0, 50.0);
        assert_eq!(inside, egui::pos2(30.0, 40.0));

        // Released left of and above the canvas.
        let outside = canvas_relative(60, 20, 100.0, 50.0);
        assert_eq!(outside, egui::pos2(-40.0, -30.0));
    }

    #[test]
    fn test_release_outside_canvas_queued() {
        let mut queue = InputQueue::new(2.0);
        queue.push_pointer(egui::pos2(10.0, 10.0), 1, 0, PointerKind::Down);
        queue.push_pointer(egui::pos2(-40.0, 5.0), 0, 0, PointerKind::Up);

        let (scene, egui_events) = queue.drain();
        assert_eq!(
            scene,
            vec![
                InputEvent::PointerDown {
                    x: 20.0,
                    y: 20.0,
                    buttons: 1,
                },
                InputEvent::PointerUp {
                    x: -80.0,
                    y: 10.0,
                    buttons: 0,
                },
            ]
        );
        assert!(matches!(
            egui_events.last(),
            Some(egui::Event::PointerButton { pressed: false, .. })
        ));
        assert!(reaches_scene(&scene[1], true));
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = InputQueue::new(2.0);
        queue.push_resize(4, 4);
        let (scene, egui_events) = queue.drain();
        assert_eq!(scene.len(), 1);
        assert!(egui_events.is_empty());
        assert!(queue.drain().0.is_empty());
    }
}
