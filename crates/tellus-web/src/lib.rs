mod app;
mod gpu;
mod input;
pub mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use tellus_core::config::ViewerConfig;
use tellus_core::error::TellusError;
use tellus_core::state::SceneState;
use tellus_render::PlanetRenderer;
use wasm_bindgen::prelude::*;

const CANVAS_ID: &str = "tellus-canvas";
const VIEWER_CONFIG: &str = include_str!("../../../config/viewer.ron");

/// WASM entry point. Sets the panic hook and initializes logging.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("logger init failed");
    log::info!("Tellus starting...");

    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = run().await {
            show_error_to_user(&format!("{e}"));
        }
    });
}

/// Async initialization: canvas sizing, listeners, device, programs, loop.
async fn run() -> Result<(), TellusError> {
    let window = web_sys::window().expect("no global window");
    let document = window.document().expect("no document");

    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .expect("canvas element not found")
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .expect("element is not a canvas");

    let dpi_scale = window.device_pixel_ratio() as f32;
    let (physical_width, physical_height) = input::physical_size(&canvas, dpi_scale);
    canvas.set_width(physical_width);
    canvas.set_height(physical_height);

    log::info!(
        "Canvas: {}x{} physical (DPI: {:.2})",
        physical_width,
        physical_height,
        dpi_scale
    );

    let config = ViewerConfig::from_ron_str_or_default(VIEWER_CONFIG);

    // Listeners are registered once and live for the page.
    let queue = Rc::new(RefCell::new(input::InputQueue::new(dpi_scale)));
    input::register_input_listeners(&canvas, queue.clone());

    let gpu_ctx = gpu::init_gpu(canvas, physical_width, physical_height).await?;

    let mut state = SceneState::default();
    state.max_target_dimension = gpu_ctx.device.limits().max_texture_dimension_2d;
    state.resize(physical_width, physical_height);

    let seed = js_sys::Date::now() as u64;
    let renderer = PlanetRenderer::new(
        &gpu_ctx.device,
        &gpu_ctx.queue,
        gpu_ctx.surface_format,
        &state,
        seed,
    )
    .await?;

    let application =
        app::Application::new(gpu_ctx, renderer, state, &config, dpi_scale, queue);
    app::Application::start_loop(Rc::new(RefCell::new(application)));

    Ok(())
}

/// Surface a fatal error in the page, not just the console.
fn show_error_to_user(msg: &str) {
    log::error!("{msg}");
    let window = web_sys::window().expect("no global window");
    let _ = window.alert_with_message(&format!("Tellus Error: {msg}"));
}
