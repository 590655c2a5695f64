use std::cell::RefCell;
use std::rc::Rc;

use tellus_core::config::ViewerConfig;
use tellus_core::interaction::{InputEvent, InteractionController};
use tellus_core::state::{Reallocation, SceneState};
use tellus_core::timing::FrameTimer;
use tellus_render::{plan_frame, PlanetRenderer};
use wasm_bindgen::prelude::*;

use crate::gpu::GpuContext;
use crate::input::{self, InputQueue};
use crate::ui::debug::DebugPanel;
use crate::ui::menu::MenuPanel;
use crate::ui::UiState;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Owns the GPU context, scene state and every per-frame subsystem.
pub struct Application {
    gpu: GpuContext,
    ui_state: UiState,
    renderer: PlanetRenderer,
    state: SceneState,
    controller: InteractionController,
    timer: FrameTimer,
    input: Rc<RefCell<InputQueue>>,
    menu: MenuPanel,
    debug_panel: DebugPanel,
}

impl Application {
    pub fn new(
        gpu: GpuContext,
        renderer: PlanetRenderer,
        state: SceneState,
        config: &ViewerConfig,
        dpi_scale: f32,
        input: Rc<RefCell<InputQueue>>,
    ) -> Self {
        let ui_state = UiState::new(&gpu.device, gpu.surface_format, dpi_scale);
        let debug_panel = DebugPanel::new(gpu.adapter_name.clone(), gpu.backend.clone());

        Self {
            gpu,
            ui_state,
            renderer,
            state,
            controller: InteractionController::new(config.interaction),
            timer: FrameTimer::new(config.frame_window),
            input,
            menu: MenuPanel::new(),
            debug_panel,
        }
    }

    /// Start the requestAnimationFrame loop. The closure is created once.
    pub fn start_loop(app: Rc<RefCell<Self>>) {
        let closure: RafClosure = Rc::new(RefCell::new(None));
        let closure_clone = closure.clone();

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            // Every callback renders and drains input; long gaps only cap the
            // elapsed time (see `FrameTimer::record`).
            app.borrow_mut().render_frame(timestamp);
            request_frame(&closure_clone);
        }) as Box<dyn FnMut(f64)>));

        request_frame(&closure);
    }

    /// Route queued input: viewport changes reconfigure the surface, the rest
    /// goes to the controller unless a panel holds the pointer.
    fn drain_input(&mut self, egui_wants_pointer: bool) -> Vec<egui::Event> {
        let (events, egui_events) = self.input.borrow_mut().drain();
        for event in &events {
            if !input::reaches_scene(event, egui_wants_pointer) {
                continue;
            }
            if let InputEvent::Resize { width, height } = *event {
                self.gpu.resize(width, height);
            }
            if let Some(realloc) = self.controller.handle_event(event, &mut self.state) {
                self.reallocate(realloc);
            }
        }
        egui_events
    }

    fn reallocate(&mut self, realloc: Reallocation) {
        log::info!("Reallocating targets: {realloc:?}");
        self.renderer
            .apply_reallocation(&self.gpu.device, &self.gpu.queue, realloc);
    }

    /// Run one tick.
    fn render_frame(&mut self, timestamp: f64) {
        let elapsed = self.timer.record(timestamp);

        if let Some(hit) = self.renderer.poll_pointer(&self.gpu.device) {
            self.state.hit = hit;
        }

        // Before acquiring: a resize reconfigures the surface.
        let egui_events = self.drain_input(self.ui_state.wants_pointer());

        // Acquire before planning so a lost surface doesn't consume dirty flags.
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                return;
            }
            Err(e) => {
                log::error!("Surface error: {e:?}");
                return;
            }
        };
        let view = output.texture.create_view(&Default::default());

        let screen = self
            .ui_state
            .screen_descriptor(self.gpu.surface_config.width, self.gpu.surface_config.height);
        let raw_input = UiState::raw_input(&screen, egui_events, timestamp);

        let mut reallocations = Vec::new();
        let full_output = {
            let Application {
                ui_state,
                menu,
                debug_panel,
                state,
                timer,
                ..
            } = self;
            ui_state.ctx.run(raw_input, |ctx| {
                reallocations = menu.show(ctx, state);
                debug_panel.show(ctx, timer, state);
            })
        };
        for realloc in reallocations {
            self.reallocate(realloc);
        }

        self.controller.update(&mut self.state, elapsed);
        let plan = plan_frame(&mut self.state);

        let Application {
            gpu,
            ui_state,
            renderer,
            state,
            controller,
            ..
        } = self;

        let clipped_primitives = ui_state
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        // 1. Planet passes, composite straight onto the surface
        renderer.execute(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &plan,
            &view,
            Some(controller.pointer()),
            state.render.supersampling,
        );

        // 2. Upload egui textures and update buffers
        for (id, delta) in &full_output.textures_delta.set {
            ui_state
                .renderer
                .update_texture(&gpu.device, &gpu.queue, *id, delta);
        }
        ui_state.renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &clipped_primitives,
            &screen,
        );

        // 3. egui pass on top of the composite
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui-pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                })
                .forget_lifetime();
            ui_state
                .renderer
                .render(&mut pass, &clipped_primitives, &screen);
        }

        for id in &full_output.textures_delta.free {
            ui_state.renderer.free_texture(id);
        }

        // 4. Submit, start the pointer map, present
        gpu.queue.submit(std::iter::once(encoder.finish()));
        renderer.finish_frame();
        output.present();
    }
}

fn request_frame(closure: &RafClosure) {
    let window = web_sys::window().expect("no global window");
    window
        .request_animation_frame(
            closure
                .borrow()
                .as_ref()
                .expect("rAF closure missing")
                .as_ref()
                .unchecked_ref(),
        )
        .expect("rAF registration failed");
}
