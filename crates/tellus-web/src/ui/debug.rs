use tellus_core::{FrameTimer, SceneState};

/// Stats panel: adapter, frame timing and the point under the pointer.
pub struct DebugPanel {
    adapter_name: String,
    backend: String,
}

impl DebugPanel {
    pub fn new(adapter_name: String, backend: String) -> Self {
        Self {
            adapter_name,
            backend,
        }
    }

    pub fn show(&self, ctx: &egui::Context, timer: &FrameTimer, state: &SceneState) {
        egui::Window::new("Stats")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-8.0, 8.0))
            .default_open(true)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(&self.adapter_name);
                ui.label(&self.backend);
                ui.separator();
                ui.label(format!("{:.2} ms", timer.average_frame_time_ms()));
                ui.label(format!("{:.0} FPS", timer.fps()));
                ui.separator();
                let hit = &state.hit;
                if hit.is_hit() {
                    ui.label(format!(
                        "Hit: ({:.3}, {:.3}, {:.3}) at {:.3}",
                        hit.unit.x, hit.unit.y, hit.unit.z, hit.data
                    ));
                } else {
                    ui.label("Hit: none");
                }
                ui.label(format!("Focal length: {:.3}", state.camera.focal_length));
                ui.label(format!(
                    "Heightmap: {}x{}",
                    state.noise.width, state.noise.height
                ));
                let (w, h) = state.depth_extent();
                ui.label(format!("Depth target: {w}x{h}"));
            });
    }
}
