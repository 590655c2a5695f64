pub mod debug;
pub mod menu;

use egui_wgpu::ScreenDescriptor;

/// egui context, its wgpu renderer and the per-frame input plumbing.
pub struct UiState {
    pub ctx: egui::Context,
    pub renderer: egui_wgpu::Renderer,
}

impl UiState {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, dpi_scale: f32) -> Self {
        let ctx = egui::Context::default();
        ctx.set_pixels_per_point(dpi_scale);
        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);
        Self { ctx, renderer }
    }

    pub fn screen_descriptor(&self, width: u32, height: u32) -> ScreenDescriptor {
        ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: self.ctx.pixels_per_point(),
        }
    }

    /// Whether a panel is under or holding the pointer, as of the last frame.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    /// Input for one egui pass over the whole surface.
    pub fn raw_input(
        screen: &ScreenDescriptor,
        events: Vec<egui::Event>,
        timestamp_ms: f64,
    ) -> egui::RawInput {
        let size = egui::vec2(
            screen.size_in_pixels[0] as f32 / screen.pixels_per_point,
            screen.size_in_pixels[1] as f32 / screen.pixels_per_point,
        );
        egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(egui::Pos2::ZERO, size)),
            time: Some(timestamp_ms / 1000.0),
            events,
            ..Default::default()
        }
    }
}
