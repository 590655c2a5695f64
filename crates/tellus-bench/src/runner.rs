use std::time::Instant;

use tellus_core::config::ViewerConfig;
use tellus_core::dirty::Pass;
use tellus_core::error::TellusError;
use tellus_core::interaction::InteractionController;
use tellus_core::state::SceneState;
use tellus_render::{plan_frame, PlanetRenderer};

use crate::scenes::{SceneConfig, BENCH_HEIGHT, BENCH_WIDTH};

const BENCH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const BENCH_SEED: u64 = 0x7e11;
/// Fixed tick length fed to the interaction controller.
const TICK_SECS: f32 = 1.0 / 60.0;

/// Timing data for a single benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimingSeries {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// Result of a single scene benchmark.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BenchmarkResult {
    pub scene_name: String,
    pub heightmap_size: [u32; 2],
    pub tick_count: u32,
    /// Ticks that ran more than the composite pass.
    pub heavy_ticks: u32,
    pub timings: TimingSeries,
}

/// Runs scenes on a native GPU against an offscreen target.
pub struct BenchmarkRunner {
    device: wgpu::Device,
    queue: wgpu::Queue,
    tick_count: u32,
    config: ViewerConfig,
}

impl BenchmarkRunner {
    /// Initialize wgpu natively. Blocks on the async adapter request.
    pub fn new(tick_count: u32, config: ViewerConfig) -> Result<Self, TellusError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| TellusError::AdapterNotFound("no suitable GPU adapter found".into()))?;

        log::info!("Benchmark adapter: {}", adapter.get_info().name);

        let required = wgpu::Features::FLOAT32_FILTERABLE;
        if !adapter.features().contains(required) {
            return Err(TellusError::UnsupportedFeature(format!(
                "adapter lacks {required:?}"
            )));
        }

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("bench-device"),
                required_features: required,
                required_limits: adapter.limits(),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))
        .map_err(|e| TellusError::DeviceRequestFailed(format!("{e}")))?;

        Ok(Self {
            device,
            queue,
            tick_count,
            config,
        })
    }

    /// Run one scene from a fresh state and time every tick, submit to idle.
    pub fn run_scene(&self, scene: &SceneConfig) -> Result<BenchmarkResult, TellusError> {
        log::info!("Running scene '{}'...", scene.name);

        let mut state = SceneState::default();
        state.max_target_dimension = self.device.limits().max_texture_dimension_2d;
        state.resize(BENCH_WIDTH, BENCH_HEIGHT);
        let mut renderer = pollster::block_on(PlanetRenderer::new(
            &self.device,
            &self.queue,
            BENCH_FORMAT,
            &state,
            BENCH_SEED,
        ))?;
        let mut controller = InteractionController::new(self.config.interaction);
        let view = offscreen_view(&self.device);

        let mut frame_times = Vec::with_capacity(self.tick_count as usize);
        let mut heavy_ticks = 0;

        for tick in 0..self.tick_count {
            let frame_start = Instant::now();

            if let Some(hit) = renderer.poll_pointer(&self.device) {
                state.hit = hit;
            }
            for event in scene.events_for_tick(tick) {
                if let Some(realloc) = controller.handle_event(&event, &mut state) {
                    renderer.apply_reallocation(&self.device, &self.queue, realloc);
                }
            }
            if let Some(realloc) = scene.before_tick(tick, &mut state) {
                renderer.apply_reallocation(&self.device, &self.queue, realloc);
            }
            controller.update(&mut state, TICK_SECS);

            let plan = plan_frame(&mut state);
            if plan.passes() != [Pass::Composite] {
                heavy_ticks += 1;
            }

            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("bench-encoder"),
                });
            renderer.execute(
                &self.device,
                &self.queue,
                &mut encoder,
                &plan,
                &view,
                Some(controller.pointer()),
                state.render.supersampling,
            );
            self.queue.submit(std::iter::once(encoder.finish()));
            renderer.finish_frame();
            self.device.poll(wgpu::Maintain::Wait);

            frame_times.push(frame_start.elapsed().as_secs_f64() * 1000.0);
        }

        let timings = compute_timings(&frame_times);
        log::info!(
            "  Done: mean={:.2}ms, p95={:.2}ms, p99={:.2}ms, heavy ticks={}",
            timings.mean_ms,
            timings.p95_ms,
            timings.p99_ms,
            heavy_ticks
        );

        Ok(BenchmarkResult {
            scene_name: scene.name.to_string(),
            heightmap_size: [state.noise.width, state.noise.height],
            tick_count: self.tick_count,
            heavy_ticks,
            timings,
        })
    }
}

/// Composite target standing in for the swapchain.
fn offscreen_view(device: &wgpu::Device) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("bench-offscreen"),
        size: wgpu::Extent3d {
            width: BENCH_WIDTH,
            height: BENCH_HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: BENCH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Timing statistics from frame times in milliseconds.
pub fn compute_timings(times: &[f64]) -> TimingSeries {
    if times.is_empty() {
        return TimingSeries {
            mean_ms: 0.0,
            median_ms: 0.0,
            p95_ms: 0.0,
            p99_ms: 0.0,
            min_ms: 0.0,
            max_ms: 0.0,
        };
    }

    let mut sorted = times.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let percentile = |p: f64| sorted[(((n as f64) * p).ceil() as usize).min(n - 1)];

    TimingSeries {
        mean_ms: mean,
        median_ms: median,
        p95_ms: percentile(0.95),
        p99_ms: percentile(0.99),
        min_ms: sorted[0],
        max_ms: sorted[n - 1],
    }
}
