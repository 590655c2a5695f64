use rand::rngs::SmallRng;
use rand::SeedableRng;

use tellus_core::error::TellusError;
use tellus_core::gradient::generate_gradient_field;
use tellus_core::state::{PointerHit, Reallocation, SceneState};

use crate::programs::{Program, ProgramRegistry};
use crate::readback::{readback_texel, PointerReadback};
use crate::schedule::{FramePlan, PassStep};
use crate::targets::{FrameTargets, TargetKind, TEXEL_BYTES};

/// Owns every GPU resource of the planet pipeline and encodes one tick's
/// passes from a [`FramePlan`].
pub struct PlanetRenderer {
    programs: ProgramRegistry,
    targets: FrameTargets,
    readback: PointerReadback,
    heightmap_sampler: wgpu::Sampler,
    rng: SmallRng,
}

impl PlanetRenderer {
    /// Compile all programs, allocate the startup targets and upload the first
    /// gradient field. `seed` drives the gradient draws.
    pub async fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        state: &SceneState,
        seed: u64,
    ) -> Result<Self, TellusError> {
        let programs = ProgramRegistry::compile_all(device, surface_format).await?;
        let targets = FrameTargets::new(device, state)?;
        let readback = PointerReadback::new(device);

        let filter = TargetKind::Heightmap.filter();
        let heightmap_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("heightmap-sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: filter,
            min_filter: filter,
            ..Default::default()
        });

        let mut renderer = Self {
            programs,
            targets,
            readback,
            heightmap_sampler,
            rng: SmallRng::seed_from_u64(seed),
        };
        renderer.upload_gradient(queue);
        Ok(renderer)
    }

    /// Recreate targets after a resize, supersampling change or regeneration.
    /// A rejected request keeps the previous targets.
    pub fn apply_reallocation(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        realloc: Reallocation,
    ) {
        if let Err(e) = self.targets.apply(device, realloc) {
            log::error!("{e}; keeping previous targets");
            return;
        }
        if matches!(realloc, Reallocation::Heightmap { .. }) {
            self.upload_gradient(queue);
        }
    }

    fn upload_gradient(&mut self, queue: &wgpu::Queue) {
        let gradient = self.targets.gradient();
        let (size, _) = gradient.extent();
        let field = generate_gradient_field(size, &mut self.rng);
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: gradient.texture(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&field),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size * TEXEL_BYTES),
                rows_per_image: Some(size),
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Encode the planned passes in order, then the pointer texel copy.
    /// `pointer` is the viewport position to resolve, if any.
    pub fn execute(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        plan: &FramePlan,
        surface_view: &wgpu::TextureView,
        pointer: Option<(f32, f32)>,
        supersampling: u32,
    ) {
        for step in &plan.steps {
            let program = self.programs.get(step.pass());
            program.write_uniforms(queue, step.uniform_bytes());

            match step {
                PassStep::Noise(_) => {
                    let pair = self.targets.heightmap();
                    let bind_group = program.bind_group(
                        device,
                        &[self.targets.gradient().view()],
                        &self.heightmap_sampler,
                    );
                    if let Some(target) = pair.latest().attachment() {
                        self.draw(encoder, program, &bind_group, target);
                    }
                }
                PassStep::Heightmap(_) => {
                    let pair = self.targets.heightmap();
                    let bind_group = program.bind_group(
                        device,
                        &[pair.latest().view()],
                        &self.heightmap_sampler,
                    );
                    if let Some(target) = pair.oldest().attachment() {
                        self.draw(encoder, program, &bind_group, target);
                    }
                    self.targets.flip_heightmap();
                }
                PassStep::Intersection(_) => {
                    let bind_group = program.bind_group(
                        device,
                        &[self.targets.heightmap().latest().view()],
                        &self.heightmap_sampler,
                    );
                    if let Some(target) = self.targets.depth().attachment() {
                        self.draw(encoder, program, &bind_group, target);
                    }
                }
                PassStep::Composite(_) => {
                    let bind_group = program.bind_group(
                        device,
                        &[
                            self.targets.depth().view(),
                            self.targets.heightmap().latest().view(),
                        ],
                        &self.heightmap_sampler,
                    );
                    self.draw(encoder, program, &bind_group, surface_view);
                }
            }
        }

        let texel = pointer.and_then(|(x, y)| {
            readback_texel(x, y, supersampling, self.targets.depth().extent())
        });
        if let Some(texel) = texel {
            self.readback.request(encoder, self.targets.depth(), texel);
        }
    }

    fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        program: &Program,
        bind_group: &wgpu::BindGroup,
        target: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(program.layout().label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        program.bind(&mut pass, bind_group);
        pass.set_vertex_buffer(0, self.programs.quad().slice(..));
        pass.draw(0..4, 0..1);
    }

    /// Call after the tick's command buffer has been submitted.
    pub fn finish_frame(&mut self) {
        self.readback.begin_map();
    }

    /// Non-blocking poll of last tick's pointer texel.
    pub fn poll_pointer(&mut self, device: &wgpu::Device) -> Option<PointerHit> {
        self.readback.poll(device).map(PointerHit::from_texel)
    }

    pub fn targets(&self) -> &FrameTargets {
        &self.targets
    }
}
