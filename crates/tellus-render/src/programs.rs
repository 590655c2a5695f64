//! GPU program registry and the per-stage parameter contract.
//!
//! Each stage is a full-screen quad draw. Its scalar, vector and matrix
//! parameters travel in one uniform block (binding 0) whose layout mirrors the
//! WGSL struct of the same name; its images follow at bindings 1.. and a
//! filtering sampler comes last when any image is sampled.

use glam::{Mat3, Vec3};
use wgpu::util::DeviceExt;

use tellus_core::dirty::Pass;
use tellus_core::error::TellusError;
use tellus_core::state::SceneState;

use crate::targets::TARGET_FORMAT;

/// Full-screen quad, triangle strip.
pub const QUAD_VERTICES: [[f32; 2]; 4] = [[1.0, 1.0], [-1.0, 1.0], [1.0, -1.0], [-1.0, -1.0]];

/// WGSL `mat3x3<f32>` layout: three columns padded to 16 bytes.
pub fn mat3_columns(m: Mat3) -> [[f32; 4]; 3] {
    let c = m.to_cols_array_2d();
    [
        [c[0][0], c[0][1], c[0][2], 0.0],
        [c[1][0], c[1][1], c[1][2], 0.0],
        [c[2][0], c[2][1], c[2][2], 0.0],
    ]
}

fn vec3(v: Vec3) -> [f32; 3] {
    v.to_array()
}

/// Must match NoiseUniforms in noise.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NoiseUniforms {
    pub perlin_size: f32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub blur_radius: f32,
    pub differential: f32,
    pub exaggeration: f32,
    pub octaves: i32,
    pub _pad: f32,
}

impl From<&SceneState> for NoiseUniforms {
    fn from(state: &SceneState) -> Self {
        let noise = &state.noise;
        Self {
            perlin_size: noise.size as f32,
            persistence: noise.persistence,
            lacunarity: noise.lacunarity,
            blur_radius: noise.blur_radius,
            differential: noise.differential,
            exaggeration: noise.exaggeration,
            octaves: noise.octaves,
            _pad: 0.0,
        }
    }
}

/// Must match HeightmapUniforms in heightmap.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HeightmapUniforms {
    pub rotation: [[f32; 4]; 3],
    pub rotation_inverse: [[f32; 4]; 3],
    pub mouse_unit: [f32; 3],
    pub mouse_data: f32,
    pub mould: f32,
    pub smooth: u32,
    pub water_level: f32,
    pub last_water_level: f32,
}

impl From<&SceneState> for HeightmapUniforms {
    fn from(state: &SceneState) -> Self {
        Self {
            rotation: mat3_columns(state.camera.rotation()),
            rotation_inverse: mat3_columns(state.camera.rotation_inverse()),
            mouse_unit: vec3(state.hit.unit),
            mouse_data: state.hit.data,
            mould: state.sculpt.mould,
            smooth: state.sculpt.smooth as u32,
            water_level: state.planet.water_level,
            last_water_level: state.planet.last_water_level,
        }
    }
}

/// Must match IntersectionUniforms in intersection.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct IntersectionUniforms {
    pub rotation: [[f32; 4]; 3],
    pub up: [f32; 3],
    pub aspect_ratio: f32,
    pub right: [f32; 3],
    pub focal_length: f32,
    pub forward: [f32; 3],
    pub ray_march_stride: f32,
    pub origin: [f32; 3],
    pub planet_min_radius: f32,
    pub light: [f32; 3],
    pub planet_max_radius: f32,
    pub planet_origin: [f32; 3],
    pub planet_atmosphere_radius: f32,
    pub hit_accuracy: i32,
    pub shadows: u32,
    pub _pad: [u32; 2],
}

impl From<&SceneState> for IntersectionUniforms {
    fn from(state: &SceneState) -> Self {
        let camera = &state.camera;
        let planet = &state.planet;
        Self {
            rotation: mat3_columns(camera.rotation()),
            up: vec3(camera.up),
            aspect_ratio: camera.aspect_ratio,
            right: vec3(camera.right),
            focal_length: camera.focal_length,
            forward: vec3(camera.forward),
            ray_march_stride: state.render.ray_march_stride,
            origin: vec3(camera.origin),
            planet_min_radius: planet.min_radius,
            light: vec3(state.render.light_direction()),
            planet_max_radius: planet.max_radius,
            planet_origin: vec3(planet.origin),
            planet_atmosphere_radius: planet.atmosphere_radius,
            hit_accuracy: state.render.hit_accuracy,
            shadows: state.render.shadows as u32,
            _pad: [0; 2],
        }
    }
}

/// Must match CompositeUniforms in composite.wgsl.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CompositeUniforms {
    pub rotation: [[f32; 4]; 3],
    pub origin: [f32; 3],
    pub supersampling: u32,
    pub light: [f32; 3],
    pub mouse_data: f32,
    pub mouse_unit: [f32; 3],
    pub planet_min_radius: f32,
    pub planet_origin: [f32; 3],
    pub planet_max_radius: f32,
    pub canvas: [f32; 2],
    pub planet_atmosphere_radius: f32,
    pub _pad: f32,
}

impl From<&SceneState> for CompositeUniforms {
    fn from(state: &SceneState) -> Self {
        let camera = &state.camera;
        let planet = &state.planet;
        Self {
            rotation: mat3_columns(camera.rotation()),
            origin: vec3(camera.origin),
            supersampling: state.render.supersampling.max(1),
            light: vec3(state.render.light_direction()),
            mouse_data: state.hit.data,
            mouse_unit: vec3(state.hit.unit),
            planet_min_radius: planet.min_radius,
            planet_origin: vec3(planet.origin),
            planet_max_radius: planet.max_radius,
            canvas: [camera.canvas[0] as f32, camera.canvas[1] as f32],
            planet_atmosphere_radius: planet.atmosphere_radius,
            _pad: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Float,
    Int,
    Bool,
    Vec2,
    Vec3,
    Mat3,
}

/// One named scalar/vector/matrix parameter of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSlot {
    pub name: &'static str,
    pub kind: SlotKind,
}

/// One named image input of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSlot {
    pub name: &'static str,
    /// Sampled through the linear sampler rather than `textureLoad`.
    pub filterable: bool,
}

const fn slot(name: &'static str, kind: SlotKind) -> ParamSlot {
    ParamSlot { name, kind }
}

/// Static description of one pipeline stage.
#[derive(Debug)]
pub struct StageLayout {
    pub stage: Pass,
    pub label: &'static str,
    pub fragment: &'static str,
    pub params: &'static [ParamSlot],
    pub images: &'static [ImageSlot],
    pub uniform_size: usize,
}

impl StageLayout {
    pub fn needs_sampler(&self) -> bool {
        self.images.iter().any(|image| image.filterable)
    }

    /// Binding index of the sampler, after the images.
    pub fn sampler_binding(&self) -> u32 {
        self.images.len() as u32 + 1
    }

    pub fn binding_count(&self) -> usize {
        1 + self.images.len() + self.needs_sampler() as usize
    }
}

pub static NOISE_STAGE: StageLayout = StageLayout {
    stage: Pass::NoiseSynthesis,
    label: "noise",
    fragment: include_str!("../../../shaders/noise.wgsl"),
    params: &[
        slot("perlinSize", SlotKind::Float),
        slot("persistence", SlotKind::Float),
        slot("lacunarity", SlotKind::Float),
        slot("blurRadius", SlotKind::Float),
        slot("differential", SlotKind::Float),
        slot("exaggeration", SlotKind::Float),
        slot("octaves", SlotKind::Int),
    ],
    images: &[ImageSlot {
        name: "perlinGradients",
        filterable: false,
    }],
    uniform_size: std::mem::size_of::<NoiseUniforms>(),
};

pub static HEIGHTMAP_STAGE: StageLayout = StageLayout {
    stage: Pass::HeightmapEvolution,
    label: "heightmap",
    fragment: include_str!("../../../shaders/heightmap.wgsl"),
    params: &[
        slot("rotation", SlotKind::Mat3),
        slot("rotationInverse", SlotKind::Mat3),
        slot("mouseUnit", SlotKind::Vec3),
        slot("mouseData", SlotKind::Float),
        slot("mould", SlotKind::Float),
        slot("smooth", SlotKind::Bool),
        slot("waterLevel", SlotKind::Float),
        slot("lastWaterLevel", SlotKind::Float),
    ],
    images: &[ImageSlot {
        name: "heightmap",
        filterable: true,
    }],
    uniform_size: std::mem::size_of::<HeightmapUniforms>(),
};

pub static INTERSECTION_STAGE: StageLayout = StageLayout {
    stage: Pass::Intersection,
    label: "intersection",
    fragment: include_str!("../../../shaders/intersection.wgsl"),
    params: &[
        slot("rotation", SlotKind::Mat3),
        slot("up", SlotKind::Vec3),
        slot("right", SlotKind::Vec3),
        slot("forward", SlotKind::Vec3),
        slot("origin", SlotKind::Vec3),
        slot("light", SlotKind::Vec3),
        slot("aspectRatio", SlotKind::Float),
        slot("focalLength", SlotKind::Float),
        slot("rayMarchStride", SlotKind::Float),
        slot("hitAccuracy", SlotKind::Int),
        slot("shadows", SlotKind::Bool),
        slot("planetMinRadius", SlotKind::Float),
        slot("planetMaxRadius", SlotKind::Float),
        slot("planetAtmosphereRadius", SlotKind::Float),
        slot("planetOrigin", SlotKind::Vec3),
    ],
    images: &[ImageSlot {
        name: "heightmap",
        filterable: true,
    }],
    uniform_size: std::mem::size_of::<IntersectionUniforms>(),
};

pub static COMPOSITE_STAGE: StageLayout = StageLayout {
    stage: Pass::Composite,
    label: "composite",
    fragment: include_str!("../../../shaders/composite.wgsl"),
    params: &[
        slot("rotation", SlotKind::Mat3),
        slot("origin", SlotKind::Vec3),
        slot("light", SlotKind::Vec3),
        slot("mouseUnit", SlotKind::Vec3),
        slot("mouseData", SlotKind::Float),
        slot("canvas", SlotKind::Vec2),
        slot("supersampling", SlotKind::Int),
        slot("planetMinRadius", SlotKind::Float),
        slot("planetMaxRadius", SlotKind::Float),
        slot("planetAtmosphereRadius", SlotKind::Float),
        slot("planetOrigin", SlotKind::Vec3),
    ],
    images: &[
        ImageSlot {
            name: "depthmap",
            filterable: false,
        },
        ImageSlot {
            name: "heightmap",
            filterable: true,
        },
    ],
    uniform_size: std::mem::size_of::<CompositeUniforms>(),
};

/// Stage layouts in pass order.
pub static STAGES: [&StageLayout; 4] = [
    &NOISE_STAGE,
    &HEIGHTMAP_STAGE,
    &INTERSECTION_STAGE,
    &COMPOSITE_STAGE,
];

pub fn stage_layout(stage: Pass) -> &'static StageLayout {
    match stage {
        Pass::NoiseSynthesis => &NOISE_STAGE,
        Pass::HeightmapEvolution => &HEIGHTMAP_STAGE,
        Pass::Intersection => &INTERSECTION_STAGE,
        Pass::Composite => &COMPOSITE_STAGE,
    }
}

const QUAD_SHADER: &str = include_str!("../../../shaders/quad.wgsl");
const COMMON_SHADER: &str = include_str!("../../../shaders/common.wgsl");

/// A linked stage: pipeline, bind group layout and its uniform buffer.
pub struct Program {
    layout: &'static StageLayout,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: wgpu::Buffer,
}

impl Program {
    /// Compile both modules and link the pipeline. Validation failures are
    /// captured through error scopes and returned with their diagnostic text.
    pub async fn compile(
        device: &wgpu::Device,
        layout: &'static StageLayout,
        vertex_source: &str,
        fragment_source: &str,
        target_format: wgpu::TextureFormat,
    ) -> Result<Self, TellusError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad-vertex-shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(layout.label),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });
        if let Some(err) = device.pop_error_scope().await {
            return Err(TellusError::CompileError {
                stage: layout.label.to_string(),
                log: err.to_string(),
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let bind_group_layout = create_bind_group_layout(device, layout);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(layout.label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(layout.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x2,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });
        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(layout.label),
            size: layout.uniform_size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        if let Some(err) = device.pop_error_scope().await {
            return Err(TellusError::LinkError {
                stage: layout.label.to_string(),
                log: err.to_string(),
            });
        }

        log::debug!(
            "Linked {} program ({} params, {} images)",
            layout.label,
            layout.params.len(),
            layout.images.len()
        );

        Ok(Self {
            layout,
            pipeline,
            bind_group_layout,
            uniforms,
        })
    }

    pub fn stage(&self) -> Pass {
        self.layout.stage
    }

    pub fn layout(&self) -> &'static StageLayout {
        self.layout
    }

    /// Upload this stage's parameter block for the next draw.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, block: &[u8]) {
        debug_assert_eq!(block.len(), self.layout.uniform_size);
        queue.write_buffer(&self.uniforms, 0, block);
    }

    /// Bind group for one draw: the uniform block, `images` in slot order and,
    /// when the stage samples, `sampler`.
    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        images: &[&wgpu::TextureView],
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        debug_assert_eq!(images.len(), self.layout.images.len());
        let mut entries = Vec::with_capacity(self.layout.binding_count());
        entries.push(wgpu::BindGroupEntry {
            binding: 0,
            resource: self.uniforms.as_entire_binding(),
        });
        for (i, view) in images.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: i as u32 + 1,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        if self.layout.needs_sampler() {
            entries.push(wgpu::BindGroupEntry {
                binding: self.layout.sampler_binding(),
                resource: wgpu::BindingResource::Sampler(sampler),
            });
        }
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(self.layout.label),
            layout: &self.bind_group_layout,
            entries: &entries,
        })
    }

    /// Set pipeline and bind group. Nothing is retained between binds.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>, bind_group: &wgpu::BindGroup) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
    }
}

fn create_bind_group_layout(
    device: &wgpu::Device,
    layout: &StageLayout,
) -> wgpu::BindGroupLayout {
    let mut entries = Vec::with_capacity(layout.binding_count());
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    });
    for (i, image) in layout.images.iter().enumerate() {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: i as u32 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float {
                    filterable: image.filterable,
                },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
    }
    if layout.needs_sampler() {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: layout.sampler_binding(),
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(layout.label),
        entries: &entries,
    })
}

/// All four linked stages, indexed by [`Pass::index`], plus the shared quad.
pub struct ProgramRegistry {
    programs: [Program; 4],
    quad: wgpu::Buffer,
}

impl ProgramRegistry {
    /// Compile every stage. Offscreen stages draw into the float target
    /// format, composite into `surface_format`.
    pub async fn compile_all(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
    ) -> Result<Self, TellusError> {
        let mut programs = Vec::with_capacity(STAGES.len());
        for layout in STAGES {
            let fragment_source = format!("{COMMON_SHADER}\n{}", layout.fragment);
            let target_format = match layout.stage {
                Pass::Composite => surface_format,
                _ => TARGET_FORMAT,
            };
            let program =
                Program::compile(device, layout, QUAD_SHADER, &fragment_source, target_format)
                    .await?;
            programs.push(program);
        }

        let quad = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad-vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        log::info!("Compiled {} programs", programs.len());
        let programs: [Program; 4] = programs.try_into().map_err(|built: Vec<Program>| {
            TellusError::LinkError {
                stage: "registry".to_string(),
                log: format!("expected {} programs, built {}", STAGES.len(), built.len()),
            }
        })?;
        Ok(Self { programs, quad })
    }

    pub fn get(&self, stage: Pass) -> &Program {
        &self.programs[stage.index()]
    }

    pub fn quad(&self) -> &wgpu::Buffer {
        &self.quad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<NoiseUniforms>(), 32);
        assert_eq!(std::mem::size_of::<HeightmapUniforms>(), 128);
        assert_eq!(std::mem::size_of::<IntersectionUniforms>(), 160);
        assert_eq!(std::mem::size_of::<CompositeUniforms>(), 128);
        for layout in STAGES {
            assert_eq!(layout.uniform_size % 16, 0, "{} not 16-aligned", layout.label);
        }
    }

    #[test]
    fn test_mat3_columns_padded() {
        let m = Mat3::from_cols(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        assert_eq!(
            mat3_columns(m),
            [
                [1.0, 2.0, 3.0, 0.0],
                [4.0, 5.0, 6.0, 0.0],
                [7.0, 8.0, 9.0, 0.0]
            ]
        );
    }

    #[test]
    fn test_slot_tables_match_contract() {
        let names = |layout: &StageLayout| -> Vec<&'static str> {
            layout.params.iter().map(|s| s.name).collect()
        };
        assert_eq!(names(&NOISE_STAGE).len(), 7);
        assert_eq!(names(&HEIGHTMAP_STAGE).len(), 8);
        assert_eq!(names(&INTERSECTION_STAGE).len(), 15);
        assert_eq!(names(&COMPOSITE_STAGE).len(), 11);
        assert!(names(&HEIGHTMAP_STAGE).contains(&"rotationInverse"));
        assert!(names(&INTERSECTION_STAGE).contains(&"hitAccuracy"));
        assert_eq!(COMPOSITE_STAGE.images[0].name, "depthmap");
        assert_eq!(NOISE_STAGE.images[0].name, "perlinGradients");
    }

    #[test]
    fn test_binding_layout() {
        assert!(!NOISE_STAGE.needs_sampler());
        assert_eq!(NOISE_STAGE.binding_count(), 2);
        assert_eq!(HEIGHTMAP_STAGE.sampler_binding(), 2);
        assert_eq!(COMPOSITE_STAGE.sampler_binding(), 3);
        assert_eq!(COMPOSITE_STAGE.binding_count(), 4);
    }

    #[test]
    fn test_stage_order_matches_passes() {
        for (layout, pass) in STAGES.iter().zip(Pass::ORDER) {
            assert_eq!(layout.stage, pass);
            // Registry slots follow STAGES, so `get` finds each stage's program.
            assert_eq!(STAGES[pass.index()].stage, pass);
            assert_eq!(stage_layout(pass).label, layout.label);
        }
    }

    #[test]
    fn test_uniforms_from_state() {
        let mut state = SceneState::default();
        state.sculpt.mould = 0.1;
        state.sculpt.smooth = true;
        state.render.shadows = true;

        let heightmap = HeightmapUniforms::from(&state);
        assert_eq!(heightmap.mould, 0.1);
        assert_eq!(heightmap.smooth, 1);
        assert_eq!(heightmap.mouse_data, -1.0);
        assert_eq!(heightmap.water_level, 0.4);

        let intersection = IntersectionUniforms::from(&state);
        assert_eq!(intersection.shadows, 1);
        assert_eq!(intersection.hit_accuracy, 4);
        assert_eq!(intersection.planet_origin, [0.0, 0.0, 5.0]);
        assert_eq!(intersection.focal_length, 0.3);

        let noise = NoiseUniforms::from(&state);
        assert_eq!(noise.perlin_size, 2048.0);
        assert_eq!(noise.octaves, 7);

        let composite = CompositeUniforms::from(&state);
        assert_eq!(composite.supersampling, 2);
        assert_eq!(composite.canvas, [1.0, 1.0]);
    }

    #[test]
    fn test_quad_covers_clip_space() {
        let xs: Vec<f32> = QUAD_VERTICES.iter().map(|v| v[0]).collect();
        let ys: Vec<f32> = QUAD_VERTICES.iter().map(|v| v[1]).collect();
        for axis in [xs, ys] {
            assert!(axis.contains(&1.0) && axis.contains(&-1.0));
        }
    }
}
