//! Render-target manager: gradient field, heightmap ping-pong pair and the
//! depth/readback target.

use tellus_core::error::TellusError;
use tellus_core::state::{Reallocation, SceneState};

/// Every target stores four 32-bit floats per texel.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

/// Bytes per texel of [`TARGET_FORMAT`].
pub const TEXEL_BYTES: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Uploaded from the CPU, read with nearest lookups by the noise pass.
    GradientSource,
    /// Linear-filtered, drawn into by the noise and evolution passes.
    Heightmap,
    /// Nearest, drawn into by the intersection pass, source of the pointer copy.
    DepthReadback,
}

impl TargetKind {
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::GradientSource => "gradient-field",
            TargetKind::Heightmap => "heightmap",
            TargetKind::DepthReadback => "depth-readback",
        }
    }

    pub fn usage(self) -> wgpu::TextureUsages {
        match self {
            TargetKind::GradientSource => {
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST
            }
            TargetKind::Heightmap => {
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::RENDER_ATTACHMENT
            }
            TargetKind::DepthReadback => {
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::COPY_SRC
            }
        }
    }

    /// Filter used when this kind is sampled.
    pub fn filter(self) -> wgpu::FilterMode {
        match self {
            TargetKind::Heightmap => wgpu::FilterMode::Linear,
            TargetKind::GradientSource | TargetKind::DepthReadback => wgpu::FilterMode::Nearest,
        }
    }

    pub fn is_drawable(self) -> bool {
        self.usage().contains(wgpu::TextureUsages::RENDER_ATTACHMENT)
    }
}

/// Kind and extent of a target, checked before any GPU allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSpec {
    pub kind: TargetKind,
    pub width: u32,
    pub height: u32,
}

impl TargetSpec {
    pub fn new(kind: TargetKind, width: u32, height: u32) -> Self {
        Self {
            kind,
            width,
            height,
        }
    }

    /// Reject empty extents and extents past the device limit.
    pub fn check(&self, max_dimension: u32) -> Result<(), TellusError> {
        if self.width == 0 || self.height == 0 {
            return Err(TellusError::TargetAllocation(format!(
                "{} has empty extent {}x{}",
                self.kind.label(),
                self.width,
                self.height
            )));
        }
        if self.width > max_dimension || self.height > max_dimension {
            return Err(TellusError::TargetAllocation(format!(
                "{} extent {}x{} exceeds device limit {max_dimension}",
                self.kind.label(),
                self.width,
                self.height
            )));
        }
        Ok(())
    }

    /// Targets a reallocation recreates, in allocation order.
    pub fn for_reallocation(realloc: Reallocation) -> Vec<TargetSpec> {
        match realloc {
            Reallocation::Depth { width, height } => {
                vec![TargetSpec::new(TargetKind::DepthReadback, width, height)]
            }
            Reallocation::Heightmap {
                gradient_size,
                width,
                height,
            } => vec![
                TargetSpec::new(TargetKind::GradientSource, gradient_size, gradient_size),
                TargetSpec::new(TargetKind::Heightmap, width, height),
                TargetSpec::new(TargetKind::Heightmap, width, height),
            ],
        }
    }
}

/// One GPU image plus, for drawable kinds, its attachment view.
pub struct RenderTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    spec: TargetSpec,
}

impl RenderTarget {
    pub fn allocate(device: &wgpu::Device, spec: TargetSpec) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(spec.kind.label()),
            size: wgpu::Extent3d {
                width: spec.width,
                height: spec.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: spec.kind.usage(),
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            spec,
        }
    }

    /// Free the GPU image now rather than when the last handle drops.
    pub fn release(self) {
        self.texture.destroy();
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// View for sampling in a later pass.
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// Render-target view, `None` for upload-only kinds.
    pub fn attachment(&self) -> Option<&wgpu::TextureView> {
        self.spec.kind.is_drawable().then_some(&self.view)
    }

    pub fn spec(&self) -> TargetSpec {
        self.spec
    }

    pub fn extent(&self) -> (u32, u32) {
        (self.spec.width, self.spec.height)
    }
}

/// Two-slot arena whose roles are swapped by index, never by copying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingPong<T> {
    entries: [T; 2],
    latest: usize,
}

impl<T> PingPong<T> {
    /// `first` starts as the latest entry.
    pub fn new(first: T, second: T) -> Self {
        Self {
            entries: [first, second],
            latest: 0,
        }
    }

    pub fn latest(&self) -> &T {
        &self.entries[self.latest]
    }

    pub fn oldest(&self) -> &T {
        &self.entries[1 - self.latest]
    }

    pub fn latest_index(&self) -> usize {
        self.latest
    }

    pub fn oldest_index(&self) -> usize {
        1 - self.latest
    }

    /// The entry written last becomes `oldest` and vice versa.
    pub fn flip(&mut self) {
        self.latest = 1 - self.latest;
    }

    pub fn into_entries(self) -> [T; 2] {
        self.entries
    }
}

/// All render targets the pipeline draws through.
pub struct FrameTargets {
    gradient: RenderTarget,
    heightmap: PingPong<RenderTarget>,
    depth: RenderTarget,
    max_dimension: u32,
}

impl FrameTargets {
    /// Allocate the startup set. Any extent past the device limit is fatal.
    pub fn new(device: &wgpu::Device, state: &SceneState) -> Result<Self, TellusError> {
        let max_dimension = device.limits().max_texture_dimension_2d;

        let heightmap_specs = TargetSpec::for_reallocation(state.heightmap_reallocation());
        let depth_specs = TargetSpec::for_reallocation(state.depth_reallocation());
        for spec in heightmap_specs.iter().chain(depth_specs.iter()) {
            spec.check(max_dimension)?;
        }

        let gradient = RenderTarget::allocate(device, heightmap_specs[0]);
        let heightmap = PingPong::new(
            RenderTarget::allocate(device, heightmap_specs[1]),
            RenderTarget::allocate(device, heightmap_specs[2]),
        );
        let depth = RenderTarget::allocate(device, depth_specs[0]);

        log::info!(
            "Allocated targets: gradient {}², heightmap {}x{} (x2), depth {}x{}",
            heightmap_specs[0].width,
            heightmap_specs[1].width,
            heightmap_specs[1].height,
            depth_specs[0].width,
            depth_specs[0].height
        );

        Ok(Self {
            gradient,
            heightmap,
            depth,
            max_dimension,
        })
    }

    /// Release and recreate the targets named by `realloc`. On error nothing
    /// is released and the previous targets stay in place.
    pub fn apply(
        &mut self,
        device: &wgpu::Device,
        realloc: Reallocation,
    ) -> Result<(), TellusError> {
        let specs = TargetSpec::for_reallocation(realloc);
        for spec in &specs {
            spec.check(self.max_dimension)?;
        }

        match realloc {
            Reallocation::Depth { width, height } => {
                let depth = RenderTarget::allocate(device, specs[0]);
                std::mem::replace(&mut self.depth, depth).release();
                log::info!("Reallocated depth target at {width}x{height}");
            }
            Reallocation::Heightmap { width, height, .. } => {
                let gradient = RenderTarget::allocate(device, specs[0]);
                let heightmap = PingPong::new(
                    RenderTarget::allocate(device, specs[1]),
                    RenderTarget::allocate(device, specs[2]),
                );
                std::mem::replace(&mut self.gradient, gradient).release();
                let [a, b] = std::mem::replace(&mut self.heightmap, heightmap).into_entries();
                a.release();
                b.release();
                log::info!("Reallocated heightmap pair at {width}x{height}");
            }
        }
        Ok(())
    }

    pub fn gradient(&self) -> &RenderTarget {
        &self.gradient
    }

    pub fn heightmap(&self) -> &PingPong<RenderTarget> {
        &self.heightmap
    }

    pub fn flip_heightmap(&mut self) {
        self.heightmap.flip();
    }

    pub fn depth(&self) -> &RenderTarget {
        &self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_twice_restores_roles() {
        let mut pair = PingPong::new("a", "b");
        assert_eq!(*pair.latest(), "a");
        assert_eq!(*pair.oldest(), "b");

        pair.flip();
        assert_eq!(*pair.latest(), "b");
        assert_eq!(*pair.oldest(), "a");

        pair.flip();
        assert_eq!(*pair.latest(), "a");
        assert_eq!(pair.into_entries(), ["a", "b"]);
    }

    #[test]
    fn test_latest_never_equals_oldest() {
        let mut pair = PingPong::new(0u8, 1u8);
        for _ in 0..5 {
            assert_ne!(pair.latest_index(), pair.oldest_index());
            pair.flip();
        }
    }

    #[test]
    fn test_flip_does_not_move_entries() {
        let mut pair = PingPong::new(vec![1, 2, 3], vec![4, 5, 6]);
        let latest_ptr = pair.latest().as_ptr();
        pair.flip();
        assert_eq!(pair.oldest().as_ptr(), latest_ptr);
    }

    #[test]
    fn test_kind_properties() {
        assert!(!TargetKind::GradientSource.is_drawable());
        assert!(TargetKind::Heightmap.is_drawable());
        assert!(TargetKind::DepthReadback.is_drawable());
        assert!(TargetKind::DepthReadback
            .usage()
            .contains(wgpu::TextureUsages::COPY_SRC));
        assert_eq!(TargetKind::Heightmap.filter(), wgpu::FilterMode::Linear);
        assert_eq!(TargetKind::DepthReadback.filter(), wgpu::FilterMode::Nearest);
    }

    #[test]
    fn test_heightmap_reallocation_specs() {
        let specs = TargetSpec::for_reallocation(Reallocation::Heightmap {
            gradient_size: 2048,
            width: 4096,
            height: 4096,
        });
        assert_eq!(
            specs,
            vec![
                TargetSpec::new(TargetKind::GradientSource, 2048, 2048),
                TargetSpec::new(TargetKind::Heightmap, 4096, 4096),
                TargetSpec::new(TargetKind::Heightmap, 4096, 4096),
            ]
        );
    }

    #[test]
    fn test_depth_reallocation_touches_only_depth() {
        let specs = TargetSpec::for_reallocation(Reallocation::Depth {
            width: 640,
            height: 480,
        });
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].kind, TargetKind::DepthReadback);
    }

    #[test]
    fn test_extent_check() {
        let ok = TargetSpec::new(TargetKind::Heightmap, 4096, 4096);
        assert!(ok.check(8192).is_ok());

        let too_big = TargetSpec::new(TargetKind::Heightmap, 16384, 16384);
        assert!(matches!(
            too_big.check(8192),
            Err(TellusError::TargetAllocation(_))
        ));

        let empty = TargetSpec::new(TargetKind::DepthReadback, 0, 10);
        assert!(empty.check(8192).is_err());
    }
}
