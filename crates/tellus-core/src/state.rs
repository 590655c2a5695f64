use glam::{Mat3, Vec3};

use crate::constants::{DEFAULT_MAX_TARGET_DIMENSION, DEFAULT_NOISE_SIZE, NO_HIT};
use crate::dirty::{DirtyFlags, Pass};
use crate::math;

/// Camera basis, orbit rotation and projection parameters.
///
/// `rotation` and `rotation_inverse` are only writable together through
/// [`CameraFrame::set_rotation`], so the pair can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub up: Vec3,
    pub right: Vec3,
    pub forward: Vec3,
    pub origin: Vec3,
    pub focal_length: f32,
    pub aspect_ratio: f32,
    /// Viewport size in the same pixel units as pointer coordinates.
    pub canvas: [u32; 2],
    rotation: Mat3,
    rotation_inverse: Mat3,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            up: Vec3::Y,
            right: Vec3::X,
            forward: Vec3::Z,
            origin: Vec3::ZERO,
            focal_length: 0.3,
            aspect_ratio: 1.0,
            canvas: [1, 1],
            rotation: Mat3::IDENTITY,
            rotation_inverse: Mat3::IDENTITY,
        }
    }
}

impl CameraFrame {
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    pub fn rotation_inverse(&self) -> Mat3 {
        self.rotation_inverse
    }

    /// Replace the rotation and recompute its inverse from the new entries.
    pub fn set_rotation(&mut self, rotation: Mat3) {
        self.rotation = rotation;
        self.rotation_inverse = match math::invert(&rotation) {
            Some(inverse) => inverse,
            None => {
                log::warn!("Singular camera rotation; falling back to transpose");
                rotation.transpose()
            }
        };
    }
}

/// Planet placement and radii, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetParams {
    pub origin: Vec3,
    pub min_radius: f32,
    pub max_radius: f32,
    pub atmosphere_radius: f32,
    pub water_level: f32,
    /// Water level the current heightmap was evolved with.
    pub last_water_level: f32,
}

impl Default for PlanetParams {
    fn default() -> Self {
        Self {
            origin: Vec3::new(0.0, 0.0, 5.0),
            min_radius: 1.5,
            max_radius: 2.5,
            atmosphere_radius: 2.5,
            water_level: 0.4,
            last_water_level: 0.4,
        }
    }
}

/// Fractal noise settings and heightmap resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParams {
    /// Side length of the square gradient field.
    pub size: u32,
    pub width: u32,
    pub height: u32,
    /// Resolution staged by the UI, committed on apply.
    pub next_width: Option<u32>,
    pub next_height: Option<u32>,
    pub persistence: f32,
    pub lacunarity: f32,
    pub octaves: i32,
    pub blur_radius: f32,
    pub differential: f32,
    pub exaggeration: f32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            size: DEFAULT_NOISE_SIZE,
            width: DEFAULT_NOISE_SIZE,
            height: DEFAULT_NOISE_SIZE,
            next_width: None,
            next_height: None,
            persistence: 0.5,
            lacunarity: 2.0,
            octaves: 7,
            blur_radius: 0.005,
            differential: 1.6,
            exaggeration: 1.7,
        }
    }
}

impl NoiseParams {
    /// Resolution the next apply will allocate.
    pub fn staged_extent(&self) -> (u32, u32) {
        (
            self.next_width.unwrap_or(self.width),
            self.next_height.unwrap_or(self.height),
        )
    }
}

/// Raymarch quality and lighting settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Depth-target samples per pixel, per axis.
    pub supersampling: u32,
    /// Binary-search refinement steps after the march brackets a hit.
    pub hit_accuracy: i32,
    pub ray_march_stride: f32,
    pub shadows: bool,
    pub light_theta: f32,
    pub light_phi: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            supersampling: 2,
            hit_accuracy: 4,
            ray_march_stride: 0.005,
            shadows: false,
            light_theta: std::f32::consts::FRAC_PI_4,
            light_phi: -(1.0f32 / 3.0f32.sqrt()).asin(),
        }
    }
}

impl RenderParams {
    /// Direction the light travels, from the two control angles.
    pub fn light_direction(&self) -> Vec3 {
        let (sin_t, cos_t) = self.light_theta.sin_cos();
        let (sin_p, cos_p) = self.light_phi.sin_cos();
        Vec3::new(-cos_p * cos_t, -sin_p, -cos_p * sin_t)
    }
}

/// Sculpt impulse accumulated since the last heightmap evolution.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SculptState {
    pub mould: f32,
    pub smooth: bool,
}

impl SculptState {
    /// Take the pending impulse, leaving the state neutral.
    pub fn consume(&mut self) -> SculptState {
        std::mem::take(self)
    }
}

/// Last resolved pointer intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    /// Unit direction from the planet centre to the hit.
    pub unit: Vec3,
    /// Ray distance, negative when the pointer is off the planet.
    pub data: f32,
}

impl Default for PointerHit {
    fn default() -> Self {
        Self {
            unit: Vec3::ZERO,
            data: NO_HIT,
        }
    }
}

impl PointerHit {
    /// Decode a depth-target texel. The direction channels may carry a
    /// shading scale, so they are renormalized here.
    pub fn from_texel(texel: [f32; 4]) -> Self {
        let direction = Vec3::new(texel[0], texel[1], texel[2]);
        Self {
            unit: math::normalize(direction).unwrap_or(Vec3::ZERO),
            data: texel[3],
        }
    }

    pub fn is_hit(&self) -> bool {
        self.data >= 0.0
    }
}

/// Render targets that must be recreated after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reallocation {
    /// Depth/readback target only (resize or supersampling change).
    Depth { width: u32, height: u32 },
    /// Gradient field plus both heightmap ping-pong entries.
    Heightmap {
        gradient_size: u32,
        width: u32,
        height: u32,
    },
}

/// Everything the frame schedule reads. Owned by the host, passed by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub camera: CameraFrame,
    pub planet: PlanetParams,
    pub noise: NoiseParams,
    pub render: RenderParams,
    pub sculpt: SculptState,
    pub hit: PointerHit,
    pub dirty: DirtyFlags,
    /// Device limit on any render-target side, checked before state commits
    /// to an extent.
    pub max_target_dimension: u32,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera: CameraFrame::default(),
            planet: PlanetParams::default(),
            noise: NoiseParams::default(),
            render: RenderParams::default(),
            sculpt: SculptState::default(),
            hit: PointerHit::default(),
            dirty: DirtyFlags::primed(),
            max_target_dimension: DEFAULT_MAX_TARGET_DIMENSION,
        }
    }
}

impl SceneState {
    /// Depth target extent: canvas times supersampling, at least 1×1.
    pub fn depth_extent(&self) -> (u32, u32) {
        let ss = self.render.supersampling.max(1);
        (
            (self.camera.canvas[0] * ss).max(1),
            (self.camera.canvas[1] * ss).max(1),
        )
    }

    pub fn depth_reallocation(&self) -> Reallocation {
        let (width, height) = self.depth_extent();
        Reallocation::Depth { width, height }
    }

    pub fn heightmap_reallocation(&self) -> Reallocation {
        Reallocation::Heightmap {
            gradient_size: self.noise.size,
            width: self.noise.width,
            height: self.noise.height,
        }
    }

    pub fn fits_target(&self, width: u32, height: u32) -> bool {
        width <= self.max_target_dimension && height <= self.max_target_dimension
    }

    /// Viewport changed: update projection, request a new depth target.
    ///
    /// The canvas is clamped to the target limit and supersampling is lowered
    /// until the depth target fits, so the returned request is always valid.
    pub fn resize(&mut self, width: u32, height: u32) -> Reallocation {
        let limit = self.max_target_dimension.max(1);
        let width = width.clamp(1, limit);
        let height = height.clamp(1, limit);
        self.camera.canvas = [width, height];
        self.camera.aspect_ratio = width as f32 / height as f32;

        let requested = self.render.supersampling;
        while self.render.supersampling > 1 {
            let (w, h) = self.depth_extent();
            if self.fits_target(w, h) {
                break;
            }
            self.render.supersampling -= 1;
        }
        if self.render.supersampling != requested {
            log::warn!(
                "Supersampling lowered from {requested} to {} for a {width}x{height} canvas",
                self.render.supersampling
            );
        }

        self.dirty.mark(Pass::Intersection);
        self.depth_reallocation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SceneState::default();
        assert_eq!(state.planet.min_radius, 1.5);
        assert_eq!(state.planet.max_radius, 2.5);
        assert_eq!(state.noise.octaves, 7);
        assert_eq!(state.camera.focal_length, 0.3);
        assert!(!state.hit.is_hit());
        assert_eq!(state.dirty, DirtyFlags::primed());
    }

    #[test]
    fn test_default_light_is_negated_diagonal() {
        let light = RenderParams::default().light_direction();
        let expected = -Vec3::new(1.0, -1.0, 1.0).normalize();
        assert!(
            (light - expected).length() < 1e-5,
            "light {light:?} != {expected:?}"
        );
    }

    #[test]
    fn test_set_rotation_keeps_inverse() {
        let mut camera = CameraFrame::default();
        let r = math::rotation_about_axis(Vec3::new(0.2, 1.0, -0.4), 0.9);
        camera.set_rotation(r);
        assert!(math::approx_eq(
            &(camera.rotation() * camera.rotation_inverse()),
            &Mat3::IDENTITY,
            1e-5
        ));
    }

    #[test]
    fn test_set_rotation_singular_falls_back_to_transpose() {
        let mut camera = CameraFrame::default();
        camera.set_rotation(Mat3::ZERO);
        assert_eq!(camera.rotation_inverse(), Mat3::ZERO);
    }

    #[test]
    fn test_sculpt_consume_resets() {
        let mut sculpt = SculptState {
            mould: 0.3,
            smooth: true,
        };
        let taken = sculpt.consume();
        assert_eq!(taken.mould, 0.3);
        assert!(taken.smooth);
        assert_eq!(sculpt, SculptState::default());
    }

    #[test]
    fn test_pointer_hit_from_texel() {
        let hit = PointerHit::from_texel([0.0, 1.0, 0.0, 3.2]);
        assert!(hit.is_hit());
        assert_eq!(hit.unit, Vec3::Y);
        let shadowed = PointerHit::from_texel([0.5, 0.0, 0.0, 2.0]);
        assert!((shadowed.unit - Vec3::X).length() < 1e-6);
        assert!(!PointerHit::from_texel([0.0, 0.0, 0.0, NO_HIT]).is_hit());
    }

    #[test]
    fn test_resize_updates_aspect_and_requests_depth() {
        let mut state = SceneState::default();
        state.dirty = DirtyFlags::default();
        let realloc = state.resize(800, 400);
        assert_eq!(state.camera.aspect_ratio, 2.0);
        assert!(state.dirty.refresh_depth);
        assert_eq!(
            realloc,
            Reallocation::Depth {
                width: 1600,
                height: 800
            }
        );
    }

    #[test]
    fn test_resize_zero_clamps() {
        let mut state = SceneState::default();
        state.resize(0, 0);
        assert_eq!(state.camera.canvas, [1, 1]);
        assert_eq!(state.camera.aspect_ratio, 1.0);
    }

    #[test]
    fn test_resize_lowers_supersampling_to_fit_limit() {
        let mut state = SceneState::default();
        state.render.supersampling = 3;
        let realloc = state.resize(3840, 2160);
        assert_eq!(state.render.supersampling, 2);
        assert_eq!(
            realloc,
            Reallocation::Depth {
                width: 7680,
                height: 4320
            }
        );
        let (w, h) = state.depth_extent();
        assert!(state.fits_target(w, h));
    }

    #[test]
    fn test_resize_clamps_canvas_to_limit() {
        let mut state = SceneState::default();
        state.max_target_dimension = 4096;
        state.resize(5000, 1000);
        assert_eq!(state.camera.canvas, [4096, 1000]);
        assert_eq!(state.render.supersampling, 1);
    }

    #[test]
    fn test_staged_extent_falls_back_to_current() {
        let mut noise = NoiseParams::default();
        assert_eq!(noise.staged_extent(), (2048, 2048));
        noise.next_width = Some(4096);
        noise.next_height = Some(4096);
        assert_eq!(noise.staged_extent(), (4096, 4096));
    }
}
