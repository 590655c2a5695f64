//! Declarative control table for the settings panel.
//!
//! Every control reads its value from `SceneState`, validates a proposed value
//! against its range and any cross-field constraint, applies it and marks the
//! passes it invalidates. Rejected values mutate nothing.

use thiserror::Error;

use crate::constants::{
    MAX_HEIGHTMAP_EXPONENT, MAX_SUPERSAMPLING, MIN_HEIGHTMAP_EXPONENT, RADIUS_GAP,
};
use crate::dirty::Pass;
use crate::state::{NoiseParams, Reallocation, SceneState};

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("{control}: {value} outside [{min}, {max}]")]
    OutOfRange {
        control: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
    #[error("{control}: {reason}")]
    Constraint {
        control: &'static str,
        reason: String,
    },
}

/// Index into [`CONTROLS`]; variant order matches the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlId {
    Persistence,
    Lacunarity,
    Differential,
    Exaggeration,
    BlurRadius,
    Octaves,
    Resolution,
    WaterLevel,
    MinRadius,
    MaxRadius,
    AtmosphereRadius,
    Supersampling,
    HitAccuracy,
    RayMarchStride,
    Shadows,
    LightTheta,
    LightPhi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlGroup {
    Generation,
    Planet,
    Render,
}

impl ControlGroup {
    pub const ALL: [ControlGroup; 3] = [
        ControlGroup::Generation,
        ControlGroup::Planet,
        ControlGroup::Render,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ControlGroup::Generation => "Generation",
            ControlGroup::Planet => "Planet",
            ControlGroup::Render => "Render",
        }
    }
}

/// How the UI presents the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Continuous,
    Integer,
    Toggle,
}

/// Side effect of a commit beyond the dirty flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEffect {
    None,
    ReallocateDepth,
}

pub struct ControlSpec {
    pub id: ControlId,
    pub group: ControlGroup,
    pub label: &'static str,
    pub kind: ControlKind,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub read: fn(&SceneState) -> f32,
    /// Cross-field constraint beyond the range check.
    pub validate: fn(&SceneState, f32) -> Result<(), String>,
    pub apply: fn(&mut SceneState, f32),
    pub display: fn(f32) -> String,
    pub dirty: &'static [Pass],
    pub effect: ControlEffect,
}

impl std::fmt::Debug for ControlSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSpec")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl ControlSpec {
    pub fn read(&self, state: &SceneState) -> f32 {
        (self.read)(state)
    }

    pub fn display(&self, value: f32) -> String {
        (self.display)(value)
    }

    /// Validate, apply and invalidate. Returns the target reallocation the
    /// change requires, if any.
    pub fn commit(
        &self,
        state: &mut SceneState,
        value: f32,
    ) -> Result<Option<Reallocation>, ControlError> {
        let value = match self.kind {
            ControlKind::Continuous => value,
            ControlKind::Integer => value.round(),
            ControlKind::Toggle => {
                if value != 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
        };

        if !value.is_finite() || value < self.min || value > self.max {
            log::debug!("Rejected {}: {value} out of range", self.label);
            return Err(ControlError::OutOfRange {
                control: self.label,
                value,
                min: self.min,
                max: self.max,
            });
        }
        if let Err(reason) = (self.validate)(state, value) {
            log::debug!("Rejected {}: {reason}", self.label);
            return Err(ControlError::Constraint {
                control: self.label,
                reason,
            });
        }

        (self.apply)(state, value);
        for &pass in self.dirty {
            state.dirty.mark(pass);
        }
        log::debug!("Committed {} = {value}", self.label);

        Ok(match self.effect {
            ControlEffect::None => None,
            ControlEffect::ReallocateDepth => Some(state.depth_reallocation()),
        })
    }
}

pub fn spec(id: ControlId) -> &'static ControlSpec {
    &CONTROLS[id as usize]
}

/// Commit the staged resolution and request a fresh gradient field and
/// heightmap pair.
pub fn apply_generation(state: &mut SceneState) -> Reallocation {
    let (width, height) = state.noise.staged_extent();
    state.noise.width = width;
    state.noise.height = height;
    state.noise.next_width = None;
    state.noise.next_height = None;
    state.dirty.mark(Pass::NoiseSynthesis);
    log::info!("Applying generation at {width}x{height}");
    state.heightmap_reallocation()
}

/// Restore default noise parameters and regenerate at the default resolution.
/// Camera and planet state are left alone.
pub fn reset_generation(state: &mut SceneState) -> Reallocation {
    state.noise = NoiseParams::default();
    state.dirty.mark(Pass::NoiseSynthesis);
    log::info!("Reset generation parameters");
    state.heightmap_reallocation()
}

const PLANET_DIRTY: &[Pass] = &[Pass::HeightmapEvolution, Pass::Intersection];
const DEPTH_DIRTY: &[Pass] = &[Pass::Intersection];

fn accept(_: &SceneState, _: f32) -> Result<(), String> {
    Ok(())
}

fn plain(v: f32) -> String {
    format!("{v:.3}")
}

fn integer(v: f32) -> String {
    format!("{}", v as i32)
}

fn light_theta_display(v: f32) -> String {
    format!("{:.1}°", v * 180.0)
}

fn light_phi_display(v: f32) -> String {
    format!("{:.1}°", v * 90.0)
}

pub static CONTROLS: [ControlSpec; 17] = [
    ControlSpec {
        id: ControlId::Persistence,
        group: ControlGroup::Generation,
        label: "Persistence",
        kind: ControlKind::Continuous,
        min: 0.0,
        max: 1.0,
        step: 0.01,
        read: |s| s.noise.persistence,
        validate: accept,
        apply: |s, v| s.noise.persistence = v,
        display: plain,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Lacunarity,
        group: ControlGroup::Generation,
        label: "Lacunarity",
        kind: ControlKind::Continuous,
        min: 1.0,
        max: 4.0,
        step: 0.01,
        read: |s| s.noise.lacunarity,
        validate: accept,
        apply: |s, v| s.noise.lacunarity = v,
        display: plain,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Differential,
        group: ControlGroup::Generation,
        label: "Differential",
        kind: ControlKind::Continuous,
        min: 0.0,
        max: 4.0,
        step: 0.01,
        read: |s| s.noise.differential,
        validate: accept,
        apply: |s, v| s.noise.differential = v,
        display: plain,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Exaggeration,
        group: ControlGroup::Generation,
        label: "Exaggeration",
        kind: ControlKind::Continuous,
        min: 0.0,
        max: 4.0,
        step: 0.01,
        read: |s| s.noise.exaggeration,
        validate: accept,
        apply: |s, v| s.noise.exaggeration = v,
        display: plain,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::BlurRadius,
        group: ControlGroup::Generation,
        label: "Blur radius",
        kind: ControlKind::Continuous,
        min: 0.0,
        max: 0.05,
        step: 0.001,
        read: |s| s.noise.blur_radius,
        validate: accept,
        apply: |s, v| s.noise.blur_radius = v,
        display: plain,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Octaves,
        group: ControlGroup::Generation,
        label: "Octaves",
        kind: ControlKind::Integer,
        min: 1.0,
        max: 12.0,
        step: 1.0,
        read: |s| s.noise.octaves as f32,
        validate: accept,
        apply: |s, v| s.noise.octaves = v as i32,
        display: integer,
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Resolution,
        group: ControlGroup::Generation,
        label: "Resolution",
        kind: ControlKind::Integer,
        min: MIN_HEIGHTMAP_EXPONENT as f32,
        max: MAX_HEIGHTMAP_EXPONENT as f32,
        step: 1.0,
        read: |s| s.noise.staged_extent().0.max(1).ilog2() as f32,
        validate: |s, v| {
            let side = 1u32 << (v as u32);
            if s.fits_target(side, side) {
                Ok(())
            } else {
                Err(format!(
                    "heightmap {side}x{side} exceeds device limit {}",
                    s.max_target_dimension
                ))
            }
        },
        apply: |s, v| {
            let side = 1u32 << (v as u32);
            s.noise.next_width = Some(side);
            s.noise.next_height = Some(side);
        },
        display: |v| format!("{}", 1u32 << (v as u32)),
        dirty: &[],
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::WaterLevel,
        group: ControlGroup::Planet,
        label: "Water level",
        kind: ControlKind::Continuous,
        min: 0.0,
        max: 1.0,
        step: 0.01,
        read: |s| s.planet.water_level,
        validate: accept,
        apply: |s, v| s.planet.water_level = v,
        display: plain,
        dirty: PLANET_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::MinRadius,
        group: ControlGroup::Planet,
        label: "Min radius",
        kind: ControlKind::Continuous,
        min: 0.5,
        max: 4.0,
        step: 0.05,
        read: |s| s.planet.min_radius,
        validate: |s, v| {
            if v < s.planet.max_radius - RADIUS_GAP {
                Ok(())
            } else {
                Err(format!(
                    "must stay below max radius {} by {RADIUS_GAP}",
                    s.planet.max_radius
                ))
            }
        },
        apply: |s, v| s.planet.min_radius = v,
        display: plain,
        dirty: PLANET_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::MaxRadius,
        group: ControlGroup::Planet,
        label: "Max radius",
        kind: ControlKind::Continuous,
        min: 0.5,
        max: 4.0,
        step: 0.05,
        read: |s| s.planet.max_radius,
        validate: |s, v| {
            if v > s.planet.min_radius + RADIUS_GAP {
                Ok(())
            } else {
                Err(format!(
                    "must stay above min radius {} by {RADIUS_GAP}",
                    s.planet.min_radius
                ))
            }
        },
        apply: |s, v| {
            s.planet.max_radius = v;
            s.planet.atmosphere_radius = s.planet.atmosphere_radius.max(v);
        },
        display: plain,
        dirty: PLANET_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::AtmosphereRadius,
        group: ControlGroup::Planet,
        label: "Atmosphere radius",
        kind: ControlKind::Continuous,
        min: 0.5,
        max: 5.0,
        step: 0.05,
        read: |s| s.planet.atmosphere_radius,
        validate: |s, v| {
            if v >= s.planet.max_radius {
                Ok(())
            } else {
                Err(format!("must be at least max radius {}", s.planet.max_radius))
            }
        },
        apply: |s, v| s.planet.atmosphere_radius = v,
        display: plain,
        dirty: PLANET_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Supersampling,
        group: ControlGroup::Render,
        label: "Supersampling",
        kind: ControlKind::Integer,
        min: 1.0,
        max: MAX_SUPERSAMPLING as f32,
        step: 1.0,
        read: |s| s.render.supersampling as f32,
        validate: |s, v| {
            let ss = v as u32;
            let [width, height] = s.camera.canvas;
            let (w, h) = (width * ss, height * ss);
            if s.fits_target(w, h) {
                Ok(())
            } else {
                Err(format!(
                    "depth target {w}x{h} exceeds device limit {}",
                    s.max_target_dimension
                ))
            }
        },
        apply: |s, v| s.render.supersampling = v as u32,
        display: |v| format!("x{}", (v * v) as u32),
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::ReallocateDepth,
    },
    ControlSpec {
        id: ControlId::HitAccuracy,
        group: ControlGroup::Render,
        label: "Hit accuracy",
        kind: ControlKind::Integer,
        min: 0.0,
        max: 10.0,
        step: 1.0,
        read: |s| s.render.hit_accuracy as f32,
        validate: accept,
        apply: |s, v| s.render.hit_accuracy = v as i32,
        display: integer,
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::RayMarchStride,
        group: ControlGroup::Render,
        label: "Ray march stride",
        kind: ControlKind::Continuous,
        min: 0.001,
        max: 0.05,
        step: 0.001,
        read: |s| s.render.ray_march_stride,
        validate: accept,
        apply: |s, v| s.render.ray_march_stride = v,
        display: plain,
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::Shadows,
        group: ControlGroup::Render,
        label: "Shadows",
        kind: ControlKind::Toggle,
        min: 0.0,
        max: 1.0,
        step: 1.0,
        read: |s| if s.render.shadows { 1.0 } else { 0.0 },
        validate: accept,
        apply: |s, v| s.render.shadows = v == 1.0,
        display: |v| (if v == 1.0 { "Enabled" } else { "Disabled" }).to_string(),
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::LightTheta,
        group: ControlGroup::Render,
        label: "Light θ",
        kind: ControlKind::Continuous,
        min: -1.0,
        max: 1.0,
        step: 0.01,
        read: |s| s.render.light_theta / std::f32::consts::PI,
        validate: accept,
        apply: |s, v| s.render.light_theta = v * std::f32::consts::PI,
        display: light_theta_display,
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::None,
    },
    ControlSpec {
        id: ControlId::LightPhi,
        group: ControlGroup::Render,
        label: "Light φ",
        kind: ControlKind::Continuous,
        min: -1.0,
        max: 1.0,
        step: 0.01,
        read: |s| s.render.light_phi / std::f32::consts::FRAC_PI_2,
        validate: accept,
        apply: |s, v| s.render.light_phi = v * std::f32::consts::FRAC_PI_2,
        display: light_phi_display,
        dirty: DEPTH_DIRTY,
        effect: ControlEffect::None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dirty::DirtyFlags;

    fn clean_state() -> SceneState {
        let mut state = SceneState::default();
        state.dirty = DirtyFlags::default();
        state
    }

    #[test]
    fn test_table_order_matches_ids() {
        for (i, control) in CONTROLS.iter().enumerate() {
            assert_eq!(control.id as usize, i, "{} out of order", control.label);
        }
    }

    #[test]
    fn test_defaults_are_in_range() {
        let state = SceneState::default();
        for control in &CONTROLS {
            let v = control.read(&state);
            assert!(
                v >= control.min && v <= control.max,
                "{} default {v} outside [{}, {}]",
                control.label,
                control.min,
                control.max
            );
        }
    }

    #[test]
    fn test_min_radius_constraint() {
        let mut state = clean_state();
        let min_radius = spec(ControlId::MinRadius);

        let err = min_radius.commit(&mut state, 2.6).unwrap_err();
        assert!(matches!(err, ControlError::Constraint { .. }), "got {err:?}");
        assert_eq!(state.planet.min_radius, 1.5);
        assert!(state.dirty.is_clean(), "rejection must not mark flags");

        assert_eq!(min_radius.commit(&mut state, 2.0), Ok(None));
        assert_eq!(state.planet.min_radius, 2.0);
        assert!(state.dirty.refresh_heightmap);
        assert!(state.dirty.refresh_depth);
    }

    #[test]
    fn test_max_radius_constraint_and_atmosphere_follow() {
        let mut state = clean_state();
        let max_radius = spec(ControlId::MaxRadius);

        assert!(max_radius.commit(&mut state, 1.55).is_err());
        assert_eq!(state.planet.max_radius, 2.5);

        max_radius.commit(&mut state, 3.0).expect("valid max radius");
        assert_eq!(state.planet.atmosphere_radius, 3.0);
    }

    #[test]
    fn test_atmosphere_below_max_rejected() {
        let mut state = clean_state();
        let atmosphere = spec(ControlId::AtmosphereRadius);
        assert!(atmosphere.commit(&mut state, 2.0).is_err());
        assert_eq!(state.planet.atmosphere_radius, 2.5);
        atmosphere.commit(&mut state, 3.5).expect("above max radius");
        assert_eq!(state.planet.atmosphere_radius, 3.5);
    }

    #[test]
    fn test_supersampling_past_device_limit_rejected() {
        let mut state = clean_state();
        state.resize(3840, 2160);
        state.dirty = DirtyFlags::default();

        let err = spec(ControlId::Supersampling)
            .commit(&mut state, 3.0)
            .unwrap_err();
        assert!(matches!(err, ControlError::Constraint { .. }), "got {err:?}");
        assert_eq!(state.render.supersampling, 2);
        assert_eq!(state.depth_extent(), (7680, 4320));
        assert!(state.dirty.is_clean(), "rejection must not mark flags");

        state.max_target_dimension = 16384;
        let realloc = spec(ControlId::Supersampling)
            .commit(&mut state, 3.0)
            .expect("fits the larger limit");
        assert_eq!(
            realloc,
            Some(Reallocation::Depth {
                width: 11520,
                height: 6480
            })
        );
    }

    #[test]
    fn test_resolution_past_device_limit_rejected() {
        let mut state = clean_state();
        state.max_target_dimension = 2048;
        assert!(spec(ControlId::Resolution).commit(&mut state, 12.0).is_err());
        assert_eq!(state.noise.next_width, None);
        assert_eq!(
            apply_generation(&mut state),
            Reallocation::Heightmap {
                gradient_size: 2048,
                width: 2048,
                height: 2048
            }
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut state = clean_state();
        let err = spec(ControlId::Persistence)
            .commit(&mut state, 1.5)
            .unwrap_err();
        assert!(matches!(err, ControlError::OutOfRange { .. }));
        assert_eq!(state.noise.persistence, 0.5);
        assert!(spec(ControlId::Persistence)
            .commit(&mut state, f32::NAN)
            .is_err());
    }

    #[test]
    fn test_noise_sliders_mark_nothing() {
        let mut state = clean_state();
        spec(ControlId::Lacunarity)
            .commit(&mut state, 2.5)
            .expect("in range");
        assert_eq!(state.noise.lacunarity, 2.5);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_resolution_is_staged() {
        let mut state = clean_state();
        spec(ControlId::Resolution)
            .commit(&mut state, 12.0)
            .expect("in range");
        assert_eq!(state.noise.width, 2048);
        assert_eq!(state.noise.next_width, Some(4096));
        assert_eq!(spec(ControlId::Resolution).read(&state), 12.0);
        assert!(state.dirty.is_clean());
    }

    #[test]
    fn test_apply_generation_commits_staged_extent() {
        let mut state = clean_state();
        spec(ControlId::Resolution)
            .commit(&mut state, 12.0)
            .expect("in range");

        let realloc = apply_generation(&mut state);
        assert_eq!(
            realloc,
            Reallocation::Heightmap {
                gradient_size: 2048,
                width: 4096,
                height: 4096
            }
        );
        assert_eq!(state.noise.width, 4096);
        assert_eq!(state.noise.next_width, None);
        assert!(state.dirty.regenerate_noise);
    }

    #[test]
    fn test_reset_generation_restores_defaults_only() {
        let mut state = clean_state();
        state.noise.persistence = 0.9;
        state.noise.width = 4096;
        state.noise.height = 4096;
        state.planet.water_level = 0.7;
        state.camera.focal_length = 0.8;

        let realloc = reset_generation(&mut state);
        assert_eq!(state.noise, NoiseParams::default());
        assert_eq!(state.planet.water_level, 0.7);
        assert_eq!(state.camera.focal_length, 0.8);
        assert!(state.dirty.regenerate_noise);
        assert_eq!(
            realloc,
            Reallocation::Heightmap {
                gradient_size: 2048,
                width: 2048,
                height: 2048
            }
        );
    }

    #[test]
    fn test_supersampling_requests_depth() {
        let mut state = clean_state();
        state.resize(100, 50);
        let realloc = spec(ControlId::Supersampling)
            .commit(&mut state, 3.0)
            .expect("in range");
        assert_eq!(
            realloc,
            Some(Reallocation::Depth {
                width: 300,
                height: 150
            })
        );
        assert!(state.dirty.refresh_depth);
        assert!(!state.dirty.refresh_heightmap);
    }

    #[test]
    fn test_integer_controls_round() {
        let mut state = clean_state();
        spec(ControlId::Octaves)
            .commit(&mut state, 4.4)
            .expect("in range");
        assert_eq!(state.noise.octaves, 4);
    }

    #[test]
    fn test_light_controls_round_trip_read() {
        let mut state = clean_state();
        let theta = spec(ControlId::LightTheta);
        assert!((theta.read(&state) - 0.25).abs() < 1e-6);
        theta.commit(&mut state, 0.5).expect("in range");
        assert!((state.render.light_theta - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!(state.dirty.refresh_depth);
    }

    #[test]
    fn test_shadows_toggle() {
        let mut state = clean_state();
        let shadows = spec(ControlId::Shadows);
        shadows.commit(&mut state, 1.0).expect("toggle");
        assert!(state.render.shadows);
        assert_eq!(shadows.display(shadows.read(&state)), "Enabled");
        shadows.commit(&mut state, 0.0).expect("toggle");
        assert!(!state.render.shadows);
    }
}
