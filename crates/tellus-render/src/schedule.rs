//! GPU-free per-tick decision procedure.
//!
//! `plan_frame` reads the dirty flags, snapshots each due stage's parameter
//! block, then lets the state consume what the passes will use up (sculpt
//! impulse, water-level baseline, flags).

use tellus_core::dirty::Pass;
use tellus_core::state::SceneState;

use crate::programs::{CompositeUniforms, HeightmapUniforms, IntersectionUniforms, NoiseUniforms};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassStep {
    Noise(NoiseUniforms),
    Heightmap(HeightmapUniforms),
    Intersection(IntersectionUniforms),
    Composite(CompositeUniforms),
}

impl PassStep {
    pub fn pass(&self) -> Pass {
        match self {
            PassStep::Noise(_) => Pass::NoiseSynthesis,
            PassStep::Heightmap(_) => Pass::HeightmapEvolution,
            PassStep::Intersection(_) => Pass::Intersection,
            PassStep::Composite(_) => Pass::Composite,
        }
    }

    pub fn uniform_bytes(&self) -> &[u8] {
        match self {
            PassStep::Noise(u) => bytemuck::bytes_of(u),
            PassStep::Heightmap(u) => bytemuck::bytes_of(u),
            PassStep::Intersection(u) => bytemuck::bytes_of(u),
            PassStep::Composite(u) => bytemuck::bytes_of(u),
        }
    }
}

/// Ordered passes for one tick. Composite is always last.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub steps: Vec<PassStep>,
}

impl FramePlan {
    pub fn passes(&self) -> Vec<Pass> {
        self.steps.iter().map(PassStep::pass).collect()
    }

    pub fn runs(&self, pass: Pass) -> bool {
        self.steps.iter().any(|step| step.pass() == pass)
    }

    pub fn composite(&self) -> Option<&CompositeUniforms> {
        self.steps.iter().find_map(|step| match step {
            PassStep::Composite(u) => Some(u),
            _ => None,
        })
    }
}

pub fn plan_frame(state: &mut SceneState) -> FramePlan {
    let mut steps = Vec::with_capacity(Pass::ORDER.len());

    if state.dirty.regenerate_noise {
        steps.push(PassStep::Noise(NoiseUniforms::from(&*state)));
        state.dirty.complete(Pass::NoiseSynthesis);
    }

    if state.dirty.refresh_heightmap {
        steps.push(PassStep::Heightmap(HeightmapUniforms::from(&*state)));
        state.planet.last_water_level = state.planet.water_level;
        state.sculpt.consume();
        state.dirty.complete(Pass::HeightmapEvolution);
    }

    if state.dirty.refresh_depth {
        steps.push(PassStep::Intersection(IntersectionUniforms::from(&*state)));
        state.dirty.complete(Pass::Intersection);
    }

    steps.push(PassStep::Composite(CompositeUniforms::from(&*state)));
    FramePlan { steps }
}
