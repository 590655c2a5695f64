pub mod pipeline;
pub mod programs;
pub mod readback;
pub mod schedule;
pub mod targets;

pub use pipeline::PlanetRenderer;
pub use programs::{
    CompositeUniforms, HeightmapUniforms, IntersectionUniforms, NoiseUniforms, Program,
    ProgramRegistry,
};
pub use readback::PointerReadback;
pub use schedule::{plan_frame, FramePlan, PassStep};
pub use targets::{FrameTargets, PingPong, RenderTarget, TargetKind, TargetSpec};
