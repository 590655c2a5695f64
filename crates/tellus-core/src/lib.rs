pub mod config;
pub mod constants;
pub mod controls;
pub mod dirty;
pub mod error;
pub mod gradient;
pub mod interaction;
pub mod math;
pub mod state;
pub mod timing;

pub use config::{InteractionConfig, ViewerConfig};
pub use controls::{ControlError, ControlGroup, ControlId, ControlSpec, CONTROLS};
pub use dirty::{DirtyFlags, Pass};
pub use error::{ConfigError, TellusError};
pub use interaction::{InputEvent, InteractionController};
pub use state::{
    CameraFrame, NoiseParams, PlanetParams, PointerHit, Reallocation, RenderParams, SceneState,
    SculptState,
};
pub use timing::FrameTimer;
