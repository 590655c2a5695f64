//! Single source of truth for shared constants.
//! Interaction rates here are only defaults; `ViewerConfig` can override them.

/// Orbit rate in radians per pixel of drag length.
pub const ORBIT_RATE: f32 = 0.005;

/// Drags shorter than this (pixels) produce no rotation.
pub const MIN_DRAG_LENGTH: f32 = 0.001;

/// Sculpt strength per second for a single button (left raises, right lowers).
pub const SCULPT_RATE: f32 = 0.2;

/// Sculpt strength per second with both buttons held (smoothing raise).
pub const SMOOTH_SCULPT_RATE: f32 = 1.0;

/// Focal length change per wheel tick.
pub const ZOOM_STEP: f32 = 1.0 / 40.0;

/// Focal length clamp.
pub const FOCAL_LENGTH_MIN: f32 = 0.1;
pub const FOCAL_LENGTH_MAX: f32 = 1.0;

/// Number of frame durations kept for the rate display.
pub const FRAME_WINDOW: usize = 100;

/// Minimum gap kept between the planet's min and max radius.
pub const RADIUS_GAP: f32 = 0.1;

/// Default gradient-field side length and heightmap resolution.
pub const DEFAULT_NOISE_SIZE: u32 = 2048;
pub const DEFAULT_HEIGHTMAP_EXPONENT: u32 = 11;

/// Heightmap resolution exponent range offered by the resolution control.
pub const MIN_HEIGHTMAP_EXPONENT: u32 = 8;
pub const MAX_HEIGHTMAP_EXPONENT: u32 = 12;

/// Supersampling factor range (per axis).
pub const MAX_SUPERSAMPLING: u32 = 3;

/// Largest 2-D texture side every WebGPU device supports. Hosts replace it
/// with the device's own limit.
pub const DEFAULT_MAX_TARGET_DIMENSION: u32 = 8192;

/// Longest tick fed to the interaction controller, in seconds.
pub const MAX_TICK_SECS: f32 = 0.1;

/// Sentinel written to the readback alpha channel when a ray misses the planet.
pub const NO_HIT: f32 = -1.0;

/// Mouse button bits, matching `MouseEvent.buttons`.
pub const BUTTON_LEFT: u32 = 1;
pub const BUTTON_RIGHT: u32 = 2;
pub const BUTTON_MIDDLE: u32 = 4;
