use thiserror::Error;

/// Errors that can occur during Tellus initialization and runtime.
#[derive(Debug, Error)]
pub enum TellusError {
    #[error("WebGPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("Surface configuration failed: {0}")]
    SurfaceConfigFailed(String),

    #[error("Required GPU feature unavailable: {0}")]
    UnsupportedFeature(String),

    #[error("Shader compilation failed for {stage}: {log}")]
    CompileError { stage: String, log: String },

    #[error("Program link failed for {stage}: {log}")]
    LinkError { stage: String, log: String },

    #[error("Render target allocation failed: {0}")]
    TargetAllocation(String),
}

/// Configuration parse failures. Hosts fall back to defaults on these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse viewer config RON: {0}")]
    Parse(String),

    #[error("Invalid viewer config: {0}")]
    Invalid(String),
}
