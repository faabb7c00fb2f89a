//! GPU error types.

use fractalforge_core::FractalKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("No GPU adapter found")]
    NoAdapter,

    #[error("GPU adapter {0} does not support f64 shaders")]
    MissingShaderF64(String),

    #[error("Failed to create device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("No GPU kernel for {0}")]
    UnsupportedKind(FractalKind),

    #[error("Cannot render an empty {0}x{1} image")]
    EmptyImage(u32, u32),

    #[error("GPU unavailable: {0}")]
    Unavailable(String),
}
