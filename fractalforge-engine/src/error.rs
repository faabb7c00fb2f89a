//! Render error taxonomy.

use crate::options::Backend;
use fractalforge_core::{FractalKind, RenderRegion};
use thiserror::Error;

/// Why a render future rejected. `Clone` so every waiter on a deduplicated
/// render receives the same error.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RenderError {
    #[error("engine is not initialized")]
    NotInitialized,

    #[error("invalid render request: {0}")]
    InvalidRequest(String),

    #[error("{backend} backend has no kernel for {kind}")]
    UnsupportedCombination { kind: FractalKind, backend: Backend },

    #[error("{0} backend is not available")]
    BackendUnavailable(Backend),

    #[error("tile {tile:?} failed: {reason}")]
    TileFailure { tile: RenderRegion, reason: String },

    #[error("GPU render failed: {0}")]
    Gpu(String),

    #[error("palette error: {0}")]
    Palette(String),

    #[error("worker pool disconnected")]
    WorkerDisconnected,
}

impl From<fractalforge_core::ParameterError> for RenderError {
    fn from(e: fractalforge_core::ParameterError) -> Self {
        RenderError::InvalidRequest(e.to_string())
    }
}

impl From<fractalforge_compute::PaletteError> for RenderError {
    fn from(e: fractalforge_compute::PaletteError) -> Self {
        RenderError::Palette(e.to_string())
    }
}

impl From<fractalforge_gpu::GpuError> for RenderError {
    fn from(e: fractalforge_gpu::GpuError) -> Self {
        RenderError::Gpu(e.to_string())
    }
}
