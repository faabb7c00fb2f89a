//! Per-pixel computation for FractalForge: the four numeric kernels, the
//! palette subsystem, the tile renderer and the worker thread loop.

pub mod kernels;
pub mod palette;
pub mod tile_render;
pub mod worker;

pub use kernels::{evaluate_point, NewtonOutcome};
pub use palette::{
    colorize, Palette, PaletteCache, PaletteError, Rgba, DEFAULT_PALETTE_STEPS, PALETTE_NAMES,
};
pub use tile_render::{render_tile, RegionRenderer, TileOutput};
pub use worker::{run_worker, WorkerSettings};

// Re-export core types for convenience
pub use fractalforge_core::*;
