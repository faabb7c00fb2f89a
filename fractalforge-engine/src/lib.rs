//! FractalForge orchestration: backend selection, request deduplication,
//! worker-pool tiling, the single-thread CPU fallback and render metrics.
//!
//! ```no_run
//! use fractalforge_engine::{FractalEngine, RenderOptions};
//! use fractalforge_core::{config_for, FractalKind, Resolution};
//!
//! let engine = FractalEngine::default();
//! let resolution = Resolution::new(640, 480);
//! pollster::block_on(engine.initialize(resolution));
//!
//! let params = config_for(FractalKind::Julia).default_parameters();
//! let result = pollster::block_on(engine.render_fractal(params, RenderOptions::new(resolution)));
//! ```

mod config;
mod cpu_backend;
mod engine;
mod error;
mod fingerprint;
mod gpu_backend;
mod metrics;
mod options;
mod progress;
mod result;
mod tiles;
mod worker_pool;

pub use config::EngineConfig;
pub use engine::{select_backend, FractalEngine, RenderFuture};
pub use error::RenderError;
pub use fingerprint::Fingerprint;
pub use metrics::{MetricsRecorder, PerformanceMetrics};
pub use options::{Backend, ProgressCallback, RenderOptions};
pub use progress::RenderProgress;
pub use result::{RenderResult, RenderStats};
pub use tiles::{generate_tiles, tile_size_for};
pub use worker_pool::{TiledImage, WorkerPool};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
