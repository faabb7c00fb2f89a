//! Per-call render options.

use fractalforge_core::{config_for, FractalKind, Resolution};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Receives overall progress in [0, 1].
pub type ProgressCallback = Arc<dyn Fn(f32) + Send + Sync>;

/// The three interchangeable compute backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Gpu,
    Workers,
    Cpu,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Gpu => "gpu",
            Backend::Workers => "workers",
            Backend::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct RenderOptions {
    pub resolution: Resolution,
    pub palette: String,
    pub prefer_gpu: bool,
    pub prefer_workers: bool,
    /// Overrides the tile-size policy for worker renders.
    pub tile_size: Option<u32>,
    /// Force a backend instead of the preference chain.
    pub backend: Option<Backend>,
    pub on_progress: Option<ProgressCallback>,
}

impl RenderOptions {
    /// Both preferences on, `mandelbrot` palette.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            palette: "mandelbrot".to_string(),
            prefer_gpu: true,
            prefer_workers: true,
            tile_size: None,
            backend: None,
            on_progress: None,
        }
    }

    /// Options using the kind's default palette.
    pub fn for_kind(kind: FractalKind, resolution: Resolution) -> Self {
        Self::new(resolution).with_palette(config_for(kind).default_palette)
    }

    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = palette.into();
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = Some(tile_size);
        self
    }

    pub fn prefer_gpu(mut self, prefer: bool) -> Self {
        self.prefer_gpu = prefer;
        self
    }

    pub fn prefer_workers(mut self, prefer: bool) -> Self {
        self.prefer_workers = prefer;
        self
    }

    pub fn on_progress(mut self, callback: impl Fn(f32) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Arc::new(callback));
        self
    }

    pub(crate) fn report(&self, progress: f32) {
        if let Some(callback) = &self.on_progress {
            callback(progress.clamp(0.0, 1.0));
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("resolution", &self.resolution)
            .field("palette", &self.palette)
            .field("prefer_gpu", &self.prefer_gpu)
            .field("prefer_workers", &self.prefer_workers)
            .field("tile_size", &self.tile_size)
            .field("backend", &self.backend)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}
