use crate::{FractalKind, FractalParameters, IterationMatrix, RenderRegion, Resolution};
use serde::{Deserialize, Serialize};

/// Correlation id pairing a request with its reply.
pub type TaskId = u64;

/// Messages sent from the engine to a worker.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MainToWorker {
    /// Render one tile of a `full_width x full_height` image.
    Render {
        id: TaskId,
        fractal_kind: FractalKind,
        parameters: FractalParameters,
        full_width: u32,
        full_height: u32,
        tile_x: u32,
        tile_y: u32,
        tile_width: u32,
        tile_height: u32,
        palette_name: String,
    },

    /// Drop every cached palette.
    ClearPalettes,

    /// Exit the worker loop.
    Terminate,
}

impl MainToWorker {
    pub fn render(
        id: TaskId,
        parameters: FractalParameters,
        resolution: Resolution,
        tile: RenderRegion,
        palette_name: impl Into<String>,
    ) -> Self {
        MainToWorker::Render {
            id,
            fractal_kind: parameters.kind(),
            parameters,
            full_width: resolution.width,
            full_height: resolution.height,
            tile_x: tile.x,
            tile_y: tile.y,
            tile_width: tile.width,
            tile_height: tile.height,
            palette_name: palette_name.into(),
        }
    }
}

/// Messages sent from a worker to the engine.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WorkerToMain {
    /// Worker thread started and is ready for work.
    Ready { worker: usize },

    /// Tile-local progress in [0, 1].
    Progress { id: TaskId, progress: f32 },

    /// Tile finished.
    Complete {
        id: TaskId,
        /// RGBA8, `tile_width * tile_height * 4` bytes.
        pixels: Vec<u8>,
        iteration_matrix: IterationMatrix,
        elapsed_time_ms: f64,
        tile_x: u32,
        tile_y: u32,
        tile_width: u32,
        tile_height: u32,
    },

    /// Tile failed.
    Error { id: TaskId, reason: String },
}

impl WorkerToMain {
    /// Correlation id, `None` for `Ready`.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            WorkerToMain::Ready { .. } => None,
            WorkerToMain::Progress { id, .. }
            | WorkerToMain::Complete { id, .. }
            | WorkerToMain::Error { id, .. } => Some(*id),
        }
    }

    /// True for the single reply that ends a request.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkerToMain::Complete { .. } | WorkerToMain::Error { .. }
        )
    }
}
