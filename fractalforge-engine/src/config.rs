//! Engine configuration.
//!
//! Every field has a default, so a JSON document only needs the keys it
//! overrides.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on worker threads, applied after the logical core count
    /// and the hard cap of 32.
    pub max_workers: usize,
    /// How long pool creation waits for each worker's `ready` message.
    pub worker_init_timeout_ms: u64,
    /// Number of recent render times kept for metrics.
    pub metrics_capacity: usize,
    /// Rows between cooperative yields on the single-thread backend.
    pub cpu_yield_rows: u32,
    /// Rows between worker `progress` messages.
    pub progress_row_interval: u32,
    pub palette_steps: usize,
    pub palette_cache_capacity: usize,
    /// Attempt GPU bootstrap during `initialize`.
    pub enable_gpu: bool,
}

/// Hard cap on pool size regardless of core count.
pub const MAX_POOL_SIZE: usize = 32;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: MAX_POOL_SIZE,
            worker_init_timeout_ms: 2000,
            metrics_capacity: 100,
            cpu_yield_rows: 20,
            progress_row_interval: 10,
            palette_steps: 256,
            palette_cache_capacity: 32,
            enable_gpu: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Worker count for a machine with `cores` logical cores.
    pub fn worker_count(&self, cores: usize) -> usize {
        cores.min(MAX_POOL_SIZE).min(self.max_workers)
    }

    pub(crate) fn worker_settings(&self) -> fractalforge_compute::WorkerSettings {
        fractalforge_compute::WorkerSettings {
            progress_row_interval: self.progress_row_interval,
            palette_steps: self.palette_steps,
            palette_cache_capacity: self.palette_cache_capacity,
        }
    }
}
