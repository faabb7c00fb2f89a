//! Render timing metrics.

use serde::Serialize;
use std::collections::VecDeque;

/// Snapshot returned by `FractalEngine::performance_metrics`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// `1000 / average_render_time_ms`, 0 before the first render.
    pub fps: f64,
    pub average_render_time_ms: f64,
    pub last_render_time_ms: f64,
    pub render_count: u64,
    pub total_render_time_ms: f64,
    pub memory_usage_mb: f64,
}

/// Keeps the most recent render times in a fixed-size ring.
#[derive(Debug)]
pub struct MetricsRecorder {
    recent: VecDeque<f64>,
    capacity: usize,
    render_count: u64,
    total_ms: f64,
    last_ms: f64,
    last_memory_bytes: usize,
}

impl MetricsRecorder {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            recent: VecDeque::with_capacity(capacity),
            capacity,
            render_count: 0,
            total_ms: 0.0,
            last_ms: 0.0,
            last_memory_bytes: 0,
        }
    }

    pub fn record(&mut self, elapsed_ms: f64, memory_bytes: usize) {
        if self.recent.len() == self.capacity {
            self.recent.pop_front();
        }
        self.recent.push_back(elapsed_ms);
        self.render_count += 1;
        self.total_ms += elapsed_ms;
        self.last_ms = elapsed_ms;
        self.last_memory_bytes = memory_bytes;
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        let average = if self.recent.is_empty() {
            0.0
        } else {
            self.recent.iter().sum::<f64>() / self.recent.len() as f64
        };
        let fps = if average > 0.0 { 1000.0 / average } else { 0.0 };

        PerformanceMetrics {
            fps,
            average_render_time_ms: average,
            last_render_time_ms: self.last_ms,
            render_count: self.render_count,
            total_render_time_ms: self.total_ms,
            memory_usage_mb: self.last_memory_bytes as f64 / (1024.0 * 1024.0),
        }
    }

    /// Number of samples in the ring.
    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.render_count = 0;
        self.total_ms = 0.0;
        self.last_ms = 0.0;
        self.last_memory_bytes = 0;
    }
}
