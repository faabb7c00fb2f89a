use crate::options::Backend;
use fractalforge_core::{newton_code, FractalParameters, IterationMatrix, Resolution};
use serde::{Deserialize, Serialize};

/// Summary numbers attached to every result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderStats {
    pub total_pixels: usize,
    pub average_iterations: f64,
    /// Largest iteration count observed. Newton values are decoded first.
    pub max_iterations: u32,
    /// Pixel buffer plus iteration matrix.
    pub memory_estimate_bytes: usize,
    pub tiles_processed: Option<usize>,
    pub workers_used: Option<usize>,
}

impl RenderStats {
    pub fn from_matrix(params: &FractalParameters, iterations: &IterationMatrix) -> Self {
        let total_pixels = iterations.len();
        let counts = iterations.values().iter().map(|&v| iteration_count(params, v));

        let (sum, max) = counts.fold((0u64, 0u32), |(sum, max), n| (sum + n as u64, max.max(n)));
        let average_iterations = if total_pixels == 0 {
            0.0
        } else {
            sum as f64 / total_pixels as f64
        };

        Self {
            total_pixels,
            average_iterations,
            max_iterations: max,
            memory_estimate_bytes: total_pixels * 4 + total_pixels * std::mem::size_of::<i32>(),
            tiles_processed: None,
            workers_used: None,
        }
    }
}

fn iteration_count(params: &FractalParameters, value: i32) -> u32 {
    match params {
        FractalParameters::Newton { .. } => newton_code::decode(value).1,
        _ => value.max(0) as u32,
    }
}

/// Output of one render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    pub resolution: Resolution,
    /// RGBA8, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
    pub iterations: IterationMatrix,
    pub elapsed_ms: f64,
    pub backend: Backend,
    pub stats: RenderStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractalforge_core::{Complex, ViewParameters};

    fn view() -> ViewParameters {
        ViewParameters::new(0.0, 0.0, 1.0, 50, 4.0)
    }

    #[test]
    fn escape_time_stats() {
        let params = FractalParameters::mandelbrot(view());
        let matrix = IterationMatrix::from_values(2, 2, vec![1, 2, 3, 50]).unwrap();
        let stats = RenderStats::from_matrix(&params, &matrix);
        assert_eq!(stats.total_pixels, 4);
        assert!((stats.average_iterations - 14.0).abs() < 1e-12);
        assert_eq!(stats.max_iterations, 50);
        assert_eq!(stats.memory_estimate_bytes, 32);
    }

    #[test]
    fn newton_stats_decode_iterations() {
        let params = FractalParameters::newton(view(), 1e-6, vec![Complex::ONE]);
        let values = vec![
            newton_code::encode(Some(0), 3),
            newton_code::encode(Some(0), 7),
            newton_code::encode(None, 5),
        ];
        let matrix = IterationMatrix::from_values(3, 1, values).unwrap();
        let stats = RenderStats::from_matrix(&params, &matrix);
        assert_eq!(stats.max_iterations, 7);
        assert!((stats.average_iterations - 5.0).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix_has_zero_average() {
        let params = FractalParameters::mandelbrot(view());
        let stats = RenderStats::from_matrix(&params, &IterationMatrix::new(0, 0));
        assert_eq!(stats.average_iterations, 0.0);
        assert_eq!(stats.total_pixels, 0);
    }
}
