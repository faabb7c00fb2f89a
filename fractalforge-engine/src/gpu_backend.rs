//! GPU dispatch. The device computes the iteration matrix; colors come from
//! the host palette exactly as on the CPU paths.

use crate::error::RenderError;
use fractalforge_compute::{colorize, Palette};
use fractalforge_core::{FractalParameters, IterationMatrix, Resolution};
use fractalforge_gpu::GpuRenderer;

pub(crate) async fn render(
    renderer: &GpuRenderer,
    params: &FractalParameters,
    resolution: Resolution,
    palette: &Palette,
    on_progress: &(dyn Fn(f32) + Send + Sync),
) -> Result<(Vec<u8>, IterationMatrix), RenderError> {
    let result = renderer.render(params, resolution).await?;
    log::debug!("GPU compute took {:.2}ms", result.compute_time_ms);

    let pixels = colorize_matrix(params, &result.iterations, palette);
    on_progress(1.0);
    Ok((pixels, result.iterations))
}

pub(crate) fn colorize_matrix(
    params: &FractalParameters,
    iterations: &IterationMatrix,
    palette: &Palette,
) -> Vec<u8> {
    iterations
        .values()
        .iter()
        .flat_map(|&value| colorize(value, params, palette))
        .collect()
}
