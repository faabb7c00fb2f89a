//! Renders one region of a full image into RGBA pixels and matrix values.
//!
//! Pixels map through full-image coordinates, so any tiling of an image
//! produces exactly the values an untiled render would.

use crate::kernels::evaluate_point;
use crate::palette::{colorize, Palette};
use fractalforge_core::{FractalParameters, IterationMatrix, PlaneMapping, RenderRegion, Resolution};

/// Result of rendering one region.
#[derive(Clone, Debug, PartialEq)]
pub struct TileOutput {
    pub region: RenderRegion,
    /// RGBA8, row-major, `region.width * region.height * 4` bytes.
    pub pixels: Vec<u8>,
    pub iterations: IterationMatrix,
}

/// Row-at-a-time renderer for one region. Callers that need to interleave
/// work (the single-thread backend yields between row batches) drive it
/// directly; everyone else uses [`render_tile`].
pub struct RegionRenderer<'a> {
    params: &'a FractalParameters,
    palette: &'a Palette,
    mapping: PlaneMapping,
    region: RenderRegion,
}

impl<'a> RegionRenderer<'a> {
    pub fn new(
        params: &'a FractalParameters,
        resolution: Resolution,
        region: RenderRegion,
        palette: &'a Palette,
    ) -> Self {
        Self {
            params,
            palette,
            mapping: PlaneMapping::new(params.view(), resolution),
            region,
        }
    }

    pub fn region(&self) -> RenderRegion {
        self.region
    }

    /// Zeroed output buffers sized for the region.
    pub fn blank_output(&self) -> TileOutput {
        TileOutput {
            region: self.region,
            pixels: vec![0; self.region.area() * 4],
            iterations: IterationMatrix::new(self.region.width, self.region.height),
        }
    }

    /// Fill tile-local row `row` of `output`.
    pub fn render_row(&self, row: u32, output: &mut TileOutput) {
        let width = self.region.width as usize;
        let py = self.region.y + row;
        let start = row as usize * width;

        for local_x in 0..self.region.width {
            let px = self.region.x + local_x;
            let value = evaluate_point(self.params, self.mapping.pixel_to_complex(px, py));
            let color = colorize(value, self.params, self.palette);

            let i = start + local_x as usize;
            output.iterations.set(local_x, row, value);
            output.pixels[i * 4..i * 4 + 4].copy_from_slice(&color);
        }
    }
}

/// Render `region` of a `resolution` image.
///
/// `on_progress` receives the completed fraction after every
/// `progress_interval` rows (0 disables it).
pub fn render_tile(
    params: &FractalParameters,
    resolution: Resolution,
    region: RenderRegion,
    palette: &Palette,
    progress_interval: u32,
    mut on_progress: impl FnMut(f32),
) -> TileOutput {
    let renderer = RegionRenderer::new(params, resolution, region, palette);
    let mut output = renderer.blank_output();

    for row in 0..region.height {
        renderer.render_row(row, &mut output);

        let done = row + 1;
        if progress_interval > 0 && done % progress_interval == 0 && done < region.height {
            on_progress(done as f32 / region.height as f32);
        }
    }

    output
}
