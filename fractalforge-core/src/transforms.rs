//! Pixel to complex-plane mapping shared by every backend.
//!
//! The GPU kernel receives the same precomputed `scale` and half extents and
//! performs the same operations in the same order, so every backend maps a
//! given pixel to the same `f64` coordinate.

use crate::{Complex, Resolution, ViewParameters};

/// Width of the complex plane visible at zoom 1.
pub const BASE_PLANE_WIDTH: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneMapping {
    pub center_x: f64,
    pub center_y: f64,
    /// Plane units per pixel, identical on both axes.
    pub scale: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl PlaneMapping {
    pub fn new(view: &ViewParameters, resolution: Resolution) -> Self {
        let width = resolution.width.max(1) as f64;
        Self {
            center_x: view.center_x,
            center_y: view.center_y,
            scale: BASE_PLANE_WIDTH / (view.zoom * width),
            half_width: resolution.width as f64 / 2.0,
            half_height: resolution.height as f64 / 2.0,
        }
    }

    /// Map full-image pixel coordinates to the complex plane.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> Complex {
        Complex::new(
            self.center_x + (px as f64 - self.half_width) * self.scale,
            self.center_y + (py as f64 - self.half_height) * self.scale,
        )
    }
}
