//! Deduplication keys for in-flight renders.

use crate::options::RenderOptions;
use fractalforge_core::FractalParameters;
use std::fmt::Write;

/// Identity of a render request. Two requests with equal fingerprints
/// produce identical output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(params: &FractalParameters, options: &RenderOptions) -> Self {
        let view = params.view();
        let mut key = format!(
            "{}|{}x{}|{}|{}|{}|{}|{}",
            params.kind(),
            options.resolution.width,
            options.resolution.height,
            view.iterations,
            round(view.center_x),
            round(view.center_y),
            round(view.zoom),
            round(view.escape_radius),
        );

        match params {
            FractalParameters::Julia { c, .. } => {
                let _ = write!(key, "|c={:.6},{:.6}", c.real, c.imag);
            }
            FractalParameters::Newton {
                tolerance, roots, ..
            } => {
                let _ = write!(key, "|tol={}", round(*tolerance));
                for root in roots {
                    let _ = write!(key, "|{},{}", round(root.real), round(root.imag));
                }
            }
            FractalParameters::Mandelbrot { .. } | FractalParameters::BurningShip { .. } => {}
        }

        let _ = write!(key, "|palette={}", options.palette);
        if let Some(size) = options.tile_size {
            let _ = write!(key, "|tile={size}");
        }
        if let Some(backend) = options.backend {
            let _ = write!(key, "|backend={backend}");
        }

        Fingerprint(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Twelve significant digits; absorbs float noise from repeated view math.
fn round(value: f64) -> String {
    format!("{value:.12e}")
}
