//! Per-fractal configuration registry.
//!
//! Default views and capabilities for each fractal kind, shared by the
//! engine and the compute workers.

use crate::{Complex, FractalKind, FractalParameters, ViewParameters};

/// Configuration for a fractal kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalConfig {
    pub kind: FractalKind,
    /// Unique identifier (matches `FractalKind::as_str`)
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    pub default_center: (f64, f64),
    pub default_zoom: f64,
    pub default_iterations: u32,
    pub default_escape_radius: f64,
    /// Palette used when the caller does not pick one.
    pub default_palette: &'static str,
    /// Whether the GPU backend has a kernel for this kind.
    pub gpu_kernel: bool,
}

impl FractalConfig {
    pub fn default_view(&self) -> ViewParameters {
        ViewParameters::new(
            self.default_center.0,
            self.default_center.1,
            self.default_zoom,
            self.default_iterations,
            self.default_escape_radius,
        )
    }

    /// Ready-to-render parameters for this kind's default view.
    pub fn default_parameters(&self) -> FractalParameters {
        let view = self.default_view();
        match self.kind {
            FractalKind::Mandelbrot => FractalParameters::mandelbrot(view),
            FractalKind::Julia => FractalParameters::julia(view, DEFAULT_JULIA_C),
            FractalKind::BurningShip => FractalParameters::burning_ship(view),
            FractalKind::Newton => FractalParameters::newton(
                view,
                DEFAULT_NEWTON_TOLERANCE,
                CUBE_ROOTS_OF_UNITY.to_vec(),
            ),
        }
    }
}

pub const DEFAULT_JULIA_C: Complex = Complex::new(-0.7, 0.27015);

pub const DEFAULT_NEWTON_TOLERANCE: f64 = 1e-6;

/// Roots of z³ - 1.
pub const CUBE_ROOTS_OF_UNITY: [Complex; 3] = [
    Complex::new(1.0, 0.0),
    Complex::new(-0.5, 0.866_025_403_784_438_6),
    Complex::new(-0.5, -0.866_025_403_784_438_6),
];

pub static FRACTAL_CONFIGS: &[FractalConfig] = &[
    FractalConfig {
        kind: FractalKind::Mandelbrot,
        id: "mandelbrot",
        display_name: "Mandelbrot Set",
        default_center: (-0.5, 0.0),
        default_zoom: 1.0,
        default_iterations: 256,
        default_escape_radius: 4.0,
        default_palette: "mandelbrot",
        gpu_kernel: true,
    },
    FractalConfig {
        kind: FractalKind::Julia,
        id: "julia",
        display_name: "Julia Set",
        default_center: (0.0, 0.0),
        default_zoom: 1.0,
        default_iterations: 256,
        default_escape_radius: 4.0,
        default_palette: "julia",
        gpu_kernel: false,
    },
    FractalConfig {
        kind: FractalKind::BurningShip,
        id: "burning-ship",
        display_name: "Burning Ship",
        default_center: (-0.4, -0.6),
        default_zoom: 1.0,
        default_iterations: 256,
        default_escape_radius: 4.0,
        default_palette: "fire",
        gpu_kernel: false,
    },
    FractalConfig {
        kind: FractalKind::Newton,
        id: "newton",
        display_name: "Newton Fractal",
        default_center: (0.0, 0.0),
        default_zoom: 1.0,
        default_iterations: 64,
        default_escape_radius: 4.0,
        default_palette: "newton",
        gpu_kernel: false,
    },
];

/// Configuration for a kind. Every kind has an entry.
pub fn config_for(kind: FractalKind) -> &'static FractalConfig {
    match kind {
        FractalKind::Mandelbrot => &FRACTAL_CONFIGS[0],
        FractalKind::Julia => &FRACTAL_CONFIGS[1],
        FractalKind::BurningShip => &FRACTAL_CONFIGS[2],
        FractalKind::Newton => &FRACTAL_CONFIGS[3],
    }
}
