//! Fractal parameter types.
//!
//! `FractalParameters` is a sum type keyed by fractal kind. Every variant
//! carries the shared view description; Julia and Newton add their own
//! payload. Kernel dispatch is a `match` on the variant.

use crate::Complex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four supported fractal families.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FractalKind {
    Mandelbrot,
    Julia,
    BurningShip,
    Newton,
}

impl FractalKind {
    pub const ALL: [FractalKind; 4] = [
        FractalKind::Mandelbrot,
        FractalKind::Julia,
        FractalKind::BurningShip,
        FractalKind::Newton,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "mandelbrot",
            FractalKind::Julia => "julia",
            FractalKind::BurningShip => "burning-ship",
            FractalKind::Newton => "newton",
        }
    }

    /// Escape-time kinds produce plain iteration counts; Newton produces the
    /// composite root/iteration encoding.
    pub fn is_escape_time(&self) -> bool {
        !matches!(self, FractalKind::Newton)
    }
}

impl fmt::Display for FractalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FractalKind {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mandelbrot" => Ok(FractalKind::Mandelbrot),
            "julia" => Ok(FractalKind::Julia),
            "burning-ship" | "burning_ship" | "burningship" => Ok(FractalKind::BurningShip),
            "newton" => Ok(FractalKind::Newton),
            other => Err(ParameterError::UnknownKind(other.to_string())),
        }
    }
}

/// Rejected parameter combinations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParameterError {
    #[error("unknown fractal kind: {0}")]
    UnknownKind(String),

    #[error("iteration cap must be at least 1")]
    ZeroIterations,

    #[error("iteration cap {0} does not fit the iteration matrix")]
    TooManyIterations(u32),

    #[error("zoom must be positive and finite, got {0}")]
    InvalidZoom(f64),

    #[error("escape radius must be positive and finite, got {0}")]
    InvalidEscapeRadius(f64),

    #[error("center coordinates must be finite")]
    NonFiniteCenter,

    #[error("newton tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("newton render requires at least one root")]
    EmptyRoots,

    #[error("newton root {0} is not finite")]
    NonFiniteRoot(usize),

    #[error("julia constant must be finite")]
    NonFiniteJuliaConstant,
}

/// View description shared by every fractal kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewParameters {
    pub zoom: f64,
    pub center_x: f64,
    pub center_y: f64,
    /// Iteration cap.
    pub iterations: u32,
    /// Compared against |z|² by the escape-time kernels.
    pub escape_radius: f64,
}

impl ViewParameters {
    pub fn new(center_x: f64, center_y: f64, zoom: f64, iterations: u32, escape_radius: f64) -> Self {
        Self {
            zoom,
            center_x,
            center_y,
            iterations,
            escape_radius,
        }
    }

    fn validate(&self) -> Result<(), ParameterError> {
        if self.iterations == 0 {
            return Err(ParameterError::ZeroIterations);
        }
        if self.iterations > i32::MAX as u32 {
            return Err(ParameterError::TooManyIterations(self.iterations));
        }
        if !(self.zoom.is_finite() && self.zoom > 0.0) {
            return Err(ParameterError::InvalidZoom(self.zoom));
        }
        if !(self.escape_radius.is_finite() && self.escape_radius > 0.0) {
            return Err(ParameterError::InvalidEscapeRadius(self.escape_radius));
        }
        if !(self.center_x.is_finite() && self.center_y.is_finite()) {
            return Err(ParameterError::NonFiniteCenter);
        }
        Ok(())
    }
}

/// Everything a kernel needs to compute one fractal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FractalParameters {
    Mandelbrot {
        #[serde(flatten)]
        view: ViewParameters,
    },
    Julia {
        #[serde(flatten)]
        view: ViewParameters,
        c: Complex,
    },
    BurningShip {
        #[serde(flatten)]
        view: ViewParameters,
    },
    Newton {
        #[serde(flatten)]
        view: ViewParameters,
        tolerance: f64,
        /// Order only matters for color assignment.
        roots: Vec<Complex>,
    },
}

impl FractalParameters {
    pub fn mandelbrot(view: ViewParameters) -> Self {
        FractalParameters::Mandelbrot { view }
    }

    pub fn julia(view: ViewParameters, c: Complex) -> Self {
        FractalParameters::Julia { view, c }
    }

    pub fn burning_ship(view: ViewParameters) -> Self {
        FractalParameters::BurningShip { view }
    }

    pub fn newton(view: ViewParameters, tolerance: f64, roots: Vec<Complex>) -> Self {
        FractalParameters::Newton {
            view,
            tolerance,
            roots,
        }
    }

    pub fn kind(&self) -> FractalKind {
        match self {
            FractalParameters::Mandelbrot { .. } => FractalKind::Mandelbrot,
            FractalParameters::Julia { .. } => FractalKind::Julia,
            FractalParameters::BurningShip { .. } => FractalKind::BurningShip,
            FractalParameters::Newton { .. } => FractalKind::Newton,
        }
    }

    pub fn view(&self) -> &ViewParameters {
        match self {
            FractalParameters::Mandelbrot { view }
            | FractalParameters::Julia { view, .. }
            | FractalParameters::BurningShip { view }
            | FractalParameters::Newton { view, .. } => view,
        }
    }

    pub fn max_iterations(&self) -> u32 {
        self.view().iterations
    }

    /// Number of Newton roots, `None` for escape-time kinds.
    pub fn root_count(&self) -> Option<usize> {
        match self {
            FractalParameters::Newton { roots, .. } => Some(roots.len()),
            _ => None,
        }
    }

    /// Check the parameters describe a renderable fractal.
    pub fn validate(&self) -> Result<(), ParameterError> {
        self.view().validate()?;
        match self {
            FractalParameters::Julia { c, .. } if !c.is_finite() => {
                Err(ParameterError::NonFiniteJuliaConstant)
            }
            FractalParameters::Newton {
                tolerance, roots, ..
            } => {
                if !(tolerance.is_finite() && *tolerance > 0.0) {
                    return Err(ParameterError::InvalidTolerance(*tolerance));
                }
                if roots.is_empty() {
                    return Err(ParameterError::EmptyRoots);
                }
                if let Some(index) = roots.iter().position(|r| !r.is_finite()) {
                    return Err(ParameterError::NonFiniteRoot(index));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
