//! Palette generation, caching and value-to-color mapping.

mod cache;
pub mod color_space;
mod generators;
pub mod gradient;
mod mapping;

pub use cache::{PaletteCache, PaletteKey, DEFAULT_CACHE_CAPACITY};
pub use generators::DEFAULT_ROOT_COUNT;
pub use gradient::{ColorStop, Gradient};
pub use mapping::{
    colorize, escape_color, newton_color, newton_partition_count, partition_span, INTERIOR,
};

use thiserror::Error;

/// One RGBA8 color.
pub type Rgba = [u8; 4];

pub const DEFAULT_PALETTE_STEPS: usize = 256;

/// Every name `Palette::generate` understands.
pub const PALETTE_NAMES: [&str; 10] = [
    "mandelbrot",
    "julia",
    "newton",
    "hot",
    "cool",
    "rainbow",
    "fire",
    "ocean",
    "sunset",
    "grayscale",
];

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("palette must have at least one step")]
    ZeroSteps,
}

/// A fixed-length ordered list of opaque colors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgba>,
}

impl Palette {
    /// Build the named palette with `steps` entries. `root_count` only
    /// affects the `newton` palette.
    pub fn generate(name: &str, steps: usize, root_count: Option<usize>) -> Result<Self, PaletteError> {
        if steps == 0 {
            return Err(PaletteError::ZeroSteps);
        }

        let rgb = match name {
            "mandelbrot" => generators::mandelbrot(steps),
            "julia" => generators::julia(steps),
            "newton" => generators::newton(steps, root_count.unwrap_or(DEFAULT_ROOT_COUNT)),
            "hot" => generators::hot(steps),
            "cool" => generators::cool(steps),
            "rainbow" => generators::rainbow(steps),
            "fire" => generators::fire(steps),
            "ocean" => generators::ocean(steps),
            "sunset" => generators::sunset(steps),
            "grayscale" => generators::grayscale(steps),
            other => return Err(PaletteError::UnknownPalette(other.to_string())),
        };

        let colors = rgb.into_iter().map(|[r, g, b]| [r, g, b, 255]).collect();
        Ok(Self::from_colors(name, colors))
    }

    pub fn from_colors(name: impl Into<String>, colors: Vec<Rgba>) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Entry at `index`, clamped to the last entry. Empty palettes yield
    /// the interior color.
    pub fn get(&self, index: usize) -> Rgba {
        self.colors
            .get(index.min(self.colors.len().saturating_sub(1)))
            .copied()
            .unwrap_or(INTERIOR)
    }
}
