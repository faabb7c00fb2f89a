//! Color gradients with positioned stops, interpolated in OKLAB.

use super::color_space::{oklab_to_srgb8, srgb8_to_oklab};

/// A color stop in the gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: [u8; 3],
}

impl From<(f64, [u8; 3])> for ColorStop {
    fn from((position, color): (f64, [u8; 3])) -> Self {
        Self { position, color }
    }
}

/// Piecewise gradient. Stops are kept sorted with their OKLAB coordinates
/// precomputed.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<(f64, (f64, f64, f64))>,
}

impl Gradient {
    pub fn new(stops: impl IntoIterator<Item = ColorStop>) -> Self {
        let mut stops: Vec<(f64, (f64, f64, f64))> = stops
            .into_iter()
            .map(|stop| (stop.position, srgb8_to_oklab(stop.color)))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    pub fn from_stops(stops: &[(f64, [u8; 3])]) -> Self {
        Self::new(stops.iter().copied().map(ColorStop::from))
    }

    /// Color at `t` in [0,1]. An empty gradient is black.
    pub fn sample(&self, t: f64) -> [u8; 3] {
        match self.stops.as_slice() {
            [] => [0, 0, 0],
            [(_, (l, a, b))] => oklab_to_srgb8(*l, *a, *b),
            stops => {
                let seg = stops
                    .windows(2)
                    .position(|w| t <= w[1].0)
                    .unwrap_or(stops.len() - 2);

                let (pos0, (l0, a0, b0)) = stops[seg];
                let (pos1, (l1, a1, b1)) = stops[seg + 1];

                let local = if (pos1 - pos0).abs() < 1e-10 {
                    0.0
                } else {
                    ((t - pos0) / (pos1 - pos0)).clamp(0.0, 1.0)
                };

                oklab_to_srgb8(
                    l0 + local * (l1 - l0),
                    a0 + local * (a1 - a0),
                    b0 + local * (b1 - b0),
                )
            }
        }
    }
}
