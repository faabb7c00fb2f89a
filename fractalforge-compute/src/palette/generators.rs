//! Named palette generators. Each is a closed-form function of `t` in [0,1].

use super::color_space::{oklch_to_srgb8, to_byte};
use super::gradient::Gradient;
use super::mapping::{newton_partition_count, partition_of, partition_span};
use std::f64::consts::TAU;

const MANDELBROT_STOPS: &[(f64, [u8; 3])] = &[
    (0.0, [0, 7, 100]),
    (0.16, [32, 107, 203]),
    (0.42, [237, 255, 255]),
    (0.6425, [255, 170, 0]),
    (0.8575, [0, 2, 0]),
    (1.0, [0, 7, 100]),
];

const FIRE_STOPS: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 0]),
    (0.2, [128, 0, 0]),
    (0.4, [255, 0, 0]),
    (0.6, [255, 128, 0]),
    (0.8, [255, 255, 0]),
    (1.0, [255, 255, 255]),
];

const OCEAN_STOPS: &[(f64, [u8; 3])] = &[
    (0.0, [0, 0, 64]),
    (0.25, [0, 64, 128]),
    (0.5, [0, 128, 192]),
    (0.75, [64, 192, 255]),
    (1.0, [255, 255, 255]),
];

const SUNSET_STOPS: &[(f64, [u8; 3])] = &[
    (0.0, [20, 10, 60]),
    (0.35, [140, 30, 110]),
    (0.65, [240, 90, 60]),
    (1.0, [255, 210, 120]),
];

/// Root count assumed by the `newton` palette when none is given.
pub const DEFAULT_ROOT_COUNT: usize = 3;

pub(super) fn mandelbrot(steps: usize) -> Vec<[u8; 3]> {
    sample_gradient(MANDELBROT_STOPS, steps)
}

pub(super) fn fire(steps: usize) -> Vec<[u8; 3]> {
    sample_gradient(FIRE_STOPS, steps)
}

pub(super) fn ocean(steps: usize) -> Vec<[u8; 3]> {
    sample_gradient(OCEAN_STOPS, steps)
}

pub(super) fn sunset(steps: usize) -> Vec<[u8; 3]> {
    sample_gradient(SUNSET_STOPS, steps)
}

/// Cosine palette `0.5 + 0.5·cos(2π(t + phase))` with per-channel phases.
pub(super) fn julia(steps: usize) -> Vec<[u8; 3]> {
    const PHASE: [f64; 3] = [0.0, 0.1, 0.2];
    sample(steps, |t| PHASE.map(|phase| to_byte(0.5 + 0.5 * (TAU * (t + phase)).cos())))
}

/// Black through red and yellow to white.
pub(super) fn hot(steps: usize) -> Vec<[u8; 3]> {
    sample(steps, |t| {
        let r = (3.0 * t).clamp(0.0, 1.0);
        let g = (3.0 * t - 1.0).clamp(0.0, 1.0);
        let b = (3.0 * t - 2.0).clamp(0.0, 1.0);
        [to_byte(r), to_byte(g), to_byte(b)]
    })
}

/// Cyan to magenta.
pub(super) fn cool(steps: usize) -> Vec<[u8; 3]> {
    sample(steps, |t| [to_byte(t), to_byte(1.0 - t), 255])
}

/// Constant lightness hue sweep in OKLCH.
pub(super) fn rainbow(steps: usize) -> Vec<[u8; 3]> {
    sample(steps, |t| oklch_to_srgb8(0.72, 0.15, 0.08 + 0.85 * t))
}

pub(super) fn grayscale(steps: usize) -> Vec<[u8; 3]> {
    sample(steps, |t| {
        let v = to_byte(t);
        [v, v, v]
    })
}

/// One hue band per root, each ramping dark to bright. With four or more
/// roots a trailing grayscale band is appended.
pub(super) fn newton(steps: usize, root_count: usize) -> Vec<[u8; 3]> {
    let root_count = root_count.max(1);
    let partitions = newton_partition_count(root_count);

    (0..steps)
        .map(|i| {
            let part = partition_of(steps, partitions, i);
            let (start, len) = partition_span(steps, partitions, part);
            let t = if len > 1 {
                (i - start) as f64 / (len - 1) as f64
            } else {
                1.0
            };

            if part < root_count {
                let hue = part as f64 / root_count as f64;
                oklch_to_srgb8(0.3 + 0.55 * t, 0.08 + 0.07 * t, hue)
            } else {
                let v = to_byte(0.25 + 0.6 * t);
                [v, v, v]
            }
        })
        .collect()
}

fn sample_gradient(stops: &[(f64, [u8; 3])], steps: usize) -> Vec<[u8; 3]> {
    let gradient = Gradient::from_stops(stops);
    sample(steps, |t| gradient.sample(t))
}

fn sample(steps: usize, mut f: impl FnMut(f64) -> [u8; 3]) -> Vec<[u8; 3]> {
    let last = steps.saturating_sub(1).max(1) as f64;
    (0..steps).map(|i| f(i as f64 / last)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_spans_both_ends() {
        let ts: Vec<f64> = {
            let mut out = Vec::new();
            sample(5, |t| {
                out.push(t);
                [0, 0, 0]
            });
            out
        };
        assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn hot_runs_black_to_white() {
        let colors = hot(256);
        assert_eq!(colors[0], [0, 0, 0]);
        assert_eq!(colors[255], [255, 255, 255]);
    }

    #[test]
    fn grayscale_is_linear() {
        let colors = grayscale(256);
        for (i, c) in colors.iter().enumerate() {
            assert_eq!(*c, [i as u8, i as u8, i as u8]);
        }
    }

    #[test]
    fn fire_and_ocean_hit_their_stop_colors() {
        assert_eq!(fire(6)[0], [0, 0, 0]);
        assert_eq!(fire(6)[5], [255, 255, 255]);
        assert_eq!(ocean(5)[2], [0, 128, 192]);
    }

    #[test]
    fn newton_bands_have_distinct_hues() {
        let colors = newton(256, 3);
        let brightest: Vec<[u8; 3]> = (0..3)
            .map(|part| {
                let (start, len) = partition_span(256, 3, part);
                colors[start + len - 1]
            })
            .collect();
        assert_ne!(brightest[0], brightest[1]);
        assert_ne!(brightest[1], brightest[2]);
        assert_ne!(brightest[0], brightest[2]);
    }

    #[test]
    fn newton_with_many_roots_ends_in_gray() {
        let colors = newton(256, 5);
        let last = colors[255];
        assert_eq!(last[0], last[1]);
        assert_eq!(last[1], last[2]);
    }
}
