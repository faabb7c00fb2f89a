//! Iteration value to RGBA.
//!
//! Escape-time kinds index the palette by `value / max`. Newton decodes the
//! composite value and picks a shade inside the partition owned by the root.

use super::{Palette, Rgba};
use fractalforge_core::{newton_code, FractalParameters};

/// Color for points that never escaped or never converged.
pub const INTERIOR: Rgba = [0, 0, 0, 255];

/// Color one matrix value according to the kind that produced it.
pub fn colorize(value: i32, params: &FractalParameters, palette: &Palette) -> Rgba {
    match params.root_count() {
        Some(root_count) => newton_color(value, root_count, params.max_iterations(), palette),
        None => escape_color(value, params.max_iterations(), palette),
    }
}

/// `index = floor(value / max * (steps - 1))`; anything at or past the cap
/// is interior.
pub fn escape_color(value: i32, max_iterations: u32, palette: &Palette) -> Rgba {
    if value < 0 || value as i64 >= max_iterations as i64 || palette.is_empty() {
        return INTERIOR;
    }
    let ratio = value as f64 / max_iterations as f64;
    let index = (ratio * (palette.len() - 1) as f64).floor() as usize;
    palette.get(index)
}

pub fn newton_color(value: i32, root_count: usize, max_iterations: u32, palette: &Palette) -> Rgba {
    let (root, iterations) = newton_code::decode(value);
    if root < 0 || root as usize >= root_count || palette.is_empty() {
        return INTERIOR;
    }

    let shade = (1.0 - iterations as f64 / max_iterations.max(1) as f64).clamp(0.0, 1.0);

    let partitions = newton_partition_count(root_count);
    let (start, len) = partition_span(palette.len(), partitions, root as usize);
    let offset = (shade * len.saturating_sub(1) as f64).floor() as usize;
    palette.get(start + offset)
}

/// Number of palette partitions for a Newton render. Four or more roots get
/// an extra trailing band so the first and last hue never sit side by side.
pub fn newton_partition_count(root_count: usize) -> usize {
    if root_count >= 4 {
        root_count + 1
    } else {
        root_count.max(1)
    }
}

/// `(start, len)` of `partition` in a palette of `steps` entries. The last
/// partition absorbs the remainder.
pub fn partition_span(steps: usize, partitions: usize, partition: usize) -> (usize, usize) {
    let partitions = partitions.max(1);
    let base = steps / partitions;
    if base == 0 {
        return (partition.min(steps.saturating_sub(1)), 1);
    }
    let start = partition.min(partitions - 1) * base;
    let len = if partition + 1 >= partitions {
        steps - start
    } else {
        base
    };
    (start, len)
}

/// Partition that owns palette entry `index`.
pub fn partition_of(steps: usize, partitions: usize, index: usize) -> usize {
    let partitions = partitions.max(1);
    let base = steps / partitions;
    if base == 0 {
        return index.min(partitions - 1);
    }
    (index / base).min(partitions - 1)
}
