//! Composite encoding of Newton results into a single `i32`.
//!
//! `value = root * 100 + iterations`. Iteration counts are capped at
//! [`NEWTON_ITERATION_CAP`] so they never reach the stride. Non-convergent
//! pixels use root `-1`, which encodes to a negative value; decoding with
//! Euclidean division recovers `(-1, iterations)`.

/// Distance between consecutive roots in the composite encoding.
pub const ROOT_STRIDE: i32 = 100;

/// Largest iteration count a Newton pixel can report.
pub const NEWTON_ITERATION_CAP: u32 = (ROOT_STRIDE - 1) as u32;

/// Root index used for pixels that never converged.
pub const NO_ROOT: i32 = -1;

/// Effective Newton iteration cap for a requested maximum.
#[inline]
pub fn newton_iteration_cap(max_iterations: u32) -> u32 {
    max_iterations.min(NEWTON_ITERATION_CAP)
}

#[inline]
pub fn encode(root: Option<usize>, iterations: u32) -> i32 {
    let root = root.map_or(NO_ROOT, |r| r as i32);
    root * ROOT_STRIDE + iterations.min(NEWTON_ITERATION_CAP) as i32
}

/// Returns `(root_index, iterations)`; root is `-1` for non-convergent pixels.
#[inline]
pub fn decode(value: i32) -> (i32, u32) {
    (
        value.div_euclid(ROOT_STRIDE),
        value.rem_euclid(ROOT_STRIDE) as u32,
    )
}
