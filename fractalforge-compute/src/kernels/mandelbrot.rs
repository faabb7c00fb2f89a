use fractalforge_core::Complex;

/// Escape-time iteration of `z -> z² + c` starting at zero.
///
/// Iterates while `|z|² <= escape_radius` and the cap is not reached. The
/// operand order matches the WGSL kernel so both backends agree exactly.
pub fn mandelbrot(c: Complex, max_iterations: u32, escape_radius: f64) -> u32 {
    let mut z = Complex::ZERO;

    for i in 0..max_iterations {
        if z.norm_sqr() > escape_radius {
            return i;
        }
        z = z.square() + c;
    }

    max_iterations
}
