use fractalforge_core::Complex;

/// Escape-time iteration of `z -> z² + c` starting at the pixel itself.
pub fn julia(z0: Complex, c: Complex, max_iterations: u32, escape_radius: f64) -> u32 {
    let mut z = z0;

    for i in 0..max_iterations {
        if z.norm_sqr() > escape_radius {
            return i;
        }
        z = z.square() + c;
    }

    max_iterations
}
