use fractalforge_core::Complex;

/// Burning Ship: folds both components to their absolute value before
/// squaring, so `zy = |2·zx·zy| + imag` and `zx = zx² - zy² + real`.
pub fn burning_ship(c: Complex, max_iterations: u32, escape_radius: f64) -> u32 {
    let mut z = Complex::ZERO;

    for i in 0..max_iterations {
        if z.norm_sqr() > escape_radius {
            return i;
        }
        let folded = Complex::new(z.real.abs(), z.imag.abs());
        z = folded.square() + c;
    }

    max_iterations
}
