//! Newton-Raphson root finding for `f(z) = Π (z - rᵢ)`.

use fractalforge_core::{newton_iteration_cap, Complex};

/// Below this derivative magnitude a step is treated as undefined and the
/// pixel reports no root.
pub const DERIVATIVE_EPSILON: f64 = 1e-14;

/// Where a starting point ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewtonOutcome {
    /// Index of the nearest root on convergence.
    pub root: Option<usize>,
    /// Iteration index at which the step dropped below tolerance, or the
    /// capped iteration limit when the point never converged.
    pub iterations: u32,
}

/// Evaluate `f(z)` and `f'(z)` directly from the root list.
///
/// `f'(z) = Σᵢ Πⱼ≠ᵢ (z - rⱼ)`, built from prefix and suffix products so each
/// term skips its own factor without dividing.
pub fn evaluate_polynomial(z: Complex, roots: &[Complex]) -> (Complex, Complex) {
    let factors: Vec<Complex> = roots.iter().map(|&r| z - r).collect();

    let mut suffix = vec![Complex::ONE; factors.len() + 1];
    for i in (0..factors.len()).rev() {
        suffix[i] = suffix[i + 1] * factors[i];
    }

    let mut prefix = Complex::ONE;
    let mut derivative = Complex::ZERO;
    for (i, &factor) in factors.iter().enumerate() {
        derivative = derivative + prefix * suffix[i + 1];
        prefix = prefix * factor;
    }

    (prefix, derivative)
}

/// Closest root by squared distance. Ties keep the lowest index and the scan
/// stops at the first root within `tolerance²`.
pub fn nearest_root(z: Complex, roots: &[Complex], tolerance: f64) -> Option<usize> {
    let tolerance_sq = tolerance * tolerance;
    let mut best: Option<(usize, f64)> = None;

    for (index, &root) in roots.iter().enumerate() {
        let distance = z.distance_sqr(root);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((index, distance));
            if distance < tolerance_sq {
                break;
            }
        }
    }

    best.map(|(index, _)| index)
}

/// Run Newton's method from `z0`. The iteration count never exceeds
/// `newton_iteration_cap(max_iterations)`.
pub fn newton(z0: Complex, roots: &[Complex], tolerance: f64, max_iterations: u32) -> NewtonOutcome {
    let cap = newton_iteration_cap(max_iterations);
    let mut z = z0;

    for i in 0..cap {
        let (f, df) = evaluate_polynomial(z, roots);
        if df.abs() < DERIVATIVE_EPSILON {
            break;
        }

        let next = z - f / df;
        if !next.is_finite() {
            break;
        }

        if (next - z).abs() < tolerance {
            return NewtonOutcome {
                root: nearest_root(next, roots, tolerance),
                iterations: i,
            };
        }
        z = next;
    }

    NewtonOutcome {
        root: None,
        iterations: cap,
    }
}
