//! Per-pixel numeric kernels.
//!
//! Every kernel is a pure function of one complex point and the fractal's
//! parameters. Escape-time kernels return a plain iteration count, Newton
//! returns the composite root/iteration code from `newton_code`.

mod burning_ship;
mod julia;
mod mandelbrot;
mod newton;

pub use burning_ship::burning_ship;
pub use julia::julia;
pub use mandelbrot::mandelbrot;
pub use newton::{evaluate_polynomial, nearest_root, newton, NewtonOutcome, DERIVATIVE_EPSILON};

use fractalforge_core::{newton_code, Complex, FractalParameters};

/// Value stored in the iteration matrix for the pixel that maps to `point`.
pub fn evaluate_point(params: &FractalParameters, point: Complex) -> i32 {
    match params {
        FractalParameters::Mandelbrot { view } => {
            mandelbrot(point, view.iterations, view.escape_radius) as i32
        }
        FractalParameters::Julia { view, c } => {
            julia(point, *c, view.iterations, view.escape_radius) as i32
        }
        FractalParameters::BurningShip { view } => {
            burning_ship(point, view.iterations, view.escape_radius) as i32
        }
        FractalParameters::Newton {
            view,
            tolerance,
            roots,
        } => {
            let outcome = newton(point, roots, *tolerance, view.iterations);
            newton_code::encode(outcome.root, outcome.iterations)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fractalforge_core::{ViewParameters, CUBE_ROOTS_OF_UNITY};

    fn view(iterations: u32) -> ViewParameters {
        ViewParameters::new(0.0, 0.0, 1.0, iterations, 4.0)
    }

    #[test]
    fn mandelbrot_interior_reports_cap() {
        let params = FractalParameters::mandelbrot(view(100));
        assert_eq!(evaluate_point(&params, Complex::new(-0.5, 0.0)), 100);
    }

    #[test]
    fn newton_value_decodes_to_valid_root() {
        let params =
            FractalParameters::newton(view(50), 1e-6, CUBE_ROOTS_OF_UNITY.to_vec());
        for &(x, y) in &[(1.0, 0.0), (0.3, 0.9), (-2.0, -1.5), (0.0, 0.0)] {
            let value = evaluate_point(&params, Complex::new(x, y));
            let (root, iterations) = newton_code::decode(value);
            assert!((-1..3).contains(&root), "root {root} for ({x}, {y})");
            assert!(iterations < 100);
        }
    }

    #[test]
    fn origin_is_degenerate_for_roots_of_unity() {
        // f'(0) = 3 * 0² = 0
        let params =
            FractalParameters::newton(view(50), 1e-6, CUBE_ROOTS_OF_UNITY.to_vec());
        let value = evaluate_point(&params, Complex::ZERO);
        assert_eq!(newton_code::decode(value).0, newton_code::NO_ROOT);
    }
}
