//! Double-precision complex numbers used by every kernel.
//!
//! `Complex` is a plain `Copy` value: all arithmetic returns a new value and
//! nothing is mutated in place.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Complex number with `f64` components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub real: f64,
    pub imag: f64,
}

impl Complex {
    pub const ZERO: Complex = Complex {
        real: 0.0,
        imag: 0.0,
    };

    pub const ONE: Complex = Complex {
        real: 1.0,
        imag: 0.0,
    };

    #[inline]
    pub const fn new(real: f64, imag: f64) -> Self {
        Self { real, imag }
    }

    /// |z|²
    #[inline]
    pub fn norm_sqr(self) -> f64 {
        self.real * self.real + self.imag * self.imag
    }

    /// |z|
    #[inline]
    pub fn abs(self) -> f64 {
        self.norm_sqr().sqrt()
    }

    /// Squared Euclidean distance to `other`.
    #[inline]
    pub fn distance_sqr(self, other: Complex) -> f64 {
        (self - other).norm_sqr()
    }

    /// z²
    #[inline]
    pub fn square(self) -> Self {
        Self {
            real: self.real * self.real - self.imag * self.imag,
            imag: 2.0 * self.real * self.imag,
        }
    }

    #[inline]
    pub fn scale(self, factor: f64) -> Self {
        Self {
            real: self.real * factor,
            imag: self.imag * factor,
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.real.is_finite() && self.imag.is_finite()
    }
}

impl Add for Complex {
    type Output = Complex;

    #[inline]
    fn add(self, rhs: Complex) -> Complex {
        Complex {
            real: self.real + rhs.real,
            imag: self.imag + rhs.imag,
        }
    }
}

impl Sub for Complex {
    type Output = Complex;

    #[inline]
    fn sub(self, rhs: Complex) -> Complex {
        Complex {
            real: self.real - rhs.real,
            imag: self.imag - rhs.imag,
        }
    }
}

impl Mul for Complex {
    type Output = Complex;

    #[inline]
    fn mul(self, rhs: Complex) -> Complex {
        Complex {
            real: self.real * rhs.real - self.imag * rhs.imag,
            imag: self.real * rhs.imag + self.imag * rhs.real,
        }
    }
}

impl Div for Complex {
    type Output = Complex;

    /// Division by zero yields non-finite components; callers guard on the
    /// divisor magnitude first.
    #[inline]
    fn div(self, rhs: Complex) -> Complex {
        let denom = rhs.norm_sqr();
        Complex {
            real: (self.real * rhs.real + self.imag * rhs.imag) / denom,
            imag: (self.imag * rhs.real - self.real * rhs.imag) / denom,
        }
    }
}

impl Neg for Complex {
    type Output = Complex;

    #[inline]
    fn neg(self) -> Complex {
        Complex {
            real: -self.real,
            imag: -self.imag,
        }
    }
}

impl From<(f64, f64)> for Complex {
    fn from((real, imag): (f64, f64)) -> Self {
        Self { real, imag }
    }
}
