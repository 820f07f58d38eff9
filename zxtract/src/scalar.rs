// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Exact global scalars for ZX-diagrams.
//!
//! Every rewrite used by this crate changes a diagram by a factor of the
//! form `sqrt(2)^k * e^(i pi p)`, so a scalar is stored as the pair
//! `(k, p)` and multiplication is exact.

use crate::phase::Phase;
use num::complex::Complex;
use num::{One, Zero};
use std::fmt;
use std::ops::{Mul, MulAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar {
    sqrt2_pow: i32,
    phase: Phase,
}

impl Scalar {
    pub fn new(sqrt2_pow: i32, phase: impl Into<Phase>) -> Scalar {
        Scalar {
            sqrt2_pow,
            phase: phase.into(),
        }
    }

    pub fn sqrt2_pow(&self) -> i32 {
        self.sqrt2_pow
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mul_sqrt2_pow(&mut self, p: i32) {
        self.sqrt2_pow += p;
    }

    pub fn mul_phase(&mut self, phase: impl Into<Phase>) {
        self.phase += phase.into();
    }

    /// Floating point value of the scalar.
    pub fn to_complex(&self) -> Complex<f64> {
        let mag = 2f64.sqrt().powi(self.sqrt2_pow);
        Complex::from_polar(mag, std::f64::consts::PI * self.phase.to_f64())
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::one()
    }
}

impl One for Scalar {
    fn one() -> Scalar {
        Scalar {
            sqrt2_pow: 0,
            phase: Phase::zero(),
        }
    }

    fn is_one(&self) -> bool {
        self.sqrt2_pow == 0 && self.phase.is_zero()
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar {
            sqrt2_pow: self.sqrt2_pow + rhs.sqrt2_pow,
            phase: self.phase + rhs.phase,
        }
    }
}

impl MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = *self * rhs;
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = *self * *rhs;
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqrt(2)^{}", self.sqrt2_pow)?;
        if !self.phase.is_zero() {
            write!(f, " * exp(i pi {})", self.phase)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn mul_accumulates() {
        let mut s = Scalar::one();
        s.mul_sqrt2_pow(3);
        s.mul_phase((1, 2));
        s *= Scalar::new(-1, (1, 2));
        assert_eq!(s, Scalar::new(2, 1));
        assert!(!s.is_one());
        assert!((s * Scalar::new(-2, 1)).is_one());
    }

    #[test]
    fn complex_value() {
        let s = Scalar::new(2, (1, 2));
        let c = s.to_complex();
        assert_abs_diff_eq!(c.re, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.im, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn display() {
        assert_eq!(Scalar::new(-2, 0).to_string(), "sqrt(2)^-2");
        assert_eq!(Scalar::new(1, (1, 4)).to_string(), "sqrt(2)^1 * exp(i pi 1/4)");
    }
}
