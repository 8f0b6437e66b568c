//! State-space realization of a transfer function.
//!
//! The controllable canonical form is used: for the monic denominator
//! `s^n + a1 s^(n-1) + … + an` the state is `x = [z, z', …, z^(n-1)]` with
//!
//! ```text
//! x' = A x + B u        A = companion(a), B = e_n
//! y  = C x + D u        D = b0, C[j] = b_(n-j) - b0·a_(n-j)
//! ```

use lk_core::{Complex, LkError, LkResult, TransferFunction};
use nalgebra::{DMatrix, DVector};

/// Single-input single-output state-space system.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpace {
    a: DMatrix<f64>,
    b: DVector<f64>,
    c: DVector<f64>,
    d: f64,
}

impl StateSpace {
    /// Realize a proper transfer function.
    ///
    /// # Errors
    ///
    /// `InvalidSystem` when the numerator degree exceeds the denominator
    /// degree; such a system differentiates its input and has no
    /// state-space form.
    pub fn from_tf(system: &TransferFunction) -> LkResult<Self> {
        let den = system.den().trimmed();
        if den.is_zero() {
            return Err(LkError::InvalidSystem {
                what: "denominator is the zero polynomial",
            });
        }
        let num = system.num().trimmed();
        let n = den.degree().unwrap_or(0);
        if num.degree().is_some_and(|m| m > n) {
            return Err(LkError::InvalidSystem {
                what: "improper transfer function (numerator degree exceeds denominator degree) cannot be simulated",
            });
        }

        let den_c = den.coeffs();
        let lead = den_c[0];
        let a_norm: Vec<f64> = den_c.iter().map(|c| c / lead).collect();

        // numerator padded to n + 1 coefficients
        let num_c = num.coeffs();
        let offset = n + 1 - num_c.len();
        let mut b_norm = vec![0.0; n + 1];
        for (i, c) in num_c.iter().enumerate() {
            b_norm[offset + i] = c / lead;
        }
        let d = b_norm[0];

        let mut a = DMatrix::zeros(n, n);
        let mut b = DVector::zeros(n);
        if n > 0 {
            for i in 0..n - 1 {
                a[(i, i + 1)] = 1.0;
            }
            for j in 0..n {
                a[(n - 1, j)] = -a_norm[n - j];
            }
            b[n - 1] = 1.0;
        }
        let c = DVector::from_fn(n, |j, _| b_norm[n - j] - d * a_norm[n - j]);

        Ok(Self { a, b, c, d })
    }

    /// Number of states.
    pub fn order(&self) -> usize {
        self.b.len()
    }

    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn b(&self) -> &DVector<f64> {
        &self.b
    }

    /// Output weights, one per state.
    pub fn c(&self) -> &DVector<f64> {
        &self.c
    }

    /// Direct feedthrough.
    pub fn d(&self) -> f64 {
        self.d
    }

    /// `y = C x + D u`.
    pub fn output(&self, x: &DVector<f64>, u: f64) -> f64 {
        self.c.dot(x) + self.d * u
    }

    /// `x' = A x + B u`.
    pub fn derivative(&self, x: &DVector<f64>, u: f64) -> DVector<f64> {
        &self.a * x + &self.b * u
    }

    /// Eigenvalues of `A` (the poles of the realized system).
    pub fn eigenvalues(&self) -> Vec<Complex<f64>> {
        if self.order() == 0 {
            return Vec::new();
        }
        self.a.complex_eigenvalues().iter().copied().collect()
    }

    /// Largest pole magnitude, `0` for a static gain.
    pub fn fastest_rate(&self) -> f64 {
        self.eigenvalues()
            .iter()
            .map(|p| p.norm())
            .fold(0.0, f64::max)
    }

    /// `D - C A⁻¹ B`, or `None` when `A` is singular (pole at the origin).
    pub fn dc_gain(&self) -> Option<f64> {
        if self.order() == 0 {
            return Some(self.d);
        }
        let x = self.a.clone().lu().solve(&self.b)?;
        Some(self.d - self.c.dot(&x))
    }
}
