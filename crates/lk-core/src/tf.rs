//! Rational transfer functions `G(s) = N(s) / D(s)`.
//!
//! A [`TransferFunction`] is an immutable value. Every combinator returns a
//! new instance; nothing is cancelled or simplified, so a series connection
//! of `(s + 1)` and `1 / (s + 1)` keeps both factors.
//!
//! Numerator and denominator coefficients are given highest power of `s`
//! first, see [`Polynomial`].

use core::fmt;

use nalgebra::Complex;

use crate::error::{LkError, LkResult};
use crate::numeric::{Real, ensure_all_finite, ensure_finite};
use crate::poly::Polynomial;

/// Anything that can hand out a transfer function.
///
/// Loop composition and the simulator accept any implementor, so plant and
/// controller models plug in directly without a common base type.
pub trait HasTransferFunction {
    fn tf(&self) -> &TransferFunction;
}

/// Continuous-time SISO transfer function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawTransferFunction", into = "RawTransferFunction")
)]
pub struct TransferFunction {
    num: Polynomial,
    den: Polynomial,
}

/// Unchecked wire form, validated on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawTransferFunction {
    num: Vec<Real>,
    den: Vec<Real>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTransferFunction> for TransferFunction {
    type Error = LkError;

    fn try_from(raw: RawTransferFunction) -> Result<Self, Self::Error> {
        Self::new(raw.num, raw.den)
    }
}

#[cfg(feature = "serde")]
impl From<TransferFunction> for RawTransferFunction {
    fn from(tf: TransferFunction) -> Self {
        Self {
            num: tf.num.into(),
            den: tf.den.into(),
        }
    }
}

impl TransferFunction {
    /// Build `num(s) / den(s)` from coefficients, highest degree first.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if either list is empty
    /// - `NonFinite` if any coefficient is NaN or infinite
    /// - `InvalidSystem` if the denominator is identically zero
    pub fn new(num: Vec<Real>, den: Vec<Real>) -> LkResult<Self> {
        let num = Polynomial::new(num)?;
        let den = Polynomial::new(den)?;
        Self::from_polys(num, den)
    }

    /// Build from polynomials, typically the result of polynomial algebra.
    ///
    /// Products and sums of finite coefficients can still overflow, so the
    /// coefficients are checked again here.
    pub fn from_polys(num: Polynomial, den: Polynomial) -> LkResult<Self> {
        ensure_all_finite(num.coeffs(), "numerator coefficient")?;
        ensure_all_finite(den.coeffs(), "denominator coefficient")?;
        if den.is_zero() {
            return Err(LkError::InvalidSystem {
                what: "denominator is the zero polynomial",
            });
        }
        Ok(Self { num, den })
    }

    /// Static gain `G(s) = k`.
    pub fn gain(k: Real) -> LkResult<Self> {
        Self::new(vec![k], vec![1.0])
    }

    /// `G(s) = 1`.
    pub fn identity() -> Self {
        Self {
            num: Polynomial::constant(1.0),
            den: Polynomial::constant(1.0),
        }
    }

    pub fn num(&self) -> &Polynomial {
        &self.num
    }

    pub fn den(&self) -> &Polynomial {
        &self.den
    }

    /// Numerator coefficients, highest degree first.
    pub fn numerator(&self) -> &[Real] {
        self.num.coeffs()
    }

    /// Denominator coefficients, highest degree first.
    pub fn denominator(&self) -> &[Real] {
        self.den.coeffs()
    }

    /// Degree of the denominator (number of poles).
    pub fn order(&self) -> usize {
        self.den.degree().unwrap_or(0)
    }

    /// `deg N ≤ deg D`.
    pub fn is_proper(&self) -> bool {
        self.num.degree().unwrap_or(0) <= self.order()
    }

    /// `deg N < deg D`, or a zero numerator.
    pub fn is_strictly_proper(&self) -> bool {
        match self.num.degree() {
            Some(d) => d < self.order(),
            None => true,
        }
    }

    /// `N(0) / D(0)`, or `None` when the system has a pole at the origin.
    pub fn dc_gain(&self) -> Option<Real> {
        let d0 = self.den.constant_term();
        if d0 == 0.0 {
            None
        } else {
            Some(self.num.constant_term() / d0)
        }
    }

    /// Roots of the denominator.
    pub fn poles(&self) -> Vec<Complex<Real>> {
        self.den.roots()
    }

    /// Roots of the numerator.
    pub fn zeros(&self) -> Vec<Complex<Real>> {
        self.num.roots()
    }

    /// `G(s)` at a complex point.
    pub fn eval(&self, s: Complex<Real>) -> Complex<Real> {
        self.num.eval_complex(s) / self.den.eval_complex(s)
    }

    /// `G(jω)`.
    pub fn freq_response(&self, omega: Real) -> Complex<Real> {
        self.eval(Complex::new(0.0, omega))
    }

    /// `k · G(s)`.
    pub fn scaled(&self, k: Real) -> LkResult<Self> {
        ensure_finite(k, "scale factor")?;
        Self::from_polys(self.num.scale(k), self.den.clone())
    }

    fn check_den(&self) -> LkResult<()> {
        if self.den.is_zero() {
            Err(LkError::InvalidSystem {
                what: "denominator is the zero polynomial",
            })
        } else {
            Ok(())
        }
    }

    /// Cascade `self` then `other`: `N1·N2 / (D1·D2)`, no cancellation.
    pub fn series(&self, other: &Self) -> LkResult<Self> {
        self.check_den()?;
        other.check_den()?;
        Self::from_polys(&self.num * &other.num, &self.den * &other.den)
    }

    /// Negative feedback through `sensor`: `G / (1 + G·H)`.
    ///
    /// `num = Ng·Dh`, `den = Dg·Dh + Ng·Nh`.
    pub fn feedback(&self, sensor: &Self) -> LkResult<Self> {
        self.check_den()?;
        sensor.check_den()?;
        let num = &self.num * &sensor.den;
        let den = &(&self.den * &sensor.den) + &(&self.num * &sensor.num);
        if den.is_zero() {
            return Err(LkError::InvalidSystem {
                what: "closed-loop denominator 1 + G·H vanishes identically",
            });
        }
        Self::from_polys(num, den)
    }

    /// Unity negative feedback `G / (1 + G)`: `num = Ng`, `den = Dg + Ng`.
    pub fn feedback_unity(&self) -> LkResult<Self> {
        self.check_den()?;
        let den = &self.den + &self.num;
        if den.is_zero() {
            return Err(LkError::InvalidSystem {
                what: "closed-loop denominator 1 + G vanishes identically",
            });
        }
        Self::from_polys(self.num.clone(), den)
    }
}

impl HasTransferFunction for TransferFunction {
    fn tf(&self) -> &TransferFunction {
        self
    }
}

impl fmt::Display for TransferFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) / ({})", self.num, self.den)
    }
}
