//! Real polynomials in `s`, coefficients stored highest degree first.
//!
//! `Polynomial::new(vec![1.0, 3.0, 2.0])` is `s² + 3s + 2`. The ordering is
//! load-bearing: addition aligns operands at the constant term and pads the
//! shorter one with zeros on the high-degree side.

use core::fmt;
use core::ops::{Add, Mul};

use nalgebra::{Complex, DMatrix};

use crate::error::{LkError, LkResult};
use crate::numeric::{Real, ensure_all_finite};

/// A non-empty list of finite real coefficients, highest power first.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct Polynomial {
    coeffs: Vec<Real>,
}

impl Polynomial {
    /// Build a polynomial from coefficients, highest degree first.
    pub fn new(coeffs: Vec<Real>) -> LkResult<Self> {
        if coeffs.is_empty() {
            return Err(LkError::invalid_arg("polynomial needs at least one coefficient"));
        }
        ensure_all_finite(&coeffs, "polynomial coefficient")?;
        Ok(Self { coeffs })
    }

    /// The constant polynomial `c`.
    pub fn constant(c: Real) -> Self {
        Self { coeffs: vec![c] }
    }

    /// Coefficients, highest degree first.
    pub fn coeffs(&self) -> &[Real] {
        &self.coeffs
    }

    /// True when every coefficient is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|&c| c == 0.0)
    }

    /// Copy without leading (high-degree) zeros. The zero polynomial trims to `[0.0]`.
    pub fn trimmed(&self) -> Self {
        match self.coeffs.iter().position(|&c| c != 0.0) {
            Some(first) => Self {
                coeffs: self.coeffs[first..].to_vec(),
            },
            None => Self::constant(0.0),
        }
    }

    /// Degree after trimming leading zeros; `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs
            .iter()
            .position(|&c| c != 0.0)
            .map(|first| self.coeffs.len() - 1 - first)
    }

    /// Value at `s = 0`.
    pub fn constant_term(&self) -> Real {
        // coeffs is never empty
        self.coeffs[self.coeffs.len() - 1]
    }

    /// Horner evaluation at a real point.
    pub fn eval(&self, s: Real) -> Real {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * s + c)
    }

    /// Horner evaluation at a complex point.
    pub fn eval_complex(&self, s: Complex<Real>) -> Complex<Real> {
        self.coeffs
            .iter()
            .fold(Complex::new(0.0, 0.0), |acc, &c| acc * s + c)
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(&self, k: Real) -> Self {
        Self {
            coeffs: self.coeffs.iter().map(|c| c * k).collect(),
        }
    }

    /// Complex roots, sorted by real part then imaginary part.
    ///
    /// Computed as eigenvalues of the companion matrix. Zero roots are split
    /// off first so that exact integrators report an exact `0`.
    pub fn roots(&self) -> Vec<Complex<Real>> {
        let p = self.trimmed();
        let Some(degree) = p.degree() else {
            return Vec::new();
        };
        if degree == 0 {
            return Vec::new();
        }

        let zero_roots = p.coeffs.iter().rev().take_while(|&&c| c == 0.0).count();
        let core = &p.coeffs[..p.coeffs.len() - zero_roots];
        let mut roots = vec![Complex::new(0.0, 0.0); zero_roots];

        let m = core.len() - 1;
        if m == 1 {
            roots.push(Complex::new(-core[1] / core[0], 0.0));
        } else if m > 1 {
            let lead = core[0];
            let companion = DMatrix::from_fn(m, m, |r, c| {
                if r == 0 {
                    -core[c + 1] / lead
                } else if r == c + 1 {
                    1.0
                } else {
                    0.0
                }
            });
            roots.extend(companion.complex_eigenvalues().iter().copied());
        }

        roots.sort_by(|a, b| {
            a.re.partial_cmp(&b.re)
                .unwrap_or(core::cmp::Ordering::Equal)
                .then(a.im.partial_cmp(&b.im).unwrap_or(core::cmp::Ordering::Equal))
        });
        roots
    }
}

impl TryFrom<Vec<Real>> for Polynomial {
    type Error = LkError;

    fn try_from(coeffs: Vec<Real>) -> Result<Self, Self::Error> {
        Self::new(coeffs)
    }
}

impl From<Polynomial> for Vec<Real> {
    fn from(p: Polynomial) -> Self {
        p.coeffs
    }
}

/// Polynomial sum; the shorter operand is zero-padded on the high-degree side.
impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Polynomial {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let pad_a = n - self.coeffs.len();
        let pad_b = n - rhs.coeffs.len();
        let coeffs = (0..n)
            .map(|i| {
                let a = if i >= pad_a { self.coeffs[i - pad_a] } else { 0.0 };
                let b = if i >= pad_b { rhs.coeffs[i - pad_b] } else { 0.0 };
                a + b
            })
            .collect();
        Polynomial { coeffs }
    }
}

/// Polynomial product (coefficient convolution).
impl Mul for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Self) -> Polynomial {
        let mut out = vec![0.0; self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            for (j, &b) in rhs.coeffs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        Polynomial { coeffs: out }
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.trimmed();
        let n = p.coeffs.len();
        let mut wrote = false;
        for (i, &c) in p.coeffs.iter().enumerate() {
            if c == 0.0 && n > 1 {
                continue;
            }
            let power = n - 1 - i;
            if wrote {
                write!(f, " {} ", if c < 0.0 { '-' } else { '+' })?;
                write!(f, "{}", c.abs())?;
            } else {
                write!(f, "{}", c)?;
            }
            match power {
                0 => {}
                1 => write!(f, " s")?,
                _ => write!(f, " s^{}", power)?,
            }
            wrote = true;
        }
        if !wrote {
            write!(f, "0")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(c: &[f64]) -> Polynomial {
        Polynomial::new(c.to_vec()).unwrap()
    }

    #[test]
    fn rejects_empty_and_nan() {
        assert!(matches!(
            Polynomial::new(vec![]),
            Err(LkError::InvalidArgument { .. })
        ));
        assert!(matches!(
            Polynomial::new(vec![1.0, f64::NAN]),
            Err(LkError::NonFinite { .. })
        ));
    }

    #[test]
    fn mul_matches_expansion() {
        // (s + 1)(2s + 3) = 2s² + 5s + 3
        let p = &poly(&[1.0, 1.0]) * &poly(&[2.0, 3.0]);
        assert_eq!(p.coeffs(), &[2.0, 5.0, 3.0]);
    }

    #[test]
    fn add_pads_high_degree_side() {
        // (s² + 2s + 3) + 5 = s² + 2s + 8
        let p = &poly(&[1.0, 2.0, 3.0]) + &poly(&[5.0]);
        assert_eq!(p.coeffs(), &[1.0, 2.0, 8.0]);
        let q = &poly(&[4.0]) + &poly(&[1.0, 1.0]);
        assert_eq!(q.coeffs(), &[1.0, 5.0]);
    }

    #[test]
    fn degree_ignores_leading_zeros() {
        assert_eq!(poly(&[0.0, 0.0, 2.0, 1.0]).degree(), Some(1));
        assert_eq!(poly(&[0.0, 0.0]).degree(), None);
        assert!(poly(&[0.0, 0.0]).is_zero());
        assert_eq!(poly(&[0.0, 3.0]).trimmed().coeffs(), &[3.0]);
    }

    #[test]
    fn eval_uses_highest_first() {
        // 2s + 1 at s = 3
        assert_eq!(poly(&[2.0, 1.0]).eval(3.0), 7.0);
        assert_eq!(poly(&[2.0, 1.0]).constant_term(), 1.0);
        let v = poly(&[1.0, 0.0, 1.0]).eval_complex(Complex::new(0.0, 1.0));
        assert!(v.norm() < 1e-12);
    }

    #[test]
    fn roots_of_quadratic() {
        // s² + 3s + 2 = (s + 1)(s + 2)
        let r = poly(&[1.0, 3.0, 2.0]).roots();
        assert_eq!(r.len(), 2);
        assert!((r[0].re + 2.0).abs() < 1e-9);
        assert!((r[1].re + 1.0).abs() < 1e-9);
        assert!(r.iter().all(|z| z.im.abs() < 1e-9));
    }

    #[test]
    fn roots_complex_pair() {
        // s² + 2s + 5 → -1 ± 2j
        let r = poly(&[1.0, 2.0, 5.0]).roots();
        assert_eq!(r.len(), 2);
        for z in &r {
            assert!((z.re + 1.0).abs() < 1e-9);
            assert!((z.im.abs() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn roots_split_off_zeros() {
        // 2s² + s = s(2s + 1)
        let r = poly(&[2.0, 1.0, 0.0]).roots();
        assert_eq!(r.len(), 2);
        assert_eq!(r[1], Complex::new(0.0, 0.0));
        assert!((r[0].re + 0.5).abs() < 1e-12);
        assert!(poly(&[3.0]).roots().is_empty());
    }

    #[test]
    fn display_reads_naturally() {
        assert_eq!(poly(&[2.0, -1.0, 0.5]).to_string(), "2 s^2 - 1 s + 0.5");
        assert_eq!(poly(&[0.0, 3.0]).to_string(), "3");
        assert_eq!(poly(&[1.0, 0.0]).to_string(), "1 s");
    }
}
