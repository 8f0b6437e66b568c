use crate::LkError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LkError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LkError::NonFinite { what, value: v })
    }
}

/// Check every entry of a slice, reporting the first offender.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), LkError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

/// `n` evenly spaced samples on `[start, stop]`, both ends included.
///
/// `n == 1` yields `[start]`.
pub fn linspace(start: Real, stop: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        stop
                    } else {
                        start + step * i as Real
                    }
                })
                .collect()
        }
    }
}
