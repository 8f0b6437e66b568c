//! Controller models.
//!
//! Provides standard continuous controller structures:
//! - **P (Proportional)**: `Kp`
//! - **PI (Proportional-Integral)**: `Kp(Ti·s + 1)/(Ti·s)`
//! - **PID (Proportional-Integral-Derivative)**: series (interacting) form
//!   `Kp(Ti·Td·s² + Ti·s + 1)/(Ti·s)`
//!
//! The PID is deliberately the series form and not the parallel form
//! `Kp + Ki/s + Kd·s`; tuning rules written for one do not carry over to the
//! other unchanged.

use core::fmt;

use lk_core::{HasTransferFunction, TransferFunction, ensure_finite};

use crate::error::{ModelResult, ensure_nonzero};

/// P controller: `G(s) = Kp`.
///
/// Negative gains are allowed (inverting controllers).
#[derive(Debug, Clone, PartialEq)]
pub struct Proportional {
    kp: f64,
    tf: TransferFunction,
}

impl Proportional {
    pub fn new(kp: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let tf = TransferFunction::gain(kp)?;
        Ok(Self { kp, tf })
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }
}

impl HasTransferFunction for Proportional {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for Proportional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P(Kp={})", self.kp)
    }
}

/// PI controller: `G(s) = Kp(Ti·s + 1)/(Ti·s)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionalIntegral {
    kp: f64,
    ti: f64,
    tf: TransferFunction,
}

impl ProportionalIntegral {
    /// Create a PI controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ti` - Integral time constant (seconds), non-zero
    pub fn new(kp: f64, ti: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let ti = ensure_nonzero(ti, "ti")?;
        let tf = TransferFunction::new(vec![kp * ti, kp], vec![ti, 0.0])?;
        Ok(Self { kp, ti, tf })
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn ti(&self) -> f64 {
        self.ti
    }

    /// Equivalent integral gain `Kp / Ti`.
    pub fn ki(&self) -> f64 {
        self.kp / self.ti
    }
}

impl HasTransferFunction for ProportionalIntegral {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for ProportionalIntegral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PI(Kp={}, Ti={})", self.kp, self.ti)
    }
}

/// PID controller, series form: `G(s) = Kp(Ti·Td·s² + Ti·s + 1)/(Ti·s)`.
///
/// The ideal derivative makes the controller improper; it only becomes
/// simulatable inside a loop whose plant has enough lag.
#[derive(Debug, Clone, PartialEq)]
pub struct ProportionalIntegralDerivative {
    kp: f64,
    ti: f64,
    td: f64,
    tf: TransferFunction,
}

impl ProportionalIntegralDerivative {
    /// Create a PID controller.
    ///
    /// # Arguments
    ///
    /// * `kp` - Proportional gain
    /// * `ti` - Integral time constant (seconds), non-zero
    /// * `td` - Derivative time constant (seconds)
    pub fn new(kp: f64, ti: f64, td: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let ti = ensure_nonzero(ti, "ti")?;
        let td = ensure_finite(td, "td")?;
        let tf = TransferFunction::new(vec![kp * ti * td, kp * ti, kp], vec![ti, 0.0])?;
        Ok(Self { kp, ti, td, tf })
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn ti(&self) -> f64 {
        self.ti
    }

    pub fn td(&self) -> f64 {
        self.td
    }
}

impl HasTransferFunction for ProportionalIntegralDerivative {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for ProportionalIntegralDerivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PID(Kp={}, Ti={}, Td={})", self.kp, self.ti, self.td)
    }
}
