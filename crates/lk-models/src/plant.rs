//! Plant (process) models.
//!
//! Provides the standard LTI plant elements:
//! - **Lags**: first order (PT1), second order from two time constants (PT2)
//!   or from damping and natural time
//! - **Integrating**: pure integrator (I), integrator with lag (IT1)
//! - **Differentiating**: pure derivative (D), derivative with lag (DT1)
//!
//! Every model validates its parameters once, builds its transfer function in
//! the constructor and keeps it; there is no way to change a model after the
//! fact.

use core::f64::consts::PI;
use core::fmt;

use lk_core::{HasTransferFunction, TransferFunction, ensure_finite};

use crate::error::{ModelError, ModelResult, ensure_nonzero};

/// First-order lag: `G(s) = Kp / (T·s + 1)`.
///
/// `T = 0` is accepted and degenerates to a static gain.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstOrderLag {
    kp: f64,
    t: f64,
    tf: TransferFunction,
}

impl FirstOrderLag {
    /// Create a first-order lag.
    ///
    /// # Arguments
    ///
    /// * `kp` - Static gain
    /// * `t` - Time constant (seconds)
    pub fn new(kp: f64, t: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let t = ensure_finite(t, "t")?;
        let tf = TransferFunction::new(vec![kp], vec![t, 1.0])?;
        Ok(Self { kp, t, tf })
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn t(&self) -> f64 {
        self.t
    }
}

impl HasTransferFunction for FirstOrderLag {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for FirstOrderLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PT1(Kp={:.3}, T={:.3})", self.kp, self.t)
    }
}

/// Second-order lag from two time constants:
/// `G(s) = Kp / ((T1·s + 1)(T2·s + 1))`.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondOrderLag {
    kp: f64,
    t1: f64,
    t2: f64,
    tf: TransferFunction,
}

impl SecondOrderLag {
    /// Create a second-order lag.
    ///
    /// # Arguments
    ///
    /// * `kp` - Static gain
    /// * `t1` - First time constant (seconds)
    /// * `t2` - Second time constant (seconds)
    pub fn new(kp: f64, t1: f64, t2: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let t1 = ensure_finite(t1, "t1")?;
        let t2 = ensure_finite(t2, "t2")?;
        let tf = TransferFunction::new(vec![kp], vec![t1 * t2, t1 + t2, 1.0])?;
        Ok(Self { kp, t1, t2, tf })
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn t1(&self) -> f64 {
        self.t1
    }

    pub fn t2(&self) -> f64 {
        self.t2
    }
}

impl HasTransferFunction for SecondOrderLag {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for SecondOrderLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PT2(Kp={:.3}, T1={:.3}, T2={:.3})",
            self.kp, self.t1, self.t2
        )
    }
}

/// Second-order lag in damping form: `G(s) = Kp / (T²·s² + 2·D·T·s + 1)`.
///
/// `D < 1` gives an oscillating step response.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondOrderDamped {
    kp: f64,
    d: f64,
    t: f64,
    tf: TransferFunction,
}

impl SecondOrderDamped {
    /// Create a damped second-order lag.
    ///
    /// # Arguments
    ///
    /// * `kp` - Static gain
    /// * `d` - Damping ratio
    /// * `t` - Natural time constant (seconds), `1/ω₀`
    pub fn new(kp: f64, d: f64, t: f64) -> ModelResult<Self> {
        let kp = ensure_finite(kp, "kp")?;
        let d = ensure_finite(d, "d")?;
        let t = ensure_finite(t, "t")?;
        let tf = TransferFunction::new(vec![kp], vec![t * t, 2.0 * d * t, 1.0])?;
        Ok(Self { kp, d, t, tf })
    }

    /// Identify damping and natural time from a measured step response.
    ///
    /// # Arguments
    ///
    /// * `h1` - Value of the first peak
    /// * `h_inf` - Final value
    /// * `t1` - Time of the first peak (seconds)
    ///
    /// # Returns
    ///
    /// `(D, T)` with `x = h1/h_inf - 1`, `D = -ln x / √(π² + ln² x)` and
    /// `T = t1·√(1 - D²)/π`.
    ///
    /// # Errors
    ///
    /// `Domain` unless the measurement overshoots (`x > 0`).
    pub fn identify(h1: f64, h_inf: f64, t1: f64) -> ModelResult<(f64, f64)> {
        let h1 = ensure_finite(h1, "h1")?;
        let h_inf = ensure_nonzero(h_inf, "h_inf")?;
        let t1 = ensure_finite(t1, "t1")?;

        let x = h1 / h_inf - 1.0;
        if x <= 0.0 {
            return Err(ModelError::Domain {
                param: "h1/h_inf - 1",
                value: x,
                reason: "step response must overshoot its final value",
            });
        }

        let ln_x = x.ln();
        let d = -ln_x / (PI * PI + ln_x * ln_x).sqrt();
        let t = t1 * (1.0 - d * d).sqrt() / PI;
        Ok((d, t))
    }

    /// Identify `(D, T)` from a step measurement and build the model with gain `kp`.
    pub fn from_step(kp: f64, h1: f64, h_inf: f64, t1: f64) -> ModelResult<Self> {
        let (d, t) = Self::identify(h1, h_inf, t1)?;
        Self::new(kp, d, t)
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn t(&self) -> f64 {
        self.t
    }
}

impl HasTransferFunction for SecondOrderDamped {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for SecondOrderDamped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PT2(Kp={:.3}, D={:.3}, T={:.3})",
            self.kp, self.d, self.t
        )
    }
}

/// Integrator: `G(s) = Ki / s = 1 / (Ti·s)` with `Ki = 1/Ti`.
#[derive(Debug, Clone, PartialEq)]
pub struct Integrator {
    ki: f64,
    ti: f64,
    tf: TransferFunction,
}

impl Integrator {
    /// Create an integrator from its gain `ki`.
    pub fn new(ki: f64) -> ModelResult<Self> {
        let ki = ensure_nonzero(ki, "ki")?;
        let tf = TransferFunction::new(vec![ki], vec![1.0, 0.0])?;
        Ok(Self {
            ki,
            ti: 1.0 / ki,
            tf,
        })
    }

    /// Create an integrator from its integral time `ti` (`ki = 1/ti`).
    pub fn from_ti(ti: f64) -> ModelResult<Self> {
        let ti = ensure_nonzero(ti, "ti")?;
        let mut model = Self::new(1.0 / ti)?;
        model.ti = ti;
        Ok(model)
    }

    pub fn ki(&self) -> f64 {
        self.ki
    }

    pub fn ti(&self) -> f64 {
        self.ti
    }
}

impl HasTransferFunction for Integrator {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "I(Ki={:.3}, Ti={:.3})", self.ki, self.ti)
    }
}

/// Integrator with lag: `G(s) = Ki / (s·(T1·s + 1))`.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorLag {
    ki: f64,
    ti: f64,
    t1: f64,
    tf: TransferFunction,
}

impl IntegratorLag {
    /// Create an IT1 element.
    ///
    /// # Arguments
    ///
    /// * `ki` - Integral gain (non-zero)
    /// * `t1` - Lag time constant (seconds)
    pub fn new(ki: f64, t1: f64) -> ModelResult<Self> {
        let ki = ensure_nonzero(ki, "ki")?;
        let t1 = ensure_finite(t1, "t1")?;
        let tf = TransferFunction::new(vec![ki], vec![t1, 1.0, 0.0])?;
        Ok(Self {
            ki,
            ti: 1.0 / ki,
            t1,
            tf,
        })
    }

    /// Create an IT1 element from its integral time (`ki = 1/ti`).
    pub fn from_ti(ti: f64, t1: f64) -> ModelResult<Self> {
        let ti = ensure_nonzero(ti, "ti")?;
        let mut model = Self::new(1.0 / ti, t1)?;
        model.ti = ti;
        Ok(model)
    }

    pub fn ki(&self) -> f64 {
        self.ki
    }

    pub fn ti(&self) -> f64 {
        self.ti
    }

    pub fn t1(&self) -> f64 {
        self.t1
    }
}

impl HasTransferFunction for IntegratorLag {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for IntegratorLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IT1(T1={:.3}, Ki={:.3}, Ti={:.3})",
            self.t1, self.ki, self.ti
        )
    }
}

/// Ideal differentiator: `G(s) = Kd·s`.
///
/// Improper on its own; combine it with a lag before simulating.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivative {
    kd: f64,
    tf: TransferFunction,
}

impl Derivative {
    pub fn new(kd: f64) -> ModelResult<Self> {
        let kd = ensure_finite(kd, "kd")?;
        let tf = TransferFunction::new(vec![kd, 0.0], vec![1.0])?;
        Ok(Self { kd, tf })
    }

    pub fn kd(&self) -> f64 {
        self.kd
    }
}

impl HasTransferFunction for Derivative {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for Derivative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D(Kd={:.3})", self.kd)
    }
}

/// Differentiator with lag: `G(s) = Kd·s / (T1·s + 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivativeLag {
    kd: f64,
    t1: f64,
    tf: TransferFunction,
}

impl DerivativeLag {
    pub fn new(kd: f64, t1: f64) -> ModelResult<Self> {
        let kd = ensure_finite(kd, "kd")?;
        let t1 = ensure_finite(t1, "t1")?;
        let tf = TransferFunction::new(vec![kd, 0.0], vec![t1, 1.0])?;
        Ok(Self { kd, t1, tf })
    }

    pub fn kd(&self) -> f64 {
        self.kd
    }

    pub fn t1(&self) -> f64 {
        self.t1
    }
}

impl HasTransferFunction for DerivativeLag {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for DerivativeLag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DT1(Kd={:.3}, T1={:.3})", self.kd, self.t1)
    }
}
