//! The interface the stepped integrators see, and its state-space implementor.

use nalgebra::DVector;

use crate::error::{SimError, SimResult};
use crate::realization::StateSpace;

/// An ODE `x' = f(t, x)` with the vector arithmetic the integrators need.
///
/// `rhs` takes `&mut self` so an implementor may track the active input
/// segment; it must not change the dynamics otherwise.
pub trait TransientModel {
    type State: Clone;

    /// State at the start of the run.
    fn initial_state(&self) -> Self::State;

    /// State derivative `dx/dt = f(t, x)`.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Element-wise `a + b`.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// `scale * a`.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}

/// A realized system driven by a piecewise-linear input.
///
/// The input is defined one segment at a time; the runner moves the segment
/// forward before integrating each sample interval.
#[derive(Debug)]
pub struct DrivenSystem<'a> {
    ss: &'a StateSpace,
    t0: f64,
    u0: f64,
    slope: f64,
}

impl<'a> DrivenSystem<'a> {
    pub fn new(ss: &'a StateSpace) -> Self {
        Self {
            ss,
            t0: 0.0,
            u0: 0.0,
            slope: 0.0,
        }
    }

    /// Drive with the straight line through `(t0, u0)` and `(t1, u1)`.
    pub fn set_segment(&mut self, t0: f64, u0: f64, t1: f64, u1: f64) {
        self.t0 = t0;
        self.u0 = u0;
        self.slope = if t1 > t0 { (u1 - u0) / (t1 - t0) } else { 0.0 };
    }

    pub fn input(&self, t: f64) -> f64 {
        self.u0 + self.slope * (t - self.t0)
    }
}

impl TransientModel for DrivenSystem<'_> {
    type State = DVector<f64>;

    fn initial_state(&self) -> Self::State {
        DVector::zeros(self.ss.order())
    }

    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        let xdot = self.ss.derivative(x, self.input(t));
        if xdot.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Diverged { t });
        }
        Ok(xdot)
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        a + b
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        a * scale
    }
}
