//! Explicit one-step integrators for the `Rk4` and `Euler` methods.
//!
//! Both advance the realized state `x' = A x + B u(t)` over one substep. The
//! caller sizes the substep from the fastest pole; neither method adapts it.

use crate::error::SimResult;
use crate::model::TransientModel;

pub trait Integrator {
    /// State after one substep of length `dt` starting at `(t, x)`.
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State>;
}

/// Classical four-stage Runge-Kutta. Local error `O(dt⁵)`; the input is
/// sampled at the segment ends and midpoint through the model.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let half = 0.5 * dt;
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + half, &model.add(x, &model.scale(&k1, half)))?;
        let k3 = model.rhs(t + half, &model.add(x, &model.scale(&k2, half)))?;
        let k4 = model.rhs(t + dt, &model.add(x, &model.scale(&k3, dt)))?;

        // weights 1, 2, 2, 1
        let inner = model.add(&k2, &k3);
        let slope = model.add(&model.add(&k1, &k4), &model.scale(&inner, 2.0));
        Ok(model.add(x, &model.scale(&slope, dt / 6.0)))
    }
}

/// `x + dt·x'`. First order, one derivative per substep; only stable for
/// `dt` below `2/|λ|` of the fastest real pole.
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &mut M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<M::State> {
        let slope = model.rhs(t, x)?;
        Ok(model.add(x, &model.scale(&slope, dt)))
    }
}
