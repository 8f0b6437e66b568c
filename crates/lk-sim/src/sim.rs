//! Simulation runners: step, scaled step and arbitrary sampled input.
//!
//! Every runner realizes the transfer function in state-space form, starts
//! from the zero state and interpolates the input linearly between samples.
//! All runners are pure: the same inputs produce the same trajectory.

use lk_core::{HasTransferFunction, Tolerances, ensure_finite, nearly_equal};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

use crate::error::{SimError, SimResult, invalid_arg};
use crate::grid::time_grid;
use crate::integrator::{ForwardEuler, Integrator, RK4};
use crate::model::{DrivenSystem, TransientModel};
use crate::realization::StateSpace;

/// Integration step as a fraction of the fastest time constant.
const STEP_FRACTION: f64 = 0.2;

/// Substep cap per sample interval for the stepped methods.
const MAX_SUBSTEPS: usize = 10_000;

/// How the realized system is advanced between samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Method {
    /// First-order-hold discretization through the matrix exponential.
    /// Exact for piecewise-linear inputs and stable for any step size.
    #[default]
    Exact,
    /// Classical RK4 with substeps sized from the fastest pole.
    Rk4,
    /// Forward Euler with the same substep rule (first order, for comparison).
    Euler,
}

/// Options for simulation runs.
#[derive(Clone, Debug, Default)]
pub struct SimOptions {
    /// Grid size for step responses; `None` picks it from the poles.
    /// Ignored by the signal runners, which use the caller's grid.
    pub points: Option<usize>,
    pub method: Method,
}

/// Sampled response of a system.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    /// Time points (seconds), strictly increasing
    pub t: Vec<f64>,
    /// Output samples
    pub y: Vec<f64>,
    /// Input samples that produced `y`
    pub u: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Last output sample.
    pub fn final_value(&self) -> Option<f64> {
        self.y.last().copied()
    }
}

/// Unit step response on `[0, duration]` with default options.
pub fn simulate_step(system: &dyn HasTransferFunction, duration: f64) -> SimResult<Trajectory> {
    simulate_step_with(system, duration, &SimOptions::default())
}

/// Unit step response on `[0, duration]`.
///
/// # Errors
///
/// `InvalidArgument` for a bad duration or point count, `InvalidSystem` (as
/// [`SimError::Core`]) for an improper system.
pub fn simulate_step_with(
    system: &dyn HasTransferFunction,
    duration: f64,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let ss = StateSpace::from_tf(system.tf())?;
    let t = time_grid(system, duration, opts.points)?;
    let u = vec![1.0; t.len()];
    debug!(
        order = ss.order(),
        points = t.len(),
        method = ?opts.method,
        "simulating step response"
    );
    let y = respond(&ss, &t, &u, opts.method)?;
    Ok(Trajectory { t, y, u })
}

/// Response to a step of height `amplitude`.
///
/// Computed as `amplitude ·` the unit step response. This relies on
/// superposition and is only valid because every system here is linear and
/// time-invariant; it must not be reused for nonlinear models.
pub fn simulate_step_scaled(
    system: &dyn HasTransferFunction,
    amplitude: f64,
    duration: f64,
) -> SimResult<Trajectory> {
    simulate_step_scaled_with(system, amplitude, duration, &SimOptions::default())
}

pub fn simulate_step_scaled_with(
    system: &dyn HasTransferFunction,
    amplitude: f64,
    duration: f64,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    let amplitude = ensure_finite(amplitude, "amplitude")?;
    let mut traj = simulate_step_with(system, duration, opts)?;
    traj.y.iter_mut().for_each(|y| *y *= amplitude);
    traj.u.iter_mut().for_each(|u| *u *= amplitude);
    Ok(traj)
}

/// Response to an arbitrary sampled input with default options.
pub fn simulate_signal(
    system: &dyn HasTransferFunction,
    t: &[f64],
    u: &[f64],
) -> SimResult<Trajectory> {
    simulate_signal_with(system, t, u, &SimOptions::default())
}

/// Response to an arbitrary sampled input `u(t)`.
///
/// # Errors
///
/// `InvalidArgument` unless `t` and `u` are non-empty, of equal length and
/// finite, with `t` strictly increasing.
pub fn simulate_signal_with(
    system: &dyn HasTransferFunction,
    t: &[f64],
    u: &[f64],
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    validate_signal(t, u)?;
    let ss = StateSpace::from_tf(system.tf())?;
    debug!(
        order = ss.order(),
        points = t.len(),
        method = ?opts.method,
        "simulating sampled input"
    );
    let y = respond(&ss, t, u, opts.method)?;
    Ok(Trajectory {
        t: t.to_vec(),
        y,
        u: u.to_vec(),
    })
}

fn validate_signal(t: &[f64], u: &[f64]) -> SimResult<()> {
    if t.len() != u.len() {
        return Err(invalid_arg(format!(
            "t and u must have equal length, got {} and {}",
            t.len(),
            u.len()
        )));
    }
    if t.is_empty() {
        return Err(invalid_arg("input signal must contain at least one sample"));
    }
    if let Some(i) = t.iter().position(|v| !v.is_finite()) {
        return Err(invalid_arg(format!("t[{i}] is not finite")));
    }
    if let Some(i) = u.iter().position(|v| !v.is_finite()) {
        return Err(invalid_arg(format!("u[{i}] is not finite")));
    }
    if let Some(i) = t.windows(2).position(|w| w[1] <= w[0]) {
        return Err(invalid_arg(format!(
            "t must be strictly increasing (t[{}] = {} follows t[{}] = {})",
            i + 1,
            t[i + 1],
            i,
            t[i]
        )));
    }
    Ok(())
}

/// Output samples for a validated grid.
fn respond(ss: &StateSpace, t: &[f64], u: &[f64], method: Method) -> SimResult<Vec<f64>> {
    if ss.order() == 0 {
        return Ok(u.iter().map(|u| ss.d() * u).collect());
    }
    match method {
        Method::Exact => respond_exact(ss, t, u),
        Method::Rk4 => respond_stepped(ss, t, u, &RK4),
        Method::Euler => respond_stepped(ss, t, u, &ForwardEuler),
    }
}

/// First-order-hold discretization for one step size.
struct Foh {
    dt: f64,
    ad: DMatrix<f64>,
    bd0: DVector<f64>,
    bd1: DVector<f64>,
}

impl Foh {
    /// From `exp([[A dt, B dt, 0], [0, 0, 1], [0, 0, 0]])`.
    fn new(ss: &StateSpace, dt: f64) -> Self {
        let n = ss.order();
        let mut m = DMatrix::<f64>::zeros(n + 2, n + 2);
        m.view_mut((0, 0), (n, n)).copy_from(&(ss.a() * dt));
        for i in 0..n {
            m[(i, n)] = ss.b()[i] * dt;
        }
        m[(n, n + 1)] = 1.0;

        let e = m.exp();
        let ad = e.view((0, 0), (n, n)).into_owned();
        let gamma1 = DVector::from_fn(n, |i, _| e[(i, n)]);
        let gamma2 = DVector::from_fn(n, |i, _| e[(i, n + 1)]);
        Self {
            dt,
            ad,
            bd0: &gamma1 - &gamma2,
            bd1: gamma2,
        }
    }

    fn matches(&self, dt: f64) -> bool {
        nearly_equal(self.dt, dt, Tolerances::default())
    }

    fn advance(&self, x: &DVector<f64>, u0: f64, u1: f64) -> DVector<f64> {
        &self.ad * x + &self.bd0 * u0 + &self.bd1 * u1
    }
}

fn respond_exact(ss: &StateSpace, t: &[f64], u: &[f64]) -> SimResult<Vec<f64>> {
    let mut x = DVector::<f64>::zeros(ss.order());
    let mut y = Vec::with_capacity(t.len());
    y.push(ss.output(&x, u[0]));
    if t.len() == 1 {
        return Ok(y);
    }

    let mut foh = Foh::new(ss, t[1] - t[0]);
    for k in 1..t.len() {
        let dt = t[k] - t[k - 1];
        if !foh.matches(dt) {
            foh = Foh::new(ss, dt);
        }
        x = foh.advance(&x, u[k - 1], u[k]);
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SimError::Diverged { t: t[k] });
        }
        y.push(ss.output(&x, u[k]));
    }
    Ok(y)
}

fn respond_stepped<I: Integrator>(
    ss: &StateSpace,
    t: &[f64],
    u: &[f64],
    integrator: &I,
) -> SimResult<Vec<f64>> {
    let h_max = STEP_FRACTION / ss.fastest_rate();
    let mut model = DrivenSystem::new(ss);
    let mut x = model.initial_state();
    let mut y = Vec::with_capacity(t.len());
    y.push(ss.output(&x, u[0]));

    let mut capped = false;
    for k in 1..t.len() {
        let (t0, t1) = (t[k - 1], t[k]);
        model.set_segment(t0, u[k - 1], t1, u[k]);

        let span = t1 - t0;
        let wanted = if h_max.is_finite() {
            (span / h_max).ceil().max(1.0)
        } else {
            1.0
        };
        if wanted > MAX_SUBSTEPS as f64 && !capped {
            warn!(
                interval = span,
                cap = MAX_SUBSTEPS,
                "substeps capped; consider the exact method for stiff systems"
            );
            capped = true;
        }
        let substeps = (wanted as usize).min(MAX_SUBSTEPS);
        let h = span / substeps as f64;
        for j in 0..substeps {
            x = integrator.step(&mut model, t0 + j as f64 * h, &x, h)?;
        }
        y.push(ss.output(&x, u[k]));
    }
    Ok(y)
}
