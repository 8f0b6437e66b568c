//! Continuous-time simulation of transfer functions.
//!
//! Provides:
//! - Controllable canonical state-space realization
//! - Automatic time grids that resolve the fastest pole
//! - Exact first-order-hold discretization (matrix exponential)
//! - Fixed-step RK4 and forward Euler through the `TransientModel` trait
//! - Step, scaled step and arbitrary sampled-input runners

pub mod error;
pub mod grid;
pub mod integrator;
pub mod model;
pub mod realization;
pub mod sim;

pub use error::{SimError, SimResult};
pub use grid::{suggested_duration, time_grid};
pub use integrator::{ForwardEuler, Integrator, RK4};
pub use model::{DrivenSystem, TransientModel};
pub use realization::StateSpace;
pub use sim::{
    Method, SimOptions, Trajectory, simulate_signal, simulate_signal_with, simulate_step,
    simulate_step_scaled, simulate_step_scaled_with, simulate_step_with,
};
