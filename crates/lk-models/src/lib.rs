//! Model catalog for loopkit.
//!
//! Every model validates its parameters on construction, caches its transfer
//! function and exposes it through [`lk_core::HasTransferFunction`], so plants,
//! controllers and dead-time elements compose freely with the core algebra.
//!
//! # Catalog
//!
//! - Plants: PT1, PT2 (two time constants or damping form, optionally
//!   identified from a step measurement), I, IT1, D, DT1
//! - Controllers: P, PI, PID (series form)
//! - Dead time: Padé approximation of orders 1 to 3
//!
//! [`ModelSpec`] is the serialisable description used by loop definition
//! files.

pub mod controller;
pub mod deadtime;
pub mod error;
pub mod plant;
pub mod spec;

pub use controller::{Proportional, ProportionalIntegral, ProportionalIntegralDerivative};
pub use deadtime::{DeadTime, PadeOrder, add_deadtime, pade};
pub use error::{ModelError, ModelResult};
pub use plant::{
    Derivative, DerivativeLag, FirstOrderLag, Integrator, IntegratorLag, SecondOrderDamped,
    SecondOrderLag,
};
pub use spec::{Model, ModelSpec};
