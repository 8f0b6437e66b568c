//! lk-core: stable foundation for loopkit.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)
//! - poly (real polynomials, highest degree first)
//! - tf (rational transfer functions and their algebra)
//! - compose (series chains and unity-feedback loops)
//!
//! Coefficient ordering is fixed crate-wide: every slice of coefficients,
//! in and out, lists the highest power of `s` first. `[2.0, 1.0]` is
//! `2s + 1`, never `1 + 2s`.

pub mod compose;
pub mod error;
pub mod numeric;
pub mod poly;
pub mod tf;

// Re-exports: nice ergonomics for downstream crates
pub use compose::{closed_loop, series_connection};
pub use error::{LkError, LkResult};
pub use nalgebra::Complex;
pub use numeric::*;
pub use poly::Polynomial;
pub use tf::{HasTransferFunction, TransferFunction};
