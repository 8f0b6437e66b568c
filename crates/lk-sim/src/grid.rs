//! Time grid selection.
//!
//! An automatic grid must resolve the fastest dynamics of the system: the
//! sample spacing is bounded by a fraction of the shortest time constant
//! `1/|p|` over all poles `p`, so oscillatory poles are covered as well.

use lk_core::{HasTransferFunction, linspace};
use tracing::warn;

use crate::error::{SimResult, invalid_arg};

/// Lower bound on automatically chosen grids.
pub const MIN_POINTS: usize = 200;

/// Samples per fastest time constant.
pub const POINTS_PER_TAU: f64 = 20.0;

/// Upper bound on automatically chosen grids.
pub const MAX_POINTS: usize = 200_000;

/// Horizon used when the system has no stable pole to settle on.
pub const DEFAULT_DURATION: f64 = 10.0;

/// Slowest time constants covered by [`suggested_duration`].
const SETTLING_TAUS: f64 = 6.0;

/// Largest pole magnitude of the system, `0` for a static gain.
pub fn fastest_rate(system: &dyn HasTransferFunction) -> f64 {
    system
        .tf()
        .poles()
        .iter()
        .map(|p| p.norm())
        .fold(0.0, f64::max)
}

/// Number of samples needed on `[0, duration]` for a system whose fastest
/// pole has magnitude `rate`.
pub fn auto_points(rate: f64, duration: f64) -> usize {
    let needed = (duration * rate * POINTS_PER_TAU).ceil();
    if !needed.is_finite() || needed >= MAX_POINTS as f64 {
        warn!(
            rate,
            duration,
            cap = MAX_POINTS,
            "time grid capped; fastest dynamics may be undersampled"
        );
        return MAX_POINTS;
    }
    (needed as usize + 1).max(MIN_POINTS)
}

/// Evenly spaced grid on `[0, duration]`.
///
/// With `points = None` the count comes from [`auto_points`].
///
/// # Errors
///
/// `InvalidArgument` for a non-positive or non-finite duration, or fewer
/// than two requested points.
pub fn time_grid(
    system: &dyn HasTransferFunction,
    duration: f64,
    points: Option<usize>,
) -> SimResult<Vec<f64>> {
    if !duration.is_finite() || duration <= 0.0 {
        return Err(invalid_arg(format!(
            "duration must be positive and finite, got {duration}"
        )));
    }
    let n = match points {
        Some(n) if n < 2 => {
            return Err(invalid_arg(format!(
                "a time grid needs at least 2 points, got {n}"
            )));
        }
        Some(n) => n,
        None => auto_points(fastest_rate(system), duration),
    };
    Ok(linspace(0.0, duration, n))
}

/// Simulation horizon long enough for the slowest stable mode to settle.
///
/// Falls back to [`DEFAULT_DURATION`] when no pole lies in the open left
/// half-plane (static gains, pure integrators, unstable systems).
pub fn suggested_duration(system: &dyn HasTransferFunction) -> f64 {
    let slowest = system
        .tf()
        .poles()
        .iter()
        .filter(|p| p.re < 0.0)
        .map(|p| -p.re)
        .fold(f64::INFINITY, f64::min);
    if slowest.is_finite() {
        SETTLING_TAUS / slowest
    } else {
        DEFAULT_DURATION
    }
}
