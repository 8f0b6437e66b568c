//! Step response performance metrics.
//!
//! Computes the standard figures (steady state, overshoot, rise time,
//! settling time) from a sampled trajectory. Everything is taken from the
//! samples themselves; no model knowledge is used.

use lk_sim::Trajectory;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Half-width of the settling band, relative to the steady state.
pub const SETTLING_BAND: f64 = 0.02;

/// Standard step response metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepMetrics {
    /// Last sample of the response
    pub steady_state: f64,
    /// Peak above the steady state, in percent of the steady state (0 if it is 0)
    pub overshoot_pct: f64,
    /// Peak above the steady state
    pub overshoot_abs: f64,
    /// Time between first reaching 10 % and 90 % of the steady state (seconds)
    pub rise_time: f64,
    /// Time from which the response stays within ±2 % of the steady state (seconds)
    pub settling_time: f64,
    /// Time of the peak (seconds)
    pub t_max: f64,
    /// Peak value
    pub y_max: f64,
}

impl StepMetrics {
    pub fn from_trajectory(traj: &Trajectory) -> AppResult<Self> {
        step_metrics(&traj.t, &traj.y)
    }
}

/// Compute step metrics from time and response samples.
///
/// Levels are approached in the direction of the steady state, so a
/// negative-going response gets the same rise time as its mirror image.
///
/// # Errors
///
/// `InvalidInput` for empty or length-mismatched series.
pub fn step_metrics(t: &[f64], y: &[f64]) -> AppResult<StepMetrics> {
    if t.len() != y.len() {
        return Err(AppError::InvalidInput(format!(
            "t and y must have equal length, got {} and {}",
            t.len(),
            y.len()
        )));
    }
    let (Some(&steady_state), Some(&t_end)) = (y.last(), t.last()) else {
        return Err(AppError::InvalidInput(
            "cannot compute metrics of an empty response".to_string(),
        ));
    };

    // first maximum
    let mut max_idx = 0;
    for (i, &v) in y.iter().enumerate() {
        if v > y[max_idx] {
            max_idx = i;
        }
    }
    let y_max = y[max_idx];
    let t_max = t[max_idx];

    let overshoot_abs = y_max - steady_state;
    let overshoot_pct = if steady_state == 0.0 {
        0.0
    } else {
        overshoot_abs / steady_state * 100.0
    };

    let reaches = |fraction: f64| {
        let level = fraction * steady_state;
        y.iter().position(|&v| {
            if steady_state >= 0.0 {
                v >= level
            } else {
                v <= level
            }
        })
    };
    let idx_10 = reaches(0.1).unwrap_or(0);
    let idx_90 = reaches(0.9).unwrap_or(y.len() - 1);
    let rise_time = t[idx_90] - t[idx_10];

    let tolerance = SETTLING_BAND * steady_state.abs();
    let in_band = |v: f64| (v - steady_state).abs() <= tolerance;
    let settling_time = match y.iter().rposition(|&v| !in_band(v)) {
        None => t[0],
        Some(last_out) if last_out + 1 < y.len() => t[last_out + 1],
        Some(_) => t_end,
    };

    Ok(StepMetrics {
        steady_state,
        overshoot_pct,
        overshoot_abs,
        rise_time,
        settling_time,
        t_max,
        y_max,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn times_survive_amplitude_scaling(
            y in prop::collection::vec(0.0f64..2.0, 2..60),
            exp in -4i32..4,
            negate in any::<bool>(),
        ) {
            // powers of two scale exactly, so every level comparison is preserved
            let k = 2f64.powi(exp) * if negate { -1.0 } else { 1.0 };
            let t: Vec<f64> = (0..y.len()).map(|i| i as f64 * 0.1).collect();
            let scaled: Vec<f64> = y.iter().map(|v| v * k).collect();
            let a = step_metrics(&t, &y).unwrap();
            let b = step_metrics(&t, &scaled).unwrap();
            prop_assert_eq!(a.rise_time, b.rise_time);
            prop_assert_eq!(a.settling_time, b.settling_time);
            prop_assert_eq!(b.steady_state, a.steady_state * k);
        }

        #[test]
        fn settling_within_horizon(y in prop::collection::vec(-5.0f64..5.0, 1..60)) {
            let t: Vec<f64> = (0..y.len()).map(|i| i as f64).collect();
            let m = step_metrics(&t, &y).unwrap();
            prop_assert!(m.settling_time >= 0.0 && m.settling_time <= t[t.len() - 1]);
            prop_assert!(m.rise_time.is_finite());
            prop_assert!(m.overshoot_abs >= 0.0);
        }
    }
}
