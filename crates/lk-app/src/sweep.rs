//! Controller gain sweeps.
//!
//! Each gain is an independent simulation of an immutable loop definition,
//! so the runs are spread over the rayon thread pool.

use lk_sim::{SimError, suggested_duration};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{LoopConfig, validate_config};
use crate::error::{AppError, AppResult};
use crate::metrics::StepMetrics;
use crate::run_service::{build_system, run};

/// Outcome of one sweep run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepPoint {
    /// Proportional gain of the controller
    pub gain: f64,
    /// Largest real part over the closed-loop poles
    pub max_pole_re: f64,
    pub stable: bool,
    /// Step metrics; `None` for non-step inputs or a diverged run
    pub metrics: Option<StepMetrics>,
}

/// Run the loop once per controller gain, in parallel.
///
/// All runs share one horizon: the configured duration, or the one suggested
/// for the loop as written, so the metrics stay comparable across gains.
/// Results come back in the order of `gains`.
///
/// # Errors
///
/// `Validation` when the loop is invalid or has no P, PI or PID controller;
/// otherwise the first error of any run.
pub fn gain_sweep(config: &LoopConfig, gains: &[f64]) -> AppResult<Vec<SweepPoint>> {
    validate_config(config)?;
    let Some(controller) = &config.controller else {
        return Err(AppError::Validation(format!(
            "loop '{}' has no controller to sweep",
            config.name
        )));
    };
    if let Some(bad) = gains.iter().find(|g| !g.is_finite()) {
        return Err(AppError::InvalidInput(format!("gain {bad} is not finite")));
    }

    let duration = match config.simulation.duration {
        Some(d) => d,
        None => suggested_duration(&build_system(config)?),
    };
    info!(name = %config.name, gains = gains.len(), duration, "starting gain sweep");

    gains
        .par_iter()
        .map(|&gain| {
            let swept = controller.with_kp(gain).ok_or_else(|| {
                AppError::Validation(format!(
                    "loop '{}': controller has no proportional gain to sweep",
                    config.name
                ))
            })?;
            let mut cfg = config.clone();
            cfg.controller = Some(swept);
            cfg.simulation.duration = Some(duration);
            sweep_point(&cfg, gain)
        })
        .collect()
}

fn sweep_point(config: &LoopConfig, gain: f64) -> AppResult<SweepPoint> {
    let system = build_system(config)?;
    let max_pole_re = system.max_pole_real_part();
    let metrics = match run(config) {
        Ok(out) => out.metrics,
        Err(AppError::Simulation(SimError::Diverged { t })) => {
            warn!(gain, t, "sweep run diverged");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(SweepPoint {
        gain,
        max_pole_re,
        stable: max_pole_re < 0.0,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const P_LOOP: &str = "
name: p sweep
controller: { type: P, kp: 1.0 }
plant:
  - { type: PT1, kp: 1.0, t: 1.0 }
simulation: { duration: 20.0 }
";

    #[test]
    fn steady_state_follows_gain() {
        let config = parse_config(P_LOOP).unwrap();
        let gains = [0.5, 1.0, 4.0];
        let points = gain_sweep(&config, &gains).unwrap();
        assert_eq!(points.len(), 3);
        for (p, k) in points.iter().zip(gains) {
            assert_eq!(p.gain, k);
            assert!(p.stable);
            let ss = p.metrics.unwrap().steady_state;
            assert!((ss - k / (1.0 + k)).abs() < 1e-3, "K = {k}: {ss}");
        }
    }

    #[test]
    fn matches_single_runs() {
        let config = parse_config(P_LOOP).unwrap();
        let points = gain_sweep(&config, &[2.0]).unwrap();
        let mut single = config.clone();
        single.controller = config.controller.as_ref().and_then(|c| c.with_kp(2.0));
        let out = run(&single).unwrap();
        assert_eq!(points[0].metrics, out.metrics);
    }

    #[test]
    fn open_loop_cannot_be_swept() {
        let mut config = parse_config(P_LOOP).unwrap();
        config.controller = None;
        assert!(matches!(
            gain_sweep(&config, &[1.0]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn plant_in_controller_slot_is_not_swept_open_loop() {
        let config = parse_config(
            "
name: lag as controller
controller: { type: PT1, kp: 1.0, t: 1.0 }
plant: [{ type: PT1, kp: 1.0, t: 1.0 }]
simulation: { duration: 20.0 }
",
        )
        .unwrap();
        assert!(matches!(
            gain_sweep(&config, &[0.5, 4.0]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn non_finite_gain_rejected() {
        let config = parse_config(P_LOOP).unwrap();
        assert!(matches!(
            gain_sweep(&config, &[1.0, f64::NAN]),
            Err(AppError::InvalidInput(_))
        ));
    }
}
