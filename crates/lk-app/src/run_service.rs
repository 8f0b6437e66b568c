//! Building loops from their definitions and running simulations.

use lk_core::{HasTransferFunction, TransferFunction, closed_loop, series_connection};
use lk_models::{DeadTime, Model};
use lk_sim::{
    SimOptions, Trajectory, simulate_signal_with, simulate_step_scaled_with, suggested_duration,
    time_grid,
};
use tracing::{debug, info};

use crate::config::{InputDef, LoopConfig, validate_config};
use crate::error::AppResult;
use crate::metrics::StepMetrics;

/// A loop definition turned into models and transfer functions.
#[derive(Debug, Clone)]
pub struct LoopSystem {
    pub controller: Option<Model>,
    pub plant: Vec<Model>,
    pub dead_time: Option<DeadTime>,
    /// Everything in the forward path (controller, plant chain, delay).
    pub open_loop: TransferFunction,
    /// The simulated system: unity closed loop when a controller is
    /// present, the open-loop chain otherwise.
    pub system: TransferFunction,
}

impl LoopSystem {
    pub fn is_closed_loop(&self) -> bool {
        self.controller.is_some()
    }

    /// Largest real part over the poles of the simulated system.
    pub fn max_pole_real_part(&self) -> f64 {
        self.system
            .poles()
            .iter()
            .map(|p| p.re)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

impl HasTransferFunction for LoopSystem {
    fn tf(&self) -> &TransferFunction {
        &self.system
    }
}

/// Result of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub name: String,
    pub system: LoopSystem,
    pub duration: f64,
    pub options: SimOptions,
    pub trajectory: Trajectory,
    /// Present for step inputs only.
    pub metrics: Option<StepMetrics>,
}

/// Build models and compose the loop.
pub fn build_system(config: &LoopConfig) -> AppResult<LoopSystem> {
    validate_config(config)?;

    let controller = config.controller.as_ref().map(|c| c.build()).transpose()?;
    let plant = config
        .plant
        .iter()
        .map(|spec| spec.build())
        .collect::<Result<Vec<_>, _>>()?;
    let dead_time = config
        .dead_time
        .map(|dt| DeadTime::with_order(dt.tt, dt.order))
        .transpose()?;

    let mut chain: Vec<&dyn HasTransferFunction> = plant
        .iter()
        .map(|m| m as &dyn HasTransferFunction)
        .collect();
    if let Some(dt) = &dead_time {
        chain.push(dt);
    }
    let plant_tf = series_connection(&chain)?;

    let (open_loop, system) = match &controller {
        Some(c) => (c.tf().series(&plant_tf)?, closed_loop(c, &plant_tf)?),
        None => (plant_tf.clone(), plant_tf),
    };
    debug!(
        name = %config.name,
        order = system.order(),
        closed = controller.is_some(),
        "built loop"
    );

    Ok(LoopSystem {
        controller,
        plant,
        dead_time,
        open_loop,
        system,
    })
}

/// Build and simulate a loop definition.
pub fn run(config: &LoopConfig) -> AppResult<RunOutput> {
    let system = build_system(config)?;
    let sim = &config.simulation;
    let duration = sim
        .duration
        .unwrap_or_else(|| suggested_duration(&system.system));
    let options = SimOptions {
        points: sim.points,
        method: sim.method,
    };
    info!(
        name = %config.name,
        duration,
        method = ?options.method,
        "running loop"
    );

    let (trajectory, metrics) = match sim.input {
        InputDef::Step { amplitude } => {
            let traj = simulate_step_scaled_with(&system.system, amplitude, duration, &options)?;
            let metrics = StepMetrics::from_trajectory(&traj)?;
            (traj, Some(metrics))
        }
        input => {
            let t = time_grid(&system.system, duration, options.points)?;
            let u: Vec<f64> = t.iter().map(|&t| input.sample(t)).collect();
            let traj = simulate_signal_with(&system.system, &t, &u, &options)?;
            (traj, None)
        }
    };

    Ok(RunOutput {
        name: config.name.clone(),
        system,
        duration,
        options,
        trajectory,
        metrics,
    })
}
