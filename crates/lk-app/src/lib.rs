//! Shared application service layer for loopkit.
//!
//! Turns YAML loop definitions into simulated trajectories and the figures
//! derived from them, for the CLI and any other front-end:
//! - config: loop definition schema, load/save/validate
//! - run_service: model construction, loop composition, simulation
//! - metrics: step response performance metrics
//! - sweep: parallel controller gain sweeps
//! - export: CSV trajectories and JSON run summaries

pub mod config;
pub mod error;
pub mod export;
pub mod metrics;
pub mod run_service;
pub mod sweep;

// Re-export key types for convenience
pub use config::{
    DeadTimeSpec, InputDef, LoopConfig, SimulationDef, load_config, parse_config, save_config,
    validate_config,
};
pub use error::{AppError, AppResult};
pub use export::{RunSummary, trajectory_csv, write_csv, write_summary_json};
pub use metrics::{StepMetrics, step_metrics};
pub use run_service::{LoopSystem, RunOutput, build_system, run};
pub use sweep::{SweepPoint, gain_sweep};
