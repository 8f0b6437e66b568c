//! Export of run results: CSV samples for plotting, JSON summaries.

use std::fmt::Write as _;
use std::path::Path;

use lk_core::TransferFunction;
use lk_sim::{Method, Trajectory};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::metrics::StepMetrics;
use crate::run_service::RunOutput;

/// Machine-readable description of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub closed_loop: bool,
    pub transfer_function: TransferFunction,
    /// Poles as `[re, im]` pairs
    pub poles: Vec<[f64; 2]>,
    pub dc_gain: Option<f64>,
    pub duration: f64,
    pub points: usize,
    pub method: Method,
    pub metrics: Option<StepMetrics>,
}

impl RunSummary {
    pub fn from_output(out: &RunOutput) -> Self {
        let system = &out.system.system;
        Self {
            name: out.name.clone(),
            closed_loop: out.system.is_closed_loop(),
            transfer_function: system.clone(),
            poles: system.poles().iter().map(|p| [p.re, p.im]).collect(),
            dc_gain: system.dc_gain(),
            duration: out.duration,
            points: out.trajectory.len(),
            method: out.options.method,
            metrics: out.metrics,
        }
    }
}

/// Trajectory as CSV text with a `t,u,y` header.
pub fn trajectory_csv(traj: &Trajectory) -> String {
    let mut out = String::with_capacity(32 * (traj.len() + 1));
    out.push_str("t,u,y\n");
    for ((t, u), y) in traj.t.iter().zip(&traj.u).zip(&traj.y) {
        // writing into a String cannot fail
        let _ = writeln!(out, "{t},{u},{y}");
    }
    out
}

pub fn write_csv(path: &Path, traj: &Trajectory) -> AppResult<()> {
    write_file(path, &trajectory_csv(traj))
}

pub fn write_summary_json(path: &Path, summary: &RunSummary) -> AppResult<()> {
    let content = serde_json::to_string_pretty(summary)?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
