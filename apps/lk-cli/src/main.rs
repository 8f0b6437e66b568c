use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use lk_app::{
    AppResult, LoopConfig, RunSummary, build_system, gain_sweep, load_config, run,
    validate_config, write_csv, write_summary_json,
};
use lk_core::Complex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lk-cli")]
#[command(about = "loopkit CLI - simulate LTI control loops", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a loop definition
    Validate {
        /// Path to the loop YAML file
        config_path: PathBuf,
    },
    /// Print transfer function, poles, zeros and DC gain of the loop
    Describe {
        /// Path to the loop YAML file
        config_path: PathBuf,
    },
    /// Simulate the loop
    Run {
        /// Path to the loop YAML file
        config_path: PathBuf,
        /// Override the simulation horizon (seconds)
        #[arg(long)]
        duration: Option<f64>,
        /// Override the integration method
        #[arg(long, value_enum)]
        method: Option<MethodArg>,
        /// Write t,u,y samples to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write a JSON run summary to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Step the loop for several controller gains
    Sweep {
        /// Path to the loop YAML file
        config_path: PathBuf,
        /// Comma-separated proportional gains, e.g. 0.5,1,2
        #[arg(long, value_delimiter = ',', required = true)]
        gains: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MethodArg {
    Exact,
    Rk4,
    Euler,
}

impl From<MethodArg> for lk_sim::Method {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Exact => lk_sim::Method::Exact,
            MethodArg::Rk4 => lk_sim::Method::Rk4,
            MethodArg::Euler => lk_sim::Method::Euler,
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Describe { config_path } => cmd_describe(&config_path),
        Commands::Run {
            config_path,
            duration,
            method,
            csv,
            json,
        } => cmd_run(
            &config_path,
            duration,
            method,
            csv.as_deref(),
            json.as_deref(),
        ),
        Commands::Sweep { config_path, gains } => cmd_sweep(&config_path, &gains),
    }
}

fn cmd_validate(config_path: &Path) -> AppResult<()> {
    println!("Validating loop: {}", config_path.display());
    let config = load_config(config_path)?;
    validate_config(&config)?;
    println!("✓ Loop '{}' is valid", config.name);
    Ok(())
}

fn format_roots(roots: &[Complex<f64>]) -> String {
    if roots.is_empty() {
        return "none".to_string();
    }
    roots
        .iter()
        .map(|r| {
            if r.im == 0.0 {
                format!("{:.4}", r.re)
            } else {
                format!("{:.4}{:+.4}j", r.re, r.im)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_describe(config_path: &Path) -> AppResult<()> {
    let config = load_config(config_path)?;
    let system = build_system(&config)?;

    println!("Loop: {}", config.name);
    if let Some(desc) = &config.description {
        println!("  {desc}");
    }
    if let Some(controller) = &system.controller {
        println!("  Controller: {controller}");
    }
    for (i, model) in system.plant.iter().enumerate() {
        println!("  Plant[{i}]:   {model}");
    }
    if let Some(delay) = &system.dead_time {
        println!("  Delay:      {delay}");
    }

    let tf = &system.system;
    let kind = if system.is_closed_loop() {
        "Closed loop"
    } else {
        "Open loop"
    };
    println!("{kind}: G(s) = {tf}");
    println!("  Order:   {}", tf.order());
    println!("  Poles:   {}", format_roots(&tf.poles()));
    println!("  Zeros:   {}", format_roots(&tf.zeros()));
    match tf.dc_gain() {
        Some(k) => println!("  DC gain: {k:.6}"),
        None => println!("  DC gain: unbounded (pole at the origin)"),
    }
    let stable = system.max_pole_real_part() < 0.0;
    println!("  Stable:  {}", if stable { "yes" } else { "no" });
    Ok(())
}

fn cmd_run(
    config_path: &Path,
    duration: Option<f64>,
    method: Option<MethodArg>,
    csv: Option<&Path>,
    json: Option<&Path>,
) -> AppResult<()> {
    let mut config: LoopConfig = load_config(config_path)?;
    if duration.is_some() {
        config.simulation.duration = duration;
    }
    if let Some(method) = method {
        config.simulation.method = method.into();
    }

    println!("Running loop: {}", config.name);
    let out = run(&config)?;
    let traj = &out.trajectory;
    println!(
        "✓ Simulated {:.3} s with {} points ({:?})",
        out.duration,
        traj.len(),
        out.options.method
    );
    if let Some(y) = traj.final_value() {
        println!("  Final output: {y:.6}");
    }

    if let Some(m) = &out.metrics {
        println!("Step metrics:");
        println!("  Steady state:  {:.4}", m.steady_state);
        println!("  Peak:          {:.4} at {:.3} s", m.y_max, m.t_max);
        println!("  Overshoot:     {:.2} %", m.overshoot_pct);
        println!("  Rise time:     {:.3} s", m.rise_time);
        println!("  Settling time: {:.3} s", m.settling_time);
    }

    if let Some(path) = csv {
        write_csv(path, traj)?;
        println!("✓ Wrote samples to {}", path.display());
    }
    if let Some(path) = json {
        write_summary_json(path, &RunSummary::from_output(&out))?;
        println!("✓ Wrote summary to {}", path.display());
    }
    Ok(())
}

fn cmd_sweep(config_path: &Path, gains: &[f64]) -> AppResult<()> {
    let config = load_config(config_path)?;
    println!("Sweeping {} gains for loop: {}", gains.len(), config.name);
    let points = gain_sweep(&config, gains)?;

    println!(
        "{:>10} {:>8} {:>12} {:>12} {:>10} {:>10}",
        "Kp", "stable", "max Re(p)", "overshoot %", "rise s", "settle s"
    );
    for p in points {
        match p.metrics {
            Some(m) => println!(
                "{:>10.4} {:>8} {:>12.4} {:>12.2} {:>10.3} {:>10.3}",
                p.gain, p.stable, p.max_pole_re, m.overshoot_pct, m.rise_time, m.settling_time
            ),
            None => println!(
                "{:>10.4} {:>8} {:>12.4} {:>12} {:>10} {:>10}",
                p.gain, p.stable, p.max_pole_re, "-", "-", "-"
            ),
        }
    }
    Ok(())
}
