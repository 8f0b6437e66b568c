//! Loop definition files: schema, loading, saving and validation.
//!
//! ```yaml
//! name: PI on a first-order lag
//! controller: { type: PI, kp: 2.0, ti: 1.0 }
//! plant:
//!   - { type: PT1, kp: 1.0, t: 1.0 }
//! dead_time: { tt: 0.5, order: 2 }
//! simulation:
//!   duration: 30.0
//!   method: exact
//!   input: { kind: step, amplitude: 1.0 }
//! ```

use std::path::Path;

use lk_models::{ModelSpec, PadeOrder};
use lk_sim::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// A control loop (or open-loop chain) and how to simulate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unity-feedback controller; without one the plant runs open loop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<ModelSpec>,
    /// Series chain, left to right.
    pub plant: Vec<ModelSpec>,
    /// Transport delay after the plant chain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_time: Option<DeadTimeSpec>,
    #[serde(default)]
    pub simulation: SimulationDef,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeadTimeSpec {
    pub tt: f64,
    #[serde(default)]
    pub order: PadeOrder,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationDef {
    /// Horizon in seconds; picked from the slowest pole when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Grid size; picked from the fastest pole when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<usize>,
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub input: InputDef,
}

/// Reference signal fed to the loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputDef {
    Step {
        #[serde(default = "unit_amplitude")]
        amplitude: f64,
    },
    Sine {
        amplitude: f64,
        frequency_hz: f64,
    },
    Ramp {
        slope: f64,
    },
}

fn unit_amplitude() -> f64 {
    1.0
}

impl Default for InputDef {
    fn default() -> Self {
        InputDef::Step { amplitude: 1.0 }
    }
}

impl InputDef {
    /// Input value at time `t`.
    pub fn sample(&self, t: f64) -> f64 {
        match *self {
            InputDef::Step { amplitude } => amplitude,
            InputDef::Sine {
                amplitude,
                frequency_hz,
            } => amplitude * (2.0 * std::f64::consts::PI * frequency_hz * t).sin(),
            InputDef::Ramp { slope } => slope * t,
        }
    }
}

/// Load a loop definition from a YAML file.
pub fn load_config(path: &Path) -> AppResult<LoopConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let config = parse_config(&content)?;
    debug!(path = %path.display(), name = %config.name, "loaded loop definition");
    Ok(config)
}

/// Parse a loop definition from YAML text.
pub fn parse_config(yaml: &str) -> AppResult<LoopConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Save a loop definition to a YAML file.
pub fn save_config(path: &Path, config: &LoopConfig) -> AppResult<()> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

/// Validate loop structure and model parameters.
pub fn validate_config(config: &LoopConfig) -> AppResult<()> {
    if config.name.trim().is_empty() {
        return Err(AppError::Validation("loop name must not be empty".to_string()));
    }
    if config.plant.is_empty() {
        return Err(AppError::Validation(format!(
            "loop '{}' must have at least one plant element",
            config.name
        )));
    }
    if let Some(controller) = &config.controller {
        if !controller.is_controller() {
            return Err(AppError::Validation(format!(
                "loop '{}': controller must be P, PI or PID",
                config.name
            )));
        }
        controller.build()?;
    }
    for (i, spec) in config.plant.iter().enumerate() {
        if spec.is_controller() {
            return Err(AppError::Validation(format!(
                "loop '{}': plant[{i}] is a controller; use the `controller` field",
                config.name
            )));
        }
        spec.build()?;
    }
    if let Some(dt) = &config.dead_time {
        lk_models::DeadTime::with_order(dt.tt, dt.order)?;
    }
    validate_simulation(&config.simulation)
}

fn validate_simulation(sim: &SimulationDef) -> AppResult<()> {
    if let Some(duration) = sim.duration {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(AppError::Validation(format!(
                "simulation.duration must be positive, got {duration}"
            )));
        }
    }
    if let Some(points) = sim.points {
        if points < 2 {
            return Err(AppError::Validation(format!(
                "simulation.points must be at least 2, got {points}"
            )));
        }
    }
    let finite = match sim.input {
        InputDef::Step { amplitude } => amplitude.is_finite(),
        InputDef::Sine {
            amplitude,
            frequency_hz,
        } => {
            if frequency_hz <= 0.0 {
                return Err(AppError::Validation(format!(
                    "sine frequency must be positive, got {frequency_hz}"
                )));
            }
            amplitude.is_finite() && frequency_hz.is_finite()
        }
        InputDef::Ramp { slope } => slope.is_finite(),
    };
    if !finite {
        return Err(AppError::Validation(
            "simulation.input parameters must be finite".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PI_LOOP: &str = "
name: PI loop
controller: { type: PI, kp: 2.0, ti: 1.0 }
plant:
  - { type: PT1, kp: 1.0, t: 1.0 }
simulation:
  duration: 30.0
";

    #[test]
    fn parse_with_defaults() {
        let config = parse_config(PI_LOOP).unwrap();
        assert_eq!(config.name, "PI loop");
        assert_eq!(config.plant.len(), 1);
        assert_eq!(config.simulation.method, Method::Exact);
        assert_eq!(config.simulation.input, InputDef::Step { amplitude: 1.0 });
        assert!(config.dead_time.is_none());
        validate_config(&config).unwrap();
    }

    #[test]
    fn parse_inputs_and_method() {
        let yaml = "
name: ramp
plant: [{ type: I, ki: 1.0 }]
dead_time: { tt: 0.3 }
simulation:
  method: rk4
  input: { kind: ramp, slope: 0.5 }
";
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.simulation.method, Method::Rk4);
        assert_eq!(config.simulation.input, InputDef::Ramp { slope: 0.5 });
        assert_eq!(config.dead_time.unwrap().order, PadeOrder::Second);
        assert_eq!(config.simulation.input.sample(4.0), 2.0);
    }

    #[test]
    fn sine_sample() {
        let input = InputDef::Sine {
            amplitude: 2.0,
            frequency_hz: 0.25,
        };
        assert!((input.sample(1.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_plant_rejected() {
        let mut config = parse_config(PI_LOOP).unwrap();
        config.plant.clear();
        assert!(matches!(
            validate_config(&config),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn plant_in_controller_slot_rejected() {
        let mut config = parse_config(PI_LOOP).unwrap();
        config.controller = Some(ModelSpec::FirstOrderLag { kp: 1.0, t: 1.0 });
        assert!(matches!(
            validate_config(&config),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn model_domain_errors_surface() {
        let mut config = parse_config(PI_LOOP).unwrap();
        config.controller = Some(ModelSpec::ProportionalIntegral { kp: 1.0, ti: 0.0 });
        assert!(matches!(validate_config(&config), Err(AppError::Model(_))));
    }

    #[test]
    fn bad_simulation_settings_rejected() {
        let mut config = parse_config(PI_LOOP).unwrap();
        config.simulation.duration = Some(-1.0);
        assert!(validate_config(&config).is_err());

        let mut config = parse_config(PI_LOOP).unwrap();
        config.simulation.input = InputDef::Sine {
            amplitude: 1.0,
            frequency_hz: 0.0,
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_model_type_fails_to_parse() {
        let yaml = "name: x\nplant: [{ type: PT7, kp: 1.0 }]\n";
        assert!(matches!(parse_config(yaml), Err(AppError::Parse(_))));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let config = parse_config(PI_LOOP).unwrap();
        let path = std::env::temp_dir().join(format!(
            "loopkit_config_roundtrip_{}.yaml",
            std::process::id()
        ));
        save_config(&path, &config).unwrap();
        let loaded = load_config(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
