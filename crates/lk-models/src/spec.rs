//! Declarative model descriptions.
//!
//! A [`ModelSpec`] is the serialisable form of a catalog entry, as it appears
//! in loop definition files:
//!
//! ```yaml
//! type: PT1
//! kp: 2.0
//! t: 1.0
//! ```
//!
//! [`ModelSpec::build`] validates the parameters and returns a [`Model`].

use core::fmt;

use lk_core::{HasTransferFunction, TransferFunction};
use serde::{Deserialize, Serialize};

use crate::controller::{Proportional, ProportionalIntegral, ProportionalIntegralDerivative};
use crate::deadtime::{DeadTime, PadeOrder};
use crate::error::{ModelError, ModelResult};
use crate::plant::{
    Derivative, DerivativeLag, FirstOrderLag, Integrator, IntegratorLag, SecondOrderDamped,
    SecondOrderLag,
};

/// Model kind and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelSpec {
    /// First-order lag.
    #[serde(rename = "PT1")]
    FirstOrderLag { kp: f64, t: f64 },

    /// Second-order lag from two time constants.
    #[serde(rename = "PT2")]
    SecondOrderLag { kp: f64, t1: f64, t2: f64 },

    /// Second-order lag in damping form.
    #[serde(rename = "PT2Damped")]
    SecondOrderDamped { kp: f64, d: f64, t: f64 },

    /// Second-order lag identified from a step measurement.
    #[serde(rename = "PT2Identified")]
    SecondOrderIdentified {
        kp: f64,
        h1: f64,
        h_inf: f64,
        t1: f64,
    },

    /// Integrator, given by exactly one of `ki` or `ti`.
    #[serde(rename = "I")]
    Integrator {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ki: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ti: Option<f64>,
    },

    /// Integrator with lag, given by exactly one of `ki` or `ti`.
    #[serde(rename = "IT1")]
    IntegratorLag {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ki: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ti: Option<f64>,
        t1: f64,
    },

    /// Ideal differentiator.
    #[serde(rename = "D")]
    Derivative { kd: f64 },

    /// Differentiator with lag.
    #[serde(rename = "DT1")]
    DerivativeLag { kd: f64, t1: f64 },

    /// Proportional controller.
    #[serde(rename = "P")]
    Proportional { kp: f64 },

    /// PI controller.
    #[serde(rename = "PI")]
    ProportionalIntegral { kp: f64, ti: f64 },

    /// PID controller (series form).
    #[serde(rename = "PID")]
    ProportionalIntegralDerivative { kp: f64, ti: f64, td: f64 },

    /// Dead time, Padé approximated.
    DeadTime {
        tt: f64,
        #[serde(default)]
        order: PadeOrder,
    },
}

enum IntegralParam {
    Gain(f64),
    Time(f64),
}

fn integral_param(ki: Option<f64>, ti: Option<f64>) -> ModelResult<IntegralParam> {
    match (ki, ti) {
        (Some(ki), None) => Ok(IntegralParam::Gain(ki)),
        (None, Some(ti)) => Ok(IntegralParam::Time(ti)),
        _ => Err(ModelError::InvalidArgument {
            what: "integrator needs exactly one of `ki` or `ti`".to_string(),
        }),
    }
}

impl ModelSpec {
    /// Validate parameters and construct the model.
    pub fn build(&self) -> ModelResult<Model> {
        let model = match *self {
            ModelSpec::FirstOrderLag { kp, t } => Model::FirstOrderLag(FirstOrderLag::new(kp, t)?),
            ModelSpec::SecondOrderLag { kp, t1, t2 } => {
                Model::SecondOrderLag(SecondOrderLag::new(kp, t1, t2)?)
            }
            ModelSpec::SecondOrderDamped { kp, d, t } => {
                Model::SecondOrderDamped(SecondOrderDamped::new(kp, d, t)?)
            }
            ModelSpec::SecondOrderIdentified { kp, h1, h_inf, t1 } => {
                Model::SecondOrderDamped(SecondOrderDamped::from_step(kp, h1, h_inf, t1)?)
            }
            ModelSpec::Integrator { ki, ti } => match integral_param(ki, ti)? {
                IntegralParam::Gain(ki) => Model::Integrator(Integrator::new(ki)?),
                IntegralParam::Time(ti) => Model::Integrator(Integrator::from_ti(ti)?),
            },
            ModelSpec::IntegratorLag { ki, ti, t1 } => match integral_param(ki, ti)? {
                IntegralParam::Gain(ki) => Model::IntegratorLag(IntegratorLag::new(ki, t1)?),
                IntegralParam::Time(ti) => Model::IntegratorLag(IntegratorLag::from_ti(ti, t1)?),
            },
            ModelSpec::Derivative { kd } => Model::Derivative(Derivative::new(kd)?),
            ModelSpec::DerivativeLag { kd, t1 } => {
                Model::DerivativeLag(DerivativeLag::new(kd, t1)?)
            }
            ModelSpec::Proportional { kp } => Model::Proportional(Proportional::new(kp)?),
            ModelSpec::ProportionalIntegral { kp, ti } => {
                Model::ProportionalIntegral(ProportionalIntegral::new(kp, ti)?)
            }
            ModelSpec::ProportionalIntegralDerivative { kp, ti, td } => {
                Model::ProportionalIntegralDerivative(ProportionalIntegralDerivative::new(
                    kp, ti, td,
                )?)
            }
            ModelSpec::DeadTime { tt, order } => Model::DeadTime(DeadTime::with_order(tt, order)?),
        };
        Ok(model)
    }

    /// True for the controller structures (P, PI, PID).
    pub fn is_controller(&self) -> bool {
        matches!(
            self,
            ModelSpec::Proportional { .. }
                | ModelSpec::ProportionalIntegral { .. }
                | ModelSpec::ProportionalIntegralDerivative { .. }
        )
    }

    /// Copy of a controller spec with its proportional gain replaced.
    ///
    /// Returns `None` for plant specs.
    pub fn with_kp(&self, new_kp: f64) -> Option<Self> {
        let mut spec = self.clone();
        match &mut spec {
            ModelSpec::Proportional { kp }
            | ModelSpec::ProportionalIntegral { kp, .. }
            | ModelSpec::ProportionalIntegralDerivative { kp, .. } => {
                *kp = new_kp;
                Some(spec)
            }
            _ => None,
        }
    }
}

/// A constructed catalog model.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    FirstOrderLag(FirstOrderLag),
    SecondOrderLag(SecondOrderLag),
    SecondOrderDamped(SecondOrderDamped),
    Integrator(Integrator),
    IntegratorLag(IntegratorLag),
    Derivative(Derivative),
    DerivativeLag(DerivativeLag),
    Proportional(Proportional),
    ProportionalIntegral(ProportionalIntegral),
    ProportionalIntegralDerivative(ProportionalIntegralDerivative),
    DeadTime(DeadTime),
}

impl HasTransferFunction for Model {
    fn tf(&self) -> &TransferFunction {
        match self {
            Model::FirstOrderLag(m) => m.tf(),
            Model::SecondOrderLag(m) => m.tf(),
            Model::SecondOrderDamped(m) => m.tf(),
            Model::Integrator(m) => m.tf(),
            Model::IntegratorLag(m) => m.tf(),
            Model::Derivative(m) => m.tf(),
            Model::DerivativeLag(m) => m.tf(),
            Model::Proportional(m) => m.tf(),
            Model::ProportionalIntegral(m) => m.tf(),
            Model::ProportionalIntegralDerivative(m) => m.tf(),
            Model::DeadTime(m) => m.tf(),
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::FirstOrderLag(m) => m.fmt(f),
            Model::SecondOrderLag(m) => m.fmt(f),
            Model::SecondOrderDamped(m) => m.fmt(f),
            Model::Integrator(m) => m.fmt(f),
            Model::IntegratorLag(m) => m.fmt(f),
            Model::Derivative(m) => m.fmt(f),
            Model::DerivativeLag(m) => m.fmt(f),
            Model::Proportional(m) => m.fmt(f),
            Model::ProportionalIntegral(m) => m.fmt(f),
            Model::ProportionalIntegralDerivative(m) => m.fmt(f),
            Model::DeadTime(m) => m.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pt1_from_yaml() {
        let spec: ModelSpec = serde_yaml::from_str("type: PT1\nkp: 2.0\nt: 1.0\n").unwrap();
        assert_eq!(spec, ModelSpec::FirstOrderLag { kp: 2.0, t: 1.0 });
        let model = spec.build().unwrap();
        assert_eq!(model.tf().denominator(), &[1.0, 1.0]);
        assert_eq!(model.to_string(), "PT1(Kp=2.000, T=1.000)");
    }

    #[test]
    fn integrator_from_either_parameter() {
        let by_gain: ModelSpec = serde_yaml::from_str("type: I\nki: 2.0\n").unwrap();
        let by_time: ModelSpec = serde_yaml::from_str("type: I\nti: 0.5\n").unwrap();
        assert_eq!(by_gain.build().unwrap().tf(), by_time.build().unwrap().tf());
    }

    #[test]
    fn integrator_needs_exactly_one_parameter() {
        let both = ModelSpec::Integrator {
            ki: Some(1.0),
            ti: Some(1.0),
        };
        assert!(matches!(
            both.build(),
            Err(ModelError::InvalidArgument { .. })
        ));
        let none = ModelSpec::IntegratorLag {
            ki: None,
            ti: None,
            t1: 1.0,
        };
        assert!(matches!(
            none.build(),
            Err(ModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn dead_time_defaults_to_second_order() {
        let spec: ModelSpec = serde_yaml::from_str("type: DeadTime\ntt: 0.5\n").unwrap();
        match spec.build().unwrap() {
            Model::DeadTime(d) => assert_eq!(d.order(), PadeOrder::Second),
            other => panic!("unexpected model {other}"),
        }
    }

    #[test]
    fn invalid_pade_order_fails_to_parse() {
        let res: Result<ModelSpec, _> = serde_yaml::from_str("type: DeadTime\ntt: 0.5\norder: 4\n");
        assert!(res.is_err());
    }

    #[test]
    fn identified_spec_propagates_domain_error() {
        let spec = ModelSpec::SecondOrderIdentified {
            kp: 1.0,
            h1: 50.0,
            h_inf: 60.0,
            t1: 1.0,
        };
        assert!(matches!(spec.build(), Err(ModelError::Domain { .. })));
    }

    #[test]
    fn controller_gain_override() {
        let pi = ModelSpec::ProportionalIntegral { kp: 1.0, ti: 2.0 };
        assert!(pi.is_controller());
        assert_eq!(
            pi.with_kp(3.0),
            Some(ModelSpec::ProportionalIntegral { kp: 3.0, ti: 2.0 })
        );
        let plant = ModelSpec::FirstOrderLag { kp: 1.0, t: 1.0 };
        assert!(!plant.is_controller());
        assert_eq!(plant.with_kp(3.0), None);
    }
}
