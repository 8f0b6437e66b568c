//! Dead time (transport delay) via diagonal Padé approximation.
//!
//! `e^(-Tt·s)` is not rational, so it cannot be multiplied into a transfer
//! function or realized for simulation. The approximant replaces it by an
//! all-pass `P(-x)/P(x)` with `x = Tt·s` and
//! `P(x) = 1 + x/2 + x²/12 + x³/120`, truncated after the chosen order.

use core::fmt;

use lk_core::{HasTransferFunction, TransferFunction};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};

/// Order of the Padé approximation.
///
/// Higher orders give a step response closer to a clean shifted step and
/// keep the phase error small over a wider band, but each order adds one
/// pole and one right-half-plane zero. More poles mean a larger state and a
/// stiffer system for the simulator, so the third order is the most
/// faithful and the most expensive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum PadeOrder {
    First,
    #[default]
    Second,
    Third,
}

impl PadeOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            PadeOrder::First => 1,
            PadeOrder::Second => 2,
            PadeOrder::Third => 3,
        }
    }
}

impl TryFrom<u8> for PadeOrder {
    type Error = ModelError;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(PadeOrder::First),
            2 => Ok(PadeOrder::Second),
            3 => Ok(PadeOrder::Third),
            other => Err(ModelError::InvalidArgument {
                what: format!("Padé order must be 1, 2 or 3, got {other}"),
            }),
        }
    }
}

impl From<PadeOrder> for u8 {
    fn from(order: PadeOrder) -> Self {
        order.as_u8()
    }
}

/// Rational approximation of `e^(-tt·s)`.
///
/// `tt = 0` returns the identity system.
///
/// # Errors
///
/// `Domain` for a negative delay, `NonFinite` for NaN/infinite delays.
pub fn pade(tt: f64, order: PadeOrder) -> ModelResult<TransferFunction> {
    let tt = lk_core::ensure_finite(tt, "tt")?;
    if tt < 0.0 {
        return Err(ModelError::Domain {
            param: "tt",
            value: tt,
            reason: "dead time must be non-negative",
        });
    }
    if tt == 0.0 {
        return Ok(TransferFunction::identity());
    }

    let c1 = tt / 2.0;
    let c2 = tt * tt / 12.0;
    let c3 = tt * tt * tt / 120.0;
    let (num, den) = match order {
        PadeOrder::First => (vec![-c1, 1.0], vec![c1, 1.0]),
        PadeOrder::Second => (vec![c2, -c1, 1.0], vec![c2, c1, 1.0]),
        PadeOrder::Third => (vec![-c3, c2, -c1, 1.0], vec![c3, c2, c1, 1.0]),
    };
    Ok(TransferFunction::new(num, den)?)
}

/// `system · e^(-tt·s)`, with the delay replaced by its Padé approximation.
pub fn add_deadtime(
    system: &dyn HasTransferFunction,
    tt: f64,
    order: PadeOrder,
) -> ModelResult<TransferFunction> {
    let delay = pade(tt, order)?;
    Ok(system.tf().series(&delay)?)
}

/// Pure dead-time element `G(s) ≈ e^(-Tt·s)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadTime {
    tt: f64,
    order: PadeOrder,
    tf: TransferFunction,
}

impl DeadTime {
    /// Create a dead-time element.
    ///
    /// # Arguments
    ///
    /// * `tt` - Delay (seconds), non-negative
    /// * `order` - Padé order, 1, 2 or 3
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an unsupported order (checked before the delay,
    /// so `tt = 0` with order 4 is still rejected).
    pub fn new(tt: f64, order: u8) -> ModelResult<Self> {
        let order = PadeOrder::try_from(order)?;
        Self::with_order(tt, order)
    }

    pub fn with_order(tt: f64, order: PadeOrder) -> ModelResult<Self> {
        let tf = pade(tt, order)?;
        Ok(Self { tt, order, tf })
    }

    pub fn tt(&self) -> f64 {
        self.tt
    }

    pub fn order(&self) -> PadeOrder {
        self.order
    }

    /// `system` followed by this delay.
    pub fn apply_to(&self, system: &dyn HasTransferFunction) -> ModelResult<TransferFunction> {
        Ok(system.tf().series(&self.tf)?)
    }
}

impl HasTransferFunction for DeadTime {
    fn tf(&self) -> &TransferFunction {
        &self.tf
    }
}

impl fmt::Display for DeadTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeadTime(Tt={:.3}s, order={})", self.tt, self.order.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plant::FirstOrderLag;

    #[test]
    fn order_one_coefficients() {
        let g = pade(2.0, PadeOrder::First).unwrap();
        assert_eq!(g.numerator(), &[-1.0, 1.0]);
        assert_eq!(g.denominator(), &[1.0, 1.0]);
    }

    #[test]
    fn order_two_and_three_coefficients() {
        let tt = 0.6;
        let g2 = pade(tt, PadeOrder::Second).unwrap();
        assert_eq!(g2.numerator(), &[tt * tt / 12.0, -tt / 2.0, 1.0]);
        assert_eq!(g2.denominator(), &[tt * tt / 12.0, tt / 2.0, 1.0]);

        let g3 = pade(tt, PadeOrder::Third).unwrap();
        assert_eq!(g3.order(), 3);
        assert_eq!(g3.numerator()[0], -tt * tt * tt / 120.0);
        assert_eq!(g3.denominator()[0], tt * tt * tt / 120.0);
    }

    #[test]
    fn zero_delay_is_identity() {
        let g = pade(0.0, PadeOrder::Third).unwrap();
        assert_eq!(g, TransferFunction::identity());
    }

    #[test]
    fn unsupported_order_rejected() {
        assert!(matches!(
            DeadTime::new(1.0, 4),
            Err(ModelError::InvalidArgument { .. })
        ));
        assert!(matches!(
            DeadTime::new(0.0, 0),
            Err(ModelError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn negative_delay_rejected() {
        assert!(matches!(
            pade(-1.0, PadeOrder::First),
            Err(ModelError::Domain { param: "tt", .. })
        ));
    }

    #[test]
    fn approximation_is_all_pass() {
        for order in [PadeOrder::First, PadeOrder::Second, PadeOrder::Third] {
            let g = pade(0.8, order).unwrap();
            for w in [0.1, 1.0, 5.0, 50.0] {
                assert!((g.freq_response(w).norm() - 1.0).abs() < 1e-12);
            }
            assert_eq!(g.dc_gain(), Some(1.0));
        }
    }

    #[test]
    fn higher_orders_track_phase_better_than_first() {
        let tt = 1.0;
        let w = 2.0;
        let ideal = -tt * w;
        let err = |order| {
            let phase = pade(tt, order).unwrap().freq_response(w).arg();
            // wrap into (-π, π] relative to the ideal phase
            let diff = phase - ideal;
            (diff.sin().atan2(diff.cos())).abs()
        };
        let e1 = err(PadeOrder::First);
        let e2 = err(PadeOrder::Second);
        let e3 = err(PadeOrder::Third);
        assert!(e1 > e2);
        assert!(e1 > e3);
    }

    #[test]
    fn add_deadtime_keeps_plant_gain() {
        let plant = FirstOrderLag::new(2.0, 1.0).unwrap();
        let g = add_deadtime(&plant, 0.5, PadeOrder::Second).unwrap();
        assert_eq!(g.order(), 3);
        assert!((g.dc_gain().unwrap() - 2.0).abs() < 1e-12);

        let delay = DeadTime::new(0.5, 2).unwrap();
        assert_eq!(delay.apply_to(&plant).unwrap(), g);
    }

    #[test]
    fn order_serializes_as_integer() {
        let order: PadeOrder = serde_yaml::from_str("3").unwrap();
        assert_eq!(order, PadeOrder::Third);
        assert!(serde_yaml::from_str::<PadeOrder>("4").is_err());
    }
}
