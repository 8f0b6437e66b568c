use lk_core::HasTransferFunction;
use lk_models::{ModelError, ModelSpec, PadeOrder, add_deadtime, pade};

fn build(yaml: &str) -> lk_models::Model {
    let spec: ModelSpec = serde_yaml::from_str(yaml).unwrap();
    spec.build().unwrap()
}

#[test]
fn plants_from_yaml() {
    let cases = [
        ("{ type: PT1, kp: 2.0, t: 1.0 }", 1, Some(2.0)),
        ("{ type: PT2, kp: 1.5, t1: 2.0, t2: 0.5 }", 2, Some(1.5)),
        ("{ type: PT2Damped, kp: 3.0, d: 0.4, t: 1.0 }", 2, Some(3.0)),
        ("{ type: I, ti: 2.0 }", 1, None),
        ("{ type: IT1, ki: 1.0, t1: 0.5 }", 2, None),
        ("{ type: DT1, kd: 1.0, t1: 0.5 }", 1, Some(0.0)),
        ("{ type: DeadTime, tt: 1.0, order: 3 }", 3, Some(1.0)),
    ];
    for (yaml, order, dc) in cases {
        let model = build(yaml);
        assert_eq!(model.tf().order(), order, "{yaml}");
        match (model.tf().dc_gain(), dc) {
            (Some(got), Some(want)) => assert!((got - want).abs() < 1e-12, "{yaml}: {got}"),
            (got, want) => assert_eq!(got, want, "{yaml}"),
        }
    }
}

#[test]
fn controllers_from_yaml() {
    let p = build("{ type: P, kp: 4.0 }");
    assert_eq!(p.tf().numerator(), &[4.0]);

    let pi = build("{ type: PI, kp: 2.0, ti: 0.5 }");
    assert_eq!(pi.tf().numerator(), &[1.0, 2.0]);
    assert_eq!(pi.tf().denominator(), &[0.5, 0.0]);

    let pid = build("{ type: PID, kp: 1.0, ti: 2.0, td: 0.5 }");
    assert!(!pid.tf().is_proper());
    assert_eq!(pid.tf().numerator(), &[1.0, 2.0, 1.0]);
}

#[test]
fn identified_plant_keeps_measured_gain() {
    let model = build("{ type: PT2Identified, kp: 2.5, h1: 1.3, h_inf: 1.0, t1: 2.0 }");
    assert!((model.tf().dc_gain().unwrap() - 2.5).abs() < 1e-12);
    assert!(model.tf().poles().iter().all(|p| p.re < 0.0 && p.im != 0.0));
}

#[test]
fn parameter_errors() {
    let spec: ModelSpec = serde_yaml::from_str("{ type: PI, kp: 1.0, ti: 0.0 }").unwrap();
    assert!(matches!(spec.build(), Err(ModelError::Domain { .. })));

    let spec: ModelSpec = serde_yaml::from_str("{ type: I, ki: 1.0, ti: 1.0 }").unwrap();
    assert!(matches!(spec.build(), Err(ModelError::InvalidArgument { .. })));

    let spec: ModelSpec = serde_yaml::from_str("{ type: DeadTime, tt: -1.0 }").unwrap();
    assert!(matches!(spec.build(), Err(ModelError::Domain { .. })));

    assert!(serde_yaml::from_str::<ModelSpec>("{ type: DeadTime, tt: 1.0, order: 4 }").is_err());
}

#[test]
fn delay_keeps_gain_and_adds_order() {
    let plant = build("{ type: PT1, kp: 3.0, t: 1.3 }");
    for order in [PadeOrder::First, PadeOrder::Second, PadeOrder::Third] {
        let delayed = add_deadtime(&plant, 2.0, order).unwrap();
        assert_eq!(delayed.order(), 1 + order.as_u8() as usize);
        assert!((delayed.dc_gain().unwrap() - 3.0).abs() < 1e-12);
    }
}

#[test]
fn pade_is_all_pass() {
    let delay = pade(0.7, PadeOrder::Third).unwrap();
    for omega in [0.1, 1.0, 10.0, 100.0] {
        assert!((delay.freq_response(omega).norm() - 1.0).abs() < 1e-12);
    }
}

mod proptests {
    use super::*;
    use lk_models::SecondOrderDamped;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    proptest! {
        #[test]
        fn identification_inverts_overshoot(d in 0.05f64..0.95, t in 0.1f64..10.0) {
            let root = (1.0 - d * d).sqrt();
            let h1 = 1.0 + (-PI * d / root).exp();
            let t1 = PI * t / root;
            let (d_id, t_id) = SecondOrderDamped::identify(h1, 1.0, t1).unwrap();
            prop_assert!((d_id - d).abs() < 1e-9);
            prop_assert!((t_id - t).abs() < 1e-9 * t.max(1.0));
        }

        #[test]
        fn lag_dc_gain_is_kp(kp in -10.0f64..10.0, t in 0.0f64..100.0) {
            let spec = ModelSpec::FirstOrderLag { kp, t };
            let model = spec.build().unwrap();
            prop_assert_eq!(model.tf().dc_gain(), Some(kp));
        }
    }
}
