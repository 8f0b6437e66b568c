use lk_core::{HasTransferFunction, LkError, TransferFunction, closed_loop, series_connection};

fn pt1(k: f64, t: f64) -> TransferFunction {
    TransferFunction::new(vec![k], vec![t, 1.0]).unwrap()
}

#[test]
fn pi_around_lag_has_unity_dc_gain() {
    // C = 2(s+1)/s, P = 1/(s+1)
    let pi = TransferFunction::new(vec![2.0, 2.0], vec![1.0, 0.0]).unwrap();
    let cl = closed_loop(&pi, &pt1(1.0, 1.0)).unwrap();
    assert!((cl.dc_gain().unwrap() - 1.0).abs() < 1e-12);
    assert!(cl.poles().iter().all(|p| p.re < 0.0));
}

#[test]
fn closed_loop_matches_manual_composition() {
    let c = TransferFunction::gain(3.0).unwrap();
    let p = pt1(2.0, 0.5).series(&pt1(1.0, 2.0)).unwrap();
    let manual = c.series(&p).unwrap().feedback_unity().unwrap();
    assert_eq!(closed_loop(&c, &p).unwrap(), manual);
}

#[test]
fn chain_of_trait_objects() {
    let a = pt1(2.0, 1.0);
    let b = pt1(0.25, 3.0);
    let chain: Vec<&dyn HasTransferFunction> = vec![&a, &b];
    let s = series_connection(&chain).unwrap();
    assert_eq!(s.order(), 2);
    assert!((s.dc_gain().unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn non_finite_coefficients_rejected() {
    let err = TransferFunction::new(vec![f64::NAN], vec![1.0, 1.0]).unwrap_err();
    assert!(matches!(err, LkError::NonFinite { .. }));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn series_is_associative_at_dc(
            k1 in 0.1f64..10.0, t1 in 0.1f64..10.0,
            k2 in 0.1f64..10.0, t2 in 0.1f64..10.0,
            k3 in 0.1f64..10.0, t3 in 0.1f64..10.0,
        ) {
            let (a, b, c) = (pt1(k1, t1), pt1(k2, t2), pt1(k3, t3));
            let left = a.series(&b).unwrap().series(&c).unwrap();
            let right = a.series(&b.series(&c).unwrap()).unwrap();
            let (gl, gr) = (left.dc_gain().unwrap(), right.dc_gain().unwrap());
            prop_assert!((gl - gr).abs() <= 1e-9 * gl.abs());
            prop_assert!((gl - k1 * k2 * k3).abs() <= 1e-9 * gl.abs());
        }

        #[test]
        fn unity_feedback_dc_gain(k in 0.01f64..100.0, t in 0.01f64..10.0) {
            let cl = pt1(k, t).feedback_unity().unwrap();
            let expected = k / (1.0 + k);
            prop_assert!((cl.dc_gain().unwrap() - expected).abs() < 1e-12);
            prop_assert_eq!(cl.order(), 1);
        }
    }
}
