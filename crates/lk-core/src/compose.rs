//! Loop composition: series chains and unity-feedback loops.
//!
//! Only unity sensor gain and no reference pre-filter are supported. For a
//! non-unity sensor use [`TransferFunction::feedback`] directly.

use crate::error::{LkError, LkResult};
use crate::tf::{HasTransferFunction, TransferFunction};

/// Connect systems in series, left to right.
///
/// Accepts raw transfer functions and models alike.
///
/// # Errors
///
/// `InvalidArgument` for an empty list; `InvalidSystem` if any member has a
/// zero denominator.
pub fn series_connection(systems: &[&dyn HasTransferFunction]) -> LkResult<TransferFunction> {
    let (first, rest) = systems
        .split_first()
        .ok_or_else(|| LkError::invalid_arg("series connection needs at least one system"))?;

    rest.iter()
        .try_fold(first.tf().clone(), |acc, sys| acc.series(sys.tf()))
}

/// Unity negative feedback around `controller` followed by `plant`.
///
/// Equivalent to `feedback(series(C, P), 1)`.
pub fn closed_loop(
    controller: &dyn HasTransferFunction,
    plant: &dyn HasTransferFunction,
) -> LkResult<TransferFunction> {
    controller.tf().series(plant.tf())?.feedback_unity()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_rejected() {
        let err = series_connection(&[]).unwrap_err();
        assert!(matches!(err, LkError::InvalidArgument { .. }));
    }

    #[test]
    fn single_system_passes_through() {
        let g = TransferFunction::new(vec![2.0], vec![1.0, 1.0]).unwrap();
        let s = series_connection(&[&g]).unwrap();
        assert_eq!(s, g);
    }

    #[test]
    fn chain_multiplies_gains() {
        let a = TransferFunction::new(vec![2.0], vec![1.0, 1.0]).unwrap();
        let b = TransferFunction::new(vec![3.0], vec![0.5, 1.0]).unwrap();
        let c = TransferFunction::gain(0.5).unwrap();
        let s = series_connection(&[&a, &b, &c]).unwrap();
        assert!((s.dc_gain().unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(s.order(), 2);
    }

    #[test]
    fn proportional_loop_dc_gain() {
        let p = TransferFunction::gain(1.0).unwrap();
        let plant = TransferFunction::new(vec![1.0], vec![1.0, 1.0]).unwrap();
        let cl = closed_loop(&p, &plant).unwrap();
        assert!((cl.dc_gain().unwrap() - 0.5).abs() < 1e-12);
    }
}
