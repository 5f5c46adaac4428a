#[cfg(feature = "alloc")]
use alloc::vec;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::traits::OdeVector;

#[cfg(feature = "alloc")]
use super::stepper::validate_sample_times;
use super::{AdaptiveSettings, AdaptiveStepper, DormandPrince, OdeError, Stats};
#[cfg(feature = "alloc")]
use super::Solution;

/// Integrate `dy/dt = f(y, t)` with Dormand-Prince 5(4), sampling the
/// solution at each of `ts`.
///
/// `ts` must be non-empty, finite and strictly increasing, and `ts[0]` is
/// the initial time. Returns one state per sample time; the first is `y0`
/// itself. `tol` bounds the infinity norm of each step's local error
/// estimate. A single sample time returns `[y0]` without evaluating `f`.
///
/// ```
/// use hummingbird::ode::integrate;
///
/// let ts = [0.0_f64, 1.0, 2.0, 3.0];
/// let ys = integrate(&ts, 1.0, 1e-9, |y: &f64, _t| -*y).unwrap();
/// for (t, y) in ts.iter().zip(&ys) {
///     assert!((y - (-t).exp()).abs() < 1e-7);
/// }
/// ```
#[cfg(feature = "alloc")]
pub fn integrate<V, F>(ts: &[V::Scalar], y0: V, tol: V::Scalar, f: F) -> Result<Vec<V>, OdeError>
where
    V: OdeVector,
    F: FnMut(&V, V::Scalar) -> V,
{
    integrate_with(ts, y0, f, &AdaptiveSettings::new(tol)).map(|sol| sol.states)
}

/// Like [`integrate`], with full controller settings and work counters.
#[cfg(feature = "alloc")]
pub fn integrate_with<V, F>(
    ts: &[V::Scalar],
    y0: V,
    f: F,
    settings: &AdaptiveSettings<V::Scalar>,
) -> Result<Solution<V>, OdeError>
where
    V: OdeVector,
    F: FnMut(&V, V::Scalar) -> V,
{
    validate_sample_times(ts)?;
    let mut states = vec![y0; ts.len()];
    let stats = integrate_into(ts, y0, f, settings, &mut states)?;
    Ok(Solution { states, stats })
}

/// Allocation-free driver: writes one state per sample time into `out`.
///
/// `out.len()` must equal `ts.len()`. On error the contents of `out` are
/// unspecified.
///
/// ```
/// use hummingbird::ode::{integrate_into, AdaptiveSettings};
/// use hummingbird::Vector2;
///
/// let ts = [0.0_f64, 0.5, 1.0];
/// let mut out = [Vector2::zeros(); 3];
/// let stats = integrate_into(
///     &ts,
///     Vector2::from_array([0.0, 1.0]),
///     |y: &Vector2<f64>, _t| Vector2::from_array([y[1], -y[0]]),
///     &AdaptiveSettings::new(1e-10),
///     &mut out,
/// )
/// .unwrap();
/// assert!((out[2][0] - 1.0_f64.sin()).abs() < 1e-8);
/// assert!(stats.accepted > 0);
/// ```
pub fn integrate_into<V, F>(
    ts: &[V::Scalar],
    y0: V,
    f: F,
    settings: &AdaptiveSettings<V::Scalar>,
    out: &mut [V],
) -> Result<Stats, OdeError>
where
    V: OdeVector,
    F: FnMut(&V, V::Scalar) -> V,
{
    let tableau = DormandPrince::<V::Scalar>::dormand_prince();
    let mut stepper = AdaptiveStepper::new(&tableau, f, ts, y0, out, settings)?;
    stepper.run()
}
