use crate::traits::FloatScalar;

use super::OdeError;

/// Settings for adaptive step-size control.
///
/// Adjust with struct-update syntax:
///
/// ```
/// use hummingbird::ode::AdaptiveSettings;
///
/// let settings = AdaptiveSettings {
///     max_steps: 500,
///     initial_step: Some(0.01),
///     ..AdaptiveSettings::new(1e-9_f64)
/// };
/// assert_eq!(settings.safety, 0.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSettings<T> {
    /// Absolute error tolerance on the infinity norm of the local error
    /// estimate (default: 1e-8 for `f64`, 1e-6 for `f32`).
    pub tol: T,
    /// Safety factor for step-size controller (default: 0.9).
    pub safety: T,
    /// Minimum step-size decrease factor (default: 0.2).
    pub min_factor: T,
    /// Maximum step-size increase factor, also used after a zero error
    /// estimate (default: 10.0).
    pub max_factor: T,
    /// Smallest step magnitude allowed before failing with
    /// [`OdeError::StepSizeUnderflow`] (default: smallest positive normal).
    /// A step too small to change `t` fails regardless.
    pub min_step: T,
    /// Consecutive rejected attempts allowed within one step (default: 50).
    pub max_rejects: usize,
    /// Maximum number of step attempts, accepted or rejected, before
    /// returning [`OdeError::MaxStepsExceeded`] (default: 100_000).
    pub max_steps: usize,
    /// First trial step. `None` picks one from the problem (default: `None`).
    pub initial_step: Option<T>,
}

impl<T: FloatScalar> AdaptiveSettings<T> {
    /// Default controller with the given tolerance.
    pub fn new(tol: T) -> Self {
        Self {
            tol,
            safety: T::coeff(0.9),
            min_factor: T::coeff(0.2),
            max_factor: T::coeff(10.0),
            min_step: T::min_positive_value(),
            max_rejects: 50,
            max_steps: 100_000,
            initial_step: None,
        }
    }

    /// Check that the settings describe a working controller.
    pub fn validate(&self) -> Result<(), OdeError> {
        if !(self.tol > T::zero() && self.tol.is_finite()) {
            return Err(OdeError::InvalidTolerance);
        }
        let one = T::one();
        let ok = self.safety > T::zero()
            && self.safety <= one
            && self.min_factor > T::zero()
            && self.min_factor <= one
            && self.max_factor >= one
            && self.max_factor.is_finite()
            && self.min_step >= T::zero()
            && self.max_steps > 0
            && self
                .initial_step
                .map_or(true, |h| h > T::zero() && h.is_finite());
        if ok {
            Ok(())
        } else {
            Err(OdeError::InvalidSettings)
        }
    }
}

impl Default for AdaptiveSettings<f64> {
    fn default() -> Self {
        Self::new(1e-8)
    }
}

impl Default for AdaptiveSettings<f32> {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AdaptiveSettings::<f64>::default().validate().is_ok());
        assert!(AdaptiveSettings::<f32>::default().validate().is_ok());
        assert_eq!(AdaptiveSettings::<f32>::default().tol, 1e-6);
    }

    #[test]
    fn rejects_bad_tolerance() {
        for tol in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
            assert_eq!(
                AdaptiveSettings::new(tol).validate(),
                Err(OdeError::InvalidTolerance)
            );
        }
    }

    #[test]
    fn rejects_bad_controller() {
        let base = AdaptiveSettings::<f64>::default();
        let cases = [
            AdaptiveSettings { safety: 0.0, ..base },
            AdaptiveSettings { min_factor: 1.5, ..base },
            AdaptiveSettings { max_factor: 0.5, ..base },
            AdaptiveSettings { max_steps: 0, ..base },
            AdaptiveSettings { initial_step: Some(-0.1), ..base },
        ];
        for s in cases {
            assert_eq!(s.validate(), Err(OdeError::InvalidSettings));
        }
    }
}
