//! Adaptive explicit Runge-Kutta integration with dense output.
//!
//! # Pieces
//!
//! - [`ButchersTableau`] holds the coefficients of an embedded method.
//!   [`DormandPrince`] is the 7-stage 5(4) pair, FSAL, with a 4th-degree
//!   continuous extension.
//! - [`AdaptiveStepper`] owns the integration state and a fixed arena of
//!   stage vectors. Each [`try_step`](AdaptiveStepper::try_step) performs
//!   one accept/reject attempt; [`step`](AdaptiveStepper::step) retries until
//!   an attempt is accepted. Accepted steps write interpolated values for
//!   every requested sample time they passed.
//! - [`integrate`], [`integrate_with`] and [`integrate_into`] drive a
//!   stepper over a list of sample times.
//!
//! # Step-size control
//!
//! The error estimate is the infinity norm of the difference between the
//! 5th- and 4th-order solutions. A step is accepted when it is below the
//! absolute tolerance, and after every attempt
//!
//! ```text
//! h <- h * clamp(safety * (tol / E)^(1 / (order + 1)), min_factor, max_factor)
//! ```
//!
//! # Example
//!
//! ```
//! use hummingbird::ode::{integrate_with, AdaptiveSettings};
//! use hummingbird::Vector;
//!
//! // Harmonic oscillator: y'' = -y  →  [y, y'] with dy/dt = [y', -y]
//! let y0 = Vector::from_array([1.0_f64, 0.0]);
//! let tau = 2.0 * std::f64::consts::PI;
//! let ts = [0.0, 0.25 * tau, 0.5 * tau, tau];
//! let settings = AdaptiveSettings::new(1e-10);
//! let sol = integrate_with(
//!     &ts, y0,
//!     |y: &Vector<f64, 2>, _t| Vector::from_array([y[1], -y[0]]),
//!     &settings,
//! ).unwrap();
//! assert!((sol.states[3][0] - 1.0).abs() < 1e-7); // cos(2π) ≈ 1
//! assert!((sol.states[2][0] + 1.0).abs() < 1e-7); // cos(π) ≈ -1
//! ```

mod integrate;
mod settings;
mod stepper;
mod tableau;


#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "alloc")]
use crate::traits::OdeVector;

#[cfg(feature = "alloc")]
pub use integrate::{integrate, integrate_with};
pub use integrate::integrate_into;
pub use settings::AdaptiveSettings;
pub use stepper::{AdaptiveStepper, StepAttempt, StepperState};
pub use tableau::{ButchersTableau, DormandPrince};

/// Errors from tableau construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TableauError {
    /// Method order must be at least one.
    #[error("method order must be positive")]
    ZeroOrder,
    /// The last node must be exactly one.
    #[error("last node c[S-1] must equal 1")]
    LastNodeNotUnity,
    /// A coupling coefficient on or above the diagonal is non-zero.
    #[error("a[{row}][{col}] is on or above the diagonal but non-zero")]
    NotStrictlyLowerTriangular { row: usize, col: usize },
    /// A node differs from the sum of its coupling row.
    #[error("c[{row}] does not equal the sum of row {row} of a")]
    RowSumMismatch { row: usize },
    /// Lower-order weights do not sum to one.
    #[error("lower-order weights b do not sum to 1")]
    LowOrderWeights,
    /// Higher-order weights do not sum to one.
    #[error("higher-order weights b_hat do not sum to 1")]
    HighOrderWeights,
    /// A dense polynomial does not reach its stage weight at `sigma = 1`.
    #[error("dense polynomial of stage {stage} does not equal b_hat[{stage}] at sigma = 1")]
    DenseEndpointMismatch { stage: usize },
}

/// Errors from ODE integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OdeError {
    /// Malformed Butcher tableau.
    #[error("invalid tableau: {0}")]
    InvalidTableau(#[from] TableauError),
    /// Tolerance is not positive and finite.
    #[error("tolerance must be positive and finite")]
    InvalidTolerance,
    /// Controller settings out of range.
    #[error("invalid step-size controller settings")]
    InvalidSettings,
    /// No sample times were given.
    #[error("at least one sample time is required")]
    NoSampleTimes,
    /// A sample time is not finite or not greater than its predecessor.
    #[error("sample time {index} is not finite or not strictly increasing")]
    SampleTimesNotIncreasing { index: usize },
    /// Output buffer length differs from the number of sample times.
    #[error("output buffer holds {found} states but {expected} sample times were given")]
    OutputLengthMismatch { expected: usize, found: usize },
    /// Step size shrank below the minimum or below the resolution of `t`.
    #[error("step size underflow")]
    StepSizeUnderflow,
    /// Step error stayed non-finite (NaN / Inf) through every retry.
    #[error("step error is not finite")]
    StepNotFinite,
    /// Too many consecutive rejected attempts for one step.
    #[error("too many consecutive rejected steps")]
    TooManyRejections,
    /// Exceeded maximum number of step attempts.
    #[error("maximum number of steps exceeded")]
    MaxStepsExceeded,
    /// No accepted step is available to interpolate.
    #[error("no dense output available")]
    NoDenseOutput,
    /// Interpolation point outside the last accepted step.
    #[error("interpolation point out of bounds")]
    InterpOutOfBounds,
    /// The stepper has already emitted every sample.
    #[error("integration already finished")]
    Finished,
}

/// Work counters for one integration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Total derivative evaluations.
    pub evals: usize,
    /// Accepted steps.
    pub accepted: usize,
    /// Rejected steps.
    pub rejected: usize,
}

impl Stats {
    /// Accepted plus rejected attempts.
    #[inline]
    pub fn attempts(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Result of [`integrate_with`]: one state per sample time.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<V: OdeVector> {
    /// States at the requested sample times; `states[0]` is the initial value.
    pub states: Vec<V>,
    /// Work counters.
    pub stats: Stats,
}
