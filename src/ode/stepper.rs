use num_traits::{Float, One, Zero};

use crate::traits::{FloatScalar, OdeVector};

use super::{AdaptiveSettings, ButchersTableau, OdeError, Stats};

/// Lifecycle of an [`AdaptiveStepper`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperState {
    /// Samples remain to be produced.
    Running,
    /// Every sample time has been written. Terminal.
    Done,
}

/// Outcome of a single accept/reject attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepAttempt<T> {
    /// Whether the attempt advanced the state.
    pub accepted: bool,
    /// Infinity norm of the local error estimate.
    pub error: T,
    /// Step size the attempt used.
    pub h: T,
    /// Step size the next attempt will use.
    pub h_next: T,
}

/// Start of the most recent accepted step, kept for interpolation.
#[derive(Debug, Clone, Copy)]
struct AcceptedStep<V: OdeVector> {
    t: V::Scalar,
    y: V,
    h: V::Scalar,
    t_end: V::Scalar,
}

/// Adaptive embedded Runge-Kutta stepper with FSAL reuse and dense output.
///
/// Owns the state `(t_n, y_n)`, the derivative `dydx_n` cached at that
/// state, the current step `h_n`, and an arena of `S` stage vectors reused by
/// every attempt. Borrows the sample times and an output buffer of the same
/// length; each accepted step interpolates every sample time it passed into
/// the buffer, and the stepper is [`Done`](StepperState::Done) once the last
/// one is written.
///
/// ```
/// use hummingbird::ode::{AdaptiveSettings, AdaptiveStepper, DormandPrince, StepperState};
///
/// let dp = DormandPrince::<f64>::dormand_prince();
/// let ts = [0.0, 1.0, 2.0];
/// let mut out = [0.0; 3];
/// let settings = AdaptiveSettings::new(1e-10);
/// let mut stepper =
///     AdaptiveStepper::new(&dp, |y: &f64, _t| -*y, &ts, 1.0, &mut out, &settings).unwrap();
/// while stepper.step().unwrap() == StepperState::Running {}
/// drop(stepper);
/// assert!((out[2] - (-2.0_f64).exp()).abs() < 1e-8);
/// ```
pub struct AdaptiveStepper<'a, V, F, const S: usize, const P: usize>
where
    V: OdeVector,
{
    tableau: &'a ButchersTableau<V::Scalar, S, P>,
    f: F,
    settings: AdaptiveSettings<V::Scalar>,
    exponent: V::Scalar,
    ts: &'a [V::Scalar],
    out: &'a mut [V],
    it: usize,
    t: V::Scalar,
    y: V,
    dydx: V,
    h: V::Scalar,
    k: [V; S],
    last: Option<AcceptedStep<V>>,
    rejects: usize,
    stats: Stats,
    state: StepperState,
}

impl<'a, V, F, const S: usize, const P: usize> AdaptiveStepper<'a, V, F, S, P>
where
    V: OdeVector,
    F: FnMut(&V, V::Scalar) -> V,
{
    /// Start an integration at `(ts[0], y0)`.
    ///
    /// `out` must have one slot per sample time; `out[0]` is set to `y0`
    /// and the rest are written as steps pass them. Evaluates the derivative
    /// once at the initial state, plus once more when the first step is
    /// estimated rather than taken from `settings.initial_step`. A single
    /// sample time yields a stepper that is already done and evaluates
    /// nothing.
    pub fn new(
        tableau: &'a ButchersTableau<V::Scalar, S, P>,
        mut f: F,
        ts: &'a [V::Scalar],
        y0: V,
        out: &'a mut [V],
        settings: &AdaptiveSettings<V::Scalar>,
    ) -> Result<Self, OdeError> {
        settings.validate()?;
        validate_sample_times(ts)?;
        if out.len() != ts.len() {
            return Err(OdeError::OutputLengthMismatch {
                expected: ts.len(),
                found: out.len(),
            });
        }

        let zero = V::Scalar::zero();
        let t0 = ts[0];
        out[0] = y0;

        let mut stats = Stats::default();
        let (dydx, h, state) = if ts.len() == 1 {
            (V::splat(zero), zero, StepperState::Done)
        } else {
            let dydx = f(&y0, t0);
            stats.evals += 1;
            let h = match settings.initial_step {
                Some(h) => h,
                None => {
                    let span = ts[ts.len() - 1] - t0;
                    initial_step(&mut f, t0, &y0, &dydx, settings.tol, tableau.order(), span, &mut stats)
                }
            };
            (dydx, h, StepperState::Running)
        };

        Ok(Self {
            tableau,
            f,
            settings: *settings,
            exponent: V::Scalar::one() / V::Scalar::coeff((tableau.order() + 1) as f64),
            ts,
            out,
            it: 1,
            t: t0,
            y: y0,
            dydx,
            h,
            k: [V::splat(zero); S],
            last: None,
            rejects: 0,
            stats,
            state,
        })
    }

    /// One accept/reject attempt.
    ///
    /// Computes the stages from the cached derivative, estimates the error
    /// as the infinity norm of the difference between the two embedded
    /// solutions, and accepts when it is below the tolerance. An accepted
    /// attempt advances `t`, `y` and the cached derivative and writes the
    /// samples it passed; a rejected one leaves them untouched. Either way
    /// the step size is rescaled for the next attempt.
    ///
    /// A step reaching past the last sample time is shortened to end on it,
    /// so the derivative is never evaluated outside the requested interval.
    pub fn try_step(&mut self) -> Result<StepAttempt<V::Scalar>, OdeError> {
        if self.state == StepperState::Done {
            return Err(OdeError::Finished);
        }
        if self.h.abs() <= self.settings.min_step || self.t + self.h == self.t {
            return Err(OdeError::StepSizeUnderflow);
        }
        let t_final = self.ts[self.ts.len() - 1];
        let (h, t_next) = if self.t + self.h >= t_final {
            (t_final - self.t, t_final)
        } else {
            // Step by what `t` can actually represent.
            let t_next = self.t + self.h;
            (t_next - self.t, t_next)
        };

        let zero = V::Scalar::zero();
        let tab = self.tableau;
        // The stage arena is about to be overwritten.
        self.last = None;

        self.k[0] = self.dydx.scale(h);
        let mut last_dydx = self.dydx;
        for i in 1..S {
            let mut yi = self.y;
            for j in 0..i {
                let a = tab.a()[i][j];
                if a != zero {
                    yi = yi + self.k[j].scale(a);
                }
            }
            let d = (self.f)(&yi, self.t + tab.c()[i] * h);
            self.stats.evals += 1;
            self.k[i] = d.scale(h);
            last_dydx = d;
        }

        // Same summation order as the final stage, so an FSAL final stage
        // was evaluated at exactly this y_hat.
        let mut y_hat = self.y;
        let mut y_err = V::splat(zero);
        for i in 0..S {
            let b = tab.b_hat()[i];
            if b != zero {
                y_hat = y_hat + self.k[i].scale(b);
            }
            let e = tab.error_weights()[i];
            if e != zero {
                y_err = y_err + self.k[i].scale(e);
            }
        }
        let error = y_err.inf_norm();
        let factor = self.step_factor(error);
        let accepted = error < self.settings.tol;

        if accepted {
            self.last = Some(AcceptedStep {
                t: self.t,
                y: self.y,
                h,
                t_end: t_next,
            });
            self.t = t_next;
            self.y = y_hat;
            self.dydx = if tab.is_fsal() {
                last_dydx
            } else {
                self.stats.evals += 1;
                (self.f)(&self.y, self.t)
            };
            self.stats.accepted += 1;
            self.rejects = 0;
            self.emit_samples();
        } else {
            self.stats.rejected += 1;
            self.rejects += 1;
            if self.rejects > self.settings.max_rejects {
                return Err(if error.is_finite() {
                    OdeError::TooManyRejections
                } else {
                    OdeError::StepNotFinite
                });
            }
        }

        self.h = h * factor;
        Ok(StepAttempt {
            accepted,
            error,
            h,
            h_next: self.h,
        })
    }

    /// Attempt steps until one is accepted.
    ///
    /// Returns the state after that step. A stepper that is already
    /// [`Done`](StepperState::Done) returns immediately.
    pub fn step(&mut self) -> Result<StepperState, OdeError> {
        if self.state == StepperState::Done {
            return Ok(StepperState::Done);
        }
        loop {
            if self.stats.attempts() >= self.settings.max_steps {
                return Err(OdeError::MaxStepsExceeded);
            }
            if self.try_step()?.accepted {
                return Ok(self.state);
            }
        }
    }

    /// Step until every sample time has been written.
    pub fn run(&mut self) -> Result<Stats, OdeError> {
        while self.step()? == StepperState::Running {}
        Ok(self.stats)
    }

    /// Interpolate within the most recent accepted step.
    ///
    /// Fails with [`OdeError::NoDenseOutput`] before the first accepted step
    /// or once a later attempt has overwritten its stages, and with
    /// [`OdeError::InterpOutOfBounds`] outside that step.
    pub fn dense_output(&self, t: V::Scalar) -> Result<V, OdeError> {
        let step = self.last.as_ref().ok_or(OdeError::NoDenseOutput)?;
        if t < step.t || t > step.t_end {
            return Err(OdeError::InterpOutOfBounds);
        }
        Ok(self.interpolate(step, (t - step.t) / step.h))
    }

    /// Current time `t_n`.
    #[inline]
    pub fn t(&self) -> V::Scalar {
        self.t
    }

    /// Current solution `y_n`.
    #[inline]
    pub fn y(&self) -> &V {
        &self.y
    }

    /// Derivative cached at `(y_n, t_n)`.
    #[inline]
    pub fn dydx(&self) -> &V {
        &self.dydx
    }

    /// Step size of the next attempt.
    #[inline]
    pub fn h(&self) -> V::Scalar {
        self.h
    }

    /// Lifecycle state.
    #[inline]
    pub fn state(&self) -> StepperState {
        self.state
    }

    /// Number of output slots written so far, including the initial value.
    #[inline]
    pub fn samples_emitted(&self) -> usize {
        self.it
    }

    /// Work counters.
    #[inline]
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Consume the stepper, releasing the output buffer, and return its
    /// work counters.
    pub fn into_stats(self) -> Stats {
        self.stats
    }

    /// The tableau being integrated with.
    #[inline]
    pub fn tableau(&self) -> &'a ButchersTableau<V::Scalar, S, P> {
        self.tableau
    }

    fn step_factor(&self, error: V::Scalar) -> V::Scalar {
        let s = &self.settings;
        if !error.is_finite() {
            return s.min_factor;
        }
        if error == V::Scalar::zero() {
            return s.max_factor;
        }
        (s.safety * (s.tol / error).powf(self.exponent))
            .max(s.min_factor)
            .min(s.max_factor)
    }

    fn emit_samples(&mut self) {
        let Some(step) = self.last else {
            return;
        };
        while self.it < self.ts.len() && self.ts[self.it] <= self.t {
            let sigma = (self.ts[self.it] - step.t) / step.h;
            let value = self.interpolate(&step, sigma);
            self.out[self.it] = value;
            self.it += 1;
        }
        if self.it == self.ts.len() {
            self.state = StepperState::Done;
        }
    }

    fn interpolate(&self, step: &AcceptedStep<V>, sigma: V::Scalar) -> V {
        let zero = V::Scalar::zero();
        let mut y = step.y;
        for (i, ki) in self.k.iter().enumerate() {
            let w = self.tableau.dense_weight(i, sigma);
            if w != zero {
                y = y + ki.scale(w);
            }
        }
        y
    }
}

/// Sample times must be non-empty, finite and strictly increasing.
pub(super) fn validate_sample_times<T: FloatScalar>(ts: &[T]) -> Result<(), OdeError> {
    let Some(&first) = ts.first() else {
        return Err(OdeError::NoSampleTimes);
    };
    if !first.is_finite() {
        return Err(OdeError::SampleTimesNotIncreasing { index: 0 });
    }
    for (index, pair) in ts.windows(2).enumerate() {
        if !(pair[1].is_finite() && pair[1] > pair[0]) {
            return Err(OdeError::SampleTimesNotIncreasing { index: index + 1 });
        }
    }
    Ok(())
}

/// Starting step size, after Hairer, Norsett & Wanner (Solving ODEs I, II.4),
/// with the absolute tolerance as the error scale. Costs one evaluation.
/// Never below the time resolution at `t0` unless the span itself is.
#[allow(clippy::too_many_arguments)]
fn initial_step<V, F>(
    f: &mut F,
    t0: V::Scalar,
    y0: &V,
    f0: &V,
    tol: V::Scalar,
    order: usize,
    span: V::Scalar,
    stats: &mut Stats,
) -> V::Scalar
where
    V: OdeVector,
    F: FnMut(&V, V::Scalar) -> V,
{
    let c = V::Scalar::coeff;
    let d0 = y0.inf_norm() / tol;
    let d1 = f0.inf_norm() / tol;

    let h0 = if d0 < c(1e-5) || d1 < c(1e-5) {
        c(1e-6)
    } else {
        c(0.01) * d0 / d1
    };
    let h0 = h0.min(span);

    let y1 = *y0 + f0.scale(h0);
    let f1 = f(&y1, t0 + h0);
    stats.evals += 1;
    let d2 = (f1 - *f0).inf_norm() / tol / h0;

    let dmax = d1.max(d2);
    let h1 = if dmax <= c(1e-15) {
        (h0 * c(1e-3)).max(c(1e-6))
    } else {
        (c(0.01) / dmax).powf(V::Scalar::one() / c(order as f64))
    };

    // At least a few ulps of t0, or the first attempt cannot move t.
    let floor = c(16.0) * V::Scalar::epsilon() * t0.abs();
    (c(100.0) * h0).min(h1).max(floor).min(span)
}
