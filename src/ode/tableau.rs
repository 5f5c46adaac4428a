use crate::traits::FloatScalar;

use super::TableauError;

/// Coefficients of an explicit embedded Runge-Kutta method with dense output.
///
/// `S` is the number of stages and `P` the number of terms in each stage's
/// dense-output polynomial
///
/// ```text
/// b_i(sigma) = p[i][0] * sigma + p[i][1] * sigma^2 + ... + p[i][P-1] * sigma^P
/// ```
///
/// so that `y(t_n + sigma * h) = y_n + sum_i b_i(sigma) * k_i` for
/// `sigma` in `[0, 1]`.
///
/// `b` weights the lower-order embedded solution used only for error
/// estimation, `b_hat` the higher-order solution the integration advances
/// with. A tableau is immutable once built; [`new`](Self::new) validates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButchersTableau<T, const S: usize, const P: usize> {
    order: usize,
    c: [T; S],
    a: [[T; S]; S],
    b: [T; S],
    b_hat: [T; S],
    p: [[T; P]; S],
    e: [T; S],
    fsal: bool,
}

/// The 7-stage Dormand-Prince 5(4) tableau.
///
/// Steps are 5th order, but the dense output is Hairer's 4th-degree
/// continuous extension (`P = 4`): a 5th-order interpolant needs stages
/// beyond these seven. It still matches the step's solution at both ends.
pub type DormandPrince<T> = ButchersTableau<T, 7, 4>;

impl<T: FloatScalar, const S: usize, const P: usize> ButchersTableau<T, S, P> {
    /// Build and validate a tableau.
    ///
    /// Checks, within a rounding allowance of a few ulps per stage:
    ///
    /// - `order > 0` and `c[S-1] == 1`;
    /// - `a` is strictly lower triangular and `c[i] == sum_j a[i][j]`;
    /// - `b` and `b_hat` each sum to one;
    /// - every dense polynomial hits its stage weight at the end of the step,
    ///   `b_i(1) == b_hat[i]`.
    pub fn new(
        order: usize,
        c: [T; S],
        a: [[T; S]; S],
        b: [T; S],
        b_hat: [T; S],
        p: [[T; P]; S],
    ) -> Result<Self, TableauError> {
        let mut e = [T::zero(); S];
        for i in 0..S {
            e[i] = b_hat[i] - b[i];
        }

        let fsal = S > 0
            && c[S - 1] == T::one()
            && b_hat[S - 1] == T::zero()
            && (0..S).all(|j| a[S - 1][j] == b_hat[j]);

        let tableau = Self {
            order,
            c,
            a,
            b,
            b_hat,
            p,
            e,
            fsal,
        };
        tableau.validate()?;
        Ok(tableau)
    }

    fn validate(&self) -> Result<(), TableauError> {
        if self.order == 0 {
            return Err(TableauError::ZeroOrder);
        }
        if S == 0 || self.c[S - 1] != T::one() {
            return Err(TableauError::LastNodeNotUnity);
        }

        let slack = T::epsilon() * T::coeff(16.0 * S as f64);
        let close = |x: T, y: T| (x - y).abs() <= slack;

        for i in 0..S {
            let mut row_sum = T::zero();
            for j in 0..S {
                if j >= i {
                    if self.a[i][j] != T::zero() {
                        return Err(TableauError::NotStrictlyLowerTriangular { row: i, col: j });
                    }
                } else {
                    row_sum = row_sum + self.a[i][j];
                }
            }
            if !close(row_sum, self.c[i]) {
                return Err(TableauError::RowSumMismatch { row: i });
            }
        }

        let sum = |w: &[T; S]| w.iter().fold(T::zero(), |acc, &x| acc + x);
        if !close(sum(&self.b), T::one()) {
            return Err(TableauError::LowOrderWeights);
        }
        if !close(sum(&self.b_hat), T::one()) {
            return Err(TableauError::HighOrderWeights);
        }

        for i in 0..S {
            if !close(self.dense_weight(i, T::one()), self.b_hat[i]) {
                return Err(TableauError::DenseEndpointMismatch { stage: i });
            }
        }
        Ok(())
    }

    /// Number of stages.
    #[inline]
    pub const fn stages(&self) -> usize {
        S
    }

    /// Order of the advancing (higher-order) solution.
    #[inline]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Number of terms in each dense-output polynomial.
    #[inline]
    pub const fn dense_order(&self) -> usize {
        P
    }

    /// Nodes, as fractions of the step.
    #[inline]
    pub fn c(&self) -> &[T; S] {
        &self.c
    }

    /// Stage coupling matrix (strictly lower triangular).
    #[inline]
    pub fn a(&self) -> &[[T; S]; S] {
        &self.a
    }

    /// Weights of the lower-order embedded solution.
    #[inline]
    pub fn b(&self) -> &[T; S] {
        &self.b
    }

    /// Weights of the higher-order advancing solution.
    #[inline]
    pub fn b_hat(&self) -> &[T; S] {
        &self.b_hat
    }

    /// Dense-output coefficients, one polynomial per stage.
    #[inline]
    pub fn p(&self) -> &[[T; P]; S] {
        &self.p
    }

    /// Error weights `b_hat[i] - b[i]`.
    #[inline]
    pub fn error_weights(&self) -> &[T; S] {
        &self.e
    }

    /// First Same As Last: the final stage is evaluated at `(y_hat, t + h)`,
    /// so its derivative can seed the next step.
    #[inline]
    pub fn is_fsal(&self) -> bool {
        self.fsal
    }

    /// Dense weight `b_i(sigma)` of `stage`, evaluated in Horner form.
    #[inline]
    pub fn dense_weight(&self, stage: usize, sigma: T) -> T {
        let mut acc = T::zero();
        for &pj in self.p[stage].iter().rev() {
            acc = acc * sigma + pj;
        }
        acc * sigma
    }
}

// Dormand & Prince (1980), with Hairer's continuous extension rewritten as
// polynomial coefficients in sigma (Hairer, Norsett & Wanner, Solving ODEs I).
const DP_C: [f64; 7] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const DP_A: [[f64; 7]; 7] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
        0.0,
    ],
];

const DP_B: [f64; 7] = [
    5179.0 / 57600.0,
    0.0,
    7571.0 / 16695.0,
    393.0 / 640.0,
    -92097.0 / 339200.0,
    187.0 / 2100.0,
    1.0 / 40.0,
];

const DP_B_HAT: [f64; 7] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
    0.0,
];

const DP_P: [[f64; 4]; 7] = [
    [
        1.0,
        -8048581381.0 / 2820520608.0,
        8663915743.0 / 2820520608.0,
        -12715105075.0 / 11282082432.0,
    ],
    [0.0, 0.0, 0.0, 0.0],
    [
        0.0,
        131558114200.0 / 32700410799.0,
        -68118460800.0 / 10900136933.0,
        87487479700.0 / 32700410799.0,
    ],
    [
        0.0,
        -1754552775.0 / 470086768.0,
        14199869525.0 / 1410260304.0,
        -10690763975.0 / 1880347072.0,
    ],
    [
        0.0,
        127303824393.0 / 49829197408.0,
        -318862633887.0 / 49829197408.0,
        701980252875.0 / 199316789632.0,
    ],
    [
        0.0,
        -282668133.0 / 205662961.0,
        2019193451.0 / 616988883.0,
        -1453857185.0 / 822651844.0,
    ],
    [
        0.0,
        40617522.0 / 29380423.0,
        -110615467.0 / 29380423.0,
        69997945.0 / 29380423.0,
    ],
];

impl<T: FloatScalar> ButchersTableau<T, 7, 4> {
    /// Dormand-Prince 5(4): 7 stages, FSAL, 4th-degree dense output.
    ///
    /// ```
    /// use hummingbird::ode::DormandPrince;
    ///
    /// let dp = DormandPrince::<f64>::dormand_prince();
    /// assert_eq!(dp.stages(), 7);
    /// assert_eq!(dp.order(), 5);
    /// assert!(dp.is_fsal());
    /// ```
    pub fn dormand_prince() -> Self {
        let c = DP_C.map(T::coeff);
        let a = DP_A.map(|row| row.map(T::coeff));
        let b = DP_B.map(T::coeff);
        let b_hat = DP_B_HAT.map(T::coeff);
        let p = DP_P.map(|row| row.map(T::coeff));

        let mut e = [T::zero(); 7];
        for i in 0..7 {
            e[i] = b_hat[i] - b[i];
        }

        let tableau = Self {
            order: 5,
            c,
            a,
            b,
            b_hat,
            p,
            e,
            fsal: true,
        };
        debug_assert!(tableau.validate().is_ok());
        tableau
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    type Heun = ButchersTableau<f64, 2, 2>;

    // Heun-Euler 2(1) with a quadratic dense output:
    // b_1(s) = s - s^2/2, b_2(s) = s^2/2.
    fn heun_parts() -> (
        [f64; 2],
        [[f64; 2]; 2],
        [f64; 2],
        [f64; 2],
        [[f64; 2]; 2],
    ) {
        (
            [0.0, 1.0],
            [[0.0, 0.0], [1.0, 0.0]],
            [1.0, 0.0],
            [0.5, 0.5],
            [[1.0, -0.5], [0.0, 0.5]],
        )
    }

    #[test]
    fn dormand_prince_is_valid() {
        let dp = DormandPrince::<f64>::dormand_prince();
        assert!(dp.validate().is_ok());
        assert_eq!(dp.dense_order(), 4);
        assert_eq!(dp.c()[6], 1.0);
        assert!(dp.is_fsal());

        let dp32 = DormandPrince::<f32>::dormand_prince();
        assert!(dp32.validate().is_ok());
    }

    #[test]
    fn dormand_prince_rebuilds_through_new() {
        let dp = DormandPrince::<f64>::dormand_prince();
        let rebuilt =
            ButchersTableau::new(5, *dp.c(), *dp.a(), *dp.b(), *dp.b_hat(), *dp.p()).unwrap();
        assert_eq!(rebuilt, dp);
    }

    #[test]
    fn dense_weights_at_endpoints() {
        let dp = DormandPrince::<f64>::dormand_prince();
        for i in 0..7 {
            assert_eq!(dp.dense_weight(i, 0.0), 0.0);
            assert_abs_diff_eq!(dp.dense_weight(i, 1.0), dp.b_hat()[i], epsilon = 1e-14);
        }
        let total: f64 = (0..7).map(|i| dp.dense_weight(i, 0.5)).sum();
        assert_abs_diff_eq!(total, 0.5, epsilon = 1e-14);
    }

    #[test]
    fn error_weights_are_difference() {
        let dp = DormandPrince::<f64>::dormand_prince();
        for i in 0..7 {
            assert_eq!(dp.error_weights()[i], dp.b_hat()[i] - dp.b()[i]);
        }
        let sum: f64 = dp.error_weights().iter().sum();
        assert_abs_diff_eq!(sum, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn custom_tableau_accepted() {
        let (c, a, b, b_hat, p) = heun_parts();
        let heun = Heun::new(2, c, a, b, b_hat, p).unwrap();
        assert_eq!(heun.stages(), 2);
        assert!(!heun.is_fsal());
    }

    #[test]
    fn rejects_zero_order() {
        let (c, a, b, b_hat, p) = heun_parts();
        assert_eq!(Heun::new(0, c, a, b, b_hat, p), Err(TableauError::ZeroOrder));
    }

    #[test]
    fn rejects_last_node() {
        let (_, a, b, b_hat, p) = heun_parts();
        assert_eq!(
            Heun::new(2, [0.0, 0.5], a, b, b_hat, p),
            Err(TableauError::LastNodeNotUnity)
        );
    }

    #[test]
    fn rejects_upper_entries() {
        let (c, _, b, b_hat, p) = heun_parts();
        assert_eq!(
            Heun::new(2, c, [[0.0, 0.25], [1.0, 0.0]], b, b_hat, p),
            Err(TableauError::NotStrictlyLowerTriangular { row: 0, col: 1 })
        );
    }

    #[test]
    fn rejects_row_sum() {
        let (c, _, b, b_hat, p) = heun_parts();
        assert_eq!(
            Heun::new(2, c, [[0.0, 0.0], [0.75, 0.0]], b, b_hat, p),
            Err(TableauError::RowSumMismatch { row: 1 })
        );
    }

    #[test]
    fn rejects_weights() {
        let (c, a, b, b_hat, p) = heun_parts();
        assert_eq!(
            Heun::new(2, c, a, [0.9, 0.0], b_hat, p),
            Err(TableauError::LowOrderWeights)
        );
        assert_eq!(
            Heun::new(2, c, a, b, [0.5, 0.6], p),
            Err(TableauError::HighOrderWeights)
        );
    }

    #[test]
    fn rejects_dense_endpoint() {
        let (c, a, b, b_hat, _) = heun_parts();
        assert_eq!(
            Heun::new(2, c, a, b, b_hat, [[1.0, -0.25], [0.0, 0.5]]),
            Err(TableauError::DenseEndpointMismatch { stage: 0 })
        );
    }
}
