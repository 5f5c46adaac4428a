use core::fmt::Debug;
use core::ops::{Add, Sub};
use num_traits::Float;

/// Trait for the real floating-point scalars the integrator works in.
///
/// Implemented for `f32` and `f64`. Tolerances, step sizes, times and
/// tableau coefficients are all expressed in this type.
pub trait FloatScalar: Float + Debug + Default + Send + Sync + 'static {
    /// Convert an `f64` constant into `Self`.
    ///
    /// Used to materialise tableau coefficients and controller constants.
    /// Narrowing to `f32` rounds to nearest.
    fn coeff(x: f64) -> Self;
}

macro_rules! impl_float_scalar {
    ($($t:ty),*) => {
        $(
            impl FloatScalar for $t {
                #[inline]
                fn coeff(x: f64) -> $t {
                    x as $t
                }
            }
        )*
    };
}

impl_float_scalar!(f32, f64);

/// Capability contract for the state of an ODE.
///
/// A fixed-size, ordered collection of [`FloatScalar`] components supporting
/// the additive group operations and scaling by a scalar. Every vector taking part in
/// one integration has the same type, so length and scalar type agree by
/// construction.
///
/// `f32` and `f64` implement this trait as length-1 vectors; [`Vector`]
/// implements it for any `N`.
///
/// ```
/// use hummingbird::{OdeVector, Vector};
///
/// let v = Vector::from_array([3.0_f64, -4.0, 1.0]);
/// assert_eq!(v.inf_norm(), 4.0);
/// assert_eq!(<Vector<f64, 3> as OdeVector>::SCALAR_COUNT, 3);
/// assert_eq!(2.5_f64.inf_norm(), 2.5);
/// ```
///
/// [`Vector`]: crate::Vector
pub trait OdeVector:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
{
    /// Component type.
    type Scalar: FloatScalar;

    /// Number of components.
    const SCALAR_COUNT: usize;

    /// Multiply every component by `s`.
    fn scale(self, s: Self::Scalar) -> Self;

    /// A vector with every component equal to `x`.
    fn splat(x: Self::Scalar) -> Self;

    /// Read component `i`. Panics if `i >= SCALAR_COUNT`.
    fn component(&self, i: usize) -> Self::Scalar;

    /// Write component `i`. Panics if `i >= SCALAR_COUNT`.
    fn set_component(&mut self, i: usize, x: Self::Scalar);

    /// Infinity norm: the largest absolute component.
    ///
    /// A NaN component makes the result NaN.
    fn inf_norm(&self) -> Self::Scalar {
        let mut max = self.component(0).abs();
        for i in 1..Self::SCALAR_COUNT {
            let a = self.component(i).abs();
            if a > max || a.is_nan() {
                max = a;
            }
        }
        max
    }
}

macro_rules! impl_ode_vector_scalar {
    ($($t:ty),*) => {
        $(
            impl OdeVector for $t {
                type Scalar = $t;

                const SCALAR_COUNT: usize = 1;

                #[inline]
                fn scale(self, s: $t) -> $t {
                    self * s
                }

                #[inline]
                fn splat(x: $t) -> $t {
                    x
                }

                #[inline]
                fn component(&self, i: usize) -> $t {
                    assert!(i == 0, "component index {i} out of range for a scalar");
                    *self
                }

                #[inline]
                fn set_component(&mut self, i: usize, x: $t) {
                    assert!(i == 0, "component index {i} out of range for a scalar");
                    *self = x;
                }

                #[inline]
                fn inf_norm(&self) -> $t {
                    Float::abs(*self)
                }
            }
        )*
    };
}

impl_ode_vector_scalar!(f32, f64);
