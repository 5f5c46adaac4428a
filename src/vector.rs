use core::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::traits::{FloatScalar, OdeVector};

/// Fixed-size state vector with `N` components.
///
/// Stack-allocated `[T; N]` storage, `Copy`, no-std compatible. Implements
/// [`OdeVector`] so it can be integrated directly.
///
/// # Examples
///
/// ```
/// use hummingbird::Vector;
///
/// let a = Vector::from_array([1.0_f64, 2.0]);
/// let b = Vector::fill(0.5_f64);
/// let c = a + 2.0 * b;
/// assert_eq!(c[0], 2.0);
/// assert_eq!(c[1], 3.0);
/// assert_eq!(c.norm_inf(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector<T, const N: usize> {
    pub(crate) data: [T; N],
}

impl<T, const N: usize> Vector<T, N> {
    /// Create a vector from an array.
    #[inline]
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    /// Number of components.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// `true` for the zero-length vector.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Borrow the components.
    #[inline]
    pub const fn as_array(&self) -> &[T; N] {
        &self.data
    }

    /// Consume the vector, returning its components.
    #[inline]
    pub fn into_array(self) -> [T; N] {
        self.data
    }

    /// Iterate over the components.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: FloatScalar, const N: usize> Vector<T, N> {
    /// Create a vector filled with a single value.
    #[inline]
    pub fn fill(value: T) -> Self {
        Self { data: [value; N] }
    }

    /// Create a vector of zeros.
    #[inline]
    pub fn zeros() -> Self {
        Self::fill(T::zero())
    }

    /// Infinity norm (largest absolute component).
    ///
    /// Zero for the empty vector; NaN if any component is NaN.
    pub fn norm_inf(&self) -> T {
        let mut max = T::zero();
        for &x in self.data.iter() {
            let a = x.abs();
            if a > max || a.is_nan() {
                max = a;
            }
        }
        max
    }

    /// `true` if every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl<T: FloatScalar, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    #[inline]
    fn from(data: [T; N]) -> Self {
        Self { data }
    }
}

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

// ── Vector size aliases ─────────────────────────────────────────────

/// A 1-element vector.
pub type Vector1<T> = Vector<T, 1>;
/// A 2-element vector.
pub type Vector2<T> = Vector<T, 2>;
/// A 3-element vector.
pub type Vector3<T> = Vector<T, 3>;
/// A 4-element vector.
pub type Vector4<T> = Vector<T, 4>;
/// An 8-element vector.
pub type Vector8<T> = Vector<T, 8>;
/// A 16-element vector.
pub type Vector16<T> = Vector<T, 16>;
/// A 32-element vector.
pub type Vector32<T> = Vector<T, 32>;
/// A 64-element vector.
pub type Vector64<T> = Vector<T, 64>;

// ── Component-wise addition / subtraction ───────────────────────────

impl<T: FloatScalar, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.data[i] = self.data[i] + rhs.data[i];
        }
        out
    }
}

impl<T: FloatScalar, const N: usize> AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] + rhs.data[i];
        }
    }
}

impl<T: FloatScalar, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..N {
            out.data[i] = self.data[i] - rhs.data[i];
        }
        out
    }
}

impl<T: FloatScalar, const N: usize> SubAssign for Vector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for i in 0..N {
            self.data[i] = self.data[i] - rhs.data[i];
        }
    }
}

impl<T: FloatScalar, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        let mut out = self;
        for x in out.data.iter_mut() {
            *x = -*x;
        }
        out
    }
}

// ── Scalar multiplication: vector * scalar ──────────────────────────

impl<T: FloatScalar, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        let mut out = self;
        for x in out.data.iter_mut() {
            *x = *x * rhs;
        }
        out
    }
}

impl<T: FloatScalar, const N: usize> MulAssign<T> for Vector<T, N> {
    fn mul_assign(&mut self, rhs: T) {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
    }
}

// ── Reference variants ──────────────────────────────────────────────
// Vector is Copy, so &Vector ops just deref and delegate.

macro_rules! forward_ref_binop {
    ($Op:ident, $method:ident) => {
        impl<T: FloatScalar, const N: usize> $Op<Vector<T, N>> for &Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: Vector<T, N>) -> Vector<T, N> {
                (*self).$method(rhs)
            }
        }

        impl<T: FloatScalar, const N: usize> $Op<&Vector<T, N>> for Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: &Vector<T, N>) -> Vector<T, N> {
                self.$method(*rhs)
            }
        }

        impl<T: FloatScalar, const N: usize> $Op<&Vector<T, N>> for &Vector<T, N> {
            type Output = Vector<T, N>;
            fn $method(self, rhs: &Vector<T, N>) -> Vector<T, N> {
                (*self).$method(*rhs)
            }
        }
    };
}

forward_ref_binop!(Add, add);
forward_ref_binop!(Sub, sub);

impl<T: FloatScalar, const N: usize> Mul<T> for &Vector<T, N> {
    type Output = Vector<T, N>;
    fn mul(self, rhs: T) -> Vector<T, N> {
        (*self).mul(rhs)
    }
}

// ── scalar * vector (concrete impls to avoid orphan rules) ──────────

macro_rules! impl_scalar_mul {
    ($($t:ty),*) => {
        $(
            impl<const N: usize> Mul<Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                fn mul(self, rhs: Vector<$t, N>) -> Vector<$t, N> {
                    rhs * self
                }
            }

            impl<const N: usize> Mul<&Vector<$t, N>> for $t {
                type Output = Vector<$t, N>;

                fn mul(self, rhs: &Vector<$t, N>) -> Vector<$t, N> {
                    *rhs * self
                }
            }
        )*
    };
}

impl_scalar_mul!(f32, f64);

// ── ODE state contract ──────────────────────────────────────────────

impl<T: FloatScalar, const N: usize> OdeVector for Vector<T, N> {
    type Scalar = T;

    const SCALAR_COUNT: usize = N;

    #[inline]
    fn scale(self, s: T) -> Self {
        self * s
    }

    #[inline]
    fn splat(x: T) -> Self {
        Self::fill(x)
    }

    #[inline]
    fn component(&self, i: usize) -> T {
        self.data[i]
    }

    #[inline]
    fn set_component(&mut self, i: usize, x: T) {
        self.data[i] = x;
    }

    #[inline]
    fn inf_norm(&self) -> T {
        self.norm_inf()
    }
}
