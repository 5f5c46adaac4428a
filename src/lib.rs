//! # hummingbird
//!
//! Adaptive-step Dormand-Prince 5(4) ODE integration with dense output,
//! generic over a small vector contract. no-std compatible: the step loop
//! never allocates, and the `Vec`-returning drivers sit behind the `alloc`
//! feature.
//!
//! ## Quick start
//!
//! ```
//! use hummingbird::ode::integrate;
//!
//! // dy/dt = -y, y(0) = 1
//! let ts = [0.0_f64, 0.5, 1.0, 2.0];
//! let ys = integrate(&ts, 1.0, 1e-10, |y: &f64, _t| -*y).unwrap();
//! assert_eq!(ys.len(), ts.len());
//! assert!((ys[3] - (-2.0_f64).exp()).abs() < 1e-8);
//! ```
//!
//! ## Modules
//!
//! - [`traits`] — [`FloatScalar`] for `f32` / `f64`, and [`OdeVector`], the
//!   capability contract the integrator consumes: addition, subtraction,
//!   scaling, a splat constructor, component access and the infinity norm.
//!   Bare scalars are length-1 vectors.
//!
//! - [`vector`] — Fixed-size, stack-allocated [`Vector<T, N>`] implementing
//!   [`OdeVector`], with aliases for the usual SIMD widths
//!   ([`Vector2`] .. [`Vector64`]).
//!
//! - [`ode`] — [`ButchersTableau`](ode::ButchersTableau) coefficient tables,
//!   the [`AdaptiveStepper`](ode::AdaptiveStepper) accept/reject engine with
//!   FSAL reuse and dense output, and the [`integrate`](ode::integrate)
//!   drivers.
//!
//! ## Cargo features
//!
//! | Feature | Default  | Description |
//! |---------|----------|-------------|
//! | `std`   | yes      | Implies `alloc`. Hardware FPU via system libm |
//! | `alloc` | via std  | `integrate` / `integrate_with` returning `Vec` |
//! | `libm`  | baseline | Pure-Rust software float fallback |

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod ode;
pub mod traits;
pub mod vector;

pub use traits::{FloatScalar, OdeVector};
pub use vector::{
    Vector, Vector1, Vector16, Vector2, Vector3, Vector32, Vector4, Vector64, Vector8,
};
