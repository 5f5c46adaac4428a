#![cfg(feature = "std")]

use core::ops::{Add, Sub};

use approx::assert_abs_diff_eq;
use hummingbird::ode::{integrate, integrate_with, AdaptiveSettings, OdeError};
use hummingbird::{OdeVector, Vector2, Vector4};

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| a + (b - a) * i as f64 / (n - 1) as f64).collect()
}

// ── Physical systems ─────────────────────────────────────────────────

#[test]
fn kepler_circular_orbit() {
    // Unit circular orbit, mu = 1: period 2π, constant radius.
    let y0 = Vector4::from_array([1.0, 0.0, 0.0, 1.0]);
    let ts = linspace(0.0, 2.0 * core::f64::consts::PI, 17);
    let sol = integrate_with(
        &ts,
        y0,
        |y: &Vector4<f64>, _t| {
            let r2 = y[0] * y[0] + y[1] * y[1];
            let r3 = r2 * r2.sqrt();
            Vector4::from_array([y[2], y[3], -y[0] / r3, -y[1] / r3])
        },
        &AdaptiveSettings::new(1e-11),
    )
    .unwrap();

    for (t, y) in ts.iter().zip(&sol.states) {
        assert_abs_diff_eq!(y[0], t.cos(), epsilon = 1e-8);
        assert_abs_diff_eq!(y[1], t.sin(), epsilon = 1e-8);
        let r = (y[0] * y[0] + y[1] * y[1]).sqrt();
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-8);
    }
    assert!(sol.stats.accepted > 10);
}

#[test]
fn lotka_volterra_conserves_invariant() {
    let (a, b, c, d) = (1.0, 0.5, 0.75, 0.25);
    let invariant = |y: &Vector2<f64>| d * y[0] - c * y[0].ln() + b * y[1] - a * y[1].ln();

    let y0 = Vector2::from_array([2.0, 1.0]);
    let ts = linspace(0.0, 20.0, 101);
    let ys = integrate(&ts, y0, 1e-10, |y: &Vector2<f64>, _t| {
        Vector2::from_array([a * y[0] - b * y[0] * y[1], d * y[0] * y[1] - c * y[1]])
    })
    .unwrap();

    let v0 = invariant(&y0);
    for y in &ys {
        assert!(y[0] > 0.0 && y[1] > 0.0);
        assert_abs_diff_eq!(invariant(y), v0, epsilon = 1e-7);
    }
}

#[test]
fn logistic_growth() {
    // y' = y (1 - y), y(0) = 0.1  →  y = 1 / (1 + 9 e^{-t})
    let ts = linspace(0.0, 10.0, 11);
    let ys = integrate(&ts, 0.1, 1e-10, |y: &f64, _t| y * (1.0 - y)).unwrap();
    for (t, y) in ts.iter().zip(&ys) {
        assert_abs_diff_eq!(*y, 1.0 / (1.0 + 9.0 * (-t).exp()), epsilon = 1e-8);
    }
}

#[test]
fn nonzero_start_time() {
    let ts = [10.0, 10.5, 11.0];
    let ys = integrate(&ts, 1.0, 1e-10, |y: &f64, _t| -2.0 * y).unwrap();
    assert_eq!(ys[0], 1.0);
    assert_abs_diff_eq!(ys[2], (-2.0_f64).exp(), epsilon = 1e-8);
}

#[test]
fn sample_times_checked_before_stepping() {
    let mut evals = 0;
    let result = integrate(&[0.0, 2.0, 1.0], 1.0, 1e-8, |y: &f64, _t| {
        evals += 1;
        *y
    });
    assert_eq!(result, Err(OdeError::SampleTimesNotIncreasing { index: 2 }));
    assert_eq!(evals, 0);
}

// ── User-defined state type ──────────────────────────────────────────

/// Position and velocity of a particle in the plane, stored as named fields.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

impl Add for Particle {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Particle {
            x: self.x + o.x,
            y: self.y + o.y,
            vx: self.vx + o.vx,
            vy: self.vy + o.vy,
        }
    }
}

impl Sub for Particle {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Particle {
            x: self.x - o.x,
            y: self.y - o.y,
            vx: self.vx - o.vx,
            vy: self.vy - o.vy,
        }
    }
}

impl OdeVector for Particle {
    type Scalar = f64;
    const SCALAR_COUNT: usize = 4;

    fn scale(self, s: f64) -> Self {
        Particle {
            x: self.x * s,
            y: self.y * s,
            vx: self.vx * s,
            vy: self.vy * s,
        }
    }

    fn splat(v: f64) -> Self {
        Particle { x: v, y: v, vx: v, vy: v }
    }

    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.vx,
            3 => self.vy,
            _ => panic!("Particle component {i} out of range"),
        }
    }

    fn set_component(&mut self, i: usize, v: f64) {
        match i {
            0 => self.x = v,
            1 => self.y = v,
            2 => self.vx = v,
            3 => self.vy = v,
            _ => panic!("Particle component {i} out of range"),
        }
    }
}

#[test]
fn projectile_with_custom_state() {
    let g = 9.81;
    let p0 = Particle {
        x: 0.0,
        y: 0.0,
        vx: 3.0,
        vy: 10.0,
    };
    let ts = linspace(0.0, 2.0, 9);
    let ps = integrate(&ts, p0, 1e-12, |p: &Particle, _t| Particle {
        x: p.vx,
        y: p.vy,
        vx: 0.0,
        vy: -g,
    })
    .unwrap();

    // Quadratic trajectories are reproduced to rounding error.
    for (t, p) in ts.iter().zip(&ps) {
        assert_abs_diff_eq!(p.x, 3.0 * t, epsilon = 1e-10);
        assert_abs_diff_eq!(p.y, 10.0 * t - 0.5 * g * t * t, epsilon = 1e-10);
        assert_abs_diff_eq!(p.vy, 10.0 - g * t, epsilon = 1e-10);
    }
}

#[test]
fn custom_state_default_inf_norm() {
    let p = Particle {
        x: 1.0,
        y: -7.5,
        vx: 2.0,
        vy: 0.0,
    };
    assert_eq!(p.inf_norm(), 7.5);
}
