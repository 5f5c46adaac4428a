// Exponential decay dy/dt = -k y at several tolerances.
// Prints one JSON object per tolerance with the max error against exp(-k t):
//   {"tol":1e-4, "max_err":..., "evals":N}

use hummingbird::ode::{integrate_with, AdaptiveSettings};

fn main() {
    let k = 0.7_f64;
    let ts: Vec<f64> = (0..=50).map(|i| 0.2 * i as f64).collect();

    for tol in [1e-4, 1e-6, 1e-8, 1e-10, 1e-12] {
        let sol = integrate_with(&ts, 1.0, |y: &f64, _t| -k * y, &AdaptiveSettings::new(tol))
            .expect("ODE integration failed");

        let max_err = ts
            .iter()
            .zip(&sol.states)
            .map(|(t, y)| (y - (-k * t).exp()).abs())
            .fold(0.0, f64::max);

        println!(
            "{{\"tol\":{tol:e},\"max_err\":{max_err:e},\"evals\":{}}}",
            sol.stats.evals
        );
    }
}
